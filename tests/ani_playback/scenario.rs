//! Two-frame looping animation driven with fixed ticks

use pdani_rs::prelude::*;
use pdani_types::file::ani::FixtureBuilder;

fn walk_cycle() -> AniFile<'static> {
	let data = FixtureBuilder::new(16, 16)
		.tag("walk", 1, 2)
		.layer(LayerType::Layer, -1, "body")
		.layer(LayerType::Collider, -1, "feet")
		.image(0, 0, 8, 8)
		.cel(0, 4, 4)
		.collider(4, 12, 8, 4)
		.frame(100, &[(0, None), (-1, None)])
		.frame(200, &[(0, Some("land")), (0, None)])
		.build();
	AniFile::from_vec(data).unwrap()
}

#[test_log::test]
fn test_fixed_ticks_land_on_boundaries() {
	let file = walk_cycle();
	let mut player = Player::with_config(&file, PlayerConfig::looping()).unwrap();
	player.play(Some("walk")).unwrap();

	let mut fired = Vec::new();
	let mut timeline = Vec::new();
	for _ in 0..4 {
		player
			.advance(50, |_, frame, trigger| fired.push((frame, trigger.to_owned())))
			.unwrap();
		timeline.push((player.frame_number(), player.frame_elapsed(), player.total_elapsed()));
	}

	assert_eq!(timeline, [(1, 50, 50), (2, 0, 100), (2, 50, 150), (2, 100, 200)]);
	assert_eq!(fired, [(2, "land".to_owned())]);
	assert!(player.is_playing());
}

#[test]
fn test_loop_wraps_and_fires_again() {
	let file = walk_cycle();
	let mut player = Player::new(&file).unwrap();
	player.play(None).unwrap();

	let mut fired = 0;
	for _ in 0..6 {
		player.advance(50, |_, _, _| fired += 1).unwrap();
	}
	assert_eq!(player.frame_number(), 1);
	assert_eq!(player.previous_frame_number(), Some(2));
	assert_eq!(fired, 1);

	for _ in 0..2 {
		player.advance(50, |_, _, _| fired += 1).unwrap();
	}
	assert_eq!(player.frame_number(), 2);
	assert_eq!(fired, 2);
}

#[test]
fn test_collider_follows_crossed_frames() {
	let file = walk_cycle();
	let mut player = Player::new(&file).unwrap();
	player.play(None).unwrap();

	let mut hits = Vec::new();
	player.advance(50, |_, _, _| {}).unwrap();
	player.check_collision(100, 50, |_, hit| hits.push((hit.name.to_owned(), hit.x, hit.y))).unwrap();
	assert!(hits.is_empty());

	player.advance(50, |_, _, _| {}).unwrap();
	player.check_collision(100, 50, |_, hit| hits.push((hit.name.to_owned(), hit.x, hit.y))).unwrap();
	assert_eq!(hits, [("feet".to_owned(), 104, 62)]);
}

#[test]
fn test_one_shot_holds_last_frame() {
	let file = walk_cycle();
	let mut player = Player::with_config(&file, PlayerConfig::one_shot()).unwrap();
	player.play(None).unwrap();

	let mut fired = Vec::new();
	player.advance(1000, |_, frame, trigger| fired.push((frame, trigger.to_owned()))).unwrap();

	assert_eq!(player.state(), PlayState::Stopped);
	assert_eq!(player.frame_number(), 2);
	assert_eq!(fired, [(2, "land".to_owned())]);

	player.advance(1000, |_, frame, trigger| fired.push((frame, trigger.to_owned()))).unwrap();
	assert_eq!(fired.len(), 1);
}
