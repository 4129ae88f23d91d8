//! Collider enumeration order and mirroring

use pdani_rs::prelude::*;
use pdani_types::file::ani::FixtureBuilder;

fn three_colliders() -> AniFile<'static> {
	let data = FixtureBuilder::new(48, 32)
		.layer(LayerType::Layer, -1, "body")
		.layer(LayerType::Collider, -1, "head")
		.layer(LayerType::Collider, -1, "torso")
		.layer(LayerType::Collider, -1, "weapon")
		.image(0, 0, 8, 8)
		.cel(0, 0, 0)
		.collider(30, 20, 10, 6)
		.collider(4, 2, 12, 8)
		.collider(16, 10, 8, 14)
		.frame(40, &[(0, None), (1, None), (2, None), (0, Some("swing"))])
		.build();
	AniFile::from_vec(data).unwrap()
}

fn hits(file: &AniFile<'_>, flip: Flip) -> Vec<(String, i32, i32, u16, u16)> {
	let mut found = Vec::new();
	file.check_collision(100, 200, 1, flip, |_, hit| {
		found.push((hit.name.to_owned(), hit.x, hit.y, hit.w, hit.h));
	})
	.unwrap();
	found
}

#[test]
fn test_colliders_in_layer_order() {
	let file = three_colliders();
	assert_eq!(
		hits(&file, Flip::empty()),
		[
			("head".to_owned(), 104, 202, 12, 8),
			("torso".to_owned(), 116, 210, 8, 14),
			("weapon".to_owned(), 130, 220, 10, 6),
		]
	);
}

#[test]
fn test_colliders_mirrored() {
	let file = three_colliders();
	let upright = hits(&file, Flip::empty());

	for flip in [Flip::HORIZONTAL, Flip::VERTICAL, Flip::HORIZONTAL | Flip::VERTICAL] {
		let mirrored = hits(&file, flip);
		assert_eq!(mirrored.len(), 3);
		for (hit, original) in mirrored.iter().zip(&upright) {
			assert_eq!(hit.0, original.0);
			let (w, h) = (i32::from(hit.3), i32::from(hit.4));
			let x = if flip.horizontal() { 100 + 48 - (original.1 - 100) - w } else { original.1 };
			let y = if flip.vertical() { 200 + 32 - (original.2 - 200) - h } else { original.2 };
			assert_eq!((hit.1, hit.2), (x, y), "{} flip {flip:?}", hit.0);
		}
	}
}

#[test]
fn test_player_reports_flipped_colliders() {
	let file = three_colliders();
	let config = PlayerConfig::looping().with_flip(Flip::HORIZONTAL);
	let mut player = Player::with_config(&file, config).unwrap();
	player.play(None).unwrap();

	let mut triggers = Vec::new();
	player.advance(10, |_, _, trigger| triggers.push(trigger.to_owned())).unwrap();
	assert_eq!(triggers, ["swing"]);

	let mut names = Vec::new();
	player.check_collision(100, 200, |_, hit| names.push((hit.name.to_owned(), hit.x))).unwrap();
	assert_eq!(names, [("head".to_owned(), 132), ("torso".to_owned(), 124), ("weapon".to_owned(), 108)]);
}
