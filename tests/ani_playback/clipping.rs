//! Vertical clipping verified with per-row sentinel patterns

use pdani_rs::prelude::*;
use pdani_types::file::ani::FixtureBuilder;

const GUARD: u8 = 0xA5;

/// 8x8 opaque cel whose row `r` lights only column `r`.
fn diagonal() -> AniFile<'static> {
	let data = FixtureBuilder::new(8, 8)
		.layer(LayerType::Layer, -1, "diagonal")
		.image(0, 0, 8, 8)
		.cel(0, 0, 0)
		.frame(10, &[(0, None)])
		.build();
	let bitmap = Bitmap::from_fn(8, 8, |x, y| (x == y, true));
	AniFile::from_vec(data).unwrap().with_bitmap(bitmap).unwrap()
}

/// Draws into an 8x8 target framed by guard rows and returns the target rows.
fn draw_guarded(file: &AniFile<'_>, y: i32, flip: Flip) -> Vec<u8> {
	let mut plane = vec![GUARD; 10];
	{
		let mut target = Framebuffer::new(8, 8, 1, &mut plane[1..9]).unwrap();
		target.fill(0);
		file.draw(&mut target, 0, y, 1, flip).unwrap();
	}
	assert_eq!((plane[0], plane[9]), (GUARD, GUARD), "guard rows overwritten at y = {y}");
	plane[1..9].to_vec()
}

/// Row byte with only column `x` lit.
fn column(x: i32) -> u8 {
	0x80 >> x
}

#[test]
fn test_clip_top_skips_source_rows() {
	let file = diagonal();
	for y in -7..0 {
		let rows = draw_guarded(&file, y, Flip::empty());
		for (ty, &row) in rows.iter().enumerate() {
			let source_row = ty as i32 - y;
			let expected = if source_row < 8 { column(source_row) } else { 0 };
			assert_eq!(row, expected, "y = {y} row {ty}");
		}
	}
}

#[test]
fn test_clip_bottom_keeps_leading_rows() {
	let file = diagonal();
	for y in 1..8 {
		let rows = draw_guarded(&file, y, Flip::empty());
		for (ty, &row) in rows.iter().enumerate() {
			let expected = if (ty as i32) < y { 0 } else { column(ty as i32 - y) };
			assert_eq!(row, expected, "y = {y} row {ty}");
		}
	}
}

#[test]
fn test_clip_with_vertical_flip() {
	let file = diagonal();
	for y in -7..8 {
		let rows = draw_guarded(&file, y, Flip::VERTICAL);
		for (ty, &row) in rows.iter().enumerate() {
			let local = ty as i32 - y;
			let expected = if (0..8).contains(&local) { column(7 - local) } else { 0 };
			assert_eq!(row, expected, "y = {y} row {ty}");
		}
	}
}

#[test]
fn test_fully_outside_draws_nothing() {
	let file = diagonal();
	for y in [-8, -20, 8, 40] {
		assert_eq!(draw_guarded(&file, y, Flip::empty()), vec![0; 8], "y = {y}");
	}
}
