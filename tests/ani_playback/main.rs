//! End-to-end tests for `pdani-rs`: decode, playback, composition and hit testing

mod clipping;
mod collision;
mod mirror;
mod scenario;

use pdani_rs::prelude::*;

/// Pixel value and opacity of every pixel of `frame` drawn at (`x`, `y`).
///
/// The frame is drawn once over a clear plane and once over a set plane:
/// opaque pixels read the same on both, transparent ones show the background.
pub(crate) fn planes(file: &AniFile<'_>, x: i32, y: i32, flip: Flip) -> Vec<Vec<(bool, bool)>> {
	let (width, height, row_bytes) = (32, 16, 4);
	let mut clear = vec![0x00u8; row_bytes * height];
	let mut set = vec![0xFFu8; row_bytes * height];
	let mut clear_target = Framebuffer::new(width, height, row_bytes, &mut clear).unwrap();
	let mut set_target = Framebuffer::new(width, height, row_bytes, &mut set).unwrap();
	file.draw(&mut clear_target, x, y, 1, flip).unwrap();
	file.draw(&mut set_target, x, y, 1, flip).unwrap();

	(0..height)
		.map(|py| {
			(0..width)
				.map(|px| {
					let (on_clear, on_set) = (clear_target.get_pixel(px, py), set_target.get_pixel(px, py));
					(on_clear, on_clear == on_set)
				})
				.collect()
		})
		.collect()
}
