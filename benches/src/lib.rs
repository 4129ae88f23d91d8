//! Benchmark helper utilities for pdani-rs
//!
//! This module provides utilities for generating synthetic animations and atlases
//! for the pdani-rs benchmarks.

use pdani_types::file::ani::{FixtureBuilder, LayerType};
use pdani_types::gfx::Bitmap;

/// Generates a synthetic animation with `layers` drawable layers, one collider
/// layer and `frames` frames.
///
/// Every drawable layer shows a `cel_size` square image in every frame, at an
/// offset that is not byte aligned so that draws take the split-byte path.
/// Every fourth frame carries a trigger on the first layer.
pub fn generate_test_animation(layers: usize, frames: usize, cel_size: u16) -> Vec<u8> {
	let extent = cel_size * 2;
	let mut builder = FixtureBuilder::new(extent, extent).tag("all", 1, frames as u16);

	for layer in 0..layers {
		builder = builder
			.layer(LayerType::Layer, -1, &format!("layer{layer}"))
			.image((layer as i16) * cel_size as i16, 0, cel_size, cel_size)
			.cel(layer as u16, (layer as i16 * 3) % 8 + 1, (layer as i16 * 5) % 8);
	}
	builder = builder.layer(LayerType::Collider, -1, "hitbox").collider(2, 2, cel_size, cel_size);

	for frame in 0..frames {
		let trigger = (frame % 4 == 0).then_some("tick");
		let mut slots: Vec<(i16, Option<&str>)> =
			(0..layers).map(|layer| (layer as i16, None)).collect();
		if let Some(first) = slots.first_mut() {
			first.1 = trigger;
		}
		slots.push((0, None));
		builder = builder.frame(16 + (frame % 3) as u16 * 8, &slots);
	}

	builder.build()
}

/// Generates a masked atlas wide enough for `layers` square images of `cel_size`.
pub fn generate_atlas(layers: usize, cel_size: u16) -> Bitmap<'static> {
	let width = layers.max(1) * cel_size as usize;
	Bitmap::from_fn(width, cel_size as usize, |x, y| ((x ^ y) & 1 == 0, (x + y) % 5 != 0))
}

/// Common animation shapes for benchmarking
pub mod sizes {
	/// Single small sprite: 1 layer of 16x16
	pub const TINY: (usize, u16) = (1, 16);
	/// Typical character: 4 layers of 32x32
	pub const CHARACTER: (usize, u16) = (4, 32);
	/// Large boss: 8 layers of 64x64
	pub const BOSS: (usize, u16) = (8, 64);
}

#[cfg(test)]
mod tests {
	use super::*;
	use pdani_types::file::ani::File;

	#[test]
	fn test_generate_test_animation() {
		let data = generate_test_animation(3, 10, 16);
		let file = File::from_vec(data).unwrap();

		assert_eq!(file.layer_count().unwrap(), 4);
		assert_eq!(file.frame_count().unwrap(), 10);
		assert_eq!(file.triggers(5).unwrap().collect::<Vec<_>>(), ["tick"]);
		assert_eq!(file.collisions(2, 0, 0, Default::default()).unwrap().count(), 1);
	}

	#[test]
	fn test_generated_atlas_covers_images() {
		let (layers, cel_size) = sizes::CHARACTER;
		let data = generate_test_animation(layers, 4, cel_size);
		let atlas = generate_atlas(layers, cel_size);
		assert!(File::from_vec(data).unwrap().with_bitmap(atlas).is_ok());
	}
}
