//! Collider rectangles of a frame in world space.

use serde::Serialize;

use crate::file::AniError;
use crate::gfx::{Flip, mirror_offset};

use super::File;
use super::iterator::FrameLayers;
use super::records::FrameSlot;

/// One enabled collider, placed in world space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColliderHit<'f> {
	/// Index of the collider layer
	pub layer: usize,
	/// Name of the collider layer
	pub name: &'f str,
	/// Left edge in world space
	pub x: i32,
	/// Top edge in world space
	pub y: i32,
	/// Width
	pub w: u16,
	/// Height
	pub h: u16,
}

/// Iterator over the enabled colliders of one frame, in layer order.
#[derive(Debug, Clone)]
pub struct Collisions<'f> {
	file: &'f File<'f>,
	layers: FrameLayers<'f>,
	x: i32,
	y: i32,
	flip: Flip,
}

impl<'f> Iterator for Collisions<'f> {
	type Item = ColliderHit<'f>;

	fn next(&mut self) -> Option<Self::Item> {
		for entry in self.layers.by_ref() {
			let FrameSlot::Collider(Some(index)) = entry.slot() else {
				continue;
			};
			// References were validated at decode time
			let Ok(collider) = self.file.collider(index) else {
				continue;
			};
			let (w, h) = (i32::from(collider.w), i32::from(collider.h));

			return Some(ColliderHit {
				layer: entry.index,
				name: self.file.resolve(entry.layer.name),
				x: mirror_offset(self.x, self.file.width(), i32::from(collider.x), w, self.flip.horizontal()),
				y: mirror_offset(self.y, self.file.height(), i32::from(collider.y), h, self.flip.vertical()),
				w: collider.w,
				h: collider.h,
			});
		}
		None
	}
}

impl<'a> File<'a> {
	/// Enumerates the colliders enabled in frame `frame_number`, placed with the
	/// animation origin at (`x`, `y`).
	///
	/// # Errors
	///
	/// Fails like [`File::frame`].
	pub fn collisions(
		&self,
		frame_number: u16,
		x: i32,
		y: i32,
		flip: Flip,
	) -> Result<Collisions<'_>, AniError> {
		Ok(Collisions {
			layers: self.frame_layers(frame_number)?,
			file: self,
			x,
			y,
			flip,
		})
	}

	/// Reports every collider of frame `frame_number` to `callback`.
	///
	/// # Errors
	///
	/// Fails like [`File::frame`].
	pub fn check_collision(
		&self,
		x: i32,
		y: i32,
		frame_number: u16,
		flip: Flip,
		mut callback: impl FnMut(&File<'a>, &ColliderHit<'_>),
	) -> Result<(), AniError> {
		for hit in self.collisions(frame_number, x, y, flip)? {
			callback(self, &hit);
		}
		Ok(())
	}
}
