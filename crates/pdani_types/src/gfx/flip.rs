//! Mirroring flags shared by drawing and collision queries.

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
	/// Mirroring applied to a whole animation when it is drawn or hit tested.
	///
	/// Mirroring flips the sprite about its own bounding box (the `INFO`
	/// width and height), never about the destination.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
	pub struct Flip: u8 {
		/// Mirror left to right
		const HORIZONTAL = 0b0000_0001;
		/// Mirror top to bottom
		const VERTICAL = 0b0000_0010;
	}
}

impl Flip {
	/// Builds flags from the two axis toggles.
	pub fn from_axes(horizontal: bool, vertical: bool) -> Self {
		let mut flip = Self::empty();
		flip.set(Self::HORIZONTAL, horizontal);
		flip.set(Self::VERTICAL, vertical);
		flip
	}

	/// Returns `true` if the horizontal axis is mirrored.
	#[inline]
	pub fn horizontal(self) -> bool {
		self.contains(Self::HORIZONTAL)
	}

	/// Returns `true` if the vertical axis is mirrored.
	#[inline]
	pub fn vertical(self) -> bool {
		self.contains(Self::VERTICAL)
	}
}

/// Places a child span inside its parent's extent, mirrored when `flipped`.
///
/// Unflipped, a child at `offset` lands at `origin + offset`. Flipped, it lands
/// at `origin + extent - offset - size`, so that its far edge takes the place
/// of its near edge.
#[inline]
pub fn mirror_offset(origin: i32, extent: i32, offset: i32, size: i32, flipped: bool) -> i32 {
	if flipped {
		origin + extent - offset - size
	} else {
		origin + offset
	}
}
