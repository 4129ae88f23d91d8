//! 1bpp graphics: planes, mirroring flags and the masked blitter.

mod bitmap;
pub mod blit;
mod flip;

pub use bitmap::{Bitmap, Framebuffer, SCREEN_HEIGHT, SCREEN_ROW_BYTES, SCREEN_WIDTH};
pub use blit::{draw_cel, reverse_bits};
pub use flip::{Flip, mirror_offset};

/// Axis-aligned integer rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
	/// Left edge
	pub x: i32,
	/// Top edge
	pub y: i32,
	/// Width
	pub w: i32,
	/// Height
	pub h: i32,
}

impl Rect {
	/// Creates a rectangle.
	pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
		Self {
			x,
			y,
			w,
			h,
		}
	}

	/// Returns `true` if the rectangle covers no pixel.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.w <= 0 || self.h <= 0
	}

	/// Overlap of two rectangles, `None` when they do not overlap.
	pub fn intersect(&self, other: &Rect) -> Option<Rect> {
		let left = self.x.max(other.x);
		let top = self.y.max(other.y);
		let right = (self.x + self.w).min(other.x + other.w);
		let bottom = (self.y + self.h).min(other.y + other.h);

		let rect = Rect::new(left, top, right - left, bottom - top);
		(!rect.is_empty()).then_some(rect)
	}
}
