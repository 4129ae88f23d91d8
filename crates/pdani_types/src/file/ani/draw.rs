//! Frame composition onto a 1bpp target.

use crate::file::AniError;
use crate::gfx::{Flip, Framebuffer, Rect, draw_cel, mirror_offset};

use super::File;
use super::records::FrameSlot;

impl File<'_> {
	/// Draws frame `frame_number` with the animation's top-left corner at
	/// (`x`, `y`).
	///
	/// Cels are composited in layer order, so later layers cover earlier ones.
	/// Nothing is drawn when the animation's bounding box misses the target
	/// entirely.
	///
	/// # Arguments
	///
	/// * `target` - Destination plane
	/// * `x`, `y` - World position of the animation origin
	/// * `frame_number` - 1-based frame number
	/// * `flip` - Mirroring about the animation's own bounding box
	///
	/// # Errors
	///
	/// - [`AniError::MissingBitmap`] if no bitmap is attached
	/// - Errors of [`File::frame`] for a bad frame number
	pub fn draw(
		&self,
		target: &mut Framebuffer<'_>,
		x: i32,
		y: i32,
		frame_number: u16,
		flip: Flip,
	) -> Result<(), AniError> {
		let bitmap = self.bitmap().ok_or(AniError::MissingBitmap)?;
		let layers = self.frame_layers(frame_number)?;

		let bounds = Rect::new(x, y, self.width(), self.height());
		let screen = Rect::new(0, 0, target.width() as i32, target.height() as i32);
		if bounds.intersect(&screen).is_none() {
			return Ok(());
		}

		for entry in layers {
			let FrameSlot::Cel(Some(index)) = entry.slot() else {
				continue;
			};
			let cel = self.cel(index)?;
			let image = self.image(usize::from(cel.image))?;
			let (w, h) = (i32::from(image.w), i32::from(image.h));

			let dx = mirror_offset(x, self.width(), i32::from(cel.x), w, flip.horizontal());
			let dy = mirror_offset(y, self.height(), i32::from(cel.y), h, flip.vertical());
			draw_cel(
				target,
				bitmap,
				Rect::new(i32::from(image.u), i32::from(image.v), w, h),
				dx,
				dy,
				flip,
			);
		}

		Ok(())
	}
}
