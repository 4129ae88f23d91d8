//! Masked 1bpp blitter.
//!
//! Works one packed source byte (8 pixels) at a time. A destination x that is
//! not a multiple of 8 splits every source byte into two shifted fragments
//! written to neighbouring destination bytes; an aligned x takes the single
//! fragment path. Horizontal mirroring reverses the bits of each byte and the
//! byte order of the row, vertical mirroring walks the source rows bottom up.

use super::{Bitmap, Flip, Framebuffer, Rect};

/// Reverses the bit order within a byte (`0b1000_0000` becomes `0b0000_0001`).
#[inline]
pub fn reverse_bits(byte: u8) -> u8 {
	byte.reverse_bits()
}

/// Destination row with its visible byte range.
struct RowTarget<'r> {
	row: &'r mut [u8],
	visible: usize,
	tail_mask: u8,
}

impl RowTarget<'_> {
	/// `dst = (dst & !mask) | (texel & mask)`, dropping bytes outside the row.
	#[inline]
	fn composite(&mut self, at: i32, texel: u8, mut mask: u8) {
		let Ok(at) = usize::try_from(at) else {
			return;
		};
		if at >= self.visible {
			return;
		}
		if at + 1 == self.visible {
			mask &= self.tail_mask;
		}
		let dst = &mut self.row[at];
		*dst = (*dst & !mask) | (texel & mask);
	}
}

/// Composites the `region` of `source` onto `target` with its top-left corner
/// at (`x`, `y`).
///
/// Rows above or below the target and bytes left or right of it are clipped.
/// `region.x` must be a multiple of 8; regions reaching outside the source
/// bitmap are skipped row by row.
pub fn draw_cel(
	target: &mut Framebuffer<'_>,
	source: &Bitmap<'_>,
	region: Rect,
	x: i32,
	y: i32,
	flip: Flip,
) {
	if region.is_empty() || region.x < 0 || region.y < 0 {
		return;
	}
	debug_assert_eq!(region.x & 7, 0, "source region must be byte aligned");

	let width = region.w as usize;
	let row_len = width.div_ceil(8);
	let padding = (row_len * 8 - width) as u32;
	// Keeps only the region's own bits of its last source byte
	let edge_mask = 0xFFu8 << padding;

	let dx = if flip.horizontal() {
		x - padding as i32
	} else {
		x
	};
	let first_byte = dx.div_euclid(8);
	let shift = dx.rem_euclid(8) as u32;

	let visible = target.width().div_ceil(8);
	let tail_mask = match target.width() % 8 {
		0 => 0xFF,
		bits => 0xFFu8 << (8 - bits),
	};

	let top = (-y).max(0);
	let bottom = region.h.min(target.height() as i32 - y);
	let column = (region.x >> 3) as usize;

	for r in top..bottom {
		let source_row = if flip.vertical() {
			region.y + region.h - 1 - r
		} else {
			region.y + r
		};
		let start = source_row as usize * source.row_bytes() + column;
		let span = start..start + row_len;

		let Some(texels) = source.texel().get(span.clone()) else {
			continue;
		};
		let masks = source.mask().and_then(|mask| mask.get(span));

		let mut row = RowTarget {
			row: target.row_mut((y + r) as usize),
			visible,
			tail_mask,
		};

		for (i, &texel) in texels.iter().enumerate() {
			let mut mask = masks.map_or(0xFF, |masks| masks[i]);
			if i + 1 == row_len {
				mask &= edge_mask;
			}

			let (texel, mask, slot) = if flip.horizontal() {
				(reverse_bits(texel), reverse_bits(mask), row_len - 1 - i)
			} else {
				(texel, mask, i)
			};

			let at = first_byte + slot as i32;
			if shift == 0 {
				row.composite(at, texel, mask);
			} else {
				row.composite(at, texel >> shift, mask >> shift);
				row.composite(at + 1, texel << (8 - shift), mask << (8 - shift));
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Pixel-at-a-time reference used to check the byte-wise path.
	fn reference_blit(
		target: &mut Framebuffer<'_>,
		source: &Bitmap<'_>,
		region: Rect,
		x: i32,
		y: i32,
		flip: Flip,
	) {
		for j in 0..region.h {
			for i in 0..region.w {
				let sx = if flip.horizontal() {
					region.w - 1 - i
				} else {
					i
				};
				let sy = if flip.vertical() {
					region.h - 1 - j
				} else {
					j
				};
				let (u, v) = ((region.x + sx) as usize, (region.y + sy) as usize);
				let (px, py) = (x + i, y + j);
				if px < 0 || py < 0 || !source.opaque_at(u, v) {
					continue;
				}
				target.put_pixel(px as usize, py as usize, source.texel_at(u, v));
			}
		}
	}

	/// Deterministic pattern with transparent holes and no symmetry.
	fn atlas() -> Bitmap<'static> {
		Bitmap::from_fn(24, 12, |x, y| ((x * 7 + y * 3) % 5 < 2, (x + 2 * y) % 7 != 0))
	}

	fn compare(region: Rect, x: i32, y: i32, flip: Flip) {
		let source = atlas();
		let (width, height, row_bytes) = (21, 10, 4);

		let mut fast = vec![0x5Au8; row_bytes * height];
		let mut slow = fast.clone();
		let mut fast_target = Framebuffer::new(width, height, row_bytes, &mut fast).unwrap();
		let mut slow_target = Framebuffer::new(width, height, row_bytes, &mut slow).unwrap();

		draw_cel(&mut fast_target, &source, region, x, y, flip);
		reference_blit(&mut slow_target, &source, region, x, y, flip);

		assert_eq!(
			fast_target.to_ascii_art('#', '.'),
			slow_target.to_ascii_art('#', '.'),
			"region {region:?} at ({x}, {y}) flip {flip:?}"
		);
	}

	#[test]
	fn test_reverse_bits() {
		assert_eq!(reverse_bits(0b1000_0000), 0b0000_0001);
		assert_eq!(reverse_bits(0b1100_1010), 0b0101_0011);
		for byte in 0..=u8::MAX {
			assert_eq!(reverse_bits(reverse_bits(byte)), byte);
		}
	}

	#[test]
	fn test_aligned_opaque_copy() {
		let source = Bitmap::new(8, 2, 1, vec![0b1010_0000, 0b0000_0101]).unwrap();
		let mut data = vec![0u8; 4];
		let mut target = Framebuffer::new(16, 2, 2, &mut data).unwrap();

		draw_cel(&mut target, &source, Rect::new(0, 0, 8, 2), 8, 0, Flip::empty());
		assert_eq!(target.data(), &[0x00, 0b1010_0000, 0x00, 0b0000_0101]);
	}

	#[test]
	fn test_split_byte_path() {
		let source = Bitmap::new(8, 1, 1, vec![0xFF]).unwrap();
		let mut data = vec![0u8; 2];
		let mut target = Framebuffer::new(16, 1, 2, &mut data).unwrap();

		draw_cel(&mut target, &source, Rect::new(0, 0, 8, 1), 3, 0, Flip::empty());
		assert_eq!(target.data(), &[0b0001_1111, 0b1110_0000]);
	}

	#[test]
	fn test_mask_keeps_background() {
		let source = Bitmap::new(8, 1, 1, vec![0x00]).unwrap().with_mask(vec![0x0F]).unwrap();
		let mut data = vec![0xFFu8];
		let mut target = Framebuffer::new(8, 1, 1, &mut data).unwrap();

		draw_cel(&mut target, &source, Rect::new(0, 0, 8, 1), 0, 0, Flip::empty());
		assert_eq!(target.data(), &[0xF0]);
	}

	#[test]
	fn test_partial_byte_region_ignores_padding_bits() {
		// Only the first 5 columns belong to the region
		let source = Bitmap::new(8, 1, 1, vec![0xFF]).unwrap();
		let mut data = vec![0u8; 2];
		let mut target = Framebuffer::new(16, 1, 2, &mut data).unwrap();

		draw_cel(&mut target, &source, Rect::new(0, 0, 5, 1), 0, 0, Flip::empty());
		assert_eq!(target.data(), &[0b1111_1000, 0x00]);

		target.fill(0);
		draw_cel(&mut target, &source, Rect::new(0, 0, 5, 1), 0, 0, Flip::HORIZONTAL);
		assert_eq!(target.data(), &[0b1111_1000, 0x00]);
	}

	#[test]
	fn test_vertical_clip_keeps_row_order() {
		// Each source row carries its own sentinel byte
		let source = Bitmap::new(8, 4, 1, vec![0x01, 0x02, 0x04, 0x08]).unwrap();

		let mut data = vec![0u8; 3];
		let mut target = Framebuffer::new(8, 3, 1, &mut data).unwrap();
		draw_cel(&mut target, &source, Rect::new(0, 0, 8, 4), 0, -2, Flip::empty());
		assert_eq!(target.data(), &[0x04, 0x08, 0x00]);

		target.fill(0);
		draw_cel(&mut target, &source, Rect::new(0, 0, 8, 4), 0, -2, Flip::VERTICAL);
		assert_eq!(target.data(), &[0x02, 0x01, 0x00]);

		target.fill(0);
		draw_cel(&mut target, &source, Rect::new(0, 0, 8, 4), 0, 1, Flip::empty());
		assert_eq!(target.data(), &[0x00, 0x01, 0x02]);

		target.fill(0);
		draw_cel(&mut target, &source, Rect::new(0, 0, 8, 4), 0, 1, Flip::VERTICAL);
		assert_eq!(target.data(), &[0x00, 0x08, 0x04]);
	}

	#[test]
	fn test_fully_clipped_draws_nothing() {
		let source = Bitmap::new(8, 1, 1, vec![0xFF]).unwrap();
		let mut data = vec![0u8; 2];
		let mut target = Framebuffer::new(8, 2, 1, &mut data).unwrap();

		draw_cel(&mut target, &source, Rect::new(0, 0, 8, 1), 0, 2, Flip::empty());
		draw_cel(&mut target, &source, Rect::new(0, 0, 8, 1), 0, -1, Flip::empty());
		draw_cel(&mut target, &source, Rect::new(0, 0, 8, 1), 8, 0, Flip::empty());
		draw_cel(&mut target, &source, Rect::new(0, 0, 8, 1), -8, 0, Flip::empty());
		assert_eq!(target.data(), &[0, 0]);
	}

	#[test]
	fn test_matches_reference_everywhere() {
		let regions = [Rect::new(0, 0, 8, 8), Rect::new(8, 2, 5, 3), Rect::new(8, 1, 13, 9)];
		let flips = [
			Flip::empty(),
			Flip::HORIZONTAL,
			Flip::VERTICAL,
			Flip::HORIZONTAL | Flip::VERTICAL,
		];

		for region in regions {
			for flip in flips {
				for x in -9..22 {
					for y in [-3, 0, 4, 8] {
						compare(region, x, y, flip);
					}
				}
			}
		}
	}
}
