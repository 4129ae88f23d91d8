//! 1bpp planes: the read-only companion atlas and the mutable draw target.
//!
//! Both are row-major, 8 pixels per byte, most significant bit first. A row
//! may carry padding bytes past `ceil(width / 8)`; `row_bytes` is the stride.

use std::borrow::Cow;

use crate::file::AniError;

/// Playdate screen width in pixels.
pub const SCREEN_WIDTH: usize = 400;

/// Playdate screen height in pixels.
pub const SCREEN_HEIGHT: usize = 240;

/// Playdate screen row stride in bytes (50 bytes of pixels, 2 of padding).
pub const SCREEN_ROW_BYTES: usize = 52;

#[inline]
fn bit_position(row_bytes: usize, x: usize, y: usize) -> (usize, u8) {
	(y * row_bytes + (x >> 3), 0x80 >> (x & 7))
}

fn check_plane(
	what: &str,
	width: usize,
	height: usize,
	row_bytes: usize,
	len: usize,
) -> Result<(), AniError> {
	if row_bytes < width.div_ceil(8) {
		return Err(AniError::BitmapMismatch(format!(
			"{what}: {row_bytes} bytes per row cannot hold {width} pixels"
		)));
	}
	if len < row_bytes * height {
		return Err(AniError::BitmapMismatch(format!(
			"{what}: plane holds {len} bytes, {width}x{height} needs {}",
			row_bytes * height
		)));
	}
	Ok(())
}

/// Companion atlas holding the pixels every image region points into.
///
/// The texel plane carries colour (1 = white), the optional mask plane
/// selects which bits a blit overwrites (1 = opaque). Without a mask the
/// whole atlas is opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap<'a> {
	width: usize,
	height: usize,
	row_bytes: usize,
	texel: Cow<'a, [u8]>,
	mask: Option<Cow<'a, [u8]>>,
}

impl<'a> Bitmap<'a> {
	/// Wraps a texel plane.
	///
	/// # Errors
	///
	/// Returns [`AniError::BitmapMismatch`] if the stride is too small for the
	/// width or the plane is shorter than `row_bytes * height`.
	pub fn new(
		width: usize,
		height: usize,
		row_bytes: usize,
		texel: impl Into<Cow<'a, [u8]>>,
	) -> Result<Self, AniError> {
		let texel = texel.into();
		check_plane("texel", width, height, row_bytes, texel.len())?;
		Ok(Self {
			width,
			height,
			row_bytes,
			texel,
			mask: None,
		})
	}

	/// Attaches a mask plane with the same geometry as the texel plane.
	///
	/// # Errors
	///
	/// Returns [`AniError::BitmapMismatch`] if the plane is too short.
	pub fn with_mask(mut self, mask: impl Into<Cow<'a, [u8]>>) -> Result<Self, AniError> {
		let mask = mask.into();
		check_plane("mask", self.width, self.height, self.row_bytes, mask.len())?;
		self.mask = Some(mask);
		Ok(self)
	}

	/// Builds an owned, masked bitmap from a per-pixel function returning
	/// `(white, opaque)`.
	pub fn from_fn(
		width: usize,
		height: usize,
		mut pixel: impl FnMut(usize, usize) -> (bool, bool),
	) -> Bitmap<'static> {
		let row_bytes = width.div_ceil(8);
		let mut texel = vec![0u8; row_bytes * height];
		let mut mask = vec![0u8; row_bytes * height];

		for y in 0..height {
			for x in 0..width {
				let (white, opaque) = pixel(x, y);
				let (index, bit) = bit_position(row_bytes, x, y);
				if white {
					texel[index] |= bit;
				}
				if opaque {
					mask[index] |= bit;
				}
			}
		}

		Bitmap {
			width,
			height,
			row_bytes,
			texel: Cow::Owned(texel),
			mask: Some(Cow::Owned(mask)),
		}
	}

	/// Width in pixels.
	pub fn width(&self) -> usize {
		self.width
	}

	/// Height in pixels.
	pub fn height(&self) -> usize {
		self.height
	}

	/// Row stride in bytes.
	pub fn row_bytes(&self) -> usize {
		self.row_bytes
	}

	/// Texel plane.
	pub fn texel(&self) -> &[u8] {
		&self.texel
	}

	/// Mask plane, `None` when the atlas is fully opaque.
	pub fn mask(&self) -> Option<&[u8]> {
		self.mask.as_deref()
	}

	/// Returns `true` if the pixel at (x, y) is white.
	pub fn texel_at(&self, x: usize, y: usize) -> bool {
		let (index, bit) = bit_position(self.row_bytes, x, y);
		self.texel.get(index).is_some_and(|byte| byte & bit != 0)
	}

	/// Returns `true` if the pixel at (x, y) is opaque.
	pub fn opaque_at(&self, x: usize, y: usize) -> bool {
		let (index, bit) = bit_position(self.row_bytes, x, y);
		match &self.mask {
			Some(mask) => mask.get(index).is_some_and(|byte| byte & bit != 0),
			None => true,
		}
	}

	/// Detaches the bitmap from any borrowed planes.
	pub fn into_owned(self) -> Bitmap<'static> {
		Bitmap {
			width: self.width,
			height: self.height,
			row_bytes: self.row_bytes,
			texel: Cow::Owned(self.texel.into_owned()),
			mask: self.mask.map(|mask| Cow::Owned(mask.into_owned())),
		}
	}
}

/// Mutable 1bpp destination plane, typically the host's screen.
#[derive(Debug, PartialEq, Eq)]
pub struct Framebuffer<'a> {
	width: usize,
	height: usize,
	row_bytes: usize,
	data: &'a mut [u8],
}

impl<'a> Framebuffer<'a> {
	/// Wraps a destination plane.
	///
	/// # Errors
	///
	/// Returns [`AniError::BitmapMismatch`] if the stride is too small for the
	/// width or the plane is shorter than `row_bytes * height`.
	pub fn new(
		width: usize,
		height: usize,
		row_bytes: usize,
		data: &'a mut [u8],
	) -> Result<Self, AniError> {
		check_plane("framebuffer", width, height, row_bytes, data.len())?;
		Ok(Self {
			width,
			height,
			row_bytes,
			data,
		})
	}

	/// Wraps a plane with the Playdate screen geometry.
	///
	/// # Errors
	///
	/// Returns [`AniError::BitmapMismatch`] if the plane is shorter than
	/// `SCREEN_ROW_BYTES * SCREEN_HEIGHT`.
	pub fn screen(data: &'a mut [u8]) -> Result<Self, AniError> {
		Self::new(SCREEN_WIDTH, SCREEN_HEIGHT, SCREEN_ROW_BYTES, data)
	}

	/// Width in pixels.
	pub fn width(&self) -> usize {
		self.width
	}

	/// Height in pixels.
	pub fn height(&self) -> usize {
		self.height
	}

	/// Row stride in bytes.
	pub fn row_bytes(&self) -> usize {
		self.row_bytes
	}

	/// Raw plane.
	pub fn data(&self) -> &[u8] {
		self.data
	}

	/// Mutable bytes of row `y`.
	#[inline]
	pub(crate) fn row_mut(&mut self, y: usize) -> &mut [u8] {
		let start = y * self.row_bytes;
		&mut self.data[start..start + self.row_bytes]
	}

	/// Sets every byte of the plane.
	pub fn fill(&mut self, value: u8) {
		self.data.fill(value);
	}

	/// Gets the pixel at (x, y); `false` outside the plane.
	pub fn get_pixel(&self, x: usize, y: usize) -> bool {
		if x >= self.width || y >= self.height {
			return false;
		}
		let (index, bit) = bit_position(self.row_bytes, x, y);
		self.data[index] & bit != 0
	}

	/// Sets the pixel at (x, y); ignored outside the plane.
	pub fn put_pixel(&mut self, x: usize, y: usize, value: bool) {
		if x >= self.width || y >= self.height {
			return;
		}
		let (index, bit) = bit_position(self.row_bytes, x, y);
		if value {
			self.data[index] |= bit;
		} else {
			self.data[index] &= !bit;
		}
	}

	/// Converts the plane to an ASCII art representation.
	pub fn to_ascii_art(&self, one: char, zero: char) -> String {
		let mut art = String::with_capacity((self.width + 1) * self.height);

		for y in 0..self.height {
			for x in 0..self.width {
				art.push(if self.get_pixel(x, y) {
					one
				} else {
					zero
				});
			}
			art.push('\n');
		}

		art
	}
}
