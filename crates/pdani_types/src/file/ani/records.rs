//! Fixed-size records stored in `.ani` chunk payloads.

use std::fmt;

use serde::Serialize;

use crate::file::AniError;

use super::chunk::ByteReader;
use super::constants;

/// Span of a validated NUL-terminated string inside the string table.
///
/// Spans are only created while decoding, after the referenced bytes have
/// been checked to lie within the table and to be valid UTF-8; the terminator
/// is excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrSpan {
	pub(crate) start: usize,
	pub(crate) len: usize,
}

/// Contents of the `INFO` chunk misc area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Info {
	/// Animation bounding box width in pixels
	pub width: u16,
	/// Animation bounding box height in pixels
	pub height: u16,
	/// Frame total declared by the authoring tool
	pub total_frames: u16,
}

/// A named, inclusive frame range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
	/// First frame number (1-based)
	pub from: u16,
	/// Last frame number (inclusive)
	pub to: u16,
	pub(crate) name: StrSpan,
}

impl Tag {
	pub(crate) fn read(reader: &ByteReader<'_>, at: usize) -> Result<(Self, u16), AniError> {
		let from = reader.u16(at)?;
		let to = reader.u16(at + 2)?;
		let name = reader.u16(at + 4)?;
		Ok((
			Self {
				from,
				to,
				name: StrSpan::default(),
			},
			name,
		))
	}

	/// Number of frames covered by the tag.
	pub fn frame_count(&self) -> usize {
		usize::from(self.to.saturating_sub(self.from)) + 1
	}
}

/// Kind of entry in the layer tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LayerType {
	/// `L`: drawable layer, owns one cel slot per frame
	Layer,
	/// `G`: organisational group, no per-frame slot
	Group,
	/// `C`: collider track, owns one collider slot per frame
	Collider,
}

impl LayerType {
	/// Converts a raw type byte.
	pub fn from_u8(value: u8) -> Option<Self> {
		match value {
			constants::LAYER_TYPE_LAYER => Some(Self::Layer),
			constants::LAYER_TYPE_GROUP => Some(Self::Group),
			constants::LAYER_TYPE_COLLIDER => Some(Self::Collider),
			_ => None,
		}
	}

	/// Raw type byte.
	pub fn to_u8(self) -> u8 {
		match self {
			Self::Layer => constants::LAYER_TYPE_LAYER,
			Self::Group => constants::LAYER_TYPE_GROUP,
			Self::Collider => constants::LAYER_TYPE_COLLIDER,
		}
	}

	/// Returns `true` if entries of this type consume a per-frame slot.
	#[inline]
	pub fn has_frame_slot(self) -> bool {
		!matches!(self, Self::Group)
	}
}

impl fmt::Display for LayerType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.to_u8() as char)
	}
}

/// Entry of the flattened layer tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layer {
	/// Layer kind
	pub kind: LayerType,
	/// Index of the parent group, negative for top level
	pub parent: i8,
	/// Number of child layers (groups only)
	pub layer_count: u16,
	pub(crate) name: StrSpan,
}

impl Layer {
	pub(crate) fn read(
		reader: &ByteReader<'_>,
		at: usize,
		index: usize,
	) -> Result<(Self, u16), AniError> {
		let value = reader.u8(at)?;
		let kind = LayerType::from_u8(value).ok_or(AniError::InvalidLayerType {
			index,
			value,
		})?;
		let parent = reader.i8(at + 1)?;
		let name = reader.u16(at + 2)?;
		let layer_count = reader.u16(at + 4)?;
		Ok((
			Self {
				kind,
				parent,
				layer_count,
				name: StrSpan::default(),
			},
			name,
		))
	}
}

/// One per-frame slot of a non-group layer.
///
/// The raw slot is a cel index for `L` layers and a collider index for `C`
/// layers; use [`FrameSlot`] (via the frame/layer iterator) to read it with
/// its meaning attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayer {
	pub(crate) trigger: Option<StrSpan>,
	pub(crate) trigger_offset: u16,
	pub(crate) slot: i16,
}

impl FrameLayer {
	pub(crate) fn read(reader: &ByteReader<'_>, at: usize) -> Result<Self, AniError> {
		Ok(Self {
			trigger: None,
			trigger_offset: reader.u16(at)?,
			slot: reader.i16(at + 2)?,
		})
	}

	/// Selected record index, `None` when the slot is empty this frame.
	#[inline]
	pub fn index(&self) -> Option<usize> {
		usize::try_from(self.slot).ok()
	}

	/// Returns `true` if a trigger name is attached to this slot.
	#[inline]
	pub fn has_trigger(&self) -> bool {
		self.trigger.is_some()
	}
}

/// Slot of a layer in one frame, tagged with the layer's declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSlot {
	/// Group entry, owns no slot
	Group,
	/// Drawable layer, optionally showing a cel
	Cel(Option<usize>),
	/// Collider track, optionally enabling a collider
	Collider(Option<usize>),
}

/// One animation frame: a duration and the location of its per-layer slots.
///
/// Slots stay in the file buffer and are decoded on demand; frames whose
/// table entries point at the same record share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
	/// Display duration in milliseconds
	pub duration: u16,
	pub(crate) slots_at: usize,
	pub(crate) slot_count: usize,
}

impl Frame {
	/// Number of per-layer slots (one per non-group layer).
	pub fn slot_count(&self) -> usize {
		self.slot_count
	}
}

/// Atlas region inside the companion bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Image {
	/// Left edge in pixels (byte aligned)
	pub u: i16,
	/// Top edge in pixels
	pub v: i16,
	/// Width in pixels
	pub w: u16,
	/// Height in pixels
	pub h: u16,
}

impl Image {
	pub(crate) fn read(reader: &ByteReader<'_>, at: usize) -> Result<Self, AniError> {
		Ok(Self {
			u: reader.i16(at)?,
			v: reader.i16(at + 2)?,
			w: reader.u16(at + 4)?,
			h: reader.u16(at + 6)?,
		})
	}
}

/// Placement of one image relative to the animation origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cel {
	/// Index into the image chunk
	pub image: u16,
	/// Horizontal offset from the animation origin
	pub x: i16,
	/// Vertical offset from the animation origin
	pub y: i16,
}

impl Cel {
	pub(crate) fn read(reader: &ByteReader<'_>, at: usize) -> Result<Self, AniError> {
		Ok(Self {
			image: reader.u16(at)?,
			x: reader.i16(at + 2)?,
			y: reader.i16(at + 4)?,
		})
	}
}

/// Axis-aligned rectangle in the animation's local space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Collider {
	/// Left edge
	pub x: i16,
	/// Top edge
	pub y: i16,
	/// Width
	pub w: u16,
	/// Height
	pub h: u16,
}

impl Collider {
	pub(crate) fn read(reader: &ByteReader<'_>, at: usize) -> Result<Self, AniError> {
		Ok(Self {
			x: reader.i16(at)?,
			y: reader.i16(at + 2)?,
			w: reader.u16(at + 4)?,
			h: reader.u16(at + 6)?,
		})
	}
}

/// Reads `count` fixed-size records laid out back to back from `start`.
pub(crate) fn read_records<T>(
	reader: &ByteReader<'_>,
	start: usize,
	count: usize,
	record_size: usize,
	mut read: impl FnMut(&ByteReader<'_>, usize, usize) -> Result<T, AniError>,
) -> Result<Vec<T>, AniError> {
	// Whole array must be in bounds before anything is allocated
	reader.bytes(start, count * record_size)?;

	(0..count).map(|index| read(reader, start + index * record_size, index)).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::file::ani::ChunkType;

	#[test]
	fn test_layer_type_round_trip() {
		for kind in [LayerType::Layer, LayerType::Group, LayerType::Collider] {
			assert_eq!(LayerType::from_u8(kind.to_u8()), Some(kind));
		}
		assert_eq!(LayerType::from_u8(b'X'), None);
		assert!(!LayerType::Group.has_frame_slot());
		assert!(LayerType::Collider.has_frame_slot());
		assert_eq!(LayerType::Collider.to_string(), "C");
	}

	#[test]
	fn test_read_layer_record() {
		let data = [b'C', 0xFF, 0x05, 0x00, 0x02, 0x00];
		let reader = ByteReader::new(&data, ChunkType::Layer);
		let (layer, name) = Layer::read(&reader, 0, 0).unwrap();
		assert_eq!(layer.kind, LayerType::Collider);
		assert_eq!(layer.parent, -1);
		assert_eq!(layer.layer_count, 2);
		assert_eq!(name, 5);
	}

	#[test]
	fn test_read_layer_rejects_bad_type() {
		let data = [b'Z', 0, 0, 0, 0, 0];
		let reader = ByteReader::new(&data, ChunkType::Layer);
		assert!(matches!(
			Layer::read(&reader, 0, 3),
			Err(AniError::InvalidLayerType {
				index: 3,
				value: b'Z'
			})
		));
	}

	#[test]
	fn test_frame_layer_index() {
		let data = [0x00, 0x00, 0xFF, 0xFF, 0x07, 0x00, 0x02, 0x00];
		let reader = ByteReader::new(&data, ChunkType::Frame);
		let empty = FrameLayer::read(&reader, 0).unwrap();
		assert_eq!(empty.index(), None);
		let used = FrameLayer::read(&reader, 4).unwrap();
		assert_eq!(used.trigger_offset, 7);
		assert_eq!(used.index(), Some(2));
		// Trigger spans are attached by the file once the offset is resolved
		assert!(!used.has_trigger());
	}

	#[test]
	fn test_read_records_rejects_short_payload() {
		let data = [0u8; 10];
		let reader = ByteReader::new(&data, ChunkType::Image);
		let result = read_records(&reader, 0, 2, constants::IMAGE_RECORD_SIZE, |r, at, _| Image::read(r, at));
		assert!(matches!(
			result,
			Err(AniError::InsufficientData {
				chunk: ChunkType::Image,
				expected: 16,
				actual: 10
			})
		));
	}

	#[test]
	fn test_tag_frame_count() {
		let tag = Tag {
			from: 3,
			to: 5,
			name: StrSpan::default(),
		};
		assert_eq!(tag.frame_count(), 3);
	}
}
