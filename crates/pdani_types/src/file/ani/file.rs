//! Decoded `.ani` file model.
//!
//! [`File`] keeps the raw buffer alive (borrowed or owned) for its string table
//! and frame slots, and decodes every other fixed-size record up front, so that
//! accessors only have to check indices. Cross references (frame slot to cel or
//! collider, cel to image, tag range to frame table) are validated while
//! decoding. Frame slots are validated once per distinct frame record and read
//! back on demand.

use std::borrow::Cow;
use std::collections::HashMap;
use std::ops::Range;
use std::path::Path;

use log::{debug, warn};

use crate::file::AniError;
use crate::gfx::Bitmap;

use super::chunk::{ByteReader, ChunkHeader, ChunkType, Header, walk_chunks};
use super::constants;
use super::iterator::FrameSlots;
use super::records::{
	Cel, Collider, Frame, FrameLayer, Image, Info, Layer, LayerType, StrSpan, Tag, read_records,
};

/// A decoded `.ani` animation together with its companion bitmap.
///
/// The file is immutable once decoded, so any number of players may share it.
///
/// # Examples
///
/// ```no_run
/// use pdani_types::file::ani::File;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::open("miata.ani")?;
///
/// println!("{}x{}, {} frames", file.width(), file.height(), file.frame_count()?);
/// if let Some(tag) = file.find_tag("run") {
///     println!("run: {}..={}", tag.from, tag.to);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct File<'a> {
	data: Cow<'a, [u8]>,
	header: Header,
	chunks: Vec<ChunkHeader>,
	info: Info,
	strings: Range<usize>,
	tags: Option<Vec<Tag>>,
	layers: Option<Vec<Layer>>,
	frames: Option<Vec<Frame>>,
	cels: Option<Vec<Cel>>,
	colliders: Option<Vec<Collider>>,
	images: Option<Vec<Image>>,
	bitmap: Option<Bitmap<'a>>,
	lossy_names: HashMap<usize, String>,
}

impl<'a> File<'a> {
	/// Decodes a borrowed buffer and attaches the companion bitmap.
	///
	/// # Errors
	///
	/// Returns an error if the buffer is structurally invalid or if an image
	/// region does not fit inside `bitmap`.
	pub fn decode(data: impl Into<Cow<'a, [u8]>>, bitmap: Bitmap<'a>) -> Result<Self, AniError> {
		Self::parse(data.into())?.with_bitmap(bitmap)
	}

	/// Decodes a borrowed buffer without a bitmap.
	///
	/// Such a file supports every query except drawing.
	///
	/// # Errors
	///
	/// Returns an error if the buffer is structurally invalid.
	pub fn from_bytes(data: &'a [u8]) -> Result<Self, AniError> {
		Self::parse(Cow::Borrowed(data))
	}

	/// Attaches (or replaces) the companion bitmap.
	///
	/// # Errors
	///
	/// Returns [`AniError::BitmapMismatch`] if an image region lies outside the
	/// bitmap or does not start on a byte boundary.
	pub fn with_bitmap(mut self, bitmap: Bitmap<'a>) -> Result<Self, AniError> {
		for (index, image) in self.images.as_deref().unwrap_or_default().iter().enumerate() {
			check_image_region(index, image, &bitmap)?;
		}
		self.bitmap = Some(bitmap);
		Ok(self)
	}

	/// Returns the attached bitmap, if any.
	pub fn bitmap(&self) -> Option<&Bitmap<'a>> {
		self.bitmap.as_ref()
	}

	/// Returns the raw bytes backing this file.
	pub fn as_bytes(&self) -> &[u8] {
		&self.data
	}

	/// Returns `true` if the file owns its backing buffer.
	pub fn is_owned(&self) -> bool {
		matches!(self.data, Cow::Owned(_))
	}

	/// Returns the decoded file header.
	pub fn header(&self) -> &Header {
		&self.header
	}

	/// Returns every chunk header in list order.
	pub fn chunks(&self) -> &[ChunkHeader] {
		&self.chunks
	}

	/// Returns the header of the chunk of the given kind, if present.
	pub fn chunk(&self, kind: ChunkType) -> Option<&ChunkHeader> {
		self.chunks.iter().find(|chunk| chunk.kind == kind)
	}

	/// Returns `true` if the file carries a chunk of the given kind.
	pub fn has_chunk(&self, kind: ChunkType) -> bool {
		self.chunk(kind).is_some()
	}

	/// Returns the contents of the `INFO` chunk.
	pub fn info(&self) -> &Info {
		&self.info
	}

	/// Animation bounding box width.
	#[inline]
	pub fn width(&self) -> i32 {
		i32::from(self.info.width)
	}

	/// Animation bounding box height.
	#[inline]
	pub fn height(&self) -> i32 {
		i32::from(self.info.height)
	}

	/// Resolves a validated string span.
	///
	/// Names that are not valid UTF-8 come back with invalid sequences replaced
	/// by `U+FFFD`; [`File::resolve_bytes`] gives the raw bytes.
	pub fn resolve(&self, span: StrSpan) -> &str {
		match std::str::from_utf8(self.resolve_bytes(span)) {
			Ok(name) => name,
			Err(_) => self.lossy_names.get(&span.start).map_or("", String::as_str),
		}
	}

	/// Raw bytes of a validated string span, without the terminator.
	pub fn resolve_bytes(&self, span: StrSpan) -> &[u8] {
		self.data.get(span.start..span.start + span.len).unwrap_or_default()
	}

	/// Resolves a byte offset into the string table, replacing invalid UTF-8.
	///
	/// # Errors
	///
	/// Returns [`AniError::BadString`] if the offset lies outside the table or
	/// the string is not NUL-terminated inside it.
	pub fn string_at(&self, offset: u16) -> Result<Cow<'_, str>, AniError> {
		self.string_bytes_at(offset).map(String::from_utf8_lossy)
	}

	/// Resolves a byte offset into the string table as raw bytes.
	///
	/// # Errors
	///
	/// Fails like [`File::string_at`].
	pub fn string_bytes_at(&self, offset: u16) -> Result<&[u8], AniError> {
		let span = resolve_string(&self.data, &self.strings, offset)?;
		Ok(self.resolve_bytes(span))
	}

	/// Payload of the `STRG` chunk.
	pub(crate) fn string_table(&self) -> &[u8] {
		self.data.get(self.strings.clone()).unwrap_or_default()
	}

	// Tags

	/// Returns all tags.
	///
	/// # Errors
	///
	/// Returns [`AniError::MissingRequiredChunk`] if the file has no `TAGS` chunk.
	pub fn tags(&self) -> Result<&[Tag], AniError> {
		records(&self.tags, ChunkType::Tag)
	}

	/// Returns the number of tags.
	pub fn tag_count(&self) -> Result<usize, AniError> {
		self.tags().map(<[Tag]>::len)
	}

	/// Returns the tag at `index`.
	pub fn tag(&self, index: usize) -> Result<&Tag, AniError> {
		record(&self.tags, ChunkType::Tag, index)
	}

	/// Returns the name of the tag at `index`.
	pub fn tag_name(&self, index: usize) -> Result<&str, AniError> {
		self.tag(index).map(|tag| self.resolve(tag.name))
	}

	/// Finds a tag by name.
	///
	/// Linear scan; files carry a handful of tags. Returns `None` if the file has
	/// no `TAGS` chunk.
	pub fn find_tag(&self, name: &str) -> Option<&Tag> {
		self.tags.as_deref()?.iter().find(|tag| self.resolve(tag.name) == name)
	}

	// Layers

	/// Returns all layers in declaration order.
	pub fn layers(&self) -> Result<&[Layer], AniError> {
		records(&self.layers, ChunkType::Layer)
	}

	/// Returns the number of layers (groups included).
	pub fn layer_count(&self) -> Result<usize, AniError> {
		self.layers().map(<[Layer]>::len)
	}

	/// Returns the layer at `index`.
	pub fn layer(&self, index: usize) -> Result<&Layer, AniError> {
		record(&self.layers, ChunkType::Layer, index)
	}

	/// Returns the name of the layer at `index`.
	pub fn layer_name(&self, index: usize) -> Result<&str, AniError> {
		self.layer(index).map(|layer| self.resolve(layer.name))
	}

	/// Layers in declaration order, empty when the file has no `LAYS` chunk.
	pub(crate) fn layers_or_empty(&self) -> &[Layer] {
		self.layers.as_deref().unwrap_or_default()
	}

	// Frames

	/// Returns the number of frames.
	pub fn frame_count(&self) -> Result<usize, AniError> {
		records(&self.frames, ChunkType::Frame).map(<[Frame]>::len)
	}

	/// Returns frame `frame_number` (1-based).
	///
	/// # Errors
	///
	/// - [`AniError::MissingRequiredChunk`] if the file has no `FRAM` chunk
	/// - [`AniError::InvalidFrameNumber`] if `frame_number` is outside `[1, frame_count]`
	pub fn frame(&self, frame_number: u16) -> Result<&Frame, AniError> {
		let frames = records(&self.frames, ChunkType::Frame)?;
		usize::from(frame_number)
			.checked_sub(1)
			.and_then(|index| frames.get(index))
			.ok_or_else(|| AniError::invalid_frame(frame_number, frames.len()))
	}

	/// Decodes the per-layer slots of a frame, one per non-group layer.
	pub fn frame_slots(&self, frame: &Frame) -> FrameSlots<'_> {
		FrameSlots::new(self, frame.slots_at, frame.slot_count)
	}

	/// Reads the slot at byte offset `at`, resolving its trigger.
	pub(crate) fn read_slot(&self, at: usize) -> Option<FrameLayer> {
		let reader = ByteReader::new(&self.data, ChunkType::Frame);
		let mut slot = FrameLayer::read(&reader, at).ok()?;
		if slot.trigger_offset != constants::NO_STRING {
			slot.trigger = resolve_string(&self.data, &self.strings, slot.trigger_offset).ok();
		}
		Some(slot)
	}

	/// Returns the trigger name attached to a slot, if any.
	pub fn trigger_name(&self, slot: &FrameLayer) -> Option<&str> {
		slot.trigger.map(|span| self.resolve(span))
	}

	// Images, cels, colliders

	/// Returns all images.
	pub fn images(&self) -> Result<&[Image], AniError> {
		records(&self.images, ChunkType::Image)
	}

	/// Returns the number of images.
	pub fn image_count(&self) -> Result<usize, AniError> {
		self.images().map(<[Image]>::len)
	}

	/// Returns the image at `index`.
	pub fn image(&self, index: usize) -> Result<&Image, AniError> {
		record(&self.images, ChunkType::Image, index)
	}

	/// Returns all cels.
	pub fn cels(&self) -> Result<&[Cel], AniError> {
		records(&self.cels, ChunkType::Cel)
	}

	/// Returns the number of cels.
	pub fn cel_count(&self) -> Result<usize, AniError> {
		self.cels().map(<[Cel]>::len)
	}

	/// Returns the cel at `index`.
	pub fn cel(&self, index: usize) -> Result<&Cel, AniError> {
		record(&self.cels, ChunkType::Cel, index)
	}

	/// Returns all colliders.
	pub fn colliders_table(&self) -> Result<&[Collider], AniError> {
		records(&self.colliders, ChunkType::Collider)
	}

	/// Returns the number of colliders.
	pub fn collider_count(&self) -> Result<usize, AniError> {
		self.colliders_table().map(<[Collider]>::len)
	}

	/// Returns the collider at `index`.
	pub fn collider(&self, index: usize) -> Result<&Collider, AniError> {
		record(&self.colliders, ChunkType::Collider, index)
	}

	fn parse(data: Cow<'a, [u8]>) -> Result<Self, AniError> {
		let header = Header::from_bytes(&data)?;
		let chunks = walk_chunks(&data)?;
		let find = |kind: ChunkType| chunks.iter().find(|chunk| chunk.kind == kind).copied();

		for kind in ChunkType::ALL {
			if kind.is_required() && find(kind).is_none() {
				return Err(AniError::MissingRequiredChunk(kind));
			}
		}

		let info_chunk = find(ChunkType::Info).ok_or(AniError::MissingRequiredChunk(ChunkType::Info))?;
		let info = Info {
			width: info_chunk.misc_u16(0),
			height: info_chunk.misc_u16(1),
			total_frames: info_chunk.misc_u16(2),
		};

		let string_chunk =
			find(ChunkType::String).ok_or(AniError::MissingRequiredChunk(ChunkType::String))?;
		let strings = string_table_range(&string_chunk, data.len());
		let name = |offset: u16| resolve_string(&data, &strings, offset);

		let tags = find(ChunkType::Tag)
			.map(|chunk| {
				let reader = ByteReader::new(&data, ChunkType::Tag);
				check_declared_size(&chunk, constants::TAG_RECORD_SIZE);
				read_records(
					&reader,
					chunk.payload_offset(),
					usize::from(chunk.count()),
					constants::TAG_RECORD_SIZE,
					|reader, at, _| {
						let (mut tag, offset) = Tag::read(reader, at)?;
						tag.name = name(offset)?;
						Ok(tag)
					},
				)
			})
			.transpose()?;

		let layers = find(ChunkType::Layer)
			.map(|chunk| {
				let reader = ByteReader::new(&data, ChunkType::Layer);
				check_declared_size(&chunk, constants::LAYER_RECORD_SIZE);
				read_records(
					&reader,
					chunk.payload_offset(),
					usize::from(chunk.count()),
					constants::LAYER_RECORD_SIZE,
					|reader, at, index| {
						let (mut layer, offset) = Layer::read(reader, at, index)?;
						layer.name = name(offset)?;
						Ok(layer)
					},
				)
			})
			.transpose()?;

		let slots_per_frame = layers
			.as_deref()
			.unwrap_or_default()
			.iter()
			.filter(|layer| layer.kind.has_frame_slot())
			.count();

		let record_size =
			constants::FRAME_RECORD_HEADER_SIZE + slots_per_frame * constants::FRAME_LAYER_RECORD_SIZE;
		let (frames, records) = find(ChunkType::Frame)
			.map(|chunk| -> Result<(Vec<Frame>, Vec<usize>), AniError> {
				let reader = ByteReader::new(&data, ChunkType::Frame);
				let base = chunk.payload_offset();
				let table = read_records(
					&reader,
					base,
					usize::from(chunk.count()),
					constants::FRAME_TABLE_ENTRY_SIZE,
					|reader, at, _| reader.u16(at),
				)?;

				let records = distinct_records(&table, record_size)?
					.into_iter()
					.map(|offset| -> Result<usize, AniError> {
						let at = base + usize::from(offset);
						reader.bytes(at, record_size)?;
						Ok(at + constants::FRAME_RECORD_HEADER_SIZE)
					})
					.collect::<Result<Vec<_>, AniError>>()?;

				let frames = table
					.iter()
					.map(|&offset| -> Result<Frame, AniError> {
						let at = base + usize::from(offset);
						Ok(Frame {
							duration: reader.u16(at)?,
							slots_at: at + constants::FRAME_RECORD_HEADER_SIZE,
							slot_count: slots_per_frame,
						})
					})
					.collect::<Result<Vec<_>, AniError>>()?;
				Ok((frames, records))
			})
			.transpose()?
			.unzip();

		let read_chunk = |kind: ChunkType, record_size: usize| {
			find(kind).map(|chunk| {
				check_declared_size(&chunk, record_size);
				(ByteReader::new(&data, kind), chunk.payload_offset(), usize::from(chunk.count()))
			})
		};

		let images = read_chunk(ChunkType::Image, constants::IMAGE_RECORD_SIZE)
			.map(|(reader, start, count)| {
				read_records(&reader, start, count, constants::IMAGE_RECORD_SIZE, |r, at, _| {
					Image::read(r, at)
				})
			})
			.transpose()?;

		let cels = read_chunk(ChunkType::Cel, constants::CEL_RECORD_SIZE)
			.map(|(reader, start, count)| {
				read_records(&reader, start, count, constants::CEL_RECORD_SIZE, |r, at, _| {
					Cel::read(r, at)
				})
			})
			.transpose()?;

		let colliders = read_chunk(ChunkType::Collider, constants::COLLIDER_RECORD_SIZE)
			.map(|(reader, start, count)| {
				read_records(&reader, start, count, constants::COLLIDER_RECORD_SIZE, |r, at, _| {
					Collider::read(r, at)
				})
			})
			.transpose()?;

		let mut file = Self {
			data,
			header,
			chunks,
			info,
			strings,
			tags,
			layers,
			frames,
			cels,
			colliders,
			images,
			bitmap: None,
			lossy_names: HashMap::new(),
		};
		let triggers = file.validate_references(&records.unwrap_or_default())?;

		let names = file
			.tags
			.iter()
			.flatten()
			.map(|tag| tag.name)
			.chain(file.layers.iter().flatten().map(|layer| layer.name))
			.chain(triggers);
		file.lossy_names = lossy_names(&file.data, names);
		if !file.lossy_names.is_empty() {
			debug!("{} names are not valid UTF-8", file.lossy_names.len());
		}

		debug!(
			"decoded {}x{} animation: {} chunks, {} frames, {} layers",
			file.info.width,
			file.info.height,
			file.chunks.len(),
			file.frames.as_ref().map_or(0, Vec::len),
			file.layers.as_ref().map_or(0, Vec::len)
		);

		Ok(file)
	}

	/// Checks every cross reference and returns the trigger spans of the
	/// distinct frame records starting at `records`.
	fn validate_references(&self, records: &[usize]) -> Result<Vec<StrSpan>, AniError> {
		let cel_count = self.cels.as_ref().map(Vec::len);
		let image_count = self.images.as_ref().map(Vec::len);
		let collider_count = self.colliders.as_ref().map(Vec::len);

		let check = |kind: ChunkType, count: Option<usize>, index: usize| match count {
			None => Err(AniError::MissingRequiredChunk(kind)),
			Some(count) if index >= count => Err(AniError::index_out_of_range(kind, index, count)),
			Some(_) => Ok(()),
		};

		let reader = ByteReader::new(&self.data, ChunkType::Frame);
		let mut triggers = Vec::new();
		for &slots_at in records {
			let slotted = self.layers_or_empty().iter().filter(|layer| layer.kind.has_frame_slot());
			for (position, layer) in slotted.enumerate() {
				let slot =
					FrameLayer::read(&reader, slots_at + position * constants::FRAME_LAYER_RECORD_SIZE)?;
				if slot.trigger_offset != constants::NO_STRING {
					triggers.push(resolve_string(&self.data, &self.strings, slot.trigger_offset)?);
				}
				let Some(index) = slot.index() else {
					continue;
				};
				match layer.kind {
					LayerType::Layer => check(ChunkType::Cel, cel_count, index)?,
					LayerType::Collider => check(ChunkType::Collider, collider_count, index)?,
					LayerType::Group => {}
				}
			}
		}

		for cel in self.cels.as_deref().unwrap_or_default() {
			check(ChunkType::Image, image_count, usize::from(cel.image))?;
		}

		if let Some(frames) = self.frames.as_deref() {
			for tag in self.tags.as_deref().unwrap_or_default() {
				let in_range = |frame: u16| (1..=frames.len()).contains(&usize::from(frame));
				if !in_range(tag.from) {
					return Err(AniError::invalid_frame(tag.from, frames.len()));
				}
				if !in_range(tag.to) || tag.to < tag.from {
					return Err(AniError::invalid_frame(tag.to, frames.len()));
				}
			}

			if usize::from(self.info.total_frames) != frames.len() {
				warn!(
					"INFO declares {} frames but FRAM holds {}",
					self.info.total_frames,
					frames.len()
				);
			}
		}

		Ok(triggers)
	}
}

impl File<'static> {
	/// Decodes an owned buffer without a bitmap.
	///
	/// # Errors
	///
	/// Returns an error if the buffer is structurally invalid.
	pub fn from_vec(data: Vec<u8>) -> Result<Self, AniError> {
		Self::parse(Cow::Owned(data))
	}

	/// Reads and decodes an `.ani` file from disk.
	///
	/// The returned file owns its buffer; attach a bitmap with
	/// [`File::with_bitmap`] before drawing.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read or is structurally invalid.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, AniError> {
		let data = std::fs::read(path)?;
		Self::from_vec(data)
	}
}

fn records<T>(table: &Option<Vec<T>>, kind: ChunkType) -> Result<&[T], AniError> {
	table.as_deref().ok_or(AniError::MissingRequiredChunk(kind))
}

fn record<T>(table: &Option<Vec<T>>, kind: ChunkType, index: usize) -> Result<&T, AniError> {
	let table = records(table, kind)?;
	table.get(index).ok_or_else(|| AniError::index_out_of_range(kind, index, table.len()))
}

/// Bytes of the `STRG` payload: the declared size, cut at the buffer end and
/// at the next chunk when that chunk follows in the buffer.
fn string_table_range(chunk: &ChunkHeader, buffer_len: usize) -> Range<usize> {
	let start = chunk.payload_offset().min(buffer_len);
	let mut end = (start + usize::from(chunk.size)).min(buffer_len);
	if let Some(next) = chunk.next_offset().filter(|&next| next >= start) {
		end = end.min(next);
	}
	start..end
}

fn resolve_string(data: &[u8], strings: &Range<usize>, offset: u16) -> Result<StrSpan, AniError> {
	let start = strings.start + usize::from(offset);
	let bytes = data.get(start..strings.end).ok_or(AniError::BadString {
		offset,
	})?;
	let len = bytes.iter().position(|&b| b == 0).ok_or(AniError::BadString {
		offset,
	})?;
	Ok(StrSpan {
		start,
		len,
	})
}

/// Lossy copies of the names among `spans` that are not valid UTF-8, keyed by
/// their start.
fn lossy_names(data: &[u8], spans: impl IntoIterator<Item = StrSpan>) -> HashMap<usize, String> {
	spans
		.into_iter()
		.filter_map(|span| {
			let bytes = data.get(span.start..span.start + span.len)?;
			std::str::from_utf8(bytes)
				.is_err()
				.then(|| (span.start, String::from_utf8_lossy(bytes).into_owned()))
		})
		.collect()
}

/// Sorted distinct frame-record offsets of a frame table.
///
/// Entries may share a record; distinct records must not overlap.
fn distinct_records(table: &[u16], record_size: usize) -> Result<Vec<u16>, AniError> {
	let mut offsets = table.to_vec();
	offsets.sort_unstable();
	offsets.dedup();
	if let Some(pair) = offsets.windows(2).find(|pair| usize::from(pair[1] - pair[0]) < record_size) {
		return Err(AniError::OverlappingFrameRecords {
			first: pair[0],
			second: pair[1],
		});
	}
	Ok(offsets)
}

fn check_declared_size(chunk: &ChunkHeader, record_size: usize) {
	let needed = usize::from(chunk.count()) * record_size;
	if usize::from(chunk.size) < needed {
		warn!(
			"{} chunk declares {} bytes but its {} records need {}",
			chunk.kind,
			chunk.size,
			chunk.count(),
			needed
		);
	}
}

fn check_image_region(index: usize, image: &Image, bitmap: &Bitmap<'_>) -> Result<(), AniError> {
	let mismatch = |reason: &str| {
		Err(AniError::BitmapMismatch(format!(
			"image {} ({}, {}, {}x{}) {}",
			index, image.u, image.v, image.w, image.h, reason
		)))
	};

	if image.u < 0 || image.v < 0 {
		return mismatch("starts at a negative coordinate");
	}
	if image.u % 8 != 0 {
		return mismatch("is not byte aligned");
	}

	let column = usize::from(image.u.unsigned_abs()) / 8;
	let row_bytes = usize::from(image.w).div_ceil(8);
	if column + row_bytes > bitmap.row_bytes() {
		return mismatch("exceeds the bitmap row");
	}
	if usize::from(image.v.unsigned_abs()) + usize::from(image.h) > bitmap.height() {
		return mismatch("exceeds the bitmap height");
	}

	Ok(())
}
