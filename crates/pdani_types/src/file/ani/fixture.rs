//! Synthetic `.ani` buffers for tests and benchmarks.
//!
//! ```ignore
//! use pdani_types::file::ani::{File, FixtureBuilder, LayerType};
//!
//! let data = FixtureBuilder::new(16, 16)
//! 	.layer(LayerType::Layer, -1, "body")
//! 	.image(0, 0, 16, 16)
//! 	.cel(0, 0, 0)
//! 	.frame(100, &[(0, Some("step"))])
//! 	.build();
//!
//! let file = File::from_vec(data).unwrap();
//! assert_eq!(file.frame_count().unwrap(), 1);
//! ```

use super::chunk::ChunkType;
use super::constants;
use super::records::LayerType;

/// Builds a well-formed `.ani` buffer record by record.
///
/// Record chunks are emitted only when they hold at least one record, in the
/// order `INFO TAGS LAYS FRAM CELS COLS IMAG STRG` (`STRG` moves right after
/// `INFO` with [`FixtureBuilder::strings_first`]). Strings are interned; the
/// empty string lives at offset 0.
#[derive(Debug, Clone)]
pub struct FixtureBuilder {
	width: u16,
	height: u16,
	total_frames: Option<u16>,
	strings: Vec<u8>,
	tags: Vec<[u16; 3]>,
	layers: Vec<(LayerType, i8, u16, u16)>,
	frames: Vec<(u16, Vec<(u16, i16)>)>,
	cels: Vec<(u16, i16, i16)>,
	colliders: Vec<(i16, i16, u16, u16)>,
	images: Vec<(i16, i16, u16, u16)>,
	omitted: Vec<ChunkType>,
	strings_first: bool,
	share_frame_records: bool,
}

impl FixtureBuilder {
	/// Starts an empty animation with the given bounding box.
	pub fn new(width: u16, height: u16) -> Self {
		Self {
			width,
			height,
			total_frames: None,
			strings: vec![0],
			tags: Vec::new(),
			layers: Vec::new(),
			frames: Vec::new(),
			cels: Vec::new(),
			colliders: Vec::new(),
			images: Vec::new(),
			omitted: Vec::new(),
			strings_first: false,
			share_frame_records: false,
		}
	}

	fn intern(&mut self, name: &str) -> u16 {
		if name.is_empty() {
			return constants::NO_STRING;
		}

		let mut needle = name.as_bytes().to_vec();
		needle.push(0);
		let existing = self
			.strings
			.windows(needle.len())
			.enumerate()
			.find(|(at, window)| *window == needle && (*at == 0 || self.strings[at - 1] == 0))
			.map(|(at, _)| at);
		let offset = existing.unwrap_or_else(|| {
			let at = self.strings.len();
			self.strings.extend_from_slice(&needle);
			at
		});
		offset as u16
	}

	/// Overrides the frame total written to `INFO` (defaults to the frame count).
	pub fn total_frames(mut self, total_frames: u16) -> Self {
		self.total_frames = Some(total_frames);
		self
	}

	/// Adds a named inclusive frame range.
	pub fn tag(mut self, name: &str, from: u16, to: u16) -> Self {
		let name = self.intern(name);
		self.tags.push([from, to, name]);
		self
	}

	/// Adds a layer table entry.
	pub fn layer(mut self, kind: LayerType, parent: i8, name: &str) -> Self {
		let name = self.intern(name);
		self.layers.push((kind, parent, name, 0));
		self
	}

	/// Adds a group entry declaring `layer_count` children.
	pub fn group(mut self, parent: i8, name: &str, layer_count: u16) -> Self {
		let name = self.intern(name);
		self.layers.push((LayerType::Group, parent, name, layer_count));
		self
	}

	/// Adds an atlas region.
	pub fn image(mut self, u: i16, v: i16, w: u16, h: u16) -> Self {
		self.images.push((u, v, w, h));
		self
	}

	/// Adds a cel placing `image` at (`x`, `y`).
	pub fn cel(mut self, image: u16, x: i16, y: i16) -> Self {
		self.cels.push((image, x, y));
		self
	}

	/// Adds a collider rectangle.
	pub fn collider(mut self, x: i16, y: i16, w: u16, h: u16) -> Self {
		self.colliders.push((x, y, w, h));
		self
	}

	/// Adds a frame; `slots` holds one `(cel or collider index, trigger)` pair
	/// per non-group layer, `-1` for an empty slot.
	pub fn frame(mut self, duration: u16, slots: &[(i16, Option<&str>)]) -> Self {
		let slots = slots
			.iter()
			.map(|&(slot, trigger)| (self.intern(trigger.unwrap_or_default()), slot))
			.collect();
		self.frames.push((duration, slots));
		self
	}

	/// Leaves the chunk of the given kind out of the output.
	pub fn without(mut self, kind: ChunkType) -> Self {
		self.omitted.push(kind);
		self
	}

	/// Emits `STRG` right after `INFO` instead of last.
	pub fn strings_first(mut self) -> Self {
		self.strings_first = true;
		self
	}

	/// Writes identical frame records once and points every matching table
	/// entry at that copy.
	pub fn share_frame_records(mut self) -> Self {
		self.share_frame_records = true;
		self
	}

	/// Serialises the animation.
	pub fn build(&self) -> Vec<u8> {
		let mut chunks: Vec<(ChunkType, [u16; 4], Vec<u8>)> = Vec::new();
		let record_chunk = |kind: ChunkType, count: usize, payload: Vec<u8>| (kind, [count as u16, 0, 0, 0], payload);

		let total_frames = self.total_frames.unwrap_or(self.frames.len() as u16);
		chunks.push((ChunkType::Info, [self.width, self.height, total_frames, 0], Vec::new()));

		if !self.tags.is_empty() {
			let payload: Vec<u8> = self.tags.iter().flatten().flat_map(|v| v.to_le_bytes()).collect();
			chunks.push(record_chunk(ChunkType::Tag, self.tags.len(), payload));
		}

		if !self.layers.is_empty() {
			let mut payload = Vec::new();
			for &(kind, parent, name, layer_count) in &self.layers {
				payload.push(kind.to_u8());
				payload.extend_from_slice(&parent.to_le_bytes());
				payload.extend_from_slice(&name.to_le_bytes());
				payload.extend_from_slice(&layer_count.to_le_bytes());
			}
			chunks.push(record_chunk(ChunkType::Layer, self.layers.len(), payload));
		}

		if !self.frames.is_empty() {
			let mut table = Vec::new();
			let mut records: Vec<u8> = Vec::new();
			let mut written: Vec<(usize, usize)> = Vec::new();
			let table_size = self.frames.len() * constants::FRAME_TABLE_ENTRY_SIZE;
			for (duration, slots) in &self.frames {
				let mut record = duration.to_le_bytes().to_vec();
				for &(trigger, slot) in slots {
					record.extend_from_slice(&trigger.to_le_bytes());
					record.extend_from_slice(&slot.to_le_bytes());
				}

				let shared = self
					.share_frame_records
					.then(|| written.iter().find(|&&(at, len)| records[at..at + len] == record[..]))
					.flatten()
					.map(|&(at, _)| at);
				let at = shared.unwrap_or_else(|| {
					let at = records.len();
					records.extend_from_slice(&record);
					written.push((at, record.len()));
					at
				});
				table.extend_from_slice(&((table_size + at) as u16).to_le_bytes());
			}
			table.extend_from_slice(&records);
			chunks.push(record_chunk(ChunkType::Frame, self.frames.len(), table));
		}

		if !self.cels.is_empty() {
			let mut payload = Vec::new();
			for &(image, x, y) in &self.cels {
				payload.extend_from_slice(&image.to_le_bytes());
				payload.extend_from_slice(&x.to_le_bytes());
				payload.extend_from_slice(&y.to_le_bytes());
			}
			chunks.push(record_chunk(ChunkType::Cel, self.cels.len(), payload));
		}

		let rects = |rects: &[(i16, i16, u16, u16)]| {
			let mut payload = Vec::new();
			for &(x, y, w, h) in rects {
				payload.extend_from_slice(&x.to_le_bytes());
				payload.extend_from_slice(&y.to_le_bytes());
				payload.extend_from_slice(&w.to_le_bytes());
				payload.extend_from_slice(&h.to_le_bytes());
			}
			payload
		};
		if !self.colliders.is_empty() {
			chunks.push(record_chunk(ChunkType::Collider, self.colliders.len(), rects(&self.colliders)));
		}
		if !self.images.is_empty() {
			chunks.push(record_chunk(ChunkType::Image, self.images.len(), rects(&self.images)));
		}

		let strings = (ChunkType::String, [0; 4], self.strings.clone());
		if self.strings_first {
			chunks.insert(1, strings);
		} else {
			chunks.push(strings);
		}
		chunks.retain(|(kind, ..)| !self.omitted.contains(kind));

		let mut data = Vec::new();
		data.extend_from_slice(b"PDAN");
		data.extend_from_slice(&1u32.to_le_bytes());
		data.resize(constants::HEADER_SIZE, 0);

		let count = chunks.len();
		for (index, (kind, misc, payload)) in chunks.into_iter().enumerate() {
			let start = data.len();
			let end = (start + constants::CHUNK_HEADER_SIZE + payload.len())
				.next_multiple_of(constants::CHUNK_ALIGNMENT);
			let next = if index + 1 == count {
				0
			} else {
				(end / constants::CHUNK_ALIGNMENT) as u16
			};

			data.extend_from_slice(kind.id());
			data.extend_from_slice(&(payload.len() as u16).to_le_bytes());
			data.extend_from_slice(&next.to_le_bytes());
			for word in misc {
				data.extend_from_slice(&word.to_le_bytes());
			}
			data.extend_from_slice(&payload);
			data.resize(end, 0);
		}

		data
	}
}
