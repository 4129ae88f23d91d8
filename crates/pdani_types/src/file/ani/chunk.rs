//! Chunk list parsing.
//!
//! An `.ani` buffer is a 16-byte header followed by a singly linked list of
//! chunks. Each chunk header carries a four-character id, a declared size, the
//! offset of the next chunk (in 16-byte units from the start of the file, zero
//! terminates the list) and two misc words whose meaning depends on the id.

use std::collections::HashSet;
use std::fmt;

use log::debug;

use crate::file::AniError;

use super::constants;

/// Kind of chunk, identified by its four-character id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChunkType {
	/// `INFO`: animation bounding box and declared frame total
	Info,
	/// `TAGS`: named frame ranges
	Tag,
	/// `LAYS`: flattened layer/group/collider tree
	Layer,
	/// `FRAM`: per-frame duration and layer slots
	Frame,
	/// `CELS`: placed images
	Cel,
	/// `COLS`: collider rectangles
	Collider,
	/// `IMAG`: atlas regions
	Image,
	/// `STRG`: NUL-terminated string table
	String,
}

impl ChunkType {
	/// Number of chunk kinds
	pub const COUNT: usize = 8;

	/// Every chunk kind, in the canonical on-disk order
	pub const ALL: [ChunkType; Self::COUNT] = [
		Self::Info,
		Self::Tag,
		Self::Layer,
		Self::Frame,
		Self::Cel,
		Self::Collider,
		Self::Image,
		Self::String,
	];

	/// Returns the four-character id written in the chunk header.
	pub fn id(self) -> &'static [u8; 4] {
		match self {
			Self::Info => b"INFO",
			Self::Tag => b"TAGS",
			Self::Layer => b"LAYS",
			Self::Frame => b"FRAM",
			Self::Cel => b"CELS",
			Self::Collider => b"COLS",
			Self::Image => b"IMAG",
			Self::String => b"STRG",
		}
	}

	/// Classifies a chunk id, `None` if it matches no known chunk.
	pub fn from_id(id: &[u8; 4]) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.id() == id)
	}

	/// Slot of this kind in per-type lookup tables.
	#[inline]
	pub fn index(self) -> usize {
		self as usize
	}

	/// Returns `true` for chunks every file must carry.
	pub fn is_required(self) -> bool {
		matches!(self, Self::Info | Self::String)
	}
}

impl fmt::Display for ChunkType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&String::from_utf8_lossy(self.id()))
	}
}

/// Decoded 16-byte file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
	/// Four-byte magic id
	pub id: [u8; 4],
	/// Format version
	pub version: u32,
}

impl Header {
	/// Parses the file header from the start of `data`.
	///
	/// # Errors
	///
	/// Returns [`AniError::MalformedHeader`] if `data` cannot hold the header and
	/// at least one chunk header.
	pub fn from_bytes(data: &[u8]) -> Result<Self, AniError> {
		let expected = constants::HEADER_SIZE + constants::CHUNK_HEADER_SIZE;
		if data.len() < expected {
			return Err(AniError::MalformedHeader {
				expected,
				actual: data.len(),
			});
		}

		Ok(Self {
			id: [data[0], data[1], data[2], data[3]],
			version: u32::from_le_bytes([data[4], data[5], data[6], data[7]]),
		})
	}
}

/// Header of one chunk together with its location in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
	/// Chunk kind
	pub kind: ChunkType,
	/// Byte offset of the chunk header from the start of the file
	pub offset: usize,
	/// Declared payload size; bounds the string table, informational elsewhere
	pub size: u16,
	/// Raw `next` field (16-byte units, zero terminates)
	pub next: u16,
	/// Misc words, reinterpreted per chunk kind
	pub misc: [u8; constants::CHUNK_MISC_SIZE],
}

impl ChunkHeader {
	/// Byte offset of the first payload byte.
	#[inline]
	pub fn payload_offset(&self) -> usize {
		self.offset + constants::CHUNK_HEADER_SIZE
	}

	/// Byte offset of the next chunk, `None` at the end of the list.
	pub fn next_offset(&self) -> Option<usize> {
		(self.next != 0).then(|| usize::from(self.next) * constants::CHUNK_ALIGNMENT)
	}

	/// Reads a little-endian u16 from the misc area (`index` counts u16 words).
	pub fn misc_u16(&self, index: usize) -> u16 {
		let at = index * 2;
		u16::from_le_bytes([self.misc[at], self.misc[at + 1]])
	}

	/// Element count stored in the first misc word of record chunks.
	#[inline]
	pub fn count(&self) -> u16 {
		self.misc_u16(0)
	}
}

impl fmt::Display for ChunkHeader {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"chunk: 0x{:04X} {} size: {} next: {}",
			self.offset, self.kind, self.size, self.next
		)
	}
}

/// Walks the chunk list and returns every chunk header in list order.
///
/// Each chunk kind may appear at most once. The walk rejects ids it does not
/// know, offsets that would read past the end of `data` and `next` links that
/// revisit an offset already seen.
///
/// # Errors
///
/// - [`AniError::MalformedHeader`] if the header does not fit
/// - [`AniError::UnknownChunkType`] for unrecognised ids
/// - [`AniError::TruncatedOrCyclicChunkList`] for out-of-bounds or cyclic links
/// - [`AniError::DuplicateChunk`] if a kind appears twice
pub fn walk_chunks(data: &[u8]) -> Result<Vec<ChunkHeader>, AniError> {
	Header::from_bytes(data)?;

	let mut chunks = Vec::with_capacity(ChunkType::COUNT);
	let mut visited = HashSet::new();
	let mut seen = [false; ChunkType::COUNT];
	let mut offset = constants::FIRST_CHUNK_OFFSET;

	loop {
		if !visited.insert(offset) {
			return Err(AniError::TruncatedOrCyclicChunkList {
				offset,
			});
		}

		let header = read_chunk_header(data, offset)?;
		if seen[header.kind.index()] {
			return Err(AniError::DuplicateChunk(header.kind));
		}
		seen[header.kind.index()] = true;

		debug!(
			"chunk {} at 0x{:04X} (size: {}, next: {})",
			header.kind, header.offset, header.size, header.next
		);
		chunks.push(header);

		match header.next_offset() {
			Some(next) => offset = next,
			None => break,
		}
	}

	Ok(chunks)
}

fn read_chunk_header(data: &[u8], offset: usize) -> Result<ChunkHeader, AniError> {
	let raw = offset
		.checked_add(constants::CHUNK_HEADER_SIZE)
		.and_then(|end| data.get(offset..end))
		.ok_or(AniError::TruncatedOrCyclicChunkList {
			offset,
		})?;

	let id = [raw[0], raw[1], raw[2], raw[3]];
	let kind = ChunkType::from_id(&id).ok_or(AniError::UnknownChunkType {
		id,
		offset,
	})?;

	let size_at = constants::CHUNK_SIZE_FIELD;
	let next_at = constants::CHUNK_NEXT_FIELD;
	let mut misc = [0u8; constants::CHUNK_MISC_SIZE];
	misc.copy_from_slice(
		&raw[constants::CHUNK_MISC_FIELD..constants::CHUNK_MISC_FIELD + constants::CHUNK_MISC_SIZE],
	);

	Ok(ChunkHeader {
		kind,
		offset,
		size: u16::from_le_bytes([raw[size_at], raw[size_at + 1]]),
		next: u16::from_le_bytes([raw[next_at], raw[next_at + 1]]),
		misc,
	})
}

/// Bounds-checked little-endian readers over a byte buffer.
///
/// Every read names the chunk it belongs to so that a short buffer reports
/// which record was cut off.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ByteReader<'a> {
	data: &'a [u8],
	chunk: ChunkType,
}

impl<'a> ByteReader<'a> {
	pub(crate) fn new(data: &'a [u8], chunk: ChunkType) -> Self {
		Self {
			data,
			chunk,
		}
	}

	/// Returns `len` bytes starting at `offset`.
	pub(crate) fn bytes(&self, offset: usize, len: usize) -> Result<&'a [u8], AniError> {
		offset
			.checked_add(len)
			.and_then(|end| self.data.get(offset..end))
			.ok_or_else(|| {
				AniError::insufficient_data(self.chunk, offset.saturating_add(len), self.data.len())
			})
	}

	pub(crate) fn u8(&self, offset: usize) -> Result<u8, AniError> {
		Ok(self.bytes(offset, 1)?[0])
	}

	pub(crate) fn i8(&self, offset: usize) -> Result<i8, AniError> {
		Ok(self.u8(offset)? as i8)
	}

	pub(crate) fn u16(&self, offset: usize) -> Result<u16, AniError> {
		let raw = self.bytes(offset, 2)?;
		Ok(u16::from_le_bytes([raw[0], raw[1]]))
	}

	pub(crate) fn i16(&self, offset: usize) -> Result<i16, AniError> {
		let raw = self.bytes(offset, 2)?;
		Ok(i16::from_le_bytes([raw[0], raw[1]]))
	}
}
