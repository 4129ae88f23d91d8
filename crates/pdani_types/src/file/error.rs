//! Error types for `.ani` decoding and playback.

use thiserror::Error;

use super::ani::ChunkType;

/// Errors raised while decoding an `.ani` buffer or querying a decoded file.
///
/// Structural errors (`MalformedHeader` through `OverlappingFrameRecords`)
/// reject the whole load. Range errors on a decoded file (`IndexOutOfRange`,
/// `InvalidFrameNumber`, `UnknownTagName`) are contract violations by the
/// caller and leave every piece of state untouched.
#[derive(Debug, Error)]
pub enum AniError {
	/// Buffer too short to hold the file header and a first chunk
	#[error("Malformed header: expected at least {expected} bytes, got {actual} bytes")]
	MalformedHeader {
		/// Minimum number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Chunk id matches none of the known chunk kinds
	#[error("Unknown chunk type {} at offset 0x{offset:04X}", String::from_utf8_lossy(.id))]
	UnknownChunkType {
		/// Raw four-byte id
		id: [u8; 4],
		/// Offset of the chunk header
		offset: usize,
	},

	/// Chunk list runs past the buffer or links back to a chunk already visited
	#[error("Truncated or cyclic chunk list at offset 0x{offset:04X}")]
	TruncatedOrCyclicChunkList {
		/// Offset that could not be visited
		offset: usize,
	},

	/// A chunk kind appears twice in the list
	#[error("Duplicate {0} chunk")]
	DuplicateChunk(ChunkType),

	/// A query needs a chunk the file does not carry
	#[error("Missing {0} chunk")]
	MissingRequiredChunk(ChunkType),

	/// A record or payload read would cross the end of the buffer
	#[error("Insufficient data in {chunk} chunk: expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Chunk being read
		chunk: ChunkType,
		/// Number of bytes required
		expected: usize,
		/// Number of bytes available
		actual: usize,
	},

	/// Record index beyond the declared count of its chunk
	#[error("{chunk} index {index} out of range (count: {count})")]
	IndexOutOfRange {
		/// Chunk the index refers to
		chunk: ChunkType,
		/// Index that was requested
		index: usize,
		/// Number of records available
		count: usize,
	},

	/// Layer record carries a type byte other than `L`, `G` or `C`
	#[error("Invalid layer type 0x{value:02X} for layer {index}")]
	InvalidLayerType {
		/// Layer index
		index: usize,
		/// Raw type byte
		value: u8,
	},

	/// String reference outside the string table or not NUL-terminated inside it
	#[error("Bad string reference at offset {offset}")]
	BadString {
		/// Byte offset into the string table
		offset: u16,
	},

	/// Two frame-table entries point at distinct but overlapping frame records
	#[error("Frame records at payload offsets {first} and {second} overlap")]
	OverlappingFrameRecords {
		/// Lower payload offset
		first: u16,
		/// Higher payload offset
		second: u16,
	},

	/// Named tag does not exist
	#[error("Unknown tag name: {0}")]
	UnknownTagName(String),

	/// Frame number outside `[1, count]`
	#[error("Invalid frame number {frame} (frame count: {count})")]
	InvalidFrameNumber {
		/// Requested frame number
		frame: u32,
		/// Number of frames in the file
		count: usize,
	},

	/// Bitmap planes inconsistent with their declared geometry or with an image region
	#[error("Bitmap mismatch: {0}")]
	BitmapMismatch(String),

	/// Drawing requires a bitmap but none is attached
	#[error("No bitmap attached to file")]
	MissingBitmap,

	/// IO error
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl AniError {
	/// Creates an `InsufficientData` error.
	pub fn insufficient_data(chunk: ChunkType, expected: usize, actual: usize) -> Self {
		Self::InsufficientData {
			chunk,
			expected,
			actual,
		}
	}

	/// Creates an `IndexOutOfRange` error.
	pub fn index_out_of_range(chunk: ChunkType, index: usize, count: usize) -> Self {
		Self::IndexOutOfRange {
			chunk,
			index,
			count,
		}
	}

	/// Creates an `InvalidFrameNumber` error.
	pub fn invalid_frame(frame: impl Into<u32>, count: usize) -> Self {
		Self::InvalidFrameNumber {
			frame: frame.into(),
			count,
		}
	}
}
