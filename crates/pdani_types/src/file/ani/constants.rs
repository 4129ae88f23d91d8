//! ANI file format constants.
//!
//! All multi-byte values in an `.ani` file are little-endian. Structure sizes
//! here are the on-disk sizes; nothing in the format is padded between records.

/// Size of the file header (magic, version, 8 reserved bytes)
pub const HEADER_SIZE: usize = 16;

/// Size of a chunk header (`id`, `size`, `next`, two misc words)
pub const CHUNK_HEADER_SIZE: usize = 16;

/// Offset of the first chunk in the file
pub const FIRST_CHUNK_OFFSET: usize = HEADER_SIZE;

/// The chunk `next` field counts in units of this many bytes
pub const CHUNK_ALIGNMENT: usize = 16;

/// Offset of the `size` field inside a chunk header
pub const CHUNK_SIZE_FIELD: usize = 4;

/// Offset of the `next` field inside a chunk header
pub const CHUNK_NEXT_FIELD: usize = 6;

/// Offset of the misc words inside a chunk header
pub const CHUNK_MISC_FIELD: usize = 8;

/// Size of the misc area inside a chunk header
pub const CHUNK_MISC_SIZE: usize = 8;

/// Size of a tag record (`from`, `to`, `name`)
pub const TAG_RECORD_SIZE: usize = 6;

/// Size of a layer record (`type`, `parent`, `name`, `layer_count`)
pub const LAYER_RECORD_SIZE: usize = 6;

/// Size of one frame-table entry (u16 payload offset)
pub const FRAME_TABLE_ENTRY_SIZE: usize = 2;

/// Size of the fixed part of a frame record (`duration`)
pub const FRAME_RECORD_HEADER_SIZE: usize = 2;

/// Size of one per-frame layer slot (`trigger`, `cel`/`collider`)
pub const FRAME_LAYER_RECORD_SIZE: usize = 4;

/// Size of an image record (`u`, `v`, `w`, `h`)
pub const IMAGE_RECORD_SIZE: usize = 8;

/// Size of a cel record (`image`, `x`, `y`)
pub const CEL_RECORD_SIZE: usize = 6;

/// Size of a collider record (`x`, `y`, `w`, `h`)
pub const COLLIDER_RECORD_SIZE: usize = 8;

/// String reference meaning "no name" (used by frame triggers)
pub const NO_STRING: u16 = 0;

/// Slot value meaning "no cel / no collider in this frame"
pub const NO_SLOT: i16 = -1;

/// Layer type byte for drawable layers
pub const LAYER_TYPE_LAYER: u8 = b'L';

/// Layer type byte for groups (no per-frame slot)
pub const LAYER_TYPE_GROUP: u8 = b'G';

/// Layer type byte for collider tracks
pub const LAYER_TYPE_COLLIDER: u8 = b'C';
