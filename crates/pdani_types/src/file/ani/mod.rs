//! `.ani` animation file support.
//!
//! # File Structure
//!
//! All integers are little-endian.
//!
//! ```text
//! +--------------------------+
//! | Header (16 bytes)        |  id[4], version u32, 8 reserved bytes
//! +--------------------------+
//! | Chunk header (16 bytes)  |  id[4], size u16, next u16, misc[8]
//! | Chunk payload            |
//! | padding to 16 bytes      |
//! +--------------------------+
//! | ...                      |  `next` (16-byte units) links the chunks,
//! +--------------------------+  zero ends the list
//! ```
//!
//! | Chunk  | misc                          | payload                                   |
//! |--------|-------------------------------|-------------------------------------------|
//! | `INFO` | width, height, total frames   | none                                      |
//! | `TAGS` | count                         | `{from u16, to u16, name u16}`            |
//! | `LAYS` | count                         | `{type u8, parent i8, name u16, count u16}` |
//! | `FRAM` | count                         | u16 offsets, then `{duration u16, {trigger u16, slot i16}[]}` |
//! | `CELS` | count                         | `{image u16, x i16, y i16}`               |
//! | `COLS` | count                         | `{x i16, y i16, w u16, h u16}`            |
//! | `IMAG` | count                         | `{u i16, v i16, w u16, h u16}`            |
//! | `STRG` | unused                        | NUL-terminated strings                    |
//!
//! String references are byte offsets into the `STRG` payload; offset 0 means
//! "no string". Frame records hold one slot per non-group layer, in layer
//! order. `INFO` and `STRG` are required, every other chunk is optional.

mod chunk;
mod collision;
pub mod constants;
mod draw;
mod dump;
mod file;
#[cfg(any(test, feature = "fixture"))]
mod fixture;
mod iterator;
mod records;


pub use chunk::{ChunkHeader, ChunkType, Header, walk_chunks};
pub use collision::{ColliderHit, Collisions};
pub use dump::Dump;
pub use file::File;
#[cfg(any(test, feature = "fixture"))]
pub use fixture::FixtureBuilder;
pub use iterator::{FrameLayers, FrameSlots, LayerEntry};
pub use records::{
	Cel, Collider, Frame, FrameLayer, FrameSlot, Image, Info, Layer, LayerType, StrSpan, Tag,
};
