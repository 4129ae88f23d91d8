//! File type support for `pdani-rs`.

mod error;

pub mod ani;

// Re-export unified error type
pub use error::AniError;

// Re-export main file types
pub use ani::{ChunkType, File as AniFile, FrameSlot, LayerType};
