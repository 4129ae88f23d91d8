//! Prelude module for `pdani_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and constants.
//!
//! # Examples
//!
//! ```no_run
//! use pdani_types::prelude::*;
//!
//! let file = AniFile::open("miata.ani").unwrap();
//! let player = Player::with_config(&file, PlayerConfig::one_shot()).unwrap();
//! assert!(!player.is_playing());
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	AniError,
	AniFile,

	// Records
	ChunkType,
	FrameSlot,
	LayerType,
};

#[doc(inline)]
pub use crate::file::ani::{ColliderHit, LayerEntry};

// Graphics types
#[doc(inline)]
pub use crate::gfx::{
	Bitmap, Flip, Framebuffer, Rect, SCREEN_HEIGHT, SCREEN_ROW_BYTES, SCREEN_WIDTH,
};

// Playback types
#[doc(inline)]
pub use crate::player::{LoopType, PlayState, Player, PlayerConfig};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
