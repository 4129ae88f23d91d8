//! This module is separated into its own crate to enable simple dynamic linking for `pdani`, and should not be used directly.

/// `use pdani::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export pdani_types for convenience
pub use pdani_types;

// Re-export commonly used types at crate root
pub use pdani_types::file::{AniError, AniFile};
pub use pdani_types::gfx::{Bitmap, Flip, Framebuffer};
pub use pdani_types::player::{Player, PlayerConfig};
