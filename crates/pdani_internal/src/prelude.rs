//! Prelude module for `pdani_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use pdani_internal::prelude::*;
//!
//! // Now you can use all common types directly
//! let flip = Flip::from_axes(true, false);
//! let config = PlayerConfig::looping().with_flip(flip);
//! assert_eq!(config.loop_type, LoopType::Loop);
//!
//! let mut plane = vec![0u8; SCREEN_ROW_BYTES * SCREEN_HEIGHT];
//! let screen = Framebuffer::screen(&mut plane).unwrap();
//! assert_eq!(screen.width(), SCREEN_WIDTH);
//! ```

// Re-export everything from pdani_types::prelude
#[doc(inline)]
pub use pdani_types::prelude::*;

// Re-export the entire pdani_types module for advanced usage
#[doc(inline)]
pub use pdani_types;
