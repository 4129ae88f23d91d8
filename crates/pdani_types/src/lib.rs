//! This crate provides the `.ani` animation format, its player and the 1bpp
//! blitter for the `pdani-rs` project.
//!
//! # Modules
//!
//! - **`file`**: chunked `.ani` decoding, record accessors, the frame/layer
//!   iterator, collision queries and the diagnostic dump
//! - **`gfx`**: 1bpp planes, mirroring flags and the masked blitter
//! - **`player`**: the playback state machine
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use pdani_types::prelude::*;
//!
//! # fn main() -> Result<(), AniError> {
//! let texel = std::fs::read("miata.texel")?;
//! let bitmap = Bitmap::new(128, 64, 16, texel)?;
//! let file = AniFile::open("miata.ani")?.with_bitmap(bitmap)?;
//!
//! let mut player = Player::new(&file)?;
//! player.play(Some("run"))?;
//! player.advance(16, |_, frame, trigger| println!("frame {frame}: {trigger}"))?;
//!
//! let mut screen = vec![0u8; SCREEN_ROW_BYTES * SCREEN_HEIGHT];
//! player.draw(&mut Framebuffer::screen(&mut screen)?, 100, 80)?;
//! # Ok(())
//! # }
//! ```

pub mod file;

pub mod gfx;

pub mod player;

/// `use pdani_types::prelude::*;` to import commonly used items.
pub mod prelude;
