//! Player configuration.
//!
//! Controls the loop policy, frame skipping and initial mirroring of a
//! [`Player`](super::Player). The struct is serde-friendly so hosts can keep it
//! in their own configuration files.
//!
//! # Presets
//!
//! - `default()`: looping, frame-skippable, unflipped
//! - `looping()`: same as `default()`
//! - `one_shot()`: plays the range once and stops on its last frame
//!
//! # Examples
//!
//! ```
//! use pdani_types::gfx::Flip;
//! use pdani_types::player::{LoopType, PlayerConfig};
//!
//! let config = PlayerConfig::one_shot().with_flip(Flip::HORIZONTAL);
//! assert_eq!(config.loop_type, LoopType::OneShot);
//! assert!(config.frame_skippable);
//! ```

use serde::{Deserialize, Serialize};

use crate::gfx::Flip;

/// What happens when playback passes the last frame of its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopType {
	/// Wrap around to the first frame of the range
	#[default]
	Loop,
	/// Hold the last frame and stop playing
	OneShot,
}

/// Playback settings applied when a player is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
	/// Loop policy
	pub loop_type: LoopType,
	/// Allow one `advance` to cross several frame boundaries
	///
	/// When disabled, at most one boundary is crossed per call and the time
	/// left over past the frame's duration is discarded.
	pub frame_skippable: bool,
	/// Initial mirroring
	pub flip: Flip,
}

impl Default for PlayerConfig {
	fn default() -> Self {
		Self {
			loop_type: LoopType::Loop,
			frame_skippable: true,
			flip: Flip::empty(),
		}
	}
}

impl PlayerConfig {
	/// Create a new configuration.
	///
	/// # Arguments
	/// * `loop_type` - Loop policy
	/// * `frame_skippable` - Whether one advance may cross several frames
	/// * `flip` - Initial mirroring
	pub fn new(loop_type: LoopType, frame_skippable: bool, flip: Flip) -> Self {
		Self {
			loop_type,
			frame_skippable,
			flip,
		}
	}

	/// Looping, frame-skippable playback.
	pub fn looping() -> Self {
		Self::default()
	}

	/// One-shot, frame-skippable playback.
	pub fn one_shot() -> Self {
		Self {
			loop_type: LoopType::OneShot,
			..Self::default()
		}
	}

	/// Returns a copy with the given frame skipping policy.
	pub fn with_frame_skippable(mut self, frame_skippable: bool) -> Self {
		self.frame_skippable = frame_skippable;
		self
	}

	/// Returns a copy with the given initial mirroring.
	pub fn with_flip(mut self, flip: Flip) -> Self {
		self.flip = flip;
		self
	}
}
