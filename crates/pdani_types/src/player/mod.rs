//! Playback state machine over a decoded [`File`].
//!
//! A [`Player`] holds its file either borrowed, so several players can share
//! one decoded file, or owned, as returned by [`Player::open`]. Beyond the file
//! it keeps only its cursor: the active frame range (the whole file or one
//! tag), the current frame, time spent in it and the loop, skip and flip
//! settings. Time is driven entirely by the `dt` passed to [`Player::advance`];
//! nothing here reads a clock.
//!
//! # Examples
//!
//! ```no_run
//! use pdani_types::file::ani::File;
//! use pdani_types::player::{Player, PlayerConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = File::open("miata.ani")?;
//! let mut player = Player::with_config(&file, PlayerConfig::one_shot())?;
//!
//! player.play(Some("drift"))?;
//! player.advance(33, |_, frame, trigger| println!("{frame}: {trigger}"))?;
//! # Ok(())
//! # }
//! ```
//!
//! A player that owns its file:
//!
//! ```no_run
//! use pdani_types::player::Player;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut player = Player::open("miata.ani")?;
//! player.play(None)?;
//! # Ok(())
//! # }
//! ```

mod config;


use std::borrow::Cow;
use std::path::Path;

use log::{debug, trace, warn};

use crate::file::AniError;
use crate::file::ani::{ColliderHit, File};
use crate::gfx::{Flip, Framebuffer};

pub use config::{LoopType, PlayerConfig};

/// Whether a player advances on [`Player::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayState {
	/// Frame and elapsed time are frozen
	Stopped,
	/// Frames advance with elapsed time
	Playing,
}

/// Playback cursor over a borrowed or owned [`File`].
#[derive(Debug, Clone)]
pub struct Player<'f> {
	file: Cow<'f, File<'f>>,
	start_frame: u16,
	end_frame: u16,
	frame_number: u16,
	previous_frame_number: Option<u16>,
	frame_elapsed: u32,
	total_elapsed: u64,
	state: PlayState,
	loop_type: LoopType,
	frame_skippable: bool,
	flip: Flip,
	// Set by the advance that ends one-shot playback, cleared by the next call
	finished: bool,
}

impl<'f> Player<'f> {
	/// Creates a stopped, looping, frame-skippable player covering the whole
	/// file, positioned on frame 1.
	///
	/// # Errors
	///
	/// Fails if the file has no frames.
	pub fn new(file: &'f File<'f>) -> Result<Self, AniError> {
		Self::with_config(file, PlayerConfig::default())
	}

	/// Creates a stopped player covering the whole file with the given settings.
	///
	/// # Errors
	///
	/// Fails if the file has no frames.
	pub fn with_config(file: &'f File<'f>, config: PlayerConfig) -> Result<Self, AniError> {
		Self::from_cow(Cow::Borrowed(file), config)
	}

	/// Creates a stopped player that owns `file`.
	///
	/// # Errors
	///
	/// Fails if the file has no frames.
	pub fn from_file(file: File<'f>, config: PlayerConfig) -> Result<Self, AniError> {
		Self::from_cow(Cow::Owned(file), config)
	}

	fn from_cow(file: Cow<'f, File<'f>>, config: PlayerConfig) -> Result<Self, AniError> {
		let end_frame = Self::whole_range_end(&file)?;

		Ok(Self {
			file,
			start_frame: 1,
			end_frame,
			frame_number: 1,
			previous_frame_number: None,
			frame_elapsed: 0,
			total_elapsed: 0,
			state: PlayState::Stopped,
			loop_type: config.loop_type,
			frame_skippable: config.frame_skippable,
			flip: config.flip,
			finished: false,
		})
	}

	fn whole_range_end(file: &File<'_>) -> Result<u16, AniError> {
		let count = file.frame_count()?;
		match u16::try_from(count) {
			Ok(end) if end > 0 => Ok(end),
			_ => Err(AniError::invalid_frame(1u16, count)),
		}
	}

	/// Starts playback of a tag's frame range, or of the whole file for `None`.
	///
	/// Seeks to the first frame of the range. On error nothing changes.
	///
	/// # Errors
	///
	/// Returns [`AniError::UnknownTagName`] if no tag has the given name.
	pub fn play(&mut self, tag: Option<&str>) -> Result<(), AniError> {
		let (start, end) = match tag {
			Some(name) => {
				let tag = self
					.file
					.find_tag(name)
					.ok_or_else(|| AniError::UnknownTagName(name.to_owned()))?;
				(tag.from, tag.to)
			}
			None => (1, Self::whole_range_end(&self.file)?),
		};

		self.start_frame = start;
		self.end_frame = end;
		self.reset_cursor(start);
		self.state = PlayState::Playing;
		self.finished = false;
		debug!("play {}: frames {}..={}", tag.unwrap_or("<all>"), start, end);
		Ok(())
	}

	/// Stops playback, keeping the current position.
	pub fn stop(&mut self) {
		if self.state == PlayState::Playing {
			debug!("stop at frame {}", self.frame_number);
		}
		self.state = PlayState::Stopped;
		self.finished = false;
	}

	/// Resumes playback from the current position.
	pub fn resume(&mut self) {
		if self.state == PlayState::Stopped {
			debug!("resume at frame {}", self.frame_number);
		}
		self.state = PlayState::Playing;
		self.finished = false;
	}

	/// Jumps to `frame_number` and resets the elapsed counters. The play state
	/// is left as is.
	///
	/// # Errors
	///
	/// Returns [`AniError::InvalidFrameNumber`] outside `[1, frame_count]`.
	pub fn seek(&mut self, frame_number: u16) -> Result<(), AniError> {
		self.file.frame(frame_number)?;
		self.reset_cursor(frame_number);
		debug!("seek to frame {frame_number}");
		Ok(())
	}

	fn reset_cursor(&mut self, frame_number: u16) {
		self.frame_number = frame_number;
		self.previous_frame_number = None;
		self.frame_elapsed = 0;
		self.total_elapsed = 0;
		self.finished = false;
	}

	/// Frame that follows `frame_number` within the active range.
	///
	/// Past the end, a looping player wraps to the start of the range and a
	/// one-shot player holds the frame.
	pub fn next_frame(&self, frame_number: u16) -> u16 {
		if frame_number >= self.end_frame {
			match self.loop_type {
				LoopType::Loop => self.start_frame,
				LoopType::OneShot => frame_number,
			}
		} else {
			frame_number + 1
		}
	}

	fn range_len(&self) -> usize {
		usize::from(self.end_frame.saturating_sub(self.start_frame)) + 1
	}

	/// Advances playback by `dt` milliseconds.
	///
	/// `on_trigger` receives `(file, frame_number, trigger_name)` for every
	/// trigger of every frame entered during this call, in order. The first
	/// call after [`Player::play`] or [`Player::seek`] also reports the
	/// triggers of the frame playback starts on. Does nothing while stopped.
	///
	/// A one-shot player stops inside the call that uses up the last frame of
	/// its range; [`Player::is_finished`] reports that until the next call.
	///
	/// # Errors
	///
	/// Fails only if the file cannot resolve a frame of the active range.
	pub fn advance(
		&mut self,
		dt: u32,
		mut on_trigger: impl FnMut(&File<'f>, u16, &str),
	) -> Result<(), AniError> {
		self.finished = false;
		if self.state != PlayState::Playing {
			return Ok(());
		}

		let file: &File<'f> = &self.file;
		let mut fire = |frame_number: u16| -> Result<(), AniError> {
			for trigger in file.triggers(frame_number)? {
				on_trigger(file, frame_number, trigger);
			}
			Ok(())
		};

		if self.previous_frame_number.is_none() {
			fire(self.frame_number)?;
		}
		self.previous_frame_number = Some(self.frame_number);

		self.frame_elapsed = self.frame_elapsed.saturating_add(dt);
		self.total_elapsed += u64::from(dt);

		// Crossings in a row that consumed no time
		let mut idle_crossings = 0;
		loop {
			let duration = u32::from(file.frame(self.frame_number)?.duration);
			if self.frame_elapsed < duration {
				break;
			}
			self.frame_elapsed -= duration;

			if self.loop_type == LoopType::OneShot && self.frame_number >= self.end_frame {
				self.state = PlayState::Stopped;
				self.finished = true;
				debug!("one-shot finished on frame {}", self.frame_number);
				break;
			}

			if duration == 0 {
				idle_crossings += 1;
				if idle_crossings > self.range_len() {
					warn!(
						"frames {}..={} have no duration, dropping {} ms",
						self.start_frame, self.end_frame, self.frame_elapsed
					);
					self.frame_elapsed = 0;
					break;
				}
			} else {
				idle_crossings = 0;
			}

			let next = self.next_frame(self.frame_number);
			trace!("frame {} -> {}", self.frame_number, next);
			self.frame_number = next;
			fire(next)?;

			if !self.frame_skippable {
				self.frame_elapsed = 0;
				break;
			}
		}

		Ok(())
	}

	/// Frames entered by the last [`Player::advance`], oldest first, ending
	/// with the current frame.
	///
	/// Before the first advance after a play or seek, and when the last advance
	/// crossed no boundary, this is just the current frame.
	pub fn crossed_frames(&self) -> CrossedFrames {
		let first = match self.previous_frame_number {
			Some(previous) if previous != self.frame_number => self.next_frame(previous),
			_ => self.frame_number,
		};

		CrossedFrames {
			next: Some(first),
			last: self.frame_number,
			remaining: self.range_len(),
			start_frame: self.start_frame,
			end_frame: self.end_frame,
			loop_type: self.loop_type,
		}
	}

	/// Reports the colliders of every frame entered by the last advance.
	///
	/// `callback` receives each collider in world space with the animation
	/// origin at (`x`, `y`) and the player's flip applied. Does nothing while
	/// stopped, except right after the advance that finished a one-shot: the
	/// frames that advance entered are still reported.
	///
	/// # Errors
	///
	/// Fails only if the file cannot resolve a frame of the active range.
	pub fn check_collision(
		&self,
		x: i32,
		y: i32,
		mut callback: impl FnMut(&File<'f>, &ColliderHit<'_>),
	) -> Result<(), AniError> {
		if !self.is_playing() && !self.finished {
			return Ok(());
		}

		for frame_number in self.crossed_frames() {
			self.file.check_collision(x, y, frame_number, self.flip, &mut callback)?;
		}
		Ok(())
	}

	/// Draws the current frame, or frame 1 while stopped.
	///
	/// # Errors
	///
	/// Fails like [`File::draw`].
	pub fn draw(&self, target: &mut Framebuffer<'_>, x: i32, y: i32) -> Result<(), AniError> {
		let frame_number = if self.is_playing() {
			self.frame_number
		} else {
			1
		};
		self.file.draw(target, x, y, frame_number, self.flip)
	}

	/// The file being played.
	pub fn file(&self) -> &File<'f> {
		&self.file
	}

	/// Returns `true` if the player owns its file.
	pub fn owns_file(&self) -> bool {
		matches!(self.file, Cow::Owned(_))
	}

	/// Current frame number (1-based).
	pub fn frame_number(&self) -> u16 {
		self.frame_number
	}

	/// Frame at the start of the last advance, `None` right after a play or seek.
	pub fn previous_frame_number(&self) -> Option<u16> {
		self.previous_frame_number
	}

	/// First frame of the active range.
	pub fn start_frame(&self) -> u16 {
		self.start_frame
	}

	/// Last frame of the active range (inclusive).
	pub fn end_frame(&self) -> u16 {
		self.end_frame
	}

	/// Milliseconds spent in the current frame.
	pub fn frame_elapsed(&self) -> u32 {
		self.frame_elapsed
	}

	/// Milliseconds played since the last play or seek.
	pub fn total_elapsed(&self) -> u64 {
		self.total_elapsed
	}

	/// Current play state.
	pub fn state(&self) -> PlayState {
		self.state
	}

	/// Returns `true` while playing.
	pub fn is_playing(&self) -> bool {
		self.state == PlayState::Playing
	}

	/// Returns `true` if the last [`Player::advance`] ended one-shot playback.
	pub fn is_finished(&self) -> bool {
		self.finished
	}

	/// Loop policy.
	pub fn loop_type(&self) -> LoopType {
		self.loop_type
	}

	/// Changes the loop policy.
	pub fn set_loop_type(&mut self, loop_type: LoopType) {
		self.loop_type = loop_type;
	}

	/// Frame skipping policy.
	pub fn frame_skippable(&self) -> bool {
		self.frame_skippable
	}

	/// Changes the frame skipping policy.
	pub fn set_frame_skippable(&mut self, frame_skippable: bool) {
		self.frame_skippable = frame_skippable;
	}

	/// Mirroring used by draw and collision queries.
	pub fn flip(&self) -> Flip {
		self.flip
	}

	/// Changes the mirroring used by draw and collision queries.
	pub fn set_flip(&mut self, flip: Flip) {
		self.flip = flip;
	}
}

impl Player<'static> {
	/// Reads an `.ani` file from disk and creates a stopped player owning it.
	///
	/// The file has no bitmap attached, so [`Player::draw`] fails until one is
	/// supplied through [`Player::from_file`] instead.
	///
	/// # Errors
	///
	/// Fails like [`File::open`], or if the file has no frames.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, AniError> {
		let path = path.as_ref();
		let file = File::open(path)?;
		debug!("opened {} for playback", path.display());
		Self::from_file(file, PlayerConfig::default())
	}
}

/// Iterator returned by [`Player::crossed_frames`].
///
/// Bounded by the length of the active range.
#[derive(Debug, Clone)]
pub struct CrossedFrames {
	next: Option<u16>,
	last: u16,
	remaining: usize,
	start_frame: u16,
	end_frame: u16,
	loop_type: LoopType,
}

impl Iterator for CrossedFrames {
	type Item = u16;

	fn next(&mut self) -> Option<u16> {
		let frame = self.next.take()?;
		self.remaining = self.remaining.saturating_sub(1);

		if frame != self.last && self.remaining > 0 {
			self.next = Some(if frame >= self.end_frame {
				match self.loop_type {
					LoopType::Loop => self.start_frame,
					LoopType::OneShot => frame,
				}
			} else {
				frame + 1
			});
		}
		Some(frame)
	}
}
