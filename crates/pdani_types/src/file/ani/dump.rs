//! Human-readable listing of a decoded file.
//!
//! The layout is informational and may change between versions.

use std::fmt;

use log::info;

use super::File;
use super::chunk::ChunkType;

/// Display adapter returned by [`File::dump`].
pub struct Dump<'f> {
	file: &'f File<'f>,
}

impl fmt::Display for Dump<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let file = self.file;
		let header = file.header();
		writeln!(
			f,
			"file: {} version: {} size: {} bytes",
			String::from_utf8_lossy(&header.id),
			header.version,
			file.as_bytes().len()
		)?;

		for chunk in file.chunks() {
			writeln!(f, "{chunk}")?;
			match chunk.kind {
				ChunkType::Info => {
					let info = file.info();
					writeln!(
						f,
						"  width: {} height: {} total frames: {}",
						info.width, info.height, info.total_frames
					)?;
				}
				ChunkType::Tag => {
					for (index, tag) in file.tags().unwrap_or_default().iter().enumerate() {
						writeln!(
							f,
							"  tag {index}: \"{}\" frames {}..={}",
							file.resolve(tag.name),
							tag.from,
							tag.to
						)?;
					}
				}
				ChunkType::Layer => {
					for (index, layer) in file.layers().unwrap_or_default().iter().enumerate() {
						writeln!(
							f,
							"  layer {index}: {} \"{}\" parent: {} children: {}",
							layer.kind,
							file.resolve(layer.name),
							layer.parent,
							layer.layer_count
						)?;
					}
				}
				ChunkType::Frame => {
					let count = file.frame_count().unwrap_or_default();
					for number in 1..=count {
						let Ok(frame) = file.frame(number as u16) else {
							break;
						};
						writeln!(f, "  frame {number}: {} ms", frame.duration)?;
						for slot in file.frame_slots(frame) {
							write!(f, "    slot: {}", slot.slot)?;
							if let Some(trigger) = file.trigger_name(&slot) {
								write!(f, " trigger: \"{trigger}\"")?;
							}
							writeln!(f)?;
						}
					}
				}
				ChunkType::Cel => {
					for (index, cel) in file.cels().unwrap_or_default().iter().enumerate() {
						writeln!(f, "  cel {index}: image {} at ({}, {})", cel.image, cel.x, cel.y)?;
					}
				}
				ChunkType::Collider => {
					for (index, collider) in file.colliders_table().unwrap_or_default().iter().enumerate()
					{
						writeln!(
							f,
							"  collider {index}: ({}, {}) {}x{}",
							collider.x, collider.y, collider.w, collider.h
						)?;
					}
				}
				ChunkType::Image => {
					for (index, image) in file.images().unwrap_or_default().iter().enumerate() {
						writeln!(
							f,
							"  image {index}: ({}, {}) {}x{}",
							image.u, image.v, image.w, image.h
						)?;
					}
				}
				ChunkType::String => {
					writeln!(f, "  {} bytes", file.string_table().len())?;
				}
			}
		}

		Ok(())
	}
}

impl File<'_> {
	/// Returns a display adapter listing every chunk header and its records.
	pub fn dump(&self) -> Dump<'_> {
		Dump {
			file: self,
		}
	}

	/// Emits [`File::dump`] line by line at `info` level.
	pub fn log_dump(&self) {
		for line in self.dump().to_string().lines() {
			info!("{line}");
		}
	}
}
