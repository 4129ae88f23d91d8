//! Lock-step walk over the layer table and one frame's slots.
//!
//! The frame record stores slots for `L` and `C` layers only, in layer order.
//! Group entries are yielded without a slot and do not advance the slot
//! cursor; every traversal that needs per-layer frame data goes through here.

use std::iter::Enumerate;
use std::slice::Iter;

use crate::file::AniError;

use super::File;
use super::constants;
use super::records::{FrameLayer, FrameSlot, Layer, LayerType};

/// One layer paired with its slot in a given frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerEntry<'f> {
	/// Position in the layer table
	pub index: usize,
	/// Declared layer
	pub layer: &'f Layer,
	/// Slot for this frame, `None` for groups
	pub frame_layer: Option<FrameLayer>,
}

impl LayerEntry<'_> {
	/// Slot with its meaning resolved from the layer type.
	pub fn slot(&self) -> FrameSlot {
		let index = self.frame_layer.as_ref().and_then(FrameLayer::index);
		match self.layer.kind {
			LayerType::Group => FrameSlot::Group,
			LayerType::Layer => FrameSlot::Cel(index),
			LayerType::Collider => FrameSlot::Collider(index),
		}
	}
}

/// Slots of one frame record, decoded from the file buffer as they are walked.
///
/// Returned by [`File::frame_slots`].
#[derive(Debug, Clone)]
pub struct FrameSlots<'f> {
	file: &'f File<'f>,
	at: usize,
	remaining: usize,
}

impl<'f> FrameSlots<'f> {
	pub(crate) fn new(file: &'f File<'f>, at: usize, remaining: usize) -> Self {
		Self {
			file,
			at,
			remaining,
		}
	}
}

impl Iterator for FrameSlots<'_> {
	type Item = FrameLayer;

	fn next(&mut self) -> Option<FrameLayer> {
		if self.remaining == 0 {
			return None;
		}
		// Records were bounds checked at decode time
		let Some(slot) = self.file.read_slot(self.at) else {
			self.remaining = 0;
			return None;
		};
		self.at += constants::FRAME_LAYER_RECORD_SIZE;
		self.remaining -= 1;
		Some(slot)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.remaining, Some(self.remaining))
	}
}

impl ExactSizeIterator for FrameSlots<'_> {}

/// Iterator over the layers of one frame, in declaration order.
///
/// Built fresh by [`File::frame_layers`] for every traversal.
#[derive(Debug, Clone)]
pub struct FrameLayers<'f> {
	layers: Enumerate<Iter<'f, Layer>>,
	slots: FrameSlots<'f>,
}

impl<'f> Iterator for FrameLayers<'f> {
	type Item = LayerEntry<'f>;

	fn next(&mut self) -> Option<Self::Item> {
		let (index, layer) = self.layers.next()?;
		let frame_layer = if layer.kind.has_frame_slot() {
			self.slots.next()
		} else {
			None
		};

		Some(LayerEntry {
			index,
			layer,
			frame_layer,
		})
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.layers.size_hint()
	}
}

impl ExactSizeIterator for FrameLayers<'_> {}

impl File<'_> {
	/// Pairs every declared layer with its slot in frame `frame_number`.
	///
	/// # Errors
	///
	/// Fails like [`File::frame`] for a missing `FRAM` chunk or a frame number
	/// outside `[1, frame_count]`.
	pub fn frame_layers(&self, frame_number: u16) -> Result<FrameLayers<'_>, AniError> {
		let frame = self.frame(frame_number)?;
		Ok(FrameLayers {
			layers: self.layers_or_empty().iter().enumerate(),
			slots: self.frame_slots(frame),
		})
	}

	/// Trigger names attached to frame `frame_number`, in layer order.
	///
	/// # Errors
	///
	/// Fails like [`File::frame`].
	pub fn triggers(&self, frame_number: u16) -> Result<impl Iterator<Item = &str> + '_, AniError> {
		Ok(self
			.frame_layers(frame_number)?
			.filter_map(|entry| entry.frame_layer.filter(FrameLayer::has_trigger))
			.filter_map(|slot| self.trigger_name(&slot)))
	}
}
