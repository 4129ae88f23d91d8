#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `pdani-rs` reads compact 1-bit `.ani` animations, plays them back with
//! tag ranges, loop policies and frame triggers, and composites their cels
//! onto a 1bpp framebuffer with mirroring and clipping.
//!
pub use pdani_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use pdani_dylib;
