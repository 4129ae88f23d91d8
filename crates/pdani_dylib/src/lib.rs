//! Dynamic linking shim for `pdani-rs`.
//!
//! Enabling the `dynamic_linking` feature on the root crate links this dylib so that
//! incremental rebuilds of downstream tools only relink the engine.

#![allow(unused_imports)]

pub use pdani_internal::*;
