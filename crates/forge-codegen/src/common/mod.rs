//! Shared building blocks for emitters.

pub mod cpp;
pub mod types;
