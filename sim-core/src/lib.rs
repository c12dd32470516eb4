//! Core stochastic branching growth simulation library.
//!
//! Main components:
//! - [`config`] — immutable run configuration and named presets.
//! - [`tree`] — growth nodes and the arena they live in.
//! - [`engine`] — the active/frontier population and the per-step growth rules.
//! - [`types`] — shared type aliases and IDs.

pub mod config;
pub mod engine;
pub mod tree;
pub mod types;
