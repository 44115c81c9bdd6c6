//! # Story Data
//!
//! The read-only story collaborator of the flowchart engine. A story day is
//! split into named time periods ("tabs"); each period holds its nodes (story
//! beats) and the directed connections between them, some of which are gated
//! behind narrative flags.
//!
//! This crate owns the data model and loading. It contains no gating or
//! rendering logic.

pub mod error;
pub mod flags;
pub mod graph;
pub mod library;

pub use error::*;
pub use flags::*;
pub use graph::*;
pub use library::*;
