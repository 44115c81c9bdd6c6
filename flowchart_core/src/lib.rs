//! # Flowchart Core
//!
//! The engine behind the branching narrative diagram. It consumes the
//! read-only story from `story_data`, decides which nodes and connections are
//! reachable under the flags gathered so far, and keeps the connector lines
//! in step with the live layout of the page.
//!
//! ## Core Components
//!
//! - **gating**: locked nodes and visible connections for a flag set
//! - **geometry**: anchor points between two rendered node boxes
//! - **path**: connector path descriptions under a pluggable routing style
//! - **scheduler**: one-shot and time-boxed redraw loops, at most one active
//! - **view**: the controller owning active tab, open nodes and flags
//! - **surface**: the drawing surface contract and an SVG implementation
//!
//! ## Design Philosophy
//!
//! - **Recompute, never cache**: every redraw pass re-runs gating and rebuilds
//!   every path from scratch
//! - **Degrade, never fail**: a missing element means "draw nothing"
//! - **Host-driven**: frames, timers and layout are collaborators behind traits

pub mod config;
pub mod error;
pub mod events;
pub mod gating;
pub mod geometry;
pub mod path;
pub mod scheduler;
pub mod surface;
pub mod view;

pub use config::*;
pub use error::*;
pub use events::*;
pub use gating::*;
pub use geometry::*;
pub use path::*;
pub use scheduler::*;
pub use surface::*;
pub use view::*;
