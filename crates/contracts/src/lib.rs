//! # Contracts
//!
//! Shared interface contracts for the action graph emitter.
//! All other crates depend on this one; reverse dependencies are prohibited.
//!
//! ## Schema
//! - Record payloads are `analysis_v2` protobuf messages
//! - Every [`RecordKind`] maps to a fixed (field number, label) pair of
//!   [`ActionGraphContainer`]

mod action_graph;
mod error;
mod format;
mod record;
pub mod text_format;

pub use action_graph::*;
pub use error::*;
pub use format::*;
pub use record::{Record, RecordKind};
pub use text_format::TextFormat;
