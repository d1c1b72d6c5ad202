//! Core types and utilities for the meta-model compiler.
//!
//! This crate provides the validated identifier, node identities, source
//! positions and the diagnostic tree shared by all compiler stages.

pub mod error;
pub mod identifier;
pub mod node;
pub mod span;

pub use error::{Error, Errors, Result};
pub use identifier::Identifier;
pub use node::NodeId;
pub use span::{LineIndex, Location, NoPositions, PositionResolver, PositionTable, Span};
