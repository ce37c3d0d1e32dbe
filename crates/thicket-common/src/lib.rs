//! Common utilities for the thicket HTML parser.
//!
//! This crate provides shared infrastructure used by the parser crates and the CLI:
//! - **Warning System** - de-duplicated warnings for unsupported features
//! - **Positions** - mapping byte offsets to line/column pairs for diagnostics

pub mod position;
pub mod warning;
