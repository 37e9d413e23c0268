//! Build directory trees on disk from drawn text outlines.
//!
//! Input is parsed by [`parser::parse`] into a [`tree::Directory`] and written out by
//! [`materialize::materialize`]. [`api::run`] ties both together for the binary.

pub mod api;
pub mod config;
pub mod errors;
pub mod materialize;
pub mod parser;
pub mod preview;
pub mod tree;
