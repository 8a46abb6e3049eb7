//! Common utilities for the Kestrel parsers.
//!
//! This crate provides shared infrastructure used by all parser components:
//! - **Warning System** - colored terminal output for tolerated input problems

pub mod warning;
