//! CLI command implementations.

pub mod hex_utils;
pub mod parse;
pub mod scan;
pub mod signatures;
