//! CLI subcommand implementations.

pub mod map;
pub mod seed;
