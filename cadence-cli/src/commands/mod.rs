//! CLI command implementations.

pub mod render;
pub mod run;
pub mod theme;
