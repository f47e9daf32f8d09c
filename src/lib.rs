//! reel-search library
//!
//! Movie search, result projection and favorites for the reel-search CLI.

pub mod core;
pub mod error;
pub mod storage;
pub mod types;
pub mod ui;
pub mod utils;
