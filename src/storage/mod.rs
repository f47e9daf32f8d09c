//! Storage modules: config, key-value store, favorites

pub mod config;
pub mod favorites;
pub mod kv;
