//! Core modules: OMDb client, results projection, session state

pub mod omdb;
pub mod projection;
pub mod session;
