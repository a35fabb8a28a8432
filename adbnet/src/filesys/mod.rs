//! Async file-system helpers used by the JSON stores

pub mod dir;
pub mod file;
