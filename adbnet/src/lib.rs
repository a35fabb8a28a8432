//! adbnet library
//!
//! Network discovery of Android devices in wireless debugging mode, plus streaming
//! execution of debug-bridge commands against them.

pub mod app;
pub mod errors;
pub mod exec;
pub mod facade;
pub mod filesys;
pub mod logs;
pub mod models;
pub mod scanner;
pub mod storage;
pub mod utils;
