//! Integration tests for adbnet

mod test_facade;
mod test_port;
mod test_runner;
mod test_storage;
