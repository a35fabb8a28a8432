//! Persisted collaborators: settings, saved commands and key events

pub mod commands;
pub mod keys;
pub mod layout;
pub mod settings;
