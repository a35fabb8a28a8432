//! Saved custom commands

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AdbNetError;
use crate::filesys::file::File;

/// A command the user saved for reuse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedCommand {
    pub id: String,

    /// Full invocation, e.g. `adb shell pm list packages`
    pub command: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl SavedCommand {
    pub fn new(command: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            command: command.into(),
            description: description.into(),
            created_at: Utc::now(),
        }
    }
}

/// Commands seeded on first run
pub fn default_commands() -> Vec<SavedCommand> {
    vec![
        SavedCommand::new("adb shell pm list packages", "List installed packages"),
        SavedCommand::new("adb shell dumpsys battery", "Show battery status"),
        SavedCommand::new(
            "adb shell settings get global airplane_mode_on",
            "Read airplane mode state",
        ),
        SavedCommand::new(
            "adb shell am start -a android.intent.action.MAIN -c android.intent.category.HOME",
            "Go to the home screen",
        ),
        SavedCommand::new("adb shell screencap -p /sdcard/screen.png", "Save a screenshot on the device"),
    ]
}

/// Saved commands backed by a JSON file
#[derive(Debug)]
pub struct CommandStore {
    file: File,
    commands: Vec<SavedCommand>,
}

impl CommandStore {
    /// Load the store, seeding and persisting the defaults when the file is absent.
    pub async fn load(file: File) -> Result<Self, AdbNetError> {
        let commands = match file.read_json_opt::<Vec<SavedCommand>>().await? {
            Some(commands) => {
                debug!("Loaded {} saved commands", commands.len());
                commands
            }
            None => {
                let defaults = default_commands();
                file.write_json(&defaults).await?;
                info!("Seeded {} default commands", defaults.len());
                defaults
            }
        };
        Ok(Self { file, commands })
    }

    pub fn all(&self) -> &[SavedCommand] {
        &self.commands
    }

    pub fn get(&self, id: &str) -> Option<&SavedCommand> {
        self.commands.iter().find(|c| c.id == id)
    }

    pub async fn add(
        &mut self,
        command: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<SavedCommand, AdbNetError> {
        let command = command.into();
        if command.trim().is_empty() {
            return Err(AdbNetError::ValidationError("command must not be empty".into()));
        }
        let saved = SavedCommand::new(command, description);
        self.commands.push(saved.clone());
        self.file.write_json(&self.commands).await?;
        Ok(saved)
    }

    /// Remove a command by id, returning whether anything was removed.
    pub async fn remove(&mut self, id: &str) -> Result<bool, AdbNetError> {
        let before = self.commands.len();
        self.commands.retain(|c| c.id != id);
        if self.commands.len() == before {
            return Ok(false);
        }
        self.file.write_json(&self.commands).await?;
        Ok(true)
    }
}
