//! Key events sent with `input keyevent`
//!
//! The store merges a fixed set of predefined Android key codes with keys the user
//! added. Only the user's keys are persisted.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AdbNetError;
use crate::filesys::file::File;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub id: String,
    pub name: String,
    /// Android `KeyEvent` code
    pub key_code: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_custom: bool,
}

impl KeyEvent {
    fn predefined(name: &str, key_code: u32, description: &str) -> Self {
        Self {
            id: format!("builtin-{}", key_code),
            name: name.to_string(),
            key_code,
            description: description.to_string(),
            is_custom: false,
        }
    }
}

pub fn predefined_keys() -> Vec<KeyEvent> {
    [
        ("HOME", 3, "Home"),
        ("BACK", 4, "Back"),
        ("MENU", 82, "Menu"),
        ("POWER", 26, "Power"),
        ("VOLUME UP", 24, "Volume up"),
        ("VOLUME DOWN", 25, "Volume down"),
        ("MUTE", 164, "Mute"),
        ("ENTER", 66, "Enter"),
        ("DPAD UP", 19, "D-pad up"),
        ("DPAD DOWN", 20, "D-pad down"),
        ("DPAD LEFT", 21, "D-pad left"),
        ("DPAD RIGHT", 22, "D-pad right"),
        ("DPAD CENTER", 23, "D-pad center"),
        ("CAMERA", 27, "Camera"),
        ("SEARCH", 84, "Search"),
        ("APP SWITCH", 187, "Recent apps"),
        ("BRIGHTNESS UP", 221, "Brightness up"),
        ("BRIGHTNESS DOWN", 220, "Brightness down"),
        ("PLAY", 126, "Media play"),
        ("PAUSE", 127, "Media pause"),
        ("MEDIA NEXT", 87, "Next track"),
        ("MEDIA PREVIOUS", 88, "Previous track"),
        ("MEDIA STOP", 86, "Media stop"),
    ]
    .into_iter()
    .map(|(name, code, desc)| KeyEvent::predefined(name, code, desc))
    .collect()
}

#[derive(Debug)]
pub struct KeyEventStore {
    file: File,
    keys: Vec<KeyEvent>,
}

impl KeyEventStore {
    pub async fn load(file: File) -> Result<Self, AdbNetError> {
        let custom: Vec<KeyEvent> = file.read_json_opt().await?.unwrap_or_default();
        debug!("Loaded {} custom keys", custom.len());

        let mut keys = predefined_keys();
        keys.extend(custom.into_iter().map(|k| KeyEvent { is_custom: true, ..k }));
        Ok(Self { file, keys })
    }

    pub fn all(&self) -> &[KeyEvent] {
        &self.keys
    }

    /// Find a key by id, by name (case-insensitive) or by numeric code.
    pub fn find(&self, query: &str) -> Option<&KeyEvent> {
        let query = query.trim();
        self.keys
            .iter()
            .find(|k| k.id == query || k.name.eq_ignore_ascii_case(query))
            .or_else(|| {
                let code: u32 = query.parse().ok()?;
                self.keys.iter().find(|k| k.key_code == code)
            })
    }

    pub async fn add_custom(
        &mut self,
        name: impl Into<String>,
        key_code: u32,
        description: impl Into<String>,
    ) -> Result<KeyEvent, AdbNetError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AdbNetError::ValidationError("key name must not be empty".into()));
        }
        let key = KeyEvent {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            key_code,
            description: description.into(),
            is_custom: true,
        };
        self.keys.push(key.clone());
        self.persist().await?;
        Ok(key)
    }

    /// Remove a custom key. Predefined keys are never removed.
    pub async fn remove(&mut self, id: &str) -> Result<bool, AdbNetError> {
        let before = self.keys.len();
        self.keys.retain(|k| k.id != id || !k.is_custom);
        if self.keys.len() == before {
            return Ok(false);
        }
        self.persist().await?;
        Ok(true)
    }

    async fn persist(&self) -> Result<(), AdbNetError> {
        let custom: Vec<&KeyEvent> = self.keys.iter().filter(|k| k.is_custom).collect();
        self.file.write_json(&custom).await
    }
}
