//! Settings, command store and key store tests

use adbnet::errors::AdbNetError;
use adbnet::storage::commands::{default_commands, CommandStore};
use adbnet::storage::keys::{predefined_keys, KeyEventStore};
use adbnet::storage::layout::StorageLayout;
use adbnet::storage::settings::Settings;
use tokio_test::{assert_err, assert_ok};

fn layout() -> (tempfile::TempDir, StorageLayout) {
    let dir = tempfile::tempdir().unwrap();
    let layout = StorageLayout::new(dir.path().join("adbnet"));
    (dir, layout)
}

#[tokio::test]
async fn test_settings_default_when_missing() {
    let (_dir, layout) = layout();
    let settings = assert_ok!(Settings::load(&layout.settings_file()).await);
    assert_eq!(settings, Settings::default());
    assert!(!layout.settings_file().exists().await);
}

#[tokio::test]
async fn test_settings_round_trip() {
    let (_dir, layout) = layout();
    let mut settings = Settings::default();
    settings.tool_path = "/opt/android/platform-tools/adb".into();
    settings.device_port = 5037;
    settings.scan.concurrency = 32;

    assert_ok!(settings.save(&layout.settings_file()).await);
    let loaded = assert_ok!(Settings::load(&layout.settings_file()).await);
    assert_eq!(loaded, settings);
}

#[tokio::test]
async fn test_invalid_settings_are_rejected() {
    let (_dir, layout) = layout();
    let mut settings = Settings::default();
    settings.device_port = 0;
    let err = assert_err!(settings.save(&layout.settings_file()).await);
    assert!(matches!(err, AdbNetError::ValidationError(_)));
}

#[tokio::test]
async fn test_command_store_seeds_defaults() {
    let (_dir, layout) = layout();
    let store = assert_ok!(CommandStore::load(layout.commands_file()).await);
    assert_eq!(store.all().len(), default_commands().len());
    assert!(layout.commands_file().exists().await);

    let reloaded = assert_ok!(CommandStore::load(layout.commands_file()).await);
    assert_eq!(reloaded.all(), store.all());
}

#[tokio::test]
async fn test_command_store_add_and_remove() {
    let (_dir, layout) = layout();
    let mut store = assert_ok!(CommandStore::load(layout.commands_file()).await);
    let saved = assert_ok!(store.add("adb shell getprop ro.product.model", "Model name").await);
    assert_err!(store.add("   ", "").await);

    let reloaded = assert_ok!(CommandStore::load(layout.commands_file()).await);
    assert_eq!(reloaded.get(&saved.id), Some(&saved));

    assert!(assert_ok!(store.remove(&saved.id).await));
    assert!(!assert_ok!(store.remove(&saved.id).await));
    let reloaded = assert_ok!(CommandStore::load(layout.commands_file()).await);
    assert!(reloaded.get(&saved.id).is_none());
}

#[tokio::test]
async fn test_key_store_lookup() {
    let (_dir, layout) = layout();
    let store = assert_ok!(KeyEventStore::load(layout.custom_keys_file()).await);
    assert_eq!(store.all().len(), predefined_keys().len());

    assert_eq!(store.find("home").map(|k| k.key_code), Some(3));
    assert_eq!(store.find("26").map(|k| k.name.as_str()), Some("POWER"));
    assert_eq!(store.find("builtin-4").map(|k| k.key_code), Some(4));
    assert!(store.find("no such key").is_none());
}

#[tokio::test]
async fn test_key_store_custom_keys_persist() {
    let (_dir, layout) = layout();
    let mut store = assert_ok!(KeyEventStore::load(layout.custom_keys_file()).await);
    let key = assert_ok!(store.add_custom("NOTIFICATIONS", 83, "Open notifications").await);

    let reloaded = assert_ok!(KeyEventStore::load(layout.custom_keys_file()).await);
    assert_eq!(reloaded.all().len(), predefined_keys().len() + 1);
    assert_eq!(reloaded.find("notifications").map(|k| k.is_custom), Some(true));

    // Predefined keys cannot be removed.
    assert!(!assert_ok!(store.remove("builtin-3").await));
    assert!(assert_ok!(store.remove(&key.id).await));

    let reloaded = assert_ok!(KeyEventStore::load(layout.custom_keys_file()).await);
    assert_eq!(reloaded.all().len(), predefined_keys().len());
}
