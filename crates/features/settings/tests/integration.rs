use std::sync::Arc;
use tempfile::TempDir;
use tpad_domain::config::AppConfig;
use tpad_domain::constants::SETTINGS;
use tpad_registry::ServiceRegistry;
use tpad_settings::{Settings, SettingsError};

fn test_config(temp: &TempDir) -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.data_dir = temp.path().to_path_buf();
    config
}

#[tokio::test]
async fn init_opens_the_backing_store() {
    let temp = TempDir::new().unwrap();
    let settings = tpad_settings::init(&test_config(&temp)).await.expect("init");

    assert!(settings.store().is_open());
    assert_eq!(settings.store().store_name(), "settings");
}

#[tokio::test]
async fn settings_round_trip_typed_values() {
    let temp = TempDir::new().unwrap();
    let settings = tpad_settings::init(&test_config(&temp)).await.expect("init");

    settings.set("editor.font_size", &14_u32).await.expect("set");
    settings.set("editor.theme", &"solarized").await.expect("set");

    let size: Option<u32> = settings.get("editor.font_size").await.expect("get");
    let theme: Option<String> = settings.get("editor.theme").await.expect("get");
    assert_eq!(size, Some(14));
    assert_eq!(theme.as_deref(), Some("solarized"));

    settings.remove("editor.theme").await.expect("remove");
    let theme: Option<String> = settings.get("editor.theme").await.expect("get");
    assert!(theme.is_none());
}

#[tokio::test]
async fn unset_setting_resolves_none() {
    let temp = TempDir::new().unwrap();
    let settings = tpad_settings::init(&test_config(&temp)).await.expect("init");

    let value: Option<bool> = settings.get("unknown").await.expect("get");
    assert!(value.is_none());
}

#[tokio::test]
async fn registration_binds_the_registry_handle() {
    let temp = TempDir::new().unwrap();
    let settings = tpad_settings::init(&test_config(&temp)).await.expect("init");
    assert!(settings.registry().is_none(), "unbound before registration");

    let registry = ServiceRegistry::new();
    registry.register(SETTINGS, settings.clone(), false);

    assert!(settings.registry().is_some(), "bound during registration");

    // The registered service resolves and downcasts back to the slice type.
    let resolved = registry.require(SETTINGS).expect("registered");
    let via_registry =
        resolved.as_any().downcast_ref::<Settings>().expect("settings service downcast");
    via_registry.set("resolved.through.registry", &true).await.expect("set");

    let value: Option<bool> = settings.get("resolved.through.registry").await.expect("get");
    assert_eq!(value, Some(true));
}

#[tokio::test]
async fn settings_survive_reinitialization() {
    let temp = TempDir::new().unwrap();
    let config = test_config(&temp);

    {
        let settings = tpad_settings::init(&config).await.expect("init");
        settings.set("workspace.last", &"/home/ada").await.expect("set");
        settings.store().close().await;
    }

    let settings = tpad_settings::init(&config).await.expect("re-init");
    let value: Option<String> = settings.get("workspace.last").await.expect("get");
    assert_eq!(value.as_deref(), Some("/home/ada"));
}

#[tokio::test]
async fn misconfigured_store_surfaces_a_typed_error() {
    let temp = TempDir::new().unwrap();
    let mut config = test_config(&temp);
    config.storage.schema_version = 0;

    let err = tpad_settings::init(&config).await.expect_err("version 0 must fail");
    assert!(matches!(err, SettingsError::Store { .. }));
}

#[tokio::test]
async fn settings_handle_is_shareable_across_tasks() {
    let temp = TempDir::new().unwrap();
    let settings: Arc<Settings> = tpad_settings::init(&test_config(&temp)).await.expect("init");

    let writer = settings.clone();
    let task = tokio::spawn(async move { writer.set("shared.flag", &true).await });
    task.await.expect("join").expect("set");

    let value: Option<bool> = settings.get("shared.flag").await.expect("get");
    assert_eq!(value, Some(true));
}
