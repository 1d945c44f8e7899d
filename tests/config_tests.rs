mod common;
use alldisable::config::ExclusionConfig;
use alldisable::error::AppError;
use alldisable::settings::{ExtensionAdded, Settings};
use common::*;
use std::fs;

/// Tests that a missing config yields the defaults and writes them out.
#[test]
fn test_missing_config_is_initialized_with_defaults() {
    let env = TestEnvironment::new();
    let loaded = ExclusionConfig::load_or_init(&env.config_path());

    assert!(loaded.warning.is_none());
    assert_eq!(loaded.config, ExclusionConfig::defaults());
    assert!(loaded.config.is_extension_excluded(".rs"));
    assert!(!loaded.config.is_extension_excluded(".txt"));

    let on_disk = ExclusionConfig::load(&env.config_path()).unwrap();
    assert_eq!(on_disk, loaded.config);
}

/// Tests that a malformed config degrades to the fallback with a warning.
#[test]
fn test_malformed_config_falls_back() {
    let env = TestEnvironment::new();
    fs::create_dir_all(&env.config_dir).unwrap();
    fs::write(env.config_path(), "{ not json").unwrap();

    let loaded = ExclusionConfig::load_or_init(&env.config_path());

    assert_eq!(loaded.config, ExclusionConfig::fallback());
    assert!(matches!(loaded.warning, Some(AppError::ConfigLoad { .. })));
    // the broken file is left for the user to fix
    assert_eq!(
        fs::read_to_string(env.config_path()).unwrap(),
        "{ not json"
    );
}

/// Tests that partial and hand-edited files load with normalized keys.
#[test]
fn test_partial_config_is_normalized() {
    let env = TestEnvironment::new();
    fs::create_dir_all(&env.config_dir).unwrap();
    fs::write(
        env.config_path(),
        r#"{ "excluded_extensions": { "LOG": true, ".log": false, " .Ini ": false, "": true } }"#,
    )
    .unwrap();

    let config = ExclusionConfig::load(&env.config_path()).unwrap();

    assert!(config.is_extension_excluded(".log"));
    assert!(!config.is_extension_excluded(".ini"));
    assert_eq!(config.excluded_extensions.len(), 2);
    assert!(config.excluded_files.is_empty());
}

/// Tests that saved settings survive a reload.
#[test]
fn test_settings_changes_persist() {
    let env = TestEnvironment::new();
    let settings = Settings::new(env.config_path(), ExclusionConfig::defaults());
    let pinned = env.create_file("pinned.jar", "");

    assert_eq!(settings.add_extension("JAR").unwrap(), ExtensionAdded::Added);
    assert_eq!(
        settings.add_extension(".jar").unwrap(),
        ExtensionAdded::AlreadyPresent
    );
    settings.set_extension_excluded(".txt", true).unwrap();
    assert!(settings.remove_extension("config").unwrap());
    assert!(settings.exclude_file(&pinned).unwrap());

    let reloaded = ExclusionConfig::load(&env.config_path()).unwrap();
    assert_eq!(reloaded, settings.snapshot());
    assert!(reloaded.is_extension_excluded(".jar"));
    assert!(reloaded.is_extension_excluded(".txt"));
    assert!(!reloaded.excluded_extensions.contains_key(".config"));
    assert!(reloaded.is_file_excluded(&pinned));

    assert!(settings.include_file(&pinned).unwrap());
    let reloaded = ExclusionConfig::load(&env.config_path()).unwrap();
    assert!(!reloaded.is_file_excluded(&pinned));
}

/// Tests that invalid extension input is rejected without touching disk.
#[test]
fn test_invalid_extension_is_rejected() {
    let env = TestEnvironment::new();
    let settings = Settings::new(env.config_path(), ExclusionConfig::defaults());

    for raw in ["", ".", "  ", "a/b", "a b"] {
        let err = settings.add_extension(raw).unwrap_err();
        assert!(matches!(err, AppError::InvalidExtension { .. }), "{raw:?}");
    }
    assert!(!env.config_path().exists());
}

/// Tests that an unchanged setting is not rewritten.
#[test]
fn test_noop_change_does_not_write() {
    let env = TestEnvironment::new();
    let settings = Settings::new(env.config_path(), ExclusionConfig::defaults());

    settings.set_extension_excluded(".txt", false).unwrap();
    assert!(!settings.remove_extension(".nope").unwrap());
    assert!(!env.config_path().exists());
}
