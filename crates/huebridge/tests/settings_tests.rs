//! Integration tests for settings persistence.

use std::sync::Arc;

use huebridge::file::{Settings, SettingsFormat, SettingsValue};
use huebridge::{Error, PreferenceSource, SchemePreference, SettingsPreferences};

#[test]
fn toml_file_is_nested_by_group() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");

    let settings = Settings::new();
    settings.set("appearance.tint", "indigo");
    settings.set("appearance.color_scheme", "dark");
    settings.save_toml(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("[appearance]"), "{text}");
    assert!(text.contains(r#"tint = "indigo""#), "{text}");

    let loaded = Settings::load(&path).unwrap();
    assert_eq!(loaded.get_str("appearance.tint").as_deref(), Some("indigo"));
    assert_eq!(loaded.get_str("appearance.color_scheme").as_deref(), Some("dark"));
}

#[test]
fn json_keeps_value_types() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let settings = Settings::new();
    settings.set("appearance.tint", "#30B0C7");
    settings.set("window.width", 1280_i64);
    settings.set("window.scale", 1.5_f64);
    settings.set("window.maximized", false);
    settings.save_json(&path).unwrap();

    let loaded = Settings::load_json(&path).unwrap();
    assert_eq!(loaded.get_integer("window.width"), Some(1280));
    assert_eq!(loaded.get_raw("window.scale"), Some(SettingsValue::Float(1.5)));
    assert_eq!(loaded.get_bool("window.maximized"), Some(false));
    assert_eq!(loaded.group_keys("window").len(), 3);
}

#[test]
fn handwritten_toml_feeds_preferences() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.toml");
    std::fs::write(
        &path,
        r#"
[appearance]
tint = "mint"
color_scheme = "Light"
"#,
    )
    .unwrap();

    let prefs = SettingsPreferences::new(Arc::new(Settings::load(&path).unwrap()));
    assert_eq!(prefs.tint_raw(), "mint");
    assert_eq!(prefs.scheme_preference(), SchemePreference::Light);
}

#[test]
fn auto_save_writes_on_change() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.toml");

    let settings = Settings::new();
    settings.set_auto_save(&path, SettingsFormat::Toml);
    assert!(settings.is_auto_save_enabled());

    settings.set("appearance.tint", "pink");
    let loaded = Settings::load_toml(&path).unwrap();
    assert_eq!(loaded.get_str("appearance.tint").as_deref(), Some("pink"));

    settings.disable_auto_save();
    settings.set("appearance.tint", "brown");
    let loaded = Settings::load_toml(&path).unwrap();
    assert_eq!(loaded.get_str("appearance.tint").as_deref(), Some("pink"));
}

#[test]
fn sync_without_auto_save_is_noop() {
    Settings::new().sync().unwrap();
}

#[test]
fn load_errors_are_typed() {
    let dir = tempfile::tempdir().unwrap();

    let missing = Settings::load_toml(dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(missing, Error::Io { .. }));

    let bad_toml = dir.path().join("bad.toml");
    std::fs::write(&bad_toml, "appearance = [").unwrap();
    assert!(matches!(
        Settings::load(&bad_toml).unwrap_err(),
        Error::TomlParse { path: Some(_), .. }
    ));

    let bad_json = dir.path().join("bad.json");
    std::fs::write(&bad_json, "{ not json").unwrap();
    let err = Settings::load(&bad_json).unwrap_err();
    assert!(matches!(err, Error::Json { .. }));
    assert!(err.to_string().contains("bad.json"));
}
