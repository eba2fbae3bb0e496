//! Integration tests for tint resolution and the tint channel.

use std::sync::Arc;

use huebridge_style::prelude::*;
use huebridge_style::{TintSource, BASELINE_TINT, DEFAULT_FALLBACK_TINT};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct StoredPreference {
    tint: String,
    scheme: SchemePreference,
}

#[derive(Debug, Deserialize)]
struct Palette {
    accent: Color,
    scheme: ColorScheme,
}

#[test]
fn every_builtin_token_round_trips_through_hex() {
    let resolver = ThemeResolver::builtin();
    for tint in NamedTint::ALL {
        let hex = tint.color().to_hex();
        assert_eq!(resolver.tint_source(&hex), TintSource::Hex(tint.color()), "{tint}");
        assert_eq!(resolver.resolve_color(&hex), resolver.resolve_color(tint.token()));
    }
}

#[test]
fn resolver_is_total_on_odd_input() {
    let resolver = ThemeResolver::builtin();
    let inputs = [
        "", " ", "#", "##FF0000", "#FF00", "#FF0000FF00", "FF0000 ", "#ÿÿÿÿÿÿ", "#ééé", "🎨🎨🎨",
        "INDIGO", "null",
    ];
    for raw in inputs {
        let theme = resolver.resolve(raw, SchemePreference::System, ColorScheme::Dark);
        assert_eq!(theme.scheme, ColorScheme::Dark);
        assert_eq!(theme.color, DEFAULT_FALLBACK_TINT, "input {raw:?}");
    }
}

#[test]
fn hex_with_alpha_and_without_hash() {
    let resolver = ThemeResolver::builtin();
    assert_eq!(resolver.resolve_color("FF0000"), Color::RED);
    assert_eq!(
        resolver.resolve_color("#FF000080"),
        Color::from_rgba8(0xFF, 0x00, 0x00, 0x80)
    );
}

#[test]
fn preference_from_toml() {
    let stored: StoredPreference = toml::from_str(
        r#"
        tint = "graphite"
        scheme = "dark"
        "#,
    )
    .unwrap();

    let theme = ThemeResolver::builtin().resolve(&stored.tint, stored.scheme, ColorScheme::Light);
    assert_eq!(theme, ResolvedTheme::new(NamedTint::Graphite.color(), ColorScheme::Dark));
}

#[test]
fn colors_deserialize_from_hex_strings() {
    let palette: Palette = toml::from_str(
        r##"
        accent = "#34C759"
        scheme = "light"
        "##,
    )
    .unwrap();
    assert_eq!(palette.accent, NamedTint::Green.color());
    assert_eq!(palette.scheme, ColorScheme::Light);

    assert!(toml::from_str::<Palette>("accent = \"green\"\nscheme = \"light\"").is_err());
}

#[test]
fn environment_feeds_style_root_consumers() {
    let environment = TintEnvironment::new();
    let root = Arc::new(StyleRoot::new());
    let reader = environment.reader();

    assert_eq!(reader.get(), BASELINE_TINT);
    assert_eq!(root.tint(), BASELINE_TINT);

    let theme = ThemeResolver::builtin().resolve("purple", SchemePreference::Dark, ColorScheme::Light);
    root.apply_theme(&theme);
    environment.set(theme.color);

    assert_eq!(reader.get(), root.tint());
    assert_eq!(root.scheme(), ColorScheme::Dark);
}
