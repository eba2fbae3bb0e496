//! Named accent tokens.
//!
//! A stored tint is either one of these tokens or a hex string. The token
//! set itself comes from a [`TintCatalog`], so hosts with their own palette
//! can supply one; [`BuiltinTints`] is the standard accent set.

use std::fmt;

use crate::color::Color;

/// Maps named theme tokens to colors.
pub trait TintCatalog: Send + Sync {
    /// The color for `token`, or `None` if the catalog does not define it.
    ///
    /// Matching is exact: `"Indigo"` is not `"indigo"`.
    fn color_of(&self, token: &str) -> Option<Color>;
}

/// The built-in accent tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedTint {
    Blue,
    Indigo,
    Purple,
    Pink,
    Red,
    Orange,
    Yellow,
    Green,
    Mint,
    Teal,
    Cyan,
    Brown,
    Graphite,
}

impl NamedTint {
    /// Every built-in token, in menu order.
    pub const ALL: [NamedTint; 13] = [
        NamedTint::Blue,
        NamedTint::Indigo,
        NamedTint::Purple,
        NamedTint::Pink,
        NamedTint::Red,
        NamedTint::Orange,
        NamedTint::Yellow,
        NamedTint::Green,
        NamedTint::Mint,
        NamedTint::Teal,
        NamedTint::Cyan,
        NamedTint::Brown,
        NamedTint::Graphite,
    ];

    /// The token as stored in preferences.
    pub fn token(self) -> &'static str {
        match self {
            NamedTint::Blue => "blue",
            NamedTint::Indigo => "indigo",
            NamedTint::Purple => "purple",
            NamedTint::Pink => "pink",
            NamedTint::Red => "red",
            NamedTint::Orange => "orange",
            NamedTint::Yellow => "yellow",
            NamedTint::Green => "green",
            NamedTint::Mint => "mint",
            NamedTint::Teal => "teal",
            NamedTint::Cyan => "cyan",
            NamedTint::Brown => "brown",
            NamedTint::Graphite => "graphite",
        }
    }

    /// The color this token stands for.
    pub const fn color(self) -> Color {
        match self {
            NamedTint::Blue => Color::from_rgb8(0x00, 0x7A, 0xFF),
            NamedTint::Indigo => Color::from_rgb8(0x58, 0x56, 0xD6),
            NamedTint::Purple => Color::from_rgb8(0xAF, 0x52, 0xDE),
            NamedTint::Pink => Color::from_rgb8(0xFF, 0x2D, 0x55),
            NamedTint::Red => Color::from_rgb8(0xFF, 0x3B, 0x30),
            NamedTint::Orange => Color::from_rgb8(0xFF, 0x95, 0x00),
            NamedTint::Yellow => Color::from_rgb8(0xFF, 0xCC, 0x00),
            NamedTint::Green => Color::from_rgb8(0x34, 0xC7, 0x59),
            NamedTint::Mint => Color::from_rgb8(0x00, 0xC7, 0xBE),
            NamedTint::Teal => Color::from_rgb8(0x30, 0xB0, 0xC7),
            NamedTint::Cyan => Color::from_rgb8(0x32, 0xAD, 0xE6),
            NamedTint::Brown => Color::from_rgb8(0xA2, 0x84, 0x5E),
            NamedTint::Graphite => Color::from_rgb8(0x8E, 0x8E, 0x93),
        }
    }

    /// Look up a token exactly as stored.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tint| tint.token() == token)
    }
}

impl fmt::Display for NamedTint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Catalog backed by [`NamedTint`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTints;

impl TintCatalog for BuiltinTints {
    fn color_of(&self, token: &str) -> Option<Color> {
        NamedTint::from_token(token).map(NamedTint::color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_token_round_trips() {
        for tint in NamedTint::ALL {
            assert_eq!(NamedTint::from_token(tint.token()), Some(tint));
            assert_eq!(BuiltinTints.color_of(tint.token()), Some(tint.color()));
        }
    }

    #[test]
    fn token_match_is_exact() {
        assert_eq!(BuiltinTints.color_of("Indigo"), None);
        assert_eq!(BuiltinTints.color_of(" indigo"), None);
        assert_eq!(BuiltinTints.color_of("ocean"), None);
    }

    #[test]
    fn tokens_are_not_hex() {
        // A token that also parsed as hex would make resolution order matter.
        for tint in NamedTint::ALL {
            assert!(Color::from_hex(tint.token()).is_none(), "{tint} parses as hex");
        }
    }
}
