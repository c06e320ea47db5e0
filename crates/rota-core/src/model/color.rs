// ── Event color palettes ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::event::EventType;

/// Palette used to tint events by type.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ColorScheme {
    #[default]
    Default,
    HighContrast,
}

impl ColorScheme {
    /// Hex color (`#rrggbb`) for events of `event_type`.
    pub fn color_for(self, event_type: EventType) -> &'static str {
        match self {
            Self::Default => match event_type {
                EventType::Assignment => "#3b82f6",
                EventType::Leave => "#22c55e",
                EventType::Duty => "#f59e0b",
                EventType::OnCall => "#ef4444",
                EventType::Training => "#8b5cf6",
                EventType::Meeting => "#06b6d4",
                EventType::Holiday => "#ec4899",
                EventType::Other => "#6b7280",
            },
            Self::HighContrast => match event_type {
                EventType::Assignment => "#0033cc",
                EventType::Leave => "#006600",
                EventType::Duty => "#b35900",
                EventType::OnCall => "#cc0000",
                EventType::Training => "#5c00b3",
                EventType::Meeting => "#006b80",
                EventType::Holiday => "#99004d",
                EventType::Other => "#000000",
            },
        }
    }

    /// `(r, g, b)` components of [`color_for`](Self::color_for).
    pub fn rgb_for(self, event_type: EventType) -> (u8, u8, u8) {
        let hex = self.color_for(event_type).trim_start_matches('#');
        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .unwrap_or(0)
        };
        (channel(0), channel(2), channel(4))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_type_has_a_distinct_color() {
        for scheme in [ColorScheme::Default, ColorScheme::HighContrast] {
            let mut seen: Vec<&str> = EventType::iter().map(|t| scheme.color_for(t)).collect();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), 8);
        }
    }

    #[test]
    fn rgb_parses_hex() {
        assert_eq!(
            ColorScheme::Default.rgb_for(EventType::Assignment),
            (0x3b, 0x82, 0xf6)
        );
    }
}
