use palette::{Srgb, Srgba, WithAlpha};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeColors {
    /// Tint of the entry that would launch on release.
    pub selected: Srgba<f64>,
    pub target: Srgba<f64>,
    /// Tint of the action target under the finger.
    pub target_hovered: Srgba<f64>,
    /// Disc drawn for entries without an icon.
    pub placeholder: Srgba<f64>,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            selected: Srgba::new(1.0, 0.0, 0.0, 1.0),
            target: Srgba::new(1.0, 1.0, 1.0, 0.9),
            target_hovered: Srgba::new(1.0, 0.0, 0.0, 1.0),
            placeholder: Srgba::new(0.15, 0.15, 0.15, 0.5),
        }
    }
}

impl ThemeColors {
    /// Overrides the highlight tints with `#rrggbb` colors, keeping the
    /// defaults for anything missing or malformed.
    pub fn with_highlights(self, selected: Option<&str>, target_hovered: Option<&str>) -> Self {
        Self {
            selected: Self::lookup_color(selected, self.selected),
            target_hovered: Self::lookup_color(target_hovered, self.target_hovered),
            ..self
        }
    }

    fn lookup_color(hex: Option<&str>, fallback: Srgba<f64>) -> Srgba<f64> {
        hex.and_then(|h| match Srgb::<u8>::from_str(h) {
            Ok(c) => Some(c.into_format::<f64>().with_alpha(fallback.alpha)),
            Err(e) => {
                log::warn!("Ignoring color '{}': {}", h, e);
                None
            }
        })
        .unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_overrides() {
        let colors = ThemeColors::default().with_highlights(Some("#00ff00"), Some("nonsense"));

        assert_eq!(colors.selected, Srgba::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(colors.target_hovered, ThemeColors::default().target_hovered);
        assert_eq!(colors.target, ThemeColors::default().target);
    }
}
