//! Color theme for the pacer's presentation layer.
//!
//! A theme is a plain value: callers load it (from config or practice data)
//! and hand it to whatever renders the circle.

use serde::{Deserialize, Serialize};

/// Palette used to draw the pacer.
///
/// Every field falls back to the default palette when absent, so a partial
/// theme deserializes cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Page background.
    pub background_color: String,
    /// Outer circle.
    pub primary_color: String,
    /// Middle ring.
    pub secondary_color: String,
    /// Inner circle.
    pub tertiary_color: String,
    /// Highlights.
    pub accent_color: String,
    /// Overlay text on dark surfaces.
    pub text_primary: String,
    /// Overlay text on light surfaces.
    pub text_secondary: String,
    /// Circle glow.
    pub shadow_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background_color: "#0A0C11".to_string(),
            primary_color: "#004d4d".to_string(),
            secondary_color: "#006666".to_string(),
            tertiary_color: "#008080".to_string(),
            accent_color: "#00cccc".to_string(),
            text_primary: "#e6f3f3".to_string(),
            text_secondary: "#001a1a".to_string(),
            shadow_color: "rgba(0, 204, 204, 0.2)".to_string(),
        }
    }
}

impl Theme {
    /// CSS custom property names paired with their values.
    pub fn properties(&self) -> [(&'static str, &str); 8] {
        [
            ("--background-color", self.background_color.as_str()),
            ("--primary-color", self.primary_color.as_str()),
            ("--secondary-color", self.secondary_color.as_str()),
            ("--tertiary-color", self.tertiary_color.as_str()),
            ("--accent-color", self.accent_color.as_str()),
            ("--text-primary", self.text_primary.as_str()),
            ("--text-secondary", self.text_secondary.as_str()),
            ("--shadow-color", self.shadow_color.as_str()),
        ]
    }

    /// Render the theme as a `:root` block of CSS custom properties.
    pub fn to_css(&self) -> String {
        let mut css = String::from(":root {\n");
        for (name, value) in self.properties() {
            css.push_str(&format!("    {name}: {value};\n"));
        }
        css.push('}');
        css
    }
}
