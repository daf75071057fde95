//! CSS color values for fills and strokes.
//!
//! [`Color`] wraps `DynamicColor` from the color crate. Category palettes
//! and stroke defaults arrive as CSS strings from configuration; parsing
//! happens once, on access, and a parse failure names the offending
//! string so the shell can report it.

use std::str::FromStr;

use color::DynamicColor;

/// A parsed CSS color, used for element fills and strokes.
///
/// # Examples
///
/// ```
/// use scrawl_core::color::Color;
///
/// let amber = Color::new("#FFC107").unwrap();
/// assert!(Color::new("definitely-not-a-color").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Parses a CSS color string: `"#FFC107"`, `"rgb(3, 169, 244)"`,
    /// `"skyblue"`, and so on.
    ///
    /// # Errors
    ///
    /// Returns a message naming the rejected string.
    pub fn new(color_str: &str) -> Result<Self, String> {
        let color = DynamicColor::from_str(color_str)
            .map_err(|err| format!("invalid color `{color_str}`: {err}"))?;
        Ok(Self { color })
    }
}

/// The default stroke color: black.
impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}
