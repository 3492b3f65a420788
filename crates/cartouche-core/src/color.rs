//! Color handling for compositions.
//!
//! [`Color`] wraps `DynamicColor` from the `color` crate so that any CSS color
//! string ("#ff0000", "rgb(255 0 0)", "steelblue", ...) can be used for
//! canvas backgrounds, panel frames and connector strokes.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::DynamicColor;
use serde::Deserialize;

/// A CSS color.
#[derive(Clone, Copy, PartialEq, Debug, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Parses a CSS color string.
    ///
    /// # Errors
    ///
    /// Returns a message naming the rejected input when it is not a valid
    /// CSS color.
    ///
    /// # Examples
    ///
    /// ```
    /// use cartouche_core::color::Color;
    ///
    /// let water = Color::new("#a6cee3").unwrap();
    /// let land = Color::new("wheat").unwrap();
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        DynamicColor::from_str(color_str)
            .map(|color| Self { color })
            .map_err(|err| format!("invalid color `{color_str}`: {err}"))
    }

    /// Returns a string that is safe to use inside an SVG `id` attribute.
    ///
    /// # Examples
    ///
    /// ```
    /// use cartouche_core::color::Color;
    ///
    /// let id = Color::new("#ff8000").unwrap().to_id_safe_string();
    /// assert!(id.chars().all(|c| c.is_alphanumeric() || c == '_'));
    /// ```
    pub fn to_id_safe_string(self) -> String {
        let sanitized: String = self
            .to_string()
            .replace('#', "hex")
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();

        if sanitized.starts_with(|c: char| c.is_ascii_digit()) {
            format!("c_{sanitized}")
        } else {
            sanitized
        }
    }

    /// Returns a copy of this color with the given alpha, between 0.0 and 1.0.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns the alpha component of this color.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}
