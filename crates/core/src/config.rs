//! Renderer configuration.
//!
//! Values come from [`RendererConfig::default`], environment variables, or a
//! TOML document. Every field is optional in TOML and falls back to its
//! default.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::{Rgba, DEFAULT_PADDING_TILES, DEFAULT_SPRITE_LAYER, DEFAULT_UPDATE_RATE};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RendererConfig {
    /// Tiles of margin kept on each side of the viewport (at least 1).
    pub padding: u32,
    /// Keep the viewport inside the map when centering.
    pub clamp_camera: bool,
    /// Layer for sprites added to a group without an explicit layer.
    pub default_layer: usize,
    /// Fill for empty and out-of-map tiles.
    pub background: Rgba,
    /// Flush queued tile updates at the start of every draw.
    pub flush_on_draw: bool,
    /// Queued tiles redrawn per incremental `update()`.
    pub update_rate: usize,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING_TILES,
            clamp_camera: false,
            default_layer: DEFAULT_SPRITE_LAYER,
            background: Rgba::BLACK,
            flush_on_draw: true,
            update_rate: DEFAULT_UPDATE_RATE,
        }
    }
}

impl RendererConfig {
    /// Create from environment variables.
    ///
    /// - `SCROLLMAP_PADDING`
    /// - `SCROLLMAP_CLAMP_CAMERA` ("1"/"true")
    /// - `SCROLLMAP_DEFAULT_LAYER`
    /// - `SCROLLMAP_FLUSH_ON_DRAW` ("1"/"true")
    /// - `SCROLLMAP_UPDATE_RATE`
    ///
    /// Missing or unparseable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RendererConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        let parse_bool = |s: String| {
            let s = s.trim().to_lowercase();
            s == "1" || s == "true"
        };

        Self {
            padding: lookup("SCROLLMAP_PADDING")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(d.padding),
            clamp_camera: lookup("SCROLLMAP_CLAMP_CAMERA")
                .map(parse_bool)
                .unwrap_or(d.clamp_camera),
            default_layer: lookup("SCROLLMAP_DEFAULT_LAYER")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(d.default_layer),
            background: d.background,
            flush_on_draw: lookup("SCROLLMAP_FLUSH_ON_DRAW")
                .map(parse_bool)
                .unwrap_or(d.flush_on_draw),
            update_rate: lookup("SCROLLMAP_UPDATE_RATE")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(d.update_rate),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.padding == 0 {
            return Err(ConfigError::InvalidPadding(self.padding));
        }
        if self.update_rate == 0 {
            return Err(ConfigError::InvalidUpdateRate);
        }
        Ok(())
    }

    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_clamp_camera(mut self, clamp: bool) -> Self {
        self.clamp_camera = clamp;
        self
    }

    pub fn with_background(mut self, background: Rgba) -> Self {
        self.background = background;
        self
    }

    pub fn with_default_layer(mut self, layer: usize) -> Self {
        self.default_layer = layer;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_are_documented_values() {
        let c = RendererConfig::default();
        assert_eq!(c.padding, 2);
        assert!(!c.clamp_camera);
        assert_eq!(c.default_layer, 0);
        assert_eq!(c.background, Rgba::BLACK);
        assert!(c.flush_on_draw);
        assert_eq!(c.update_rate, 10);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn lookup_overrides_and_ignores_garbage() {
        let vars: HashMap<&str, &str> = [
            ("SCROLLMAP_PADDING", "3"),
            ("SCROLLMAP_CLAMP_CAMERA", "TRUE"),
            ("SCROLLMAP_UPDATE_RATE", "lots"),
        ]
        .into_iter()
        .collect();
        let c = RendererConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(c.padding, 3);
        assert!(c.clamp_camera);
        assert_eq!(c.update_rate, 10);
    }

    #[test]
    fn toml_partial_document_keeps_defaults() {
        let doc = "padding = 4\nbackground = { r = 1, g = 2, b = 3, a = 255 }\n";
        let c = RendererConfig::from_toml_str(doc).unwrap();
        assert_eq!(c.padding, 4);
        assert_eq!(c.background, Rgba::rgb(1, 2, 3));
        assert_eq!(c.update_rate, 10);
    }

    #[test]
    fn toml_rejects_zero_padding_and_unknown_keys() {
        assert_eq!(
            RendererConfig::from_toml_str("padding = 0"),
            Err(ConfigError::InvalidPadding(0))
        );
        assert!(matches!(
            RendererConfig::from_toml_str("zoom = 2"),
            Err(ConfigError::Parse(_))
        ));
    }
}
