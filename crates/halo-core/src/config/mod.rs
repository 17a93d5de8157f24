mod loader;
pub mod template;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Color;
use crate::log::LogConfig;
use crate::overlay::{DEFAULT_MARGIN, OverlayStyle};

pub use loader::{config_dir, config_path, load, try_load};

/// Hex form of the default frame color (orange).
pub const DEFAULT_COLOR: &str = "#ffa500";

/// Stand-in for pure black, which overlays use as their transparent
/// color key.
pub const NEAR_BLACK: &str = "#010101";

/// Top-level configuration for Halo.
///
/// Loaded from `~/.config/halo/config.toml`. Missing sections
/// fall back to defaults thanks to `#[serde(default)]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Overlay appearance.
    pub border: BorderConfig,
    /// Refresh and enumeration timing.
    pub engine: EngineConfig,
    /// File logging settings.
    pub logging: LogConfig,
}

/// Overlay appearance configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderConfig {
    /// Hex color of the frame (e.g. "#ffa500").
    pub color: String,
    /// Pixels added around the tracked window's extended frame.
    pub margin: i32,
    /// Stroke width at 100% display scale.
    pub thickness: f32,
    /// Corner radius of the stroke. 0 draws a plain rectangle.
    pub corner_radius: f32,
    /// Keep overlays above every other window. When false each overlay
    /// sits directly below its target, so only the margin shows.
    pub topmost: bool,
    /// Optional hex color painted on the caption bar of every outlined
    /// window, restored on exit.
    pub caption_color: Option<String>,
}

/// Engine timing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Interval of each overlay's self-refresh timer in milliseconds.
    pub refresh_interval_ms: u64,
    /// Interval between top-level window enumeration passes in seconds.
    pub enumerate_interval_secs: u64,
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.into(),
            margin: DEFAULT_MARGIN,
            thickness: 2.0,
            corner_radius: 0.0,
            topmost: true,
            caption_color: None,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 100,
            enumerate_interval_secs: 10,
        }
    }
}

impl Config {
    /// Clamps border and timing values to safe ranges.
    ///
    /// Prevents negative margins, invisible or huge strokes, and timers
    /// that would either spin the owner thread or never fire in practice.
    /// An unparsable color is replaced by the default one, and pure black
    /// by [`NEAR_BLACK`]. An unparsable caption color is dropped.
    pub fn validate(&mut self) {
        self.border.margin = self.border.margin.clamp(0, 64);
        self.border.thickness = self.border.thickness.clamp(1.0, 32.0);
        self.border.corner_radius = self.border.corner_radius.clamp(0.0, 64.0);
        self.engine.refresh_interval_ms = self.engine.refresh_interval_ms.clamp(16, 10_000);
        self.engine.enumerate_interval_secs = self.engine.enumerate_interval_secs.clamp(1, 3600);

        if Color::from_hex(&self.border.color).is_none() {
            crate::log_warn!(
                "invalid border color {:?}, using {DEFAULT_COLOR}",
                self.border.color
            );
            eprintln!(
                "Warning: invalid border color {:?}, using {DEFAULT_COLOR}",
                self.border.color
            );
            self.border.color = DEFAULT_COLOR.into();
        }

        if Color::from_hex(&self.border.color) == Some(Color::new(0, 0, 0)) {
            crate::log_warn!("border color is the transparency key, using {NEAR_BLACK}");
            eprintln!("Warning: pure black border is invisible, using {NEAR_BLACK}");
            self.border.color = NEAR_BLACK.into();
        }

        if let Some(caption) = &self.border.caption_color
            && Color::from_hex(caption).is_none()
        {
            crate::log_warn!("invalid caption color {caption:?}, ignoring it");
            eprintln!("Warning: invalid caption color {caption:?}, ignoring it");
            self.border.caption_color = None;
        }
    }

    /// The style every new overlay is created with.
    pub fn overlay_style(&self) -> OverlayStyle {
        let defaults = OverlayStyle::default();
        OverlayStyle {
            margin: self.border.margin,
            color: Color::from_hex(&self.border.color).unwrap_or(defaults.color),
            thickness: self.border.thickness,
            corner_radius: self.border.corner_radius,
            refresh_interval: Duration::from_millis(self.engine.refresh_interval_ms),
        }
    }

    /// The caption color to paint outlined windows with, if any.
    pub fn caption_color(&self) -> Option<Color> {
        self.border.caption_color.as_deref().and_then(Color::from_hex)
    }

    pub fn enumerate_interval(&self) -> Duration {
        Duration::from_secs(self.engine.enumerate_interval_secs)
    }
}
