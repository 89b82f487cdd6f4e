use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{FreqVizError, Result, ThemeName, VisualizationStyle};

/// Smallest and largest transform sizes the analyser accepts.
pub const MIN_FFT_SIZE: usize = 32;
pub const MAX_FFT_SIZE: usize = 32_768;

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub analyser: AnalyserConfig,
    pub surface: SurfaceConfig,
    pub visual: VisualConfig,
}

impl AppConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        // Unknown theme names are a configuration error of their own, not a
        // serde "unknown variant".
        if let Some(name) = value.pointer("/visual/theme").and_then(|theme| theme.as_str()) {
            name.parse::<ThemeName>()?;
        }
        let config: AppConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.analyser.validate()?;
        self.surface.validate()
    }
}

/// Parameters of the spectrum analyser feeding the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyserConfig {
    pub sample_rate: u32,
    /// Transform size; frames carry `fft_size / 2` bins.
    pub fft_size: usize,
    /// Weight of the previous frame when smoothing magnitudes, in `[0, 1]`.
    pub smoothing: f32,
    pub min_decibels: f32,
    pub max_decibels: f32,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            fft_size: 512,
            smoothing: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
        }
    }
}

impl AnalyserConfig {
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    pub fn validate(&self) -> Result<()> {
        if !self.fft_size.is_power_of_two()
            || !(MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&self.fft_size)
        {
            return Err(FreqVizError::InvalidConfig(format!(
                "fft_size must be a power of two between {MIN_FFT_SIZE} and {MAX_FFT_SIZE}, got {}",
                self.fft_size
            )));
        }
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(FreqVizError::InvalidConfig(format!(
                "smoothing must lie in [0, 1], got {}",
                self.smoothing
            )));
        }
        if !(self.min_decibels < self.max_decibels) {
            return Err(FreqVizError::InvalidConfig(format!(
                "min_decibels ({}) must be below max_decibels ({})",
                self.min_decibels, self.max_decibels
            )));
        }
        if self.sample_rate == 0 {
            return Err(FreqVizError::InvalidConfig(
                "sample_rate must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Initial pixel size of the drawing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
        }
    }
}

impl SurfaceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FreqVizError::InvalidConfig(format!(
                "surface must have a non-zero size, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Style and theme active when a session starts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    /// Unknown names fall back to bars, like the renderer does.
    #[serde(deserialize_with = "lenient_style")]
    pub style: VisualizationStyle,
    pub theme: ThemeName,
}

fn lenient_style<'de, D>(deserializer: D) -> std::result::Result<VisualizationStyle, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    Ok(VisualizationStyle::from_name(&name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_browser_player() {
        let config = AppConfig::default();
        assert_eq!(config.analyser.fft_size, 512);
        assert_eq!(config.analyser.bin_count(), 256);
        assert_eq!(config.visual.style, VisualizationStyle::Bars);
        assert_eq!(config.visual.theme, ThemeName::Default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config = AppConfig::from_json_str(
            r#"{ "analyser": { "fft_size": 1024 }, "visual": { "theme": "neon", "style": "circle" } }"#,
        )
        .unwrap();
        assert_eq!(config.analyser.bin_count(), 512);
        assert_eq!(config.analyser.sample_rate, 48_000);
        assert_eq!(config.visual.theme, ThemeName::Neon);
        assert_eq!(config.visual.style, VisualizationStyle::Circle);
        assert_eq!(config.surface, SurfaceConfig::default());
    }

    #[test]
    fn unknown_style_falls_back_but_unknown_theme_fails() {
        let config = AppConfig::from_json_str(r#"{ "visual": { "style": "triangle" } }"#).unwrap();
        assert_eq!(config.visual.style, VisualizationStyle::Bars);

        let err = AppConfig::from_json_str(r#"{ "visual": { "theme": "sepia" } }"#).unwrap_err();
        assert!(matches!(err, FreqVizError::UnknownTheme(ref name) if name == "sepia"), "{err}");

        let err = AppConfig::from_json_str(r#"{ "visual": { "theme": 7 } }"#).unwrap_err();
        assert!(matches!(err, FreqVizError::Json(_)), "{err}");
    }

    #[test]
    fn rejects_invalid_analyser_settings() {
        for json in [
            r#"{ "analyser": { "fft_size": 500 } }"#,
            r#"{ "analyser": { "fft_size": 16 } }"#,
            r#"{ "analyser": { "smoothing": 1.5 } }"#,
            r#"{ "analyser": { "min_decibels": -10, "max_decibels": -30 } }"#,
            r#"{ "surface": { "width": 0 } }"#,
        ] {
            let err = AppConfig::from_json_str(json).unwrap_err();
            assert!(matches!(err, FreqVizError::InvalidConfig(_)), "{json}: {err}");
        }
    }
}
