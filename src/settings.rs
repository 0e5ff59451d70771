//! Fire settings and preferences
//!
//! Layered: defaults, then LocalStorage, then the page's URL query string.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

/// Particle counts for the fixed-size pools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSizes {
    pub flames: usize,
    pub embers: usize,
    pub smoke: usize,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Pool sizes for this preset (Medium matches the classic look)
    pub fn pool_sizes(&self) -> PoolSizes {
        match self {
            QualityPreset::Low => PoolSizes {
                flames: 120,
                embers: 12,
                smoke: 16,
            },
            QualityPreset::Medium => PoolSizes {
                flames: 250,
                embers: 20,
                smoke: 30,
            },
            QualityPreset::High => PoolSizes {
                flames: 400,
                embers: 30,
                smoke: 40,
            },
        }
    }
}

/// Fire settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Particle density preset
    pub quality: QualityPreset,
    /// Fade old frames instead of clearing (motion trails)
    pub trails: bool,
    /// Warm additive glow under the source point
    pub light_glow: bool,
    /// Show FPS readout
    #[serde(default)]
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            trails: true,
            light_glow: true,
            show_fps: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective pool sizes
    pub fn pool_sizes(&self) -> PoolSizes {
        self.quality.pool_sizes()
    }

    /// Apply overrides from a URL query string (`?quality=high&trails=off`).
    ///
    /// Unknown keys and unparseable values are ignored. Overrides only last
    /// for the page; the return value is true when the query also asks for
    /// them to be stored (`remember=1`).
    pub fn apply_query(&mut self, query: &str) -> bool {
        let mut remember = false;
        let query = query.strip_prefix('?').unwrap_or(query);
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, "1"));
            match key {
                "quality" => {
                    if let Some(preset) = QualityPreset::from_str(value) {
                        self.quality = preset;
                    } else {
                        log::warn!("Ignoring unknown quality '{}'", value);
                    }
                }
                "trails" => self.trails = parse_flag(value).unwrap_or(self.trails),
                "glow" => self.light_glow = parse_flag(value).unwrap_or(self.light_glow),
                "fps" => self.show_fps = parse_flag(value).unwrap_or(self.show_fps),
                "remember" => remember = parse_flag(value).unwrap_or(false),
                _ => {}
            }
        }
        remember
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "hearth_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Discarding stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "on" | "true" | "yes" => Some(true),
        "0" | "off" | "false" | "no" => Some(false),
        _ => None,
    }
}
