// Settings module
// Tunables for swipe navigation, viewport stabilisation and the event service

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Validation failures for user-editable settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("{field} must be greater than 0 (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must be greater than 0 ms")]
    ZeroDuration { field: &'static str },
    #[error("unknown theme '{0}' (expected light, dark or system)")]
    UnknownTheme(String),
    #[error("event service URL cannot be empty")]
    EmptyBaseUrl,
}

/// Numeric policy of the swipe day navigation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeSettings {
    /// Minimum horizontal travel (px) for a release to commit to a neighbouring day
    pub min_swipe_distance: f32,
    /// Travel (px) in either axis before a gesture is classified
    pub axis_lock_threshold: f32,
    /// Horizontal offset (px) past which native scrolling is suppressed
    pub scroll_suppress_threshold: f32,
    pub animation_duration_ms: u64,
}

impl Default for SwipeSettings {
    fn default() -> Self {
        Self {
            min_swipe_distance: 100.0,
            axis_lock_threshold: 100.0,
            scroll_suppress_threshold: 5.0,
            animation_duration_ms: 300,
        }
    }
}

impl SwipeSettings {
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        positive("min_swipe_distance", self.min_swipe_distance)?;
        positive("axis_lock_threshold", self.axis_lock_threshold)?;
        if self.scroll_suppress_threshold.is_nan() || self.scroll_suppress_threshold < 0.0 {
            return Err(SettingsError::NotPositive {
                field: "scroll_suppress_threshold",
                value: self.scroll_suppress_threshold,
            });
        }
        if self.animation_duration_ms == 0 {
            return Err(SettingsError::ZeroDuration {
                field: "animation_duration_ms",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    /// Height changes up to this many px are treated as browser/OS chrome jitter
    pub jitter_tolerance: f32,
    pub settle_delay_ms: u64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            jitter_tolerance: 120.0,
            settle_delay_ms: 150,
        }
    }
}

impl ViewportSettings {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        positive("jitter_tolerance", self.jitter_tolerance)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventServiceSettings {
    /// Base URL of the events API; `None` runs the app offline
    pub base_url: Option<String>,
    pub auth_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for EventServiceSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            auth_token: None,
            timeout_secs: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub theme: String,
    pub swipe: SwipeSettings,
    pub viewport: ViewportSettings,
    pub events: EventServiceSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: "system".to_string(),
            swipe: SwipeSettings::default(),
            viewport: ViewportSettings::default(),
            events: EventServiceSettings::default(),
        }
    }
}

impl AppSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        match self.theme.to_lowercase().as_str() {
            "light" | "dark" | "system" => {}
            _ => return Err(SettingsError::UnknownTheme(self.theme.clone())),
        }
        if let Some(url) = &self.events.base_url {
            if url.trim().is_empty() {
                return Err(SettingsError::EmptyBaseUrl);
            }
        }
        self.swipe.validate()?;
        self.viewport.validate()
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
    // NaN fails this check too
    if value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::NotPositive { field, value })
    }
}
