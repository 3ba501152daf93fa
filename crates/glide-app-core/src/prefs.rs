// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared viewer preferences used by Glide tools (controller tuning + view size).

use glide_core::{InvalidConfig, ViewFrame, ViewportConfig, ViewportController};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ConfigError, ConfigService, ConfigStore, Validate};

/// Store key under which [`ViewerPrefs`] are saved.
pub const PREFS_KEY: &str = "viewer";

/// Saved preferences for a viewport surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerPrefs {
    /// Controller tuning.
    pub viewport: ViewportConfig,
    /// Host view size in points (width, height); the camera centre projects
    /// to its midpoint.
    pub view_size: [f64; 2],
}

impl Default for ViewerPrefs {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            view_size: [1024.0, 768.0],
        }
    }
}

impl ViewerPrefs {
    /// Host frame centred on the configured view.
    pub fn view_frame(&self) -> ViewFrame {
        ViewFrame::centered(self.view_size[0], self.view_size[1])
    }

    /// Builds a controller from these prefs.
    pub fn controller(&self) -> Result<ViewportController<ViewFrame>, InvalidConfig> {
        ViewportController::new(self.viewport.clone(), self.view_frame())
    }

    /// Loads prefs from `service`, defaulting when absent, and validates them.
    pub fn load<S: ConfigStore>(service: &ConfigService<S>) -> Result<Self, ConfigError> {
        Self::load_from(service, PREFS_KEY)
    }

    /// Like [`ViewerPrefs::load`] but reads `key` instead of [`PREFS_KEY`].
    pub fn load_from<S: ConfigStore>(
        service: &ConfigService<S>,
        key: &str,
    ) -> Result<Self, ConfigError> {
        let prefs: Self = service.load_valid(key)?;
        debug!(key, view_size = ?prefs.view_size, "viewer prefs loaded");
        Ok(prefs)
    }

    /// Validates and persists prefs through `service`.
    pub fn save<S: ConfigStore>(&self, service: &ConfigService<S>) -> Result<(), ConfigError> {
        self.save_to(service, PREFS_KEY)
    }

    /// Like [`ViewerPrefs::save`] but writes `key`.
    pub fn save_to<S: ConfigStore>(
        &self,
        service: &ConfigService<S>,
        key: &str,
    ) -> Result<(), ConfigError> {
        service.save_valid(key, self)
    }
}

impl Validate for ViewerPrefs {
    fn validate(&self) -> Result<(), InvalidConfig> {
        self.viewport.validate()
    }
}
