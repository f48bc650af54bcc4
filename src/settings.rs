//! User settings stored on the server.
//!
//! Values travel as strings; they are decoded into [`SettingValue`] once, at
//! fetch time, and encoded again on save.

use crate::client::ApiClient;
use crate::protocol::{RawSetting, SettingUpdate};
use crate::types::{Setting, SettingValue};
use crate::workspace::WorkspaceError;
use eyre::Result;
use std::sync::Arc;

impl From<RawSetting> for Setting {
    fn from(raw: RawSetting) -> Self {
        Setting {
            value: SettingValue::decode(&raw.setting_type, &raw.setting_value),
            name: raw.setting_name,
            display_name: raw.setting_display_name,
            description: raw.setting_description,
        }
    }
}

/// Local copy of the server's settings.
pub struct Settings {
    api: Arc<dyn ApiClient>,
    settings: Vec<Setting>,
}

impl Settings {
    pub fn new(api: Arc<dyn ApiClient>) -> Self {
        Self {
            api,
            settings: Vec::new(),
        }
    }

    pub fn all(&self) -> &[Setting] {
        &self.settings
    }

    pub fn get(&self, name: &str) -> Option<&SettingValue> {
        self.settings.iter().find(|s| s.name == name).map(|s| &s.value)
    }

    /// Change a value locally; returns false if no such setting is loaded.
    pub fn set(&mut self, name: &str, value: SettingValue) -> bool {
        match self.settings.iter_mut().find(|s| s.name == name) {
            Some(setting) => {
                setting.value = value;
                true
            }
            None => false,
        }
    }

    /// Replace local settings with the server's.
    pub async fn fetch(&mut self) -> Result<()> {
        match self.api.list_settings().await {
            Ok(raw) => {
                self.settings = raw.into_iter().map(Setting::from).collect();
                Ok(())
            }
            Err(e) => {
                log::error!("Error fetching settings: {}", e);
                Err(eyre::eyre!(WorkspaceError::Api(e)))
            }
        }
    }

    /// Push every setting to the server, one request each.
    ///
    /// A failed setting is logged and skipped; the names of the failures are
    /// returned.
    pub async fn save(&self) -> Vec<String> {
        let mut failed = Vec::new();
        for setting in &self.settings {
            let update = SettingUpdate {
                new_value: setting.value.encode(),
            };
            if let Err(e) = self.api.update_setting(&setting.name, &update).await {
                log::error!("Error saving setting {}: {}", setting.name, e);
                failed.push(setting.name.clone());
            }
        }
        failed
    }
}
