//! Capability sets handed to the automation server at session creation.
//!
//! A capability set names the platform, device, and app binary for one
//! session. Builders cover the four device shapes the suite runs on; the
//! server's negotiation semantics are external — this module only renders
//! the map.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;

use crate::config::Settings;

/// App launch wait used by every capability set (30 seconds)
pub const APP_WAIT_DURATION_MS: u64 = 30_000;

/// A capability set for one driver session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Platform name ("Android" or "iOS")
    pub platform_name: String,
    /// Automation backend ("UiAutomator2" or "XCUITest")
    pub automation_name: String,
    /// OS version of the target device
    pub platform_version: Option<String>,
    /// Device name (emulator/simulator identifier)
    pub device_name: Option<String>,
    /// Unique device identifier for physical devices
    pub udid: Option<String>,
    /// App binary path
    pub app: Option<String>,
    /// App package identifier (Android)
    pub app_package: Option<String>,
    /// App launch activity (Android)
    pub app_activity: Option<String>,
    /// Reinstall the app and wipe its data before the session
    pub full_reset: bool,
    /// Keep app state between sessions
    pub no_reset: bool,
    /// How long to wait for the app to launch, in milliseconds
    pub app_wait_duration_ms: u64,
}

impl Capabilities {
    /// Capabilities for a physical Android device
    #[must_use]
    pub fn android_device() -> Self {
        Self {
            platform_name: "Android".to_string(),
            automation_name: "UiAutomator2".to_string(),
            platform_version: None,
            device_name: None,
            udid: None,
            app: None,
            app_package: None,
            app_activity: None,
            full_reset: false,
            no_reset: false,
            app_wait_duration_ms: APP_WAIT_DURATION_MS,
        }
    }

    /// Capabilities for the default Android emulator
    #[must_use]
    pub fn android_emulator() -> Self {
        Self {
            device_name: Some("emulator-5554".to_string()),
            platform_version: Some("14".to_string()),
            no_reset: true,
            ..Self::android_device()
        }
    }

    /// Capabilities for a physical iOS device
    #[must_use]
    pub fn ios_device() -> Self {
        Self {
            platform_name: "iOS".to_string(),
            automation_name: "XCUITest".to_string(),
            ..Self::android_device()
        }
    }

    /// Capabilities for the default iOS simulator
    #[must_use]
    pub fn ios_simulator() -> Self {
        Self {
            device_name: Some("iPhone 15".to_string()),
            platform_version: Some("17.0".to_string()),
            no_reset: true,
            ..Self::ios_device()
        }
    }

    /// Compose Android device capabilities from the environment surface,
    /// resolving the app path against `base_dir` the way the scenario
    /// setup does.
    #[must_use]
    pub fn from_settings(settings: &Settings, base_dir: &Path) -> Self {
        let app = settings
            .app_path
            .as_ref()
            .map(|p| base_dir.join(p).to_string_lossy().into_owned());
        Self {
            udid: settings.udid.clone(),
            platform_version: settings.platform_version.clone(),
            app,
            app_package: settings.app_package.clone(),
            app_activity: settings.app_activity.clone(),
            full_reset: settings.full_reset,
            ..Self::android_device()
        }
    }

    /// Set the OS version
    #[must_use]
    pub fn with_platform_version(mut self, version: impl Into<String>) -> Self {
        self.platform_version = Some(version.into());
        self
    }

    /// Set the device identifier
    #[must_use]
    pub fn with_udid(mut self, udid: impl Into<String>) -> Self {
        self.udid = Some(udid.into());
        self
    }

    /// Set the app binary path
    #[must_use]
    pub fn with_app(mut self, app: impl Into<String>) -> Self {
        self.app = Some(app.into());
        self
    }

    /// Render the W3C capability map sent to the automation server
    #[must_use]
    pub fn to_wire(&self) -> Value {
        let mut caps = json!({
            "platformName": self.platform_name,
            "appium:automationName": self.automation_name,
            "appium:appWaitDuration": self.app_wait_duration_ms,
            "appium:fullReset": self.full_reset,
            "appium:noReset": self.no_reset,
        });
        let map = caps.as_object_mut().expect("capability map is an object");
        let optional = [
            ("appium:platformVersion", &self.platform_version),
            ("appium:deviceName", &self.device_name),
            ("appium:udid", &self.udid),
            ("appium:app", &self.app),
            ("appium:appPackage", &self.app_package),
            ("appium:appActivity", &self.app_activity),
        ];
        for (key, value) in optional {
            if let Some(v) = value {
                map.insert(key.to_string(), Value::String(v.clone()));
            }
        }
        caps
    }
}
