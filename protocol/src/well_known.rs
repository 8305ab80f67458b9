//! Server discovery document served from `.well-known/matrix/client`.
//!
//! ```json
//! {
//!     "m.homeserver": { "base_url": "https://matrix.example.org" },
//!     "m.identity_server": { "base_url": "https://id.example.org" },
//!     "m.integrations": {
//!         "managers": [
//!             { "api_url": "https://integrations.example.org",
//!               "ui_url": "https://integrations.example.org/ui" }
//!         ]
//!     }
//! }
//! ```

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WellKnownBaseConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// One integration manager advertised by the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WellKnownManagerConfig {
    pub api_url: String,
    pub ui_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WellKnown {
    #[serde(
        rename = "m.homeserver",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub home_server: Option<WellKnownBaseConfig>,
    #[serde(
        rename = "m.identity_server",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub identity_server: Option<WellKnownBaseConfig>,
    /// Free-form dictionary; only the `managers` list has a known shape.
    #[serde(
        rename = "m.integrations",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub integrations: Option<Value>,
}

impl WellKnown {
    /// Returns the integration managers the document proposes.
    ///
    /// Entries are kept only when `api_url` uses the `https` scheme; a
    /// missing `ui_url` falls back to `api_url` and is held to the same
    /// scheme requirement. Malformed entries are skipped, never an error.
    pub fn integration_managers(&self) -> Vec<WellKnownManagerConfig> {
        let mut managers = Vec::new();
        let Some(configs) = self
            .integrations
            .as_ref()
            .and_then(|integrations| integrations.get("managers"))
            .and_then(Value::as_array)
        else {
            return managers;
        };
        for config in configs {
            let Some(api_url) = config.get("api_url").and_then(Value::as_str) else {
                continue;
            };
            let ui_url = config
                .get("ui_url")
                .and_then(Value::as_str)
                .unwrap_or(api_url);
            if api_url.starts_with("https://") && ui_url.starts_with("https://") {
                managers.push(WellKnownManagerConfig {
                    api_url: api_url.to_string(),
                    ui_url: ui_url.to_string(),
                });
            }
        }
        managers
    }
}
