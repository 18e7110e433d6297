//! `auth_settings`: App Service Authentication / Authorization (v1).

use super::{singleton, Block};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap as Map;

#[derive(Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Should the Authentication / Authorization feature be enabled?
    pub enabled: bool,
    #[serde(default, deserialize_with = "singleton", skip_serializing_if = "Option::is_none")]
    pub active_directory: Option<ActiveDirectory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_login_parameters: Option<Map<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_external_redirect_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_provider: Option<String>,
    #[serde(default, deserialize_with = "singleton", skip_serializing_if = "Option::is_none")]
    pub facebook: Option<Facebook>,
    #[serde(default, deserialize_with = "singleton", skip_serializing_if = "Option::is_none")]
    pub github: Option<Github>,
    #[serde(default, deserialize_with = "singleton", skip_serializing_if = "Option::is_none")]
    pub google: Option<Google>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(default, deserialize_with = "singleton", skip_serializing_if = "Option::is_none")]
    pub microsoft: Option<Microsoft>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_refresh_extension_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_store_enabled: Option<bool>,
    #[serde(default, deserialize_with = "singleton", skip_serializing_if = "Option::is_none")]
    pub twitter: Option<Twitter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unauthenticated_client_action: Option<String>,
}

impl AuthSettings {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            active_directory: None,
            additional_login_parameters: None,
            allowed_external_redirect_urls: None,
            default_provider: None,
            facebook: None,
            github: None,
            google: None,
            issuer: None,
            microsoft: None,
            runtime_version: None,
            token_refresh_extension_hours: None,
            token_store_enabled: None,
            twitter: None,
            unauthenticated_client_action: None,
        }
    }
}

impl Block for AuthSettings {
    const PATH: &'static str = "auth_settings";
}

#[derive(Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct ActiveDirectory {
    pub client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_audiences: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret_setting_name: Option<String>,
}

impl ActiveDirectory {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            allowed_audiences: None,
            client_secret: None,
            client_secret_setting_name: None,
        }
    }
}

impl Block for ActiveDirectory {
    const PATH: &'static str = "auth_settings.active_directory";
}

#[derive(Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Facebook {
    pub app_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_secret_setting_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth_scopes: Option<Vec<String>>,
}

impl Facebook {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: None,
            app_secret_setting_name: None,
            oauth_scopes: None,
        }
    }
}

impl Block for Facebook {
    const PATH: &'static str = "auth_settings.facebook";
}

/// Shape shared by the GitHub, Google and Microsoft identity providers.
macro_rules! oauth_client_block {
    ($name:ident, $path:literal) => {
        #[derive(Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
        pub struct $name {
            pub client_id: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub client_secret: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub client_secret_setting_name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub oauth_scopes: Option<Vec<String>>,
        }

        impl $name {
            pub fn new(client_id: impl Into<String>) -> Self {
                Self {
                    client_id: client_id.into(),
                    client_secret: None,
                    client_secret_setting_name: None,
                    oauth_scopes: None,
                }
            }
        }

        impl Block for $name {
            const PATH: &'static str = $path;
        }
    };
}

oauth_client_block!(Github, "auth_settings.github");
oauth_client_block!(Google, "auth_settings.google");
oauth_client_block!(Microsoft, "auth_settings.microsoft");

#[derive(Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Twitter {
    pub consumer_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumer_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumer_secret_setting_name: Option<String>,
}

impl Twitter {
    pub fn new(consumer_key: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: None,
            consumer_secret_setting_name: None,
        }
    }
}

impl Block for Twitter {
    const PATH: &'static str = "auth_settings.twitter";
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::BindingError;
    use serde_json::json;

    #[test]
    fn test_active_directory_needs_only_client_id() {
        let ad = ActiveDirectory::from_value(json!({"client_id": "abc"})).unwrap();
        assert_eq!(ad, ActiveDirectory::new("abc"));
        assert_eq!(ad.allowed_audiences, None);
        assert_eq!(ad.to_value().unwrap(), json!({"client_id": "abc"}));
    }

    #[test]
    fn test_active_directory_without_client_id_is_rejected() {
        let err = ActiveDirectory::from_value(json!({"allowed_audiences": ["api://x"]})).unwrap_err();
        assert!(matches!(
            err,
            BindingError::MissingRequiredField { ref block, ref field }
                if block == "auth_settings.active_directory" && field == "client_id"
        ));
    }

    #[test]
    fn test_auth_settings_requires_enabled() {
        let err = AuthSettings::from_value(json!({"issuer": "https://sts"})).unwrap_err();
        assert!(matches!(
            err,
            BindingError::MissingRequiredField { ref field, .. } if field == "enabled"
        ));
    }

    #[test]
    fn test_providers_nest_inside_auth_settings() {
        let mut auth = AuthSettings::new(true);
        auth.github = Some(Github::new("gh-client"));
        auth.twitter = Some(Twitter::new("key"));
        auth.token_refresh_extension_hours = Some(72.0);
        assert!(auth.validate().is_ok());

        let value = auth.to_value().unwrap();
        assert_eq!(value["github"]["client_id"], json!("gh-client"));
        assert_eq!(value["token_refresh_extension_hours"], json!(72.0));
        assert!(value.get("google").is_none());
        assert_eq!(AuthSettings::from_value(value).unwrap(), auth);
    }

    #[test]
    fn test_mistyped_provider_field() {
        let err = AuthSettings::from_value(json!({
            "enabled": true,
            "google": {"client_id": "g", "oauth_scopes": "openid"}
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            BindingError::TypeMismatch { ref path, .. } if path == "auth_settings.google.oauth_scopes"
        ));
    }
}
