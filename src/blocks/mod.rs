//! Typed records for the nested blocks of `azurerm_windows_web_app_slot`.
//!
//! Each record carries exactly the configurable fields of its schema block:
//! required fields are plain values, optional ones are `Option`s, repeated
//! sub-blocks are `Vec`s and singleton sub-blocks are `Option`s of their record.
//! Provider-computed attributes are not part of the records; read them through
//! a [`BlockRef`](crate::reference::BlockRef).

use crate::error::{BindingError, Result};
use crate::schema::{self, slot_schema, RESOURCE_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub mod auth_settings;
pub mod backup;
pub mod connection_string;
pub mod identity;
pub mod logs;
pub mod site_config;
pub mod storage_account;
pub mod timeouts;

pub use auth_settings::AuthSettings;
pub use backup::{Backup, BackupSchedule};
pub use connection_string::ConnectionString;
pub use identity::Identity;
pub use logs::Logs;
pub use site_config::SiteConfig;
pub use storage_account::StorageAccount;
pub use timeouts::Timeouts;

/// A record bound to one block of the resource schema.
pub trait Block: Serialize + DeserializeOwned {
    /// Dotted path of the block below the resource root, e.g. `site_config.cors`.
    const PATH: &'static str;

    fn schema() -> Result<&'static schema::Block> {
        slot_schema()
            .block
            .block_at(Self::PATH)
            .ok_or_else(|| BindingError::UnknownAttribute {
                block: RESOURCE_TYPE.to_owned(),
                name: Self::PATH.to_owned(),
            })
    }

    /// Builds the record from loosely typed JSON, reporting the first missing
    /// required field or mistyped value against the schema.
    fn from_value(value: Value) -> Result<Self> {
        Self::schema()?.validate(Self::PATH, &value)?;
        Ok(serde_json::from_value(value)?)
    }

    fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Re-checks the record against the schema.
    fn validate(&self) -> Result<()> {
        Self::schema()?.validate(Self::PATH, &self.to_value()?)
    }
}

/// Terraform JSON accepts a single-item block either as an object or as a
/// one-element list.
pub(crate) fn singleton<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let item = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => match items.into_iter().next() {
            Some(item) => item,
            None => return Ok(None),
        },
        Some(other) => other,
    };
    serde_json::from_value(item)
        .map(Some)
        .map_err(serde::de::Error::custom)
}

pub(crate) fn required_singleton<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    singleton(deserializer)?
        .ok_or_else(|| serde::de::Error::invalid_length(0, &"exactly one block"))
}
