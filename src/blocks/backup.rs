use super::{required_singleton, Block};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Backup {
    pub name: String,
    #[serde(deserialize_with = "required_singleton")]
    pub schedule: BackupSchedule,
    /// SAS URL of the target container.
    pub storage_account_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl Backup {
    pub fn new(
        name: impl Into<String>,
        schedule: BackupSchedule,
        storage_account_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            schedule,
            storage_account_url: storage_account_url.into(),
            enabled: None,
        }
    }
}

impl Block for Backup {
    const PATH: &'static str = "backup";
}

#[derive(Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct BackupSchedule {
    /// How often the backup runs, in `frequency_unit`s.
    pub frequency_interval: i64,
    /// `Day` or `Hour`.
    pub frequency_unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_at_least_one_backup: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_period_days: Option<i64>,
    /// RFC-3339 timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
}

impl BackupSchedule {
    pub fn new(frequency_interval: i64, frequency_unit: impl Into<String>) -> Self {
        Self {
            frequency_interval,
            frequency_unit: frequency_unit.into(),
            keep_at_least_one_backup: None,
            retention_period_days: None,
            start_time: None,
        }
    }
}

impl Block for BackupSchedule {
    const PATH: &'static str = "backup.schedule";
}
