use super::{singleton, Block};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Logs {
    #[serde(default, deserialize_with = "singleton", skip_serializing_if = "Option::is_none")]
    pub application_logs: Option<ApplicationLogs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_error_messages: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_request_tracing: Option<bool>,
    #[serde(default, deserialize_with = "singleton", skip_serializing_if = "Option::is_none")]
    pub http_logs: Option<HttpLogs>,
}

impl Block for Logs {
    const PATH: &'static str = "logs";
}

#[derive(Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct ApplicationLogs {
    /// `Error`, `Warning`, `Information`, `Verbose` or `Off`.
    pub file_system_level: String,
    #[serde(default, deserialize_with = "singleton", skip_serializing_if = "Option::is_none")]
    pub azure_blob_storage: Option<ApplicationLogsAzureBlobStorage>,
}

impl ApplicationLogs {
    pub fn new(file_system_level: impl Into<String>) -> Self {
        Self {
            file_system_level: file_system_level.into(),
            azure_blob_storage: None,
        }
    }
}

impl Block for ApplicationLogs {
    const PATH: &'static str = "logs.application_logs";
}

#[derive(Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct ApplicationLogsAzureBlobStorage {
    pub level: String,
    pub retention_in_days: i64,
    pub sas_url: String,
}

impl Block for ApplicationLogsAzureBlobStorage {
    const PATH: &'static str = "logs.application_logs.azure_blob_storage";
}

#[derive(Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct HttpLogs {
    #[serde(default, deserialize_with = "singleton", skip_serializing_if = "Option::is_none")]
    pub azure_blob_storage: Option<HttpLogsAzureBlobStorage>,
    #[serde(default, deserialize_with = "singleton", skip_serializing_if = "Option::is_none")]
    pub file_system: Option<HttpLogsFileSystem>,
}

impl Block for HttpLogs {
    const PATH: &'static str = "logs.http_logs";
}

#[derive(Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct HttpLogsAzureBlobStorage {
    pub sas_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_in_days: Option<i64>,
}

impl Block for HttpLogsAzureBlobStorage {
    const PATH: &'static str = "logs.http_logs.azure_blob_storage";
}

#[derive(Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct HttpLogsFileSystem {
    pub retention_in_days: i64,
    pub retention_in_mb: i64,
}

impl Block for HttpLogsFileSystem {
    const PATH: &'static str = "logs.http_logs.file_system";
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::BindingError;
    use serde_json::json;

    #[test]
    fn test_nested_log_sinks() {
        let logs = Logs {
            detailed_error_messages: Some(true),
            http_logs: Some(HttpLogs {
                file_system: Some(HttpLogsFileSystem {
                    retention_in_days: 7,
                    retention_in_mb: 35,
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(logs.validate().is_ok());
        assert_eq!(
            logs.to_value().unwrap(),
            json!({
                "detailed_error_messages": true,
                "http_logs": {"file_system": {"retention_in_days": 7, "retention_in_mb": 35}}
            })
        );
    }

    #[test]
    fn test_blob_sink_requires_sas_url() {
        let err = Logs::from_value(json!({
            "application_logs": {
                "file_system_level": "Warning",
                "azure_blob_storage": {"level": "Error", "retention_in_days": 3}
            }
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            BindingError::MissingRequiredField { ref block, ref field }
                if block == "logs.application_logs.azure_blob_storage" && field == "sas_url"
        ));
    }

    #[test]
    fn test_retention_must_be_a_number() {
        let err = HttpLogsFileSystem::from_value(json!({
            "retention_in_days": "seven",
            "retention_in_mb": 35
        }))
        .unwrap_err();
        assert!(matches!(err, BindingError::TypeMismatch { .. }));
    }
}
