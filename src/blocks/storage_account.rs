use super::Block;
use serde::{Deserialize, Serialize};

/// Azure Files share or Blob container mounted into the slot.
#[derive(Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct StorageAccount {
    pub access_key: String,
    pub account_name: String,
    pub name: String,
    pub share_name: String,
    /// `AzureFiles` or `AzureBlob`.
    pub r#type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount_path: Option<String>,
}

impl Block for StorageAccount {
    const PATH: &'static str = "storage_account";
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::BindingError;
    use serde_json::json;

    #[test]
    fn test_storage_account_fields() {
        let account = StorageAccount::from_value(json!({
            "access_key": "k",
            "account_name": "acct",
            "name": "content",
            "share_name": "wwwroot",
            "type": "AzureFiles",
            "mount_path": "/mnt/content"
        }))
        .unwrap();
        assert_eq!(account.mount_path.as_deref(), Some("/mnt/content"));
        assert_eq!(account.r#type, "AzureFiles");
    }

    #[test]
    fn test_storage_account_requires_share_name() {
        let err = StorageAccount::from_value(json!({
            "access_key": "k",
            "account_name": "acct",
            "name": "content",
            "type": "AzureBlob"
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            BindingError::MissingRequiredField { ref block, ref field }
                if block == "storage_account" && field == "share_name"
        ));
    }
}
