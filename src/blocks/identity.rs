use super::Block;
use serde::{Deserialize, Serialize};

/// Managed Service Identity. `principal_id` and `tenant_id` are computed by
/// the provider and read through the `identity` output reference.
#[derive(Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Identity {
    /// `SystemAssigned`, `UserAssigned` or `SystemAssigned, UserAssigned`.
    pub r#type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_ids: Option<Vec<String>>,
}

impl Identity {
    pub fn system_assigned() -> Self {
        Self {
            r#type: "SystemAssigned".to_owned(),
            identity_ids: None,
        }
    }

    pub fn user_assigned<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            r#type: "UserAssigned".to_owned(),
            identity_ids: Some(ids.into_iter().map(Into::into).collect()),
        }
    }
}

impl Block for Identity {
    const PATH: &'static str = "identity";
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identity_constructors() {
        assert_eq!(
            Identity::system_assigned().to_value().unwrap(),
            json!({"type": "SystemAssigned"})
        );
        let user = Identity::user_assigned(vec!["/subscriptions/x/uai/a"]);
        assert!(user.validate().is_ok());
        assert_eq!(user.identity_ids.map(|ids| ids.len()), Some(1));
    }

    #[test]
    fn test_computed_attributes_are_ignored_on_read() {
        let identity = Identity::from_value(json!({"type": "SystemAssigned"})).unwrap();
        let read: Identity = serde_json::from_value(json!({
            "type": "SystemAssigned",
            "principal_id": "0000",
            "tenant_id": "1111"
        }))
        .unwrap();
        assert_eq!(identity, read);
    }
}
