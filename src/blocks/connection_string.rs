use super::Block;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct ConnectionString {
    pub name: String,
    /// Database kind, e.g. `SQLAzure`, `MySQL` or `Custom`.
    pub r#type: String,
    pub value: String,
}

impl ConnectionString {
    pub fn new(
        name: impl Into<String>,
        r#type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            r#type: r#type.into(),
            value: value.into(),
        }
    }
}

impl Block for ConnectionString {
    const PATH: &'static str = "connection_string";
}
