use thiserror::Error;

pub type Result<T> = std::result::Result<T, BindingError>;

/// Local validation and engine failures surfaced by the binding.
#[derive(Error, Debug)]
pub enum BindingError {
    #[error("missing required field `{field}` in `{block}`")]
    MissingRequiredField { block: String, field: String },

    #[error("type mismatch at `{path}`: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("block `{block}` accepts at most {max} item(s), got {got}")]
    TooManyItems { block: String, max: u16, got: usize },

    #[error("`{block}` has no attribute or block named `{name}`")]
    UnknownAttribute { block: String, name: String },

    #[error("`{0}` is computed by the provider and cannot be configured")]
    ReadOnlyAttribute(String),

    #[error("index {index} is out of range for `{path}` ({len} item(s))")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },

    #[error("resource `{0}` is already declared in this stack")]
    DuplicateResource(String),

    #[error("resource `{0}` is not known to the engine")]
    UnknownResource(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BindingError {
    pub(crate) fn missing(block: &str, field: &str) -> Self {
        BindingError::MissingRequiredField {
            block: block.to_owned(),
            field: field.to_owned(),
        }
    }

    pub(crate) fn mismatch(path: &str, expected: impl ToString, found: &serde_json::Value) -> Self {
        BindingError::TypeMismatch {
            path: path.to_owned(),
            expected: expected.to_string(),
            found: json_kind(found).to_owned(),
        }
    }
}

/// Short name of the JSON kind of `value`, as used in mismatch messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value::*;
    match value {
        Null => "null",
        Bool(_) => "bool",
        Number(_) => "number",
        String(s) if crate::schema::is_interpolation(s) => "interpolation",
        String(_) => "string",
        Array(_) => "list",
        Object(_) => "object",
    }
}
