//! Terraform provider schema model, as exported by `terraform providers schema -json`,
//! together with the embedded schema of `azurerm_windows_web_app_slot` and the
//! validation rules derived from it.

use crate::error::{BindingError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::OnceLock;

/// Terraform type name of the bound resource.
pub const RESOURCE_TYPE: &str = "azurerm_windows_web_app_slot";

const EMBEDDED_SCHEMA: &str = include_str!("../schema/azurerm_windows_web_app_slot.json");

static SLOT_SCHEMA: OnceLock<SchemaItem> = OnceLock::new();

/// Terraform meta-arguments accepted by every resource block, with the type
/// expression each one is bound as. Provider schemas do not list them.
pub fn meta_arguments() -> [(&'static str, Value); 5] {
    [
        ("count", json!("number")),
        ("depends_on", json!(["list", "string"])),
        ("for_each", json!("dynamic")),
        (
            "lifecycle",
            json!(["object", {
                "create_before_destroy": "bool",
                "ignore_changes": ["list", "string"],
                "prevent_destroy": "bool"
            }]),
        ),
        ("provider", json!("string")),
    ]
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct TerraformSchemaExport {
    pub provider_schemas: BTreeMap<String, Schema>,
    pub format_version: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Schema {
    #[serde(default)]
    pub provider: SchemaItem,
    pub data_source_schemas: Option<BTreeMap<String, SchemaItem>>,
    pub resource_schemas: Option<BTreeMap<String, SchemaItem>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SchemaItem {
    pub version: i64,
    pub block: Block,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Block {
    pub attributes: Option<BTreeMap<String, Attribute>>,
    pub block_types: Option<BTreeMap<String, NestedBlock>>,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "lowercase")]
pub enum StringKind {
    Plain,
    Markdown,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Attribute {
    pub r#type: AttributeType,
    pub description: Option<String>,
    pub required: Option<bool>,
    pub optional: Option<bool>,
    pub computed: Option<bool>,
    pub sensitive: Option<bool>,
    pub description_kind: Option<StringKind>,
    pub deprecated: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NestingMode {
    Single,
    Group,
    List,
    Set,
    Map,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct NestedBlock {
    pub block: Block,
    pub nesting_mode: Option<NestingMode>,
    pub min_items: Option<u16>,
    pub max_items: Option<u16>,
}

/// Raw Terraform type expression, e.g. `"string"` or `["map", "string"]`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AttributeType(pub Value);

/// Parsed form of an [`AttributeType`].
#[derive(Debug, Clone, PartialEq)]
pub enum ValueType {
    String,
    Number,
    Bool,
    Dynamic,
    List(Box<ValueType>),
    Set(Box<ValueType>),
    Map(Box<ValueType>),
    Object(BTreeMap<String, ValueType>),
}

impl Attribute {
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }

    /// Attributes only the provider can set.
    pub fn is_read_only(&self) -> bool {
        self.computed.unwrap_or(false) && !self.optional.unwrap_or(false) && !self.is_required()
    }

    pub fn value_type(&self) -> Result<ValueType> {
        ValueType::parse(&self.r#type.0)
    }
}

impl NestedBlock {
    pub fn is_required(&self) -> bool {
        self.min_items.unwrap_or(0) > 0
    }

    /// Blocks Terraform models as a bare object instead of a list.
    pub fn is_object_mode(&self) -> bool {
        matches!(
            self.nesting_mode,
            Some(NestingMode::Single) | Some(NestingMode::Group)
        )
    }

    /// Blocks holding at most one item.
    pub fn is_singleton(&self) -> bool {
        self.is_object_mode() || self.max_items == Some(1)
    }
}

impl ValueType {
    pub fn parse(expr: &Value) -> Result<Self> {
        let invalid = || BindingError::mismatch("type", "terraform type expression", expr);
        match expr {
            Value::String(t) => match t.as_str() {
                "string" => Ok(ValueType::String),
                "number" => Ok(ValueType::Number),
                "bool" => Ok(ValueType::Bool),
                "dynamic" => Ok(ValueType::Dynamic),
                // bare collection names default to string elements
                "list" => Ok(ValueType::List(Box::new(ValueType::String))),
                "set" => Ok(ValueType::Set(Box::new(ValueType::String))),
                "map" => Ok(ValueType::Map(Box::new(ValueType::String))),
                _ => Err(invalid()),
            },
            Value::Array(parts) => {
                let kind = parts.first().and_then(Value::as_str).ok_or_else(invalid)?;
                let inner = match parts.get(1) {
                    Some(inner) => inner,
                    None if kind != "object" => return ValueType::parse(&parts[0]),
                    None => return Err(invalid()),
                };
                match kind {
                    "list" => Ok(ValueType::List(Box::new(ValueType::parse(inner)?))),
                    "set" => Ok(ValueType::Set(Box::new(ValueType::parse(inner)?))),
                    "map" => Ok(ValueType::Map(Box::new(ValueType::parse(inner)?))),
                    "object" => {
                        let fields = inner.as_object().ok_or_else(invalid)?;
                        let mut parsed = BTreeMap::new();
                        for (name, t) in fields {
                            parsed.insert(name.clone(), ValueType::parse(t)?);
                        }
                        Ok(ValueType::Object(parsed))
                    }
                    _ => Err(invalid()),
                }
            }
            _ => Err(invalid()),
        }
    }

    /// Checks `value` against this type. Template strings (`${...}`) pass only
    /// where a string or dynamic value is expected: the typed records have no
    /// room for an expression in a bool, number or collection slot.
    pub fn check(&self, path: &str, value: &Value) -> Result<()> {
        match (self, value) {
            (ValueType::Dynamic, _) => Ok(()),
            (ValueType::String, Value::String(_)) => Ok(()),
            (ValueType::Number, Value::Number(_)) => Ok(()),
            (ValueType::Bool, Value::Bool(_)) => Ok(()),
            (ValueType::List(inner), Value::Array(items))
            | (ValueType::Set(inner), Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    inner.check(&format!("{}[{}]", path, i), item)?;
                }
                Ok(())
            }
            (ValueType::Map(inner), Value::Object(entries)) => {
                for (k, v) in entries {
                    inner.check(&format!("{}.{}", path, k), v)?;
                }
                Ok(())
            }
            (ValueType::Object(fields), Value::Object(entries)) => {
                for (k, v) in entries {
                    match fields.get(k) {
                        Some(t) => t.check(&format!("{}.{}", path, k), v)?,
                        None => {
                            return Err(BindingError::UnknownAttribute {
                                block: path.to_owned(),
                                name: k.clone(),
                            })
                        }
                    }
                }
                Ok(())
            }
            _ => Err(BindingError::mismatch(path, self, value)),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::String => write!(f, "string"),
            ValueType::Number => write!(f, "number"),
            ValueType::Bool => write!(f, "bool"),
            ValueType::Dynamic => write!(f, "dynamic"),
            ValueType::List(t) => write!(f, "list({})", t),
            ValueType::Set(t) => write!(f, "set({})", t),
            ValueType::Map(t) => write!(f, "map({})", t),
            ValueType::Object(_) => write!(f, "object"),
        }
    }
}

/// Whether `s` is a Terraform template expression such as `${var.name}`.
pub fn is_interpolation(s: &str) -> bool {
    s.starts_with("${") && s.ends_with('}')
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_owned()
    } else {
        format!("{}.{}", path, name)
    }
}

fn label(path: &str) -> &str {
    if path.is_empty() {
        RESOURCE_TYPE
    } else {
        path
    }
}

impl Block {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.as_ref().and_then(|a| a.get(name))
    }

    pub fn nested(&self, name: &str) -> Option<&NestedBlock> {
        self.block_types.as_ref().and_then(|b| b.get(name))
    }

    /// Resolves a dotted block path such as `site_config.cors`.
    pub fn block_at(&self, dotted: &str) -> Option<&Block> {
        if dotted.is_empty() {
            return Some(self);
        }
        dotted
            .split('.')
            .try_fold(self, |blk, name| blk.nested(name).map(|nb| &nb.block))
    }

    /// Resolves the nested block declaration at a dotted path, e.g. `backup.schedule`.
    pub fn nested_at(&self, dotted: &str) -> Option<&NestedBlock> {
        let (parent, name) = match dotted.rsplit_once('.') {
            Some((parent, name)) => (parent, name),
            None => ("", dotted),
        };
        self.block_at(parent).and_then(|b| b.nested(name))
    }

    /// Names of the attributes a configuration must supply.
    pub fn required_attributes(&self) -> Vec<&str> {
        self.attributes
            .iter()
            .flatten()
            .filter(|(_, a)| a.is_required())
            .map(|(n, _)| n.as_str())
            .collect()
    }

    /// Validates a configuration object for this block. `path` names the block in
    /// error messages; the root block is addressed by the empty path.
    pub fn validate(&self, path: &str, value: &Value) -> Result<()> {
        let entries = match value {
            Value::Object(entries) => entries,
            other => return Err(BindingError::mismatch(label(path), "object", other)),
        };

        for (name, attr) in self.attributes.iter().flatten() {
            match entries.get(name) {
                None | Some(Value::Null) if attr.is_required() => {
                    return Err(BindingError::missing(label(path), name))
                }
                None | Some(Value::Null) => {}
                Some(_) if attr.is_read_only() => {
                    return Err(BindingError::ReadOnlyAttribute(join(path, name)))
                }
                Some(v) => attr.value_type()?.check(&join(path, name), v)?,
            }
        }

        for (name, nested) in self.block_types.iter().flatten() {
            let child_path = join(path, name);
            let items: Vec<&Value> = match entries.get(name) {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(items)) => items.iter().collect(),
                Some(obj @ Value::Object(_)) if nested.is_singleton() => vec![obj],
                Some(other) => return Err(BindingError::mismatch(&child_path, "list", other)),
            };
            if items.len() < usize::from(nested.min_items.unwrap_or(0)) {
                return Err(BindingError::missing(label(path), name));
            }
            if let Some(max) = nested.max_items {
                if items.len() > usize::from(max) {
                    return Err(BindingError::TooManyItems {
                        block: child_path,
                        max,
                        got: items.len(),
                    });
                }
            }
            for (i, item) in items.iter().enumerate() {
                let item_path = if nested.is_singleton() {
                    child_path.clone()
                } else {
                    format!("{}[{}]", child_path, i)
                };
                nested.block.validate(&item_path, item)?;
            }
        }

        for name in entries.keys() {
            if self.attribute(name).is_none() && self.nested(name).is_none() {
                return Err(BindingError::UnknownAttribute {
                    block: label(path).to_owned(),
                    name: name.clone(),
                });
            }
        }
        Ok(())
    }
}

impl TerraformSchemaExport {
    /// Looks a resource schema up across every provider in the export.
    pub fn resource(&self, name: &str) -> Option<&SchemaItem> {
        self.provider_schemas
            .values()
            .filter_map(|s| s.resource_schemas.as_ref())
            .find_map(|r| r.get(name))
    }
}

pub fn read_tf_schema_from_file<P: AsRef<Path>>(path: P) -> Result<TerraformSchemaExport> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let export: TerraformSchemaExport = serde_json::from_reader(reader)?;
    Ok(export)
}

/// The schema export shipped with the crate.
pub fn embedded_schema() -> Result<TerraformSchemaExport> {
    Ok(serde_json::from_str(EMBEDDED_SCHEMA)?)
}

/// Schema of `azurerm_windows_web_app_slot`.
pub fn slot_schema() -> &'static SchemaItem {
    SLOT_SCHEMA.get_or_init(|| {
        embedded_schema()
            .ok()
            .and_then(|export| export.resource(RESOURCE_TYPE).cloned())
            .expect("embedded azurerm_windows_web_app_slot schema must parse")
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_embedded_schema_describes_slot() {
        let block = &slot_schema().block;
        let mut required = block.required_attributes();
        required.sort_unstable();
        assert_eq!(required, vec!["app_service_id", "name"]);
        assert!(block.nested("site_config").map(|b| b.is_required()).unwrap_or(false));
        assert!(block.block_at("site_config.auto_heal_setting.trigger.status_code").is_some());
        assert!(block.block_at("site_config.nope").is_none());
    }

    #[test]
    fn test_read_schema_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(include_bytes!("../tests/fixtures/test-provider-schema.json"))
            .unwrap();

        let export = read_tf_schema_from_file(file.path()).unwrap();
        assert_eq!(export.provider_schemas.len(), 1);
        assert!(export.resource("test_resource_a").is_some());
        assert!(export.resource("azurerm_windows_web_app_slot").is_none());
    }

    #[test]
    fn test_parse_type_expressions() {
        assert_eq!(ValueType::parse(&json!("bool")).unwrap(), ValueType::Bool);
        assert_eq!(
            ValueType::parse(&json!(["map", "string"])).unwrap(),
            ValueType::Map(Box::new(ValueType::String))
        );
        let creds = ValueType::parse(&json!(["list", ["object", {"name": "string"}]])).unwrap();
        assert_eq!(creds.to_string(), "list(object)");
        assert!(ValueType::parse(&json!("tuple")).is_err());
    }

    #[test]
    fn test_check_accepts_interpolation_only_for_strings() {
        assert!(ValueType::String.check("s", &json!("${var.name}")).is_ok());
        assert!(ValueType::Dynamic.check("d", &json!("${var.any}")).is_ok());
        assert!(ValueType::List(Box::new(ValueType::String))
            .check("l", &json!(["${var.origin}"]))
            .is_ok());

        let err = ValueType::Number.check("n", &json!("${var.count}")).unwrap_err();
        assert!(matches!(
            err,
            BindingError::TypeMismatch { ref expected, ref found, .. }
                if expected == "number" && found == "interpolation"
        ));
        assert!(ValueType::List(Box::new(ValueType::String))
            .check("l", &json!("${var.origins}"))
            .is_err());
        let err = ValueType::Number.check("n", &json!("three")).unwrap_err();
        assert!(matches!(
            err,
            BindingError::TypeMismatch { ref expected, ref found, .. }
                if expected == "number" && found == "string"
        ));
    }

    #[test]
    fn test_validate_reports_missing_nested_field() {
        let block = &slot_schema().block;
        let cfg = json!({
            "app_service_id": "/subscriptions/x/sites/app",
            "name": "staging",
            "site_config": {},
            "auth_settings": [{"enabled": true, "active_directory": [{}]}]
        });
        match block.validate("", &cfg).unwrap_err() {
            BindingError::MissingRequiredField { block, field } => {
                assert_eq!(block, "auth_settings.active_directory");
                assert_eq!(field, "client_id");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_validate_requires_site_config() {
        let cfg = json!({"app_service_id": "id", "name": "staging"});
        let err = slot_schema().block.validate("", &cfg).unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing required field `site_config` in `azurerm_windows_web_app_slot`"
        );
    }

    #[test]
    fn test_validate_limits_singleton_blocks() {
        let cfg = json!({
            "app_service_id": "id",
            "name": "staging",
            "site_config": [{}, {}]
        });
        assert!(matches!(
            slot_schema().block.validate("", &cfg),
            Err(BindingError::TooManyItems { max: 1, got: 2, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_computed_attributes() {
        let cfg = json!({
            "app_service_id": "id",
            "name": "staging",
            "site_config": {},
            "default_hostname": "staging.azurewebsites.net"
        });
        assert!(matches!(
            slot_schema().block.validate("", &cfg),
            Err(BindingError::ReadOnlyAttribute(ref path)) if path == "default_hostname"
        ));
    }

    #[test]
    fn test_nested_at_resolves_declarations() {
        let block = &slot_schema().block;
        assert!(block.nested_at("backup.schedule").map(|n| n.is_required()).unwrap_or(false));
        assert!(block.nested_at("timeouts").map(|n| n.is_singleton()).unwrap_or(false));
        assert!(block.nested_at("connection_string").map(|n| !n.is_singleton()).unwrap_or(false));
        assert!(block.nested_at("site_config.missing").is_none());
    }

    #[test]
    fn test_validate_rejects_unknown_keys() {
        let cfg = json!({
            "app_service_id": "id",
            "name": "staging",
            "site_config": {"always_on": true, "alwayson": true}
        });
        assert!(matches!(
            slot_schema().block.validate("", &cfg),
            Err(BindingError::UnknownAttribute { ref block, ref name })
                if block == "site_config" && name == "alwayson"
        ));
    }

    #[test]
    fn test_validate_indexes_repeated_blocks() {
        let cfg = json!({
            "app_service_id": "id",
            "name": "staging",
            "site_config": {},
            "connection_string": [
                {"name": "db", "type": "SQLAzure", "value": "Server=..."},
                {"name": "cache", "type": "RedisCache"}
            ]
        });
        match slot_schema().block.validate("", &cfg).unwrap_err() {
            BindingError::MissingRequiredField { block, field } => {
                assert_eq!(block, "connection_string[1]");
                assert_eq!(field, "value");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
