//! Compiles a resource schema into a serde-reflection registry, ready for
//! [`CodeGenerator`](crate::emit::CodeGenerator).

use crate::config::{CodeGeneratorConfig, DocComments};
use crate::emit::{CodeGenerator, Registry};
use crate::error::Result;
use crate::schema::{meta_arguments, Attribute, AttributeType, Block, SchemaItem, ValueType};
use serde_reflection::{ContainerFormat, Format, Named};
use std::collections::BTreeMap;
use std::io::Write;

pub const RESERVED_WORDS: [&str; 38] = [
    "as", "async", "await", "box", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where",
];

/// Field name as it must appear in Rust source.
pub fn field_name(name: &str) -> String {
    if RESERVED_WORDS.contains(&name) {
        format!("r#{}", name)
    } else {
        name.to_owned()
    }
}

/// `site_config` -> `SiteConfig`
pub fn type_name(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Registry of the containers making up resource `name`.
pub fn export_resource_to_registry(name: &str, item: &SchemaItem) -> Result<Registry> {
    Ok(export_resource("", name, item)?.0)
}

/// Registry of resource `name` together with doc comments taken from the schema
/// descriptions, keyed for a generator running on `module`.
pub fn export_resource(
    module: &str,
    name: &str,
    item: &SchemaItem,
) -> Result<(Registry, DocComments)> {
    let mut exporter = Exporter {
        namespace: module.split('.').map(String::from).collect(),
        registry: Registry::new(),
        comments: DocComments::new(),
    };
    let mut root = item.block.clone();
    inject_meta_arguments(&mut root);
    exporter.export_block(&type_name(name), &root)?;
    Ok((exporter.registry, exporter.comments))
}

pub fn generate_serde(
    module: &str,
    out: &mut dyn Write,
    registry: &Registry,
    comments: DocComments,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = CodeGeneratorConfig::new(module.to_string()).with_comments(comments);

    CodeGenerator::new(&config).output(out, registry)
}

struct Exporter {
    namespace: Vec<String>,
    registry: Registry,
    comments: DocComments,
}

impl Exporter {
    fn comment(&mut self, path: &[&str], text: Option<&String>) {
        if let Some(text) = text.filter(|t| !t.trim().is_empty()) {
            let mut key = self.namespace.clone();
            key.extend(path.iter().map(|s| s.to_string()));
            self.comments.insert(key, text.clone());
        }
    }

    fn export_block(&mut self, container: &str, blk: &Block) -> Result<()> {
        self.comment(&[container], blk.description.as_ref());
        let mut fields = Vec::new();

        for (an, at) in blk.attributes.iter().flatten() {
            let field = field_name(an);
            let format = self.export_type(&format!("{}{}", container, type_name(an)), &at.value_type()?)?;
            self.comment(&[container, field.as_str()], at.description.as_ref());
            fields.push(Named {
                name: field,
                value: if at.is_required() {
                    format
                } else {
                    Format::Option(Box::new(format))
                },
            });
        }

        for (bn, nested) in blk.block_types.iter().flatten() {
            let nested_name = format!("{}{}", container, type_name(bn));
            self.export_block(&nested_name, &nested.block)?;
            let seq = Format::Seq(Box::new(Format::TypeName(nested_name)));
            let field = field_name(bn);
            self.comment(&[container, field.as_str()], nested.block.description.as_ref());
            fields.push(Named {
                name: field,
                value: if nested.is_required() {
                    seq
                } else {
                    Format::Option(Box::new(seq))
                },
            });
        }

        self.registry
            .insert(container.to_owned(), ContainerFormat::Struct(fields));
        Ok(())
    }

    /// Object-typed attributes become containers of their own, named after the
    /// attribute.
    fn export_type(&mut self, container: &str, vt: &ValueType) -> Result<Format> {
        Ok(match vt {
            ValueType::String => Format::Str,
            ValueType::Number => Format::I64,
            ValueType::Bool => Format::Bool,
            ValueType::Dynamic => Format::TypeName("Value".to_owned()),
            ValueType::List(inner) | ValueType::Set(inner) => {
                Format::Seq(Box::new(self.export_type(container, inner)?))
            }
            ValueType::Map(inner) => Format::Map {
                key: Box::new(Format::Str),
                value: Box::new(self.export_type(container, inner)?),
            },
            ValueType::Object(attrs) => {
                let mut fields = Vec::new();
                for (an, at) in attrs {
                    let format = self.export_type(&format!("{}{}", container, type_name(an)), at)?;
                    fields.push(Named {
                        name: field_name(an),
                        value: Format::Option(Box::new(format)),
                    });
                }
                self.registry
                    .insert(container.to_owned(), ContainerFormat::Struct(fields));
                Format::TypeName(container.to_owned())
            }
        })
    }
}

/// Adds the Terraform meta-arguments every resource block accepts.
fn inject_meta_arguments(blk: &mut Block) {
    let attrs = blk.attributes.get_or_insert_with(BTreeMap::new);
    for (name, t) in meta_arguments() {
        attrs.insert(
            name.to_owned(),
            Attribute {
                r#type: AttributeType(t),
                optional: Some(true),
                ..Default::default()
            },
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::schema::{read_tf_schema_from_file, slot_schema, RESOURCE_TYPE};

    fn fields(registry: &Registry, container: &str) -> BTreeMap<String, Format> {
        match registry.get(container) {
            Some(ContainerFormat::Struct(fields)) => fields
                .iter()
                .map(|f| (f.name.clone(), f.value.clone()))
                .collect(),
            other => panic!("no struct {}: {:?}", container, other),
        }
    }

    #[test]
    fn test_type_and_field_names() {
        assert_eq!(type_name("azurerm_windows_web_app_slot"), "AzurermWindowsWebAppSlot");
        assert_eq!(type_name("site_config"), "SiteConfig");
        assert_eq!(field_name("type"), "r#type");
        assert_eq!(field_name("match"), "r#match");
        assert_eq!(field_name("name"), "name");
    }

    #[test]
    fn test_generate_registry_from_fixture() {
        let schema = read_tf_schema_from_file("./tests/fixtures/test-provider-schema.json").unwrap();
        let item = schema.resource("test_resource_a").unwrap();
        let registry = export_resource_to_registry("test_resource_a", item).unwrap();

        assert_eq!(registry.len(), 3);
        let root = fields(&registry, "TestResourceA");
        assert_eq!(root["name"], Format::Str);
        assert_eq!(root["priority"], Format::I64);
        assert_eq!(root["r#type"], Format::Option(Box::new(Format::Str)));
        assert_eq!(
            root["rule"],
            Format::Seq(Box::new(Format::TypeName("TestResourceARule".to_owned())))
        );
        assert!(root.contains_key("count"));
        assert!(root.contains_key("depends_on"));
        assert_eq!(
            root["for_each"],
            Format::Option(Box::new(Format::TypeName("Value".to_owned())))
        );
        assert_eq!(
            root["lifecycle"],
            Format::Option(Box::new(Format::TypeName("TestResourceALifecycle".to_owned())))
        );
        let lifecycle = fields(&registry, "TestResourceALifecycle");
        assert_eq!(
            lifecycle["ignore_changes"],
            Format::Option(Box::new(Format::Seq(Box::new(Format::Str))))
        );
        assert_eq!(lifecycle.len(), 3);

        let rule = fields(&registry, "TestResourceARule");
        assert_eq!(
            rule["r#match"],
            Format::Option(Box::new(Format::Seq(Box::new(Format::Str))))
        );
    }

    #[test]
    fn test_generate_registry_for_slot() {
        let (registry, comments) = export_resource("slot", RESOURCE_TYPE, slot_schema()).unwrap();

        let root = fields(&registry, "AzurermWindowsWebAppSlot");
        assert_eq!(
            root["site_config"],
            Format::Seq(Box::new(Format::TypeName(
                "AzurermWindowsWebAppSlotSiteConfig".to_owned()
            )))
        );
        assert!(matches!(root["auth_settings"], Format::Option(_)));
        assert_eq!(
            root["site_credential"],
            Format::Option(Box::new(Format::Seq(Box::new(Format::TypeName(
                "AzurermWindowsWebAppSlotSiteCredential".to_owned()
            )))))
        );
        assert!(registry.contains_key("AzurermWindowsWebAppSlotSiteConfigAutoHealSettingTriggerSlowRequest"));
        assert!(registry.contains_key("AzurermWindowsWebAppSlotSiteCredential"));

        let key: Vec<String> = vec!["slot".into(), "AzurermWindowsWebAppSlot".into(), "app_service_id".into()];
        assert_eq!(
            comments.get(&key).map(String::as_str),
            Some("The ID of the Windows Web App this Deployment Slot will be part of.")
        );
    }

    #[test]
    fn test_generate_serde_source() {
        let schema = read_tf_schema_from_file("./tests/fixtures/test-provider-schema.json").unwrap();
        let (registry, comments) =
            export_resource("test", "test_resource_a", schema.resource("test_resource_a").unwrap())
                .unwrap();
        let mut out = Vec::new();
        generate_serde("test", &mut out, &registry, comments).unwrap();
        let source = String::from_utf8(out).unwrap();

        assert!(source.contains("pub struct TestResourceA {"));
        assert!(source.contains("/// Name of the resource.\n    pub name: String,"));
        assert!(source.contains("pub r#type: Option<String>,"));
        assert!(source.contains("pub rule: Vec<TestResourceARule>,"));
        assert!(source.contains("#[serde(skip_serializing_if = \"Option::is_none\")]"));
        assert!(!source.contains("serde_bytes"));
    }
}
