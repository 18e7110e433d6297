// Copyright (c) Facebook, Inc. and its affiliates
// SPDX-License-Identifier: MIT OR Apache-2.0

//!
//! Stripped down version of serde reflection's code generator for Rust, limited
//! to the struct containers a Terraform block compiles to.
//!
use crate::config::CodeGeneratorConfig;
use serde_generate::indent::{IndentConfig, IndentedWriter};
use serde_reflection::{ContainerFormat, Format, Named};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io::{Error, ErrorKind, Result, Write};

/// Container formats indexed by Rust type name.
pub type Registry = BTreeMap<String, ContainerFormat>;

/// Main configuration object for code-generation in Rust.
pub struct CodeGenerator<'a> {
    /// Language-independent configuration.
    config: &'a CodeGeneratorConfig,
    /// Which derive macros should be added (independently from serialization).
    derive_macros: Vec<String>,
    /// Whether definitions and fields should be marked as `pub`.
    track_visibility: bool,
}

/// Shared state for the code generation of a Rust source file.
struct RustEmitter<'a, T> {
    out: IndentedWriter<T>,
    generator: &'a CodeGenerator<'a>,
    /// Definitions with a known size; other type names are boxed.
    known_sizes: HashSet<String>,
    /// Current namespace (e.g. vec!["my_module", "MyStruct"])
    current_namespace: Vec<String>,
}

impl<'a> CodeGenerator<'a> {
    /// Create a Rust code generator for the given config.
    pub fn new(config: &'a CodeGeneratorConfig) -> Self {
        Self {
            config,
            derive_macros: vec!["Clone", "Debug", "Default", "PartialEq"]
                .into_iter()
                .map(String::from)
                .collect(),
            track_visibility: true,
        }
    }

    pub fn with_track_visibility(mut self, track_visibility: bool) -> Self {
        self.track_visibility = track_visibility;
        self
    }

    /// Write container definitions in Rust.
    pub fn output(
        &self,
        out: &mut dyn Write,
        registry: &Registry,
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut known_sizes: HashSet<String> = self
            .config
            .external_definitions
            .values()
            .flatten()
            .cloned()
            .collect();
        known_sizes.insert("Value".to_owned());

        let mut emitter = RustEmitter {
            out: IndentedWriter::new(out, IndentConfig::Space(4)),
            generator: self,
            known_sizes,
            current_namespace: self
                .config
                .module_name()
                .split('.')
                .map(String::from)
                .collect(),
        };

        emitter.output_preamble()?;
        for (name, format) in registry {
            emitter.output_container(name, format)?;
            emitter.known_sizes.insert(name.clone());
        }
        Ok(())
    }
}

impl<'a, T> RustEmitter<'a, T>
where
    T: std::io::Write,
{
    fn output_comment(&mut self, name: &str) -> Result<()> {
        let mut path = self.current_namespace.clone();
        path.push(name.to_string());
        if let Some(doc) = self.generator.config.comments.get(&path) {
            let text = textwrap::indent(doc, "/// ").replace("\n\n", "\n///\n");
            write!(self.out, "\n{}", text)?;
        }
        Ok(())
    }

    fn output_preamble(&mut self) -> Result<()> {
        let external_names: BTreeSet<&String> = self
            .generator
            .config
            .external_definitions
            .values()
            .flatten()
            .collect();
        writeln!(self.out, "#![allow(unused_imports)]")?;
        if !external_names.iter().any(|n| n.as_str() == "Map") {
            writeln!(self.out, "use std::collections::BTreeMap as Map;")?;
        }
        writeln!(self.out, "use serde::{{Serialize, Deserialize}};")?;
        if !external_names.iter().any(|n| n.as_str() == "Value") {
            writeln!(self.out, "use serde_json::Value;")?;
        }
        for (module, definitions) in &self.generator.config.external_definitions {
            // Skip the empty module name.
            if !module.is_empty() {
                writeln!(self.out, "use {}::{{{}}};", module, definitions.join(", "))?;
            }
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn output_field_annotation(&mut self, format: &Format) -> Result<()> {
        if let Format::Option(_) = format {
            writeln!(
                self.out,
                "#[serde(skip_serializing_if = \"Option::is_none\")]"
            )?;
        }
        Ok(())
    }

    fn quote_type(format: &Format, known_sizes: Option<&HashSet<String>>) -> Result<String> {
        use Format::*;
        Ok(match format {
            TypeName(x) => match known_sizes {
                Some(set) if !set.contains(x) => format!("Box<{}>", x),
                _ => x.to_string(),
            },
            Unit => "()".into(),
            Bool => "bool".into(),
            I64 => "i64".into(),
            F64 => "f64".into(),
            Str => "String".into(),
            Option(format) => format!("Option<{}>", Self::quote_type(format, known_sizes)?),
            Seq(format) => format!("Vec<{}>", Self::quote_type(format, None)?),
            Map { key, value } => format!(
                "Map<{}, {}>",
                Self::quote_type(key, None)?,
                Self::quote_type(value, None)?
            ),
            other => {
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    format!("unsupported field format {:?}", other),
                ))
            }
        })
    }

    fn output_fields(&mut self, fields: &[Named<Format>]) -> Result<()> {
        let prefix = if self.generator.track_visibility {
            "pub "
        } else {
            ""
        };
        for field in fields {
            self.output_comment(&field.name)?;
            self.output_field_annotation(&field.value)?;
            let ty = Self::quote_type(&field.value, Some(&self.known_sizes))?;
            writeln!(self.out, "{}{}: {},", prefix, field.name, ty)?;
        }
        Ok(())
    }

    fn output_container(&mut self, name: &str, format: &ContainerFormat) -> Result<()> {
        let fields = match format {
            ContainerFormat::Struct(fields) => fields,
            other => {
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    format!("`{}` is not a struct container: {:?}", name, other),
                ))
            }
        };

        self.output_comment(name)?;
        let mut derive_macros = self.generator.derive_macros.clone();
        derive_macros.push("Serialize".to_string());
        derive_macros.push("Deserialize".to_string());
        writeln!(self.out, "#[derive({})]", derive_macros.join(", "))?;
        if self.generator.track_visibility {
            write!(self.out, "pub ")?;
        }

        writeln!(self.out, "struct {} {{", name)?;
        self.current_namespace.push(name.to_string());
        self.out.indent();
        self.output_fields(fields)?;
        self.out.unindent();
        self.current_namespace.pop();
        writeln!(self.out, "}}\n")
    }
}
