// Copyright (c) Facebook, Inc. and its affiliates
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;

/// Options for the Rust code generator.
#[derive(Clone, Debug)]
pub struct CodeGeneratorConfig {
    pub(crate) module_name: String,
    pub(crate) external_definitions: ExternalDefinitions,
    pub(crate) comments: DocComments,
}

/// Track types definitions provided by external modules.
pub type ExternalDefinitions =
    std::collections::BTreeMap</* module */ String, /* type names */ Vec<String>>;

/// Track documentation to be attached to particular definitions.
pub type DocComments =
    std::collections::BTreeMap</* qualified name */ Vec<String>, /* comment */ String>;

impl CodeGeneratorConfig {
    /// Default config for the given module name.
    pub fn new(module_name: String) -> Self {
        Self {
            module_name,
            external_definitions: BTreeMap::new(),
            comments: BTreeMap::new(),
        }
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Container names provided by external modules.
    pub fn with_external_definitions(mut self, external_definitions: ExternalDefinitions) -> Self {
        self.external_definitions = external_definitions;
        self
    }

    /// Comments attached to particular entity.
    pub fn with_comments(mut self, mut comments: DocComments) -> Self {
        // Make sure comments end with a (single) newline.
        for comment in comments.values_mut() {
            *comment = format!("{}\n", comment.trim());
        }
        self.comments = comments;
        self
    }
}

/// Behaviour of bindings declared in a [`Stack`](crate::resource::Stack).
#[derive(Clone, Debug)]
pub struct BindingOptions {
    pub(crate) type_check: bool,
    pub(crate) provider_alias: Option<String>,
}

impl Default for BindingOptions {
    fn default() -> Self {
        Self {
            type_check: true,
            provider_alias: None,
        }
    }
}

impl BindingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check dynamically supplied values against the resource schema.
    pub fn with_type_check(mut self, type_check: bool) -> Self {
        self.type_check = type_check;
        self
    }

    /// Provider configuration (`azurerm.<alias>`) every binding is attached to.
    pub fn with_provider_alias(mut self, alias: Option<String>) -> Self {
        self.provider_alias = alias;
        self
    }

    pub fn type_check(&self) -> bool {
        self.type_check
    }

    pub fn provider_alias(&self) -> Option<&str> {
        self.provider_alias.as_deref()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_comments_are_normalized() {
        let mut comments = DocComments::new();
        comments.insert(vec!["slot".into(), "name".into()], "  The name.\n\n".into());
        let config = CodeGeneratorConfig::new("slot".into()).with_comments(comments);
        assert_eq!(
            config.comments.get(&vec!["slot".to_string(), "name".to_string()]),
            Some(&"The name.\n".to_string())
        );
        assert_eq!(config.module_name(), "slot");
    }

    #[test]
    fn test_binding_options_default_to_checked() {
        let options = BindingOptions::new();
        assert!(options.type_check());
        assert_eq!(options.provider_alias(), None);

        let options = options
            .with_type_check(false)
            .with_provider_alias(Some("west".into()));
        assert!(!options.type_check());
        assert_eq!(options.provider_alias(), Some("west"));
    }
}
