//! The `azurerm_windows_web_app_slot` binding.

use crate::blocks::{
    required_singleton, singleton, AuthSettings, Backup, Block, ConnectionString, Identity, Logs,
    SiteConfig, StorageAccount, Timeouts,
};
use crate::config::BindingOptions;
use crate::engine::{AttrPath, Call, Engine, MemoryEngine};
use crate::error::{BindingError, Result};
use crate::reference::{BlockList, BlockRef, Handle};
use crate::schema::{meta_arguments, slot_schema, ValueType, RESOURCE_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap as Map;
use std::rc::Rc;
use tracing::{debug, warn};

/// Scope resources are declared in. Owns the engine handle shared by every
/// binding of the stack.
#[derive(Clone)]
pub struct Stack {
    engine: Rc<dyn Engine>,
    options: BindingOptions,
}

impl Stack {
    pub fn new(engine: Rc<dyn Engine>) -> Self {
        Self {
            engine,
            options: BindingOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BindingOptions) -> Self {
        if !options.type_check() {
            warn!("runtime type checks disabled; dynamic values reach the engine unchecked");
        }
        self.options = options;
        self
    }

    pub fn engine(&self) -> &Rc<dyn Engine> {
        &self.engine
    }

    pub fn options(&self) -> &BindingOptions {
        &self.options
    }
}

/// `lifecycle` meta-argument.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Lifecycle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_before_destroy: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prevent_destroy: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_changes: Option<Vec<String>>,
}

/// Terraform meta-arguments accepted by every resource. The field set follows
/// [`meta_arguments`], the same table the code generator injects.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Vec<String>>,
    /// Map or set of strings; kept as raw JSON since Terraform accepts both.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub for_each: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle: Option<Lifecycle>,
    /// Provider configuration, e.g. `azurerm.west`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl ResourceMeta {
    /// Moves the meta-arguments out of a resource body, checking each against
    /// its type.
    fn split_from(body: &mut Value) -> Result<Self> {
        let mut meta = serde_json::Map::new();
        if let Value::Object(entries) = body {
            for (key, t) in meta_arguments() {
                if let Some(v) = entries.remove(key) {
                    ValueType::parse(&t)?.check(key, &v)?;
                    meta.insert(key.to_owned(), v);
                }
            }
        }
        Ok(serde_json::from_value(Value::Object(meta))?)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowsWebAppSlotConfig {
    /// ID of the Windows Web App the slot belongs to.
    pub app_service_id: String,
    pub name: String,
    #[serde(deserialize_with = "required_singleton")]
    pub site_config: SiteConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_settings: Option<Map<String, String>>,
    #[serde(default, deserialize_with = "singleton", skip_serializing_if = "Option::is_none")]
    pub auth_settings: Option<AuthSettings>,
    #[serde(default, deserialize_with = "singleton", skip_serializing_if = "Option::is_none")]
    pub backup: Option<Backup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_affinity_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_certificate_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_certificate_exclusion_paths: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_certificate_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connection_string: Vec<ConnectionString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ftp_publish_basic_authentication_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub https_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "singleton", skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_vault_reference_identity_id: Option<String>,
    #[serde(default, deserialize_with = "singleton", skip_serializing_if = "Option::is_none")]
    pub logs: Option<Logs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_network_access_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_plan_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub storage_account: Vec<StorageAccount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Map<String, String>>,
    #[serde(default, deserialize_with = "singleton", skip_serializing_if = "Option::is_none")]
    pub timeouts: Option<Timeouts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_network_subnet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webdeploy_publish_basic_authentication_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_deploy_file: Option<String>,
    #[serde(flatten)]
    pub meta: ResourceMeta,
}

impl WindowsWebAppSlotConfig {
    pub fn new(
        app_service_id: impl Into<String>,
        name: impl Into<String>,
        site_config: SiteConfig,
    ) -> Self {
        Self {
            app_service_id: app_service_id.into(),
            name: name.into(),
            site_config,
            app_settings: None,
            auth_settings: None,
            backup: None,
            client_affinity_enabled: None,
            client_certificate_enabled: None,
            client_certificate_exclusion_paths: None,
            client_certificate_mode: None,
            connection_string: Vec::new(),
            enabled: None,
            ftp_publish_basic_authentication_enabled: None,
            https_only: None,
            id: None,
            identity: None,
            key_vault_reference_identity_id: None,
            logs: None,
            public_network_access_enabled: None,
            service_plan_id: None,
            storage_account: Vec::new(),
            tags: None,
            timeouts: None,
            virtual_network_subnet_id: None,
            webdeploy_publish_basic_authentication_enabled: None,
            zip_deploy_file: None,
            meta: ResourceMeta::default(),
        }
    }

    /// Builds a configuration from a Terraform JSON resource body, reporting the
    /// first missing required field or mistyped value.
    pub fn from_value(mut value: Value) -> Result<Self> {
        let meta = ResourceMeta::split_from(&mut value)?;
        slot_schema().block.validate("", &value)?;
        let mut config: Self = serde_json::from_value(value)?;
        config.meta = meta;
        Ok(config)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let mut body = self.to_value()?;
        ResourceMeta::split_from(&mut body)?;
        slot_schema().block.validate("", &body)
    }
}

/// One entry of the computed `site_credential` attribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteCredential {
    pub name: String,
    pub password: String,
}

macro_rules! required_attribute {
    ($(#[$doc:meta])* $name:ident, $setter:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $name(&self) -> Result<$ty> {
            self.handle
                .read(&AttrPath::field(stringify!($name)))?
                .ok_or_else(|| BindingError::missing(RESOURCE_TYPE, stringify!($name)))
        }

        pub fn $setter(&self, value: impl Into<$ty>) -> Result<()> {
            let value: $ty = value.into();
            self.handle.write(&AttrPath::field(stringify!($name)), &value)
        }
    };
}

macro_rules! optional_attribute {
    ($(#[$doc:meta])* $name:ident, $setter:ident, $reset:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $name(&self) -> Result<Option<$ty>> {
            self.handle.read(&AttrPath::field(stringify!($name)))
        }

        pub fn $setter(&self, value: impl Into<$ty>) -> Result<()> {
            let value: $ty = value.into();
            self.handle.write(&AttrPath::field(stringify!($name)), &value)
        }

        pub fn $reset(&self) -> Result<()> {
            self.handle.reset(&AttrPath::field(stringify!($name)))
        }
    };
}

macro_rules! computed_attribute {
    ($(#[$doc:meta])* $name:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $name(&self) -> Result<Option<$ty>> {
            self.handle.read(&AttrPath::field(stringify!($name)))
        }
    };
}

/// A declared `azurerm_windows_web_app_slot`. Every accessor reads or writes
/// through the stack's engine.
#[derive(Clone)]
pub struct WindowsWebAppSlot {
    handle: Handle,
}

impl WindowsWebAppSlot {
    pub const TF_RESOURCE_TYPE: &'static str = RESOURCE_TYPE;

    /// Validates `config` and declares the resource under `id` in `scope`.
    pub fn new(scope: &Stack, id: &str, config: WindowsWebAppSlotConfig) -> Result<Self> {
        config.validate()?;
        let mut body = config.to_value()?;
        if let (Some(alias), None) = (scope.options.provider_alias(), &config.meta.provider) {
            body["provider"] = Value::String(format!("azurerm.{}", alias));
        }
        scope.engine.create(RESOURCE_TYPE, id, body)?;
        debug!(resource = id, name = %config.name, "windows web app slot declared");
        Ok(Self {
            handle: Handle {
                engine: Rc::clone(&scope.engine),
                resource: id.to_owned(),
                type_check: scope.options.type_check(),
            },
        })
    }

    /// Logical id of the resource within its stack.
    pub fn logical_id(&self) -> &str {
        &self.handle.resource
    }

    pub fn fqn(&self) -> Result<String> {
        match self.handle.engine.invoke(&self.handle.resource, Call::Fqn)? {
            Value::String(s) => Ok(s),
            other => Err(BindingError::mismatch("fqn", "string", &other)),
        }
    }

    /// `${azurerm_windows_web_app_slot.<id>.<attribute>}`
    pub fn interpolation_for_attribute(&self, attribute: &str) -> Result<String> {
        self.handle.interpolation(&attribute.parse()?)
    }

    /// The resource's Terraform JSON document.
    pub fn to_terraform(&self) -> Result<Value> {
        self.handle
            .engine
            .invoke(&self.handle.resource, Call::Synthesize)
    }

    /// Merges raw JSON into the synthesized resource body at `path`.
    pub fn add_override(&self, path: &str, value: Value) -> Result<()> {
        self.handle
            .engine
            .invoke(&self.handle.resource, Call::AddOverride(path.parse()?, value))?;
        Ok(())
    }

    /// Untyped read of a top-level attribute or block.
    pub fn attribute(&self, name: &str) -> Result<Option<Value>> {
        self.handle
            .engine
            .get(&self.handle.resource, &AttrPath::field(name))
    }

    /// Untyped write of a top-level attribute or block. With runtime type checks
    /// enabled the value is checked against the resource schema first.
    pub fn set_attribute(&self, name: &str, value: Value) -> Result<()> {
        if self.handle.type_check {
            check_top_level(name, &value)?;
        }
        self.handle.write(&AttrPath::field(name), &value)
    }

    required_attribute!(app_service_id, set_app_service_id, String);
    required_attribute!(
        /// Name of the slot.
        name,
        set_name,
        String
    );

    optional_attribute!(app_settings, set_app_settings, reset_app_settings, Map<String, String>);
    optional_attribute!(
        client_affinity_enabled,
        set_client_affinity_enabled,
        reset_client_affinity_enabled,
        bool
    );
    optional_attribute!(
        client_certificate_enabled,
        set_client_certificate_enabled,
        reset_client_certificate_enabled,
        bool
    );
    optional_attribute!(
        /// Paths excluded from client certificate checks, separated by `;`.
        client_certificate_exclusion_paths,
        set_client_certificate_exclusion_paths,
        reset_client_certificate_exclusion_paths,
        String
    );
    optional_attribute!(
        /// `Required`, `Optional` or `OptionalInteractiveUser`.
        client_certificate_mode,
        set_client_certificate_mode,
        reset_client_certificate_mode,
        String
    );
    optional_attribute!(enabled, set_enabled, reset_enabled, bool);
    optional_attribute!(
        ftp_publish_basic_authentication_enabled,
        set_ftp_publish_basic_authentication_enabled,
        reset_ftp_publish_basic_authentication_enabled,
        bool
    );
    optional_attribute!(https_only, set_https_only, reset_https_only, bool);
    optional_attribute!(
        key_vault_reference_identity_id,
        set_key_vault_reference_identity_id,
        reset_key_vault_reference_identity_id,
        String
    );
    optional_attribute!(
        public_network_access_enabled,
        set_public_network_access_enabled,
        reset_public_network_access_enabled,
        bool
    );
    optional_attribute!(
        /// Service Plan to run the slot in; defaults to the parent app's plan.
        service_plan_id,
        set_service_plan_id,
        reset_service_plan_id,
        String
    );
    optional_attribute!(tags, set_tags, reset_tags, Map<String, String>);
    optional_attribute!(
        virtual_network_subnet_id,
        set_virtual_network_subnet_id,
        reset_virtual_network_subnet_id,
        String
    );
    optional_attribute!(
        webdeploy_publish_basic_authentication_enabled,
        set_webdeploy_publish_basic_authentication_enabled,
        reset_webdeploy_publish_basic_authentication_enabled,
        bool
    );
    optional_attribute!(zip_deploy_file, set_zip_deploy_file, reset_zip_deploy_file, String);

    computed_attribute!(id, String);
    computed_attribute!(custom_domain_verification_id, String);
    computed_attribute!(
        /// `<slot>.azurewebsites.net` style host name, known after apply.
        default_hostname,
        String
    );
    computed_attribute!(hosting_environment_id, String);
    computed_attribute!(kind, String);
    computed_attribute!(outbound_ip_address_list, Vec<String>);
    computed_attribute!(outbound_ip_addresses, String);
    computed_attribute!(possible_outbound_ip_address_list, Vec<String>);
    computed_attribute!(possible_outbound_ip_addresses, String);
    computed_attribute!(site_credential, Vec<SiteCredential>);

    fn block<B: Block>(&self) -> BlockRef<B> {
        BlockRef::new(self.handle.clone(), Handle::block_path::<B>(&AttrPath::root()))
    }

    fn blocks<B: Block>(&self) -> BlockList<B> {
        BlockList::new(self.handle.clone(), Handle::block_path::<B>(&AttrPath::root()))
    }

    pub fn site_config(&self) -> BlockRef<SiteConfig> {
        self.block()
    }

    pub fn put_site_config(&self, value: SiteConfig) -> Result<()> {
        self.site_config().put(&value)
    }

    pub fn auth_settings(&self) -> BlockRef<AuthSettings> {
        self.block()
    }

    pub fn put_auth_settings(&self, value: AuthSettings) -> Result<()> {
        self.auth_settings().put(&value)
    }

    pub fn reset_auth_settings(&self) -> Result<()> {
        self.auth_settings().reset()
    }

    pub fn backup(&self) -> BlockRef<Backup> {
        self.block()
    }

    pub fn put_backup(&self, value: Backup) -> Result<()> {
        self.backup().put(&value)
    }

    pub fn reset_backup(&self) -> Result<()> {
        self.backup().reset()
    }

    pub fn connection_string(&self) -> BlockList<ConnectionString> {
        self.blocks()
    }

    pub fn put_connection_string(&self, value: Vec<ConnectionString>) -> Result<()> {
        self.connection_string().put(&value)
    }

    pub fn reset_connection_string(&self) -> Result<()> {
        self.connection_string().reset()
    }

    /// Managed identity; `principal_id` and `tenant_id` resolve through
    /// [`BlockRef::attribute`] once known to the engine.
    pub fn identity(&self) -> BlockRef<Identity> {
        self.block()
    }

    pub fn put_identity(&self, value: Identity) -> Result<()> {
        self.identity().put(&value)
    }

    pub fn reset_identity(&self) -> Result<()> {
        self.identity().reset()
    }

    pub fn logs(&self) -> BlockRef<Logs> {
        self.block()
    }

    pub fn put_logs(&self, value: Logs) -> Result<()> {
        self.logs().put(&value)
    }

    pub fn reset_logs(&self) -> Result<()> {
        self.logs().reset()
    }

    pub fn storage_account(&self) -> BlockList<StorageAccount> {
        self.blocks()
    }

    pub fn put_storage_account(&self, value: Vec<StorageAccount>) -> Result<()> {
        self.storage_account().put(&value)
    }

    pub fn reset_storage_account(&self) -> Result<()> {
        self.storage_account().reset()
    }

    pub fn timeouts(&self) -> BlockRef<Timeouts> {
        self.block()
    }

    pub fn put_timeouts(&self, value: Timeouts) -> Result<()> {
        self.timeouts().put(&value)
    }

    pub fn reset_timeouts(&self) -> Result<()> {
        self.timeouts().reset()
    }
}

/// Declares a slot from a Terraform JSON resource body in a fresh in-memory
/// stack, applies `assignments` through [`WindowsWebAppSlot::set_attribute`]
/// and returns the synthesized document. The assignments are type checked
/// unless `options` disables runtime checks.
pub fn synthesize_body(
    body: Value,
    id: &str,
    options: BindingOptions,
    assignments: &[(String, Value)],
) -> Result<Value> {
    let config = WindowsWebAppSlotConfig::from_value(body)?;
    let stack = Stack::new(Rc::new(MemoryEngine::new())).with_options(options);
    let slot = WindowsWebAppSlot::new(&stack, id, config)?;
    for (name, value) in assignments {
        slot.set_attribute(name, value.clone())?;
    }
    slot.to_terraform()
}

/// Checks a dynamically supplied top-level value against the schema.
fn check_top_level(name: &str, value: &Value) -> Result<()> {
    let block = &slot_schema().block;
    if let Some(attr) = block.attribute(name) {
        if attr.is_read_only() {
            return Err(BindingError::ReadOnlyAttribute(name.to_owned()));
        }
        return attr.value_type()?.check(name, value);
    }
    match block.nested(name) {
        Some(nested) => {
            let items: Vec<&Value> = match value {
                Value::Array(items) => items.iter().collect(),
                obj @ Value::Object(_) if nested.is_singleton() => vec![obj],
                other => return Err(BindingError::mismatch(name, "list", other)),
            };
            if let Some(max) = nested.max_items {
                if items.len() > usize::from(max) {
                    return Err(BindingError::TooManyItems {
                        block: name.to_owned(),
                        max,
                        got: items.len(),
                    });
                }
            }
            items
                .into_iter()
                .try_for_each(|item| nested.block.validate(name, item))
        }
        None => Err(BindingError::UnknownAttribute {
            block: RESOURCE_TYPE.to_owned(),
            name: name.to_owned(),
        }),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::blocks::auth_settings::ActiveDirectory;
    use crate::blocks::site_config::{Cors, IpRestriction, ScmIpRestriction};
    use crate::test_utils::{sample_config, stack};
    use serde_json::json;

    #[test]
    fn test_construct_declares_resource() {
        let (engine, stack) = stack();
        let slot = WindowsWebAppSlot::new(&stack, "staging", sample_config()).unwrap();

        assert_eq!(slot.logical_id(), "staging");
        assert_eq!(slot.name().unwrap(), "staging");
        assert_eq!(engine.resource_ids(), vec!["staging".to_owned()]);
        assert_eq!(
            slot.fqn().unwrap(),
            "azurerm_windows_web_app_slot.staging"
        );
    }

    #[test]
    fn test_construct_requires_top_level_fields() {
        let (_, stack) = stack();
        for missing in ["app_service_id", "name", "site_config"].iter() {
            let mut body = sample_config().to_value().unwrap();
            body.as_object_mut().unwrap().remove(*missing);
            match WindowsWebAppSlotConfig::from_value(body).unwrap_err() {
                BindingError::MissingRequiredField { block, field } => {
                    assert_eq!(block, RESOURCE_TYPE);
                    assert_eq!(field, *missing);
                }
                other => panic!("unexpected error {:?}", other),
            }
        }

        let mut config = sample_config();
        config.backup = Some(Backup::new(
            "nightly",
            crate::blocks::BackupSchedule::new(1, "Day"),
            "https://x",
        ));
        assert!(WindowsWebAppSlot::new(&stack, "staging", config).is_ok());
    }

    #[test]
    fn test_construct_rejects_duplicate_ids() {
        let (_, stack) = stack();
        WindowsWebAppSlot::new(&stack, "staging", sample_config()).unwrap();
        assert!(matches!(
            WindowsWebAppSlot::new(&stack, "staging", sample_config()),
            Err(BindingError::DuplicateResource(_))
        ));
    }

    #[test]
    fn test_scalar_round_trip_and_reset() {
        let (engine, stack) = stack();
        let slot = WindowsWebAppSlot::new(&stack, "staging", sample_config()).unwrap();

        assert_eq!(slot.https_only().unwrap(), None);
        slot.set_https_only(true).unwrap();
        assert_eq!(slot.https_only().unwrap(), Some(true));

        engine
            .apply_state("staging", json!({"https_only": false}))
            .unwrap();
        slot.reset_https_only().unwrap();
        assert_eq!(slot.https_only().unwrap(), Some(false));

        slot.set_name("staging-2").unwrap();
        assert_eq!(slot.name().unwrap(), "staging-2");

        let mut settings = Map::new();
        settings.insert("WEBSITE_RUN_FROM_PACKAGE".to_owned(), "1".to_owned());
        slot.set_app_settings(settings.clone()).unwrap();
        assert_eq!(slot.app_settings().unwrap(), Some(settings));
        slot.reset_app_settings().unwrap();
        assert_eq!(slot.app_settings().unwrap(), None);
    }

    #[test]
    fn test_put_then_read_output_reference() {
        let (_, stack) = stack();
        let slot = WindowsWebAppSlot::new(&stack, "staging", sample_config()).unwrap();

        let mut auth = AuthSettings::new(true);
        auth.active_directory = Some(ActiveDirectory::new("abc"));
        slot.put_auth_settings(auth.clone()).unwrap();

        assert_eq!(slot.auth_settings().get().unwrap(), Some(auth));
        let ad = slot.auth_settings().child::<ActiveDirectory>();
        assert_eq!(
            ad.attribute_as::<String>("client_id").unwrap(),
            Some("abc".to_owned())
        );
        assert_eq!(ad.attribute("allowed_audiences").unwrap(), None);

        slot.reset_auth_settings().unwrap();
        assert_eq!(slot.auth_settings().get().unwrap(), None);
    }

    #[test]
    fn test_put_rejects_missing_sub_fields() {
        let (_, stack) = stack();
        let slot = WindowsWebAppSlot::new(&stack, "staging", sample_config()).unwrap();

        assert!(matches!(
            slot.set_attribute("backup", json!({"name": "nightly", "storage_account_url": "x"})),
            Err(BindingError::MissingRequiredField { ref field, .. }) if field == "schedule"
        ));
        assert!(matches!(
            slot.set_attribute("site_config", json!([{}, {}])),
            Err(BindingError::TooManyItems { max: 1, got: 2, .. })
        ));
        assert_eq!(
            slot.site_config()
                .child::<crate::blocks::site_config::AutoHealSetting>()
                .get()
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_site_config_cannot_be_reset() {
        let (_, stack) = stack();
        let slot = WindowsWebAppSlot::new(&stack, "staging", sample_config()).unwrap();
        slot.site_config().set_attribute("always_on", json!(true)).unwrap();

        assert!(matches!(
            slot.site_config().reset(),
            Err(BindingError::MissingRequiredField { ref field, .. }) if field == "site_config"
        ));
        let doc = slot.to_terraform().unwrap();
        assert_eq!(
            doc["resource"]["azurerm_windows_web_app_slot"]["staging"]["site_config"]["always_on"],
            json!(true)
        );
    }

    #[test]
    fn test_lists_keep_insertion_order() {
        let (_, stack) = stack();
        let slot = WindowsWebAppSlot::new(&stack, "staging", sample_config()).unwrap();
        slot.put_connection_string(vec![
            ConnectionString::new("db", "SQLAzure", "Server=a"),
            ConnectionString::new("cache", "RedisCache", "host:6380"),
            ConnectionString::new("bus", "ServiceBus", "Endpoint=sb://"),
        ])
        .unwrap();

        let list = slot.connection_string();
        assert_eq!(list.len().unwrap(), 3);
        let names: Vec<String> = (0..3)
            .filter_map(|i| list.get(i).get().unwrap())
            .map(|cs| cs.name)
            .collect();
        assert_eq!(names, vec!["db", "cache", "bus"]);

        slot.reset_connection_string().unwrap();
        assert!(slot.connection_string().is_empty().unwrap());
    }

    #[test]
    fn test_dynamic_setter_type_check() {
        let (_, stack) = stack();
        let slot = WindowsWebAppSlot::new(&stack, "staging", sample_config()).unwrap();

        assert!(matches!(
            slot.set_attribute("https_only", json!("true")),
            Err(BindingError::TypeMismatch { ref expected, .. }) if expected == "bool"
        ));
        assert!(matches!(
            slot.set_attribute("default_hostname", json!("x")),
            Err(BindingError::ReadOnlyAttribute(_))
        ));
        assert!(matches!(
            slot.set_attribute("https_only", json!("${var.https_only}")),
            Err(BindingError::TypeMismatch { ref found, .. }) if found == "interpolation"
        ));
        assert_eq!(slot.https_only().unwrap(), None);

        let unchecked = Stack::new(Rc::new(MemoryEngine::new()))
            .with_options(BindingOptions::new().with_type_check(false));
        let slot = WindowsWebAppSlot::new(&unchecked, "staging", sample_config()).unwrap();
        slot.set_attribute("https_only", json!("true")).unwrap();
        assert_eq!(slot.attribute("https_only").unwrap(), Some(json!("true")));
    }

    #[test]
    fn test_interpolations_read_back_through_typed_getters() {
        let (_, stack) = stack();
        let slot = WindowsWebAppSlot::new(&stack, "staging", sample_config()).unwrap();

        slot.set_attribute("service_plan_id", json!("${azurerm_service_plan.plan.id}"))
            .unwrap();
        assert_eq!(
            slot.service_plan_id().unwrap().as_deref(),
            Some("${azurerm_service_plan.plan.id}")
        );
        assert!(slot
            .site_config()
            .set_attribute("always_on", json!("${var.always_on}"))
            .is_err());
        assert!(slot.site_config().get().is_ok());

        let mut body = sample_config().to_value().unwrap();
        body["https_only"] = json!("${var.https_only}");
        assert!(matches!(
            WindowsWebAppSlotConfig::from_value(body),
            Err(BindingError::TypeMismatch { ref path, .. }) if path == "https_only"
        ));
    }

    #[test]
    fn test_scm_rules_read_back_through_references() {
        let (_, stack) = stack();
        let mut config = sample_config();
        config.site_config.ip_restriction = vec![IpRestriction::allow_cidr("office", "10.0.0.0/24", 100)];
        config.site_config.scm_ip_restriction = vec![
            ScmIpRestriction::allow_cidr("build-agents", "20.0.0.0/16", 300),
            ScmIpRestriction::allow_cidr("vpn", "172.16.0.0/12", 310),
        ];
        let slot = WindowsWebAppSlot::new(&stack, "staging", config).unwrap();

        let scm = slot.site_config().list::<ScmIpRestriction>();
        assert_eq!(scm.len().unwrap(), 2);
        assert_eq!(
            scm.get(1).get().unwrap(),
            Some(ScmIpRestriction::allow_cidr("vpn", "172.16.0.0/12", 310))
        );
        assert_eq!(
            scm.get(0).attribute_as::<String>("name").unwrap().as_deref(),
            Some("build-agents")
        );
        assert_eq!(
            scm.get(0).interpolation("ip_address").unwrap(),
            "${azurerm_windows_web_app_slot.staging.site_config.0.scm_ip_restriction.0.ip_address}"
        );
        assert_eq!(slot.site_config().list::<IpRestriction>().len().unwrap(), 1);
    }

    #[test]
    fn test_computed_attributes_come_from_state() {
        let (engine, stack) = stack();
        let slot = WindowsWebAppSlot::new(&stack, "staging", sample_config()).unwrap();
        assert_eq!(slot.default_hostname().unwrap(), None);

        engine
            .apply_state(
                "staging",
                json!({
                    "id": "/subscriptions/x/sites/app/slots/staging",
                    "default_hostname": "app-staging.azurewebsites.net",
                    "outbound_ip_address_list": ["10.0.0.1", "10.0.0.2"],
                    "site_credential": [{"name": "$app__staging", "password": "p"}],
                    "identity": {"principal_id": "0000"}
                }),
            )
            .unwrap();

        assert_eq!(
            slot.default_hostname().unwrap().as_deref(),
            Some("app-staging.azurewebsites.net")
        );
        assert_eq!(slot.outbound_ip_address_list().unwrap().map(|l| l.len()), Some(2));
        assert_eq!(
            slot.site_credential().unwrap().map(|c| c[0].name.clone()),
            Some("$app__staging".to_owned())
        );
        assert_eq!(
            slot.identity().attribute("principal_id").unwrap(),
            Some(json!("0000"))
        );
    }

    #[test]
    fn test_synthesis_and_references() {
        let engine = Rc::new(MemoryEngine::new());
        let stack = Stack::new(engine.clone())
            .with_options(BindingOptions::new().with_provider_alias(Some("west".into())));
        let mut config = sample_config();
        config.site_config.cors = Some(Cors {
            allowed_origins: Some(vec!["https://contoso.com".into()]),
            support_credentials: None,
        });
        config.site_config.ip_restriction = vec![IpRestriction::allow_cidr("office", "10.0.0.0/24", 100)];
        config.meta.depends_on = Some(vec!["azurerm_windows_web_app.app".into()]);
        let slot = WindowsWebAppSlot::new(&stack, "staging", config).unwrap();
        slot.add_override("site_config.0.always_on", json!(false))
            .unwrap();

        let doc = slot.to_terraform().unwrap();
        let body = &doc["resource"]["azurerm_windows_web_app_slot"]["staging"];
        assert_eq!(body["provider"], json!("azurerm.west"));
        assert_eq!(body["depends_on"], json!(["azurerm_windows_web_app.app"]));
        assert_eq!(body["site_config"]["always_on"], json!(false));
        assert_eq!(
            body["site_config"]["ip_restriction"][0]["ip_address"],
            json!("10.0.0.0/24")
        );
        assert_eq!(engine.synthesize()["resource"], doc["resource"]);

        assert_eq!(
            slot.interpolation_for_attribute("default_hostname").unwrap(),
            "${azurerm_windows_web_app_slot.staging.default_hostname}"
        );
        assert_eq!(
            slot.site_config().interpolation("always_on").unwrap(),
            "${azurerm_windows_web_app_slot.staging.site_config.0.always_on}"
        );
    }

    #[test]
    fn test_meta_arguments_survive_loose_construction() {
        let mut body = sample_config().to_value().unwrap();
        body["count"] = json!(2);
        body["lifecycle"] = json!({"ignore_changes": ["tags"]});
        let config = WindowsWebAppSlotConfig::from_value(body).unwrap();
        assert_eq!(config.meta.count, Some(2));
        assert_eq!(
            config.meta.lifecycle.and_then(|l| l.ignore_changes),
            Some(vec!["tags".to_owned()])
        );
    }

    #[test]
    fn test_meta_arguments_match_generated_fields() {
        let meta = ResourceMeta {
            count: Some(1),
            depends_on: Some(vec![]),
            for_each: Some(json!({})),
            lifecycle: Some(Lifecycle::default()),
            provider: Some("azurerm".into()),
        };
        let fields: Vec<String> = serde_json::to_value(&meta)
            .unwrap()
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        let expected: Vec<String> = meta_arguments()
            .iter()
            .map(|(name, _)| (*name).to_owned())
            .collect();
        assert_eq!(fields, expected);
    }

    #[test]
    fn test_for_each_and_lifecycle_reach_the_document() {
        let mut body = sample_config().to_value().unwrap();
        body["for_each"] = json!({"blue": "b", "green": "g"});
        body["lifecycle"] = json!({"create_before_destroy": true});
        let config = WindowsWebAppSlotConfig::from_value(body).unwrap();
        assert_eq!(config.meta.for_each, Some(json!({"blue": "b", "green": "g"})));

        let (_, stack) = stack();
        let slot = WindowsWebAppSlot::new(&stack, "staging", config).unwrap();
        let doc = slot.to_terraform().unwrap();
        let body = &doc["resource"]["azurerm_windows_web_app_slot"]["staging"];
        assert_eq!(body["for_each"]["green"], json!("g"));
        assert_eq!(body["lifecycle"]["create_before_destroy"], json!(true));

        let mut body = sample_config().to_value().unwrap();
        body["count"] = json!("two");
        assert!(matches!(
            WindowsWebAppSlotConfig::from_value(body),
            Err(BindingError::TypeMismatch { ref path, .. }) if path == "count"
        ));
    }

    #[test]
    fn test_synthesize_body_applies_assignments() {
        let body = sample_config().to_value().unwrap();
        let assignments = vec![
            ("https_only".to_owned(), json!(true)),
            ("tags".to_owned(), json!({"env": "staging"})),
        ];
        let doc = synthesize_body(
            body.clone(),
            "blue",
            BindingOptions::new().with_provider_alias(Some("west".into())),
            &assignments,
        )
        .unwrap();
        let slot = &doc["resource"]["azurerm_windows_web_app_slot"]["blue"];
        assert_eq!(slot["https_only"], json!(true));
        assert_eq!(slot["tags"]["env"], json!("staging"));
        assert_eq!(slot["provider"], json!("azurerm.west"));

        let loose = vec![("https_only".to_owned(), json!("yes"))];
        assert!(matches!(
            synthesize_body(body.clone(), "blue", BindingOptions::new(), &loose),
            Err(BindingError::TypeMismatch { ref path, .. }) if path == "https_only"
        ));
        let doc = synthesize_body(
            body,
            "blue",
            BindingOptions::new().with_type_check(false),
            &loose,
        )
        .unwrap();
        assert_eq!(
            doc["resource"]["azurerm_windows_web_app_slot"]["blue"]["https_only"],
            json!("yes")
        );
    }

    #[test]
    fn test_synthesize_fixture_config() {
        let body: Value =
            serde_json::from_str(include_str!("../tests/fixtures/slot_config.json")).unwrap();
        let config = WindowsWebAppSlotConfig::from_value(body).unwrap();
        assert_eq!(config.site_config.ip_restriction.len(), 2);
        assert_eq!(config.identity.as_ref().map(|i| i.r#type.as_str()), Some("SystemAssigned"));

        let (_, stack) = stack();
        let slot = WindowsWebAppSlot::new(&stack, "staging", config).unwrap();
        assert_eq!(
            slot.connection_string().get(0).attribute("value").unwrap(),
            Some(json!("${var.db_connection}"))
        );
        assert_eq!(
            slot.site_config()
                .list::<IpRestriction>()
                .get(1)
                .attribute_as::<String>("service_tag")
                .unwrap()
                .as_deref(),
            Some("AzureFrontDoor.Backend")
        );

        let doc = slot.to_terraform().unwrap();
        let body = &doc["resource"]["azurerm_windows_web_app_slot"]["staging"];
        assert_eq!(body["https_only"], json!(true));
        assert_eq!(body["site_config"]["application_stack"]["current_stack"], json!("dotnet"));
        assert_eq!(body["depends_on"], json!(["azurerm_windows_web_app.app"]));
    }
}
