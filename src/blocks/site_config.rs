//! `site_config`: runtime and networking configuration of the slot.

use super::{required_singleton, singleton, Block};
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

#[derive(Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub always_on: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_definition_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_management_api_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_command_line: Option<String>,
    #[serde(default, deserialize_with = "singleton", skip_serializing_if = "Option::is_none")]
    pub application_stack: Option<ApplicationStack>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_heal_enabled: Option<bool>,
    #[serde(default, deserialize_with = "singleton", skip_serializing_if = "Option::is_none")]
    pub auto_heal_setting: Option<AutoHealSetting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_swap_slot_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_registry_managed_identity_client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_registry_use_managed_identity: Option<bool>,
    #[serde(default, deserialize_with = "singleton", skip_serializing_if = "Option::is_none")]
    pub cors: Option<Cors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_documents: Option<Vec<String>>,
    /// `AllAllowed`, `FtpsOnly` or `Disabled`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ftps_state: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub handler_mapping: Vec<HandlerMapping>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_eviction_time_in_min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http2_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ip_restriction: Vec<IpRestriction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_restriction_default_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_balancing_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_mysql_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed_pipeline_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_tls_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_debugging_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_debugging_version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scm_ip_restriction: Vec<ScmIpRestriction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scm_ip_restriction_default_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scm_minimum_tls_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scm_use_main_ip_restriction: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_32_bit_worker: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub virtual_application: Vec<VirtualApplication>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vnet_route_all_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub websockets_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_count: Option<i64>,
}

impl Block for SiteConfig {
    const PATH: &'static str = "site_config";
}

#[derive(Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct ApplicationStack {
    /// `dotnet`, `dotnetcore`, `node`, `python`, `php` or `java`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_image_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_registry_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_registry_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_registry_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dotnet_core_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dotnet_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub java_embedded_server_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub java_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub php_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tomcat_version: Option<String>,
}

impl Block for ApplicationStack {
    const PATH: &'static str = "site_config.application_stack";
}

#[derive(Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct AutoHealSetting {
    #[serde(deserialize_with = "required_singleton")]
    pub action: AutoHealAction,
    #[serde(deserialize_with = "required_singleton")]
    pub trigger: AutoHealTrigger,
}

impl Block for AutoHealSetting {
    const PATH: &'static str = "site_config.auto_heal_setting";
}

#[derive(Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct AutoHealAction {
    /// `CustomAction`, `LogEvent` or `Recycle`.
    pub action_type: String,
    #[serde(default, deserialize_with = "singleton", skip_serializing_if = "Option::is_none")]
    pub custom_action: Option<AutoHealCustomAction>,
    /// `hh:mm:ss`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_process_execution_time: Option<String>,
}

impl AutoHealAction {
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            custom_action: None,
            minimum_process_execution_time: None,
        }
    }
}

impl Block for AutoHealAction {
    const PATH: &'static str = "site_config.auto_heal_setting.action";
}

#[derive(Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct AutoHealCustomAction {
    pub executable: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<String>,
}

impl Block for AutoHealCustomAction {
    const PATH: &'static str = "site_config.auto_heal_setting.action.custom_action";
}

#[derive(Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct AutoHealTrigger {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_memory_kb: Option<i64>,
    #[serde(default, deserialize_with = "singleton", skip_serializing_if = "Option::is_none")]
    pub requests: Option<AutoHealRequests>,
    #[serde(default, deserialize_with = "singleton", skip_serializing_if = "Option::is_none")]
    pub slow_request: Option<AutoHealSlowRequest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status_code: Vec<AutoHealStatusCode>,
}

impl Block for AutoHealTrigger {
    const PATH: &'static str = "site_config.auto_heal_setting.trigger";
}

#[derive(Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct AutoHealRequests {
    pub count: i64,
    pub interval: String,
}

impl Block for AutoHealRequests {
    const PATH: &'static str = "site_config.auto_heal_setting.trigger.requests";
}

#[derive(Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct AutoHealSlowRequest {
    pub count: i64,
    pub interval: String,
    pub time_taken: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Block for AutoHealSlowRequest {
    const PATH: &'static str = "site_config.auto_heal_setting.trigger.slow_request";
}

#[derive(Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct AutoHealStatusCode {
    pub count: i64,
    pub interval: String,
    /// Single code or range, e.g. `500` or `500-599`.
    pub status_code_range: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_status: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub win32_status_code: Option<i64>,
}

impl Block for AutoHealStatusCode {
    const PATH: &'static str = "site_config.auto_heal_setting.trigger.status_code";
}

#[derive(Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Cors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_credentials: Option<bool>,
}

impl Block for Cors {
    const PATH: &'static str = "site_config.cors";
}

#[derive(Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct HandlerMapping {
    pub extension: String,
    pub script_processor_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}

impl Block for HandlerMapping {
    const PATH: &'static str = "site_config.handler_mapping";
}

/// Access rule for the main site.
#[derive(Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct IpRestriction {
    /// `Allow` or `Deny`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "singleton", skip_serializing_if = "Option::is_none")]
    pub headers: Option<IpRestrictionHeaders>,
    /// CIDR of the matched address range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_network_subnet_id: Option<String>,
}

impl IpRestriction {
    pub fn allow_cidr(name: impl Into<String>, cidr: impl Into<String>, priority: i64) -> Self {
        Self {
            action: Some("Allow".to_owned()),
            ip_address: Some(cidr.into()),
            name: Some(name.into()),
            priority: Some(priority),
            ..Default::default()
        }
    }
}

impl Block for IpRestriction {
    const PATH: &'static str = "site_config.ip_restriction";
}

#[derive(Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct IpRestrictionHeaders {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_azure_fdid: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_fd_health_probe: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_forwarded_for: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_forwarded_host: Option<Vec<String>>,
}

impl Block for IpRestrictionHeaders {
    const PATH: &'static str = "site_config.ip_restriction.headers";
}

/// Access rule for the Kudu (SCM) site. Same fields as [`IpRestriction`],
/// bound to `site_config.scm_ip_restriction`.
#[derive(Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScmIpRestriction(pub IpRestriction);

impl ScmIpRestriction {
    pub fn allow_cidr(name: impl Into<String>, cidr: impl Into<String>, priority: i64) -> Self {
        Self(IpRestriction::allow_cidr(name, cidr, priority))
    }
}

impl From<IpRestriction> for ScmIpRestriction {
    fn from(rule: IpRestriction) -> Self {
        Self(rule)
    }
}

impl Deref for ScmIpRestriction {
    type Target = IpRestriction;

    fn deref(&self) -> &IpRestriction {
        &self.0
    }
}

impl DerefMut for ScmIpRestriction {
    fn deref_mut(&mut self) -> &mut IpRestriction {
        &mut self.0
    }
}

impl Block for ScmIpRestriction {
    const PATH: &'static str = "site_config.scm_ip_restriction";
}

#[derive(Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScmIpRestrictionHeaders(pub IpRestrictionHeaders);

impl Deref for ScmIpRestrictionHeaders {
    type Target = IpRestrictionHeaders;

    fn deref(&self) -> &IpRestrictionHeaders {
        &self.0
    }
}

impl Block for ScmIpRestrictionHeaders {
    const PATH: &'static str = "site_config.scm_ip_restriction.headers";
}

#[derive(Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct VirtualApplication {
    pub physical_path: String,
    pub preload: bool,
    pub virtual_path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub virtual_directory: Vec<VirtualDirectory>,
}

impl VirtualApplication {
    pub fn new(virtual_path: impl Into<String>, physical_path: impl Into<String>, preload: bool) -> Self {
        Self {
            physical_path: physical_path.into(),
            preload,
            virtual_path: virtual_path.into(),
            virtual_directory: Vec::new(),
        }
    }
}

impl Block for VirtualApplication {
    const PATH: &'static str = "site_config.virtual_application";
}

#[derive(Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct VirtualDirectory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_path: Option<String>,
}

impl Block for VirtualDirectory {
    const PATH: &'static str = "site_config.virtual_application.virtual_directory";
}
