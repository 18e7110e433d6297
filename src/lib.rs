//! Typed Rust bindings for the `azurerm_windows_web_app_slot` Terraform resource.
//!
//! A [`WindowsWebAppSlot`](resource::WindowsWebAppSlot) is declared in a
//! [`Stack`](resource::Stack) from a [`WindowsWebAppSlotConfig`](resource::WindowsWebAppSlotConfig).
//! Construction checks the configuration against the resource schema shipped with the
//! crate; afterwards every getter, setter, `put_*` and `reset_*` operation goes through the
//! stack's [`Engine`](engine::Engine), so values supplied at construction, values written
//! later and values computed by the provider are all read from the same place.
//!
//! ## Quick Start
//!
//! ```
//! use azurerm_webapp_slot::blocks::site_config::{Cors, SiteConfig};
//! use azurerm_webapp_slot::engine::MemoryEngine;
//! use azurerm_webapp_slot::resource::{Stack, WindowsWebAppSlot, WindowsWebAppSlotConfig};
//! use std::rc::Rc;
//!
//! fn main() -> azurerm_webapp_slot::error::Result<()> {
//!     let stack = Stack::new(Rc::new(MemoryEngine::new()));
//!     let config = WindowsWebAppSlotConfig::new(
//!         "${azurerm_windows_web_app.app.id}",
//!         "staging",
//!         SiteConfig::default(),
//!     );
//!     let slot = WindowsWebAppSlot::new(&stack, "staging", config)?;
//!
//!     slot.set_https_only(true)?;
//!     slot.site_config().child::<Cors>().put(&Cors {
//!         allowed_origins: Some(vec!["https://contoso.com".to_owned()]),
//!         support_credentials: None,
//!     })?;
//!
//!     assert_eq!(slot.https_only()?, Some(true));
//!     assert_eq!(
//!         slot.interpolation_for_attribute("default_hostname")?,
//!         "${azurerm_windows_web_app_slot.staging.default_hostname}"
//!     );
//!     println!("{}", slot.to_terraform()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Generating bindings for other resources
//!
//! The [`registry`] and [`emit`] modules compile any resource of a Terraform provider
//! schema into Serde containers. Extract the schema from an initialized Terraform plan:
//!
//! ```bash
//! terraform providers schema -json > azurerm-provider-schema.json
//! ```
//!
//! and feed it to the `slotgen` tool:
//!
//! ```bash
//! cargo run --bin slotgen -- emit --schema azurerm-provider-schema.json --resource azurerm_linux_web_app > linux_web_app.rs
//! ```
//!
//! `slotgen synth` declares a slot from a Terraform JSON resource body and prints the
//! synthesized document.

pub mod blocks;

// code generator
pub mod emit;

// configuration of bindings and code generation
pub mod config;

pub mod engine;

pub mod error;

pub mod reference;

// registry creation
pub mod registry;

pub mod resource;

pub mod schema;

#[cfg(test)]
mod test_utils;

pub use error::{BindingError, Result};
pub use resource::{Stack, WindowsWebAppSlot, WindowsWebAppSlotConfig};
