//! Helpers shared by the unit tests.

use crate::blocks::SiteConfig;
use crate::engine::MemoryEngine;
use crate::resource::{Stack, WindowsWebAppSlotConfig};
use std::rc::Rc;

pub const APP_SERVICE_ID: &str =
    "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/rg/providers/Microsoft.Web/sites/app";

/// Smallest configuration accepted for a slot named `staging`.
pub fn sample_config() -> WindowsWebAppSlotConfig {
    WindowsWebAppSlotConfig::new(APP_SERVICE_ID, "staging", SiteConfig::default())
}

/// A stack backed by a fresh in-memory engine, returned alongside it so tests
/// can feed provider state.
pub fn stack() -> (Rc<MemoryEngine>, Stack) {
    let engine = Rc::new(MemoryEngine::new());
    let stack = Stack::new(engine.clone());
    (engine, stack)
}
