//! The boundary between the binding and whatever engine owns resource state.
//!
//! Bindings never store attribute values themselves: every read, write and reset
//! is an [`Engine`] call addressed by the resource's logical id and an
//! [`AttrPath`]. [`MemoryEngine`] keeps everything in process and is what the
//! CLI and the tests run against.

use crate::error::{BindingError, Result};
use serde_json::{json, Map, Value};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Segment {
    Field(String),
    Index(usize),
}

/// Address of a value inside a resource, e.g. `site_config.ip_restriction[2].name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct AttrPath(Vec<Segment>);

impl AttrPath {
    pub fn root() -> Self {
        AttrPath(Vec::new())
    }

    pub fn field(name: &str) -> Self {
        AttrPath(vec![Segment::Field(name.to_owned())])
    }

    pub fn join(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Field(name.to_owned()));
        AttrPath(segments)
    }

    pub fn index(&self, i: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Index(i));
        AttrPath(segments)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Terraform's dotted attribute form, with list indexes as plain numbers.
    pub fn to_dotted(&self) -> String {
        self.0
            .iter()
            .map(|s| match s {
                Segment::Field(f) => f.clone(),
                Segment::Index(i) => i.to_string(),
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for AttrPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Field(name) if pos == 0 => write!(f, "{}", name)?,
                Segment::Field(name) => write!(f, ".{}", name)?,
                Segment::Index(i) => write!(f, "[{}]", i)?,
            }
        }
        Ok(())
    }
}

impl FromStr for AttrPath {
    type Err = BindingError;

    /// Accepts both `a.b[0].c` and `a.b.0.c`.
    fn from_str(s: &str) -> Result<Self> {
        let mut segments = Vec::new();
        for part in s.split('.').filter(|p| !p.is_empty()) {
            let (name, mut rest) = match part.find('[') {
                Some(pos) => part.split_at(pos),
                None => (part, ""),
            };
            if let Ok(i) = name.parse::<usize>() {
                segments.push(Segment::Index(i));
            } else if !name.is_empty() {
                segments.push(Segment::Field(name.to_owned()));
            }
            while let Some(stripped) = rest.strip_prefix('[') {
                let end = stripped.find(']').ok_or_else(|| BindingError::TypeMismatch {
                    path: s.to_owned(),
                    expected: "attribute path".to_owned(),
                    found: "unterminated index".to_owned(),
                })?;
                let i = stripped[..end]
                    .parse::<usize>()
                    .map_err(|_| BindingError::TypeMismatch {
                        path: s.to_owned(),
                        expected: "list index".to_owned(),
                        found: stripped[..end].to_owned(),
                    })?;
                segments.push(Segment::Index(i));
                rest = &stripped[end + 1..];
            }
        }
        Ok(AttrPath(segments))
    }
}

/// Engine operations beyond plain attribute access.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    /// Fully qualified name, `<type>.<id>`.
    Fqn,
    /// Reference expression for an attribute, `${<type>.<id>.<path>}`.
    InterpolationFor(AttrPath),
    /// Raw JSON merged over the configuration at synthesis time.
    AddOverride(AttrPath, Value),
    /// The resource's Terraform JSON document.
    Synthesize,
}

pub trait Engine {
    /// Declares a resource with its initial configuration.
    fn create(&self, resource_type: &str, id: &str, config: Value) -> Result<()>;

    /// Reads a value, falling back to engine-known state when not configured.
    fn get(&self, id: &str, path: &AttrPath) -> Result<Option<Value>>;

    fn set(&self, id: &str, path: &AttrPath, value: Value) -> Result<()>;

    /// Drops the configured value at `path`.
    fn reset(&self, id: &str, path: &AttrPath) -> Result<()>;

    fn invoke(&self, id: &str, call: Call) -> Result<Value>;
}

#[derive(Debug, Clone)]
struct Declared {
    resource_type: String,
    config: Value,
    state: Value,
    overrides: Value,
}

/// In-process engine keeping declared configuration and applied state per resource.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    resources: RefCell<BTreeMap<String, Declared>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records provider-computed values for a declared resource, as an apply would.
    pub fn apply_state(&self, id: &str, state: Value) -> Result<()> {
        let mut resources = self.resources.borrow_mut();
        let declared = resources
            .get_mut(id)
            .ok_or_else(|| BindingError::UnknownResource(id.to_owned()))?;
        merge(&mut declared.state, state);
        debug!(resource = id, "state applied");
        Ok(())
    }

    /// Terraform JSON for every declared resource.
    pub fn synthesize(&self) -> Value {
        let mut by_type: BTreeMap<String, Map<String, Value>> = BTreeMap::new();
        for (id, declared) in self.resources.borrow().iter() {
            by_type
                .entry(declared.resource_type.clone())
                .or_default()
                .insert(id.clone(), declared.rendered());
        }
        json!({ "resource": by_type })
    }

    pub fn resource_ids(&self) -> Vec<String> {
        self.resources.borrow().keys().cloned().collect()
    }

    fn with_declared<T>(&self, id: &str, f: impl FnOnce(&mut Declared) -> Result<T>) -> Result<T> {
        let mut resources = self.resources.borrow_mut();
        let declared = resources
            .get_mut(id)
            .ok_or_else(|| BindingError::UnknownResource(id.to_owned()))?;
        f(declared)
    }
}

impl Declared {
    fn rendered(&self) -> Value {
        let mut out = self.config.clone();
        merge(&mut out, self.overrides.clone());
        out
    }
}

impl Engine for MemoryEngine {
    fn create(&self, resource_type: &str, id: &str, config: Value) -> Result<()> {
        let mut resources = self.resources.borrow_mut();
        if resources.contains_key(id) {
            return Err(BindingError::DuplicateResource(id.to_owned()));
        }
        debug!(resource = id, resource_type, "resource declared");
        resources.insert(
            id.to_owned(),
            Declared {
                resource_type: resource_type.to_owned(),
                config,
                state: Value::Object(Map::new()),
                overrides: Value::Object(Map::new()),
            },
        );
        Ok(())
    }

    fn get(&self, id: &str, path: &AttrPath) -> Result<Option<Value>> {
        let resources = self.resources.borrow();
        let declared = resources
            .get(id)
            .ok_or_else(|| BindingError::UnknownResource(id.to_owned()))?;
        trace!(resource = id, path = %path, "get");
        let found = lookup(&declared.config, path)
            .filter(|v| !v.is_null())
            .or_else(|| lookup(&declared.state, path).filter(|v| !v.is_null()));
        Ok(found.cloned())
    }

    fn set(&self, id: &str, path: &AttrPath, value: Value) -> Result<()> {
        self.with_declared(id, |declared| {
            debug!(resource = id, path = %path, "set");
            assign(&mut declared.config, path, value)
        })
    }

    fn reset(&self, id: &str, path: &AttrPath) -> Result<()> {
        self.with_declared(id, |declared| {
            debug!(resource = id, path = %path, "reset");
            remove(&mut declared.config, path);
            Ok(())
        })
    }

    fn invoke(&self, id: &str, call: Call) -> Result<Value> {
        self.with_declared(id, |declared| match call {
            Call::Fqn => Ok(json!(format!("{}.{}", declared.resource_type, id))),
            Call::InterpolationFor(path) => Ok(json!(format!(
                "${{{}.{}.{}}}",
                declared.resource_type,
                id,
                path.to_dotted()
            ))),
            Call::AddOverride(path, value) => {
                debug!(resource = id, path = %path, "override added");
                assign(&mut declared.overrides, &path, value)?;
                Ok(Value::Null)
            }
            Call::Synthesize => Ok(json!({
                "resource": { declared.resource_type.clone(): { id: declared.rendered() } }
            })),
        })
    }
}

/// Walks `path`; an index applied to an object addresses the object itself, so
/// singleton blocks resolve whether stored as an object or a one-item list.
fn lookup<'v>(value: &'v Value, path: &AttrPath) -> Option<&'v Value> {
    path.segments()
        .iter()
        .try_fold(value, |current, segment| match (segment, current) {
            (Segment::Field(name), Value::Object(entries)) => entries.get(name),
            (Segment::Field(name), Value::Array(items)) if items.len() == 1 => {
                items[0].get(name.as_str())
            }
            (Segment::Index(i), Value::Array(items)) => items.get(*i),
            (Segment::Index(0), obj @ Value::Object(_)) => Some(obj),
            _ => None,
        })
}

fn is_single_item(value: &Value) -> bool {
    value.as_array().map_or(false, |items| items.len() == 1)
}

fn assign(target: &mut Value, path: &AttrPath, value: Value) -> Result<()> {
    let mut current = target;
    for segment in path.segments() {
        match segment {
            Segment::Field(name) => {
                if is_single_item(current) {
                    current = &mut current[0];
                }
                if current.is_null() {
                    *current = Value::Object(Map::new());
                }
                if !current.is_object() {
                    return Err(BindingError::mismatch(&path.to_string(), "object", current));
                }
                current = current
                    .as_object_mut()
                    .map(|entries| entries.entry(name.clone()).or_insert(Value::Null))
                    .ok_or_else(|| BindingError::mismatch(&path.to_string(), "object", &Value::Null))?;
            }
            Segment::Index(i) => {
                if *i == 0 && current.is_null() {
                    *current = Value::Object(Map::new());
                }
                if *i == 0 && current.is_object() {
                    continue;
                }
                let len = match current.as_array() {
                    Some(items) => items.len(),
                    None => usize::from(!current.is_null()),
                };
                current = current
                    .as_array_mut()
                    .and_then(|items| items.get_mut(*i))
                    .ok_or_else(|| BindingError::IndexOutOfRange {
                        path: path.to_string(),
                        index: *i,
                        len,
                    })?;
            }
        }
    }
    *current = value;
    Ok(())
}

fn remove(target: &mut Value, path: &AttrPath) {
    let (last, parent) = match path.segments().split_last() {
        Some(split) => split,
        None => {
            *target = Value::Object(Map::new());
            return;
        }
    };
    let mut current = target;
    for segment in parent {
        if let Segment::Field(_) = segment {
            if is_single_item(current) {
                current = &mut current[0];
            }
        }
        let next = match segment {
            Segment::Field(name) => current.get_mut(name.as_str()),
            Segment::Index(0) if current.is_object() => Some(current),
            Segment::Index(i) => current.get_mut(*i),
        };
        match next {
            Some(v) => current = v,
            None => return,
        }
    }
    match last {
        Segment::Field(name) => {
            if is_single_item(current) {
                current = &mut current[0];
            }
            if let Some(entries) = current.as_object_mut() {
                entries.remove(name);
            }
        }
        Segment::Index(i) => {
            if let Some(items) = current.as_array_mut() {
                if *i < items.len() {
                    items.remove(*i);
                }
            }
        }
    }
}

/// Deep-merges `patch` into `target`; objects merge key by key, anything else replaces.
fn merge(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(entries), Value::Object(patch)) => {
            for (k, v) in patch {
                merge(entries.entry(k).or_insert(Value::Null), v);
            }
        }
        (slot, patch) => *slot = patch,
    }
}
