//! Output references: views over a block of a declared resource.
//!
//! A reference owns no values. It remembers which resource and which attribute
//! path it points at and resolves every read and write through the engine, so
//! two references to the same block always observe the same data.

use crate::blocks::Block;
use crate::engine::{AttrPath, Call, Engine, Segment};
use crate::error::{BindingError, Result};
use crate::schema::{slot_schema, RESOURCE_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;
use tracing::trace;

/// Engine handle of one declared resource.
#[derive(Clone)]
pub(crate) struct Handle {
    pub(crate) engine: Rc<dyn Engine>,
    pub(crate) resource: String,
    pub(crate) type_check: bool,
}

impl Handle {
    pub(crate) fn read<T: DeserializeOwned>(&self, path: &AttrPath) -> Result<Option<T>> {
        match self.engine.get(&self.resource, path)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub(crate) fn write<T: Serialize>(&self, path: &AttrPath, value: &T) -> Result<()> {
        self.engine
            .set(&self.resource, path, serde_json::to_value(value)?)
    }

    pub(crate) fn reset(&self, path: &AttrPath) -> Result<()> {
        self.engine.reset(&self.resource, path)
    }

    pub(crate) fn interpolation(&self, path: &AttrPath) -> Result<String> {
        match self
            .engine
            .invoke(&self.resource, Call::InterpolationFor(path.clone()))?
        {
            Value::String(s) => Ok(s),
            other => Err(BindingError::mismatch(&path.to_string(), "string", &other)),
        }
    }

    /// Path of block `B` below `parent`. Blocks Terraform models as one-item
    /// lists are addressed through index 0 so references render as `block.0.attr`.
    pub(crate) fn block_path<B: Block>(parent: &AttrPath) -> AttrPath {
        let name = B::PATH.rsplit('.').next().unwrap_or(B::PATH);
        let path = parent.join(name);
        match slot_schema().block.nested_at(B::PATH) {
            Some(nested) if nested.is_singleton() && !nested.is_object_mode() => path.index(0),
            _ => path,
        }
    }
}

/// View over a singleton block, or over one item of a repeated block.
pub struct BlockRef<B> {
    handle: Handle,
    path: AttrPath,
    _block: PhantomData<fn() -> B>,
}

impl<B> Clone for BlockRef<B> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            path: self.path.clone(),
            _block: PhantomData,
        }
    }
}

impl<B> fmt::Debug for BlockRef<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockRef")
            .field("resource", &self.handle.resource)
            .field("path", &self.path.to_string())
            .finish()
    }
}

impl<B: Block> BlockRef<B> {
    pub(crate) fn new(handle: Handle, path: AttrPath) -> Self {
        Self {
            handle,
            path,
            _block: PhantomData,
        }
    }

    pub fn path(&self) -> &AttrPath {
        &self.path
    }

    /// Current value of the whole block, `None` when neither configured nor known.
    pub fn get(&self) -> Result<Option<B>> {
        trace!(resource = %self.handle.resource, path = %self.path, "resolve block");
        self.handle.read(&self.path)
    }

    /// Replaces the block wholesale after checking its required fields.
    pub fn put(&self, value: &B) -> Result<()> {
        value.validate()?;
        self.handle.write(&self.path, value)
    }

    /// Removes the block from the configuration. Blocks the schema requires
    /// cannot be removed; replace them with [`put`](Self::put) instead.
    pub fn reset(&self) -> Result<()> {
        if is_singleton_path::<B>() {
            ensure_removable::<B>()?;
        }
        match self.path.segments().split_last() {
            Some((Segment::Index(0), parent)) if is_singleton_path::<B>() => {
                self.handle.reset(&parent_path(parent))
            }
            _ => self.handle.reset(&self.path),
        }
    }

    /// Raw value of a single attribute, including provider-computed ones.
    pub fn attribute(&self, name: &str) -> Result<Option<Value>> {
        self.handle.engine.get(&self.handle.resource, &self.path.join(name))
    }

    pub fn attribute_as<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        self.handle.read(&self.path.join(name))
    }

    /// Sets one attribute of the block, checking it against the schema when
    /// runtime type checks are enabled.
    pub fn set_attribute(&self, name: &str, value: Value) -> Result<()> {
        if self.handle.type_check {
            let schema = B::schema()?;
            let attr = schema
                .attribute(name)
                .ok_or_else(|| BindingError::UnknownAttribute {
                    block: B::PATH.to_owned(),
                    name: name.to_owned(),
                })?;
            let path = format!("{}.{}", B::PATH, name);
            if attr.is_read_only() {
                return Err(BindingError::ReadOnlyAttribute(path));
            }
            attr.value_type()?.check(&path, &value)?;
        }
        self.handle.write(&self.path.join(name), &value)
    }

    pub fn reset_attribute(&self, name: &str) -> Result<()> {
        self.handle.reset(&self.path.join(name))
    }

    /// Reference to a singleton sub-block.
    pub fn child<C: Block>(&self) -> BlockRef<C> {
        debug_assert!(
            is_direct_child(B::PATH, C::PATH),
            "`{}` is not a sub-block of `{}`",
            C::PATH,
            B::PATH
        );
        BlockRef::new(self.handle.clone(), Handle::block_path::<C>(&self.path))
    }

    /// Reference to a repeated sub-block.
    pub fn list<C: Block>(&self) -> BlockList<C> {
        debug_assert!(
            is_direct_child(B::PATH, C::PATH),
            "`{}` is not a sub-block of `{}`",
            C::PATH,
            B::PATH
        );
        BlockList::new(self.handle.clone(), Handle::block_path::<C>(&self.path))
    }

    /// `${...}` expression referring to an attribute of this block.
    pub fn interpolation(&self, name: &str) -> Result<String> {
        self.handle.interpolation(&self.path.join(name))
    }
}

fn is_singleton_path<B: Block>() -> bool {
    slot_schema()
        .block
        .nested_at(B::PATH)
        .map(|n| n.is_singleton())
        .unwrap_or(false)
}

/// Fails when the schema requires at least one `B` block.
fn ensure_removable<B: Block>() -> Result<()> {
    match slot_schema().block.nested_at(B::PATH) {
        Some(nested) if nested.is_required() => {
            let (parent, name) = B::PATH.rsplit_once('.').unwrap_or((RESOURCE_TYPE, B::PATH));
            Err(BindingError::missing(parent, name))
        }
        _ => Ok(()),
    }
}

/// `site_config.cors` is a direct child of `site_config`; `site_config.cors`
/// is not one of `site_config.ip_restriction`.
fn is_direct_child(parent: &str, child: &str) -> bool {
    child
        .strip_prefix(parent)
        .and_then(|rest| rest.strip_prefix('.'))
        .map_or(false, |name| !name.is_empty() && !name.contains('.'))
}

fn parent_path(segments: &[Segment]) -> AttrPath {
    segments
        .iter()
        .fold(AttrPath::root(), |path, segment| match segment {
            Segment::Field(name) => path.join(name),
            Segment::Index(i) => path.index(*i),
        })
}

/// View over a repeated block; items keep their insertion order.
pub struct BlockList<B> {
    handle: Handle,
    path: AttrPath,
    _block: PhantomData<fn() -> B>,
}

impl<B> Clone for BlockList<B> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            path: self.path.clone(),
            _block: PhantomData,
        }
    }
}

impl<B> fmt::Debug for BlockList<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockList")
            .field("resource", &self.handle.resource)
            .field("path", &self.path.to_string())
            .finish()
    }
}

impl<B: Block> BlockList<B> {
    pub(crate) fn new(handle: Handle, path: AttrPath) -> Self {
        Self {
            handle,
            path,
            _block: PhantomData,
        }
    }

    pub fn path(&self) -> &AttrPath {
        &self.path
    }

    /// Reference to the item at `index`. Resolving a reference past the end
    /// yields `None`.
    pub fn get(&self, index: usize) -> BlockRef<B> {
        BlockRef::new(self.handle.clone(), self.path.index(index))
    }

    pub fn all(&self) -> Result<Vec<B>> {
        Ok(self.handle.read(&self.path)?.unwrap_or_default())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(match self.handle.engine.get(&self.handle.resource, &self.path)? {
            Some(Value::Array(items)) => items.len(),
            _ => 0,
        })
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Replaces every item, in order.
    pub fn put(&self, items: &[B]) -> Result<()> {
        for item in items {
            item.validate()?;
        }
        self.handle.write(&self.path, &items)
    }

    /// Removes every item. Fails when the schema requires at least one.
    pub fn reset(&self) -> Result<()> {
        ensure_removable::<B>()?;
        self.handle.reset(&self.path)
    }
}
