//! Immutable, request-scoped carrier.
//!
//! A [`Carrier`] is a persistent chain of typed values. Deriving a carrier pushes a
//! new node in front of the parent's chain; the parent is shared, never modified.
//! Structured fields live under a crate-private key type, so callers storing their
//! own data through [`Carrier::with_value`] can never shadow or read them.

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::fields::Field;

struct Node {
    key: TypeId,
    value: Arc<dyn Any + Send + Sync>,
    parent: Option<Arc<Node>>,
}

/// Private key under which the accumulated field set is stored.
struct ContextFields(Arc<[Field]>);

/// Call-scoped value through which structured fields propagate.
///
/// Cloning is cheap (one reference count). The default value is the empty root
/// carrier.
#[derive(Clone, Default)]
pub struct Carrier {
    head: Option<Arc<Node>>,
}

impl Carrier {
    /// The empty root carrier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a carrier holding `value`, keyed by its type.
    ///
    /// A later value of the same type shadows the earlier one for lookups made
    /// through the derived carrier only.
    pub fn with_value<T: Any + Send + Sync>(&self, value: T) -> Carrier {
        self.push(TypeId::of::<T>(), Arc::new(value))
    }

    /// Most recent value of type `T` visible from this carrier.
    pub fn value<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.lookup(TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
    }

    /// Derive a carrier whose field set is this one's followed by `fields`.
    pub fn with_fields<I>(&self, fields: I) -> Carrier
    where
        I: IntoIterator<Item = Field>,
    {
        let mut merged: Vec<Field> = self.fields().to_vec();
        merged.extend(fields);
        self.with_value(ContextFields(merged.into()))
    }

    pub fn with_field(&self, field: Field) -> Carrier {
        self.with_fields(std::iter::once(field))
    }

    pub fn with_string(&self, key: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Carrier {
        self.with_field(Field::string(key, value))
    }

    pub fn with_int(&self, key: impl Into<Cow<'static, str>>, value: i64) -> Carrier {
        self.with_field(Field::int(key, value))
    }

    pub fn with_bool(&self, key: impl Into<Cow<'static, str>>, value: bool) -> Carrier {
        self.with_field(Field::bool(key, value))
    }

    /// Accumulated field set, empty when none was attached.
    pub fn fields(&self) -> &[Field] {
        self.value::<ContextFields>()
            .map(|f| &*f.0)
            .unwrap_or(&[])
    }

    fn push(&self, key: TypeId, value: Arc<dyn Any + Send + Sync>) -> Carrier {
        Carrier {
            head: Some(Arc::new(Node {
                key,
                value,
                parent: self.head.clone(),
            })),
        }
    }

    fn lookup(&self, key: TypeId) -> Option<&(dyn Any + Send + Sync)> {
        let mut node = self.head.as_deref();
        while let Some(n) = node {
            if n.key == key {
                return Some(&*n.value);
            }
            node = n.parent.as_deref();
        }
        None
    }
}

impl fmt::Debug for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Carrier")
            .field("fields", &self.fields())
            .finish_non_exhaustive()
    }
}
