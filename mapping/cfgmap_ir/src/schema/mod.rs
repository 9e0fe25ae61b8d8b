//! Schema types: identity-keyed handles to user-declared mappings.
//!
//! A `SchemaType` is created once per declaration and lives for the rest of
//! the process. Equality and hashing use the [`SchemaId`] allocated at
//! creation, so two declarations that share a qualified name stay distinct.

// Arc is the implementation of SchemaType - all usage goes through the newtype
#![expect(
    clippy::disallowed_types,
    reason = "Arc is the implementation of SchemaType"
)]

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::scope::SharedScope;

/// Process-unique identity of a schema type.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(transparent)]
pub struct SchemaId(u32);

impl SchemaId {
    fn fresh() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        SchemaId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Create from raw u32 value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        SchemaId(raw)
    }

    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Declaration shape of a schema type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SchemaKind {
    /// An interface, possibly generic.
    Interface { type_params: u16 },
    /// A concrete class.
    Class,
    /// An abstract class.
    AbstractClass,
    /// An enumeration.
    Enum,
}

impl SchemaKind {
    /// Plain (non-generic) interface.
    pub const INTERFACE: SchemaKind = SchemaKind::Interface { type_params: 0 };

    #[inline]
    pub const fn is_interface(self) -> bool {
        matches!(self, SchemaKind::Interface { .. })
    }

    /// Whether a type of this kind maps through a synthetic wrapper interface.
    ///
    /// Concrete classes and generic interfaces qualify. Plain interfaces,
    /// abstract classes and enums never do.
    #[inline]
    pub const fn is_class_style(self) -> bool {
        match self {
            SchemaKind::Interface { type_params } => type_params > 0,
            SchemaKind::Class => true,
            SchemaKind::AbstractClass | SchemaKind::Enum => false,
        }
    }
}

struct SchemaTypeData {
    id: SchemaId,
    package: String,
    simple_name: String,
    kind: SchemaKind,
    scope: SharedScope,
    /// Class a synthetic wrapper interface was generated for.
    origin: Option<SchemaType>,
}

/// Handle to a user-declared configuration mapping.
///
/// Cheap to clone. Belongs to exactly one originating [`Scope`](crate::Scope).
#[derive(Clone)]
pub struct SchemaType(Arc<SchemaTypeData>);

impl SchemaType {
    /// Declare a new schema type in `scope`.
    ///
    /// `qualified_name` is split at its last `.` into package and simple name.
    pub fn new(scope: SharedScope, qualified_name: &str, kind: SchemaKind) -> Self {
        Self::with_origin(scope, qualified_name, kind, None)
    }

    /// Declare the synthetic wrapper interface generated for a class-style type.
    ///
    /// The wrapper lives in the same scope as `origin`.
    pub fn synthetic(origin: &SchemaType, qualified_name: &str) -> Self {
        Self::with_origin(
            origin.scope().clone(),
            qualified_name,
            SchemaKind::INTERFACE,
            Some(origin.clone()),
        )
    }

    fn with_origin(
        scope: SharedScope,
        qualified_name: &str,
        kind: SchemaKind,
        origin: Option<SchemaType>,
    ) -> Self {
        let (package, simple_name) = match qualified_name.rsplit_once('.') {
            Some((package, simple)) => (package.to_owned(), simple.to_owned()),
            None => (String::new(), qualified_name.to_owned()),
        };
        SchemaType(Arc::new(SchemaTypeData {
            id: SchemaId::fresh(),
            package,
            simple_name,
            kind,
            scope,
            origin,
        }))
    }

    #[inline]
    pub fn id(&self) -> SchemaId {
        self.0.id
    }

    #[inline]
    pub fn kind(&self) -> SchemaKind {
        self.0.kind
    }

    /// Package part of the qualified name (empty for the default package).
    pub fn package(&self) -> &str {
        &self.0.package
    }

    pub fn simple_name(&self) -> &str {
        &self.0.simple_name
    }

    /// Fully qualified name, e.g. `com.acme.ServerConfig`.
    pub fn qualified_name(&self) -> String {
        if self.0.package.is_empty() {
            self.0.simple_name.clone()
        } else {
            format!("{}.{}", self.0.package, self.0.simple_name)
        }
    }

    /// The scope this type was declared in.
    pub fn scope(&self) -> &SharedScope {
        &self.0.scope
    }

    /// For a synthetic wrapper interface, the class it was generated for.
    pub fn origin(&self) -> Option<&SchemaType> {
        self.0.origin.as_ref()
    }

    /// Check if two handles refer to the same declaration.
    #[inline]
    pub fn ptr_eq(&self, other: &SchemaType) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for SchemaType {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for SchemaType {}

impl Hash for SchemaType {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SchemaType({}{} in {})",
            self.qualified_name(),
            self.0.id,
            self.0.scope.id()
        )
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}
