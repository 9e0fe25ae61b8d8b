//! Artifact naming rules.
//!
//! Names are a pure function of the schema type, so the same type always
//! maps to the same artifact name, in every scope.

use crate::SchemaType;

/// Suffix appended to an interface's qualified name for its implementation.
pub const IMPLEMENTATION_SUFFIX: &str = "$$CMImpl";

/// Suffix of a synthetic wrapper interface name.
pub const SYNTHETIC_INTERFACE_SUFFIX: &str = "I";

/// 32-bit multiply-by-31 hash over UTF-16 code units.
///
/// Wraps on overflow and is rendered signed, so names stay stable across
/// platforms and match names produced by other generators of the same
/// scheme.
pub fn name_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Name of the implementation artifact for an interface-style mapping.
pub fn implementation_name(schema: &SchemaType) -> String {
    format!("{}{IMPLEMENTATION_SUFFIX}", schema.qualified_name())
}

/// Name of the synthetic wrapper interface for a class-style mapping.
///
/// Returns `None` when `schema` is not class-style.
pub fn synthetic_interface_name(schema: &SchemaType) -> Option<String> {
    if !schema.kind().is_class_style() {
        return None;
    }
    let hash = name_hash(&schema.qualified_name());
    // Default-package wrappers carry no leading `.` so the name stays a
    // valid qualified name.
    let name = if schema.package().is_empty() {
        format!("{}{hash}{SYNTHETIC_INTERFACE_SUFFIX}", schema.simple_name())
    } else {
        format!(
            "{}.{}{hash}{SYNTHETIC_INTERFACE_SUFFIX}",
            schema.package(),
            schema.simple_name()
        )
    };
    Some(name)
}
