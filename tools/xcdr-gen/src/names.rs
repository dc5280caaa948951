// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Identifier and type mapping for the Rust target.
//!
//! IDL identifiers keep their spelling; names that collide with Rust
//! keywords are escaped as raw identifiers, and the four keywords raw
//! identifiers cannot express are prefixed instead. Scoped IDL names use
//! `::` separators, which map to Rust paths unchanged.

use crate::ast::{PrimitiveKind, TypeRef};

/// Keywords that must be escaped when used as identifiers.
const KEYWORDS: [&str; 49] = [
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "if", "impl", "in", "let",
    "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return",
    "static", "str", "struct", "trait", "true", "try", "type", "typeof", "union", "unsafe",
    "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords raw identifiers cannot express.
const RAW_INELIGIBLE: [&str; 4] = ["self", "Self", "super", "crate"];

/// Escape one identifier segment for the Rust target.
pub fn escape_identifier(name: &str) -> String {
    if RAW_INELIGIBLE.contains(&name) {
        return format!("_{}", name);
    }
    if KEYWORDS.contains(&name) {
        return format!("r#{}", name);
    }
    name.to_string()
}

/// Escape a possibly scoped IDL name (`mod::type`) segment by segment.
pub fn escape_scoped(name: &str) -> String {
    name.split("::")
        .map(escape_identifier)
        .collect::<Vec<_>>()
        .join("::")
}

/// Rust spelling of a primitive type.
pub fn primitive_type(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Bool => "bool",
        PrimitiveKind::Char | PrimitiveKind::Octet | PrimitiveKind::Uint8 => "u8",
        PrimitiveKind::Int8 => "i8",
        PrimitiveKind::Int16 => "i16",
        PrimitiveKind::Uint16 => "u16",
        PrimitiveKind::Int32 => "i32",
        PrimitiveKind::Uint32 => "u32",
        PrimitiveKind::Int64 => "i64",
        PrimitiveKind::Uint64 => "u64",
        PrimitiveKind::Float => "f32",
        PrimitiveKind::Double => "f64",
    }
}

/// Wire size of a primitive, which is also its bit-bound byte count.
pub fn primitive_size(kind: PrimitiveKind) -> usize {
    match kind {
        PrimitiveKind::Bool
        | PrimitiveKind::Char
        | PrimitiveKind::Octet
        | PrimitiveKind::Int8
        | PrimitiveKind::Uint8 => 1,
        PrimitiveKind::Int16 | PrimitiveKind::Uint16 => 2,
        PrimitiveKind::Int32 | PrimitiveKind::Uint32 | PrimitiveKind::Float => 4,
        PrimitiveKind::Int64 | PrimitiveKind::Uint64 | PrimitiveKind::Double => 8,
    }
}

/// Rust spelling of a type reference, without declarator dimensions.
pub fn rust_type(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Primitive(kind) => primitive_type(*kind).to_string(),
        TypeRef::String { .. } => "String".to_string(),
        TypeRef::Sequence { element, .. } => format!("Vec<{}>", rust_type(element)),
        TypeRef::Named(name) => escape_scoped(name),
    }
}

/// Rust spelling of a member field, wrapping declarator dimensions and
/// optionality around the element type.
pub fn rust_field_type(ty: &TypeRef, dimensions: &[u32], optional: bool) -> String {
    let mut rendered = rust_type(ty);
    for dim in dimensions.iter().rev() {
        rendered = format!("[{}; {}]", rendered, dim);
    }
    if optional {
        rendered = format!("Option<{}>", rendered);
    }
    rendered
}
