// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema compiler for the `xcdr` runtime.
//!
//! Consumes a typed IDL abstract syntax tree (the parser is an external
//! producer; the CLI reads the tree from JSON) and emits, per constructed
//! type, the Rust type definition, the property-tree initializer and the
//! four-mode streaming procedures that drive the runtime's dialect
//! streams.

pub mod ast;
pub mod codegen;
pub mod emit;
pub mod names;

pub use ast::IdlModule;
pub use codegen::{GenError, Generator};

/// Generate the Rust artifact for one IDL module.
pub fn generate_module(module: &IdlModule) -> Result<String, GenError> {
    Generator::new(module).generate()
}
