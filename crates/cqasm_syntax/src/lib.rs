// Copyright contributors to the cqasm-semantics project
// SPDX-License-Identifier: Apache-2.0

//! Raw parse tree for cQASM.
//!
//! This is the tree handed to semantic analysis by a version-specific parser. It is
//! purely syntactic: names are unresolved text, expressions carry no types, and nothing
//! has been checked beyond the grammar. Every node records the `SourceLocation` of the
//! token it was built from so that diagnostics can point back into the source.
//!
//! One tree shape serves all supported language versions. A parser for an older dialect
//! simply never produces the node kinds its grammar lacks.

pub mod ast;
pub mod make;

mod location;

pub use location::SourceLocation;
pub use smol_str::SmolStr;
