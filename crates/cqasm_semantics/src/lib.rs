// Copyright contributors to the cqasm-semantics project
// SPDX-License-Identifier: Apache-2.0

//! Abstract Semantic Graph (ASG)
//! This crate implements semantic analysis for the cQASM language and the abstract semantic
//! graph (ASG) it produces.
//! Currently the semantic information encoded in this ASG includes:
//!   All identifiers are resolved to (scoped) symbols.
//!   All expressions are annotated with a type.
//!   All instruction applications and operator and function calls are resolved to a single
//!   overload of a built-in of the language version named in the `version` directive.
//!
//! The input is the raw parse tree of the crate `cqasm_syntax`. Use
//! [`syntax_to_semantics::analyze`] to build the ASG.

// Organization of API
// We opt for adding one level of hierarchy to the API by using file structure.
// One might want to manipulate the ASG (in asg.rs) without constructing it from a
// parse tree (in syntax_to_semantics.rs).

pub mod asg;
pub mod context;
pub mod dialect;
pub mod overload;
pub mod semantic_error;
pub mod symbols;
pub mod syntax_to_semantics;
pub mod types;
pub mod validate;

pub use cqasm_syntax::SourceLocation;
