// Copyright contributors to the cqasm-semantics project
// SPDX-License-Identifier: Apache-2.0

//! Reporting of diagnostics against cQASM source text.
//!
//! The analyzer only knows line/column locations. When the caller still has the source
//! text, the functions here map those locations back into the text and format the
//! messages with the external crate `ariadne`.

mod api;
mod source_file;

pub use source_file::{ErrorTrait, SourceString};

pub use api::{
    inner_print_compiler_errors, print_compiler_errors, read_source_file, report_error,
    write_compiler_errors,
};
