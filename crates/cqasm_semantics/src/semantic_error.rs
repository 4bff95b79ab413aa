// Copyright contributors to the cqasm-semantics project
// SPDX-License-Identifier: Apache-2.0

// Diagnostics found during analysis, and the list that collects them.

use crate::dialect::DialectKind;
use crate::overload::{display_candidates, Overload};
use crate::types::{display_list, Type};
use cqasm_source_file::ErrorTrait;
use cqasm_syntax::SourceLocation;
use smol_str::SmolStr;
use std::fmt;
use std::io;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SemanticErrorKind {
    #[error("{}", unsupported_version_message(.0))]
    UnsupportedVersion(Option<Vec<i64>>),
    #[error("`{0}` is already declared in this scope")]
    DuplicateDeclaration(SmolStr),
    #[error("`{0}` is not declared")]
    UndeclaredIdentifier(SmolStr),
    #[error("register size must be positive, found {0}")]
    InvalidRegisterSize(i64),
    #[error("index {index} is out of range for `{name}` of size {size}")]
    IndexOutOfRange { name: SmolStr, index: i64, size: usize },
    #[error("unknown instruction `{0}`")]
    UnknownInstruction(SmolStr),
    #[error("unknown function `{0}`")]
    UnknownFunction(SmolStr),
    #[error("no overload of `{name}` accepts ({})", display_list(.arg_types))]
    NoMatchingOverload { name: SmolStr, arg_types: Vec<Type> },
    #[error("call to `{name}` is ambiguous between {}", display_candidates(.candidates))]
    AmbiguousOverload {
        name: SmolStr,
        candidates: Vec<Overload>,
    },
    #[error("expected a value of type {expected}, found {found}")]
    IncompatibleTypes { expected: Type, found: Type },
    #[error("expected a constant integer")]
    ExpectedConstInteger,
    #[error("iteration count must not be negative, found {0}")]
    InvalidIterationCount(i64),
    // Holds a description of the target, e.g. "register `q`".
    #[error("cannot assign to {0}")]
    NotAssignable(String),
    #[error("`{0}` cannot be indexed")]
    NotIndexable(SmolStr),
    #[error("axis must have three elements, found {0}")]
    InvalidAxis(usize),
    #[error("`{0}` outside of a loop")]
    LoopControlOutsideLoop(&'static str),
    #[error("instruction `{name}` is deprecated, use `{replacement}`")]
    DeprecatedInstruction { name: SmolStr, replacement: SmolStr },
}

fn unsupported_version_message(version: &Option<Vec<i64>>) -> String {
    match version {
        None => "missing version directive".to_string(),
        Some(items) => {
            let items: Vec<_> = items.iter().map(|item| item.to_string()).collect();
            format!(
                "unsupported version {}, expected 1.0, 1.1, 1.2 or 3.0",
                items.join(".")
            )
        }
    }
}

impl SemanticErrorKind {
    pub fn severity(&self) -> Severity {
        match self {
            SemanticErrorKind::DeprecatedInstruction { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SemanticError {
    error_kind: SemanticErrorKind,
    location: SourceLocation,
    // `None` when no dialect could be selected.
    dialect: Option<DialectKind>,
}

impl SemanticError {
    pub fn new(
        error_kind: SemanticErrorKind,
        location: SourceLocation,
        dialect: Option<DialectKind>,
    ) -> Self {
        Self {
            error_kind,
            location,
            dialect,
        }
    }

    pub fn kind(&self) -> &SemanticErrorKind {
        &self.error_kind
    }

    pub fn severity(&self) -> Severity {
        self.error_kind.severity()
    }

    pub fn location(&self) -> SourceLocation {
        self.location
    }

    pub fn dialect(&self) -> Option<DialectKind> {
        self.dialect
    }

    pub fn message(&self) -> String {
        self.error_kind.to_string()
    }
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}: {}",
            self.severity(),
            self.location,
            self.error_kind
        )
    }
}

impl ErrorTrait for SemanticError {
    fn message(&self) -> String {
        self.message()
    }

    fn location(&self) -> SourceLocation {
        self.location
    }

    fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

/// `SemanticErrorList` stores the diagnostics of one analysis in the order they were found.
/// Warnings are stored alongside errors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SemanticErrorList {
    list: Vec<SemanticError>,
    // Dialect recorded in diagnostics inserted from now on.
    dialect: Option<DialectKind>,
}

impl std::ops::Deref for SemanticErrorList {
    type Target = Vec<SemanticError>;

    fn deref(&self) -> &Self::Target {
        &self.list
    }
}

impl SemanticErrorList {
    pub fn new() -> SemanticErrorList {
        SemanticErrorList::default()
    }

    pub(crate) fn set_dialect(&mut self, dialect: DialectKind) {
        self.dialect = Some(dialect);
    }

    pub fn insert(&mut self, error_kind: SemanticErrorKind, location: SourceLocation) {
        tracing::debug!(%location, severity = %error_kind.severity(), "{error_kind}");
        self.list
            .push(SemanticError::new(error_kind, location, self.dialect));
    }

    /// Number of diagnostics with severity `Error`.
    pub fn error_count(&self) -> usize {
        self.list
            .iter()
            .filter(|err| err.severity() == Severity::Error)
            .count()
    }

    /// Return `true` if any diagnostic has severity `Error`. Warnings are ignored.
    pub fn any_semantic_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn warnings(&self) -> impl Iterator<Item = &SemanticError> {
        self.list
            .iter()
            .filter(|err| err.severity() == Severity::Warning)
    }

    /// Print errors for the case that the code is not associated with a file.
    /// For example it came from a literal string.
    pub fn print_errors_no_file(&self, fake_file_path: &Path, source: &str) -> io::Result<()> {
        cqasm_source_file::inner_print_compiler_errors(self, fake_file_path, source)
    }

    /// Print errors against the source in `file_path`.
    pub fn print_errors(&self, file_path: &Path) -> io::Result<()> {
        // If there are no errors to print, don't require the file to be readable.
        if self.list.is_empty() {
            return Ok(());
        }
        cqasm_source_file::print_compiler_errors(self, file_path)
    }

    /// Write formatted diagnostics to `writer`, without color.
    pub fn write_errors<W: io::Write>(
        &self,
        fake_file_path: &Path,
        source: &str,
        writer: &mut W,
    ) -> io::Result<()> {
        cqasm_source_file::write_compiler_errors(self, fake_file_path, source, false, writer)
    }
}

impl fmt::Display for SemanticErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for err in self.list.iter() {
            writeln!(f, "{err}")?;
        }
        Ok(())
    }
}
