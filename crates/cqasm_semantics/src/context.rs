// Copyright contributors to the cqasm-semantics project
// SPDX-License-Identifier: Apache-2.0

use crate::asg;
use crate::dialect::Dialect;
use crate::overload::{resolve, Overload, OverloadSet, ResolutionError};
use crate::semantic_error::SemanticErrorKind::*;
use crate::semantic_error::{SemanticErrorKind, SemanticErrorList};
use crate::symbols::{
    ScopeStack, SymbolIdResult, SymbolKind, SymbolRecordResult, SymbolTable,
};
use crate::types::{Type, TypeRules};
use cqasm_syntax::SourceLocation;
use hashbrown::HashSet;
use smol_str::SmolStr;

/// All mutable state of one analysis.
#[derive(Clone, Debug)]
pub struct Context {
    pub program: asg::Program,
    pub semantic_errors: SemanticErrorList,
    pub symbol_table: SymbolTable,
    // Subcircuit names are not symbols, but must still be unique.
    subcircuits: HashSet<SmolStr>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CalleeKind {
    Instruction,
    Function,
}

impl Context {
    pub(crate) fn new(dialect: &'static Dialect) -> Context {
        let mut semantic_errors = SemanticErrorList::new();
        semantic_errors.set_dialect(dialect.kind());
        Context {
            program: asg::Program::new(),
            semantic_errors,
            symbol_table: SymbolTable::new(dialect),
            subcircuits: HashSet::new(),
        }
    }

    pub fn errors(&self) -> &SemanticErrorList {
        &self.semantic_errors
    }

    pub fn program(&self) -> &asg::Program {
        &self.program
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.symbol_table
    }

    pub fn dialect(&self) -> &'static Dialect {
        self.symbol_table.dialect()
    }

    pub fn rules(&self) -> &'static TypeRules {
        self.dialect().rules()
    }

    pub fn as_tuple(self) -> (asg::Program, SemanticErrorList, SymbolTable) {
        (self.program, self.semantic_errors, self.symbol_table)
    }

    pub fn insert_error(&mut self, error_kind: SemanticErrorKind, location: SourceLocation) {
        self.semantic_errors.insert(error_kind, location);
    }

    /// Number of Error-severity diagnostics so far.
    pub(crate) fn error_count(&self) -> usize {
        self.semantic_errors.error_count()
    }

    /// Lookup the symbol, returing a SymbolRecordResult. Possibly log an `UndeclaredIdentifier`.
    pub(crate) fn lookup_symbol(&mut self, name: &str, location: SourceLocation) -> SymbolRecordResult {
        let symbol_record = self.symbol_table.lookup(name);
        if symbol_record.is_err() {
            self.semantic_errors
                .insert(UndeclaredIdentifier(name.into()), location);
        }
        symbol_record
    }

    /// Bind `name` to new Symbol, returning SymbolIdResult. Possibly log a `DuplicateDeclaration`.
    pub(crate) fn new_binding(
        &mut self,
        name: &str,
        kind: SymbolKind,
        typ: &Type,
        location: SourceLocation,
    ) -> SymbolIdResult {
        let symbol_id_result = self.symbol_table.declare(name, kind, typ, location);
        if symbol_id_result.is_err() {
            self.semantic_errors
                .insert(DuplicateDeclaration(name.into()), location);
        }
        symbol_id_result
    }

    /// Record the subcircuit `name`. Possibly log a `DuplicateDeclaration`.
    pub(crate) fn new_subcircuit(&mut self, name: &str, location: SourceLocation) {
        if !self.subcircuits.insert(name.into()) {
            self.semantic_errors
                .insert(DuplicateDeclaration(name.into()), location);
        }
    }

    /// Resolve an application of the instruction `name`. Logs resolution failures, and a
    /// warning if the selected overload is deprecated.
    pub(crate) fn resolve_instruction(
        &mut self,
        name: &str,
        arg_types: &[Type],
        location: SourceLocation,
    ) -> Option<&'static Overload> {
        let set = self.symbol_table.lookup_instruction(name);
        let overload = self.resolve_call(CalleeKind::Instruction, set, name, arg_types, location)?;
        if let Some(replacement) = overload.replacement() {
            self.semantic_errors.insert(
                DeprecatedInstruction {
                    name: name.into(),
                    replacement: replacement.into(),
                },
                location,
            );
        }
        Some(overload)
    }

    /// Resolve a call of the function or operator `name`.
    pub(crate) fn resolve_function(
        &mut self,
        name: &str,
        arg_types: &[Type],
        location: SourceLocation,
    ) -> Option<&'static Overload> {
        let set = self.symbol_table.lookup_function(name);
        self.resolve_call(CalleeKind::Function, set, name, arg_types, location)
    }

    fn resolve_call(
        &mut self,
        callee: CalleeKind,
        set: Option<&'static OverloadSet>,
        name: &str,
        arg_types: &[Type],
        location: SourceLocation,
    ) -> Option<&'static Overload> {
        match resolve(set, name, arg_types, self.rules()) {
            Ok(overload) => {
                tracing::trace!(name, tag = overload.tag(), "resolved call");
                Some(overload)
            }
            Err(err) => {
                tracing::trace!(name, %err, "resolution failed");
                let kind = match err {
                    ResolutionError::Unknown(name) => match callee {
                        CalleeKind::Instruction => UnknownInstruction(name),
                        CalleeKind::Function => UnknownFunction(name),
                    },
                    ResolutionError::NoMatch { name, arg_types } => {
                        NoMatchingOverload { name, arg_types }
                    }
                    // An undefined argument was already reported and matches every candidate.
                    ResolutionError::Ambiguous { .. }
                        if arg_types.iter().any(|ty| !ty.is_defined()) =>
                    {
                        return None;
                    }
                    ResolutionError::Ambiguous { name, candidates } => {
                        AmbiguousOverload { name, candidates }
                    }
                };
                self.semantic_errors.insert(kind, location);
                None
            }
        }
    }
}

impl ScopeStack for Context {
    fn symbol_table_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbol_table
    }
}
