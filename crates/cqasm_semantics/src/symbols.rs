// Copyright contributors to the cqasm-semantics project
// SPDX-License-Identifier: Apache-2.0

// Defines data structures and api for symbols, scope, and symbol tables.
//
// Scopes live in an arena and are never freed during a pass. Each scope holds the id of
// its parent, so the scopes form a tree. The stack is the path from the root to the scope
// currently open. Lookup walks parent links from the innermost open scope.

use crate::dialect::Dialect;
use crate::overload::OverloadSet;
use crate::types::Type;
use cqasm_syntax::SourceLocation;
use indexmap::IndexMap;
use smol_str::SmolStr;
use std::ops::{Deref, DerefMut, Index};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScopeType {
    /// Top-level
    Global,
    /// Body of a subcircuit
    Subcircuit,
    /// Branches of `if` and `else`
    Local,
    /// Bodies of `for`, `foreach`, `while` and `repeat`
    Loop,
}

// This wrapped `usize` serves as
// * A unique label for instances of `Symbol`.
// * An index into `all_symbols: Vec<Symbol>`.
// * The values in the name tables of scopes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SymbolId(usize);

impl SymbolId {
    pub fn new() -> SymbolId {
        SymbolId(0)
    }

    /// Post-increment the value, and return the old value.
    pub fn post_increment(&mut self) -> SymbolId {
        let old_val = self.clone();
        self.0 += 1;
        old_val
    }
}

impl Default for SymbolId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<SymbolId> for usize {
    fn from(symid: SymbolId) -> usize {
        symid.0
    }
}

/// Index of a scope in the scope arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum SymbolError {
    #[error("name is not bound in any enclosing scope")]
    MissingBinding,
    #[error("name is already bound in the current scope")]
    AlreadyBound,
}

pub type SymbolIdResult = Result<SymbolId, SymbolError>;
pub type SymbolRecordResult<'a> = Result<SymbolRecord<'a>, SymbolError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Variable,
    QubitRegister,
    BitRegister,
    Mapping,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Symbol {
    name: SmolStr,
    kind: SymbolKind,
    typ: Type,
    location: SourceLocation,
}

pub trait SymbolType {
    /// Return the `Type` of `symbol`, which is `Type::Undefined` if
    /// `self` is an `Option<T>` with value `None`.
    fn symbol_type(&self) -> &Type;
}

impl Symbol {
    fn new(name: &str, kind: SymbolKind, typ: &Type, location: SourceLocation) -> Symbol {
        Symbol {
            name: name.into(),
            kind,
            typ: typ.clone(),
            location,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    /// Location of the declaration.
    pub fn location(&self) -> SourceLocation {
        self.location
    }
}

impl SymbolType for Symbol {
    fn symbol_type(&self) -> &Type {
        &self.typ
    }
}

/// A structure for temporarily collecting information about
/// a symbol.
/// * `Symbol` contains the name, kind, `Type` and declaration location.
/// * `symbol_id` wraps a `usize` that serves as
///     * a unique label
///     * the index into the `Vec` of all symbols.
/// * `scope_level` is the depth of the scope binding the name. The global scope is level 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolRecord<'a> {
    symbol: &'a Symbol,
    symbol_id: SymbolId,
    scope_level: usize,
}

impl SymbolRecord<'_> {
    pub fn new(symbol: &Symbol, symbol_id: SymbolId, scope_level: usize) -> SymbolRecord<'_> {
        SymbolRecord {
            symbol,
            symbol_id,
            scope_level,
        }
    }

    pub fn symbol(&self) -> &Symbol {
        self.symbol
    }

    pub fn symbol_id(&self) -> SymbolId {
        self.symbol_id.clone()
    }

    pub fn scope_level(&self) -> usize {
        self.scope_level
    }
}

pub trait SymbolErrorTrait {
    fn to_symbol_id(&self) -> SymbolIdResult;
    fn as_tuple(&self) -> (SymbolIdResult, Type);
}

impl SymbolErrorTrait for SymbolRecordResult<'_> {
    fn to_symbol_id(&self) -> SymbolIdResult {
        self.clone().map(|record| record.symbol_id)
    }

    fn as_tuple(&self) -> (SymbolIdResult, Type) {
        (self.to_symbol_id(), self.symbol_type().clone())
    }
}

impl SymbolType for Option<SymbolRecord<'_>> {
    fn symbol_type(&self) -> &Type {
        match self {
            Some(symbol_record) => symbol_record.symbol_type(),
            None => &Type::Undefined,
        }
    }
}

impl SymbolType for Result<SymbolRecord<'_>, SymbolError> {
    fn symbol_type(&self) -> &Type {
        match self {
            Ok(symbol_record) => symbol_record.symbol_type(),
            Err(_) => &Type::Undefined,
        }
    }
}

impl SymbolType for SymbolRecord<'_> {
    fn symbol_type(&self) -> &Type {
        self.symbol.symbol_type()
    }
}

/// A `Scope` maps names to `SymbolId`s for a single instance of a scope.
/// Names are kept in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Scope {
    table: IndexMap<SmolStr, SymbolId>,
    kind: ScopeType,
    parent: Option<ScopeId>,
    level: usize,
}

impl Scope {
    fn new(kind: ScopeType, parent: Option<ScopeId>, level: usize) -> Scope {
        Scope {
            table: IndexMap::new(),
            kind,
            parent,
            level,
        }
    }

    fn insert(&mut self, name: &str, sym: SymbolId) {
        self.table.insert(name.into(), sym);
    }

    fn get_symbol_id(&self, name: &str) -> Option<&SymbolId> {
        self.table.get(name)
    }

    fn len(&self) -> usize {
        self.table.len()
    }

    fn contains_name(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SymbolTable {
    /// All scopes ever entered. Indices are `ScopeId`.
    scopes: Vec<Scope>,
    /// The open scopes, outermost first. The first entry is always the global scope.
    stack: Vec<ScopeId>,
    /// A list of all `Symbol`s with no explicit scope information. Indices are `SymbolId as usize`.
    all_symbols: Vec<Symbol>,
    /// A counter that is incremented after each new symbol is created.
    symbol_id_counter: SymbolId,
    /// Supplies the built-in instructions and functions of the root scope.
    dialect: &'static Dialect,
}

impl SymbolTable {
    /// Create a new `SymbolTable` and initialize with the global scope.
    pub fn new(dialect: &'static Dialect) -> SymbolTable {
        let mut symbol_table = SymbolTable {
            scopes: Vec::new(),
            stack: Vec::new(),
            all_symbols: Vec::new(),
            symbol_id_counter: SymbolId::new(),
            dialect,
        };
        symbol_table.enter_scope(ScopeType::Global);
        symbol_table
    }

    pub fn dialect(&self) -> &'static Dialect {
        self.dialect
    }

    /// Number of open scopes, including the global scope.
    pub fn number_of_scopes(&self) -> usize {
        self.stack.len()
    }

    /// Open a new scope nested in the current scope.
    /// Prefer `ScopeStack::scope`, which closes the scope again when dropped.
    pub fn enter_scope(&mut self, kind: ScopeType) {
        if kind == ScopeType::Global && !self.stack.is_empty() {
            panic!("The unique global scope must be the first scope.")
        }
        let parent = self.stack.last().copied();
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(kind, parent, self.stack.len()));
        self.stack.push(id);
        tracing::trace!(?kind, level = self.stack.len() - 1, "enter scope");
    }

    /// Close the current scope. The global scope is never closed.
    pub fn exit_scope(&mut self) {
        if self.stack.len() > 1 {
            let kind = self.current_scope().kind;
            self.stack.pop();
            tracing::trace!(?kind, level = self.stack.len(), "exit scope");
        }
    }

    /// Close scopes until `number_of_scopes` is `depth`.
    fn exit_scopes_to(&mut self, depth: usize) {
        while self.stack.len() > depth.max(1) {
            self.exit_scope();
        }
    }

    /// If a binding for `name` exists in the current scope, return `Err(AlreadyBound)`.
    /// Otherwise, create a new Symbol from `name`, `kind` and `typ`, bind `name` to
    /// this Symbol in the current scope, and return its id.
    pub fn declare(
        &mut self,
        name: &str,
        kind: SymbolKind,
        typ: &Type,
        location: SourceLocation,
    ) -> Result<SymbolId, SymbolError> {
        if self.current_scope_contains_name(name) {
            return Err(SymbolError::AlreadyBound);
        }
        self.all_symbols
            .push(Symbol::new(name, kind, typ, location));
        let current_symbol_id = self.symbol_id_counter.post_increment();
        self.current_scope_mut()
            .insert(name, current_symbol_id.clone());
        Ok(current_symbol_id)
    }

    fn current_scope_id(&self) -> ScopeId {
        // The global scope is entered in `new` and never exited.
        self.stack.last().copied().unwrap_or(ScopeId(0))
    }

    fn current_scope_mut(&mut self) -> &mut Scope {
        let id = self.current_scope_id();
        &mut self.scopes[id.0]
    }

    fn current_scope(&self) -> &Scope {
        &self.scopes[self.current_scope_id().0]
    }

    /// Return the `ScopeType` of the current, or top-most, scope.
    pub fn current_scope_kind(&self) -> ScopeType {
        self.current_scope().kind
    }

    /// Return `true` if an enclosing open scope is the body of a loop.
    pub fn in_loop(&self) -> bool {
        self.stack
            .iter()
            .any(|id| self.scopes[id.0].kind == ScopeType::Loop)
    }

    fn current_scope_contains_name(&self, name: &str) -> bool {
        self.current_scope().contains_name(name)
    }

    /// Return the number of bindings in the current scope.
    pub fn len_current_scope(&self) -> usize {
        self.current_scope().len()
    }

    /// Look up `name` starting in the current scope and following parent links.
    /// Return the `SymbolRecord` of the innermost binding, or `MissingBinding`.
    pub fn lookup(&self, name: &str) -> Result<SymbolRecord, SymbolError> {
        let mut scope_id = Some(self.current_scope_id());
        while let Some(id) = scope_id {
            let scope = &self.scopes[id.0];
            if let Some(symbol_id) = scope.get_symbol_id(name) {
                let symbol = &self.all_symbols[symbol_id.0];
                return Ok(SymbolRecord::new(symbol, symbol_id.clone(), scope.level));
            }
            scope_id = scope.parent;
        }
        Err(SymbolError::MissingBinding)
    }

    /// The built-in instruction named `name`, if the dialect has one.
    pub fn lookup_instruction(&self, name: &str) -> Option<&'static OverloadSet> {
        self.dialect.instructions().get(name)
    }

    /// The built-in function or operator named `name`, if the dialect has one.
    pub fn lookup_function(&self, name: &str) -> Option<&'static OverloadSet> {
        self.dialect.functions().get(name)
    }

    /// All symbols in declaration order.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.all_symbols.iter()
    }
}

impl Index<&SymbolId> for SymbolTable {
    type Output = Symbol;

    fn index(&self, symbol_id: &SymbolId) -> &Self::Output {
        &self.all_symbols[symbol_id.0]
    }
}

/// Owners of a `SymbolTable` that open scopes for a lexical block.
pub trait ScopeStack: Sized {
    fn symbol_table_mut(&mut self) -> &mut SymbolTable;

    /// Open a scope of `kind`. The scope stays open as long as the returned guard lives.
    /// The guard dereferences to `self`.
    fn scope(&mut self, kind: ScopeType) -> ScopeGuard<'_, Self> {
        let table = self.symbol_table_mut();
        table.enter_scope(kind);
        let depth = table.number_of_scopes();
        ScopeGuard { owner: self, depth }
    }
}

impl ScopeStack for SymbolTable {
    fn symbol_table_mut(&mut self) -> &mut SymbolTable {
        self
    }
}

/// Closes the scope it opened when dropped, along with any scope opened after it and
/// not closed.
pub struct ScopeGuard<'a, T: ScopeStack> {
    owner: &'a mut T,
    depth: usize,
}

impl<T: ScopeStack> Deref for ScopeGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.owner
    }
}

impl<T: ScopeStack> DerefMut for ScopeGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.owner
    }
}

impl<T: ScopeStack> Drop for ScopeGuard<'_, T> {
    fn drop(&mut self) {
        self.owner
            .symbol_table_mut()
            .exit_scopes_to(self.depth - 1);
    }
}
