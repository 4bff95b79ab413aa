// Copyright contributors to the cqasm-semantics project
// SPDX-License-Identifier: Apache-2.0

// The definition of the abstract semantic graph (ASG) as well as the API for using it.
// Construction of this typed ASG from the raw parse tree is in syntax_to_semantics.rs

// SymbolIdResult can represent a valid symbol, via a symbol id, or a semantic error.
// We insert SymbolIdResult everywhere a symbol is needed in the semantic tree.
// Likewise calls hold `Option<&'static Overload>`, which is `None` if resolution failed.
// This way the tree is complete even for erroneous input, and analysis can continue.

use crate::dialect::DialectKind;
use crate::overload::Overload;
use crate::symbols::SymbolIdResult;
use crate::types::{IsConst, Type};
use cqasm_syntax::SourceLocation;
use smol_str::SmolStr;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    version: Option<Vec<i64>>,
    dialect: Option<DialectKind>,
    stmts: Vec<StmtNode>,
}

impl Program {
    pub fn new() -> Program {
        Program::default()
    }

    pub fn stmts(&self) -> &[StmtNode] {
        &self.stmts
    }

    pub fn insert_stmt(&mut self, stmt: StmtNode) {
        self.stmts.push(stmt);
    }

    pub(crate) fn set_version(&mut self, version: &[i64], dialect: DialectKind) {
        self.version = Some(version.to_vec());
        self.dialect = Some(dialect);
    }

    /// Components of the version directive, `None` if analysis stopped at the directive.
    pub fn version(&self) -> Option<&[i64]> {
        self.version.as_deref()
    }

    pub fn dialect(&self) -> Option<DialectKind> {
        self.dialect
    }

    /// Print the ASG using the pretty print `Debug` trait.
    pub fn print_asg_debug_pretty(&self) {
        for stmt in self.iter() {
            println!("{stmt:#?}");
        }
    }

    /// Print the ASG using the `Debug` trait.
    pub fn print_asg_debug(&self) {
        for stmt in self.iter() {
            println!("{stmt:?}\n");
        }
    }
}

impl std::ops::Deref for Program {
    type Target = Vec<StmtNode>;

    fn deref(&self) -> &Self::Target {
        &self.stmts
    }
}

/// A statement together with its location and whether it was resolved without errors.
#[derive(Clone, Debug, PartialEq)]
pub struct StmtNode {
    stmt: Stmt,
    location: SourceLocation,
    valid: bool,
}

impl StmtNode {
    pub fn new(stmt: Stmt, location: SourceLocation, valid: bool) -> StmtNode {
        StmtNode {
            stmt,
            location,
            valid,
        }
    }

    pub fn stmt(&self) -> &Stmt {
        &self.stmt
    }

    pub fn location(&self) -> SourceLocation {
        self.location
    }

    /// `false` if an error was reported while resolving this statement or any statement
    /// nested in it.
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

pub type Block = Vec<StmtNode>;

// Variants have the form XXX(XXX)
// The outer name XXX is the name of the variant
// The inner name XXX is the name of the struct expressing the structure of the statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Qubits(Qubits),
    DeclareVariable(Box<DeclareVariable>),
    Mapping(Mapping),
    GateCall(GateCall),
    Bundle(Bundle),
    Subcircuit(Subcircuit),
    Assignment(Assignment),
    If(If),
    While(While),
    RepeatUntil(RepeatUntil),
    Foreach(Box<Foreach>),
    Break,
    Continue,
}

/// The registers `q` and `b` declared by `qubits N`.
#[derive(Clone, Debug, PartialEq)]
pub struct Qubits {
    qubits: SymbolIdResult,
    bits: SymbolIdResult,
    size: TExpr,
}

impl Qubits {
    pub fn new(qubits: SymbolIdResult, bits: SymbolIdResult, size: TExpr) -> Qubits {
        Qubits { qubits, bits, size }
    }

    pub fn qubits(&self) -> &SymbolIdResult {
        &self.qubits
    }

    pub fn bits(&self) -> &SymbolIdResult {
        &self.bits
    }

    pub fn size(&self) -> &TExpr {
        &self.size
    }

    pub fn to_stmt(self) -> Stmt {
        Stmt::Qubits(self)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeclareVariable {
    name: SymbolIdResult,
    size: Option<TExpr>,
    initializer: Option<TExpr>,
}

impl DeclareVariable {
    pub fn new(name: SymbolIdResult, size: Option<TExpr>, initializer: Option<TExpr>) -> DeclareVariable {
        DeclareVariable {
            name,
            size,
            initializer,
        }
    }

    pub fn name(&self) -> &SymbolIdResult {
        &self.name
    }

    pub fn size(&self) -> Option<&TExpr> {
        self.size.as_ref()
    }

    pub fn initializer(&self) -> Option<&TExpr> {
        self.initializer.as_ref()
    }

    pub fn to_stmt(self) -> Stmt {
        Stmt::DeclareVariable(Box::new(self))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mapping {
    alias: SymbolIdResult,
    target: TExpr,
}

impl Mapping {
    pub fn new(alias: SymbolIdResult, target: TExpr) -> Mapping {
        Mapping { alias, target }
    }

    pub fn alias(&self) -> &SymbolIdResult {
        &self.alias
    }

    pub fn target(&self) -> &TExpr {
        &self.target
    }

    pub fn to_stmt(self) -> Stmt {
        Stmt::Mapping(self)
    }
}

/// Application of an instruction. `overload` is the selected signature.
#[derive(Clone, Debug, PartialEq)]
pub struct GateCall {
    name: SmolStr,
    overload: Option<&'static Overload>,
    condition: Option<TExpr>,
    operands: Vec<TExpr>,
}

impl GateCall {
    pub fn new(
        name: SmolStr,
        overload: Option<&'static Overload>,
        condition: Option<TExpr>,
        operands: Vec<TExpr>,
    ) -> GateCall {
        GateCall {
            name,
            overload,
            condition,
            operands,
        }
    }

    /// The name as written.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn overload(&self) -> Option<&'static Overload> {
        self.overload
    }

    pub fn condition(&self) -> Option<&TExpr> {
        self.condition.as_ref()
    }

    pub fn operands(&self) -> &[TExpr] {
        &self.operands
    }

    pub fn to_stmt(self) -> Stmt {
        Stmt::GateCall(self)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bundle {
    instructions: Vec<GateCall>,
}

impl Bundle {
    pub fn new(instructions: Vec<GateCall>) -> Bundle {
        Bundle { instructions }
    }

    pub fn instructions(&self) -> &[GateCall] {
        &self.instructions
    }

    pub fn to_stmt(self) -> Stmt {
        Stmt::Bundle(self)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Subcircuit {
    name: SmolStr,
    // `None` if the count was missing or invalid.
    iterations: Option<u64>,
    body: Block,
}

impl Subcircuit {
    pub fn new(name: SmolStr, iterations: Option<u64>, body: Block) -> Subcircuit {
        Subcircuit {
            name,
            iterations,
            body,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn iterations(&self) -> Option<u64> {
        self.iterations
    }

    pub fn body(&self) -> &Block {
        &self.body
    }

    pub fn to_stmt(self) -> Stmt {
        Stmt::Subcircuit(self)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    lvalue: TExpr,
    rvalue: TExpr,
}

impl Assignment {
    pub fn new(lvalue: TExpr, rvalue: TExpr) -> Assignment {
        Assignment { lvalue, rvalue }
    }

    pub fn lvalue(&self) -> &TExpr {
        &self.lvalue
    }

    pub fn rvalue(&self) -> &TExpr {
        &self.rvalue
    }

    pub fn to_stmt(self) -> Stmt {
        Stmt::Assignment(self)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct If {
    branches: Vec<(TExpr, Block)>,
    otherwise: Option<Block>,
}

impl If {
    pub fn new(branches: Vec<(TExpr, Block)>, otherwise: Option<Block>) -> If {
        If {
            branches,
            otherwise,
        }
    }

    /// The `if` and `else if` branches with their conditions, in order.
    pub fn branches(&self) -> &[(TExpr, Block)] {
        &self.branches
    }

    pub fn otherwise(&self) -> Option<&Block> {
        self.otherwise.as_ref()
    }

    pub fn to_stmt(self) -> Stmt {
        Stmt::If(self)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct While {
    condition: TExpr,
    body: Block,
}

impl While {
    pub fn new(condition: TExpr, body: Block) -> While {
        While { condition, body }
    }

    pub fn condition(&self) -> &TExpr {
        &self.condition
    }

    pub fn body(&self) -> &Block {
        &self.body
    }

    pub fn to_stmt(self) -> Stmt {
        Stmt::While(self)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RepeatUntil {
    body: Block,
    condition: TExpr,
}

impl RepeatUntil {
    pub fn new(body: Block, condition: TExpr) -> RepeatUntil {
        RepeatUntil { body, condition }
    }

    pub fn body(&self) -> &Block {
        &self.body
    }

    pub fn condition(&self) -> &TExpr {
        &self.condition
    }

    pub fn to_stmt(self) -> Stmt {
        Stmt::RepeatUntil(self)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Foreach {
    variable: SymbolIdResult,
    from: TExpr,
    to: TExpr,
    body: Block,
}

impl Foreach {
    pub fn new(variable: SymbolIdResult, from: TExpr, to: TExpr, body: Block) -> Foreach {
        Foreach {
            variable,
            from,
            to,
            body,
        }
    }

    pub fn variable(&self) -> &SymbolIdResult {
        &self.variable
    }

    pub fn from(&self) -> &TExpr {
        &self.from
    }

    pub fn to(&self) -> &TExpr {
        &self.to
    }

    pub fn body(&self) -> &Block {
        &self.body
    }

    pub fn to_stmt(self) -> Stmt {
        Stmt::Foreach(Box::new(self))
    }
}

//
// Expressions
//

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Identifier(SymbolIdResult),
    IndexedIdentifier(IndexedIdentifier),
    // Operators and functions
    Call(Call),
    // A three-element array literal
    Axis(Vec<TExpr>),
}

/// Typed expression implemented by tagging an `Expr` with a `Type`.
///
/// Expressions that could not be typed because of an error have type `Type::Undefined`.
#[derive(Clone, Debug, PartialEq)]
pub struct TExpr {
    expression: Expr,
    ty: Type,
    is_const: IsConst,
    location: SourceLocation,
}

impl TExpr {
    pub fn new(expression: Expr, ty: Type, is_const: IsConst, location: SourceLocation) -> TExpr {
        TExpr {
            expression,
            ty,
            is_const,
            location,
        }
    }

    pub fn get_type(&self) -> &Type {
        &self.ty
    }

    pub fn expression(&self) -> &Expr {
        &self.expression
    }

    pub fn is_const(&self) -> bool {
        matches!(self.is_const, IsConst::True)
    }

    pub fn location(&self) -> SourceLocation {
        self.location
    }

    /// Return the value of a constant integer expression.
    /// Integer literals are folded through negation, addition, subtraction and
    /// multiplication. Return `None` for anything else, including on overflow.
    pub fn const_int(&self) -> Option<i64> {
        if !self.is_const() || self.ty != Type::Integer {
            return None;
        }
        match &self.expression {
            Expr::Literal(Literal::Int(value)) => Some(*value),
            Expr::Call(call) => {
                let tag = call.overload?.tag();
                match (tag, call.args()) {
                    ("op_neg_i", [operand]) => operand.const_int()?.checked_neg(),
                    ("op_add_ii", [lhs, rhs]) => lhs.const_int()?.checked_add(rhs.const_int()?),
                    ("op_sub_ii", [lhs, rhs]) => lhs.const_int()?.checked_sub(rhs.const_int()?),
                    ("op_mul_ii", [lhs, rhs]) => lhs.const_int()?.checked_mul(rhs.const_int()?),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl Literal {
    pub fn get_type(&self) -> Type {
        match self {
            Literal::Bool(_) => Type::Boolean,
            Literal::Int(_) => Type::Integer,
            Literal::Float(_) => Type::Float,
        }
    }

    pub fn to_texpr(self, location: SourceLocation) -> TExpr {
        let ty = self.get_type();
        TExpr::new(Expr::Literal(self), ty, IsConst::True, location)
    }
}

/// A register indexed with constant indices. Each entry is an inclusive range
/// `(first, last)`; a single index `n` is `(n, n)`. A range with `first > last` selects its
/// elements in descending order, so `q[2:0]` selects `2, 1, 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexedIdentifier {
    target: SymbolIdResult,
    ranges: Vec<(i64, i64)>,
}

impl IndexedIdentifier {
    pub fn new(target: SymbolIdResult, ranges: Vec<(i64, i64)>) -> IndexedIdentifier {
        IndexedIdentifier { target, ranges }
    }

    pub fn target(&self) -> &SymbolIdResult {
        &self.target
    }

    pub fn ranges(&self) -> &[(i64, i64)] {
        &self.ranges
    }

    /// The selected indices in order. Ranges are expanded lazily.
    pub fn indices(&self) -> impl Iterator<Item = i64> + '_ {
        self.ranges.iter().flat_map(|&(first, last)| {
            let (ascending, descending) = if first <= last {
                (Some(first..=last), None)
            } else {
                (None, Some((last..=first).rev()))
            };
            ascending.into_iter().flatten().chain(descending.into_iter().flatten())
        })
    }
}

/// Call of a function or operator. Operators are named `operator+` and so on.
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    name: SmolStr,
    overload: Option<&'static Overload>,
    args: Vec<TExpr>,
}

impl Call {
    pub fn new(name: SmolStr, overload: Option<&'static Overload>, args: Vec<TExpr>) -> Call {
        Call {
            name,
            overload,
            args,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn overload(&self) -> Option<&'static Overload> {
        self.overload
    }

    pub fn args(&self) -> &[TExpr] {
        &self.args
    }
}
