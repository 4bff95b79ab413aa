// Copyright contributors to the cqasm-semantics project
// SPDX-License-Identifier: Apache-2.0

// Node definitions of the raw parse tree.
//
// Variants have the form Xxx(Xxx): the variant name matches the struct holding
// its fields, so that a struct can be built and passed around before it is wrapped.
// Fields are public. The tree is plain data that the parser fills in and the
// analyzer only reads.

use crate::SourceLocation;
use smol_str::SmolStr;

#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub version: Option<Version>,
    pub statements: Vec<Statement>,
}

/// The `version` directive. `version 1.2` has `items == [1, 2]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Version {
    pub items: Vec<i64>,
    pub location: SourceLocation,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Qubits(Qubits),
    Variable(Variable),
    Mapping(Mapping),
    Instruction(Instruction),
    Bundle(Bundle),
    Subcircuit(Subcircuit),
    Assignment(Assignment),
    IfElse(IfElse),
    While(While),
    RepeatUntil(RepeatUntil),
    Foreach(Foreach),
    Break(SourceLocation),
    Continue(SourceLocation),
}

impl Statement {
    pub fn location(&self) -> SourceLocation {
        match self {
            Statement::Qubits(it) => it.location,
            Statement::Variable(it) => it.location,
            Statement::Mapping(it) => it.location,
            Statement::Instruction(it) => it.location,
            Statement::Bundle(it) => it.location,
            Statement::Subcircuit(it) => it.location,
            Statement::Assignment(it) => it.location,
            Statement::IfElse(it) => it.location,
            Statement::While(it) => it.location,
            Statement::RepeatUntil(it) => it.location,
            Statement::Foreach(it) => it.location,
            Statement::Break(location) | Statement::Continue(location) => *location,
        }
    }
}

/// `qubits N`. Declares the qubit register `q` and the bit register `b`, both of size `N`.
#[derive(Clone, Debug, PartialEq)]
pub struct Qubits {
    pub size: Expression,
    pub location: SourceLocation,
}

/// A typed declaration such as `qubit[3] q`, `int n = 4` or `var x: float`.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    pub name: Identifier,
    pub ty: TypeSpec,
    pub initializer: Option<Expression>,
    pub location: SourceLocation,
}

/// Type keyword of a declaration. Only register types take a size.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeSpec {
    Qubit(Option<Expression>),
    Bit(Option<Expression>),
    Bool,
    Int,
    Float,
    Complex,
    Axis,
}

/// `map target, alias`
#[derive(Clone, Debug, PartialEq)]
pub struct Mapping {
    pub alias: Identifier,
    pub target: Expression,
    pub location: SourceLocation,
}

/// A gate or other instruction, optionally conditional: `c-x b[0], q[1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    pub name: Identifier,
    pub condition: Option<Expression>,
    pub operands: Vec<Expression>,
    pub location: SourceLocation,
}

/// Instructions issued in parallel: `{ x q[0] | y q[1] }`.
#[derive(Clone, Debug, PartialEq)]
pub struct Bundle {
    pub instructions: Vec<Instruction>,
    pub location: SourceLocation,
}

/// `.name` or `.name(iterations)` followed by the statements up to the next header.
#[derive(Clone, Debug, PartialEq)]
pub struct Subcircuit {
    pub name: Identifier,
    pub iterations: Option<Expression>,
    pub body: Block,
    pub location: SourceLocation,
}

/// `set lhs = rhs`
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub lhs: Expression,
    pub rhs: Expression,
    pub location: SourceLocation,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfElse {
    pub branches: Vec<IfBranch>,
    pub otherwise: Option<Block>,
    pub location: SourceLocation,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfBranch {
    pub condition: Expression,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct While {
    pub condition: Expression,
    pub body: Block,
    pub location: SourceLocation,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RepeatUntil {
    pub body: Block,
    pub condition: Expression,
    pub location: SourceLocation,
}

/// `foreach (i = from..to) { ... }`
#[derive(Clone, Debug, PartialEq)]
pub struct Foreach {
    pub variable: Identifier,
    pub from: Expression,
    pub to: Expression,
    pub body: Block,
    pub location: SourceLocation,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Literal(Literal),
    Identifier(Identifier),
    Index(Box<Index>),
    Unary(Box<UnaryExpr>),
    Binary(Box<BinaryExpr>),
    FunctionCall(FunctionCall),
    Array(ArrayLiteral),
}

impl Expression {
    pub fn location(&self) -> SourceLocation {
        match self {
            Expression::Literal(it) => it.location,
            Expression::Identifier(it) => it.location,
            Expression::Index(it) => it.location,
            Expression::Unary(it) => it.location,
            Expression::Binary(it) => it.location,
            Expression::FunctionCall(it) => it.location,
            Expression::Array(it) => it.location,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Identifier {
    pub name: SmolStr,
    pub location: SourceLocation,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub location: SourceLocation,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LiteralKind {
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// `q[0]`, `q[0, 2]`, `q[1:3]`
#[derive(Clone, Debug, PartialEq)]
pub struct Index {
    pub target: Identifier,
    pub entries: Vec<IndexEntry>,
    pub location: SourceLocation,
}

#[derive(Clone, Debug, PartialEq)]
pub enum IndexEntry {
    Item(Expression),
    /// Inclusive on both ends.
    Range(Expression, Expression),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    LogicalAnd,
    LogicalOr,
    LogicalXor,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Expression,
    pub location: SourceLocation,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub lhs: Expression,
    pub rhs: Expression,
    pub location: SourceLocation,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionCall {
    pub name: Identifier,
    pub args: Vec<Expression>,
    pub location: SourceLocation,
}

/// `[x, y, z]`
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayLiteral {
    pub elements: Vec<Expression>,
    pub location: SourceLocation,
}
