// Copyright contributors to the cqasm-semantics project
// SPDX-License-Identifier: Apache-2.0

//! Free-standing functions for assembling tree fragments out of smaller pieces.
//!
//! All functions here are intended to be stupid constructors, which just assemble a node
//! from its immediate children. Parsers and tests use them so that neither has to spell
//! out every struct literal.

use crate::ast::*;
use crate::SourceLocation;
use smol_str::SmolStr;

/// Shorthand for `SourceLocation::new(line, column)`.
pub fn at(line: u32, column: u32) -> SourceLocation {
    SourceLocation::new(line, column)
}

pub fn program(version: Option<Version>, statements: Vec<Statement>) -> Program {
    Program {
        version,
        statements,
    }
}

pub fn version(location: SourceLocation, items: &[i64]) -> Version {
    Version {
        items: items.to_vec(),
        location,
    }
}

pub fn block(statements: Vec<Statement>) -> Block {
    Block { statements }
}

pub fn ident<T: Into<SmolStr>>(location: SourceLocation, name: T) -> Identifier {
    Identifier {
        name: name.into(),
        location,
    }
}

//
// Statements
//

pub fn qubits(location: SourceLocation, size: Expression) -> Statement {
    Statement::Qubits(Qubits { size, location })
}

pub fn variable<T: Into<SmolStr>>(
    location: SourceLocation,
    name: T,
    ty: TypeSpec,
    initializer: Option<Expression>,
) -> Statement {
    Statement::Variable(Variable {
        name: ident(location, name),
        ty,
        initializer,
        location,
    })
}

pub fn mapping<T: Into<SmolStr>>(location: SourceLocation, target: Expression, alias: T) -> Statement {
    Statement::Mapping(Mapping {
        alias: ident(location, alias),
        target,
        location,
    })
}

pub fn instruction_node<T: Into<SmolStr>>(
    location: SourceLocation,
    name: T,
    operands: Vec<Expression>,
) -> Instruction {
    Instruction {
        name: ident(location, name),
        condition: None,
        operands,
        location,
    }
}

pub fn instruction<T: Into<SmolStr>>(
    location: SourceLocation,
    name: T,
    operands: Vec<Expression>,
) -> Statement {
    Statement::Instruction(instruction_node(location, name, operands))
}

/// `c-name condition, operands...`
pub fn conditional_instruction<T: Into<SmolStr>>(
    location: SourceLocation,
    name: T,
    condition: Expression,
    operands: Vec<Expression>,
) -> Statement {
    let mut insn = instruction_node(location, name, operands);
    insn.condition = Some(condition);
    Statement::Instruction(insn)
}

pub fn bundle(location: SourceLocation, instructions: Vec<Instruction>) -> Statement {
    Statement::Bundle(Bundle {
        instructions,
        location,
    })
}

pub fn subcircuit<T: Into<SmolStr>>(
    location: SourceLocation,
    name: T,
    iterations: Option<Expression>,
    body: Vec<Statement>,
) -> Statement {
    Statement::Subcircuit(Subcircuit {
        name: ident(location, name),
        iterations,
        body: block(body),
        location,
    })
}

pub fn assignment(location: SourceLocation, lhs: Expression, rhs: Expression) -> Statement {
    Statement::Assignment(Assignment { lhs, rhs, location })
}

pub fn if_else(
    location: SourceLocation,
    branches: Vec<(Expression, Vec<Statement>)>,
    otherwise: Option<Vec<Statement>>,
) -> Statement {
    Statement::IfElse(IfElse {
        branches: branches
            .into_iter()
            .map(|(condition, body)| IfBranch {
                condition,
                body: block(body),
            })
            .collect(),
        otherwise: otherwise.map(block),
        location,
    })
}

pub fn while_loop(location: SourceLocation, condition: Expression, body: Vec<Statement>) -> Statement {
    Statement::While(While {
        condition,
        body: block(body),
        location,
    })
}

pub fn repeat_until(location: SourceLocation, body: Vec<Statement>, condition: Expression) -> Statement {
    Statement::RepeatUntil(RepeatUntil {
        body: block(body),
        condition,
        location,
    })
}

pub fn foreach<T: Into<SmolStr>>(
    location: SourceLocation,
    variable: T,
    from: Expression,
    to: Expression,
    body: Vec<Statement>,
) -> Statement {
    Statement::Foreach(Foreach {
        variable: ident(location, variable),
        from,
        to,
        body: block(body),
        location,
    })
}

pub fn break_stmt(location: SourceLocation) -> Statement {
    Statement::Break(location)
}

pub fn continue_stmt(location: SourceLocation) -> Statement {
    Statement::Continue(location)
}

//
// Expressions
//

pub fn int(location: SourceLocation, value: i64) -> Expression {
    Expression::Literal(Literal {
        kind: LiteralKind::Int(value),
        location,
    })
}

pub fn float(location: SourceLocation, value: f64) -> Expression {
    Expression::Literal(Literal {
        kind: LiteralKind::Float(value),
        location,
    })
}

pub fn boolean(location: SourceLocation, value: bool) -> Expression {
    Expression::Literal(Literal {
        kind: LiteralKind::Bool(value),
        location,
    })
}

pub fn name<T: Into<SmolStr>>(location: SourceLocation, name: T) -> Expression {
    Expression::Identifier(ident(location, name))
}

/// `target[i, j, ...]`
pub fn index<T: Into<SmolStr>>(location: SourceLocation, target: T, items: &[i64]) -> Expression {
    let entries = items
        .iter()
        .map(|item| IndexEntry::Item(int(location, *item)))
        .collect();
    index_entries(location, target, entries)
}

/// `target[from:to]`
pub fn index_range<T: Into<SmolStr>>(
    location: SourceLocation,
    target: T,
    from: i64,
    to: i64,
) -> Expression {
    let entries = vec![IndexEntry::Range(int(location, from), int(location, to))];
    index_entries(location, target, entries)
}

pub fn index_entries<T: Into<SmolStr>>(
    location: SourceLocation,
    target: T,
    entries: Vec<IndexEntry>,
) -> Expression {
    Expression::Index(Box::new(Index {
        target: ident(location, target),
        entries,
        location,
    }))
}

pub fn unary(location: SourceLocation, op: UnaryOp, operand: Expression) -> Expression {
    Expression::Unary(Box::new(UnaryExpr {
        op,
        operand,
        location,
    }))
}

pub fn binary(location: SourceLocation, op: BinaryOp, lhs: Expression, rhs: Expression) -> Expression {
    Expression::Binary(Box::new(BinaryExpr {
        op,
        lhs,
        rhs,
        location,
    }))
}

pub fn call<T: Into<SmolStr>>(location: SourceLocation, name: T, args: Vec<Expression>) -> Expression {
    Expression::FunctionCall(FunctionCall {
        name: ident(location, name),
        args,
        location,
    })
}

pub fn array(location: SourceLocation, elements: Vec<Expression>) -> Expression {
    Expression::Array(ArrayLiteral { elements, location })
}
