// Copyright contributors to the cqasm-semantics project
// SPDX-License-Identifier: Apache-2.0

// Build the ASG defined in asg.rs from the raw parse tree defined in the crate cqasm_syntax.
//
// In the filename syntax_to_semantics.rs, "syntax" is a noun and "semantics" is a noun.
//
// The walk makes a single pass. Errors are recorded in the context and analysis continues
// with placeholders: an unresolved name gets `Type::Undefined`, an unresolved call gets no
// overload. Only a missing or unsupported version stops analysis.

use std::io;
use std::path::Path;

use crate::asg;
use crate::context::Context;
use crate::dialect::dialect_for_version;
use crate::semantic_error::{SemanticErrorKind::*, SemanticErrorList};
use crate::symbols::{ScopeStack, ScopeType, SymbolErrorTrait, SymbolKind, SymbolTable};
use crate::types::{IsConst, Type};
use cqasm_source_file::SourceString;
use cqasm_syntax::ast as synast; // Raw parse tree
use cqasm_syntax::SourceLocation;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnalysisState {
    /// No Error-severity diagnostics. There may be warnings.
    Resolved,
    Failed,
}

pub struct AnalysisResult {
    program: asg::Program,
    errors: SemanticErrorList,
    // `None` if analysis stopped at the version directive.
    symbol_table: Option<SymbolTable>,
}

impl AnalysisResult {
    pub fn program(&self) -> &asg::Program {
        &self.program
    }

    pub fn errors(&self) -> &SemanticErrorList {
        &self.errors
    }

    pub fn symbol_table(&self) -> Option<&SymbolTable> {
        self.symbol_table.as_ref()
    }

    pub fn state(&self) -> AnalysisState {
        if self.any_semantic_errors() {
            AnalysisState::Failed
        } else {
            AnalysisState::Resolved
        }
    }

    pub fn any_semantic_errors(&self) -> bool {
        self.errors.any_semantic_errors()
    }

    pub fn take_program(self) -> asg::Program {
        self.program
    }

    pub fn as_tuple(self) -> (asg::Program, SemanticErrorList, Option<SymbolTable>) {
        (self.program, self.errors, self.symbol_table)
    }

    /// Print diagnostics against `source`, which was not read from a file.
    pub fn print_errors(&self, source: &SourceString) -> io::Result<()> {
        self.errors
            .print_errors_no_file(source.fake_file_path(), source.source())
    }

    /// Print diagnostics against the source in `file_path`.
    pub fn print_errors_for_file(&self, file_path: &Path) -> io::Result<()> {
        self.errors.print_errors(file_path)
    }
}

/// Analyze `tree` and build the ASG.
pub fn analyze(tree: &synast::Program) -> AnalysisResult {
    let (items, location) = match &tree.version {
        Some(version) => (Some(&version.items), version.location),
        None => {
            let location = tree
                .statements
                .first()
                .map_or(SourceLocation::new(1, 1), |stmt| stmt.location());
            (None, location)
        }
    };
    let Some(dialect) = items.and_then(|items| dialect_for_version(items)) else {
        let mut errors = SemanticErrorList::new();
        errors.insert(UnsupportedVersion(items.cloned()), location);
        return AnalysisResult {
            program: asg::Program::new(),
            errors,
            symbol_table: None,
        };
    };
    let mut context = Context::new(dialect);
    if let Some(items) = items {
        context.program.set_version(items, dialect.kind());
    }
    for statement in tree.statements.iter() {
        let stmt = from_statement(statement, &mut context);
        context.program.insert_stmt(stmt);
    }
    let (program, errors, symbol_table) = context.as_tuple();
    tracing::debug!(
        statements = program.len(),
        errors = errors.error_count(),
        "analysis finished"
    );
    AnalysisResult {
        program,
        errors,
        symbol_table: Some(symbol_table),
    }
}

fn from_block(block: &synast::Block, context: &mut Context) -> asg::Block {
    block
        .statements
        .iter()
        .map(|statement| from_statement(statement, context))
        .collect()
}

// Statements nested in a new scope of `kind`. The scope is closed on return.
fn from_scoped_block(block: &synast::Block, kind: ScopeType, context: &mut Context) -> asg::Block {
    let mut scoped = context.scope(kind);
    from_block(block, &mut scoped)
}

fn from_statement(statement: &synast::Statement, context: &mut Context) -> asg::StmtNode {
    let errors_before = context.error_count();
    let stmt = match statement {
        synast::Statement::Qubits(qubits) => from_qubits(qubits, context),

        synast::Statement::Variable(variable) => from_variable(variable, context),

        synast::Statement::Mapping(mapping) => {
            let target = from_expr(&mapping.target, context);
            let alias = context.new_binding(
                &mapping.alias.name,
                SymbolKind::Mapping,
                target.get_type(),
                mapping.alias.location,
            );
            asg::Mapping::new(alias, target).to_stmt()
        }

        synast::Statement::Instruction(instruction) => {
            from_instruction(instruction, context).to_stmt()
        }

        synast::Statement::Bundle(bundle) => {
            let instructions = bundle
                .instructions
                .iter()
                .map(|instruction| from_instruction(instruction, context))
                .collect();
            asg::Bundle::new(instructions).to_stmt()
        }

        synast::Statement::Subcircuit(subcircuit) => from_subcircuit(subcircuit, context),

        synast::Statement::Assignment(assignment) => from_assignment(assignment, context),

        synast::Statement::IfElse(if_else) => {
            let branches = if_else
                .branches
                .iter()
                .map(|branch| {
                    let condition = from_condition(&branch.condition, context);
                    let body = from_scoped_block(&branch.body, ScopeType::Local, context);
                    (condition, body)
                })
                .collect();
            let otherwise = if_else
                .otherwise
                .as_ref()
                .map(|block| from_scoped_block(block, ScopeType::Local, context));
            asg::If::new(branches, otherwise).to_stmt()
        }

        synast::Statement::While(while_stmt) => {
            let condition = from_condition(&while_stmt.condition, context);
            let body = from_scoped_block(&while_stmt.body, ScopeType::Loop, context);
            asg::While::new(condition, body).to_stmt()
        }

        synast::Statement::RepeatUntil(repeat) => {
            let body = from_scoped_block(&repeat.body, ScopeType::Loop, context);
            let condition = from_condition(&repeat.condition, context);
            asg::RepeatUntil::new(body, condition).to_stmt()
        }

        synast::Statement::Foreach(foreach) => from_foreach(foreach, context),

        synast::Statement::Break(location) => {
            check_in_loop("break", *location, context);
            asg::Stmt::Break
        }

        synast::Statement::Continue(location) => {
            check_in_loop("continue", *location, context);
            asg::Stmt::Continue
        }
    };
    let valid = context.error_count() == errors_before;
    asg::StmtNode::new(stmt, statement.location(), valid)
}

fn check_in_loop(keyword: &'static str, location: SourceLocation, context: &mut Context) {
    if !context.symbol_table().in_loop() {
        context.insert_error(LoopControlOutsideLoop(keyword), location);
    }
}

fn from_qubits(qubits: &synast::Qubits, context: &mut Context) -> asg::Stmt {
    let size = from_expr(&qubits.size, context);
    let (qubit_type, bit_type) = match register_size(&size, context) {
        Some(n) => (Type::QubitRef(n), Type::BitRef(n)),
        // Still declared, so that later uses are not reported as undeclared.
        None => (Type::Undefined, Type::Undefined),
    };
    let location = qubits.location;
    let qubits_id = context.new_binding("q", SymbolKind::QubitRegister, &qubit_type, location);
    let bits_id = context.new_binding("b", SymbolKind::BitRegister, &bit_type, location);
    asg::Qubits::new(qubits_id, bits_id, size).to_stmt()
}

fn from_variable(variable: &synast::Variable, context: &mut Context) -> asg::Stmt {
    let (size, typ, kind) = match &variable.ty {
        synast::TypeSpec::Qubit(size) | synast::TypeSpec::Bit(size) => {
            let is_qubit = matches!(variable.ty, synast::TypeSpec::Qubit(_));
            let (size, n) = match size {
                Some(expr) => {
                    let size = from_expr(expr, context);
                    let n = register_size(&size, context);
                    (Some(size), n)
                }
                None => (None, Some(1)),
            };
            let (typ, kind) = match (is_qubit, n) {
                (_, None) => (Type::Undefined, kind_of_register(is_qubit)),
                (true, Some(n)) => (Type::QubitRef(n), SymbolKind::QubitRegister),
                (false, Some(n)) => (Type::BitRef(n), SymbolKind::BitRegister),
            };
            (size, typ, kind)
        }
        synast::TypeSpec::Bool => (None, Type::Boolean, SymbolKind::Variable),
        synast::TypeSpec::Int => (None, Type::Integer, SymbolKind::Variable),
        synast::TypeSpec::Float => (None, Type::Float, SymbolKind::Variable),
        synast::TypeSpec::Complex => (None, Type::Complex, SymbolKind::Variable),
        synast::TypeSpec::Axis => (None, Type::Axis, SymbolKind::Variable),
    };
    // The initializer is resolved before the name is bound.
    let initializer = variable.initializer.as_ref().map(|init| {
        let init = from_expr(init, context);
        check_conversion(&init, &typ, context);
        init
    });
    let name = context.new_binding(&variable.name.name, kind, &typ, variable.name.location);
    asg::DeclareVariable::new(name, size, initializer).to_stmt()
}

fn kind_of_register(is_qubit: bool) -> SymbolKind {
    if is_qubit {
        SymbolKind::QubitRegister
    } else {
        SymbolKind::BitRegister
    }
}

fn from_instruction(instruction: &synast::Instruction, context: &mut Context) -> asg::GateCall {
    let operands: Vec<asg::TExpr> = instruction
        .operands
        .iter()
        .map(|operand| from_expr(operand, context))
        .collect();
    let condition = instruction
        .condition
        .as_ref()
        .map(|condition| from_condition(condition, context));
    let arg_types: Vec<Type> = operands
        .iter()
        .map(|operand| operand.get_type().clone())
        .collect();
    let overload =
        context.resolve_instruction(&instruction.name.name, &arg_types, instruction.location);
    asg::GateCall::new(
        instruction.name.name.clone(),
        overload,
        condition,
        operands,
    )
}

fn from_subcircuit(subcircuit: &synast::Subcircuit, context: &mut Context) -> asg::Stmt {
    context.new_subcircuit(&subcircuit.name.name, subcircuit.name.location);
    let iterations = match &subcircuit.iterations {
        None => Some(1),
        Some(expr) => {
            let count = from_expr(expr, context);
            match const_integer(&count, context) {
                Some(n) if n < 0 => {
                    context.insert_error(InvalidIterationCount(n), count.location());
                    None
                }
                Some(n) => Some(n as u64),
                None => None,
            }
        }
    };
    let body = from_scoped_block(&subcircuit.body, ScopeType::Subcircuit, context);
    asg::Subcircuit::new(subcircuit.name.name.clone(), iterations, body).to_stmt()
}

fn from_assignment(assignment: &synast::Assignment, context: &mut Context) -> asg::Stmt {
    let lvalue = from_expr(&assignment.lhs, context);
    let rvalue = from_expr(&assignment.rhs, context);
    match lvalue.expression() {
        asg::Expr::Identifier(Ok(symbol_id)) => {
            let symbol = &context.symbol_table()[symbol_id];
            if symbol.kind() != SymbolKind::Variable {
                let target = match symbol.kind() {
                    SymbolKind::QubitRegister | SymbolKind::BitRegister => "register",
                    _ => "mapping",
                };
                let description = format!("{target} `{}`", symbol.name());
                context.insert_error(NotAssignable(description), lvalue.location());
            } else {
                check_conversion(&rvalue, lvalue.get_type(), context);
            }
        }
        // Undeclared, already reported.
        asg::Expr::Identifier(Err(_)) => (),
        _ => {
            context.insert_error(
                NotAssignable("an expression".to_string()),
                lvalue.location(),
            );
        }
    }
    asg::Assignment::new(lvalue, rvalue).to_stmt()
}

fn from_foreach(foreach: &synast::Foreach, context: &mut Context) -> asg::Stmt {
    let from = from_expr(&foreach.from, context);
    check_conversion(&from, &Type::Integer, context);
    let to = from_expr(&foreach.to, context);
    check_conversion(&to, &Type::Integer, context);
    let mut scoped = context.scope(ScopeType::Loop);
    let variable = scoped.new_binding(
        &foreach.variable.name,
        SymbolKind::Variable,
        &Type::Integer,
        foreach.variable.location,
    );
    let body = from_block(&foreach.body, &mut scoped);
    asg::Foreach::new(variable, from, to, body).to_stmt()
}

//
// Expressions
//

fn from_expr(expr: &synast::Expression, context: &mut Context) -> asg::TExpr {
    match expr {
        synast::Expression::Literal(literal) => {
            let literal_asg = match literal.kind {
                synast::LiteralKind::Int(value) => asg::Literal::Int(value),
                synast::LiteralKind::Float(value) => asg::Literal::Float(value),
                synast::LiteralKind::Bool(value) => asg::Literal::Bool(value),
            };
            literal_asg.to_texpr(literal.location)
        }

        synast::Expression::Identifier(identifier) => {
            let (symbol_id, typ) = context
                .lookup_symbol(&identifier.name, identifier.location)
                .as_tuple();
            asg::TExpr::new(
                asg::Expr::Identifier(symbol_id),
                typ,
                IsConst::False,
                identifier.location,
            )
        }

        synast::Expression::Index(index) => from_index(index, context),

        synast::Expression::Unary(unary) => {
            let operand = from_expr(&unary.operand, context);
            from_call(unary_operator_name(unary.op), vec![operand], unary.location, context)
        }

        synast::Expression::Binary(binary) => {
            let lhs = from_expr(&binary.lhs, context);
            let rhs = from_expr(&binary.rhs, context);
            from_call(binary_operator_name(binary.op), vec![lhs, rhs], binary.location, context)
        }

        synast::Expression::FunctionCall(call) => {
            let args = call
                .args
                .iter()
                .map(|arg| from_expr(arg, context))
                .collect();
            from_call(&call.name.name, args, call.location, context)
        }

        synast::Expression::Array(array) => {
            let elements: Vec<asg::TExpr> = array
                .elements
                .iter()
                .map(|element| from_expr(element, context))
                .collect();
            let mut typ = Type::Axis;
            if elements.len() != 3 {
                context.insert_error(InvalidAxis(elements.len()), array.location);
                typ = Type::Undefined;
            }
            for element in elements.iter() {
                if !check_conversion(element, &Type::Float, context) {
                    typ = Type::Undefined;
                }
            }
            let is_const = IsConst::from(elements.iter().all(|element| element.is_const()));
            asg::TExpr::new(asg::Expr::Axis(elements), typ, is_const, array.location)
        }
    }
}

fn from_call(
    name: &str,
    args: Vec<asg::TExpr>,
    location: SourceLocation,
    context: &mut Context,
) -> asg::TExpr {
    let arg_types: Vec<Type> = args.iter().map(|arg| arg.get_type().clone()).collect();
    let overload = context.resolve_function(name, &arg_types, location);
    let typ = overload.map_or(Type::Undefined, |overload| overload.return_type().clone());
    let is_const = IsConst::from(overload.is_some() && args.iter().all(|arg| arg.is_const()));
    asg::TExpr::new(
        asg::Expr::Call(asg::Call::new(name.into(), overload, args)),
        typ,
        is_const,
        location,
    )
}

fn unary_operator_name(op: synast::UnaryOp) -> &'static str {
    use synast::UnaryOp::*;
    match op {
        Neg => "operator-",
        Not => "operator!",
        BitNot => "operator~",
    }
}

fn binary_operator_name(op: synast::BinaryOp) -> &'static str {
    use synast::BinaryOp::*;
    match op {
        Add => "operator+",
        Sub => "operator-",
        Mul => "operator*",
        Div => "operator/",
        Mod => "operator%",
        Pow => "operator**",
        Eq => "operator==",
        Ne => "operator!=",
        Lt => "operator<",
        Le => "operator<=",
        Gt => "operator>",
        Ge => "operator>=",
        LogicalAnd => "operator&&",
        LogicalOr => "operator||",
        LogicalXor => "operator^^",
        BitAnd => "operator&",
        BitOr => "operator|",
        BitXor => "operator^",
        Shl => "operator<<",
        Shr => "operator>>",
    }
}

// `target[...]`. Every index must be a constant. Each index, and each element of a range,
// selects one element, so `q[0, 2:3]` has type `qubit[3]`. Ranges are kept as their
// bounds and never expanded here.
fn from_index(index: &synast::Index, context: &mut Context) -> asg::TExpr {
    let target = &index.target;
    let (symbol_id, target_type) = context
        .lookup_symbol(&target.name, target.location)
        .as_tuple();
    // Each entry as inclusive bounds with their locations. `n` is stored as `(n, n)`.
    let mut entries = Vec::new();
    let mut all_const = true;
    for entry in index.entries.iter() {
        match entry {
            synast::IndexEntry::Item(item) => {
                let item = from_expr(item, context);
                match const_integer(&item, context) {
                    Some(n) => entries.push(((n, item.location()), (n, item.location()))),
                    None => all_const = false,
                }
            }
            synast::IndexEntry::Range(first, last) => {
                let first = from_expr(first, context);
                let last = from_expr(last, context);
                match (const_integer(&first, context), const_integer(&last, context)) {
                    (Some(n1), Some(n2)) => {
                        entries.push(((n1, first.location()), (n2, last.location())))
                    }
                    _ => all_const = false,
                }
            }
        }
    }
    let typ = match target_type.register_size() {
        _ if !target_type.is_defined() => Type::Undefined,
        None => {
            context.insert_error(NotIndexable(target.name.clone()), target.location);
            Type::Undefined
        }
        Some(size) => {
            for (first, last) in entries.iter() {
                // At most one diagnostic per entry, at the first bound out of range.
                let outside = [first, last]
                    .into_iter()
                    .find(|(n, _)| usize::try_from(*n).map_or(true, |n| n >= size));
                if let Some((n, location)) = outside {
                    context.insert_error(
                        IndexOutOfRange {
                            name: target.name.clone(),
                            index: *n,
                            size,
                        },
                        *location,
                    );
                }
            }
            // An out-of-range index still selects one element, so that resolution of the
            // enclosing instruction can proceed.
            let selected = entries.iter().try_fold(0usize, |total, ((n1, _), (n2, _))| {
                let count = usize::try_from(n1.abs_diff(*n2)).ok()?.checked_add(1)?;
                total.checked_add(count)
            });
            match selected {
                Some(count) if all_const => target_type
                    .with_register_size(count)
                    .unwrap_or(Type::Undefined),
                _ => Type::Undefined,
            }
        }
    };
    let ranges = entries.into_iter().map(|((n1, _), (n2, _))| (n1, n2)).collect();
    asg::TExpr::new(
        asg::Expr::IndexedIdentifier(asg::IndexedIdentifier::new(symbol_id, ranges)),
        typ,
        IsConst::False,
        index.location,
    )
}

// Check that `expr` can be used as a condition.
fn from_condition(expr: &synast::Expression, context: &mut Context) -> asg::TExpr {
    let condition = from_expr(expr, context);
    check_conversion(&condition, &Type::Boolean, context);
    condition
}

// Log `IncompatibleTypes` unless the type of `expr` implicitly converts to `typ`.
// Undefined types were already reported and pass. Return `false` if an error was logged.
fn check_conversion(expr: &asg::TExpr, typ: &Type, context: &mut Context) -> bool {
    let found = expr.get_type();
    if !found.is_defined() || !typ.is_defined() || context.rules().can_implicitly_convert(found, typ) {
        return true;
    }
    context.insert_error(
        IncompatibleTypes {
            expected: typ.clone(),
            found: found.clone(),
        },
        expr.location(),
    );
    false
}

// The value of the constant integer `expr`. Possibly log `ExpectedConstInteger`.
fn const_integer(expr: &asg::TExpr, context: &mut Context) -> Option<i64> {
    if !expr.get_type().is_defined() {
        return None;
    }
    let value = expr.const_int();
    if value.is_none() {
        context.insert_error(ExpectedConstInteger, expr.location());
    }
    value
}

// The size of a register declared with size expression `size`. Possibly log
// `ExpectedConstInteger` or `InvalidRegisterSize`.
fn register_size(size: &asg::TExpr, context: &mut Context) -> Option<usize> {
    match const_integer(size, context)? {
        n if n <= 0 => {
            context.insert_error(InvalidRegisterSize(n), size.location());
            None
        }
        n => usize::try_from(n).ok(),
    }
}
