// Copyright contributors to the cqasm-semantics project
// SPDX-License-Identifier: Apache-2.0

// Walks over a finished ASG.
// Everything below applies a function FnMut(Resolution) to every place in the ASG
// that holds the outcome of name or overload resolution.

use crate::asg::{Block, Expr, GateCall, Program, Stmt, StmtNode, TExpr};
use crate::overload::Overload;
use crate::symbols::SymbolIdResult;

/// One result of resolution found in the ASG.
#[derive(Clone, Copy, Debug)]
pub enum Resolution<'a> {
    Symbol(&'a SymbolIdResult),
    /// A call of an instruction, operator or function, and the overload selected for it.
    Call(&'a str, Option<&'static Overload>),
    /// The type of an expression.
    Type(&'a TExpr),
}

// This struct is used to apply `func` to all `Resolution`s in the ASG.
struct WalkContext<T> {
    func: T,
}

trait WalkResolutions<T> {
    fn walk(&self, context: &mut WalkContext<T>);
}

// Trick to emulate an alias for a trait bound
trait ResolutionFn: for<'a> FnMut(Resolution<'a>) {}
impl<T> ResolutionFn for T where T: for<'a> FnMut(Resolution<'a>) {}

impl<T: ResolutionFn> WalkResolutions<T> for Program {
    fn walk(&self, context: &mut WalkContext<T>) {
        self.stmts().iter().for_each(|s| s.walk(context));
    }
}

impl<V, T: ResolutionFn> WalkResolutions<T> for &V
where
    V: WalkResolutions<T> + ?Sized,
{
    fn walk(&self, context: &mut WalkContext<T>) {
        (**self).walk(context);
    }
}

impl<V, T: ResolutionFn> WalkResolutions<T> for Option<V>
where
    V: WalkResolutions<T>,
{
    fn walk(&self, context: &mut WalkContext<T>) {
        if let Some(v) = self {
            v.walk(context);
        }
    }
}

impl<V, T: ResolutionFn> WalkResolutions<T> for [V]
where
    V: WalkResolutions<T>,
{
    fn walk(&self, context: &mut WalkContext<T>) {
        self.iter().for_each(|v| v.walk(context));
    }
}

impl<T: ResolutionFn> WalkResolutions<T> for StmtNode {
    fn walk(&self, context: &mut WalkContext<T>) {
        self.stmt().walk(context);
    }
}

fn walk_block<T: ResolutionFn>(block: &Block, context: &mut WalkContext<T>) {
    block.as_slice().walk(context);
}

impl<T: ResolutionFn> WalkResolutions<T> for GateCall {
    fn walk(&self, context: &mut WalkContext<T>) {
        (context.func)(Resolution::Call(self.name(), self.overload()));
        self.condition().walk(context);
        self.operands().walk(context);
    }
}

impl<T: ResolutionFn> WalkResolutions<T> for Stmt {
    fn walk(&self, context: &mut WalkContext<T>) {
        match self {
            Stmt::Qubits(qubits) => {
                (context.func)(Resolution::Symbol(qubits.qubits()));
                (context.func)(Resolution::Symbol(qubits.bits()));
                qubits.size().walk(context);
            }
            Stmt::DeclareVariable(decl) => {
                (context.func)(Resolution::Symbol(decl.name()));
                decl.size().walk(context);
                decl.initializer().walk(context);
            }
            Stmt::Mapping(mapping) => {
                (context.func)(Resolution::Symbol(mapping.alias()));
                mapping.target().walk(context);
            }
            Stmt::GateCall(call) => call.walk(context),
            Stmt::Bundle(bundle) => bundle.instructions().walk(context),
            Stmt::Subcircuit(subcircuit) => walk_block(subcircuit.body(), context),
            Stmt::Assignment(assignment) => {
                assignment.lvalue().walk(context);
                assignment.rvalue().walk(context);
            }
            Stmt::If(if_stmt) => {
                for (condition, body) in if_stmt.branches() {
                    condition.walk(context);
                    walk_block(body, context);
                }
                if let Some(body) = if_stmt.otherwise() {
                    walk_block(body, context);
                }
            }
            Stmt::While(while_stmt) => {
                while_stmt.condition().walk(context);
                walk_block(while_stmt.body(), context);
            }
            Stmt::RepeatUntil(repeat) => {
                walk_block(repeat.body(), context);
                repeat.condition().walk(context);
            }
            Stmt::Foreach(foreach) => {
                (context.func)(Resolution::Symbol(foreach.variable()));
                foreach.from().walk(context);
                foreach.to().walk(context);
                walk_block(foreach.body(), context);
            }
            Stmt::Break | Stmt::Continue => (),
        }
    }
}

impl<T: ResolutionFn> WalkResolutions<T> for TExpr {
    fn walk(&self, context: &mut WalkContext<T>) {
        (context.func)(Resolution::Type(self));
        match self.expression() {
            Expr::Identifier(symbol_id) => (context.func)(Resolution::Symbol(symbol_id)),
            Expr::IndexedIdentifier(indexed) => {
                (context.func)(Resolution::Symbol(indexed.target()))
            }
            Expr::Call(call) => {
                (context.func)(Resolution::Call(call.name(), call.overload()));
                call.args().walk(context);
            }
            Expr::Axis(elements) => elements.as_slice().walk(context),
            Expr::Literal(_) => (),
        }
    }
}

/// Apply `func` to every result of resolution in `program`, in program order.
pub fn walk_resolutions<F: for<'a> FnMut(Resolution<'a>)>(program: &Program, func: F) {
    let mut context = WalkContext { func };
    program.walk(&mut context);
}

/// Number of symbol references and declarations that failed to resolve.
pub fn count_symbol_errors(program: &Program) -> usize {
    let mut count = 0;
    walk_resolutions(program, |resolution| {
        if let Resolution::Symbol(Err(_)) = resolution {
            count += 1;
        }
    });
    count
}

/// Number of instruction, operator and function calls with no selected overload.
pub fn count_unresolved_calls(program: &Program) -> usize {
    let mut count = 0;
    walk_resolutions(program, |resolution| {
        if let Resolution::Call(_, None) = resolution {
            count += 1;
        }
    });
    count
}

/// Number of expressions whose type is `Type::Undefined`.
pub fn count_undefined_types(program: &Program) -> usize {
    let mut count = 0;
    walk_resolutions(program, |resolution| {
        if let Resolution::Type(texpr) = resolution {
            if !texpr.get_type().is_defined() {
                count += 1;
            }
        }
    });
    count
}

/// Return `true` if every symbol, call and expression in `program` was resolved.
pub fn is_fully_resolved(program: &Program) -> bool {
    count_symbol_errors(program) == 0
        && count_unresolved_calls(program) == 0
        && count_undefined_types(program) == 0
}
