// Copyright contributors to the cqasm-semantics project
// SPDX-License-Identifier: Apache-2.0

// Language dialects. A dialect bundles everything that differs between language versions:
// the implicit conversions, the built-in instructions and the built-in functions, including
// operators. All dialects share the same resolution algorithm.
//
// The tables are built once, on first use, and are read-only afterwards.

use crate::overload::{CaseSensitive, Overload, OverloadTable};
use crate::types::{from_spec, Type, TypeRules};
use once_cell::sync::Lazy;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DialectKind {
    /// cQASM 1.0, 1.1 and 1.2
    V1,
    /// cQASM 3.0
    V3,
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialectKind::V1 => write!(f, "cQASM 1.x"),
            DialectKind::V3 => write!(f, "cQASM 3.0"),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Dialect {
    kind: DialectKind,
    rules: TypeRules,
    instructions: OverloadTable,
    functions: OverloadTable,
}

impl Dialect {
    pub fn kind(&self) -> DialectKind {
        self.kind
    }

    pub fn rules(&self) -> &TypeRules {
        &self.rules
    }

    pub fn instructions(&self) -> &OverloadTable {
        &self.instructions
    }

    pub fn functions(&self) -> &OverloadTable {
        &self.functions
    }
}

pub static CQASM_1: Lazy<Dialect> = Lazy::new(cqasm_1);
pub static CQASM_3: Lazy<Dialect> = Lazy::new(cqasm_3);

/// Return the dialect for the version directive `version`, e.g. `[1, 2]` for `version 1.2`.
/// Trailing zero components are ignored, so `1`, `1.0` and `1.0.0` are the same version.
/// Return `None` for unsupported versions.
pub fn dialect_for_version(version: &[i64]) -> Option<&'static Dialect> {
    let significant = version.len() - version.iter().rev().take_while(|&&v| v == 0).count();
    let dialect: &'static Dialect = match &version[..significant] {
        [1] | [1, 1] | [1, 2] => &CQASM_1,
        [3] => &CQASM_3,
        _ => {
            tracing::debug!(?version, "unsupported version");
            return None;
        }
    };
    tracing::debug!(?version, dialect = %dialect.kind(), "selected dialect");
    Some(dialect)
}

//
// Table construction
//

// Register instruction `name` for each parameter specification in `specs`.
fn add_instructions(table: &mut OverloadTable, names: &[&str], specs: &[&str]) {
    for name in names {
        for spec in specs {
            table.add(instruction(name, spec));
        }
    }
}

fn instruction(name: &str, spec: &str) -> Overload {
    let tag = if spec.is_empty() {
        name.to_string()
    } else {
        format!("{name}_{spec}")
    };
    Overload::new(name, from_spec(spec), Type::Void, tag)
}

// Register function `name`, whose implementation tag is built from `stem`, once for
// each `(parameters, return)` pair.
fn add_functions(table: &mut OverloadTable, name: &str, stem: &str, signatures: &[(&str, &str)]) {
    for (params, returns) in signatures {
        let returns = from_spec(returns).pop().unwrap_or(Type::Void);
        table.add(Overload::new(
            name,
            from_spec(params),
            returns,
            format!("{stem}_{params}"),
        ));
    }
}

const MATH_FUNCTIONS: [&str; 15] = [
    "sqrt", "exp", "log", "sin", "cos", "tan", "sinh", "cosh", "tanh", "asin", "acos", "atan",
    "asinh", "acosh", "atanh",
];

// Functions and operators common to all dialects.
fn common_functions(table: &mut OverloadTable) {
    for (op, stem) in [
        ("operator+", "op_add"),
        ("operator-", "op_sub"),
        ("operator*", "op_mul"),
        ("operator/", "op_div"),
    ] {
        add_functions(table, op, stem, &[("ii", "i"), ("ff", "f")]);
    }
    add_functions(table, "operator%", "op_mod", &[("ii", "i")]);
    add_functions(table, "operator**", "op_pow", &[("ff", "f")]);
    add_functions(table, "operator-", "op_neg", &[("i", "i"), ("f", "f")]);
    add_functions(table, "operator!", "op_lnot", &[("b", "b")]);
    add_functions(table, "operator~", "op_bnot", &[("i", "i")]);
    for (op, stem) in [("operator==", "op_eq"), ("operator!=", "op_ne")] {
        add_functions(table, op, stem, &[("bb", "b"), ("ii", "b"), ("ff", "b")]);
    }
    for (op, stem) in [
        ("operator<", "op_lt"),
        ("operator<=", "op_le"),
        ("operator>", "op_gt"),
        ("operator>=", "op_ge"),
    ] {
        add_functions(table, op, stem, &[("ii", "b"), ("ff", "b")]);
    }
    for (op, stem) in [
        ("operator&&", "op_land"),
        ("operator||", "op_lor"),
        ("operator^^", "op_lxor"),
    ] {
        add_functions(table, op, stem, &[("bb", "b")]);
    }
    for (op, stem) in [
        ("operator&", "op_band"),
        ("operator|", "op_bor"),
        ("operator^", "op_bxor"),
        ("operator<<", "op_shl"),
        ("operator>>", "op_shr"),
    ] {
        add_functions(table, op, stem, &[("ii", "i")]);
    }
    for name in MATH_FUNCTIONS {
        add_functions(table, name, &format!("fn_{name}"), &[("f", "f")]);
    }
    add_functions(table, "abs", "fn_abs", &[("i", "i"), ("f", "f")]);
}

fn cqasm_1() -> Dialect {
    let mut instructions = OverloadTable::new(CaseSensitive::False);
    add_instructions(
        &mut instructions,
        &[
            "x", "y", "z", "i", "h", "s", "sdag", "t", "tdag", "x90", "y90", "mx90", "my90",
            "prep_x", "prep_y", "prep_z", "measure_x", "measure_y", "measure_z",
        ],
        &["Q"],
    );
    add_instructions(&mut instructions, &["rx", "ry", "rz"], &["Qf"]);
    add_instructions(&mut instructions, &["cnot", "cz", "swap"], &["QQ"]);
    add_instructions(&mut instructions, &["cr"], &["QQf"]);
    add_instructions(&mut instructions, &["crk"], &["QQi"]);
    add_instructions(&mut instructions, &["toffoli"], &["QQQ"]);
    add_instructions(&mut instructions, &["measure_all"], &[""]);
    add_instructions(&mut instructions, &["measure_parity"], &["QaQa"]);
    add_instructions(&mut instructions, &["display"], &["", "B"]);
    add_instructions(&mut instructions, &["not"], &["B"]);
    add_instructions(&mut instructions, &["skip", "wait"], &["i"]);
    add_instructions(&mut instructions, &["reset-averaging"], &["", "Q"]);
    instructions.add(instruction("prep", "Q").deprecated_by("prep_z"));
    instructions.add(instruction("measure", "Q").deprecated_by("measure_z"));

    let mut functions = OverloadTable::new(CaseSensitive::False);
    common_functions(&mut functions);
    for (op, stem) in [
        ("operator+", "op_add"),
        ("operator-", "op_sub"),
        ("operator*", "op_mul"),
        ("operator/", "op_div"),
        ("operator**", "op_pow"),
    ] {
        add_functions(&mut functions, op, stem, &[("cc", "c")]);
    }
    add_functions(&mut functions, "operator-", "op_neg", &[("c", "c")]);
    add_functions(&mut functions, "operator==", "op_eq", &[("cc", "b")]);
    add_functions(&mut functions, "operator!=", "op_ne", &[("cc", "b")]);
    add_functions(&mut functions, "complex", "fn_complex", &[("ff", "c")]);
    add_functions(&mut functions, "real", "fn_real", &[("c", "f")]);
    add_functions(&mut functions, "imag", "fn_imag", &[("c", "f")]);

    Dialect {
        kind: DialectKind::V1,
        rules: TypeRules::new(vec![
            (Type::Integer, Type::Float),
            (Type::Float, Type::Complex),
            (Type::BitRef(1), Type::Boolean),
        ]),
        instructions,
        functions,
    }
}

fn cqasm_3() -> Dialect {
    let mut instructions = OverloadTable::new(CaseSensitive::True);
    add_instructions(
        &mut instructions,
        &[
            "H", "I", "X", "Y", "Z", "X90", "mX90", "Y90", "mY90", "S", "Sdag", "T", "Tdag",
        ],
        &["Q"],
    );
    add_instructions(&mut instructions, &["Rx", "Ry", "Rz"], &["Qf"]);
    add_instructions(&mut instructions, &["CNOT", "CZ", "SWAP"], &["QQ"]);
    add_instructions(&mut instructions, &["CR"], &["QQf"]);
    add_instructions(&mut instructions, &["CRk"], &["QQi"]);
    add_instructions(&mut instructions, &["measure"], &["BQ"]);
    add_instructions(&mut instructions, &["reset"], &["Q", ""]);
    add_instructions(&mut instructions, &["barrier"], &["Q"]);

    let mut functions = OverloadTable::new(CaseSensitive::True);
    common_functions(&mut functions);

    Dialect {
        kind: DialectKind::V3,
        rules: TypeRules::new(vec![(Type::Integer, Type::Float)]),
        instructions,
        functions,
    }
}
