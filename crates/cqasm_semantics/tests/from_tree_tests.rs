// Copyright contributors to the cqasm-semantics project
// SPDX-License-Identifier: Apache-2.0

use cqasm_semantics::asg;
use cqasm_semantics::dialect::DialectKind;
use cqasm_semantics::semantic_error::{SemanticErrorKind, SemanticErrorList, Severity};
use cqasm_semantics::symbols::{SymbolKind, SymbolTable, SymbolType};
use cqasm_semantics::syntax_to_semantics::{analyze, AnalysisState};
use cqasm_semantics::types::Type;
use cqasm_semantics::validate::{count_symbol_errors, count_unresolved_calls, is_fully_resolved};
use cqasm_syntax::ast::{BinaryOp, IndexEntry, Statement, TypeSpec, UnaryOp};
use cqasm_syntax::make::{self, at};

fn v1(statements: Vec<Statement>) -> cqasm_syntax::ast::Program {
    make::program(Some(make::version(at(1, 1), &[1, 2])), statements)
}

fn v3(statements: Vec<Statement>) -> cqasm_syntax::ast::Program {
    make::program(Some(make::version(at(1, 1), &[3, 0])), statements)
}

fn analyze_tree(tree: &cqasm_syntax::ast::Program) -> (asg::Program, SemanticErrorList, SymbolTable) {
    let (program, errors, symbol_table) = analyze(tree).as_tuple();
    (program, errors, symbol_table.expect("analysis should get past the version"))
}

fn kinds(errors: &SemanticErrorList) -> Vec<SemanticErrorKind> {
    errors.iter().map(|err| err.kind().clone()).collect()
}

fn gate_call(stmt: &asg::StmtNode) -> &asg::GateCall {
    match stmt.stmt() {
        asg::Stmt::GateCall(call) => call,
        other => panic!("expected a gate call, got {other:?}"),
    }
}

// `qubits 2`
fn qubits2() -> Statement {
    make::qubits(at(2, 1), make::int(at(2, 8), 2))
}

//
// Version directive
//

#[test]
fn test_missing_version() {
    let tree = make::program(None, vec![qubits2()]);
    let result = analyze(&tree);
    assert_eq!(result.state(), AnalysisState::Failed);
    assert!(result.program().is_empty());
    assert!(result.symbol_table().is_none());
    assert_eq!(kinds(result.errors()), vec![SemanticErrorKind::UnsupportedVersion(None)]);
    assert_eq!(result.errors()[0].location(), at(2, 1));
}

#[test]
fn test_unsupported_version() {
    let tree = make::program(Some(make::version(at(1, 1), &[2, 0])), vec![qubits2()]);
    let result = analyze(&tree);
    assert_eq!(result.state(), AnalysisState::Failed);
    assert!(result.program().is_empty());
    assert_eq!(
        kinds(result.errors()),
        vec![SemanticErrorKind::UnsupportedVersion(Some(vec![2, 0]))]
    );
    assert_eq!(result.errors()[0].dialect(), None);
}

#[test]
fn test_supported_versions() {
    for (items, kind) in [
        (&[1, 0][..], DialectKind::V1),
        (&[1, 1][..], DialectKind::V1),
        (&[1, 2][..], DialectKind::V1),
        (&[3, 0][..], DialectKind::V3),
    ] {
        let tree = make::program(Some(make::version(at(1, 1), items)), vec![]);
        let result = analyze(&tree);
        assert_eq!(result.state(), AnalysisState::Resolved);
        assert_eq!(result.program().dialect(), Some(kind));
        assert_eq!(result.program().version(), Some(items));
    }
}

//
// Well-typed programs
//

#[test]
fn test_single_qubit_gate() {
    let tree = v1(vec![
        qubits2(),
        make::instruction(at(3, 1), "x", vec![make::index(at(3, 3), "q", &[0])]),
    ]);
    let (program, errors, symbol_table) = analyze_tree(&tree);
    assert!(errors.is_empty());
    assert_eq!(program.len(), 2);
    let call = gate_call(&program[1]);
    let overload = call.overload().unwrap();
    assert_eq!(overload.name(), "x");
    assert_eq!(overload.tag(), "x_Q");
    assert_eq!(call.operands()[0].get_type(), &Type::QubitRef(1));
    let q = symbol_table.lookup("q").unwrap();
    assert_eq!(q.symbol_type(), &Type::QubitRef(2));
    assert_eq!(q.symbol().kind(), SymbolKind::QubitRegister);
    let b = symbol_table.lookup("b").unwrap();
    assert_eq!(b.symbol_type(), &Type::BitRef(2));
}

#[test]
fn test_well_typed_program_is_fully_resolved() {
    let tree = v1(vec![
        qubits2(),
        make::instruction(
            at(3, 1),
            "cnot",
            vec![make::index(at(3, 6), "q", &[0]), make::index(at(3, 12), "q", &[1])],
        ),
        // The integer angle is promoted to float.
        make::instruction(
            at(4, 1),
            "rx",
            vec![make::index(at(4, 4), "q", &[0]), make::int(at(4, 10), 1)],
        ),
        make::instruction(
            at(5, 1),
            "rz",
            vec![
                make::index(at(5, 4), "q", &[1]),
                make::binary(
                    at(5, 10),
                    BinaryOp::Div,
                    make::call(at(5, 10), "sqrt", vec![make::float(at(5, 15), 2.0)]),
                    make::int(at(5, 21), 2),
                ),
            ],
        ),
        make::conditional_instruction(
            at(6, 1),
            "x",
            make::index(at(6, 5), "b", &[0]),
            vec![make::index(at(6, 11), "q", &[1])],
        ),
        make::instruction(at(7, 1), "measure_all", vec![]),
    ]);
    let (program, errors, _symbol_table) = analyze_tree(&tree);
    assert!(errors.is_empty(), "{errors}");
    assert!(program.iter().all(|stmt| stmt.is_valid()));
    assert!(is_fully_resolved(&program));
    let rz = gate_call(&program[3]);
    assert_eq!(rz.operands()[1].get_type(), &Type::Float);
}

#[test]
fn test_analysis_is_idempotent() {
    let tree = v1(vec![
        qubits2(),
        make::instruction(at(3, 1), "x", vec![make::index(at(3, 3), "q", &[7])]),
        make::instruction(at(4, 1), "h", vec![make::name(at(4, 3), "nope")]),
    ]);
    let (program1, errors1, table1) = analyze_tree(&tree);
    let (program2, errors2, table2) = analyze_tree(&tree);
    assert_eq!(program1, program2);
    assert_eq!(errors1, errors2);
    assert_eq!(table1, table2);
}

//
// Error recovery
//

#[test]
fn test_index_out_of_range_still_resolves() {
    let tree = v1(vec![
        qubits2(),
        make::instruction(at(3, 1), "x", vec![make::index(at(3, 3), "q", &[5])]),
    ]);
    let (program, errors, _symbol_table) = analyze_tree(&tree);
    assert_eq!(
        kinds(&errors),
        vec![SemanticErrorKind::IndexOutOfRange {
            name: "q".into(),
            index: 5,
            size: 2,
        }]
    );
    let stmt = &program[1];
    assert!(!stmt.is_valid());
    assert_eq!(gate_call(stmt).overload().unwrap().tag(), "x_Q");
}

#[test]
fn test_undeclared_operand_does_not_cascade() {
    let tree = v1(vec![
        qubits2(),
        make::instruction(
            at(3, 1),
            "cnot",
            vec![make::name(at(3, 6), "r"), make::index(at(3, 9), "q", &[1])],
        ),
    ]);
    let (program, errors, _symbol_table) = analyze_tree(&tree);
    assert_eq!(
        kinds(&errors),
        vec![SemanticErrorKind::UndeclaredIdentifier("r".into())]
    );
    assert_eq!(count_symbol_errors(&program), 1);
    // The undefined operand matches any parameter.
    assert_eq!(gate_call(&program[1]).overload().unwrap().tag(), "cnot_QQ");
}

#[test]
fn test_recovery_continues_after_errors() {
    let tree = v1(vec![
        qubits2(),
        make::instruction(at(3, 1), "frobnicate", vec![make::index(at(3, 12), "q", &[0])]),
        make::instruction(at(4, 1), "x", vec![make::int(at(4, 3), 1)]),
        make::instruction(at(5, 1), "y", vec![make::index(at(5, 3), "q", &[1])]),
    ]);
    let (program, errors, _symbol_table) = analyze_tree(&tree);
    assert_eq!(
        kinds(&errors),
        vec![
            SemanticErrorKind::UnknownInstruction("frobnicate".into()),
            SemanticErrorKind::NoMatchingOverload {
                name: "x".into(),
                arg_types: vec![Type::Integer],
            },
        ]
    );
    assert_eq!(count_unresolved_calls(&program), 2);
    let valid: Vec<bool> = program.iter().map(|stmt| stmt.is_valid()).collect();
    assert_eq!(valid, vec![true, false, false, true]);
}

#[test]
fn test_invalid_register_size() {
    let tree = v1(vec![
        make::qubits(at(2, 1), make::int(at(2, 8), 0)),
        make::instruction(at(3, 1), "x", vec![make::index(at(3, 3), "q", &[0])]),
    ]);
    let (program, errors, symbol_table) = analyze_tree(&tree);
    assert_eq!(kinds(&errors), vec![SemanticErrorKind::InvalidRegisterSize(0)]);
    // `q` is declared, so its use is not reported again.
    assert_eq!(symbol_table.lookup("q").unwrap().symbol_type(), &Type::Undefined);
    assert!(program[1].is_valid());
}

#[test]
fn test_register_size_must_be_constant() {
    let tree = v1(vec![
        make::variable(at(2, 1), "n", TypeSpec::Int, Some(make::int(at(2, 9), 2))),
        make::qubits(at(3, 1), make::name(at(3, 8), "n")),
    ]);
    let (_program, errors, _symbol_table) = analyze_tree(&tree);
    assert_eq!(kinds(&errors), vec![SemanticErrorKind::ExpectedConstInteger]);
}

#[test]
fn test_register_size_is_folded() {
    let size = make::binary(
        at(2, 8),
        BinaryOp::Mul,
        make::int(at(2, 8), 2),
        make::unary(at(2, 12), UnaryOp::Neg, make::int(at(2, 13), -3)),
    );
    let tree = v1(vec![make::qubits(at(2, 1), size)]);
    let (_program, errors, symbol_table) = analyze_tree(&tree);
    assert!(errors.is_empty());
    assert_eq!(symbol_table.lookup("q").unwrap().symbol_type(), &Type::QubitRef(6));
}

#[test]
fn test_duplicate_declaration() {
    let tree = v1(vec![
        make::variable(at(2, 1), "x", TypeSpec::Int, None),
        make::variable(at(3, 1), "x", TypeSpec::Float, None),
    ]);
    let (program, errors, symbol_table) = analyze_tree(&tree);
    assert_eq!(kinds(&errors), vec![SemanticErrorKind::DuplicateDeclaration("x".into())]);
    assert_eq!(errors[0].location(), at(3, 1));
    assert!(program[0].is_valid());
    assert!(!program[1].is_valid());
    assert_eq!(symbol_table.lookup("x").unwrap().symbol_type(), &Type::Integer);
}

#[test]
fn test_initializer_must_convert() {
    let tree = v1(vec![
        make::variable(at(2, 1), "x", TypeSpec::Float, Some(make::int(at(2, 11), 1))),
        make::variable(at(3, 1), "y", TypeSpec::Int, Some(make::float(at(3, 9), 1.5))),
    ]);
    let (_program, errors, _symbol_table) = analyze_tree(&tree);
    assert_eq!(
        kinds(&errors),
        vec![SemanticErrorKind::IncompatibleTypes {
            expected: Type::Integer,
            found: Type::Float,
        }]
    );
    assert_eq!(errors[0].location(), at(3, 9));
}

//
// Instructions
//

#[test]
fn test_deprecated_instruction_is_a_warning() {
    let tree = v1(vec![
        qubits2(),
        make::instruction(at(3, 1), "prep", vec![make::index(at(3, 6), "q", &[0])]),
    ]);
    let result = analyze(&tree);
    assert_eq!(result.state(), AnalysisState::Resolved);
    let errors = result.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].severity(), Severity::Warning);
    assert_eq!(errors[0].dialect(), Some(DialectKind::V1));
    assert!(result.program()[1].is_valid());
}

#[test]
fn test_instruction_case_by_dialect() {
    let tree = v1(vec![
        qubits2(),
        make::instruction(
            at(3, 1),
            "CNOT",
            vec![make::index(at(3, 6), "q", &[0]), make::index(at(3, 12), "q", &[1])],
        ),
    ]);
    let (_program, errors, _symbol_table) = analyze_tree(&tree);
    assert!(errors.is_empty());

    let qubit_decl = make::variable(at(2, 1), "q", TypeSpec::Qubit(Some(make::int(at(2, 7), 2))), None);
    let tree = v3(vec![
        qubit_decl.clone(),
        make::instruction(at(3, 1), "H", vec![make::index(at(3, 3), "q", &[0])]),
    ]);
    let (_program, errors, _symbol_table) = analyze_tree(&tree);
    assert!(errors.is_empty());

    let tree = v3(vec![
        qubit_decl,
        make::instruction(at(3, 1), "h", vec![make::index(at(3, 3), "q", &[0])]),
    ]);
    let (_program, errors, _symbol_table) = analyze_tree(&tree);
    assert_eq!(kinds(&errors), vec![SemanticErrorKind::UnknownInstruction("h".into())]);
}

#[test]
fn test_v3_measure() {
    let tree = v3(vec![
        make::variable(at(2, 1), "q", TypeSpec::Qubit(None), None),
        make::variable(at(3, 1), "b", TypeSpec::Bit(None), None),
        make::assignment(
            at(4, 1),
            make::name(at(4, 1), "b"),
            make::name(at(4, 5), "q"),
        ),
        make::instruction(
            at(5, 1),
            "measure",
            vec![make::name(at(5, 9), "b"), make::name(at(5, 12), "q")],
        ),
    ]);
    let (program, errors, _symbol_table) = analyze_tree(&tree);
    // Registers are not assignable. Measurement is an instruction.
    assert_eq!(
        kinds(&errors),
        vec![SemanticErrorKind::NotAssignable("register `b`".to_string())]
    );
    assert_eq!(gate_call(&program[3]).overload().unwrap().tag(), "measure_BQ");
}

#[test]
fn test_range_operand_size() {
    let tree = v1(vec![
        make::qubits(at(2, 1), make::int(at(2, 8), 3)),
        make::instruction(at(3, 1), "toffoli", vec![
            make::index(at(3, 9), "q", &[0]),
            make::index(at(3, 15), "q", &[1]),
            make::index(at(3, 21), "q", &[2]),
        ]),
        make::mapping(at(4, 1), make::index_range(at(4, 5), "q", 0, 1), "pair"),
        make::instruction(at(5, 1), "x", vec![make::name(at(5, 3), "pair")]),
    ]);
    let (_program, errors, symbol_table) = analyze_tree(&tree);
    assert_eq!(symbol_table.lookup("pair").unwrap().symbol_type(), &Type::QubitRef(2));
    // No broadcasting: `x` takes a single qubit.
    assert_eq!(
        kinds(&errors),
        vec![SemanticErrorKind::NoMatchingOverload {
            name: "x".into(),
            arg_types: vec![Type::QubitRef(2)],
        }]
    );
}

#[test]
fn test_condition_must_be_boolean() {
    let tree = v1(vec![
        qubits2(),
        make::conditional_instruction(
            at(3, 1),
            "x",
            make::float(at(3, 5), 1.0),
            vec![make::index(at(3, 10), "q", &[0])],
        ),
    ]);
    let (program, errors, _symbol_table) = analyze_tree(&tree);
    assert_eq!(
        kinds(&errors),
        vec![SemanticErrorKind::IncompatibleTypes {
            expected: Type::Boolean,
            found: Type::Float,
        }]
    );
    // The instruction itself still resolves.
    assert!(gate_call(&program[1]).overload().is_some());
}

#[test]
fn test_measure_parity_with_axes() {
    let axis = |line, col, v: [i64; 3]| {
        make::array(at(line, col), v.iter().map(|n| make::int(at(line, col), *n)).collect())
    };
    let tree = v1(vec![
        qubits2(),
        make::instruction(
            at(3, 1),
            "measure_parity",
            vec![
                make::index(at(3, 16), "q", &[0]),
                axis(3, 22, [1, 0, 0]),
                make::index(at(3, 33), "q", &[1]),
                axis(3, 39, [0, 0, 1]),
            ],
        ),
        make::instruction(
            at(4, 1),
            "measure_parity",
            vec![
                make::index(at(4, 16), "q", &[0]),
                make::array(at(4, 22), vec![make::int(at(4, 23), 1)]),
                make::index(at(4, 28), "q", &[1]),
                axis(4, 34, [0, 0, 1]),
            ],
        ),
    ]);
    let (program, errors, _symbol_table) = analyze_tree(&tree);
    assert_eq!(kinds(&errors), vec![SemanticErrorKind::InvalidAxis(1)]);
    assert_eq!(gate_call(&program[1]).overload().unwrap().tag(), "measure_parity_QaQa");
    // The malformed axis is undefined and does not cause a second diagnostic.
    assert!(gate_call(&program[2]).overload().is_some());
}

#[test]
fn test_bundle_members_resolve_independently() {
    let tree = v1(vec![
        qubits2(),
        make::bundle(
            at(3, 1),
            vec![
                make::instruction_node(at(3, 3), "x", vec![make::index(at(3, 5), "q", &[0])]),
                make::instruction_node(at(3, 12), "warp", vec![make::index(at(3, 17), "q", &[1])]),
                make::instruction_node(at(3, 24), "h", vec![make::index(at(3, 26), "q", &[1])]),
            ],
        ),
    ]);
    let (program, errors, _symbol_table) = analyze_tree(&tree);
    assert_eq!(kinds(&errors), vec![SemanticErrorKind::UnknownInstruction("warp".into())]);
    let bundle = match program[1].stmt() {
        asg::Stmt::Bundle(bundle) => bundle,
        _ => unreachable!(),
    };
    let resolved: Vec<bool> = bundle
        .instructions()
        .iter()
        .map(|call| call.overload().is_some())
        .collect();
    assert_eq!(resolved, vec![true, false, true]);
}

//
// Subcircuits and control flow
//

#[test]
fn test_subcircuits() {
    let tree = v1(vec![
        qubits2(),
        make::subcircuit(at(3, 1), "init", None, vec![
            make::variable(at(4, 1), "local", TypeSpec::Int, None),
        ]),
        make::subcircuit(at(5, 1), "loop", Some(make::int(at(5, 7), 0)), vec![]),
        make::subcircuit(at(6, 1), "bad", Some(make::int(at(6, 6), -1)), vec![]),
        make::subcircuit(at(7, 1), "init", Some(make::int(at(7, 7), 2)), vec![
            make::instruction(at(8, 1), "x", vec![make::name(at(8, 3), "local")]),
        ]),
    ]);
    let (program, errors, _symbol_table) = analyze_tree(&tree);
    assert_eq!(
        kinds(&errors),
        vec![
            SemanticErrorKind::InvalidIterationCount(-1),
            SemanticErrorKind::DuplicateDeclaration("init".into()),
            // Bindings in a subcircuit end with it.
            SemanticErrorKind::UndeclaredIdentifier("local".into()),
        ]
    );
    let iterations: Vec<Option<u64>> = program
        .iter()
        .filter_map(|stmt| match stmt.stmt() {
            asg::Stmt::Subcircuit(sub) => Some(sub.iterations()),
            _ => None,
        })
        .collect();
    assert_eq!(iterations, vec![Some(1), Some(0), None, Some(2)]);
}

#[test]
fn test_shadowing_in_branch() {
    let tree = v1(vec![
        make::variable(at(2, 1), "x", TypeSpec::Int, None),
        make::if_else(
            at(3, 1),
            vec![(
                make::boolean(at(3, 4), true),
                vec![
                    make::variable(at(4, 1), "x", TypeSpec::Float, None),
                    make::assignment(at(5, 1), make::name(at(5, 5), "x"), make::float(at(5, 9), 0.5)),
                ],
            )],
            Some(vec![make::assignment(
                at(7, 1),
                make::name(at(7, 5), "x"),
                make::float(at(7, 9), 0.5),
            )]),
        ),
    ]);
    let (_program, errors, _symbol_table) = analyze_tree(&tree);
    // Only the assignment in the else branch sees the outer `x: int`.
    assert_eq!(
        kinds(&errors),
        vec![SemanticErrorKind::IncompatibleTypes {
            expected: Type::Integer,
            found: Type::Float,
        }]
    );
    assert_eq!(errors[0].location(), at(7, 9));
}

#[test]
fn test_loop_control() {
    let tree = v1(vec![
        make::variable(at(2, 1), "i", TypeSpec::Int, Some(make::int(at(2, 9), 0))),
        make::while_loop(
            at(3, 1),
            make::binary(at(3, 7), BinaryOp::Lt, make::name(at(3, 7), "i"), make::int(at(3, 11), 4)),
            vec![
                make::assignment(
                    at(4, 1),
                    make::name(at(4, 5), "i"),
                    make::binary(at(4, 9), BinaryOp::Add, make::name(at(4, 9), "i"), make::int(at(4, 13), 1)),
                ),
                make::if_else(
                    at(5, 1),
                    vec![(make::boolean(at(5, 4), false), vec![make::break_stmt(at(5, 11))])],
                    None,
                ),
            ],
        ),
        make::foreach(at(7, 1), "k", make::int(at(7, 14), 0), make::int(at(7, 17), 3), vec![
            make::continue_stmt(at(8, 1)),
        ]),
        make::repeat_until(at(10, 1), vec![make::break_stmt(at(11, 1))], make::boolean(at(12, 7), true)),
        make::break_stmt(at(13, 1)),
        make::continue_stmt(at(14, 1)),
    ]);
    let (program, errors, symbol_table) = analyze_tree(&tree);
    assert_eq!(
        kinds(&errors),
        vec![
            SemanticErrorKind::LoopControlOutsideLoop("break"),
            SemanticErrorKind::LoopControlOutsideLoop("continue"),
        ]
    );
    assert!(program[1].is_valid());
    assert!(!program[4].is_valid());
    // The foreach variable is bound in the loop scope only.
    assert!(symbol_table.lookup("k").is_err());
}

#[test]
fn test_assignment_target_must_be_variable() {
    let tree = v1(vec![
        qubits2(),
        make::mapping(at(3, 1), make::index(at(3, 5), "q", &[0]), "data"),
        make::assignment(at(4, 1), make::name(at(4, 5), "data"), make::int(at(4, 12), 1)),
        make::assignment(at(5, 1), make::int(at(5, 5), 1), make::int(at(5, 9), 1)),
    ]);
    let (_program, errors, _symbol_table) = analyze_tree(&tree);
    assert_eq!(
        kinds(&errors),
        vec![
            SemanticErrorKind::NotAssignable("mapping `data`".to_string()),
            SemanticErrorKind::NotAssignable("an expression".to_string()),
        ]
    );
}

fn mapping_target(stmt: &asg::StmtNode) -> &asg::TExpr {
    match stmt.stmt() {
        asg::Stmt::Mapping(mapping) => mapping.target(),
        other => panic!("expected a mapping, got {other:?}"),
    }
}

#[test]
fn test_mapping_index_out_of_range() {
    let tree = v1(vec![
        make::qubits(at(2, 1), make::int(at(2, 8), 3)),
        make::mapping(at(3, 1), make::index(at(3, 5), "q", &[5]), "a"),
    ]);
    let (program, errors, symbol_table) = analyze_tree(&tree);
    assert_eq!(
        kinds(&errors),
        vec![SemanticErrorKind::IndexOutOfRange {
            name: "q".into(),
            index: 5,
            size: 3,
        }]
    );
    assert_eq!(errors[0].location(), at(3, 5));
    assert!(!program[1].is_valid());
    assert_eq!(symbol_table.lookup("a").unwrap().symbol_type(), &Type::QubitRef(1));
}

#[test]
fn test_reversed_range_descends() {
    let tree = v1(vec![
        make::qubits(at(2, 1), make::int(at(2, 8), 3)),
        make::mapping(at(3, 1), make::index_range(at(3, 5), "q", 2, 0), "rev"),
    ]);
    let (program, errors, symbol_table) = analyze_tree(&tree);
    assert!(errors.is_empty(), "{errors}");
    assert_eq!(symbol_table.lookup("rev").unwrap().symbol_type(), &Type::QubitRef(3));
    let target = mapping_target(&program[1]);
    let asg::Expr::IndexedIdentifier(indexed) = target.expression() else {
        panic!("expected an indexed identifier");
    };
    assert_eq!(indexed.ranges(), &[(2, 0)]);
    assert_eq!(indexed.indices().collect::<Vec<_>>(), vec![2, 1, 0]);
}

// `q[first:last]` with each bound at its own column.
fn range_operand(line: u32, first: i64, last: i64) -> cqasm_syntax::ast::Expression {
    make::index_entries(
        at(line, 5),
        "q",
        vec![IndexEntry::Range(
            make::int(at(line, 7), first),
            make::int(at(line, 10), last),
        )],
    )
}

#[test]
fn test_huge_range_is_reported_once() {
    let tree = v1(vec![
        qubits2(),
        make::mapping(at(3, 1), range_operand(3, 0, i64::MAX), "wide"),
        make::mapping(at(4, 1), range_operand(4, i64::MIN, i64::MAX), "widest"),
        make::mapping(at(5, 1), range_operand(5, 0, 1_000_000), "long"),
    ]);
    let (_program, errors, symbol_table) = analyze_tree(&tree);
    assert_eq!(
        kinds(&errors),
        vec![
            SemanticErrorKind::IndexOutOfRange {
                name: "q".into(),
                index: i64::MAX,
                size: 2,
            },
            SemanticErrorKind::IndexOutOfRange {
                name: "q".into(),
                index: i64::MIN,
                size: 2,
            },
            SemanticErrorKind::IndexOutOfRange {
                name: "q".into(),
                index: 1_000_000,
                size: 2,
            },
        ]
    );
    // Each diagnostic points at the offending bound.
    let locations: Vec<_> = errors.iter().map(|err| err.location()).collect();
    assert_eq!(locations, vec![at(3, 10), at(4, 7), at(5, 10)]);
    // The element count of the full range overflows.
    assert_eq!(symbol_table.lookup("widest").unwrap().symbol_type(), &Type::Undefined);
    assert_eq!(
        symbol_table.lookup("long").unwrap().symbol_type(),
        &Type::QubitRef(1_000_001)
    );
}

#[test]
fn test_one_diagnostic_per_index_entry() {
    let operand = make::index_entries(
        at(3, 3),
        "q",
        vec![
            IndexEntry::Item(make::int(at(3, 5), 5)),
            IndexEntry::Range(make::int(at(3, 8), 0), make::int(at(3, 10), 9)),
            IndexEntry::Item(make::int(at(3, 13), 1)),
        ],
    );
    let tree = v1(vec![qubits2(), make::mapping(at(3, 1), operand, "m")]);
    let (_program, errors, symbol_table) = analyze_tree(&tree);
    let reported: Vec<_> = errors
        .iter()
        .map(|err| (err.kind().clone(), err.location()))
        .collect();
    assert_eq!(
        reported,
        vec![
            (
                SemanticErrorKind::IndexOutOfRange {
                    name: "q".into(),
                    index: 5,
                    size: 2,
                },
                at(3, 5),
            ),
            (
                SemanticErrorKind::IndexOutOfRange {
                    name: "q".into(),
                    index: 9,
                    size: 2,
                },
                at(3, 10),
            ),
        ]
    );
    assert_eq!(symbol_table.lookup("m").unwrap().symbol_type(), &Type::QubitRef(12));
}

#[test]
fn test_ambiguity_from_undefined_argument_is_silent() {
    // `abs` has int and float overloads. Both match an undefined argument equally well.
    let tree = v1(vec![make::variable(
        at(2, 1),
        "r",
        TypeSpec::Float,
        Some(make::call(at(2, 11), "abs", vec![make::name(at(2, 15), "y")])),
    )]);
    let (program, errors, _symbol_table) = analyze_tree(&tree);
    assert_eq!(
        kinds(&errors),
        vec![SemanticErrorKind::UndeclaredIdentifier("y".into())]
    );
    assert_eq!(count_unresolved_calls(&program), 1);
}

#[test]
fn test_not_indexable() {
    let tree = v1(vec![
        make::variable(at(2, 1), "n", TypeSpec::Int, None),
        make::assignment(at(3, 1), make::name(at(3, 5), "n"), make::index(at(3, 9), "n", &[0])),
    ]);
    let (_program, errors, _symbol_table) = analyze_tree(&tree);
    assert_eq!(kinds(&errors), vec![SemanticErrorKind::NotIndexable("n".into())]);
}

#[test]
fn test_operators_and_functions() {
    let tree = v1(vec![
        make::variable(
            at(2, 1),
            "z",
            TypeSpec::Complex,
            Some(make::call(at(2, 13), "complex", vec![make::int(at(2, 21), 1), make::float(at(2, 24), 0.5)])),
        ),
        make::variable(
            at(3, 1),
            "r",
            TypeSpec::Float,
            Some(make::call(at(3, 11), "real", vec![make::name(at(3, 16), "z")])),
        ),
        make::variable(
            at(4, 1),
            "ok",
            TypeSpec::Bool,
            Some(make::binary(at(4, 11), BinaryOp::Ge, make::name(at(4, 11), "r"), make::int(at(4, 16), 0))),
        ),
        make::variable(
            at(5, 1),
            "bad",
            TypeSpec::Bool,
            Some(make::unary(at(5, 12), UnaryOp::Not, make::int(at(5, 13), 1))),
        ),
        make::variable(
            at(6, 1),
            "what",
            TypeSpec::Float,
            Some(make::call(at(6, 13), "gamma", vec![make::float(at(6, 19), 1.0)])),
        ),
    ]);
    let (program, errors, _symbol_table) = analyze_tree(&tree);
    assert_eq!(
        kinds(&errors),
        vec![
            SemanticErrorKind::NoMatchingOverload {
                name: "operator!".into(),
                arg_types: vec![Type::Integer],
            },
            SemanticErrorKind::UnknownFunction("gamma".into()),
        ]
    );
    let valid: Vec<bool> = program.iter().map(|stmt| stmt.is_valid()).collect();
    assert_eq!(valid, vec![true, true, true, false, false]);
}

#[test]
fn test_result_accessors() {
    let tree = v1(vec![
        qubits2(),
        make::variable(at(3, 1), "theta", TypeSpec::Float, Some(make::float(at(3, 15), 0.25))),
        make::instruction(at(4, 1), "measure", vec![make::index(at(4, 9), "q", &[1])]),
    ]);
    let result = analyze(&tree);
    let warnings: Vec<String> = result.errors().warnings().map(|w| w.message()).collect();
    assert_eq!(warnings, vec!["instruction `measure` is deprecated, use `measure_z`"]);
    let names: Vec<&str> = result
        .symbol_table()
        .unwrap()
        .symbols()
        .map(|symbol| symbol.name())
        .collect();
    assert_eq!(names, vec!["q", "b", "theta"]);
    let program = result.take_program();
    let overload = gate_call(&program[2]).overload().unwrap();
    assert_eq!(
        overload.signature(),
        Type::Function(vec![Type::QubitRef(1)], Box::new(Type::Void))
    );
}
