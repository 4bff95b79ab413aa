// Copyright contributors to the cqasm-semantics project
// SPDX-License-Identifier: Apache-2.0

use cqasm_semantics::dialect::{CQASM_1, CQASM_3};
use cqasm_semantics::types::{types_equal, Type};

//
// Types
//

#[test]
fn test_types_equal_is_structural() {
    assert!(types_equal(&Type::QubitRef(2), &Type::QubitRef(2)));
    assert!(!types_equal(&Type::QubitRef(2), &Type::QubitRef(1)));
    assert!(!types_equal(&Type::QubitRef(1), &Type::BitRef(1)));
    let f1 = Type::Function(vec![Type::Integer], Box::new(Type::Float));
    let f2 = Type::Function(vec![Type::Integer], Box::new(Type::Float));
    let f3 = Type::Function(vec![Type::Float], Box::new(Type::Float));
    assert!(types_equal(&f1, &f2));
    assert!(!types_equal(&f1, &f3));
    assert_eq!(f1.return_type(), Some(&Type::Float));
}

//
// Implicit conversion
//

#[test]
fn test_v1_promotion_chain() {
    let rules = CQASM_1.rules();
    assert_eq!(rules.conversion_rank(&Type::Integer, &Type::Integer), Some(0));
    assert_eq!(rules.conversion_rank(&Type::Integer, &Type::Float), Some(1));
    assert_eq!(rules.conversion_rank(&Type::Integer, &Type::Complex), Some(2));
    assert_eq!(rules.conversion_rank(&Type::Float, &Type::Complex), Some(1));
    assert_eq!(rules.conversion_rank(&Type::BitRef(1), &Type::Boolean), Some(1));
    assert_eq!(rules.conversion_rank(&Type::Float, &Type::Integer), None);
}

#[test]
fn test_v3_promotion_chain() {
    let rules = CQASM_3.rules();
    assert!(rules.can_implicitly_convert(&Type::Integer, &Type::Float));
    assert!(!rules.can_implicitly_convert(&Type::Float, &Type::Complex));
    assert!(!rules.can_implicitly_convert(&Type::BitRef(1), &Type::Boolean));
}

#[test]
fn test_no_conversion_between_kinds() {
    let rules = CQASM_1.rules();
    assert!(!rules.can_implicitly_convert(&Type::Boolean, &Type::Integer));
    assert!(!rules.can_implicitly_convert(&Type::Integer, &Type::Boolean));
    assert!(!rules.can_implicitly_convert(&Type::QubitRef(1), &Type::Integer));
    assert!(!rules.can_implicitly_convert(&Type::Integer, &Type::QubitRef(1)));
    // No broadcasting between register sizes.
    assert!(!rules.can_implicitly_convert(&Type::QubitRef(2), &Type::QubitRef(1)));
    assert!(!rules.can_implicitly_convert(&Type::BitRef(2), &Type::Boolean));
}

#[test]
fn test_display() {
    assert_eq!(Type::Integer.to_string(), "int");
    assert_eq!(Type::QubitRef(4).to_string(), "qubit[4]");
    assert_eq!(Type::BitRef(1).to_string(), "bit");
    let sig = Type::Function(vec![Type::Float, Type::Float], Box::new(Type::Complex));
    assert_eq!(sig.to_string(), "(float, float) -> complex");
}
