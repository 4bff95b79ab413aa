// Copyright contributors to the cqasm-semantics project
// SPDX-License-Identifier: Apache-2.0

// Defines the data structures representing the types used to annotate expressions in
// the typed ASG.
// This file should include all code that manipulates the types. In particular implicit
// conversion (promotion) is implemented here. Which promotions exist depends on the
// language version, so the promotion lattice is a value, `TypeRules`, owned by the dialect.

use boolenum::BoolEnum;
use std::fmt;

#[derive(BoolEnum, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IsConst {
    True,
    False,
}

/// Number of elements referred to by a qubit or bit reference.
type Size = usize;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Boolean,
    Integer,
    Float,
    Complex,
    // References to `size` elements of a qubit or bit register.
    // The size is part of the type. `q[0]` and `q[1:2]` have different types.
    QubitRef(Size),
    BitRef(Size),
    // Rotation axis, a three-vector.
    Axis,
    // Parameter types and return type.
    Function(Vec<Type>, Box<Type>),
    // Return type of instructions.
    Void,
    // Undefined means a type that is erroneously non-existent. This is not the same as unknown.
    // The prototypical application is trying to resolve an unbound identifier.
    Undefined,
}

impl Type {
    /// Return true if the type is a classical value type.
    pub fn is_scalar(&self) -> bool {
        use Type::*;
        matches!(self, Boolean | Integer | Float | Complex | Axis)
    }

    /// Return `true` if the type is a reference to qubits.
    pub fn is_quantum(&self) -> bool {
        matches!(self, Type::QubitRef(..))
    }

    /// Return `true` if the type refers to elements of a register.
    pub fn is_reference(&self) -> bool {
        matches!(self, Type::QubitRef(..) | Type::BitRef(..))
    }

    /// Return `Some(size)` for qubit and bit references, otherwise `None`.
    pub fn register_size(&self) -> Option<Size> {
        match self {
            Type::QubitRef(size) | Type::BitRef(size) => Some(*size),
            _ => None,
        }
    }

    /// Return the reference type of the same kind as `self` but referring to `size` elements.
    /// Return `None` if `self` is not a reference type.
    pub fn with_register_size(&self, size: Size) -> Option<Type> {
        match self {
            Type::QubitRef(_) => Some(Type::QubitRef(size)),
            Type::BitRef(_) => Some(Type::BitRef(size)),
            _ => None,
        }
    }

    /// Return `false` for the placeholder type produced by an earlier error.
    pub fn is_defined(&self) -> bool {
        !matches!(self, Type::Undefined)
    }

    /// Return the return type if `self` is a function type.
    pub fn return_type(&self) -> Option<&Type> {
        match self {
            Type::Function(_, returns) => Some(returns),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Boolean => write!(f, "bool"),
            Type::Integer => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Complex => write!(f, "complex"),
            Type::QubitRef(1) => write!(f, "qubit"),
            Type::QubitRef(size) => write!(f, "qubit[{size}]"),
            Type::BitRef(1) => write!(f, "bit"),
            Type::BitRef(size) => write!(f, "bit[{size}]"),
            Type::Axis => write!(f, "axis"),
            Type::Function(params, returns) => {
                write!(f, "({}) -> {returns}", display_list(params))
            }
            Type::Void => write!(f, "void"),
            Type::Undefined => write!(f, "undefined"),
        }
    }
}

/// Comma-separated list of types, as used in diagnostics.
pub fn display_list(types: &[Type]) -> String {
    types
        .iter()
        .map(|ty| ty.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Structural equality, no coercion.
pub fn types_equal(ty1: &Type, ty2: &Type) -> bool {
    ty1 == ty2
}

/// Parse a shorthand parameter specification into a list of types.
/// Each character is one parameter:
/// `Q` qubit, `B` bit, `b` bool, `i` int, `f` float, `c` complex, `a` axis.
/// References declared this way refer to exactly one element.
///
/// Panics on any other character. Specifications are only written in the
/// built-in instruction and function tables.
pub(crate) fn from_spec(spec: &str) -> Vec<Type> {
    spec.chars()
        .map(|c| match c {
            'Q' => Type::QubitRef(1),
            'B' => Type::BitRef(1),
            'b' => Type::Boolean,
            'i' => Type::Integer,
            'f' => Type::Float,
            'c' => Type::Complex,
            'a' => Type::Axis,
            _ => panic!("invalid character '{c}' in type specification \"{spec}\""),
        })
        .collect()
}

//
// Promotion
//

/// The implicit conversions of one language version.
///
/// `promotions` holds the edges of the promotion lattice. Each edge is one step. A type
/// has at most one outgoing edge, so the lattice is a set of chains and the rank of a
/// conversion is the number of steps along its chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeRules {
    promotions: Vec<(Type, Type)>,
}

impl TypeRules {
    pub fn new(promotions: Vec<(Type, Type)>) -> TypeRules {
        debug_assert!(
            promotions
                .iter()
                .enumerate()
                .all(|(n, (from, _))| promotions[n + 1..].iter().all(|(other, _)| other != from)),
            "a type may be promoted along only one edge"
        );
        TypeRules { promotions }
    }

    fn promote_once(&self, ty: &Type) -> Option<&Type> {
        self.promotions
            .iter()
            .find(|(from, _)| from == ty)
            .map(|(_, to)| to)
    }

    /// Return the cost of implicitly converting `from_type` to `to_type`: `Some(0)` for
    /// identical types, one more for each promotion step, and `None` if there is no
    /// implicit conversion.
    pub fn conversion_rank(&self, from_type: &Type, to_type: &Type) -> Option<u32> {
        if types_equal(from_type, to_type) {
            return Some(0);
        }
        let mut current = from_type;
        // Bounded by the number of edges, even if a table were cyclic.
        for rank in 1..=self.promotions.len() {
            current = self.promote_once(current)?;
            if current == to_type {
                return Some(rank as u32);
            }
        }
        None
    }

    pub fn can_implicitly_convert(&self, from_type: &Type, to_type: &Type) -> bool {
        self.conversion_rank(from_type, to_type).is_some()
    }
}

#[test]
fn test_type_display() {
    assert_eq!(Type::QubitRef(1).to_string(), "qubit");
    assert_eq!(Type::BitRef(3).to_string(), "bit[3]");
    let sig = Type::Function(from_spec("Qf"), Box::new(Type::Void));
    assert_eq!(sig.to_string(), "(qubit, float) -> void");
}

#[test]
fn test_from_spec() {
    assert_eq!(
        from_spec("QBbifca"),
        vec![
            Type::QubitRef(1),
            Type::BitRef(1),
            Type::Boolean,
            Type::Integer,
            Type::Float,
            Type::Complex,
            Type::Axis,
        ]
    );
    assert!(from_spec("").is_empty());
}

#[test]
#[should_panic]
fn test_from_spec_bad_letter() {
    from_spec("Qz");
}

#[test]
fn test_type_enum_queries() {
    let t = Type::QubitRef(2);
    assert!(t.is_quantum());
    assert!(t.is_reference());
    assert!(!t.is_scalar());
    assert_eq!(t.register_size(), Some(2));
    assert_eq!(t.with_register_size(1), Some(Type::QubitRef(1)));
    assert_eq!(Type::Float.with_register_size(1), None);
    assert!(!Type::Undefined.is_defined());
}

#[test]
fn test_chain_rank() {
    let rules = TypeRules::new(vec![
        (Type::Integer, Type::Float),
        (Type::Float, Type::Complex),
    ]);
    assert_eq!(rules.conversion_rank(&Type::Integer, &Type::Integer), Some(0));
    assert_eq!(rules.conversion_rank(&Type::Integer, &Type::Float), Some(1));
    assert_eq!(rules.conversion_rank(&Type::Integer, &Type::Complex), Some(2));
    assert_eq!(rules.conversion_rank(&Type::Complex, &Type::Integer), None);
    assert_eq!(rules.conversion_rank(&Type::Boolean, &Type::Integer), None);
}
