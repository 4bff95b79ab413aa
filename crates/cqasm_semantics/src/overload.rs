// Copyright contributors to the cqasm-semantics project
// SPDX-License-Identifier: Apache-2.0

// Overloads, overload sets, and resolution of a call to a single overload.
//
// Instructions, functions and operators are all resolved the same way: by name and by the
// ordered list of argument types. Operators are functions named `operator+` and so on.

use crate::types::{display_list, Type, TypeRules};
use boolenum::BoolEnum;
use indexmap::IndexMap;
use smol_str::SmolStr;
use std::fmt;

/// One signature of an instruction, function or operator.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Overload {
    name: SmolStr,
    param_types: Vec<Type>,
    return_type: Type,
    // Names the implementation downstream consumers dispatch on, e.g. `op_add_ii`.
    tag: SmolStr,
    // Set for deprecated overloads. Names the overload to use instead.
    replacement: Option<SmolStr>,
}

impl Overload {
    pub fn new<T: Into<SmolStr>, U: Into<SmolStr>>(
        name: T,
        param_types: Vec<Type>,
        return_type: Type,
        tag: U,
    ) -> Overload {
        Overload {
            name: name.into(),
            param_types,
            return_type,
            tag: tag.into(),
            replacement: None,
        }
    }

    /// Mark the overload as deprecated in favor of `replacement`.
    pub fn deprecated_by<T: Into<SmolStr>>(mut self, replacement: T) -> Overload {
        self.replacement = Some(replacement.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_types(&self) -> &[Type] {
        &self.param_types
    }

    pub fn return_type(&self) -> &Type {
        &self.return_type
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn replacement(&self) -> Option<&str> {
        self.replacement.as_deref()
    }

    pub fn arity(&self) -> usize {
        self.param_types.len()
    }

    /// The signature as a `Type::Function`.
    pub fn signature(&self) -> Type {
        Type::Function(self.param_types.clone(), Box::new(self.return_type.clone()))
    }
}

impl fmt::Display for Overload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, display_list(&self.param_types))
    }
}

/// All overloads sharing one name, in registration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverloadSet {
    name: SmolStr,
    overloads: Vec<Overload>,
}

impl OverloadSet {
    pub fn new<T: Into<SmolStr>>(name: T) -> OverloadSet {
        OverloadSet {
            name: name.into(),
            overloads: Vec::new(),
        }
    }

    pub fn add(&mut self, overload: Overload) {
        self.overloads.push(overload);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn overloads(&self) -> &[Overload] {
        &self.overloads
    }

    pub fn len(&self) -> usize {
        self.overloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overloads.is_empty()
    }
}

#[derive(BoolEnum, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CaseSensitive {
    True,
    False,
}

/// Overload sets by name. Lookups fold case unless the table is case sensitive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverloadTable {
    sets: IndexMap<SmolStr, OverloadSet>,
    case_sensitive: CaseSensitive,
}

impl OverloadTable {
    pub fn new(case_sensitive: CaseSensitive) -> OverloadTable {
        OverloadTable {
            sets: IndexMap::new(),
            case_sensitive,
        }
    }

    fn key(&self, name: &str) -> SmolStr {
        match self.case_sensitive {
            CaseSensitive::True => SmolStr::new(name),
            CaseSensitive::False => SmolStr::new(name.to_lowercase()),
        }
    }

    /// Add `overload` to the set named by `overload.name()`, creating the set if needed.
    pub fn add(&mut self, overload: Overload) {
        let key = self.key(overload.name());
        self.sets
            .entry(key)
            .or_insert_with(|| OverloadSet::new(overload.name()))
            .add(overload);
    }

    pub fn get(&self, name: &str) -> Option<&OverloadSet> {
        self.sets.get(&self.key(name))
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OverloadSet> {
        self.sets.values()
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ResolutionError {
    #[error("no overload set named `{0}`")]
    Unknown(SmolStr),
    #[error("no overload of `{name}` accepts ({})", display_list(.arg_types))]
    NoMatch { name: SmolStr, arg_types: Vec<Type> },
    #[error("call to `{name}` is ambiguous between {}", display_candidates(.candidates))]
    Ambiguous {
        name: SmolStr,
        candidates: Vec<Overload>,
    },
}

pub(crate) fn display_candidates(candidates: &[Overload]) -> String {
    candidates
        .iter()
        .map(|overload| format!("`{overload}`"))
        .collect::<Vec<_>>()
        .join(" and ")
}

// Cost of calling `overload` with `arg_types`: one conversion rank per parameter,
// or `None` if some argument cannot be converted.
// An `Undefined` argument stems from an error already reported and matches anything.
fn call_cost(overload: &Overload, arg_types: &[Type], rules: &TypeRules) -> Option<Vec<u32>> {
    overload
        .param_types()
        .iter()
        .zip(arg_types)
        .map(|(param, arg)| {
            if arg.is_defined() {
                rules.conversion_rank(arg, param)
            } else {
                Some(0)
            }
        })
        .collect()
}

// `cost1` dominates `cost2` if it is no worse in any position and better in at least one.
fn dominates(cost1: &[u32], cost2: &[u32]) -> bool {
    cost1.iter().zip(cost2).all(|(c1, c2)| c1 <= c2) && cost1 != cost2
}

/// Select the overload in `set` that best matches `arg_types`.
///
/// Candidates of the wrong arity, or with an argument that cannot be converted to the
/// parameter type, are discarded. Each remaining candidate has a cost: the sequence of
/// per-parameter conversion ranks. A candidate wins if its cost dominates that of every
/// other candidate. Candidates with identical costs, or whose costs are better in
/// different positions, are ambiguous; they are reported ordered by cost, compared
/// lexicographically from the first parameter, then by registration order. Registration
/// order never decides the winner.
pub fn resolve<'a>(
    set: Option<&'a OverloadSet>,
    name: &str,
    arg_types: &[Type],
    rules: &TypeRules,
) -> Result<&'a Overload, ResolutionError> {
    let Some(set) = set else {
        return Err(ResolutionError::Unknown(name.into()));
    };
    let applicable: Vec<(&Overload, Vec<u32>)> = set
        .overloads()
        .iter()
        .filter(|overload| overload.arity() == arg_types.len())
        .filter_map(|overload| call_cost(overload, arg_types, rules).map(|cost| (overload, cost)))
        .collect();
    let mut best: Vec<&(&Overload, Vec<u32>)> = applicable
        .iter()
        .filter(|(_, cost)| !applicable.iter().any(|(_, other)| dominates(other, cost)))
        .collect();
    match best.as_slice() {
        [] => Err(ResolutionError::NoMatch {
            name: name.into(),
            arg_types: arg_types.to_vec(),
        }),
        [(overload, _)] => Ok(overload),
        _ => {
            // Stable sort keeps registration order among identical costs.
            best.sort_by(|(_, cost1), (_, cost2)| cost1.cmp(cost2));
            Err(ResolutionError::Ambiguous {
                name: name.into(),
                candidates: best.iter().map(|(overload, _)| (*overload).clone()).collect(),
            })
        }
    }
}
