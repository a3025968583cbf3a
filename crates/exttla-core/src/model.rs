//! In-memory representation of ExtTLA modules.
//!
//! Entities are built once by the module builder and immutable
//! afterwards. Lists hold `Arc`ed entities so the extension resolver
//! can share unoverridden base-module entities by reference instead of
//! deep-copying them into every merged module.

use std::sync::Arc;

/// An opaque declared constant (`CONSTANT n`) or a defined constant
/// (`n == value`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constant {
    pub name: String,
    /// `None` for an opaque declared constant.
    pub value: Option<String>,
    /// Set only when this redefines a same-named inherited constant.
    pub is_override: bool,
    pub comment: String,
}

/// An enumeration; member order is declaration order and fixes the
/// textual substitution, nothing more.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enumeration {
    pub name: String,
    pub members: Vec<String>,
    pub comment: String,
}

impl Enumeration {
    /// The unique string literal a member reference expands to.
    pub fn member_literal(&self, member: &str) -> String {
        format!("\"{}_{}\"", self.name, member)
    }
}

/// A boolean assumption, attached verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assumption {
    pub expr: String,
    pub comment: String,
}

/// A state variable with its type-set expression and initial value.
/// The type `"any"` is a sentinel: no type invariant is emitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub ty: String,
    pub init: String,
    pub comment: String,
}

impl Variable {
    /// Whether this variable contributes a `TypeInv` conjunct.
    pub fn has_type_invariant(&self) -> bool {
        self.ty != "any"
    }
}

/// A typed operation argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationArg {
    pub name: String,
    pub ty: String,
}

/// A transition operator. The body is an opaque TLA+ fragment; the
/// frame-condition synthesizer scans it for direct conjunct calls and
/// primed assignments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operation {
    pub name: String,
    pub args: Vec<OperationArg>,
    pub body: String,
    pub is_override: bool,
    pub comment: String,
}

impl Operation {
    /// Operations whose name starts uppercase are public: candidates
    /// for the `Next` disjunction and for an emitted `UNCHANGED`.
    /// Lowercase names are private helpers.
    pub fn is_public(&self) -> bool {
        self.name.chars().next().is_some_and(|c| c.is_uppercase())
    }
}

/// A reference to an imported standard module (becomes `EXTENDS`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Import {
    pub name: String,
    pub comment: String,
}

/// An instantiated module, optionally with a parameter mapping
/// (becomes `N == INSTANCE N [WITH mapping]`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instantiation {
    pub name: String,
    pub mapping: Option<String>,
    pub comment: String,
}

/// A named invariant, emitted as `<Name>Inv == <expr>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invariant {
    pub name: String,
    pub expr: String,
    pub comment: String,
}

/// One ExtTLA module: either as declared in source, or the merged
/// result of extension resolution.
#[derive(Clone, Debug, Default)]
pub struct Module {
    pub name: String,
    pub comment: String,
    /// Names of directly extended modules, in declaration order.
    pub extends: Vec<String>,
    pub imports: Vec<Arc<Import>>,
    pub instances: Vec<Arc<Instantiation>>,
    pub constants: Vec<Arc<Constant>>,
    pub enumerations: Vec<Arc<Enumeration>>,
    pub assumptions: Vec<Arc<Assumption>>,
    pub variables: Vec<Arc<Variable>>,
    pub operations: Vec<Arc<Operation>>,
    /// Operation names excluded from the `Next` disjunction.
    pub shadowed: Vec<String>,
    pub invariants: Vec<Arc<Invariant>>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: "\n".to_string(),
            ..Default::default()
        }
    }

    /// Whether an operation name is shadowed in this module.
    pub fn is_shadowed(&self, name: &str) -> bool {
        self.shadowed.iter().any(|s| s == name)
    }

    /// Variable names in declaration order.
    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.iter().map(|v| v.name.as_str()).collect()
    }
}
