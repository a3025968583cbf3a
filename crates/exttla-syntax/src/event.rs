//! Parse events emitted by the ExtTLA parser.
//!
//! The parser does not build modules itself; it produces a flat event
//! stream that the module builder in `exttla-core` consumes. Expression
//! fragments are opaque TLA+ text, already normalized (delimiters
//! stripped, comments converted to TLA+ form).

/// A typed operation argument: name and the TLA+ set expression it
/// ranges over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArgSpec {
    pub name: String,
    pub ty: String,
}

/// One structured event from parsing an ExtTLA source file.
///
/// Leading comments are carried in TLA+ comment form, always starting
/// with a newline; a declaration with no comment carries `"\n"` so the
/// emitter separates sections uniformly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseEvent {
    /// `module Name ... {`
    ModuleStart { name: String, comment: String },
    /// `extends A, B` clause of the current module.
    Extends { bases: Vec<String> },
    /// One name from an `import` declaration.
    Import { name: String, comment: String },
    /// `instance Name` with an optional `with` parameter mapping.
    Instance {
        name: String,
        mapping: Option<String>,
        comment: String,
    },
    /// One constant declaration; `value` is `None` for an opaque
    /// declared constant.
    Constant {
        name: String,
        value: Option<String>,
        is_override: bool,
        comment: String,
    },
    /// `enum Name { a, b, c }`
    Enumeration {
        name: String,
        members: Vec<String>,
        comment: String,
    },
    /// `assume <expr>`
    Assumption { expr: String, comment: String },
    /// `var name: <type> = <init>`; `ty` is the sentinel `"any"` when
    /// the variable carries no type invariant.
    Variable {
        name: String,
        ty: String,
        init: String,
        comment: String,
    },
    /// `operation Name(args) <body>`
    Operation {
        name: String,
        args: Vec<ArgSpec>,
        body: String,
        is_override: bool,
        comment: String,
    },
    /// `shadow Name`
    Shadow { name: String },
    /// `invariant Name <expr>`
    Invariant {
        name: String,
        expr: String,
        comment: String,
    },
    /// End of the current module body.
    ModuleEnd,
}
