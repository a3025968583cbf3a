//! Semantic analysis and code generation for the ExtTLA converter.
//!
//! This crate provides:
//! - The in-memory module data model
//! - A module builder consuming parse events from `exttla-syntax`
//! - A registry resolving the `extends` graph with override rules
//! - Frame-condition synthesis (`UNCHANGED` lists) over operator bodies
//! - A deterministic TLA+ emitter with enumeration expansion

mod builder;
mod emit;
mod error;
mod frame;
mod model;
mod registry;

pub use builder::ModuleBuilder;
pub use emit::{emit, emit_at};
pub use error::{Error, OverrideKind};
pub use frame::{scan_body, BodyFacts, FrameAnalysis};
pub use model::{
    Assumption, Constant, Enumeration, Import, Instantiation, Invariant, Module, Operation,
    OperationArg, Variable,
};
pub use registry::Registry;
