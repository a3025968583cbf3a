//! Module builder: folds a parse-event stream into registered modules.
//!
//! The builder threads an explicit current-module context through the
//! event handler; an event arriving outside a module, or a module left
//! open at the end of input, is a fatal error. Entities are created
//! here exactly once and never mutated afterwards.

use crate::error::Error;
use crate::model::{
    Assumption, Constant, Enumeration, Import, Instantiation, Invariant, Module, Operation,
    OperationArg, Variable,
};
use crate::registry::Registry;
use exttla_syntax::ParseEvent;
use std::sync::Arc;
use tracing::debug;

/// Builds a [`Registry`] from parse events, one module at a time.
#[derive(Default)]
pub struct ModuleBuilder {
    registry: Registry,
    current: Option<Module>,
}

impl ModuleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle one parse event.
    pub fn handle(&mut self, event: ParseEvent) -> Result<(), Error> {
        match event {
            ParseEvent::ModuleStart { name, comment } => {
                if let Some(open) = &self.current {
                    return Err(Error::UnterminatedModule {
                        name: open.name.clone(),
                    });
                }
                debug!(module = %name, "building module");
                let mut module = Module::new(name);
                module.comment = comment;
                self.current = Some(module);
                Ok(())
            }
            ParseEvent::ModuleEnd => {
                let module = self.current.take().ok_or(Error::EventOutsideModule)?;
                self.registry.insert(module)
            }
            event => {
                let module = self.current.as_mut().ok_or(Error::EventOutsideModule)?;
                Self::attach(module, event);
                Ok(())
            }
        }
    }

    /// Handle a whole event stream.
    pub fn handle_all(
        &mut self,
        events: impl IntoIterator<Item = ParseEvent>,
    ) -> Result<(), Error> {
        for event in events {
            self.handle(event)?;
        }
        Ok(())
    }

    /// Finish building, returning the populated registry.
    pub fn finish(self) -> Result<Registry, Error> {
        if let Some(open) = &self.current {
            return Err(Error::UnterminatedModule {
                name: open.name.clone(),
            });
        }
        Ok(self.registry)
    }

    fn attach(module: &mut Module, event: ParseEvent) {
        match event {
            ParseEvent::Extends { bases } => module.extends.extend(bases),
            ParseEvent::Import { name, comment } => {
                module.imports.push(Arc::new(Import { name, comment }));
            }
            ParseEvent::Instance {
                name,
                mapping,
                comment,
            } => {
                module.instances.push(Arc::new(Instantiation {
                    name,
                    mapping,
                    comment,
                }));
            }
            ParseEvent::Constant {
                name,
                value,
                is_override,
                comment,
            } => {
                module.constants.push(Arc::new(Constant {
                    name,
                    value,
                    is_override,
                    comment,
                }));
            }
            ParseEvent::Enumeration {
                name,
                members,
                comment,
            } => {
                module.enumerations.push(Arc::new(Enumeration {
                    name,
                    members,
                    comment,
                }));
            }
            ParseEvent::Assumption { expr, comment } => {
                module.assumptions.push(Arc::new(Assumption { expr, comment }));
            }
            ParseEvent::Variable {
                name,
                ty,
                init,
                comment,
            } => {
                module.variables.push(Arc::new(Variable {
                    name,
                    ty,
                    init,
                    comment,
                }));
            }
            ParseEvent::Operation {
                name,
                args,
                body,
                is_override,
                comment,
            } => {
                let args = args
                    .into_iter()
                    .map(|a| OperationArg {
                        name: a.name,
                        ty: a.ty,
                    })
                    .collect();
                module.operations.push(Arc::new(Operation {
                    name,
                    args,
                    body,
                    is_override,
                    comment,
                }));
            }
            ParseEvent::Shadow { name } => module.shadowed.push(name),
            ParseEvent::Invariant {
                name,
                expr,
                comment,
            } => {
                module.invariants.push(Arc::new(Invariant {
                    name,
                    expr,
                    comment,
                }));
            }
            ParseEvent::ModuleStart { .. } | ParseEvent::ModuleEnd => unreachable!(),
        }
    }
}
