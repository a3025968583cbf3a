//! Module registry and extension resolution.
//!
//! The registry owns the mapping from module name to module and
//! resolves the `extends` graph: for each module it linearizes the
//! transitive ancestors depth-first (each shared ancestor contributing
//! once), then folds them together with the module itself, the module
//! merging last so its overrides win. Resolution is memoized per
//! module name; a module re-entered while still on the resolution
//! stack is a fatal extension cycle.

use crate::error::{Error, OverrideKind};
use crate::model::{Constant, Module, Operation};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// All registered modules, keyed by name in registration order.
#[derive(Debug, Default)]
pub struct Registry {
    modules: IndexMap<String, Arc<Module>>,
    resolved: HashMap<String, Arc<Module>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly built module. Module names are unique across
    /// the whole registry, including across input files.
    pub fn insert(&mut self, module: Module) -> Result<(), Error> {
        if self.modules.contains_key(&module.name) {
            return Err(Error::DuplicateModule { name: module.name });
        }
        self.modules
            .insert(module.name.clone(), Arc::new(module));
        Ok(())
    }

    /// Look up a module as declared (unresolved).
    pub fn get(&self, name: &str) -> Option<&Arc<Module>> {
        self.modules.get(name)
    }

    /// Registered module names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.modules.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Resolve a module: merge it with all transitively extended base
    /// modules per the override rules. Memoized per module name.
    pub fn resolve(&mut self, name: &str) -> Result<Arc<Module>, Error> {
        if let Some(resolved) = self.resolved.get(name) {
            return Ok(resolved.clone());
        }

        let module = self
            .modules
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownModule {
                name: name.to_string(),
            })?;

        let mut stack = vec![module.name.clone()];
        let mut ancestors = Vec::new();
        self.collect_ancestors(&module, &mut stack, &mut ancestors)?;
        debug!(
            module = %name,
            ancestors = ancestors.len(),
            "resolved extension graph"
        );

        let merged = if ancestors.is_empty() {
            module
        } else {
            Arc::new(merge(&module, &ancestors)?)
        };
        self.resolved.insert(name.to_string(), merged.clone());
        Ok(merged)
    }

    /// Depth-first postorder over the extends graph: a base module's
    /// own ancestors come before it, and each ancestor appears once
    /// even when reached through several paths.
    fn collect_ancestors(
        &self,
        module: &Module,
        stack: &mut Vec<String>,
        acc: &mut Vec<Arc<Module>>,
    ) -> Result<(), Error> {
        for base in &module.extends {
            if stack.iter().any(|on_stack| on_stack == base) {
                let mut chain = stack.clone();
                chain.push(base.clone());
                return Err(Error::ExtensionCycle { chain });
            }
            let base_module =
                self.modules
                    .get(base)
                    .cloned()
                    .ok_or_else(|| Error::NoSuchModule {
                        name: base.clone(),
                        referenced_by: module.name.clone(),
                    })?;
            stack.push(base.clone());
            self.collect_ancestors(&base_module, stack, acc)?;
            stack.pop();
            if !acc.iter().any(|seen| seen.name == *base) {
                acc.push(base_module);
            }
        }
        Ok(())
    }
}

/// Fold the ancestor list and the module itself into one merged
/// module. Base entities not overridden are shared by reference.
fn merge(module: &Module, ancestors: &[Arc<Module>]) -> Result<Module, Error> {
    let mut merged = Module::new(module.name.clone());
    merged.comment = module.comment.clone();

    // Name -> first position, for in-place override replacement.
    let mut constant_at: HashMap<String, usize> = HashMap::new();
    let mut operation_at: HashMap<String, usize> = HashMap::new();

    let sources = ancestors
        .iter()
        .map(Arc::as_ref)
        .chain(std::iter::once(module));

    for source in sources {
        merged.imports.extend(source.imports.iter().cloned());
        merged.instances.extend(source.instances.iter().cloned());
        for constant in &source.constants {
            merge_constant(&mut merged, &mut constant_at, constant, &source.name)?;
        }
        merged
            .enumerations
            .extend(source.enumerations.iter().cloned());
        merged
            .assumptions
            .extend(source.assumptions.iter().cloned());
        merged.variables.extend(source.variables.iter().cloned());
        for operation in &source.operations {
            merge_operation(&mut merged, &mut operation_at, operation, &source.name)?;
        }
        merged.shadowed.extend(source.shadowed.iter().cloned());
        merged.invariants.extend(source.invariants.iter().cloned());
    }

    Ok(merged)
}

fn merge_constant(
    merged: &mut Module,
    constant_at: &mut HashMap<String, usize>,
    constant: &Arc<Constant>,
    source: &str,
) -> Result<(), Error> {
    if constant.is_override {
        match constant_at.get(&constant.name) {
            Some(&at) => merged.constants[at] = constant.clone(),
            None => {
                return Err(Error::InvalidOverride {
                    kind: OverrideKind::Constant,
                    name: constant.name.clone(),
                    module: source.to_string(),
                });
            }
        }
    } else {
        constant_at
            .entry(constant.name.clone())
            .or_insert(merged.constants.len());
        merged.constants.push(constant.clone());
    }
    Ok(())
}

fn merge_operation(
    merged: &mut Module,
    operation_at: &mut HashMap<String, usize>,
    operation: &Arc<Operation>,
    source: &str,
) -> Result<(), Error> {
    if operation.is_override {
        match operation_at.get(&operation.name) {
            Some(&at) => merged.operations[at] = operation.clone(),
            None => {
                return Err(Error::InvalidOverride {
                    kind: OverrideKind::Operation,
                    name: operation.name.clone(),
                    module: source.to_string(),
                });
            }
        }
    } else {
        operation_at
            .entry(operation.name.clone())
            .or_insert(merged.operations.len());
        merged.operations.push(operation.clone());
    }
    Ok(())
}
