//! Frame-condition synthesis.
//!
//! For each transition operator, computes the set of state variables
//! its step leaves unchanged, to be emitted as an `UNCHANGED <<...>>`
//! conjunct. The analysis is an approximate static dataflow over the
//! operator call graph, built from two syntactic idioms the dialect
//! enforces for state change: direct conjunct invocation of another
//! operator (`/\ Op(...)`) and direct primed assignment (`x' = ...`).
//!
//! Recursion policy: an operator's direct reference to itself is
//! ignored; a longer cycle through other operators proves nothing, so
//! the in-progress operator contributes an empty set and the whole
//! chain collapses to an empty frame condition. Either way the
//! analysis terminates.

use crate::model::Module;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Facts extracted from one operation body.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BodyFacts {
    /// Identifiers applied directly under a `/\` conjunct.
    pub calls: BTreeSet<String>,
    /// Identifiers assigned with a primed assignment (`x' = ...`).
    pub primed: BTreeSet<String>,
}

/// Scan an operation body for direct conjunct calls and primed
/// assignments. Works on whole identifiers, so `queue'` never matches
/// a variable named `e` and `/\ SendAll(m)` never matches `Send`.
pub fn scan_body(body: &str) -> BodyFacts {
    let chars: Vec<char> = body.chars().collect();
    let mut facts = BodyFacts::default();
    let mut after_conjunct = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '/' && chars.get(i + 1) == Some(&'\\') {
            after_conjunct = true;
            i += 2;
            continue;
        }
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let ident: String = chars[start..i].iter().collect();
            if after_conjunct {
                facts.calls.insert(ident.clone());
            }
            after_conjunct = false;

            // Primed assignment: ident' = ..., but not ident' == ...
            if chars.get(i) == Some(&'\'') {
                let mut j = i + 1;
                while chars.get(j).is_some_and(|c| c.is_whitespace()) {
                    j += 1;
                }
                if chars.get(j) == Some(&'=') && chars.get(j + 1) != Some(&'=') {
                    facts.primed.insert(ident);
                }
            }
            continue;
        }

        after_conjunct = false;
        i += 1;
    }

    facts
}

/// Frame-condition analysis over one resolved module.
pub struct FrameAnalysis<'m> {
    module: &'m Module,
    facts: HashMap<&'m str, BodyFacts>,
    memo: HashMap<&'m str, BTreeSet<&'m str>>,
    in_progress: HashSet<&'m str>,
}

impl<'m> FrameAnalysis<'m> {
    pub fn new(module: &'m Module) -> Self {
        let facts = module
            .operations
            .iter()
            .map(|op| (op.name.as_str(), scan_body(&op.body)))
            .collect();
        Self {
            module,
            facts,
            memo: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    /// Variables the named operation is guaranteed not to modify, in
    /// variable-declaration order. Merging concatenates base and
    /// extender variable lists, so a name declared in both appears
    /// twice in the module; it contributes one entry here.
    pub fn unchanged(&mut self, name: &str) -> Vec<String> {
        let module = self.module;
        let Some(op) = module.operations.iter().find(|op| op.name == name) else {
            return Vec::new();
        };
        let set = self.unchanged_set(op.name.as_str());
        let mut seen = HashSet::new();
        module
            .variables
            .iter()
            .filter(|v| set.contains(v.name.as_str()) && seen.insert(v.name.as_str()))
            .map(|v| v.name.clone())
            .collect()
    }

    fn unchanged_set(&mut self, name: &'m str) -> BTreeSet<&'m str> {
        if let Some(known) = self.memo.get(name) {
            return known.clone();
        }
        if self.in_progress.contains(name) {
            // Cycle through another operation: nothing proven unchanged.
            return BTreeSet::new();
        }
        self.in_progress.insert(name);

        let mut rest: BTreeSet<&'m str> = self
            .module
            .variables
            .iter()
            .map(|v| v.name.as_str())
            .collect();

        let callees: Vec<&'m str> = self
            .module
            .operations
            .iter()
            .map(|op| op.name.as_str())
            .filter(|callee| {
                *callee != name
                    && self
                        .facts
                        .get(name)
                        .is_some_and(|f| f.calls.contains(*callee))
            })
            .collect();
        for callee in callees {
            let sub = self.unchanged_set(callee);
            rest.retain(|var| sub.contains(var));
        }

        if let Some(facts) = self.facts.get(name) {
            for primed in &facts.primed {
                rest.remove(primed.as_str());
            }
        }

        self.in_progress.remove(name);
        self.memo.insert(name, rest.clone());
        rest
    }
}
