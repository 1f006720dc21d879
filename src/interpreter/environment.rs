use std::collections::HashMap;

use log::trace;

use super::error::RuntimeError;
use crate::parser::{Locatable, Name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScopeId(usize);

#[derive(Debug, Default)]
struct Scope {
    values: HashMap<String, f64>,
    enclosing: Option<ScopeId>,
}

/// Arena of lexical scopes. Scopes are created and discarded in stack order,
/// so an enclosing link always refers to a scope that outlives the one holding
/// it. Index 0 is the global scope and is never discarded.
#[derive(Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            scopes: vec![Scope::default()],
            current: ScopeId(0),
        }
    }
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live scopes, the global one included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub(crate) fn current(&self) -> ScopeId {
        self.current
    }

    /// Opens a scope enclosed by the current one and makes it current.
    pub(crate) fn push(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            values: HashMap::new(),
            enclosing: Some(self.current),
        });
        self.current = id;
        trace!("entered scope {} (depth {})", id.0, self.depth());
        id
    }

    /// Makes `scope` current again, discarding every scope opened after it.
    pub(crate) fn restore(&mut self, scope: ScopeId) {
        self.scopes.truncate(scope.0 + 1);
        self.current = scope;
        trace!("restored scope {} (depth {})", scope.0, self.depth());
    }

    /// Binds `name` in the current scope, overwriting a binding of the same
    /// name in that scope.
    pub fn define(&mut self, name: &str, value: f64) {
        self.scope_mut(self.current).values.insert(name.to_string(), value);
    }

    /// Overwrites the innermost binding of `name`.
    pub fn assign(&mut self, name: &Name, value: f64) -> Result<(), RuntimeError> {
        let id = self.resolve(&name.name).ok_or_else(|| undefined(name))?;
        self.scope_mut(id).values.insert(name.name.clone(), value);
        Ok(())
    }

    /// Looks up the innermost binding of `name`.
    pub fn get(&self, name: &Name) -> Result<f64, RuntimeError> {
        self.lookup(&name.name).ok_or_else(|| undefined(name))
    }

    pub fn lookup(&self, name: &str) -> Option<f64> {
        self.resolve(name)
            .and_then(|id| self.scopes[id.0].values.get(name).copied())
    }

    fn resolve(&self, name: &str) -> Option<ScopeId> {
        let mut scope = Some(self.current);
        while let Some(id) = scope {
            let s = &self.scopes[id.0];
            if s.values.contains_key(name) {
                return Some(id);
            }
            scope = s.enclosing;
        }
        None
    }

    fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0]
    }
}

fn undefined(name: &Name) -> RuntimeError {
    RuntimeError::UndefinedVariable {
        name: name.name.clone(),
        line: name.line(),
    }
}
