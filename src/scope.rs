use crate::expr::{ErrorKind, RuntimeError, Val};
use crate::token::Token;
use rustc_hash::FxHashMap;
use std::rc::Rc;
use tracing::trace;

pub type ScopeId = usize;

#[derive(Debug, PartialEq, Default)]
pub struct Scope {
    stack: FxHashMap<Rc<str>, Val>,
    parent: Option<ScopeId>,
}

/// All live scopes, innermost last. Each scope refers to its enclosing one by
/// index, so a child never outlives the scope it points at.
#[derive(Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            scopes: vec![Scope::default()],
            current: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Binds `id` in the innermost scope, replacing any binding already there.
    pub fn define(&mut self, id: Rc<str>, val: Val) {
        self.scopes[self.current].stack.insert(id, val);
    }

    pub fn get(&self, name: &Token) -> Result<Val, RuntimeError> {
        let id = Self::ident(name);
        self.resolve(id)
            .and_then(|scope| self.scopes[scope].stack.get(id).cloned())
            .ok_or_else(|| Self::undefined(name))
    }

    /// Overwrites the innermost existing binding of `name`. Never creates one.
    pub fn assign(&mut self, name: &Token, val: Val) -> Result<(), RuntimeError> {
        let id = Self::ident(name);
        let Some(scope) = self.resolve(id) else {
            return Err(Self::undefined(name));
        };
        if let Some(slot) = self.scopes[scope].stack.get_mut(id) {
            *slot = val;
        }
        Ok(())
    }

    pub fn get_global(&self, id: &str) -> Option<Val> {
        self.scopes[0].stack.get(id).cloned()
    }

    /// Runs `f` inside a fresh child scope. The child is dropped afterwards
    /// whatever `f` returns.
    pub fn with_child<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.push_child();
        let res = f(self);
        self.pop_child();
        res
    }

    fn push_child(&mut self) {
        self.scopes.push(Scope {
            stack: FxHashMap::default(),
            parent: Some(self.current),
        });
        self.current = self.scopes.len() - 1;
        trace!(depth = self.scopes.len(), "enter scope");
    }

    fn pop_child(&mut self) {
        // The global scope is never popped.
        if self.current == 0 {
            return;
        }
        let parent = self.scopes[self.current].parent.unwrap_or(0);
        self.scopes.truncate(self.current);
        self.current = parent;
        trace!(depth = self.scopes.len(), "leave scope");
    }

    fn resolve(&self, id: &str) -> Option<ScopeId> {
        let mut cur = Some(self.current);
        while let Some(scope) = cur {
            if self.scopes[scope].stack.contains_key(id) {
                return Some(scope);
            }
            cur = self.scopes[scope].parent;
        }
        None
    }

    fn ident(name: &Token) -> &str {
        &name.lexeme
    }

    fn undefined(name: &Token) -> RuntimeError {
        RuntimeError::new(name, ErrorKind::UndefinedVariable(name.lexeme.clone()))
    }
}
