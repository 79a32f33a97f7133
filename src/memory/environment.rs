//! Lexical scopes
//!
//! The environment is an explicit stack of [`Scope`]s; the root (depth 0) is
//! the global scope. A child scope starts as a full copy of every binding
//! visible in its parent, so lookups never walk outward. Each copied binding
//! remembers the depth of the declaration it came from.
//!
//! # Write-back
//!
//! What happens to the parent's copy when a child updates a name depends on
//! [`ScopeMode`]:
//!
//! - [`ScopeMode::Shared`]: the new value is written to every scope on the
//!   stack whose binding descends from the same declaration. Shadowing
//!   bindings (declared deeper) are never touched.
//! - [`ScopeMode::Snapshot`]: only the current scope's copy changes; the
//!   parent keeps the value it had when the child was created.
//!
//! Function calls set the block stack aside and run on a fresh scope seeded
//! from the root, see [`Environment::enter_function`].

use super::value::Value;
use crate::types::PrimitiveType;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// How updates made in a child scope reach its ancestors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScopeMode {
    #[default]
    Shared,
    Snapshot,
}

/// A single variable slot
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub value: Value,
    pub type_tag: PrimitiveType,
    /// Depth of the scope that declared this name
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    pub name: String,
    pub depth: usize,
    bindings: FxHashMap<String, Binding>,
    /// Names in declaration order, for display
    order: Vec<String>,
}

impl Scope {
    fn new(name: impl Into<String>, depth: usize) -> Self {
        Scope {
            name: name.into(),
            depth,
            bindings: FxHashMap::default(),
            order: Vec::new(),
        }
    }

    /// A child at `depth + 1` holding copies of all of this scope's bindings
    fn child(&self, name: impl Into<String>) -> Self {
        Scope {
            name: name.into(),
            depth: self.depth + 1,
            bindings: self.bindings.clone(),
            order: self.order.clone(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings in the order their names were first declared
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.order
            .iter()
            .filter_map(|name| self.bindings.get(name).map(|b| (name.as_str(), b)))
    }

    fn insert(&mut self, name: &str, binding: Binding) {
        if self.bindings.insert(name.to_string(), binding).is_none() {
            self.order.push(name.to_string());
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    #[error("'{name}' is already declared in this scope")]
    Redeclaration { name: String },
    #[error("'{name}' is not declared")]
    Unbound { name: String },
}

/// Saved block stack of the caller during a function call
#[derive(Debug)]
#[must_use]
pub struct CallFrame {
    saved: Vec<Scope>,
}

/// Stack of scopes; never empty
#[derive(Debug, Clone)]
pub struct Environment {
    scopes: Vec<Scope>,
    mode: ScopeMode,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(ScopeMode::default())
    }
}

impl Environment {
    pub fn new(mode: ScopeMode) -> Self {
        Environment {
            scopes: vec![Scope::new("global", 0)],
            mode,
        }
    }

    pub fn depth(&self) -> usize {
        self.current().depth
    }

    /// All live scopes, root first
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn current(&self) -> &Scope {
        // The root scope is never popped
        &self.scopes[self.scopes.len() - 1]
    }

    fn current_mut(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    pub fn global(&self) -> &Scope {
        &self.scopes[0]
    }

    /// Enter a nested block
    pub fn push_scope(&mut self, name: impl Into<String>) {
        let child = self.current().child(name);
        self.scopes.push(child);
    }

    /// Leave the innermost block; the root scope stays
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Bind `name` in the current scope.
    ///
    /// Shadowing a binding inherited from an outer scope is fine; declaring
    /// the same name twice at one depth is not.
    pub fn declare(
        &mut self,
        name: &str,
        type_tag: PrimitiveType,
        value: Value,
    ) -> Result<(), ScopeError> {
        let depth = self.depth();
        if self.current().get(name).is_some_and(|b| b.depth == depth) {
            return Err(ScopeError::Redeclaration {
                name: name.to_string(),
            });
        }
        self.current_mut().insert(
            name,
            Binding {
                value,
                type_tag,
                depth,
            },
        );
        Ok(())
    }

    /// `None` means unbound; a bound-but-uninitialized name yields [`Value::Absent`]
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.current().get(name)
    }

    /// Rebind an existing name, keeping its type tag and declaring depth
    pub fn update(&mut self, name: &str, value: Value) -> Result<(), ScopeError> {
        let declared_at = self
            .lookup(name)
            .map(|b| b.depth)
            .ok_or_else(|| ScopeError::Unbound {
                name: name.to_string(),
            })?;

        match self.mode {
            ScopeMode::Snapshot => {
                if let Some(binding) = self.current_mut().bindings.get_mut(name) {
                    binding.value = value;
                }
            }
            ScopeMode::Shared => {
                for scope in self.scopes.iter_mut().rev() {
                    if scope.depth < declared_at {
                        break;
                    }
                    if let Some(binding) = scope.bindings.get_mut(name) {
                        if binding.depth == declared_at {
                            binding.value = value;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Set the block stack aside and open a function scope seeded from the root
    pub fn enter_function(&mut self, name: &str) -> CallFrame {
        let saved = self.scopes.split_off(1);
        let frame = self.scopes[0].child(name);
        self.scopes.push(frame);
        CallFrame { saved }
    }

    /// Drop the function's scopes and bring the caller's blocks back.
    ///
    /// In shared mode, globals the callee changed are copied into the
    /// restored blocks.
    pub fn leave_function(&mut self, frame: CallFrame) {
        self.scopes.truncate(1);
        self.scopes.extend(frame.saved);

        if self.mode == ScopeMode::Shared {
            let (root, blocks) = self.scopes.split_at_mut(1);
            for (name, global) in root[0].bindings.iter() {
                for scope in blocks.iter_mut() {
                    if let Some(binding) = scope.bindings.get_mut(name) {
                        if binding.depth == 0 {
                            binding.value = global.value;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_and_lookup() {
        let mut env = Environment::default();
        env.declare("x", PrimitiveType::Int, Value::Int(1)).unwrap();
        let binding = env.lookup("x").unwrap();
        assert_eq!(binding.value, Value::Int(1));
        assert_eq!(binding.depth, 0);
        assert!(env.lookup("y").is_none());
    }

    #[test]
    fn test_uninitialized_is_bound_but_absent() {
        let mut env = Environment::default();
        env.declare("x", PrimitiveType::Int, Value::Absent).unwrap();
        assert_eq!(env.lookup("x").map(|b| b.value), Some(Value::Absent));
    }

    #[test]
    fn test_redeclaration_in_same_scope_fails() {
        let mut env = Environment::default();
        env.declare("x", PrimitiveType::Int, Value::Int(1)).unwrap();
        let err = env.declare("x", PrimitiveType::Int, Value::Int(2));
        assert!(matches!(err, Err(ScopeError::Redeclaration { .. })));
    }

    #[test]
    fn test_shadowing_leaves_outer_binding_alone() {
        for mode in [ScopeMode::Shared, ScopeMode::Snapshot] {
            let mut env = Environment::new(mode);
            env.declare("x", PrimitiveType::Int, Value::Int(1)).unwrap();
            env.push_scope("block");
            env.declare("x", PrimitiveType::Int, Value::Int(10)).unwrap();
            env.update("x", Value::Int(11)).unwrap();
            assert_eq!(env.lookup("x").unwrap().value, Value::Int(11));
            env.pop_scope();
            assert_eq!(env.lookup("x").unwrap().value, Value::Int(1));
        }
    }

    #[test]
    fn test_shared_mode_writes_through() {
        let mut env = Environment::new(ScopeMode::Shared);
        env.declare("x", PrimitiveType::Int, Value::Int(2)).unwrap();
        env.push_scope("if");
        env.push_scope("inner");
        env.update("x", Value::Int(12)).unwrap();
        env.pop_scope();
        assert_eq!(env.lookup("x").unwrap().value, Value::Int(12));
        env.pop_scope();
        assert_eq!(env.lookup("x").unwrap().value, Value::Int(12));
    }

    #[test]
    fn test_snapshot_mode_keeps_parent_copy() {
        let mut env = Environment::new(ScopeMode::Snapshot);
        env.declare("x", PrimitiveType::Int, Value::Int(2)).unwrap();
        env.push_scope("if");
        env.update("x", Value::Int(12)).unwrap();
        assert_eq!(env.lookup("x").unwrap().value, Value::Int(12));
        env.pop_scope();
        assert_eq!(env.lookup("x").unwrap().value, Value::Int(2));
    }

    #[test]
    fn test_update_unbound_fails() {
        let mut env = Environment::default();
        assert!(matches!(
            env.update("nope", Value::Int(1)),
            Err(ScopeError::Unbound { .. })
        ));
    }

    #[test]
    fn test_child_keeps_declaring_depth() {
        let mut env = Environment::default();
        env.declare("g", PrimitiveType::Float, Value::Float(1.5)).unwrap();
        env.push_scope("block");
        let binding = env.lookup("g").unwrap();
        assert_eq!(binding.depth, 0);
        assert_eq!(env.depth(), 1);
        assert_eq!(binding.type_tag, PrimitiveType::Float);
    }

    #[test]
    fn test_function_scope_sees_globals_only() {
        let mut env = Environment::default();
        env.declare("g", PrimitiveType::Int, Value::Int(1)).unwrap();
        env.push_scope("block");
        env.declare("local", PrimitiveType::Int, Value::Int(5)).unwrap();

        let frame = env.enter_function("f");
        assert_eq!(env.depth(), 1);
        assert!(env.lookup("local").is_none());
        env.update("g", Value::Int(7)).unwrap();
        env.leave_function(frame);

        assert_eq!(env.lookup("local").unwrap().value, Value::Int(5));
        assert_eq!(env.lookup("g").unwrap().value, Value::Int(7));
        assert_eq!(env.global().get("g").unwrap().value, Value::Int(7));
    }

    #[test]
    fn test_iteration_follows_declaration_order() {
        let mut env = Environment::default();
        for name in ["b", "a", "c"] {
            env.declare(name, PrimitiveType::Int, Value::Int(0)).unwrap();
        }
        let names: Vec<&str> = env.global().iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_root_scope_is_never_popped() {
        let mut env = Environment::default();
        env.pop_scope();
        assert_eq!(env.scopes().len(), 1);
    }
}
