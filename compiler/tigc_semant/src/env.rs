//! Scopes and the entries that live in them

use std::collections::HashMap;

use crate::types::TypeId;

/// A stack of scope frames mapping names to entries
///
/// Inner frames shadow outer ones. The root frame is created with the stack
/// and can never be popped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeStack<'input, T> {
    /// The frames, outermost first
    frames: Vec<HashMap<&'input str, T>>,
}

impl<T> Default for ScopeStack<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'input, T> ScopeStack<'input, T> {
    /// Create a stack holding one empty root frame
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: vec![HashMap::new()],
        }
    }

    /// Push a new innermost frame
    pub fn begin_scope(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Pop the innermost frame, discarding everything declared in it
    ///
    /// # Panics
    /// Panics if only the root frame is left.
    pub fn end_scope(&mut self) {
        assert!(self.frames.len() > 1, "cannot pop the root scope");
        self.frames.pop();
    }

    /// The number of frames, the root included
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Bind a name in the innermost frame, returning what it replaced in that
    /// same frame
    pub fn put(&mut self, name: &'input str, entry: T) -> Option<T> {
        self.frames
            .last_mut()
            .expect("scope stack always has a root frame")
            .insert(name, entry)
    }

    /// Find the innermost binding of a name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&T> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }
}

/// A function's signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunEntry<'input> {
    /// Formal parameters, in order
    pub formals: Vec<(&'input str, TypeId)>,
    /// The result type, `void` for procedures
    pub result: TypeId,
}

/// Anything a value name can refer to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry<'input> {
    /// A variable
    Var(TypeId),
    /// The index of a `for` loop, which cannot be assigned to
    LoopVar(TypeId),
    /// A function
    Fun(FunEntry<'input>),
}

/// The type and value namespaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Env<'input> {
    /// Type names
    pub types: ScopeStack<'input, TypeId>,
    /// Variable and function names
    pub values: ScopeStack<'input, Entry<'input>>,
}

impl Default for Env<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Env<'_> {
    /// Create the root environment, which knows the `int` and `string` types
    /// and nothing else
    #[must_use]
    pub fn new() -> Self {
        let mut types = ScopeStack::new();
        types.put("int", TypeId::INT);
        types.put("string", TypeId::STRING);

        Self {
            types,
            values: ScopeStack::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_environment_has_primitive_types_only() {
        let env = Env::new();
        assert_eq!(env.types.get("int"), Some(&TypeId::INT));
        assert_eq!(env.types.get("string"), Some(&TypeId::STRING));
        assert_eq!(env.types.get("void"), None);
        assert_eq!(env.types.get("nil"), None);
        assert_eq!(env.values.get("print"), None);
    }

    #[test]
    fn inner_frames_shadow_outer_frames() {
        let mut scopes = ScopeStack::new();
        scopes.put("x", 1);
        scopes.begin_scope();
        scopes.put("x", 2);
        scopes.put("y", 3);

        assert_eq!(scopes.get("x"), Some(&2));
        assert_eq!(scopes.depth(), 2);

        scopes.end_scope();
        assert_eq!(scopes.get("x"), Some(&1));
        assert_eq!(scopes.get("y"), None);
    }

    #[test]
    fn put_replaces_within_one_frame() {
        let mut scopes = ScopeStack::new();
        assert_eq!(scopes.put("x", 1), None);
        assert_eq!(scopes.put("x", 2), Some(1));
        assert_eq!(scopes.get("x"), Some(&2));
    }

    #[test]
    #[should_panic = "cannot pop the root scope"]
    fn root_frame_cannot_be_popped() {
        let mut scopes = ScopeStack::<()>::new();
        scopes.end_scope();
    }
}
