//! The type system
//!
//! All types live in a [`TypeArena`] and are referred to by [`TypeId`]. The
//! index of a record or array type is its identity: two record types are only
//! compatible when they are the same arena slot, no matter how their fields
//! look. Type declarations introduce [`Type::Name`] nodes that are bound to
//! their meaning after the whole declaration group has been seen.

use std::collections::HashSet;

use indexmap::IndexMap;

/// A reference to a type stored in a [`TypeArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    /// The `void` type, produced by expressions with no value and used as the
    /// recovery placeholder after an error
    pub const VOID: Self = Self(0);
    /// The `int` type
    pub const INT: Self = Self(1);
    /// The `string` type
    pub const STRING: Self = Self(2);
    /// The type of `nil`
    pub const NIL: Self = Self(3);
    /// The type of something that already failed to check. It is compatible
    /// with everything, so one mistake is reported once.
    pub const ERROR: Self = Self(4);

    /// The arena slot this id refers to
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A type, as stored in the arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type<'input> {
    /// `void`
    Void,
    /// `int`
    Int,
    /// `string`
    String,
    /// The type of `nil`, which coerces to any record
    Nil,
    /// Stands in for the type of an erroneous construct
    Error,
    /// A record with its fields in declaration order
    Record(IndexMap<&'input str, TypeId>),
    /// An array of some element type
    Array(TypeId),
    /// A declared type name, bound once its declaration group is resolved
    Name {
        /// The declared name
        label: &'input str,
        /// What the name stands for
        binding: Option<TypeId>,
    },
}

/// Why a chain of [`Type::Name`]s could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError<'input> {
    /// The chain loops back on itself without reaching a record or array
    Cycle,
    /// The chain ends at a name that has not been bound yet
    Unbound(&'input str),
}

/// Storage for every type created while checking a program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeArena<'input> {
    /// The types, indexed by [`TypeId`]
    types: Vec<Type<'input>>,
}

impl Default for TypeArena<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'input> TypeArena<'input> {
    /// Create an arena containing only the primitive types
    #[must_use]
    pub fn new() -> Self {
        Self {
            types: vec![Type::Void, Type::Int, Type::String, Type::Nil, Type::Error],
        }
    }

    /// Store a new type and return its id
    fn alloc(&mut self, ty: Type<'input>) -> TypeId {
        let id = TypeId(u32::try_from(self.types.len()).expect("type arena overflowed"));
        self.types.push(ty);
        id
    }

    /// Create a fresh record type. Every call produces a distinct type.
    pub fn new_record(&mut self, fields: IndexMap<&'input str, TypeId>) -> TypeId {
        self.alloc(Type::Record(fields))
    }

    /// Create a fresh array type. Every call produces a distinct type.
    pub fn new_array(&mut self, element: TypeId) -> TypeId {
        self.alloc(Type::Array(element))
    }

    /// Create an unbound name
    pub fn new_name(&mut self, label: &'input str) -> TypeId {
        self.alloc(Type::Name {
            label,
            binding: None,
        })
    }

    /// Bind a name created by [`TypeArena::new_name`] to what it stands for
    ///
    /// # Panics
    /// Panics if `name` is not an unbound [`Type::Name`].
    pub fn bind(&mut self, name: TypeId, target: TypeId) {
        match &mut self.types[name.index()] {
            Type::Name { binding, .. } if binding.is_none() => *binding = Some(target),
            other => panic!("can only bind an unbound name, not {other:?}"),
        }
    }

    /// Look up a type by its id
    #[must_use]
    pub fn get(&self, id: TypeId) -> &Type<'input> {
        &self.types[id.index()]
    }

    /// The number of types in the arena, primitives included
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the arena is empty. It never is, as the primitives are always
    /// present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Follow [`Type::Name`] bindings to the first type that is not a name
    ///
    /// # Errors
    /// Errors if the chain reaches an unbound name or visits a name twice.
    pub fn try_actual(&self, id: TypeId) -> Result<TypeId, ResolveError<'input>> {
        let mut visited = HashSet::new();
        let mut current = id;
        while let Type::Name { label, binding } = self.get(current) {
            if !visited.insert(current) {
                return Err(ResolveError::Cycle);
            }
            current = binding.ok_or(ResolveError::Unbound(*label))?;
        }
        Ok(current)
    }

    /// Like [`TypeArena::try_actual`], but resolves to `void` on failure
    #[must_use]
    pub fn actual(&self, id: TypeId) -> TypeId {
        self.try_actual(id).unwrap_or(TypeId::VOID)
    }

    /// The resolved form of a type
    #[must_use]
    pub fn resolved(&self, id: TypeId) -> &Type<'input> {
        self.get(self.actual(id))
    }

    /// Whether `id` stands for a construct that has already been reported
    #[must_use]
    pub fn is_error(&self, id: TypeId) -> bool {
        matches!(self.resolved(id), Type::Error)
    }

    /// Whether a value of type `source` may be used where `dest` is expected
    #[must_use]
    pub fn coerce_to(&self, source: TypeId, dest: TypeId) -> bool {
        if source == dest {
            return true;
        }

        let source = self.actual(source);
        let dest = self.actual(dest);
        source == dest
            || matches!(
                (self.get(source), self.get(dest)),
                (Type::Nil, Type::Record(_)) | (Type::Error, _) | (_, Type::Error)
            )
    }

    /// Whether two types are compatible in either direction
    #[must_use]
    pub fn agree(&self, a: TypeId, b: TypeId) -> bool {
        self.coerce_to(a, b) || self.coerce_to(b, a)
    }

    /// Whether `=` and `<>` may be used on values of this type
    #[must_use]
    pub fn is_comparable(&self, id: TypeId) -> bool {
        matches!(
            self.resolved(id),
            Type::Int | Type::String | Type::Nil | Type::Record(_) | Type::Array(_) | Type::Error
        )
    }

    /// Whether `<`, `<=`, `>` and `>=` may be used on values of this type
    #[must_use]
    pub fn is_orderable(&self, id: TypeId) -> bool {
        matches!(self.resolved(id), Type::Int | Type::String | Type::Error)
    }

    /// The fields of a record type, if `id` resolves to one
    #[must_use]
    pub fn record_fields(&self, id: TypeId) -> Option<&IndexMap<&'input str, TypeId>> {
        match self.resolved(id) {
            Type::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// The element type of an array type, if `id` resolves to one
    #[must_use]
    pub fn array_element(&self, id: TypeId) -> Option<TypeId> {
        match self.resolved(id) {
            Type::Array(element) => Some(*element),
            _ => None,
        }
    }

    /// Render a type for use in a message
    ///
    /// Names are printed by label and never followed, so the output is finite
    /// even for recursive types.
    #[must_use]
    pub fn display(&self, id: TypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, id, 0);
        out
    }

    /// Write a type into `out`. Anonymous structure nested deeper than one
    /// level is elided.
    fn write_type(&self, out: &mut String, id: TypeId, depth: usize) {
        match self.get(id) {
            Type::Void => out.push_str("void"),
            Type::Int => out.push_str("int"),
            Type::String => out.push_str("string"),
            Type::Nil => out.push_str("nil"),
            Type::Error => out.push_str("<error>"),
            Type::Name { label, .. } => out.push_str(label),
            Type::Record(_) | Type::Array(_) if depth > 1 => out.push_str("..."),
            Type::Record(fields) if fields.is_empty() => out.push_str("{}"),
            Type::Record(fields) => {
                out.push_str("{ ");
                for (index, (name, ty)) in fields.iter().enumerate() {
                    if index > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(name);
                    out.push_str(": ");
                    self.write_type(out, *ty, depth + 1);
                }
                out.push_str(" }");
            }
            Type::Array(element) => {
                out.push_str("array of ");
                self.write_type(out, *element, depth + 1);
            }
        }
    }
}
