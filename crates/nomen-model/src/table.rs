//! In-memory type table.
//!
//! `TypeTable` is the reference implementation of [`TypeSystem`]: a set of
//! flat arenas indexed by `TypeId`/`MemberId`/`ModuleId`. It is assembled
//! once through [`TypeTableBuilder`], validated (dangling keys, cyclic
//! inheritance), and never mutated afterwards.
//!
//! ## Usage
//!
//! ```
//! use nomen_model::{MemberDecl, TypeDecl, TypeRef, TypeSystem, TypeTableBuilder};
//!
//! let mut builder = TypeTableBuilder::new();
//! let int = builder.add_type(TypeDecl::structure("Int32"));
//! let base = builder.add_type(TypeDecl::class("Base"));
//! let derived = builder.add_type(TypeDecl::class("Derived").with_bases([base]));
//! builder.add_member(base, MemberDecl::field("Foo", TypeRef::Definition(int)));
//!
//! let table = builder.build().expect("valid model");
//! assert!(table.is_derived_from(derived, base));
//! ```

use crate::ModelError;
use crate::def::{
    Accessibility, MemberDef, MemberFlags, MemberId, MemberKind, ModuleDef, ModuleId, Parameter,
    ResolvedType, TypeDef, TypeId, TypeKind, TypeRef,
};
use crate::system::TypeSystem;
use nomen_common::{Atom, Interner};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::{debug, trace};

/// Arena slot for a 1-based key.
#[inline]
fn slot(raw: u32) -> Option<usize> {
    (raw as usize).checked_sub(1)
}

#[inline]
fn key(index: usize) -> u32 {
    index as u32 + 1
}

// =============================================================================
// Declarations
// =============================================================================

/// Declaration of a type, consumed by [`TypeTableBuilder::add_type`].
#[derive(Clone, Debug)]
pub struct TypeDecl {
    pub name: String,
    pub kind: TypeKind,
    pub accessibility: Accessibility,
    pub module: Option<ModuleId>,
    pub declaring_type: Option<TypeId>,
    pub bases: Vec<TypeId>,
    pub type_parameter_count: u32,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            accessibility: Accessibility::Public,
            module: None,
            declaring_type: None,
            bases: Vec::new(),
            type_parameter_count: 0,
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    pub fn structure(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Struct)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    pub fn type_parameter(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::TypeParameter)
    }

    pub fn delegate(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Delegate)
    }

    pub fn with_bases(mut self, bases: impl IntoIterator<Item = TypeId>) -> Self {
        self.bases = bases.into_iter().collect();
        self
    }

    pub const fn in_module(mut self, module: ModuleId) -> Self {
        self.module = Some(module);
        self
    }

    /// Declare this type nested inside `outer`.
    pub const fn nested_in(mut self, outer: TypeId) -> Self {
        self.declaring_type = Some(outer);
        self
    }

    pub const fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    pub const fn with_type_parameters(mut self, count: u32) -> Self {
        self.type_parameter_count = count;
        self
    }
}

/// Declaration of a member, consumed by [`TypeTableBuilder::add_member`].
#[derive(Clone, Debug)]
pub struct MemberDecl {
    pub name: String,
    pub kind: MemberKind,
    pub accessibility: Accessibility,
    pub flags: MemberFlags,
    pub return_type: TypeRef,
    pub type_parameter_count: u32,
    pub parameters: Vec<Parameter>,
}

impl MemberDecl {
    pub fn new(name: impl Into<String>, kind: MemberKind, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            kind,
            accessibility: Accessibility::Public,
            flags: MemberFlags::empty(),
            return_type,
            type_parameter_count: 0,
            parameters: Vec::new(),
        }
    }

    pub fn method(name: impl Into<String>, return_type: TypeRef) -> Self {
        Self::new(name, MemberKind::Method, return_type)
    }

    pub fn property(name: impl Into<String>, ty: TypeRef) -> Self {
        Self::new(name, MemberKind::Property, ty)
    }

    pub fn field(name: impl Into<String>, ty: TypeRef) -> Self {
        Self::new(name, MemberKind::Field, ty)
    }

    pub fn event(name: impl Into<String>, handler: TypeRef) -> Self {
        Self::new(name, MemberKind::Event, handler)
    }

    /// An indexer (`this[...]`) property.
    pub fn indexer(ty: TypeRef, parameters: impl IntoIterator<Item = Parameter>) -> Self {
        Self::new("Item", MemberKind::Property, ty)
            .with_flags(MemberFlags::INDEXER)
            .with_parameters(parameters)
    }

    pub fn with_parameters(mut self, parameters: impl IntoIterator<Item = Parameter>) -> Self {
        self.parameters = parameters.into_iter().collect();
        self
    }

    pub const fn with_type_parameters(mut self, count: u32) -> Self {
        self.type_parameter_count = count;
        self
    }

    pub const fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    pub fn with_flags(mut self, flags: MemberFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn overriding(self) -> Self {
        self.with_flags(MemberFlags::OVERRIDE)
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Assembles a [`TypeTable`].
///
/// Keys handed out by the builder are final and sequential. Dangling keys
/// and cyclic base lists are only reported by [`build`](Self::build), so a
/// declaration may name a type that is added later.
#[derive(Default)]
pub struct TypeTableBuilder {
    interner: Interner,
    types: Vec<TypeDef>,
    members: Vec<MemberDef>,
    modules: Vec<ModuleDef>,
    root_object: Option<TypeId>,
}

impl TypeTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, name: &str) -> Atom {
        self.interner.intern(name)
    }

    /// A reference to a type the front end could not bind.
    pub fn unresolved(&mut self, name: &str) -> TypeRef {
        TypeRef::Unresolved(self.interner.intern(name))
    }

    pub fn add_module(&mut self, name: &str) -> ModuleId {
        let name = self.interner.intern(name);
        self.modules.push(ModuleDef {
            name,
            internals_visible_to: Vec::new(),
        });
        ModuleId(key(self.modules.len() - 1))
    }

    /// Let `viewer` see the internals of `owner`.
    pub fn grant_internals(&mut self, owner: ModuleId, viewer: ModuleId) {
        if let Some(module) = slot(owner.0).and_then(|i| self.modules.get_mut(i)) {
            if !module.internals_visible_to.contains(&viewer) {
                module.internals_visible_to.push(viewer);
            }
        }
    }

    pub fn add_type(&mut self, decl: TypeDecl) -> TypeId {
        let name = self.interner.intern(&decl.name);
        let id = TypeId(key(self.types.len()));
        trace!(type_id = id.0, name = %decl.name, kind = ?decl.kind, "TypeTableBuilder::add_type");
        self.types.push(TypeDef {
            name,
            kind: decl.kind,
            accessibility: decl.accessibility,
            module: decl.module,
            declaring_type: decl.declaring_type,
            bases: SmallVec::from_vec(decl.bases),
            type_parameter_count: decl.type_parameter_count,
            nested_types: Vec::new(),
            members: Vec::new(),
        });
        id
    }

    pub fn add_member(&mut self, owner: TypeId, decl: MemberDecl) -> MemberId {
        let name = self.interner.intern(&decl.name);
        let id = MemberId(key(self.members.len()));
        trace!(member_id = id.0, owner = owner.0, name = %decl.name, kind = ?decl.kind, "TypeTableBuilder::add_member");
        self.members.push(MemberDef {
            name,
            kind: decl.kind,
            declaring_type: owner,
            accessibility: decl.accessibility,
            flags: decl.flags,
            return_type: decl.return_type,
            type_parameter_count: decl.type_parameter_count,
            parameters: SmallVec::from_vec(decl.parameters),
        });
        id
    }

    pub fn set_root_object(&mut self, root: TypeId) {
        self.root_object = Some(root);
    }

    /// Validate and freeze the table.
    ///
    /// Nested-type and member lists are derived here from the back-references,
    /// in key order, so they always follow declaration order.
    pub fn build(mut self) -> Result<TypeTable, ModelError> {
        // Nested types live in their enclosing type's module unless told otherwise.
        for index in 0..self.types.len() {
            if self.types[index].module.is_none() {
                let inherited = enclosing_module(&self.types, &self.types[index]);
                self.types[index].module = inherited;
            }
        }
        for index in 0..self.types.len() {
            let id = TypeId(key(index));
            if let Some(outer) = self.types[index]
                .declaring_type
                .and_then(|outer| slot(outer.0))
                .and_then(|i| self.types.get_mut(i))
            {
                outer.nested_types.push(id);
            }
        }
        for index in 0..self.members.len() {
            let id = MemberId(key(index));
            let owner = self.members[index].declaring_type;
            if let Some(def) = slot(owner.0).and_then(|i| self.types.get_mut(i)) {
                def.members.push(id);
            }
        }
        let table = TypeTable {
            interner: self.interner,
            types: self.types,
            members: self.members,
            modules: self.modules,
            root_object: self.root_object,
        };
        table.validate()?;
        debug!(
            types = table.types.len(),
            members = table.members.len(),
            modules = table.modules.len(),
            "TypeTableBuilder::build"
        );
        Ok(table)
    }
}

/// Module of the nearest enclosing type that names one.
fn enclosing_module(types: &[TypeDef], ty: &TypeDef) -> Option<ModuleId> {
    let mut outer = ty.declaring_type;
    // Bounded by the arena size so a malformed enclosing chain cannot spin.
    for _ in 0..types.len() {
        let def = slot(outer?.0).and_then(|i| types.get(i))?;
        if def.module.is_some() {
            return def.module;
        }
        outer = def.declaring_type;
    }
    None
}

// =============================================================================
// TypeTable
// =============================================================================

/// Immutable type graph implementing [`TypeSystem`].
#[derive(Clone, Debug)]
pub struct TypeTable {
    interner: Interner,
    types: Vec<TypeDef>,
    members: Vec<MemberDef>,
    modules: Vec<ModuleDef>,
    root_object: Option<TypeId>,
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

impl TypeTable {
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn type_ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        (0..self.types.len()).map(|i| TypeId(key(i)))
    }

    fn type_name(&self, id: TypeId) -> String {
        self.type_def(id)
            .map(|def| self.interner.resolve(def.name).to_string())
            .unwrap_or_else(|| format!("#{}", id.0))
    }

    fn check_type(&self, owner: TypeId, referenced: TypeId) -> Result<(), ModelError> {
        if self.type_def(referenced).is_some() {
            return Ok(());
        }
        Err(ModelError::UnknownType {
            owner: self.type_name(owner),
            name: format!("#{}", referenced.0),
        })
    }

    fn check_module(&self, owner: String, module: ModuleId) -> Result<(), ModelError> {
        if self.module(module).is_some() {
            return Ok(());
        }
        Err(ModelError::UnknownModule {
            owner,
            name: format!("#{}", module.0),
        })
    }

    fn validate(&self) -> Result<(), ModelError> {
        for id in self.type_ids() {
            let Some(def) = self.type_def(id) else {
                continue;
            };
            if let Some(outer) = def.declaring_type {
                self.check_type(id, outer)?;
            }
            for &base in &def.bases {
                self.check_type(id, base)?;
            }
            if let Some(module) = def.module {
                self.check_module(self.type_name(id), module)?;
            }
        }
        for member in &self.members {
            if self.type_def(member.declaring_type).is_none() {
                return Err(ModelError::UnknownType {
                    owner: self.interner.resolve(member.name).to_string(),
                    name: format!("#{}", member.declaring_type.0),
                });
            }
        }
        for module in &self.modules {
            for &viewer in &module.internals_visible_to {
                self.check_module(self.interner.resolve(module.name).to_string(), viewer)?;
            }
        }
        if let Some(root) = self.root_object {
            self.check_type(root, root)?;
        }
        self.check_acyclic()
    }

    /// Depth-first colouring over base lists.
    fn check_acyclic(&self) -> Result<(), ModelError> {
        let mut marks = vec![Mark::Unvisited; self.types.len()];
        for start in 0..self.types.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }
            // (type index, next base to visit)
            let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
            marks[start] = Mark::Visiting;
            while let Some(frame) = stack.last_mut() {
                let (index, next) = *frame;
                let bases = &self.types[index].bases;
                if next < bases.len() {
                    let base = bases[next];
                    frame.1 += 1;
                    let Some(base_index) = slot(base.0) else {
                        continue;
                    };
                    match marks[base_index] {
                        Mark::Visiting => {
                            return Err(ModelError::CyclicHierarchy(self.type_name(base)));
                        }
                        Mark::Unvisited => {
                            marks[base_index] = Mark::Visiting;
                            stack.push((base_index, 0));
                        }
                        Mark::Done => {}
                    }
                } else {
                    marks[index] = Mark::Done;
                    stack.pop();
                }
            }
        }
        Ok(())
    }

    /// Post-order walk over base lists with an explicit stack, so hierarchy
    /// depth is bounded only by the (acyclic) graph itself.
    fn collect_bases_first(&self, ty: TypeId, walk_interfaces: bool) -> Vec<TypeId> {
        let mut visited = FxHashSet::default();
        let mut order = Vec::new();
        // (type, next base to visit)
        let mut stack: Vec<(TypeId, usize)> = Vec::new();
        if self.type_def(ty).is_some() && visited.insert(ty) {
            stack.push((ty, 0));
        }
        while let Some(frame) = stack.last_mut() {
            let (current, next) = *frame;
            let bases: &[TypeId] = self.type_def(current).map_or(&[], |def| &def.bases);
            if let Some(&base) = bases.get(next) {
                frame.1 += 1;
                let Some(base_def) = self.type_def(base) else {
                    continue;
                };
                if (walk_interfaces || !base_def.kind.is_interface()) && visited.insert(base) {
                    stack.push((base, 0));
                }
            } else {
                order.push(current);
                stack.pop();
            }
        }
        order
    }
}

impl TypeSystem for TypeTable {
    fn type_def(&self, id: TypeId) -> Option<&TypeDef> {
        slot(id.0).and_then(|i| self.types.get(i))
    }

    fn member(&self, id: MemberId) -> Option<&MemberDef> {
        slot(id.0).and_then(|i| self.members.get(i))
    }

    fn module(&self, id: ModuleId) -> Option<&ModuleDef> {
        slot(id.0).and_then(|i| self.modules.get(i))
    }

    fn nested_types(&self, ty: TypeId, filter: &mut dyn FnMut(&TypeDef) -> bool) -> Vec<TypeId> {
        let mut result = Vec::new();
        for owner in self.linearize(ty) {
            let Some(def) = self.type_def(owner) else {
                continue;
            };
            for &nested in &def.nested_types {
                if self.type_def(nested).is_some_and(|n| filter(n)) {
                    result.push(nested);
                }
            }
        }
        result
    }

    fn members(&self, ty: TypeId, filter: &mut dyn FnMut(&MemberDef) -> bool) -> Vec<MemberId> {
        let mut result = Vec::new();
        for owner in self.linearize(ty) {
            let Some(def) = self.type_def(owner) else {
                continue;
            };
            for &member in &def.members {
                if self.member(member).is_some_and(|m| filter(m)) {
                    result.push(member);
                }
            }
        }
        result
    }

    fn linearize(&self, ty: TypeId) -> Vec<TypeId> {
        let Some(def) = self.type_def(ty) else {
            return Vec::new();
        };
        self.collect_bases_first(ty, def.kind.walks_interface_bases())
    }

    fn resolve_type_ref(&self, ty: &TypeRef) -> ResolvedType {
        match ty {
            TypeRef::Definition(id) if self.type_def(*id).is_some() => ResolvedType::Definition(*id),
            TypeRef::Definition(_) => ResolvedType::Unknown(Atom::NONE),
            TypeRef::Dynamic => ResolvedType::Dynamic,
            TypeRef::MethodTypeParameter(index) => ResolvedType::MethodTypeParameter(*index),
            TypeRef::Unresolved(name) => ResolvedType::Unknown(*name),
        }
    }

    fn is_derived_from(&self, sub: TypeId, sup: TypeId) -> bool {
        if self.type_def(sub).is_none() {
            return false;
        }
        if sub == sup {
            return true;
        }
        let mut visited = FxHashSet::default();
        let mut worklist = vec![sub];
        while let Some(current) = worklist.pop() {
            if !visited.insert(current) {
                continue;
            }
            let Some(def) = self.type_def(current) else {
                continue;
            };
            for &base in &def.bases {
                if base == sup {
                    return true;
                }
                worklist.push(base);
            }
        }
        false
    }

    fn is_delegate(&self, ty: TypeId) -> bool {
        self.type_def(ty)
            .is_some_and(|def| def.kind == TypeKind::Delegate)
    }

    fn is_internally_visible(&self, owner: ModuleId, viewer: ModuleId) -> bool {
        if owner == viewer {
            return self.module(owner).is_some();
        }
        self.module(owner)
            .is_some_and(|def| def.internals_visible_to.contains(&viewer))
    }

    fn root_object(&self) -> Option<TypeId> {
        self.root_object
    }

    fn atom(&self, name: &str) -> Option<Atom> {
        self.interner.get(name)
    }

    fn name(&self, atom: Atom) -> &str {
        self.interner.resolve(atom)
    }
}

#[cfg(test)]
#[path = "../tests/table_tests.rs"]
mod tests;
