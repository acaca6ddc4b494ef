use crate::def::{
    MemberDef, MemberId, ModuleDef, ModuleId, ResolvedType, TypeDef, TypeId, TypeRef,
};
use nomen_common::Atom;

/// The type-system collaborator member lookup is written against.
///
/// Implementations own the type graph and hand out read-only views of it.
/// Lookup never mutates anything reachable through this trait, so any
/// implementation whose graph is immutable once published can serve
/// concurrent lookups; the `Sync` bound makes that a compile-time fact.
pub trait TypeSystem: Sync {
    fn type_def(&self, id: TypeId) -> Option<&TypeDef>;

    fn member(&self, id: MemberId) -> Option<&MemberDef>;

    fn module(&self, id: ModuleId) -> Option<&ModuleDef>;

    /// Nested types declared in `ty` or in the bases visible from it,
    /// base-most first, filtered by `filter`.
    fn nested_types(&self, ty: TypeId, filter: &mut dyn FnMut(&TypeDef) -> bool) -> Vec<TypeId>;

    /// Members declared in `ty` or in the bases visible from it,
    /// base-most first and in declaration order within a type.
    fn members(&self, ty: TypeId, filter: &mut dyn FnMut(&MemberDef) -> bool) -> Vec<MemberId>;

    /// Base-first linearization of the hierarchy visible from `ty`, ending
    /// with `ty` itself. This is the order `nested_types`/`members` use.
    fn linearize(&self, ty: TypeId) -> Vec<TypeId>;

    fn resolve_type_ref(&self, ty: &TypeRef) -> ResolvedType;

    /// Reflexive: `is_derived_from(t, t)` holds for every known type.
    fn is_derived_from(&self, sub: TypeId, sup: TypeId) -> bool;

    fn is_delegate(&self, ty: TypeId) -> bool;

    /// Whether `owner` exposes its internals to `viewer`.
    fn is_internally_visible(&self, owner: ModuleId, viewer: ModuleId) -> bool;

    /// The universal root object type, if the model has one.
    fn root_object(&self) -> Option<TypeId>;

    /// Find the atom for `name` without interning it.
    fn atom(&self, name: &str) -> Option<Atom>;

    fn name(&self, atom: Atom) -> &str;
}
