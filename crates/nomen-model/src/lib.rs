//! Type/member model read by member lookup.
//!
//! This crate owns everything lookup consumes but never mutates:
//!
//! - **Definitions**: `TypeDef`, `MemberDef`, `ModuleDef` addressed by
//!   `TypeId`/`MemberId`/`ModuleId` keys (declaring-type back-references are
//!   keys, never owning pointers)
//! - **`TypeSystem`**: the collaborator interface lookup is written against
//! - **`TypeTable`**: an immutable in-memory implementation of `TypeSystem`,
//!   built through `TypeTableBuilder` or loaded from a JSON fixture
pub mod def;
mod error;
pub mod fixture;
mod system;
pub mod table;

pub use def::{
    Accessibility, EntityRef, MemberDef, MemberFlags, MemberId, MemberKind, ModuleDef, ModuleId,
    Parameter, ResolvedType, TypeDef, TypeId, TypeKind, TypeRef,
};
pub use error::ModelError;
pub use fixture::{LoadedModel, ModelFile, load_model};
pub use system::TypeSystem;
pub use table::{MemberDecl, TypeDecl, TypeTable, TypeTableBuilder};
