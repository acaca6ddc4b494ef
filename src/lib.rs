//! nomen: member lookup for C#-style type systems.
//!
//! This crate stitches the workspace together: the model (`nomen-model`),
//! the lookup core (`nomen-lookup`) and shared utilities (`nomen-common`),
//! plus tracing setup for the binary.

// String interning and centralized limits
pub use nomen_common::{Atom, Interner, limits};

// Type/member model and the type-system collaborator interface
pub use nomen_model as model;
pub use nomen_model::{
    Accessibility, EntityRef, LoadedModel, MemberDef, MemberId, MemberKind, ModelError, ModuleId,
    TypeDef, TypeId, TypeKind, TypeRef, TypeSystem, TypeTable, TypeTableBuilder, load_model,
};

// Lookup core: accessibility, collection, hiding, classification
pub use nomen_lookup as lookup;
pub use nomen_lookup::{
    InvocationFilter, LookupError, LookupOptions, MemberLookup, ResolveResult, ResultFormatter,
};

// Tracing configuration (text / tree / JSON output for debugging)
pub mod tracing_config;
