//! Definition identifiers and definition records.
//!
//! Every entity is addressed by a small copyable key into the owning
//! `TypeTable`. Members point back at their declaring type through a
//! `TypeId`, so the type <-> member cycle never involves ownership.
//!
//! ## Accessibility codes
//!
//! | Code | Accessibility |
//! |------|---------------|
//! | 0 | None |
//! | 1 | Private |
//! | 2 | ProtectedAndInternal |
//! | 3 | Internal |
//! | 4 | Protected |
//! | 5 | ProtectedOrInternal |
//! | 6 | Public |

use crate::ModelError;
use bitflags::bitflags;
use nomen_common::Atom;
use smallvec::SmallVec;
use std::str::FromStr;

// =============================================================================
// Identifiers
// =============================================================================

/// Key of a type definition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Sentinel value for invalid `TypeId`.
    pub const INVALID: Self = Self(0);

    /// First valid `TypeId`.
    pub const FIRST_VALID: u32 = 1;

    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }
}

/// Key of a member definition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(pub u32);

/// Key of a module (compilation unit / assembly).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub u32);

/// Anything accessibility can be asked about.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Type(TypeId),
    Member(MemberId),
}

impl From<TypeId> for EntityRef {
    fn from(id: TypeId) -> Self {
        EntityRef::Type(id)
    }
}

impl From<MemberId> for EntityRef {
    fn from(id: MemberId) -> Self {
        EntityRef::Member(id)
    }
}

// =============================================================================
// Kinds
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    /// A generic parameter; its bases are its constraints.
    TypeParameter,
    Enum,
    Delegate,
}

impl TypeKind {
    pub const fn is_interface(self) -> bool {
        matches!(self, TypeKind::Interface)
    }

    /// Interfaces and type parameters see members through every base type,
    /// other kinds only through their non-interface bases.
    pub const fn walks_interface_bases(self) -> bool {
        matches!(self, TypeKind::Interface | TypeKind::TypeParameter)
    }
}

impl FromStr for TypeKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "class" => Ok(TypeKind::Class),
            "struct" => Ok(TypeKind::Struct),
            "interface" => Ok(TypeKind::Interface),
            "typeParameter" | "type-parameter" => Ok(TypeKind::TypeParameter),
            "enum" => Ok(TypeKind::Enum),
            "delegate" => Ok(TypeKind::Delegate),
            other => Err(ModelError::UnknownTypeKind(other.to_string())),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Method,
    Property,
    Field,
    Event,
}

impl FromStr for MemberKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "method" => Ok(MemberKind::Method),
            "property" => Ok(MemberKind::Property),
            "field" => Ok(MemberKind::Field),
            "event" => Ok(MemberKind::Event),
            other => Err(ModelError::UnknownMemberKind(other.to_string())),
        }
    }
}

// =============================================================================
// Accessibility
// =============================================================================

/// Declared accessibility of a type or member.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Accessibility {
    /// Not accessible from anywhere (compiler-controlled).
    None,
    Private,
    /// `private protected`
    ProtectedAndInternal,
    Internal,
    Protected,
    /// `protected internal`
    ProtectedOrInternal,
    Public,
}

impl Accessibility {
    pub const fn code(self) -> u8 {
        match self {
            Accessibility::None => 0,
            Accessibility::Private => 1,
            Accessibility::ProtectedAndInternal => 2,
            Accessibility::Internal => 3,
            Accessibility::Protected => 4,
            Accessibility::ProtectedOrInternal => 5,
            Accessibility::Public => 6,
        }
    }
}

impl TryFrom<u8> for Accessibility {
    type Error = ModelError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Accessibility::None),
            1 => Ok(Accessibility::Private),
            2 => Ok(Accessibility::ProtectedAndInternal),
            3 => Ok(Accessibility::Internal),
            4 => Ok(Accessibility::Protected),
            5 => Ok(Accessibility::ProtectedOrInternal),
            6 => Ok(Accessibility::Public),
            other => Err(ModelError::UnknownAccessibility(other.to_string())),
        }
    }
}

impl FromStr for Accessibility {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Accessibility::None),
            "private" => Ok(Accessibility::Private),
            "privateProtected" | "protectedAndInternal" => Ok(Accessibility::ProtectedAndInternal),
            "internal" => Ok(Accessibility::Internal),
            "protected" => Ok(Accessibility::Protected),
            "protectedInternal" | "protectedOrInternal" => Ok(Accessibility::ProtectedOrInternal),
            "public" => Ok(Accessibility::Public),
            other => Err(ModelError::UnknownAccessibility(other.to_string())),
        }
    }
}

// =============================================================================
// Type references
// =============================================================================

/// A declared type reference as it appears in a signature or return type.
///
/// Equality is structural; it is the signature comparer used by member
/// hiding. Method type parameters compare by position, so `M<T>(T)` and
/// `M<U>(U)` carry equal parameter lists.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Definition(TypeId),
    /// The dynamic / any-type marker.
    Dynamic,
    /// The n-th generic parameter of the declaring method.
    MethodTypeParameter(u32),
    /// A reference the front end could not bind.
    Unresolved(Atom),
}

/// A type reference after resolution against the type table.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResolvedType {
    Definition(TypeId),
    Dynamic,
    MethodTypeParameter(u32),
    Unknown(Atom),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Parameter {
    pub ty: TypeRef,
    /// `ref`/`out`/`in` parameters.
    pub by_ref: bool,
}

impl Parameter {
    pub fn by_value(ty: TypeRef) -> Self {
        Self { ty, by_ref: false }
    }

    pub fn by_ref(ty: TypeRef) -> Self {
        Self { ty, by_ref: true }
    }
}

// =============================================================================
// Definitions
// =============================================================================

bitflags! {
    /// Member modifiers relevant to lookup.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MemberFlags: u8 {
        const OVERRIDE = 1 << 0;
        /// Property reached through `this[...]` rather than by name.
        const INDEXER = 1 << 1;
        const STATIC = 1 << 2;
        const VIRTUAL = 1 << 3;
        const ABSTRACT = 1 << 4;
    }
}

#[derive(Clone, Debug)]
pub struct TypeDef {
    pub name: Atom,
    pub kind: TypeKind,
    pub accessibility: Accessibility,
    pub module: Option<ModuleId>,
    /// Enclosing type for nested types.
    pub declaring_type: Option<TypeId>,
    /// Base class, implemented interfaces, or constraints, in declaration order.
    pub bases: SmallVec<[TypeId; 4]>,
    pub type_parameter_count: u32,
    pub nested_types: Vec<TypeId>,
    pub members: Vec<MemberId>,
}

#[derive(Clone, Debug)]
pub struct MemberDef {
    pub name: Atom,
    pub kind: MemberKind,
    pub declaring_type: TypeId,
    pub accessibility: Accessibility,
    pub flags: MemberFlags,
    pub return_type: TypeRef,
    /// Own generic parameters; always zero for non-methods.
    pub type_parameter_count: u32,
    /// Parameter signature for methods and indexers.
    pub parameters: SmallVec<[Parameter; 4]>,
}

impl MemberDef {
    pub fn is_method(&self) -> bool {
        self.kind == MemberKind::Method
    }

    pub fn is_override(&self) -> bool {
        self.flags.contains(MemberFlags::OVERRIDE)
    }

    pub fn is_indexer(&self) -> bool {
        self.kind == MemberKind::Property && self.flags.contains(MemberFlags::INDEXER)
    }
}

#[derive(Clone, Debug)]
pub struct ModuleDef {
    pub name: Atom,
    /// Friend modules that may see this module's internals.
    pub internals_visible_to: Vec<ModuleId>,
}
