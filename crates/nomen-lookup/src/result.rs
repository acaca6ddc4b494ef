use nomen_model::{MemberId, ResolvedType, TypeId};

/// What an identifier denotes. Exactly one is produced per lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveResult {
    /// A single nested type and no members.
    Type(TypeId),
    /// Nested types survived alongside other types or members; the first
    /// one in canonical order is reported.
    AmbiguousType(TypeId),
    /// A single non-method member.
    Member {
        member: MemberId,
        return_type: ResolvedType,
    },
    /// A non-method member next to methods. Only the first non-method
    /// conflict is reported.
    AmbiguousMember {
        member: MemberId,
        return_type: ResolvedType,
    },
    /// Methods only, in canonical order. Handed to overload resolution.
    MethodGroup(Vec<MemberId>),
    /// Nothing by this name and arity is visible on the receiver.
    UnknownMember {
        receiver: TypeId,
        name: String,
        arity: u32,
    },
}

impl ResolveResult {
    pub fn is_ambiguous(&self) -> bool {
        matches!(
            self,
            ResolveResult::AmbiguousType(_) | ResolveResult::AmbiguousMember { .. }
        )
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ResolveResult::UnknownMember { .. })
    }

    /// Stable tag name, used by the CLI and in logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ResolveResult::Type(_) => "type",
            ResolveResult::AmbiguousType(_) => "ambiguousType",
            ResolveResult::Member { .. } => "member",
            ResolveResult::AmbiguousMember { .. } => "ambiguousMember",
            ResolveResult::MethodGroup(_) => "methodGroup",
            ResolveResult::UnknownMember { .. } => "unknownMember",
        }
    }

    /// The methods of a method group, empty for every other outcome.
    pub fn methods(&self) -> &[MemberId] {
        match self {
            ResolveResult::MethodGroup(methods) => methods,
            _ => &[],
        }
    }
}
