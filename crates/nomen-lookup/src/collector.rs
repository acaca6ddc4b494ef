//! Candidate collection.
//!
//! Candidates come out of the collaborator in canonical order (base-most
//! declaring types first, declaration order within a type). Each candidate
//! keeps its position in that order as an ordinal; hiding reorders nothing,
//! and survivors are re-sorted by ordinal, which is what makes "first
//! element" deterministic no matter how a rule consumes its input.

use crate::{AccessibilityChecker, DerivationCache, InvocationFilter, LookupError};
use nomen_common::Atom;
use nomen_model::{EntityRef, MemberDef, MemberId, TypeDef, TypeId, TypeSystem};
use tracing::trace;

#[derive(Copy, Clone, Debug)]
pub struct TypeCandidate<'a> {
    pub id: TypeId,
    pub ordinal: u32,
    pub def: &'a TypeDef,
}

#[derive(Copy, Clone, Debug)]
pub struct MemberCandidate<'a> {
    pub id: MemberId,
    pub ordinal: u32,
    pub def: &'a MemberDef,
}

/// Nested types and members sharing the looked-up name.
#[derive(Clone, Debug, Default)]
pub struct Candidates<'a> {
    pub types: Vec<TypeCandidate<'a>>,
    pub members: Vec<MemberCandidate<'a>>,
}

impl Candidates<'_> {
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.members.is_empty()
    }

    /// Restore canonical order after a rule pass.
    pub fn sort_canonical(&mut self) {
        self.types.sort_by_key(|t| t.ordinal);
        self.members.sort_by_key(|m| m.ordinal);
    }
}

pub struct TypeMemberCollector<'a> {
    db: &'a dyn TypeSystem,
    checker: AccessibilityChecker<'a>,
    invocation_filter: InvocationFilter,
}

impl<'a> TypeMemberCollector<'a> {
    pub fn new(
        db: &'a dyn TypeSystem,
        checker: AccessibilityChecker<'a>,
        invocation_filter: InvocationFilter,
    ) -> Self {
        Self {
            db,
            checker,
            invocation_filter,
        }
    }

    /// Candidates for `receiver.name<arity>`.
    pub fn collect(
        &self,
        receiver: TypeId,
        name: Atom,
        arity: u32,
        is_invocation: bool,
        allow_protected: bool,
        derivation: &mut DerivationCache<'_>,
    ) -> Result<Candidates<'a>, LookupError> {
        let types = if is_invocation {
            Vec::new()
        } else {
            self.collect_nested_types(receiver, name, arity, derivation)?
        };

        let ids = self.db.members(receiver, &mut |m: &MemberDef| {
            m.name == name
                && !m.is_override()
                && !m.is_indexer()
                && (arity == 0 || (m.is_method() && m.type_parameter_count == arity))
        });
        let mut members = self.accessible(ids, allow_protected, derivation)?;

        if is_invocation {
            let before = members.len();
            match self.invocation_filter {
                InvocationFilter::KeepInvocable => {
                    members.retain(|m| self.checker.is_invocable(m.def));
                }
                InvocationFilter::RemoveInvocable => {
                    members.retain(|m| !self.checker.is_invocable(m.def));
                }
                InvocationFilter::Disabled => {}
            }
            trace!(
                filter = ?self.invocation_filter,
                before,
                after = members.len(),
                "invocation filter"
            );
        }

        Ok(Candidates { types, members })
    }

    /// Accessible nested types named `name` with exactly `arity` type
    /// parameters. Nested types are checked with protected access allowed:
    /// their visibility follows the enclosing relationship, not the receiver.
    pub fn collect_nested_types(
        &self,
        receiver: TypeId,
        name: Atom,
        arity: u32,
        derivation: &mut DerivationCache<'_>,
    ) -> Result<Vec<TypeCandidate<'a>>, LookupError> {
        let ids = self.db.nested_types(receiver, &mut |t: &TypeDef| {
            t.name == name && t.type_parameter_count == arity
        });
        let mut types = Vec::with_capacity(ids.len());
        for (ordinal, id) in ids.into_iter().enumerate() {
            let def = self
                .db
                .type_def(id)
                .ok_or_else(|| LookupError::state(format!("dangling nested type #{}", id.0)))?;
            if self
                .checker
                .is_accessible(EntityRef::Type(id), true, derivation)?
            {
                types.push(TypeCandidate {
                    id,
                    ordinal: ordinal as u32,
                    def,
                });
            }
        }
        Ok(types)
    }

    /// Accessible, non-override indexers of `receiver`.
    pub fn collect_indexers(
        &self,
        receiver: TypeId,
        allow_protected: bool,
        derivation: &mut DerivationCache<'_>,
    ) -> Result<Vec<MemberCandidate<'a>>, LookupError> {
        let ids = self
            .db
            .members(receiver, &mut |m: &MemberDef| m.is_indexer() && !m.is_override());
        self.accessible(ids, allow_protected, derivation)
    }

    /// Every accessible, non-override member reachable by name.
    pub fn collect_accessible_members(
        &self,
        receiver: TypeId,
        allow_protected: bool,
        derivation: &mut DerivationCache<'_>,
    ) -> Result<Vec<MemberCandidate<'a>>, LookupError> {
        let ids = self
            .db
            .members(receiver, &mut |m: &MemberDef| !m.is_indexer() && !m.is_override());
        self.accessible(ids, allow_protected, derivation)
    }

    fn accessible(
        &self,
        ids: Vec<MemberId>,
        allow_protected: bool,
        derivation: &mut DerivationCache<'_>,
    ) -> Result<Vec<MemberCandidate<'a>>, LookupError> {
        let mut members = Vec::with_capacity(ids.len());
        for (ordinal, id) in ids.into_iter().enumerate() {
            let def = self
                .db
                .member(id)
                .ok_or_else(|| LookupError::state(format!("dangling member #{}", id.0)))?;
            if self
                .checker
                .is_member_accessible(def, allow_protected, derivation)
            {
                members.push(MemberCandidate {
                    id,
                    ordinal: ordinal as u32,
                    def,
                });
            }
        }
        Ok(members)
    }
}
