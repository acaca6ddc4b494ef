//! Accessibility domains.
//!
//! | Accessibility | Accessible when |
//! |---|---|
//! | None | never |
//! | Private | the declaring type is the current type |
//! | Public | always |
//! | Protected | protected access is allowed and the current type derives from the declaring type |
//! | Internal | the declaring module exposes its internals to the current module |
//! | ProtectedOrInternal | protected check or internal check |
//! | ProtectedAndInternal | protected check and internal check |

use crate::{DerivationCache, LookupError};
use nomen_model::{
    Accessibility, EntityRef, MemberDef, MemberKind, ModuleId, ResolvedType, TypeId, TypeSystem,
};

/// What accessibility needs to know about an entity.
#[derive(Copy, Clone, Debug)]
struct EntityAccess {
    accessibility: Accessibility,
    declaring_type: Option<TypeId>,
    module: Option<ModuleId>,
}

/// Evaluates accessibility from a fixed context (current type and module).
#[derive(Copy, Clone)]
pub struct AccessibilityChecker<'a> {
    db: &'a dyn TypeSystem,
    current_type: Option<TypeId>,
    current_module: Option<ModuleId>,
}

impl<'a> AccessibilityChecker<'a> {
    pub fn new(
        db: &'a dyn TypeSystem,
        current_type: Option<TypeId>,
        current_module: Option<ModuleId>,
    ) -> Self {
        Self {
            db,
            current_type,
            current_module,
        }
    }

    /// Whether `entity` is visible from the current context.
    ///
    /// `allow_protected` is computed once per lookup by
    /// [`is_protected_access_allowed`](Self::is_protected_access_allowed);
    /// nested types are always checked with protected access allowed.
    pub fn is_accessible(
        &self,
        entity: EntityRef,
        allow_protected: bool,
        derivation: &mut DerivationCache<'_>,
    ) -> Result<bool, LookupError> {
        let access = self.entity_access(entity)?;
        Ok(self.check(access, allow_protected, derivation))
    }

    pub(crate) fn is_member_accessible(
        &self,
        member: &MemberDef,
        allow_protected: bool,
        derivation: &mut DerivationCache<'_>,
    ) -> bool {
        let access = EntityAccess {
            accessibility: member.accessibility,
            declaring_type: Some(member.declaring_type),
            module: self
                .db
                .type_def(member.declaring_type)
                .and_then(|def| def.module),
        };
        self.check(access, allow_protected, derivation)
    }

    fn entity_access(&self, entity: EntityRef) -> Result<EntityAccess, LookupError> {
        match entity {
            EntityRef::Type(id) => {
                let def = self
                    .db
                    .type_def(id)
                    .ok_or_else(|| LookupError::argument(format!("unknown type #{}", id.0)))?;
                Ok(EntityAccess {
                    accessibility: def.accessibility,
                    declaring_type: def.declaring_type,
                    module: def.module,
                })
            }
            EntityRef::Member(id) => {
                let def = self
                    .db
                    .member(id)
                    .ok_or_else(|| LookupError::argument(format!("unknown member #{}", id.0)))?;
                Ok(EntityAccess {
                    accessibility: def.accessibility,
                    declaring_type: Some(def.declaring_type),
                    module: self.db.type_def(def.declaring_type).and_then(|t| t.module),
                })
            }
        }
    }

    fn check(
        &self,
        access: EntityAccess,
        allow_protected: bool,
        derivation: &mut DerivationCache<'_>,
    ) -> bool {
        match access.accessibility {
            Accessibility::None => false,
            Accessibility::Private => {
                access.declaring_type.is_some() && access.declaring_type == self.current_type
            }
            Accessibility::Public => true,
            Accessibility::Protected => self.protected_check(access, allow_protected, derivation),
            Accessibility::Internal => self.internal_check(access),
            Accessibility::ProtectedOrInternal => {
                self.protected_check(access, allow_protected, derivation)
                    || self.internal_check(access)
            }
            Accessibility::ProtectedAndInternal => {
                self.protected_check(access, allow_protected, derivation)
                    && self.internal_check(access)
            }
        }
    }

    fn protected_check(
        &self,
        access: EntityAccess,
        allow_protected: bool,
        derivation: &mut DerivationCache<'_>,
    ) -> bool {
        if !allow_protected {
            return false;
        }
        match (self.current_type, access.declaring_type) {
            (Some(current), Some(declaring)) => derivation.is_derived_from(current, declaring),
            _ => false,
        }
    }

    fn internal_check(&self, access: EntityAccess) -> bool {
        match (access.module, self.current_module) {
            (Some(owner), Some(viewer)) => self.db.is_internally_visible(owner, viewer),
            _ => false,
        }
    }

    /// Protected members are reachable through `receiver` only if the
    /// receiver is the current type or derives from it.
    pub fn is_protected_access_allowed(
        &self,
        receiver: TypeId,
        derivation: &mut DerivationCache<'_>,
    ) -> bool {
        self.current_type
            .is_some_and(|current| derivation.is_derived_from(receiver, current))
    }

    /// Whether `member` can be the target of a call.
    pub fn is_invocable(&self, member: &MemberDef) -> bool {
        match member.kind {
            MemberKind::Method | MemberKind::Event => true,
            MemberKind::Property | MemberKind::Field => {
                match self.db.resolve_type_ref(&member.return_type) {
                    ResolvedType::Dynamic => true,
                    ResolvedType::Definition(ty) => self.db.is_delegate(ty),
                    ResolvedType::MethodTypeParameter(_) | ResolvedType::Unknown(_) => false,
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/accessibility_tests.rs"]
mod tests;
