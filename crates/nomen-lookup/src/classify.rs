use crate::{Candidates, ResolveResult};
use nomen_model::{TypeId, TypeSystem};
use tracing::trace;

/// Turns surviving candidates into one [`ResolveResult`].
pub struct ResultClassifier<'a> {
    db: &'a dyn TypeSystem,
}

impl<'a> ResultClassifier<'a> {
    pub fn new(db: &'a dyn TypeSystem) -> Self {
        Self { db }
    }

    /// `survivors` must already be in canonical order.
    ///
    /// `receiver`, `name` and `arity` only feed the unknown-member result.
    pub fn classify(
        &self,
        survivors: &Candidates<'_>,
        receiver: TypeId,
        name: &str,
        arity: u32,
    ) -> ResolveResult {
        let result = self.classify_inner(survivors, receiver, name, arity);
        trace!(
            kind = result.kind_name(),
            types = survivors.types.len(),
            members = survivors.members.len(),
            "classified"
        );
        result
    }

    fn classify_inner(
        &self,
        survivors: &Candidates<'_>,
        receiver: TypeId,
        name: &str,
        arity: u32,
    ) -> ResolveResult {
        let Candidates { types, members } = survivors;

        if let Some(first) = types.first() {
            return if types.len() == 1 && members.is_empty() {
                ResolveResult::Type(first.id)
            } else {
                ResolveResult::AmbiguousType(first.id)
            };
        }

        if members.is_empty() {
            return ResolveResult::UnknownMember {
                receiver,
                name: name.to_string(),
                arity,
            };
        }

        let Some(non_method) = members.iter().find(|m| !m.def.is_method()) else {
            return ResolveResult::MethodGroup(members.iter().map(|m| m.id).collect());
        };

        let return_type = self.db.resolve_type_ref(&non_method.def.return_type);
        if members.iter().any(|m| m.def.is_method()) {
            ResolveResult::AmbiguousMember {
                member: non_method.id,
                return_type,
            }
        } else {
            ResolveResult::Member {
                member: non_method.id,
                return_type,
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/classify_tests.rs"]
mod tests;
