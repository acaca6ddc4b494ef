//! Hiding rules.
//!
//! Four rules run strictly in order, each to a fixed point:
//!
//! - A: a nested type hides a same-arity nested type of a base type
//! - B: a nested type hides members of its declaring type and of its bases
//! - C: a member hides members of base types (methods only when their
//!   parameter signatures are equal)
//! - D: for type-parameter receivers, a member of a class constraint hides
//!   members declared in interfaces
//!
//! Every rule is a pairwise `hides(hider, hidden)` predicate. A candidate
//! survives iff no surviving candidate hides it; the answer is computed by
//! memoized descent over the relation, so it does not depend on the order
//! the candidates arrive in.

use crate::{Candidates, DerivationCache, LookupError, MemberCandidate, TypeCandidate};
use nomen_model::{MemberDef, TypeId, TypeSystem};
use smallvec::SmallVec;
use tracing::{debug, trace};

/// Parameter-signature equality used by the member-hides-member rule.
///
/// Parameters compare by type reference and by-reference marker. Method type
/// parameters are positional, so `M<T>(T)` and `M<U>(U)` are equal.
pub fn signatures_equal(a: &MemberDef, b: &MemberDef) -> bool {
    a.parameters.len() == b.parameters.len()
        && a.parameters
            .iter()
            .zip(b.parameters.iter())
            .all(|(pa, pb)| pa.ty == pb.ty && pa.by_ref == pb.by_ref)
}

// =============================================================================
// Fixed point
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Fate {
    Pending,
    InProgress,
    Survives,
    Hidden,
}

/// Keep the items no surviving item hides. Input order is preserved.
fn retain_unhidden<T>(
    items: Vec<T>,
    rule: &'static str,
    mut hides: impl FnMut(&T, &T) -> bool,
) -> Result<Vec<T>, LookupError> {
    if items.len() < 2 {
        return Ok(items);
    }

    let hiders: Vec<SmallVec<[u32; 4]>> = items
        .iter()
        .enumerate()
        .map(|(i, hidden)| {
            items
                .iter()
                .enumerate()
                .filter(|&(j, hider)| j != i && hides(hider, hidden))
                .map(|(j, _)| j as u32)
                .collect()
        })
        .collect();

    let fates = resolve_fates(&hiders, rule)?;
    let before = items.len();
    let survivors: Vec<T> = items
        .into_iter()
        .zip(fates)
        .filter_map(|(item, fate)| (fate == Fate::Survives).then_some(item))
        .collect();
    trace!(rule, before, after = survivors.len(), "hiding rule");
    Ok(survivors)
}

fn resolve_fates(hiders: &[SmallVec<[u32; 4]>], rule: &'static str) -> Result<Vec<Fate>, LookupError> {
    let mut fates = vec![Fate::Pending; hiders.len()];
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for start in 0..hiders.len() {
        if fates[start] != Fate::Pending {
            continue;
        }
        fates[start] = Fate::InProgress;
        stack.push((start, 0));

        while let Some(frame) = stack.last_mut() {
            let (index, next) = *frame;
            let Some(&hider) = hiders[index].get(next) else {
                // No surviving hider.
                fates[index] = Fate::Survives;
                stack.pop();
                continue;
            };
            frame.1 += 1;

            let hider = hider as usize;
            match fates[hider] {
                Fate::Survives => {
                    fates[index] = Fate::Hidden;
                    stack.pop();
                }
                Fate::Hidden => {}
                Fate::Pending => {
                    fates[hider] = Fate::InProgress;
                    stack.push((hider, 0));
                }
                Fate::InProgress => {
                    return Err(LookupError::state(format!(
                        "cyclic hiding relation under {rule}"
                    )));
                }
            }
        }
    }

    Ok(fates)
}

// =============================================================================
// Resolver
// =============================================================================

/// Where a member was declared, as far as the class-hides-interface rule
/// cares.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Origin {
    Interface,
    Class,
    Root,
}

pub struct HidingResolver<'a, 'c> {
    db: &'a dyn TypeSystem,
    derivation: &'c mut DerivationCache<'a>,
    root_object: Option<TypeId>,
}

impl<'a, 'c> HidingResolver<'a, 'c> {
    pub fn new(
        db: &'a dyn TypeSystem,
        derivation: &'c mut DerivationCache<'a>,
        root_object: Option<TypeId>,
    ) -> Self {
        Self {
            db,
            derivation,
            root_object,
        }
    }

    /// Run rules A through D and return the survivors in canonical order.
    pub fn apply(
        &mut self,
        candidates: Candidates<'a>,
        receiver_is_type_parameter: bool,
    ) -> Result<Candidates<'a>, LookupError> {
        let Candidates { types, members } = candidates;
        let (types_in, members_in) = (types.len(), members.len());

        let types = self.hide_types(types)?;
        let members = self.hide_members_by_types(&types, members);
        let members = self.hide_members(members)?;
        let members = if receiver_is_type_parameter {
            self.hide_interface_members(members)?
        } else {
            members
        };

        let mut survivors = Candidates { types, members };
        survivors.sort_canonical();
        debug!(
            types_in,
            members_in,
            types_out = survivors.types.len(),
            members_out = survivors.members.len(),
            "hiding applied"
        );
        Ok(survivors)
    }

    /// Rule A: type hides type.
    pub fn hide_types(
        &mut self,
        types: Vec<TypeCandidate<'a>>,
    ) -> Result<Vec<TypeCandidate<'a>>, LookupError> {
        let derivation = &mut *self.derivation;
        retain_unhidden(types, "type-hides-type", |hider, hidden| {
            if hider.def.type_parameter_count != hidden.def.type_parameter_count {
                return false;
            }
            match (hider.def.declaring_type, hidden.def.declaring_type) {
                (Some(d2), Some(d1)) => d1 != d2 && derivation.is_derived_from(d2, d1),
                _ => false,
            }
        })
    }

    /// Rule B: type hides member. Types are never hidden by members, so this
    /// is a plain filter against the surviving types.
    fn hide_members_by_types(
        &mut self,
        types: &[TypeCandidate<'a>],
        mut members: Vec<MemberCandidate<'a>>,
    ) -> Vec<MemberCandidate<'a>> {
        if types.is_empty() || members.is_empty() {
            return members;
        }
        let before = members.len();
        let derivation = &mut *self.derivation;
        members.retain(|m| {
            !types.iter().any(|t| {
                t.def
                    .declaring_type
                    .is_some_and(|dt| derivation.is_derived_from(dt, m.def.declaring_type))
            })
        });
        trace!(
            rule = "type-hides-member",
            before,
            after = members.len(),
            "hiding rule"
        );
        members
    }

    /// Rule C: member hides member.
    ///
    /// Signatures are compared when both members are methods, or both are
    /// indexers; otherwise the more derived declaring type is enough.
    pub fn hide_members(
        &mut self,
        members: Vec<MemberCandidate<'a>>,
    ) -> Result<Vec<MemberCandidate<'a>>, LookupError> {
        let derivation = &mut *self.derivation;
        retain_unhidden(members, "member-hides-member", |hider, hidden| {
            let (d2, d1) = (hider.def.declaring_type, hidden.def.declaring_type);
            if d1 == d2 || !derivation.is_derived_from(d2, d1) {
                return false;
            }
            let compare_signatures = (hider.def.is_method() && hidden.def.is_method())
                || (hider.def.is_indexer() && hidden.def.is_indexer());
            !compare_signatures || signatures_equal(hider.def, hidden.def)
        })
    }

    /// Rule D: class hides interface (type-parameter receivers only).
    fn hide_interface_members(
        &mut self,
        members: Vec<MemberCandidate<'a>>,
    ) -> Result<Vec<MemberCandidate<'a>>, LookupError> {
        let tagged = members
            .into_iter()
            .map(|m| -> Result<_, LookupError> { Ok((m, self.origin(m.def.declaring_type)?)) })
            .collect::<Result<Vec<_>, _>>()?;

        let survivors = retain_unhidden(tagged, "class-hides-interface", |hider, hidden| {
            hider.1 == Origin::Class && hidden.1 == Origin::Interface
        })?;
        Ok(survivors.into_iter().map(|(m, _)| m).collect())
    }

    fn origin(&self, declaring_type: TypeId) -> Result<Origin, LookupError> {
        let def = self.db.type_def(declaring_type).ok_or_else(|| {
            LookupError::state(format!("dangling declaring type #{}", declaring_type.0))
        })?;
        Ok(if def.kind.is_interface() {
            Origin::Interface
        } else if Some(declaring_type) == self.root_object {
            Origin::Root
        } else {
            Origin::Class
        })
    }
}

#[cfg(test)]
#[path = "../tests/hiding_tests.rs"]
mod tests;
