use crate::{
    AccessibilityChecker, Candidates, DerivationCache, HidingResolver, LookupError, LookupOptions,
    MemberCandidate, ResolveResult, ResultClassifier, TypeMemberCollector,
};
use nomen_model::{EntityRef, MemberId, ModuleId, TypeDef, TypeId, TypeKind, TypeSystem};
use rustc_hash::FxHashMap;
use tracing::{Level, debug, span};

/// Member lookup from a fixed resolution context.
///
/// The context (current type and module) is validated once at construction;
/// every query after that is a pure function of the context, the options and
/// its arguments. Nothing is cached between calls.
#[derive(Clone)]
pub struct MemberLookup<'a> {
    db: &'a dyn TypeSystem,
    current_type: Option<TypeId>,
    current_module: Option<ModuleId>,
    options: LookupOptions,
}

impl<'a> MemberLookup<'a> {
    pub fn new(
        db: &'a dyn TypeSystem,
        current_type: Option<TypeId>,
        current_module: Option<ModuleId>,
    ) -> Result<Self, LookupError> {
        if let Some(ty) = current_type.filter(|&ty| db.type_def(ty).is_none()) {
            return Err(LookupError::argument(format!("unknown current type #{}", ty.0)));
        }
        if let Some(module) = current_module.filter(|&m| db.module(m).is_none()) {
            return Err(LookupError::argument(format!(
                "unknown current module #{}",
                module.0
            )));
        }
        Ok(Self {
            db,
            current_type,
            current_module,
            options: LookupOptions::default(),
        })
    }

    pub fn with_options(mut self, options: LookupOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &LookupOptions {
        &self.options
    }

    pub fn current_type(&self) -> Option<TypeId> {
        self.current_type
    }

    pub fn current_module(&self) -> Option<ModuleId> {
        self.current_module
    }

    fn checker(&self) -> AccessibilityChecker<'a> {
        AccessibilityChecker::new(self.db, self.current_type, self.current_module)
    }

    fn collector(&self) -> TypeMemberCollector<'a> {
        TypeMemberCollector::new(self.db, self.checker(), self.options.invocation_filter)
    }

    fn root_object(&self) -> Option<TypeId> {
        self.options.root_type.or_else(|| self.db.root_object())
    }

    fn receiver(&self, receiver: TypeId) -> Result<&'a TypeDef, LookupError> {
        self.db
            .type_def(receiver)
            .ok_or_else(|| LookupError::argument(format!("unknown receiver type #{}", receiver.0)))
    }

    // =========================================================================
    // Predicates
    // =========================================================================

    pub fn is_accessible(
        &self,
        entity: EntityRef,
        allow_protected: bool,
    ) -> Result<bool, LookupError> {
        let mut derivation = DerivationCache::new(self.db);
        self.checker()
            .is_accessible(entity, allow_protected, &mut derivation)
    }

    pub fn is_invocable(&self, member: MemberId) -> Result<bool, LookupError> {
        let def = self
            .db
            .member(member)
            .ok_or_else(|| LookupError::argument(format!("unknown member #{}", member.0)))?;
        Ok(self.checker().is_invocable(def))
    }

    pub fn is_protected_access_allowed(&self, receiver: TypeId) -> Result<bool, LookupError> {
        self.receiver(receiver)?;
        let mut derivation = DerivationCache::new(self.db);
        Ok(self
            .checker()
            .is_protected_access_allowed(receiver, &mut derivation))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Resolve `receiver.name<arity>`.
    ///
    /// In invocation position nested types are not considered and members
    /// pass through the configured [`InvocationFilter`](crate::InvocationFilter).
    pub fn lookup(
        &self,
        receiver: TypeId,
        name: &str,
        arity: u32,
        is_invocation: bool,
    ) -> Result<ResolveResult, LookupError> {
        let _span = span!(
            Level::DEBUG,
            "lookup",
            receiver = receiver.0,
            member = name,
            arity,
            is_invocation
        )
        .entered();

        let receiver_def = self.receiver(receiver)?;
        if name.is_empty() {
            return Err(LookupError::argument("empty member name"));
        }
        let Some(atom) = self.db.atom(name) else {
            // Never interned, so nothing in the model carries it.
            return Ok(unknown(receiver, name, arity));
        };

        let mut derivation = DerivationCache::new(self.db);
        let allow_protected = self
            .checker()
            .is_protected_access_allowed(receiver, &mut derivation);

        let candidates = self.collector().collect(
            receiver,
            atom,
            arity,
            is_invocation,
            allow_protected,
            &mut derivation,
        )?;
        debug!(
            allow_protected,
            types = candidates.types.len(),
            members = candidates.members.len(),
            "collected"
        );

        let survivors = HidingResolver::new(self.db, &mut derivation, self.root_object())
            .apply(candidates, receiver_def.kind == TypeKind::TypeParameter)?;
        let result = ResultClassifier::new(self.db).classify(&survivors, receiver, name, arity);

        debug!(
            result = result.kind_name(),
            derivation_hits = derivation.hits(),
            derivation_misses = derivation.misses(),
            "lookup done"
        );
        Ok(result)
    }

    /// Resolve a nested type `declaring_type.name<arity>`, as in a qualified
    /// type name. Members are not considered.
    pub fn lookup_type(
        &self,
        declaring_type: TypeId,
        name: &str,
        arity: u32,
    ) -> Result<ResolveResult, LookupError> {
        let _span = span!(
            Level::DEBUG,
            "lookup_type",
            declaring_type = declaring_type.0,
            type_name = name,
            arity
        )
        .entered();

        self.receiver(declaring_type)?;
        if name.is_empty() {
            return Err(LookupError::argument("empty type name"));
        }
        let Some(atom) = self.db.atom(name) else {
            return Ok(unknown(declaring_type, name, arity));
        };

        let mut derivation = DerivationCache::new(self.db);
        let types = self
            .collector()
            .collect_nested_types(declaring_type, atom, arity, &mut derivation)?;
        let mut survivors = Candidates {
            types: HidingResolver::new(self.db, &mut derivation, self.root_object())
                .hide_types(types)?,
            members: Vec::new(),
        };
        survivors.sort_canonical();

        Ok(ResultClassifier::new(self.db).classify(&survivors, declaring_type, name, arity))
    }

    /// Accessible indexers of `receiver`, after hiding by signature.
    pub fn lookup_indexers(&self, receiver: TypeId) -> Result<Vec<MemberId>, LookupError> {
        let _span = span!(Level::DEBUG, "lookup_indexers", receiver = receiver.0).entered();

        self.receiver(receiver)?;
        let mut derivation = DerivationCache::new(self.db);
        let allow_protected = self
            .checker()
            .is_protected_access_allowed(receiver, &mut derivation);
        let indexers = self
            .collector()
            .collect_indexers(receiver, allow_protected, &mut derivation)?;
        let mut survivors = HidingResolver::new(self.db, &mut derivation, self.root_object())
            .hide_members(indexers)?;
        survivors.sort_by_key(|m| m.ordinal);

        debug!(indexers = survivors.len(), "indexers");
        Ok(survivors.into_iter().map(|m| m.id).collect())
    }

    /// Every accessible member reachable on `receiver` by simple name, with
    /// member-hides-member applied within each name. Canonical order.
    pub fn accessible_members(&self, receiver: TypeId) -> Result<Vec<MemberId>, LookupError> {
        let _span = span!(Level::DEBUG, "accessible_members", receiver = receiver.0).entered();

        self.receiver(receiver)?;
        let mut derivation = DerivationCache::new(self.db);
        let allow_protected = self
            .checker()
            .is_protected_access_allowed(receiver, &mut derivation);
        let members =
            self.collector()
                .collect_accessible_members(receiver, allow_protected, &mut derivation)?;

        let mut by_name: FxHashMap<_, Vec<MemberCandidate<'a>>> = FxHashMap::default();
        for member in members {
            by_name.entry(member.def.name).or_default().push(member);
        }

        let mut resolver = HidingResolver::new(self.db, &mut derivation, self.root_object());
        let mut survivors = Vec::new();
        for (_, group) in by_name {
            survivors.extend(resolver.hide_members(group)?);
        }
        survivors.sort_by_key(|m| m.ordinal);

        debug!(members = survivors.len(), "accessible members");
        Ok(survivors.into_iter().map(|m| m.id).collect())
    }
}

fn unknown(receiver: TypeId, name: &str, arity: u32) -> ResolveResult {
    ResolveResult::UnknownMember {
        receiver,
        name: name.to_string(),
        arity,
    }
}

#[cfg(test)]
#[path = "../tests/lookup_tests.rs"]
mod tests;
