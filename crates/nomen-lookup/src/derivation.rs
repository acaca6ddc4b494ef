use nomen_common::limits::DERIVATION_CACHE_CAPACITY;
use nomen_model::{TypeId, TypeSystem};
use rustc_hash::FxHashMap;

/// Per-call memo of the derivation predicate.
///
/// Hiding compares candidates pairwise and each comparison may walk a type
/// chain in the collaborator; caching by (subtype, supertype) keeps a lookup
/// near O(n * depth). The cache lives for one lookup call only, so it never
/// needs invalidation and is never shared between threads.
pub struct DerivationCache<'a> {
    db: &'a dyn TypeSystem,
    cache: FxHashMap<(TypeId, TypeId), bool>,
    hits: u32,
}

impl<'a> DerivationCache<'a> {
    pub fn new(db: &'a dyn TypeSystem) -> Self {
        Self {
            db,
            cache: FxHashMap::with_capacity_and_hasher(DERIVATION_CACHE_CAPACITY, Default::default()),
            hits: 0,
        }
    }

    /// Reflexive derivation: `sub` is `sup` or derives from it.
    pub fn is_derived_from(&mut self, sub: TypeId, sup: TypeId) -> bool {
        if sub == sup {
            return true;
        }
        if let Some(&cached) = self.cache.get(&(sub, sup)) {
            self.hits += 1;
            return cached;
        }
        let derived = self.db.is_derived_from(sub, sup);
        self.cache.insert((sub, sup), derived);
        derived
    }

    /// Number of distinct pairs asked of the collaborator.
    pub fn misses(&self) -> usize {
        self.cache.len()
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }
}
