//! Member Lookup
//!
//! Given a receiver type, an identifier, a generic arity and whether the
//! identifier is in invocation position, decide which nested type or
//! member(s) the identifier denotes.
//!
//! The pipeline for a single lookup:
//!
//! 1. [`TypeMemberCollector`]: candidates matching name/arity, filtered by
//!    accessibility (and by invocability in invocation position)
//! 2. [`HidingResolver`]: the ordered hiding rules (type hides type, type
//!    hides member, member hides member, class hides interface)
//! 3. [`ResultClassifier`]: one tagged [`ResolveResult`]
//!
//! [`MemberLookup`] holds the resolution context and runs the pipeline. It
//! never mutates the type model and keeps no state between calls, so one
//! instance can serve any number of threads.
mod accessibility;
mod classify;
mod collector;
mod derivation;
mod error;
pub mod format;
mod hiding;
mod lookup;
mod options;
mod result;

pub use accessibility::AccessibilityChecker;
pub use classify::ResultClassifier;
pub use collector::{Candidates, MemberCandidate, TypeMemberCollector, TypeCandidate};
pub use derivation::DerivationCache;
pub use error::LookupError;
pub use format::ResultFormatter;
pub use hiding::{HidingResolver, signatures_equal};
pub use lookup::MemberLookup;
pub use options::{InvocationFilter, LookupOptions};
pub use result::ResolveResult;

#[cfg(test)]
#[path = "../tests/fixtures.rs"]
mod fixtures;
