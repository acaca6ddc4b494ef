use nomen_model::TypeId;
use std::str::FromStr;

/// What happens to non-invocable members when the identifier is used as a
/// call target.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum InvocationFilter {
    /// Keep only members that can be called: methods, events, and values
    /// of dynamic or delegate type.
    #[default]
    KeepInvocable,
    /// Drop the members that can be called. Reproduces the legacy
    /// collector, which applied the invocability test inverted.
    RemoveInvocable,
    /// No filtering; invocation position only suppresses nested types.
    Disabled,
}

impl FromStr for InvocationFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keepInvocable" | "keep-invocable" => Ok(InvocationFilter::KeepInvocable),
            "removeInvocable" | "remove-invocable" => Ok(InvocationFilter::RemoveInvocable),
            "disabled" | "none" => Ok(InvocationFilter::Disabled),
            other => Err(format!(
                "unknown invocation filter '{other}'. Expected keepInvocable, removeInvocable, or disabled"
            )),
        }
    }
}

/// Knobs for a [`MemberLookup`](crate::MemberLookup).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LookupOptions {
    pub invocation_filter: InvocationFilter,
    /// Universal root object type for the class-hides-interface rule.
    /// Falls back to [`TypeSystem::root_object`](nomen_model::TypeSystem::root_object).
    pub root_type: Option<TypeId>,
}
