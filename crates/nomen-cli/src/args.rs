use clap::{Parser, ValueEnum};
use nomen_lookup::InvocationFilter;
use serde::Serialize;
use std::path::PathBuf;

/// CLI arguments for the nomen binary.
#[derive(Parser, Debug)]
#[command(
    name = "nomen",
    version,
    about = "Resolve a name against a type model the way a C#-style front end would"
)]
pub struct CliArgs {
    /// Receiver type key, e.g. `Derived` or `Outer.Inner`.
    pub receiver: String,

    /// Member or nested type name. Required for `lookup` and `type` queries.
    pub name: Option<String>,

    // ==================== Inputs ====================
    /// Path to the JSON type model. Overrides `model` in nomen.json.
    #[arg(short = 'm', long)]
    pub model: Option<PathBuf>,

    /// Path to nomen.json or a directory containing it.
    #[arg(short = 'p', long = "project")]
    pub project: Option<PathBuf>,

    // ==================== Query ====================
    /// What to ask about the receiver.
    #[arg(short = 'q', long, value_enum, default_value_t = Query::Lookup)]
    pub query: Query,

    /// Number of type arguments written after the name.
    #[arg(short = 'a', long, default_value_t = 0)]
    pub arity: u32,

    /// Treat the name as a call target (`x.Name(...)`).
    #[arg(short = 'i', long)]
    pub invoke: bool,

    // ==================== Context ====================
    /// Type the lookup happens inside of.
    #[arg(long = "currentType", alias = "current-type")]
    pub current_type: Option<String>,

    /// Module the lookup happens inside of.
    #[arg(long = "currentModule", alias = "current-module")]
    pub current_module: Option<String>,

    // ==================== Lookup Options ====================
    /// How invocation position treats non-invocable members.
    #[arg(long = "invocationFilter", alias = "invocation-filter", value_enum)]
    pub invocation_filter: Option<FilterArg>,

    /// Key of the universal root object type.
    #[arg(long = "rootType", alias = "root-type")]
    pub root_type: Option<String>,

    // ==================== Output ====================
    /// Print a JSON report instead of text.
    #[arg(long)]
    pub json: bool,

    /// Colorize text output. Defaults to whether stdout is a terminal.
    #[arg(long)]
    pub pretty: Option<bool>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Query {
    /// Full member lookup: nested types and members.
    Lookup,
    /// Nested types only.
    Type,
    /// Indexers of the receiver.
    Indexers,
    /// Every accessible member, as for a completion list.
    Members,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    KeepInvocable,
    RemoveInvocable,
    Disabled,
}

impl From<FilterArg> for InvocationFilter {
    fn from(value: FilterArg) -> Self {
        match value {
            FilterArg::KeepInvocable => InvocationFilter::KeepInvocable,
            FilterArg::RemoveInvocable => InvocationFilter::RemoveInvocable,
            FilterArg::Disabled => InvocationFilter::Disabled,
        }
    }
}
