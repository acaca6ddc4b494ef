use anyhow::{Context, Result};
use nomen_lookup::{LookupOptions, MemberLookup, ResolveResult, ResultFormatter};
use nomen_model::{LoadedModel, MemberId, load_model};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

use crate::args::{CliArgs, Query};
use crate::config::{Settings, find_config, load_config, resolve_settings};

/// What a query found, in a shape both the text reporter and `--json` use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub query: Query,
    pub receiver: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub arity: u32,
    pub invocation: bool,
    /// Result tag for `lookup`/`type`, the query name for list queries.
    pub kind: String,
    pub found: bool,
    pub ambiguous: bool,
    /// Rendered types or member signatures, in canonical order.
    pub entries: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
}

pub struct RunOutput {
    pub report: Report,
    pub settings: Settings,
}

pub fn run(args: &CliArgs, cwd: &Path) -> Result<RunOutput> {
    let config_path = find_config(args.project.as_deref(), cwd)?;
    let config = config_path.as_deref().map(load_config).transpose()?;
    let config_dir = config_path
        .as_deref()
        .and_then(Path::parent)
        .unwrap_or(cwd);
    let settings = resolve_settings(args, config.as_ref(), config_dir, cwd)?;
    debug!(?settings, config = ?config_path, "resolved settings");

    let source = std::fs::read_to_string(&settings.model)
        .with_context(|| format!("failed to read model: {}", settings.model.display()))?;
    let model = load_model(&source)
        .with_context(|| format!("failed to load model: {}", settings.model.display()))?;
    info!(
        types = model.types.len(),
        modules = model.modules.len(),
        "model loaded"
    );

    let report = execute(args, &settings, &model)?;
    Ok(RunOutput { report, settings })
}

/// Run the query against an already loaded model.
pub fn execute(args: &CliArgs, settings: &Settings, model: &LoadedModel) -> Result<Report> {
    let receiver = type_key(model, &args.receiver, "receiver type")?;
    let current_type = settings
        .current_type
        .as_deref()
        .map(|key| type_key(model, key, "current type"))
        .transpose()?;
    let current_module = settings
        .current_module
        .as_deref()
        .map(|name| {
            model
                .module_id(name)
                .with_context(|| format!("unknown current module `{name}`"))
        })
        .transpose()?;
    let root_type = settings
        .root_type
        .as_deref()
        .map(|key| type_key(model, key, "root type"))
        .transpose()?;

    let lookup = MemberLookup::new(&model.table, current_type, current_module)?.with_options(
        LookupOptions {
            invocation_filter: settings.invocation_filter,
            root_type,
        },
    );
    let formatter = ResultFormatter::new(&model.table);

    let mut report = Report {
        query: args.query,
        receiver: args.receiver.clone(),
        name: args.name.clone(),
        arity: args.arity,
        invocation: settings.invocation,
        kind: String::new(),
        found: false,
        ambiguous: false,
        entries: Vec::new(),
        return_type: None,
    };

    match args.query {
        Query::Lookup => {
            let name = required_name(args)?;
            let result = lookup.lookup(receiver, name, args.arity, settings.invocation)?;
            fill_from_result(&mut report, &formatter, &result);
        }
        Query::Type => {
            let name = required_name(args)?;
            let result = lookup.lookup_type(receiver, name, args.arity)?;
            fill_from_result(&mut report, &formatter, &result);
        }
        Query::Indexers => {
            let indexers = lookup.lookup_indexers(receiver)?;
            fill_from_list(&mut report, &formatter, "indexers", &indexers);
        }
        Query::Members => {
            let members = lookup.accessible_members(receiver)?;
            fill_from_list(&mut report, &formatter, "members", &members);
        }
    }

    Ok(report)
}

fn type_key(model: &LoadedModel, key: &str, what: &str) -> Result<nomen_model::TypeId> {
    model
        .type_id(key)
        .with_context(|| format!("unknown {what} `{key}`"))
}

fn required_name(args: &CliArgs) -> Result<&str> {
    args.name
        .as_deref()
        .with_context(|| format!("a name is required for `{:?}` queries", args.query))
}

fn fill_from_result(report: &mut Report, formatter: &ResultFormatter<'_>, result: &ResolveResult) {
    report.kind = result.kind_name().to_string();
    report.found = !result.is_unknown();
    report.ambiguous = result.is_ambiguous();
    match result {
        ResolveResult::Type(ty) | ResolveResult::AmbiguousType(ty) => {
            report.entries.push(formatter.type_name(*ty));
        }
        ResolveResult::Member {
            member,
            return_type,
        }
        | ResolveResult::AmbiguousMember {
            member,
            return_type,
        } => {
            report.entries.push(formatter.member_signature(*member));
            report.return_type = Some(formatter.resolved_type(return_type));
        }
        ResolveResult::MethodGroup(methods) => {
            report
                .entries
                .extend(methods.iter().map(|m| formatter.member_signature(*m)));
        }
        ResolveResult::UnknownMember { .. } => {}
    }
}

fn fill_from_list(
    report: &mut Report,
    formatter: &ResultFormatter<'_>,
    kind: &str,
    members: &[MemberId],
) {
    report.kind = kind.to_string();
    report.found = !members.is_empty();
    report.entries = members
        .iter()
        .map(|m| formatter.member_signature(*m))
        .collect();
}

#[cfg(test)]
#[path = "../tests/driver_tests.rs"]
mod tests;
