//! JSON model fixtures.
//!
//! A fixture describes modules, types and members declaratively so a
//! `TypeTable` can be produced without a front end. Types are addressed by
//! key: a top-level type's key is its name, a nested type's key is
//! `<outer key>.<name>`. Type references inside signatures use keys too,
//! plus two spellings of their own:
//!
//! | Spelling | Meaning |
//! |----------|---------|
//! | `dynamic` | the dynamic / any-type marker |
//! | `!!N` | the N-th type parameter of the declaring method |
//!
//! Names that match no key become unresolved references rather than errors,
//! since a front end hands lookup partially bound signatures all the time.

use crate::ModelError;
use crate::def::{Accessibility, MemberFlags, MemberKind, ModuleId, Parameter, TypeId, TypeKind, TypeRef};
use crate::table::{MemberDecl, TypeDecl, TypeTable, TypeTableBuilder};
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ModelFile {
    #[serde(default)]
    pub modules: Vec<ModuleEntry>,
    /// Key of the universal root object type.
    #[serde(default)]
    pub root_type: Option<String>,
    #[serde(default)]
    pub types: Vec<TypeEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleEntry {
    pub name: String,
    #[serde(default)]
    pub internals_visible_to: Vec<String>,
}

/// Accessibility spelled as a name (`"protectedInternal"`) or a raw code.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AccessibilityValue {
    Code(u8),
    Name(String),
}

impl AccessibilityValue {
    fn parse(&self) -> Result<Accessibility, ModelError> {
        match self {
            AccessibilityValue::Code(code) => Accessibility::try_from(*code),
            AccessibilityValue::Name(name) => name.parse(),
        }
    }
}

fn parse_accessibility(value: &Option<AccessibilityValue>) -> Result<Accessibility, ModelError> {
    value
        .as_ref()
        .map_or(Ok(Accessibility::Public), AccessibilityValue::parse)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeEntry {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub accessibility: Option<AccessibilityValue>,
    /// Key of the enclosing type.
    #[serde(default)]
    pub declaring_type: Option<String>,
    #[serde(default)]
    pub bases: Vec<String>,
    #[serde(default)]
    pub type_parameters: u32,
    #[serde(default)]
    pub members: Vec<MemberEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberEntry {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub accessibility: Option<AccessibilityValue>,
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub type_parameters: u32,
    #[serde(default)]
    pub parameters: Vec<ParameterEntry>,
    #[serde(default, rename = "override")]
    pub is_override: bool,
    #[serde(default, rename = "indexer")]
    pub is_indexer: bool,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default, rename = "virtual")]
    pub is_virtual: bool,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
}

impl MemberEntry {
    fn flags(&self) -> MemberFlags {
        let mut flags = MemberFlags::empty();
        flags.set(MemberFlags::OVERRIDE, self.is_override);
        flags.set(MemberFlags::INDEXER, self.is_indexer);
        flags.set(MemberFlags::STATIC, self.is_static);
        flags.set(MemberFlags::VIRTUAL, self.is_virtual);
        flags.set(MemberFlags::ABSTRACT, self.is_abstract);
        flags
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterEntry {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub by_ref: bool,
}

/// A built table together with the key maps used to address it.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub table: TypeTable,
    pub types: IndexMap<String, TypeId>,
    pub modules: IndexMap<String, ModuleId>,
}

impl LoadedModel {
    pub fn type_id(&self, key: &str) -> Option<TypeId> {
        self.types.get(key).copied()
    }

    pub fn module_id(&self, name: &str) -> Option<ModuleId> {
        self.modules.get(name).copied()
    }
}

/// Parse a JSON fixture and build its table.
pub fn load_model(json: &str) -> Result<LoadedModel, ModelError> {
    let file: ModelFile = serde_json::from_str(json)?;
    file.into_model()
}

fn type_key(entry: &TypeEntry) -> String {
    match &entry.declaring_type {
        Some(outer) => format!("{outer}.{}", entry.name),
        None => entry.name.clone(),
    }
}

impl ModelFile {
    pub fn into_model(self) -> Result<LoadedModel, ModelError> {
        let mut builder = TypeTableBuilder::new();

        let mut modules: IndexMap<String, ModuleId> = IndexMap::new();
        for entry in &self.modules {
            if modules.contains_key(&entry.name) {
                return Err(ModelError::DuplicateModule(entry.name.clone()));
            }
            modules.insert(entry.name.clone(), builder.add_module(&entry.name));
        }
        for entry in &self.modules {
            let owner = modules[&entry.name];
            for viewer in &entry.internals_visible_to {
                let viewer = lookup_module(&modules, &entry.name, viewer)?;
                builder.grant_internals(owner, viewer);
            }
        }

        // Keys are handed out sequentially, so every type's key is known
        // before any declaration is added; forward references just work.
        let mut types: IndexMap<String, TypeId> = IndexMap::new();
        for (index, entry) in self.types.iter().enumerate() {
            let key = type_key(entry);
            if types.contains_key(&key) {
                return Err(ModelError::DuplicateType(key));
            }
            types.insert(key, TypeId(TypeId::FIRST_VALID + index as u32));
        }

        for entry in &self.types {
            let key = type_key(entry);
            let mut decl = TypeDecl::new(&entry.name, entry.kind.parse::<TypeKind>()?)
                .with_accessibility(parse_accessibility(&entry.accessibility)?)
                .with_type_parameters(entry.type_parameters);
            if let Some(module) = &entry.module {
                decl = decl.in_module(lookup_module(&modules, &key, module)?);
            }
            if let Some(outer) = &entry.declaring_type {
                decl = decl.nested_in(lookup_type(&types, &key, outer)?);
            }
            let bases = entry
                .bases
                .iter()
                .map(|base| lookup_type(&types, &key, base))
                .collect::<Result<Vec<_>, _>>()?;
            let id = builder.add_type(decl.with_bases(bases));
            debug_assert_eq!(Some(id), types.get(&key).copied());

            for member in &entry.members {
                let return_type = member.return_type.as_deref().unwrap_or("void");
                let decl = MemberDecl::new(
                    &member.name,
                    member.kind.parse::<MemberKind>()?,
                    parse_type_ref(&mut builder, &types, return_type),
                )
                .with_accessibility(parse_accessibility(&member.accessibility)?)
                .with_flags(member.flags())
                .with_type_parameters(member.type_parameters)
                .with_parameters(member.parameters.iter().map(|p| Parameter {
                    ty: parse_type_ref(&mut builder, &types, &p.ty),
                    by_ref: p.by_ref,
                }));
                builder.add_member(id, decl);
            }
        }

        if let Some(root) = &self.root_type {
            builder.set_root_object(lookup_type(&types, "rootType", root)?);
        }

        let table = builder.build()?;
        debug!(types = types.len(), modules = modules.len(), "load_model");
        Ok(LoadedModel {
            table,
            types,
            modules,
        })
    }
}

fn lookup_type(
    types: &IndexMap<String, TypeId>,
    owner: &str,
    name: &str,
) -> Result<TypeId, ModelError> {
    types
        .get(name)
        .copied()
        .ok_or_else(|| ModelError::UnknownType {
            owner: owner.to_string(),
            name: name.to_string(),
        })
}

fn lookup_module(
    modules: &IndexMap<String, ModuleId>,
    owner: &str,
    name: &str,
) -> Result<ModuleId, ModelError> {
    modules
        .get(name)
        .copied()
        .ok_or_else(|| ModelError::UnknownModule {
            owner: owner.to_string(),
            name: name.to_string(),
        })
}

fn parse_type_ref(
    builder: &mut TypeTableBuilder,
    types: &IndexMap<String, TypeId>,
    spelling: &str,
) -> TypeRef {
    if spelling == "dynamic" {
        return TypeRef::Dynamic;
    }
    if let Some(index) = spelling
        .strip_prefix("!!")
        .and_then(|index| index.parse::<u32>().ok())
    {
        return TypeRef::MethodTypeParameter(index);
    }
    match types.get(spelling) {
        Some(&id) => TypeRef::Definition(id),
        None => builder.unresolved(spelling),
    }
}

#[cfg(test)]
#[path = "../tests/fixture_tests.rs"]
mod tests;
