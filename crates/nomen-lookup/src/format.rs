//! Human-readable rendering of types, members and lookup results.
//!
//! Used by the CLI and by diagnostics. Unknown ids render as `#<n>` rather
//! than failing; formatting never errors.

use crate::ResolveResult;
use nomen_common::limits::MAX_NESTING_DEPTH;
use nomen_model::{MemberId, MemberKind, ResolvedType, TypeId, TypeRef, TypeSystem};

pub struct ResultFormatter<'a> {
    db: &'a dyn TypeSystem,
}

impl<'a> ResultFormatter<'a> {
    pub fn new(db: &'a dyn TypeSystem) -> Self {
        Self { db }
    }

    /// `Outer.Inner<,>`: enclosing types joined by dots, open generic arity.
    pub fn type_name(&self, ty: TypeId) -> String {
        let mut chain = Vec::new();
        let mut cursor = Some(ty);
        while let Some(id) = cursor {
            if chain.len() == MAX_NESTING_DEPTH {
                break;
            }
            let Some(def) = self.db.type_def(id) else {
                chain.push(format!("#{}", id.0));
                break;
            };
            let mut part = self.db.name(def.name).to_string();
            push_arity(&mut part, def.type_parameter_count);
            chain.push(part);
            cursor = def.declaring_type;
        }
        chain.reverse();
        chain.join(".")
    }

    pub fn type_ref(&self, ty: &TypeRef) -> String {
        self.resolved_type(&self.db.resolve_type_ref(ty))
    }

    pub fn resolved_type(&self, ty: &ResolvedType) -> String {
        match ty {
            ResolvedType::Definition(id) => self.type_name(*id),
            ResolvedType::Dynamic => "dynamic".to_string(),
            ResolvedType::MethodTypeParameter(index) => format!("!!{index}"),
            ResolvedType::Unknown(name) => format!("?{}", self.db.name(*name)),
        }
    }

    /// `Base.Convert<>(!!0, ref Int32): Int32` for methods and indexers,
    /// `Base.Foo: Int32` for everything else.
    pub fn member_signature(&self, member: MemberId) -> String {
        let Some(def) = self.db.member(member) else {
            return format!("#{}", member.0);
        };

        let mut out = self.type_name(def.declaring_type);
        out.push('.');
        out.push_str(self.db.name(def.name));

        if def.kind == MemberKind::Method || def.is_indexer() {
            push_arity(&mut out, def.type_parameter_count);
            out.push(if def.is_indexer() { '[' } else { '(' });
            for (i, param) in def.parameters.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                if param.by_ref {
                    out.push_str("ref ");
                }
                out.push_str(&self.type_ref(&param.ty));
            }
            out.push(if def.is_indexer() { ']' } else { ')' });
        }

        out.push_str(": ");
        out.push_str(&self.type_ref(&def.return_type));
        out
    }

    pub fn result(&self, result: &ResolveResult) -> String {
        match result {
            ResolveResult::Type(ty) => format!("type {}", self.type_name(*ty)),
            ResolveResult::AmbiguousType(ty) => {
                format!("ambiguous type {}", self.type_name(*ty))
            }
            ResolveResult::Member {
                member,
                return_type,
            } => format!(
                "member {} -> {}",
                self.member_signature(*member),
                self.resolved_type(return_type)
            ),
            ResolveResult::AmbiguousMember {
                member,
                return_type,
            } => format!(
                "ambiguous member {} -> {}",
                self.member_signature(*member),
                self.resolved_type(return_type)
            ),
            ResolveResult::MethodGroup(methods) => {
                let methods: Vec<String> =
                    methods.iter().map(|m| self.member_signature(*m)).collect();
                format!("method group [{}]", methods.join(", "))
            }
            ResolveResult::UnknownMember {
                receiver,
                name,
                arity,
            } => {
                let mut key = name.clone();
                push_arity(&mut key, *arity);
                format!("unknown member {key} on {}", self.type_name(*receiver))
            }
        }
    }
}

fn push_arity(out: &mut String, arity: u32) {
    if arity == 0 {
        return;
    }
    out.push('<');
    for _ in 1..arity {
        out.push(',');
    }
    out.push('>');
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
