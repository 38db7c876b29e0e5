use crate::types::TypeModel;
use serde::{Deserialize, Serialize};

/// What to do when a type name is declared again in the same package
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the first declaration untouched; later ones are ignored
    #[default]
    FirstWins,

    /// Keep the first declaration's kind, but add fields, methods and
    /// implemented interfaces it does not already have
    MergeFields,
}

impl DuplicatePolicy {
    /// Resolve a duplicate declaration into the existing type
    pub fn resolve(self, existing: &mut TypeModel, incoming: TypeModel) {
        match self {
            Self::FirstWins => {}
            Self::MergeFields => {
                for (name, type_expr) in incoming.fields {
                    existing.fields.entry(name).or_insert(type_expr);
                }
                for (name, method) in incoming.methods {
                    existing.methods.entry(name).or_insert(method);
                }
                existing.implements.extend(incoming.implements);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemap_syntax::{FunctionFact, TypeFact, TypeKind};

    fn first() -> TypeModel {
        TypeModel::from_fact(TypeFact::new("T", TypeKind::Struct).field("a", "int"))
    }

    fn second() -> TypeModel {
        TypeModel::from_fact(
            TypeFact::new("T", TypeKind::Interface)
                .field("a", "string")
                .field("b", "bool")
                .method(FunctionFact::new("M")),
        )
    }

    #[test]
    fn test_first_wins_ignores_duplicate() {
        let mut existing = first();
        DuplicatePolicy::FirstWins.resolve(&mut existing, second());
        assert_eq!(existing, first());
    }

    #[test]
    fn test_merge_fields_adds_missing_members_only() {
        let mut existing = first();
        DuplicatePolicy::MergeFields.resolve(&mut existing, second());

        assert_eq!(existing.kind, TypeKind::Struct);
        assert_eq!(existing.fields.get("a").map(String::as_str), Some("int"));
        assert_eq!(existing.fields.get("b").map(String::as_str), Some("bool"));
        assert!(existing.methods.contains_key("M"));
    }
}
