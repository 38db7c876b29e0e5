//! Relation detection over a finished model.
//!
//! Runs after aggregation and only reads names: no type checking, no
//! resolution beyond matching simple identifiers.

use crate::types::ProjectModel;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// `pkg.Outer` has a field whose type mentions `pkg.Inner`
pub const CONTAINS: &str = "contains";
/// `pkg.Impl` has every method of interface `other.Iface`
pub const IMPLEMENTS: &str = "implements";
/// package `main` imports a path whose last segment is package `pkg`
pub const IMPORTS: &str = "imports";

/// Which relation groups to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationDetector {
    pub contains: bool,
    pub implements: bool,
    pub imports: bool,
}

impl Default for RelationDetector {
    fn default() -> Self {
        Self {
            contains: true,
            implements: true,
            imports: true,
        }
    }
}

impl RelationDetector {
    /// Recompute the enabled relation groups in place
    pub fn detect(&self, model: &mut ProjectModel) {
        if self.contains {
            let pairs = contains_pairs(model);
            replace_group(model, CONTAINS, pairs);
        }
        if self.implements {
            let pairs = implements_pairs(model);
            for (from, to) in &pairs {
                if let Some((package, name)) = from.split_once('.') {
                    if let Some(ty) = model
                        .package_mut(package)
                        .and_then(|p| p.types.get_mut(name))
                    {
                        ty.implements.insert(to.clone());
                    }
                }
            }
            replace_group(model, IMPLEMENTS, pairs);
        }
        if self.imports {
            let pairs = import_pairs(model);
            replace_group(model, IMPORTS, pairs);
        }

        log::debug!(
            "Detected relations: {} contains, {} implements, {} imports",
            model.relation_pairs(CONTAINS).count(),
            model.relation_pairs(IMPLEMENTS).count(),
            model.relation_pairs(IMPORTS).count()
        );
    }
}

/// `pkg.Name`
pub(crate) fn qualified(package: &str, name: &str) -> String {
    format!("{package}.{name}")
}

fn replace_group(model: &mut ProjectModel, group: &str, pairs: BTreeSet<(String, String)>) {
    model.relations.remove(group);
    for (from, to) in pairs {
        model.add_relation(group, from, to);
    }
}

fn contains_pairs(model: &ProjectModel) -> BTreeSet<(String, String)> {
    let mut pairs = BTreeSet::new();
    for package in model.packages() {
        for ty in package.types.values() {
            for type_expr in ty.fields.values() {
                for referenced in local_type_refs(type_expr) {
                    if referenced != ty.name && package.types.contains_key(referenced) {
                        pairs.insert((
                            qualified(&package.name, &ty.name),
                            qualified(&package.name, referenced),
                        ));
                    }
                }
            }
        }
    }
    pairs
}

/// Unqualified identifiers in a type expression: `map[string]*Node` → `map`, `string`, `Node`.
/// Package-qualified names (`http.Client`) belong to other packages and are skipped.
fn local_type_refs(type_expr: &str) -> impl Iterator<Item = &str> {
    type_expr
        .split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
        .filter(|token| !token.is_empty() && !token.contains('.'))
}

fn implements_pairs(model: &ProjectModel) -> BTreeSet<(String, String)> {
    let interfaces: BTreeMap<String, BTreeSet<&str>> = model
        .types()
        .filter(|(_, ty)| ty.is_interface() && !ty.methods.is_empty())
        .map(|(package, ty)| {
            (
                qualified(&package.name, &ty.name),
                ty.methods.keys().map(String::as_str).collect(),
            )
        })
        .collect();

    let mut pairs = BTreeSet::new();
    if interfaces.is_empty() {
        return pairs;
    }

    for (package, ty) in model.types().filter(|(_, ty)| !ty.is_interface()) {
        if ty.methods.is_empty() {
            continue;
        }
        for (iface, required) in &interfaces {
            if required.iter().all(|name| ty.methods.contains_key(*name)) {
                pairs.insert((qualified(&package.name, &ty.name), iface.clone()));
            }
        }
    }
    pairs
}

fn import_pairs(model: &ProjectModel) -> BTreeSet<(String, String)> {
    let mut pairs = BTreeSet::new();
    for (package, paths) in &model.imports {
        for path in paths {
            let last = path.rsplit('/').next().unwrap_or(path);
            if last != package && model.packages.contains_key(last) {
                pairs.insert((package.clone(), last.to_string()));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_type_refs() {
        let refs: Vec<_> = local_type_refs("map[string]*Node").collect();
        assert_eq!(refs, vec!["map", "string", "Node"]);

        let refs: Vec<_> = local_type_refs("[]*http.Client").collect();
        assert!(refs.is_empty());

        let refs: Vec<_> = local_type_refs("func(a Node) error").collect();
        assert_eq!(refs, vec!["func", "a", "Node", "error"]);
    }

    #[test]
    fn test_qualified() {
        assert_eq!(qualified("pkg", "Service"), "pkg.Service");
    }
}
