use crate::error::{ModelError, Result};
use codemap_syntax::{FunctionFact, Parameter, TypeFact, TypeKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Structural model of a whole project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectModel {
    /// Package name -> package
    pub packages: BTreeMap<String, PackageModel>,

    /// Package name -> imported paths, in file-processing order (duplicates kept)
    pub imports: BTreeMap<String, Vec<String>>,

    /// Relation group -> entity names, read pairwise as (from, to)
    #[serde(default)]
    pub relations: BTreeMap<String, Vec<String>>,
}

impl ProjectModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find package by name
    pub fn package(&self, name: &str) -> Option<&PackageModel> {
        self.packages.get(name)
    }

    /// Find package by name, as an error if missing
    pub fn require_package(&self, name: &str) -> Result<&PackageModel> {
        self.package(name)
            .ok_or_else(|| ModelError::PackageNotFound(name.to_string()))
    }

    /// All packages, ordered by name
    pub fn packages(&self) -> impl Iterator<Item = &PackageModel> {
        self.packages.values()
    }

    /// Find type by package and name
    pub fn find_type(&self, package: &str, name: &str) -> Option<&TypeModel> {
        self.package(package)?.types.get(name)
    }

    /// Find type by package and name, as an error if missing
    pub fn require_type(&self, package: &str, name: &str) -> Result<&TypeModel> {
        self.require_package(package)?
            .types
            .get(name)
            .ok_or_else(|| ModelError::TypeNotFound {
                package: package.to_string(),
                name: name.to_string(),
            })
    }

    /// Find free function by package and name
    pub fn find_function(&self, package: &str, name: &str) -> Option<&FunctionModel> {
        self.package(package)?.functions.get(name)
    }

    /// Imported paths of a package (empty if it imports nothing)
    pub fn imports_of(&self, package: &str) -> &[String] {
        self.imports.get(package).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All types with their package
    pub fn types(&self) -> impl Iterator<Item = (&PackageModel, &TypeModel)> {
        self.packages()
            .flat_map(|package| package.types.values().map(move |ty| (package, ty)))
    }

    /// All free functions with their package
    pub fn functions(&self) -> impl Iterator<Item = (&PackageModel, &FunctionModel)> {
        self.packages().flat_map(|package| {
            package
                .functions
                .values()
                .map(move |function| (package, function))
        })
    }

    /// All methods with their package and receiver type
    pub fn methods(&self) -> impl Iterator<Item = (&PackageModel, &TypeModel, &FunctionModel)> {
        self.types().flat_map(|(package, ty)| {
            ty.methods
                .values()
                .map(move |method| (package, ty, method))
        })
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    pub fn type_count(&self) -> usize {
        self.packages().map(|p| p.types.len()).sum()
    }

    pub fn function_count(&self) -> usize {
        self.packages().map(|p| p.functions.len()).sum()
    }

    pub fn method_count(&self) -> usize {
        self.types().map(|(_, ty)| ty.methods.len()).sum()
    }

    /// Append a (from, to) pair to a relation group
    pub fn add_relation(
        &mut self,
        group: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) {
        let entries = self.relations.entry(group.into()).or_default();
        entries.push(from.into());
        entries.push(to.into());
    }

    /// Pairs of a relation group; a dangling trailing name is ignored
    pub fn relation_pairs<'a>(&'a self, group: &str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.relations
            .get(group)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .chunks_exact(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }

    /// Look up or create the package (first declaration's identity wins)
    pub(crate) fn package_entry(&mut self, name: &str) -> &mut PackageModel {
        self.packages
            .entry(name.to_string())
            .or_insert_with(|| PackageModel::new(name))
    }

    pub(crate) fn package_mut(&mut self, name: &str) -> Option<&mut PackageModel> {
        self.packages.get_mut(name)
    }
}

/// One logical package, aggregated across every file declaring it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageModel {
    /// Package identifier as declared in source
    pub name: String,

    /// Type name -> type
    pub types: BTreeMap<String, TypeModel>,

    /// Function name -> free function (never methods)
    pub functions: BTreeMap<String, FunctionModel>,
}

impl PackageModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: BTreeMap::new(),
            functions: BTreeMap::new(),
        }
    }

    pub fn method_count(&self) -> usize {
        self.types.values().map(|ty| ty.methods.len()).sum()
    }
}

/// One declared type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeModel {
    pub name: String,

    pub kind: TypeKind,

    /// Field name -> unresolved type expression
    pub fields: BTreeMap<String, String>,

    /// Method name -> method
    pub methods: BTreeMap<String, FunctionModel>,

    /// Interfaces this type is believed to satisfy (filled by relation detection)
    #[serde(default)]
    pub implements: BTreeSet<String>,
}

impl TypeModel {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            fields: BTreeMap::new(),
            methods: BTreeMap::new(),
            implements: BTreeSet::new(),
        }
    }

    /// Build from a declaration; repeated field or method names keep the first.
    ///
    /// Interface members carry no receiver in the syntax facts; they get the
    /// declaring type as receiver so every entry in `methods` is a method.
    pub fn from_fact(fact: TypeFact) -> Self {
        let mut model = Self::new(fact.name, fact.kind);
        for field in fact.fields {
            model.fields.entry(field.name).or_insert(field.type_expr);
        }
        for mut method in fact.methods {
            if method.receiver.is_none() {
                method.receiver = Some(model.name.clone());
            }
            model
                .methods
                .entry(method.name.clone())
                .or_insert_with(|| FunctionModel::from(method));
        }
        model
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }
}

/// One function or method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionModel {
    pub name: String,

    /// Receiver type name; present iff this is a method
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,

    pub parameters: Vec<Parameter>,

    pub returns: Vec<String>,
}

impl FunctionModel {
    pub fn is_method(&self) -> bool {
        self.receiver.is_some()
    }
}

impl From<FunctionFact> for FunctionModel {
    fn from(fact: FunctionFact) -> Self {
        Self {
            name: fact.name,
            receiver: fact.receiver,
            parameters: fact.parameters,
            returns: fact.returns,
        }
    }
}
