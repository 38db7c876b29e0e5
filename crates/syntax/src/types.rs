use serde::{Deserialize, Serialize};

/// One normalized declaration found in a source file.
///
/// This is the closed set of facts an extractor may report; anything the
/// parser sees outside of it is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "fact", rename_all = "snake_case")]
pub enum SyntaxFact {
    /// Package clause
    Package(String),
    /// Import spec
    Import(ImportFact),
    /// Top-level type declaration
    Type(TypeFact),
    /// Top-level function or method declaration
    Function(FunctionFact),
}

/// All facts extracted from a single file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFacts {
    /// Declared package name (None if no package clause was found)
    pub package: Option<String>,

    /// Imports in declaration order
    #[serde(default)]
    pub imports: Vec<ImportFact>,

    /// Type declarations in declaration order
    #[serde(default)]
    pub types: Vec<TypeFact>,

    /// Function and method declarations in declaration order
    #[serde(default)]
    pub functions: Vec<FunctionFact>,
}

impl FileFacts {
    /// Create facts for a file declaring `package`
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: Some(package.into()),
            ..Default::default()
        }
    }

    /// Fold a fact stream into per-file facts.
    ///
    /// Only the first package clause counts; order within each kind is kept.
    pub fn from_facts(facts: impl IntoIterator<Item = SyntaxFact>) -> Self {
        let mut file = Self::default();
        for fact in facts {
            file.push(fact);
        }
        file
    }

    /// Add one fact
    pub fn push(&mut self, fact: SyntaxFact) {
        match fact {
            SyntaxFact::Package(name) => {
                if self.package.is_none() {
                    self.package = Some(name);
                }
            }
            SyntaxFact::Import(import) => self.imports.push(import),
            SyntaxFact::Type(ty) => self.types.push(ty),
            SyntaxFact::Function(function) => self.functions.push(function),
        }
    }

    /// Declared package name, treating a blank name as missing
    pub fn package_name(&self) -> Option<&str> {
        self.package
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Imported paths in declaration order
    pub fn import_paths(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(|import| import.path.as_str())
    }

    /// Builder: add import path
    #[must_use]
    pub fn import(mut self, path: impl Into<String>) -> Self {
        self.imports.push(ImportFact::new(path));
        self
    }

    /// Builder: add type declaration
    #[must_use]
    pub fn with_type(mut self, ty: TypeFact) -> Self {
        self.types.push(ty);
        self
    }

    /// Builder: add function declaration
    #[must_use]
    pub fn with_function(mut self, function: FunctionFact) -> Self {
        self.functions.push(function);
        self
    }
}

/// Import of another package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFact {
    /// Import path without quotes (e.g. "net/http")
    pub path: String,

    /// Local alias (`_`, `.` or a name), if given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl ImportFact {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: None,
        }
    }

    /// Builder: set alias
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// Best-effort classification of a declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// Struct-like declaration
    Struct,
    /// Interface-like declaration
    Interface,
    /// Alias, named primitive, function type, or anything else
    Other,
}

impl TypeKind {
    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Other => "other",
        }
    }
}

/// Top-level type declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeFact {
    pub name: String,

    pub kind: TypeKind,

    /// Struct fields in declaration order
    #[serde(default)]
    pub fields: Vec<FieldFact>,

    /// Interface method set (empty for non-interfaces)
    #[serde(default)]
    pub methods: Vec<FunctionFact>,
}

impl TypeFact {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Builder: add field
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, type_expr: impl Into<String>) -> Self {
        self.fields.push(FieldFact {
            name: name.into(),
            type_expr: type_expr.into(),
        });
        self
    }

    /// Builder: add interface method
    #[must_use]
    pub fn method(mut self, method: FunctionFact) -> Self {
        self.methods.push(method);
        self
    }
}

/// Struct field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFact {
    pub name: String,
    /// Unresolved type expression as written (e.g. "*http.Client")
    pub type_expr: String,
}

/// Function or method declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionFact {
    pub name: String,

    /// Receiver type name (methods only), without pointer or type arguments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,

    #[serde(default)]
    pub parameters: Vec<Parameter>,

    #[serde(default)]
    pub returns: Vec<String>,
}

impl FunctionFact {
    /// Create a free function
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            receiver: None,
            parameters: Vec::new(),
            returns: Vec::new(),
        }
    }

    /// Create a method on `receiver`
    pub fn method(name: impl Into<String>, receiver: impl Into<String>) -> Self {
        Self {
            receiver: Some(receiver.into()),
            ..Self::new(name)
        }
    }

    /// Builder: add parameter
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, type_expr: impl Into<String>) -> Self {
        self.parameters.push(Parameter::new(name, type_expr));
        self
    }

    /// Builder: add return type
    #[must_use]
    pub fn returns(mut self, type_expr: impl Into<String>) -> Self {
        self.returns.push(type_expr.into());
        self
    }

    /// Check whether this is a method
    pub fn is_method(&self) -> bool {
        self.receiver.is_some()
    }
}

/// Named (or unnamed, with an empty name) parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_expr: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_expr: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_expr: type_expr.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_facts_keeps_first_package() {
        let facts = FileFacts::from_facts([
            SyntaxFact::Package("first".into()),
            SyntaxFact::Import(ImportFact::new("fmt")),
            SyntaxFact::Package("second".into()),
            SyntaxFact::Function(FunctionFact::new("main")),
        ]);

        assert_eq!(facts.package_name(), Some("first"));
        assert_eq!(facts.import_paths().collect::<Vec<_>>(), vec!["fmt"]);
        assert_eq!(facts.functions.len(), 1);
    }

    #[test]
    fn test_blank_package_is_missing() {
        let facts = FileFacts {
            package: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(facts.package_name(), None);
        assert_eq!(FileFacts::default().package_name(), None);
    }

    #[test]
    fn test_function_builder() {
        let method = FunctionFact::method("Name", "Service").returns("string");
        assert!(method.is_method());
        assert_eq!(method.returns, vec!["string".to_string()]);

        let function = FunctionFact::new("NewService")
            .param("name", "string")
            .returns("*Service");
        assert!(!function.is_method());
        assert_eq!(function.parameters[0], Parameter::new("name", "string"));
    }

    #[test]
    fn test_type_kind_names() {
        assert_eq!(TypeKind::Struct.as_str(), "struct");
        assert_eq!(TypeKind::Interface.as_str(), "interface");
        assert_eq!(TypeKind::Other.as_str(), "other");
    }
}
