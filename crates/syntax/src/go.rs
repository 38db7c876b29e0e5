use crate::config::ExtractorConfig;
use crate::error::{Result, SyntaxError};
use crate::extractor::FactExtractor;
use crate::language::Language;
use crate::types::{
    FieldFact, FileFacts, FunctionFact, ImportFact, Parameter, SyntaxFact, TypeFact, TypeKind,
};
use tree_sitter::{Node, Parser};

/// Tree-sitter based fact extractor for Go sources
#[derive(Debug, Clone, Default)]
pub struct GoExtractor {
    config: ExtractorConfig,
}

impl GoExtractor {
    /// Create extractor with configuration
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        config.validate().map_err(SyntaxError::invalid_config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    fn parser() -> Result<Parser> {
        let ts_language = Language::Go.tree_sitter_language()?;
        let mut parser = Parser::new();
        parser
            .set_language(&ts_language)
            .map_err(|e| SyntaxError::tree_sitter(format!("Failed to set language: {e}")))?;
        Ok(parser)
    }

    /// Dispatch one top-level node to the facts it declares
    fn visit_top_level(&self, content: &str, node: Node, facts: &mut Vec<SyntaxFact>) {
        match node.kind() {
            "package_clause" => {
                if let Some(name) = Self::package_name(content, node) {
                    facts.push(SyntaxFact::Package(name));
                }
            }
            "import_declaration" => {
                Self::collect_imports(content, node, facts);
            }
            "type_declaration" => {
                self.collect_types(content, node, facts);
            }
            "function_declaration" => {
                if let Some(function) = Self::function(content, node) {
                    facts.push(SyntaxFact::Function(function));
                }
            }
            "method_declaration" => {
                if let Some(method) = Self::method(content, node) {
                    facts.push(SyntaxFact::Function(method));
                }
            }
            _ => {}
        }
    }

    fn package_name(content: &str, clause: Node) -> Option<String> {
        let mut cursor = clause.walk();
        let name = clause
            .children(&mut cursor)
            .find(|child| matches!(child.kind(), "package_identifier" | "identifier"))
            .map(|child| node_text(content, child).to_string());
        name
    }

    fn collect_imports(content: &str, decl: Node, facts: &mut Vec<SyntaxFact>) {
        let mut cursor = decl.walk();
        for child in decl.children(&mut cursor) {
            match child.kind() {
                "import_spec" => {
                    if let Some(import) = Self::import_spec(content, child) {
                        facts.push(SyntaxFact::Import(import));
                    }
                }
                "import_spec_list" => {
                    let mut list_cursor = child.walk();
                    for spec in child.children(&mut list_cursor) {
                        if spec.kind() == "import_spec" {
                            if let Some(import) = Self::import_spec(content, spec) {
                                facts.push(SyntaxFact::Import(import));
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn import_spec(content: &str, spec: Node) -> Option<ImportFact> {
        let path_node = spec.child_by_field_name("path")?;
        let path = unquote(node_text(content, path_node));
        if path.is_empty() {
            return None;
        }
        let mut import = ImportFact::new(path);
        if let Some(alias) = spec.child_by_field_name("name") {
            import = import.alias(node_text(content, alias));
        }
        Some(import)
    }

    fn collect_types(&self, content: &str, decl: Node, facts: &mut Vec<SyntaxFact>) {
        let mut cursor = decl.walk();
        for child in decl.children(&mut cursor) {
            let fact = match child.kind() {
                "type_spec" => self.type_spec(content, child),
                // Aliases never carry their own fields or methods
                "type_alias" => child
                    .child_by_field_name("name")
                    .map(|name| TypeFact::new(node_text(content, name), TypeKind::Other)),
                _ => None,
            };
            if let Some(fact) = fact {
                facts.push(SyntaxFact::Type(fact));
            }
        }
    }

    fn type_spec(&self, content: &str, spec: Node) -> Option<TypeFact> {
        let name = node_text(content, spec.child_by_field_name("name")?);
        let Some(type_node) = spec.child_by_field_name("type") else {
            return Some(TypeFact::new(name, TypeKind::Other));
        };

        let kind = match type_node.kind() {
            "struct_type" => TypeKind::Struct,
            "interface_type" => TypeKind::Interface,
            _ => TypeKind::Other,
        };

        let mut fact = TypeFact::new(name, kind);
        match kind {
            TypeKind::Struct if self.config.include_fields => {
                fact.fields = Self::struct_fields(content, type_node);
            }
            TypeKind::Interface if self.config.include_interface_methods => {
                Self::interface_methods(content, type_node, &mut fact.methods);
            }
            _ => {}
        }
        Some(fact)
    }

    fn struct_fields(content: &str, struct_node: Node) -> Vec<FieldFact> {
        let mut fields = Vec::new();
        let mut cursor = struct_node.walk();
        for list in struct_node.children(&mut cursor) {
            if list.kind() != "field_declaration_list" {
                continue;
            }
            let mut list_cursor = list.walk();
            for decl in list.children(&mut list_cursor) {
                if decl.kind() == "field_declaration" {
                    Self::field_declaration(content, decl, &mut fields);
                }
            }
        }
        fields
    }

    fn field_declaration(content: &str, decl: Node, fields: &mut Vec<FieldFact>) {
        let Some(type_node) = decl.child_by_field_name("type") else {
            return;
        };
        let type_expr = squash_whitespace(node_text(content, type_node));

        let mut cursor = decl.walk();
        let names: Vec<String> = decl
            .children_by_field_name("name", &mut cursor)
            .map(|name| node_text(content, name).to_string())
            .collect();

        if names.is_empty() {
            // Embedded field: `Base`, `*Base`, `io.Reader`, `List[T]`
            let mut star_cursor = decl.walk();
            let pointer = decl
                .children(&mut star_cursor)
                .any(|child| child.kind() == "*");
            let name = embedded_field_name(&type_expr);
            let type_expr = if pointer {
                format!("*{type_expr}")
            } else {
                type_expr
            };
            fields.push(FieldFact { name, type_expr });
            return;
        }

        for name in names {
            fields.push(FieldFact {
                name,
                type_expr: type_expr.clone(),
            });
        }
    }

    fn interface_methods(content: &str, node: Node, methods: &mut Vec<FunctionFact>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "method_elem" | "method_spec" => {
                    if let Some(name) = child.child_by_field_name("name") {
                        let mut method = FunctionFact::new(node_text(content, name));
                        method.parameters = child
                            .child_by_field_name("parameters")
                            .map(|params| parameter_list(content, params))
                            .unwrap_or_default();
                        method.returns = child
                            .child_by_field_name("result")
                            .map(|result| result_types(content, result))
                            .unwrap_or_default();
                        methods.push(method);
                    }
                }
                // Older grammars wrap interface members in a list node
                "method_spec_list" => Self::interface_methods(content, child, methods),
                _ => {}
            }
        }
    }

    fn function(content: &str, node: Node) -> Option<FunctionFact> {
        let name = node_text(content, node.child_by_field_name("name")?);
        let mut function = FunctionFact::new(name);
        Self::fill_signature(content, node, &mut function);
        Some(function)
    }

    fn method(content: &str, node: Node) -> Option<FunctionFact> {
        let name = node_text(content, node.child_by_field_name("name")?);
        let receiver = node
            .child_by_field_name("receiver")
            .and_then(|receiver| Self::receiver_type(content, receiver));
        let mut method = FunctionFact::new(name);
        method.receiver = receiver;
        Self::fill_signature(content, node, &mut method);
        Some(method)
    }

    fn fill_signature(content: &str, node: Node, function: &mut FunctionFact) {
        if let Some(params) = node.child_by_field_name("parameters") {
            function.parameters = parameter_list(content, params);
        }
        if let Some(result) = node.child_by_field_name("result") {
            function.returns = result_types(content, result);
        }
    }

    /// Receiver type name: `(s *Server)` → `Server`, `(l List[T])` → `List`
    fn receiver_type(content: &str, receiver: Node) -> Option<String> {
        let mut cursor = receiver.walk();
        let type_text = receiver
            .children(&mut cursor)
            .filter(|child| child.kind() == "parameter_declaration")
            .find_map(|decl| decl.child_by_field_name("type"))
            .map(|type_node| node_text(content, type_node))?;

        let name = base_type_name(type_text);
        (!name.is_empty()).then_some(name)
    }
}

impl FactExtractor for GoExtractor {
    fn language(&self) -> Language {
        Language::Go
    }

    fn extract(&self, source: &str) -> Result<FileFacts> {
        if source.len() > self.config.max_source_bytes {
            return Err(SyntaxError::TooLarge {
                size: source.len(),
                limit: self.config.max_source_bytes,
            });
        }

        let mut parser = Self::parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| SyntaxError::parse("Failed to parse source code"))?;
        let root = tree.root_node();

        if root.has_error() {
            if self.config.reject_syntax_errors {
                return Err(SyntaxError::parse("source contains syntax errors"));
            }
            log::debug!("Accepting partially parsed Go source (syntax errors present)");
        }

        let mut facts = Vec::new();
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            self.visit_top_level(source, child, &mut facts);
        }

        Ok(FileFacts::from_facts(facts))
    }
}

fn node_text<'a>(content: &'a str, node: Node) -> &'a str {
    &content[node.start_byte()..node.end_byte()]
}

/// Parameters in order; `a, b int` yields two entries, `(int, error)` yields unnamed ones
fn parameter_list(content: &str, list: Node) -> Vec<Parameter> {
    let mut params = Vec::new();
    let mut cursor = list.walk();
    for decl in list.children(&mut cursor) {
        let variadic = match decl.kind() {
            "parameter_declaration" => false,
            "variadic_parameter_declaration" => true,
            _ => continue,
        };
        let Some(type_node) = decl.child_by_field_name("type") else {
            continue;
        };
        let mut type_expr = squash_whitespace(node_text(content, type_node));
        if variadic {
            type_expr = format!("...{type_expr}");
        }

        let mut name_cursor = decl.walk();
        let names: Vec<&str> = decl
            .children_by_field_name("name", &mut name_cursor)
            .map(|name| node_text(content, name))
            .collect();

        if names.is_empty() {
            params.push(Parameter::new("", type_expr));
        } else {
            for name in names {
                params.push(Parameter::new(name, type_expr.clone()));
            }
        }
    }
    params
}

/// Result types: a bare type, or one entry per (possibly named) result
fn result_types(content: &str, result: Node) -> Vec<String> {
    if result.kind() == "parameter_list" {
        parameter_list(content, result)
            .into_iter()
            .map(|param| param.type_expr)
            .collect()
    } else {
        vec![squash_whitespace(node_text(content, result))]
    }
}

fn unquote(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '"' || c == '`')
        .to_string()
}

fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `*pkg.List[T]` → `List`
fn base_type_name(type_text: &str) -> String {
    let trimmed = type_text.trim().trim_start_matches('*').trim();
    let without_args = trimmed.split('[').next().unwrap_or(trimmed);
    without_args
        .rsplit('.')
        .next()
        .unwrap_or(without_args)
        .trim()
        .to_string()
}

fn embedded_field_name(type_expr: &str) -> String {
    base_type_name(type_expr)
}
