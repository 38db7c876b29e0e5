use codemap_syntax::{FactExtractor, FileFacts, GoExtractor, SyntaxFact, TypeKind};

fn extract(code: &str) -> FileFacts {
    GoExtractor::default()
        .extract(code)
        .expect("extraction failed")
}

#[test]
fn extracts_service_file_declarations() {
    let code = r#"
// Package pkg holds the service.
package pkg

import "strings"

// Service greets people.
type Service struct {
	name string
}

func NewService(name string) *Service {
	return &Service{name: strings.TrimSpace(name)}
}

func (s *Service) Name() string {
	return s.name
}
"#;

    let facts = extract(code);
    assert_eq!(facts.package_name(), Some("pkg"));
    assert_eq!(facts.import_paths().collect::<Vec<_>>(), vec!["strings"]);

    assert_eq!(facts.types.len(), 1);
    assert_eq!(facts.types[0].name, "Service");
    assert_eq!(facts.types[0].kind, TypeKind::Struct);
    assert_eq!(facts.types[0].fields[0].name, "name");

    let names: Vec<_> = facts
        .functions
        .iter()
        .map(|f| (f.name.as_str(), f.receiver.as_deref()))
        .collect();
    assert_eq!(names, vec![("NewService", None), ("Name", Some("Service"))]);
}

#[test]
fn ignores_declarations_nested_in_function_bodies() {
    let code = r#"
package pkg

func outer() {
	type local struct{}
	inner := func() {}
	_ = inner
}
"#;

    let facts = extract(code);
    assert!(facts.types.is_empty(), "local types are not top-level: {facts:?}");
    assert_eq!(facts.functions.len(), 1);
}

#[test]
fn tolerates_syntax_errors_by_default() {
    let code = "package messy\n\ntype Good struct{}\n\nfunc broken( {\n";

    let facts = extract(code);
    assert_eq!(facts.package_name(), Some("messy"));
    assert!(facts.types.iter().any(|t| t.name == "Good"));
}

#[test]
fn file_facts_round_trip_through_fact_stream() {
    let facts = extract("package p\n\nimport \"fmt\"\n\nfunc Hello() { fmt.Println() }\n");

    let stream: Vec<SyntaxFact> = std::iter::once(SyntaxFact::Package("p".into()))
        .chain(facts.imports.iter().cloned().map(SyntaxFact::Import))
        .chain(facts.functions.iter().cloned().map(SyntaxFact::Function))
        .collect();

    assert_eq!(FileFacts::from_facts(stream), facts);
}
