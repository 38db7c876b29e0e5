use codemap_model::{
    Aggregation, Aggregator, AttachMode, DiagnosticKind, DuplicatePolicy, NodeKind,
    RelationDetector, RelationGraph, RelationKind, TypeKind, CONTAINS, IMPLEMENTS, IMPORTS,
};
use codemap_syntax::{FactExtractor, FileFacts, FunctionFact, GoExtractor, TypeFact};
use pretty_assertions::assert_eq;
use std::path::Path;

fn aggregate(mode: AttachMode, files: Vec<(&str, FileFacts)>) -> Aggregation {
    let mut aggregator = Aggregator::new(mode, DuplicatePolicy::FirstWins);
    aggregator.merge_all(files);
    aggregator.finish()
}

fn service_type() -> FileFacts {
    FileFacts::new("pkg")
        .with_type(TypeFact::new("Service", TypeKind::Struct).field("name", "string"))
}

fn service_method() -> FileFacts {
    FileFacts::new("pkg")
        .with_function(FunctionFact::method("Name", "Service").returns("string"))
}

#[test]
fn duplicate_type_declaration_registers_once_and_first_wins() {
    let result = aggregate(
        AttachMode::TwoPass,
        vec![
            ("pkg/a.go", service_type()),
            (
                "pkg/b.go",
                FileFacts::new("pkg").with_type(
                    TypeFact::new("Service", TypeKind::Interface).field("other", "int"),
                ),
            ),
        ],
    );

    let package = result.model.package("pkg").unwrap();
    assert_eq!(package.types.len(), 1);

    let service = &package.types["Service"];
    assert_eq!(service.kind, TypeKind::Struct);
    assert_eq!(service.fields.keys().collect::<Vec<_>>(), vec!["name"]);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn merge_fields_policy_extends_first_declaration() {
    let mut aggregator = Aggregator::new(AttachMode::TwoPass, DuplicatePolicy::MergeFields);
    aggregator.merge("pkg/a.go", service_type());
    aggregator.merge(
        "pkg/b.go",
        FileFacts::new("pkg")
            .with_type(TypeFact::new("Service", TypeKind::Other).field("port", "int")),
    );

    let result = aggregator.finish();
    let service = result.model.find_type("pkg", "Service").unwrap();
    assert_eq!(service.kind, TypeKind::Struct);
    assert_eq!(service.fields.keys().collect::<Vec<_>>(), vec!["name", "port"]);
}

#[test]
fn type_and_function_with_same_name_do_not_collide() {
    let result = aggregate(
        AttachMode::TwoPass,
        vec![(
            "pkg/config.go",
            FileFacts::new("pkg")
                .with_type(TypeFact::new("Config", TypeKind::Struct))
                .with_function(FunctionFact::new("Config").returns("*Config")),
        )],
    );

    assert_eq!(
        result.model.find_type("pkg", "Config").map(|t| t.kind),
        Some(TypeKind::Struct)
    );
    let function = result.model.find_function("pkg", "Config").unwrap();
    assert_eq!(function.returns, vec!["*Config".to_string()]);
    assert!(function.receiver.is_none());
}

#[test]
fn methods_are_never_registered_as_free_functions() {
    let result = aggregate(
        AttachMode::TwoPass,
        vec![("pkg/a.go", service_type()), ("pkg/b.go", service_method())],
    );

    let package = result.model.package("pkg").unwrap();
    assert!(package.functions.is_empty());
    assert!(package.types["Service"].methods["Name"].is_method());
}

#[test]
fn streaming_attaches_method_when_type_comes_first() {
    let result = aggregate(
        AttachMode::Streaming,
        vec![("pkg/service.go", service_type()), ("pkg/name.go", service_method())],
    );

    let service = result.model.find_type("pkg", "Service").unwrap();
    assert!(service.methods.contains_key("Name"));
    assert!(result.diagnostics.is_empty());
}

#[test]
fn streaming_drops_method_merged_before_its_type() {
    let result = aggregate(
        AttachMode::Streaming,
        vec![("pkg/name.go", service_method()), ("pkg/service.go", service_type())],
    );

    let service = result.model.find_type("pkg", "Service").unwrap();
    assert!(service.methods.is_empty());

    let diagnostics: Vec<_> = result.diagnostics.iter().collect();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::UnresolvedReceiver);
    assert_eq!(diagnostics[0].path, Path::new("pkg/name.go"));
}

#[test]
fn two_pass_is_independent_of_file_order() {
    let forward = aggregate(
        AttachMode::TwoPass,
        vec![("pkg/service.go", service_type()), ("pkg/name.go", service_method())],
    );
    let backward = aggregate(
        AttachMode::TwoPass,
        vec![("pkg/name.go", service_method()), ("pkg/service.go", service_type())],
    );

    assert_eq!(forward.model, backward.model);
    assert!(backward.diagnostics.is_empty());
    assert!(backward
        .model
        .find_type("pkg", "Service")
        .unwrap()
        .methods
        .contains_key("Name"));
}

#[test]
fn two_pass_still_reports_receivers_declared_nowhere() {
    let result = aggregate(
        AttachMode::TwoPass,
        vec![(
            "pkg/ghost.go",
            FileFacts::new("pkg").with_function(FunctionFact::method("Haunt", "Ghost")),
        )],
    );

    assert_eq!(result.model.method_count(), 0);
    assert_eq!(
        result
            .diagnostics
            .of_kind(DiagnosticKind::UnresolvedReceiver)
            .count(),
        1
    );
}

#[test]
fn receiver_lookup_is_scoped_to_the_current_package() {
    let result = aggregate(
        AttachMode::TwoPass,
        vec![
            (
                "a/service.go",
                FileFacts::new("a").with_type(TypeFact::new("Service", TypeKind::Struct)),
            ),
            (
                "b/name.go",
                FileFacts::new("b").with_function(FunctionFact::method("Name", "Service")),
            ),
        ],
    );

    assert!(result
        .model
        .find_type("a", "Service")
        .unwrap()
        .methods
        .is_empty());
    assert_eq!(result.diagnostics.len(), 1);
}

#[test]
fn imports_accumulate_across_files_with_duplicates() {
    let files = (0..3)
        .map(|i| (format!("pkg/f{i}.go"), FileFacts::new("pkg").import("x")))
        .collect::<Vec<_>>();

    let mut aggregator = Aggregator::default();
    aggregator.merge_all(files);
    let result = aggregator.finish();

    assert_eq!(result.model.imports_of("pkg"), &["x", "x", "x"]);
}

#[test]
fn missing_package_yields_one_diagnostic_for_that_file() {
    let result = aggregate(
        AttachMode::TwoPass,
        vec![
            ("good.go", FileFacts::new("main").import("fmt")),
            ("bad.go", FileFacts::default().with_function(FunctionFact::new("lost"))),
        ],
    );

    assert_eq!(result.model.package_count(), 1);
    let diagnostics: Vec<_> = result.diagnostics.iter().collect();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::MissingPackage);
    assert_eq!(diagnostics[0].path, Path::new("bad.go"));
}

#[test]
fn end_to_end_service_scenario() {
    let result = aggregate(
        AttachMode::TwoPass,
        vec![
            (
                "main.go",
                FileFacts::new("main")
                    .import("fmt")
                    .import("pkg")
                    .with_function(FunctionFact::new("main")),
            ),
            (
                "pkg/service.go",
                service_type()
                    .with_function(
                        FunctionFact::new("NewService")
                            .param("name", "string")
                            .returns("*Service"),
                    )
                    .with_function(FunctionFact::method("Name", "Service").returns("string")),
            ),
        ],
    );

    let model = &result.model;
    assert_eq!(model.package_count(), 2);

    let service = model.find_type("pkg", "Service").unwrap();
    assert_eq!(service.methods.keys().collect::<Vec<_>>(), vec!["Name"]);
    assert!(model.find_function("pkg", "NewService").is_some());
    assert_eq!(model.imports_of("main"), &["fmt", "pkg"]);
    assert!(result.diagnostics.is_empty());
}

fn relation_model() -> codemap_model::ProjectModel {
    let result = aggregate(
        AttachMode::TwoPass,
        vec![
            (
                "main.go",
                FileFacts::new("main")
                    .import("fmt")
                    .import("example.com/app/store"),
            ),
            (
                "store/store.go",
                FileFacts::new("store")
                    .with_type(
                        TypeFact::new("Namer", TypeKind::Interface)
                            .method(FunctionFact::new("Name").returns("string")),
                    )
                    .with_type(
                        TypeFact::new("Store", TypeKind::Struct)
                            .field("items", "map[string]*Item")
                            .field("client", "*http.Client"),
                    )
                    .with_type(TypeFact::new("Item", TypeKind::Struct).field("next", "*Item"))
                    .with_function(FunctionFact::method("Name", "Item").returns("string")),
            ),
        ],
    );
    let mut model = result.model;
    RelationDetector::default().detect(&mut model);
    model
}

#[test]
fn relation_detection_fills_groups_and_implements() {
    let model = relation_model();

    assert_eq!(
        model.relation_pairs(CONTAINS).collect::<Vec<_>>(),
        vec![("store.Store", "store.Item")]
    );
    assert_eq!(
        model.relation_pairs(IMPLEMENTS).collect::<Vec<_>>(),
        vec![("store.Item", "store.Namer")]
    );
    assert_eq!(
        model.relation_pairs(IMPORTS).collect::<Vec<_>>(),
        vec![("main", "store")]
    );

    let item = model.find_type("store", "Item").unwrap();
    assert!(item.implements.contains("store.Namer"));
}

#[test]
fn relation_detection_is_repeatable() {
    let mut model = relation_model();
    let once = model.clone();
    RelationDetector::default().detect(&mut model);
    assert_eq!(model, once);
}

#[test]
fn relation_graph_exposes_edges_and_package_order() {
    let model = relation_model();
    let graph = RelationGraph::from_model(&model);

    let methods = graph
        .neighbors(NodeKind::Type, "store.Item", RelationKind::Contains)
        .unwrap();
    assert_eq!(methods.len(), 1);
    assert_eq!(methods[0].name, "store.Item.Name");

    let implementors = graph
        .dependents(NodeKind::Type, "store.Namer", RelationKind::Implements)
        .unwrap();
    assert_eq!(implementors[0].name, "store.Item");

    assert_eq!(graph.package_order().unwrap(), vec!["store", "main"]);
}

#[test]
fn model_serializes_to_json() {
    let model = relation_model();
    let json = serde_json::to_value(&model).unwrap();

    assert_eq!(json["packages"]["store"]["types"]["Item"]["kind"], "struct");
    assert_eq!(json["imports"]["main"][1], "example.com/app/store");
    assert_eq!(json["relations"]["imports"][0], "main");
}

#[test]
fn every_type_method_has_a_receiver() {
    let facts = GoExtractor::default()
        .extract(
            r#"package store

type Namer interface {
	Name() string
	Rename(name string) error
}

type Item struct{ name string }

func (i *Item) Name() string { return i.name }
"#,
        )
        .unwrap();

    let result = aggregate(AttachMode::TwoPass, vec![("store/store.go", facts)]);
    let model = &result.model;

    let methods: Vec<_> = model.methods().collect();
    assert_eq!(methods.len(), 3);
    for (_, ty, method) in &methods {
        assert!(method.is_method(), "{}.{} has no receiver", ty.name, method.name);
        assert_eq!(method.receiver.as_deref(), Some(ty.name.as_str()));
    }

    let graph = RelationGraph::from_model(model);
    let members = graph
        .neighbors(NodeKind::Type, "store.Namer", RelationKind::Contains)
        .unwrap();
    assert_eq!(
        members.iter().map(|n| n.name.as_str()).collect::<Vec<_>>(),
        vec!["store.Namer.Name", "store.Namer.Rename"]
    );
    assert!(members.iter().all(|n| n.kind == NodeKind::Method));
}
