use codemap_indexer::IndexOutput;
use codemap_model::{ProjectModel, RelationGraph};
use std::fmt::Write;

/// One line per package (dependencies first), then a totals line
pub fn render(output: &IndexOutput) -> String {
    let model = &output.model;
    let mut text = String::new();

    for name in package_order(model) {
        let Some(package) = model.package(&name) else {
            continue;
        };
        let imports = model.imports_of(&name).len();
        let _ = writeln!(
            text,
            "{name}: {} types, {} functions, {} methods, {imports} imports",
            package.types.len(),
            package.functions.len(),
            package.method_count()
        );
    }

    let stats = &output.stats;
    let _ = write!(
        text,
        "{} packages from {}/{} files, {} diagnostics",
        stats.packages, stats.files_extracted, stats.files_found, stats.diagnostics
    );
    text
}

fn package_order(model: &ProjectModel) -> Vec<String> {
    match RelationGraph::from_model(model).package_order() {
        Ok(order) => order,
        Err(e) => {
            log::warn!("{e}; listing packages alphabetically");
            model.packages().map(|p| p.name.clone()).collect()
        }
    }
}
