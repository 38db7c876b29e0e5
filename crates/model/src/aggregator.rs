use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::policy::DuplicatePolicy;
use crate::types::{FunctionModel, ProjectModel, TypeModel};
use codemap_syntax::{FileFacts, FunctionFact};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::path::{Path, PathBuf};

/// When methods are attached to their receiver types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachMode {
    /// Register every type first, attach methods in `finish`.
    /// The result does not depend on file order.
    #[default]
    TwoPass,

    /// Attach methods while merging. A method whose receiver type has not
    /// been merged yet is dropped, so the result depends on file order.
    Streaming,
}

/// Output of one aggregation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregation {
    pub model: ProjectModel,
    pub diagnostics: Diagnostics,
}

#[derive(Debug)]
struct PendingMethod {
    path: PathBuf,
    package: String,
    fact: FunctionFact,
}

/// Folds per-file syntax facts into a single `ProjectModel`.
///
/// The aggregator owns the model for the duration of a run; `finish` hands it
/// to the caller. `merge` takes `&mut self`, so concurrent producers must
/// funnel facts through one owner (or a lock) rather than share it.
#[derive(Debug, Default)]
pub struct Aggregator {
    model: ProjectModel,
    diagnostics: Diagnostics,
    mode: AttachMode,
    policy: DuplicatePolicy,
    pending: Vec<PendingMethod>,
    files_merged: usize,
}

impl Aggregator {
    pub fn new(mode: AttachMode, policy: DuplicatePolicy) -> Self {
        Self {
            mode,
            policy,
            ..Default::default()
        }
    }

    /// Files whose facts were folded into the model
    pub fn files_merged(&self) -> usize {
        self.files_merged
    }

    /// Model built so far (methods may still be pending in two-pass mode)
    pub fn model(&self) -> &ProjectModel {
        &self.model
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Record a problem found outside of `merge` (unreadable file, walk error)
    pub fn record(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Fold one file's facts into the model.
    ///
    /// Never fails: a file without a package clause is skipped and every
    /// per-file problem becomes a diagnostic. `path` is only used to tag
    /// diagnostics.
    pub fn merge(&mut self, path: impl AsRef<Path>, facts: FileFacts) {
        let path = path.as_ref();
        let Some(package_name) = facts.package_name().map(str::to_string) else {
            self.diagnostics.record(
                path,
                DiagnosticKind::MissingPackage,
                "no package clause found; file skipped",
            );
            return;
        };

        let FileFacts {
            imports,
            types,
            functions,
            ..
        } = facts;

        let policy = self.policy;
        let package = self.model.package_entry(&package_name);
        for fact in types {
            let incoming = TypeModel::from_fact(fact);
            match package.types.entry(incoming.name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(incoming);
                }
                Entry::Occupied(mut slot) => policy.resolve(slot.get_mut(), incoming),
            }
        }

        self.model
            .imports
            .entry(package_name.clone())
            .or_default()
            .extend(imports.into_iter().map(|import| import.path));

        for fact in functions {
            if self.mode == AttachMode::TwoPass && fact.is_method() {
                self.pending.push(PendingMethod {
                    path: path.to_path_buf(),
                    package: package_name.clone(),
                    fact,
                });
            } else {
                self.attach(path, &package_name, fact);
            }
        }

        self.files_merged += 1;
    }

    /// Merge a sequence of files in order
    pub fn merge_all<P, I>(&mut self, files: I)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = (P, FileFacts)>,
    {
        for (path, facts) in files {
            self.merge(path, facts);
        }
    }

    /// Attach pending methods and hand the snapshot to the caller
    pub fn finish(mut self) -> Aggregation {
        for PendingMethod {
            path,
            package,
            fact,
        } in std::mem::take(&mut self.pending)
        {
            self.attach(&path, &package, fact);
        }

        log::info!(
            "Aggregated {} files: {} packages, {} types, {} functions, {} methods ({} diagnostics)",
            self.files_merged,
            self.model.package_count(),
            self.model.type_count(),
            self.model.function_count(),
            self.model.method_count(),
            self.diagnostics.len()
        );

        Aggregation {
            model: self.model,
            diagnostics: self.diagnostics,
        }
    }

    fn attach(&mut self, path: &Path, package_name: &str, fact: FunctionFact) {
        let Some(package) = self.model.package_mut(package_name) else {
            return;
        };

        let Some(receiver) = fact.receiver.clone() else {
            package
                .functions
                .entry(fact.name.clone())
                .or_insert_with(|| FunctionModel::from(fact));
            return;
        };

        match package.types.get_mut(&receiver) {
            Some(ty) => {
                ty.methods
                    .entry(fact.name.clone())
                    .or_insert_with(|| FunctionModel::from(fact));
            }
            None => self.diagnostics.record(
                path,
                DiagnosticKind::UnresolvedReceiver,
                format!(
                    "method {receiver}.{} dropped: type {receiver} is not declared in package {package_name}",
                    fact.name
                ),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemap_syntax::{TypeFact, TypeKind};

    #[test]
    fn test_two_pass_queues_methods_until_finish() {
        let mut aggregator = Aggregator::default();
        aggregator.merge(
            "a.go",
            FileFacts::new("p")
                .with_type(TypeFact::new("T", TypeKind::Struct))
                .with_function(FunctionFact::method("M", "T")),
        );

        let pending = aggregator.model().find_type("p", "T").unwrap();
        assert!(pending.methods.is_empty());

        let result = aggregator.finish();
        assert!(result.model.find_type("p", "T").unwrap().methods.contains_key("M"));
    }

    #[test]
    fn test_missing_package_discards_everything() {
        let mut aggregator = Aggregator::default();
        aggregator.merge(
            "orphan.go",
            FileFacts::default()
                .import("fmt")
                .with_type(TypeFact::new("T", TypeKind::Struct)),
        );

        assert_eq!(aggregator.files_merged(), 0);
        let result = aggregator.finish();
        assert_eq!(result.model, ProjectModel::default());
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn test_first_method_declaration_wins() {
        let mut aggregator = Aggregator::new(AttachMode::Streaming, DuplicatePolicy::FirstWins);
        aggregator.merge(
            "a.go",
            FileFacts::new("p")
                .with_type(TypeFact::new("T", TypeKind::Struct))
                .with_function(FunctionFact::method("M", "T").returns("int"))
                .with_function(FunctionFact::method("M", "T").returns("string")),
        );

        let result = aggregator.finish();
        let method = &result.model.find_type("p", "T").unwrap().methods["M"];
        assert_eq!(method.returns, vec!["int".to_string()]);
    }
}
