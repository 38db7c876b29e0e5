//! # Codemap Model
//!
//! Cross-file structural model of a codebase, folded from per-file syntax facts.
//!
//! ## Features
//!
//! - **Package merge** - every file declaring the same package feeds one `PackageModel`
//! - **Type registration** - create-if-absent, duplicates resolved by an explicit policy
//! - **Method attachment** - two-pass (order independent) or streaming (order dependent)
//! - **Diagnostics** - per-file problems are recorded, never fatal
//! - **Relations** - optional post-pass for contains / implements / imports edges
//!
//! ## Architecture
//!
//! ```text
//! (path, FileFacts)*
//!     │
//!     ├──> Aggregator::merge
//!     │      ├─ package: create-if-absent
//!     │      ├─ imports: append
//!     │      ├─ types:   create-if-absent (DuplicatePolicy)
//!     │      └─ funcs:   attach now (streaming) or queue (two-pass)
//!     │
//!     ├──> Aggregator::finish
//!     │      └─ attach queued methods/functions
//!     │
//!     ├──> RelationDetector (optional)
//!     │      └─ contains / implements / imports
//!     │
//!     └──> ProjectModel + Diagnostics (read-only snapshot)
//!            └─ RelationGraph (petgraph view)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use codemap_model::Aggregator;
//! use codemap_syntax::{FileFacts, FunctionFact, TypeFact, TypeKind};
//!
//! let mut aggregator = Aggregator::default();
//! aggregator.merge(
//!     "pkg/name.go",
//!     FileFacts::new("pkg").with_function(FunctionFact::method("Name", "Service")),
//! );
//! aggregator.merge(
//!     "pkg/service.go",
//!     FileFacts::new("pkg").with_type(TypeFact::new("Service", TypeKind::Struct)),
//! );
//!
//! let result = aggregator.finish();
//! let service = result.model.find_type("pkg", "Service").unwrap();
//! assert!(service.methods.contains_key("Name"));
//! assert!(result.diagnostics.is_empty());
//! ```

mod aggregator;
mod diagnostics;
mod error;
mod graph;
mod policy;
mod relations;
mod types;

pub use aggregator::{Aggregation, Aggregator, AttachMode};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{ModelError, Result};
pub use graph::{GraphEdge, GraphNode, NodeKind, RelationGraph, RelationKind};
pub use policy::DuplicatePolicy;
pub use relations::{RelationDetector, CONTAINS, IMPLEMENTS, IMPORTS};
pub use types::{FunctionModel, PackageModel, ProjectModel, TypeModel};

pub use codemap_syntax::{Parameter, TypeKind};
