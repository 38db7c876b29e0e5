//! # Codemap Syntax
//!
//! Parser-agnostic syntax facts for the codemap structure indexer.
//!
//! ## Philosophy
//!
//! The indexer never looks at parser node names. Each source file is reduced
//! to a small, closed set of facts:
//! - the declared package
//! - imported paths
//! - top-level type declarations (with fields and interface methods)
//! - top-level functions and methods (with receiver, parameters, returns)
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     │
//!     ├──> Language Detection (from extension)
//!     │
//!     ├──> Tree-sitter Parsing → AST
//!     │
//!     ├──> Top-level Dispatch
//!     │    ├─> package clause     → SyntaxFact::Package
//!     │    ├─> import declaration → SyntaxFact::Import
//!     │    ├─> type declaration   → SyntaxFact::Type
//!     │    └─> func / method      → SyntaxFact::Function
//!     │
//!     └──> FileFacts (folded fact stream)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use codemap_syntax::{FactExtractor, GoExtractor};
//!
//! let extractor = GoExtractor::default();
//! let facts = extractor
//!     .extract("package demo\n\nfunc Hello() string { return \"hi\" }\n")
//!     .unwrap();
//!
//! assert_eq!(facts.package_name(), Some("demo"));
//! assert_eq!(facts.functions[0].name, "Hello");
//! ```

mod config;
mod error;
mod extractor;
mod go;
mod language;
mod types;

pub use config::ExtractorConfig;
pub use error::{Result, SyntaxError};
pub use extractor::FactExtractor;
pub use go::GoExtractor;
pub use language::Language;
pub use types::{
    FieldFact, FileFacts, FunctionFact, ImportFact, Parameter, SyntaxFact, TypeFact, TypeKind,
};
