//! Parse a C source file and dump its AST as a YAML document.
//!
//! The pipeline has three stages:
//! - [`parser`]: lexing and recursive descent parsing of a practical C
//!   subset into an AST, with typedef-aware disambiguation
//! - [`doc`]: flattening the AST into an ordered, serializer-agnostic
//!   document tree
//! - serialization: handled by serde, so any serde format writer works
//!
//! ```
//! let unit = cdump::parse("int a; int b;").unwrap();
//! let doc = cdump::flatten(&unit);
//! let yaml = serde_yaml::to_string(&doc).unwrap();
//! assert!(yaml.starts_with("kind: translation_unit"));
//! ```

pub mod doc;
pub mod parser;

pub use doc::{flatten, DocNode};
pub use parser::{parse, Error, TranslationUnit};
