//! pb: a front end for proto3 schema files.
//!
//! The crate turns proto3 source text into a syntax tree and provides a
//! depth-first traversal over it. A small naming-convention linter is built
//! on top of the traversal.
//!
//! # Quick Start
//!
//! ```rust
//! use pb::ast::{FieldType, Node};
//!
//! let file = pb::parse_str(r#"
//!     syntax = "proto3";
//!     message Person {
//!         string name = 1;
//!         map<string, int32> scores = 2;
//!     }
//! "#).unwrap();
//!
//! let Node::Message(person) = &file.declarations[0] else { unreachable!() };
//! assert_eq!(person.name.name, "Person");
//! let Node::MessageField(scores) = &person.body[1] else { unreachable!() };
//! assert!(matches!(scores.field_type, FieldType::Map(_)));
//!
//! let problems = pb::lint::lint("person.proto", b"syntax = \"proto3\"; enum bad { A = 0; }").unwrap();
//! assert_eq!(problems.len(), 1);
//! ```

pub mod error;
pub mod parser;
pub mod visit;
pub mod lint;

pub use parser::ast;
pub use parser::{parse, parse_file, parse_str};

pub use error::{Error, ParseError};
pub use visit::{walk, NodeRef, Visitor};
