//! Level blueprint (`.scene`) parser and `info.txt` metadata reader.
//!
//! This crate is intentionally dependency-free so level tools and editors
//! can read levels without pulling in the engine.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`ast`] | `Blueprint`, `Node`, `Prop`, `Value` |
//! | [`error`] | `ParseError` |
//! | [`lexer`] | `Lexer`, `Token` |
//! | [`parser`] | `parse_str` entry point |
//! | [`info`] | `MetadataRecord` |
//!
//! # Quick start
//!
//! ```rust
//! use strider_format::{parse_str, MetadataRecord};
//!
//! let src = r#"
//!     Level {
//!         Anchor "exit" { x: 10  y: 2 }
//!         Teleporter "gate" { destination: exit }
//!     }
//! "#;
//!
//! let blueprint = parse_str(src).unwrap();
//! assert_eq!(blueprint.root.kind, "Level");
//!
//! let info = MetadataRecord::parse("full_name: Tutorial\ndifficulty: 1");
//! assert_eq!(info.get("full_name"), Some("Tutorial"));
//! ```

pub mod ast;
pub mod error;
pub mod info;
pub mod lexer;
pub mod parser;

pub use ast::{Blueprint, Node, Prop, Value};
pub use error::ParseError;
pub use info::MetadataRecord;
pub use parser::parse_str;
