//! schema::file
//!
//! TOML schema files.
//!
//! # Layout
//!
//! A repository declares its node types in `nodetypes.toml` at the
//! repository root:
//!
//! ```toml
//! [types."acme:document"]
//! abstract = true
//!
//! [types."acme:page"]
//! supertypes = ["acme:document"]
//!
//! [types."acme:page".children]
//! main = "acme:content-collection"
//! ```
//!
//! Keys are validated node type / child names; loading fails on malformed
//! names, unresolved supertypes, or supertype cycles.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::{NodeTypeDef, Registry, SchemaError};
use crate::core::types::{ChildName, NodeTypeName};

/// File name of the schema within a repository root.
pub const SCHEMA_FILE_NAME: &str = "nodetypes.toml";

/// On-disk schema document.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SchemaFile {
    types: BTreeMap<NodeTypeName, TypeDecl>,
}

/// One type declaration.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TypeDecl {
    #[serde(rename = "abstract")]
    is_abstract: bool,
    supertypes: Vec<NodeTypeName>,
    children: BTreeMap<ChildName, NodeTypeName>,
}

/// Load and validate a registry from a schema file.
///
/// # Errors
///
/// Returns [`SchemaError::ReadError`] / [`SchemaError::ParseError`] for I/O
/// and syntax problems, and the validation variants from
/// [`Registry::from_defs`] for semantic ones.
pub fn load_registry(path: &Path) -> Result<Registry, SchemaError> {
    let contents = fs::read_to_string(path).map_err(|e| SchemaError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_registry(&contents).map_err(|e| match e {
        SchemaError::ParseError { message, .. } => SchemaError::ParseError {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })
}

/// Parse and validate a registry from schema file contents.
pub fn parse_registry(contents: &str) -> Result<Registry, SchemaError> {
    let file: SchemaFile = toml::from_str(contents).map_err(|e| SchemaError::ParseError {
        path: Path::new(SCHEMA_FILE_NAME).to_path_buf(),
        message: e.to_string(),
    })?;

    let defs = file
        .types
        .into_iter()
        .map(|(name, decl)| NodeTypeDef {
            name,
            is_abstract: decl.is_abstract,
            supertypes: decl.supertypes,
            required_children: decl.children,
        })
        .collect();

    Registry::from_defs(defs)
}
