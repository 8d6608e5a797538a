//! schema
//!
//! Node type registry: schema entries describing categories of content
//! nodes, their abstractness, supertypes, and auto-created child slots.
//!
//! # Architecture
//!
//! The [`TypeRegistry`] trait is the read-only lookup surface the
//! reconciliation core consumes. [`Registry`] is the concrete in-memory
//! implementation, built either directly from definitions (tests) or from a
//! `nodetypes.toml` file via [`file::load_registry`].
//!
//! # Inheritance
//!
//! A type's *effective* auto-created children are its own declarations
//! merged over those of its supertype chain; a subtype declaration overrides
//! a supertype's slot of the same name. The merge happens once when the
//! registry is built, so [`NodeTypeDef::required_children`] is always the
//! effective set.
//!
//! # Enumeration Order
//!
//! All listings are lexicographic by type name. This pins traversal order
//! for reconciliation reports.
//!
//! # Example
//!
//! ```
//! use nodetend::core::types::{ChildName, NodeTypeName};
//! use nodetend::schema::{NodeTypeDef, Registry, TypeRegistry};
//!
//! let page = NodeTypeDef::new("acme:page", false)
//!     .with_child("main", "acme:content");
//! let landing = NodeTypeDef::new("acme:landing-page", false)
//!     .with_supertype("acme:page")
//!     .with_child("hero", "acme:banner");
//!
//! let registry = Registry::from_defs(vec![page, landing]).unwrap();
//!
//! // Inherited slot merged into the subtype
//! let landing = registry
//!     .get_type(&NodeTypeName::new("acme:landing-page").unwrap())
//!     .unwrap();
//! assert!(landing
//!     .required_children
//!     .contains_key(&ChildName::new("main").unwrap()));
//! ```

pub mod file;

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::{ChildName, NodeTypeName};

/// Errors from registry lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The requested type is not registered.
    #[error("node type \"{0}\" is not registered")]
    UnknownType(NodeTypeName),
}

/// Errors from building or loading a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Two definitions share a name.
    #[error("node type \"{0}\" is declared more than once")]
    DuplicateType(NodeTypeName),

    /// A declared supertype is not itself declared.
    #[error("node type \"{ty}\" declares unknown supertype \"{supertype}\"")]
    UnknownSupertype {
        ty: NodeTypeName,
        supertype: NodeTypeName,
    },

    /// The supertype relation contains a cycle.
    #[error("supertype cycle involving node type \"{0}\"")]
    SupertypeCycle(NodeTypeName),

    /// Schema file could not be read.
    #[error("failed to read schema file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Schema file could not be parsed.
    #[error("failed to parse schema file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

/// A node type definition.
///
/// `required_children` is the effective auto-created child slot set, i.e.
/// inheritance has already been applied when the definition comes out of a
/// [`Registry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTypeDef {
    /// Unique name within the registry.
    pub name: NodeTypeName,
    /// Abstract types have no direct instances.
    pub is_abstract: bool,
    /// Direct supertypes, in declaration order.
    pub supertypes: Vec<NodeTypeName>,
    /// Auto-created child slots: slot name to expected child type.
    pub required_children: BTreeMap<ChildName, NodeTypeName>,
}

impl NodeTypeDef {
    /// Create a definition with no supertypes and no child slots.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a valid node type name. Intended for
    /// statically-known names (tests, fixtures); parse untrusted input with
    /// [`NodeTypeName::new`] first.
    pub fn new(name: &str, is_abstract: bool) -> Self {
        Self {
            name: NodeTypeName::new(name).expect("valid node type name"),
            is_abstract,
            supertypes: Vec::new(),
            required_children: BTreeMap::new(),
        }
    }

    /// Add a direct supertype.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a valid node type name.
    pub fn with_supertype(mut self, name: &str) -> Self {
        self.supertypes
            .push(NodeTypeName::new(name).expect("valid node type name"));
        self
    }

    /// Add an auto-created child slot.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not a valid child name or `ty` is not a valid
    /// node type name.
    pub fn with_child(mut self, slot: &str, ty: &str) -> Self {
        self.required_children.insert(
            ChildName::new(slot).expect("valid child name"),
            NodeTypeName::new(ty).expect("valid node type name"),
        );
        self
    }
}

/// Read-only lookup surface over a node type schema.
///
/// The reconciliation core consumes this trait; it never mutates the schema.
pub trait TypeRegistry {
    /// Check whether a type is registered.
    fn has_type(&self, name: &NodeTypeName) -> bool;

    /// Fetch the authoritative definition for a type name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownType`] if the name is not registered.
    fn get_type(&self, name: &NodeTypeName) -> Result<NodeTypeDef, RegistryError>;

    /// All registered types, lexicographic by name.
    fn list_all_types(&self) -> Vec<NodeTypeDef>;

    /// All transitive subtypes of a type, lexicographic by name.
    ///
    /// The named type itself is never included. With
    /// `include_abstract == false`, abstract subtypes are filtered from the
    /// result but still connect their concrete descendants.
    fn list_subtypes(&self, name: &NodeTypeName, include_abstract: bool) -> Vec<NodeTypeDef>;
}

/// In-memory node type registry.
#[derive(Debug, Clone)]
pub struct Registry {
    types: BTreeMap<NodeTypeName, NodeTypeDef>,
}

impl Registry {
    /// Build a registry from definitions.
    ///
    /// Validates that names are unique, supertype references resolve, and
    /// the supertype relation is acyclic; then merges auto-created children
    /// down the supertype chain (subtype slots override supertype slots of
    /// the same name; among multiple supertypes, later declarations win).
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] describing the first violation found.
    pub fn from_defs(defs: Vec<NodeTypeDef>) -> Result<Self, SchemaError> {
        let mut types: BTreeMap<NodeTypeName, NodeTypeDef> = BTreeMap::new();
        for def in defs {
            if types.contains_key(&def.name) {
                return Err(SchemaError::DuplicateType(def.name));
            }
            types.insert(def.name.clone(), def);
        }

        // Supertype references must resolve
        for def in types.values() {
            for supertype in &def.supertypes {
                if !types.contains_key(supertype) {
                    return Err(SchemaError::UnknownSupertype {
                        ty: def.name.clone(),
                        supertype: supertype.clone(),
                    });
                }
            }
        }

        // Merge inherited child slots; detects cycles along the way
        let names: Vec<NodeTypeName> = types.keys().cloned().collect();
        let mut effective: BTreeMap<NodeTypeName, BTreeMap<ChildName, NodeTypeName>> =
            BTreeMap::new();
        for name in &names {
            let mut in_progress = BTreeSet::new();
            Self::effective_children(name, &types, &mut effective, &mut in_progress)?;
        }
        for (name, children) in effective {
            if let Some(def) = types.get_mut(&name) {
                def.required_children = children;
            }
        }

        Ok(Self { types })
    }

    fn effective_children(
        name: &NodeTypeName,
        types: &BTreeMap<NodeTypeName, NodeTypeDef>,
        memo: &mut BTreeMap<NodeTypeName, BTreeMap<ChildName, NodeTypeName>>,
        in_progress: &mut BTreeSet<NodeTypeName>,
    ) -> Result<BTreeMap<ChildName, NodeTypeName>, SchemaError> {
        if let Some(children) = memo.get(name) {
            return Ok(children.clone());
        }
        if !in_progress.insert(name.clone()) {
            return Err(SchemaError::SupertypeCycle(name.clone()));
        }

        // Supertype references were checked above
        let def = &types[name];
        let mut merged: BTreeMap<ChildName, NodeTypeName> = BTreeMap::new();
        for supertype in &def.supertypes {
            let inherited = Self::effective_children(supertype, types, memo, in_progress)?;
            merged.extend(inherited);
        }
        merged.extend(def.required_children.clone());

        in_progress.remove(name);
        memo.insert(name.clone(), merged.clone());
        Ok(merged)
    }

    /// Check whether `def` transitively descends from `ancestor`.
    fn descends_from(&self, def: &NodeTypeDef, ancestor: &NodeTypeName) -> bool {
        let mut queue: Vec<&NodeTypeName> = def.supertypes.iter().collect();
        let mut seen: BTreeSet<&NodeTypeName> = BTreeSet::new();
        while let Some(name) = queue.pop() {
            if name == ancestor {
                return true;
            }
            if !seen.insert(name) {
                continue;
            }
            if let Some(parent) = self.types.get(name) {
                queue.extend(parent.supertypes.iter());
            }
        }
        false
    }
}

impl TypeRegistry for Registry {
    fn has_type(&self, name: &NodeTypeName) -> bool {
        self.types.contains_key(name)
    }

    fn get_type(&self, name: &NodeTypeName) -> Result<NodeTypeDef, RegistryError> {
        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownType(name.clone()))
    }

    fn list_all_types(&self) -> Vec<NodeTypeDef> {
        self.types.values().cloned().collect()
    }

    fn list_subtypes(&self, name: &NodeTypeName, include_abstract: bool) -> Vec<NodeTypeDef> {
        self.types
            .values()
            .filter(|def| def.name != *name)
            .filter(|def| self.descends_from(def, name))
            .filter(|def| include_abstract || !def.is_abstract)
            .cloned()
            .collect()
    }
}
