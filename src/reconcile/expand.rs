//! reconcile::expand
//!
//! Type expansion: a root type plus its concrete subtype closure.

use crate::core::types::NodeTypeName;
use crate::schema::{NodeTypeDef, RegistryError, TypeRegistry};

/// Expand a root type into its reconciliation closure.
///
/// The caller's value is treated as a name hint only: the authoritative
/// definition is always re-fetched from the registry. The closure is the
/// root's non-abstract transitive subtypes in registry enumeration order,
/// with the root itself merged in last. The merge is an ordered map keyed by
/// name with last-write-wins, position-preserving semantics, so a duplicate
/// name never appears twice and never changes traversal order.
///
/// The root is part of its own closure even when it is abstract; filtering
/// abstract roots is the caller's concern.
///
/// # Errors
///
/// Returns [`RegistryError::UnknownType`] if the root name cannot be
/// resolved against the registry.
pub fn expand(
    registry: &dyn TypeRegistry,
    root: &NodeTypeName,
) -> Result<Vec<(NodeTypeName, NodeTypeDef)>, RegistryError> {
    let root_def = registry.get_type(root)?;

    let mut closure: Vec<(NodeTypeName, NodeTypeDef)> = Vec::new();
    for def in registry.list_subtypes(&root_def.name, false) {
        insert_last_write_wins(&mut closure, def);
    }
    insert_last_write_wins(&mut closure, root_def);

    Ok(closure)
}

/// Insert keyed by name: replace in place if present, append otherwise.
fn insert_last_write_wins(closure: &mut Vec<(NodeTypeName, NodeTypeDef)>, def: NodeTypeDef) {
    match closure.iter_mut().find(|(name, _)| *name == def.name) {
        Some(entry) => entry.1 = def,
        None => {
            let name = def.name.clone();
            closure.push((name, def));
        }
    }
}
