//! Struct field resolution.
//!
//! A struct's effective shape is its own fields plus everything it
//! inherits through `extends`. [`resolve_struct_fields`] flattens that
//! chain into a single ordered list; [`FieldCache`] memoizes the result
//! for validators on a hot path.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::schema::{FieldDef, Schema};

/// Flattens a struct's inheritance chain into its effective field list.
///
/// The chain is walked to the root ancestor first, so inherited fields
/// come before the fields a child declares. A child field whose name
/// collides with an inherited one replaces it in place, keeping the
/// ancestor's position. The result preserves each field's declared type
/// and optionality.
///
/// Resolution never fails: a name that is not a struct yields an empty
/// list, and a missing parent simply ends the chain. [`Schema::check`]
/// is the strict counterpart that reports such defects.
///
/// # Example
///
/// ```rust
/// use bouncer::{resolve_struct_fields, Schema, StructDef, TypeRef};
///
/// let schema = Schema::new()
///     .with_struct(StructDef::new("Base").field("id", TypeRef::int()))
///     .with_struct(
///         StructDef::new("User")
///             .extends("Base")
///             .field("name", TypeRef::string()),
///     );
///
/// let fields = resolve_struct_fields("User", &schema);
/// let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
/// assert_eq!(names, ["id", "name"]);
/// ```
pub fn resolve_struct_fields(struct_name: &str, schema: &Schema) -> Vec<FieldDef> {
    let mut seen = HashSet::new();
    resolve_chain(struct_name, schema, &mut seen)
}

fn resolve_chain<'s>(
    name: &str,
    schema: &'s Schema,
    seen: &mut HashSet<&'s str>,
) -> Vec<FieldDef> {
    let Some(def) = schema.find_struct(name) else {
        return Vec::new();
    };
    // A cyclic extends chain ends here the same way a missing parent
    // does; Schema::check reports the cycle itself.
    if !seen.insert(def.name.as_str()) {
        return Vec::new();
    }

    let mut fields = match def.extends.as_deref() {
        Some(parent) => resolve_chain(parent, schema, seen),
        None => Vec::new(),
    };

    for field in &def.fields {
        match fields.iter().position(|f| f.name == field.name) {
            Some(slot) => fields[slot] = field.clone(),
            None => fields.push(field.clone()),
        }
    }
    fields
}

/// A concurrent memo of resolved field lists, keyed by struct name.
///
/// The cache is independent of any one schema; pair it with the schema
/// it was filled from. Entries are computed on first request and shared
/// as `Arc<[FieldDef]>` thereafter, so concurrent readers never see a
/// partially built list.
///
/// # Example
///
/// ```rust
/// use bouncer::{FieldCache, Schema, StructDef, TypeRef};
///
/// let schema = Schema::new()
///     .with_struct(StructDef::new("User").field("id", TypeRef::int()));
/// let cache = FieldCache::new();
///
/// let first = cache.resolved("User", &schema);
/// let again = cache.resolved("User", &schema);
/// assert_eq!(first, again);
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct FieldCache {
    resolved: RwLock<HashMap<String, Arc<[FieldDef]>>>,
}

impl FieldCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the resolved field list for `struct_name`, computing and
    /// storing it on the first request.
    pub fn resolved(&self, struct_name: &str, schema: &Schema) -> Arc<[FieldDef]> {
        if let Some(hit) = self.resolved.read().get(struct_name) {
            return Arc::clone(hit);
        }

        let fields: Arc<[FieldDef]> = resolve_struct_fields(struct_name, schema).into();
        // Racing writers compute identical lists; the first insert wins.
        Arc::clone(
            self.resolved
                .write()
                .entry(struct_name.to_string())
                .or_insert(fields),
        )
    }

    /// Returns the number of memoized struct names.
    pub fn len(&self) -> usize {
        self.resolved.read().len()
    }

    /// Returns true if nothing has been memoized yet.
    pub fn is_empty(&self) -> bool {
        self.resolved.read().is_empty()
    }
}

// FieldCache is shared by reference across validators, so losing Send or
// Sync would be a breaking change. These assertions keep that visible.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<FieldCache>();
    assert_sync::<FieldCache>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{StructDef, TypeRef};

    fn animal_schema() -> Schema {
        Schema::new()
            .with_struct(
                StructDef::new("Animal")
                    .field("id", TypeRef::int())
                    .field("name", TypeRef::string()),
            )
            .with_struct(
                StructDef::new("Dog")
                    .extends("Animal")
                    .field("breed", TypeRef::string()),
            )
            .with_struct(
                StructDef::new("Puppy")
                    .extends("Dog")
                    .optional("toy", TypeRef::string()),
            )
    }

    fn names(fields: &[FieldDef]) -> Vec<&str> {
        fields.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_struct_without_parent_yields_own_fields() {
        let fields = resolve_struct_fields("Animal", &animal_schema());
        assert_eq!(names(&fields), ["id", "name"]);
    }

    #[test]
    fn test_ancestor_fields_come_first() {
        let schema = animal_schema();
        assert_eq!(
            names(&resolve_struct_fields("Dog", &schema)),
            ["id", "name", "breed"]
        );
        assert_eq!(
            names(&resolve_struct_fields("Puppy", &schema)),
            ["id", "name", "breed", "toy"]
        );
    }

    #[test]
    fn test_child_redeclaration_replaces_in_place() {
        let schema = Schema::new()
            .with_struct(
                StructDef::new("Base")
                    .field("id", TypeRef::string())
                    .field("name", TypeRef::string()),
            )
            .with_struct(
                StructDef::new("Child")
                    .extends("Base")
                    .field("id", TypeRef::int()),
            );

        let fields = resolve_struct_fields("Child", &schema);
        assert_eq!(names(&fields), ["id", "name"]);
        assert_eq!(fields[0].type_ref, TypeRef::int());
    }

    #[test]
    fn test_redeclaration_can_change_optionality() {
        let schema = Schema::new()
            .with_struct(StructDef::new("Base").optional("note", TypeRef::string()))
            .with_struct(
                StructDef::new("Strict")
                    .extends("Base")
                    .field("note", TypeRef::string()),
            );

        let fields = resolve_struct_fields("Strict", &schema);
        assert_eq!(fields.len(), 1);
        assert!(!fields[0].optional);
    }

    #[test]
    fn test_unknown_struct_yields_empty_list() {
        assert!(resolve_struct_fields("Ghost", &animal_schema()).is_empty());
    }

    #[test]
    fn test_missing_parent_truncates_chain() {
        let schema = Schema::new().with_struct(
            StructDef::new("Orphan")
                .extends("Gone")
                .field("own", TypeRef::bool()),
        );

        let fields = resolve_struct_fields("Orphan", &schema);
        assert_eq!(names(&fields), ["own"]);
    }

    #[test]
    fn test_cyclic_extends_terminates() {
        let schema = Schema::new()
            .with_struct(StructDef::new("A").extends("B").field("a", TypeRef::int()))
            .with_struct(StructDef::new("B").extends("A").field("b", TypeRef::int()));

        let fields = resolve_struct_fields("A", &schema);
        assert_eq!(names(&fields), ["b", "a"]);
    }

    #[test]
    fn test_cache_returns_same_list() {
        let schema = animal_schema();
        let cache = FieldCache::new();

        let first = cache.resolved("Puppy", &schema);
        let again = cache.resolved("Puppy", &schema);
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(names(&first), ["id", "name", "breed", "toy"]);
    }

    #[test]
    fn test_cache_memoizes_per_name() {
        let schema = animal_schema();
        let cache = FieldCache::new();
        assert!(cache.is_empty());

        cache.resolved("Animal", &schema);
        cache.resolved("Dog", &schema);
        cache.resolved("Animal", &schema);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_memoizes_unknown_names_as_empty() {
        let schema = animal_schema();
        let cache = FieldCache::new();

        assert!(cache.resolved("Ghost", &schema).is_empty());
        assert_eq!(cache.len(), 1);
    }
}
