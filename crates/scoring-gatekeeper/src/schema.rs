//! Schemas: ordered field tables bound to a request type
//!
//! Each entry pairs a [`FieldConstraint`] with the setter that stores the
//! normalized value into the typed request. The validator walks the table
//! directly, so the set of assignable fields is fixed at compile time.

use crate::field::{FieldConstraint, FieldValue};

/// Stores a normalized value into a request
pub type Setter<T> = fn(&mut T, FieldValue);

/// One schema entry
pub struct FieldSpec<T> {
    /// Contract of the field
    pub constraint: FieldConstraint,
    /// Where the normalized value goes
    pub set: Setter<T>,
}

impl<T> FieldSpec<T> {
    /// Pair a constraint with its setter
    pub const fn new(constraint: FieldConstraint, set: Setter<T>) -> Self {
        Self { constraint, set }
    }
}

/// Named, ordered set of field constraints for request type `T`
pub struct Schema<T: 'static> {
    /// Schema name, used in logs
    pub name: &'static str,
    /// Field table, evaluated in order
    pub fields: &'static [FieldSpec<T>],
    /// Fields that must all be present before any field rule runs
    pub jointly_required: &'static [&'static str],
}

impl<T: 'static> Schema<T> {
    /// Look up a field's constraint by name
    pub fn constraint(&self, name: &str) -> Option<&FieldConstraint> {
        self.fields
            .iter()
            .map(|spec| &spec.constraint)
            .find(|constraint| constraint.name == name)
    }

    /// Field names in evaluation order
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|spec| spec.constraint.name)
    }
}

impl<T: 'static> std::fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("fields", &self.field_names().collect::<Vec<_>>())
            .field("jointly_required", &self.jointly_required)
            .finish()
    }
}
