//! Code for handling IDs
use anyhow::{Result, ensure};
use std::borrow::Borrow;
use std::collections::HashSet;

macro_rules! define_id_type {
    ($name:ident) => {
        #[derive(
            Clone, std::hash::Hash, PartialEq, Eq, serde::Deserialize, Debug, serde::Serialize,
        )]
        /// An ID type (e.g. `UnitID`)
        pub struct $name(pub std::rc::Rc<str>);

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(std::rc::Rc::from(s))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(std::rc::Rc::from(s))
            }
        }

        impl $name {
            /// Create a new ID from a string slice
            pub fn new(id: &str) -> Self {
                $name(std::rc::Rc::from(id))
            }

            /// The ID as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}
pub(crate) use define_id_type;

/// Indicates that the struct has an ID field
pub trait HasID<ID> {
    /// Get the struct's ID
    fn get_id(&self) -> &ID;
}

/// Implement the `HasID` trait for the given type, assuming it has a field called `id`
macro_rules! define_id_getter {
    ($t:ty, $id_ty:ty) => {
        impl crate::id::HasID<$id_ty> for $t {
            fn get_id(&self) -> &$id_ty {
                &self.id
            }
        }
    };
}
pub(crate) use define_id_getter;

/// Check that IDs are non-empty and that no ID appears more than once.
pub fn check_ids_unique<'a, ID, T, I>(items: I) -> Result<()>
where
    ID: std::hash::Hash + Eq + Borrow<str> + std::fmt::Display + 'a,
    T: HasID<ID> + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut seen = HashSet::new();
    for item in items {
        let id = item.get_id();
        let id_str: &str = id.borrow();
        ensure!(!id_str.trim().is_empty(), "IDs cannot be empty");
        ensure!(seen.insert(id), "Duplicate ID found: {id}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;

    define_id_type!(GenericID);

    struct Item {
        id: GenericID,
    }
    define_id_getter! {Item, GenericID}

    fn items(ids: &[&str]) -> Vec<Item> {
        ids.iter().map(|id| Item { id: (*id).into() }).collect()
    }

    #[test]
    fn test_check_ids_unique() {
        assert!(check_ids_unique(&items(&["a", "b", "c"])).is_ok());
        assert_error!(
            check_ids_unique(&items(&["a", "b", "a"])),
            "Duplicate ID found: a"
        );
        assert_error!(check_ids_unique(&items(&["a", " "])), "IDs cannot be empty");
    }
}
