//! # Catalog Crate
//!
//! This crate loads the mark catalog the search runs over.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Item, Attribute, AttributeVector, Catalog, ExclusivitySet)
//! - **parser**: Parse the catalog CSV and the id list files
//! - **index**: Build the catalog, apply the missing-ids list, derive the exclusivity set
//! - **paths**: Data directory layout
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{Catalog, DataPaths, ExclusivitySet};
//!
//! let paths = DataPaths::new("data");
//! let catalog = Catalog::load(&paths)?;
//! let exclusivity = ExclusivitySet::resolve(&paths, &catalog)?;
//!
//! println!("{} marks, {} limited to one", catalog.len(), exclusivity.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;
pub mod paths;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::{initialize_side_files, load_restricted_classes};
pub use paths::{DataPaths, DEFAULT_RESTRICTED_CLASSES};
pub use types::{
    // Type aliases
    ItemId,
    ClassId,
    ATTRIBUTE_COUNT,
    // Core types
    Item,
    AttributeVector,
    Catalog,
    ExclusivitySet,
    SkippedRecord,
    // Enums
    Attribute,
    Quality,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_creation() {
        let catalog = Catalog::new();
        assert!(catalog.is_empty());
        assert!(catalog.skipped().is_empty());
    }

    #[test]
    fn test_insert_item() {
        let mut catalog = Catalog::new();

        let item = Item::new(
            1001,
            Quality::Five,
            "Oath of the King",
            AttributeVector::new([60, 0, 60, 0, 60, 60]),
            "65",
        )
        .with_owner("3021");

        catalog.insert_item(item);

        let retrieved = catalog.get_item(1001).unwrap();
        assert_eq!(retrieved.total_sum, 240);
        assert_eq!(retrieved.owner_restriction.as_deref(), Some("3021"));
    }

    #[test]
    fn test_empty_queries() {
        let catalog = Catalog::new();

        assert!(catalog.get_item(999).is_none());
        assert!(catalog.items_in_class("65").is_empty());
        assert!(catalog.counts_by_quality().is_empty());
    }
}
