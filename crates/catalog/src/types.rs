//! Core domain types for the mark catalog.
//!
//! This module defines the fundamental data structures used throughout the system:
//! - Type aliases for ids (ItemId, ClassId)
//! - `Attribute` and `Quality` enums for the fixed stat dimensions and rarity tiers
//! - `AttributeVector`, the six stat values a mark carries
//! - `Item`, one catalog entry
//! - `Catalog`, the in-memory collection with its lookup indices
//! - `ExclusivitySet`, ids that may appear at most once per combination

use crate::error::DataLoadError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a mark in the game catalog
pub type ItemId = u32;

/// Series identifier (the source data stores these as strings such as "65")
pub type ClassId = String;

/// Number of stat dimensions on every mark
pub const ATTRIBUTE_COUNT: usize = 6;

// =============================================================================
// Attribute
// =============================================================================

/// One of the six stat dimensions, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Attack,
    Defense,
    SpAtk,
    SpDef,
    Speed,
    Hp,
}

impl Attribute {
    /// All attributes in vector order
    pub const ALL: [Attribute; ATTRIBUTE_COUNT] = [
        Attribute::Attack,
        Attribute::Defense,
        Attribute::SpAtk,
        Attribute::SpDef,
        Attribute::Speed,
        Attribute::Hp,
    ];

    /// Position of this attribute inside an `AttributeVector`
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Machine name used in config files and on the command line
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Attack => "attack",
            Attribute::Defense => "defense",
            Attribute::SpAtk => "sp_atk",
            Attribute::SpDef => "sp_def",
            Attribute::Speed => "speed",
            Attribute::Hp => "hp",
        }
    }

    /// Column header used in the snapshot and result log files.
    ///
    /// Existing spreadsheets look columns up by these labels, so they must
    /// not change.
    pub fn column_label(self) -> &'static str {
        match self {
            Attribute::Attack => "攻击",
            Attribute::Defense => "防御",
            Attribute::SpAtk => "特攻",
            Attribute::SpDef => "特防",
            Attribute::Speed => "速度",
            Attribute::Hp => "体力",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = DataLoadError;

    /// Accepts the machine name, a few common short forms, the column label,
    /// or the numeric index 0-5.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let attribute = match normalized.as_str() {
            "attack" | "atk" | "0" => Some(Attribute::Attack),
            "defense" | "def" | "1" => Some(Attribute::Defense),
            "sp_atk" | "spatk" | "special_attack" | "2" => Some(Attribute::SpAtk),
            "sp_def" | "spdef" | "special_defense" | "3" => Some(Attribute::SpDef),
            "speed" | "spe" | "4" => Some(Attribute::Speed),
            "hp" | "5" => Some(Attribute::Hp),
            _ => Self::ALL
                .into_iter()
                .find(|attribute| attribute.column_label() == s.trim()),
        };
        attribute.ok_or_else(|| DataLoadError::InvalidValue {
            field: "attribute".to_string(),
            value: s.to_string(),
        })
    }
}

// =============================================================================
// Quality
// =============================================================================

/// Rarity tier of a mark (the game calls these 2- to 5-corner marks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Quality {
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
}

impl Quality {
    /// The tier the total-sum bucket filter applies to
    pub const HIGHEST: Quality = Quality::Five;

    pub const ALL: [Quality; 4] = [Quality::Two, Quality::Three, Quality::Four, Quality::Five];

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Quality {
    type Error = DataLoadError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Quality::Two),
            3 => Ok(Quality::Three),
            4 => Ok(Quality::Four),
            5 => Ok(Quality::Five),
            _ => Err(DataLoadError::InvalidValue {
                field: "quality".to_string(),
                value: value.to_string(),
            }),
        }
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.as_u8()
    }
}

impl FromStr for Quality {
    type Err = DataLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s.trim().parse().map_err(|_| DataLoadError::InvalidValue {
            field: "quality".to_string(),
            value: s.to_string(),
        })?;
        Quality::try_from(value)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

// =============================================================================
// AttributeVector
// =============================================================================

/// The six stat values of a mark, or the per-attribute sum of several marks.
///
/// Values may be negative; some marks trade one stat for another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AttributeVector(pub [i32; ATTRIBUTE_COUNT]);

impl AttributeVector {
    pub fn new(values: [i32; ATTRIBUTE_COUNT]) -> Self {
        Self(values)
    }

    pub fn get(&self, attribute: Attribute) -> i32 {
        self.0[attribute.index()]
    }

    pub fn values(&self) -> &[i32; ATTRIBUTE_COUNT] {
        &self.0
    }

    /// Sum over all six dimensions, saturating at the `i32` bounds
    pub fn total(&self) -> i32 {
        self.0.iter().fold(0i32, |acc, &value| acc.saturating_add(value))
    }

    /// Sum over all six dimensions, `None` if it does not fit in an `i32`
    pub fn checked_total(&self) -> Option<i32> {
        self.0.iter().try_fold(0i32, |acc, &value| acc.checked_add(value))
    }

    /// Sum over a subset of dimensions, saturating
    pub fn sum_of(&self, attributes: &[Attribute]) -> i32 {
        attributes
            .iter()
            .fold(0i32, |acc, &attribute| acc.saturating_add(self.get(attribute)))
    }

    pub fn has_negative(&self) -> bool {
        self.0.iter().any(|&value| value < 0)
    }
}

/// Per-attribute addition; each component saturates instead of overflowing
impl Add for AttributeVector {
    type Output = AttributeVector;

    fn add(self, rhs: Self) -> Self::Output {
        let mut values = self.0;
        for (value, other) in values.iter_mut().zip(rhs.0) {
            *value = value.saturating_add(other);
        }
        AttributeVector(values)
    }
}

impl std::iter::Sum for AttributeVector {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(AttributeVector::default(), Add::add)
    }
}

impl FromStr for AttributeVector {
    type Err = DataLoadError;

    /// Parse the catalog's space-separated form, e.g. `"10 0 -5 0 20 0"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        if tokens.len() != ATTRIBUTE_COUNT {
            return Err(DataLoadError::AttributeCount {
                expected: ATTRIBUTE_COUNT,
                found: tokens.len(),
            });
        }

        let mut values = [0; ATTRIBUTE_COUNT];
        for (slot, token) in values.iter_mut().zip(tokens) {
            *slot = token.parse().map_err(|_| DataLoadError::InvalidValue {
                field: "total_attr_value".to_string(),
                value: token.to_string(),
            })?;
        }
        Ok(AttributeVector(values))
    }
}

impl fmt::Display for AttributeVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|v| v.to_string()).collect();
        f.write_str(&parts.join(" "))
    }
}

// =============================================================================
// Item
// =============================================================================

/// One mark from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub quality: Quality,
    pub description: String,
    pub attributes: AttributeVector,
    /// Cached sum of `attributes`, as shipped in the catalog file
    pub total_sum: i32,
    pub class_id: ClassId,
    /// Creature id this mark is bound to, if it is an exclusive mark
    pub owner_restriction: Option<String>,
}

impl Item {
    /// Build an unrestricted item, computing `total_sum` from the vector
    pub fn new(
        id: ItemId,
        quality: Quality,
        description: impl Into<String>,
        attributes: AttributeVector,
        class_id: impl Into<ClassId>,
    ) -> Self {
        Self {
            id,
            quality,
            description: description.into(),
            total_sum: attributes.total(),
            attributes,
            class_id: class_id.into(),
            owner_restriction: None,
        }
    }

    /// Bind the item to a creature
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner_restriction = Some(owner.into());
        self
    }
}

// =============================================================================
// Catalog - The in-memory collection
// =============================================================================

/// A record the loader could not use, kept for reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// 1-based line in the source file (header is line 1)
    pub line: usize,
    pub reason: String,
}

/// Ordered mark catalog with id and series lookups.
///
/// Iteration order is the source file order; downstream stages rely on it
/// for deterministic output.
#[derive(Debug, Default)]
pub struct Catalog {
    pub(crate) items: Vec<Item>,
    pub(crate) by_id: HashMap<ItemId, usize>,
    pub(crate) class_index: HashMap<ClassId, Vec<ItemId>>,
    pub(crate) skipped: Vec<SkippedRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from already-parsed items
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut catalog = Self::new();
        for item in items {
            catalog.insert_item(item);
        }
        catalog
    }

    /// Insert an item.
    ///
    /// Returns `false` (and keeps the first entry) when the id is already present.
    pub fn insert_item(&mut self, item: Item) -> bool {
        if self.by_id.contains_key(&item.id) {
            return false;
        }
        self.by_id.insert(item.id, self.items.len());
        self.class_index
            .entry(item.class_id.clone())
            .or_default()
            .push(item.id);
        self.items.push(item);
        true
    }

    pub fn get_item(&self, id: ItemId) -> Option<&Item> {
        self.by_id.get(&id).map(|&position| &self.items[position])
    }

    /// All items in source order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Ids of every item in a series
    pub fn items_in_class(&self, class_id: &str) -> &[ItemId] {
        self.class_index
            .get(class_id)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    /// Records dropped while loading
    pub fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn counts_by_quality(&self) -> BTreeMap<Quality, usize> {
        let mut counts = BTreeMap::new();
        for item in &self.items {
            *counts.entry(item.quality).or_insert(0) += 1;
        }
        counts
    }

    /// Derive the exclusivity set: every item belonging to a restricted series
    pub fn exclusivity_set(&self, restricted_classes: &HashSet<ClassId>) -> ExclusivitySet {
        restricted_classes
            .iter()
            .flat_map(|class_id| self.items_in_class(class_id).iter().copied())
            .collect()
    }

    /// Consume the catalog, yielding its items in source order
    pub fn into_items(self) -> Vec<Item> {
        self.items
    }
}

// =============================================================================
// ExclusivitySet
// =============================================================================

/// Ids of "limited to one" marks: none of them may be picked twice in one combination
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusivitySet(HashSet<ItemId>);

impl ExclusivitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.0.contains(&id)
    }

    pub fn insert(&mut self, id: ItemId) -> bool {
        self.0.insert(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Ids in ascending order, for stable file output
    pub fn sorted_ids(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self.0.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl FromIterator<ItemId> for ExclusivitySet {
    fn from_iter<T: IntoIterator<Item = ItemId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_vector_parse() {
        let vector: AttributeVector = "10 0 -5 0 20 3".parse().unwrap();
        assert_eq!(vector.values(), &[10, 0, -5, 0, 20, 3]);
        assert_eq!(vector.total(), 28);
        assert!(vector.has_negative());
        assert_eq!(vector.get(Attribute::Speed), 20);
    }

    #[test]
    fn test_attribute_vector_rejects_wrong_length() {
        let err = "1 2 3".parse::<AttributeVector>().unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::AttributeCount { expected: 6, found: 3 }
        ));
    }

    #[test]
    fn test_attribute_vector_rejects_non_numeric() {
        let err = "1 2 x 4 5 6".parse::<AttributeVector>().unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidValue { .. }));
    }

    #[test]
    fn test_attribute_vector_sum() {
        let a = AttributeVector::new([1, 2, 3, 4, 5, 6]);
        let b = AttributeVector::new([-1, 0, 1, 0, 0, 10]);
        let total: AttributeVector = [a, b, b].into_iter().sum();
        assert_eq!(total.values(), &[-1, 2, 5, 4, 5, 26]);
    }

    #[test]
    fn test_attribute_vector_sums_saturate() {
        let big = AttributeVector::new([1_500_000_000, -1_500_000_000, 0, 0, 0, 0]);
        let total: AttributeVector = [big, big, big].into_iter().sum();
        assert_eq!(total.get(Attribute::Attack), i32::MAX);
        assert_eq!(total.get(Attribute::Defense), i32::MIN);

        let wide = AttributeVector::new([2_000_000_000, 2_000_000_000, 0, 0, 0, 0]);
        assert_eq!(wide.checked_total(), None);
        assert_eq!(wide.total(), i32::MAX);
        assert_eq!(wide.sum_of(&[Attribute::Attack, Attribute::Defense]), i32::MAX);
        assert_eq!(AttributeVector::new([1, 2, 3, 0, 0, -1]).checked_total(), Some(5));
    }

    #[test]
    fn test_attribute_from_str() {
        assert_eq!("speed".parse::<Attribute>().unwrap(), Attribute::Speed);
        assert_eq!("SP_ATK".parse::<Attribute>().unwrap(), Attribute::SpAtk);
        assert_eq!("5".parse::<Attribute>().unwrap(), Attribute::Hp);
        assert_eq!("体力".parse::<Attribute>().unwrap(), Attribute::Hp);
        assert!("luck".parse::<Attribute>().is_err());
    }

    #[test]
    fn test_quality_parse() {
        assert_eq!("5".parse::<Quality>().unwrap(), Quality::Five);
        assert!("6".parse::<Quality>().is_err());
        assert!("five".parse::<Quality>().is_err());
    }

    #[test]
    fn test_catalog_keeps_first_duplicate() {
        let mut catalog = Catalog::new();
        let vector = AttributeVector::new([1, 1, 1, 1, 1, 1]);
        assert!(catalog.insert_item(Item::new(7, Quality::Five, "first", vector, "65")));
        assert!(!catalog.insert_item(Item::new(7, Quality::Four, "second", vector, "65")));

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get_item(7).unwrap().description, "first");
        assert_eq!(catalog.items_in_class("65"), &[7]);
    }

    #[test]
    fn test_exclusivity_set_from_classes() {
        let vector = AttributeVector::default();
        let catalog = Catalog::from_items(vec![
            Item::new(1, Quality::Five, "a", vector, "65"),
            Item::new(2, Quality::Five, "b", vector, "10"),
            Item::new(3, Quality::Four, "c", vector, "65"),
        ]);

        let restricted: HashSet<ClassId> = ["65".to_string()].into_iter().collect();
        let set = catalog.exclusivity_set(&restricted);

        assert_eq!(set.sorted_ids(), vec![1, 3]);
        assert!(!set.contains(2));
    }

    #[test]
    fn test_counts_by_quality() {
        let vector = AttributeVector::default();
        let catalog = Catalog::from_items(vec![
            Item::new(1, Quality::Five, "a", vector, "1"),
            Item::new(2, Quality::Five, "b", vector, "1"),
            Item::new(3, Quality::Two, "c", vector, "2"),
        ]);
        let counts = catalog.counts_by_quality();
        assert_eq!(counts.get(&Quality::Five), Some(&2));
        assert_eq!(counts.get(&Quality::Two), Some(&1));
        assert_eq!(counts.get(&Quality::Four), None);
    }
}
