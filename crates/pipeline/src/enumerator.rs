//! Combination enumeration.
//!
//! Every multiset of three candidates is visited once: candidates are sorted
//! by id, then index triplets `i <= j <= k` are walked in order. Each triplet
//! goes through the rules below, stopping at the first failure:
//!
//! 1. Series cap: at most two marks from one series
//! 2. Exclusivity: a limited-to-one id may not appear twice
//! 3. Symmetry (optional): the triplet must have the A-A-B shape
//! 4. Target ranges: every constrained stat sum must be in range
//!
//! Survivors are ordered by their id tuple, largest first, which depends only
//! on the candidate set and not on the order the catalog listed it in.

use crate::config::{AttributeTargets, SearchConfig};
use crate::rules::{self, COMBINATION_SIZE};
use crate::snapshot::ResultRow;
use catalog::{Attribute, AttributeVector, ExclusivitySet, Item, ItemId};
use std::fmt;
use tracing::{debug, info};

/// One accepted triplet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    /// Item ids, largest first
    pub ids: [ItemId; COMBINATION_SIZE],
    /// Per-attribute sums over the three marks
    pub sums: AttributeVector,
    /// Sum of `sums` over the scored attributes
    pub score: i32,
}

impl Combination {
    pub fn is_symmetric(&self) -> bool {
        rules::is_symmetric(&self.ids)
    }
}

/// Why triplets were dropped, and how many got through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnumerationStats {
    /// Triplets visited, `n(n+1)(n+2)/6` for `n` candidates
    pub raw: u64,
    pub series_cap: u64,
    pub exclusivity: u64,
    pub symmetry: u64,
    pub out_of_range: u64,
    pub accepted: u64,
}

impl EnumerationStats {
    pub fn rejected(&self) -> u64 {
        self.series_cap + self.exclusivity + self.symmetry + self.out_of_range
    }
}

impl fmt::Display for EnumerationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} visited, {} accepted (series {}, exclusivity {}, symmetry {}, range {})",
            self.raw,
            self.accepted,
            self.series_cap,
            self.exclusivity,
            self.symmetry,
            self.out_of_range
        )
    }
}

/// Output of one enumeration run
#[derive(Debug, Clone, Default)]
pub struct Enumeration {
    pub combinations: Vec<Combination>,
    /// Same order as `combinations`
    pub rows: Vec<ResultRow>,
    pub stats: EnumerationStats,
}

/// First rule a triplet failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    SeriesCap,
    Exclusivity,
    Symmetry,
}

/// Walks all three-mark combinations of a candidate list.
///
/// ## Usage
/// ```ignore
/// let enumeration = CombinationEnumerator::new(&config.targets)
///     .symmetric(config.symmetric)
///     .with_exclusivity(&exclusivity)
///     .enumerate(&candidates);
/// ```
pub struct CombinationEnumerator<'a> {
    targets: &'a AttributeTargets,
    symmetric: bool,
    exclusivity: Option<&'a ExclusivitySet>,
}

impl<'a> CombinationEnumerator<'a> {
    pub fn new(targets: &'a AttributeTargets) -> Self {
        Self {
            targets,
            symmetric: false,
            exclusivity: None,
        }
    }

    /// Configure from a search config; `exclusivity` is only used when the
    /// config enables the check.
    pub fn from_config(config: &'a SearchConfig, exclusivity: Option<&'a ExclusivitySet>) -> Self {
        let enumerator = Self::new(&config.targets).symmetric(config.symmetric);
        match exclusivity {
            Some(set) if config.use_exclusivity => enumerator.with_exclusivity(set),
            _ => enumerator,
        }
    }

    pub fn symmetric(mut self, symmetric: bool) -> Self {
        self.symmetric = symmetric;
        self
    }

    pub fn with_exclusivity(mut self, exclusivity: &'a ExclusivitySet) -> Self {
        self.exclusivity = Some(exclusivity);
        self
    }

    /// Enumerate, filter and rank all combinations of `candidates`.
    pub fn enumerate(&self, candidates: &[Item]) -> Enumeration {
        let mut sorted: Vec<&Item> = candidates.iter().collect();
        sorted.sort_by_key(|item| item.id);

        let scored = self.targets.scored_attributes();
        let n = sorted.len();
        let mut stats = EnumerationStats::default();
        let mut accepted: Vec<[usize; COMBINATION_SIZE]> = Vec::new();

        for i in 0..n {
            for j in i..n {
                for k in j..n {
                    stats.raw += 1;
                    let picked = [sorted[i], sorted[j], sorted[k]];

                    match self.check_rules(&picked, [i, j, k]) {
                        Some(Rejection::SeriesCap) => stats.series_cap += 1,
                        Some(Rejection::Exclusivity) => stats.exclusivity += 1,
                        Some(Rejection::Symmetry) => stats.symmetry += 1,
                        None => {
                            let sums = sum_attributes(&picked);
                            if self.targets.accepts(&sums) {
                                stats.accepted += 1;
                                accepted.push([i, j, k]);
                            } else {
                                stats.out_of_range += 1;
                            }
                        }
                    }
                }
            }
        }

        // Positions index an id-ascending list, so the reversed triplet is the
        // id tuple in descending order; sorting triplets descending ranks them.
        for triplet in accepted.iter_mut() {
            triplet.reverse();
        }
        accepted.sort_by(|a, b| {
            let key = |t: &[usize; COMBINATION_SIZE]| t.map(|position| sorted[position].id);
            key(b).cmp(&key(a))
        });

        let mut enumeration = Enumeration {
            stats,
            ..Enumeration::default()
        };
        for triplet in accepted {
            let picked = triplet.map(|position| sorted[position]);
            let sums = sum_attributes(&picked);
            let score = score_of(&sums, &scored);

            enumeration.rows.push(ResultRow::new(
                picked.map(|item| item.description.clone()),
                sums,
                score,
            ));
            enumeration.combinations.push(Combination {
                ids: picked.map(|item| item.id),
                sums,
                score,
            });
        }

        debug_assert_eq!(stats.raw, rules::combination_count(n));
        debug_assert_eq!(stats.raw, stats.rejected() + stats.accepted);
        info!("Enumerated {} candidates: {}", n, stats);
        debug!("Scoring attributes: {:?}", scored);

        enumeration
    }

    /// Rules 1-3, which depend only on identities, not on stat sums
    fn check_rules(
        &self,
        picked: &[&Item; COMBINATION_SIZE],
        positions: [usize; COMBINATION_SIZE],
    ) -> Option<Rejection> {
        let classes = picked.map(|item| item.class_id.as_str());
        if rules::exceeds_series_cap(&classes) {
            return Some(Rejection::SeriesCap);
        }

        if let Some(exclusivity) = self.exclusivity {
            let ids = picked.map(|item| item.id);
            let repeated_exclusive = ids.iter().enumerate().any(|(position, id)| {
                exclusivity.contains(*id) && ids[position + 1..].contains(id)
            });
            if repeated_exclusive {
                return Some(Rejection::Exclusivity);
            }
        }

        if self.symmetric && !rules::is_symmetric(&positions) {
            return Some(Rejection::Symmetry);
        }

        None
    }
}

fn sum_attributes(picked: &[&Item; COMBINATION_SIZE]) -> AttributeVector {
    picked.iter().map(|item| item.attributes).sum()
}

/// Sum of the summed stats over the scored attributes
fn score_of(sums: &AttributeVector, scored: &[Attribute]) -> i32 {
    sums.sum_of(scored)
}
