//! Combination rules shared by the enumerator and the validator.

/// Most marks one combination may take from a single series
pub const SERIES_CAP: usize = 2;

/// Marks per combination
pub const COMBINATION_SIZE: usize = 3;

/// Whether any key occurs more than `SERIES_CAP` times.
///
/// The enumerator passes series ids; the validator only has descriptions in
/// the snapshot and passes those.
pub fn exceeds_series_cap<T: PartialEq>(keys: &[T; COMBINATION_SIZE]) -> bool {
    keys.iter()
        .any(|key| keys.iter().filter(|other| *other == key).count() > SERIES_CAP)
}

/// Number of distinct values among the three keys
pub fn distinct_count<T: PartialEq>(keys: &[T; COMBINATION_SIZE]) -> usize {
    keys.iter()
        .enumerate()
        .filter(|&(position, key)| !keys[..position].contains(key))
        .count()
}

/// The A-A-B shape: exactly two distinct values, one of them twice
pub fn is_symmetric<T: PartialEq>(keys: &[T; COMBINATION_SIZE]) -> bool {
    distinct_count(keys) == 2
}

/// Number of combinations with replacement of size 3 over `n` candidates
pub fn combination_count(n: usize) -> u64 {
    let n = n as u64;
    n * (n + 1) * (n + 2) / 6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_cap() {
        assert!(!exceeds_series_cap(&["a", "a", "b"]));
        assert!(!exceeds_series_cap(&["a", "b", "c"]));
        assert!(exceeds_series_cap(&["a", "a", "a"]));
    }

    #[test]
    fn test_symmetry_shapes() {
        assert!(is_symmetric(&[1, 1, 2]));
        assert!(is_symmetric(&[2, 1, 1]));
        assert!(!is_symmetric(&[1, 1, 1]));
        assert!(!is_symmetric(&[1, 2, 3]));
    }

    #[test]
    fn test_combination_count() {
        assert_eq!(combination_count(0), 0);
        assert_eq!(combination_count(1), 1);
        assert_eq!(combination_count(3), 10);
        assert_eq!(combination_count(200), 1_353_400);
    }
}
