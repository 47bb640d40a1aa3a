//! Jaro and Jaro-Winkler string similarity.
//!
//! Both functions compare Unicode scalar values, return a score in `[0, 1]`
//! and never allocate more than two small vectors of flags.

/// Scores at or below this value receive no common-prefix boost.
const WINKLER_BOOST_THRESHOLD: f64 = 0.7;

/// Weight of each common-prefix character in the Winkler boost.
const WINKLER_PREFIX_SCALE: f64 = 0.1;

/// Maximum number of prefix characters considered by the Winkler boost.
const WINKLER_MAX_PREFIX: usize = 4;

/// Classic Jaro similarity.
///
/// Two empty strings are identical (1.0); an empty string against a
/// non-empty one shares nothing (0.0).
///
/// ```
/// use keygrid_core::similarity::jaro;
///
/// assert_eq!(jaro("martha", "martha"), 1.0);
/// assert!((jaro("martha", "marhta") - 0.944).abs() < 0.001);
/// ```
pub fn jaro(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let window = (a.len().max(b.len()) / 2).saturating_sub(1);
    let mut a_matched = vec![false; a.len()];
    let mut b_matched = vec![false; b.len()];
    let mut matches = 0usize;

    for (i, ca) in a.iter().enumerate() {
        let start = i.saturating_sub(window);
        let end = (i + window + 1).min(b.len());
        for j in start..end {
            if b_matched[j] || b[j] != *ca {
                continue;
            }
            a_matched[i] = true;
            b_matched[j] = true;
            matches += 1;
            break;
        }
    }

    if matches == 0 {
        return 0.0;
    }

    let mut unaligned = 0usize;
    let mut k = 0usize;
    for (i, ca) in a.iter().enumerate() {
        if !a_matched[i] {
            continue;
        }
        while !b_matched[k] {
            k += 1;
        }
        if *ca != b[k] {
            unaligned += 1;
        }
        k += 1;
    }

    let m = matches as f64;
    let transpositions = (unaligned / 2) as f64;
    (m / a.len() as f64 + m / b.len() as f64 + (m - transpositions) / m) / 3.0
}

/// Jaro similarity boosted by the length of the common prefix (up to four characters).
///
/// Scores at or below 0.7 are returned unchanged.
pub fn jaro_winkler(a: &str, b: &str) -> f64 {
    let score = jaro(a, b);
    if score <= WINKLER_BOOST_THRESHOLD {
        return score;
    }

    let prefix = a
        .chars()
        .zip(b.chars())
        .take(WINKLER_MAX_PREFIX)
        .take_while(|(x, y)| x == y)
        .count();

    score + WINKLER_PREFIX_SCALE * prefix as f64 * (1.0 - score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_jaro_empty_inputs() {
        assert_eq!(jaro("", ""), 1.0);
        assert_eq!(jaro("", "abc"), 0.0);
        assert_eq!(jaro("abc", ""), 0.0);
    }

    #[test]
    fn test_jaro_reference_values() {
        approx(jaro("martha", "marhta"), 0.944);
        approx(jaro("dixon", "dicksonx"), 0.767);
        approx(jaro("jellyfish", "smellyfish"), 0.896);
    }

    #[test]
    fn test_jaro_no_common_characters() {
        assert_eq!(jaro("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_jaro_single_characters() {
        assert_eq!(jaro("a", "a"), 1.0);
        assert_eq!(jaro("a", "b"), 0.0);
    }

    #[test]
    fn test_jaro_winkler_reference_values() {
        approx(jaro_winkler("martha", "marhta"), 0.961);
        approx(jaro_winkler("dixon", "dicksonx"), 0.813);
    }

    #[test]
    fn test_jaro_winkler_no_boost_below_threshold() {
        let base = jaro("abcd", "axyz");
        assert!(base <= 0.7);
        assert_eq!(jaro_winkler("abcd", "axyz"), base);
    }

    #[test]
    fn test_jaro_unicode() {
        assert_eq!(jaro("ñandú", "ñandú"), 1.0);
        assert!(jaro_winkler("café", "cafe") > 0.8);
    }
}
