//! Tiered item search.
//!
//! Responsibilities:
//! - Pick a matching strategy from the query length and run it over a pool.
//! - Score candidates with Jaro-Winkler, token ("member") scoring and
//!   exact-inclusion boosting.
//! - Provide `SearchResults`, a pool plus a cyclic cursor over the last matches.
//!
//! Does NOT handle:
//! - Hotkey bindings that drive a search (see `wrappers::search`).
//! - Displaying results.
//!
//! Invariants:
//! - Strategy depends only on the query length: 1 char is a prefix match,
//!   2-3 chars a substring match, more than 3 a similarity ranking.
//! - No strategy fails: empty queries, empty pools and misses yield an empty result.
//! - Prefix and substring results keep pool order, except that exact
//!   substring hits come first, the last one seen leading.

mod results;

use std::fmt::Display;

use keygrid_config::SearchOptions;
use keygrid_config::constants::{
    EXACT_INCLUSION_BOOST, MEMBER_MIN_TOKEN_RATIO, MEMBER_SIMILARITY_RATIO,
    SIMILARITY_QUERY_MIN_LEN,
};

use crate::similarity::jaro_winkler;

pub use results::SearchResults;

/// Matching strategy chosen from the query length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Candidate starts with the query.
    Prefix,
    /// Candidate contains the query; exact matches first.
    Substring,
    /// Candidates ranked by similarity, below-threshold ones dropped.
    Similarity,
}

impl SearchStrategy {
    /// Strategy for a query, `None` for an empty query.
    pub fn for_query(query: &str) -> Option<Self> {
        match query.chars().count() {
            0 => None,
            1 => Some(Self::Prefix),
            n if n < SIMILARITY_QUERY_MIN_LEN => Some(Self::Substring),
            _ => Some(Self::Similarity),
        }
    }
}

/// Search items by their `Display` form.
///
/// ```
/// use keygrid_config::SearchOptions;
/// use keygrid_core::search::search;
///
/// let pool = ["Red Apple", "Green Apple", "Banana"];
/// let found = search(&pool, "app", &SearchOptions::default());
/// assert_eq!(found, vec![&"Red Apple", &"Green Apple"]);
/// ```
pub fn search<'a, T: Display>(pool: &'a [T], query: &str, options: &SearchOptions) -> Vec<&'a T> {
    search_by(pool, query, options, |item| item.to_string())
}

/// Search items through a custom stringification.
pub fn search_by<'a, T, F>(
    pool: &'a [T],
    query: &str,
    options: &SearchOptions,
    to_text: F,
) -> Vec<&'a T>
where
    F: Fn(&T) -> String,
{
    search_indices(pool, query, options, to_text)
        .into_iter()
        .map(|index| &pool[index])
        .collect()
}

/// Indices into `pool` of the matching items, best first.
pub fn search_indices<T, F>(
    pool: &[T],
    query: &str,
    options: &SearchOptions,
    to_text: F,
) -> Vec<usize>
where
    F: Fn(&T) -> String,
{
    let Some(strategy) = SearchStrategy::for_query(query) else {
        tracing::warn!("Search query is empty");
        return Vec::new();
    };

    if pool.is_empty() {
        tracing::warn!(query, "Search pool is empty");
        return Vec::new();
    }

    let query = fold_case(query, options);
    let texts = pool.iter().map(|item| fold_case(&to_text(item), options));

    let found = match strategy {
        SearchStrategy::Prefix => texts
            .enumerate()
            .filter(|(_, text)| text.starts_with(&query))
            .map(|(index, _)| index)
            .collect(),
        SearchStrategy::Substring => {
            let mut exact = Vec::new();
            let mut partial = Vec::new();
            for (index, text) in texts.enumerate() {
                if text == query {
                    exact.push(index);
                } else if text.contains(&query) {
                    partial.push(index);
                }
            }
            // Each exact hit is put in front of the earlier ones.
            exact.reverse();
            exact.extend(partial);
            exact
        }
        SearchStrategy::Similarity => {
            let mut scored: Vec<(usize, f64)> = texts
                .enumerate()
                .map(|(index, text)| (index, folded_similarity(&text, &query, options)))
                .filter(|(_, score)| *score >= options.minimum_similarity)
                .collect();
            scored.sort_by(|a, b| b.1.total_cmp(&a.1));
            scored.into_iter().map(|(index, _)| index).collect()
        }
    };

    if found.is_empty() {
        tracing::warn!(query = %query, ?strategy, "No search results found");
    }
    found
}

/// Similarity of `candidate` to `query` under `options`, in `[0, 1]`.
pub fn similarity_score(candidate: &str, query: &str, options: &SearchOptions) -> f64 {
    folded_similarity(&fold_case(candidate, options), &fold_case(query, options), options)
}

fn folded_similarity(candidate: &str, query: &str, options: &SearchOptions) -> f64 {
    let query_len = query.chars().count() as f64;
    let candidate_len = candidate.chars().count() as f64;

    let use_members =
        options.member_similarity && candidate_len > MEMBER_SIMILARITY_RATIO * query_len;
    let mut similarity = if use_members {
        candidate
            .split_whitespace()
            .filter(|token| token.chars().count() as f64 >= query_len * MEMBER_MIN_TOKEN_RATIO)
            .map(|token| jaro_winkler(token, query))
            .fold(0.0, f64::max)
    } else {
        jaro_winkler(candidate, query)
    };

    if options.boost_exact_inclusion
        && query_len as usize >= SIMILARITY_QUERY_MIN_LEN
        && candidate.contains(query)
    {
        similarity += EXACT_INCLUSION_BOOST * query_len;
    }

    similarity.min(1.0)
}

fn fold_case(text: &str, options: &SearchOptions) -> String {
    if options.case_sensitive {
        text.to_string()
    } else {
        text.to_lowercase()
    }
}
