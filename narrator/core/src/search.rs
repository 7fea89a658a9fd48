//! Relevance Search
//!
//! Scores and ranks a catalog's records against free-text query terms.
//! Pure function of its inputs: tokenize, drop stop-words, expand through a
//! fixed synonym table, then sum weighted substring matches per record.
//!
//! Weights: +30 exact name match on the whole normalized query; per token,
//! +10 name prefix else +5 name substring, +3 description, +2 per matching
//! attribute name or value, +1 per matching example title and +1 for a
//! category match. Zero-score records are dropped; ties keep catalog order.

use std::collections::HashSet;

use crate::catalog::{Catalog, Element};

/// Default number of hits returned.
pub const DEFAULT_LIMIT: usize = 8;

/// Query terms ignored during tokenization.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "do", "does", "for", "how", "i", "in", "is", "my", "of", "on", "or",
    "the", "to", "what", "with",
];

/// Fixed synonym table. Each query token is expanded with its synonyms
/// before scoring; expansion is one level deep.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("disposition", &["layout", "arrangement"]),
    ("layout", &["flex", "grid", "position"]),
    ("link", &["anchor", "href"]),
    ("image", &["img", "picture", "photo"]),
    ("picture", &["img", "image"]),
    ("text", &["font", "typography"]),
    ("color", &["colour", "background"]),
    ("colour", &["color"]),
    ("center", &["align", "middle", "justify"]),
    ("list", &["ul", "ol", "item"]),
    ("heading", &["title", "header"]),
    ("loop", &["iterate", "for", "while"]),
    ("function", &["method", "callback"]),
    ("variable", &["let", "const", "var"]),
    ("click", &["event", "handler", "button"]),
    ("state", &["usestate", "reactive", "data"]),
    ("input", &["form", "field"]),
    ("animation", &["transition", "keyframes"]),
];

/// One ranked search result.
#[derive(Clone, Copy, Debug)]
pub struct SearchHit<'a> {
    /// Element identifier within the catalog.
    pub id: &'a str,
    /// The matched record.
    pub element: &'a Element,
    /// Relevance score (always > 0).
    pub score: u32,
}

/// Rank a catalog's records against a free-text query.
///
/// Returns hits in descending score order, ties in catalog order,
/// truncated to `limit` (`0` disables truncation). An empty or
/// stop-word-only query returns no hits.
#[must_use]
pub fn search<'a>(catalog: &'a Catalog, query: &str, limit: usize) -> Vec<SearchHit<'a>> {
    let normalized = query.trim().to_lowercase();
    if normalized.is_empty() {
        return Vec::new();
    }
    let tokens = expand_tokens(&normalized);

    let mut hits: Vec<SearchHit<'a>> = catalog
        .iter()
        .filter_map(|(id, element)| {
            let score = score_element(element, &normalized, &tokens);
            (score > 0).then_some(SearchHit { id, element, score })
        })
        .collect();

    // Stable: equal scores keep catalog order.
    hits.sort_by(|a, b| b.score.cmp(&a.score));
    if limit > 0 {
        hits.truncate(limit);
    }
    hits
}

/// Tokenize the normalized query and expand each token through the synonym
/// table, collapsing duplicates.
fn expand_tokens(normalized: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tokens = Vec::new();
    let mut push = |t: &str| {
        if seen.insert(t.to_string()) {
            tokens.push(t.to_string());
        }
    };

    for word in normalized.split_whitespace() {
        if STOP_WORDS.contains(&word) {
            continue;
        }
        push(word);
        if let Some((_, synonyms)) = SYNONYMS.iter().find(|(key, _)| *key == word) {
            for synonym in *synonyms {
                push(synonym);
            }
        }
    }
    tokens
}

fn score_element(element: &Element, normalized_query: &str, tokens: &[String]) -> u32 {
    let name = element.name.to_lowercase();
    let description = element.description.to_lowercase();
    let category = element.category.to_lowercase();

    let mut score = 0;
    if name == normalized_query {
        score += 30;
    }

    for token in tokens {
        if name.starts_with(token.as_str()) {
            score += 10;
        } else if name.contains(token.as_str()) {
            score += 5;
        }
        if description.contains(token.as_str()) {
            score += 3;
        }
        for attribute in &element.attributes {
            if attribute.name.to_lowercase().contains(token.as_str()) {
                score += 2;
            }
            for value in &attribute.values {
                if value.to_lowercase().contains(token.as_str()) {
                    score += 2;
                }
            }
        }
        for example in &element.examples {
            if example.title.to_lowercase().contains(token.as_str()) {
                score += 1;
            }
        }
        if category.contains(token.as_str()) {
            score += 1;
        }
    }
    score
}
