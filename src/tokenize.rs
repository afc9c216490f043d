// src/tokenize.rs
//! Tokenizer and frequency-ranked keyword extraction.

use std::collections::{HashMap, HashSet};

/// Keep ASCII alphanumerics, Hangul syllables and whitespace; everything else splits.
fn keep_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || ('가'..='힣').contains(&c) || c.is_whitespace()
}

pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .chars()
        .map(|c| if keep_char(c) { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().map(str::to_string).collect()
}

pub fn word_count(text: &str) -> usize {
    tokenize(text).len()
}

/// Top `k` tokens by descending frequency; ties break by ascending lexicographic order.
/// Stopwords and single-character tokens are skipped.
pub fn top_keywords(text: &str, k: usize, stopwords: &HashSet<String>) -> Vec<String> {
    let mut freq: HashMap<String, usize> = HashMap::new();
    for t in tokenize(&text.to_lowercase()) {
        if stopwords.contains(&t) || t.chars().count() <= 1 {
            continue;
        }
        *freq.entry(t).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = freq.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().take(k).map(|(w, _)| w).collect()
}
