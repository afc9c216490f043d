// src/ideas.rs
//! Deterministic idea generation: reference keywords × angle vault × differentiator
//! vault, indexed cyclically. Same keywords and `n` always give the same list.

use serde::{Deserialize, Serialize};

use crate::config::Heuristics;
use crate::error::{EngineError, Result};
use crate::input::ReferenceVideoInput;
use crate::tokenize::top_keywords;

pub const DEFAULT_IDEA_COUNT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    pub idea_title: String,
    pub concept: String,
    pub logline: String,
}

/// Top keywords of title and script together.
pub fn reference_keywords(input: &ReferenceVideoInput, h: &Heuristics) -> Vec<String> {
    let merged = format!("{} {}", input.title, input.script_text);
    top_keywords(&merged, h.ideas.keyword_count, &h.stopwords)
}

pub fn generate_ideas(input: &ReferenceVideoInput, h: &Heuristics, n: usize) -> Vec<Idea> {
    ideas_from_keywords(&reference_keywords(input, h), h, n)
}

pub fn ideas_from_keywords(keywords: &[String], h: &Heuristics, n: usize) -> Vec<Idea> {
    let vault = &h.ideas;
    let head = keywords
        .iter()
        .take(vault.title_keywords)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let all = keywords.join(", ");

    (0..n)
        .map(|i| {
            let angle = &vault.angles[i % vault.angles.len()];
            let diff = &vault.differentiators[i % vault.differentiators.len()];
            let variant = &vault.variants[i % vault.variants.len()];
            Idea {
                idea_title: format!("[{}] {head}를 {variant} 해봤다", angle.name),
                concept: format!("{} + 차별포인트: {diff}", angle.description),
                logline: format!(
                    "레퍼런스의 핵심 주제({all})를 유지하되, {} 톤으로 전개. {diff} 적용.",
                    angle.name
                ),
            }
        })
        .collect()
}

/// Pick the idea a script should be assembled from.
pub fn select_idea(ideas: &[Idea], index: usize) -> Result<&Idea> {
    ideas.get(index).ok_or(EngineError::IdeaOutOfRange {
        index,
        len: ideas.len(),
    })
}
