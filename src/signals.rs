// src/signals.rs
//! Independent rule evaluators over the reference script, title and thumbnail text.
//!
//! Every detector is a pure function returning a small serializable record. Keyword
//! sets and patterns come from [`Heuristics`]; band and tier boundaries are fixed here.

use serde::Serialize;

use crate::config::{Cue, Heuristics};
use crate::tokenize::{top_keywords, word_count};

pub const HOOK_WINDOW_CHARS: usize = 400;
pub const HOOK_PREVIEW_CHARS: usize = 120;

const PACE_SLOW_BELOW: f64 = 120.0;
const PACE_ADEQUATE_BELOW: f64 = 160.0;
const PACE_BRISK_BELOW: f64 = 200.0;

const ENGAGEMENT_LOW_BELOW: f64 = 0.01;
const ENGAGEMENT_HIGH_FROM: f64 = 0.05;

/// Division that yields 0 for a zero denominator instead of inf/NaN.
pub fn safe_div(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        0.0
    } else {
        a / b
    }
}

fn round_to(x: f64, places: i32) -> f64 {
    let f = 10f64.powi(places);
    (x * f).round() / f
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignalHit {
    pub name: String,
    pub hit: bool,
}

fn evaluate_cues(cues: &[Cue], text: &str) -> (Vec<SignalHit>, u8) {
    let hits: Vec<SignalHit> = cues
        .iter()
        .map(|c| SignalHit {
            name: c.name.clone(),
            hit: c.matches(text),
        })
        .collect();
    let score = hits.iter().filter(|h| h.hit).count() as u8;
    (hits, score)
}

/* ---------- hook ---------- */

#[derive(Debug, Clone, Serialize)]
pub struct HookReport {
    pub preview: String,
    pub signals: Vec<SignalHit>,
    /// 0..=5 with the shipped tables.
    pub score: u8,
}

pub fn detect_hook(script_text: &str, h: &Heuristics) -> HookReport {
    let window: String = script_text
        .trim()
        .chars()
        .take(HOOK_WINDOW_CHARS)
        .collect();
    let (signals, score) = evaluate_cues(&h.hook.signals, &window);

    let cleaned = window.replace('\n', " ");
    let mut preview: String = cleaned.chars().take(HOOK_PREVIEW_CHARS).collect();
    if window.chars().count() > HOOK_PREVIEW_CHARS {
        preview.push_str("...");
    }

    HookReport {
        preview,
        signals,
        score,
    }
}

/* ---------- sections ---------- */

#[derive(Debug, Clone, Serialize)]
pub struct SectionReport {
    pub estimated_chapters: usize,
    pub markers_sample: Vec<String>,
}

pub fn estimate_sections(script_text: &str, h: &Heuristics) -> SectionReport {
    let markers: Vec<&str> = h
        .sections
        .marker_re
        .find_iter(script_text)
        .map(|m| m.as_str())
        .collect();
    SectionReport {
        estimated_chapters: markers.len(),
        markers_sample: markers
            .iter()
            .take(h.sections.sample_size)
            .map(|s| s.to_string())
            .collect(),
    }
}

/* ---------- title ---------- */

#[derive(Debug, Clone, Serialize)]
pub struct TitleReport {
    pub keywords: Vec<String>,
    pub has_number: bool,
    pub has_duration: bool,
    pub power_words_hit: usize,
    /// has_number + has_duration + min(power_words_hit, 2), so 0..=4.
    pub specificity: u8,
}

pub fn analyze_title(title: &str, h: &Heuristics) -> TitleReport {
    let keywords = top_keywords(title, h.title.top_keywords, &h.stopwords);
    let has_number = h.title.number_re.is_match(title);
    let has_duration = h.title.duration_re.is_match(title);
    let power_words_hit = h
        .title
        .power_words
        .iter()
        .filter(|w| title.contains(w.as_str()))
        .count();
    let specificity = u8::from(has_number) + u8::from(has_duration) + power_words_hit.min(2) as u8;

    TitleReport {
        keywords,
        has_number,
        has_duration,
        power_words_hit,
        specificity,
    }
}

/* ---------- thumbnail (description) ---------- */

#[derive(Debug, Clone, Serialize)]
pub struct ThumbnailCueReport {
    pub cues: Vec<SignalHit>,
    pub score: u8,
}

pub fn analyze_thumbnail_text(description: &str, h: &Heuristics) -> ThumbnailCueReport {
    let (cues, score) = evaluate_cues(&h.thumbnail_cues, description);
    ThumbnailCueReport { cues, score }
}

/* ---------- pacing ---------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PacingBand {
    Slow,
    Adequate,
    Brisk,
    VeryFast,
}

impl PacingBand {
    pub fn classify(wpm: f64) -> Self {
        if wpm < PACE_SLOW_BELOW {
            Self::Slow
        } else if wpm < PACE_ADEQUATE_BELOW {
            Self::Adequate
        } else if wpm < PACE_BRISK_BELOW {
            Self::Brisk
        } else {
            Self::VeryFast
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Slow => "느림(서사/설명형 적합)",
            Self::Adequate => "적정(대부분의 정보/교육형)",
            Self::Brisk => "조금 빠름(엔터테인/하이라이트)",
            Self::VeryFast => "매우 빠름(과밀 가능)",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PacingReport {
    pub words: usize,
    /// Rounded to one decimal.
    pub wpm: f64,
    pub band: PacingBand,
    pub comment: String,
}

pub fn analyze_pacing(seconds: u64, script_text: &str) -> PacingReport {
    let words = word_count(script_text);
    let wpm = safe_div(words as f64, seconds as f64 / 60.0);
    let band = PacingBand::classify(wpm);
    PacingReport {
        words,
        wpm: round_to(wpm, 1),
        band,
        comment: band.label().to_string(),
    }
}

/* ---------- engagement ---------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementTier {
    Low,
    Moderate,
    High,
}

impl EngagementTier {
    pub fn classify(rate: f64) -> Self {
        if rate < ENGAGEMENT_LOW_BELOW {
            Self::Low
        } else if rate >= ENGAGEMENT_HIGH_FROM {
            Self::High
        } else {
            Self::Moderate
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "낮음(<1%)",
            Self::Moderate => "보통(1~4%)",
            Self::High => "높음(5%+)",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EngagementReport {
    /// likes / views, rounded to four decimals; 0 when views is 0.
    pub rate: f64,
    pub tier: EngagementTier,
}

pub fn analyze_engagement(views: u64, likes: u64) -> EngagementReport {
    let rate = safe_div(likes as f64, views as f64);
    EngagementReport {
        rate: round_to(rate, 4),
        tier: EngagementTier::classify(rate),
    }
}
