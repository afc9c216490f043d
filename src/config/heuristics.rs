// src/config/heuristics.rs
//! Heuristic tables: stopwords, cue keyword sets, regex patterns, vaults and templates.
//!
//! The TOML shipped in `config/heuristics.toml` is embedded at compile time and used
//! unless `HEURISTICS_CONFIG_PATH` points at another file. The parsed config is compiled
//! once into [`Heuristics`] and then shared read-only.

use anyhow::{anyhow, Context};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::salience::SalienceThresholds;

pub const DEFAULT_HEURISTICS_TOML: &str = include_str!("../../config/heuristics.toml");
pub const ENV_HEURISTICS_CONFIG_PATH: &str = "HEURISTICS_CONFIG_PATH";

/// Hook and thumbnail-description scores are out of five; the tables must match.
pub const CUES_PER_SCORE: usize = 5;

static BUILTIN: Lazy<Arc<Heuristics>> = Lazy::new(|| {
    Arc::new(Heuristics::from_toml_str(DEFAULT_HEURISTICS_TOML).expect("valid embedded heuristics"))
});

/* ----------------------------
Config schema (from TOML)
---------------------------- */

#[derive(Debug, Clone, Deserialize)]
pub struct HeuristicsConfig {
    pub tokenizer: TokenizerCfg,
    pub hook: HookCfg,
    pub sections: SectionsCfg,
    pub title: TitleCfg,
    pub thumbnail: ThumbnailCfg,
    #[serde(default)]
    pub salience: SalienceThresholds,
    pub ideas: IdeasCfg,
    pub script: ScriptCfg,
    pub report: ReportCfg,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenizerCfg {
    #[serde(default)]
    pub stopwords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HookCfg {
    pub signals: Vec<CueCfg>,
}

/// A named boolean cue: fires when `pattern` matches or any keyword is a substring.
#[derive(Debug, Clone, Deserialize)]
pub struct CueCfg {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionsCfg {
    pub pattern: String,
    pub sample_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TitleCfg {
    pub top_keywords: usize,
    pub number_pattern: String,
    pub duration_pattern: String,
    pub power_words: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThumbnailCfg {
    pub cues: Vec<CueCfg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Angle {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdeasCfg {
    pub keyword_count: usize,
    pub title_keywords: usize,
    pub variants: Vec<String>,
    pub angles: Vec<Angle>,
    pub differentiators: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChapterTemplate {
    pub keywords: Vec<String>,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptCfg {
    pub default_persona: String,
    pub default_style: String,
    pub fallback_opener: String,
    pub default_outline: Vec<String>,
    pub fallback_lines: Vec<String>,
    #[serde(default)]
    pub persona_openers: HashMap<String, String>,
    /// Dispatch table, first matching entry wins.
    #[serde(default)]
    pub chapters: Vec<ChapterTemplate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportCfg {
    pub why_it_performed: Vec<String>,
}

/* ----------------------------
Compiled structures
---------------------------- */

#[derive(Debug, Clone)]
pub struct Cue {
    pub name: String,
    keywords: Vec<String>,
    re: Option<Regex>,
}

impl Cue {
    fn compile(cfg: &CueCfg, scope: &str) -> anyhow::Result<Self> {
        let re = match &cfg.pattern {
            Some(p) => Some(
                Regex::new(p)
                    .map_err(|e| anyhow!("{scope} cue `{}` regex error: {}", cfg.name, e))?,
            ),
            None => None,
        };
        if re.is_none() && cfg.keywords.is_empty() {
            return Err(anyhow!(
                "{scope} cue `{}` needs keywords or a pattern",
                cfg.name
            ));
        }
        Ok(Self {
            name: cfg.name.clone(),
            keywords: cfg.keywords.clone(),
            re,
        })
    }

    pub fn matches(&self, text: &str) -> bool {
        if let Some(re) = &self.re {
            if re.is_match(text) {
                return true;
            }
        }
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct HookRules {
    pub signals: Vec<Cue>,
}

#[derive(Debug, Clone)]
pub struct SectionRules {
    pub marker_re: Regex,
    pub sample_size: usize,
}

#[derive(Debug, Clone)]
pub struct TitleRules {
    pub top_keywords: usize,
    pub number_re: Regex,
    pub duration_re: Regex,
    pub power_words: Vec<String>,
}

/// Immutable, compiled heuristic tables. Cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Heuristics {
    pub stopwords: HashSet<String>,
    pub hook: HookRules,
    pub sections: SectionRules,
    pub title: TitleRules,
    pub thumbnail_cues: Vec<Cue>,
    pub salience: SalienceThresholds,
    pub ideas: IdeasCfg,
    pub script: ScriptCfg,
    pub why_it_performed: Vec<String>,
}

impl Heuristics {
    /// The tables embedded in the binary.
    pub fn builtin() -> Arc<Heuristics> {
        BUILTIN.clone()
    }

    /// Resolve from `HEURISTICS_CONFIG_PATH`, falling back to the embedded tables.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var(ENV_HEURISTICS_CONFIG_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    return Err(anyhow!(
                        "{ENV_HEURISTICS_CONFIG_PATH} points to non-existent path {}",
                        pb.display()
                    ));
                }
                Self::from_path(&pb)
            }
            Err(_) => Self::from_toml_str(DEFAULT_HEURISTICS_TOML),
        }
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading heuristics from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("compiling heuristics from {}", path.display()))
    }

    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let cfg: HeuristicsConfig = toml::from_str(toml_str)?;
        Self::compile(cfg)
    }

    pub fn compile(cfg: HeuristicsConfig) -> anyhow::Result<Self> {
        let signals = cfg
            .hook
            .signals
            .iter()
            .map(|c| Cue::compile(c, "hook"))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let thumbnail_cues = cfg
            .thumbnail
            .cues
            .iter()
            .map(|c| Cue::compile(c, "thumbnail"))
            .collect::<anyhow::Result<Vec<_>>>()?;

        for (scope, n) in [
            ("hook.signals", signals.len()),
            ("thumbnail.cues", thumbnail_cues.len()),
        ] {
            if n != CUES_PER_SCORE {
                return Err(anyhow!(
                    "{scope} must have exactly {CUES_PER_SCORE} entries, got {n}"
                ));
            }
        }

        let marker_re = Regex::new(&cfg.sections.pattern)
            .map_err(|e| anyhow!("sections pattern regex error: {e}"))?;
        let number_re = Regex::new(&cfg.title.number_pattern)
            .map_err(|e| anyhow!("title number_pattern regex error: {e}"))?;
        let duration_re = Regex::new(&cfg.title.duration_pattern)
            .map_err(|e| anyhow!("title duration_pattern regex error: {e}"))?;

        // Ideas index these lists modulo their length.
        if cfg.ideas.angles.is_empty() {
            return Err(anyhow!("ideas.angles must not be empty"));
        }
        if cfg.ideas.differentiators.is_empty() {
            return Err(anyhow!("ideas.differentiators must not be empty"));
        }
        if cfg.ideas.variants.is_empty() {
            return Err(anyhow!("ideas.variants must not be empty"));
        }
        if cfg.script.default_outline.is_empty() {
            return Err(anyhow!("script.default_outline must not be empty"));
        }

        Ok(Self {
            stopwords: cfg.tokenizer.stopwords.into_iter().collect(),
            hook: HookRules { signals },
            sections: SectionRules {
                marker_re,
                sample_size: cfg.sections.sample_size,
            },
            title: TitleRules {
                top_keywords: cfg.title.top_keywords,
                number_re,
                duration_re,
                power_words: cfg.title.power_words,
            },
            thumbnail_cues,
            salience: cfg.salience,
            ideas: cfg.ideas,
            script: cfg.script,
            why_it_performed: cfg.report.why_it_performed,
        })
    }

    pub fn persona_opener(&self, persona: &str) -> &str {
        self.script
            .persona_openers
            .get(persona)
            .map(String::as_str)
            .unwrap_or(self.script.fallback_opener.as_str())
    }
}
