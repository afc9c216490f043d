// src/config/mod.rs
pub mod heuristics;

pub use heuristics::{
    Angle, ChapterTemplate, Cue, Heuristics, HeuristicsConfig, CUES_PER_SCORE,
    DEFAULT_HEURISTICS_TOML, ENV_HEURISTICS_CONFIG_PATH,
};
