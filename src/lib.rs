// src/lib.rs
// Public library surface for the service, the CLI and integration tests.

pub mod analyzer;
pub mod api;
pub mod config;
pub mod devlog;
pub mod error;
pub mod ideas;
pub mod input;
pub mod metrics;
pub mod salience;
pub mod script;
pub mod signals;
pub mod thumbnail;
pub mod tokenize;

// ---- Re-exports for stable public API ----
pub use crate::analyzer::{
    analyze_reference, render_report, score_thumbnail_file, AnalysisReport, ThumbnailReport,
};
pub use crate::api::{router, AppState};
pub use crate::config::Heuristics;
pub use crate::error::{EngineError, Result};
pub use crate::ideas::{generate_ideas, select_idea, Idea, DEFAULT_IDEA_COUNT};
pub use crate::input::ReferenceVideoInput;
pub use crate::salience::{estimate_salience, PixelGrid, PixelSalienceResult};
pub use crate::script::{assemble_script, parse_chapters, ScriptRequest};
pub use crate::thumbnail::{decode_thumbnail, ThumbnailSource};
pub use crate::tokenize::{tokenize, top_keywords};
