// src/input.rs
//! The reference-video record handed to the engine, plus opt-in JSON load/save.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{EngineError, Result};

/// Field names match the on-disk JSON record. Missing fields load as empty / zero so
/// partially filled records still open; [`ReferenceVideoInput::validate`] gates analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceVideoInput {
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub seconds: u64,
    #[serde(default)]
    pub title: String,
    /// Either a free-text description of the thumbnail or a path to the image file.
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub script_text: String,
}

impl ReferenceVideoInput {
    /// Title and script are required; everything else has a usable default.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(EngineError::MissingField { field: "title" });
        }
        if self.script_text.trim().is_empty() {
            return Err(EngineError::MissingField {
                field: "script_text",
            });
        }
        Ok(())
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Validates first; an invalid record is never written.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let body = serde_json::to_string_pretty(self)?;
        fs::write(path, body)?;
        Ok(())
    }
}

/// `MM:SS`; minutes are not folded into hours.
pub fn runtime_label(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReferenceVideoInput {
        ReferenceVideoInput {
            views: 1_000,
            likes: 20,
            seconds: 95,
            title: "주말 정리 루틴".into(),
            thumbnail: "얼굴 클로즈업".into(),
            script_text: "오늘은 정리 루틴을 소개합니다".into(),
        }
    }

    #[test]
    fn runtime_label_pads_and_keeps_long_minutes() {
        assert_eq!(runtime_label(0), "00:00");
        assert_eq!(runtime_label(95), "01:35");
        assert_eq!(runtime_label(3_725), "62:05");
    }

    #[test]
    fn blank_title_or_script_is_rejected() {
        let mut r = sample();
        r.title = "   ".into();
        assert!(matches!(
            r.validate(),
            Err(EngineError::MissingField { field: "title" })
        ));

        let mut r = sample();
        r.script_text = "\n".into();
        assert!(matches!(
            r.validate(),
            Err(EngineError::MissingField {
                field: "script_text"
            })
        ));
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn partial_record_deserializes_with_defaults() {
        let r: ReferenceVideoInput = serde_json::from_str(r#"{"title":"t"}"#).unwrap();
        assert_eq!(r.views, 0);
        assert_eq!(r.script_text, "");
        assert!(r.validate().is_err());
    }

    #[test]
    fn save_then_load_keeps_korean_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("ref.json");
        sample().save_json(&p).unwrap();

        let raw = fs::read_to_string(&p).unwrap();
        assert!(raw.contains("주말 정리 루틴"));
        assert!(raw.contains("\"script_text\""));
        assert_eq!(ReferenceVideoInput::load_json(&p).unwrap(), sample());
    }

    #[test]
    fn invalid_record_is_not_written() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("ref.json");
        let mut r = sample();
        r.title.clear();
        assert!(r.save_json(&p).is_err());
        assert!(!p.exists());
    }
}
