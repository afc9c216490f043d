// src/devlog.rs
//! Opt-in development logging for analysis events. Never logs raw titles or scripts,
//! only a short hashed id plus scores.

use tracing::info;

use crate::analyzer::AnalysisReport;

pub const ENV_DEV_LOG: &str = "LONGFORM_DEV_LOG";

// Dev logging gate: LONGFORM_DEV_LOG=1 AND dev env (debug or SHUTTLE_ENV in {local,development,dev})
pub fn dev_logging_enabled() -> bool {
    let on = std::env::var(ENV_DEV_LOG).ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("SHUTTLE_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// First 6 bytes of SHA-256, hex encoded.
pub fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

pub fn log_analysis(title: &str, report: &AnalysisReport) {
    if !dev_logging_enabled() {
        return;
    }
    let id = anon_hash(title);
    info!(
        target: "analysis",
        %id,
        hook = report.hook.score,
        specificity = report.title.specificity,
        thumbnail = ?report.thumbnail.score(),
        wpm = report.pacing.wpm,
        engagement = report.engagement.rate,
        strengths = report.strengths.len(),
        risks = report.risks.len(),
        "reference analyzed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anon_hash_is_short_and_stable() {
        let a = anon_hash("초보도 되는 10분 정리 루틴");
        assert_eq!(a.len(), 12);
        assert_eq!(a, anon_hash("초보도 되는 10분 정리 루틴"));
        assert_ne!(a, anon_hash("다른 제목"));
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
