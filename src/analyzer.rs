// src/analyzer.rs
//! Reference analyzer: runs every detector over one input and derives the
//! strengths / risks narrative. Each threshold is tested on its own, so a report can
//! hold a strength and a risk for the same dimension, or neither.

use std::path::Path;

use serde::Serialize;

use crate::config::Heuristics;
use crate::error::Result;
use crate::input::{runtime_label, ReferenceVideoInput};
use crate::salience::{estimate_salience, PixelSalienceResult};
use crate::signals::{
    analyze_engagement, analyze_pacing, analyze_thumbnail_text, analyze_title, detect_hook,
    estimate_sections, EngagementReport, HookReport, PacingReport, SectionReport,
    ThumbnailCueReport, TitleReport,
};
use crate::thumbnail::{decode_thumbnail, ThumbnailSource};

const HOOK_STRONG_FROM: u8 = 3;
const HOOK_WEAK_UPTO: u8 = 2;
const SPECIFICITY_STRONG_FROM: u8 = 2;
const THUMB_STRONG_FROM: u8 = 3;
const THUMB_WEAK_UPTO: u8 = 2;
const ENGAGEMENT_STRONG_FROM: f64 = 0.05;
const ENGAGEMENT_WEAK_BELOW: f64 = 0.01;
const WPM_COMFORT: (f64, f64) = (120.0, 190.0);
const WPM_OVERLOAD_ABOVE: f64 = 200.0;
const CHAPTERS_STRONG_FROM: usize = 3;

/// How the thumbnail was scored, if at all.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThumbnailReport {
    Description(ThumbnailCueReport),
    Image(PixelSalienceResult),
    /// The image exists but could not be decoded. Not a zero score.
    Error { reason: String },
    Absent,
}

impl ThumbnailReport {
    /// `None` means "no thumbnail data"; callers must not read it as 0.
    pub fn score(&self) -> Option<u8> {
        match self {
            Self::Description(r) => Some(r.score),
            Self::Image(r) => Some(r.salience_score),
            Self::Error { .. } | Self::Absent => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub runtime: String,
    pub engagement: EngagementReport,
    pub pacing: PacingReport,
    pub title: TitleReport,
    pub thumbnail: ThumbnailReport,
    pub hook: HookReport,
    pub sections: SectionReport,
    pub strengths: Vec<String>,
    pub risks: Vec<String>,
    pub why_it_performed: Vec<String>,
}

pub fn analyze_thumbnail(source: &ThumbnailSource, h: &Heuristics) -> ThumbnailReport {
    match source {
        ThumbnailSource::Absent => ThumbnailReport::Absent,
        ThumbnailSource::Description(text) => {
            ThumbnailReport::Description(analyze_thumbnail_text(text, h))
        }
        ThumbnailSource::Image(grid) => ThumbnailReport::Image(estimate_salience(grid, &h.salience)),
        ThumbnailSource::Unreadable { reason, .. } => ThumbnailReport::Error {
            reason: reason.clone(),
        },
    }
}

/// Pixel salience for one thumbnail file. A path that does not exist is no thumbnail
/// data (`Absent`); a file that exists but does not decode is an error.
pub fn score_thumbnail_file(path: &Path, h: &Heuristics) -> Result<ThumbnailReport> {
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "thumbnail file not found");
        return Ok(ThumbnailReport::Absent);
    }
    let grid = decode_thumbnail(path, h.salience.max_side)?;
    Ok(ThumbnailReport::Image(estimate_salience(&grid, &h.salience)))
}

/// Validate, run every detector, then synthesize strengths and risks.
pub fn analyze_reference(
    input: &ReferenceVideoInput,
    h: &Heuristics,
    thumbnail: &ThumbnailSource,
) -> Result<AnalysisReport> {
    input.validate()?;

    let title = analyze_title(&input.title, h);
    let thumbnail = analyze_thumbnail(thumbnail, h);
    let hook = detect_hook(&input.script_text, h);
    let pacing = analyze_pacing(input.seconds, &input.script_text);
    let engagement = analyze_engagement(input.views, input.likes);
    let sections = estimate_sections(&input.script_text, h);

    let strengths = strengths(&title, &thumbnail, &hook, &pacing, &engagement, &sections);
    let risks = risks(&title, &thumbnail, &hook, &pacing, &engagement);

    tracing::debug!(
        hook = hook.score,
        specificity = title.specificity,
        thumbnail = ?thumbnail.score(),
        wpm = pacing.wpm,
        strengths = strengths.len(),
        risks = risks.len(),
        "reference analyzed"
    );

    Ok(AnalysisReport {
        runtime: runtime_label(input.seconds),
        engagement,
        pacing,
        title,
        thumbnail,
        hook,
        sections,
        strengths,
        risks,
        why_it_performed: h.why_it_performed.clone(),
    })
}

fn strengths(
    title: &TitleReport,
    thumbnail: &ThumbnailReport,
    hook: &HookReport,
    pacing: &PacingReport,
    engagement: &EngagementReport,
    sections: &SectionReport,
) -> Vec<String> {
    let mut out = Vec::new();
    if hook.score >= HOOK_STRONG_FROM {
        out.push("시작 20~30초에 강한 훅 신호가 충분함");
    }
    if title.specificity >= SPECIFICITY_STRONG_FROM {
        out.push("제목에 숫자/기간/파워워드로 구체성 확보");
    }
    if thumbnail.score().is_some_and(|s| s >= THUMB_STRONG_FROM) {
        out.push("썸네일 대비/객체 강조가 시각적 주목을 끔");
    }
    if engagement.rate >= ENGAGEMENT_STRONG_FROM {
        out.push("참여율이 높은 편으로, 공감/실용 포인트가 강함");
    }
    if (WPM_COMFORT.0..=WPM_COMFORT.1).contains(&pacing.wpm) {
        out.push("말하기 속도가 적정 범위로 이탈 적음");
    }
    if sections.estimated_chapters >= CHAPTERS_STRONG_FROM {
        out.push("챕터 구성이 존재하여 흐름이 명확함");
    }
    out.into_iter().map(String::from).collect()
}

fn risks(
    title: &TitleReport,
    thumbnail: &ThumbnailReport,
    hook: &HookReport,
    pacing: &PacingReport,
    engagement: &EngagementReport,
) -> Vec<String> {
    let mut out = Vec::new();
    if hook.score <= HOOK_WEAK_UPTO {
        out.push("오프닝 훅 신호가 약함 → 첫 10초 개선 필요");
    }
    if title.power_words_hit == 0 && !title.has_number {
        out.push("제목의 자극/구체 신호 부족 → 숫자/기간/결과를 노출");
    }
    if pacing.wpm > WPM_OVERLOAD_ABOVE {
        out.push("발화 밀도 과다 → 컷어웨이와 휴지점 필요");
    }
    if thumbnail.score().is_some_and(|s| s <= THUMB_WEAK_UPTO) {
        out.push("썸네일 임팩트 약함 → 대비/표정/대형 숫자 활용");
    }
    if engagement.rate < ENGAGEMENT_WEAK_BELOW {
        out.push("참여율 낮음 → 챕터별 질문/댓글 유도 장치 추가");
    }
    out.into_iter().map(String::from).collect()
}

fn or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join("; ")
    }
}

/// Plain-text summary, one line per dimension.
pub fn render_report(report: &AnalysisReport) -> String {
    let thumb = match &report.thumbnail {
        ThumbnailReport::Error { reason } => format!("판독 실패 ({reason})"),
        other => match other.score() {
            Some(s) => format!("{s}/5"),
            None => "데이터 없음".to_string(),
        },
    };

    let lines = [
        format!("▶ 러닝타임: {}", report.runtime),
        format!(
            "▶ 참여율: {} ({})",
            report.engagement.rate,
            report.engagement.tier.label()
        ),
        format!(
            "▶ 발화 속도: {} wpm ({})",
            report.pacing.wpm, report.pacing.comment
        ),
        format!("▶ 제목 키워드: {}", report.title.keywords.join(", ")),
        format!("▶ 제목 구체성 점수: {}", report.title.specificity),
        format!(
            "▶ 훅 미리보기: {} (신호 {}/5)",
            report.hook.preview, report.hook.score
        ),
        format!("▶ 썸네일 salience: {thumb}"),
        format!("▶ 강점: {}", or_dash(&report.strengths)),
        format!("▶ 리스크: {}", or_dash(&report.risks)),
        format!("▶ 성과 이유: {}", report.why_it_performed.join("; ")),
    ];
    lines.join("\n")
}
