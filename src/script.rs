// src/script.rs
//! Script assembly from a chosen idea, a narrator persona, a chapter outline and a
//! filming style. Output is plain markdown-ish text.

use serde::Deserialize;

use crate::config::Heuristics;
use crate::error::{EngineError, Result};
use crate::ideas::Idea;

const UNTITLED_IDEA: &str = "새 아이디어";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScriptRequest {
    #[serde(default)]
    pub persona: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub chapters: Vec<String>,
}

/// Split a comma-separated outline; blank entries are dropped.
pub fn parse_chapters(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let v = value.trim();
    if v.is_empty() {
        fallback
    } else {
        v
    }
}

fn chapter_lines<'h>(chapter: &str, h: &'h Heuristics) -> &'h [String] {
    h.script
        .chapters
        .iter()
        .find(|t| t.keywords.iter().any(|k| chapter.contains(k.as_str())))
        .map(|t| t.lines.as_slice())
        .unwrap_or(h.script.fallback_lines.as_slice())
}

/// Assemble the final script. Fails with [`EngineError::NoIdeaSelected`] when no idea
/// was chosen; an empty outline falls back to the default six stages.
pub fn assemble_script(idea: Option<&Idea>, req: &ScriptRequest, h: &Heuristics) -> Result<String> {
    let idea = idea.ok_or(EngineError::NoIdeaSelected)?;

    let title = or_default(&idea.idea_title, UNTITLED_IDEA);
    let persona = or_default(&req.persona, &h.script.default_persona);
    let style = or_default(&req.style, &h.script.default_style);
    let chapters: Vec<&str> = {
        let given: Vec<&str> = req
            .chapters
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();
        if given.is_empty() {
            h.script.default_outline.iter().map(String::as_str).collect()
        } else {
            given
        }
    };
    let opener = h.persona_opener(persona);

    let mut lines: Vec<String> = vec![
        format!("# 최종 대본: {title}\n"),
        format!("## 연출 톤: {style}"),
        format!("## 화자 페르소나: {persona}"),
        format!("## 로그라인: {}\n", idea.logline),
    ];

    for (idx, ch) in chapters.iter().enumerate().map(|(i, c)| (i + 1, c)) {
        lines.push(format!("\n### 챕터 {idx}. {ch}"));
        if idx == 1 {
            lines.push(format!(
                "내레이션: ({persona}) {opener} 오늘은 '{title}' 컨셉으로, 실행하면 바로 효과를 확인할 수 있게 준비했어요."
            ));
            lines.push("화면: 강한 B-roll/텍스트 오버레이로 핵심 약속 1문장.".to_string());
        } else {
            lines.extend(chapter_lines(ch, h).iter().cloned());
        }
    }

    tracing::debug!(chapters = chapters.len(), persona, style, "script assembled");
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idea() -> Idea {
        Idea {
            idea_title: "[속도런] 루틴를 다르게 해봤다".into(),
            concept: "X분만에 결과 내기 + 차별포인트: 장비 1개만 허용".into(),
            logline: "로그라인 본문".into(),
        }
    }

    #[test]
    fn no_idea_is_a_precondition_error() {
        let h = Heuristics::builtin();
        let err = assemble_script(None, &ScriptRequest::default(), &h).unwrap_err();
        assert!(matches!(err, EngineError::NoIdeaSelected));
    }

    #[test]
    fn empty_outline_uses_six_default_chapters() {
        let h = Heuristics::builtin();
        let s = assemble_script(Some(&idea()), &ScriptRequest::default(), &h).unwrap();
        assert_eq!(s.matches("### 챕터 ").count(), 6);
        assert!(s.contains("### 챕터 6. CTA(구독/댓글 유도)"));
        assert!(s.contains("## 화자 페르소나: 전문가"));
        assert!(s.contains("## 연출 톤: 스튜디오 톤"));
        assert!(s.contains("정확한 데이터와 근거로 안내할게요."));
    }

    #[test]
    fn dispatch_by_chapter_label() {
        let h = Heuristics::builtin();
        let req = ScriptRequest {
            persona: "우주인".into(),
            style: "현장 리포트".into(),
            chapters: parse_chapters("오프닝, 컨텍스트 설명, 파트A, 결과 공개, CTA, 잡담"),
        };
        let s = assemble_script(Some(&idea()), &req, &h).unwrap();
        assert!(s.contains("(우주인) 톤은 자연스럽고 명료합니다."));
        assert!(s.contains("테이블 그래픽 3줄"));
        assert!(s.contains("멀티캠 컷"));
        assert!(s.contains("한줄결론"));
        assert!(s.contains("댓글 미션 제시"));
        assert!(s.contains("키워드 2개만 큰 자막으로."));
    }

    #[test]
    fn first_chapter_is_always_the_opener() {
        let h = Heuristics::builtin();
        let req = ScriptRequest {
            chapters: vec!["CTA 먼저".into()],
            ..Default::default()
        };
        let s = assemble_script(Some(&idea()), &req, &h).unwrap();
        assert!(s.contains("### 챕터 1. CTA 먼저"));
        assert!(!s.contains("댓글 미션 제시"));
    }

    #[test]
    fn parse_chapters_trims_and_drops_blanks() {
        assert_eq!(parse_chapters(" a , ,b,, "), vec!["a", "b"]);
        assert!(parse_chapters(" , ").is_empty());
    }
}
