// tests/keyword_ranking.rs

use std::collections::HashSet;

use longform_script_builder::{top_keywords, Heuristics};

#[test]
fn equal_frequencies_sort_lexicographically() {
    let none = HashSet::new();
    // 가가:2, 나나:2, 다다:1
    let kws = top_keywords("다다 나나 가가 나나 가가", 10, &none);
    assert_eq!(kws, vec!["가가", "나나", "다다"]);
}

#[test]
fn ranking_is_stable_and_a_fixed_point() {
    let h = Heuristics::builtin();
    let text = "정리 루틴 정리 수납 루틴 정리 그리고 영상 수납 a b 버리기";
    let first = top_keywords(text, 8, &h.stopwords);
    let second = top_keywords(text, 8, &h.stopwords);
    assert_eq!(first, second);
    assert_eq!(first[..3], ["정리", "루틴", "수납"]);

    // Feeding the keywords back in selects exactly the same set.
    let again = top_keywords(&first.join(" "), 8, &h.stopwords);
    let a: HashSet<_> = first.iter().collect();
    let b: HashSet<_> = again.iter().collect();
    assert_eq!(a, b);
}

#[test]
fn empty_and_stopword_only_inputs_yield_nothing() {
    let h = Heuristics::builtin();
    assert!(top_keywords("", 5, &h.stopwords).is_empty());
    assert!(top_keywords("그리고 영상 오늘 여러분 !!!", 5, &h.stopwords).is_empty());
}

#[test]
fn mixed_case_latin_is_merged() {
    let h = Heuristics::builtin();
    let kws = top_keywords("Notion notion NOTION 캘린더", 2, &h.stopwords);
    assert_eq!(kws, vec!["notion", "캘린더"]);
}
