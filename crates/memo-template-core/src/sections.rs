//! Section-body and signature-block replacement
//!
//! The memo has three sections whose bodies become a single placeholder:
//! basic facts, legal analysis and follow-up recommendations. The closing
//! signature block (firm line, then date line) becomes `{d.law_firm}` and
//! `{d.date}`.
//!
//! Body paragraphs after the first are cleared rather than removed, so the
//! paragraph count never changes.

use crate::placeholder::Placeholder;
use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static RE_CHINESE_ENUM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[（(]?[一二三四五六七八九十]+[)）]?、").expect("valid enumeration regex")
});
static RE_ARABIC_ENUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[、.]").expect("valid enumeration regex"));

const SIGNATURE_MARKERS: [&str; 2] = ["律师", "事务所"];

/// One of the recognized memo sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// 基本事实
    BasicFacts,
    /// 法律分析
    LegalAnalysis,
    /// 后续建议
    Recommendations,
}

impl SectionKind {
    /// Classify a heading; checks run in priority order, first hit wins
    #[must_use]
    pub fn detect(text: &str) -> Option<Self> {
        if text.contains("基本事实") {
            Some(Self::BasicFacts)
        } else if text.contains("法律分析") {
            Some(Self::LegalAnalysis)
        } else if text.contains("建议") && text.contains("后续") {
            Some(Self::Recommendations)
        } else {
            None
        }
    }

    /// Placeholder the section body collapses to
    #[must_use]
    pub const fn placeholder(self) -> Placeholder {
        match self {
            Self::BasicFacts => Placeholder::BasicFacts,
            Self::LegalAnalysis => Placeholder::LegalOpinion,
            Self::Recommendations => Placeholder::Recommendations,
        }
    }

    /// Heading label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BasicFacts => "基本事实",
            Self::LegalAnalysis => "法律分析",
            Self::Recommendations => "后续建议",
        }
    }
}

/// Whether a paragraph opens a new section
///
/// Enumerated headings ("一、", "（一）、", "1、", "1.") and the recognized
/// section headings themselves end the current section body.
#[must_use]
pub fn is_section_boundary(text: &str) -> bool {
    let trimmed = text.trim();
    RE_CHINESE_ENUM.is_match(trimmed)
        || RE_ARABIC_ENUM.is_match(trimmed)
        || SectionKind::detect(trimmed).is_some()
}

/// Whether a paragraph is the firm line of the signature block
#[must_use]
pub fn is_signature_line(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed == Placeholder::LawFirm.token()
        || SIGNATURE_MARKERS.iter().any(|marker| trimmed.contains(marker))
}

/// What the section pass found
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionsFound {
    /// Basic-facts heading seen
    pub basic_facts: bool,
    /// Legal-analysis heading seen
    pub legal_analysis: bool,
    /// Recommendations heading seen
    pub recommendations: bool,
    /// Signature block replaced
    pub signature: bool,
}

impl SectionsFound {
    fn mark(&mut self, kind: SectionKind) {
        match kind {
            SectionKind::BasicFacts => self.basic_facts = true,
            SectionKind::LegalAnalysis => self.legal_analysis = true,
            SectionKind::Recommendations => self.recommendations = true,
        }
    }

    /// Labels of the parts that were not found
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.basic_facts {
            missing.push(SectionKind::BasicFacts.label());
        }
        if !self.legal_analysis {
            missing.push(SectionKind::LegalAnalysis.label());
        }
        if !self.recommendations {
            missing.push(SectionKind::Recommendations.label());
        }
        if !self.signature {
            missing.push("落款");
        }
        missing
    }

    /// All sections and the signature block were found
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.basic_facts && self.legal_analysis && self.recommendations && self.signature
    }
}

/// A single text change made by the section pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionEdit {
    /// Paragraph index
    pub index: usize,
    /// New text
    pub text: String,
}

/// Result of the section pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionOutcome {
    /// Paragraph texts after the pass
    pub texts: Vec<String>,
    /// Changes in the order they were made
    pub edits: Vec<SectionEdit>,
    /// What was found
    pub found: SectionsFound,
}

struct SectionPass {
    texts: Vec<String>,
    edits: Vec<SectionEdit>,
    found: SectionsFound,
}

impl SectionPass {
    fn set(&mut self, index: usize, text: String) {
        if self.texts[index] != text {
            debug!("Paragraph {index}: {:?} -> {text:?}", self.texts[index]);
            self.texts[index] = text.clone();
            self.edits.push(SectionEdit { index, text });
        }
    }

    /// First placeholder, then clear up to (excluding) the next boundary.
    /// Returns the index scanning resumes at.
    fn collapse_body(&mut self, heading: usize, kind: SectionKind) -> usize {
        let mut end = heading + 1;
        while end < self.texts.len() && !is_section_boundary(&self.texts[end]) {
            end += 1;
        }
        if end > heading + 1 {
            self.set(heading + 1, kind.placeholder().token());
            for index in heading + 2..end {
                self.set(index, String::new());
            }
        } else {
            warn!("Section '{}' at paragraph {heading} has no body", kind.label());
        }
        end
    }

    /// Collapse the recommendations body and rewrite the signature block.
    /// Returns the index scanning resumes at.
    fn collapse_recommendations(&mut self, heading: usize) -> usize {
        let mut index = heading + 1;
        while index < self.texts.len() {
            if is_signature_line(&self.texts[index]) {
                self.set(index, Placeholder::LawFirm.token());
                if index + 1 < self.texts.len() {
                    self.set(index + 1, Placeholder::Date.token());
                }
                self.found.signature = true;
                return index + 2;
            }
            if index == heading + 1 {
                self.set(index, Placeholder::Recommendations.token());
            } else {
                self.set(index, String::new());
            }
            index += 1;
        }
        warn!("No signature block after the recommendations section");
        index
    }
}

/// Replace section bodies and the signature block
///
/// Builds a new text sequence; `texts` is left untouched.
#[must_use]
pub fn replace_sections(texts: &[String]) -> SectionOutcome {
    let mut pass = SectionPass {
        texts: texts.to_vec(),
        edits: Vec::new(),
        found: SectionsFound::default(),
    };

    let mut index = 0;
    while index < pass.texts.len() {
        let Some(kind) = SectionKind::detect(pass.texts[index].trim()) else {
            index += 1;
            continue;
        };
        debug!("Found section '{}' at paragraph {index}", kind.label());
        pass.found.mark(kind);
        index = match kind {
            SectionKind::BasicFacts | SectionKind::LegalAnalysis => {
                pass.collapse_body(index, kind)
            }
            SectionKind::Recommendations => pass.collapse_recommendations(index),
        };
    }

    SectionOutcome {
        texts: pass.texts,
        edits: pass.edits,
        found: pass.found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_detect_priority() {
        assert_eq!(SectionKind::detect("一、基本事实"), Some(SectionKind::BasicFacts));
        assert_eq!(SectionKind::detect("二、法律分析"), Some(SectionKind::LegalAnalysis));
        assert_eq!(
            SectionKind::detect("三、后续建议"),
            Some(SectionKind::Recommendations)
        );
        assert_eq!(
            SectionKind::detect("基本事实与法律分析"),
            Some(SectionKind::BasicFacts)
        );
        assert_eq!(SectionKind::detect("我们的建议"), None);
    }

    #[test]
    fn test_boundaries() {
        assert!(is_section_boundary("一、基本事实"));
        assert!(is_section_boundary("（二）、责任认定"));
        assert!(is_section_boundary("(三)、证据"));
        assert!(is_section_boundary("十二、附件"));
        assert!(is_section_boundary("1、航班信息"));
        assert!(is_section_boundary("  2.旅客诉求"));
        assert!(is_section_boundary("法律分析"));
        assert!(!is_section_boundary("2026年1月8日，旅客登机。"));
        assert!(!is_section_boundary("旅客称餐食中有异物。"));
    }

    #[test]
    fn test_basic_facts_body_collapses() {
        let input = texts(&["一、基本事实", "事实一", "事实二", "事实三", "二、法律分析", "分析"]);
        let outcome = replace_sections(&input);
        assert_eq!(
            outcome.texts,
            texts(&["一、基本事实", "{d.basic_facts}", "", "", "二、法律分析", "{d.legal_opinion}"])
        );
        assert!(outcome.found.basic_facts);
        assert!(outcome.found.legal_analysis);
        assert_eq!(input[1], "事实一");
    }

    #[test]
    fn test_body_stops_at_numbered_paragraph() {
        let input = texts(&["一、基本事实", "事实", "补充", "1、航班信息", "航班详情"]);
        let outcome = replace_sections(&input);
        assert_eq!(
            outcome.texts,
            texts(&["一、基本事实", "{d.basic_facts}", "", "1、航班信息", "航班详情"])
        );
    }

    #[test]
    fn test_empty_section_writes_nothing() {
        let input = texts(&["一、基本事实", "二、法律分析", "分析"]);
        let outcome = replace_sections(&input);
        assert_eq!(
            outcome.texts,
            texts(&["一、基本事实", "二、法律分析", "{d.legal_opinion}"])
        );
    }

    #[test]
    fn test_recommendations_and_signature() {
        let input = texts(&[
            "三、后续建议",
            "建议保留证据",
            "国浩律师（北京）事务所",
            "二〇二六年一月十九日",
        ]);
        let outcome = replace_sections(&input);
        assert_eq!(
            outcome.texts,
            texts(&["三、后续建议", "{d.recommendations}", "{d.law_firm}", "{d.date}"])
        );
        assert!(outcome.found.recommendations);
        assert!(outcome.found.signature);
    }

    #[test]
    fn test_recommendations_clear_until_signature() {
        let input = texts(&[
            "三、后续建议",
            "第一条",
            "第二条",
            "1、第三条",
            "某某事务所",
            "日期",
            "附言",
        ]);
        let outcome = replace_sections(&input);
        assert_eq!(
            outcome.texts,
            texts(&["三、后续建议", "{d.recommendations}", "", "", "{d.law_firm}", "{d.date}", "附言"])
        );
    }

    #[test]
    fn test_recommendations_without_signature_runs_to_end() {
        let input = texts(&["三、后续建议", "第一条", "第二条"]);
        let outcome = replace_sections(&input);
        assert_eq!(outcome.texts, texts(&["三、后续建议", "{d.recommendations}", ""]));
        assert!(!outcome.found.signature);
        assert_eq!(outcome.found.missing(), vec!["基本事实", "法律分析", "落款"]);
    }

    #[test]
    fn test_signature_on_last_paragraph() {
        let input = texts(&["三、后续建议", "建议", "某律师事务所"]);
        let outcome = replace_sections(&input);
        assert_eq!(
            outcome.texts,
            texts(&["三、后续建议", "{d.recommendations}", "{d.law_firm}"])
        );
    }

    #[test]
    fn test_second_pass_changes_nothing() {
        let input = texts(&[
            "一、基本事实",
            "事实一",
            "事实二",
            "二、法律分析",
            "分析一",
            "三、后续建议",
            "建议一",
            "建议二",
            "国浩律师（北京）事务所",
            "二〇二六年一月十九日",
        ]);
        let first = replace_sections(&input);
        assert!(first.found.is_complete());
        let second = replace_sections(&first.texts);
        assert_eq!(second.texts, first.texts);
        assert!(second.edits.is_empty());
    }
}
