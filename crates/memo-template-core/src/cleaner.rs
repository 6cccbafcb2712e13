//! Template cleaning pipeline
//!
//! 1. Literal scrub: mark non-empty paragraphs that contain example text.
//! 2. Pattern replacement: run the ordered rules over marked paragraphs.
//! 3. Section bodies: collapse each recognized section to one placeholder and
//!    rewrite the signature block.
//! 4. Persistence: write the document to the output path.
//!
//! Every stage produces a fresh text sequence; the document is rebuilt from
//! the final sequence in one step.

use crate::config::CleanerConfig;
use crate::document::TemplateDocument;
use crate::error::{Result, TemplateError};
use crate::rules::RuleSet;
use crate::sections::{replace_sections, SectionsFound};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Stage that produced an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditStage {
    /// Ordered rule replacement on a marked paragraph
    Pattern,
    /// Section-body or signature-block replacement
    Section,
}

/// One paragraph text change
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextEdit {
    /// Paragraph index
    pub index: usize,
    /// Stage that made the change
    pub stage: EditStage,
    /// Text before the change
    pub before: String,
    /// Text after the change
    pub after: String,
}

/// Summary of a cleaning run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanReport {
    /// Body paragraphs in the document
    pub paragraph_count: usize,
    /// Paragraphs marked by the literal scrub
    pub candidates: Vec<usize>,
    /// Changes in the order they were made
    pub edits: Vec<TextEdit>,
    /// Sections and signature block found
    pub sections: SectionsFound,
}

impl CleanReport {
    /// Whether any paragraph changed
    #[inline]
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Edits made by one stage
    pub fn edits_for(&self, stage: EditStage) -> impl Iterator<Item = &TextEdit> + '_ {
        self.edits.iter().filter(move |edit| edit.stage == stage)
    }
}

/// Texts produced by a cleaning pass, with its report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanOutcome {
    /// Paragraph texts after cleaning
    pub texts: Vec<String>,
    /// What happened
    pub report: CleanReport,
}

/// Turns a sample memo into a merge-field template
#[derive(Debug, Clone)]
pub struct TemplateCleaner {
    rules: RuleSet,
}

impl TemplateCleaner {
    /// Build a cleaner from configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` if a configured rule does not compile.
    pub fn new(config: &CleanerConfig) -> Result<Self> {
        Ok(Self {
            rules: RuleSet::from_config(config)?,
        })
    }

    /// Compiled literals and rules
    #[inline]
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Run the text stages over a paragraph sequence
    #[must_use]
    pub fn clean_texts(&self, texts: &[String]) -> CleanOutcome {
        let mut report = CleanReport {
            paragraph_count: texts.len(),
            ..CleanReport::default()
        };

        report.candidates = texts
            .iter()
            .enumerate()
            .filter(|(_, text)| self.rules.is_candidate(text))
            .map(|(index, _)| index)
            .collect();
        debug!("{} candidate paragraphs", report.candidates.len());

        let mut replaced = texts.to_vec();
        for &index in &report.candidates {
            let before = &texts[index];
            let after = self.rules.apply(before);
            if after != *before {
                debug!("Paragraph {index}: {before:?} -> {after:?}");
                report.edits.push(TextEdit {
                    index,
                    stage: EditStage::Pattern,
                    before: before.clone(),
                    after: after.clone(),
                });
                replaced[index] = after;
            }
        }

        let sections = replace_sections(&replaced);
        for edit in sections.edits {
            report.edits.push(TextEdit {
                index: edit.index,
                stage: EditStage::Section,
                before: replaced[edit.index].clone(),
                after: edit.text,
            });
        }
        report.sections = sections.found;

        CleanOutcome {
            texts: sections.texts,
            report,
        }
    }

    /// Clean a loaded document
    ///
    /// # Errors
    ///
    /// Returns an error if the cleaned texts cannot be applied to the document.
    pub fn clean_document(
        &self,
        document: TemplateDocument,
    ) -> Result<(TemplateDocument, CleanReport)> {
        let outcome = self.clean_texts(&document.paragraph_texts());
        let missing = outcome.report.sections.missing();
        if !missing.is_empty() {
            warn!("Not found in document: {}", missing.join(", "));
        }
        let document = document.with_paragraph_texts(outcome.texts)?;
        Ok((document, outcome.report))
    }

    /// Load `input`, clean it, and write the template to `output`
    ///
    /// `output` is overwritten without confirmation. Nothing is written when
    /// `input` does not exist.
    ///
    /// # Errors
    ///
    /// Returns `InputNotFound` if `input` does not exist, or any load, clean
    /// or save error.
    pub fn clean(&self, input: &Path, output: &Path) -> Result<CleanReport> {
        let document = load_input(input)?;
        let (document, report) = self.clean_document(document)?;
        document.save(output)?;
        info!(
            "Saved template to {} ({} edits)",
            output.display(),
            report.edits.len()
        );
        Ok(report)
    }
}

/// Load the input document, checking that it exists first
///
/// # Errors
///
/// Returns `InputNotFound` if `input` does not exist, or any load error.
pub fn load_input(input: &Path) -> Result<TemplateDocument> {
    if !input.exists() {
        return Err(TemplateError::InputNotFound(input.to_path_buf()));
    }
    TemplateDocument::open(input)
}

/// Clean `input` into `output` with the built-in profile
///
/// # Errors
///
/// Same as [`TemplateCleaner::clean`].
pub fn clean(input: &Path, output: &Path) -> Result<CleanReport> {
    TemplateCleaner::new(&CleanerConfig::default())?.clean(input, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn cleaner() -> TemplateCleaner {
        TemplateCleaner::new(&CleanerConfig::default()).unwrap()
    }

    fn sample_memo() -> Vec<String> {
        texts(&[
            "致：中翼航空投资有限公司",
            "关于旅客投诉餐食异物相关事宜之法律备忘录",
            "",
            "我们，国浩律师（北京）事务所，接受中翼航空投资有限公司的委托，就旅客投诉餐食异物相关事宜，出具本备忘录。",
            "一、基本事实",
            "2026年1月8日，香港籍旅客林大荣在航班上用餐时发现异物。",
            "旅客随后前往顺义区医院就诊。",
            "二、法律分析",
            "（一）、责任认定",
            "贵司作为承运人应承担相应责任。",
            "三、后续建议",
            "建议贵司保留相关证据。",
            "建议贵司与旅客积极沟通。",
            "国浩律师（北京）事务所",
            "2026年1月19日",
        ])
    }

    #[test]
    fn test_candidates_follow_literals() {
        let outcome = cleaner().clean_texts(&sample_memo());
        assert_eq!(outcome.report.candidates, vec![0, 1, 3, 5, 6, 13, 14]);
    }

    #[test]
    fn test_full_memo() {
        let outcome = cleaner().clean_texts(&sample_memo());
        assert_eq!(
            outcome.texts,
            texts(&[
                "致：{d.client_name}",
                "关于 {d.case_title} 之法律备忘录",
                "",
                "我们接受委托，就相关事宜，出具本备忘录。",
                "一、基本事实",
                "{d.basic_facts}",
                "",
                "二、法律分析",
                "（一）、责任认定",
                "贵司作为承运人应承担相应责任。",
                "三、后续建议",
                "{d.recommendations}",
                "",
                "{d.law_firm}",
                "{d.date}",
            ])
        );
        assert!(outcome.report.sections.is_complete());
        assert_eq!(outcome.report.paragraph_count, 15);
    }

    #[test]
    fn test_edit_log_records_both_stages() {
        let outcome = cleaner().clean_texts(&sample_memo());
        let report = &outcome.report;

        let date_edit = report
            .edits_for(EditStage::Pattern)
            .find(|edit| edit.index == 14)
            .unwrap();
        assert_eq!(date_edit.after, "{d.event_date}");

        let signature_date = report
            .edits_for(EditStage::Section)
            .find(|edit| edit.index == 14)
            .unwrap();
        assert_eq!(signature_date.before, "{d.event_date}");
        assert_eq!(signature_date.after, "{d.date}");
    }

    #[test]
    fn test_whitespace_is_preserved_around_replacements() {
        let outcome = cleaner().clean_texts(&texts(&["  于2026年1月8日登机  "]));
        assert_eq!(outcome.texts, texts(&["  于{d.event_date}登机  "]));
    }

    #[test]
    fn test_clean_is_idempotent() {
        let cleaner = cleaner();
        let first = cleaner.clean_texts(&sample_memo());
        let second = cleaner.clean_texts(&first.texts);
        assert_eq!(second.texts, first.texts);
        assert!(!second.report.changed());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = sample_memo();
        let _ = cleaner().clean_texts(&input);
        assert_eq!(input, sample_memo());
    }

    #[test]
    fn test_report_serializes() {
        let outcome = cleaner().clean_texts(&texts(&["致：中翼航空投资有限公司"]));
        let json = serde_json::to_value(&outcome.report).unwrap();
        assert_eq!(json["edits"][0]["stage"], "pattern");
        assert_eq!(json["edits"][0]["after"], "致：{d.client_name}");
        assert_eq!(json["sections"]["basic_facts"], false);

        let decoded: CleanReport = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, outcome.report);
    }

    #[test]
    fn test_missing_input() {
        let result = clean(
            Path::new("/nonexistent/legal-memo-template.dotx"),
            Path::new("/nonexistent/out.dotx"),
        );
        assert!(matches!(result, Err(TemplateError::InputNotFound(_))));
    }
}
