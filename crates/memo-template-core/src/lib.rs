//! # memo-template-core
//!
//! Turns a sample legal memo (DOCX/DOTX) into a reusable template by stripping
//! example-specific text and inserting Carbone merge fields (`{d.<field>}`).
//!
//! The pass is linear over the body paragraphs:
//! - paragraphs containing example literals get ordered regex replacements
//! - the basic-facts, legal-analysis and recommendations sections collapse to
//!   one placeholder each, with the rest of their body cleared
//! - the signature block becomes `{d.law_firm}` / `{d.date}`
//!
//! Paragraph count and everything outside the rewritten paragraphs is
//! preserved.
//!
//! ## Example
//!
//! ```no_run
//! use memo_template_core::{CleanerConfig, TemplateCleaner};
//! use std::path::Path;
//!
//! let cleaner = TemplateCleaner::new(&CleanerConfig::default())?;
//! let report = cleaner.clean(
//!     Path::new("legal-memo-template.dotx"),
//!     Path::new("legal-memo-carbone.dotx"),
//! )?;
//! for edit in &report.edits {
//!     println!("{}: {} -> {}", edit.index, edit.before, edit.after);
//! }
//! # Ok::<(), memo_template_core::TemplateError>(())
//! ```

mod body;
/// Cleaning pipeline
pub mod cleaner;
/// Configuration and built-in profile
pub mod config;
/// Document and paragraph model
pub mod document;
/// Error types
pub mod error;
/// ZIP container handling
pub mod package;
/// Merge-field placeholders
pub mod placeholder;
/// Literal scrub and replacement rules
pub mod rules;
/// Section-body and signature replacement
pub mod sections;

pub use cleaner::{
    clean, load_input, CleanOutcome, CleanReport, EditStage, TemplateCleaner, TextEdit,
};
pub use config::{CleanerConfig, RuleConfig};
pub use document::{Paragraph, TemplateDocument};
pub use error::{Result, TemplateError};
pub use package::Package;
pub use placeholder::Placeholder;
pub use rules::{ReplacementRule, RuleSet};
pub use sections::{is_section_boundary, is_signature_line, SectionKind, SectionsFound};
