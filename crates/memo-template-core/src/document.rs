//! Template document: container plus paragraph sequence

use crate::body::BodyXml;
use crate::error::{Result, TemplateError};
use crate::package::{Package, DOCUMENT_PART};
use log::info;
use std::path::Path;

/// A body paragraph, identified by its position in the document
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Paragraph {
    /// Zero-based position in the body
    pub index: usize,
    /// Plain text of the paragraph's runs
    pub text: String,
}

/// A loaded DOCX/DOTX document
///
/// Paragraphs are never reordered, inserted or removed; only their text
/// changes. [`TemplateDocument::with_paragraph_texts`] consumes the document
/// and hands back a new one, so a caller never observes a half-edited body.
#[derive(Debug, Clone)]
pub struct TemplateDocument {
    package: Package,
    body: BodyXml,
    paragraphs: Vec<Paragraph>,
}

impl TemplateDocument {
    /// Load a document from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a ZIP container,
    /// has no `word/document.xml`, or the body XML is malformed.
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_package(Package::open(path)?)
    }

    /// Load a document from bytes
    ///
    /// # Errors
    ///
    /// Same as [`TemplateDocument::open`], minus the file access.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_package(Package::from_bytes(bytes)?)
    }

    fn from_package(package: Package) -> Result<Self> {
        let body = BodyXml::parse(package.require_part(DOCUMENT_PART)?)?;
        let paragraphs = body
            .texts()
            .enumerate()
            .map(|(index, text)| Paragraph {
                index,
                text: text.to_string(),
            })
            .collect::<Vec<_>>();
        info!("Loaded document with {} body paragraphs", paragraphs.len());
        Ok(Self {
            package,
            body,
            paragraphs,
        })
    }

    /// Body paragraphs in document order
    #[inline]
    #[must_use]
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Paragraph texts in document order
    #[must_use]
    pub fn paragraph_texts(&self) -> Vec<String> {
        self.paragraphs.iter().map(|p| p.text.clone()).collect()
    }

    /// Replace every paragraph's text
    ///
    /// # Errors
    ///
    /// Returns `ParagraphCountMismatch` unless exactly one text per paragraph
    /// is supplied.
    pub fn with_paragraph_texts(mut self, texts: Vec<String>) -> Result<Self> {
        if texts.len() != self.body.len() {
            return Err(TemplateError::ParagraphCountMismatch {
                expected: self.body.len(),
                actual: texts.len(),
            });
        }

        for (paragraph, text) in self.paragraphs.iter_mut().zip(texts) {
            self.body.set_text(paragraph.index, text.clone());
            paragraph.text = text;
        }
        Ok(self)
    }

    /// Serialize the document
    ///
    /// # Errors
    ///
    /// Returns an error if the body XML or the archive cannot be written.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.package_with_body()?.to_bytes()
    }

    /// Write the document to disk, replacing any existing file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.package_with_body()?.save(path)
    }

    fn package_with_body(&self) -> Result<Package> {
        let mut package = self.package.clone();
        package.replace_part(DOCUMENT_PART, self.body.to_xml()?)?;
        Ok(package)
    }
}
