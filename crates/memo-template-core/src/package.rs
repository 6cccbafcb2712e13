//! Word-processing container (OPC) handling
//!
//! DOCX and DOTX files are ZIP archives of XML parts:
//! - `[Content_Types].xml`: part content types (differs between .docx and .dotx)
//! - `word/document.xml`: main body (paragraphs, tables, section properties)
//! - `word/styles.xml`, `word/settings.xml`, `docProps/*`, media, ...
//!
//! Only the body part is rewritten. Every other entry is carried over byte for
//! byte, in archive order, with its original compression method, so the saved
//! file keeps the format of the input.

use crate::error::{Result, TemplateError};
use log::{debug, info};
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Part holding the document body
pub const DOCUMENT_PART: &str = "word/document.xml";

/// One entry of the container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
    /// Entry name within the archive (e.g. `word/document.xml`)
    pub name: String,
    /// Uncompressed bytes (empty for directories)
    pub data: Vec<u8>,
    /// Whether the entry was stored without compression
    pub stored: bool,
    /// Directory entry
    pub is_dir: bool,
}

/// In-memory copy of a DOCX/DOTX container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    entries: Vec<PackageEntry>,
}

impl Package {
    /// Read a container from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid ZIP archive.
    pub fn open(path: &Path) -> Result<Self> {
        info!("Reading template container: {}", path.display());
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Read a container from bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid ZIP archive, an entry is
    /// encrypted, or an entry cannot be decompressed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut entries = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            // Opening an encrypted entry for reading fails, so look at the raw one first
            let (name, encrypted) = {
                let raw = archive.by_index_raw(i)?;
                (raw.name().to_string(), raw.encrypted())
            };
            if encrypted {
                return Err(TemplateError::EncryptedEntry(name));
            }

            let mut zip_file = archive.by_index(i)?;

            let is_dir = zip_file.is_dir();
            let stored = zip_file.compression() == CompressionMethod::Stored;
            let mut data = Vec::new();
            if !is_dir {
                zip_file.read_to_end(&mut data)?;
            }

            debug!("Loaded entry {name} ({} bytes)", data.len());
            entries.push(PackageEntry {
                name,
                data,
                stored,
                is_dir,
            });
        }

        Ok(Self { entries })
    }

    /// Entries in archive order
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[PackageEntry] {
        &self.entries
    }

    /// Bytes of a named part
    #[must_use]
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|entry| !entry.is_dir && entry.name == name)
            .map(|entry| entry.data.as_slice())
    }

    /// Bytes of a named part, or `MissingPart`
    ///
    /// # Errors
    ///
    /// Returns `MissingPart` if the container has no such part.
    pub fn require_part(&self, name: &str) -> Result<&[u8]> {
        self.part(name)
            .ok_or_else(|| TemplateError::MissingPart(name.to_string()))
    }

    /// Substitute the bytes of an existing part
    ///
    /// # Errors
    ///
    /// Returns `MissingPart` if the container has no such part.
    pub fn replace_part(&mut self, name: &str, data: Vec<u8>) -> Result<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| !entry.is_dir && entry.name == name)
            .ok_or_else(|| TemplateError::MissingPart(name.to_string()))?;
        entry.data = data;
        Ok(())
    }

    /// Serialize the container
    ///
    /// # Errors
    ///
    /// Returns an error if writing the archive fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        for entry in &self.entries {
            let method = if entry.stored {
                CompressionMethod::Stored
            } else {
                CompressionMethod::Deflated
            };
            let options = SimpleFileOptions::default().compression_method(method);

            if entry.is_dir {
                zip.add_directory(entry.name.as_str(), options)?;
            } else {
                zip.start_file(entry.name.as_str(), options)?;
                zip.write_all(&entry.data)?;
            }
        }

        Ok(zip.finish()?.into_inner())
    }

    /// Write the container to disk, replacing any existing file
    ///
    /// The archive is assembled in memory first, so a failure while encoding
    /// leaves the destination untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        fs::write(path, &bytes)?;
        info!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_archive() -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        zip.start_file("[Content_Types].xml", stored).unwrap();
        zip.write_all(b"<Types/>").unwrap();
        zip.add_directory("word/", SimpleFileOptions::default())
            .unwrap();
        zip.start_file(DOCUMENT_PART, SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"<w:document/>").unwrap();
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_reads_entries_in_order() {
        let package = Package::from_bytes(&sample_archive()).unwrap();
        let names: Vec<&str> = package.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["[Content_Types].xml", "word/", DOCUMENT_PART]);
        assert!(package.entries()[0].stored);
        assert!(package.entries()[1].is_dir);
        assert_eq!(package.part(DOCUMENT_PART), Some(&b"<w:document/>"[..]));
    }

    #[test]
    fn test_replace_part_and_reserialize() {
        let mut package = Package::from_bytes(&sample_archive()).unwrap();
        package
            .replace_part(DOCUMENT_PART, b"<w:document><w:body/></w:document>".to_vec())
            .unwrap();

        let reloaded = Package::from_bytes(&package.to_bytes().unwrap()).unwrap();
        assert_eq!(reloaded.entries().len(), 3);
        assert_eq!(
            reloaded.part(DOCUMENT_PART),
            Some(&b"<w:document><w:body/></w:document>"[..])
        );
        assert_eq!(reloaded.part("[Content_Types].xml"), Some(&b"<Types/>"[..]));
        assert!(reloaded.entries()[0].stored);
    }

    #[test]
    fn test_missing_part() {
        let mut package = Package::from_bytes(&sample_archive()).unwrap();
        assert!(matches!(
            package.require_part("word/styles.xml"),
            Err(TemplateError::MissingPart(_))
        ));
        assert!(matches!(
            package.replace_part("word/styles.xml", Vec::new()),
            Err(TemplateError::MissingPart(_))
        ));
    }

    #[test]
    fn test_encrypted_entry_is_rejected() {
        use zip::unstable::write::FileOptionsExt;

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file(DOCUMENT_PART, SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"<w:document/>").unwrap();
        zip.start_file(
            "word/styles.xml",
            SimpleFileOptions::default().with_deprecated_encryption(b"secret"),
        )
        .unwrap();
        zip.write_all(b"<w:styles/>").unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        match Package::from_bytes(&bytes) {
            Err(TemplateError::EncryptedEntry(name)) => assert_eq!(name, "word/styles.xml"),
            other => panic!("expected EncryptedEntry, got {other:?}"),
        }
    }

    #[test]
    fn test_not_a_zip() {
        let result = Package::from_bytes(b"definitely not a zip file");
        assert!(matches!(result, Err(TemplateError::Zip(_))));
    }
}
