//! On-disk patient document.
//!
//! The whole patient collection lives in a single XML file:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <pacientes>
//!   <paciente>
//!     <id>1</id>
//!     <nombre>Ana</nombre>
//!     ...
//!   </paciente>
//! </pacientes>
//! ```
//!
//! [`DocumentStore`] is the only code that reads or writes this file. Every field is stored as
//! text; integer decoding happens in [`crate::patient`].
//!
//! ## Consistency
//!
//! - A document that cannot be read or parsed is replaced by an empty one (self-heal). The
//!   records it held are lost.
//! - Saves rewrite the whole file through a temporary sibling and an atomic rename, so readers
//!   never see a partially written document.
//! - The store does no locking of its own. Serialising load-modify-save cycles is the
//!   repository's job, and only within one process.

use crate::constants::{INDENT_WIDTH, ROOT_ELEMENT, XML_DECLARATION};
use crate::{PatientError, PatientResult};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Wire representation of the patient collection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "pacientes")]
pub struct PatientDocument {
    #[serde(rename = "paciente", default)]
    pub records: Vec<PatientRecord>,
}

/// Wire representation of one patient; every field is text and may be absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientRecord {
    pub id: String,
    pub nombre: String,
    pub apellido: String,
    pub documento: String,
    pub edad: String,
    pub sexo: String,
    pub telefono: String,
    pub direccion: String,
    pub fecha_registro: String,
}

impl PatientDocument {
    /// Parse a patient document from XML text.
    ///
    /// The root element must be `<pacientes>`. Schema mismatches report the path of the
    /// offending element via `serde_path_to_error`.
    pub fn parse(xml: &str) -> PatientResult<Self> {
        match root_element_name(xml) {
            Some(name) if name == ROOT_ELEMENT => {}
            Some(name) => {
                return Err(PatientError::Deserialization(format!(
                    "expected root element <{ROOT_ELEMENT}>, got <{name}>"
                )));
            }
            None => {
                return Err(PatientError::Deserialization(
                    "document has no root element".into(),
                ));
            }
        }

        let mut deserializer = quick_xml::de::Deserializer::from_str(xml);
        serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
            let path = err.path().to_string();
            let source = err.into_inner();
            let path = if path.is_empty() || path == "." {
                "<root>"
            } else {
                path.as_str()
            };
            PatientError::Deserialization(format!("schema mismatch at {path}: {source}"))
        })
    }

    /// Render the document in canonical form: XML declaration, two-space indentation and a
    /// trailing newline.
    pub fn render(&self) -> PatientResult<String> {
        let mut body = String::new();
        let mut serializer = quick_xml::se::Serializer::new(&mut body);
        serializer.indent(' ', INDENT_WIDTH);
        self.serialize(serializer)
            .map_err(PatientError::Serialization)?;

        Ok(format!("{XML_DECLARATION}\n{body}\n"))
    }
}

/// Returns the name of the first element in `xml`, if the prolog parses.
fn root_element_name(xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return Some(String::from_utf8_lossy(e.name().as_ref()).to_string());
            }
            Ok(Event::Eof) | Err(_) => return None,
            Ok(_) => continue,
        }
    }
}

/// Owner of the on-disk patient document.
#[derive(Debug)]
pub struct DocumentStore {
    path: PathBuf,
    #[cfg(test)]
    reject_saves: std::sync::atomic::AtomicBool,
}

impl DocumentStore {
    /// Opens the store, creating an empty document (and its parent directories) if none exists.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::StorageInit`] if the directory or initial document cannot be
    /// created. Callers treat this as fatal at startup.
    pub fn open(path: impl Into<PathBuf>) -> PatientResult<Self> {
        let path = path.into();

        if let Some(parent) = non_empty_parent(&path) {
            fs::create_dir_all(parent).map_err(PatientError::StorageInit)?;
        }

        let store = Self {
            path,
            #[cfg(test)]
            reject_saves: std::sync::atomic::AtomicBool::new(false),
        };
        if !store.path.exists() {
            tracing::info!("creating empty patient document: {}", store.path.display());
            store
                .try_save(&PatientDocument::default())
                .map_err(|err| match err {
                    PatientError::FileWrite(io) => PatientError::StorageInit(io),
                    other => other,
                })?;
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document, replacing it with an empty one if it cannot be read or parsed.
    ///
    /// Never fails: if even the replacement cannot be written or re-read, an empty in-memory
    /// document is returned and the failure is logged.
    pub fn load(&self) -> PatientDocument {
        match self.read() {
            Ok(document) => document,
            Err(err) => {
                tracing::warn!(
                    "patient document unreadable, replacing with empty document: {} - {}",
                    self.path.display(),
                    err
                );

                if let Err(err) = self.try_save(&PatientDocument::default()) {
                    tracing::error!(
                        "failed to replace unreadable patient document: {} - {}",
                        self.path.display(),
                        err
                    );
                    return PatientDocument::default();
                }

                self.read().unwrap_or_else(|err| {
                    tracing::error!(
                        "patient document still unreadable after replacement: {} - {}",
                        self.path.display(),
                        err
                    );
                    PatientDocument::default()
                })
            }
        }
    }

    /// Saves the document, returning `false` if nothing was persisted.
    ///
    /// After a `false` return the in-memory document may hold changes the file does not;
    /// reload before trusting state.
    pub fn save(&self, document: &PatientDocument) -> bool {
        match self.try_save(document) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(
                    "failed to save patient document: {} - {}",
                    self.path.display(),
                    err
                );
                false
            }
        }
    }

    /// Saves the document, reporting the reason for failure.
    ///
    /// The rendered document is written to a temporary file in the same directory, synced,
    /// and renamed over the target path.
    pub fn try_save(&self, document: &PatientDocument) -> PatientResult<()> {
        #[cfg(test)]
        if self.reject_saves.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(PatientError::FileWrite(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "saves rejected",
            )));
        }

        let xml = document.render()?;
        let dir = non_empty_parent(&self.path).unwrap_or_else(|| Path::new("."));

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(PatientError::FileWrite)?;
        tmp.write_all(xml.as_bytes())
            .map_err(PatientError::FileWrite)?;
        tmp.as_file().sync_all().map_err(PatientError::FileWrite)?;

        if let Ok(metadata) = fs::metadata(&self.path) {
            // Keep the permissions of the document being replaced.
            if let Err(err) = fs::set_permissions(tmp.path(), metadata.permissions()) {
                tracing::debug!(
                    "could not copy permissions onto replacement document: {} - {}",
                    self.path.display(),
                    err
                );
            }
        }

        tmp.persist(&self.path)
            .map_err(|err| PatientError::FileWrite(err.error))?;

        Ok(())
    }

    /// Makes every later save fail with [`PatientError::FileWrite`] while reads keep working.
    #[cfg(test)]
    pub(crate) fn reject_saves(&self) {
        self.reject_saves
            .store(true, std::sync::atomic::Ordering::SeqCst);
    }

    fn read(&self) -> PatientResult<PatientDocument> {
        let xml = fs::read_to_string(&self.path).map_err(PatientError::FileRead)?;
        PatientDocument::parse(&xml)
    }
}

fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_record(id: &str, documento: &str) -> PatientRecord {
        PatientRecord {
            id: id.into(),
            nombre: "Ana".into(),
            apellido: "Diaz".into(),
            documento: documento.into(),
            edad: "30".into(),
            sexo: "F".into(),
            telefono: String::new(),
            direccion: "Calle 1 & 2".into(),
            fecha_registro: "2024-01-01".into(),
        }
    }

    #[test]
    fn test_open_creates_empty_document() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("nested").join("pacientes.xml");

        let store = DocumentStore::open(&path).expect("open should succeed");

        assert!(path.is_file(), "document should be created");
        let content = fs::read_to_string(&path).expect("should read document");
        assert!(content.starts_with(XML_DECLARATION));
        assert!(content.contains("<pacientes"));
        assert!(store.load().records.is_empty());
    }

    #[test]
    fn test_open_keeps_existing_document() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("pacientes.xml");

        let store = DocumentStore::open(&path).expect("open should succeed");
        let document = PatientDocument {
            records: vec![sample_record("1", "123")],
        };
        assert!(store.save(&document));

        let reopened = DocumentStore::open(&path).expect("reopen should succeed");
        assert_eq!(reopened.load(), document);
    }

    #[test]
    fn test_render_parse_preserves_records_and_order() {
        let document = PatientDocument {
            records: vec![sample_record("2", "b"), sample_record("1", "a")],
        };

        let xml = document.render().expect("render should succeed");
        assert!(xml.contains("<id>2</id>"));
        assert!(xml.contains("&amp;"), "special characters should be escaped");

        let parsed = PatientDocument::parse(&xml).expect("parse should succeed");
        assert_eq!(parsed, document);
    }

    #[test]
    fn test_render_is_indented() {
        let document = PatientDocument {
            records: vec![sample_record("1", "123")],
        };

        let xml = document.render().expect("render should succeed");
        assert!(xml.contains("\n  <paciente>"));
        assert!(xml.contains("\n    <nombre>Ana</nombre>"));
    }

    #[test]
    fn test_parse_defaults_missing_fields() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<pacientes>
  <paciente>
    <id>3</id>
    <nombre>Luis</nombre>
  </paciente>
</pacientes>
"#;

        let parsed = PatientDocument::parse(xml).expect("parse should succeed");
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].id, "3");
        assert_eq!(parsed.records[0].telefono, "");
        assert_eq!(parsed.records[0].fecha_registro, "");
    }

    #[test]
    fn test_parse_rejects_foreign_root() {
        let err = PatientDocument::parse("<html><body/></html>")
            .expect_err("foreign root should be rejected");
        assert!(matches!(err, PatientError::Deserialization(_)));
    }

    #[test]
    fn test_parse_rejects_empty_text() {
        assert!(PatientDocument::parse("").is_err());
    }

    #[test]
    fn test_load_heals_corrupt_document() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("pacientes.xml");
        let store = DocumentStore::open(&path).expect("open should succeed");

        fs::write(&path, "<pacientes><paciente>").expect("should write corrupt document");

        let document = store.load();
        assert!(document.records.is_empty());

        let healed = fs::read_to_string(&path).expect("should read healed document");
        let reparsed = PatientDocument::parse(&healed).expect("healed document should parse");
        assert!(reparsed.records.is_empty());
    }

    #[test]
    fn test_load_recreates_deleted_document() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("pacientes.xml");
        let store = DocumentStore::open(&path).expect("open should succeed");

        fs::remove_file(&path).expect("should remove document");

        assert!(store.load().records.is_empty());
        assert!(path.is_file(), "document should be recreated on access");
    }

    #[test]
    fn test_save_twice_is_byte_identical() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("pacientes.xml");
        let store = DocumentStore::open(&path).expect("open should succeed");
        let document = PatientDocument {
            records: vec![sample_record("1", "123"), sample_record("2", "456")],
        };

        assert!(store.save(&document));
        let first = fs::read(&path).expect("should read document");
        assert!(store.save(&store.load()));
        let second = fs::read(&path).expect("should read document");

        assert_eq!(first, second);
    }

    #[test]
    fn test_save_returns_false_when_directory_is_gone() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dir = temp_dir.path().join("data");
        let store = DocumentStore::open(dir.join("pacientes.xml")).expect("open should succeed");

        fs::remove_dir_all(&dir).expect("should remove data dir");

        assert!(!store.save(&PatientDocument::default()));
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_document_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("pacientes.xml");
        let store = DocumentStore::open(&path).expect("open should succeed");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640))
            .expect("should set permissions");

        assert!(store.save(&PatientDocument::default()));

        let mode = fs::metadata(&path).expect("should stat document").permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[test]
    fn test_rejected_save_leaves_reads_working() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("pacientes.xml");
        let store = DocumentStore::open(&path).expect("open should succeed");
        let document = PatientDocument {
            records: vec![sample_record("1", "123")],
        };
        assert!(store.save(&document));

        store.reject_saves();

        let err = store
            .try_save(&PatientDocument::default())
            .expect_err("save should be rejected");
        assert!(matches!(err, PatientError::FileWrite(_)));
        assert_eq!(store.load(), document);
    }
}
