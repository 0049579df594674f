//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour in multi-threaded runtimes
//! and test harnesses.

use crate::constants::{DEFAULT_DOCUMENT_FILENAME, DOCUMENT_EXTENSION};
use crate::{PatientError, PatientResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    patient_data_dir: PathBuf,
    document_filename: String,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The document filename must be a bare `.xml` filename; directory components are rejected
    /// so the document always lives directly under `patient_data_dir`.
    pub fn new(
        patient_data_dir: PathBuf,
        document_filename: impl Into<String>,
    ) -> PatientResult<Self> {
        let document_filename = document_filename.into();
        validate_document_filename(&document_filename)?;

        Ok(Self {
            patient_data_dir,
            document_filename,
        })
    }

    pub fn patient_data_dir(&self) -> &Path {
        &self.patient_data_dir
    }

    pub fn document_filename(&self) -> &str {
        &self.document_filename
    }

    /// Full path of the patient document.
    pub fn document_path(&self) -> PathBuf {
        self.patient_data_dir.join(&self.document_filename)
    }
}

/// Parse the document filename from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default filename.
pub fn document_filename_from_env_value(value: Option<String>) -> PatientResult<String> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        Some(name) => {
            validate_document_filename(&name)?;
            Ok(name)
        }
        None => Ok(DEFAULT_DOCUMENT_FILENAME.to_string()),
    }
}

fn validate_document_filename(name: &str) -> PatientResult<()> {
    if name.trim().is_empty() {
        return Err(PatientError::InvalidInput(
            "document filename cannot be empty".into(),
        ));
    }

    if name.contains('/') || name.contains('\\') || name == ".." || name == "." {
        return Err(PatientError::InvalidInput(
            "document filename must not contain directory components".into(),
        ));
    }

    let has_xml_extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(DOCUMENT_EXTENSION));

    if !has_xml_extension {
        return Err(PatientError::InvalidInput(format!(
            "document filename must end in .{DOCUMENT_EXTENSION}"
        )));
    }

    Ok(())
}
