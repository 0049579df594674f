//! Constants used throughout the pacientes core crate.
//!
//! This module contains the path, filename and element-name constants so the on-disk
//! layout is defined in exactly one place.

/// Default directory for patient data storage when no explicit directory is configured.
pub const DEFAULT_PATIENT_DATA_DIR: &str = "patient_data";

/// Default filename of the patient document inside the data directory.
pub const DEFAULT_DOCUMENT_FILENAME: &str = "pacientes.xml";

/// Extension every document filename must carry.
pub const DOCUMENT_EXTENSION: &str = "xml";

/// Root collection element of the patient document.
pub const ROOT_ELEMENT: &str = "pacientes";

/// Element wrapping a single patient record.
pub const RECORD_ELEMENT: &str = "paciente";

/// XML declaration written at the top of every saved document.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Number of spaces used per nesting level when rendering the document.
pub const INDENT_WIDTH: usize = 2;
