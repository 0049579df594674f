//! Startup configuration read from the process environment.
//!
//! Binaries call these once before serving; request handlers never read the environment.

use pacientes_core::config::document_filename_from_env_value;
use pacientes_core::{CoreConfig, PatientResult, DEFAULT_PATIENT_DATA_DIR};
use std::path::PathBuf;

/// Builds the core configuration from `PATIENT_DATA_DIR` and `PACIENTES_DOCUMENT`.
pub fn core_config_from_env() -> PatientResult<CoreConfig> {
    core_config_from_values(
        std::env::var("PATIENT_DATA_DIR").ok(),
        std::env::var("PACIENTES_DOCUMENT").ok(),
    )
}

pub fn core_config_from_values(
    data_dir: Option<String>,
    document: Option<String>,
) -> PatientResult<CoreConfig> {
    let data_dir = data_dir
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PATIENT_DATA_DIR.into());

    CoreConfig::new(
        PathBuf::from(data_dir),
        document_filename_from_env_value(document)?,
    )
}

/// Whether gRPC server reflection was switched on with `PACIENTES_ENABLE_REFLECTION=true`.
pub fn reflection_enabled() -> bool {
    std::env::var("PACIENTES_ENABLE_REFLECTION").is_ok_and(|v| v == "true")
}
