//! # Pacientes Core
//!
//! Core business logic for the pacientes record store.
//!
//! This crate contains pure data operations over a single XML document:
//! - Loading, self-healing and atomically saving the document (`document`)
//! - Id assignment and linear-scan CRUD (`repository`)
//! - Normalisation of loosely-shaped remote parameters (`params`)
//! - A facade returning wire-compatible `None` / `0` / `false` signals (`service`)
//!
//! **No API concerns**: Authentication, HTTP/gRPC servers, or service interfaces belong in
//! `api-grpc`, `api-rest`, or `api-shared`.

pub mod config;
pub mod constants;
pub mod document;
pub mod error;
pub mod params;
pub mod patient;
pub mod repository;
pub mod service;

pub use config::CoreConfig;
pub use constants::DEFAULT_PATIENT_DATA_DIR;
pub use document::{DocumentStore, PatientDocument, PatientRecord};
pub use error::{PatientError, PatientResult};
pub use patient::{DocumentKey, Patient, PatientId, PatientInput};
pub use repository::PatientRepository;
pub use service::PatientService;
