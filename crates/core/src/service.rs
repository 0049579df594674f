//! Remote-procedure facade over the repository.
//!
//! `PatientService` is what transports call. It accepts loosely-shaped parameters, normalises
//! them through [`crate::params`], and collapses every failure to the signals remote callers
//! expect: `None`, `0` or `false`. The reason is logged, not returned. Callers that need the
//! reason use [`PatientService::repository`] directly.

use crate::params;
use crate::patient::{Patient, PatientId};
use crate::repository::PatientRepository;
use crate::{CoreConfig, PatientResult};
use serde_json::Value;

/// Pure patient data operations - no API concerns
#[derive(Clone, Debug)]
pub struct PatientService {
    repository: PatientRepository,
}

impl PatientService {
    /// Creates the service, opening (or creating) the document named by `cfg`.
    pub fn new(cfg: &CoreConfig) -> PatientResult<Self> {
        Ok(Self {
            repository: PatientRepository::new(cfg)?,
        })
    }

    pub fn with_repository(repository: PatientRepository) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &PatientRepository {
        &self.repository
    }

    pub fn get_patients(&self) -> Vec<Patient> {
        self.repository.list()
    }

    /// Looks up a patient by an id given as a scalar or a mapping with `id`.
    pub fn get_patient(&self, param: &Value) -> Option<Patient> {
        let id = match params::patient_id(param) {
            Ok(id) => id,
            Err(e) => {
                tracing::debug!("get_patient rejected parameter: {}", e);
                return None;
            }
        };

        match self.repository.get(id) {
            Ok(patient) => Some(patient),
            Err(e) => {
                tracing::debug!("get_patient: {}", e);
                None
            }
        }
    }

    /// Creates a patient, returning its id or `0` on failure.
    pub fn create_patient(&self, param: &Value) -> PatientId {
        let result =
            params::patient_input(param).and_then(|input| self.repository.create(&input));

        match result {
            Ok(id) => id,
            Err(e) => {
                tracing::error!("Create patient error: {}", e);
                0
            }
        }
    }

    /// Overwrites a patient; `false` if the input was unusable, no record matched, or the
    /// save failed.
    pub fn update_patient(&self, param: &Value) -> bool {
        let result = params::patient_update(param)
            .and_then(|(id, input)| self.repository.update(id, &input));

        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Update patient error: {}", e);
                false
            }
        }
    }

    /// Deletes the first patient whose `documento` matches the key exactly.
    pub fn delete_patient(&self, param: &Value) -> bool {
        tracing::debug!("delete_patient params: {}", param);

        let result = params::document_key(param).and_then(|key| self.repository.delete(&key));

        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Delete patient error: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn test_service(dir: &std::path::Path) -> PatientService {
        let cfg = CoreConfig::new(dir.to_path_buf(), "pacientes.xml")
            .expect("CoreConfig::new should succeed");
        PatientService::new(&cfg).expect("PatientService::new should succeed")
    }

    fn ana() -> Value {
        json!({
            "nombre": "Ana",
            "apellido": "Diaz",
            "documento": "123",
            "edad": 30,
            "sexo": "F",
            "fecha_registro": "2024-01-01"
        })
    }

    fn bruno() -> Value {
        json!({
            "nombre": "Bruno",
            "apellido": "Rojas",
            "documento": "456",
            "edad": 30,
            "sexo": "M",
            "telefono": "555-0101",
            "direccion": "Av. Central 10",
            "fecha_registro": "2024-01-02"
        })
    }

    #[test]
    fn test_end_to_end_scenario() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = test_service(temp_dir.path());

        assert_eq!(service.create_patient(&ana()), 1);
        assert_eq!(service.create_patient(&bruno()), 2);

        assert!(service.delete_patient(&json!({ "documento": "123" })));
        let remaining = service.get_patients();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, 2);
        assert_eq!(remaining[0].nombre, "Bruno");

        let before = service.get_patient(&json!(2)).expect("patient 2 should exist");
        let mut changed = bruno();
        changed["id"] = json!(2);
        changed["edad"] = json!(31);
        assert!(service.update_patient(&changed));

        let after = service
            .get_patient(&json!({ "id": 2 }))
            .expect("patient 2 should exist");
        assert_eq!(after.edad, 31);
        assert_eq!(Patient { edad: 30, ..after }, before);
    }

    #[test]
    fn test_get_patient_tolerates_shapes_and_misses() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = test_service(temp_dir.path());
        service.create_patient(&ana());

        assert!(service.get_patient(&json!(1)).is_some());
        assert!(service.get_patient(&json!("1")).is_some());
        assert!(service.get_patient(&json!({ "id": "1" })).is_some());
        assert!(service.get_patient(&json!(2)).is_none());
        assert!(service.get_patient(&json!(["1"])).is_none());
    }

    #[test]
    fn test_create_patient_returns_zero_on_bad_input() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = test_service(temp_dir.path());

        let mut incomplete = ana();
        incomplete.as_object_mut().unwrap().remove("documento");

        assert_eq!(service.create_patient(&incomplete), 0);
        assert_eq!(service.create_patient(&json!("Ana")), 0);
        assert!(service.get_patients().is_empty());
    }

    #[test]
    fn test_update_patient_on_missing_id_is_false_and_unchanged() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = test_service(temp_dir.path());
        service.create_patient(&ana());
        let path = service.repository().store().path().to_path_buf();
        let before = fs::read(&path).expect("should read document");

        let mut ghost = ana();
        ghost["id"] = json!(77);
        assert!(!service.update_patient(&ghost));

        assert_eq!(before, fs::read(&path).expect("should read document"));
    }

    #[test]
    fn test_delete_patient_with_blank_key_does_not_touch_document() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = test_service(temp_dir.path());
        service.create_patient(&ana());
        let path = service.repository().store().path().to_path_buf();
        let before = fs::read(&path).expect("should read document");
        let modified = fs::metadata(&path).and_then(|m| m.modified()).ok();

        assert!(!service.delete_patient(&json!("")));
        assert!(!service.delete_patient(&json!("   ")));
        assert!(!service.delete_patient(&json!({ "documento": " " })));

        assert_eq!(before, fs::read(&path).expect("should read document"));
        assert_eq!(modified, fs::metadata(&path).and_then(|m| m.modified()).ok());
        assert_eq!(service.get_patients().len(), 1);
    }

    #[test]
    fn test_delete_patient_unknown_key_is_false() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = test_service(temp_dir.path());
        service.create_patient(&ana());

        assert!(!service.delete_patient(&json!("999")));
        assert!(service.delete_patient(&json!("123")));
        assert!(!service.delete_patient(&json!("123")));
    }

    #[test]
    fn test_mutations_are_false_or_zero_when_save_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = test_service(temp_dir.path());
        assert_eq!(service.create_patient(&ana()), 1);

        service.repository().store().reject_saves();

        let mut changed = ana();
        changed["id"] = json!(1);
        changed["edad"] = json!(31);
        assert!(!service.update_patient(&changed));
        assert!(!service.delete_patient(&json!("123")));
        assert_eq!(service.create_patient(&bruno()), 0);

        let remaining = service.get_patients();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].edad, 30);
    }

    #[test]
    fn test_create_patient_is_zero_when_ids_are_exhausted() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = test_service(temp_dir.path());

        assert_eq!(service.create_patient(&ana()), 1);
        let path = service.repository().store().path().to_path_buf();
        let xml = fs::read_to_string(&path).expect("should read document");
        fs::write(&path, xml.replace("<id>1</id>", &format!("<id>{}</id>", i64::MAX)))
            .expect("should write document");

        assert_eq!(service.create_patient(&bruno()), 0);
        assert_eq!(service.get_patients().len(), 1);
    }

    #[test]
    fn test_get_patients_on_corrupt_document_is_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = test_service(temp_dir.path());
        service.create_patient(&ana());

        let path = service.repository().store().path().to_path_buf();
        fs::write(&path, "\u{0}\u{1}garbage").expect("should corrupt document");

        assert!(service.get_patients().is_empty());
        let healed = fs::read_to_string(&path).expect("should read document");
        assert!(crate::PatientDocument::parse(&healed).is_ok());
    }
}
