//! Patient repository.
//!
//! CRUD over the patient document with linear scans and no secondary index. Every mutating
//! operation is a full load-modify-save cycle:
//!
//! ```text
//! Idle -> Loaded -> (Matched | NotMatched) -> (Saved | SaveFailed | Noop)
//! ```
//!
//! Nothing is persisted before the final save, so a failure at any step leaves the file as it
//! was.
//!
//! ## Id policy
//!
//! New ids are `max(existing ids) + 1`, or `1` for an empty collection. No counter is stored,
//! so removing the record holding the highest id frees that id for the next create.
//!
//! ## Concurrency
//!
//! Mutations are serialised by a mutex shared between clones of the repository. Writers in
//! other processes using the same file are not coordinated: whichever saves last wins.

use crate::config::CoreConfig;
use crate::document::{DocumentStore, PatientDocument, PatientRecord};
use crate::patient::{decode_int, DocumentKey, Patient, PatientId, PatientInput};
use crate::{PatientError, PatientResult};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct PatientRepository {
    store: Arc<DocumentStore>,
    write_guard: Arc<Mutex<()>>,
}

impl PatientRepository {
    /// Opens the repository over the document named by `cfg`, creating it if absent.
    pub fn new(cfg: &CoreConfig) -> PatientResult<Self> {
        Ok(Self::with_store(DocumentStore::open(cfg.document_path())?))
    }

    pub fn with_store(store: DocumentStore) -> Self {
        Self {
            store: Arc::new(store),
            write_guard: Arc::new(Mutex::new(())),
        }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Snapshot of every patient in document order.
    pub fn list(&self) -> Vec<Patient> {
        self.store.load().records.iter().map(Patient::from).collect()
    }

    /// Returns the first patient whose id equals `id`.
    pub fn get(&self, id: PatientId) -> PatientResult<Patient> {
        self.store
            .load()
            .records
            .iter()
            .map(Patient::from)
            .find(|patient| patient.id == id)
            .ok_or_else(|| PatientError::NotFound(format!("patient with id {id}")))
    }

    /// Appends a new patient and returns its id.
    pub fn create(&self, input: &PatientInput) -> PatientResult<PatientId> {
        let _guard = self.write_guard.lock();

        let mut document = self.store.load();
        let id = next_id(&document)?;
        document
            .records
            .push(to_record(&Patient::from_input(id, input)));

        self.store.try_save(&document)?;
        tracing::info!("created patient {}", id);
        Ok(id)
    }

    /// Overwrites every field of the patient with `id`; the id itself is kept.
    pub fn update(&self, id: PatientId, input: &PatientInput) -> PatientResult<()> {
        let _guard = self.write_guard.lock();

        let mut document = self.store.load();
        let record = document
            .records
            .iter_mut()
            .find(|record| decode_int(&record.id) == id)
            .ok_or_else(|| PatientError::NotFound(format!("patient with id {id}")))?;

        *record = to_record(&Patient::from_input(id, input));

        self.store.try_save(&document)?;
        tracing::info!("updated patient {}", id);
        Ok(())
    }

    /// Removes the first patient whose `documento` equals `key` exactly.
    pub fn delete(&self, key: &DocumentKey) -> PatientResult<()> {
        let _guard = self.write_guard.lock();

        let mut document = self.store.load();
        let position = document
            .records
            .iter()
            .position(|record| record.documento == key.as_str())
            .ok_or_else(|| PatientError::NotFound(format!("patient with documento {key}")))?;

        let removed = document.records.remove(position);

        self.store.try_save(&document)?;
        tracing::info!("deleted patient {} (documento {})", removed.id, key);
        Ok(())
    }
}

fn next_id(document: &PatientDocument) -> PatientResult<PatientId> {
    let max = document
        .records
        .iter()
        .map(|record| decode_int(&record.id))
        .max();

    match max {
        None => Ok(1),
        Some(max) => max
            .max(0)
            .checked_add(1)
            .ok_or_else(|| PatientError::InvalidInput(format!("no id available after {max}"))),
    }
}

fn to_record(patient: &Patient) -> PatientRecord {
    PatientRecord {
        id: patient.id.to_string(),
        nombre: patient.nombre.clone(),
        apellido: patient.apellido.clone(),
        documento: patient.documento.clone(),
        edad: patient.edad.to_string(),
        sexo: patient.sexo.clone(),
        telefono: patient.telefono.clone(),
        direccion: patient.direccion.clone(),
        fecha_registro: patient.fecha_registro.clone(),
    }
}
