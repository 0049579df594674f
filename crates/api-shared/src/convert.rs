//! Conversions between protobuf messages and core types.
//!
//! Requests are turned into the loose `serde_json::Value` parameters accepted by
//! [`pacientes_core::PatientService`], so gRPC and REST share one normalisation path.

use crate::pb;
use pacientes_core::Patient;
use serde_json::{json, Map, Value};

impl From<Patient> for pb::Patient {
    fn from(p: Patient) -> Self {
        Self {
            id: p.id,
            nombre: p.nombre,
            apellido: p.apellido,
            documento: p.documento,
            edad: p.edad,
            sexo: p.sexo,
            telefono: p.telefono,
            direccion: p.direccion,
            fecha_registro: p.fecha_registro,
        }
    }
}

/// Parameter for a get-by-id call; a missing `oneof` becomes `null` and is rejected by core.
pub fn get_patient_param(req: pb::GetPatientReq) -> Value {
    match req.param {
        Some(pb::get_patient_req::Param::Id(id)) => json!(id),
        Some(pb::get_patient_req::Param::Raw(raw)) => Value::String(raw),
        Some(pb::get_patient_req::Param::Key(key)) => key_param(key),
        None => Value::Null,
    }
}

/// Parameter for a delete-by-documento call.
pub fn delete_patient_param(req: pb::DeletePatientReq) -> Value {
    match req.param {
        Some(pb::delete_patient_req::Param::Documento(documento)) => Value::String(documento),
        Some(pb::delete_patient_req::Param::Key(key)) => key_param(key),
        None => Value::Null,
    }
}

pub fn create_patient_param(req: pb::CreatePatientReq) -> Value {
    json!({
        "nombre": req.nombre,
        "apellido": req.apellido,
        "documento": req.documento,
        "edad": req.edad,
        "sexo": req.sexo,
        "telefono": req.telefono,
        "direccion": req.direccion,
        "fecha_registro": req.fecha_registro,
    })
}

pub fn update_patient_param(req: pb::UpdatePatientReq) -> Value {
    json!({
        "id": req.id,
        "nombre": req.nombre,
        "apellido": req.apellido,
        "documento": req.documento,
        "edad": req.edad,
        "sexo": req.sexo,
        "telefono": req.telefono,
        "direccion": req.direccion,
        "fecha_registro": req.fecha_registro,
    })
}

fn key_param(key: pb::PatientKey) -> Value {
    let mut map = Map::new();
    if let Some(id) = key.id {
        map.insert("id".into(), json!(id));
    }
    if let Some(documento) = key.documento {
        map.insert("documento".into(), Value::String(documento));
    }
    Value::Object(map)
}
