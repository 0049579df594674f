//! Caller-side checks applied before a request leaves the CLI.
//!
//! The server accepts anything it can store; these rules keep obviously broken records out.

use crate::error::{ClientError, ClientResult};
use api_shared::pb;
use chrono::NaiveDate;

pub const MAX_EDAD: i64 = 150;
pub const SEXOS: [&str; 3] = ["M", "F", "O"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Patient fields as typed by the user.
#[derive(Clone, Debug, Default)]
pub struct PatientFields {
    pub nombre: String,
    pub apellido: String,
    pub documento: String,
    pub edad: i64,
    pub sexo: String,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    pub fecha_registro: Option<String>,
}

/// Checked and trimmed fields, ready for a create or an update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidPatient {
    pub nombre: String,
    pub apellido: String,
    pub documento: String,
    pub edad: i64,
    pub sexo: String,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    pub fecha_registro: String,
}

impl ValidPatient {
    pub fn into_create(self) -> pb::CreatePatientReq {
        pb::CreatePatientReq {
            nombre: self.nombre,
            apellido: self.apellido,
            documento: self.documento,
            edad: self.edad,
            sexo: self.sexo,
            telefono: self.telefono,
            direccion: self.direccion,
            fecha_registro: self.fecha_registro,
        }
    }

    pub fn into_update(self, id: i64) -> pb::UpdatePatientReq {
        pb::UpdatePatientReq {
            id,
            nombre: self.nombre,
            apellido: self.apellido,
            documento: self.documento,
            edad: self.edad,
            sexo: self.sexo,
            telefono: self.telefono,
            direccion: self.direccion,
            fecha_registro: self.fecha_registro,
        }
    }
}

/// Validate `fields`, using `default_fecha` when no registration date was given.
///
/// A supplied registration date must be `YYYY-MM-DD`; the default is taken as-is.
pub fn validate_patient(fields: PatientFields, default_fecha: &str) -> ClientResult<ValidPatient> {
    let nombre = required(&fields.nombre, "nombre")?;
    let apellido = required(&fields.apellido, "apellido")?;
    let documento = required(&fields.documento, "documento")?;

    if !(0..=MAX_EDAD).contains(&fields.edad) {
        return Err(ClientError::Validation(format!(
            "edad must be between 0 and {MAX_EDAD}"
        )));
    }

    let sexo = fields.sexo.trim().to_string();
    if !SEXOS.contains(&sexo.as_str()) {
        return Err(ClientError::Validation(format!(
            "sexo must be one of {}",
            SEXOS.join(", ")
        )));
    }

    let fecha_registro = match trimmed(fields.fecha_registro) {
        Some(fecha) => {
            NaiveDate::parse_from_str(&fecha, DATE_FORMAT).map_err(|_| {
                ClientError::Validation(format!("fecha_registro must be YYYY-MM-DD, got {fecha}"))
            })?;
            fecha
        }
        None => default_fecha.to_string(),
    };

    Ok(ValidPatient {
        nombre,
        apellido,
        documento,
        edad: fields.edad,
        sexo,
        telefono: fields.telefono.map(|t| t.trim().to_string()),
        direccion: fields.direccion.map(|d| d.trim().to_string()),
        fecha_registro,
    })
}

/// Trim a deletion key; blank keys never reach the server.
pub fn validate_documento(documento: &str) -> ClientResult<String> {
    required(documento, "documento")
}

pub fn today(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn required(value: &str, field: &str) -> ClientResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ClientError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
