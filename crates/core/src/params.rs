//! Normalisation of loosely-shaped remote-procedure parameters.
//!
//! Transports deliver identifiers in several shapes: a bare scalar, a scalar encoded as text,
//! or a mapping carrying the key. Every shape is reduced here to a typed value (or an
//! [`PatientError::InvalidInput`]) before it reaches the repository, which only ever sees
//! [`PatientId`], [`DocumentKey`] and [`PatientInput`].

use crate::patient::{decode_int, DocumentKey, PatientId, PatientInput};
use crate::{PatientError, PatientResult};
use serde_json::{Map, Value};

/// Extract a patient id from an integer, a numeric string, or a mapping with an `id` key.
pub fn patient_id(value: &Value) -> PatientResult<PatientId> {
    match value {
        Value::Object(map) => match map.get("id") {
            Some(id) if !id.is_null() => coerce_int(id, "id"),
            _ => Err(PatientError::InvalidInput("missing id".into())),
        },
        Value::Number(_) => coerce_int(value, "id"),
        Value::String(text) if is_numeric(text) => coerce_int(value, "id"),
        _ => Err(PatientError::InvalidInput(format!(
            "unrecognised id parameter: {value}"
        ))),
    }
}

/// Extract a deletion key from a string, a number, or a mapping with a `documento` key.
///
/// Blank keys are rejected; the key is otherwise kept exactly as given.
pub fn document_key(value: &Value) -> PatientResult<DocumentKey> {
    let key = match value {
        Value::Object(map) => match map.get("documento") {
            Some(documento) if !documento.is_null() => coerce_text(documento, "documento")?,
            _ => return Err(PatientError::InvalidInput("missing documento".into())),
        },
        Value::Array(_) => {
            return Err(PatientError::InvalidInput(
                "documento cannot be a list".into(),
            ))
        }
        other => coerce_text(other, "documento")?,
    };

    DocumentKey::new(key)
}

/// Extract the fields for a new patient.
///
/// `nombre`, `apellido`, `documento`, `edad`, `sexo` and `fecha_registro` are required;
/// `telefono` and `direccion` default to empty strings.
pub fn patient_input(value: &Value) -> PatientResult<PatientInput> {
    let map = as_mapping(value)?;

    Ok(PatientInput {
        nombre: required_text(map, "nombre")?,
        apellido: required_text(map, "apellido")?,
        documento: required_text(map, "documento")?,
        edad: coerce_int(required(map, "edad")?, "edad")?,
        sexo: required_text(map, "sexo")?,
        telefono: optional_text(map, "telefono")?,
        direccion: optional_text(map, "direccion")?,
        fecha_registro: required_text(map, "fecha_registro")?,
    })
}

/// Extract the id and replacement fields for an update.
pub fn patient_update(value: &Value) -> PatientResult<(PatientId, PatientInput)> {
    let map = as_mapping(value)?;
    let id = coerce_int(required(map, "id")?, "id")?;
    Ok((id, patient_input(value)?))
}

fn as_mapping(value: &Value) -> PatientResult<&Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| PatientError::InvalidInput("expected a mapping of patient fields".into()))
}

fn required<'a>(map: &'a Map<String, Value>, field: &str) -> PatientResult<&'a Value> {
    match map.get(field) {
        Some(value) if !value.is_null() => Ok(value),
        _ => Err(PatientError::InvalidInput(format!("missing {field}"))),
    }
}

fn required_text(map: &Map<String, Value>, field: &str) -> PatientResult<String> {
    coerce_text(required(map, field)?, field)
}

fn optional_text(map: &Map<String, Value>, field: &str) -> PatientResult<String> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(value) => coerce_text(value, field),
    }
}

/// Scalar-to-text coercion. Lists and mappings are rejected.
fn coerce_text(value: &Value, field: &str) -> PatientResult<String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(true) => Ok("1".into()),
        Value::Bool(false) | Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(PatientError::InvalidInput(format!(
            "{field} must be a scalar"
        ))),
    }
}

/// Scalar-to-integer coercion. Floats truncate, numeric text is read as a number, and other
/// text is decoded leniently.
fn coerce_int(value: &Value, field: &str) -> PatientResult<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|f| f.trunc() as i64))
            .ok_or_else(|| PatientError::InvalidInput(format!("{field} is out of range"))),
        Value::String(text) => Ok(numeric_text(text).unwrap_or_else(|| decode_int(text))),
        Value::Bool(flag) => Ok(i64::from(*flag)),
        Value::Null => Ok(0),
        Value::Array(_) | Value::Object(_) => Err(PatientError::InvalidInput(format!(
            "{field} must be a scalar"
        ))),
    }
}

/// Whether `text` reads as a decimal number (surrounding whitespace allowed).
fn is_numeric(text: &str) -> bool {
    numeric_text(text).is_some()
}

/// Integer value of numeric text, with floats and exponents truncated toward zero.
fn numeric_text(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(int);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(|f| f.trunc() as i64)
}
