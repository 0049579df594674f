//! Patient domain types and field decoding.
//!
//! Records are stored as text on disk. Decoding never fails: every field has an explicit
//! default (`0` for integers, empty string for text) so a partially-populated record still
//! produces a [`Patient`].

use crate::document::PatientRecord;
use crate::{PatientError, PatientResult};

/// Patient identifier assigned by the store.
pub type PatientId = i64;

/// A patient record as seen by callers.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub nombre: String,
    pub apellido: String,
    pub documento: String,
    pub edad: i64,
    pub sexo: String,
    pub telefono: String,
    pub direccion: String,
    pub fecha_registro: String,
}

/// Field values supplied by a caller for create and update.
///
/// `telefono` and `direccion` are optional at the boundary and default to empty strings.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PatientInput {
    pub nombre: String,
    pub apellido: String,
    pub documento: String,
    pub edad: i64,
    pub sexo: String,
    pub telefono: String,
    pub direccion: String,
    pub fecha_registro: String,
}

impl Patient {
    /// Builds a patient from caller input and a store-assigned id.
    pub fn from_input(id: PatientId, input: &PatientInput) -> Self {
        Self {
            id,
            nombre: input.nombre.clone(),
            apellido: input.apellido.clone(),
            documento: input.documento.clone(),
            edad: input.edad,
            sexo: input.sexo.clone(),
            telefono: input.telefono.clone(),
            direccion: input.direccion.clone(),
            fecha_registro: input.fecha_registro.clone(),
        }
    }
}

impl From<&PatientRecord> for Patient {
    fn from(record: &PatientRecord) -> Self {
        Self {
            id: decode_int(&record.id),
            nombre: record.nombre.clone(),
            apellido: record.apellido.clone(),
            documento: record.documento.clone(),
            edad: decode_int(&record.edad),
            sexo: record.sexo.clone(),
            telefono: record.telefono.clone(),
            direccion: record.direccion.clone(),
            fecha_registro: record.fecha_registro.clone(),
        }
    }
}

/// Natural key used for deletion.
///
/// Construction rejects blank keys, but the stored value is the caller's text verbatim:
/// matching against `documento` is exact and whitespace-sensitive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentKey(String);

impl DocumentKey {
    pub fn new(input: impl Into<String>) -> PatientResult<Self> {
        let key = input.into();
        if key.trim().is_empty() {
            return Err(PatientError::InvalidInput(
                "documento cannot be empty".into(),
            ));
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for DocumentKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Lenient integer decoding of stored text.
///
/// Leading whitespace is skipped, an optional sign is honoured and the longest run of ASCII
/// digits is read; anything unparseable decodes to `0`. Out-of-range values saturate.
pub fn decode_int(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    for digit in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value.saturating_mul(10).saturating_add(i64::from(digit - b'0'));
    }

    if negative {
        -value
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_int_reads_leading_digits() {
        assert_eq!(decode_int("42"), 42);
        assert_eq!(decode_int("  7 "), 7);
        assert_eq!(decode_int("-3"), -3);
        assert_eq!(decode_int("+15"), 15);
        assert_eq!(decode_int("12abc"), 12);
    }

    #[test]
    fn test_decode_int_defaults_to_zero() {
        assert_eq!(decode_int(""), 0);
        assert_eq!(decode_int("abc"), 0);
        assert_eq!(decode_int("-"), 0);
    }

    #[test]
    fn test_decode_int_saturates() {
        assert_eq!(decode_int("99999999999999999999999"), i64::MAX);
    }

    #[test]
    fn test_patient_from_partial_record_uses_defaults() {
        let record = PatientRecord {
            id: "5".into(),
            nombre: "Ana".into(),
            ..PatientRecord::default()
        };

        let patient = Patient::from(&record);
        assert_eq!(patient.id, 5);
        assert_eq!(patient.nombre, "Ana");
        assert_eq!(patient.edad, 0);
        assert_eq!(patient.telefono, "");
        assert_eq!(patient.fecha_registro, "");
    }

    #[test]
    fn test_document_key_rejects_blank_but_keeps_whitespace() {
        assert!(DocumentKey::new("").is_err());
        assert!(DocumentKey::new("  \t").is_err());

        let key = DocumentKey::new(" 123 ").expect("non-blank key should be accepted");
        assert_eq!(key.as_str(), " 123 ");
    }
}
