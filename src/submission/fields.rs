use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Tarif,
    Nama,
    Nohp,
    Saldo,
    Sixpin,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Tarif => "tarif",
            Field::Nama => "nama",
            Field::Nohp => "nohp",
            Field::Saldo => "saldo",
            Field::Sixpin => "sixpin",
        }
    }
}

/// Fields every submission endpoint requires.
pub const BASE_FIELDS: &[Field] = &[Field::Tarif, Field::Nohp, Field::Nama, Field::Saldo];

/// Base fields plus the one-time code.
pub const CODE_FIELDS: &[Field] = &[
    Field::Tarif,
    Field::Nama,
    Field::Nohp,
    Field::Saldo,
    Field::Sixpin,
];

/// Untyped request fields as decoded from the body.
#[derive(Debug, Clone, Default)]
pub struct RawFields(Map<String, Value>);

impl RawFields {
    /// Non-object bodies carry no fields and fail the required check later.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => RawFields(map),
            _ => RawFields::default(),
        }
    }

    /// Text of a field, or `None` when it is absent or falsy
    /// (`null`, `""`, `false`, `0`, or a non-scalar).
    pub fn text(&self, field: Field) -> Option<String> {
        match self.0.get(field.name())? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            Value::Bool(true) => Some("true".to_string()),
            _ => None,
        }
    }

    /// Collect `required` fields, failing with every missing name at once.
    pub fn require(&self, required: &[Field]) -> Result<FieldValues, AppError> {
        let mut values = BTreeMap::new();
        let mut missing = Vec::new();

        for &field in required {
            match self.text(field) {
                Some(text) => {
                    values.insert(field, text);
                }
                None => missing.push(field.name()),
            }
        }

        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "All fields are required: {}",
                missing.join(", ")
            )));
        }

        Ok(FieldValues(values))
    }
}

#[derive(Debug, Clone)]
pub struct FieldValues(BTreeMap<Field, String>);

impl FieldValues {
    pub fn get(&self, field: Field) -> &str {
        self.find(field).unwrap_or_default()
    }

    pub fn find(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }
}
