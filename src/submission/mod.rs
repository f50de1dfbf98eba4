pub mod fields;
pub mod metadata;
pub mod normalize;
pub mod parser;
pub mod phone;
pub mod pipeline;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use fields::{Field, RawFields};
use phone::PhoneRule;

/// A validated, normalized form submission. Only built through
/// [`Submission::from_raw`], so every instance has passed field and phone checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub tarif: String,
    pub nama: String,
    pub nohp: String,
    pub saldo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sixpin: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

/// Only `"baru"` is special; every other value displays as the existing plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tarif {
    Baru,
    Lama,
}

impl Tarif {
    pub fn from_value(value: &str) -> Self {
        if value == "baru" { Tarif::Baru } else { Tarif::Lama }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tarif::Baru => "Tarif baru",
            Tarif::Lama => "Tarif lama",
        }
    }
}

impl Submission {
    /// Validate then normalize a raw field set.
    ///
    /// `required` lists the fields that must be present and truthy; the phone
    /// number is checked against `rule` after digit stripping.
    pub fn from_raw(
        raw: &RawFields,
        required: &[Field],
        rule: PhoneRule,
        ip: Option<String>,
    ) -> Result<Self, AppError> {
        let values = raw.require(required)?;
        let nohp = rule.apply(values.get(Field::Nohp))?;

        Ok(Submission {
            id: normalize::generate_id(),
            tarif: values.get(Field::Tarif).to_string(),
            nama: normalize::clean_name(values.get(Field::Nama)),
            nohp,
            saldo: normalize::digits_only(values.get(Field::Saldo)),
            sixpin: values.find(Field::Sixpin).map(str::to_string),
            timestamp: Utc::now(),
            ip,
        })
    }

    pub fn tarif(&self) -> Tarif {
        Tarif::from_value(&self.tarif)
    }
}
