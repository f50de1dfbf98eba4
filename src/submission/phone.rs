use std::ops::RangeInclusive;

use crate::error::AppError;

use super::normalize::digits_only;

/// Phone-number acceptance rule, chosen per endpoint.
///
/// Both rules store the national form produced by [`normalize`]; they differ
/// in which string the length bound is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneRule {
    /// 10 to 13 digits as entered, country prefix included.
    Digits,
    /// 10 to 12 digits once the country prefix is gone.
    CountryStripped,
}

impl PhoneRule {
    pub fn length(self) -> RangeInclusive<usize> {
        match self {
            PhoneRule::Digits => 10..=13,
            PhoneRule::CountryStripped => 10..=12,
        }
    }

    /// Check `raw` against the rule and return its national form.
    pub fn apply(self, raw: &str) -> Result<String, AppError> {
        let national = normalize(raw);
        let checked_len = match self {
            PhoneRule::Digits => digits_only(raw).len(),
            PhoneRule::CountryStripped => national.len(),
        };

        let range = self.length();
        if !range.contains(&checked_len) {
            return Err(AppError::Validation(format!(
                "Phone number must be {}-{} digits",
                range.start(),
                range.end()
            )));
        }

        Ok(national)
    }
}

/// Digits only, with every leading trunk `0` and `62` country code removed.
/// The message renderer adds `+62` back.
pub fn normalize(raw: &str) -> String {
    let digits = digits_only(raw);
    let mut national = digits.as_str();
    loop {
        let next = strip_country_prefix(national);
        if next.len() == national.len() {
            break;
        }
        national = next;
    }
    national.to_string()
}

/// Remove a single leading `0`, or failing that a leading `62`.
pub fn strip_country_prefix(digits: &str) -> &str {
    digits
        .strip_prefix('0')
        .or_else(|| digits.strip_prefix("62"))
        .unwrap_or(digits)
}
