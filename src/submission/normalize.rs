use chrono::Utc;
use rand::Rng;

/// Drop every character that is not an ASCII decimal digit.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Trim surrounding whitespace only; case is preserved.
pub fn clean_name(value: &str) -> String {
    value.trim().to_string()
}

/// Base-36 millisecond timestamp followed by a random base-36 suffix.
///
/// Uniqueness is advisory: two ids generated in the same millisecond only
/// differ by the random part.
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let suffix: u64 = rand::rng().random_range(0..36u64.pow(8));
    format!("{}{:0>8}", to_base36(millis), to_base36(suffix))
}

pub fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
