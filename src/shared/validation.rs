use email_address::EmailAddress;

/// Trims `value` and rejects it when nothing is left.
pub fn required_text(field: &str, value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(trimmed.to_string())
}

/// Validates and lower-cases an e-mail address.
pub fn normalize_email(value: &str) -> Result<String, String> {
    let email = required_text("email", value)?.to_lowercase();
    if !EmailAddress::is_valid(&email) {
        return Err("email is not a valid address".to_string());
    }
    Ok(email)
}

/// Phone numbers are stored as integers; accepts digits only.
pub fn parse_phone(value: &str) -> Result<i64, String> {
    let digits = required_text("phone", value)?;
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err("phone must contain digits only".to_string());
    }
    digits
        .parse::<i64>()
        .map_err(|_| "phone is too long".to_string())
}
