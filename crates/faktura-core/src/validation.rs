//! Field-level validation rules.
//!
//! Each rule is a pure predicate over primitive input: it either returns
//! `Ok(())` or fails with [`FakturaError::Validation`] carrying the field
//! name, a human-readable message, and a machine code. Rules never touch
//! persistence and never mutate their input; failures propagate unmodified
//! to the calling service.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::{FakturaError, FakturaResult};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$",
    )
    .expect("email pattern")
});

static ORG_NUM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{6}-\d{4}$").expect("org num pattern"));

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s\-()]{7,20}$").expect("phone pattern"));

static INVOICE_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^INV-\d{4}-\d{4}$").expect("invoice number pattern"));

static PERSON_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s\-']+$").expect("person name pattern"));

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Generic presence check, applied before any domain-specific rule.
/// The failure code is derived from the field name (`email` ->
/// `EMAIL_REQUIRED`).
pub fn validate_not_blank(field: &str, value: &str) -> FakturaResult<()> {
    if is_blank(value) {
        return Err(FakturaError::validation(
            field,
            format!("{field} cannot be null or empty"),
            format!("{}_REQUIRED", field.to_uppercase()),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> FakturaResult<()> {
    if is_blank(email) {
        return Err(FakturaError::validation(
            "email",
            "email cannot be null or empty",
            "EMAIL_REQUIRED",
        ));
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Err(FakturaError::validation(
            "email",
            format!("invalid email format: {email}"),
            "EMAIL_INVALID",
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> FakturaResult<()> {
    if is_blank(password) {
        return Err(FakturaError::validation(
            "password",
            "password cannot be null or empty",
            "PASSWORD_REQUIRED",
        ));
    }
    if password.chars().count() < 8 {
        return Err(FakturaError::validation(
            "password",
            "password must be at least 8 characters",
            "PASSWORD_TOO_SHORT",
        ));
    }
    Ok(())
}

pub fn validate_org_num(org_num: &str) -> FakturaResult<()> {
    if is_blank(org_num) {
        return Err(FakturaError::validation(
            "org_num",
            "organisation number cannot be null or empty",
            "ORG_NUM_REQUIRED",
        ));
    }
    if !ORG_NUM_PATTERN.is_match(org_num) {
        return Err(FakturaError::validation(
            "org_num",
            "invalid organisation number format, expected 123456-7890",
            "ORG_NUM_INVALID",
        ));
    }
    Ok(())
}

pub fn validate_company_name(name: &str) -> FakturaResult<()> {
    if is_blank(name) {
        return Err(FakturaError::validation(
            "name",
            "company name cannot be null or empty",
            "COMPANY_NAME_REQUIRED",
        ));
    }
    let len = name.chars().count();
    if len < 2 {
        return Err(FakturaError::validation(
            "name",
            "company name must be at least 2 characters",
            "COMPANY_NAME_TOO_SHORT",
        ));
    }
    if len > 20 {
        return Err(FakturaError::validation(
            "name",
            "company name cannot exceed 20 characters",
            "COMPANY_NAME_TOO_LONG",
        ));
    }
    Ok(())
}

/// 2-20 characters, letters/space/hyphen/apostrophe only.
pub fn validate_person_name(field: &str, name: &str) -> FakturaResult<()> {
    if is_blank(name) {
        return Err(FakturaError::validation(
            field,
            format!("{field} cannot be null or empty"),
            "NAME_REQUIRED",
        ));
    }
    let len = name.chars().count();
    if len < 2 {
        return Err(FakturaError::validation(
            field,
            format!("{field} must be at least 2 characters"),
            "NAME_TOO_SHORT",
        ));
    }
    if len > 20 {
        return Err(FakturaError::validation(
            field,
            format!("{field} cannot exceed 20 characters"),
            "NAME_TOO_LONG",
        ));
    }
    if !PERSON_NAME_PATTERN.is_match(name) {
        return Err(FakturaError::validation(
            field,
            format!("{field} contains invalid characters"),
            "NAME_INVALID_CHARS",
        ));
    }
    Ok(())
}

/// Optional field: absent or blank values are accepted unchanged.
pub fn validate_phone_number(phone: Option<&str>) -> FakturaResult<()> {
    let Some(phone) = phone else { return Ok(()) };
    if is_blank(phone) {
        return Ok(());
    }
    if !PHONE_PATTERN.is_match(phone) {
        return Err(FakturaError::validation(
            "phone_number",
            "invalid phone number format",
            "PHONE_INVALID",
        ));
    }
    Ok(())
}

/// Optional field: present values are bounded to 70 characters. Used for
/// address, city, and country.
pub fn validate_address(field: &str, value: Option<&str>) -> FakturaResult<()> {
    let Some(value) = value else { return Ok(()) };
    if value.chars().count() > 70 {
        return Err(FakturaError::validation(
            field,
            format!("{field} cannot exceed 70 characters"),
            "ADDRESS_TOO_LONG",
        ));
    }
    Ok(())
}

pub fn validate_invoice_number(number: &str) -> FakturaResult<()> {
    if is_blank(number) {
        return Err(FakturaError::validation(
            "number",
            "invoice number cannot be null or empty",
            "INVOICE_NUMBER_REQUIRED",
        ));
    }
    if !INVOICE_NUMBER_PATTERN.is_match(number) {
        return Err(FakturaError::validation(
            "number",
            "invoice number must be in format INV-YYYY-XXXX",
            "INVOICE_NUMBER_INVALID",
        ));
    }
    Ok(())
}

pub fn validate_quantity(quantity: i64) -> FakturaResult<()> {
    if quantity <= 0 {
        return Err(FakturaError::validation(
            "quantity",
            "item quantity must be positive",
            "INVOICE_ITEM_QUANTITY_INVALID",
        ));
    }
    Ok(())
}

pub fn validate_unit_price(unit_price: Decimal) -> FakturaResult<()> {
    if unit_price <= Decimal::ZERO {
        return Err(FakturaError::validation(
            "unit_price",
            "item unit price must be positive",
            "INVOICE_ITEM_UNIT_PRICE_INVALID",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(result: FakturaResult<()>) -> String {
        result.unwrap_err().code().expect("validation code").to_string()
    }

    #[test]
    fn accepts_well_formed_email() {
        assert!(validate_email("john.doe@example.com").is_ok());
        assert!(validate_email("a+b@sub.domain.co").is_ok());
    }

    #[test]
    fn rejects_blank_and_malformed_email() {
        assert_eq!(code(validate_email("")), "EMAIL_REQUIRED");
        assert_eq!(code(validate_email("   ")), "EMAIL_REQUIRED");
        assert_eq!(code(validate_email("not-an-email")), "EMAIL_INVALID");
        assert_eq!(code(validate_email("x@-bad.com")), "EMAIL_INVALID");
    }

    #[test]
    fn password_length_boundary() {
        assert_eq!(code(validate_password("")), "PASSWORD_REQUIRED");
        assert_eq!(code(validate_password("seven77")), "PASSWORD_TOO_SHORT");
        assert!(validate_password("eight888").is_ok());
    }

    #[test]
    fn org_num_must_match_swedish_format() {
        assert!(validate_org_num("123456-7890").is_ok());
        assert_eq!(code(validate_org_num("")), "ORG_NUM_REQUIRED");
        assert_eq!(code(validate_org_num("1234567890")), "ORG_NUM_INVALID");
        assert_eq!(code(validate_org_num("12345-67890")), "ORG_NUM_INVALID");
    }

    #[test]
    fn company_name_bounds() {
        assert!(validate_company_name("Acme").is_ok());
        assert_eq!(code(validate_company_name("")), "COMPANY_NAME_REQUIRED");
        assert_eq!(code(validate_company_name("A")), "COMPANY_NAME_TOO_SHORT");
        assert_eq!(
            code(validate_company_name("An Excessively Long Company Name")),
            "COMPANY_NAME_TOO_LONG"
        );
    }

    #[test]
    fn person_name_character_set() {
        assert!(validate_person_name("first_name", "Anna-Lena O'Hara").is_ok());
        assert_eq!(code(validate_person_name("first_name", "")), "NAME_REQUIRED");
        assert_eq!(code(validate_person_name("first_name", "X")), "NAME_TOO_SHORT");
        assert_eq!(
            code(validate_person_name("first_name", "J0hn")),
            "NAME_INVALID_CHARS"
        );
    }

    #[test]
    fn phone_is_optional_but_checked_when_present() {
        assert!(validate_phone_number(None).is_ok());
        assert!(validate_phone_number(Some("")).is_ok());
        assert!(validate_phone_number(Some("+46 70-123 45 67")).is_ok());
        assert_eq!(code(validate_phone_number(Some("12ab34"))), "PHONE_INVALID");
        assert_eq!(code(validate_phone_number(Some("123456"))), "PHONE_INVALID");
    }

    #[test]
    fn address_length_bound() {
        assert!(validate_address("address", None).is_ok());
        assert!(validate_address("city", Some("Stockholm")).is_ok());
        let long = "x".repeat(71);
        assert_eq!(code(validate_address("address", Some(&long))), "ADDRESS_TOO_LONG");
    }

    #[test]
    fn invoice_number_format() {
        assert!(validate_invoice_number("INV-2025-0001").is_ok());
        assert_eq!(code(validate_invoice_number("")), "INVOICE_NUMBER_REQUIRED");
        assert_eq!(code(validate_invoice_number("INV-25-0001")), "INVOICE_NUMBER_INVALID");
        assert_eq!(code(validate_invoice_number("inv-2025-0001")), "INVOICE_NUMBER_INVALID");
    }

    #[test]
    fn item_fields_must_be_positive() {
        assert!(validate_quantity(1).is_ok());
        assert_eq!(code(validate_quantity(0)), "INVOICE_ITEM_QUANTITY_INVALID");
        assert_eq!(code(validate_quantity(-3)), "INVOICE_ITEM_QUANTITY_INVALID");

        assert!(validate_unit_price(Decimal::new(500, 2)).is_ok());
        assert_eq!(
            code(validate_unit_price(Decimal::ZERO)),
            "INVOICE_ITEM_UNIT_PRICE_INVALID"
        );
    }

    #[test]
    fn not_blank_derives_code_from_field() {
        assert_eq!(code(validate_not_blank("email", " ")), "EMAIL_REQUIRED");
        assert!(validate_not_blank("email", "x@y.se").is_ok());
    }
}
