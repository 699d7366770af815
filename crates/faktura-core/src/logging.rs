//! Log-safety helpers.

/// Mask an email address for logging: `john@example.com` becomes
/// `j***@example.com`. Values that do not look like an email are fully
/// masked.
pub fn mask_email(email: &str) -> String {
    if let Some((local, domain)) = email.split_once('@') {
        if let Some(first) = local.chars().next() {
            return format!("{first}***@{domain}");
        }
    }
    "***".into()
}
