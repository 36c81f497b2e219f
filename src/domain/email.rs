use serde::Serialize;

/// A validated, lowercased email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parse a raw address: trim and lowercase, then reject anything with
    /// consecutive dots, a leading/trailing dot, more than 254 characters,
    /// or a shape that is not `local@domain.tld`.
    pub fn parse(raw: &str) -> Result<EmailAddress, String> {
        let normalized = raw.trim().to_lowercase();

        if normalized.is_empty() {
            return Err("Email is required".to_string());
        }
        if normalized.len() > 254 {
            return Err("Email must be at most 254 characters".to_string());
        }
        if normalized.contains("..") || normalized.starts_with('.') || normalized.ends_with('.') {
            return Err("Enter a valid email address".to_string());
        }
        if !Self::is_address_shaped(&normalized) {
            return Err("Enter a valid email address".to_string());
        }

        Ok(EmailAddress(normalized))
    }

    fn is_address_shaped(s: &str) -> bool {
        let mut parts = s.splitn(2, '@');
        let (local, domain) = match (parts.next(), parts.next()) {
            (Some(l), Some(d)) => (l, d),
            _ => return false,
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return false;
        }

        let local_ok = local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~.-".contains(c));
        if !local_ok {
            return false;
        }

        // Domain needs at least one dot and hyphen-safe labels.
        if !domain.contains('.') {
            return false;
        }
        domain.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render the address with the local part masked, for log output.
    pub fn redacted(&self) -> String {
        redact_email(&self.0)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Mask the local part of an address so logs never carry the full value.
/// Inputs that do not look like an address are masked wholesale.
pub fn redact_email(raw: &str) -> String {
    match raw.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first = local.chars().next().unwrap();
            format!("{}***@{}", first, domain)
        }
        _ => "***".to_string(),
    }
}
