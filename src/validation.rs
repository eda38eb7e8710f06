//! Form-field formatting and validation helpers
//!
//! Pure string transforms shared by registration and profile-editing
//! flows. Formatting is progressive, so these can run on every keystroke
//! of a UI without producing invalid intermediate states.

use url::Url;

fn digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Apply the `00000-000` CEP mask, capping at eight digits
pub fn format_cep(value: &str) -> String {
    let numbers = digits(value);
    if numbers.len() <= 5 {
        numbers
    } else {
        let end = numbers.len().min(8);
        format!("{}-{}", &numbers[..5], &numbers[5..end])
    }
}

/// Apply the Brazilian phone mask, `(00) 0000-0000` for landlines and
/// `(00) 00000-0000` for mobile numbers, capping at eleven digits
pub fn format_phone(value: &str) -> String {
    let numbers = digits(value);
    match numbers.len() {
        0..=2 => numbers,
        3..=6 => format!("({}) {}", &numbers[..2], &numbers[2..]),
        7..=10 => format!("({}) {}-{}", &numbers[..2], &numbers[2..6], &numbers[6..]),
        _ => format!("({}) {}-{}", &numbers[..2], &numbers[2..7], &numbers[7..11]),
    }
}

/// A CEP is valid with exactly eight digits, mask or no mask
pub fn validate_cep(cep: &str) -> bool {
    digits(cep).len() == 8
}

/// A phone is valid with ten or eleven digits, mask or no mask
pub fn validate_phone(phone: &str) -> bool {
    let len = digits(phone).len();
    (10..=11).contains(&len)
}

/// Permissive e-mail shape check: something before the `@`, something
/// after it, and a dot in the domain. Deliverability is the server's
/// problem.
pub fn validate_email(email: &str) -> bool {
    if email.chars().any(|c| c.is_whitespace()) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// A website is valid when empty (optional field) or parseable as a URL
pub fn validate_website(website: &str) -> bool {
    if website.is_empty() {
        return true;
    }
    Url::parse(website).is_ok()
}

/// An Instagram handle is valid when empty (optional field) or an `@`
/// followed by at least one character
pub fn validate_instagram(instagram: &str) -> bool {
    if instagram.is_empty() {
        return true;
    }
    instagram.starts_with('@') && instagram.len() > 1
}

/// Force the leading `@` onto a handle, discarding embedded ones
pub fn normalize_instagram(instagram: &str) -> String {
    if instagram.is_empty() || instagram.starts_with('@') {
        return instagram.to_string();
    }
    let stripped: String = instagram.chars().filter(|c| *c != '@').collect();
    format!("@{}", stripped)
}

/// Prefix `https://` onto a bare domain. Values that already carry a
/// scheme, or that do not look like a domain at all, pass through.
pub fn normalize_website(website: &str) -> String {
    if website.is_empty()
        || website.starts_with("http://")
        || website.starts_with("https://")
        || !website.contains('.')
    {
        return website.to_string();
    }
    format!("https://{}", website)
}
