use super::CheckError;

/// ASCII characters a host name may never carry.
const FORBIDDEN_HOST_CHARS: &[char] = &[
    '#', '%', '/', ':', '<', '>', '?', '@', '[', '\\', ']', '^', '|',
];

/// Domain derived from an e-mail address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDomain {
    /// Lower-cased text after the first `@`.
    pub domain: String,
    /// IDNA/ASCII form used for DNS queries.
    pub ascii: String,
}

/// Splits `email` on its first `@` and returns the lower-cased remainder.
///
/// Fails with [`CheckError::InvalidInput`] when there is no `@`, when nothing
/// follows it, or when the domain has no ASCII form.
pub fn extract_domain(email: &str) -> Result<ExtractedDomain, CheckError> {
    let input = email.trim();
    let Some((_, rest)) = input.split_once('@') else {
        return Err(CheckError::invalid_input(email, "missing '@'"));
    };

    let domain = rest.trim().to_lowercase();
    if domain.is_empty() {
        return Err(CheckError::invalid_input(email, "missing domain after '@'"));
    }

    if let Some(rejected) = domain.chars().find(|c| is_forbidden(*c)) {
        return Err(CheckError::invalid_input(
            email,
            format!("domain contains invalid character {rejected:?}"),
        ));
    }

    let ascii = idna::domain_to_ascii(&domain).map_err(|_| {
        CheckError::invalid_input(email, format!("domain '{domain}' has no IDNA ASCII form"))
    })?;
    let ascii = ascii.trim_end_matches('.').to_string();
    if ascii.is_empty() {
        return Err(CheckError::invalid_input(email, "missing domain after '@'"));
    }

    Ok(ExtractedDomain { domain, ascii })
}

fn is_forbidden(c: char) -> bool {
    c.is_whitespace() || c.is_control() || FORBIDDEN_HOST_CHARS.contains(&c)
}
