use crate::error::{Result, ScrapeError};

/// Schemes a job may load. Anything else, `file:` and `chrome:` included,
/// would expose the host's local state through the scrape results.
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "data"];

/// The only `about:` page allowed
const ABOUT_BLANK: &str = "about:blank";

/// Turn user input into something the browser can navigate to.
///
/// Blank input is rejected, as is any explicit scheme other than `http`,
/// `https` and `data` (plus `about:blank`). Missing schemes default to
/// `https://`, except local hosts which get `http://`. A bare word like
/// `github` becomes `https://www.github.com`.
pub fn normalize_url(url: &str) -> Result<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(ScrapeError::InvalidInput("URL is required".to_string()));
    }

    let lowered = trimmed.to_ascii_lowercase();
    if lowered == ABOUT_BLANK {
        return Ok(trimmed.to_string());
    }

    if let Some(scheme) = explicit_scheme(&lowered) {
        if ALLOWED_SCHEMES.contains(&scheme) {
            return Ok(trimmed.to_string());
        }
        return Err(ScrapeError::InvalidInput(format!("Unsupported URL scheme: {}", scheme)));
    }

    if lowered.starts_with("localhost") || lowered.starts_with("127.0.0.1") {
        return Ok(format!("http://{}", trimmed));
    }

    if trimmed.contains('.') || trimmed.contains('/') {
        return Ok(format!("https://{}", trimmed));
    }

    Ok(format!("https://www.{}.com", trimmed))
}

/// The scheme of `url`, if it names one.
///
/// `host:port` is not a scheme: a colon followed by a digit starts a port.
fn explicit_scheme(url: &str) -> Option<&str> {
    let (scheme, rest) = url.split_once(':')?;
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    let is_port = rest.starts_with(|c: char| c.is_ascii_digit());

    (valid && !is_port).then_some(scheme)
}
