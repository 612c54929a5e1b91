use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("Both 'from' and 'to' versions need to be set.")]
    BothMissing,
    #[error("The 'from' version needs to be set.")]
    FromMissing,
    #[error("The 'to' version needs to be set.")]
    ToMissing,
}

pub fn validate_versions(from: &str, to: &str) -> Result<(), VersionError> {
    match (from.trim().is_empty(), to.trim().is_empty()) {
        (true, true) => Err(VersionError::BothMissing),
        (true, false) => Err(VersionError::FromMissing),
        (false, true) => Err(VersionError::ToMissing),
        (false, false) => Ok(()),
    }
}

/// The version named by the first `\version "..."` statement outside
/// comments and strings.
pub fn document_version(text: &str) -> Option<String> {
    const KEYWORD: &str = "\\version";

    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        if let Some(after) = rest.strip_prefix("%{") {
            rest = match after.find("%}") {
                Some(end) => &after[end + 2..],
                None => "",
            };
        } else if c == '%' {
            rest = match rest.find('\n') {
                Some(end) => &rest[end..],
                None => "",
            };
        } else if c == '"' {
            rest = skip_string(&rest[1..]);
        } else if let Some(after) = rest.strip_prefix(KEYWORD) {
            if let Some(version) = quoted_argument(after) {
                return Some(version);
            }
            rest = after;
        } else {
            rest = &rest[c.len_utf8()..];
        }
    }
    None
}

fn skip_string(mut rest: &str) -> &str {
    while let Some(c) = rest.chars().next() {
        rest = &rest[c.len_utf8()..];
        match c {
            '\\' => {
                if let Some(escaped) = rest.chars().next() {
                    rest = &rest[escaped.len_utf8()..];
                }
            }
            '"' => return rest,
            _ => {}
        }
    }
    rest
}

fn quoted_argument(after_keyword: &str) -> Option<String> {
    let body = after_keyword.trim_start().strip_prefix('"')?;
    let end = body.find('"')?;
    let version = body[..end].trim();
    (!version.is_empty()).then(|| version.to_string())
}
