//! Slug derivation for category names

/// Lowercase a name and collapse whitespace/hyphen runs into single
/// hyphens, dropping anything that is not alphanumeric or an underscore.
/// `"Other Frameworks"` becomes `"other-frameworks"`.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_separator = false;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || ch == '-' {
            pending_separator = true;
        }
    }

    slug
}
