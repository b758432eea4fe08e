//! Slug generation
//!
//! Maps a display name to a URL-safe identifier: lowercase ASCII
//! alphanumerics separated by single hyphens.

/// Generate a URL-friendly slug from a display name.
///
/// Lowercases the input, keeps ASCII alphanumerics, and collapses every
/// other character run (whitespace, punctuation, non-ASCII) into a single
/// hyphen. Leading and trailing hyphens are stripped.
///
/// The function is idempotent: slugifying an already-slugified string
/// returns it unchanged.
pub fn generate_slug(name: &str) -> String {
    let mut result = String::new();
    let mut prev_hyphen = false;

    for c in name.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen && !result.is_empty() {
            result.push('-');
            prev_hyphen = true;
        }
    }

    result.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_generate_slug_simple() {
        assert_eq!(generate_slug("Hello World"), "hello-world");
    }

    #[test]
    fn test_generate_slug_with_punctuation() {
        assert_eq!(generate_slug("B.Tech CSE"), "b-tech-cse");
    }

    #[test]
    fn test_generate_slug_with_multiple_spaces() {
        assert_eq!(generate_slug("Hello   World"), "hello-world");
    }

    #[test]
    fn test_generate_slug_with_underscores() {
        assert_eq!(generate_slug("hello_world"), "hello-world");
    }

    #[test]
    fn test_generate_slug_trims_edges() {
        assert_eq!(generate_slug("  Data Structures!  "), "data-structures");
    }

    #[test]
    fn test_generate_slug_drops_non_ascii() {
        assert_eq!(generate_slug("Maths 数学"), "maths");
        assert_eq!(generate_slug("数学"), "");
    }

    #[test]
    fn test_generate_slug_empty() {
        assert_eq!(generate_slug(""), "");
        assert_eq!(generate_slug("!!!"), "");
    }

    proptest! {
        #[test]
        fn prop_slug_is_url_safe(name in ".*") {
            let slug = generate_slug(&name);
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }

        #[test]
        fn prop_slug_is_idempotent(name in ".*") {
            let once = generate_slug(&name);
            prop_assert_eq!(generate_slug(&once), once.clone());
        }
    }
}
