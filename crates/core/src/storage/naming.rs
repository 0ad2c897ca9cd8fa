//! Deterministic file names for stored covers.

use sha2::{Digest, Sha256};

/// Strip non-word characters, join whitespace runs with `_`, lower-case.
pub fn sanitize(input: &str) -> String {
    let kept: String = input
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join("_").to_lowercase()
}

/// File name for a `(title, author)` pair: `<title>[_by_<author>].jpg`.
///
/// When the title sanitizes to nothing the stem becomes `cover_<hash>` so the
/// name is never empty and still stable for the same pair.
pub fn cover_filename(title: &str, author: Option<&str>) -> String {
    let title_part = sanitize(title);
    let author_part = author.map(sanitize).filter(|a| !a.is_empty());

    if title_part.is_empty() {
        return format!("cover_{}.jpg", fallback_stem(title, author.unwrap_or("")));
    }

    match author_part {
        Some(author_part) => format!("{title_part}_by_{author_part}.jpg"),
        None => format!("{title_part}.jpg"),
    }
}

fn fallback_stem(title: &str, author: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(b"\n");
    hasher.update(author.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_basic() {
        assert_eq!(sanitize("George Orwell"), "george_orwell");
        assert_eq!(sanitize("  The   Hobbit  "), "the_hobbit");
    }

    #[test]
    fn test_sanitize_strips_punctuation() {
        assert_eq!(sanitize("Harry Potter & the Sorcerer's Stone!"), "harry_potter_the_sorcerers_stone");
        assert_eq!(sanitize("J.R.R. Tolkien"), "jrr_tolkien");
        assert_eq!(sanitize("snake_case_title"), "snake_case_title");
    }

    #[test]
    fn test_filename_with_author() {
        assert_eq!(cover_filename("1984", Some("George Orwell")), "1984_by_george_orwell.jpg");
    }

    #[test]
    fn test_filename_without_author() {
        assert_eq!(cover_filename("Beowulf", None), "beowulf.jpg");
        assert_eq!(cover_filename("Beowulf", Some("?!")), "beowulf.jpg");
    }

    #[test]
    fn test_filename_distinct_authors() {
        let a = cover_filename("Collected Poems", Some("Sylvia Plath"));
        let b = cover_filename("Collected Poems", Some("Philip Larkin"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_filename_fallback_is_stable() {
        let a = cover_filename("???", Some("Anon"));
        let b = cover_filename("???", Some("Anon"));
        let c = cover_filename("!!!", Some("Anon"));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("cover_"));
        assert_eq!(a.len(), "cover_".len() + 16 + ".jpg".len());
    }
}
