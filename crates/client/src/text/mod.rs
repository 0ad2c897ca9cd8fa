//! Title and author normalization for relaxed catalog retries.
//!
//! ### Simplification pipeline
//! Each step removes one kind of boilerplate. A step whose output would be
//! empty is skipped, so `"1984"` survives the year rule and `"A Novel"` survives
//! the trailer rule.
//!
//! 1. Subtitle after `:`, ` - `, en-dash or em-dash
//! 2. Trailing `(...)` / `[...]` segments
//! 3. Edition, volume and publisher-series markers, plus everything after
//! 4. "A Novel", "A Memoir", ... trailers
//! 5. Marketing phrases ("bestselling", "Now a Netflix Series")
//! 6. Year ranges and standalone years
//! 7. Whitespace collapse and edge punctuation trim

use regex::Regex;
use std::sync::LazyLock;

static SUBTITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*(?::|\s-\s|[–—]).*$").unwrap());

static TRAILING_BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(?:\([^()]*\)|\[[^\[\]]*\])\s*$").unwrap());

static EDITION_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)[\s,;]*\b(?:deluxe|special|collector'?s|anniversary|illustrated|revised|expanded|annotated|unabridged|abridged|definitive|complete|first|new|\d+(?:st|nd|rd|th))\s+edition\b.*$",
        r"(?i)[\s,;]*\b(?:book|volume|vol\.|part)\s+(?:\d+|[ivxlc]+|one|two|three|four|five|six|seven|eight|nine|ten)\b.*$",
        r"(?i)[\s,;]*#\s*\d+.*$",
        r"(?i)[\s,;]*\b(?:penguin (?:modern )?classics|oxford world'?s classics|vintage (?:classics|international)|everyman'?s library|modern library|signet classics|bantam classics|wordsworth classics|harper perennial)\b.*$",
        r"(?i)[\s,;]*\b(?:trilogy|box(?:ed)? set)\b.*$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static GENRE_TRAILER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)[\s,;]*\ban?\s+(?:novel|novella|story|memoir|thriller|mystery|romance|fable|biography|love story|true story)\b.*$",
    )
    .unwrap()
});

static MARKETING: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)(?:#\s*1\s+)?(?:the\s+)?(?:new york times\s+|international\s+|national\s+|usa today\s+)?\bbest[\s-]?sell(?:ing|er)(?:\s+(?:novel|book|author|series|classic))?\b",
        r"(?i)\bnow\s+an?\s+(?:major\s+)?(?:netflix|hbo|hulu|amazon|apple tv\+?|starz|disney\+?|bbc)?\s*(?:original\s+)?(?:motion picture|movie|film|tv series|limited series|miniseries|series|show)\b",
        r"(?i)\b(?:movie|film|tv)\s+tie[\s-]?in\b",
        r"(?i)\baward[\s-]winning\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static YEAR_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:1[5-9]|20)\d{2}\s*[-–—]\s*(?:(?:1[5-9]|20)\d{2}|\d{2})\b").unwrap());

static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:1[5-9]|20)\d{2}\b").unwrap());

static EDGE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s,;:.\-–—&/]+|[\s,;:.\-–—&/]+$").unwrap());

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "of", "and", "or", "in", "on", "at", "to", "for", "with", "by", "from", "into",
];

/// Replace every match of `re`, unless that would leave nothing.
fn strip(current: String, re: &Regex) -> String {
    let next = re.replace_all(&current, " ");
    if next.trim().is_empty() { current } else { collapse_whitespace(&next) }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reduce a title to its core words.
pub fn simplify(title: &str) -> String {
    let mut current = collapse_whitespace(title);

    current = strip(current, &SUBTITLE);

    loop {
        let next = strip(current.clone(), &TRAILING_BRACKETS);
        if next == current {
            break;
        }
        current = next;
    }

    for re in EDITION_MARKERS.iter() {
        current = strip(current, re);
    }

    current = strip(current, &GENRE_TRAILER);

    for re in MARKETING.iter() {
        current = strip(current, re);
    }

    current = strip(current, &YEAR_RANGE);
    current = strip(current, &YEAR);

    let trimmed = EDGE_PUNCTUATION.replace_all(&current, "");
    if trimmed.is_empty() { current } else { collapse_whitespace(&trimmed) }
}

/// Final whitespace-separated token of an author name.
pub fn last_name(author: &str) -> String {
    author
        .split_whitespace()
        .last()
        .map(str::to_string)
        .unwrap_or_else(|| author.to_string())
}

/// Drop punctuation: apostrophes vanish, everything else becomes a space.
pub fn strip_punctuation(text: &str) -> String {
    let spaced: String = text
        .chars()
        .filter(|c| !matches!(c, '\'' | '’'))
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect();
    collapse_whitespace(&spaced)
}

/// Lower-cased words longer than three characters.
pub fn content_words(text: &str) -> Vec<String> {
    strip_punctuation(text)
        .split_whitespace()
        .filter(|w| w.chars().count() > 3)
        .map(str::to_lowercase)
        .collect()
}

/// Title rewrites from most specific to most relaxed, without duplicates.
///
/// Order: simplified, simplified without stopwords, first three and first two
/// words (titles over three words only), letters-only, depunctuated raw title.
pub fn variants(title: &str) -> Vec<String> {
    let simplified = simplify(title);
    let words: Vec<&str> = simplified.split_whitespace().collect();

    let mut candidates = vec![simplified.clone()];

    candidates.push(
        words
            .iter()
            .filter(|w| !STOPWORDS.contains(&w.to_lowercase().as_str()))
            .copied()
            .collect::<Vec<_>>()
            .join(" "),
    );

    if words.len() > 3 {
        candidates.push(words[..3].join(" "));
        candidates.push(words[..2].join(" "));
    }

    let letters: String = simplified
        .chars()
        .map(|c| if c.is_alphabetic() { c } else { ' ' })
        .collect();
    candidates.push(collapse_whitespace(&letters));

    candidates.push(strip_punctuation(title));

    let mut out: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !candidate.is_empty() && !out.contains(&candidate) {
            out.push(candidate);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplify_subtitle_and_edition() {
        assert_eq!(simplify("Dune: A Novel (Deluxe Edition)"), "Dune");
        assert_eq!(simplify("Dune (Deluxe Edition)"), "Dune");
    }

    #[test]
    fn test_simplify_dashes() {
        assert_eq!(simplify("Educated — A Memoir"), "Educated");
        assert_eq!(simplify("Spider-Man - The Graphic Novel"), "Spider-Man");
        assert_eq!(simplify("Spider-Man"), "Spider-Man");
    }

    #[test]
    fn test_simplify_brackets() {
        assert_eq!(simplify("The Hobbit [Illustrated] (Paperback)"), "The Hobbit");
    }

    #[test]
    fn test_simplify_series_markers() {
        assert_eq!(simplify("The Way of Kings, Book 1 of the Stormlight Archive"), "The Way of Kings");
        assert_eq!(simplify("Leviathan Wakes #1"), "Leviathan Wakes");
        assert_eq!(simplify("Pride and Prejudice Penguin Classics"), "Pride and Prejudice");
        assert_eq!(simplify("The Lord of the Rings Trilogy"), "The Lord of the Rings");
        assert_eq!(simplify("Moby Dick 2nd Edition"), "Moby Dick");
    }

    #[test]
    fn test_simplify_genre_trailer() {
        assert_eq!(simplify("Circe A Novel"), "Circe");
        assert_eq!(simplify("A Novel"), "A Novel");
    }

    #[test]
    fn test_simplify_marketing() {
        assert_eq!(simplify("Where the Crawdads Sing #1 New York Times Bestseller"), "Where the Crawdads Sing");
        assert_eq!(simplify("Shadow and Bone Now a Netflix Series"), "Shadow and Bone");
    }

    #[test]
    fn test_simplify_years() {
        assert_eq!(simplify("The Collected Stories 1950-1980"), "The Collected Stories");
        assert_eq!(simplify("World War Z 2006"), "World War Z");
        assert_eq!(simplify("1984"), "1984");
    }

    #[test]
    fn test_simplify_whitespace_and_punctuation() {
        assert_eq!(simplify("  The   Road ,  "), "The Road");
    }

    #[test]
    fn test_simplify_is_deterministic() {
        let title = "It Ends with Us: A Novel (Special Collector's Edition)";
        assert_eq!(simplify(title), simplify(title));
        assert_eq!(simplify(title), "It Ends with Us");
    }

    #[test]
    fn test_last_name() {
        assert_eq!(last_name("George Orwell"), "Orwell");
        assert_eq!(last_name("  Ursula K. Le Guin "), "Guin");
        assert_eq!(last_name("Homer"), "Homer");
        assert_eq!(last_name(""), "");
    }

    #[test]
    fn test_content_words() {
        assert_eq!(content_words("The Hitchhiker's Guide to the Galaxy"), vec!["hitchhikers", "guide", "galaxy"]);
        assert!(content_words("It Is So").is_empty());
    }

    #[test]
    fn test_variants_tom_sawyer() {
        let v = variants("The Adventures of Tom Sawyer");
        assert_eq!(v[0], "The Adventures of Tom Sawyer");
        assert!(v.contains(&"Adventures Tom Sawyer".to_string()));
        assert!(v.contains(&"The Adventures of".to_string()));
        assert!(v.contains(&"The Adventures".to_string()));

        let mut deduped = v.clone();
        deduped.dedup();
        assert_eq!(deduped.len(), v.len());
        for (i, a) in v.iter().enumerate() {
            assert!(!v[i + 1..].contains(a), "duplicate variant {a}");
        }
    }

    #[test]
    fn test_variants_order() {
        let v = variants("Harry Potter & the Sorcerer's Stone: Book 1");
        assert_eq!(
            v,
            vec![
                "Harry Potter & the Sorcerer's Stone".to_string(),
                "Harry Potter & Sorcerer's Stone".to_string(),
                "Harry Potter &".to_string(),
                "Harry Potter".to_string(),
                "Harry Potter the Sorcerer s Stone".to_string(),
                "Harry Potter the Sorcerers Stone Book 1".to_string(),
            ]
        );
    }

    #[test]
    fn test_variants_short_title() {
        let v = variants("Dune");
        assert_eq!(v, vec!["Dune".to_string()]);
    }
}
