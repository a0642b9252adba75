// src/parsing/clean.rs
use once_cell::sync::Lazy;
use regex::Regex;

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bhttps?://\S+|www\.\S+\b").expect("url pattern is a valid regex"));

static PAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Page\s+\d+\s+of\s+\d+|Страница\s+\d+\s+из\s+\d+")
        .expect("page marker pattern is a valid regex")
});

// Keeps letters, digits, blanks and the punctuation skill names rely on.
static DISALLOWED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\w \t\n.,!?;:()\-+@#/]").expect("character filter is a valid regex")
});

static SPACES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" {2,}").expect("space run pattern is a valid regex"));

static BLANK_LINES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{2,}").expect("blank line pattern is a valid regex"));

/// Normalizes text coming out of the extraction service before parsing.
pub fn clean_text(text: &str) -> String {
    let text = text
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\u{00A0}', " ");

    let text = URL_RE.replace_all(&text, "");
    let text = PAGE_RE.replace_all(&text, "");
    let text = DISALLOWED_RE.replace_all(&text, "");
    let text = SPACES_RE.replace_all(&text, " ");
    let text = BLANK_LINES_RE.replace_all(&text, "\n");

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_urls_and_page_markers() {
        let raw = "Apply at https://jobs.example.com/42 now\nPage 1 of 3\nСтраница 2 из 3\nPython";
        let cleaned = clean_text(raw);
        assert!(!cleaned.contains("https"));
        assert!(!cleaned.contains("Page 1"));
        assert!(!cleaned.contains("Страница"));
        assert!(cleaned.ends_with("Python"));
    }

    #[test]
    fn test_normalizes_whitespace() {
        let raw = "\r\nRequirements:\r\n\r\n\r\n-  Python\u{00A0}\u{00A0}3\r\n\n";
        assert_eq!(clean_text(raw), "Requirements:\n- Python 3");
    }

    #[test]
    fn test_keeps_skill_punctuation() {
        let raw = "C++, C#, CI/CD, Node.js ★ «Kotlin»";
        assert_eq!(clean_text(raw), "C++, C#, CI/CD, Node.js Kotlin");
    }

    #[test]
    fn test_keeps_cyrillic() {
        assert_eq!(clean_text("  Опыт работы с Python  "), "Опыт работы с Python");
    }
}
