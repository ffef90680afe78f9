//! Text helpers: query normalization, slugs and title casing.

use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Words kept lowercase inside a title (unless they open it)
const LOWERCASE_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "from", "if", "in", "into", "near", "nor",
    "of", "on", "onto", "or", "per", "that", "the", "to", "with", "vs", "versus",
];

/// Acronyms always rendered uppercase
const UPPERCASE_WORDS: &[&str] = &["CEO", "GDP", "ID", "IT", "PPP", "R&D", "TV", "UI", "USD"];

/// Base letters for characters that carry no canonical decomposition
fn fold_letter(c: char) -> Option<&'static str> {
    let folded = match c {
        'Æ' => "AE",
        'æ' => "ae",
        'Œ' => "OE",
        'œ' => "oe",
        'Ø' => "O",
        'ø' => "o",
        'Ł' => "L",
        'ł' => "l",
        'Đ' | 'Ð' => "D",
        'đ' | 'ð' => "d",
        'Ħ' => "H",
        'ħ' => "h",
        'ı' => "i",
        'ß' => "ss",
        'Þ' => "Th",
        'þ' => "th",
        'Ŋ' => "N",
        'ŋ' => "n",
        'Ɛ' => "E",
        'ɛ' => "e",
        'Ɔ' => "O",
        'ɔ' => "o",
        _ => return None,
    };
    Some(folded)
}

/// Reduce text to `[A-Za-z0-9_-]`.
///
/// Spaces become `-`. Accented letters are decomposed (NFD) and their
/// combining marks dropped, so `"Ọṣun"` becomes `"Osun"`. Anything else is
/// dropped: `"Côte d'Ivoire"` becomes `"Cote-dIvoire"`.
pub fn strip(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.nfd() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            out.push(c);
        } else if c == ' ' {
            out.push('-');
        } else if is_combining_mark(c) {
            continue;
        } else if let Some(folded) = fold_letter(c) {
            out.push_str(folded);
        }
    }
    out
}

/// Normalize user-typed search text before it is sent to the search endpoint
pub fn normalize_query(raw: &str) -> String {
    strip(raw.trim())
}

/// URL-safe lowercase slug for a title (`"Health"` -> `"health"`)
pub fn slugify(title: &str) -> String {
    strip(title).to_lowercase()
}

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s\-_/]+|[^\s\-_/]+").expect("static regex"))
}

/// Title-case a label the way chart axes and legends expect.
///
/// Small connecting words stay lowercase except at the start, known acronyms
/// stay uppercase, underscores are treated as spaces.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut first_word = true;

    for token in token_regex().find_iter(value) {
        let word = token.as_str();
        if word.chars().all(|c| c.is_whitespace() || matches!(c, '-' | '_' | '/')) {
            out.push_str(&word.replace('_', " "));
            continue;
        }

        let lower = word.to_lowercase();
        if let Some(acronym) = UPPERCASE_WORDS
            .iter()
            .find(|a| a.eq_ignore_ascii_case(word))
        {
            out.push_str(acronym);
        } else if !first_word && LOWERCASE_WORDS.contains(&lower.as_str()) {
            out.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(head) = chars.next() {
                out.extend(head.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
        first_word = false;
    }

    out
}

/// Truncate to at most `max` display columns, appending an ellipsis when cut
pub fn truncate_width(value: &str, max: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let total: usize = value.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max {
        return value.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in value.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('\u{2026}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_replaces_spaces_and_folds_accents() {
        assert_eq!(strip("Ketu South"), "Ketu-South");
        assert_eq!(strip("Côte d'Ivoire"), "Cote-dIvoire");
        assert_eq!(strip("São Tomé"), "Sao-Tome");
        assert_eq!(strip("a_b-c"), "a_b-c");
    }

    #[test]
    fn normalize_query_trims_before_stripping() {
        assert_eq!(normalize_query("  Keta "), "Keta");
        assert_eq!(normalize_query("   "), "");
        assert_eq!(normalize_query("Bénin?"), "Benin");
    }

    #[test]
    fn combining_marks_fold_to_base_letters() {
        assert_eq!(normalize_query("Ọṣun"), "Osun");
        assert_eq!(normalize_query("Ẹkiti"), "Ekiti");
        assert_eq!(normalize_query("Łódź"), "Lodz");
        assert_eq!(normalize_query("Ségou"), "Segou");
        // Already decomposed input folds the same way
        assert_eq!(normalize_query("O\u{323}s\u{323}un"), "Osun");
        assert_eq!(strip("Kɔɔ Ŋwa"), "Koo-Nwa");
    }

    #[test]
    fn slugs_are_lowercase() {
        assert_eq!(slugify("Agriculture"), "agriculture");
        assert_eq!(slugify("Crop Production"), "crop-production");
    }

    #[test]
    fn title_case_keeps_small_words_and_acronyms() {
        assert_eq!(title_case("proportion_of_children"), "Proportion of Children");
        assert_eq!(title_case("of mice and men"), "Of Mice and Men");
        assert_eq!(title_case("gdp per capita"), "GDP per Capita");
        assert_eq!(title_case("SEVERE"), "Severe");
        assert_eq!(title_case("stunted"), "Stunted");
    }

    #[test]
    fn truncation_adds_ellipsis() {
        assert_eq!(truncate_width("Ketu South", 20), "Ketu South");
        assert_eq!(truncate_width("Ketu South", 5), "Ketu\u{2026}");
        assert_eq!(truncate_width("abc", 0), "");
    }
}
