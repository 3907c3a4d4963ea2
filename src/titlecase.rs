use once_cell::sync::Lazy;
use regex::Regex;

static VOWELS: Lazy<Regex> = Lazy::new(|| Regex::new("[AEIOUYaeiouy]").unwrap());
static ORD_NUMBERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+(?:st|nd|rd|th)").unwrap());

/// Words whose published casing is kept verbatim.
static KEEP_AS_IS: &[&str] = &["GAA", "Ltd", "CIC", "FC", "RFC"];

/// Joining words that stay lowercase mid-name.
static LOWERCASE_WORDS: &[&str] = &["a", "an", "of", "the", "is", "or"];

/// Initialisms and roman numerals always written uppercase.
static UPPERCASE_WORDS: &[&str] = &[
    "UK", "FM", "YMCA", "PTA", "PTFA", "NHS", "CIO", "U3A", "RAF", "PFA", "ADHD", "I", "II",
    "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "AFC", "CE", "CIC",
];

/// Vowel-less words that are ordinary words rather than acronyms, including
/// the Welsh ones common in club names.
static TITLED_WORDS: &[&str] = &["st", "mr", "mrs", "ms", "ltd", "dr", "cwm", "clwb", "drs"];

/// Contractions where the trailing fragment stays lowercase.
static CONTRACTIONS: &[&str] = &["YOU'RE", "DON'T", "HAVEN'T"];

/// Titlecase an organisation name that was published in a single case.
///
/// Mixed-case input is assumed to be deliberate and returned unchanged
/// (beyond trimming). All-uppercase or all-lowercase input is rewritten
/// word by word via [`titlecase_word`], then the first character is forced
/// uppercase.
pub fn to_titlecase(s: &str) -> String {
    let s = s.trim();
    if s.is_empty() {
        return String::new();
    }

    let has_upper = s.chars().any(|c| c.is_uppercase());
    let has_lower = s.chars().any(|c| c.is_lowercase());
    if has_upper == has_lower {
        // Mixed case, or no cased characters at all.
        return s.to_string();
    }

    let titled = s
        .split_whitespace()
        .map(titlecase_word)
        .collect::<Vec<_>>()
        .join(" ");

    capitalize_first(&titled)
}

fn titlecase_word(word: &str) -> String {
    let stripped = word.trim_matches(|c| "(){}<>.".contains(c));

    for keep in KEEP_AS_IS {
        if word.eq_ignore_ascii_case(keep) {
            return (*keep).to_string();
        }
    }

    let lower = stripped.to_lowercase();
    if LOWERCASE_WORDS.contains(&lower.as_str()) {
        return word.to_lowercase();
    }

    let upper = stripped.to_uppercase();
    if UPPERCASE_WORDS.contains(&upper.as_str()) {
        return word.to_uppercase();
    }

    if TITLED_WORDS.contains(&lower.as_str()) {
        return capitalize(stripped);
    }

    if ORD_NUMBERS.is_match(&lower) {
        return word.to_lowercase();
    }

    // Words with separators in the middle recurse into their pieces.
    for sep in ['.', '\'', ')'] {
        let pieces: Vec<&str> = word.split(sep).collect();
        if pieces.len() < 2 {
            continue;
        }
        let last = pieces[pieces.len() - 1];
        let keep_last_lower = (sep == '\'' && last.eq_ignore_ascii_case("s"))
            || CONTRACTIONS.contains(&word.to_uppercase().as_str());
        let titled: Vec<String> = if keep_last_lower {
            let mut parts: Vec<String> = pieces[..pieces.len() - 1]
                .iter()
                .map(|p| titlecase_word(p))
                .collect();
            parts.push(last.to_lowercase());
            parts
        } else {
            pieces.iter().map(|p| titlecase_word(p)).collect()
        };
        return titled.join(&sep.to_string());
    }

    // Anything left with no vowels reads as an acronym.
    if !stripped.is_empty() && !VOWELS.is_match(stripped) {
        return word.to_uppercase();
    }

    capitalize(word)
}

/// Uppercase the first character, lowercase the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

/// Uppercase only the first character, leaving the rest alone.
fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
