//! Best-effort extraction of limit-up stock names and reasons from headlines.
//!
//! Korean market headlines tend to read `<names> 상한가… <reason>`, with
//! names listed using middle dots, commas, slashes or conjunctions. None of
//! this is reliable; the output is a guess.

use once_cell::sync::Lazy;
use regex::Regex;

/// The "limit-up" marker.
pub const LIMIT_UP: &str = "상한가";

const MIN_NAME_CHARS: usize = 2;
const MAX_NAME_CHARS: usize = 20;
const MIN_REASON_CHARS: usize = 4;
const MAX_REASON_CHARS: usize = 60;

/// Tried in order; the first one present in the title wins unless the text
/// after it is too short or too long.
const REASON_SEPARATORS: &[&str] = &["—", "-", ":", "…", "..", "··", "·"];

const NAME_TRIM_CHARS: &[char] = &[' ', '-', '—', ':', '·', ','];
const REASON_TRIM_CHARS: &[char] = &[' ', '.', '!', '?', ',', '/', '·', '-', '—'];

static BRACKETED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]+\]").expect("valid bracket regex"));
static PARENTHESIZED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^)]*\)").expect("valid parenthesis regex"));
static MULTI_SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").expect("valid whitespace regex"));

static NAME_LIST_SPLIT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[·,／/∙ㆍ•&]|와|및|과|\+").expect("valid name list separator regex")
});
static NAME_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[가-힣A-Za-z0-9.\-&]{2,20}$").expect("valid name token regex"));
static NAME_DISALLOWED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^가-힣A-Za-z0-9.\-&\s]").expect("valid name filter regex"));
static LETTER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[가-힣A-Za-z]").expect("valid letter regex"));
static BODY_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([가-힣A-Za-z0-9.\-&\s]{2,20})\s*상한가").expect("valid body name regex")
});

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn in_range(s: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&char_len(s))
}

/// Drop `[tags]` and `(asides)`, then squeeze whitespace.
pub fn clean_title(text: &str) -> String {
    let t = BRACKETED_RE.replace_all(text, "");
    let t = PARENTHESIZED_RE.replace_all(&t, "");
    MULTI_SPACE_RE.replace_all(&t, " ").trim().to_string()
}

/// Candidate stock names listed before `상한가` in a headline.
///
/// `"한화에어로·LIG넥스 상한가"` → `["한화에어로", "LIG넥스"]`
pub fn extract_names_from_title(title: &str) -> Vec<String> {
    let t = clean_title(title);
    let Some((left, _)) = t.split_once(LIMIT_UP) else {
        return Vec::new();
    };

    let mut names: Vec<String> = Vec::new();
    for part in NAME_LIST_SPLIT_RE.split(left) {
        let part = part.trim_matches(NAME_TRIM_CHARS);
        let candidate = if NAME_TOKEN_RE.is_match(part) {
            Some(part.to_string())
        } else {
            // Names with spaces or stray punctuation.
            let stripped = NAME_DISALLOWED_RE.replace_all(part, "");
            let stripped = stripped.trim();
            (in_range(stripped, MIN_NAME_CHARS, MAX_NAME_CHARS) && LETTER_RE.is_match(stripped))
                .then(|| stripped.to_string())
        };

        if let Some(name) = candidate.filter(|n| !n.is_empty()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Short phrase explaining the move, guessed from the headline.
pub fn extract_reason_from_title(title: &str) -> String {
    let t = clean_title(title);

    for sep in REASON_SEPARATORS {
        if let Some((_, rest)) = t.split_once(sep) {
            let seg = rest.trim();
            if in_range(seg, MIN_REASON_CHARS, MAX_REASON_CHARS) {
                return seg.to_string();
            }
        }
    }

    if let Some((_, rest)) = t.split_once(LIMIT_UP) {
        let seg = rest.trim_matches(REASON_TRIM_CHARS);
        if in_range(seg, MIN_REASON_CHARS, MAX_REASON_CHARS) {
            return seg.to_string();
        }
    }

    t.chars().take(MAX_REASON_CHARS).collect()
}

/// Name right before `상한가` in article text, for titles that named nobody.
pub fn extract_name_from_body(body: &str) -> Option<String> {
    if !body.contains(LIMIT_UP) {
        return None;
    }
    BODY_NAME_RE
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
}
