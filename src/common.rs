/// Common helpers shared across services: slug derivation and
/// human-readable id tokens.
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

static NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s-]").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static DASH_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("valid regex"));

/// Lowercase hyphenated slug: strips anything outside `[a-z0-9 -]`,
/// collapses whitespace and dash runs. Deterministic; uniqueness is the
/// caller's concern.
pub fn slugify(input: &str) -> String {
    let lower = input.to_lowercase();
    let cleaned = NON_SLUG.replace_all(lower.trim(), "");
    let dashed = WHITESPACE.replace_all(&cleaned, "-");
    DASH_RUNS.replace_all(&dashed, "-").into_owned()
}

const TOKEN_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Random lowercase base36 token of the given length.
pub fn short_token(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| TOKEN_CHARSET[rng.gen_range(0..TOKEN_CHARSET.len())] as char)
        .collect()
}

/// Random uppercase base36 token, used for order and customer ids.
pub fn short_token_upper(len: usize) -> String {
    short_token(len).to_ascii_uppercase()
}
