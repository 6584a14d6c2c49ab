use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Zero-width non-joiner, the Persian half-space.
pub const ZWNJ: char = '\u{200C}';

/// Anything outside the Arabic block, whitespace, digits, word characters
/// and the half-space is replaced with a plain space before normalization.
static DISALLOWED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\u{0600}-\u{06FF}\s\d\w\u{200C}]").expect("disallowed-character class")
});

/// Verbal prefixes glued to the following word with a half-space.
const PREFIXES: &[&str] = &["می", "نمی"];

/// Suffixes glued to the preceding word with a half-space.
const SUFFIXES: &[&str] = &["ها", "های", "هایی", "تر", "ترین"];

/// Switches for the Persian normalizer. All enabled by default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Map ASCII digits to Persian digits.
    pub persian_numbers: bool,
    /// Drop Arabic diacritics, tatweel and the zero-width joiner.
    pub remove_diacritics: bool,
    /// Attach verbal prefixes and plural/comparative suffixes with a half-space.
    pub correct_spacing: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            persian_numbers: true,
            remove_diacritics: true,
            correct_spacing: true,
        }
    }
}

/// Canonicalizes Persian character variants, digits and spacing.
#[derive(Debug, Clone, Default)]
pub struct PersianNormalizer {
    config: NormalizerConfig,
}

impl PersianNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize `text`. The result is space-separated with no leading or
    /// trailing whitespace.
    pub fn normalize(&self, text: &str) -> String {
        let mapped: String = text.chars().filter_map(|c| self.map_char(c)).collect();

        let tokens: Vec<String> = mapped.split_whitespace().filter_map(trim_zwnj).collect();
        let tokens = if self.config.correct_spacing {
            attach_affixes(tokens)
        } else {
            tokens
        };

        tokens.join(" ")
    }

    fn map_char(&self, c: char) -> Option<char> {
        match c {
            // Arabic kaf
            '\u{0643}' => Some('\u{06A9}'),
            // Arabic yeh, alef maksura, yeh barree
            '\u{064A}' | '\u{0649}' | '\u{06D2}' => Some('\u{06CC}'),
            // heh doachashmee, ae, heh goal
            '\u{06BE}' | '\u{06D5}' | '\u{06C1}' => Some('\u{0647}'),
            // Arabic-Indic digits
            '\u{0660}'..='\u{0669}' => shift_digit(c, '\u{0660}'),
            '0'..='9' if self.config.persian_numbers => shift_digit(c, '0'),
            '\u{064B}'..='\u{0652}' | '\u{0640}' | '\u{200D}' if self.config.remove_diacritics => {
                None
            }
            _ => Some(c),
        }
    }
}

fn shift_digit(c: char, zero: char) -> Option<char> {
    char::from_u32(0x06F0 + (c as u32 - zero as u32))
}

/// Strip half-spaces from the token edges and collapse runs of them.
fn trim_zwnj(token: &str) -> Option<String> {
    let parts: Vec<&str> = token.split(ZWNJ).filter(|part| !part.is_empty()).collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\u{200C}"))
    }
}

fn attach_affixes(tokens: Vec<String>) -> Vec<String> {
    let mut joined: Vec<String> = Vec::with_capacity(tokens.len());
    let mut attach_next = false;

    for token in tokens {
        match joined.last_mut() {
            Some(last) if attach_next || SUFFIXES.contains(&token.as_str()) => {
                last.push(ZWNJ);
                last.push_str(&token);
                attach_next = false;
            }
            _ => {
                attach_next = PREFIXES.contains(&token.as_str());
                joined.push(token);
            }
        }
    }

    joined
}

/// Filters text down to the allowed character set and normalizes it.
#[derive(Debug, Clone, Default)]
pub struct TextCleaner {
    normalizer: PersianNormalizer,
}

impl TextCleaner {
    pub fn new(config: NormalizerConfig) -> Self {
        Self {
            normalizer: PersianNormalizer::new(config),
        }
    }

    /// Total, deterministic and idempotent: `clean(clean(s)) == clean(s)`.
    pub fn clean(&self, raw: &str) -> String {
        let filtered = DISALLOWED.replace_all(raw, " ");
        let normalized = self.normalizer.normalize(&filtered);
        normalized.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Clean `raw` with the default normalizer settings.
pub fn clean_text(raw: &str) -> String {
    TextCleaner::default().clean(raw)
}
