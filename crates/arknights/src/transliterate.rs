//! Pinyin pseudo-locales for Chinese names.

use pinyin::ToPinyin;

/// Written form of `ü` in toneless pinyin (`lv`, `nv`).
const U_UMLAUT_REPLACEMENT: &str = "v";

/// Full toneless pinyin, syllables concatenated, `ü` written as `v`.
/// Characters without a reading are kept as they are.
///
/// Each character takes its most common reading; heteronyms are not
/// resolved from the surrounding word.
pub fn full_pinyin(name: &str) -> String {
    name.chars()
        .map(|c| match c.to_pinyin() {
            Some(p) => p.plain().replace('ü', U_UMLAUT_REPLACEMENT),
            None => c.to_string(),
        })
        .collect()
}

/// Initial letter of each syllable. Characters without a reading are kept.
pub fn pinyin_initials(name: &str) -> String {
    name.chars()
        .map(|c| match c.to_pinyin() {
            Some(p) => p.first_letter().to_string(),
            None => c.to_string(),
        })
        .collect()
}
