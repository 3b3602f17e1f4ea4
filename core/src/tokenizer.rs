use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Kanji, hiragana, katakana and ASCII alphanumerics each form their own runs.
    static ref RE: Regex = Regex::new(
        r"[\x{4E00}-\x{9FAF}]+|[\x{3040}-\x{309F}]+|[\x{30A0}-\x{30FF}]+|[a-zA-Z0-9]+"
    )
    .expect("valid regex");
}

/// Split text into lowercase terms by script runs.
///
/// There is no dictionary: a run of adjacent kanji is a single term however
/// long it is. Anything outside the four classes (punctuation, whitespace,
/// full-width symbols) separates terms. Duplicates are kept in source order.
pub fn tokenize(text: &str) -> Vec<String> {
    RE.find_iter(text)
        .map(|m| m.as_str().to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_script_boundaries() {
        let t = tokenize("半導体装置の製造方法");
        assert_eq!(t, vec!["半導体装置", "の", "製造方法"]);
    }

    #[test]
    fn empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("、。！？　 ").is_empty());
    }
}
