//! Text normalization for recognizer output

use regex::Regex;

use crate::config::TranscriptConfig;

/// Cleans raw recognizer text: optional filler removal plus
/// whitespace/punctuation normalization.
///
/// `clean` is pure and idempotent: `clean(clean(x)) == clean(x)`.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    remove_fillers: bool,
    filler: Regex,
    spaces: Regex,
    space_before_punct: Regex,
}

impl TextNormalizer {
    pub fn new(config: &TranscriptConfig) -> Self {
        Self {
            remove_fillers: config.remove_fillers,
            // Whole-word fillers, letter repeats allowed ("ummm"), swallowing
            // any trailing comma/period/whitespace run.
            filler: Regex::new(r"(?i)\b(?:um+|uh+|hmm+|erm+|eh+)\b[,.\s]*").unwrap(),
            spaces: Regex::new(r"\s+").unwrap(),
            space_before_punct: Regex::new(r"\s+([,.;:!?])").unwrap(),
        }
    }

    /// Normalize a raw transcript fragment
    pub fn clean(&self, raw: &str) -> String {
        let mut text = raw.trim().to_string();

        if self.remove_fillers {
            text = self.filler.replace_all(&text, "").into_owned();
        }

        text = self.spaces.replace_all(&text, " ").into_owned();
        text = self.space_before_punct.replace_all(&text, "$1").into_owned();

        text.trim().to_string()
    }

    /// Whether filler removal is active
    pub fn removes_fillers(&self) -> bool {
        self.remove_fillers
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(&TranscriptConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer(remove_fillers: bool) -> TextNormalizer {
        TextNormalizer::new(&TranscriptConfig { remove_fillers })
    }

    #[test]
    fn test_removes_fillers() {
        let n = normalizer(true);
        assert_eq!(n.clean("um, I think uhhh this works"), "I think this works");
        assert_eq!(n.clean("hmm ok"), "ok");
        assert_eq!(n.clean("so ermmm, yes"), "so yes");
    }

    #[test]
    fn test_keeps_fillers_when_disabled() {
        let n = normalizer(false);
        assert_eq!(
            n.clean("um, I think this works"),
            "um, I think this works"
        );
    }

    #[test]
    fn test_fillers_inside_words_survive() {
        let n = normalizer(true);
        assert_eq!(n.clean("the yummy summer umbrella"), "the yummy summer umbrella");
    }

    #[test]
    fn test_collapses_whitespace() {
        let n = normalizer(true);
        assert_eq!(n.clean("  hello   world\t again "), "hello world again");
    }

    #[test]
    fn test_space_before_punctuation() {
        let n = normalizer(true);
        assert_eq!(n.clean("hello , world ."), "hello, world.");
        assert_eq!(n.clean("really ?  yes !"), "really? yes!");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "   ",
            "um, I think uhhh this works",
            "hello , world .",
            "plain text",
            "Umm...   so, like , hmm yeah",
            "tabs\tand\nnewlines",
        ];
        for n in [normalizer(true), normalizer(false)] {
            for s in samples {
                let once = n.clean(s);
                assert_eq!(n.clean(&once), once, "not idempotent for {:?}", s);
            }
        }
    }

    #[test]
    fn test_empty_input() {
        let n = normalizer(true);
        assert_eq!(n.clean(""), "");
        assert_eq!(n.clean("   \t "), "");
        assert_eq!(n.clean("um,"), "");
    }
}
