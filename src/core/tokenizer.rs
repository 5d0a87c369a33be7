// src/core/tokenizer.rs
use crate::core::types::{SessionCounters, Token};
use crate::error::{ConversionError, EmptyInputKind};

/// Punctuation that ends a word, in addition to whitespace.
pub const WORD_SEPARATORS: [char; 6] = [',', '.', '!', '?', ';', ':'];

/// Whitespace as browsers define it for text input: Unicode `White_Space`
/// without NEXT LINE (U+0085), plus the byte-order mark (U+FEFF).
pub fn is_space(c: char) -> bool {
    c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}')
}

pub fn is_separator(c: char) -> bool {
    is_space(c) || WORD_SEPARATORS.contains(&c)
}

/// Splits raw input into the words that get converted.
/// Runs of whitespace and `, . ! ? ; :` form a single boundary.
pub fn tokenize(raw: &str) -> Result<Vec<Token>, ConversionError> {
    let text = raw.trim_matches(is_space);
    if text.is_empty() {
        return Err(ConversionError::EmptyInput(EmptyInputKind::Blank));
    }

    let tokens: Vec<Token> = text
        .split(is_separator)
        .filter(|word| !word.is_empty())
        .enumerate()
        .map(|(index, word)| Token::new(index, word))
        .collect();

    if tokens.is_empty() {
        return Err(ConversionError::EmptyInput(EmptyInputKind::NoWords));
    }
    Ok(tokens)
}

/// Counts shown beside the input box. Words are split on whitespace only,
/// so `"hi,there"` is one word here but two words for `tokenize`.
pub fn count(raw: &str) -> SessionCounters {
    let text = raw.trim_matches(is_space);
    SessionCounters {
        words: text.split(is_space).filter(|w| !w.is_empty()).count(),
        letters: text.chars().filter(|&c| !is_space(c)).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(raw: &str) -> Vec<String> {
        tokenize(raw)
            .unwrap()
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn splits_on_whitespace_and_punctuation() {
        assert_eq!(words("Hi there"), vec!["Hi", "there"]);
        assert_eq!(
            words("  Hello, world!! How are\tyou?\n"),
            vec!["Hello", "world", "How", "are", "you"]
        );
        assert_eq!(words("a;b:c.d"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn indexes_follow_word_order() {
        let tokens = tokenize("one, two three").unwrap();
        let indexes: Vec<usize> = tokens.iter().map(|t| t.index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
    }

    #[test]
    fn tokens_never_contain_separators() {
        let samples = ["x,,y", " .a. ", "مرحبا، بك!", "tab\tsep\nline", "q?!r;;s::t"];
        for raw in samples {
            for token in tokenize(raw).unwrap() {
                assert!(!token.is_empty());
                assert!(!token.text.chars().any(is_separator), "{:?}", token.text);
            }
        }
    }

    #[test]
    fn other_punctuation_stays_in_the_word() {
        assert_eq!(words("don't stop-now"), vec!["don't", "stop-now"]);
    }

    #[test]
    fn whitespace_only_is_blank() {
        assert_eq!(
            tokenize("   "),
            Err(ConversionError::EmptyInput(EmptyInputKind::Blank))
        );
        assert_eq!(
            tokenize(""),
            Err(ConversionError::EmptyInput(EmptyInputKind::Blank))
        );
    }

    #[test]
    fn separators_only_is_no_words() {
        assert_eq!(
            tokenize(" ?!. "),
            Err(ConversionError::EmptyInput(EmptyInputKind::NoWords))
        );
    }

    #[test]
    fn counters_exclude_whitespace() {
        assert_eq!(count("one two  three"), SessionCounters { words: 3, letters: 11 });
        assert_eq!(count("   "), SessionCounters::default());
    }

    #[test]
    fn counters_keep_punctuation() {
        // Differs from `tokenize`, which sees two words here.
        assert_eq!(count("hi,there"), SessionCounters { words: 1, letters: 8 });
        assert_eq!(words("hi,there").len(), 2);
    }

    #[test]
    fn byte_order_mark_separates_words() {
        assert_eq!(words("\u{feff}hi\u{feff}there"), vec!["hi", "there"]);
        assert_eq!(count("hi\u{feff}there"), SessionCounters { words: 2, letters: 7 });
        assert_eq!(
            tokenize("\u{feff}"),
            Err(ConversionError::EmptyInput(EmptyInputKind::Blank))
        );
    }

    #[test]
    fn next_line_is_part_of_the_word() {
        assert_eq!(words("hi\u{85}there"), vec!["hi\u{85}there"]);
        assert_eq!(count("hi\u{85}there"), SessionCounters { words: 1, letters: 8 });
    }

    #[test]
    fn counters_count_chars_not_bytes() {
        assert_eq!(count("أب ت"), SessionCounters { words: 2, letters: 3 });
    }
}
