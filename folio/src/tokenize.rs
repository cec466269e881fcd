// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Splitting paragraph text into atomic breakable units.

/// Punctuation that may trail a word and still belong to its token.
fn is_trailing_punctuation(ch: char) -> bool {
    matches!(
        ch,
        '.' | ',' | '!' | '?' | ';' | ':' | '\'' | '"' | ')' | ']'
    )
}

/// Punctuation that ends a sentence or clause, forcing a break opportunity.
fn is_clause_punctuation(ch: char) -> bool {
    matches!(ch, '.' | ',' | '!' | '?' | ';' | ':')
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
}

/// One breakable unit of a paragraph, prior to measurement.
///
/// Positions are absolute byte offsets into the document buffer, always on
/// `char` boundaries. The content range is `[source_start, content_end)` and
/// any trailing whitespace occupies `[content_end, source_end)`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TokenSeed {
    /// Start of the token's span.
    pub source_start: usize,
    /// End of the token's visible content / start of trailing whitespace.
    pub content_end: usize,
    /// End of the token's span, trailing whitespace included.
    pub source_end: usize,
    /// Whether a line break is allowed after this token.
    pub break_after: bool,
}

/// Splits paragraph text into token seeds.
///
/// Pure and deterministic: the emitted spans cover `text` exactly once, in
/// order, with no gaps or overlaps. `source_start` is the absolute position
/// of `text` within the document buffer and is added to every emitted span.
///
/// Classification, in priority order:
/// - a tab is its own one-character token;
/// - a run of spaces is its own token;
/// - a run of ASCII alphanumerics plus any immediately trailing punctuation
///   is one content token, with any following spaces as its trailing
///   whitespace;
/// - a run of punctuation not preceded by a word is a content token, again
///   with following spaces as trailing whitespace;
/// - any other single character is its own token.
pub fn tokenize(text: &str, source_start: usize) -> Vec<TokenSeed> {
    let bytes = text.len();
    let mut seeds = Vec::new();
    let mut iter = text.char_indices().peekable();

    while let Some((start, ch)) = iter.next() {
        if ch == '\t' {
            seeds.push(TokenSeed {
                source_start: source_start + start,
                content_end: source_start + start + 1,
                source_end: source_start + start + 1,
                break_after: true,
            });
            continue;
        }

        if ch == ' ' {
            let mut end = start + 1;
            while let Some(&(next, ' ')) = iter.peek() {
                end = next + 1;
                iter.next();
            }
            seeds.push(TokenSeed {
                source_start: source_start + start,
                content_end: source_start + end,
                source_end: source_start + end,
                break_after: true,
            });
            continue;
        }

        if is_word_char(ch) || is_trailing_punctuation(ch) {
            let mut end = start + ch.len_utf8();
            if is_word_char(ch) {
                while let Some(&(next, c)) = iter.peek() {
                    if !is_word_char(c) {
                        break;
                    }
                    end = next + c.len_utf8();
                    iter.next();
                }
            }
            while let Some(&(next, c)) = iter.peek() {
                if !is_trailing_punctuation(c) {
                    break;
                }
                end = next + c.len_utf8();
                iter.next();
            }
            let content_end = end;
            while let Some(&(next, ' ')) = iter.peek() {
                end = next + 1;
                iter.next();
            }
            let last_content = text[..content_end].chars().next_back();
            let break_after = if is_word_char(ch) {
                end > content_end || last_content.is_some_and(is_clause_punctuation)
            } else {
                // A bare punctuation run always allows a break.
                true
            };
            seeds.push(TokenSeed {
                source_start: source_start + start,
                content_end: source_start + content_end,
                source_end: source_start + end,
                break_after,
            });
            continue;
        }

        // Anything else (non-ASCII word characters, symbols) is one token
        // per character.
        seeds.push(TokenSeed {
            source_start: source_start + start,
            content_end: source_start + start + ch.len_utf8(),
            source_end: source_start + start + ch.len_utf8(),
            break_after: true,
        });
    }

    debug_assert!(
        seeds
            .windows(2)
            .all(|pair| pair[0].source_end == pair[1].source_start),
        "token seeds must tile the input"
    );
    debug_assert!(seeds.last().map_or(bytes == 0, |seed| seed.source_end
        == source_start + bytes));

    seeds
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(text: &'a str, seeds: &[TokenSeed]) -> Vec<&'a str> {
        seeds
            .iter()
            .map(|seed| &text[seed.source_start..seed.source_end])
            .collect()
    }

    fn contents<'a>(text: &'a str, seeds: &[TokenSeed]) -> Vec<&'a str> {
        seeds
            .iter()
            .map(|seed| &text[seed.source_start..seed.content_end])
            .collect()
    }

    #[test]
    fn groups_latin_words_and_attaches_trailing_spaces() {
        let text = "hello world ";
        let seeds = tokenize(text, 0);
        assert_eq!(texts(text, &seeds), vec!["hello ", "world "]);
        assert!(seeds.iter().all(|seed| seed.break_after));
    }

    #[test]
    fn attaches_punctuation_to_the_previous_word() {
        let text = "hello, world!";
        let seeds = tokenize(text, 0);
        assert_eq!(contents(text, &seeds), vec!["hello,", "world!"]);
        assert!(seeds.iter().all(|seed| seed.break_after));
    }

    #[test]
    fn keeps_leading_spaces_as_their_own_token() {
        let text = "  hello";
        let seeds = tokenize(text, 0);
        assert_eq!(texts(text, &seeds), vec!["  ", "hello"]);
        assert_eq!(contents(text, &seeds)[0], "  ");
        assert!(!seeds[1].break_after);
    }

    #[test]
    fn keeps_tabs_as_standalone_breakable_units() {
        let text = "\thello";
        let seeds = tokenize(text, 0);
        assert_eq!(texts(text, &seeds), vec!["\t", "hello"]);
        assert!(seeds[0].break_after);
    }

    #[test]
    fn bare_punctuation_takes_following_spaces_as_trailing_whitespace() {
        let text = "... next";
        let seeds = tokenize(text, 0);
        assert_eq!(contents(text, &seeds), vec!["...", "next"]);
        assert_eq!(texts(text, &seeds), vec!["... ", "next"]);
    }

    #[test]
    fn unknown_characters_fall_back_to_single_char_tokens() {
        let text = "a→b";
        let seeds = tokenize(text, 0);
        assert_eq!(texts(text, &seeds), vec!["a", "→", "b"]);
    }

    #[test]
    fn spans_tile_the_input_with_an_offset() {
        let text = "ab cd.\tx";
        let seeds = tokenize(text, 100);
        assert_eq!(seeds[0].source_start, 100);
        assert_eq!(seeds.last().unwrap().source_end, 100 + text.len());
        for pair in seeds.windows(2) {
            assert_eq!(pair[0].source_end, pair[1].source_start);
        }
    }

    #[test]
    fn clause_punctuation_marks_a_break_even_without_trailing_space() {
        let seeds = tokenize("end.", 0);
        assert_eq!(seeds.len(), 1);
        assert!(seeds[0].break_after);
        let seeds = tokenize("mid", 0);
        assert!(!seeds[0].break_after);
    }
}
