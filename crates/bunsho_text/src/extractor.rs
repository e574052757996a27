use std::ops::Range;

use crate::SymbolTable;

/// Splits decoration-free text into sentence spans.
///
/// The boundary algorithm is shared by every dialect; only the characters it
/// reacts to come from the [`SymbolTable`].
#[derive(Debug, Clone)]
pub struct SentenceExtractor {
    terminators: Vec<char>,
    /// (open, close) pairs that suppress boundaries while open.
    pairs: Vec<(char, char)>,
    /// Closing quotes kept with the sentence when they follow a terminator.
    closing_quotes: Vec<char>,
    abbreviations: Vec<Vec<char>>,
}

impl SentenceExtractor {
    /// Creates an extractor from a symbol table.
    pub fn new(table: &SymbolTable) -> Self {
        let quotes = table.quotation_pairs();
        let mut pairs: Vec<(char, char)> = quotes
            .iter()
            .copied()
            // The ASCII apostrophe appears inside words and cannot be tracked.
            .filter(|(open, close)| !(*open == '\'' && *close == '\''))
            .collect();
        pairs.extend(table.parenthesis_pairs());

        let mut closing_quotes: Vec<char> = quotes.iter().map(|(_, close)| *close).collect();
        closing_quotes.extend(['”', '’']);
        closing_quotes.dedup();

        Self {
            terminators: table.terminators(),
            pairs,
            closing_quotes,
            abbreviations: table
                .abbreviations()
                .iter()
                .map(|a| a.chars().collect())
                .collect(),
        }
    }

    /// Returns true if `c` ends a sentence.
    #[inline]
    pub fn is_terminator(&self, c: char) -> bool {
        self.terminators.contains(&c)
    }

    /// Returns sentence spans as character index ranges.
    ///
    /// Spans are ordered, non-overlapping and cover the whole input. Empty
    /// input yields no span; any other input yields at least one.
    pub fn extract(&self, text: &str) -> Vec<Range<usize>> {
        let chars: Vec<char> = text.chars().collect();
        self.extract_chars(&chars)
    }

    /// Same as [`extract`](Self::extract) over pre-decoded characters.
    pub fn extract_chars(&self, chars: &[char]) -> Vec<Range<usize>> {
        let n = chars.len();
        let mut spans = Vec::new();
        if n == 0 {
            return spans;
        }

        let (depth, matched_closer) = self.nesting(chars);
        let protected = self.abbreviation_mask(chars);

        let mut start = 0;
        let mut i = 0;
        while i < n {
            if !self.is_boundary_candidate(chars, i, &protected) {
                i += 1;
                continue;
            }

            let mut end = i + 1;
            while end < n && self.is_terminator(chars[end]) {
                end += 1;
            }

            let boundary = if depth[i] == 0 {
                while end < n && self.closing_quotes.contains(&chars[end]) {
                    end += 1;
                }
                Some(end)
            } else {
                // Inside quotes or parentheses: the sentence ends only if the
                // closers right after the terminator bring the depth to zero.
                let mut j = end;
                while j < n && matched_closer[j] {
                    j += 1;
                }
                (j > end && depth[j - 1] == 0).then_some(j)
            };

            match boundary {
                Some(b) => {
                    spans.push(start..b);
                    start = b;
                    i = b;
                }
                None => i = end,
            }
        }

        if start < n {
            let tail_is_blank = chars[start..].iter().all(|c| c.is_whitespace());
            match spans.last_mut() {
                Some(last) if tail_is_blank => last.end = n,
                _ => spans.push(start..n),
            }
        }

        spans
    }

    fn is_boundary_candidate(&self, chars: &[char], i: usize, protected: &[bool]) -> bool {
        let c = chars[i];
        if !self.is_terminator(c) || protected[i] {
            return false;
        }
        // A period between digits is a decimal separator.
        let between_digits = i > 0
            && chars[i - 1].is_ascii_digit()
            && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
        !between_digits
    }

    /// Computes, for every index, how many matched pairs strictly enclose
    /// it, and whether the index is the closer of a matched pair.
    ///
    /// Unmatched openers are ignored so that a stray parenthesis does not
    /// swallow the rest of the block.
    fn nesting(&self, chars: &[char]) -> (Vec<u32>, Vec<bool>) {
        let n = chars.len();
        let mut stack: Vec<(char, usize)> = Vec::new();
        let mut matched: Vec<(usize, usize)> = Vec::new();

        for (i, &c) in chars.iter().enumerate() {
            // Closing takes precedence so that symmetric quotes toggle.
            if let Some(pos) = stack.iter().rposition(|(close, _)| *close == c) {
                let (_, open_idx) = stack[pos];
                stack.truncate(pos);
                matched.push((open_idx, i));
                continue;
            }
            if let Some((_, close)) = self.pairs.iter().find(|(open, _)| *open == c) {
                stack.push((*close, i));
            }
        }

        let mut delta = vec![0i64; n + 1];
        let mut matched_closer = vec![false; n];
        for (open, close) in matched {
            delta[open + 1] += 1;
            delta[close] -= 1;
            matched_closer[close] = true;
        }

        let mut depth = Vec::with_capacity(n);
        let mut running = 0i64;
        for d in delta.iter().take(n) {
            running += d;
            depth.push(running.max(0) as u32);
        }
        (depth, matched_closer)
    }

    /// Marks terminator characters that belong to a known abbreviation.
    fn abbreviation_mask(&self, chars: &[char]) -> Vec<bool> {
        let mut mask = vec![false; chars.len()];
        for abbr in &self.abbreviations {
            if abbr.is_empty() || abbr.len() > chars.len() {
                continue;
            }
            for start in 0..=(chars.len() - abbr.len()) {
                if chars[start..start + abbr.len()] != abbr[..] {
                    continue;
                }
                let at_word_start = start == 0 || !chars[start - 1].is_alphanumeric();
                if at_word_start {
                    mask[start..start + abbr.len()].fill(true);
                }
            }
        }
        mask
    }
}

impl Default for SentenceExtractor {
    fn default() -> Self {
        Self::new(&SymbolTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn split(extractor: &SentenceExtractor, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        extractor
            .extract(text)
            .into_iter()
            .map(|r| chars[r].iter().collect())
            .collect()
    }

    fn english() -> SentenceExtractor {
        SentenceExtractor::default()
    }

    fn japanese() -> SentenceExtractor {
        SentenceExtractor::new(&SymbolTable::for_language("ja"))
    }

    #[test]
    fn test_split_five_sentences() {
        let text = "Tokyu is a good railway company. The company is reliable. \
                    In addition it is rich. I like the company. However someone does not like it.";
        let sentences = split(&english(), text);

        assert_eq!(sentences.len(), 5);
        assert_eq!(sentences[0], "Tokyu is a good railway company.");
        assert_eq!(sentences[1], " The company is reliable.");
        assert_eq!(sentences[4], " However someone does not like it.");
    }

    #[test]
    fn test_ellipsis_is_single_sentence() {
        assert_eq!(split(&english(), "..."), vec!["..."]);
    }

    #[test]
    fn test_ellipsis_run_collapses() {
        assert_eq!(
            split(&english(), "Wait... What?! Yes."),
            vec!["Wait...", " What?!", " Yes."]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(english().extract("").is_empty());
    }

    #[test]
    fn test_unterminated_tail() {
        assert_eq!(
            split(&english(), "First. second without period"),
            vec!["First.", " second without period"]
        );
    }

    #[test]
    fn test_whitespace_tail_merges_into_last_span() {
        assert_eq!(split(&english(), "Done.   "), vec!["Done.   "]);
    }

    #[test]
    fn test_whitespace_only_input_is_one_span() {
        assert_eq!(english().extract("  "), vec![0..2]);
    }

    #[rstest]
    #[case::decimal("It costs 1.5 dollars. Cheap.", 2)]
    #[case::version_after_abbreviation("This is ver.1.0. Next.", 2)]
    #[case::abbreviation("Mr. Smith is here. Hello.", 2)]
    #[case::latin("Fruits, e.g. apples, are good. Yes.", 2)]
    #[case::abbreviation_needs_word_start("Draw on the canvs. Hello.", 2)]
    fn test_guards(#[case] text: &str, #[case] expected: usize) {
        assert_eq!(english().extract(text).len(), expected, "{text}");
    }

    #[test]
    fn test_terminator_inside_parentheses() {
        assert_eq!(
            split(&english(), "He left (see p. 3. ok) today. Then."),
            vec!["He left (see p. 3. ok) today.", " Then."]
        );
    }

    #[test]
    fn test_quote_consumed_after_terminator() {
        assert_eq!(
            split(&english(), "He said \"Stop.\" Then he left."),
            vec!["He said \"Stop.\"", " Then he left."]
        );
    }

    #[test]
    fn test_parenthesized_sentence_ends_after_closer() {
        assert_eq!(
            split(&english(), "(This is aside.) Main text."),
            vec!["(This is aside.)", " Main text."]
        );
    }

    #[test]
    fn test_unmatched_opener_does_not_swallow_block() {
        assert_eq!(
            split(&english(), "A (stray one. Next one."),
            vec!["A (stray one.", " Next one."]
        );
    }

    #[test]
    fn test_unmatched_closing_quote_is_consumed() {
        assert_eq!(split(&english(), "End.” Next."), vec!["End.”", " Next."]);
    }

    #[test]
    fn test_japanese() {
        assert_eq!(
            split(&japanese(), "こんにちは。世界。"),
            vec!["こんにちは。", "世界。"]
        );
    }

    #[test]
    fn test_japanese_quotes() {
        assert_eq!(
            split(&japanese(), "彼は「はい。そうです」と言った。次の文。"),
            vec!["彼は「はい。そうです」と言った。", "次の文。"]
        );
    }

    #[test]
    fn test_japanese_quote_closing_sentence() {
        assert_eq!(
            split(&japanese(), "「行こう。」彼は歩いた。"),
            vec!["「行こう。」", "彼は歩いた。"]
        );
    }

    #[test]
    fn test_japanese_consecutive_marks() {
        assert_eq!(
            split(&japanese(), "すごい！！本当に？"),
            vec!["すごい！！", "本当に？"]
        );
    }

    #[test]
    fn test_spans_cover_input() {
        let text = "One. Two! Three? Four";
        let spans = english().extract(text);
        assert_eq!(spans.first().unwrap().start, 0);
        assert_eq!(spans.last().unwrap().end, text.chars().count());
        for pair in spans.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }
}
