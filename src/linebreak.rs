//! Unicode line-breaking scanner.
//!
//! Scans a code point sequence and yields ordered break candidates. Each code
//! point is classified into a compact set of UAX #14 line-break classes and
//! pair-wise break/no-break/indirect rules decide opportunities between
//! consecutive code points, with look-back state for spaces and combining
//! marks carried across calls. The sequence always ends with a required break
//! at end-of-text, even when the text has no explicit terminator.

/// Information about a potential line break position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBreak {
    /// The break position, excluding trailing whitespace and break characters.
    /// Measure up to here when fitting the line.
    pub position_measure: usize,
    /// The break position, including trailing whitespace. The next line starts
    /// here.
    pub position_wrap: usize,
    /// True for a mandatory (hard) break, false for a soft-wrap opportunity.
    pub required: bool,
}

impl LineBreak {
    /// Create a new break candidate.
    pub fn new(position_measure: usize, position_wrap: usize, required: bool) -> Self {
        Self {
            position_measure,
            position_wrap,
            required,
        }
    }
}

/// Compact UAX #14 line-break class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BreakClass {
    /// Mandatory break (BK, NL, paragraph/line separators).
    Mandatory,
    /// Carriage return (CR); combines with a following LF.
    CarriageReturn,
    /// Line feed (LF).
    LineFeed,
    /// Breaking space (SP).
    Space,
    /// Zero width space (ZW): break opportunity after.
    ZeroWidthSpace,
    /// Combining marks and joiners (CM/ZWJ): glued to their base.
    CombiningMark,
    /// Non-breaking glue (GL): no break on either side.
    Glue,
    /// Break opportunity after (BA): soft hyphen, thin spaces.
    BreakAfter,
    /// Hyphen (HY).
    Hyphen,
    /// Closing punctuation and separators that forbid a break before them
    /// (CL/CP/EX/IS).
    Close,
    /// Non-starter (NS): small kana, prolonged sound mark.
    NonStarter,
    /// Opening punctuation (OP): no break after, even across spaces.
    Open,
    /// Ambiguous quote (QU).
    Quote,
    /// Ordinary alphabetic and symbol characters (AL).
    Alphabetic,
    /// Decimal digits (NU).
    Numeric,
    /// Ideographs, kana, hangul, emoji (ID): break between any two.
    Ideographic,
}

/// Outcome of the pair-wise rule for two adjacent classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairRule {
    /// Break allowed directly between the pair.
    Direct,
    /// Break allowed only with intervening space.
    Indirect,
    /// No break, even with intervening space.
    Prohibited,
}

fn break_class(ch: char) -> BreakClass {
    use BreakClass::*;
    match ch {
        '\n' => LineFeed,
        '\r' => CarriageReturn,
        '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}' => Mandatory,
        ' ' => Space,
        '\u{200B}' => ZeroWidthSpace,
        '\u{00A0}' | '\u{2007}' | '\u{202F}' | '\u{2060}' | '\u{FEFF}' => Glue,
        '\u{00AD}' | '\u{1680}' | '\u{2000}'..='\u{200A}' | '\u{205F}' => BreakAfter,
        '-' => Hyphen,
        '\u{0300}'..='\u{036F}'
        | '\u{1AB0}'..='\u{1AFF}'
        | '\u{1DC0}'..='\u{1DFF}'
        | '\u{20D0}'..='\u{20FF}'
        | '\u{FE00}'..='\u{FE0F}'
        | '\u{200D}' => CombiningMark,
        '(' | '[' | '{' | '\u{201C}' | '\u{2018}' | '\u{3008}' | '\u{300A}' | '\u{300C}'
        | '\u{300E}' | '\u{3010}' | '\u{3014}' | '\u{FF08}' | '\u{FF3B}' | '\u{FF5B}' => Open,
        ')' | ']' | '}' | ',' | '.' | '!' | '?' | ':' | ';' | '\u{201D}' | '\u{2019}'
        | '\u{3001}' | '\u{3002}' | '\u{3009}' | '\u{300B}' | '\u{300D}' | '\u{300F}'
        | '\u{3011}' | '\u{3015}' | '\u{FF01}' | '\u{FF09}' | '\u{FF0C}' | '\u{FF0E}'
        | '\u{FF1A}' | '\u{FF1B}' | '\u{FF1F}' | '\u{FF3D}' | '\u{FF5D}' | '\u{FF61}'
        | '\u{FF64}' => Close,
        '"' | '\'' => Quote,
        '\u{30FC}' | '\u{3041}' | '\u{3043}' | '\u{3045}' | '\u{3047}' | '\u{3049}'
        | '\u{3063}' | '\u{3083}' | '\u{3085}' | '\u{3087}' | '\u{30A1}' | '\u{30A3}'
        | '\u{30A5}' | '\u{30A7}' | '\u{30A9}' | '\u{30C3}' | '\u{30E3}' | '\u{30E5}'
        | '\u{30E7}' => NonStarter,
        '0'..='9' => Numeric,
        '\u{2E80}'..='\u{303F}'
        | '\u{3040}'..='\u{30FF}'
        | '\u{3100}'..='\u{9FFF}'
        | '\u{A000}'..='\u{A4CF}'
        | '\u{AC00}'..='\u{D7AF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{FF65}'..='\u{FF9F}'
        | '\u{1F000}'..='\u{1FAFF}' => Ideographic,
        _ => Alphabetic,
    }
}

/// Class to assume when the text starts with this character. Leading newlines
/// break immediately after themselves; leading spaces must not produce a break
/// opportunity in front of the first word.
fn map_first(class: BreakClass) -> BreakClass {
    use BreakClass::*;
    match class {
        LineFeed => Mandatory,
        Space => Glue,
        other => other,
    }
}

fn pair_rule(before: BreakClass, after: BreakClass) -> PairRule {
    use BreakClass::*;
    use PairRule::*;
    match (before, after) {
        // Glued characters: no break before a combining mark or glue, no
        // break after glue, no break before ZWSP.
        (_, CombiningMark) | (_, Glue) | (Glue, _) | (_, ZeroWidthSpace) => Prohibited,
        // Break after a zero width space.
        (ZeroWidthSpace, _) => Direct,
        // No break after opening punctuation, even across spaces.
        (Open, _) => Prohibited,
        // No break before closers, separators and non-starters.
        (_, Close) | (_, NonStarter) => Prohibited,
        // A quote glues to a following opener.
        (Quote, Open) => Prohibited,
        // Break after hyphens and break-after characters.
        (Hyphen, Alphabetic | Ideographic | Quote) | (BreakAfter, _) => Direct,
        // Keep hyphenated numbers together.
        (Hyphen, Numeric) => Prohibited,
        // Ideographs break freely against ideographs and ordinary text.
        (Ideographic, Ideographic | Alphabetic | Numeric | Quote | Open) => Direct,
        (Alphabetic | Numeric | Quote | Close, Ideographic) => Direct,
        // Everything else only breaks across spaces.
        _ => Indirect,
    }
}

/// Lazily yields [`LineBreak`] candidates over a code point slice.
///
/// The iterator is restartable by constructing a new scanner over the same
/// slice; a single scanner carries its look-back state across `next` calls.
pub struct LineBreaker<'a> {
    chars: &'a [char],
    pos: usize,
    /// Effective class of the text scanned so far (spaces and combining marks
    /// do not update it).
    cur_class: Option<BreakClass>,
    /// Raw class of the immediately preceding code point.
    last_class: Option<BreakClass>,
    emitted_final: bool,
}

impl<'a> LineBreaker<'a> {
    /// Create a scanner over `chars`.
    pub fn new(chars: &'a [char]) -> Self {
        Self {
            chars,
            pos: 0,
            cur_class: None,
            last_class: None,
            emitted_final: false,
        }
    }

    /// Collect every break candidate. Mostly useful in tests.
    pub fn breaks(text: &str) -> Vec<LineBreak> {
        let chars: Vec<char> = text.chars().collect();
        LineBreaker::new(&chars).collect()
    }

    /// Walk back from `pos` over whitespace and break characters to find the
    /// measure position.
    fn prior_non_whitespace(&self, pos: usize) -> usize {
        use BreakClass::*;
        let mut i = pos;
        while i > 0 {
            match break_class(self.chars[i - 1]) {
                Space | Mandatory | CarriageReturn | LineFeed | ZeroWidthSpace => i -= 1,
                _ => break,
            }
        }
        i
    }

    /// Walk back from `pos` over spaces and zero width spaces only.
    fn prior_non_space(&self, pos: usize) -> usize {
        use BreakClass::*;
        let mut i = pos;
        while i > 0 && matches!(break_class(self.chars[i - 1]), Space | ZeroWidthSpace) {
            i -= 1;
        }
        i
    }
}

impl Iterator for LineBreaker<'_> {
    type Item = LineBreak;

    fn next(&mut self) -> Option<LineBreak> {
        use BreakClass::*;

        if self.cur_class.is_none() && self.pos < self.chars.len() {
            self.cur_class = Some(map_first(break_class(self.chars[self.pos])));
            self.last_class = Some(break_class(self.chars[self.pos]));
            self.pos += 1;
        }

        while self.pos < self.chars.len() {
            let last_pos = self.pos;
            let next_class = break_class(self.chars[self.pos]);
            self.pos += 1;

            let cur = self.cur_class.expect("scanner is primed");

            // Mandatory break after BK/LF/NL or a CR not followed by LF.
            if cur == Mandatory || cur == LineFeed || (cur == CarriageReturn && next_class != LineFeed)
            {
                self.cur_class = Some(map_first(next_class));
                self.last_class = Some(next_class);
                return Some(LineBreak::new(
                    self.prior_non_whitespace(last_pos),
                    last_pos,
                    true,
                ));
            }

            let had_space = self.last_class == Some(Space);
            self.last_class = Some(next_class);

            match next_class {
                // Spaces never produce a break opportunity in front of
                // themselves and leave the effective class untouched.
                Space => continue,
                Mandatory | LineFeed => {
                    self.cur_class = Some(Mandatory);
                    continue;
                }
                CarriageReturn => {
                    self.cur_class = Some(CarriageReturn);
                    continue;
                }
                // Combining marks are transparent.
                CombiningMark => continue,
                _ => {}
            }

            let should_break = match pair_rule(cur, next_class) {
                PairRule::Direct => true,
                PairRule::Indirect => had_space,
                PairRule::Prohibited => false,
            };
            self.cur_class = Some(next_class);

            if should_break {
                return Some(LineBreak::new(self.prior_non_space(last_pos), last_pos, false));
            }
        }

        // Final required break at end-of-text, with or without a terminator.
        if !self.emitted_final {
            self.emitted_final = true;
            let len = self.chars.len();
            return Some(LineBreak::new(self.prior_non_whitespace(len), len, true));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_yields_single_required_break() {
        let breaks = LineBreaker::breaks("");
        assert_eq!(breaks, vec![LineBreak::new(0, 0, true)]);
    }

    #[test]
    fn test_plain_word_ends_with_required_break() {
        let breaks = LineBreaker::breaks("hello");
        assert_eq!(breaks, vec![LineBreak::new(5, 5, true)]);
    }

    #[test]
    fn test_space_separated_words() {
        let breaks = LineBreaker::breaks("foo bar");
        // Soft candidate before "bar": measure excludes the space, wrap
        // includes it.
        assert_eq!(
            breaks,
            vec![LineBreak::new(3, 4, false), LineBreak::new(7, 7, true)]
        );
    }

    #[test]
    fn test_run_of_spaces_belongs_to_previous_line() {
        let breaks = LineBreaker::breaks("a   b");
        assert_eq!(
            breaks,
            vec![LineBreak::new(1, 4, false), LineBreak::new(5, 5, true)]
        );
    }

    #[test]
    fn test_newline_is_required() {
        let breaks = LineBreaker::breaks("ab\ncd");
        assert_eq!(
            breaks,
            vec![LineBreak::new(2, 3, true), LineBreak::new(5, 5, true)]
        );
    }

    #[test]
    fn test_crlf_is_one_break() {
        let breaks = LineBreaker::breaks("ab\r\ncd");
        assert_eq!(
            breaks,
            vec![LineBreak::new(2, 4, true), LineBreak::new(6, 6, true)]
        );
    }

    #[test]
    fn test_paragraph_separator_is_required() {
        let breaks = LineBreaker::breaks("Hello\u{2029}");
        assert_eq!(breaks, vec![LineBreak::new(5, 6, true)]);
    }

    #[test]
    fn test_trailing_newline_does_not_double_break() {
        // The final break at end-of-text coincides with the newline's own
        // mandatory break.
        let breaks = LineBreaker::breaks("ab\n");
        assert_eq!(breaks, vec![LineBreak::new(2, 3, true)]);
    }

    #[test]
    fn test_hyphen_break() {
        let breaks = LineBreaker::breaks("co-op");
        assert_eq!(
            breaks,
            vec![LineBreak::new(3, 3, false), LineBreak::new(5, 5, true)]
        );
    }

    #[test]
    fn test_hyphenated_number_does_not_break() {
        let breaks = LineBreaker::breaks("-42");
        assert_eq!(breaks, vec![LineBreak::new(3, 3, true)]);
    }

    #[test]
    fn test_ideographs_break_between_each_pair() {
        let breaks = LineBreaker::breaks("你好吗");
        assert_eq!(
            breaks,
            vec![
                LineBreak::new(1, 1, false),
                LineBreak::new(2, 2, false),
                LineBreak::new(3, 3, true)
            ]
        );
    }

    #[test]
    fn test_no_break_before_closer_or_after_opener() {
        // "a (b)." admits a break only before the opening parenthesis group.
        let breaks = LineBreaker::breaks("a (b).");
        assert_eq!(
            breaks,
            vec![LineBreak::new(1, 2, false), LineBreak::new(6, 6, true)]
        );
    }

    #[test]
    fn test_combining_mark_is_glued_to_base() {
        // e + combining acute, then a space-separated word.
        let breaks = LineBreaker::breaks("e\u{0301} x");
        assert_eq!(
            breaks,
            vec![LineBreak::new(2, 3, false), LineBreak::new(4, 4, true)]
        );
    }

    #[test]
    fn test_no_break_around_no_break_space() {
        let breaks = LineBreaker::breaks("a\u{00A0}b");
        assert_eq!(breaks, vec![LineBreak::new(3, 3, true)]);
    }

    #[test]
    fn test_zero_width_space_breaks_after() {
        let breaks = LineBreaker::breaks("ab\u{200B}cd");
        assert_eq!(
            breaks,
            vec![LineBreak::new(2, 3, false), LineBreak::new(5, 5, true)]
        );
    }

    #[test]
    fn test_wrap_positions_reconstruct_original() {
        // Splitting at every position_wrap loses and duplicates nothing.
        let text = "The quick\u{00A0}brown fox—你好 jumps\nover the lazy dog.";
        let chars: Vec<char> = text.chars().collect();
        let mut pieces = Vec::new();
        let mut start = 0usize;
        for brk in LineBreaker::new(&chars) {
            assert!(brk.position_measure <= brk.position_wrap);
            assert!(brk.position_wrap >= start);
            pieces.push(chars[start..brk.position_wrap].iter().collect::<String>());
            start = brk.position_wrap;
        }
        assert_eq!(start, chars.len());
        assert_eq!(pieces.concat(), text);
    }

    #[test]
    fn test_scanner_is_restartable() {
        let chars: Vec<char> = "foo bar baz".chars().collect();
        let first: Vec<LineBreak> = LineBreaker::new(&chars).collect();
        let second: Vec<LineBreak> = LineBreaker::new(&chars).collect();
        assert_eq!(first, second);
    }
}
