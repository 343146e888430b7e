//! Line parser for CPC title list files.
//!
//! A line is `CODE [LEVEL] TITLE`: the code is a maximal run of uppercase
//! letters, digits and `/`; the level is an optional run of digits between
//! code and title. A line without a level token starts a new section.

use regex::Regex;

/// One interpreted input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// Section heading without a level marker. Resets ancestor tracking.
    Section { code: String, title: String },
    /// Entry with an explicit indentation level.
    Entry {
        code: String,
        level: usize,
        title: String,
    },
}

impl Record {
    pub fn code(&self) -> &str {
        match self {
            Record::Section { code, .. } => code,
            Record::Entry { code, .. } => code,
        }
    }
}

/// Outcome of classifying a single raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Record(Record),
    /// Empty or whitespace-only line, skipped silently.
    Blank,
    /// Line that does not match the grammar; the caller reports a warning.
    Unrecognized,
}

pub struct LineParser {
    line_regex: Regex,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser {
    pub fn new() -> Self {
        Self {
            // The level group requires trailing whitespace, so digits at the
            // end of a line fold into the title rather than forming a level.
            line_regex: Regex::new(r"^(?P<code>[A-Z0-9/]+)\s+(?:(?P<level>\d+)\s+)?(?P<title>.*)$")
                .unwrap(),
        }
    }

    pub fn parse(&self, line: &str) -> ParseOutcome {
        let line = line.trim();
        if line.is_empty() {
            return ParseOutcome::Blank;
        }

        let Some(caps) = self.line_regex.captures(line) else {
            return ParseOutcome::Unrecognized;
        };

        let code = caps["code"].to_string();
        let title = caps["title"].trim().to_string();

        match caps.name("level") {
            Some(level) => match level.as_str().parse::<usize>() {
                Ok(level) => ParseOutcome::Record(Record::Entry { code, level, title }),
                Err(_) => ParseOutcome::Unrecognized,
            },
            None => ParseOutcome::Record(Record::Section { code, title }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(line: &str) -> ParseOutcome {
        LineParser::new().parse(line)
    }

    #[test]
    fn test_section_line_has_no_level() {
        assert_eq!(
            parse("A01B\tSOIL WORKING IN AGRICULTURE OR FORESTRY"),
            ParseOutcome::Record(Record::Section {
                code: "A01B".to_string(),
                title: "SOIL WORKING IN AGRICULTURE OR FORESTRY".to_string(),
            })
        );
    }

    #[test]
    fn test_entry_line_with_level() {
        assert_eq!(
            parse("A01B1/00 1  Hand tools"),
            ParseOutcome::Record(Record::Entry {
                code: "A01B1/00".to_string(),
                level: 1,
                title: "Hand tools".to_string(),
            })
        );
    }

    #[test]
    fn test_level_with_leading_zero() {
        assert_eq!(
            parse("A01B3/00 02 Ploughs with fixed plough-shares"),
            ParseOutcome::Record(Record::Entry {
                code: "A01B3/00".to_string(),
                level: 2,
                title: "Ploughs with fixed plough-shares".to_string(),
            })
        );
    }

    #[test]
    fn test_trailing_digits_fold_into_title() {
        // No whitespace after the digits, so they are a title, not a level.
        assert_eq!(
            parse("A01B 1"),
            ParseOutcome::Record(Record::Section {
                code: "A01B".to_string(),
                title: "1".to_string(),
            })
        );
    }

    #[test]
    fn test_numeric_title_prefix_becomes_level() {
        // Maximal-munch grammar: a digit run after the code is a level even
        // when a human might read it as part of the title.
        assert_eq!(
            parse("A 01 Human Necessities"),
            ParseOutcome::Record(Record::Entry {
                code: "A".to_string(),
                level: 1,
                title: "Human Necessities".to_string(),
            })
        );
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(
            parse("  A01  0   Agriculture  "),
            ParseOutcome::Record(Record::Entry {
                code: "A01".to_string(),
                level: 0,
                title: "Agriculture".to_string(),
            })
        );
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t")]
    fn test_blank_lines_are_skipped(#[case] line: &str) {
        assert_eq!(parse(line), ParseOutcome::Blank);
    }

    #[rstest]
    #[case("lowercase title only")]
    #[case("A01B")] // code with no separator and no title
    #[case("- decorative rule -")]
    fn test_unrecognized_lines(#[case] line: &str) {
        assert_eq!(parse(line), ParseOutcome::Unrecognized);
    }

    #[test]
    fn test_oversized_level_is_unrecognized() {
        assert_eq!(
            parse("A01B 99999999999999999999999999 title"),
            ParseOutcome::Unrecognized
        );
    }

    #[test]
    fn test_code_with_slash() {
        let outcome = parse("A01B1/00 2  Ploughs");
        match outcome {
            ParseOutcome::Record(record) => assert_eq!(record.code(), "A01B1/00"),
            other => panic!("expected record, got {:?}", other),
        }
    }
}
