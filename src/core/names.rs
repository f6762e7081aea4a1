/// Validated analyzer names and titles
///
/// Raw prompt input is turned into typed values here before it is used to
/// build file names, class names or macro guards.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Suffix appended to the base name to form the analyzer class name
pub const ANALYZER_SUFFIX: &str = "Analyzer";

/// Error when an analyzer name cannot be used as an identifier prefix
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("analyzer name is empty")]
    Empty,

    #[error("analyzer name contains '{ch}' at position {position}; only ASCII letters, digits and '_' are allowed")]
    InvalidCharacter { ch: char, position: usize },

    #[error("analyzer name must not start with a digit")]
    LeadingDigit,

    #[error("analyzer name must not end with 'Analyzer'; it is added automatically")]
    RedundantSuffix,
}

/// Error when an analyzer title cannot be used
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TitleError {
    #[error("analyzer title is empty")]
    Empty,

    #[error("analyzer title must be a single line")]
    MultiLine,
}

/// Base name of the new analyzer, e.g. `Gamecube`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerName(String);

impl AnalyzerName {
    /// Validate raw input and build an analyzer name
    ///
    /// Surrounding whitespace is ignored. The name becomes a C++ class name
    /// prefix and an upper-cased macro prefix, so it has to be a valid
    /// identifier on its own.
    pub fn parse(raw: &str) -> Result<Self, NameError> {
        let name = raw.trim();

        if name.is_empty() {
            return Err(NameError::Empty);
        }

        if !IDENTIFIER.is_match(name) {
            if let Some((position, ch)) = name
                .chars()
                .enumerate()
                .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
            {
                return Err(NameError::InvalidCharacter { ch, position });
            }
            return Err(NameError::LeadingDigit);
        }

        if name.ends_with(ANALYZER_SUFFIX) {
            return Err(NameError::RedundantSuffix);
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Upper-cased form used in macro guards (`GAMECUBE_ANALYZER_H`)
    pub fn upper(&self) -> String {
        self.0.to_ascii_uppercase()
    }
}

impl fmt::Display for AnalyzerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human-readable title shown in the analyzer drop down
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerTitle(String);

impl AnalyzerTitle {
    /// Validate raw input; the title is otherwise used verbatim
    ///
    /// Only a trailing line terminator is dropped. Leading and trailing
    /// spaces are part of the title.
    pub fn parse(raw: &str) -> Result<Self, TitleError> {
        let title = raw
            .strip_suffix('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .unwrap_or(raw);

        if title.is_empty() {
            return Err(TitleError::Empty);
        }

        if title.contains(['\n', '\r']) {
            return Err(TitleError::MultiLine);
        }

        Ok(Self(title.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnalyzerTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        let name = AnalyzerName::parse("  Gamecube ").unwrap();
        assert_eq!(name.as_str(), "Gamecube");
        assert_eq!(name.upper(), "GAMECUBE");

        assert!(AnalyzerName::parse("Joes_Serial2").is_ok());
        assert!(AnalyzerName::parse("_i2c").is_ok());
    }

    #[test]
    fn rejects_empty_name() {
        assert_eq!(AnalyzerName::parse("   "), Err(NameError::Empty));
    }

    #[test]
    fn rejects_invalid_characters() {
        assert_eq!(
            AnalyzerName::parse("My Serial"),
            Err(NameError::InvalidCharacter { ch: ' ', position: 2 })
        );
        assert_eq!(
            AnalyzerName::parse("Joe's"),
            Err(NameError::InvalidCharacter { ch: '\'', position: 3 })
        );
        assert!(matches!(
            AnalyzerName::parse("Café"),
            Err(NameError::InvalidCharacter { ch: 'é', .. })
        ));
    }

    #[test]
    fn rejects_leading_digit() {
        assert_eq!(AnalyzerName::parse("2Wire"), Err(NameError::LeadingDigit));
    }

    #[test]
    fn rejects_trailing_analyzer_word() {
        assert_eq!(
            AnalyzerName::parse("SerialAnalyzer"),
            Err(NameError::RedundantSuffix)
        );
    }

    #[test]
    fn title_is_kept_verbatim() {
        let title = AnalyzerTitle::parse("Joe's <Serial> & Co").unwrap();
        assert_eq!(title.as_str(), "Joe's <Serial> & Co");
    }

    #[test]
    fn title_keeps_surrounding_spaces_but_drops_line_terminator() {
        assert_eq!(AnalyzerTitle::parse(" Foo Bus ").unwrap().as_str(), " Foo Bus ");
        assert_eq!(AnalyzerTitle::parse("Foo Bus\n").unwrap().as_str(), "Foo Bus");
        assert_eq!(AnalyzerTitle::parse("Foo Bus\r\n").unwrap().as_str(), "Foo Bus");
        assert_eq!(AnalyzerTitle::parse("   ").unwrap().as_str(), "   ");
    }

    #[test]
    fn title_must_be_single_non_empty_line() {
        assert_eq!(AnalyzerTitle::parse(""), Err(TitleError::Empty));
        assert_eq!(AnalyzerTitle::parse("\n"), Err(TitleError::Empty));
        assert_eq!(AnalyzerTitle::parse("Two\nLines"), Err(TitleError::MultiLine));
        assert_eq!(AnalyzerTitle::parse("Trailing\r"), Err(TitleError::MultiLine));
    }
}
