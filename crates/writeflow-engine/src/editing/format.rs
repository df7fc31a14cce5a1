use std::fmt;
use std::str::FromStr;

/// Inline markup applied around a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatStyle {
    Bold,
    Italic,
    Underline,
}

impl FormatStyle {
    pub fn marker(self) -> &'static str {
        match self {
            FormatStyle::Bold => "**",
            FormatStyle::Italic => "*",
            FormatStyle::Underline => "__",
        }
    }

    pub fn wrap(self, text: &str) -> String {
        let marker = self.marker();
        format!("{marker}{text}{marker}")
    }
}

impl fmt::Display for FormatStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormatStyle::Bold => "bold",
            FormatStyle::Italic => "italic",
            FormatStyle::Underline => "underline",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown format style: {0}")]
pub struct UnknownStyle(pub String);

impl FromStr for FormatStyle {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bold" => Ok(FormatStyle::Bold),
            "italic" => Ok(FormatStyle::Italic),
            "underline" => Ok(FormatStyle::Underline),
            _ => Err(UnknownStyle(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(FormatStyle::Bold, "**word**")]
    #[case(FormatStyle::Italic, "*word*")]
    #[case(FormatStyle::Underline, "__word__")]
    fn test_wrap(#[case] style: FormatStyle, #[case] expected: &str) {
        assert_eq!(style.wrap("word"), expected);
    }

    #[test]
    fn test_parse_round_trips_display() {
        for style in [FormatStyle::Bold, FormatStyle::Italic, FormatStyle::Underline] {
            assert_eq!(style.to_string().parse::<FormatStyle>(), Ok(style));
        }
        assert_eq!(
            "strike".parse::<FormatStyle>(),
            Err(UnknownStyle("strike".to_string()))
        );
    }
}
