use std::str::FromStr;

use crate::error::CodelensError;

/// How `analyze` prints its report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Colored terminal text with a spinner.
    #[default]
    Text,
    /// `{success, data, error}` envelope on stdout.
    Json,
    /// Report suitable for pasting into a PR or wiki page.
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = CodelensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(CodelensError::InvalidInput(format!(
                "unknown output format '{}' (expected text, json or markdown)",
                other
            ))),
        }
    }
}

impl OutputFormat {
    /// `--json` wins over `--format`.
    pub fn from_cli(format: &str, json: bool) -> Result<Self, CodelensError> {
        if json {
            return Ok(Self::Json);
        }
        format.parse()
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    /// Only plain text gets spinners and ANSI colors; the other formats are
    /// meant to be piped.
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Text)
    }

    pub fn effective_colored(&self, config_colored: bool) -> bool {
        self.is_interactive() && config_colored
    }
}
