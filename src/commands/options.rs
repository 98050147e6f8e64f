//! Command option structs
//!
//! Built from parsed CLI arguments and handed to the command implementations.
//!
//! # Example
//! ```
//! use codelens::commands::options::{AnalysisScope, AnalyzeOptions};
//! use codelens::commands::format::OutputFormat;
//!
//! let options = AnalyzeOptions {
//!     file: "src/main.py",
//!     provider: Some("anthropic"),
//!     model: None,
//!     language: None,
//!     scope: AnalysisScope::All,
//!     format: OutputFormat::Json,
//! };
//! assert!(!options.effective_colored(true));
//! ```

use std::str::FromStr;

use super::format::OutputFormat;
use crate::error::{CodelensError, Result};
use crate::llm::Operation;

/// Which operations `analyze` runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisScope {
    Single(Operation),
    All,
}

impl AnalysisScope {
    pub fn operations(&self) -> Vec<Operation> {
        match self {
            AnalysisScope::Single(op) => vec![*op],
            AnalysisScope::All => Operation::ALL.to_vec(),
        }
    }
}

impl FromStr for AnalysisScope {
    type Err = CodelensError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(AnalysisScope::All);
        }
        s.parse().map(AnalysisScope::Single)
    }
}

/// Analyze command options
#[derive(Debug, Clone)]
pub struct AnalyzeOptions<'a> {
    /// Source file to analyze
    pub file: &'a str,

    /// Provider override (`--provider`)
    pub provider: Option<&'a str>,

    /// Model override (`--model`)
    pub model: Option<&'a str>,

    /// Language override; detected from the file otherwise
    pub language: Option<&'a str>,

    pub scope: AnalysisScope,

    pub format: OutputFormat,
}

impl<'a> AnalyzeOptions<'a> {
    pub fn effective_colored(&self, config_colored: bool) -> bool {
        self.format.effective_colored(config_colored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_parse() {
        assert_eq!("all".parse::<AnalysisScope>().unwrap(), AnalysisScope::All);
        assert_eq!(
            "quality".parse::<AnalysisScope>().unwrap(),
            AnalysisScope::Single(Operation::Quality)
        );
        assert!("everything".parse::<AnalysisScope>().is_err());
    }

    #[test]
    fn test_scope_operations() {
        assert_eq!(AnalysisScope::All.operations().len(), 3);
        assert_eq!(
            AnalysisScope::Single(Operation::Tests).operations(),
            vec![Operation::Tests]
        );
    }
}
