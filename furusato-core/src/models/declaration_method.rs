use std::fmt;

use serde::{Deserialize, Serialize};

/// How business income was declared, which decides the blue-return
/// special deduction.
///
/// Parsing never fails: anything that is not one of the known codes is kept
/// as [`DeclarationMethod::Unrecognized`] so the caller can choose between
/// warning and rejecting.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeclarationMethod {
    /// White return or no business income.
    #[default]
    None,
    /// Electronic filing with electronic bookkeeping.
    Electronic,
    /// Double-entry bookkeeping on paper.
    Paper,
    /// Simple bookkeeping.
    Simple,
    /// A value that matched none of the known codes.
    Unrecognized(String),
}

impl DeclarationMethod {
    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Electronic => "electronic",
            Self::Paper => "paper",
            Self::Simple => "simple",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Self::None,
            "electronic" => Self::Electronic,
            "paper" => Self::Paper,
            "simple" => Self::Simple,
            _ => Self::Unrecognized(s.to_string()),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for DeclarationMethod {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<DeclarationMethod> for String {
    fn from(value: DeclarationMethod) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for DeclarationMethod {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
