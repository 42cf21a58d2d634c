use std::{fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// How the first line of text relates to the column headings.
///
/// Readers consult the policy to decide whether to consume and verify a
/// heading row. Writers only use it to decide whether a heading row is
/// written; headings are never checked on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HeadingPolicy {
    /// No heading line; the first line is data.
    NoHeading,
    /// A heading line is present but not checked.
    HeadingNoCheck,
    /// Heading checked after collapsing whitespace runs and trimming.
    HeadingEasyCheck,
    /// Heading checked character for character.
    #[default]
    HeadingExactCheck,
}

impl HeadingPolicy {
    pub fn has_heading(self) -> bool {
        self != HeadingPolicy::NoHeading
    }

    /// Compare a heading row as read against the expected headings.
    ///
    /// `line` is reported in the mismatch error.
    pub fn verify(self, expected: &[String], actual: &[String], line: usize) -> Result<()> {
        let ok = match self {
            HeadingPolicy::NoHeading | HeadingPolicy::HeadingNoCheck => true,
            HeadingPolicy::HeadingEasyCheck => {
                expected.len() == actual.len()
                    && expected
                        .iter()
                        .zip(actual)
                        .all(|(e, a)| compress_whitespace(e) == compress_whitespace(a))
            }
            HeadingPolicy::HeadingExactCheck => expected == actual,
        };
        if ok {
            Ok(())
        } else {
            Err(TableError::HeadingMismatch {
                line,
                expected: expected.to_vec(),
                actual: actual.to_vec(),
                policy: self,
            })
        }
    }
}

impl fmt::Display for HeadingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HeadingPolicy::NoHeading => "no_heading",
            HeadingPolicy::HeadingNoCheck => "heading_no_check",
            HeadingPolicy::HeadingEasyCheck => "heading_easy_check",
            HeadingPolicy::HeadingExactCheck => "heading_exact_check",
        };
        f.write_str(s)
    }
}

impl FromStr for HeadingPolicy {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "no_heading" => Ok(HeadingPolicy::NoHeading),
            "heading_no_check" => Ok(HeadingPolicy::HeadingNoCheck),
            "heading_easy_check" => Ok(HeadingPolicy::HeadingEasyCheck),
            "heading_exact_check" => Ok(HeadingPolicy::HeadingExactCheck),
            other => Err(TableError::schema(format!("invalid heading policy: {:?}", other))),
        }
    }
}

/// Replace every whitespace run by one space and trim both ends.
pub fn compress_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}
