//! Line counting and a keyword-based complexity estimate for source text.

use std::fmt;

/// Keywords counted as decision points
const DECISION_KEYWORDS: &[&str] = &["if", "for", "while", "elif", "except", "and", "or"];

/// Thresholds for the complexity rating
pub const MEDIUM_THRESHOLD: usize = 10;
pub const HIGH_THRESHOLD: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineCounts {
    pub total: usize,
    pub non_empty: usize,
    pub comments: usize,
}

impl LineCounts {
    pub fn code(&self) -> usize {
        self.non_empty - self.comments
    }
}

fn is_comment(trimmed: &str) -> bool {
    trimmed.starts_with('#') || trimmed.starts_with("//")
}

/// Count total, non-empty and comment lines (`#` or `//` prefixed)
pub fn count_lines(text: &str) -> LineCounts {
    let mut counts = LineCounts::default();
    for line in text.lines() {
        counts.total += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        counts.non_empty += 1;
        if is_comment(trimmed) {
            counts.comments += 1;
        }
    }
    counts
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexityRating {
    Low,
    Medium,
    High,
}

impl ComplexityRating {
    pub fn from_score(score: usize) -> Self {
        if score > HIGH_THRESHOLD {
            ComplexityRating::High
        } else if score > MEDIUM_THRESHOLD {
            ComplexityRating::Medium
        } else {
            ComplexityRating::Low
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            ComplexityRating::Low => "Code is relatively simple",
            ComplexityRating::Medium => "May need refactoring",
            ComplexityRating::High => "Consider refactoring",
        }
    }
}

impl fmt::Display for ComplexityRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ComplexityRating::Low => "LOW",
            ComplexityRating::Medium => "MEDIUM",
            ComplexityRating::High => "HIGH",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplexityReport {
    /// Number of `\n`-separated segments, matching editor line numbers
    pub lines: usize,
    pub functions: usize,
    pub classes: usize,
    /// Decision points + 1
    pub cyclomatic: usize,
    pub comments: usize,
}

impl ComplexityReport {
    pub fn rating(&self) -> ComplexityRating {
        ComplexityRating::from_score(self.cyclomatic)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// `def name(` at the start of a (possibly indented) line
fn is_function_header(trimmed: &str) -> bool {
    let Some(rest) = trimmed.strip_prefix("def") else {
        return false;
    };
    if !rest.starts_with(char::is_whitespace) {
        return false;
    }
    let rest = rest.trim_start();
    let name_len = rest.find(|c| !is_word_char(c)).unwrap_or(rest.len());
    name_len > 0 && rest[name_len..].trim_start().starts_with('(')
}

/// `class Name` at the start of a (possibly indented) line
fn is_class_header(trimmed: &str) -> bool {
    let Some(rest) = trimmed.strip_prefix("class") else {
        return false;
    };
    rest.starts_with(char::is_whitespace) && rest.trim_start().starts_with(is_word_char)
}

/// Estimate complexity by counting definitions and decision keywords.
pub fn analyze_complexity(text: &str) -> ComplexityReport {
    let mut functions = 0;
    let mut classes = 0;
    let mut comments = 0;

    for line in text.lines() {
        let trimmed = line.trim_start();
        if is_function_header(trimmed) {
            functions += 1;
        } else if is_class_header(trimmed) {
            classes += 1;
        } else if trimmed.starts_with('#') {
            comments += 1;
        }
    }

    let decisions = text
        .split(|c: char| !is_word_char(c))
        .filter(|word| DECISION_KEYWORDS.contains(word))
        .count();

    ComplexityReport {
        lines: text.split('\n').count(),
        functions,
        classes,
        cyclomatic: decisions + 1,
        comments,
    }
}
