//! Code analysis tools: count_lines, code_complexity, find_duplicates
//!
//! Thin I/O wrappers over the pure analyzers in `confine_domain::analysis`.

use async_trait::async_trait;
use confine_domain::analysis::{
    DEFAULT_MIN_LINES, analyze_complexity, count_lines, find_duplicates, split_lines,
};
use confine_domain::{
    ParamType, ToolCall, ToolDefinition, ToolError, ToolHandler, ToolParameter, WorkingRoot,
};

use super::{guard, read_text};

pub const COUNT_LINES: &str = "count_lines";
pub const CODE_COMPLEXITY: &str = "code_complexity";
pub const FIND_DUPLICATES: &str = "find_duplicates";

pub fn count_lines_definition() -> ToolDefinition {
    ToolDefinition::new(
        COUNT_LINES,
        "Count total, non-empty, comment and code lines in a file.",
    )
    .with_parameter(ToolParameter::new(
        "file_path",
        "The path to the file to analyze, relative to the working directory.",
        true,
    ))
}

pub fn code_complexity_definition() -> ToolDefinition {
    ToolDefinition::new(
        CODE_COMPLEXITY,
        "Analyze the complexity of a Python file by counting lines, functions, classes, and estimating cyclomatic complexity.",
    )
    .with_parameter(ToolParameter::new(
        "file_path",
        "The path to the Python file to analyze, relative to the working directory.",
        true,
    ))
}

pub fn find_duplicates_definition() -> ToolDefinition {
    ToolDefinition::new(
        FIND_DUPLICATES,
        "Find duplicate blocks of code within a file.",
    )
    .with_parameter(ToolParameter::new(
        "file_path",
        "The path to the file to scan, relative to the working directory.",
        true,
    ))
    .with_parameter(
        ToolParameter::new(
            "min_lines",
            "Minimum number of consecutive lines for a block to count as a duplicate (default: 3).",
            false,
        )
        .with_type(ParamType::Integer),
    )
}

pub struct CountLines;

#[async_trait]
impl ToolHandler for CountLines {
    async fn call(&self, root: &WorkingRoot, call: &ToolCall) -> Result<String, ToolError> {
        let file_path = call.require_string("file_path")?;
        let path = guard(root, file_path)?;
        let counts = count_lines(&read_text(&path, file_path).await?);

        Ok(format!(
            "Line count for '{}':\n  Total lines: {}\n  Non-empty lines: {}\n  Comment lines: {}\n  Code lines: {}\n",
            file_path,
            counts.total,
            counts.non_empty,
            counts.comments,
            counts.code()
        ))
    }
}

pub struct CodeComplexity;

#[async_trait]
impl ToolHandler for CodeComplexity {
    async fn call(&self, root: &WorkingRoot, call: &ToolCall) -> Result<String, ToolError> {
        let file_path = call.require_string("file_path")?;
        let path = guard(root, file_path)?;
        let report = analyze_complexity(&read_text(&path, file_path).await?);
        let rating = report.rating();

        Ok(format!(
            "Code Complexity Analysis for '{}':\n  Lines of code: {}\n  Functions: {}\n  Classes: {}\n  Estimated cyclomatic complexity: {}\n  Comments: {}\n  Complexity rating: {} - {}\n",
            file_path,
            report.lines,
            report.functions,
            report.classes,
            report.cyclomatic,
            report.comments,
            rating,
            rating.advice()
        ))
    }
}

pub struct FindDuplicates;

#[async_trait]
impl ToolHandler for FindDuplicates {
    async fn call(&self, root: &WorkingRoot, call: &ToolCall) -> Result<String, ToolError> {
        let file_path = call.require_string("file_path")?;
        let min_lines = call.get_i64_or("min_lines", DEFAULT_MIN_LINES as i64)?;
        if min_lines < 1 {
            return Err(ToolError::invalid_argument("min_lines must be at least 1"));
        }

        let path = guard(root, file_path)?;
        let content = read_text(&path, file_path).await?;
        let report = find_duplicates(&split_lines(&content), min_lines as usize)
            .map_err(|e| ToolError::invalid_argument(e.to_string()))?;

        tracing::debug!(
            file = file_path,
            total = report.total(),
            min_lines = report.min_lines,
            "Duplicate scan finished"
        );
        Ok(report.render(file_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{root, write};
    use confine_domain::ErrorCategory;

    #[tokio::test]
    async fn test_count_lines() {
        let (_dir, root) = root();
        write(&root, "m.py", "# header\nimport os\n\nx = 1\n");

        let output = CountLines
            .call(&root, &ToolCall::new(COUNT_LINES).with_arg("file_path", "m.py"))
            .await
            .unwrap();
        assert_eq!(
            output,
            "Line count for 'm.py':\n  Total lines: 4\n  Non-empty lines: 3\n  Comment lines: 1\n  Code lines: 2\n"
        );
    }

    #[tokio::test]
    async fn test_code_complexity_report() {
        let (_dir, root) = root();
        write(
            &root,
            "m.py",
            "class A:\n    def f(self, x):\n        if x:\n            return 1\n        return 2\n",
        );

        let output = CodeComplexity
            .call(&root, &ToolCall::new(CODE_COMPLEXITY).with_arg("file_path", "m.py"))
            .await
            .unwrap();
        assert!(output.starts_with("Code Complexity Analysis for 'm.py':\n"));
        assert!(output.contains("  Functions: 1\n"));
        assert!(output.contains("  Classes: 1\n"));
        assert!(output.contains("  Estimated cyclomatic complexity: 2\n"));
        assert!(output.contains("  Complexity rating: LOW - "));
    }

    #[tokio::test]
    async fn test_find_duplicates_reports_blocks() {
        let (_dir, root) = root();
        write(&root, "dup.py", "a = 1\nb = 2\nc = 3\nx = 0\na = 1\nb = 2\nc = 3\n");

        let output = FindDuplicates
            .call(&root, &ToolCall::new(FIND_DUPLICATES).with_arg("file_path", "dup.py"))
            .await
            .unwrap();
        assert!(output.starts_with("Found 1 duplicate code blocks in 'dup.py':"));
        assert!(output.contains("Lines 1-3 and 5-7"));
        assert!(output.contains("Length: 3 lines"));
    }

    #[tokio::test]
    async fn test_find_duplicates_none() {
        let (_dir, root) = root();
        write(&root, "u.py", "a\nb\nc\n");

        let output = FindDuplicates
            .call(&root, &ToolCall::new(FIND_DUPLICATES).with_arg("file_path", "u.py"))
            .await
            .unwrap();
        assert_eq!(output, "No duplicate code blocks (of 3+ lines) found in 'u.py'");
    }

    #[tokio::test]
    async fn test_find_duplicates_rejects_zero_min_lines() {
        let (_dir, root) = root();
        write(&root, "u.py", "a\n");

        let call = ToolCall::new(FIND_DUPLICATES)
            .with_arg("file_path", "u.py")
            .with_arg("min_lines", 0);
        let err = FindDuplicates.call(&root, &call).await.unwrap_err();
        assert!(err.is(ErrorCategory::InvalidArgument));
    }
}
