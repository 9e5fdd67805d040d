//! Search tool: regex_search

use async_trait::async_trait;
use confine_domain::{ToolCall, ToolDefinition, ToolError, ToolHandler, ToolParameter, WorkingRoot};
use regex::Regex;

use super::{guard, read_text};

pub const REGEX_SEARCH: &str = "regex_search";

pub fn regex_search_definition() -> ToolDefinition {
    ToolDefinition::new(
        REGEX_SEARCH,
        "Search for a regex pattern in a file and return matching lines.",
    )
    .with_parameter(ToolParameter::new(
        "file_path",
        "The path to the file to search in, relative to the working directory.",
        true,
    ))
    .with_parameter(ToolParameter::new(
        "pattern",
        "The regular expression pattern to search for.",
        true,
    ))
}

pub struct RegexSearch;

#[async_trait]
impl ToolHandler for RegexSearch {
    async fn call(&self, root: &WorkingRoot, call: &ToolCall) -> Result<String, ToolError> {
        let file_path = call.require_string("file_path")?;
        let pattern = call.require_string("pattern")?;
        let path = guard(root, file_path)?;

        let regex = Regex::new(pattern).map_err(|e| {
            ToolError::invalid_argument(format!("Invalid regex pattern \"{}\": {}", pattern, e))
        })?;
        let content = read_text(&path, file_path).await?;

        let matches: Vec<String> = content
            .lines()
            .enumerate()
            .filter(|(_, line)| regex.is_match(line))
            .map(|(i, line)| format!("Line {}: {}", i + 1, line.trim_end()))
            .collect();

        if matches.is_empty() {
            return Ok(format!(
                "No matches found for pattern \"{}\" in \"{}\"",
                pattern, file_path
            ));
        }

        Ok(format!(
            "Found {} match(es) for pattern \"{}\" in \"{}\":\n{}",
            matches.len(),
            pattern,
            file_path,
            matches.join("\n")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{root, write};
    use confine_domain::ErrorCategory;

    fn call(file: &str, pattern: &str) -> ToolCall {
        ToolCall::new(REGEX_SEARCH)
            .with_arg("file_path", file)
            .with_arg("pattern", pattern)
    }

    #[tokio::test]
    async fn test_matches_with_line_numbers() {
        let (_dir, root) = root();
        write(&root, "app.py", "def main():\n    pass\ndef helper():  \n");

        let output = RegexSearch.call(&root, &call("app.py", r"^def \w+")).await.unwrap();
        assert_eq!(
            output,
            "Found 2 match(es) for pattern \"^def \\w+\" in \"app.py\":\nLine 1: def main():\nLine 3: def helper():"
        );
    }

    #[tokio::test]
    async fn test_no_matches() {
        let (_dir, root) = root();
        write(&root, "app.py", "x = 1\n");

        let output = RegexSearch.call(&root, &call("app.py", "class")).await.unwrap();
        assert_eq!(output, "No matches found for pattern \"class\" in \"app.py\"");
    }

    #[tokio::test]
    async fn test_invalid_pattern() {
        let (_dir, root) = root();
        write(&root, "app.py", "x\n");

        let err = RegexSearch.call(&root, &call("app.py", "(unclosed")).await.unwrap_err();
        assert!(err.is(ErrorCategory::InvalidArgument));
        assert!(err.message.starts_with("Invalid regex pattern \"(unclosed\""));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let (_dir, root) = root();
        let err = RegexSearch.call(&root, &call("nope.py", "x")).await.unwrap_err();
        assert!(err.is(ErrorCategory::NotFound));
    }
}
