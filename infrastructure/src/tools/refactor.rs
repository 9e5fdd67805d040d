//! Refactoring tools: extract_function, rename_symbol

use async_trait::async_trait;
use confine_domain::{
    ParamType, ToolCall, ToolDefinition, ToolError, ToolHandler, ToolParameter, WorkingRoot,
};
use regex::{NoExpand, Regex};

use super::{guard, read_text, write_text};

pub const EXTRACT_FUNCTION: &str = "extract_function";
pub const RENAME_SYMBOL: &str = "rename_symbol";

pub fn extract_function_definition() -> ToolDefinition {
    ToolDefinition::new(
        EXTRACT_FUNCTION,
        "Extract a range of lines from a Python file into a new function.",
    )
    .with_parameter(ToolParameter::new(
        "file_path",
        "The path to the Python file, relative to the working directory.",
        true,
    ))
    .with_parameter(ToolParameter::new(
        "function_name",
        "Name of the new function.",
        true,
    ))
    .with_parameter(
        ToolParameter::new("start_line", "First line to extract (1-based).", true)
            .with_type(ParamType::Integer),
    )
    .with_parameter(
        ToolParameter::new("end_line", "Last line to extract (1-based, inclusive).", true)
            .with_type(ParamType::Integer),
    )
}

pub fn rename_symbol_definition() -> ToolDefinition {
    ToolDefinition::new(
        RENAME_SYMBOL,
        "Rename a variable, function or class throughout a file, matching whole words only.",
    )
    .with_parameter(ToolParameter::new(
        "file_path",
        "The path to the file, relative to the working directory.",
        true,
    ))
    .with_parameter(ToolParameter::new("old_name", "The current name of the symbol.", true))
    .with_parameter(ToolParameter::new("new_name", "The new name for the symbol.", true))
}

pub struct ExtractFunction;

#[async_trait]
impl ToolHandler for ExtractFunction {
    async fn call(&self, root: &WorkingRoot, call: &ToolCall) -> Result<String, ToolError> {
        let file_path = call.require_string("file_path")?;
        let function_name = call.require_string("function_name")?;
        let start_line = call.require_i64("start_line")?;
        let end_line = call.require_i64("end_line")?;

        let path = guard(root, file_path)?;
        let content = read_text(&path, file_path).await?;
        let updated = extract_block(&content, start_line, end_line, function_name)?;
        write_text(&path, file_path, &updated).await?;

        Ok(format!(
            "Successfully extracted lines {}-{} into function \"{}\" in \"{}\"",
            start_line, end_line, function_name, file_path
        ))
    }
}

/// Move lines `start..=end` (1-based) into `def name():` appended to the
/// end of `content`, followed by a call to it.
fn extract_block(content: &str, start: i64, end: i64, name: &str) -> Result<String, ToolError> {
    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let len = lines.len() as i64;
    if start < 1 || end > len || start > end {
        return Err(ToolError::invalid_argument(format!(
            "Invalid line range. File has {} lines, requested lines {}-{}",
            len, start, end
        )));
    }
    let (start, end) = (start as usize - 1, end as usize);
    let block = &lines[start..end];

    let mut remaining: Vec<&str> = lines[..start].iter().chain(&lines[end..]).copied().collect();
    while remaining.last().is_some_and(|l| l.trim().is_empty()) {
        remaining.pop();
    }

    let first = block[0];
    let indent = if first.trim().is_empty() {
        ""
    } else {
        &first[..first.len() - first.trim_start().len()]
    };

    let mut out: String = remaining.concat();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&format!("{}def {}():\n", indent, name));
    for line in block {
        let body = line.trim_start();
        if body.trim().is_empty() {
            out.push('\n');
        } else {
            out.push_str(indent);
            out.push_str("    ");
            out.push_str(body.trim_end_matches(['\n', '\r']));
            out.push('\n');
        }
    }
    out.push('\n');
    out.push_str(&format!("{}{}()\n", indent, name));
    Ok(out)
}

pub struct RenameSymbol;

#[async_trait]
impl ToolHandler for RenameSymbol {
    async fn call(&self, root: &WorkingRoot, call: &ToolCall) -> Result<String, ToolError> {
        let file_path = call.require_string("file_path")?;
        let old_name = call.require_string("old_name")?;
        let new_name = call.require_string("new_name")?;
        if old_name.is_empty() {
            return Err(ToolError::invalid_argument("old_name must not be empty"));
        }

        let path = guard(root, file_path)?;
        let content = read_text(&path, file_path).await?;

        let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(old_name)))
            .map_err(|e| ToolError::invalid_argument(format!("Invalid symbol \"{}\": {}", old_name, e)))?;
        let occurrences = pattern.find_iter(&content).count();
        if occurrences == 0 {
            return Ok(format!(
                "No occurrences of \"{}\" found in \"{}\"",
                old_name, file_path
            ));
        }

        let renamed = pattern.replace_all(&content, NoExpand(new_name));
        write_text(&path, file_path, &renamed).await?;

        Ok(format!(
            "Successfully renamed \"{}\" to \"{}\" ({} occurrences) in \"{}\"",
            old_name, new_name, occurrences, file_path
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{read, root, write};
    use confine_domain::ErrorCategory;

    #[test]
    fn test_extract_block_top_level() {
        let source = "x = 1\nprint(x)\ny = 2\n\n\n";
        let updated = extract_block(source, 2, 2, "show").unwrap();
        assert_eq!(updated, "x = 1\ny = 2\n\ndef show():\n    print(x)\n\nshow()\n");
    }

    #[test]
    fn test_extract_block_keeps_indent() {
        let source = "def main():\n    a = 1\n\n    b = 2\n    return a + b\n";
        let updated = extract_block(source, 2, 4, "setup").unwrap();
        assert_eq!(
            updated,
            "def main():\n    return a + b\n\n    def setup():\n        a = 1\n\n        b = 2\n\n    setup()\n"
        );
    }

    #[test]
    fn test_extract_block_invalid_range() {
        let err = extract_block("a\nb\n", 2, 5, "f").unwrap_err();
        assert!(err.is(ErrorCategory::InvalidArgument));
        assert_eq!(err.message, "Invalid line range. File has 2 lines, requested lines 2-5");

        assert!(extract_block("a\nb\n", 0, 1, "f").is_err());
        assert!(extract_block("a\nb\n", 2, 1, "f").is_err());
    }

    #[tokio::test]
    async fn test_extract_function_writes_file() {
        let (_dir, root) = root();
        write(&root, "app.py", "a = 1\nb = 2\n");

        let call = ToolCall::new(EXTRACT_FUNCTION)
            .with_arg("file_path", "app.py")
            .with_arg("function_name", "init")
            .with_arg("start_line", 1)
            .with_arg("end_line", 1);
        let output = ExtractFunction.call(&root, &call).await.unwrap();

        assert_eq!(
            output,
            "Successfully extracted lines 1-1 into function \"init\" in \"app.py\""
        );
        assert_eq!(read(&root, "app.py"), "b = 2\n\ndef init():\n    a = 1\n\ninit()\n");
    }

    #[tokio::test]
    async fn test_rename_symbol_whole_words() {
        let (_dir, root) = root();
        write(&root, "app.py", "def test():\n    testing = test()\n    return test\n");

        let call = ToolCall::new(RENAME_SYMBOL)
            .with_arg("file_path", "app.py")
            .with_arg("old_name", "test")
            .with_arg("new_name", "check_$1");
        let output = RenameSymbol.call(&root, &call).await.unwrap();

        assert_eq!(
            output,
            "Successfully renamed \"test\" to \"check_$1\" (3 occurrences) in \"app.py\""
        );
        assert_eq!(
            read(&root, "app.py"),
            "def check_$1():\n    testing = check_$1()\n    return check_$1\n"
        );
    }

    #[tokio::test]
    async fn test_rename_symbol_absent() {
        let (_dir, root) = root();
        write(&root, "app.py", "value = 1\n");

        let call = ToolCall::new(RENAME_SYMBOL)
            .with_arg("file_path", "app.py")
            .with_arg("old_name", "val")
            .with_arg("new_name", "v");
        let output = RenameSymbol.call(&root, &call).await.unwrap();
        assert_eq!(output, "No occurrences of \"val\" found in \"app.py\"");
        assert_eq!(read(&root, "app.py"), "value = 1\n");
    }
}
