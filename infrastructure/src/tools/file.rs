//! File operation tools: get_files_info, get_file_content, write_file,
//! search_replace, delete_file, create_directory

use async_trait::async_trait;
use confine_domain::{
    ErrorCategory, ToolCall, ToolDefinition, ToolError, ToolHandler, ToolParameter, WorkingRoot,
};

use super::{guard, read_text, read_text_prefix, require_dir, require_file, write_text};

/// Tool name constants
pub const GET_FILES_INFO: &str = "get_files_info";
pub const GET_FILE_CONTENT: &str = "get_file_content";
pub const WRITE_FILE: &str = "write_file";
pub const SEARCH_REPLACE: &str = "search_replace";
pub const DELETE_FILE: &str = "delete_file";
pub const CREATE_DIRECTORY: &str = "create_directory";

pub fn get_files_info_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_FILES_INFO,
        "Lists files in the specified directory along with their sizes, constrained to the working directory. Use this to explore the file structure of a project.",
    )
    .with_parameter(ToolParameter::new(
        "directory",
        "The directory to list files from, relative to the working directory. If not provided, lists files in the working directory itself.",
        false,
    ))
}

pub fn get_file_content_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_FILE_CONTENT,
        "Read the contents of a file within the working directory.",
    )
    .with_parameter(ToolParameter::new(
        "file_path",
        "The path to the file to read, relative to the working directory.",
        true,
    ))
}

pub fn write_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        WRITE_FILE,
        "Write or overwrite content to a file within the working directory.",
    )
    .with_parameter(ToolParameter::new(
        "file_path",
        "The path to the file to write, relative to the working directory.",
        true,
    ))
    .with_parameter(ToolParameter::new("content", "The content to write to the file.", true))
}

pub fn search_replace_definition() -> ToolDefinition {
    ToolDefinition::new(
        SEARCH_REPLACE,
        "Search for text in a file and replace it with new text.",
    )
    .with_parameter(ToolParameter::new(
        "file_path",
        "The path to the file to modify, relative to the working directory.",
        true,
    ))
    .with_parameter(ToolParameter::new("search_text", "The text to search for in the file.", true))
    .with_parameter(ToolParameter::new(
        "replace_text",
        "The text to replace the search text with.",
        true,
    ))
}

pub fn delete_file_definition() -> ToolDefinition {
    ToolDefinition::new(DELETE_FILE, "Delete a file within the working directory.")
        .with_parameter(ToolParameter::new(
            "file_path",
            "The path to the file to delete, relative to the working directory.",
            true,
        ))
}

pub fn create_directory_definition() -> ToolDefinition {
    ToolDefinition::new(
        CREATE_DIRECTORY,
        "Create a directory within the working directory.",
    )
    .with_parameter(ToolParameter::new(
        "directory_path",
        "The path to the directory to create, relative to the working directory.",
        true,
    ))
}

pub struct GetFilesInfo;

#[async_trait]
impl ToolHandler for GetFilesInfo {
    async fn call(&self, root: &WorkingRoot, call: &ToolCall) -> Result<String, ToolError> {
        let directory = call.get_string_or("directory", ".");
        let path = guard(root, directory)?;
        require_dir(&path, directory).await?;

        let mut reader = tokio::fs::read_dir(&path)
            .await
            .map_err(|e| ToolError::from_io(&e, directory))?;

        let mut lines = Vec::new();
        while let Some(entry) = reader
            .next_entry()
            .await
            .map_err(|e| ToolError::from_io(&e, directory))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            // Follows symlinks, like a size lookup by path would
            let line = match tokio::fs::metadata(entry.path()).await {
                Ok(meta) => format!(
                    "- {}: file_size={} bytes, is_dir={}",
                    name,
                    meta.len(),
                    meta.is_dir()
                ),
                Err(_) => format!("- {}: file_size=unknown bytes, is_dir=false", name),
            };
            lines.push((name, line));
        }

        if lines.is_empty() {
            return Ok(format!("Directory \"{}\" is empty", directory));
        }
        lines.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(lines.into_iter().map(|(_, line)| line).collect::<Vec<_>>().join("\n"))
    }
}

pub struct GetFileContent {
    max_chars: usize,
}

impl GetFileContent {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

#[async_trait]
impl ToolHandler for GetFileContent {
    async fn call(&self, root: &WorkingRoot, call: &ToolCall) -> Result<String, ToolError> {
        let file_path = call.require_string("file_path")?;
        let path = guard(root, file_path)?;
        // Four bytes per char covers any UTF-8 text, plus one char to detect overflow
        let budget = self.max_chars.saturating_add(1).saturating_mul(4);
        let mut content = read_text_prefix(&path, file_path, budget).await?;

        if let Some((cut, _)) = content.char_indices().nth(self.max_chars) {
            content.truncate(cut);
            content.push_str(&format!(
                "[...File \"{}\" truncated at {} characters]",
                file_path, self.max_chars
            ));
        }
        Ok(content)
    }
}

pub struct WriteFile;

#[async_trait]
impl ToolHandler for WriteFile {
    async fn call(&self, root: &WorkingRoot, call: &ToolCall) -> Result<String, ToolError> {
        let file_path = call.require_string("file_path")?;
        let content = call.require_string("content")?;
        let path = guard(root, file_path)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ToolError::from_io(&e, file_path))?;
        }
        write_text(&path, file_path, content).await?;

        Ok(format!(
            "Successfully wrote to \"{}\" ({} characters written)",
            file_path,
            content.chars().count()
        ))
    }
}

pub struct SearchReplace;

#[async_trait]
impl ToolHandler for SearchReplace {
    async fn call(&self, root: &WorkingRoot, call: &ToolCall) -> Result<String, ToolError> {
        let file_path = call.require_string("file_path")?;
        let search_text = call.require_string("search_text")?;
        let replace_text = call.require_string("replace_text")?;
        if search_text.is_empty() {
            return Err(ToolError::invalid_argument("search_text must not be empty"));
        }

        let path = guard(root, file_path)?;
        let content = read_text(&path, file_path).await?;

        let occurrences = content.matches(search_text).count();
        if occurrences == 0 {
            return Ok(format!(
                "No occurrences of \"{}\" found in \"{}\"",
                search_text, file_path
            ));
        }

        write_text(&path, file_path, &content.replace(search_text, replace_text)).await?;
        Ok(format!(
            "Successfully replaced {} occurrence(s) of \"{}\" with \"{}\" in \"{}\"",
            occurrences, search_text, replace_text, file_path
        ))
    }
}

pub struct DeleteFile;

#[async_trait]
impl ToolHandler for DeleteFile {
    async fn call(&self, root: &WorkingRoot, call: &ToolCall) -> Result<String, ToolError> {
        let file_path = call.require_string("file_path")?;
        let path = guard(root, file_path)?;
        require_file(&path, file_path).await?;

        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| ToolError::from_io(&e, file_path))?;
        Ok(format!("Successfully deleted \"{}\"", file_path))
    }
}

pub struct CreateDirectory;

#[async_trait]
impl ToolHandler for CreateDirectory {
    async fn call(&self, root: &WorkingRoot, call: &ToolCall) -> Result<String, ToolError> {
        let directory_path = call.require_string("directory_path")?;
        let path = guard(root, directory_path)?;

        if let Ok(meta) = tokio::fs::metadata(&path).await {
            if meta.is_dir() {
                return Ok(format!("Warning: Directory \"{}\" already exists", directory_path));
            }
            return Err(ToolError::new(
                ErrorCategory::NotADirectory,
                format!("A file with the name \"{}\" already exists", directory_path),
            ));
        }

        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|e| ToolError::from_io(&e, directory_path))?;
        Ok(format!("Successfully created directory \"{}\"", directory_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{read, root, write};

    #[tokio::test]
    async fn test_get_files_info_sorted() {
        let (_dir, root) = root();
        write(&root, "b.txt", "12345");
        write(&root, "a.txt", "");
        std::fs::create_dir(root.path().join("pkg")).unwrap();

        let output = GetFilesInfo.call(&root, &ToolCall::new(GET_FILES_INFO)).await.unwrap();
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "- a.txt: file_size=0 bytes, is_dir=false");
        assert_eq!(lines[1], "- b.txt: file_size=5 bytes, is_dir=false");
        assert!(lines[2].starts_with("- pkg: file_size="));
        assert!(lines[2].ends_with("is_dir=true"));
    }

    #[tokio::test]
    async fn test_get_files_info_errors() {
        let (_dir, root) = root();
        write(&root, "f.txt", "x");

        let outside = GetFilesInfo
            .call(&root, &ToolCall::new(GET_FILES_INFO).with_arg("directory", "../"))
            .await
            .unwrap_err();
        assert!(outside.is(ErrorCategory::SandboxViolation));

        let not_dir = GetFilesInfo
            .call(&root, &ToolCall::new(GET_FILES_INFO).with_arg("directory", "f.txt"))
            .await
            .unwrap_err();
        assert!(not_dir.is(ErrorCategory::NotADirectory));
    }

    #[tokio::test]
    async fn test_get_file_content_truncates() {
        let (_dir, root) = root();
        write(&root, "long.txt", &"é".repeat(20));

        let tool = GetFileContent::new(5);
        let output = tool
            .call(&root, &ToolCall::new(GET_FILE_CONTENT).with_arg("file_path", "long.txt"))
            .await
            .unwrap();

        assert_eq!(output, "ééééé[...File \"long.txt\" truncated at 5 characters]");
    }

    #[tokio::test]
    async fn test_get_file_content_reads_only_a_prefix() {
        let (_dir, root) = root();
        // Invalid UTF-8 far past the budget is never read
        let mut bytes = "x".repeat(1 << 20).into_bytes();
        bytes.push(0xFF);
        std::fs::write(root.path().join("big.bin"), &bytes).unwrap();

        let output = GetFileContent::new(10)
            .call(&root, &ToolCall::new(GET_FILE_CONTENT).with_arg("file_path", "big.bin"))
            .await
            .unwrap();
        assert_eq!(output, format!("{}[...File \"big.bin\" truncated at 10 characters]", "x".repeat(10)));
    }

    #[tokio::test]
    async fn test_get_file_content_prefix_splits_character() {
        let (_dir, root) = root();
        // A 3 char budget reads 16 bytes, ending inside the 'é' at byte 15
        write(&root, "split.txt", &format!("{}é{}", "a".repeat(15), "b".repeat(100)));

        let output = GetFileContent::new(3)
            .call(&root, &ToolCall::new(GET_FILE_CONTENT).with_arg("file_path", "split.txt"))
            .await
            .unwrap();
        assert_eq!(output, "aaa[...File \"split.txt\" truncated at 3 characters]");
    }

    #[tokio::test]
    async fn test_get_file_content_rejects_binary() {
        let (_dir, root) = root();
        std::fs::write(root.path().join("bad.bin"), [0x61, 0xFF, 0x62]).unwrap();

        let err = GetFileContent::new(100)
            .call(&root, &ToolCall::new(GET_FILE_CONTENT).with_arg("file_path", "bad.bin"))
            .await
            .unwrap_err();
        assert!(err.is(ErrorCategory::DecodeError));
    }

    #[tokio::test]
    async fn test_get_file_content_short_file_unchanged() {
        let (_dir, root) = root();
        write(&root, "short.txt", "hello\n");

        let output = GetFileContent::new(100)
            .call(&root, &ToolCall::new(GET_FILE_CONTENT).with_arg("file_path", "short.txt"))
            .await
            .unwrap();
        assert_eq!(output, "hello\n");
    }

    #[tokio::test]
    async fn test_get_file_content_escape_rejected() {
        let (_dir, root) = root();
        let err = GetFileContent::new(100)
            .call(
                &root,
                &ToolCall::new(GET_FILE_CONTENT).with_arg("file_path", "../../etc/passwd"),
            )
            .await
            .unwrap_err();
        assert!(err.is(ErrorCategory::SandboxViolation));
    }

    #[tokio::test]
    async fn test_write_file_creates_parents() {
        let (_dir, root) = root();
        let call = ToolCall::new(WRITE_FILE)
            .with_arg("file_path", "pkg/mod/new.py")
            .with_arg("content", "print('hi')");

        let output = WriteFile.call(&root, &call).await.unwrap();
        assert_eq!(
            output,
            "Successfully wrote to \"pkg/mod/new.py\" (11 characters written)"
        );
        assert_eq!(read(&root, "pkg/mod/new.py"), "print('hi')");
    }

    #[tokio::test]
    async fn test_write_file_outside_root_touches_nothing() {
        let (dir, root) = root();
        let call = ToolCall::new(WRITE_FILE)
            .with_arg("file_path", "../escaped.txt")
            .with_arg("content", "x");

        let err = WriteFile.call(&root, &call).await.unwrap_err();
        assert!(err.is(ErrorCategory::SandboxViolation));
        assert!(!dir.path().parent().unwrap().join("escaped.txt").exists());
    }

    #[tokio::test]
    async fn test_search_replace() {
        let (_dir, root) = root();
        write(&root, "code.py", "foo = 1\nprint(foo)\n");

        let call = ToolCall::new(SEARCH_REPLACE)
            .with_arg("file_path", "code.py")
            .with_arg("search_text", "foo")
            .with_arg("replace_text", "bar");
        let output = SearchReplace.call(&root, &call).await.unwrap();

        assert_eq!(
            output,
            "Successfully replaced 2 occurrence(s) of \"foo\" with \"bar\" in \"code.py\""
        );
        assert_eq!(read(&root, "code.py"), "bar = 1\nprint(bar)\n");

        let again = SearchReplace.call(&root, &call).await.unwrap();
        assert_eq!(again, "No occurrences of \"foo\" found in \"code.py\"");
    }

    #[tokio::test]
    async fn test_delete_file_only_deletes_files() {
        let (_dir, root) = root();
        write(&root, "gone.txt", "x");
        std::fs::create_dir(root.path().join("keep")).unwrap();

        let output = DeleteFile
            .call(&root, &ToolCall::new(DELETE_FILE).with_arg("file_path", "gone.txt"))
            .await
            .unwrap();
        assert_eq!(output, "Successfully deleted \"gone.txt\"");
        assert!(!root.path().join("gone.txt").exists());

        let err = DeleteFile
            .call(&root, &ToolCall::new(DELETE_FILE).with_arg("file_path", "keep"))
            .await
            .unwrap_err();
        assert!(err.is(ErrorCategory::NotAFile));
        assert!(root.path().join("keep").is_dir());

        let missing = DeleteFile
            .call(&root, &ToolCall::new(DELETE_FILE).with_arg("file_path", "gone.txt"))
            .await
            .unwrap_err();
        assert!(missing.is(ErrorCategory::NotFound));
    }

    #[tokio::test]
    async fn test_create_directory() {
        let (_dir, root) = root();
        write(&root, "file", "x");
        let call = |p: &str| ToolCall::new(CREATE_DIRECTORY).with_arg("directory_path", p);

        let created = CreateDirectory.call(&root, &call("a/b")).await.unwrap();
        assert_eq!(created, "Successfully created directory \"a/b\"");
        assert!(root.path().join("a/b").is_dir());

        let again = CreateDirectory.call(&root, &call("a/b")).await.unwrap();
        assert_eq!(again, "Warning: Directory \"a/b\" already exists");

        let clash = CreateDirectory.call(&root, &call("file")).await.unwrap_err();
        assert_eq!(clash.message, "A file with the name \"file\" already exists");
    }
}
