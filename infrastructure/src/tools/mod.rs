//! Tool implementations for the agent
//!
//! Every tool is a [`ToolDefinition`](confine_domain::ToolDefinition) plus a [`ToolHandler`](confine_domain::ToolHandler), registered
//! into a closed [`ToolRegistry`] at startup and executed through the
//! [`ToolDispatcher`]. Handlers receive the [`WorkingRoot`] on every call and
//! route each path argument through [`PathGuard`] before any I/O.
//!
//! | Module | Tools |
//! |--------|-------|
//! | [`file`] | get_files_info, get_file_content, write_file, search_replace, delete_file, create_directory |
//! | [`search`] | regex_search |
//! | [`execution`] | run_python_file, run_tests, lint_code |
//! | [`git`] | git_status, git_diff, git_log, git_commit |
//! | [`analysis`] | count_lines, code_complexity, find_duplicates |
//! | [`refactor`] | extract_function, rename_symbol |
//! | [`dependency`] | add_dependency |

pub mod analysis;
pub mod dependency;
pub mod execution;
pub mod file;
pub mod git;
pub mod refactor;
pub mod search;

mod dispatcher;
mod registry;
mod schema;

pub use dispatcher::ToolDispatcher;
pub use registry::{RegisteredTool, RegistryError, ToolRegistry, ToolRegistryBuilder};
pub use schema::JsonSchemaToolConverter;

use std::path::{Path, PathBuf};
use std::time::Duration;

use confine_domain::{ToolError, WorkingRoot};
use tokio::io::AsyncReadExt;

use crate::process::{CHECK_TIMEOUT, INTERACTIVE_TIMEOUT};
use crate::sandbox::PathGuard;

/// Default cap on characters returned by `get_file_content`
pub const DEFAULT_MAX_FILE_CHARS: usize = 10_000;

/// Tunables shared by the tool handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSettings {
    /// Budget for python scripts and git commands
    pub interactive_timeout: Duration,
    /// Budget for test runners and linters
    pub check_timeout: Duration,
    pub max_file_chars: usize,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            interactive_timeout: INTERACTIVE_TIMEOUT,
            check_timeout: CHECK_TIMEOUT,
            max_file_chars: DEFAULT_MAX_FILE_CHARS,
        }
    }
}

/// Build the registry with every built-in tool
pub fn default_registry(settings: &ToolSettings) -> Result<ToolRegistry, RegistryError> {
    let interactive = settings.interactive_timeout;
    let check = settings.check_timeout;

    ToolRegistry::builder()
        .register(file::get_files_info_definition(), file::GetFilesInfo)
        .register(
            file::get_file_content_definition(),
            file::GetFileContent::new(settings.max_file_chars),
        )
        .register(file::write_file_definition(), file::WriteFile)
        .register(file::search_replace_definition(), file::SearchReplace)
        .register(file::delete_file_definition(), file::DeleteFile)
        .register(file::create_directory_definition(), file::CreateDirectory)
        .register(search::regex_search_definition(), search::RegexSearch)
        .register(
            execution::run_python_file_definition(),
            execution::RunPythonFile::new(interactive),
        )
        .register(execution::run_tests_definition(), execution::RunTests::new(check))
        .register(execution::lint_code_definition(), execution::LintCode::new(check))
        .register(git::git_status_definition(), git::GitStatus::new(interactive))
        .register(git::git_diff_definition(), git::GitDiff::new(interactive))
        .register(git::git_log_definition(), git::GitLog::new(interactive))
        .register(git::git_commit_definition(), git::GitCommit::new(interactive))
        .register(analysis::count_lines_definition(), analysis::CountLines)
        .register(analysis::code_complexity_definition(), analysis::CodeComplexity)
        .register(analysis::find_duplicates_definition(), analysis::FindDuplicates)
        .register(refactor::extract_function_definition(), refactor::ExtractFunction)
        .register(refactor::rename_symbol_definition(), refactor::RenameSymbol)
        .register(dependency::add_dependency_definition(), dependency::AddDependency)
        .build()
}

/// Resolve a model-supplied path inside the root
pub(crate) fn guard(root: &WorkingRoot, requested: &str) -> Result<PathBuf, ToolError> {
    PathGuard::resolve(root, requested).map_err(ToolError::from)
}

/// Ensure `path` exists and is a regular file
pub(crate) async fn require_file(path: &Path, display: &str) -> Result<(), ToolError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| ToolError::from_io(&e, display))?;
    if metadata.is_file() {
        Ok(())
    } else {
        Err(ToolError::not_a_file(display))
    }
}

/// Ensure `path` exists and is a directory
pub(crate) async fn require_dir(path: &Path, display: &str) -> Result<(), ToolError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| ToolError::from_io(&e, display))?;
    if metadata.is_dir() {
        Ok(())
    } else {
        Err(ToolError::not_a_directory(display))
    }
}

/// Read a regular file as UTF-8 text
pub(crate) async fn read_text(path: &Path, display: &str) -> Result<String, ToolError> {
    require_file(path, display).await?;
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ToolError::from_io(&e, display))?;
    String::from_utf8(bytes).map_err(|_| ToolError::decode_error(display))
}

/// Read at most `max_bytes` from the start of a file. When the file may
/// continue past that, a multi-byte character split at the boundary is
/// dropped rather than reported as a decode error.
pub(crate) async fn read_text_prefix(
    path: &Path,
    display: &str,
    max_bytes: usize,
) -> Result<String, ToolError> {
    require_file(path, display).await?;
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| ToolError::from_io(&e, display))?;
    let mut bytes = Vec::new();
    file.take(max_bytes as u64)
        .read_to_end(&mut bytes)
        .await
        .map_err(|e| ToolError::from_io(&e, display))?;
    let partial = bytes.len() >= max_bytes;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) if partial && e.utf8_error().error_len().is_none() => {
            let valid = e.utf8_error().valid_up_to();
            let mut bytes = e.into_bytes();
            bytes.truncate(valid);
            String::from_utf8(bytes).map_err(|_| ToolError::decode_error(display))
        }
        Err(_) => Err(ToolError::decode_error(display)),
    }
}

pub(crate) async fn write_text(path: &Path, display: &str, content: &str) -> Result<(), ToolError> {
    tokio::fs::write(path, content)
        .await
        .map_err(|e| ToolError::from_io(&e, display))
}
