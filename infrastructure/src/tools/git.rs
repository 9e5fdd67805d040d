//! Git tools: git_status, git_diff, git_log, git_commit
//!
//! Each tool requires `repo_path` to be a directory containing `.git` and
//! runs `git` there with the interactive timeout.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use confine_domain::{
    ErrorCategory, ParamType, ToolCall, ToolDefinition, ToolError, ToolHandler, ToolParameter,
    WorkingRoot,
};

use super::{guard, require_dir};
use crate::process::{ProcessSpec, SubprocessRunner};

pub const GIT_STATUS: &str = "git_status";
pub const GIT_DIFF: &str = "git_diff";
pub const GIT_LOG: &str = "git_log";
pub const GIT_COMMIT: &str = "git_commit";

const DEFAULT_MAX_COMMITS: i64 = 10;

fn repo_path_parameter(required: bool) -> ToolParameter {
    ToolParameter::new(
        "repo_path",
        "The path to the git repository, relative to the working directory. Defaults to the working directory.",
        required,
    )
}

pub fn git_status_definition() -> ToolDefinition {
    ToolDefinition::new(
        GIT_STATUS,
        "Check the git status of a repository to see modified, added, or deleted files.",
    )
    .with_parameter(repo_path_parameter(false))
}

pub fn git_diff_definition() -> ToolDefinition {
    ToolDefinition::new(
        GIT_DIFF,
        "Show changes between commits, or between a commit and the working tree.",
    )
    .with_parameter(repo_path_parameter(false))
    .with_parameter(ToolParameter::new(
        "commit1",
        "First commit to compare. If omitted, shows unstaged changes.",
        false,
    ))
    .with_parameter(ToolParameter::new(
        "commit2",
        "Second commit to compare against commit1.",
        false,
    ))
}

pub fn git_log_definition() -> ToolDefinition {
    ToolDefinition::new(GIT_LOG, "Show the recent commit history of a repository.")
        .with_parameter(repo_path_parameter(false))
        .with_parameter(
            ToolParameter::new(
                "max_commits",
                "Maximum number of commits to show (default: 10).",
                false,
            )
            .with_type(ParamType::Integer),
        )
}

pub fn git_commit_definition() -> ToolDefinition {
    ToolDefinition::new(
        GIT_COMMIT,
        "Commit changes to a git repository with a specified message.",
    )
    .with_parameter(repo_path_parameter(true))
    .with_parameter(ToolParameter::new("message", "The commit message.", true))
    .with_parameter(
        ToolParameter::new(
            "files",
            "List of files to commit, relative to the repository. If not provided, commits all staged files.",
            false,
        )
        .with_type(ParamType::StringArray),
    )
}

/// Resolve `repo_path` and check that it is a git working tree
async fn open_repo(root: &WorkingRoot, repo_path: &str) -> Result<PathBuf, ToolError> {
    let dir = guard(root, repo_path)?;
    require_dir(&dir, repo_path).await?;
    if !dir.join(".git").exists() {
        return Err(ToolError::new(
            ErrorCategory::NotFound,
            format!("\"{}\" is not a git repository", repo_path),
        ));
    }
    Ok(dir)
}

/// Run `git <args>` in `dir`; a non-zero exit is an error carrying stderr
async fn run_git<I, S>(dir: &Path, args: I, timeout: Duration, label: &str) -> Result<String, ToolError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let spec = ProcessSpec::new("git", dir).args(args).with_timeout(timeout);
    let output = SubprocessRunner::run(&spec).await?;
    if !output.success() {
        return Err(ToolError::new(
            ErrorCategory::Unexpected,
            format!("Error running git {}: {}", label, output.stderr.trim_end()),
        ));
    }
    Ok(output.stdout)
}

/// A revision from the model; anything git could parse as an option
/// (`--output=...`) is refused.
fn revision_arg(name: &str, value: &str) -> Result<String, ToolError> {
    let value = value.trim();
    if value.is_empty() || value.starts_with('-') {
        return Err(ToolError::invalid_argument(format!(
            "Argument '{}' must be a commit reference, got \"{}\"",
            name, value
        )));
    }
    Ok(value.to_string())
}

pub struct GitStatus {
    timeout: Duration,
}

impl GitStatus {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ToolHandler for GitStatus {
    async fn call(&self, root: &WorkingRoot, call: &ToolCall) -> Result<String, ToolError> {
        let repo_path = call.get_string_or("repo_path", ".");
        let dir = open_repo(root, repo_path).await?;

        let stdout = run_git(&dir, ["status", "--porcelain"], self.timeout, "status").await?;
        if stdout.trim().is_empty() {
            Ok(format!("Git status for \"{}\": Working directory is clean", repo_path))
        } else {
            Ok(format!("Git status for \"{}\":\n{}", repo_path, stdout))
        }
    }
}

pub struct GitDiff {
    timeout: Duration,
}

impl GitDiff {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ToolHandler for GitDiff {
    async fn call(&self, root: &WorkingRoot, call: &ToolCall) -> Result<String, ToolError> {
        let repo_path = call.get_string_or("repo_path", ".");
        let mut revisions = Vec::new();
        if let Some(commit1) = call.get_string("commit1") {
            revisions.push(revision_arg("commit1", commit1)?);
            if let Some(commit2) = call.get_string("commit2") {
                revisions.push(revision_arg("commit2", commit2)?);
            }
        }
        let dir = open_repo(root, repo_path).await?;

        let mut args = vec!["diff".to_string()];
        if !revisions.is_empty() {
            args.push("--end-of-options".to_string());
            args.extend(revisions);
        }

        let stdout = run_git(&dir, args, self.timeout, "diff").await?;
        if stdout.trim().is_empty() {
            Ok(format!("Git diff for \"{}\": No differences found", repo_path))
        } else {
            Ok(format!("Git diff for \"{}\":\n{}", repo_path, stdout))
        }
    }
}

pub struct GitLog {
    timeout: Duration,
}

impl GitLog {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ToolHandler for GitLog {
    async fn call(&self, root: &WorkingRoot, call: &ToolCall) -> Result<String, ToolError> {
        let repo_path = call.get_string_or("repo_path", ".");
        let max_commits = call.get_i64_or("max_commits", DEFAULT_MAX_COMMITS)?;
        if max_commits <= 0 {
            return Err(ToolError::invalid_argument("max_commits must be a positive integer"));
        }
        let dir = open_repo(root, repo_path).await?;

        let count = max_commits.to_string();
        let stdout = run_git(&dir, ["log", "--oneline", "-n", count.as_str()], self.timeout, "log").await?;
        if stdout.trim().is_empty() {
            Ok(format!("Git log for \"{}\": No commits found", repo_path))
        } else {
            Ok(format!(
                "Git log for \"{}\" (last {} commits):\n{}",
                repo_path, max_commits, stdout
            ))
        }
    }
}

pub struct GitCommit {
    timeout: Duration,
}

impl GitCommit {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ToolHandler for GitCommit {
    async fn call(&self, root: &WorkingRoot, call: &ToolCall) -> Result<String, ToolError> {
        let repo_path = call.require_string("repo_path")?;
        let message = call.require_string("message")?;
        let files = call.get_string_list("files")?;
        let dir = open_repo(root, repo_path).await?;

        // Guard every file before staging any of them
        let mut staged = Vec::with_capacity(files.len());
        for file in &files {
            let requested = Path::new(repo_path).join(file);
            staged.push(guard(root, &requested.to_string_lossy())?);
        }

        for path in &staged {
            run_git(
                &dir,
                ["add".to_string(), path.to_string_lossy().into_owned()],
                self.timeout,
                "add",
            )
            .await?;
        }

        let stdout = run_git(&dir, ["commit", "-m", message], self.timeout, "commit").await?;
        Ok(format!("Git commit successful:\n{}", stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::INTERACTIVE_TIMEOUT;
    use crate::tools::test_support::{root, write};

    fn git_available() -> bool {
        which::which("git").is_ok()
    }

    fn git(dir: &Path, args: &[&str]) {
        let status = std::process::Command::new("git")
            .args(args)
            .current_dir(dir)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .unwrap();
        assert!(status.success(), "git {:?} failed", args);
    }

    fn init_repo(dir: &Path) {
        git(dir, &["init", "-q"]);
        git(dir, &["config", "user.email", "dev@example.com"]);
        git(dir, &["config", "user.name", "Dev"]);
        git(dir, &["config", "commit.gpgsign", "false"]);
    }

    #[tokio::test]
    async fn test_not_a_repository() {
        let (_dir, root) = root();
        let err = GitStatus::new(INTERACTIVE_TIMEOUT)
            .call(&root, &ToolCall::new(GIT_STATUS))
            .await
            .unwrap_err();

        assert!(err.is(ErrorCategory::NotFound));
        assert_eq!(err.message, "\".\" is not a git repository");
    }

    #[tokio::test]
    async fn test_repo_path_must_be_directory() {
        let (_dir, root) = root();
        write(&root, "file.txt", "x");

        let err = GitLog::new(INTERACTIVE_TIMEOUT)
            .call(&root, &ToolCall::new(GIT_LOG).with_arg("repo_path", "file.txt"))
            .await
            .unwrap_err();
        assert!(err.is(ErrorCategory::NotADirectory));
    }

    #[tokio::test]
    async fn test_repo_path_outside_root() {
        let (_dir, root) = root();
        let err = GitDiff::new(INTERACTIVE_TIMEOUT)
            .call(&root, &ToolCall::new(GIT_DIFF).with_arg("repo_path", "../"))
            .await
            .unwrap_err();
        assert!(err.is(ErrorCategory::SandboxViolation));
    }

    #[tokio::test]
    async fn test_commit_rejects_escaping_file_before_staging() {
        let (_dir, root) = root();
        std::fs::create_dir(root.path().join(".git")).unwrap();

        let call = ToolCall::new(GIT_COMMIT)
            .with_arg("repo_path", ".")
            .with_arg("message", "sneaky")
            .with_arg("files", serde_json::json!(["ok.txt", "../../etc/passwd"]));
        let err = GitCommit::new(INTERACTIVE_TIMEOUT).call(&root, &call).await.unwrap_err();
        assert!(err.is(ErrorCategory::SandboxViolation));
    }

    #[tokio::test]
    async fn test_status_commit_log_roundtrip() {
        if !git_available() {
            return;
        }
        let (_dir, root) = root();
        init_repo(root.path());
        let timeout = INTERACTIVE_TIMEOUT;

        let clean = GitStatus::new(timeout).call(&root, &ToolCall::new(GIT_STATUS)).await.unwrap();
        assert_eq!(clean, "Git status for \".\": Working directory is clean");

        let empty_log = GitLog::new(timeout).call(&root, &ToolCall::new(GIT_LOG)).await;
        assert!(empty_log.is_err());

        write(&root, "app.py", "print('hi')\n");
        let dirty = GitStatus::new(timeout).call(&root, &ToolCall::new(GIT_STATUS)).await.unwrap();
        assert!(dirty.contains("?? app.py"));

        let commit = ToolCall::new(GIT_COMMIT)
            .with_arg("repo_path", ".")
            .with_arg("message", "Add app")
            .with_arg("files", serde_json::json!(["app.py"]));
        let committed = GitCommit::new(timeout).call(&root, &commit).await.unwrap();
        assert!(committed.starts_with("Git commit successful:\n"));

        let log = GitLog::new(timeout)
            .call(&root, &ToolCall::new(GIT_LOG).with_arg("max_commits", 5))
            .await
            .unwrap();
        assert!(log.starts_with("Git log for \".\" (last 5 commits):\n"));
        assert!(log.contains("Add app"));

        write(&root, "app.py", "print('bye')\n");
        let diff = GitDiff::new(timeout).call(&root, &ToolCall::new(GIT_DIFF)).await.unwrap();
        assert!(diff.starts_with("Git diff for \".\":\n"));
        assert!(diff.contains("+print('bye')"));
    }

    #[tokio::test]
    async fn test_diff_rejects_option_like_revisions() {
        let (dir, root) = root();
        std::fs::create_dir(root.path().join(".git")).unwrap();
        let escaped = dir.path().parent().unwrap().join("diff-output.txt");

        for (key, value) in [
            ("commit1", "--output=../diff-output.txt"),
            ("commit1", "-p"),
            ("commit2", "--output=../diff-output.txt"),
        ] {
            let call = ToolCall::new(GIT_DIFF)
                .with_arg("commit1", if key == "commit1" { value } else { "HEAD" })
                .with_arg(key, value);
            let err = GitDiff::new(INTERACTIVE_TIMEOUT).call(&root, &call).await.unwrap_err();
            assert!(err.is(ErrorCategory::InvalidArgument), "{} = {}", key, value);
        }
        assert!(!escaped.exists());
    }

    #[tokio::test]
    async fn test_diff_against_revision() {
        if !git_available() {
            return;
        }
        let (_dir, root) = root();
        init_repo(root.path());
        write(&root, "f.txt", "one\n");
        git(root.path(), &["add", "f.txt"]);
        git(root.path(), &["commit", "-q", "-m", "first"]);
        write(&root, "f.txt", "two\n");

        let call = ToolCall::new(GIT_DIFF).with_arg("commit1", "HEAD");
        let diff = GitDiff::new(INTERACTIVE_TIMEOUT).call(&root, &call).await.unwrap();
        assert!(diff.contains("-one"));
        assert!(diff.contains("+two"));
    }

    #[tokio::test]
    async fn test_log_rejects_non_positive_count() {
        let (_dir, root) = root();
        let err = GitLog::new(INTERACTIVE_TIMEOUT)
            .call(&root, &ToolCall::new(GIT_LOG).with_arg("max_commits", 0))
            .await
            .unwrap_err();
        assert!(err.is(ErrorCategory::InvalidArgument));
    }
}
