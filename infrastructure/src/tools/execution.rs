//! Code execution tools: run_python_file, run_tests, lint_code
//!
//! All three go through [`SubprocessRunner`], never a shell. A user-supplied
//! `test_command` / `lint_command` is split on whitespace.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use confine_domain::{
    ParamType, ToolCall, ToolDefinition, ToolError, ToolHandler, ToolParameter, WorkingRoot,
};

use super::{guard, require_file};
use crate::process::{ProcessOutput, ProcessSpec, SubprocessRunner};

pub const RUN_PYTHON_FILE: &str = "run_python_file";
pub const RUN_TESTS: &str = "run_tests";
pub const LINT_CODE: &str = "lint_code";

const PYTHON: &str = "python3";

pub fn run_python_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        RUN_PYTHON_FILE,
        "Execute a Python file within the working directory with optional arguments.",
    )
    .with_parameter(ToolParameter::new(
        "file_path",
        "The path to the Python file to execute, relative to the working directory.",
        true,
    ))
    .with_parameter(
        ToolParameter::new("args", "Optional arguments to pass to the Python file.", false)
            .with_type(ParamType::StringArray),
    )
}

pub fn run_tests_definition() -> ToolDefinition {
    ToolDefinition::new(
        RUN_TESTS,
        "Execute test suites in a directory or run a specific test file.",
    )
    .with_parameter(ToolParameter::new(
        "test_path",
        "The path to the test directory or file, relative to the working directory. Defaults to the current directory.",
        false,
    ))
    .with_parameter(ToolParameter::new(
        "test_command",
        "Specific test command to run (e.g., 'pytest -v'). If not provided, auto-detects the test framework.",
        false,
    ))
}

pub fn lint_code_definition() -> ToolDefinition {
    ToolDefinition::new(
        LINT_CODE,
        "Run code linters on files or directories to check for code quality issues.",
    )
    .with_parameter(ToolParameter::new(
        "file_path",
        "The path to the file or directory to lint, relative to the working directory. Defaults to the current directory.",
        false,
    ))
    .with_parameter(ToolParameter::new(
        "lint_command",
        "Specific lint command to run (e.g., 'flake8 --max-line-length=100'). If not provided, auto-detects the appropriate linter.",
        false,
    ))
}

pub struct RunPythonFile {
    timeout: Duration,
}

impl RunPythonFile {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ToolHandler for RunPythonFile {
    async fn call(&self, root: &WorkingRoot, call: &ToolCall) -> Result<String, ToolError> {
        let file_path = call.require_string("file_path")?;
        let args = call.get_string_list("args")?;
        let path = guard(root, file_path)?;

        require_file(&path, file_path).await?;
        if path.extension().is_none_or(|ext| ext != "py") {
            return Err(ToolError::invalid_argument(format!(
                "\"{}\" is not a Python file",
                file_path
            )));
        }

        let spec = ProcessSpec::new(PYTHON, root.path())
            .arg(path.to_string_lossy())
            .args(args)
            .with_timeout(self.timeout);
        let output = SubprocessRunner::run(&spec).await?;

        Ok(format_script_output(&output))
    }
}

fn format_script_output(output: &ProcessOutput) -> String {
    let mut lines = Vec::new();
    if output.stdout.is_empty() {
        lines.push("STDOUT: No output produced.".to_string());
    } else {
        lines.push(format!("STDOUT: {}", output.stdout));
    }
    if !output.stderr.is_empty() {
        lines.push(format!("STDERR: {}", output.stderr));
    }
    if !output.success() {
        lines.push(format!("Process exited with code {}", output.code()));
    }
    lines.join("\n")
}

pub struct RunTests {
    timeout: Duration,
}

impl RunTests {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ToolHandler for RunTests {
    async fn call(&self, root: &WorkingRoot, call: &ToolCall) -> Result<String, ToolError> {
        let test_path = call.get_string_or("test_path", ".");
        let path = guard(root, test_path)?;
        let target = Target::inspect(&path, test_path).await?;

        let spec = match call.get_string("test_command").filter(|c| !c.trim().is_empty()) {
            Some(command) => user_command(command, target.cwd())?,
            None => detect_test_command(&target, test_path)?,
        }
        .with_timeout(self.timeout);

        let output = SubprocessRunner::run(&spec).await?;
        Ok(format_check_report(
            &format!("Test execution results for '{}':", test_path),
            &spec,
            &output,
            None,
        ))
    }
}

pub struct LintCode {
    timeout: Duration,
}

impl LintCode {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ToolHandler for LintCode {
    async fn call(&self, root: &WorkingRoot, call: &ToolCall) -> Result<String, ToolError> {
        let file_path = call.get_string_or("file_path", ".");
        let path = guard(root, file_path)?;
        let target = Target::inspect(&path, file_path).await?;

        let spec = match call.get_string("lint_command").filter(|c| !c.trim().is_empty()) {
            Some(command) => user_command(command, target.cwd())?,
            None => detect_lint_command(&target, root.path().join("pyproject.toml").exists()),
        }
        .with_timeout(self.timeout);

        let output = SubprocessRunner::run(&spec).await?;
        Ok(format_check_report(
            &format!("Lint results for '{}':", file_path),
            &spec,
            &output,
            Some("No linting issues found."),
        ))
    }
}

/// An existing file or directory a check runs against
#[derive(Debug)]
enum Target {
    File { dir: PathBuf, name: String },
    Dir(PathBuf),
}

impl Target {
    async fn inspect(path: &Path, display: &str) -> Result<Self, ToolError> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| ToolError::from_io(&e, display))?;

        if metadata.is_dir() {
            return Ok(Target::Dir(path.to_path_buf()));
        }
        match (path.parent(), path.file_name()) {
            (Some(dir), Some(name)) => Ok(Target::File {
                dir: dir.to_path_buf(),
                name: name.to_string_lossy().into_owned(),
            }),
            _ => Err(ToolError::not_a_file(display)),
        }
    }

    fn cwd(&self) -> &Path {
        match self {
            Target::File { dir, .. } => dir,
            Target::Dir(dir) => dir,
        }
    }
}

fn user_command(command: &str, cwd: &Path) -> Result<ProcessSpec, ToolError> {
    let mut tokens = command.split_whitespace();
    let program = tokens
        .next()
        .ok_or_else(|| ToolError::invalid_argument("Command must not be empty"))?;
    Ok(ProcessSpec::new(program, cwd).args(tokens))
}

fn detect_test_command(target: &Target, display: &str) -> Result<ProcessSpec, ToolError> {
    match target {
        Target::File { dir, name } if name.ends_with(".py") => {
            Ok(ProcessSpec::new(PYTHON, dir).arg(name.as_str()))
        }
        Target::File { .. } => Err(ToolError::invalid_argument(format!(
            "Unsupported test path: \"{}\"",
            display
        ))),
        Target::Dir(dir) => {
            if dir.join("pytest.ini").exists() || dir.join("pyproject.toml").exists() {
                Ok(ProcessSpec::new("pytest", dir))
            } else {
                Ok(ProcessSpec::new(PYTHON, dir).args(["-m", "unittest", "discover"]))
            }
        }
    }
}

fn detect_lint_command(target: &Target, root_has_pyproject: bool) -> ProcessSpec {
    match target {
        Target::File { dir, name } if name.ends_with(".py") && !root_has_pyproject => {
            ProcessSpec::new(PYTHON, dir).args(["-m", "pylint", name.as_str()])
        }
        Target::File { dir, name } => ProcessSpec::new("flake8", dir).arg(name.as_str()),
        Target::Dir(dir) if dir.join("pyproject.toml").exists() => {
            ProcessSpec::new("flake8", dir).arg(".")
        }
        Target::Dir(dir) => ProcessSpec::new(PYTHON, dir).args(["-m", "pylint", "."]),
    }
}

fn format_check_report(
    header: &str,
    spec: &ProcessSpec,
    output: &ProcessOutput,
    clean_message: Option<&str>,
) -> String {
    let mut report = format!(
        "{}\nCommand: {}\nExit code: {}\n",
        header,
        spec.command_line(),
        output.code()
    );
    let stdout_empty = output.stdout.trim().is_empty();
    let stderr_empty = output.stderr.trim().is_empty();

    if !stdout_empty {
        report.push_str(&format!("STDOUT:\n{}\n", output.stdout));
    }
    if !stderr_empty {
        report.push_str(&format!("STDERR:\n{}\n", output.stderr));
    }
    if let Some(message) = clean_message {
        if output.success() && stdout_empty && stderr_empty {
            report.push_str(message);
            report.push('\n');
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::INTERACTIVE_TIMEOUT;
    use crate::tools::test_support::{root, write};
    use confine_domain::ErrorCategory;

    fn output(code: i32, stdout: &str, stderr: &str) -> ProcessOutput {
        ProcessOutput {
            exit_code: Some(code),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            elapsed: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_format_script_output() {
        assert_eq!(format_script_output(&output(0, "", "")), "STDOUT: No output produced.");
        assert_eq!(
            format_script_output(&output(2, "hi\n", "boom\n")),
            "STDOUT: hi\n\nSTDERR: boom\n\nProcess exited with code 2"
        );
    }

    #[test]
    fn test_format_check_report() {
        let spec = ProcessSpec::new("flake8", ".").arg("app.py");

        let clean = format_check_report(
            "Lint results for 'app.py':",
            &spec,
            &output(0, "", ""),
            Some("No linting issues found."),
        );
        assert_eq!(
            clean,
            "Lint results for 'app.py':\nCommand: flake8 app.py\nExit code: 0\nNo linting issues found.\n"
        );

        let dirty = format_check_report("Lint results for 'app.py':", &spec, &output(1, "E501\n", ""), None);
        assert!(dirty.contains("Exit code: 1\nSTDOUT:\nE501\n"));
        assert!(!dirty.contains("No linting issues"));
    }

    #[tokio::test]
    async fn test_detect_test_command() {
        let (_dir, root) = root();
        write(&root, "tests/test_app.py", "");
        write(&root, "pyproj/pyproject.toml", "");
        write(&root, "notes.txt", "");

        let file = Target::inspect(&root.path().join("tests/test_app.py"), "t").await.unwrap();
        let spec = detect_test_command(&file, "t").unwrap();
        assert_eq!(spec.command_line(), "python3 test_app.py");
        assert_eq!(spec.cwd, root.path().join("tests"));

        let pytest = Target::inspect(&root.path().join("pyproj"), "p").await.unwrap();
        assert_eq!(detect_test_command(&pytest, "p").unwrap().command_line(), "pytest");

        let plain = Target::inspect(&root.path().join("tests"), "t").await.unwrap();
        assert_eq!(
            detect_test_command(&plain, "t").unwrap().command_line(),
            "python3 -m unittest discover"
        );

        let notes = Target::inspect(&root.path().join("notes.txt"), "notes.txt").await.unwrap();
        assert!(detect_test_command(&notes, "notes.txt").is_err());
    }

    #[tokio::test]
    async fn test_detect_lint_command() {
        let (_dir, root) = root();
        write(&root, "app.py", "");
        write(&root, "proj/pyproject.toml", "");

        let file = Target::inspect(&root.path().join("app.py"), "app.py").await.unwrap();
        assert_eq!(detect_lint_command(&file, false).command_line(), "python3 -m pylint app.py");
        assert_eq!(detect_lint_command(&file, true).command_line(), "flake8 app.py");

        let proj = Target::inspect(&root.path().join("proj"), "proj").await.unwrap();
        assert_eq!(detect_lint_command(&proj, false).command_line(), "flake8 .");
    }

    #[test]
    fn test_user_command_split() {
        let spec = user_command("  pytest   -v  -x ", Path::new("/w")).unwrap();
        assert_eq!(spec.program, "pytest");
        assert_eq!(spec.args, vec!["-v", "-x"]);
        assert!(user_command("   ", Path::new("/w")).is_err());
    }

    #[tokio::test]
    async fn test_run_python_file_rejects_non_python() {
        let (_dir, root) = root();
        write(&root, "script.sh", "echo hi");

        let err = RunPythonFile::new(INTERACTIVE_TIMEOUT)
            .call(&root, &ToolCall::new(RUN_PYTHON_FILE).with_arg("file_path", "script.sh"))
            .await
            .unwrap_err();
        assert!(err.is(ErrorCategory::InvalidArgument));

        let missing = RunPythonFile::new(INTERACTIVE_TIMEOUT)
            .call(&root, &ToolCall::new(RUN_PYTHON_FILE).with_arg("file_path", "nope.py"))
            .await
            .unwrap_err();
        assert!(missing.is(ErrorCategory::NotFound));
    }

    #[tokio::test]
    async fn test_run_python_file_executes() {
        if which::which(PYTHON).is_err() {
            return;
        }
        let (_dir, root) = root();
        write(&root, "hello.py", "import sys\nprint('hello', *sys.argv[1:])\nsys.exit(3)\n");

        let call = ToolCall::new(RUN_PYTHON_FILE)
            .with_arg("file_path", "hello.py")
            .with_arg("args", serde_json::json!(["a", "b"]));
        let output = RunPythonFile::new(INTERACTIVE_TIMEOUT).call(&root, &call).await.unwrap();

        assert!(output.starts_with("STDOUT: hello a b\n"));
        assert!(output.ends_with("Process exited with code 3"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_tests_with_user_command() {
        let (_dir, root) = root();
        let call = ToolCall::new(RUN_TESTS).with_arg("test_command", "echo all passed");

        let report = RunTests::new(INTERACTIVE_TIMEOUT).call(&root, &call).await.unwrap();
        assert_eq!(
            report,
            "Test execution results for '.':\nCommand: echo all passed\nExit code: 0\nSTDOUT:\nall passed\n\n"
        );
    }

    #[tokio::test]
    async fn test_missing_linter_is_reported() {
        let (_dir, root) = root();
        let call = ToolCall::new(LINT_CODE).with_arg("lint_command", "no-such-linter-xyz .");

        let err = LintCode::new(INTERACTIVE_TIMEOUT).call(&root, &call).await.unwrap_err();
        assert!(err.is(ErrorCategory::ExternalToolMissing));
    }

    #[tokio::test]
    async fn test_test_path_outside_root() {
        let (_dir, root) = root();
        let call = ToolCall::new(RUN_TESTS).with_arg("test_path", "../..");

        let err = RunTests::new(INTERACTIVE_TIMEOUT).call(&root, &call).await.unwrap_err();
        assert!(err.is(ErrorCategory::SandboxViolation));
    }
}
