//! Dependency tool: add_dependency
//!
//! Targets `pyproject.toml` at the working root when it exists, otherwise
//! `requirements.txt` (created if missing).

use async_trait::async_trait;
use confine_domain::{ToolCall, ToolDefinition, ToolError, ToolHandler, ToolParameter, WorkingRoot};
use toml_edit::{Array, DocumentMut, Item, Table, Value};

use super::{guard, read_text, write_text};

pub const ADD_DEPENDENCY: &str = "add_dependency";

const PYPROJECT: &str = "pyproject.toml";
const REQUIREMENTS: &str = "requirements.txt";

/// Prefixes that mark a version string as already being a constraint
const CONSTRAINT_PREFIXES: [char; 5] = ['>', '<', '=', '~', '^'];

pub fn add_dependency_definition() -> ToolDefinition {
    ToolDefinition::new(
        ADD_DEPENDENCY,
        "Add packages to requirements.txt or pyproject.toml dependency files.",
    )
    .with_parameter(ToolParameter::new(
        "package_name",
        "Name of the package to add as a dependency.",
        true,
    ))
    .with_parameter(ToolParameter::new(
        "version",
        "Version constraint for the package (e.g., '1.2.3', '>=1.0.0', '~=2.0'). If not provided, uses the latest version.",
        false,
    ))
}

/// `name==1.2` for a bare version, `name>=1.2` when a constraint is given
fn dependency_spec(package: &str, version: Option<&str>) -> String {
    match version.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) if v.starts_with(CONSTRAINT_PREFIXES) => format!("{}{}", package, v),
        Some(v) => format!("{}=={}", package, v),
        None => package.to_string(),
    }
}

/// Append `dependency` to `project.dependencies`, creating the table or the
/// array when absent. Comments and layout of the rest of the file are kept,
/// and a multi-line array stays one entry per line.
fn insert_into_pyproject(content: &str, dependency: &str) -> Result<String, ToolError> {
    let mut doc = content
        .parse::<DocumentMut>()
        .map_err(|e| ToolError::unexpected(format!("{} is not valid TOML: {}", PYPROJECT, e)))?;

    let project = doc
        .entry("project")
        .or_insert(Item::Table(Table::new()))
        .as_table_like_mut()
        .ok_or_else(|| ToolError::unexpected(format!("[project] in {} is not a table", PYPROJECT)))?;
    let dependencies = project
        .entry("dependencies")
        .or_insert(Item::Value(Value::Array(Array::new())))
        .as_array_mut()
        .ok_or_else(|| {
            ToolError::unexpected(format!("project.dependencies in {} is not an array", PYPROJECT))
        })?;

    let line_prefix = dependencies
        .iter()
        .last()
        .and_then(|last| last.decor().prefix())
        .and_then(|prefix| prefix.as_str())
        .filter(|prefix| prefix.contains('\n'))
        .map(str::to_string);

    dependencies.push(dependency);
    if let Some(prefix) = line_prefix {
        let last = dependencies.len() - 1;
        if let Some(added) = dependencies.get_mut(last) {
            added.decor_mut().set_prefix(prefix);
        }
    }

    Ok(doc.to_string())
}

pub struct AddDependency;

#[async_trait]
impl ToolHandler for AddDependency {
    async fn call(&self, root: &WorkingRoot, call: &ToolCall) -> Result<String, ToolError> {
        let package = call.require_string("package_name")?.trim();
        if package.is_empty() || package.contains(char::is_whitespace) {
            return Err(ToolError::invalid_argument(
                "package_name must be a single non-empty word",
            ));
        }
        let version = call.get_string("version");
        if version.is_some_and(|v| v.trim().contains(char::is_whitespace)) {
            return Err(ToolError::invalid_argument("version must not contain whitespace"));
        }
        let dependency = dependency_spec(package, version);

        let pyproject = guard(root, PYPROJECT)?;
        if pyproject.exists() {
            let content = read_text(&pyproject, PYPROJECT).await?;
            let updated = insert_into_pyproject(&content, &dependency)?;
            write_text(&pyproject, PYPROJECT, &updated).await?;
            return Ok(format!("Successfully added \"{}\" to {}", dependency, PYPROJECT));
        }

        let requirements = guard(root, REQUIREMENTS)?;
        if requirements.exists() {
            let mut content = read_text(&requirements, REQUIREMENTS).await?;
            if !content.is_empty() && !content.ends_with('\n') {
                content.push('\n');
            }
            content.push_str(&dependency);
            content.push('\n');
            write_text(&requirements, REQUIREMENTS, &content).await?;
            Ok(format!("Successfully added \"{}\" to {}", dependency, REQUIREMENTS))
        } else {
            write_text(&requirements, REQUIREMENTS, &format!("{}\n", dependency)).await?;
            Ok(format!("Successfully created {} with \"{}\"", REQUIREMENTS, dependency))
        }
    }
}
