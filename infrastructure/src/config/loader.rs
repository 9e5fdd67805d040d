//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILENAMES: [&str; 2] = ["confine.toml", ".confine.toml"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Explicit config path (if provided)
    /// 2. Project root: `./confine.toml` or `./.confine.toml`
    /// 3. Global: `~/.config/confine/config.toml`
    /// 4. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(
            Self::global_config_path().as_deref(),
            Path::new("."),
            config_path.map(PathBuf::as_path),
        )
        .extract()
        .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn figment(global: Option<&Path>, project_dir: &Path, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = global {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        if let Some(path) = Self::project_config_in(project_dir) {
            figment = figment.merge(Toml::file(path));
        }

        // An explicit file must exist; figment ignores missing files silently
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file_exact(path));
        }

        figment
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("confine").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        Self::project_config_in(Path::new("."))
    }

    fn project_config_in(dir: &Path) -> Option<PathBuf> {
        PROJECT_FILENAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(explicit: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./confine.toml or ./.confine.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(global: Option<&Path>, project: &Path, explicit: Option<&Path>) -> FileConfig {
        ConfigLoader::figment(global, project, explicit)
            .extract()
            .unwrap()
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.agent.max_iterations, 5);
        assert!(config.logging.conversation_log.is_none());
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().ends_with("confine/config.toml"));
    }

    #[test]
    fn test_no_files_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = extract(None, dir.path(), None);
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_priority_order() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        std::fs::write(
            &global,
            "[agent]\nmodel = \"global-model\"\nmax_iterations = 2\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join(".confine.toml"),
            "[agent]\nmax_iterations = 7\n",
        )
        .unwrap();

        let config = extract(Some(&global), dir.path(), None);
        assert_eq!(config.agent.model, "global-model");
        assert_eq!(config.agent.max_iterations, 7);

        let explicit = dir.path().join("explicit.toml");
        std::fs::write(&explicit, "[execution]\ncheck_timeout_secs = 5\n").unwrap();
        let config = extract(Some(&global), dir.path(), Some(&explicit));
        assert_eq!(config.agent.max_iterations, 7);
        assert_eq!(config.execution.check_timeout_secs, 5);
    }

    #[test]
    fn test_plain_name_wins_over_dotfile() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("confine.toml"), "[agent]\nmax_iterations = 3\n").unwrap();
        std::fs::write(dir.path().join(".confine.toml"), "[agent]\nmax_iterations = 9\n").unwrap();

        assert_eq!(extract(None, dir.path(), None).agent.max_iterations, 3);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let result = ConfigLoader::figment(None, dir.path(), Some(&missing)).extract::<FileConfig>();
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("confine.toml"), "[agent\nmodel = ").unwrap();
        let result = ConfigLoader::figment(None, dir.path(), None).extract::<FileConfig>();
        assert!(result.is_err());
    }
}
