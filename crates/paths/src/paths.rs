//! Path context for runtime environment detection and engine file locations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Identifies the runtime environment where the engine is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnvironment {
    /// Running via `cargo run` or from a build directory
    Development,
    /// Running as an installed binary
    Production,
}

/// Resolves every file the engine reads or writes from a single base path.
///
/// Layout: `<base>/<vendor>/<app_id>/{config.toml, storage/, logs/}`.
#[derive(Debug, Clone)]
pub struct PathContext {
    environment: RuntimeEnvironment,
    base_path: Arc<Path>,
    vendor: String,
    app_id: &'static str,
}

impl PathContext {
    /// Creates a new PathContext with automatic environment detection.
    pub fn new(vendor: impl Into<String>, app_id: &'static str) -> Self {
        let environment = Self::detect_environment();
        let base_path = Self::determine_base_path(environment);

        Self {
            environment,
            base_path: base_path.into(),
            vendor: vendor.into(),
            app_id,
        }
    }

    /// Creates a PathContext with an explicit base path (useful for testing).
    pub fn with_base_path(
        base_path: impl Into<PathBuf>,
        vendor: impl Into<String>,
        app_id: &'static str,
    ) -> Self {
        let base_path: PathBuf = base_path.into();

        Self {
            environment: Self::detect_environment(),
            base_path: base_path.into(),
            vendor: vendor.into(),
            app_id,
        }
    }

    fn detect_environment() -> RuntimeEnvironment {
        if let Ok(exe_path) = std::env::current_exe() {
            if exe_path.components().any(|c| c.as_os_str() == "target") {
                return RuntimeEnvironment::Development;
            }
        }

        if std::env::var("CARGO").is_ok() || std::env::var("CARGO_MANIFEST_DIR").is_ok() {
            return RuntimeEnvironment::Development;
        }

        RuntimeEnvironment::Production
    }

    fn determine_base_path(environment: RuntimeEnvironment) -> PathBuf {
        match environment {
            RuntimeEnvironment::Development => std::env::var("CARGO_MANIFEST_DIR")
                .map(PathBuf::from)
                .or_else(|_| std::env::current_dir())
                .unwrap_or_else(|_| PathBuf::from(".")),
            // Application Support on macOS, LocalAppData on Windows, XDG_DATA_HOME elsewhere.
            RuntimeEnvironment::Production => {
                dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."))
            }
        }
    }

    pub fn environment(&self) -> RuntimeEnvironment {
        self.environment
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn app_id(&self) -> &str {
        self.app_id
    }

    /// Returns the app root path: `<base>/<vendor>/<app_id>`
    pub fn app_root(&self) -> PathBuf {
        self.base_path.join(&self.vendor).join(self.app_id)
    }

    /// Returns the engine configuration file: `<app_root>/config.toml`
    pub fn config_file(&self) -> PathBuf {
        self.app_root().join("config.toml")
    }

    /// Returns the key/value storage directory: `<app_root>/storage/`
    pub fn storage_dir(&self) -> PathBuf {
        self.app_root().join("storage")
    }

    /// Returns the logs directory path: `<app_root>/logs/`
    pub fn logs_dir(&self) -> PathBuf {
        self.app_root().join("logs")
    }

    /// Returns a log file path with timestamp: `<app_root>/logs/<app_id>.<timestamp>.log`
    pub fn log_file(&self, timestamp: &str) -> PathBuf {
        self.logs_dir()
            .join(format!("{}.{}.log", self.app_id, timestamp))
    }

    /// Returns a log file path with current timestamp.
    pub fn log_file_now(&self) -> PathBuf {
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
        self.log_file(&timestamp)
    }

    /// Ensures all necessary directories exist.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        for dir in [self.app_root(), self.storage_dir(), self.logs_dir()] {
            if !dir.exists() {
                std::fs::create_dir_all(&dir)?;
            }
        }
        Ok(())
    }
}
