use anyhow::Context as _;
use keymap::FileStorage;
use paths::PathContext;
use std::marker::PhantomData;
#[cfg(debug_assertions)]
use std::path::PathBuf;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

pub mod config;
pub mod engine;
pub mod signals;

pub use config::{EngineConfig, NavigationSection, ShortcutSection, VIRTUAL_CONTROLLER_ID};
pub use engine::{Engine, TickReport};
pub use signals::{EngineSignal, SignalBus};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Application infrastructure context.
///
/// Contains path management, version info, and logging infrastructure.
pub struct AppContext {
    pub path_context: PathContext,
    pub version: &'static str,
    /// The log guard must be kept alive for the duration of the application
    /// to ensure log messages are properly flushed.
    _log_guard: tracing_appender::non_blocking::WorkerGuard,
}

impl AppContext {
    pub fn app_id(&self) -> &str {
        self.path_context.app_id()
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn path_context(&self) -> &PathContext {
        &self.path_context
    }

    /// Engine configuration from `config.toml`, defaults when absent.
    pub fn load_config(&self) -> EngineConfig {
        EngineConfig::load_or_default(&self.path_context.config_file())
    }

    /// Build an [`Engine`] persisting profiles under the storage directory.
    pub fn build_engine(&self) -> anyhow::Result<Engine> {
        let config = self.load_config();
        let storage = FileStorage::new(self.path_context.storage_dir())
            .context("Failed to open profile storage")?;
        Ok(Engine::new(&config, storage))
    }
}

/// Application metadata trait.
///
/// Define your application's identity by implementing this trait.
pub trait Application: Sized + 'static {
    const APP_ID: &'static str;
    const VENDOR: &'static str = "padnav";
}

/// Builder performing the common initialization every host needs.
pub struct AppBuilder<A: Application> {
    context: AppContext,
    _marker: PhantomData<A>,
}

impl<A: Application> AppBuilder<A> {
    /// Create a new application builder.
    ///
    /// This performs all the common initialization:
    /// - Sets up path context (platform-specific directories)
    /// - Ensures all directories exist
    /// - Initializes logging (file + console)
    pub fn new(version: &'static str) -> Result<Self, BoxError> {
        #[cfg(debug_assertions)]
        let path_context = PathContext::with_base_path(
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("..")
                .join("..")
                .join(".out"),
            A::VENDOR,
            A::APP_ID,
        );
        #[cfg(not(debug_assertions))]
        let path_context = PathContext::new(A::VENDOR, A::APP_ID);

        path_context.ensure_directories()?;

        let log_file_path = path_context.log_file_now();
        let log_dir = log_file_path
            .parent()
            .ok_or("log file path has no parent directory")?;
        let log_filename = log_file_path
            .file_name()
            .ok_or("log file path has no file name")?;

        let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        #[cfg(debug_assertions)]
        let level = LevelFilter::INFO;

        #[cfg(not(debug_assertions))]
        let level = LevelFilter::WARN;

        // RUST_LOG wins over the build-profile default.
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();

        let file_layer = fmt::Layer::default()
            .with_target(false)
            .with_ansi(false)
            .with_writer(non_blocking);

        let console_layer = fmt::Layer::default().with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer)
            .try_init()?;

        tracing::info!(app = A::APP_ID, version, "logging initialized");

        Ok(Self {
            context: AppContext {
                path_context,
                version,
                _log_guard: guard,
            },
            _marker: PhantomData,
        })
    }

    pub fn build(self) -> AppContext {
        self.context
    }
}
