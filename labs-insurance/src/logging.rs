//! Tracing setup with a filter that can be raised once the mod config is read.

use labs_insurance_core::ModConfig;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry};

const DEFAULT_FILTER: &str = "labs_insurance=info,labs_insurance_core=info";
const DEBUG_FILTER: &str = "labs_insurance=debug,labs_insurance_core=debug";

/// Handle on the installed log filter.
#[derive(Clone)]
pub struct LogLevel {
    handle: Option<reload::Handle<EnvFilter, Registry>>,
}

impl LogLevel {
    /// Install the global subscriber, at debug level when `verbose` is set and
    /// from `RUST_LOG` otherwise.
    pub fn init(verbose: bool) -> Self {
        let env_filter = if verbose {
            EnvFilter::new(DEBUG_FILTER)
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
        };
        let (filter, handle) = reload::Layer::new(env_filter);

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();

        Self {
            handle: Some(handle),
        }
    }

    /// A level with no subscriber behind it.
    pub fn detached() -> Self {
        Self { handle: None }
    }

    /// Raise the filter to debug when the config asks for it.
    pub fn apply_config(&self, config: &ModConfig) -> bool {
        if !config.debug {
            return false;
        }
        let Some(handle) = &self.handle else {
            return false;
        };
        match handle.reload(EnvFilter::new(DEBUG_FILTER)) {
            Ok(()) => {
                debug!("debug logging enabled by mod config");
                true
            }
            Err(err) => {
                eprintln!("failed to raise log level: {err}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_level_ignores_debug_flag() {
        let config = ModConfig {
            debug: true,
            ..ModConfig::default()
        };
        assert!(!LogLevel::detached().apply_config(&config));
    }

    #[test]
    fn test_reload_raises_filter() {
        let (filter, handle) =
            reload::Layer::<EnvFilter, Registry>::new(EnvFilter::new(DEFAULT_FILTER));
        let subscriber = tracing_subscriber::registry().with(filter);
        let level = LogLevel {
            handle: Some(handle.clone()),
        };

        tracing::subscriber::with_default(subscriber, || {
            assert!(!level.apply_config(&ModConfig::default()));
            assert!(handle
                .with_current(|filter| filter.to_string().to_lowercase())
                .unwrap()
                .contains("labs_insurance_core=info"));

            let config = ModConfig {
                debug: true,
                ..ModConfig::default()
            };
            assert!(level.apply_config(&config));
            assert!(handle
                .with_current(|filter| filter.to_string().to_lowercase())
                .unwrap()
                .contains("labs_insurance_core=debug"));
        });
    }
}
