use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;

use crate::{
    detect::{ClientHintsSource, JsonClientHints},
    resolver::DEFAULT_BASE_URL,
    runtime::Runtime,
};

pub const ENV_BASE_URL: &str = "CFTDRIVER_BASE_URL";
pub const ENV_OUTPUT_DIR: &str = "CFTDRIVER_OUTPUT_DIR";
pub const ENV_USER_AGENT: &str = "CFTDRIVER_USER_AGENT";
pub const ENV_CLIENT_HINTS: &str = "CFTDRIVER_CLIENT_HINTS";

/// Values given on the command line. Anything left `None` falls back to the
/// environment, then to a default.
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    pub base_url: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub user_agent: Option<String>,
    pub client_hints: Option<String>,
    pub client_hints_file: Option<PathBuf>,
}

pub struct Config<R: Runtime> {
    pub runtime: R,
    /// Bucket root the download URL is built under.
    pub base_url: String,
    pub output_dir: PathBuf,
    pub user_agent: Option<String>,
    pub client_hints: Option<JsonClientHints>,
}

impl<R: Runtime> Config<R> {
    pub fn new(runtime: R, options: ConfigOptions) -> Result<Self> {
        let base_url = options
            .base_url
            .or_else(|| non_empty_env(&runtime, ENV_BASE_URL))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        debug!("Using bucket root {}", base_url);

        let output_dir = match options
            .output_dir
            .or_else(|| non_empty_env(&runtime, ENV_OUTPUT_DIR).map(PathBuf::from))
        {
            Some(dir) => dir,
            None => runtime
                .current_dir()
                .context("Could not determine output directory")?,
        };

        let user_agent = options
            .user_agent
            .or_else(|| non_empty_env(&runtime, ENV_USER_AGENT));

        let client_hints = match (options.client_hints, options.client_hints_file) {
            (Some(raw), _) => Some(raw),
            (None, Some(path)) => match runtime.read_to_string(&path) {
                Ok(raw) => Some(raw),
                Err(e) => {
                    // Unreadable hints behave like a browser without the API
                    debug!("Ignoring client hints file {:?}: {:#}", path, e);
                    None
                }
            },
            (None, None) => non_empty_env(&runtime, ENV_CLIENT_HINTS),
        }
        .map(JsonClientHints::new);

        Ok(Self {
            runtime,
            base_url,
            output_dir,
            user_agent,
            client_hints,
        })
    }

    /// The configured client hints as a detection source.
    pub fn client_hints_source(&self) -> Option<&dyn ClientHintsSource> {
        self.client_hints
            .as_ref()
            .map(|hints| hints as &dyn ClientHintsSource)
    }
}

fn non_empty_env<R: Runtime>(runtime: &R, key: &str) -> Option<String> {
    runtime.env_var(key).ok().filter(|value| !value.is_empty())
}
