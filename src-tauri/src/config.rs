//! Runtime Configuration
//!
//! Everything the app reads from its environment at startup.

use std::net::{TcpStream, ToSocketAddrs};
use std::path::PathBuf;
use std::time::Duration;

use tauri::{Url, WebviewUrl};
use tracing::warn;

pub const ENV_MODE: &str = "SLIDE_TODO_ENV";
pub const ENV_DATA_FILE: &str = "SLIDE_TODO_DATA";
pub const ENV_HOTKEY: &str = "SLIDE_TODO_HOTKEY";
pub const ENV_QUIT_HOTKEY: &str = "SLIDE_TODO_QUIT_HOTKEY";

pub const DEV_SERVER_URLS: [&str; 2] = ["http://localhost:5173", "http://localhost:5174"];
const PROBE_TIMEOUT: Duration = Duration::from_millis(150);

/// Data file location relative to the install/resource directory
pub const DATA_FILE_RELATIVE: &str = "data/todos.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// UI served by a local dev server
    Development,
    /// UI from the packaged static files
    #[default]
    Production,
}

impl RunMode {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => RunMode::Development,
            _ => RunMode::Production,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mode: RunMode,
    /// Explicit data file; otherwise resolved from the install location
    pub data_file: Option<PathBuf>,
    pub dev_urls: Vec<String>,
    pub toggle_hotkey: String,
    /// `None` when the quit hotkey is switched off
    pub quit_hotkey: Option<String>,
}

fn default_toggle_hotkey() -> &'static str {
    if cfg!(target_os = "macos") {
        "Super+Backquote"
    } else {
        "Control+Backquote"
    }
}

fn default_quit_hotkey() -> &'static str {
    if cfg!(target_os = "macos") {
        "Super+KeyQ"
    } else {
        "Control+KeyQ"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let quit_hotkey = match non_empty(ENV_QUIT_HOTKEY) {
            Some(v) if v.trim().eq_ignore_ascii_case("off") => None,
            Some(v) => Some(v),
            None => Some(default_quit_hotkey().to_string()),
        };

        Self {
            mode: non_empty(ENV_MODE).map(|v| RunMode::parse(&v)).unwrap_or_default(),
            data_file: non_empty(ENV_DATA_FILE).map(PathBuf::from),
            dev_urls: DEV_SERVER_URLS.iter().map(|u| u.to_string()).collect(),
            toggle_hotkey: non_empty(ENV_HOTKEY).unwrap_or_else(|| default_toggle_hotkey().to_string()),
            quit_hotkey,
        }
    }

    /// Explicit path, else `<install_dir>/data/todos.json`, else under `data_dir`
    pub fn resolve_data_file(&self, install_dir: Option<PathBuf>, data_dir: Option<PathBuf>) -> PathBuf {
        if let Some(path) = &self.data_file {
            return path.clone();
        }
        install_dir
            .or(data_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DATA_FILE_RELATIVE)
    }

    /// Where the panel loads its UI from
    pub fn window_url(&self) -> WebviewUrl {
        match self.mode {
            RunMode::Production => WebviewUrl::App("index.html".into()),
            RunMode::Development => {
                let chosen = first_reachable(&self.dev_urls)
                    .or_else(|| self.dev_urls.first().cloned())
                    .unwrap_or_else(|| DEV_SERVER_URLS[0].to_string());
                match Url::parse(&chosen) {
                    Ok(url) => WebviewUrl::External(url),
                    Err(e) => {
                        warn!("Invalid dev server url {}: {}", chosen, e);
                        WebviewUrl::App("index.html".into())
                    }
                }
            }
        }
    }
}

/// First url whose host:port accepts a TCP connection
pub fn first_reachable(urls: &[String]) -> Option<String> {
    urls.iter()
        .find(|raw| {
            let Ok(url) = Url::parse(raw) else {
                return false;
            };
            let (Some(host), Some(port)) = (url.host_str(), url.port_or_known_default()) else {
                return false;
            };
            match (host, port).to_socket_addrs() {
                Ok(addrs) => addrs
                    .into_iter()
                    .any(|addr| TcpStream::connect_timeout(&addr, PROBE_TIMEOUT).is_ok()),
                Err(_) => false,
            }
        })
        .cloned()
}
