//! Minimal runtime configuration helpers: env-derived settings plus optional
//! dotenv-style file loading selected on the command line.

use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:9196";
pub const DEFAULT_REFRESH_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    /// MELCloud account credentials, used for the single login at startup.
    pub email: String,
    pub password: String,
    /// Device refresh cadence.
    pub refresh_interval: Duration,
    /// Address the metrics endpoint listens on.
    pub listen_addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let email = require_env("MELCLOUD_EMAIL")?;
        let password = require_env("MELCLOUD_PASSWORD")?;

        let refresh_secs = match std::env::var("REFRESH_INTERVAL_SECS") {
            Ok(s) => s
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|v| *v > 0)
                .ok_or_else(|| "REFRESH_INTERVAL_SECS must be a positive integer".to_string())?,
            Err(_) => DEFAULT_REFRESH_SECS,
        };

        let listen_addr = std::env::var("LISTEN_ADDR")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());

        Ok(Config {
            email,
            password,
            refresh_interval: Duration::from_secs(refresh_secs),
            listen_addr,
        })
    }
}

fn require_env(name: &str) -> Result<String, String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(format!("Missing required environment variable: {}", name)),
    }
}

/// Resolve `--env-file <path>` / `--env-file=<path>` from the command line and
/// load it into the process environment; with no flag, load `./.env` when it
/// exists. Returns the loaded path, if any.
pub fn configure_env_from_cli() -> Result<Option<PathBuf>, String> {
    let mut args = std::env::args_os();
    args.next(); // skip program name

    let mut env_file: Option<PathBuf> = None;
    while let Some(arg) = args.next() {
        let arg = arg
            .to_str()
            .ok_or_else(|| "argument contains invalid UTF-8".to_string())?
            .to_string();

        let path = if arg == "--env-file" {
            args.next()
                .map(PathBuf::from)
                .ok_or_else(|| "`--env-file` requires a path argument".to_string())?
        } else if let Some(inline) = arg.strip_prefix("--env-file=") {
            if inline.is_empty() {
                return Err("`--env-file` requires a path argument".to_string());
            }
            PathBuf::from(inline)
        } else {
            return Err(format!("unrecognised argument: {}", arg));
        };

        if env_file.replace(path).is_some() {
            return Err("`--env-file` provided more than once".to_string());
        }
    }

    match env_file {
        Some(path) => {
            if !path.is_file() {
                return Err(format!("env file not found: {}", path.display()));
            }
            load_env_file(&path)?;
            Ok(Some(path))
        }
        None => {
            let default_path = std::env::current_dir()
                .map_err(|e| format!("unable to read current directory: {}", e))?
                .join(".env");
            if default_path.is_file() {
                load_env_file(&default_path)?;
                Ok(Some(default_path))
            } else {
                Ok(None)
            }
        }
    }
}

fn load_env_file(path: &Path) -> Result<(), String> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| format!("failed to read {}: {}", path.display(), e))?;

    for (index, line) in contents.lines().enumerate() {
        match parse_env_line(line) {
            Ok(Some((key, value))) => {
                // Preserve any value that was already supplied via the process environment.
                if std::env::var_os(&key).is_none() {
                    // Updating process-level environment variables is unsafe on some targets.
                    unsafe {
                        std::env::set_var(key, value);
                    }
                }
            }
            Ok(None) => {}
            Err(e) => {
                return Err(format!("{}:{}: {}", path.display(), index + 1, e));
            }
        }
    }

    Ok(())
}

fn parse_env_line(line: &str) -> Result<Option<(String, String)>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let assignment = trimmed
        .strip_prefix("export ")
        .map(str::trim_start)
        .unwrap_or(trimmed);

    let Some((key, raw_value)) = assignment.split_once('=') else {
        return Err("missing '=' in assignment".to_string());
    };

    let key = key.trim();
    if key.is_empty() {
        return Err("environment variable name cannot be empty".to_string());
    }
    if key.chars().any(|c| c.is_whitespace()) {
        return Err(format!("environment variable name contains whitespace: {}", key));
    }

    let value = raw_value.trim();
    let value = if let Some(stripped) = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
    {
        stripped.to_string()
    } else {
        // Unquoted values stop at an inline comment.
        value.split('#').next().unwrap_or_default().trim_end().to_string()
    };

    Ok(Some((key.to_string(), value)))
}
