//! Saved server profiles.
//!
//! Profiles live in a small YAML file in the home directory. A missing file
//! is replaced by a single `local` profile so a fresh install can connect to
//! a server on the same machine without any setup.

use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name used under the home directory.
pub const CONFIG_FILE_NAME: &str = ".relay-tui.yaml";

/// Name of the profile created on first run.
pub const DEFAULT_SERVER_NAME: &str = "local";

const DEFAULT_SERVER_URL: &str = "http://localhost:3002";
const DEFAULT_SERVER_TOKEN: &str = "changeme";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("reading config: {0}")]
    Read(#[source] io::Error),

    /// The file is not valid YAML for [`Config`].
    #[error("parsing config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The file could not be written.
    #[error("writing config: {0}")]
    Write(#[source] io::Error),

    /// No profile with this name.
    #[error("server {0:?} not found in config")]
    NotFound(String),

    /// A profile with this name already exists.
    #[error("server {0:?} already exists. Remove it first or choose a different name")]
    Duplicate(String),

    /// A required profile field was blank.
    #[error("server {0} must not be empty")]
    Blank(&'static str),
}

/// One named server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerProfile {
    /// Short name used with `--server`.
    pub name: String,
    /// REST base URL.
    pub url: String,
    /// Bearer token.
    pub token: String,
}

/// All saved profiles, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Saved servers.
    #[serde(default)]
    pub servers: Vec<ServerProfile>,
}

impl Config {
    /// The configuration written on first run.
    pub fn initial() -> Self {
        Self {
            servers: vec![ServerProfile {
                name: DEFAULT_SERVER_NAME.to_owned(),
                url: DEFAULT_SERVER_URL.to_owned(),
                token: DEFAULT_SERVER_TOKEN.to_owned(),
            }],
        }
    }

    /// Load profiles from `path`, creating the file if it does not exist.
    ///
    /// Returns the config and whether it was just created. A default config
    /// that cannot be saved is still returned.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load_or_init(path: &Path) -> Result<(Self, bool), ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let config = Self::initial();
                let created = match config.save(path) {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), "default config not saved: {e}");
                        false
                    },
                };
                return Ok((config, created));
            },
            Err(e) => return Err(ConfigError::Read(e)),
        };

        Ok((serde_yaml::from_str(&text)?, false))
    }

    /// Write profiles to `path`, readable only by the owner.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = serde_yaml::to_string(self)?;

        let mut options = OpenOptions::new();
        options.create(true).write(true).truncate(true);

        // Tokens are credentials.
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(path).map_err(ConfigError::Write)?;
        file.write_all(text.as_bytes()).map_err(ConfigError::Write)
    }

    /// Look up a profile by name.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotFound`] if no profile has this name.
    pub fn find_server(&self, name: &str) -> Result<&ServerProfile, ConfigError> {
        self.servers
            .iter()
            .find(|server| server.name == name)
            .ok_or_else(|| ConfigError::NotFound(name.to_owned()))
    }

    /// Add a profile. A trailing `/` on the URL is dropped.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Blank`] for an empty field, [`ConfigError::Duplicate`]
    /// if the name is taken.
    pub fn add_server(&mut self, name: &str, url: &str, token: &str) -> Result<(), ConfigError> {
        for (field, value) in [("name", name), ("url", url), ("token", token)] {
            if value.trim().is_empty() {
                return Err(ConfigError::Blank(field));
            }
        }
        if self.servers.iter().any(|server| server.name == name) {
            return Err(ConfigError::Duplicate(name.to_owned()));
        }

        self.servers.push(ServerProfile {
            name: name.to_owned(),
            url: url.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
        });
        Ok(())
    }

    /// Remove a profile by name.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotFound`] if no profile has this name.
    pub fn remove_server(&mut self, name: &str) -> Result<ServerProfile, ConfigError> {
        let index = self
            .servers
            .iter()
            .position(|server| server.name == name)
            .ok_or_else(|| ConfigError::NotFound(name.to_owned()))?;
        Ok(self.servers.remove(index))
    }

    /// Profiles as an aligned NAME/URL/TOKEN table with masked tokens.
    pub fn table(&self) -> String {
        let rows: Vec<[String; 3]> = std::iter::once(["NAME".into(), "URL".into(), "TOKEN".into()])
            .chain(
                self.servers
                    .iter()
                    .map(|s| [s.name.clone(), s.url.clone(), mask_token(&s.token)]),
            )
            .collect();

        let name_width = rows.iter().map(|row| row[0].chars().count()).max().unwrap_or(0);
        let url_width = rows.iter().map(|row| row[1].chars().count()).max().unwrap_or(0);

        rows.iter()
            .map(|[name, url, token]| format!("{name:<name_width$}  {url:<url_width$}  {token}\n"))
            .collect()
    }
}

/// Default config location: `~/.relay-tui.yaml`, or the working directory
/// when there is no home directory.
pub fn default_path() -> PathBuf {
    dirs::home_dir()
        .map_or_else(|| PathBuf::from(CONFIG_FILE_NAME), |home| home.join(CONFIG_FILE_NAME))
}

/// Hide all but the first and last two characters of a token.
///
/// Tokens of four characters or fewer are hidden entirely.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }

    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{head}{}{tail}", "*".repeat(chars.len() - 4))
}
