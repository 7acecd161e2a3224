//! Settings resolution for the Nexus client.
//!
//! A [`Settings`] value is built once per invocation from, in order of
//! increasing precedence: built-in defaults, the JSON configuration file,
//! `NEXUS3_*` environment variables and explicit arguments. The `login`
//! command persists it with [`Settings::dump`] and [`Settings::dump_env`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{
    collections::BTreeMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::debug;
use url::Url;

pub const ENV_VAR_PREFIX: &str = "NEXUS3";
pub const CONFIG_PATH_ENV_VAR: &str = "NEXUS3_CONFIG";
pub const DEFAULT_CONFIGURATION_FILE_NAME: &str = ".nexus-cli";
pub const ENV_FILE_EXTENSION: &str = "env";

pub const DEFAULT_URL: &str = "http://localhost:8081";
pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "";
pub const DEFAULT_X509_VERIFY: bool = true;
pub const DEFAULT_GROOVY_ENABLED: bool = true;

pub const KEY_API_VERSION: &str = "api_version";
pub const KEY_GROOVY_ENABLED: &str = "groovy_enabled";
pub const KEY_PASSWORD: &str = "password";
pub const KEY_URL: &str = "url";
pub const KEY_USERNAME: &str = "username";
pub const KEY_X509_VERIFY: &str = "x509_verify";

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("failed to resolve the home directory")]
    FailedToFindHomeDirectory,
    #[error("failed to load configuration from {path:?}, because of: {cause}")]
    ConfigFile {
        path: PathBuf,
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("failed to write configuration data to {path:?}, because of: {cause}")]
    FailedToWriteData {
        path: PathBuf,
        cause: std::io::Error,
    },
    #[error("invalid Nexus URL {url:?}: {cause}")]
    InvalidUrl { url: String, cause: url::ParseError },
    #[error("invalid value {value:?} for {name}")]
    InvalidValue { name: String, value: String },
}

/// Nexus REST API version used to build the service path.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ApiVersion {
    #[default]
    V1,
}

/// Optional values layered on top of [`Settings`].
///
/// The same shape is read from the configuration file, from the environment
/// and from explicit command-line arguments. `None` never overrides anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsOverrides {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub x509_verify: Option<bool>,
    #[serde(default)]
    pub api_version: Option<ApiVersion>,
    #[serde(default)]
    pub groovy_enabled: Option<bool>,
}

impl SettingsOverrides {
    /// Build overrides from a JSON mapping. Unknown keys and `null` values are ignored.
    pub fn from_map(map: &Map<String, Value>) -> Result<SettingsOverrides, serde_json::Error> {
        serde_json::from_value(Value::Object(map.clone()))
    }

    /// Read `NEXUS3_*` variables from the running process.
    pub fn from_process_env() -> Result<SettingsOverrides, ConfigurationError> {
        Self::from_env_vars(std::env::vars())
    }

    /// Read `NEXUS3_*` variables from an environment snapshot.
    pub fn from_env_vars<I, K, V>(vars: I) -> Result<SettingsOverrides, ConfigurationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut overrides = SettingsOverrides::default();
        let prefix = format!("{}_", ENV_VAR_PREFIX);

        for (name, value) in vars {
            let name = name.as_ref();
            let value = value.as_ref();
            let Some(key) = name.strip_prefix(&prefix) else {
                continue;
            };

            match key.to_lowercase().as_str() {
                KEY_URL => overrides.url = Some(value.to_string()),
                KEY_USERNAME => overrides.username = Some(value.to_string()),
                KEY_PASSWORD => overrides.password = Some(value.to_string()),
                KEY_X509_VERIFY => overrides.x509_verify = Some(parse_bool(name, value)?),
                KEY_GROOVY_ENABLED => overrides.groovy_enabled = Some(parse_bool(name, value)?),
                KEY_API_VERSION => {
                    let version = ApiVersion::from_str(value).map_err(|_| {
                        ConfigurationError::InvalidValue {
                            name: name.to_string(),
                            value: value.to_string(),
                        }
                    })?;
                    overrides.api_version = Some(version);
                }
                _ => {}
            }
        }

        Ok(overrides)
    }

    pub fn is_empty(&self) -> bool {
        *self == SettingsOverrides::default()
    }
}

/// Parse the boolean spellings accepted in environment variables.
pub fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigurationError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ConfigurationError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

fn normalize_url(raw: &str) -> Result<String, ConfigurationError> {
    let mut url = raw.trim().to_string();
    if !url.ends_with('/') {
        url.push('/');
    }

    Url::parse(&url).map_err(|cause| ConfigurationError::InvalidUrl {
        url: raw.to_string(),
        cause,
    })?;

    Ok(url)
}

/// Resolved connection settings for one Nexus server.
#[derive(Clone, PartialEq)]
pub struct Settings {
    url: String,
    username: String,
    password: String,
    x509_verify: bool,
    api_version: ApiVersion,
    groovy_enabled: bool,
    config_path: PathBuf,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"********")
            .field("x509_verify", &self.x509_verify)
            .field("api_version", &self.api_version)
            .field("groovy_enabled", &self.groovy_enabled)
            .field("config_path", &self.config_path)
            .finish()
    }
}

impl Settings {
    /// Built-in defaults bound to `config_path`.
    pub fn new(config_path: PathBuf) -> Settings {
        Settings {
            url: format!("{}/", DEFAULT_URL),
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            x509_verify: DEFAULT_X509_VERIFY,
            api_version: ApiVersion::default(),
            groovy_enabled: DEFAULT_GROOVY_ENABLED,
            config_path,
        }
    }

    /// `~/.nexus-cli`, unless `NEXUS3_CONFIG` points elsewhere.
    pub fn default_configuration_file_path() -> Result<PathBuf, ConfigurationError> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV_VAR) {
            return Ok(PathBuf::from(path));
        }

        match dirs::home_dir() {
            Some(mut path) => {
                path.push(DEFAULT_CONFIGURATION_FILE_NAME);
                Ok(path)
            }
            None => Err(ConfigurationError::FailedToFindHomeDirectory),
        }
    }

    /// Load settings from `config_path`. The file must exist and hold a JSON object.
    pub fn load(config_path: PathBuf) -> Result<Settings, ConfigurationError> {
        debug!("Loading configuration from {}...", config_path.display());

        let data = fs::read_to_string(&config_path).map_err(|cause| {
            ConfigurationError::ConfigFile {
                path: config_path.clone(),
                cause: Box::new(cause),
            }
        })?;

        let stored: SettingsOverrides =
            serde_json::from_str(&data).map_err(|cause| ConfigurationError::ConfigFile {
                path: config_path.clone(),
                cause: Box::new(cause),
            })?;

        let mut settings = Settings::new(config_path);
        settings.merge(&stored)?;
        Ok(settings)
    }

    /// Resolve settings with explicit > environment > file > default precedence.
    ///
    /// A missing file only means nothing was persisted yet; a corrupt one is an error.
    pub fn resolve(
        config_path: PathBuf,
        environment: &SettingsOverrides,
        explicit: &SettingsOverrides,
    ) -> Result<Settings, ConfigurationError> {
        let mut settings = if config_path.exists() {
            Settings::load(config_path)?
        } else {
            debug!(
                "Configuration file {} not found, using defaults",
                config_path.display()
            );
            Settings::new(config_path)
        };

        settings.merge(environment)?;
        settings.merge(explicit)?;
        Ok(settings)
    }

    /// Overlay every present value of `overrides`.
    pub fn merge(&mut self, overrides: &SettingsOverrides) -> Result<(), ConfigurationError> {
        let url = match &overrides.url {
            Some(url) => Some(normalize_url(url)?),
            None => None,
        };

        if let Some(url) = url {
            self.url = url;
        }
        if let Some(username) = &overrides.username {
            self.username = username.clone();
        }
        if let Some(password) = &overrides.password {
            self.password = password.clone();
        }
        if let Some(x509_verify) = overrides.x509_verify {
            self.x509_verify = x509_verify;
        }
        if let Some(api_version) = overrides.api_version {
            self.api_version = api_version;
        }
        if let Some(groovy_enabled) = overrides.groovy_enabled {
            self.groovy_enabled = groovy_enabled;
        }

        Ok(())
    }

    /// Overlay the non-null recognised keys of a JSON mapping.
    pub fn merge_with_dict(&mut self, values: &Map<String, Value>) -> Result<(), ConfigurationError> {
        let overrides = SettingsOverrides::from_map(values).map_err(|cause| {
            ConfigurationError::InvalidValue {
                name: "settings".to_string(),
                value: cause.to_string(),
            }
        })?;
        self.merge(&overrides)
    }

    /// All recognised settings keyed by their persisted name.
    pub fn to_dict(&self) -> BTreeMap<String, Value> {
        let mut dict = BTreeMap::new();
        dict.insert(
            KEY_API_VERSION.to_string(),
            Value::String(self.api_version.to_string()),
        );
        dict.insert(KEY_GROOVY_ENABLED.to_string(), Value::Bool(self.groovy_enabled));
        dict.insert(KEY_PASSWORD.to_string(), Value::String(self.password.clone()));
        dict.insert(KEY_URL.to_string(), Value::String(self.url.clone()));
        dict.insert(KEY_USERNAME.to_string(), Value::String(self.username.clone()));
        dict.insert(KEY_X509_VERIFY.to_string(), Value::Bool(self.x509_verify));
        dict
    }

    /// Write the settings as JSON to [`Settings::config_path`].
    pub fn dump(&self) -> Result<PathBuf, ConfigurationError> {
        let mut data = serde_json::to_string_pretty(&self.to_dict()).map_err(|cause| {
            ConfigurationError::FailedToWriteData {
                path: self.config_path.clone(),
                cause: std::io::Error::other(cause),
            }
        })?;
        data.push('\n');

        write_private(&self.config_path, data.as_bytes())?;
        Ok(self.config_path.clone())
    }

    /// Write the settings as shell-sourceable `NEXUS3_KEY=value` lines.
    pub fn dump_env(&self) -> Result<PathBuf, ConfigurationError> {
        let path = self.env_file_path();
        let mut data = String::new();

        for (key, value) in self.to_dict() {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            data.push_str(&format!(
                "{}_{}={}\n",
                ENV_VAR_PREFIX,
                key.to_uppercase(),
                value
            ));
        }

        write_private(&path, data.as_bytes())?;
        Ok(path)
    }

    pub fn env_file_path(&self) -> PathBuf {
        self.config_path.with_extension(ENV_FILE_EXTENSION)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn auth(&self) -> (&str, &str) {
        (&self.username, &self.password)
    }

    pub fn x509_verify(&self) -> bool {
        self.x509_verify
    }

    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    pub fn groovy_enabled(&self) -> bool {
        self.groovy_enabled
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

/// Replace `path` with `contents`, readable and writable by the owner only.
///
/// The data goes to a temporary sibling whose mode is restricted before the
/// first byte is written, and is then renamed over the destination.
fn write_private(path: &Path, contents: &[u8]) -> Result<(), ConfigurationError> {
    let write_error = |cause: std::io::Error| ConfigurationError::FailedToWriteData {
        path: path.to_path_buf(),
        cause,
    };

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&directory).map_err(write_error)?;

    let mut file = tempfile::Builder::new()
        .prefix(DEFAULT_CONFIGURATION_FILE_NAME)
        .tempfile_in(&directory)
        .map_err(write_error)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(write_error)?;
    }

    file.write_all(contents).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;
    file.persist(path).map_err(|e| write_error(e.error))?;

    debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_overrides() -> SettingsOverrides {
        SettingsOverrides {
            url: Some("https://nexus.example.com:8443".to_string()),
            username: Some("deployer".to_string()),
            password: Some("s3cr3t".to_string()),
            x509_verify: Some(false),
            api_version: Some(ApiVersion::V1),
            groovy_enabled: Some(false),
        }
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::new(PathBuf::from("/tmp/none"));
        assert_eq!(settings.url(), "http://localhost:8081/");
        assert_eq!(settings.auth(), ("admin", ""));
        assert!(settings.x509_verify());
        assert!(settings.groovy_enabled());
        assert_eq!(settings.api_version(), ApiVersion::V1);
    }

    #[test]
    fn test_url_always_has_trailing_slash() {
        let mut settings = Settings::new(PathBuf::from("/tmp/none"));
        settings
            .merge(&SettingsOverrides {
                url: Some("http://nexus:8081/nexus".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(settings.url(), "http://nexus:8081/nexus/");

        settings
            .merge(&SettingsOverrides {
                url: Some("http://nexus:8081/".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(settings.url(), "http://nexus:8081/");
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let mut settings = Settings::new(PathBuf::from("/tmp/none"));
        let result = settings.merge(&SettingsOverrides {
            url: Some("not a url".to_string()),
            ..Default::default()
        });
        assert!(matches!(result, Err(ConfigurationError::InvalidUrl { .. })));
        assert_eq!(settings.url(), "http://localhost:8081/");
    }

    #[test]
    fn test_dump_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nexus-cli");

        let mut settings = Settings::new(path.clone());
        settings.merge(&sample_overrides()).unwrap();
        settings.dump().unwrap();

        let fresh = Settings::new(path.clone());
        assert_ne!(fresh.to_dict(), settings.to_dict());

        let loaded = Settings::load(path).unwrap();
        assert_eq!(loaded.to_dict(), settings.to_dict());
    }

    #[cfg(unix)]
    #[test]
    fn test_dump_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let settings = Settings::new(dir.path().join("nexus-cli"));

        let config = settings.dump().unwrap();
        let env = settings.dump_env().unwrap();

        for path in [config, env] {
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600, "{}", path.display());
        }
    }

    #[test]
    fn test_dump_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nexus-cli");
        fs::write(&path, "x".repeat(4096)).unwrap();

        let settings = Settings::new(path.clone());
        settings.dump().unwrap();

        let loaded = Settings::load(path).unwrap();
        assert_eq!(loaded.to_dict(), settings.to_dict());
    }

    #[test]
    fn test_dump_env_is_sorted() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::new(dir.path().join(".nexus-cli"));

        let path = settings.dump_env().unwrap();
        assert_eq!(path, dir.path().join(".nexus-cli.env"));

        let contents = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines,
            vec![
                "NEXUS3_API_VERSION=v1",
                "NEXUS3_GROOVY_ENABLED=true",
                "NEXUS3_PASSWORD=",
                "NEXUS3_URL=http://localhost:8081/",
                "NEXUS3_USERNAME=admin",
                "NEXUS3_X509_VERIFY=true",
            ]
        );
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let result = Settings::load(dir.path().join("missing"));
        assert!(matches!(result, Err(ConfigurationError::ConfigFile { .. })));
    }

    #[test]
    fn test_load_corrupt_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nexus-cli");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Settings::load(path),
            Err(ConfigurationError::ConfigFile { .. })
        ));
    }

    #[test]
    fn test_load_ignores_unknown_and_defaults_missing_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nexus-cli");
        fs::write(
            &path,
            r#"{"username": "ci", "nexus_url": "http://old", "colour": "blue"}"#,
        )
        .unwrap();

        let settings = Settings::load(path).unwrap();
        assert_eq!(settings.username(), "ci");
        assert_eq!(settings.url(), "http://localhost:8081/");
        assert!(settings.x509_verify());
    }

    #[test]
    fn test_merge_with_empty_or_null_dict_is_noop() {
        let mut settings = Settings::new(PathBuf::from("/tmp/none"));
        settings.merge(&sample_overrides()).unwrap();
        let before = settings.to_dict();

        settings.merge_with_dict(&Map::new()).unwrap();
        assert_eq!(settings.to_dict(), before);

        let nulls = json!({
            "url": null,
            "username": null,
            "password": null,
            "x509_verify": null,
            "api_version": null,
            "groovy_enabled": null
        });
        settings.merge_with_dict(nulls.as_object().unwrap()).unwrap();
        assert_eq!(settings.to_dict(), before);
    }

    #[test]
    fn test_merge_with_dict_overrides_present_values() {
        let mut settings = Settings::new(PathBuf::from("/tmp/none"));
        let values = json!({"x509_verify": false, "username": null});
        settings.merge_with_dict(values.as_object().unwrap()).unwrap();
        assert!(!settings.x509_verify());
        assert_eq!(settings.username(), "admin");
    }

    #[test]
    fn test_env_overrides_parse_booleans_case_insensitively() {
        let vars = vec![
            ("NEXUS3_GROOVY_ENABLED", "False"),
            ("NEXUS3_X509_VERIFY", "TRUE"),
            ("NEXUS3_URL", "http://env:8081"),
            ("HOME", "/root"),
        ];
        let overrides = SettingsOverrides::from_env_vars(vars).unwrap();
        assert_eq!(overrides.groovy_enabled, Some(false));
        assert_eq!(overrides.x509_verify, Some(true));
        assert_eq!(overrides.url.as_deref(), Some("http://env:8081"));
        assert_eq!(overrides.username, None);
    }

    #[test]
    fn test_env_rejects_bad_boolean() {
        let result = SettingsOverrides::from_env_vars(vec![("NEXUS3_X509_VERIFY", "maybe")]);
        match result {
            Err(ConfigurationError::InvalidValue { name, .. }) => {
                assert_eq!(name, "NEXUS3_X509_VERIFY")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_precedence_explicit_env_file_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nexus-cli");
        fs::write(
            &path,
            r#"{"url": "http://file:8081", "username": "file-user", "password": "file-pass"}"#,
        )
        .unwrap();

        let environment = SettingsOverrides {
            url: Some("http://env:8081".to_string()),
            username: Some("env-user".to_string()),
            ..Default::default()
        };
        let explicit = SettingsOverrides {
            url: Some("http://explicit:8081".to_string()),
            ..Default::default()
        };

        let settings = Settings::resolve(path, &environment, &explicit).unwrap();
        assert_eq!(settings.url(), "http://explicit:8081/");
        assert_eq!(settings.username(), "env-user");
        assert_eq!(settings.password(), "file-pass");
        assert_eq!(settings.x509_verify(), DEFAULT_X509_VERIFY);
    }

    #[test]
    fn test_resolve_without_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::resolve(
            dir.path().join("missing"),
            &SettingsOverrides::default(),
            &SettingsOverrides::default(),
        )
        .unwrap();
        assert_eq!(settings.to_dict(), Settings::new(PathBuf::new()).to_dict());
    }

    #[test]
    fn test_debug_hides_password() {
        let mut settings = Settings::new(PathBuf::from("/tmp/none"));
        settings.merge(&sample_overrides()).unwrap();
        assert!(!format!("{:?}", settings).contains("s3cr3t"));
    }
}
