//! Server settings loaded via OrthoConfig.
//!
//! Values are layered from `FOODGRAM_*` environment variables, an optional
//! configuration file and command-line flags. Session toggles are validated
//! more strictly in release builds.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroize;

use foodgram_backend::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
/// Shortest master key `Key::derive_from` accepts.
const SESSION_KEY_DERIVE_MIN_LEN: usize = 32;
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings.
    Debug,
    /// Release builds require a real key and a consistent cookie policy.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Layered server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FOODGRAM")]
pub struct Settings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. Fixture ports are served without one.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub pool_size: Option<u32>,
    /// File holding the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Fall back to a generated key when the key file is unreadable.
    /// Off unless set.
    pub session_allow_ephemeral: Option<bool>,
    /// Mark session cookies `Secure`. On unless set to false.
    pub cookie_secure: Option<bool>,
    /// `SameSite` policy for session cookies.
    pub same_site: Option<String>,
}

/// Session cookie settings resolved from [`Settings`].
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

/// Errors raised while resolving settings.
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid same_site value '{value}'; expected {expected}")]
    SameSite {
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("same_site=None requires cookie_secure")]
    InsecureSameSiteNone,
}

impl Settings {
    /// Parsed listen address, defaulting to all interfaces on port 8080.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Pool configuration when a database URL is set.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref()?;
        let config = PoolConfig::new(url);
        Some(match self.pool_size {
            Some(size) => config.with_max_size(size),
            None => config,
        })
    }

    /// Whether session cookies carry the `Secure` attribute.
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    /// Whether an unreadable key file may fall back to a generated key.
    pub fn session_allow_ephemeral(&self) -> bool {
        self.session_allow_ephemeral.unwrap_or(false)
    }

    /// Path of the session key file.
    pub fn session_key_file(&self) -> &Path {
        self.session_key_file
            .as_deref()
            .unwrap_or_else(|| Path::new(SESSION_KEY_DEFAULT_PATH))
    }

    /// Resolve the session key and cookie policy.
    ///
    /// # Errors
    /// Fails on unknown `SameSite` values and on keys shorter than the
    /// mode's minimum. Release builds also refuse `SameSite=None` on
    /// insecure cookies and, unless ephemeral keys are allowed, an
    /// unreadable key file.
    pub fn session(&self, mode: BuildMode) -> Result<SessionSettings, SettingsError> {
        let same_site = self.same_site_policy(mode)?;
        let key = self.session_key(mode)?;
        Ok(SessionSettings {
            key,
            cookie_secure: self.cookie_secure(),
            same_site,
        })
    }

    fn same_site_policy(&self, mode: BuildMode) -> Result<SameSite, SettingsError> {
        let Some(value) = self.same_site.as_deref() else {
            return Ok(if mode.is_debug() {
                SameSite::Lax
            } else {
                SameSite::Strict
            });
        };

        match value.to_ascii_lowercase().as_str() {
            "lax" => Ok(SameSite::Lax),
            "strict" => Ok(SameSite::Strict),
            "none" if self.cookie_secure() => Ok(SameSite::None),
            "none" if mode.is_debug() => {
                warn!("same_site=None with insecure cookies; browsers may reject them");
                Ok(SameSite::None)
            }
            "none" => Err(SettingsError::InsecureSameSiteNone),
            _ => Err(SettingsError::SameSite {
                value: value.to_owned(),
                expected: SAMESITE_EXPECTED,
            }),
        }
    }

    fn session_key(&self, mode: BuildMode) -> Result<Key, SettingsError> {
        let path = self.session_key_file();
        match std::fs::read(path) {
            Ok(mut bytes) => {
                let length = bytes.len();
                let min_len = match mode {
                    BuildMode::Debug => SESSION_KEY_DERIVE_MIN_LEN,
                    BuildMode::Release => SESSION_KEY_MIN_LEN,
                };
                if length < min_len {
                    bytes.zeroize();
                    return Err(SettingsError::KeyTooShort {
                        path: path.to_path_buf(),
                        length,
                        min_len,
                    });
                }
                let key = Key::derive_from(&bytes);
                bytes.zeroize();
                Ok(key)
            }
            Err(error) if mode.is_debug() || self.session_allow_ephemeral() => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            }
            Err(source) => Err(SettingsError::KeyRead {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing and session resolution.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "FOODGRAM_BIND_ADDR",
        "FOODGRAM_DATABASE_URL",
        "FOODGRAM_POOL_SIZE",
        "FOODGRAM_SESSION_KEY_FILE",
        "FOODGRAM_SESSION_ALLOW_EPHEMERAL",
        "FOODGRAM_COOKIE_SECURE",
        "FOODGRAM_SAME_SITE",
    ];

    fn load_from_empty_args() -> Settings {
        Settings::load_from_iter([OsString::from("backend")]).expect("config should load")
    }

    fn cleared_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    fn settings() -> Settings {
        Settings {
            bind_addr: None,
            database_url: None,
            pool_size: None,
            session_key_file: Some(PathBuf::from("/nonexistent/foodgram/session_key")),
            session_allow_ephemeral: None,
            cookie_secure: None,
            same_site: None,
        }
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(cleared_with(&[]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default addr"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("addr")
        );
        assert!(settings.pool_config().is_none());
        assert!(settings.cookie_secure());
        assert!(!settings.session_allow_ephemeral());
        assert_eq!(settings.session_key_file(), Path::new(SESSION_KEY_DEFAULT_PATH));
    }

    #[rstest]
    fn unconfigured_session_cookies_are_secure() {
        let _guard = lock_env(cleared_with(&[]));

        let session = load_from_empty_args()
            .session(BuildMode::Debug)
            .expect("debug session falls back to a generated key");

        assert!(session.cookie_secure);
    }

    #[rstest]
    #[case("true", true)]
    #[case("false", false)]
    fn ephemeral_key_toggle_reads_the_environment(#[case] raw: &str, #[case] expected: bool) {
        let _guard = lock_env(cleared_with(&[("FOODGRAM_SESSION_ALLOW_EPHEMERAL", raw)]));

        assert_eq!(load_from_empty_args().session_allow_ephemeral(), expected);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(cleared_with(&[
            ("FOODGRAM_BIND_ADDR", "127.0.0.1:9000"),
            ("FOODGRAM_DATABASE_URL", "postgres://localhost/foodgram"),
            ("FOODGRAM_POOL_SIZE", "4"),
            ("FOODGRAM_COOKIE_SECURE", "false"),
            ("FOODGRAM_SAME_SITE", "Strict"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("addr"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("addr")
        );
        assert!(settings.pool_config().is_some());
        assert_eq!(settings.pool_size, Some(4));
        assert!(!settings.cookie_secure());
        assert_eq!(settings.same_site.as_deref(), Some("Strict"));
    }

    #[rstest]
    fn malformed_bind_addr_is_rejected() {
        let settings = Settings {
            bind_addr: Some("localhost".to_owned()),
            ..settings()
        };

        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
    }

    #[rstest]
    #[case(None, BuildMode::Debug, SameSite::Lax)]
    #[case(None, BuildMode::Release, SameSite::Strict)]
    #[case(Some("LAX"), BuildMode::Release, SameSite::Lax)]
    #[case(Some("none"), BuildMode::Release, SameSite::None)]
    fn same_site_policy_resolves(
        #[case] value: Option<&str>,
        #[case] mode: BuildMode,
        #[case] expected: SameSite,
    ) {
        let settings = Settings {
            same_site: value.map(str::to_owned),
            ..settings()
        };

        assert_eq!(settings.same_site_policy(mode).expect("policy"), expected);
    }

    #[rstest]
    fn insecure_same_site_none_is_rejected_in_release() {
        let settings = Settings {
            cookie_secure: Some(false),
            same_site: Some("None".to_owned()),
            ..settings()
        };

        assert!(matches!(
            settings.same_site_policy(BuildMode::Release),
            Err(SettingsError::InsecureSameSiteNone)
        ));
        assert_eq!(
            settings
                .same_site_policy(BuildMode::Debug)
                .expect("debug tolerates"),
            SameSite::None
        );
    }

    #[rstest]
    fn unknown_same_site_is_rejected() {
        let settings = Settings {
            same_site: Some("sometimes".to_owned()),
            ..settings()
        };

        assert!(matches!(
            settings.same_site_policy(BuildMode::Debug),
            Err(SettingsError::SameSite { .. })
        ));
    }

    #[rstest]
    #[case(BuildMode::Debug, false, true)]
    #[case(BuildMode::Release, true, true)]
    #[case(BuildMode::Release, false, false)]
    fn missing_key_file_falls_back_only_when_allowed(
        #[case] mode: BuildMode,
        #[case] allow_ephemeral: bool,
        #[case] expect_key: bool,
    ) {
        let settings = Settings {
            session_allow_ephemeral: Some(allow_ephemeral),
            ..settings()
        };

        assert_eq!(settings.session(mode).is_ok(), expect_key);
    }

    #[rstest]
    fn short_key_is_rejected_in_release() {
        let path = std::env::temp_dir().join(format!(
            "foodgram-short-key-{}",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&path, [b'k'; 40]).expect("write key");
        let settings = Settings {
            session_key_file: Some(path.clone()),
            ..settings()
        };

        let release = settings.session(BuildMode::Release);
        let debug = settings.session(BuildMode::Debug);
        std::fs::remove_file(&path).expect("remove key");

        assert!(matches!(release, Err(SettingsError::KeyTooShort { length: 40, .. })));
        assert!(debug.is_ok());
    }
}
