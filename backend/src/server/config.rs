//! Server settings and the configuration object handed to [`super::create_server`].

use std::net::{Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;
use users_api::outbound::persistence::DbPool;

const DEFAULT_PORT: u16 = 3000;

/// Runtime settings loaded from CLI flags, `USERS_API_*` environment
/// variables and configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USERS_API")]
pub struct ServerSettings {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// TCP port to listen on.
    #[ortho_config(default = 3000)]
    pub port: u16,
}

impl ServerSettings {
    /// Address the listener binds to: every interface on the configured port.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Configuration listening on `bind_addr` with no database attached.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
        }
    }

    /// Attach a database connection pool; without one users live in memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> Result<ServerSettings, String> {
        ServerSettings::load_from_iter([OsString::from("users-api")]).map_err(|e| e.to_string())
    }

    #[rstest]
    fn port_defaults_to_3000() {
        let _guard = lock_env([
            (
                "USERS_API_DATABASE_URL",
                Some("postgres://localhost/users".to_owned()),
            ),
            ("USERS_API_PORT", None::<String>),
        ]);

        let settings = load_from_empty_args().expect("config should load");
        assert_eq!(settings.database_url, "postgres://localhost/users");
        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.bind_addr().to_string(), "0.0.0.0:3000");
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "USERS_API_DATABASE_URL",
                Some("postgres://db:5432/app".to_owned()),
            ),
            ("USERS_API_PORT", Some("8081".to_owned())),
        ]);

        let settings = load_from_empty_args().expect("config should load");
        assert_eq!(settings.database_url, "postgres://db:5432/app");
        assert_eq!(settings.bind_addr().port(), 8081);
    }

    #[rstest]
    fn database_url_is_required() {
        let _guard = lock_env([
            ("USERS_API_DATABASE_URL", None::<String>),
            ("USERS_API_PORT", None::<String>),
        ]);

        assert!(load_from_empty_args().is_err());
    }

    #[rstest]
    fn server_config_starts_without_pool() {
        let config = ServerConfig::default();
        assert!(config.db_pool.is_none());
        assert_eq!(config.bind_addr.port(), DEFAULT_PORT);
    }
}
