use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

/// Connection parameters for the Postgres pool.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "DatabaseSettings::default_host")]
    pub host: String,
    #[serde(default = "DatabaseSettings::default_port")]
    pub port: u16,
    #[serde(default = "DatabaseSettings::default_username")]
    pub username: String,
    #[serde(default = "DatabaseSettings::default_password")]
    pub password: String,
    #[serde(default = "DatabaseSettings::default_name")]
    pub name: String,
    #[serde(default = "DatabaseSettings::default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "DatabaseSettings::default_max_connections")]
    pub max_connections: u32,
    /// Bounds pool acquisition and the startup health check.
    #[serde(default = "DatabaseSettings::default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Directory scanned for `.sql` bootstrap scripts.
    #[serde(default = "DatabaseSettings::default_schema_dir")]
    pub schema_dir: String,
}

impl DatabaseSettings {
    fn default_host() -> String {
        "127.0.0.1".to_string()
    }

    fn default_port() -> u16 {
        5432
    }

    fn default_username() -> String {
        "postgres".to_string()
    }

    fn default_password() -> String {
        "postgres".to_string()
    }

    fn default_name() -> String {
        "bookshelf".to_string()
    }

    fn default_min_connections() -> u32 {
        1
    }

    fn default_max_connections() -> u32 {
        10
    }

    fn default_connect_timeout_secs() -> u64 {
        10
    }

    fn default_schema_dir() -> String {
        "db".to_string()
    }

    /// Structured connect options; credentials are never spliced into a URL,
    /// so reserved characters in the password stay literal.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.name)
    }

    pub fn connect_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            username: Self::default_username(),
            password: Self::default_password(),
            name: Self::default_name(),
            min_connections: Self::default_min_connections(),
            max_connections: Self::default_max_connections(),
            connect_timeout_secs: Self::default_connect_timeout_secs(),
            schema_dir: Self::default_schema_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_options_follow_settings() {
        let options = DatabaseSettings::default().connect_options();
        assert_eq!(options.get_host(), "127.0.0.1");
        assert_eq!(options.get_port(), 5432);
        assert_eq!(options.get_username(), "postgres");
        assert_eq!(options.get_database(), Some("bookshelf"));
    }

    #[test]
    fn reserved_characters_in_password_keep_the_host() {
        let settings = DatabaseSettings {
            password: "p@ss/w#rd".to_string(),
            ..DatabaseSettings::default()
        };
        let options = settings.connect_options();
        assert_eq!(options.get_host(), "127.0.0.1");
        assert_eq!(options.get_port(), 5432);
        assert_eq!(options.get_database(), Some("bookshelf"));
    }
}
