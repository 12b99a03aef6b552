use redis::{ConnectionAddr, ConnectionInfo, RedisConnectionInfo};
use serde::Deserialize;

/// Which cache backend serves the gateway.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Redis,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default)]
    pub backend: CacheBackend,
    #[serde(default = "CacheSettings::default_host")]
    pub host: String,
    #[serde(default = "CacheSettings::default_port")]
    pub port: u16,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub db: u8,
    /// Bounds the startup connection and every subsequent command.
    #[serde(default = "CacheSettings::default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "CacheSettings::default_memory_capacity")]
    pub memory_capacity: usize,
}

impl CacheSettings {
    fn default_host() -> String {
        "127.0.0.1".to_string()
    }

    fn default_port() -> u16 {
        6379
    }

    fn default_connect_timeout_secs() -> u64 {
        5
    }

    fn default_memory_capacity() -> usize {
        1024
    }

    /// Structured connection info. An empty password means none.
    pub fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            addr: ConnectionAddr::Tcp(self.host.clone(), self.port),
            redis: RedisConnectionInfo {
                db: i64::from(self.db),
                password: self.password.clone().filter(|p| !p.is_empty()),
                ..RedisConnectionInfo::default()
            },
        }
    }

    pub fn connect_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            host: Self::default_host(),
            port: Self::default_port(),
            password: None,
            db: 0,
            connect_timeout_secs: Self::default_connect_timeout_secs(),
            memory_capacity: Self::default_memory_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tcp_addr(info: &ConnectionInfo) -> (String, u16) {
        match &info.addr {
            ConnectionAddr::Tcp(host, port) => (host.clone(), *port),
            other => panic!("unexpected address {other:?}"),
        }
    }

    #[test]
    fn info_without_password() {
        let info = CacheSettings::default().connection_info();
        assert_eq!(tcp_addr(&info), ("127.0.0.1".to_string(), 6379));
        assert_eq!(info.redis.db, 0);
        assert!(info.redis.password.is_none());
    }

    #[test]
    fn info_with_password_and_db() {
        let settings = CacheSettings {
            password: Some("secret".to_string()),
            db: 2,
            ..CacheSettings::default()
        };
        let info = settings.connection_info();
        assert_eq!(info.redis.db, 2);
        assert_eq!(info.redis.password.as_deref(), Some("secret"));
    }

    #[test]
    fn reserved_characters_in_password_are_kept_verbatim() {
        let settings = CacheSettings {
            password: Some("p@ss/w#rd:1".to_string()),
            ..CacheSettings::default()
        };
        let info = settings.connection_info();
        assert_eq!(tcp_addr(&info), ("127.0.0.1".to_string(), 6379));
        assert_eq!(info.redis.password.as_deref(), Some("p@ss/w#rd:1"));
    }

    #[test]
    fn empty_password_is_ignored() {
        let settings = CacheSettings {
            password: Some(String::new()),
            ..CacheSettings::default()
        };
        assert!(settings.connection_info().redis.password.is_none());
    }
}
