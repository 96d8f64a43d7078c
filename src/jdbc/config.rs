use std::time::Duration;

use crate::error::{ConduitError, ConduitResult};

/// Backend named by a context's driver identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    Postgres,
    MySql,
    Sqlite,
}

impl DriverKind {
    /// Accepts short names as well as the usual JDBC driver class names.
    pub fn parse(driver: &str) -> ConduitResult<Self> {
        match driver.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "org.postgresql.driver" => Ok(Self::Postgres),
            "mysql" | "mariadb" | "com.mysql.cj.jdbc.driver" | "com.mysql.jdbc.driver" => {
                Ok(Self::MySql)
            }
            "sqlite" | "org.sqlite.jdbc" => Ok(Self::Sqlite),
            other => Err(ConduitError::connection(format!(
                "unsupported driver identifier '{other}'"
            ))),
        }
    }

    /// Url schemes understood by this backend.
    pub fn schemes(self) -> &'static [&'static str] {
        match self {
            Self::Postgres => &["postgres", "postgresql"],
            Self::MySql => &["mysql", "mariadb"],
            Self::Sqlite => &["sqlite"],
        }
    }
}

/// Pool settings applied to every relational connect.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolConf {
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub acquire_timeout: Duration,
    pub sqlx_logging: bool,
}

impl Default for PoolConf {
    fn default() -> Self {
        Self {
            max_connections: 3,
            min_connections: 1,
            connect_timeout: Duration::from_secs(8),
            acquire_timeout: Duration::from_secs(8),
            sqlx_logging: true,
        }
    }
}
