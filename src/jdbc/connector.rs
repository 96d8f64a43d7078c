use async_trait::async_trait;
use log::info;
use sea_orm::{ConnectOptions, Database};

use super::config::{DriverKind, PoolConf};
use crate::connector::{Connector, ConnectorHandle};
use crate::error::{ConduitError, ConduitResult};
use crate::model::{DataContext, Protocol};

/// Builds a pooled database connection from a `jdbc:` context.
#[derive(Debug, Clone, Default)]
pub struct RelationalConnector {
    pool: PoolConf,
}

impl RelationalConnector {
    pub fn new(pool: PoolConf) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PoolConf {
        &self.pool
    }
}

#[async_trait]
impl Connector for RelationalConnector {
    fn supported_protocol(&self) -> Protocol {
        Protocol::Jdbc
    }

    async fn connect(&self, context: &DataContext) -> ConduitResult<ConnectorHandle> {
        let (kind, url) = driver_url(context)?;
        info!("[jdbc] connect {:?} {}", kind, context.url());

        let mut opt = ConnectOptions::new(url);
        opt.max_connections(self.pool.max_connections)
            .min_connections(self.pool.min_connections)
            .connect_timeout(self.pool.connect_timeout)
            .acquire_timeout(self.pool.acquire_timeout)
            .sqlx_logging(self.pool.sqlx_logging)
            .sqlx_logging_level(log::LevelFilter::Debug);
        let db = Database::connect(opt).await.map_err(|e| {
            ConduitError::connection_with(format!("connect {} fail", context.url()), e)
        })?;
        Ok(ConnectorHandle::Database(db))
    }
}

/// Validates the driver against the url and returns the driver-native url.
pub(crate) fn driver_url(context: &DataContext) -> ConduitResult<(DriverKind, String)> {
    let driver = context
        .driver()
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| ConduitError::connection("jdbc connect requires a driver identifier"))?;
    let kind = DriverKind::parse(driver)?;

    let location = context.location()?;
    let scheme = location.split_once(':').map_or("", |(scheme, _)| scheme);
    if !kind.schemes().contains(&scheme) {
        return Err(ConduitError::connection(format!(
            "driver '{driver}' does not match url scheme '{scheme}'"
        )));
    }

    let url = match kind {
        DriverKind::Sqlite => location.to_string(),
        _ => with_credentials(location, context.user(), context.password()),
    };
    Ok((kind, url))
}

/// Puts percent-encoded credentials into the url authority unless it has some.
fn with_credentials(url: &str, user: Option<&str>, password: Option<&str>) -> String {
    let Some(user) = user.filter(|u| !u.is_empty()) else {
        return url.to_string();
    };
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let authority_end = rest.find(['/', '?']).unwrap_or(rest.len());
    if rest[..authority_end].contains('@') {
        return url.to_string();
    }

    let mut credentials = urlencoding::encode(user).into_owned();
    if let Some(password) = password {
        credentials.push(':');
        credentials.push_str(&urlencoding::encode(password));
    }
    format!("{scheme}://{credentials}@{rest}")
}
