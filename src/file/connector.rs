use async_trait::async_trait;
use log::debug;
use std::path::PathBuf;
#[cfg(feature = "http")]
use std::time::Duration;

use super::resource::Resource;
use crate::connector::{Connector, ConnectorHandle};
use crate::error::{ConduitError, ConduitResult};
use crate::model::{DataContext, Protocol};

#[cfg(feature = "http")]
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolves `file:`, `http:` and `https:` urls to an opened resource.
#[derive(Debug, Clone)]
pub struct FileConnector {
    #[cfg(feature = "http")]
    timeout: Duration,
}

impl Default for FileConnector {
    fn default() -> Self {
        Self {
            #[cfg(feature = "http")]
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl FileConnector {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(feature = "http")]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn open_local(&self, location: &str) -> ConduitResult<Resource> {
        let path = local_path(location)?;
        debug!("[file] open {}", path.display());
        let file = tokio::fs::File::open(&path).await.map_err(|e| {
            ConduitError::connection_with(format!("open {} fail", path.display()), e)
        })?;
        Ok(Resource::Local { path, file })
    }

    #[cfg(feature = "http")]
    async fn open_remote(&self, url: &str) -> ConduitResult<Resource> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ConduitError::connection_with("build http client fail", e))?;
        debug!("[file] GET {url}");
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| ConduitError::connection_with(format!("GET {url} fail"), e))?
            .error_for_status()
            .map_err(|e| ConduitError::connection_with(format!("GET {url} rejected"), e))?;
        Ok(Resource::Remote {
            url: url.to_string(),
            response,
        })
    }
}

#[async_trait]
impl Connector for FileConnector {
    fn supported_protocol(&self) -> Protocol {
        Protocol::File
    }

    async fn connect(&self, context: &DataContext) -> ConduitResult<ConnectorHandle> {
        let resource = match context.protocol()? {
            Protocol::File => self.open_local(context.location()?).await?,
            #[cfg(feature = "http")]
            Protocol::Http | Protocol::Https => self.open_remote(context.url()).await?,
            other => {
                return Err(ConduitError::connection(format!(
                    "file connector cannot open '{other}' urls"
                )));
            }
        };
        Ok(ConnectorHandle::Resource(resource))
    }
}

/// Maps the body of a `file:` url to a local path.
///
/// Accepts `file:/abs`, `file:///abs`, `file://localhost/abs` and
/// `file:relative`; the path is percent-decoded.
fn local_path(location: &str) -> ConduitResult<PathBuf> {
    let raw = match location.strip_prefix("//") {
        Some(rest) => {
            let (host, path) = match rest.find('/') {
                Some(idx) => rest.split_at(idx),
                None => (rest, ""),
            };
            if !(host.is_empty() || host.eq_ignore_ascii_case("localhost")) {
                return Err(ConduitError::connection(format!(
                    "file url host '{host}' is not local"
                )));
            }
            path
        }
        None => location,
    };
    if raw.is_empty() {
        return Err(ConduitError::configuration("file url has an empty path"));
    }
    let decoded = urlencoding::decode(raw)
        .map_err(|e| ConduitError::configuration(format!("invalid file url '{raw}': {e}")))?;
    Ok(PathBuf::from(decoded.into_owned()))
}
