use bytes::Bytes;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

use crate::error::{ConduitError, ConduitResult};

/// Opened byte source whose content has not been read yet.
#[derive(Debug)]
pub enum Resource {
    Local {
        path: PathBuf,
        file: tokio::fs::File,
    },
    #[cfg(feature = "http")]
    Remote {
        url: String,
        response: reqwest::Response,
    },
}

impl Resource {
    pub fn describe(&self) -> String {
        match self {
            Self::Local { path, .. } => format!("file:{}", path.display()),
            #[cfg(feature = "http")]
            Self::Remote { url, .. } => url.clone(),
        }
    }

    /// Consumes the resource and returns its full content.
    pub async fn read_bytes(self) -> ConduitResult<Bytes> {
        match self {
            Self::Local { path, mut file } => {
                let mut buf = Vec::new();
                file.read_to_end(&mut buf).await.map_err(|e| {
                    ConduitError::source_with(format!("read {} fail", path.display()), e)
                })?;
                Ok(Bytes::from(buf))
            }
            #[cfg(feature = "http")]
            Self::Remote { url, response } => response
                .bytes()
                .await
                .map_err(|e| ConduitError::source_with(format!("read {url} fail"), e)),
        }
    }
}
