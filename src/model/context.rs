use educe::Educe;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::types::{ContextProperty, Protocol, SourceType};
use crate::error::{ConduitError, ConduitResult};

/// Describes one access to a source or target: where it lives, how to log in
/// and what to read or write.
#[derive(Educe, Clone, PartialEq, Serialize, Deserialize)]
#[educe(Debug)]
pub struct DataContext {
    source_type: SourceType,
    url: String,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    #[educe(Debug(ignore))]
    password: Option<String>,
    #[serde(default)]
    driver: Option<String>,
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    properties: BTreeMap<ContextProperty, String>,
}

impl DataContext {
    pub fn builder(source_type: SourceType, url: impl Into<String>) -> DataContextBuilder {
        DataContextBuilder {
            ctx: DataContext {
                source_type,
                url: url.into(),
                user: None,
                password: None,
                driver: None,
                query: None,
                properties: BTreeMap::new(),
            },
        }
    }

    pub fn source_type(&self) -> SourceType {
        self.source_type
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn driver(&self) -> Option<&str> {
        self.driver.as_deref()
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn property(&self, key: ContextProperty) -> Option<&str> {
        self.properties.get(&key).map(String::as_str)
    }

    pub fn property_or<'a>(&'a self, key: ContextProperty, default: &'a str) -> &'a str {
        self.property(key).unwrap_or(default)
    }

    pub fn has_additional_properties(&self) -> bool {
        !self.properties.is_empty()
    }

    /// Substring of the url before the first `:`.
    pub fn protocol_string(&self) -> ConduitResult<&str> {
        self.url
            .split_once(':')
            .map(|(protocol, _)| protocol)
            .ok_or_else(|| {
                ConduitError::configuration(format!("url '{}' has no protocol prefix", self.url))
            })
    }

    pub fn protocol(&self) -> ConduitResult<Protocol> {
        self.protocol_string()?.parse()
    }

    /// Everything after the protocol prefix.
    pub fn location(&self) -> ConduitResult<&str> {
        self.url
            .split_once(':')
            .map(|(_, rest)| rest)
            .ok_or_else(|| {
                ConduitError::configuration(format!("url '{}' has no protocol prefix", self.url))
            })
    }

    pub fn validate(&self) -> ConduitResult<()> {
        if self.url.trim().is_empty() {
            return Err(ConduitError::configuration("url must not be empty"));
        }
        self.protocol()?;
        Ok(())
    }
}

pub struct DataContextBuilder {
    ctx: DataContext,
}

impl DataContextBuilder {
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.ctx.user = Some(user.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.ctx.password = Some(password.into());
        self
    }

    pub fn driver(mut self, driver: impl Into<String>) -> Self {
        self.ctx.driver = Some(driver.into());
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.ctx.query = Some(query.into());
        self
    }

    pub fn property(mut self, key: ContextProperty, value: impl Into<String>) -> Self {
        self.ctx.properties.insert(key, value.into());
        self
    }

    pub fn build(self) -> DataContext {
        self.ctx
    }
}
