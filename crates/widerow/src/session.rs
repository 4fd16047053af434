use serde::Deserialize;
use std::{fmt, sync::OnceLock};

///
/// StoreConfig
///
/// Endpoint configuration for the connection collaborator, deserializable
/// from whatever config source the host application uses.
///

#[derive(Clone, Deserialize)]
pub struct StoreConfig {
    pub endpoint: String,
    pub instance: String,
    pub access_key_id: String,
    pub access_key_secret: String,
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("endpoint", &self.endpoint)
            .field("instance", &self.instance)
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"<redacted>")
            .finish()
    }
}

///
/// Session
///
/// Lazy-initialized handle holder: the client is constructed from the
/// config on first use and reused for the life of the session. The core
/// does not manage credentials, retries, or reconnection beyond this.
///

pub struct Session<C> {
    config: StoreConfig,
    init: fn(&StoreConfig) -> C,
    client: OnceLock<C>,
}

impl<C> Session<C> {
    #[must_use]
    pub const fn new(config: StoreConfig, init: fn(&StoreConfig) -> C) -> Self {
        Self {
            config,
            init,
            client: OnceLock::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The underlying client, constructing it on first access.
    pub fn client(&self) -> &C {
        self.client.get_or_init(|| (self.init)(&self.config))
    }
}
