//! Per-invocation state handed to every command.

use anyhow::Context;
use portos_client::{CartStore, ClientConfig, SessionStore, StorefrontClient};
use tracing::{debug, warn};

use crate::output::Output;

pub struct App {
    pub config: ClientConfig,
    pub client: StorefrontClient,
    pub out: Output,
}

impl App {
    /// Restores the saved session and builds the API client.
    pub async fn bootstrap(config: ClientConfig, json: bool) -> anyhow::Result<Self> {
        let session = SessionStore::new(config.session_path(), config.session.ttl_days);
        match session.load().await {
            Ok(true) => debug!("Using saved session"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Could not restore saved session"),
        }

        let client = StorefrontClient::new(&config, session).context("building API client")?;
        let out = Output::new(json, &config.display.currency_symbol);
        Ok(App {
            config,
            client,
            out,
        })
    }

    /// A cart store over this app's client. Starts empty; call `refresh`.
    pub fn cart_store(&self) -> CartStore<StorefrontClient> {
        CartStore::new(self.client.clone())
    }
}
