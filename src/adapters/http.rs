use crate::config::BackendConfig;
use crate::utils::error::Result;
use reqwest::Client;
use std::time::Duration;

/// One client for the whole run; CSV downloads and inserts share it.
pub fn build_client(backend: &BackendConfig) -> Result<Client> {
    let mut builder = Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));

    if let Some(secs) = backend.connect_timeout_seconds {
        builder = builder.connect_timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = backend.request_timeout_seconds {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    Ok(builder.build()?)
}
