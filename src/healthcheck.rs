//! Liveness beacon fired after a fully drained cycle.

use std::future::Future;

use tracing::debug;

use crate::error::{Result, TemplogError};

/// Signals cycle completion to an external liveness monitor.
pub trait Pinger {
    /// Deliver the ping. Any non-2xx response is an error.
    fn ping(&self) -> impl Future<Output = Result<()>>;
}

/// Pinger that issues a single HTTP GET against a fixed URL.
pub struct HttpPinger {
    url: String,
}

impl HttpPinger {
    /// Create a pinger for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Pinger for HttpPinger {
    async fn ping(&self) -> Result<()> {
        let response = reqwest::get(self.url.as_str())
            .await
            .map_err(|e| TemplogError::healthcheck_error(e.to_string()))?;
        response
            .error_for_status()
            .map_err(|e| TemplogError::healthcheck_error(e.to_string()))?;
        debug!("healthcheck ping delivered");
        Ok(())
    }
}
