use crate::config::ReportConfig;
use crate::error::AdapterError;
use crate::report::{Report, Reporter};

/// [`Reporter`] that POSTs JSON with `reqwest`.
pub struct HttpReporter {
    http: reqwest::Client,
    config: ReportConfig,
}

impl HttpReporter {
    pub fn new(config: ReportConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(http: reqwest::Client, config: ReportConfig) -> Self {
        Self { http, config }
    }
}

impl Reporter for HttpReporter {
    async fn deliver(&self, report: &Report) -> Result<(), AdapterError> {
        let path = report.path(&self.config);
        let failure = |reason: String| AdapterError::ReportDeliveryFailure {
            path: path.to_string(),
            reason,
        };

        let resp = self
            .http
            .post(self.config.url(path))
            .header("Accept", "application/json")
            .json(report)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| failure(format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(failure(format!("server returned {}", resp.status())));
        }
        Ok(())
    }
}
