use ethereum_adapter::{AdapterError, Report, ReportConfig, Reporter};
use gloo_net::http::Request;

/// [`Reporter`] over the browser's `fetch`. The configured timeout is not
/// applied; `fetch` has none.
pub struct FetchReporter {
    config: ReportConfig,
}

impl FetchReporter {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }
}

impl Reporter for FetchReporter {
    async fn deliver(&self, report: &Report) -> Result<(), AdapterError> {
        let path = report.path(&self.config);
        let failure = |reason: String| AdapterError::ReportDeliveryFailure {
            path: path.to_string(),
            reason,
        };

        let resp = Request::post(&self.config.url(path))
            .header("Accept", "application/json")
            .json(report)
            .map_err(|e| failure(format!("failed to build request: {e}")))?
            .send()
            .await
            .map_err(|e| failure(format!("request failed: {e}")))?;

        if !resp.ok() {
            return Err(failure(format!("server returned {}", resp.status())));
        }
        Ok(())
    }
}
