//! Provider discovery.
//!
//! Probes the environment until a provider shows up or the detection timeout
//! runs out, then checks the result against the ambient reference. The ambient
//! reference is authoritative: a mismatch is only reported.

use crate::config::DetectOptions;
use crate::error::AdapterError;
use crate::provider::{Provider, ProviderSource};

/// Result of a successful detection.
#[derive(Debug)]
pub struct Detected<P> {
    /// The provider the adapter will use.
    pub provider: P,
    /// Set when the detected instance was not the ambient one.
    pub conflict: bool,
}

pub struct ProviderDetector {
    options: DetectOptions,
}

impl ProviderDetector {
    pub fn new(options: DetectOptions) -> Self {
        Self { options }
    }

    /// Find the provider. `ProviderAbsent` is fatal for the page.
    pub async fn detect<S: ProviderSource>(
        &self,
        source: &S,
    ) -> Result<Detected<S::Provider>, AdapterError> {
        let detected = match self.probe_until_timeout(source).await {
            Some(provider) => provider,
            None => {
                if !self.options.silent {
                    tracing::error!("no wallet provider detected, please install MetaMask");
                }
                return Err(AdapterError::ProviderAbsent);
            }
        };

        if self.options.must_be_metamask && !detected.is_metamask() {
            if !self.options.silent {
                tracing::error!("non-MetaMask provider detected");
            }
            return Err(AdapterError::ProviderAbsent);
        }

        match source.ambient() {
            Some(ambient) if ambient.same_instance(&detected) => Ok(Detected {
                provider: ambient,
                conflict: false,
            }),
            Some(ambient) => {
                tracing::warn!(
                    error = %AdapterError::MultiProviderConflict,
                    "continuing with the ambient provider"
                );
                Ok(Detected {
                    provider: ambient,
                    conflict: true,
                })
            }
            None => {
                tracing::warn!(
                    error = %AdapterError::MultiProviderConflict,
                    "ambient provider vanished, continuing with the detected one"
                );
                Ok(Detected {
                    provider: detected,
                    conflict: true,
                })
            }
        }
    }

    async fn probe_until_timeout<S: ProviderSource>(&self, source: &S) -> Option<S::Provider> {
        if let Some(provider) = source.probe() {
            return Some(provider);
        }
        for _ in 0..self.options.retries() {
            source.sleep(self.options.poll_interval).await;
            if let Some(provider) = source.probe() {
                tracing::debug!("provider injected late");
                return Some(provider);
            }
        }
        None
    }
}
