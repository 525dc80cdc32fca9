//! Wire types pushed to the adapter server, and the [`Reporter`] seam.

use std::future::Future;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::future::LocalBoxFuture;
use futures::stream::FuturesUnordered;
use futures::task::noop_waker_ref;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::config::ReportConfig;
use crate::error::AdapterError;

/// Body of `POST /address`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthAddress {
    pub address: String,
}

impl EthAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

/// Body of `POST /signature`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub by: EthAddress,
    pub signature: String,
}

/// An event relayed to the server.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Address(EthAddress),
    Signature(Signature),
}

impl Report {
    /// Path of the sink this report goes to.
    pub fn path<'a>(&self, config: &'a ReportConfig) -> &'a str {
        match self {
            Report::Address(_) => &config.address_path,
            Report::Signature(_) => &config.signature_path,
        }
    }
}

/// Outbound report sink.
///
/// Delivery is one attempt: no retry and no response processing. A failed
/// delivery comes back as [`AdapterError::ReportDeliveryFailure`].
pub trait Reporter {
    fn deliver(&self, report: &Report) -> impl Future<Output = Result<(), AdapterError>>;
}

/// Deliver a report and log a failure instead of returning it.
pub(crate) async fn deliver_logged<R: Reporter>(reporter: &R, report: Report) {
    match reporter.deliver(&report).await {
        Ok(()) => tracing::debug!(?report, "report delivered"),
        Err(e) => tracing::warn!(error = %e, "report delivery failed"),
    }
}

/// Fire-and-forget report deliveries.
///
/// [`Outbox::send`] starts a delivery and returns at once; the owner keeps
/// the deliveries moving with [`Outbox::poll_drive`]. A delivery that never
/// completes holds nothing but its own slot.
pub struct Outbox<R> {
    reporter: Rc<R>,
    in_flight: FuturesUnordered<LocalBoxFuture<'static, ()>>,
}

impl<R: Reporter + 'static> Outbox<R> {
    pub fn new(reporter: R) -> Self {
        Self {
            reporter: Rc::new(reporter),
            in_flight: FuturesUnordered::new(),
        }
    }

    pub fn send(&mut self, report: Report) {
        let reporter = Rc::clone(&self.reporter);
        self.in_flight
            .push(Box::pin(async move { deliver_logged(&*reporter, report).await }));
        // Issue the request now rather than at the next poll.
        self.poll_drive(&mut Context::from_waker(noop_waker_ref()));
    }

    /// Advance every delivery, dropping the finished ones.
    pub fn poll_drive(&mut self, cx: &mut Context<'_>) {
        while let Poll::Ready(Some(())) = self.in_flight.poll_next_unpin(cx) {}
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }
}
