//! Page-lifetime wiring and the event loop.
//!
//! Provider events and user actions are funnelled into one queue and handled
//! one at a time by the [`Adapter`], which owns all mutable state. Handlers
//! never overlap, and provider events keep their emission order.
//!
//! Handlers do not wait on the outside world. Wallet prompts and report
//! deliveries run as in-flight futures polled next to the queue, and a
//! prompt's answer is applied when it arrives. A `chainChanged` that lands
//! while a prompt is open or a report is stuck still reloads at once.

use std::rc::Rc;
use std::task::{Context, Poll};

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::future::{poll_fn, LocalBoxFuture};
use futures::stream::{FusedStream, FuturesUnordered};
use futures::task::noop_waker_ref;
use futures::StreamExt;
use serde_json::Value;

use crate::config::AdapterConfig;
use crate::connect;
use crate::detect::ProviderDetector;
use crate::error::{AdapterError, ProviderRpcError};
use crate::network::{NetworkState, NetworkWatcher};
use crate::provider::{Provider, ProviderEvent, ProviderEventKind, ProviderSource};
use crate::report::{Outbox, Reporter, Signature};
use crate::session::{AccountSession, Reconciliation};
use crate::sign::{DeploySignState, PendingSignature, SignFlow};
use crate::surface::Surface;

/// Something the adapter reacts to.
#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    Provider(ProviderEvent),
    /// Connect button.
    Connect,
    /// Sign button, with the page's query string at click time.
    Sign { query: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// A reload was issued; this page instance is done.
    Reload,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exit {
    Reloaded,
    /// Every sender was dropped and nothing was left in flight.
    Closed,
}

/// Cloneable entry point for user actions.
#[derive(Clone, Debug)]
pub struct AdapterHandle {
    tx: UnboundedSender<Input>,
}

impl AdapterHandle {
    pub fn connect(&self) {
        self.send(Input::Connect);
    }

    pub fn sign(&self, query: impl Into<String>) {
        self.send(Input::Sign {
            query: query.into(),
        });
    }

    pub fn send(&self, input: Input) {
        if self.tx.unbounded_send(input).is_err() {
            tracing::debug!("adapter stopped, input dropped");
        }
    }
}

/// A wallet prompt's answer.
enum Answer {
    Accounts(Result<Value, ProviderRpcError>),
    Signature(PendingSignature, Result<Value, ProviderRpcError>),
}

enum Step {
    Input(Input),
    Answered(Answer),
    Closed,
}

pub struct Adapter<P, V, R> {
    provider: Rc<P>,
    surface: V,
    outbox: Outbox<R>,
    prompts: FuturesUnordered<LocalBoxFuture<'static, Answer>>,
    network: NetworkWatcher,
    session: AccountSession,
    signer: SignFlow,
    tx: UnboundedSender<Input>,
    rx: UnboundedReceiver<Input>,
}

impl<P, V, R> Adapter<P, V, R>
where
    P: Provider + 'static,
    V: Surface,
    R: Reporter + 'static,
{
    /// Detect the provider and wire everything up.
    ///
    /// `ProviderAbsent` is returned as-is: nothing is subscribed and the page
    /// stays inert.
    pub async fn start<S>(
        source: &S,
        surface: V,
        reporter: R,
        config: &AdapterConfig,
    ) -> Result<Self, AdapterError>
    where
        S: ProviderSource<Provider = P>,
    {
        let detected = ProviderDetector::new(config.detect.clone())
            .detect(source)
            .await?;
        let mut adapter = Self::with_provider(detected.provider, surface, reporter, config);
        adapter.init().await;
        Ok(adapter)
    }

    /// Build an adapter around an already-resolved provider. Nothing is
    /// subscribed until [`Adapter::init`].
    pub fn with_provider(provider: P, surface: V, reporter: R, config: &AdapterConfig) -> Self {
        let (tx, rx) = mpsc::unbounded();
        Self {
            provider: Rc::new(provider),
            surface,
            outbox: Outbox::new(reporter),
            prompts: FuturesUnordered::new(),
            network: NetworkWatcher::new(),
            session: AccountSession::new(),
            signer: SignFlow::new(config.payload_param.clone()),
            tx,
            rx,
        }
    }

    /// Subscribe to provider events, then run the startup queries.
    ///
    /// Subscribing first means no event is lost; events that arrive while the
    /// queries are pending are queued and applied after them. The queries
    /// never prompt the user.
    pub async fn init(&mut self) {
        self.subscribe();
        self.network.load(&*self.provider).await;
        if let Err(e) = self
            .session
            .load(&*self.provider, &self.surface, &mut self.outbox)
            .await
        {
            tracing::error!(error = %e, "eth_accounts failed, account state unknown");
        }
    }

    fn subscribe(&self) {
        for kind in ProviderEventKind::ALL {
            let tx = self.tx.clone();
            self.provider.on(
                kind,
                Box::new(move |event| {
                    if tx.unbounded_send(Input::Provider(event)).is_err() {
                        tracing::debug!("adapter stopped, provider event dropped");
                    }
                }),
            );
        }
    }

    pub fn handle(&self) -> AdapterHandle {
        AdapterHandle {
            tx: self.tx.clone(),
        }
    }

    /// Request account access and wait for the answer. The caller decides
    /// how to surface errors.
    pub async fn connect(&mut self) -> Result<Reconciliation, AdapterError> {
        connect::request_accounts(
            &*self.provider,
            &mut self.session,
            &self.surface,
            &mut self.outbox,
        )
        .await
    }

    /// Sign the payload in `query` and wait for the answer. The caller
    /// decides how to surface errors.
    pub async fn sign(&mut self, query: &str) -> Result<Signature, AdapterError> {
        self.signer
            .sign(
                query,
                &*self.provider,
                &self.session,
                &self.surface,
                &mut self.outbox,
            )
            .await
    }

    /// Handle one input. Wallet prompts are started here and answered later;
    /// failures are logged and never propagate.
    pub fn dispatch(&mut self, input: Input) -> Flow {
        match input {
            Input::Provider(ProviderEvent::ChainChanged(chain_id)) => {
                self.network.chain_changed(&chain_id);
                self.surface.reload();
                return Flow::Reload;
            }
            Input::Provider(ProviderEvent::AccountsChanged(accounts)) => {
                self.session
                    .handle_accounts(accounts, &self.surface, &mut self.outbox);
            }
            Input::Connect => {
                let provider = Rc::clone(&self.provider);
                self.prompts.push(Box::pin(async move {
                    Answer::Accounts(provider.request(connect::accounts_request()).await)
                }));
            }
            Input::Sign { query } => match self.signer.begin(&query, &self.session) {
                Ok(pending) => {
                    let provider = Rc::clone(&self.provider);
                    self.prompts.push(Box::pin(async move {
                        let answer = provider.request(pending.request()).await;
                        Answer::Signature(pending, answer)
                    }));
                }
                Err(e) => log_sign_failure(&e),
            },
        }
        Flow::Continue
    }

    fn answer(&mut self, answer: Answer) {
        match answer {
            Answer::Accounts(answer) => {
                if let Err(e) = connect::accounts_granted(
                    answer,
                    &mut self.session,
                    &self.surface,
                    &mut self.outbox,
                ) {
                    log_connect_failure(&e);
                }
            }
            Answer::Signature(pending, answer) => {
                match self
                    .signer
                    .complete(pending, answer, &self.surface, &mut self.outbox)
                {
                    Ok(signed) => tracing::info!(account = %signed.by.address, "payload signed"),
                    Err(e) => log_sign_failure(&e),
                }
            }
        }
    }

    /// Queued inputs come before prompt answers, so a chain change is never
    /// stuck behind an open prompt.
    fn poll_step(&mut self, cx: &mut Context<'_>) -> Poll<Step> {
        self.outbox.poll_drive(cx);
        if !self.rx.is_terminated() {
            if let Poll::Ready(Some(input)) = self.rx.poll_next_unpin(cx) {
                return Poll::Ready(Step::Input(input));
            }
        }
        if let Poll::Ready(Some(answer)) = self.prompts.poll_next_unpin(cx) {
            return Poll::Ready(Step::Answered(answer));
        }
        if self.rx.is_terminated() && self.prompts.is_empty() && self.outbox.is_idle() {
            return Poll::Ready(Step::Closed);
        }
        Poll::Pending
    }

    fn apply(&mut self, step: Step) -> Flow {
        match step {
            Step::Input(input) => self.dispatch(input),
            Step::Answered(answer) => {
                self.answer(answer);
                Flow::Continue
            }
            Step::Closed => Flow::Continue,
        }
    }

    /// Handle everything that is ready now, without waiting for more.
    pub fn process_pending(&mut self) -> Flow {
        let mut cx = Context::from_waker(noop_waker_ref());
        while let Poll::Ready(step) = self.poll_step(&mut cx) {
            if matches!(step, Step::Closed) {
                break;
            }
            if self.apply(step) == Flow::Reload {
                return Flow::Reload;
            }
        }
        Flow::Continue
    }

    /// Handle inputs until a reload, or until every sender is gone and
    /// nothing is left in flight. A reload drops whatever is still in flight.
    pub async fn run(mut self) -> Exit {
        // Only handles and provider subscriptions keep the queue open now.
        self.tx.disconnect();
        loop {
            let step = poll_fn(|cx| self.poll_step(cx)).await;
            if matches!(step, Step::Closed) {
                return Exit::Closed;
            }
            if self.apply(step) == Flow::Reload {
                return Exit::Reloaded;
            }
        }
    }

    pub fn session(&self) -> &AccountSession {
        &self.session
    }

    pub fn network_state(&self) -> NetworkState {
        self.network.state()
    }

    pub fn sign_state(&self) -> DeploySignState {
        self.signer.state()
    }

    /// Wallet prompts started by the loop and not yet answered.
    pub fn open_prompts(&self) -> usize {
        self.prompts.len()
    }

    /// Report deliveries not yet finished.
    pub fn reports_in_flight(&self) -> usize {
        self.outbox.in_flight()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn surface(&self) -> &V {
        &self.surface
    }

    pub fn reporter(&self) -> &R {
        self.outbox.reporter()
    }
}

fn log_connect_failure(e: &AdapterError) {
    match e {
        AdapterError::UserRejected => {
            tracing::info!("account request rejected, please connect to MetaMask")
        }
        AdapterError::UnknownProviderError(rpc) => tracing::error!(
            code = rpc.code,
            kind = rpc.kind().unwrap_or("non-standard"),
            error = %rpc.message,
            "account request failed"
        ),
        other => tracing::error!(error = %other, "account request failed"),
    }
}

fn log_sign_failure(e: &AdapterError) {
    match e {
        AdapterError::UserRejected => tracing::info!("signature request rejected"),
        AdapterError::SignaturePending => tracing::info!("signature request already open"),
        AdapterError::UnknownProviderError(rpc) => tracing::error!(
            code = rpc.code,
            kind = rpc.kind().unwrap_or("non-standard"),
            error = %rpc.message,
            "signing failed"
        ),
        other => tracing::error!(error = %other, "signing failed"),
    }
}
