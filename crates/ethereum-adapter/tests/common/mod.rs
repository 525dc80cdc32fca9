//! In-memory provider, environment, page surface and reporter.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use ethereum_adapter::{
    AdapterError, EventHandler, Provider, ProviderEvent, ProviderEventKind, ProviderRpcError,
    ProviderSource, Report, Reporter, RequestArguments, Surface,
};
use serde_json::Value;

#[derive(Default)]
struct ProviderState {
    /// `None` is a prompt the user never answers.
    responses: HashMap<String, VecDeque<Option<Result<Value, ProviderRpcError>>>>,
    calls: Vec<RequestArguments>,
    handlers: Vec<(ProviderEventKind, EventHandler)>,
    is_metamask: bool,
}

/// Scripted EIP-1193 provider. Clones share state, like a JS object reference.
#[derive(Clone, Default)]
pub struct FakeProvider {
    state: Rc<RefCell<ProviderState>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metamask() -> Self {
        let provider = Self::default();
        provider.state.borrow_mut().is_metamask = true;
        provider
    }

    /// Queue the answer to the next `method` call.
    pub fn respond(&self, method: &str, result: Result<Value, ProviderRpcError>) -> &Self {
        self.state
            .borrow_mut()
            .responses
            .entry(method.to_string())
            .or_default()
            .push_back(Some(result));
        self
    }

    /// The next `method` call stays pending forever.
    pub fn hang(&self, method: &str) -> &Self {
        self.state
            .borrow_mut()
            .responses
            .entry(method.to_string())
            .or_default()
            .push_back(None);
        self
    }

    pub fn calls(&self) -> Vec<RequestArguments> {
        self.state.borrow().calls.clone()
    }

    pub fn calls_to(&self, method: &str) -> Vec<RequestArguments> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method)
            .collect()
    }

    pub fn subscriptions(&self) -> Vec<ProviderEventKind> {
        self.state.borrow().handlers.iter().map(|(k, _)| *k).collect()
    }

    /// Call every handler registered for the event, in registration order.
    pub fn emit(&self, event: ProviderEvent) {
        let kind = event.kind();
        let mut state = self.state.borrow_mut();
        for (registered, handler) in state.handlers.iter_mut() {
            if *registered == kind {
                handler(event.clone());
            }
        }
    }
}

impl Provider for FakeProvider {
    fn request(
        &self,
        args: RequestArguments,
    ) -> impl Future<Output = Result<Value, ProviderRpcError>> {
        let mut state = self.state.borrow_mut();
        let result = state
            .responses
            .get_mut(&args.method)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Some(Err(ProviderRpcError::new(4200, "unscripted method"))));
        state.calls.push(args);
        async move {
            match result {
                Some(result) => result,
                None => std::future::pending().await,
            }
        }
    }

    fn on(&self, kind: ProviderEventKind, handler: EventHandler) {
        self.state.borrow_mut().handlers.push((kind, handler));
    }

    fn is_metamask(&self) -> bool {
        self.state.borrow().is_metamask
    }

    fn same_instance(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

/// Page environment: what probing finds over time, and the ambient reference.
pub struct FakeSource {
    probes: RefCell<VecDeque<Option<FakeProvider>>>,
    ambient: Option<FakeProvider>,
    pub sleeps: Cell<u32>,
}

impl FakeSource {
    /// The provider is injected and is the ambient one.
    pub fn injected(provider: &FakeProvider) -> Self {
        Self::new(vec![Some(provider.clone())], Some(provider.clone()))
    }

    pub fn empty() -> Self {
        Self::new(vec![], None)
    }

    pub fn new(probes: Vec<Option<FakeProvider>>, ambient: Option<FakeProvider>) -> Self {
        Self {
            probes: RefCell::new(probes.into()),
            ambient,
            sleeps: Cell::new(0),
        }
    }
}

impl ProviderSource for FakeSource {
    type Provider = FakeProvider;

    fn probe(&self) -> Option<FakeProvider> {
        self.probes.borrow_mut().pop_front().flatten()
    }

    fn ambient(&self) -> Option<FakeProvider> {
        self.ambient.clone()
    }

    fn sleep(&self, _duration: Duration) -> impl Future<Output = ()> {
        self.sleeps.set(self.sleeps.get() + 1);
        std::future::ready(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCall {
    Disconnected,
    Connected(String),
    Signed,
    Reload,
}

#[derive(Clone, Default)]
pub struct RecordingSurface {
    calls: Rc<RefCell<Vec<SurfaceCall>>>,
}

impl RecordingSurface {
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, call: &SurfaceCall) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }
}

impl Surface for RecordingSurface {
    fn show_disconnected(&self) {
        self.calls.borrow_mut().push(SurfaceCall::Disconnected);
    }

    fn show_connected(&self, account: &str) {
        self.calls
            .borrow_mut()
            .push(SurfaceCall::Connected(account.to_string()));
    }

    fn show_signed(&self) {
        self.calls.borrow_mut().push(SurfaceCall::Signed);
    }

    fn reload(&self) {
        self.calls.borrow_mut().push(SurfaceCall::Reload);
    }
}

/// Records every report; can be told to fail deliveries or never finish them.
#[derive(Clone, Default)]
pub struct RecordingReporter {
    reports: Rc<RefCell<Vec<Report>>>,
    failing: Rc<Cell<bool>>,
    stalled: Rc<Cell<bool>>,
}

impl RecordingReporter {
    pub fn failing() -> Self {
        let reporter = Self::default();
        reporter.failing.set(true);
        reporter
    }

    /// The server accepts the connection and never responds.
    pub fn stalled() -> Self {
        let reporter = Self::default();
        reporter.stalled.set(true);
        reporter
    }

    pub fn reports(&self) -> Vec<Report> {
        self.reports.borrow().clone()
    }

    pub fn bodies(&self) -> Vec<Value> {
        self.reports()
            .iter()
            .map(|r| serde_json::to_value(r).unwrap())
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn deliver(&self, report: &Report) -> impl Future<Output = Result<(), AdapterError>> {
        self.reports.borrow_mut().push(report.clone());
        let result = if self.stalled.get() {
            None
        } else if self.failing.get() {
            Some(Err(AdapterError::ReportDeliveryFailure {
                path: "/test".to_string(),
                reason: "connection refused".to_string(),
            }))
        } else {
            Some(Ok(()))
        };
        async move {
            match result {
                Some(result) => result,
                None => std::future::pending().await,
            }
        }
    }
}
