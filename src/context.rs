//! Shared handles every component pulls from context.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use mavigo_core::toast::{ToastSpec, Toasts};
use mavigo_core::{
    Action, AppState, ClientConfig, ErrorContext, MavigoClient, MavigoError, StateHandle, View,
};
use tracing::{debug, warn};

use crate::api::GlooTransport;
use crate::storage::LocalStorageStore;

pub type Client = MavigoClient<GlooTransport, LocalStorageStore>;

/// What a toast button does when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastCommand {
    OpenView(View),
}

/// The reactive [`AppState`]. Core operations read it untracked; components
/// subscribe through [`SharedState::with`].
#[derive(Clone, Copy)]
pub struct SharedState(RwSignal<AppState>);

impl SharedState {
    pub fn with<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        self.0.with(f)
    }
}

impl StateHandle for SharedState {
    fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        self.0.with_untracked(f)
    }

    fn update(&self, f: impl FnOnce(&mut AppState)) {
        self.0.update(f)
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub state: SharedState,
    pub toasts: RwSignal<Toasts<ToastCommand>>,
    pub client: Arc<Client>,
    busy: RwSignal<HashSet<Action>>,
}

impl AppContext {
    pub fn new(config: ClientConfig) -> Self {
        let toasts = Toasts::new(&config);
        let client = MavigoClient::new(config.clone(), GlooTransport::new(config), LocalStorageStore);
        Self {
            state: SharedState(RwSignal::new(AppState::default())),
            toasts: RwSignal::new(toasts),
            client: Arc::new(client),
            busy: RwSignal::new(HashSet::new()),
        }
    }

    pub fn toast(&self, spec: ToastSpec<ToastCommand>) {
        let Some((id, duration)) = self.toasts.try_update(|t| t.push(spec)) else {
            return;
        };
        let toasts = self.toasts;
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, move || {
            toasts.try_update(|t| t.expire(id));
        })
        .forget();
    }

    /// Surfaces a failed operation. Duplicate clicks are dropped silently.
    pub fn error(&self, err: &MavigoError, context: ErrorContext) {
        if let MavigoError::Busy(action) = err {
            debug!(%action, "ignored click while busy");
            return;
        }
        warn!(error = %err, "operation failed");
        let spec = ToastSpec::for_error(err, context);
        let spec = if context == ErrorContext::Tasks && err.needs_link(context) {
            spec.with_action("Open tasks", ToastCommand::OpenView(View::Tasks))
        } else {
            spec
        };
        self.toast(spec);
    }

    /// Reactive: true while `action` runs through [`AppContext::busy_while`].
    pub fn is_busy(&self, action: Action) -> bool {
        self.busy.with(|b| b.contains(&action))
    }

    pub async fn busy_while<F: Future>(&self, action: Action, work: F) -> F::Output {
        self.busy.update(|b| {
            b.insert(action);
        });
        let output = work.await;
        self.busy.try_update(|b| b.remove(&action));
        output
    }
}

pub fn use_app() -> AppContext {
    expect_context::<AppContext>()
}
