//! The collection synchronization engine.
//!
//! A `SyncContext` bundles the document, the transport, the error reporter and
//! the markup conventions. Operations borrow it through `CollectionSync` and
//! `SingleActionSync`; every operation issues at most one request, runs on the
//! calling thread, and never holds document state across its await point.

pub mod collection;
pub mod dirty_tracker;
pub mod form_serializer;
pub mod navigation;
pub mod scroll_reveal;
pub mod single_action;

use crate::shared::config::SyncConfig;
use crate::shared::dom::Dom;
use crate::shared::notice::ErrorReporter;
use crate::shared::transport::Transport;
use collection::CollectionSync;
use contracts::shared::error::SyncError;
use contracts::shared::http::{HttpRequest, HttpResponse};
use dirty_tracker::DirtyTracker;
use scroll_reveal::ScrollReveal;
use single_action::SingleActionSync;

pub struct SyncContext<D, T, R> {
    pub dom: D,
    pub transport: T,
    pub reporter: R,
    pub config: SyncConfig,
    pub tracker: DirtyTracker,
}

impl<D, T, R> SyncContext<D, T, R>
where
    D: Dom,
    T: Transport,
    R: ErrorReporter,
{
    pub fn new(dom: D, transport: T, reporter: R, config: SyncConfig) -> Self {
        let tracker = DirtyTracker::new(&config.unsaved_class);
        Self {
            dom,
            transport,
            reporter,
            config,
            tracker,
        }
    }

    pub fn collection(&self) -> CollectionSync<'_, D, T, R> {
        CollectionSync::new(self)
    }

    pub fn single_action(&self) -> SingleActionSync<'_, D, T, R> {
        SingleActionSync::new(self)
    }

    pub fn scroll_reveal(&self) -> ScrollReveal<'_, D> {
        ScrollReveal::new(&self.dom, self.config.scroll_duration_ms)
    }

    /// Sends `request`; a non-2xx answer becomes `RequestRejected`.
    pub(crate) async fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse, SyncError> {
        log::debug!("{} {}", request.method, request.url);
        let method = request.method;
        let url = request.url.clone();
        let response = self.transport.send(request).await?;
        if response.ok() {
            log::debug!("{} {} -> {}", method, url, response.status);
            Ok(response)
        } else {
            Err(SyncError::rejected(&response))
        }
    }

    /// Passes a failed result to the reporter, then returns it unchanged.
    pub(crate) fn surface<X>(&self, operation: &str, result: Result<X, SyncError>) -> Result<X, SyncError> {
        if let Err(error) = &result {
            log::warn!("{} failed: {}", operation, error);
            self.reporter.report(error);
        }
        result
    }
}
