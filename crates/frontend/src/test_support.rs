//! Scripted collaborators for engine tests.

use crate::shared::config::SyncConfig;
use crate::shared::dom::MemoryDom;
use crate::shared::notice::ErrorReporter;
use crate::shared::transport::Transport;
use crate::sync::SyncContext;
use async_trait::async_trait;
use contracts::shared::error::SyncError;
use contracts::shared::http::{HttpRequest, HttpResponse};
use futures::channel::oneshot;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

pub type Reply = Result<HttpResponse, SyncError>;

enum Scripted {
    Ready(Reply),
    Deferred(oneshot::Receiver<Reply>),
}

/// Answers requests in issue order from a queue of scripted replies.
#[derive(Default)]
pub struct ScriptedTransport {
    queue: RefCell<VecDeque<Scripted>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn reply(&self, status: u16, body: &str) {
        self.queue
            .borrow_mut()
            .push_back(Scripted::Ready(Ok(HttpResponse::new(status, body))));
    }

    pub fn fail(&self, detail: &str) {
        self.queue
            .borrow_mut()
            .push_back(Scripted::Ready(Err(SyncError::Network(detail.to_string()))));
    }

    /// The next request waits until the returned sender fires.
    pub fn defer(&self) -> oneshot::Sender<Reply> {
        let (sender, receiver) = oneshot::channel();
        self.queue.borrow_mut().push_back(Scripted::Deferred(receiver));
        sender
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SyncError> {
        self.requests.borrow_mut().push(request);
        let next = self.queue.borrow_mut().pop_front();
        match next {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Deferred(receiver)) => receiver
                .await
                .unwrap_or_else(|_| Err(SyncError::Network("reply dropped".to_string()))),
            None => Err(SyncError::Network("no scripted reply".to_string())),
        }
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    errors: RefCell<Vec<SyncError>>,
}

impl RecordingReporter {
    pub fn errors(&self) -> Vec<SyncError> {
        self.errors.borrow().clone()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, error: &SyncError) {
        self.errors.borrow_mut().push(error.clone());
    }
}

pub type TestContext = SyncContext<MemoryDom, ScriptedTransport, RecordingReporter>;

pub fn context(body_html: &str) -> TestContext {
    SyncContext::new(
        MemoryDom::from_html(body_html),
        ScriptedTransport::default(),
        RecordingReporter::default(),
        SyncConfig::default(),
    )
}

/// Returns `Pending` once, letting other joined futures run.
pub fn yield_now() -> impl Future<Output = ()> {
    struct YieldNow(bool);

    impl Future for YieldNow {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.0 {
                Poll::Ready(())
            } else {
                self.0 = true;
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }

    YieldNow(false)
}
