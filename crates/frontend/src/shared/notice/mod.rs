//! Where failed operations end up.
//!
//! The engine hands every error to an `ErrorReporter`; the host decides how to
//! render it. The message shown for a rejected request is always the server's
//! response body, unmodified.

use contracts::shared::error::SyncError;
use leptos::prelude::*;

pub trait ErrorReporter {
    fn report(&self, error: &SyncError);
}

/// Blocking `window.alert`, one dialog per failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertReporter;

impl ErrorReporter for AlertReporter {
    fn report(&self, error: &SyncError) {
        log::warn!("{}", error);
        if let Some(window) = web_sys::window() {
            if let Err(err) = window.alert_with_message(&error.user_message()) {
                log::error!("window.alert failed: {:?}", err);
            }
        }
    }
}

/// Console only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, error: &SyncError) {
        log::error!("{}", error);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub message: String,
    pub status: Option<u16>,
}

/// Reactive list of pending error notices.
#[derive(Clone, Copy)]
pub struct NoticeBoard {
    pub notices: RwSignal<Vec<Notice>>,
    next_id: RwSignal<u64>,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self {
            notices: RwSignal::new(Vec::new()),
            next_id: RwSignal::new(0),
        }
    }

    pub fn push(&self, error: &SyncError) -> u64 {
        let id = self.next_id.get_untracked();
        self.next_id.set(id + 1);
        let status = match error {
            SyncError::RequestRejected { status, .. } => Some(*status),
            _ => None,
        };
        self.notices.update(|notices| {
            notices.push(Notice {
                id,
                message: error.user_message(),
                status,
            })
        });
        id
    }

    pub fn dismiss(&self, id: u64) {
        self.notices.update(|notices| notices.retain(|notice| notice.id != id));
    }
}

impl ErrorReporter for NoticeBoard {
    fn report(&self, error: &SyncError) {
        log::warn!("{}", error);
        self.push(error);
    }
}

#[component]
#[allow(non_snake_case)]
pub fn NoticeBanner(board: NoticeBoard) -> impl IntoView {
    view! {
        <div class="sync-notices">
            <For
                each=move || board.notices.get()
                key=|notice: &Notice| notice.id
                children=move |notice: Notice| {
                    let id = notice.id;
                    view! {
                        <div class="alert alert--error">
                            <span class="alert__message">{notice.message}</span>
                            <button class="alert__close" on:click=move |_| board.dismiss(id)>
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
