//! The page-wide sync context used by the wasm exports and listeners.

use crate::shared::config::{ReportMode, SyncConfig};
use crate::shared::dom::WebDom;
use crate::shared::notice::{AlertReporter, ErrorReporter, LogReporter, NoticeBanner, NoticeBoard};
use crate::shared::transport::GlooTransport;
use crate::sync::SyncContext;
use contracts::shared::error::SyncError;
use leptos::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub type BrowserContext = SyncContext<WebDom, GlooTransport, BrowserReporter>;

thread_local! {
    static CONTEXT: RefCell<Option<Rc<BrowserContext>>> = const { RefCell::new(None) };
    // One banner per page, reused when the host reconfigures.
    static BOARD: Cell<Option<NoticeBoard>> = const { Cell::new(None) };
}

/// Reporter picked by `SyncConfig::report`.
pub enum BrowserReporter {
    Alert(AlertReporter),
    Notice(NoticeBoard),
    Log(LogReporter),
}

impl BrowserReporter {
    pub fn for_mode(mode: ReportMode) -> Self {
        match mode {
            ReportMode::Alert => Self::Alert(AlertReporter),
            ReportMode::Notice => Self::Notice(notice_board()),
            ReportMode::Log => Self::Log(LogReporter),
        }
    }
}

impl ErrorReporter for BrowserReporter {
    fn report(&self, error: &SyncError) {
        match self {
            Self::Alert(reporter) => reporter.report(error),
            Self::Notice(board) => board.report(error),
            Self::Log(reporter) => reporter.report(error),
        }
    }
}

fn notice_board() -> NoticeBoard {
    if let Some(board) = BOARD.with(Cell::get) {
        return board;
    }
    let board = NoticeBoard::new();
    BOARD.with(|cell| cell.set(Some(board)));
    leptos::mount::mount_to_body(move || view! { <NoticeBanner board=board /> });
    log::debug!("notice banner mounted");
    board
}

/// Replaces the page context with one built from `config`.
pub fn init(config: SyncConfig) -> Rc<BrowserContext> {
    let reporter = BrowserReporter::for_mode(config.report);
    let context = Rc::new(SyncContext::new(WebDom, GlooTransport, reporter, config));
    CONTEXT.with(|cell| *cell.borrow_mut() = Some(context.clone()));
    log::debug!("sync context ready: {:?}", context.config);
    context
}

/// The page context, created with defaults on first use.
pub fn context() -> Rc<BrowserContext> {
    match CONTEXT.with(|cell| cell.borrow().clone()) {
        Some(context) => context,
        None => init(SyncConfig::default()),
    }
}
