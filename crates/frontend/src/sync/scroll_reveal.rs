//! Brings a freshly inserted element into view with a short eased scroll.

use crate::shared::dom::Dom;
use std::f64::consts::PI;
use std::future::Future;

pub const DEFAULT_SCROLL_DURATION_MS: u32 = 500;

/// Delay between animation steps (~60 fps).
pub const FRAME_MS: u32 = 16;

/// Viewport movement beyond this, between two frames, means the user took over.
const INTERRUPT_TOLERANCE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollPlan {
    pub from: f64,
    pub to: f64,
    pub duration_ms: u32,
}

impl ScrollPlan {
    /// Scroll position `elapsed_ms` into the animation.
    pub fn position_at(&self, elapsed_ms: f64) -> f64 {
        let duration = f64::from(self.duration_ms);
        if duration <= 0.0 || elapsed_ms >= duration {
            return self.to;
        }
        let progress = (elapsed_ms / duration).max(0.0);
        self.from + (self.to - self.from) * swing(progress)
    }

    pub fn is_noop(&self) -> bool {
        (self.to - self.from).abs() < 0.5
    }
}

/// Ease-in-out curve: slow start, slow finish.
pub fn swing(progress: f64) -> f64 {
    0.5 - (progress * PI).cos() / 2.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    Completed,
    Interrupted,
}

pub struct ScrollReveal<'a, D> {
    dom: &'a D,
    duration_ms: u32,
}

impl<'a, D: Dom> ScrollReveal<'a, D> {
    pub fn new(dom: &'a D, duration_ms: u32) -> Self {
        Self { dom, duration_ms }
    }

    /// `None` when the element has no box (detached, hidden, zero-size).
    pub fn plan(&self, node: &D::Node) -> Option<ScrollPlan> {
        let top = self.dom.offset_top(node)?;
        Some(ScrollPlan {
            from: self.dom.scroll_top(),
            to: top.max(0.0),
            duration_ms: self.duration_ms,
        })
    }

    /// Starts scrolling towards `node`. Returns the plan that was started.
    pub fn reveal(&self, node: &D::Node) -> Option<ScrollPlan> {
        let plan = self.plan(node).filter(|plan| !plan.is_noop())?;
        self.dom.animate_scroll(plan);
        Some(plan)
    }
}

/// Steps `plan` until its duration has elapsed on `now`, sleeping between
/// frames. Gives up as soon as the viewport moves on its own.
pub async fn run_scroll<D, C, S, F>(dom: &D, plan: ScrollPlan, now: C, mut sleep: S) -> ScrollOutcome
where
    D: Dom,
    C: Fn() -> f64,
    S: FnMut(u32) -> F,
    F: Future<Output = ()>,
{
    let started = now();
    loop {
        let elapsed = (now() - started).max(0.0);
        dom.set_scroll_top(plan.position_at(elapsed));
        if elapsed >= f64::from(plan.duration_ms) {
            return ScrollOutcome::Completed;
        }
        let applied = dom.scroll_top();
        sleep(FRAME_MS).await;
        if (dom.scroll_top() - applied).abs() > INTERRUPT_TOLERANCE {
            return ScrollOutcome::Interrupted;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::dom::MemoryDom;
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn test_swing_endpoints() {
        assert!(swing(0.0).abs() < 1e-9);
        assert!((swing(0.5) - 0.5).abs() < 1e-9);
        assert!((swing(1.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_position_at() {
        let plan = ScrollPlan { from: 100.0, to: 500.0, duration_ms: 500 };
        assert_eq!(plan.position_at(0.0), 100.0);
        assert!((plan.position_at(250.0) - 300.0).abs() < 1e-9);
        assert_eq!(plan.position_at(500.0), 500.0);
        assert_eq!(plan.position_at(900.0), 500.0);

        let instant = ScrollPlan { from: 0.0, to: 80.0, duration_ms: 0 };
        assert_eq!(instant.position_at(0.0), 80.0);
    }

    #[test]
    fn test_reveal_targets_element_top() {
        let dom = MemoryDom::from_html(r#"<div id="a"></div><div id="b"></div>"#);
        let b = dom.element_by_id("b").unwrap();
        let expected = dom.offset_top(&b).unwrap();

        let plan = ScrollReveal::new(&dom, 500).reveal(&b).unwrap();
        assert_eq!(plan.to, expected);
        assert_eq!(plan.duration_ms, 500);
        assert_eq!(dom.scroll_plans(), vec![plan]);
        assert_eq!(dom.scroll_top(), expected);
    }

    #[test]
    fn test_reveal_without_box_is_noop() {
        let dom = MemoryDom::from_html(r#"<div id="gone"></div><div id="hidden" hidden></div>"#);
        let gone = dom.element_by_id("gone").unwrap();
        let hidden = dom.element_by_id("hidden").unwrap();
        dom.remove(&gone);

        let reveal = ScrollReveal::new(&dom, 500);
        assert_eq!(reveal.reveal(&gone), None);
        assert_eq!(reveal.reveal(&hidden), None);
        assert!(dom.scroll_plans().is_empty());
    }

    #[test]
    fn test_reveal_when_already_there() {
        let dom = MemoryDom::from_html(r#"<div id="a"></div>"#);
        let a = dom.element_by_id("a").unwrap();
        dom.set_scroll_top(dom.offset_top(&a).unwrap());
        assert_eq!(ScrollReveal::new(&dom, 500).reveal(&a), None);
    }

    #[test]
    fn test_run_scroll_completes_at_target() {
        let dom = MemoryDom::new();
        let clock = Rc::new(Cell::new(0.0));
        let positions = Rc::new(RefCell::new(Vec::new()));
        let plan = ScrollPlan { from: 0.0, to: 400.0, duration_ms: 100 };

        let outcome = block_on(run_scroll(
            &dom,
            plan,
            {
                let clock = clock.clone();
                move || clock.get()
            },
            {
                let clock = clock.clone();
                let positions = positions.clone();
                let dom = dom.clone();
                move |ms| {
                    positions.borrow_mut().push(dom.scroll_top());
                    clock.set(clock.get() + f64::from(ms));
                    std::future::ready(())
                }
            },
        ));

        assert_eq!(outcome, ScrollOutcome::Completed);
        assert_eq!(dom.scroll_top(), 400.0);
        let positions = positions.borrow();
        assert!(positions.len() >= 6);
        assert!(positions.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_run_scroll_stops_when_user_scrolls() {
        let dom = MemoryDom::new();
        let clock = Rc::new(Cell::new(0.0));
        let plan = ScrollPlan { from: 0.0, to: 400.0, duration_ms: 500 };

        let outcome = block_on(run_scroll(
            &dom,
            plan,
            {
                let clock = clock.clone();
                move || clock.get()
            },
            {
                let clock = clock.clone();
                let dom = dom.clone();
                move |ms| {
                    clock.set(clock.get() + f64::from(ms));
                    if clock.get() > 100.0 {
                        dom.set_scroll_top(5.0);
                    }
                    std::future::ready(())
                }
            },
        ));

        assert_eq!(outcome, ScrollOutcome::Interrupted);
        assert_eq!(dom.scroll_top(), 5.0);
    }
}
