//! A filter that records whether, and when, it ran.
//!
//! # Design
//! The recording lives behind an `Rc` shared by the `TestFilter` handle and
//! every action it wrapped, so the test keeps reading it after handing the
//! wrapped action to the code under test. Fields are `Cell`s: the filter can
//! be re-entered (an action that calls itself through the filter) without a
//! borrow panic. Nothing is synchronized and the type is not `Send`.
//!
//! Completion is stamped after a fixed `FINISH_DELAY` sleep following the
//! wrapped action, which makes `finish_time > call_time` hold for every
//! completed run.

use std::cell::Cell;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use web_core::{Action, Context, Filter, ResponseWriter};

/// Pause between the wrapped action returning and completion being stamped.
pub const FINISH_DELAY: Duration = Duration::from_millis(1);

/// Where a [`TestFilter`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterState {
    /// Not invoked since construction or the last reset.
    Idle,
    /// Invoked, wrapped action not yet finished.
    Invoked,
    /// The wrapped action returned and completion was stamped.
    Completed,
}

#[derive(Debug, Default)]
struct Recording {
    called: Cell<bool>,
    call_time: Cell<Option<Instant>>,
    finished: Cell<bool>,
    finish_time: Cell<Option<Instant>>,
}

/// Stand-in filter for tests that need to observe a filter chain.
///
/// ```
/// use web_core::{action, Context, Filter, Reply};
/// use web_testutil::{new_test_context, FilterState, ResponseRecorder, TestFilter};
///
/// let filter = TestFilter::new();
/// let wrapped = filter.wrap(action(|_: &mut Context<ResponseRecorder>| {
///     Ok(Reply::new(http::StatusCode::OK))
/// }));
///
/// assert_eq!(filter.state(), FilterState::Idle);
/// wrapped(&mut new_test_context()).unwrap();
/// assert_eq!(filter.state(), FilterState::Completed);
/// assert!(filter.finish_time() > filter.call_time());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TestFilter {
    recording: Rc<Recording>,
}

impl TestFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn called(&self) -> bool {
        self.recording.called.get()
    }

    /// When the filter was last invoked; `None` until the first call.
    pub fn call_time(&self) -> Option<Instant> {
        self.recording.call_time.get()
    }

    pub fn finished(&self) -> bool {
        self.recording.finished.get()
    }

    /// When the wrapped action last completed; `None` until then.
    /// While a repeat invocation is running this is still the previous
    /// run's time, older than `call_time`.
    pub fn finish_time(&self) -> Option<Instant> {
        self.recording.finish_time.get()
    }

    pub fn state(&self) -> FilterState {
        if self.finished() {
            FilterState::Completed
        } else if self.called() {
            FilterState::Invoked
        } else {
            FilterState::Idle
        }
    }

    /// Back to the freshly constructed state. Actions wrapped earlier keep
    /// recording into this filter.
    pub fn reset(&self) {
        let r = &self.recording;
        r.called.set(false);
        r.call_time.set(None);
        r.finished.set(false);
        r.finish_time.set(None);
    }
}

impl<W: ResponseWriter + 'static> Filter<W> for TestFilter {
    fn wrap(&self, next: Action<W>) -> Action<W> {
        let recording = Rc::clone(&self.recording);
        Rc::new(move |ctx: &mut Context<W>| {
            recording.called.set(true);
            recording.call_time.set(Some(Instant::now()));
            tracing::debug!(uri = %ctx.request().uri(), "test filter invoked");

            let result = next(ctx);

            thread::sleep(FINISH_DELAY);
            recording.finished.set(true);
            recording.finish_time.set(Some(Instant::now()));
            tracing::debug!(ok = result.is_ok(), "test filter finished");
            result
        })
    }
}
