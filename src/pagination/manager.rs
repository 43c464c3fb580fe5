//! Background pagination behind a queue and a single worker thread

use std::collections::VecDeque;
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::{Condvar, Mutex};

use crate::error::PaginationError;
use crate::pagination::operation::{CancelFlag, PaginationOperation, PaginationSettings};
use crate::pagination::result::{Pagination, TitlePage};
use crate::script::{ScriptSnapshot, SourceRange};
use crate::style::StyleProvider;

type Listener = Box<dyn FnMut(Arc<Pagination>) + Send + 'static>;

/// Marker for the pass the worker currently holds outside the lock
struct RunningOperation {
    sequence: u64,
    cancel: CancelFlag,
}

#[derive(Default)]
struct ManagerState {
    queue: VecDeque<PaginationOperation>,
    running: Option<RunningOperation>,
    current: Option<Arc<Pagination>>,
    title_page: TitlePage,
    /// Results from operations at or below this sequence are rejected
    floor_sequence: u64,
    shutdown: bool,
}

impl ManagerState {
    fn cancel_all(&mut self) {
        for op in &self.queue {
            op.cancel_flag().cancel();
        }
        self.queue.clear();
        if let Some(running) = &self.running {
            running.cancel.cancel();
        }
    }

    fn is_busy(&self) -> bool {
        !self.queue.is_empty() || self.running.is_some()
    }
}

struct Inner {
    provider: Arc<dyn StyleProvider>,
    settings: PaginationSettings,
    state: Mutex<ManagerState>,
    work_ready: Condvar,
    idle: Condvar,
    listener: Mutex<Option<Listener>>,
}

/// Owns the pagination worker and the latest finished result
///
/// Every submission supersedes whatever is queued or running; a finished
/// pass only replaces the held result when it started later than the pass
/// that produced it.
pub struct PaginationManager {
    inner: Arc<Inner>,
    worker: Option<JoinHandle<()>>,
}

impl PaginationManager {
    pub fn new(provider: Arc<dyn StyleProvider>, settings: PaginationSettings) -> Self {
        let inner = Arc::new(Inner {
            provider,
            settings,
            state: Mutex::new(ManagerState::default()),
            work_ready: Condvar::new(),
            idle: Condvar::new(),
            listener: Mutex::new(None),
        });
        let worker_inner = Arc::clone(&inner);
        let worker = std::thread::spawn(move || worker_loop(worker_inner));
        Self {
            inner,
            worker: Some(worker),
        }
    }

    /// Queue a full pass over the snapshot, superseding pending work
    pub fn paginate(&self, snapshot: ScriptSnapshot) {
        let mut state = self.inner.state.lock();
        let op = PaginationOperation::new(
            snapshot,
            state.title_page.clone(),
            self.inner.settings,
            Arc::clone(&self.inner.provider),
        );
        self.submit_locked(&mut state, op);
    }

    /// Queue a pass for an edit at `change_at`, reusing unaffected pages of
    /// the held result when possible
    pub fn paginate_at(&self, snapshot: ScriptSnapshot, change_at: usize) {
        let mut state = self.inner.state.lock();
        let op = match state.current.clone() {
            Some(previous) => PaginationOperation::live(
                snapshot,
                state.title_page.clone(),
                self.inner.settings,
                Arc::clone(&self.inner.provider),
                change_at,
                previous,
            ),
            None => PaginationOperation::new(
                snapshot,
                state.title_page.clone(),
                self.inner.settings,
                Arc::clone(&self.inner.provider),
            ),
        };
        self.submit_locked(&mut state, op);
    }

    /// Re-run pagination of the held result's script after a change inside
    /// `range`; does nothing before the first pass finishes
    pub fn invalidate(&self, range: SourceRange) {
        let mut state = self.inner.state.lock();
        let Some(previous) = state.current.clone() else {
            log::trace!("invalidate before first pagination, ignoring");
            return;
        };
        let op = PaginationOperation::live(
            previous.snapshot.clone(),
            state.title_page.clone(),
            self.inner.settings,
            Arc::clone(&self.inner.provider),
            range.start,
            previous,
        );
        self.submit_locked(&mut state, op);
    }

    fn submit_locked(&self, state: &mut ManagerState, op: PaginationOperation) {
        state.cancel_all();
        state.queue.push_back(op);
        self.inner.work_ready.notify_one();
    }

    /// Cancel outstanding work and drop the held result
    ///
    /// A canceled pass may still complete past its last check point; raising
    /// the floor keeps such a straggler from resurfacing after the reset.
    pub fn reset_all(&self) {
        let mut state = self.inner.state.lock();
        if let Some(running) = &state.running {
            state.floor_sequence = state.floor_sequence.max(running.sequence);
        }
        if let Some(max_queued) = state.queue.iter().map(|op| op.sequence()).max() {
            state.floor_sequence = state.floor_sequence.max(max_queued);
        }
        state.cancel_all();
        state.current = None;
    }

    /// Title page applied to every subsequent pass
    pub fn set_title_page(&self, title_page: TitlePage) {
        self.inner.state.lock().title_page = title_page;
    }

    /// Replace the listener invoked after each fresh result
    pub fn set_listener(&self, listener: impl FnMut(Arc<Pagination>) + Send + 'static) {
        *self.inner.listener.lock() = Some(Box::new(listener));
    }

    pub fn current_pagination(&self) -> Option<Arc<Pagination>> {
        self.inner.state.lock().current.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.inner.state.lock().is_busy()
    }

    /// Block until the queue drains and no pass is running
    pub fn wait_idle(&self) {
        let mut state = self.inner.state.lock();
        while state.is_busy() {
            self.inner.idle.wait(&mut state);
        }
    }

    pub fn page_count(&self) -> usize {
        self.current_pagination()
            .map(|result| result.page_count())
            .unwrap_or(0)
    }

    pub fn page_index_for(&self, offset: usize) -> Option<usize> {
        self.current_pagination()?.page_index_for(offset)
    }

    pub fn relative_height_for(&self, range: SourceRange) -> f32 {
        self.current_pagination()
            .map(|result| result.relative_height_for(range))
            .unwrap_or(0.0)
    }

    pub fn length_in_eighths(&self, range: SourceRange) -> (usize, usize) {
        self.current_pagination()
            .map(|result| result.length_in_eighths(range))
            .unwrap_or((0, 0))
    }
}

impl Drop for PaginationManager {
    fn drop(&mut self) {
        {
            let mut state = self.inner.state.lock();
            state.shutdown = true;
            state.cancel_all();
            self.inner.work_ready.notify_one();
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn worker_loop(inner: Arc<Inner>) {
    loop {
        let op = {
            let mut state = inner.state.lock();
            loop {
                if state.shutdown {
                    return;
                }
                if let Some(op) = state.queue.pop_front() {
                    state.running = Some(RunningOperation {
                        sequence: op.sequence(),
                        cancel: op.cancel_flag(),
                    });
                    break op;
                }
                inner.idle.notify_all();
                inner.work_ready.wait(&mut state);
            }
        };

        let outcome = op.run();

        let fresh = {
            let mut state = inner.state.lock();
            state.running = None;
            match outcome {
                Ok(result) => {
                    let stale = result.sequence <= state.floor_sequence
                        || state
                            .current
                            .as_ref()
                            .is_some_and(|held| !result.is_newer_than(held));
                    if stale {
                        log::trace!("pagination {} is stale, keeping held result", result.sequence);
                        None
                    } else {
                        let result = Arc::new(result);
                        state.current = Some(Arc::clone(&result));
                        Some(result)
                    }
                }
                // Failed and canceled passes keep the last good result
                Err(PaginationError::Canceled) => None,
                Err(error) => {
                    log::warn!("pagination failed, keeping held result: {}", error);
                    None
                }
            }
        };

        if let Some(result) = fresh {
            let mut listener = inner.listener.lock();
            if let Some(callback) = listener.as_mut() {
                callback(Arc::clone(&result));
            }
        }
    }
}
