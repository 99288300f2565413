//! Frame scheduling seam and the self-rescheduling animation loop.
//!
//! The browser implementation wraps `requestAnimationFrame`; the
//! [`ManualScheduler`] drives the same loop from tests and native hosts.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

pub type TickCallback = Box<dyn FnOnce()>;

/// Something that can run a callback on the next display refresh.
pub trait FrameScheduler {
    type Handle: Copy + 'static;

    fn schedule_next_tick(&self, callback: TickCallback) -> Self::Handle;
    fn cancel(&self, handle: Self::Handle);
}

/// A loop that calls `frame` once per tick until stopped or dropped.
///
/// The running flag is checked before every frame, so once [`stop`] returns
/// no further frame work happens even if the host still fires a callback
/// that was already queued.
///
/// [`stop`]: AnimationLoop::stop
pub struct AnimationLoop<S: FrameScheduler + 'static> {
    scheduler: Rc<S>,
    running: Rc<Cell<bool>>,
    pending: Rc<Cell<Option<S::Handle>>>,
}

impl<S: FrameScheduler + 'static> AnimationLoop<S> {
    pub fn start(scheduler: Rc<S>, frame: impl FnMut() + 'static) -> Self {
        let running = Rc::new(Cell::new(true));
        let pending = Rc::new(Cell::new(None));
        let frame: Rc<RefCell<dyn FnMut()>> = Rc::new(RefCell::new(frame));
        schedule_tick(scheduler.clone(), running.clone(), pending.clone(), frame);
        Self {
            scheduler,
            running,
            pending,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn stop(&self) {
        if !self.running.replace(false) {
            return;
        }
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }
}

impl<S: FrameScheduler + 'static> Drop for AnimationLoop<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn schedule_tick<S: FrameScheduler + 'static>(
    scheduler: Rc<S>,
    running: Rc<Cell<bool>>,
    pending: Rc<Cell<Option<S::Handle>>>,
    frame: Rc<RefCell<dyn FnMut()>>,
) {
    let sched = scheduler.clone();
    let pending_cb = pending.clone();
    let handle = scheduler.schedule_next_tick(Box::new(move || {
        pending_cb.set(None);
        if !running.get() {
            return;
        }
        (&mut *frame.borrow_mut())();
        if running.get() {
            schedule_tick(sched, running, pending_cb, frame);
        }
    }));
    pending.set(Some(handle));
}

/// Deterministic scheduler: callbacks queue up until [`run_frame`] is called.
///
/// [`run_frame`]: ManualScheduler::run_frame
#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<VecDeque<(u64, TickCallback)>>,
    next_handle: Cell<u64>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run every callback that was queued before this call. Callbacks queued
    /// while running wait for the next frame. Returns how many ran.
    pub fn run_frame(&self) -> usize {
        let batch: Vec<TickCallback> = self.queue.borrow_mut().drain(..).map(|(_, cb)| cb).collect();
        let n = batch.len();
        for cb in batch {
            cb();
        }
        n
    }
}

impl FrameScheduler for ManualScheduler {
    type Handle = u64;

    fn schedule_next_tick(&self, callback: TickCallback) -> u64 {
        let id = self.next_handle.get();
        self.next_handle.set(id + 1);
        self.queue.borrow_mut().push_back((id, callback));
        id
    }

    fn cancel(&self, handle: u64) {
        self.queue.borrow_mut().retain(|(id, _)| *id != handle);
    }
}
