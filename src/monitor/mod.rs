//! Background monitors polled on a recurring timer.
//!
//! A monitor is mainly used to follow the progress of a file operation: it is
//! polled every [`MONITOR_TIMER_PERIOD`] until it removes itself.
//!
//! Monitors live in a generational arena. While a monitor is being polled it is
//! moved out of its slot and the slot is marked `Running`, which lets the poll
//! callback receive `&mut MonitorScheduler` and add or remove monitors,
//! including itself. A monitor removed while running is torn down after its
//! callback returns.
mod timers;

pub use timers::{FrameTimers, TimerHost, TimerId};

use std::time::{Duration, Instant};

/// Polling cadence of the monitor timer.
pub const MONITOR_TIMER_PERIOD: Duration = Duration::from_millis(100);

/// A background task polled by the scheduler.
pub trait Monitor {
    /// Called on every timer tick. `handle` identifies this monitor so it can
    /// remove itself.
    fn poll(&mut self, handle: MonitorHandle, scheduler: &mut MonitorScheduler);

    /// Called exactly once when the monitor is removed or the scheduler shuts
    /// down.
    fn teardown(self: Box<Self>) {}
}

/// Opaque handle returned by [`MonitorScheduler::add_monitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonitorHandle {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Active,
    Running,
    PendingDelete,
}

enum Entry {
    Active(Box<dyn Monitor>),
    Running,
    PendingDelete,
}

impl Entry {
    fn state(&self) -> MonitorState {
        match self {
            Entry::Active(_) => MonitorState::Active,
            Entry::Running => MonitorState::Running,
            Entry::PendingDelete => MonitorState::PendingDelete,
        }
    }
}

struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

type PollFn<T> = Box<dyn FnMut(&mut T, MonitorHandle, &mut MonitorScheduler)>;
type TeardownFn<T> = Box<dyn FnOnce(T)>;

/// Adapts a poll closure, a teardown closure and user data to [`Monitor`].
pub struct FnMonitor<T> {
    data: T,
    poll: PollFn<T>,
    teardown: Option<TeardownFn<T>>,
}

impl<T: 'static> Monitor for FnMonitor<T> {
    fn poll(&mut self, handle: MonitorHandle, scheduler: &mut MonitorScheduler) {
        (self.poll)(&mut self.data, handle, scheduler);
    }

    fn teardown(self: Box<Self>) {
        let this = *self;
        if let Some(teardown) = this.teardown {
            teardown(this.data);
        }
    }
}

pub struct MonitorScheduler {
    slots: Vec<Slot>,
    free: Vec<u32>,
    /// Live monitors in registration order
    active: Vec<MonitorHandle>,
    timers: Box<dyn TimerHost>,
    timer: Option<TimerId>,
}

impl std::fmt::Debug for MonitorScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorScheduler")
            .field("monitors", &format!("<{} monitors>", self.active.len()))
            .field("timer", &self.timer)
            .finish()
    }
}

impl Default for MonitorScheduler {
    fn default() -> Self {
        Self::new(Box::new(FrameTimers::new()))
    }
}

impl MonitorScheduler {
    pub fn new(timers: Box<dyn TimerHost>) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            active: Vec::new(),
            timers,
            timer: None,
        }
    }

    /// Registers a monitor and makes sure the timer is running. The timer is
    /// allocated the first time a monitor is added.
    pub fn add_monitor(&mut self, monitor: Box<dyn Monitor>) -> MonitorHandle {
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.entry = Some(Entry::Active(monitor));
                MonitorHandle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(Entry::Active(monitor)),
                });
                MonitorHandle {
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        };
        self.active.push(handle);

        let timer = match self.timer {
            Some(timer) => timer,
            None => {
                let timer = self.timers.add_timer(MONITOR_TIMER_PERIOD);
                self.timer = Some(timer);
                timer
            }
        };
        self.timers.start_timer(timer);

        handle
    }

    /// Closure flavour of [`add_monitor`](Self::add_monitor): `poll` receives
    /// `data` on every tick and `teardown` receives it back on removal.
    pub fn add_fn<T: 'static>(
        &mut self,
        data: T,
        poll: impl FnMut(&mut T, MonitorHandle, &mut MonitorScheduler) + 'static,
        teardown: Option<Box<dyn FnOnce(T)>>,
    ) -> MonitorHandle {
        self.add_monitor(Box::new(FnMonitor {
            data,
            poll: Box::new(poll),
            teardown,
        }))
    }

    /// Removes a monitor. A monitor that is not running is torn down at once;
    /// a running one is torn down when its poll returns. Either way it is never
    /// polled again. Returns false for stale handles.
    pub fn remove_monitor(&mut self, handle: MonitorHandle) -> bool {
        let Some(pos) = self.active.iter().position(|h| *h == handle) else {
            log::warn!("Removing unknown monitor {:?}", handle);
            return false;
        };
        self.active.remove(pos);

        let slot = &mut self.slots[handle.index as usize];
        match slot.entry.take() {
            Some(Entry::Active(monitor)) => {
                Self::release(slot, &mut self.free, handle.index);
                monitor.teardown();
            }
            Some(Entry::Running) | Some(Entry::PendingDelete) => {
                slot.entry = Some(Entry::PendingDelete);
            }
            None => {}
        }

        if self.active.is_empty() {
            self.stop_timer();
        }
        true
    }

    /// Runs one tick if `id` is the monitor timer. Returns whether it was.
    pub fn on_timer(&mut self, id: TimerId) -> bool {
        if self.timer != Some(id) {
            return false;
        }

        let snapshot = self.active.clone();
        for handle in snapshot {
            self.poll_one(handle);
        }

        if self.active.is_empty() {
            self.stop_timer();
        }
        true
    }

    /// Fires every timer that is due at `now`.
    pub fn poll_timers(&mut self, now: Instant) {
        for id in self.timers.due_timers(now) {
            self.on_timer(id);
        }
    }

    /// When the next tick is due, if the timer runs.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn timer_id(&self) -> Option<TimerId> {
        self.timer
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_some_and(|timer| self.timers.is_running(timer))
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn contains(&self, handle: MonitorHandle) -> bool {
        self.active.contains(&handle)
    }

    /// State of the slot behind `handle`, `None` once it has been destroyed.
    pub fn state(&self, handle: MonitorHandle) -> Option<MonitorState> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entry.as_ref())
            .map(Entry::state)
    }

    /// Tears down every outstanding monitor.
    pub fn shutdown(&mut self) {
        for handle in std::mem::take(&mut self.active) {
            let slot = &mut self.slots[handle.index as usize];
            if let Some(Entry::Active(monitor)) = slot.entry.take() {
                Self::release(slot, &mut self.free, handle.index);
                monitor.teardown();
            }
        }
        self.stop_timer();
    }

    fn poll_one(&mut self, handle: MonitorHandle) {
        let Some(slot) = self.slots.get_mut(handle.index as usize) else {
            return;
        };
        if slot.generation != handle.generation {
            return;
        }
        let mut monitor = match slot.entry.take() {
            Some(Entry::Active(monitor)) => monitor,
            other => {
                // Running (re-entered tick) or already pending deletion
                slot.entry = other;
                return;
            }
        };
        slot.entry = Some(Entry::Running);

        monitor.poll(handle, self);

        let slot = &mut self.slots[handle.index as usize];
        match slot.entry.take() {
            Some(Entry::Running) => slot.entry = Some(Entry::Active(monitor)),
            _ => {
                Self::release(slot, &mut self.free, handle.index);
                monitor.teardown();
            }
        }
    }

    fn release(slot: &mut Slot, free: &mut Vec<u32>, index: u32) {
        slot.entry = None;
        slot.generation = slot.generation.wrapping_add(1);
        free.push(index);
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer {
            self.timers.stop_timer(timer);
        }
    }
}

impl Drop for MonitorScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
