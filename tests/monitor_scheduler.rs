use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use eframe_sprite::monitor::{
    MONITOR_TIMER_PERIOD, Monitor, MonitorHandle, MonitorScheduler, MonitorState,
};

/// Counts polls and teardowns; removes itself after `polls_left` polls.
struct Counting {
    polls: Rc<Cell<usize>>,
    teardowns: Rc<Cell<usize>>,
    polls_left: Option<usize>,
}

impl Monitor for Counting {
    fn poll(&mut self, handle: MonitorHandle, scheduler: &mut MonitorScheduler) {
        self.polls.set(self.polls.get() + 1);
        if let Some(left) = &mut self.polls_left {
            *left -= 1;
            if *left == 0 {
                assert!(scheduler.remove_monitor(handle));
                // Still running until the poll returns
                assert_eq!(scheduler.state(handle), Some(MonitorState::PendingDelete));
                assert!(!scheduler.contains(handle));
            }
        }
    }

    fn teardown(self: Box<Self>) {
        self.teardowns.set(self.teardowns.get() + 1);
    }
}

fn counting(polls_left: Option<usize>) -> (Box<Counting>, Rc<Cell<usize>>, Rc<Cell<usize>>) {
    let polls = Rc::new(Cell::new(0));
    let teardowns = Rc::new(Cell::new(0));
    let monitor = Box::new(Counting {
        polls: polls.clone(),
        teardowns: teardowns.clone(),
        polls_left,
    });
    (monitor, polls, teardowns)
}

fn tick(scheduler: &mut MonitorScheduler) {
    let timer = scheduler.timer_id().expect("timer allocated");
    assert!(scheduler.on_timer(timer));
}

#[test]
fn test_adding_a_monitor_starts_the_timer() {
    let mut scheduler = MonitorScheduler::default();
    assert_eq!(scheduler.timer_id(), None);

    let (monitor, polls, _) = counting(None);
    let handle = scheduler.add_monitor(monitor);
    assert!(scheduler.is_timer_running());
    assert_eq!(scheduler.state(handle), Some(MonitorState::Active));

    tick(&mut scheduler);
    tick(&mut scheduler);
    assert_eq!(polls.get(), 2);
}

#[test]
fn test_self_removal_inside_poll() {
    let mut scheduler = MonitorScheduler::default();
    let (monitor, polls, teardowns) = counting(Some(1));
    let handle = scheduler.add_monitor(monitor);

    tick(&mut scheduler);
    assert_eq!(polls.get(), 1);
    assert_eq!(teardowns.get(), 1);
    assert_eq!(scheduler.state(handle), None);

    // Never polled again and not torn down twice
    scheduler.add_fn((), |_, _, _| {}, None);
    tick(&mut scheduler);
    assert_eq!(polls.get(), 1);
    assert_eq!(teardowns.get(), 1);
    assert!(!scheduler.remove_monitor(handle));
}

#[test]
fn test_removing_idle_monitor_tears_down_at_once() {
    let mut scheduler = MonitorScheduler::default();
    let (monitor, polls, teardowns) = counting(None);
    let handle = scheduler.add_monitor(monitor);

    assert!(scheduler.remove_monitor(handle));
    assert_eq!(teardowns.get(), 1);
    assert_eq!(polls.get(), 0);
    assert!(scheduler.is_empty());
}

#[test]
fn test_removing_all_monitors_stops_timer_and_reuses_it() {
    let mut scheduler = MonitorScheduler::default();
    let (first, _, _) = counting(None);
    let handle = scheduler.add_monitor(first);
    let timer = scheduler.timer_id().unwrap();

    scheduler.remove_monitor(handle);
    assert!(!scheduler.is_timer_running());
    assert_eq!(scheduler.timer_id(), Some(timer));

    let (second, _, _) = counting(None);
    scheduler.add_monitor(second);
    assert!(scheduler.is_timer_running());
    assert_eq!(scheduler.timer_id(), Some(timer));
}

#[test]
fn test_timer_stops_when_last_monitor_removes_itself() {
    let mut scheduler = MonitorScheduler::default();
    let (monitor, _, _) = counting(Some(2));
    scheduler.add_monitor(monitor);

    tick(&mut scheduler);
    assert!(scheduler.is_timer_running());
    tick(&mut scheduler);
    assert!(!scheduler.is_timer_running());
    assert!(scheduler.is_empty());
}

#[test]
fn test_monitor_can_remove_another_monitor() {
    let mut scheduler = MonitorScheduler::default();
    let (victim, victim_polls, victim_teardowns) = counting(None);

    let target: Rc<Cell<Option<MonitorHandle>>> = Rc::new(Cell::new(None));
    let slot = target.clone();
    scheduler.add_fn(
        (),
        move |_, _, scheduler: &mut MonitorScheduler| {
            if let Some(handle) = slot.take() {
                scheduler.remove_monitor(handle);
            }
        },
        None,
    );
    target.set(Some(scheduler.add_monitor(victim)));

    // The killer runs first in the snapshot, the victim is skipped
    tick(&mut scheduler);
    assert_eq!(victim_polls.get(), 0);
    assert_eq!(victim_teardowns.get(), 1);
    assert_eq!(scheduler.len(), 1);
}

#[test]
fn test_monitors_added_during_tick_run_next_tick() {
    let mut scheduler = MonitorScheduler::default();
    let spawned = Rc::new(Cell::new(0));
    let counter = spawned.clone();

    scheduler.add_fn(
        false,
        move |done: &mut bool, _, scheduler: &mut MonitorScheduler| {
            if !*done {
                *done = true;
                let counter = counter.clone();
                scheduler.add_fn((), move |_, _, _| counter.set(counter.get() + 1), None);
            }
        },
        None,
    );

    tick(&mut scheduler);
    assert_eq!(spawned.get(), 0);
    assert_eq!(scheduler.len(), 2);
    tick(&mut scheduler);
    assert_eq!(spawned.get(), 1);
}

#[test]
fn test_reentrant_tick_skips_running_monitor() {
    let mut scheduler = MonitorScheduler::default();
    let depth = Rc::new(Cell::new(0));
    let max_depth = Rc::new(Cell::new(0));
    let (d, m) = (depth.clone(), max_depth.clone());

    scheduler.add_fn(
        (),
        move |_, _, scheduler: &mut MonitorScheduler| {
            d.set(d.get() + 1);
            m.set(m.get().max(d.get()));
            if let Some(timer) = scheduler.timer_id() {
                scheduler.on_timer(timer);
            }
            d.set(d.get() - 1);
        },
        None,
    );

    tick(&mut scheduler);
    assert_eq!(max_depth.get(), 1);
}

#[test]
fn test_fn_monitor_gets_data_back_on_teardown() {
    let mut scheduler = MonitorScheduler::default();
    let returned = Rc::new(RefCell::new(Vec::new()));
    let sink = returned.clone();

    let handle = scheduler.add_fn(
        vec![1, 2],
        |data: &mut Vec<i32>, _, _| data.push(3),
        Some(Box::new(move |data: Vec<i32>| sink.borrow_mut().extend(data))),
    );
    tick(&mut scheduler);
    scheduler.remove_monitor(handle);

    assert_eq!(*returned.borrow(), vec![1, 2, 3]);
}

#[test]
fn test_shutdown_and_drop_tear_down_outstanding_monitors() {
    let (first, _, first_teardowns) = counting(None);
    let (second, _, second_teardowns) = counting(None);

    let mut scheduler = MonitorScheduler::default();
    scheduler.add_monitor(first);
    scheduler.shutdown();
    assert_eq!(first_teardowns.get(), 1);
    assert!(!scheduler.is_timer_running());

    scheduler.add_monitor(second);
    drop(scheduler);
    assert_eq!(second_teardowns.get(), 1);
    assert_eq!(first_teardowns.get(), 1);
}

#[test]
fn test_poll_timers_fires_after_period() {
    let mut scheduler = MonitorScheduler::default();
    let (monitor, polls, _) = counting(None);
    scheduler.add_monitor(monitor);

    scheduler.poll_timers(Instant::now());
    assert_eq!(polls.get(), 0);

    let deadline = scheduler.next_deadline().unwrap();
    scheduler.poll_timers(deadline + Duration::from_millis(1));
    assert_eq!(polls.get(), 1);
    assert!(scheduler.next_deadline().unwrap() >= deadline + MONITOR_TIMER_PERIOD);
}
