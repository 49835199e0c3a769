use std::time::{Duration, Instant};

/// Identifier of a recurring timer owned by a [`TimerHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(usize);

/// Recurring timers provided by the host window system.
pub trait TimerHost {
    /// Allocates a stopped timer firing every `period`.
    fn add_timer(&mut self, period: Duration) -> TimerId;
    fn start_timer(&mut self, id: TimerId);
    fn stop_timer(&mut self, id: TimerId);
    fn is_running(&self, id: TimerId) -> bool;
    /// Timers whose deadline has passed at `now`; each is rescheduled.
    fn due_timers(&mut self, now: Instant) -> Vec<TimerId>;
    /// Earliest deadline among running timers.
    fn next_deadline(&self) -> Option<Instant>;
}

#[derive(Debug, Clone)]
struct FrameTimer {
    period: Duration,
    next_fire: Option<Instant>,
}

/// Timers driven by the egui frame loop.
///
/// egui has no timer messages, so the app asks for a repaint at
/// [`TimerHost::next_deadline`] and collects due timers at the start of each
/// frame.
#[derive(Debug, Clone, Default)]
pub struct FrameTimers {
    timers: Vec<FrameTimer>,
}

impl FrameTimers {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimerHost for FrameTimers {
    fn add_timer(&mut self, period: Duration) -> TimerId {
        self.timers.push(FrameTimer {
            period,
            next_fire: None,
        });
        TimerId(self.timers.len() - 1)
    }

    fn start_timer(&mut self, id: TimerId) {
        if let Some(timer) = self.timers.get_mut(id.0) {
            if timer.next_fire.is_none() {
                timer.next_fire = Some(Instant::now() + timer.period);
            }
        }
    }

    fn stop_timer(&mut self, id: TimerId) {
        if let Some(timer) = self.timers.get_mut(id.0) {
            timer.next_fire = None;
        }
    }

    fn is_running(&self, id: TimerId) -> bool {
        self.timers
            .get(id.0)
            .is_some_and(|timer| timer.next_fire.is_some())
    }

    fn due_timers(&mut self, now: Instant) -> Vec<TimerId> {
        let mut due = Vec::new();
        for (index, timer) in self.timers.iter_mut().enumerate() {
            if let Some(deadline) = timer.next_fire {
                if deadline <= now {
                    // Missed ticks are dropped rather than replayed
                    timer.next_fire = Some(now + timer.period);
                    due.push(TimerId(index));
                }
            }
        }
        due
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().filter_map(|timer| timer.next_fire).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_timer_fires_once_per_period() {
        let mut timers = FrameTimers::new();
        let id = timers.add_timer(Duration::from_millis(100));
        assert!(!timers.is_running(id));

        timers.start_timer(id);
        let start = Instant::now();
        assert!(timers.due_timers(start).is_empty());

        let later = start + Duration::from_millis(250);
        assert_eq!(timers.due_timers(later), vec![id]);
        assert!(timers.due_timers(later).is_empty());

        timers.stop_timer(id);
        assert_eq!(timers.next_deadline(), None);
        assert!(timers.due_timers(later + Duration::from_secs(1)).is_empty());
    }
}
