use std::time::Duration;

use bevy_time::{Timer, TimerMode};
use tracing::{debug, warn};

use crate::constants::MAX_TIMER_SECS;

// ============================================================================
// Epoch
// ============================================================================

// Bumped on every restart; tasks scheduled under an older epoch are stale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Epoch(u64);

impl Epoch {
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

// ============================================================================
// Delayed Tasks
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    // Knocking ran its course: the monster opens the door
    KnockTimeout { room: usize },
    // The monster has finished walking away
    MonsterDepart { room: usize },
}

#[derive(Debug, Clone)]
pub struct ScheduledTask {
    pub kind: TaskKind,
    pub epoch: Epoch,
    timer: Timer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTask {
    pub kind: TaskKind,
    pub epoch: Epoch,
}

// Delays land in [0, MAX_TIMER_SECS]; NaN counts as zero so a bad value can never panic a Timer
#[must_use]
pub fn clamp_delay(delay_secs: f32) -> f32 {
    if delay_secs.is_nan() {
        warn!("delay is NaN, firing immediately");
        return 0.0;
    }
    if delay_secs > MAX_TIMER_SECS {
        warn!("delay {delay_secs}s capped at {MAX_TIMER_SECS}s");
    }
    delay_secs.clamp(0.0, MAX_TIMER_SECS)
}

// One-shot tasks ticked on the frame loop
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    tasks: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn schedule(&mut self, kind: TaskKind, delay_secs: f32, epoch: Epoch) {
        debug!("scheduled {kind:?} in {delay_secs}s (epoch {})", epoch.value());
        self.tasks.push(ScheduledTask {
            kind,
            epoch,
            timer: Timer::from_seconds(clamp_delay(delay_secs), TimerMode::Once),
        });
    }

    // Advance every task; finished ones are removed and returned in scheduling order
    pub fn tick(&mut self, delta: Duration) -> Vec<FiredTask> {
        let mut fired = Vec::new();
        self.tasks.retain_mut(|task| {
            task.timer.tick(delta);
            if task.timer.is_finished() {
                fired.push(FiredTask {
                    kind: task.kind,
                    epoch: task.epoch,
                });
                false
            } else {
                true
            }
        });
        fired
    }

    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&TaskKind) -> bool) {
        self.tasks.retain(|task| !predicate(&task.kind));
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledTask> {
        self.tasks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_fires_once_after_its_delay() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(TaskKind::KnockTimeout { room: 3 }, 1.0, Epoch::default());

        assert!(scheduler.tick(Duration::from_millis(600)).is_empty());
        let fired = scheduler.tick(Duration::from_millis(600));
        assert_eq!(
            fired,
            vec![FiredTask {
                kind: TaskKind::KnockTimeout { room: 3 },
                epoch: Epoch::default()
            }]
        );
        assert_eq!(scheduler.pending(), 0);
        assert!(scheduler.tick(Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn out_of_range_delays_are_clamped() {
        assert_eq!(clamp_delay(-2.0), 0.0);
        assert_eq!(clamp_delay(f32::NAN), 0.0);
        assert_eq!(clamp_delay(f32::INFINITY), MAX_TIMER_SECS);
        assert_eq!(clamp_delay(f32::MAX), MAX_TIMER_SECS);
        assert_eq!(clamp_delay(1.5), 1.5);

        let mut scheduler = Scheduler::default();
        scheduler.schedule(TaskKind::KnockTimeout { room: 0 }, f32::INFINITY, Epoch::default());
        scheduler.schedule(TaskKind::MonsterDepart { room: 0 }, f32::NAN, Epoch::default());
        let fired = scheduler.tick(Duration::ZERO);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].kind, TaskKind::MonsterDepart { room: 0 });
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn tasks_keep_their_epoch() {
        let mut scheduler = Scheduler::default();
        let old = Epoch::default();
        let new = old.next();
        scheduler.schedule(TaskKind::MonsterDepart { room: 0 }, 0.5, old);
        scheduler.schedule(TaskKind::MonsterDepart { room: 0 }, 0.5, new);
        let epochs: Vec<Epoch> = scheduler.tick(Duration::from_secs(1)).iter().map(|t| t.epoch).collect();
        assert_eq!(epochs, vec![old, new]);
        assert!(new > old);
    }

    #[test]
    fn cancel_removes_matching_tasks() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(TaskKind::KnockTimeout { room: 1 }, 1.0, Epoch::default());
        scheduler.schedule(TaskKind::MonsterDepart { room: 1 }, 1.0, Epoch::default());
        scheduler.cancel_where(|kind| matches!(kind, TaskKind::KnockTimeout { .. }));
        assert_eq!(scheduler.pending(), 1);
        scheduler.clear();
        assert_eq!(scheduler.pending(), 0);
    }
}
