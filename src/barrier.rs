use parking_lot::{Condvar, Mutex};

/// How a thread left [`Barrier::wait`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierWait {
    /// This thread completed the rendezvous and woke the others.
    Leader,
    Follower,
    /// The barrier was stopped; no rendezvous happened.
    Stopped,
}

struct BarrierState {
    remaining: usize,
    generation: u64,
    stopped: bool,
}

/// Reusable, generation-counted barrier.
///
/// The thread that brings `remaining` to zero resets it to the threshold and
/// advances the generation; everyone still holding the old generation wakes
/// up. [`stop`](Barrier::stop) advances the generation unconditionally and
/// leaves the barrier stopped, so later waits return straight away.
pub struct Barrier {
    threshold: usize,
    state: Mutex<BarrierState>,
    cvar: Condvar,
}

impl Barrier {
    pub fn new(threshold: usize) -> Self {
        assert!(threshold > 0, "barrier threshold must be at least 1");
        Self {
            threshold,
            state: Mutex::new(BarrierState { remaining: threshold, generation: 0, stopped: false }),
            cvar: Condvar::new(),
        }
    }

    pub fn wait(&self) -> BarrierWait {
        let mut state = self.state.lock();
        if state.stopped {
            return BarrierWait::Stopped;
        }

        let generation = state.generation;
        state.remaining -= 1;
        if state.remaining == 0 {
            state.remaining = self.threshold;
            state.generation = state.generation.wrapping_add(1);
            self.cvar.notify_all();
            return BarrierWait::Leader;
        }

        while state.generation == generation {
            self.cvar.wait(&mut state);
        }
        if state.stopped { BarrierWait::Stopped } else { BarrierWait::Follower }
    }

    /// Wake every waiter regardless of how many have arrived.
    pub fn stop(&self) {
        let mut state = self.state.lock();
        state.stopped = true;
        state.remaining = self.threshold;
        state.generation = state.generation.wrapping_add(1);
        self.cvar.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        self.state.lock().stopped
    }
}
