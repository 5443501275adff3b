// ── Cancellable request channel ──
//
// One channel per kind of read (load, search). Starting a request on a
// channel cancels whatever was in flight there and bumps a generation
// counter; a result may only be committed while its generation is current.
// Each request carries a tag (the view mode it was issued for) so callers
// can see what the in-flight request will produce.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Handle for one request started on a [`Channel`].
#[derive(Debug, Clone)]
pub(crate) struct Ticket {
    generation: u64,
    pub(crate) token: CancellationToken,
}

#[derive(Debug)]
struct ChannelState<T> {
    generation: u64,
    active: Option<(CancellationToken, T)>,
}

#[derive(Debug)]
pub(crate) struct Channel<T> {
    name: &'static str,
    state: Mutex<ChannelState<T>>,
    in_flight: AtomicBool,
}

impl<T: Copy + PartialEq> Channel<T> {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Mutex::new(ChannelState {
                generation: 0,
                active: None,
            }),
            in_flight: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ChannelState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a request tagged `tag`, superseding any request already in flight.
    pub(crate) fn begin(&self, tag: T) -> Ticket {
        let mut state = self.lock();
        if let Some((previous, _)) = state.active.take() {
            trace!(channel = self.name, generation = state.generation, "superseding");
            previous.cancel();
        }
        state.generation += 1;
        let token = CancellationToken::new();
        state.active = Some((token.clone(), tag));
        self.in_flight.store(true, Ordering::Release);
        Ticket {
            generation: state.generation,
            token,
        }
    }

    /// Cancel the in-flight request, if any, without starting a new one.
    pub(crate) fn cancel(&self) {
        Self::cancel_locked(self.name, &mut self.lock(), &self.in_flight);
    }

    /// Cancel the in-flight request unless it was tagged `keep`.
    pub(crate) fn cancel_unless(&self, keep: T) {
        let mut state = self.lock();
        if state.active.as_ref().is_some_and(|(_, tag)| *tag != keep) {
            Self::cancel_locked(self.name, &mut state, &self.in_flight);
        }
    }

    fn cancel_locked(name: &'static str, state: &mut ChannelState<T>, in_flight: &AtomicBool) {
        if let Some((previous, _)) = state.active.take() {
            trace!(channel = name, generation = state.generation, "cancelling");
            previous.cancel();
            state.generation += 1;
        }
        in_flight.store(false, Ordering::Release);
    }

    /// Tag of the request in flight, if any.
    pub(crate) fn active_tag(&self) -> Option<T> {
        self.lock().active.as_ref().map(|(_, tag)| *tag)
    }

    /// Run `apply` only if `ticket` is still the current request, marking
    /// the channel idle first. Returns whether `apply` ran.
    ///
    /// The channel lock is held across `apply`, so no newer request can
    /// start between the currency check and the commit.
    pub(crate) fn commit(&self, ticket: &Ticket, apply: impl FnOnce()) -> bool {
        let mut state = self.lock();
        if state.generation != ticket.generation {
            return false;
        }
        state.active = None;
        self.in_flight.store(false, Ordering::Release);
        apply();
        true
    }

    pub(crate) fn in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}
