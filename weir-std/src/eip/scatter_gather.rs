//! Scatter-gather.
//!
//! A message is multicast to a fixed set of destinations and their replies
//! are recombined into one message. Replies can arrive in any order and from
//! any thread; the [`POSITION`] header written by the multicast puts each one
//! back in destination order before the fold.

use super::multicast::{Multicast, POSITION, multicast};
use crate::fault::{catch, failure};
use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
};
use weir_core::{
    Continuation, Message, Processor, Route, RoutingError, SharedStrategy, Validation,
};

/// The scatter half of a scatter-gather, waiting for its combine function.
pub struct Scatter {
    multicast: Multicast,
}

/// Multicast `message` to `destinations` under `strategy`.
///
/// Complete the pattern with [`Scatter::gather`].
pub fn scatter<I>(strategy: SharedStrategy, destinations: I) -> Scatter
where
    I: IntoIterator<Item = Route>,
{
    Scatter {
        multicast: multicast(strategy, destinations),
    }
}

impl Scatter {
    /// Recombine the replies with `combine`, folding left to right in
    /// destination order.
    pub fn gather<F>(self, combine: F) -> ScatterGather<F>
    where
        F: Fn(Message, Message) -> Message + Send + Sync + 'static,
    {
        ScatterGather {
            multicast: self.multicast,
            combine: Arc::new(combine),
        }
    }
}

/// A complete scatter-gather step.
///
/// For every input message a fresh gather barrier is created, so concurrent
/// inputs never share slots. The barrier delivers exactly one success, from
/// whichever reply completes the set. A failed reply is forwarded as is and
/// leaves the barrier incomplete.
pub struct ScatterGather<F> {
    multicast: Multicast,
    combine: Arc<F>,
}

impl<F> Processor for ScatterGather<F>
where
    F: Fn(Message, Message) -> Message + Send + Sync + 'static,
{
    fn process(&self, message: Message, k: Continuation) {
        let barrier = Arc::new(Gather::new(
            message.clone(),
            self.multicast.len(),
            Arc::clone(&self.combine),
        ));
        self.multicast.process(
            message,
            Arc::new(move |outcome: Validation| match outcome {
                Validation::Success(reply) => barrier.offer(reply, &k),
                failure @ Validation::Failure(_) => k(failure),
            }),
        );
    }
}

/// One-shot barrier over a fixed number of replies.
struct Gather<F> {
    original: Message,
    slots: Mutex<Vec<Slot>>,
    remaining: AtomicUsize,
    combine: Arc<F>,
}

impl<F> Gather<F>
where
    F: Fn(Message, Message) -> Message + Send + Sync + 'static,
{
    fn new(original: Message, size: usize, combine: Arc<F>) -> Self {
        Self {
            original,
            slots: Mutex::new((0..size).map(|_| Slot::Waiting).collect()),
            remaining: AtomicUsize::new(size),
            combine,
        }
    }

    fn offer(&self, reply: Message, k: &Continuation) {
        if let Err(reason) = self.store(reply) {
            k(Validation::Failure(
                self.original.set_exception(RoutingError::Gather(reason)),
            ));
            return;
        }
        // The slot write happens before this decrement, so the reply that
        // reaches zero observes every slot filled.
        if self.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.complete(k);
        } else {
            tracing::trace!("gather waiting for remaining replies");
        }
    }

    fn store(&self, reply: Message) -> Result<(), String> {
        let Some(&position) = reply.header_as::<usize>(POSITION) else {
            return Err("reply has no position header".to_owned());
        };
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        match slots.get_mut(position) {
            Some(slot) if matches!(*slot, Slot::Waiting) => {
                *slot = Slot::Filled(reply);
                Ok(())
            }
            Some(_) => Err(format!("duplicate reply for position {position}")),
            None => Err(format!("position {position} out of range")),
        }
    }

    fn complete(&self, k: &Continuation) {
        let replies: Vec<Message> = self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter_mut()
            .filter_map(Slot::fold)
            .collect();
        let combined = catch("gather", || {
            let mut replies = replies.into_iter();
            let first = replies
                .next()
                .ok_or_else(|| RoutingError::Gather("no replies to combine".to_owned()))?;
            Ok(replies.fold(first, |acc, next| (self.combine)(acc, next)))
        });
        match combined {
            Ok(result) => k(Validation::Success(result.remove_header(POSITION))),
            Err(exception) => k(failure(&self.original, exception)),
        }
    }
}

/// A reply slot. Folded slots keep their place so a late duplicate is still
/// reported as one.
enum Slot {
    Waiting,
    Filled(Message),
    Folded,
}

impl Slot {
    fn fold(&mut self) -> Option<Message> {
        match std::mem::replace(self, Slot::Folded) {
            Slot::Filled(reply) => Some(reply),
            Slot::Waiting | Slot::Folded => None,
        }
    }
}
