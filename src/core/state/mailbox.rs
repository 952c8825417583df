//=========================================================================
// State Mailbox
//=========================================================================
//
// Single-slot, last-write-wins mailbox holding one double-buffered value.
//
// Architecture:
// ```text
//   any context ── PendingHandle::set_pending() ──► [ pending slot ]
//                                                        │
//   control loop (checkpoint) ── apply_pending() ────────┘──► active
// ```
//
// Writers never queue: a later `set_pending` replaces an earlier one that
// has not been applied yet. Only the owner of the mailbox (`&mut`) can
// move the pending value into `active`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use parking_lot::Mutex;

//=== Internal Dependencies ===============================================

use super::ModeValue;

//=== Transition ==========================================================

/// Outcome of applying a pending value at a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<T> {
    pub from: T,
    pub to: T,
}

impl<T: ModeValue> Transition<T> {
    /// True when the active value actually changed.
    pub fn is_change(&self) -> bool {
        self.from != self.to
    }
}

//=== PendingHandle =======================================================

/// Write side of a [`StateMailbox`], shareable across threads.
#[derive(Debug, Clone)]
pub struct PendingHandle<T: ModeValue> {
    slot: Arc<Mutex<T>>,
}

impl<T: ModeValue> PendingHandle<T> {
    /// Records a requested transition. Replaces any unapplied request.
    pub fn set_pending(&self, value: T) {
        *self.slot.lock() = value;
    }

    pub fn pending(&self) -> T {
        *self.slot.lock()
    }
}

//=== StateMailbox ========================================================

/// Double-buffered state value with an active and a pending slot.
#[derive(Debug)]
pub struct StateMailbox<T: ModeValue> {
    active: T,
    pending: Arc<Mutex<T>>,
}

impl<T: ModeValue> StateMailbox<T> {
    /// Creates a mailbox whose active and pending values both equal `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            active: initial,
            pending: Arc::new(Mutex::new(initial)),
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn active(&self) -> T {
        self.active
    }

    pub fn pending(&self) -> T {
        *self.pending.lock()
    }

    /// Returns a handle other execution contexts can write through.
    pub fn handle(&self) -> PendingHandle<T> {
        PendingHandle {
            slot: Arc::clone(&self.pending),
        }
    }

    //--- Requests ---------------------------------------------------------

    pub fn set_pending(&self, value: T) {
        *self.pending.lock() = value;
    }

    /// Replaces the pending value only if it still equals `expected`.
    ///
    /// Returns `false` when another context wrote a newer request first.
    pub fn replace_pending(&self, expected: T, value: T) -> bool {
        let mut slot = self.pending.lock();
        if *slot != expected {
            return false;
        }
        *slot = value;
        true
    }

    //--- Checkpoints ------------------------------------------------------

    /// Copies the pending value into the active slot.
    ///
    /// Calling it again without an intervening `set_pending` returns a
    /// transition with `from == to` and changes nothing.
    pub fn apply_pending(&mut self) -> Transition<T> {
        let to = *self.pending.lock();
        let from = std::mem::replace(&mut self.active, to);
        Transition { from, to }
    }

    /// Applies the pending value only if it is still `expected`.
    ///
    /// The dispatcher reads the pending value, decides what to run, and
    /// then applies through this method so a request that raced in after
    /// the decision is left pending for the next iteration instead of
    /// being entered without its entry actions.
    pub fn apply_if_pending(&mut self, expected: T) -> Option<Transition<T>> {
        let slot = self.pending.lock();
        if *slot != expected {
            return None;
        }
        let from = std::mem::replace(&mut self.active, *slot);
        Some(Transition { from, to: *slot })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
