//! Generic request lifecycle shared by every page.
//!
//! Idle -> Pending -> (Succeeded | Failed), with two guards:
//! - single in-flight: `begin` refuses while Pending;
//! - stale responses: completions carry a generation ticket and are dropped
//!   when `reset` or a newer submit has moved the state on. The transport
//!   cannot be cancelled, so this is the only defense.

use crate::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// Token tying a completion to the submit that started it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct Lifecycle<T> {
    status: Status,
    error: Option<String>,
    result: Option<T>,
    generation: u64,
}

impl<T> Lifecycle<T> {
    pub fn new() -> Self {
        Self {
            status: Status::Idle,
            error: None,
            result: None,
            generation: 0,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == Status::Pending
    }

    /// Some iff Succeeded.
    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    /// Some iff Failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a new request. Returns None while one is already in flight,
    /// leaving state untouched.
    pub fn begin(&mut self) -> Option<Ticket> {
        if self.status == Status::Pending {
            return None;
        }
        self.generation += 1;
        self.status = Status::Pending;
        self.error = None;
        self.result = None;
        Some(Ticket(self.generation))
    }

    /// Resolve the request started by `ticket`. A completion from an older
    /// generation, or arriving when nothing is pending, is discarded;
    /// returns whether the state changed.
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<T, FetchError>) -> bool {
        if ticket.0 != self.generation || self.status != Status::Pending {
            return false;
        }
        match outcome {
            Ok(result) => {
                self.status = Status::Succeeded;
                self.result = Some(result);
            }
            Err(err) => {
                self.status = Status::Failed;
                self.error = Some(err.to_string());
            }
        }
        true
    }

    /// Local failure path (validation); no network call was made. Bumps the
    /// generation so any in-flight completion becomes stale.
    pub fn fail(&mut self, err: FetchError) {
        self.generation += 1;
        self.status = Status::Failed;
        self.result = None;
        self.error = Some(err.to_string());
    }

    /// Force Idle from any state. A no-op on Idle.
    pub fn reset(&mut self) {
        if self.status == Status::Idle {
            return;
        }
        self.generation += 1;
        self.status = Status::Idle;
        self.error = None;
        self.result = None;
    }
}

impl<T> Default for Lifecycle<T> {
    fn default() -> Self {
        Self::new()
    }
}
