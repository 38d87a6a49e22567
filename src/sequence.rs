//! Response sequencing
//!
//! Requests are not cancelled when a newer one is issued, so their responses can arrive
//! in any order. A [`Sequencer`] hands out increasing tickets at request time and accepts
//! a response only if its ticket is newer than the last one applied.

/// Ticket identifying the request a response belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Issues tickets and tracks the newest applied response.
#[derive(Debug, Default)]
pub struct Sequencer {
    issued: u64,
    applied: Option<u64>,
}

impl Sequencer {
    /// Create a sequencer with no tickets issued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a new request.
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;

        Ticket(self.issued)
    }

    /// Whether `ticket` is the most recently issued one.
    #[must_use]
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }

    /// Accept the response for `ticket` if nothing newer has been applied, recording it as
    /// the newest applied response.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        if ticket.0 > self.issued {
            return false;
        }

        match self.applied {
            Some(applied) if applied >= ticket.0 => false,
            _ => {
                self.applied = Some(ticket.0);

                true
            }
        }
    }
}
