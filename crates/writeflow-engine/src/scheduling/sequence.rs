/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Hands out increasing tickets and accepts only the newest one's response.
#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    latest: u64,
    /// Latest ticket whose response was accepted
    settled: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    /// True when `ticket` is the newest issued and has not been accepted yet.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        if ticket.0 != self.latest || ticket.0 == self.settled {
            return false;
        }
        self.settled = ticket.0;
        true
    }

    /// Whether an issued request is still waiting for its response.
    pub fn in_flight(&self) -> bool {
        self.latest != self.settled
    }

    /// Invalidate every outstanding ticket.
    pub fn invalidate(&mut self) {
        self.latest += 1;
        self.settled = self.latest;
    }
}
