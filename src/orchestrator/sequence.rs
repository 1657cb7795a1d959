/// Tag carried by one outgoing list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn number(&self) -> u64 {
        self.0
    }
}

/// Per-list monotonic request counter.
///
/// A response is applied only if its ticket is newer than every ticket
/// applied so far, so a slow response to an older request can never
/// overwrite the result of a newer one.
#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    issued: u64,
    applied: u64,
}

impl RequestSequencer {
    pub fn issue(&mut self) -> RequestTicket {
        self.issued += 1;
        RequestTicket(self.issued)
    }

    /// Record `ticket` as applied. False means it is stale and must be dropped.
    pub fn accept(&mut self, ticket: RequestTicket) -> bool {
        if ticket.0 <= self.applied {
            return false;
        }
        self.applied = ticket.0;
        true
    }

    /// Make every ticket issued so far stale.
    pub fn supersede_all(&mut self) {
        self.applied = self.issued;
    }

    pub fn last_applied(&self) -> u64 {
        self.applied
    }
}
