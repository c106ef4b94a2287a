//! Routing and staleness tracking for committed terms.
//!
//! Every dispatch bumps a generation counter. A remote request carries the
//! ticket it was issued with, and its outcome may only be published while
//! that ticket is still the one in flight.

/// Where a committed term is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Blank term: republish the cached full catalog, no request
    Fallback,
    /// Remote search for the trimmed term
    Remote(String),
}

/// Decide the path for a committed term.
pub fn route(committed: &str) -> Route {
    let trimmed = committed.trim();
    if trimmed.is_empty() {
        Route::Fallback
    } else {
        Route::Remote(trimmed.to_string())
    }
}

/// Identifies one remote dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    generation: u64,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Latest-wins bookkeeping for dispatches.
#[derive(Debug, Default)]
pub struct Dispatcher {
    generation: u64,
    in_flight: Option<Ticket>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a remote dispatch. Any earlier ticket becomes stale.
    pub fn issue(&mut self) -> Ticket {
        self.generation += 1;
        let ticket = Ticket {
            generation: self.generation,
        };
        self.in_flight = Some(ticket);
        ticket
    }

    /// Record a dispatch resolved without a request (the fallback path).
    /// Any ticket still in flight becomes stale.
    pub fn supersede(&mut self) {
        self.generation += 1;
        self.in_flight = None;
    }

    /// Settle `ticket`. Returns true if its outcome may be published.
    pub fn settle(&mut self, ticket: Ticket) -> bool {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    /// The ticket currently awaiting a response
    pub fn in_flight_ticket(&self) -> Option<Ticket> {
        self.in_flight
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
