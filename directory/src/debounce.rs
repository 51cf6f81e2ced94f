//! Search input debounce: one fetch per pause in typing, Enter fires at once.

use std::time::Duration;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket(u64);

#[derive(Debug, Clone, Default)]
pub struct SearchDebounce {
    seq: u64,
    pending: Option<(u64, String)>,
}

impl SearchDebounce {
    /// Records a keystroke. The caller waits [`SEARCH_DEBOUNCE`] and then calls [`Self::settle`].
    pub fn input(&mut self, term: &str) -> DebounceTicket {
        self.seq += 1;
        self.pending = Some((self.seq, term.to_string()));
        DebounceTicket(self.seq)
    }

    /// The term to search for, if nothing newer arrived while the ticket was waiting.
    pub fn settle(&mut self, ticket: DebounceTicket) -> Option<String> {
        match &self.pending {
            Some((seq, _)) if *seq == ticket.0 => self.pending.take().map(|(_, term)| term),
            _ => None,
        }
    }

    /// Enter key: cancels the pending timer and returns the term immediately.
    pub fn submit(&mut self, term: &str) -> String {
        self.seq += 1;
        self.pending = None;
        term.to_string()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
