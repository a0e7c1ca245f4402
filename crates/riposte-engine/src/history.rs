//! Per-session conversation memory.

use std::collections::VecDeque;
use std::fmt::Write as _;

use riposte_core::types::Exchange;

/// Bounded FIFO record of one session's exchanges.
///
/// Capacity is fixed at construction. Appending at capacity evicts the
/// oldest exchange first; recency of use never re-orders entries (this is a
/// sliding window, not an LRU). One instance per session, never shared.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    exchanges: VecDeque<Exchange>,
    capacity: usize,
}

impl ConversationHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            exchanges: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an exchange at the tail, evicting the oldest beyond capacity.
    pub fn append(&mut self, exchange: Exchange) {
        self.exchanges.push_back(exchange);
        while self.exchanges.len() > self.capacity {
            self.exchanges.pop_front();
        }
    }

    /// The last `n` exchanges, oldest first.
    ///
    /// Never fails on `n` greater than the current length; yields whatever
    /// is available.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Exchange> {
        let skip = self.exchanges.len().saturating_sub(n);
        self.exchanges.iter().skip(skip)
    }

    /// Snapshot of every retained exchange, oldest first.
    pub fn all(&self) -> Vec<Exchange> {
        self.exchanges.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Render the model-call context: the base context followed by the last
    /// `n` exchanges as previous question/answer lines.
    ///
    /// An empty history returns the base context unchanged.
    pub fn enrich_context(&self, base: &str, n: usize) -> String {
        if self.exchanges.is_empty() || n == 0 {
            return base.to_string();
        }

        let mut enriched = format!("{}\n\nConversation History:", base);
        for exchange in self.recent(n) {
            let _ = write!(
                enriched,
                "\nPrevious Question: {}\nPrevious Answer: {}",
                exchange.question, exchange.answer
            );
        }
        enriched
    }
}
