// File: src/core/context.rs
use crate::core::alphabet::Alphabet;
use crate::core::tokenizer;
use crate::core::types::SessionCounters;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Tag shared between a session and its in-flight conversions.
/// Advancing it makes every result tagged with an older value stale.
#[derive(Debug, Clone, Default)]
pub struct Generation(Arc<AtomicU64>);

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Invalidates everything issued so far and returns the new tag.
    pub fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn is_current(&self, tag: u64) -> bool {
        self.current() == tag
    }
}

/// The user-facing state of a session: selected alphabet, the text in the
/// input box, and the counters derived from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    alphabet: Alphabet,
    input: String,
    counters: SessionCounters,
}

impl SessionContext {
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            ..Self::default()
        }
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    pub fn set_alphabet(&mut self, alphabet: Alphabet) {
        self.alphabet = alphabet;
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replaces the input text and recomputes the counters.
    pub fn set_input(&mut self, text: impl Into<String>) -> SessionCounters {
        self.input = text.into();
        self.counters = tokenizer::count(&self.input);
        self.counters
    }

    pub fn clear_input(&mut self) -> SessionCounters {
        self.set_input(String::new())
    }

    pub fn counters(&self) -> SessionCounters {
        self.counters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_advances_monotonically() {
        let generation = Generation::new();
        let shared = generation.clone();
        assert_eq!(generation.current(), 0);
        let tag = generation.advance();
        assert_eq!(tag, 1);
        assert!(shared.is_current(tag));
        shared.advance();
        assert!(!generation.is_current(tag));
    }

    #[test]
    fn counters_track_input() {
        let mut context = SessionContext::new(Alphabet::Arabic);
        assert_eq!(context.counters(), SessionCounters::default());
        let counters = context.set_input("one two  three");
        assert_eq!(counters, SessionCounters { words: 3, letters: 11 });
        assert_eq!(context.input(), "one two  three");
        assert_eq!(context.clear_input(), SessionCounters::default());
        assert_eq!(context.alphabet(), Alphabet::Arabic);
    }
}
