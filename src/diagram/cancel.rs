use std::cell::Cell;
use std::rc::Rc;

/// Issues cancellation tokens; advancing it cancels every token issued before
#[derive(Debug, Clone, Default)]
pub struct CancellationSource {
    generation: Rc<Cell<u64>>,
}

/// Handed to one reconstruction; checked after every await point
#[derive(Debug, Clone)]
pub struct CancellationToken {
    generation: Rc<Cell<u64>>,
    issued: u64,
}

impl CancellationSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel all outstanding tokens and return a fresh one
    #[must_use]
    pub fn renew(&self) -> CancellationToken {
        self.cancel_all();
        self.token()
    }

    /// Token valid until the next `cancel_all` or `renew`
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            generation: Rc::clone(&self.generation),
            issued: self.generation.get(),
        }
    }

    pub fn cancel_all(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
    }
}

impl CancellationToken {
    /// A token nothing can cancel
    #[must_use]
    pub fn never() -> Self {
        CancellationSource::new().token()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.generation.get() != self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renew_cancels_previous_token() {
        let source = CancellationSource::new();
        let first = source.token();
        let second = source.renew();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
    }

    #[test]
    fn test_tokens_from_same_generation_share_fate() {
        let source = CancellationSource::new();
        let a = source.token();
        let b = source.token();
        source.cancel_all();
        assert!(a.is_cancelled());
        assert!(b.is_cancelled());
    }

    #[test]
    fn test_never_token() {
        assert!(!CancellationToken::never().is_cancelled());
    }
}
