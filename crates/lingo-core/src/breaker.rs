use std::sync::atomic::{AtomicBool, Ordering};

use lingo_translator::TranslateError;

/// Latches open after a permission failure and stays open for the life of
/// the process. There is no reset window.
#[derive(Debug, Default)]
pub struct CircuitBreaker {
    tripped: AtomicBool,
}

impl CircuitBreaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::Acquire)
    }

    /// Returns true only for the call that actually tripped it
    pub fn trip(&self) -> bool {
        !self.tripped.swap(true, Ordering::AcqRel)
    }

    /// Feed a provider error; trips on the fatal class
    pub fn record(&self, error: &TranslateError) -> bool {
        error.is_fatal() && self.trip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_permission_errors_trip() {
        let breaker = CircuitBreaker::new();
        assert!(!breaker.record(&TranslateError::RateLimitExceeded));
        assert!(!breaker.record(&TranslateError::ApiError("HTTP 502".into())));
        assert!(!breaker.is_tripped());

        assert!(breaker.record(&TranslateError::Forbidden));
        assert!(breaker.is_tripped());

        // Already open
        assert!(!breaker.record(&TranslateError::Forbidden));
        assert!(breaker.is_tripped());
    }
}
