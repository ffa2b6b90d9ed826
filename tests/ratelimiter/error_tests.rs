// tests/ratelimiter/error_tests.rs

#[cfg(test)]
mod tests {
    use crate::fixtures::test_clock::TestClock;
    use slide_limiter::{SlidingLimiter, SlidingLimiterConfig, SlidingLimiterError};

    #[test]
    fn clock_error_propagates_in_try_request() {
        let clock = TestClock::new(0);
        let config = SlidingLimiterConfig::new(10, 1_000);
        let limiter = SlidingLimiter::with_config(config, clock.clone());

        // Make the clock fail on next call
        clock.fail_next_call();

        let result = limiter.try_request("client1");
        assert!(result.is_err());

        // Verify it's specifically a clock error
        match result.unwrap_err() {
            SlidingLimiterError::ClockError(_) => {} // Expected
            other => panic!("Expected ClockError, got: {:?}", other),
        }
    }

    #[test]
    fn clock_recovery_after_failure() {
        let clock = TestClock::new(0);
        let config = SlidingLimiterConfig::new(10, 1_000);
        let limiter = SlidingLimiter::with_config(config, clock.clone());

        // First request should succeed
        assert!(limiter.try_request("client1").unwrap());

        // Make clock fail for next call
        clock.fail_next_call();
        assert!(limiter.try_request("client1").is_err());

        // Clock should work again automatically
        assert!(limiter.try_request("client1").unwrap());
    }

    #[test]
    fn clock_error_propagates_in_queries_and_cleanup() {
        let clock = TestClock::new(0);
        let config = SlidingLimiterConfig::new(10, 1_000);
        let limiter = SlidingLimiter::with_config(config, clock.clone());
        let _ = limiter.try_request("client1").unwrap();

        clock.fail_next_call();
        assert!(matches!(
            limiter.remaining_requests("client1"),
            Err(SlidingLimiterError::ClockError(_))
        ));

        clock.fail_next_call();
        assert!(matches!(
            limiter.retry_after("client1"),
            Err(SlidingLimiterError::ClockError(_))
        ));

        clock.fail_next_call();
        assert!(matches!(
            limiter.cleanup(),
            Err(SlidingLimiterError::ClockError(_))
        ));
    }

    #[test]
    fn failed_request_leaves_state_untouched() {
        let clock = TestClock::new(0);
        let config = SlidingLimiterConfig::new(2, 1_000);
        let limiter = SlidingLimiter::with_config(config, clock.clone());

        assert!(limiter.try_request("client1").unwrap());
        clock.advance(100);
        assert!(limiter.try_request("client2").unwrap());
        assert_eq!(limiter.stats().tracked_identifiers, 2);

        // Clock fails during operation
        clock.fail_next_call();
        assert!(limiter.try_request("client3").is_err());

        // No window was created and no quota consumed
        assert_eq!(limiter.stats().tracked_identifiers, 2);
        assert_eq!(limiter.remaining_requests("client1").unwrap(), 1);

        assert!(limiter.try_request("client3").unwrap());
        assert_eq!(limiter.stats().tracked_identifiers, 3);
    }

    #[test]
    fn cleanup_recovers_from_clock_error() {
        let clock = TestClock::new(0);
        let config = SlidingLimiterConfig::new(10, 1_000);
        let limiter = SlidingLimiter::with_config(config, clock.clone());

        let _ = limiter.try_request("client1").unwrap();
        let _ = limiter.try_request("client2").unwrap();

        // Cleanup fails due to clock error
        clock.fail_next_call();
        assert!(limiter.cleanup().is_err());

        // Clients should still be there (cleanup didn't succeed)
        assert_eq!(limiter.stats().tracked_identifiers, 2);

        // Cleanup should work after clock recovery
        clock.advance(2_000);
        assert_eq!(limiter.cleanup().unwrap(), 2);
    }

    #[test]
    fn error_display_formatting() {
        let clock = TestClock::new(0);
        let config = SlidingLimiterConfig::new(10, 1_000);
        let limiter = SlidingLimiter::with_config(config, clock.clone());

        clock.fail_next_call();
        match limiter.try_request("client1") {
            Err(e) => {
                let error_string = e.to_string().to_lowercase();
                assert!(error_string.contains("clock"));
                assert!(error_string.contains("epoch"));
            }
            Ok(_) => panic!("Expected error, got success"),
        }

        let unknown = SlidingLimiterError::UnknownLimiter("uploads".to_string());
        assert!(unknown.to_string().contains("`uploads`"));
    }
}
