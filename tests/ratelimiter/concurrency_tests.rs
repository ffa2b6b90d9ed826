// tests/ratelimiter/concurrency_tests.rs

#[cfg(test)]
mod tests {

    use crate::fixtures::test_clock::TestClock;
    use slide_limiter::{SlidingLimiter, SlidingLimiterConfig};
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn concurrent_requests_never_exceed_quota() {
        let config = SlidingLimiterConfig::new(50, 60_000);
        let limiter = Arc::new(SlidingLimiter::with_config(config, TestClock::new(0)));
        let barrier = Arc::new(Barrier::new(16));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    (0..100)
                        .filter(|_| limiter.try_request("shared".to_string()).unwrap())
                        .count()
                })
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 50);
        assert_eq!(limiter.remaining_requests("shared").unwrap(), 0);
    }

    #[test]
    fn concurrent_clients_get_their_own_quota() {
        let config = SlidingLimiterConfig::new(10, 60_000);
        let limiter = Arc::new(SlidingLimiter::with_config(config, TestClock::new(0)));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let limiter = Arc::clone(&limiter);
                thread::spawn(move || {
                    let client = format!("client{}", i);
                    (0..25)
                        .filter(|_| limiter.try_request(client.clone()).unwrap())
                        .count()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 10);
        }
        assert_eq!(limiter.stats().tracked_identifiers, 8);
    }

    #[test]
    fn cleanup_during_traffic_keeps_quota_exact() {
        let clock = TestClock::new(0);
        let config = SlidingLimiterConfig::new(20, 1_000);
        let limiter = Arc::new(SlidingLimiter::with_config(config, clock.clone()));

        let sweeper = {
            let limiter = Arc::clone(&limiter);
            thread::spawn(move || {
                for _ in 0..200 {
                    limiter.cleanup().unwrap();
                }
            })
        };

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                thread::spawn(move || {
                    (0..50)
                        .filter(|_| limiter.try_request("shared".to_string()).unwrap())
                        .count()
                })
            })
            .collect();

        let admitted: usize = workers.into_iter().map(|h| h.join().unwrap()).sum();
        sweeper.join().unwrap();
        assert_eq!(admitted, 20);
    }
}
