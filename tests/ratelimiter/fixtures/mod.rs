// tests/ratelimiter/fixtures/mod.rs


/// Route limiter logs to the test harness output; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
