use std::sync::Once;

static INIT: Once = Once::new();

/// Routes the crate's `log` output through the test harness. Run with
/// `RUST_LOG=chained_hashtable=debug` to see resize events.
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}
