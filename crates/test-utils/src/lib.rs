// crates/test-utils/src/lib.rs

//! Shared helpers for zinc's integration tests.

pub mod builders;
pub mod fake_executor;
pub mod http;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use zinc::logging::LOG_ENV_VAR;

/// Upper bound for any single async test body. Generous enough for the
/// process tests, which sleep and wait on real children.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

static INIT: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// The filter comes from `ZINC_LOG` (the same variable the binary reads),
/// then `RUST_LOG`, then `zinc=debug` with everything else at warn, so
/// failing tests show the scheduler's lifecycle events without dependency
/// noise. Captured output is only printed for failing tests.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn,zinc=debug"));

        // Another harness may already have installed a subscriber.
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .try_init();
    });
}

/// Await `f`, failing the test if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_TIMEOUT, f).await {
        Ok(value) => value,
        Err(_) => panic!("test did not finish within {TEST_TIMEOUT:?}"),
    }
}
