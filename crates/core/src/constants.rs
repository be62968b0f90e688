/// Defaults shared by the breaker and retry configurations
use std::time::Duration;

// Circuit breaker
pub const DEFAULT_FAILURE_THRESHOLD: usize = 1;
pub const DEFAULT_SUCCESS_THRESHOLD: usize = 1;
pub const DEFAULT_OPEN_DELAY: Duration = Duration::from_secs(60);
pub const DEFAULT_HALF_OPEN_MAX_INFLIGHT: usize = 1;
pub const DEFAULT_BREAKER_NAME: &str = "circuit-breaker";

// Retry
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_RETRIES: u32 = 3;
