//! Constants for the download module (timeouts, throttling, chunking).

use std::time::Duration;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Status code the upstream API uses to ask clients to slow down.
pub const TOO_MANY_REQUESTS: u16 = 429;

/// Default cooldown after a 429 before the identical request is re-sent.
pub const DEFAULT_THROTTLE_COOLDOWN: Duration = Duration::from_secs(10);

/// Upper bound on the bytes written per chunk while streaming an asset.
pub const CHUNK_SIZE: usize = 8192;
