use std::time::Duration;

/// Tunables of the row-chart fetch coordinator.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Wait between a cache miss and the gateway call.
    ///
    /// Rows scrolled past within this window are dropped before any request
    /// is issued, which keeps fast scrolling from flooding the API.
    pub stagger: Duration,

    /// Upper bound on a single gateway call. On expiry every attached slot
    /// receives "no data" and the in-flight entry is cleared.
    pub fetch_timeout: Duration,

    /// Capacity of the delivery channel back to the consumer.
    pub delivery_capacity: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            stagger: Duration::from_secs(1),
            fetch_timeout: Duration::from_secs(10),
            delivery_capacity: 256,
        }
    }
}
