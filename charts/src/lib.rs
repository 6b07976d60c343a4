//! Per-row chart data: a process-lifetime series cache, reusable display
//! slots guarded by generation tickets, and the coordinator that populates
//! both from the market gateway.

pub mod cache;
pub mod config;
pub mod coordinator;
pub mod detail;
pub mod segments;
pub mod slot;

pub use cache::SeriesCache;
pub use config::CoordinatorConfig;
pub use coordinator::{Delivery, EnsureOutcome, FetchCoordinator, Payload};
pub use slot::{ChartSink, SlotContent, SlotController, SlotId, SlotTable, SlotTicket};
