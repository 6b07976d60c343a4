use std::time::Duration;

use tracing::{Span, field};

use super::TraceId;

/// Create a root span for a command / refresh / detail load
pub fn root_span(name: &'static str, trace_id: &TraceId) -> Span {
    tracing::info_span!(
        "root",
        name = %name,
        trace_id = %trace_id.as_str(),
        asset_id = field::Empty
    )
}

/// Create a child span (inherits trace_id automatically)
pub fn child_span(name: &'static str) -> Span {
    tracing::info_span!("child", name = %name, asset_id = field::Empty)
}

/// Record the asset a span is working on.
pub fn annotate_span(asset_id: &str) {
    Span::current().record("asset_id", field::display(asset_id));
}

pub async fn warn_if_slow<F, T>(label: &'static str, max: Duration, fut: F) -> T
where
    F: std::future::Future<Output = T>,
{
    let start = std::time::Instant::now();
    let out = fut.await;
    let elapsed = start.elapsed();
    if elapsed > max {
        tracing::warn!(
            target: "performance",
            label = label,
            elapsed_ms = elapsed.as_millis() as u64,
            "slow operation detected"
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn warn_if_slow_passes_through_output() {
        let out = warn_if_slow("noop", Duration::from_secs(1), async { 7 }).await;
        assert_eq!(out, 7);
    }
}
