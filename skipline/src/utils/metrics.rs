#[cfg(feature = "metrics")]
use std::time::Instant;

/// Runs given closure and - if the `metrics` feature is enabled - logs how
/// long it took.
pub fn measure<T>(label: &str, f: impl FnOnce() -> T) -> T {
    #[cfg(feature = "metrics")]
    {
        let tt = Instant::now();
        let result = f();

        log::info!(
            "{label}: {}",
            humantime::format_duration(tt.elapsed())
        );

        result
    }

    #[cfg(not(feature = "metrics"))]
    {
        _ = label;

        f()
    }
}
