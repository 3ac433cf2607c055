use std::time::Duration;

/// Aggregated throughput of a search session.
///
/// `total_attempts` only ever grows; `attempts_per_second` is the rate seen
/// between the two most recent progress reports.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProgressStats {
    pub total_attempts: u64,
    pub attempts_per_second: f64,
}

impl ProgressStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for `delta` attempts reported `elapsed` after the previous
    /// report. A zero interval keeps the last known rate.
    pub fn record(&mut self, delta: u64, elapsed: Duration) {
        self.total_attempts = self.total_attempts.saturating_add(delta);

        let secs = elapsed.as_secs_f64();
        if secs > 0.0 {
            self.attempts_per_second = delta as f64 / secs;
        }
    }
}

/// Format a number with comma separators
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format speed in human-readable form
pub fn format_speed(speed: u64) -> String {
    if speed >= 1_000_000 {
        format!("{:.2}M", speed as f64 / 1_000_000.0)
    } else if speed >= 1_000 {
        format!("{:.2}K", speed as f64 / 1_000.0)
    } else {
        format!("{}", speed)
    }
}

/// Format running time in a compact way
pub fn format_running_time(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accumulates() {
        let mut stats = ProgressStats::new();
        assert_eq!(stats.total_attempts, 0);

        stats.record(100, Duration::from_millis(50));
        assert_eq!(stats.total_attempts, 100);
        assert!((stats.attempts_per_second - 2000.0).abs() < 1e-6);

        stats.record(100, Duration::from_millis(200));
        assert_eq!(stats.total_attempts, 200);
        assert!((stats.attempts_per_second - 500.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_interval_keeps_rate() {
        let mut stats = ProgressStats::new();
        stats.record(100, Duration::from_secs(1));
        stats.record(100, Duration::ZERO);
        assert_eq!(stats.total_attempts, 200);
        assert_eq!(stats.attempts_per_second, 100.0);
    }

    #[test]
    fn test_format_speed() {
        assert_eq!(format_speed(2_500_000), "2.50M");
        assert_eq!(format_speed(1_500), "1.50K");
        assert_eq!(format_speed(999), "999");
        assert_eq!(format_speed(12_346), "12.35K");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_running_time() {
        assert_eq!(format_running_time(Duration::from_secs(42)), "42s");
        assert_eq!(format_running_time(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_running_time(Duration::from_secs(3725)), "1h 2m 5s");
    }
}
