use num_bigint::BigUint;
use std::time::Duration;

/// Number of distinct hex patterns of `hex_digits` length: `16^hex_digits`.
///
/// Exact for every criteria length (up to 128 digits, i.e. 2^512), which is
/// why this is a big integer and not a `u64`.
pub fn combinations(hex_digits: usize) -> BigUint {
    BigUint::from(16u32).pow(hex_digits as u32)
}

/// Expected time to the first match at the given rate.
///
/// Returns `None` while no rate is known yet, or when the estimate does not
/// fit in a `Duration`.
pub fn estimate_time(combinations: &BigUint, keys_per_sec: f64) -> Option<Duration> {
    if !(keys_per_sec > 0.0) {
        return None;
    }
    let rate = BigUint::from((keys_per_sec as u64).max(1));
    let secs = u64::try_from(combinations / rate).ok()?;
    Some(Duration::from_secs(secs))
}

/// Format a search space size as "65.54K", "4.29B", "1.2e+24", etc.
pub fn format_difficulty(n: &BigUint) -> String {
    match u64::try_from(n) {
        Ok(n) if n >= 1_000_000_000_000_000 => format_scientific(n as f64),
        Ok(n) if n >= 1_000_000_000_000 => format!("{:.2}T", n as f64 / 1_000_000_000_000.0),
        Ok(n) if n >= 1_000_000_000 => format!("{:.2}B", n as f64 / 1_000_000_000.0),
        Ok(n) if n >= 1_000_000 => format!("{:.2}M", n as f64 / 1_000_000.0),
        Ok(n) if n >= 1_000 => format!("{:.2}K", n as f64 / 1_000.0),
        Ok(n) => n.to_string(),
        Err(_) => {
            // Past u64: mantissa from the leading digits, exponent from the length
            let digits = n.to_string();
            let exponent = digits.len() - 1;
            let mantissa: f64 = format!("{}.{}", &digits[..1], &digits[1..digits.len().min(4)])
                .parse()
                .unwrap_or(1.0);
            format!("{:.1}e+{}", mantissa, exponent)
        }
    }
}

fn format_scientific(n: f64) -> String {
    let exponent = n.log10().floor() as i32;
    let mantissa = n / 10f64.powi(exponent);
    format!("{:.1}e+{}", mantissa, exponent)
}

/// Format duration as "5.3 hours", "2.5 minutes", "45 seconds", etc.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();

    if secs >= 31_536_000 {
        format!("{:.1} years", secs as f64 / 31_536_000.0)
    } else if secs >= 86400 {
        format!("{:.1} days", secs as f64 / 86400.0)
    } else if secs >= 3600 {
        format!("{:.1} hours", secs as f64 / 3600.0)
    } else if secs >= 60 {
        format!("{:.1} minutes", secs as f64 / 60.0)
    } else {
        format!("{} seconds", secs)
    }
}
