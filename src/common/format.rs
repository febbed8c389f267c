// Human-readable size formatting for console output

const UNITS: &[&str] = &["KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB"];

/// Format a byte count using binary units
///
/// Counts below 1 KiB are printed exactly ("999 bytes"); larger counts get at
/// most three decimals with trailing zeros trimmed ("1 KiB", "1.001 KiB").
pub fn file_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} bytes", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    // Compare after rounding so 1023.9999 KiB prints as 1 MiB
    while (value * 1000.0).round() >= 1024.0 * 1000.0 && unit < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }

    let rendered = format!("{:.3}", value);
    let rendered = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", rendered, UNITS[unit - 1])
}

/// Format a transfer rate in bytes per second
pub fn throughput(bytes_per_second: f64) -> String {
    format!("{}/s", file_size(bytes_per_second.max(0.0) as u64))
}
