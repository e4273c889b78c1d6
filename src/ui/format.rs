//! Numeric display helpers.

const BYTE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Format an integer count with thousands separators
pub fn format_count(n: u64) -> String {
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

/// Format a byte count using the largest unit that keeps the displayed
/// magnitude in `[1, 1024)`, rounded to two decimals with trailing zeros
/// trimmed.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, BYTE_UNITS[unit])
}

/// Format megabytes with two decimals, as quota figures are displayed
pub fn format_mb(mb: f64) -> String {
    format!("{:.2} MB", mb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_group_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn bytes_use_largest_fitting_unit() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1_048_576), "1 MB");
        assert_eq!(format_bytes(1_073_741_824), "1 GB");
    }

    #[test]
    fn bytes_keep_meaningful_decimals() {
        assert_eq!(format_bytes(1100), "1.07 KB");
        assert_eq!(format_bytes(1_572_864), "1.5 MB");
    }

    #[test]
    fn huge_values_stay_in_gigabytes() {
        assert_eq!(format_bytes(2_199_023_255_552), "2048 GB");
    }

    #[test]
    fn megabytes_show_two_decimals() {
        assert_eq!(format_mb(12.5), "12.50 MB");
        assert_eq!(format_mb(0.0), "0.00 MB");
    }
}
