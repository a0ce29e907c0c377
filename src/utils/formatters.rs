use chrono::{DateTime, Local};

/// Width of the compact size field (`   1.50 KiB`).
pub const COMPACT_SIZE_WIDTH: usize = 11;

/// Width of the expanded size field (`            1,234 B`).
pub const EXPANDED_SIZE_WIDTH: usize = 19;

/// Binary size units, smallest first.
const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

/// Formats an integer with `separator` between groups of three digits.
///
/// ```
/// use scmls::utils::formatters::format_integer;
///
/// assert_eq!(format_integer(1234567, ','), "1,234,567");
/// assert_eq!(format_integer(999, ','), "999");
/// ```
#[must_use]
pub fn format_integer(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(digit);
    }
    out
}

/// Scales a byte count to the largest binary unit below it.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn scale_bytes(bytes: u64) -> (f64, &'static str) {
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    (size, UNITS[unit_index])
}

/// Formats a byte count right-aligned in `width` columns.
///
/// Compact output scales to a binary unit with two decimals
/// (`   1.50 KiB`); expanded output prints the exact count with thousands
/// separators (`1,536 B`).
#[must_use]
pub fn format_number(bytes: u64, width: usize, expand: bool) -> String {
    if expand {
        format!("{:>width$} B", format_integer(bytes, ','))
    } else {
        let (value, unit) = scale_bytes(bytes);
        format!("{value:>width$.2} {unit}")
    }
}

/// Fixed-width size column of a listing line; blank for directories.
#[must_use]
pub fn format_size_field(bytes: u64, is_directory: bool, compact: bool) -> String {
    let width = if compact {
        COMPACT_SIZE_WIDTH
    } else {
        EXPANDED_SIZE_WIDTH
    };

    if is_directory {
        return " ".repeat(width);
    }

    let field = if compact {
        let (value, unit) = scale_bytes(bytes);
        format!("{value:>7.2} {unit}")
    } else {
        format_number(bytes, width - 2, true)
    };
    format!("{field:<width$}")
}

/// Listing timestamp, `MM/DD/YY HH:MM:SS`.
#[must_use]
pub fn format_timestamp(timestamp: &DateTime<Local>) -> String {
    timestamp.format("%m/%d/%y %H:%M:%S").to_string()
}

/// Pluralized count such as `1 file` or `3 dirs`.
#[must_use]
pub fn format_count(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_integer() {
        assert_eq!(format_integer(0, ','), "0");
        assert_eq!(format_integer(1000, ','), "1,000");
        assert_eq!(format_integer(12_345, '.'), "12.345");
        assert_eq!(format_integer(u64::MAX, ','), "18,446,744,073,709,551,615");
    }

    #[test]
    fn test_compact_size_field() {
        assert_eq!(format_size_field(0, false, true), "   0.00 B  ");
        assert_eq!(format_size_field(1536, false, true), "   1.50 KiB");
        assert_eq!(format_size_field(5 * 1024 * 1024, false, true), "   5.00 MiB");
        assert_eq!(format_size_field(1536, true, true), " ".repeat(COMPACT_SIZE_WIDTH));
        assert_eq!(format_size_field(1023, false, true).len(), COMPACT_SIZE_WIDTH);
    }

    #[test]
    fn test_expanded_size_field() {
        let field = format_size_field(1234, false, false);
        assert_eq!(field, "            1,234 B");
        assert_eq!(field.len(), EXPANDED_SIZE_WIDTH);
        assert_eq!(format_size_field(1234, true, false).len(), EXPANDED_SIZE_WIDTH);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(2048, 8, false), "    2.00 KiB");
        assert_eq!(format_number(2048, 8, true), "   2,048 B");
        assert_eq!(format_number(10, 0, false), "10.00 B");
    }

    #[test]
    fn test_format_timestamp() {
        let ts = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 3).unwrap();
        assert_eq!(format_timestamp(&ts), "03/09/24 07:05:03");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1, "file"), "1 file");
        assert_eq!(format_count(2, "dir"), "2 dirs");
    }
}
