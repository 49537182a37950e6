const UNITS: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];
const STEP: f64 = 1024.0;

// Every f64 has an exact decimal expansion shorter than this
const MAX_PRECISION: usize = 1100;
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

pub const DEFAULT_DECIMALS: usize = 2;

/// Human readable size with two decimals, e.g. `1.50 KB`.
pub fn format(bytes: u64) -> String {
    format_with(bytes, DEFAULT_DECIMALS)
}

/// Human readable size in base-1024 units. Plain bytes are always printed
/// without decimals.
pub fn format_with(bytes: u64, decimals: usize) -> String {
    let exponent = exponent_of(bytes);
    let unit = UNITS[exponent];
    let decimals = if exponent == 0 { 0 } else { decimals };

    let value = bytes as f64 / STEP.powi(exponent as i32);
    let shown = decimals.min(MAX_PRECISION);
    let mut number = format!("{:.*}", shown, round_half_away(value, decimals));
    number.extend(std::iter::repeat_n('0', decimals - shown));
    format!("{number} {unit}")
}

/// Largest `e` with `1024^e <= bytes`, computed on integers so exact powers
/// never land one unit short.
fn exponent_of(bytes: u64) -> usize {
    let mut exponent = 0;
    let mut remaining = bytes;
    while remaining >= 1024 && exponent < UNITS.len() - 1 {
        remaining /= 1024;
        exponent += 1;
    }
    exponent
}

fn round_half_away(value: f64, decimals: usize) -> f64 {
    let factor = i32::try_from(decimals).map_or(f64::INFINITY, |decimals| 10f64.powi(decimals));
    let scaled = value * factor;
    // From 2^53 on every f64 is integral, so there is nothing left to round
    if scaled.is_nan() || scaled.abs() >= EXACT_INTEGER_LIMIT {
        return value;
    }
    scaled.round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(0, "0 B")]
    #[case(1, "1 B")]
    #[case(1023, "1023 B")]
    #[case(1024, "1.00 KB")]
    #[case(1536, "1.50 KB")]
    #[case(1_048_576, "1.00 MB")]
    #[case(5_368_709_120, "5.00 GB")]
    #[case(u64::MAX, "16.00 EB")]
    fn formats_with_default_decimals(#[case] bytes: u64, #[case] expected: &str) {
        assert_eq!(format(bytes), expected);
    }

    #[rstest]
    #[case(1536, 1, "1.5 KB")]
    #[case(1536, 0, "2 KB")]
    #[case(1152, 2, "1.13 KB")]
    #[case(500, 3, "500 B")]
    #[case(1_572_864, 4, "1.5000 MB")]
    fn formats_with_requested_decimals(
        #[case] bytes: u64,
        #[case] decimals: usize,
        #[case] expected: &str,
    ) {
        assert_eq!(format_with(bytes, decimals), expected);
    }

    #[rstest]
    #[case(20)]
    #[case(330)]
    #[case(400)]
    #[case(70_000)]
    fn huge_decimal_counts_keep_the_value(#[case] decimals: usize) {
        let formatted = format_with(1536, decimals);

        assert!(formatted.starts_with("1.5000"));
        assert!(formatted.ends_with(" KB"));
        assert_eq!(formatted.len(), "1.".len() + decimals + " KB".len());
    }
}
