// Small numeric and formatting helpers shared by the engine and the
// export layer.
use num_format::{Locale, ToFormattedString};

/// Completed over total as a fraction in `0.0..=1.0`.
///
/// A zero total yields `0.0` instead of `NaN`.
pub fn completion_rate(completed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    completed as f64 / total as f64
}

/// Scale a 0..=1 fraction to a percentage rounded to two decimals.
///
/// Non-finite input is treated as zero.
pub fn to_percent(fraction: f64) -> f64 {
    if !fraction.is_finite() {
        return 0.0;
    }
    round_to(fraction * 100.0, 2)
}

pub fn round_to(n: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (n * factor).round() / factor
}

/// Render a float without a trailing `.0` when it holds an integer value.
pub fn format_plain(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus locale-aware thousands separators (`1,234.50`).
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Used for counts in console messages (e.g., `9,855 rows loaded`).
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_rate_handles_zero_total() {
        assert_eq!(completion_rate(0, 0), 0.0);
        assert_eq!(completion_rate(1, 4), 0.25);
    }

    #[test]
    fn to_percent_rounds_to_two_decimals() {
        assert_eq!(to_percent(0.4567), 45.67);
        assert_eq!(to_percent(1.0 / 3.0), 33.33);
        assert_eq!(to_percent(1.0), 100.0);
        assert_eq!(to_percent(f64::NAN), 0.0);
    }

    #[test]
    fn format_plain_drops_integral_fraction() {
        assert_eq!(format_plain(3.0), "3");
        assert_eq!(format_plain(-7.0), "-7");
        assert_eq!(format_plain(0.25), "0.25");
    }

    #[test]
    fn format_number_groups_thousands() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-1500.0, 0), "-1,500");
        assert_eq!(format_int(9855_u64), "9,855");
    }
}
