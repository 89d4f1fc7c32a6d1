//! Number formatting for quantified prose. Citation values and narrative text
//! both come from these functions, so the same figure always renders the same.

const NOT_AVAILABLE: &str = "n/a";

/// Currency units as (scale, suffix, decimals), smallest first.
const CURRENCY_UNITS: [(f64, &str, usize); 4] = [
    (1.0, "", 0),
    (1_000.0, "K", 0),
    (1_000_000.0, "M", 1),
    (1_000_000_000.0, "B", 1),
];

/// Abbreviated dollar amount: `$1.2B`, `$3.4M`, `$850K`, `$512`.
///
/// The unit is chosen after rounding, so `999_950` reads `$1.0M`, not `$1000K`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let v = value.abs();

    let mut unit = CURRENCY_UNITS
        .iter()
        .rposition(|(scale, _, _)| v >= *scale)
        .unwrap_or(0);
    let mut digits = scaled(v, unit);
    while unit + 1 < CURRENCY_UNITS.len() && digits.parse::<f64>().map_or(false, |d| d >= 1_000.0) {
        unit += 1;
        digits = scaled(v, unit);
    }
    format!("{sign}${digits}{}", CURRENCY_UNITS[unit].1)
}

fn scaled(v: f64, unit: usize) -> String {
    let (scale, _, decimals) = CURRENCY_UNITS[unit];
    format!("{:.*}", decimals, v / scale)
}

/// Fraction as a percentage: `0.82` becomes `82.0%`.
pub fn format_percent(ratio: f64) -> String {
    format_points(ratio * 100.0)
}

/// Value already in percent units: `12.5` becomes `12.5%`.
pub fn format_points(pct: f64) -> String {
    if !pct.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{:.1}%", pct)
}

pub fn format_signed_percent(ratio: f64) -> String {
    if !ratio.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let pct = ratio * 100.0;
    if pct < 0.0 {
        format!("-{:.1}%", pct.abs())
    } else {
        format!("+{:.1}%", pct.abs())
    }
}

/// Whole months with a unit suffix.
pub fn format_months(months: f64) -> String {
    if !months.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let rounded = months.round();
    if rounded == 1.0 {
        "1 month".to_string()
    } else {
        format!("{:.0} months", rounded)
    }
}

pub fn format_score(score: f64) -> String {
    if !score.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{:.0}/100", score.round())
}

pub fn format_count(count: u32) -> String {
    count.to_string()
}

pub fn format_elasticity(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1_240_000_000.0), "$1.2B");
        assert_eq!(format_currency(3_420_000.0), "$3.4M");
        assert_eq!(format_currency(850_400.0), "$850K");
        assert_eq!(format_currency(512.0), "$512");
        assert_eq!(format_currency(-2_500_000.0), "-$2.5M");
        assert_eq!(format_currency(f64::NAN), "n/a");
    }

    #[test]
    fn test_format_currency_rounds_before_picking_unit() {
        assert_eq!(format_currency(999.6), "$1K");
        assert_eq!(format_currency(999_499.0), "$999K");
        assert_eq!(format_currency(999_950.0), "$1.0M");
        assert_eq!(format_currency(999_940_000.0), "$999.9M");
        assert_eq!(format_currency(999_960_000.0), "$1.0B");
        assert_eq!(format_currency(-999_950.0), "-$1.0M");
        assert_eq!(format_currency(2_400_000_000_000.0), "$2400.0B");
    }

    #[test]
    fn test_format_percentages() {
        assert_eq!(format_percent(0.82), "82.0%");
        assert_eq!(format_points(12.5), "12.5%");
        assert_eq!(format_signed_percent(0.04), "+4.0%");
        assert_eq!(format_signed_percent(-0.04), "-4.0%");
        assert_eq!(format_signed_percent(0.0), "+0.0%");
    }

    #[test]
    fn test_format_months_and_scores() {
        assert_eq!(format_months(14.2), "14 months");
        assert_eq!(format_months(0.9), "1 month");
        assert_eq!(format_months(0.2), "0 months");
        assert_eq!(format_score(71.6), "72/100");
        assert_eq!(format_elasticity(1.349), "1.35");
        assert_eq!(format_count(10_000), "10000");
    }
}
