//! Display formatters shared by the CLI, the chart sections and the TUI.

use serde::Serialize;

/// How an axis or tooltip value is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TickFormat {
    /// Fraction of one shown as a percentage (`0.25` -> `25%`)
    ShareWhole,
    /// Already a percentage value (`25.0` -> `25%`)
    Share,
    /// Large counts abbreviated (`1_250_000` -> `1.25M`)
    Abbreviate,
    /// US dollars, abbreviated
    Dollars,
    /// Hectares, abbreviated
    Hectares,
    /// Millimetres of rainfall
    Millimeters,
    /// Plain label, no numeric formatting
    Text,
}

impl TickFormat {
    pub fn apply(&self, value: f64) -> String {
        match self {
            TickFormat::ShareWhole => share(value * 100.0),
            TickFormat::Share => share(value),
            TickFormat::Abbreviate => abbreviate(value),
            TickFormat::Dollars => format!("${}", abbreviate(value)),
            TickFormat::Hectares => format!("{} ha", abbreviate(value)),
            TickFormat::Millimeters => format!("{} mm", trim_decimals(value, 1)),
            TickFormat::Text => trim_decimals(value, 2),
        }
    }
}

fn share(percent: f64) -> String {
    format!("{}%", trim_decimals(percent, 1))
}

/// Format with at most `places` decimals, dropping trailing zeros
pub fn trim_decimals(value: f64, places: usize) -> String {
    let text = format!("{:.*}", places, value);
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// Abbreviate large numbers with K/M/B suffixes
pub fn abbreviate(value: f64) -> String {
    const UNITS: &[(f64, &str)] = &[(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

    let magnitude = value.abs();
    for &(scale, suffix) in UNITS {
        if magnitude >= scale {
            let scaled = value / scale;
            let places = if scaled.abs() >= 100.0 { 0 } else { 2 };
            return format!("{}{}", trim_decimals(scaled, places), suffix);
        }
    }

    if magnitude >= 100.0 || value.fract() == 0.0 {
        format!("{}", value.round())
    } else {
        trim_decimals(value, 2)
    }
}

/// Group thousands with commas (`1234567` -> `1,234,567`)
pub fn commas(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    if rounded < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

/// Human label for an administrative level code
pub fn level_label(level: &str) -> &'static str {
    match level {
        "adm0" => "Country",
        "adm1" => "Province",
        "adm2" => "District",
        _ => "Region",
    }
}

/// Name the geography a data row was measured at.
///
/// Survey datasets are sometimes only available for a coarser area than the
/// profile being viewed. Rows carry `<dataset>_geo_name` and
/// `<dataset>_geo_parent_name`; the parent is appended for sub-national rows.
pub fn format_place_name(
    row: &serde_json::Map<String, serde_json::Value>,
    dataset: &str,
    profile_level: &str,
) -> String {
    let field = |suffix: &str| {
        row.get(&format!("{}_geo_{}", dataset, suffix))
            .and_then(|v| v.as_str())
            .map(str::to_string)
    };

    let name = field("name").unwrap_or_default();
    match (profile_level, field("parent_name")) {
        ("adm0", _) | (_, None) => name,
        (_, Some(parent)) if parent.is_empty() || parent == name => name,
        (_, Some(parent)) => format!("{}, {}", name, parent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn share_formats() {
        assert_eq!(TickFormat::ShareWhole.apply(0.123), "12.3%");
        assert_eq!(TickFormat::ShareWhole.apply(1.0), "100%");
        assert_eq!(TickFormat::Share.apply(42.0), "42%");
    }

    #[test]
    fn abbreviations() {
        assert_eq!(abbreviate(1_250_000.0), "1.25M");
        assert_eq!(abbreviate(950.0), "950");
        assert_eq!(abbreviate(12_000.0), "12K");
        assert_eq!(abbreviate(0.5), "0.5");
        assert_eq!(TickFormat::Dollars.apply(3_400_000_000.0), "$3.4B");
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(commas(1_234_567.0), "1,234,567");
        assert_eq!(commas(999.0), "999");
        assert_eq!(commas(-12_000.0), "-12,000");
    }

    #[test]
    fn place_names_include_parent_below_country_level() {
        let row = json!({
            "dhs_geo_name": "Volta",
            "dhs_geo_parent_name": "Ghana",
        });
        let row = row.as_object().unwrap();
        assert_eq!(format_place_name(row, "dhs", "adm1"), "Volta, Ghana");
        assert_eq!(format_place_name(row, "dhs", "adm0"), "Volta");
    }
}
