//! Declarative chart configuration produced by sections.
//!
//! A [`ChartConfig`] says which fields bind to which axis and carries the
//! already-computed points (label, fill, opacity, tooltip). Drawing it is the
//! caller's business: the TUI turns it into bar groups, the CLI dumps it.

use crate::format::TickFormat;
use crate::profile::colors::Rgb;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Scatter,
}

/// Which axis carries the category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Discrete {
    X,
    Y,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisConfig {
    pub title: String,
    pub domain: Option<(f64, f64)>,
    pub tick_format: TickFormat,
}

impl AxisConfig {
    pub fn new(title: impl Into<String>, tick_format: TickFormat) -> Self {
        Self {
            title: title.into(),
            domain: None,
            tick_format,
        }
    }

    pub fn with_domain(mut self, min: f64, max: f64) -> Self {
        self.domain = Some((min, max));
        self
    }
}

/// One drawn mark
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Group key, e.g. `male_severe`; matched against the stack order
    pub group: String,
    /// Category on the discrete axis
    pub category: String,
    pub label: String,
    pub value: f64,
    pub year: Option<i64>,
    pub fill: Rgb,
    pub opacity: f32,
    /// Numeric position on the discrete axis, for scatter charts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<f64>,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub x: String,
    pub y: String,
    pub discrete: Discrete,
    pub group_by: Vec<String>,
    pub stacked: bool,
    pub stack_order: Vec<String>,
    /// Field that drives the year control, if any
    pub time: Option<String>,
    pub x_config: AxisConfig,
    pub y_config: AxisConfig,
    pub data: Vec<ChartPoint>,
}

impl ChartConfig {
    pub fn bar(x: &str, y: &str, discrete: Discrete, x_config: AxisConfig, y_config: AxisConfig) -> Self {
        Self {
            kind: ChartKind::Bar,
            x: x.to_string(),
            y: y.to_string(),
            discrete,
            group_by: Vec::new(),
            stacked: false,
            stack_order: Vec::new(),
            time: None,
            x_config,
            y_config,
            data: Vec::new(),
        }
    }

    /// Distinct years present, ascending
    pub fn years(&self) -> Vec<i64> {
        let mut years: Vec<i64> = self.data.iter().filter_map(|p| p.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    pub fn latest_year(&self) -> Option<i64> {
        self.years().last().copied()
    }

    /// Points shown for `year`, in stack order.
    ///
    /// Charts without a time field ignore `year`. Points whose group is not
    /// in the stack order keep their relative order after the listed ones.
    pub fn points_for(&self, year: Option<i64>) -> Vec<&ChartPoint> {
        let mut points: Vec<&ChartPoint> = self
            .data
            .iter()
            .filter(|p| self.time.is_none() || year.is_none() || p.year == year)
            .collect();

        if !self.stack_order.is_empty() {
            let rank = |p: &ChartPoint| {
                self.stack_order
                    .iter()
                    .position(|g| *g == p.group)
                    .unwrap_or(self.stack_order.len())
            };
            points.sort_by_key(|p| rank(*p));
        }
        points
    }

    /// Largest value on the measure axis, or the domain max when fixed
    pub fn max_value(&self) -> f64 {
        let axis = match self.discrete {
            Discrete::Y => &self.x_config,
            Discrete::X => &self.y_config,
        };
        if let Some((_, max)) = axis.domain {
            return max;
        }
        self.data.iter().map(|p| p.value).fold(0.0, f64::max)
    }

    /// Formatter for the measure axis
    pub fn value_format(&self) -> TickFormat {
        match self.discrete {
            Discrete::Y => self.x_config.tick_format,
            Discrete::X => self.y_config.tick_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(group: &str, year: i64, value: f64) -> ChartPoint {
        ChartPoint {
            group: group.to_string(),
            category: "stunted".to_string(),
            label: group.to_string(),
            value,
            year: Some(year),
            fill: Rgb::WHITE,
            opacity: 1.0,
            position: None,
            tooltip: String::new(),
        }
    }

    fn chart() -> ChartConfig {
        let mut chart = ChartConfig::bar(
            "proportion_of_children",
            "condition",
            Discrete::Y,
            AxisConfig::new("Proportion of Children", TickFormat::ShareWhole).with_domain(0.0, 1.0),
            AxisConfig::new("Condition", TickFormat::Text),
        );
        chart.time = Some("year".to_string());
        chart.stack_order = vec!["male_severe".to_string(), "female_severe".to_string()];
        chart.data = vec![
            point("female_severe", 2014, 0.2),
            point("male_severe", 2014, 0.3),
            point("male_severe", 2008, 0.4),
        ];
        chart
    }

    #[test]
    fn years_are_sorted_and_unique() {
        let chart = chart();
        assert_eq!(chart.years(), vec![2008, 2014]);
        assert_eq!(chart.latest_year(), Some(2014));
    }

    #[test]
    fn points_follow_stack_order() {
        let chart = chart();
        let groups: Vec<&str> = chart
            .points_for(Some(2014))
            .iter()
            .map(|p| p.group.as_str())
            .collect();
        assert_eq!(groups, vec!["male_severe", "female_severe"]);
    }

    #[test]
    fn fixed_domain_wins_over_data() {
        assert_eq!(chart().max_value(), 1.0);
        assert_eq!(chart().value_format(), TickFormat::ShareWhole);
    }
}
