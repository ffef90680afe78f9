use super::{Section, SectionContent, SectionProps};
use crate::api::fold::{self, Record};
use crate::api::DataNeed;
use crate::error::Result;
use crate::format::TickFormat;
use crate::profile::chart::{AxisConfig, ChartConfig, ChartPoint, Discrete};
use crate::profile::colors;
use crate::profile::page::{DataContext, ProfileContext};

const MEASURE: &str = "rainfall_awa_mm";

const RAINFALL_NEED: DataNeed = DataNeed {
    key: "rainfall",
    show: &["year"],
    required: &[MEASURE],
    sumlevel: &["all"],
};

/// Annual rainfall, one bar per year
pub struct RainfallBars;

fn yearly(rows: &[Record]) -> Vec<(i64, f64)> {
    let mut yearly: Vec<(i64, f64)> = rows
        .iter()
        .filter_map(|r| Some((fold::year(r)?, fold::number(r, MEASURE)?)))
        .collect();
    yearly.sort_by_key(|(year, _)| *year);
    yearly
}

fn narrative(profile: &ProfileContext, yearly: &[(i64, f64)]) -> String {
    let Some((year, latest)) = yearly.last() else {
        return format!("No rainfall data is available for {}.", profile.name());
    };
    if yearly.len() == 1 {
        return format!(
            "{} received {} of rainfall in {}.",
            profile.name(),
            TickFormat::Millimeters.apply(*latest),
            year
        );
    }

    let average = yearly.iter().map(|(_, v)| v).sum::<f64>() / yearly.len() as f64;
    let direction = if *latest >= average { "above" } else { "below" };
    format!(
        "{} received {} of rainfall in {}, {} its {}-year average of {}.",
        profile.name(),
        TickFormat::Millimeters.apply(*latest),
        year,
        direction,
        yearly.len(),
        TickFormat::Millimeters.apply(average)
    )
}

impl Section for RainfallBars {
    fn id(&self) -> &'static str {
        "rainfall-bars"
    }

    fn title(&self, _props: &SectionProps) -> String {
        "Rainfall".to_string()
    }

    fn needs(&self) -> &'static [DataNeed] {
        &[RAINFALL_NEED]
    }

    fn render(
        &self,
        data: &DataContext,
        profile: &ProfileContext,
        _props: &SectionProps,
    ) -> Result<SectionContent> {
        let yearly = yearly(data.rows(RAINFALL_NEED.key)?);

        let mut chart = ChartConfig::bar(
            "year",
            MEASURE,
            Discrete::X,
            AxisConfig::new("Year", TickFormat::Text),
            AxisConfig::new("Rainfall", TickFormat::Millimeters),
        );
        chart.data = yearly
            .iter()
            .map(|(year, mm)| ChartPoint {
                group: "rainfall".to_string(),
                category: year.to_string(),
                label: year.to_string(),
                value: *mm,
                year: Some(*year),
                fill: colors::RAINFALL,
                opacity: 1.0,
                position: None,
                tooltip: format!("Year: {}\nRainfall: {}", year, TickFormat::Millimeters.apply(*mm)),
            })
            .collect();

        Ok(SectionContent {
            narrative: narrative(profile, &yearly),
            chart,
        })
    }
}
