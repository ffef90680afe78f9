//! Crop production sections.

use super::{Section, SectionContent, SectionProps};
use crate::api::fold::{self, Record};
use crate::api::DataNeed;
use crate::error::Result;
use crate::format::TickFormat;
use crate::profile::chart::{AxisConfig, ChartConfig, ChartKind, ChartPoint, Discrete};
use crate::profile::colors;
use crate::profile::page::{DataContext, ProfileContext};
use std::collections::HashMap;

/// Bars drawn per crop chart
const TOP_CROPS: usize = 10;

const HARVEST_NEED: DataNeed = DataNeed {
    key: "harvestedArea",
    show: &["crop"],
    required: &["harvested_area"],
    sumlevel: &["lowest"],
};

const PRODUCTION_NEED: DataNeed = DataNeed {
    key: "valueOfProduction",
    show: &["crop"],
    required: &["value_of_production"],
    sumlevel: &["lowest"],
};

/// `(crop id, value)` sorted by value, largest first
fn ranked(rows: &[Record], field: &str) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = rows
        .iter()
        .filter_map(|r| Some((fold::text(r, "crop")?, fold::number(r, field)?)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

fn crop_bars(
    profile: &ProfileContext,
    ranked: &[(String, f64)],
    field: &str,
    title: &str,
    format: TickFormat,
) -> ChartConfig {
    let mut chart = ChartConfig::bar(
        field,
        "crop",
        Discrete::Y,
        AxisConfig::new(title, format),
        AxisConfig::new("Crop", TickFormat::Text),
    );
    chart.data = ranked
        .iter()
        .take(TOP_CROPS)
        .map(|(crop, value)| {
            let name = profile.attrs.name_of("crop", crop);
            ChartPoint {
                group: crop.clone(),
                category: name.clone(),
                label: name.clone(),
                value: *value,
                year: None,
                fill: colors::categorical(crop),
                opacity: 1.0,
                position: None,
                tooltip: format!("{}\n{}: {}", name, title, format.apply(*value)),
            }
        })
        .collect();
    chart
}

fn leading_crop_sentence(
    profile: &ProfileContext,
    ranked: &[(String, f64)],
    measure: &str,
    format: TickFormat,
) -> String {
    let Some((crop, value)) = ranked.first() else {
        return format!("No crop data is available for {}.", profile.name());
    };
    let total: f64 = ranked.iter().map(|(_, v)| v).sum();
    let share = if total > 0.0 { value / total } else { 0.0 };
    format!(
        "{} is the leading crop in {} by {}, at {} or {} of the total.",
        profile.attrs.name_of("crop", crop),
        profile.name(),
        measure,
        format.apply(*value),
        TickFormat::ShareWhole.apply(share)
    )
}

pub struct CropsByHarvest;

impl Section for CropsByHarvest {
    fn id(&self) -> &'static str {
        "crops-by-harvest"
    }

    fn title(&self, _props: &SectionProps) -> String {
        "Crops by Harvested Area".to_string()
    }

    fn needs(&self) -> &'static [DataNeed] {
        &[HARVEST_NEED]
    }

    fn render(
        &self,
        data: &DataContext,
        profile: &ProfileContext,
        _props: &SectionProps,
    ) -> Result<SectionContent> {
        let ranked = ranked(data.rows(HARVEST_NEED.key)?, "harvested_area");
        Ok(SectionContent {
            narrative: leading_crop_sentence(profile, &ranked, "harvested area", TickFormat::Hectares),
            chart: crop_bars(profile, &ranked, "harvested_area", "Harvested Area", TickFormat::Hectares),
        })
    }
}

pub struct CropsByProduction;

impl Section for CropsByProduction {
    fn id(&self) -> &'static str {
        "crops-by-production"
    }

    fn title(&self, _props: &SectionProps) -> String {
        "Crops by Value of Production".to_string()
    }

    fn needs(&self) -> &'static [DataNeed] {
        &[PRODUCTION_NEED]
    }

    fn render(
        &self,
        data: &DataContext,
        profile: &ProfileContext,
        _props: &SectionProps,
    ) -> Result<SectionContent> {
        let ranked = ranked(data.rows(PRODUCTION_NEED.key)?, "value_of_production");
        Ok(SectionContent {
            narrative: leading_crop_sentence(
                profile,
                &ranked,
                "value of production",
                TickFormat::Dollars,
            ),
            chart: crop_bars(
                profile,
                &ranked,
                "value_of_production",
                "Value of Production",
                TickFormat::Dollars,
            ),
        })
    }
}

/// Harvested area against production value, one point per crop.
///
/// Shares both datasets with the two bar sections above.
pub struct CropsAreaVsValue;

impl Section for CropsAreaVsValue {
    fn id(&self) -> &'static str {
        "crops-area-vs-value"
    }

    fn title(&self, _props: &SectionProps) -> String {
        "Harvested Area vs. Value of Production".to_string()
    }

    fn needs(&self) -> &'static [DataNeed] {
        &[HARVEST_NEED, PRODUCTION_NEED]
    }

    fn render(
        &self,
        data: &DataContext,
        profile: &ProfileContext,
        _props: &SectionProps,
    ) -> Result<SectionContent> {
        let area: HashMap<String, f64> =
            ranked(data.rows(HARVEST_NEED.key)?, "harvested_area").into_iter().collect();
        let value = ranked(data.rows(PRODUCTION_NEED.key)?, "value_of_production");

        let mut chart = ChartConfig::bar(
            "harvested_area",
            "value_of_production",
            Discrete::X,
            AxisConfig::new("Harvested Area", TickFormat::Hectares),
            AxisConfig::new("Value of Production", TickFormat::Dollars),
        );
        chart.kind = ChartKind::Scatter;

        let mut best: Option<(String, f64)> = None;
        for (crop, dollars) in &value {
            let Some(&hectares) = area.get(crop).filter(|h| **h > 0.0) else {
                continue;
            };
            let name = profile.attrs.name_of("crop", crop);
            let per_hectare = dollars / hectares;
            if best.as_ref().map_or(true, |(_, b)| per_hectare > *b) {
                best = Some((name.clone(), per_hectare));
            }
            chart.data.push(ChartPoint {
                group: crop.clone(),
                category: TickFormat::Hectares.apply(hectares),
                label: name.clone(),
                value: *dollars,
                year: None,
                fill: colors::categorical(crop),
                opacity: 1.0,
                position: Some(hectares),
                tooltip: format!(
                    "{}\nHarvested Area: {}\nValue of Production: {}",
                    name,
                    TickFormat::Hectares.apply(hectares),
                    TickFormat::Dollars.apply(*dollars)
                ),
            });
        }

        let narrative = match best {
            Some((name, per_hectare)) => format!(
                "{} yields the most value per hectare in {}, at {} per hectare.",
                name,
                profile.name(),
                TickFormat::Dollars.apply(per_hectare)
            ),
            None => format!("No crop data is available for {}.", profile.name()),
        };

        Ok(SectionContent { narrative, chart })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::sections::fixtures::{profile, records};
    use serde_json::json;

    fn data() -> DataContext {
        let mut data = DataContext::default();
        data.insert(
            "harvestedArea",
            Ok(records(json!([
                {"crop": "maiz", "harvested_area": 1000},
                {"crop": "cass", "harvested_area": 3000},
                {"crop": "yams", "harvested_area": 0}
            ]))),
        );
        data.insert(
            "valueOfProduction",
            Ok(records(json!([
                {"crop": "maiz", "value_of_production": 500000},
                {"crop": "cass", "value_of_production": 600000},
                {"crop": "yams", "value_of_production": 10}
            ]))),
        );
        data
    }

    #[test]
    fn harvest_bars_are_ranked() {
        let profile = profile("GHA", "Ghana", "adm0");
        let content = CropsByHarvest
            .render(&data(), &profile, &SectionProps::default())
            .unwrap();
        let groups: Vec<&str> = content.chart.data.iter().map(|p| p.group.as_str()).collect();
        assert_eq!(groups, vec!["cass", "maiz", "yams"]);
        assert_eq!(
            content.narrative,
            "cass is the leading crop in Ghana by harvested area, at 3K ha or 75% of the total."
        );
    }

    #[test]
    fn scatter_skips_crops_without_area() {
        let profile = profile("GHA", "Ghana", "adm0");
        let content = CropsAreaVsValue
            .render(&data(), &profile, &SectionProps::default())
            .unwrap();
        assert_eq!(content.chart.kind, ChartKind::Scatter);
        assert_eq!(content.chart.data.len(), 2);
        assert_eq!(
            content.narrative,
            "maiz yields the most value per hectare in Ghana, at $500 per hectare."
        );
    }

    #[test]
    fn scatter_needs_both_datasets() {
        let profile = profile("GHA", "Ghana", "adm0");
        let mut partial = DataContext::default();
        partial.insert("harvestedArea", Ok(Vec::new()));
        partial.insert("valueOfProduction", Err("Request timed out".to_string()));
        assert!(CropsAreaVsValue
            .render(&partial, &profile, &SectionProps::default())
            .is_err());
    }
}
