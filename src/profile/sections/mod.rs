//! Chart sections.
//!
//! Every section is a unit value implementing [`Section`]: it declares the
//! join data it needs up front and turns the resolved rows into a narrative
//! plus a [`ChartConfig`]. Sections never see each other's data.

pub mod agriculture;
pub mod climate;
pub mod health;
pub mod poverty;

pub use agriculture::{CropsAreaVsValue, CropsByHarvest, CropsByProduction};
pub use climate::RainfallBars;
pub use health::{Conditions, ConditionsByGender, ConditionsByResidence};
pub use poverty::{Poverty, PovertyByGender};

use crate::api::fold::{self, Record};
use crate::api::DataNeed;
use crate::error::Result;
use crate::format::{format_place_name, TickFormat};
use crate::profile::chart::ChartConfig;
use crate::profile::page::{DataContext, ProfileContext};
use crate::text::title_case;
use serde::Serialize;

/// Poverty line a poverty section is drawn for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PovertyLevel {
    Ppp1,
    Ppp2,
}

impl PovertyLevel {
    pub const ALL: [PovertyLevel; 2] = [PovertyLevel::Ppp1, PovertyLevel::Ppp2];

    /// Value of the `poverty_level` column
    pub fn key(&self) -> &'static str {
        match self {
            PovertyLevel::Ppp1 => "ppp1",
            PovertyLevel::Ppp2 => "ppp2",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PovertyLevel::Ppp1 => "$1.90/day",
            PovertyLevel::Ppp2 => "$3.10/day",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.key() == key)
    }
}

/// Extra props a registry entry passes to its section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SectionProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poverty_level: Option<PovertyLevel>,
}

impl SectionProps {
    pub fn poverty(level: PovertyLevel) -> Self {
        Self {
            poverty_level: Some(level),
        }
    }
}

/// What a section renders to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionContent {
    pub narrative: String,
    pub chart: ChartConfig,
}

pub trait Section: Send + Sync {
    /// Stable identifier, also used as the anchor inside a topic
    fn id(&self) -> &'static str;

    fn title(&self, props: &SectionProps) -> String;

    /// Join data this section reads from the [`DataContext`]
    fn needs(&self) -> &'static [DataNeed];

    fn render(
        &self,
        data: &DataContext,
        profile: &ProfileContext,
        props: &SectionProps,
    ) -> Result<SectionContent>;
}

/// Latest year present in a dataset
pub(crate) fn latest_year(rows: &[Record]) -> Option<i64> {
    rows.iter().filter_map(fold::year).max()
}

/// Tooltip lines for the given fields, `Title: value` each
pub(crate) fn tooltip_body(record: &Record, fields: &[(&str, TickFormat)]) -> String {
    fields
        .iter()
        .filter_map(|(field, format)| {
            let value = match fold::number(record, field) {
                Some(n) => format.apply(n),
                None => fold::text(record, field)?,
            };
            Some(format!("{}: {}", title_case(field), value))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Where a survey row was measured, when that is not the profile itself
pub(crate) fn data_source_note(
    record: &Record,
    dataset: &str,
    profile: &ProfileContext,
) -> Option<String> {
    let geo_name = fold::text(record, &format!("{}_geo_name", dataset))?;
    (geo_name != profile.name()).then(|| {
        format!(
            "Based on data from {}",
            format_place_name(record, dataset, profile.level())
        )
    })
}

/// Note line (if any) followed by the body
pub(crate) fn with_note(note: Option<String>, body: String) -> String {
    match note {
        Some(note) => format!("{}\n{}", note, body),
        None => body,
    }
}

/// Place name a narrative should mention for survey rows
pub(crate) fn place_of(record: Option<&Record>, dataset: &str, profile: &ProfileContext) -> String {
    match record {
        Some(r) if data_source_note(r, dataset, profile).is_some() => {
            format_place_name(r, dataset, profile.level())
        }
        _ => profile.name().to_string(),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{profile, records};
    use super::*;
    use serde_json::json;

    #[test]
    fn poverty_levels_round_trip_keys() {
        assert_eq!(PovertyLevel::from_key("ppp2"), Some(PovertyLevel::Ppp2));
        assert_eq!(PovertyLevel::from_key("ppp9"), None);
        assert_eq!(PovertyLevel::Ppp1.label(), "$1.90/day");
    }

    #[test]
    fn tooltip_lists_fields_in_order() {
        let rows = records(json!([{"year": 2014, "proportion_of_children": 0.25}]));
        let body = tooltip_body(
            &rows[0],
            &[
                ("year", TickFormat::Text),
                ("proportion_of_children", TickFormat::ShareWhole),
            ],
        );
        assert_eq!(body, "Year: 2014\nProportion of Children: 25%");
    }

    #[test]
    fn note_only_when_geography_differs() {
        let profile = profile("040AF00079", "Keta", "adm2");
        let rows = records(json!([
            {"dhs_geo_name": "Keta"},
            {"dhs_geo_name": "Volta", "dhs_geo_parent_name": "Ghana"}
        ]));
        assert_eq!(data_source_note(&rows[0], "dhs", &profile), None);
        assert_eq!(
            data_source_note(&rows[1], "dhs", &profile).as_deref(),
            Some("Based on data from Volta, Ghana")
        );
        assert_eq!(place_of(rows.get(1), "dhs", &profile), "Volta, Ghana");
    }
}
