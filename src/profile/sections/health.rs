//! Child health conditions from household surveys (DHS).

use super::{
    data_source_note, latest_year, place_of, tooltip_body, with_note, Section, SectionContent,
    SectionProps,
};
use crate::api::fold::{self, Record};
use crate::api::DataNeed;
use crate::error::Result;
use crate::format::TickFormat;
use crate::profile::chart::{AxisConfig, ChartConfig, ChartPoint, Discrete};
use crate::profile::colors;
use crate::profile::page::{DataContext, ProfileContext};
use crate::text::title_case;
use std::collections::BTreeMap;

const DATASET: &str = "dhs";
const MEASURE: &str = "proportion_of_children";

const CONDITION_NEED: DataNeed = DataNeed {
    key: "condition",
    show: &["year", "condition"],
    required: &["dhs_geo_name", "dhs_geo_parent_name", MEASURE],
    sumlevel: &["all", "all"],
};

const GENDER_NEED: DataNeed = DataNeed {
    key: "healthByGender",
    show: &["year", "condition", "gender"],
    required: &["dhs_geo_name", "dhs_geo_parent_name", MEASURE],
    sumlevel: &["all", "all", "all"],
};

const RESIDENCE_NEED: DataNeed = DataNeed {
    key: "healthByResidence",
    show: &["year", "condition", "residence"],
    required: &["dhs_geo_name", "dhs_geo_parent_name", MEASURE],
    sumlevel: &["all", "all", "all"],
};

/// Breakdown dimension of a health chart
#[derive(Clone, Copy)]
enum Mode {
    Gender,
    Residence,
}

impl Mode {
    fn field(&self) -> &'static str {
        match self {
            Mode::Gender => "gender",
            Mode::Residence => "residence",
        }
    }

    fn stack_order(&self) -> Vec<String> {
        let groups: &[&str] = match self {
            Mode::Gender => &["male_severe", "male_moderate", "female_severe", "female_moderate"],
            Mode::Residence => &["urban_severe", "urban_moderate", "rural_severe", "rural_moderate"],
        };
        groups.iter().map(|g| g.to_string()).collect()
    }

    fn fill(&self, value: &str) -> colors::Rgb {
        match self {
            Mode::Gender => colors::gender(value),
            Mode::Residence => colors::residence(value),
        }
    }

    /// `Severely Stunted Males`, `Moderately Wasted Children in Urban Areas`
    fn label(&self, severity: &str, condition: &str, value: &str) -> String {
        let lead = format!("{}ly {}", title_case(severity), title_case(condition));
        match self {
            Mode::Gender => format!("{} {}s", lead, title_case(value)),
            Mode::Residence => format!("{} Children in {} Areas", lead, title_case(value)),
        }
    }
}

fn opacity(severity: &str) -> f32 {
    if severity == "severe" {
        1.0
    } else {
        0.5
    }
}

fn base_chart() -> ChartConfig {
    let mut chart = ChartConfig::bar(
        MEASURE,
        "condition",
        Discrete::Y,
        AxisConfig::new("Proportion of Children", TickFormat::ShareWhole).with_domain(0.0, 1.0),
        AxisConfig::new("Condition", TickFormat::Text),
    );
    chart.stacked = true;
    chart.time = Some("year".to_string());
    chart
}

fn point(row: &Record, profile: &ProfileContext, mode: Option<Mode>) -> Option<ChartPoint> {
    let condition = fold::text(row, "condition")?;
    let severity = fold::text(row, "severity").unwrap_or_else(|| "severe".to_string());
    let value = fold::number(row, MEASURE)?;

    let (group, label, fill) = match mode {
        Some(mode) => {
            let key = fold::text(row, mode.field())?;
            (
                format!("{}_{}", key, severity),
                mode.label(&severity, &condition, &key),
                mode.fill(&key),
            )
        }
        None => (
            severity.clone(),
            format!("{}ly {}", title_case(&severity), title_case(&condition)),
            colors::condition(&condition),
        ),
    };

    let body = tooltip_body(row, &[("year", TickFormat::Text), (MEASURE, TickFormat::ShareWhole)]);
    Some(ChartPoint {
        group,
        category: title_case(&condition),
        label,
        value,
        year: fold::year(row),
        fill,
        opacity: opacity(&severity),
        position: None,
        tooltip: with_note(data_source_note(row, DATASET, profile), body),
    })
}

fn chart_for(rows: &[Record], profile: &ProfileContext, mode: Option<Mode>) -> ChartConfig {
    let mut chart = base_chart();
    match mode {
        Some(mode) => {
            chart.group_by = vec![mode.field().to_string(), "severity".to_string()];
            chart.stack_order = mode.stack_order();
        }
        None => {
            chart.group_by = vec!["severity".to_string()];
            chart.stack_order = vec!["severe".to_string(), "moderate".to_string()];
        }
    }
    chart.data = rows.iter().filter_map(|r| point(r, profile, mode)).collect();
    chart
}

/// One sentence on the most common condition in the latest survey year
fn narrative(rows: &[Record], profile: &ProfileContext, mode: Option<Mode>) -> String {
    let Some(year) = latest_year(rows) else {
        return format!("No child health survey data is available for {}.", profile.name());
    };
    let latest: Vec<&Record> = rows.iter().filter(|r| fold::year(r) == Some(year)).collect();
    let place = place_of(latest.first().copied(), DATASET, profile);

    let mut totals: BTreeMap<(String, String), f64> = BTreeMap::new();
    for row in &latest {
        let condition = fold::text(row, "condition").unwrap_or_default();
        let group = mode
            .and_then(|m| fold::text(row, m.field()))
            .unwrap_or_default();
        *totals.entry((condition, group)).or_default() += fold::number(row, MEASURE).unwrap_or(0.0);
    }

    let mut by_condition: BTreeMap<&str, f64> = BTreeMap::new();
    for ((condition, _), value) in &totals {
        *by_condition.entry(condition.as_str()).or_default() += value;
    }
    let Some((condition, total)) = by_condition
        .iter()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(c, v)| (c.to_string(), *v))
    else {
        return format!("No child health survey data is available for {}.", profile.name());
    };

    match mode {
        None => format!(
            "In {}, {} of children in {} were {}, the most common condition measured.",
            year,
            TickFormat::ShareWhole.apply(total),
            place,
            condition
        ),
        Some(_) => {
            let parts: Vec<String> = totals
                .iter()
                .filter(|((c, _), _)| *c == condition)
                .map(|((_, group), value)| {
                    format!("{} of {} children", TickFormat::ShareWhole.apply(*value), group)
                })
                .collect();
            format!("In {}, {} in {} were {}.", year, parts.join(" and "), place, condition)
        }
    }
}

fn render_mode(
    data: &DataContext,
    profile: &ProfileContext,
    need: &DataNeed,
    mode: Option<Mode>,
) -> Result<SectionContent> {
    let rows = data.rows(need.key)?;
    Ok(SectionContent {
        narrative: narrative(rows, profile, mode),
        chart: chart_for(rows, profile, mode),
    })
}

pub struct Conditions;

impl Section for Conditions {
    fn id(&self) -> &'static str {
        "conditions"
    }

    fn title(&self, _props: &SectionProps) -> String {
        "Health Conditions Among Children".to_string()
    }

    fn needs(&self) -> &'static [DataNeed] {
        &[CONDITION_NEED]
    }

    fn render(
        &self,
        data: &DataContext,
        profile: &ProfileContext,
        _props: &SectionProps,
    ) -> Result<SectionContent> {
        render_mode(data, profile, &CONDITION_NEED, None)
    }
}

pub struct ConditionsByGender;

impl Section for ConditionsByGender {
    fn id(&self) -> &'static str {
        "conditions-by-gender"
    }

    fn title(&self, _props: &SectionProps) -> String {
        "Health Conditions Among Children by Gender".to_string()
    }

    fn needs(&self) -> &'static [DataNeed] {
        &[GENDER_NEED]
    }

    fn render(
        &self,
        data: &DataContext,
        profile: &ProfileContext,
        _props: &SectionProps,
    ) -> Result<SectionContent> {
        render_mode(data, profile, &GENDER_NEED, Some(Mode::Gender))
    }
}

pub struct ConditionsByResidence;

impl Section for ConditionsByResidence {
    fn id(&self) -> &'static str {
        "conditions-by-residence"
    }

    fn title(&self, _props: &SectionProps) -> String {
        "Health Conditions Among Children by Residence".to_string()
    }

    fn needs(&self) -> &'static [DataNeed] {
        &[RESIDENCE_NEED]
    }

    fn render(
        &self,
        data: &DataContext,
        profile: &ProfileContext,
        _props: &SectionProps,
    ) -> Result<SectionContent> {
        render_mode(data, profile, &RESIDENCE_NEED, Some(Mode::Residence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProfileError;
    use crate::profile::sections::fixtures::{profile, records};
    use serde_json::json;

    fn gender_rows() -> Vec<Record> {
        records(json!([
            {"year": 2014, "condition": "stunted", "gender": "female", "severity": "moderate",
             "dhs_geo_name": "Volta", "dhs_geo_parent_name": "Ghana", "proportion_of_children": 0.12},
            {"year": 2014, "condition": "stunted", "gender": "male", "severity": "severe",
             "dhs_geo_name": "Volta", "dhs_geo_parent_name": "Ghana", "proportion_of_children": 0.08},
            {"year": 2014, "condition": "stunted", "gender": "male", "severity": "moderate",
             "dhs_geo_name": "Volta", "dhs_geo_parent_name": "Ghana", "proportion_of_children": 0.1},
            {"year": 2008, "condition": "wasted", "gender": "male", "severity": "severe",
             "dhs_geo_name": "Volta", "dhs_geo_parent_name": "Ghana", "proportion_of_children": 0.3}
        ]))
    }

    fn data_with(key: &'static str, rows: Vec<Record>) -> DataContext {
        let mut data = DataContext::default();
        data.insert(key, Ok(rows));
        data
    }

    #[test]
    fn gender_need_matches_join_declaration() {
        let query = ConditionsByGender.needs()[0].join_query("040AF00079");
        assert_eq!(query.show, vec!["year", "condition", "gender"]);
        assert_eq!(
            query.required,
            vec!["dhs_geo_name", "dhs_geo_parent_name", "proportion_of_children"]
        );
        assert_eq!(query.sumlevel, vec!["all", "all", "all"]);
    }

    #[test]
    fn gender_chart_groups_and_styles_points() {
        let profile = profile("040AF00079", "Keta", "adm2");
        let data = data_with("healthByGender", gender_rows());
        let content = ConditionsByGender
            .render(&data, &profile, &SectionProps::default())
            .unwrap();
        let chart = &content.chart;

        assert_eq!(chart.group_by, vec!["gender", "severity"]);
        assert_eq!(
            chart.stack_order,
            vec!["male_severe", "male_moderate", "female_severe", "female_moderate"]
        );
        assert_eq!(chart.x_config.domain, Some((0.0, 1.0)));
        assert_eq!(chart.x_config.tick_format, TickFormat::ShareWhole);

        let groups: Vec<&str> = chart
            .points_for(Some(2014))
            .iter()
            .map(|p| p.group.as_str())
            .collect();
        assert_eq!(groups, vec!["male_severe", "male_moderate", "female_moderate"]);

        let severe = &chart.data[1];
        assert_eq!(severe.label, "Severely Stunted Males");
        assert_eq!(severe.opacity, 1.0);
        assert_eq!(severe.fill, colors::MALE);
        assert_eq!(chart.data[0].opacity, 0.5);
        assert!(severe
            .tooltip
            .starts_with("Based on data from Volta, Ghana\nYear: 2014"));
    }

    #[test]
    fn gender_narrative_uses_latest_year() {
        let profile = profile("040AF00079", "Keta", "adm2");
        let text = narrative(&gender_rows(), &profile, Some(Mode::Gender));
        assert_eq!(
            text,
            "In 2014, 12% of female children and 18% of male children in Volta, Ghana were stunted."
        );
    }

    #[test]
    fn same_geography_has_no_note() {
        let profile = profile("040AF00079", "Volta", "adm1");
        let data = data_with("healthByGender", gender_rows());
        let content = ConditionsByGender
            .render(&data, &profile, &SectionProps::default())
            .unwrap();
        assert!(content.chart.data[0].tooltip.starts_with("Year: 2014"));
    }

    #[test]
    fn residence_labels() {
        let profile = profile("040AF00079", "Keta", "adm2");
        let rows = records(json!([
            {"year": 2014, "condition": "wasted", "residence": "urban", "severity": "moderate",
             "proportion_of_children": 0.05}
        ]));
        let data = data_with("healthByResidence", rows);
        let content = ConditionsByResidence
            .render(&data, &profile, &SectionProps::default())
            .unwrap();
        assert_eq!(content.chart.data[0].label, "Moderately Wasted Children in Urban Areas");
        assert_eq!(content.chart.data[0].group, "urban_moderate");
    }

    #[test]
    fn missing_data_is_an_error() {
        let profile = profile("040AF00079", "Keta", "adm2");
        let err = Conditions
            .render(&DataContext::default(), &profile, &SectionProps::default())
            .unwrap_err();
        assert!(matches!(err, ProfileError::DataUnavailable { .. }));
    }

    #[test]
    fn empty_rows_render_a_placeholder_sentence() {
        let profile = profile("040AF00079", "Keta", "adm2");
        let data = data_with("condition", Vec::new());
        let content = Conditions
            .render(&data, &profile, &SectionProps::default())
            .unwrap();
        assert_eq!(content.narrative, "No child health survey data is available for Keta.");
        assert!(content.chart.data.is_empty());
    }
}
