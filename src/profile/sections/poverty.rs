//! Poverty headcount sections.
//!
//! `hc` is the share of people living below the poverty line; `ppp1` and
//! `ppp2` are the two lines the survey data is published for.

use super::{latest_year, tooltip_body, PovertyLevel, Section, SectionContent, SectionProps};
use crate::api::fold::{self, Record};
use crate::api::DataNeed;
use crate::error::{ProfileError, Result};
use crate::format::TickFormat;
use crate::profile::chart::{AxisConfig, ChartConfig, ChartPoint, Discrete};
use crate::profile::colors;
use crate::profile::page::{DataContext, ProfileContext};
use crate::text::title_case;

const POVERTY_NEED: DataNeed = DataNeed {
    key: "poverty",
    show: &["year", "poverty_level"],
    required: &["hc"],
    sumlevel: &["all", "all"],
};

const POVERTY_GENDER_NEED: DataNeed = DataNeed {
    key: "povertyByGender",
    show: &["year", "poverty_level", "gender"],
    required: &["hc"],
    sumlevel: &["all", "all", "all"],
};

fn headcount_chart(category_title: &str, category_field: &str) -> ChartConfig {
    let mut chart = ChartConfig::bar(
        category_field,
        "hc",
        Discrete::X,
        AxisConfig::new(category_title, TickFormat::Text),
        AxisConfig::new("Share of Population", TickFormat::ShareWhole).with_domain(0.0, 1.0),
    );
    chart.time = Some("year".to_string());
    chart
}

fn level_of(row: &Record) -> Option<PovertyLevel> {
    PovertyLevel::from_key(&fold::text(row, "poverty_level")?)
}

fn headcount_sentence(chart: &ChartConfig, year: Option<i64>, profile: &ProfileContext) -> String {
    let points = chart.points_for(year);
    let (Some(year), Some((first, rest))) = (year, points.split_first()) else {
        return format!("No poverty data is available for {}.", profile.name());
    };

    let mut sentence = format!(
        "In {}, {} of people in {} lived below {}",
        year,
        TickFormat::ShareWhole.apply(first.value),
        profile.name(),
        first.category
    );
    for p in rest {
        sentence.push_str(&format!(
            " and {} below {}",
            TickFormat::ShareWhole.apply(p.value),
            p.category
        ));
    }
    sentence.push('.');
    sentence
}

pub struct Poverty;

impl Section for Poverty {
    fn id(&self) -> &'static str {
        "poverty"
    }

    fn title(&self, _props: &SectionProps) -> String {
        "Poverty".to_string()
    }

    fn needs(&self) -> &'static [DataNeed] {
        &[POVERTY_NEED]
    }

    fn render(
        &self,
        data: &DataContext,
        profile: &ProfileContext,
        _props: &SectionProps,
    ) -> Result<SectionContent> {
        let rows = data.rows(POVERTY_NEED.key)?;

        let mut chart = headcount_chart("Poverty Line", "poverty_level");
        chart.group_by = vec!["poverty_level".to_string()];
        chart.stack_order = PovertyLevel::ALL.iter().map(|l| l.key().to_string()).collect();
        chart.data = rows
            .iter()
            .filter_map(|row| {
                let level = level_of(row)?;
                let value = fold::number(row, "hc")?;
                Some(ChartPoint {
                    group: level.key().to_string(),
                    category: level.label().to_string(),
                    label: format!("Below {}", level.label()),
                    value,
                    year: fold::year(row),
                    fill: colors::poverty(level.key()),
                    opacity: 1.0,
                    position: None,
                    tooltip: tooltip_body(row, &[("year", TickFormat::Text), ("hc", TickFormat::ShareWhole)]),
                })
            })
            .collect();

        let narrative = headcount_sentence(&chart, latest_year(rows), profile);

        Ok(SectionContent { narrative, chart })
    }
}

/// Headcount by gender at one poverty line
pub struct PovertyByGender;

impl PovertyByGender {
    fn level(props: &SectionProps) -> Result<PovertyLevel> {
        props
            .poverty_level
            .ok_or_else(|| ProfileError::InvalidConfig("PovertyByGender needs a poverty level".to_string()))
    }
}

impl Section for PovertyByGender {
    fn id(&self) -> &'static str {
        "poverty-by-gender"
    }

    fn title(&self, props: &SectionProps) -> String {
        match props.poverty_level {
            Some(level) => format!("Poverty by Gender at {}", level.label()),
            None => "Poverty by Gender".to_string(),
        }
    }

    fn needs(&self) -> &'static [DataNeed] {
        &[POVERTY_GENDER_NEED]
    }

    fn render(
        &self,
        data: &DataContext,
        profile: &ProfileContext,
        props: &SectionProps,
    ) -> Result<SectionContent> {
        let level = Self::level(props)?;
        let rows: Vec<&Record> = data
            .rows(POVERTY_GENDER_NEED.key)?
            .iter()
            .filter(|r| level_of(r) == Some(level))
            .collect();

        let mut chart = headcount_chart("Gender", "gender");
        chart.group_by = vec!["gender".to_string()];
        chart.stack_order = vec!["female".to_string(), "male".to_string()];
        chart.data = rows
            .iter()
            .filter_map(|row| {
                let gender = fold::text(row, "gender")?;
                let value = fold::number(row, "hc")?;
                Some(ChartPoint {
                    group: gender.clone(),
                    category: title_case(&gender),
                    label: format!("{}s Below {}", title_case(&gender), level.label()),
                    value,
                    year: fold::year(row),
                    fill: colors::gender(&gender),
                    opacity: 1.0,
                    position: None,
                    tooltip: tooltip_body(row, &[("year", TickFormat::Text), ("hc", TickFormat::ShareWhole)]),
                })
            })
            .collect();

        let narrative = match chart.latest_year() {
            Some(year) => {
                let parts: Vec<String> = chart
                    .points_for(Some(year))
                    .iter()
                    .map(|p| {
                        let who = match p.group.as_str() {
                            "female" => "women",
                            "male" => "men",
                            other => other,
                        };
                        format!("{} of {}", TickFormat::ShareWhole.apply(p.value), who)
                    })
                    .collect();
                format!(
                    "In {}, {} in {} lived below {}.",
                    year,
                    parts.join(" and "),
                    profile.name(),
                    level.label()
                )
            }
            None => format!(
                "No poverty data by gender is available for {} at {}.",
                profile.name(),
                level.label()
            ),
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
            "poverty",
            Ok(records(json!([
                {"year": 2012, "poverty_level": "ppp2", "hc": 0.4},
                {"year": 2012, "poverty_level": "ppp1", "hc": 0.25},
                {"year": 2005, "poverty_level": "ppp1", "hc": 0.3}
            ]))),
        );
        data.insert(
            "povertyByGender",
            Ok(records(json!([
                {"year": 2012, "poverty_level": "ppp1", "gender": "male", "hc": 0.2},
                {"year": 2012, "poverty_level": "ppp1", "gender": "female", "hc": 0.3},
                {"year": 2012, "poverty_level": "ppp2", "gender": "female", "hc": 0.5}
            ]))),
        );
        data
    }

    #[test]
    fn headcount_narrative_covers_both_lines() {
        let profile = profile("GHA", "Ghana", "adm0");
        let content = Poverty
            .render(&data(), &profile, &SectionProps::default())
            .unwrap();
        assert_eq!(
            content.narrative,
            "In 2012, 25% of people in Ghana lived below $1.90/day and 40% below $3.10/day."
        );
    }

    #[test]
    fn gender_section_filters_by_level() {
        let profile = profile("GHA", "Ghana", "adm0");
        let props = SectionProps::poverty(PovertyLevel::Ppp1);
        let content = PovertyByGender.render(&data(), &profile, &props).unwrap();
        assert_eq!(content.chart.data.len(), 2);
        assert_eq!(
            content.narrative,
            "In 2012, 30% of women and 20% of men in Ghana lived below $1.90/day."
        );
        assert_eq!(PovertyByGender.title(&props), "Poverty by Gender at $1.90/day");
    }

    #[test]
    fn gender_section_requires_a_level() {
        let profile = profile("GHA", "Ghana", "adm0");
        let err = PovertyByGender
            .render(&data(), &profile, &SectionProps::default())
            .unwrap_err();
        assert!(matches!(err, ProfileError::InvalidConfig(_)));
    }
}
