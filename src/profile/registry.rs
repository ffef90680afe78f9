//! The fixed topic table.
//!
//! Built once on first use and shared for the life of the process; slugs and
//! icon paths are derived while building, never patched in afterwards.

use crate::api::DataNeed;
use crate::profile::sections::{
    Conditions, ConditionsByGender, ConditionsByResidence, CropsAreaVsValue, CropsByHarvest,
    CropsByProduction, Poverty, PovertyByGender, PovertyLevel, RainfallBars, Section, SectionProps,
};
use crate::text::slugify;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

/// A section plus the props its registry entry passes
#[derive(Clone, Copy, Serialize)]
pub struct SectionEntry {
    #[serde(serialize_with = "serialize_section")]
    pub section: &'static dyn Section,
    pub props: SectionProps,
}

fn serialize_section<S: serde::Serializer>(
    section: &&'static dyn Section,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(section.id())
}

impl SectionEntry {
    fn plain(section: &'static dyn Section) -> Self {
        Self {
            section,
            props: SectionProps::default(),
        }
    }

    fn with_props(section: &'static dyn Section, props: SectionProps) -> Self {
        Self { section, props }
    }

    pub fn title(&self) -> String {
        self.section.title(&self.props)
    }
}

impl fmt::Debug for SectionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionEntry")
            .field("section", &self.section.id())
            .field("props", &self.props)
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub struct Topic {
    pub title: &'static str,
    pub slug: String,
    pub image: String,
    pub sections: Vec<SectionEntry>,
}

impl Topic {
    fn new(title: &'static str, sections: Vec<SectionEntry>) -> Self {
        let slug = slugify(title);
        let image = format!("/images/topics/{}.svg", slug);
        Self {
            title,
            slug,
            image,
            sections,
        }
    }

    pub fn anchor(&self) -> String {
        format!("#{}", self.slug)
    }
}

fn build() -> Vec<Topic> {
    vec![
        Topic::new(
            "Agriculture",
            vec![
                SectionEntry::plain(&CropsByHarvest),
                SectionEntry::plain(&CropsByProduction),
                SectionEntry::plain(&CropsAreaVsValue),
            ],
        ),
        Topic::new("Climate", vec![SectionEntry::plain(&RainfallBars)]),
        Topic::new(
            "Health",
            vec![
                SectionEntry::plain(&Conditions),
                SectionEntry::plain(&ConditionsByGender),
                SectionEntry::plain(&ConditionsByResidence),
            ],
        ),
        Topic::new(
            "Poverty",
            vec![
                SectionEntry::plain(&Poverty),
                SectionEntry::with_props(&PovertyByGender, SectionProps::poverty(PovertyLevel::Ppp1)),
                SectionEntry::with_props(&PovertyByGender, SectionProps::poverty(PovertyLevel::Ppp2)),
            ],
        ),
    ]
}

/// All topics, in page order
pub fn topics() -> &'static [Topic] {
    static TOPICS: OnceLock<Vec<Topic>> = OnceLock::new();
    TOPICS.get_or_init(build)
}

pub fn find(slug: &str) -> Option<&'static Topic> {
    topics().iter().find(|t| t.slug.eq_ignore_ascii_case(slug))
}

/// Every data need across the registry, first declaration per key wins
pub fn all_needs() -> Vec<DataNeed> {
    let mut seen = HashSet::new();
    topics()
        .iter()
        .flat_map(|t| t.sections.iter())
        .flat_map(|e| e.section.needs().iter().copied())
        .filter(|need| seen.insert(need.key))
        .collect()
}
