//! Profile page composition.
//!
//! Loading a page resolves every section's data needs in parallel, then
//! renders each section against the shared, read-only [`DataContext`]. A
//! failed need only fails the sections that declared it.

use crate::api::fold::Record;
use crate::api::{DataNeed, ProfileApi};
use crate::error::{ProfileError, Result};
use crate::logging;
use crate::profile::header::Header;
use crate::profile::registry::{self, SectionEntry, Topic};
use crate::profile::sections::SectionContent;
use crate::store::{AttrEntry, Attrs, Stat, Store};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Page-level context every section may read
#[derive(Debug, Clone)]
pub struct ProfileContext {
    pub entity: AttrEntry,
    pub attrs: Arc<Attrs>,
    pub focus: Arc<Vec<String>>,
    pub stats: Vec<Stat>,
}

impl ProfileContext {
    pub fn new(
        entity: AttrEntry,
        attrs: Arc<Attrs>,
        focus: Arc<Vec<String>>,
        stats: Vec<Stat>,
    ) -> Self {
        Self {
            entity,
            attrs,
            focus,
            stats,
        }
    }

    pub fn id(&self) -> &str {
        &self.entity.id
    }

    pub fn name(&self) -> &str {
        &self.entity.name
    }

    pub fn level(&self) -> &str {
        self.entity.level.as_deref().unwrap_or_default()
    }

    /// ISO3 codes of the focus entities known to the attrs table
    pub fn focus_iso(&self) -> Vec<String> {
        self.focus
            .iter()
            .filter_map(|f| self.attrs.geo(f)?.iso3.clone())
            .collect()
    }
}

/// Resolved datasets keyed by need key; a failed fetch keeps its message
#[derive(Debug, Default)]
pub struct DataContext {
    datasets: HashMap<&'static str, std::result::Result<Vec<Record>, String>>,
}

impl DataContext {
    pub fn insert(&mut self, key: &'static str, outcome: std::result::Result<Vec<Record>, String>) {
        self.datasets.insert(key, outcome);
    }

    pub fn rows(&self, key: &str) -> Result<&[Record]> {
        match self.datasets.get(key) {
            Some(Ok(rows)) => Ok(rows),
            Some(Err(message)) => Err(ProfileError::DataUnavailable {
                key: key.to_string(),
                message: message.clone(),
            }),
            None => Err(ProfileError::DataUnavailable {
                key: key.to_string(),
                message: "not requested".to_string(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn failed_keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<&'static str> = self
            .datasets
            .iter()
            .filter(|(_, v)| v.is_err())
            .map(|(k, _)| *k)
            .collect();
        keys.sort_unstable();
        keys
    }
}

/// Fetch every need for `geo` in parallel. Failures are recorded, not raised.
pub fn resolve_needs(api: &dyn ProfileApi, geo: &str, needs: &[DataNeed]) -> DataContext {
    let datasets = needs
        .par_iter()
        .map(|need| {
            let outcome = api.join(&need.join_query(geo));
            match &outcome {
                Ok(rows) => logging::log_data_need(need.key, geo, Ok(rows.len())),
                Err(e) => logging::log_data_need(need.key, geo, Err(e.to_string().as_str())),
            }
            (need.key, outcome.map_err(|e| e.inline_message()))
        })
        .collect();
    DataContext { datasets }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SectionOutcome {
    Ready(SectionContent),
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub id: &'static str,
    pub title: String,
    pub outcome: SectionOutcome,
}

impl SectionView {
    fn render(entry: &SectionEntry, data: &DataContext, context: &ProfileContext) -> Self {
        let outcome = match entry.section.render(data, context, &entry.props) {
            Ok(content) => SectionOutcome::Ready(content),
            Err(e) => {
                logging::warn(
                    "PAGE",
                    &format!("Section '{}' for {} failed: {}", entry.section.id(), context.id(), e),
                );
                SectionOutcome::Failed {
                    message: e.inline_message(),
                }
            }
        };
        Self {
            id: entry.section.id(),
            title: entry.title(),
            outcome,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.outcome, SectionOutcome::Ready(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicView {
    pub title: &'static str,
    pub slug: String,
    pub image: String,
    pub sections: Vec<SectionView>,
}

/// One subnav anchor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubnavLink {
    pub href: String,
    pub title: &'static str,
    pub icon: String,
}

impl From<&Topic> for SubnavLink {
    fn from(topic: &Topic) -> Self {
        Self {
            href: topic.anchor(),
            title: topic.title,
            icon: topic.image.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfilePage {
    #[serde(skip)]
    pub context: ProfileContext,
    pub header: Header,
    pub subnav: Vec<SubnavLink>,
    pub topics: Vec<TopicView>,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl ProfilePage {
    /// Fetch stats and section data for `id` and compose the page.
    ///
    /// Only an unknown entity is fatal; stats and section data failures are
    /// logged and shown where they occur.
    pub fn load(api: &dyn ProfileApi, store: &Store, id: &str) -> Result<Self> {
        let start = Instant::now();
        let entity = store.entity(id)?;
        logging::separator(&format!("PROFILE {}", id));

        let stats = store.fetch_stats(api, id).unwrap_or_else(|e| {
            logging::warn("PAGE", &format!("Stats for {} unavailable: {}", id, e));
            Vec::new()
        });

        let context = ProfileContext::new(entity, store.attrs.clone(), store.focus.clone(), stats);
        let data = resolve_needs(api, id, &registry::all_needs());

        let mut page = Self::compose(context, &data);
        page.elapsed = start.elapsed();
        logging::info(
            "PAGE",
            &format!(
                "Loaded {} in {:?} ({} datasets, {} failed)",
                id,
                page.elapsed,
                data.len(),
                data.failed_keys().len()
            ),
        );
        Ok(page)
    }

    /// Render every registry topic against already-resolved data
    pub fn compose(context: ProfileContext, data: &DataContext) -> Self {
        let header = Header::new(&context.entity, &context.attrs, context.focus_iso(), &context.stats);
        let topics = registry::topics()
            .iter()
            .map(|topic| TopicView {
                title: topic.title,
                slug: topic.slug.clone(),
                image: topic.image.clone(),
                sections: topic
                    .sections
                    .iter()
                    .map(|entry| SectionView::render(entry, data, &context))
                    .collect(),
            })
            .collect();

        Self {
            subnav: registry::topics().iter().map(SubnavLink::from).collect(),
            header,
            topics,
            context,
            elapsed: Duration::ZERO,
        }
    }

    pub fn topic(&self, slug: &str) -> Option<&TopicView> {
        self.topics.iter().find(|t| t.slug == slug)
    }

    pub fn section(&self, id: &str) -> Option<&SectionView> {
        self.topics
            .iter()
            .flat_map(|t| t.sections.iter())
            .find(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::sections::fixtures::{profile, records};
    use serde_json::json;

    #[test]
    fn missing_need_fails_only_its_sections() {
        let context = profile("040AF00079", "Ghana", "adm0");
        let mut data = DataContext::default();
        data.insert(
            "rainfall",
            Ok(records(json!([{"year": 2012, "rainfall_awa_mm": 900}]))),
        );
        data.insert("healthByGender", Err("Request timed out".to_string()));

        let page = ProfilePage::compose(context, &data);

        assert!(page.section("rainfall-bars").unwrap().is_ready());
        match &page.section("conditions-by-gender").unwrap().outcome {
            SectionOutcome::Failed { message } => {
                assert_eq!(message, "Data 'healthByGender' unavailable: Request timed out")
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn page_lists_every_topic_in_order() {
        let page = ProfilePage::compose(profile("040AF00079", "Ghana", "adm0"), &DataContext::default());
        let hrefs: Vec<&str> = page.subnav.iter().map(|l| l.href.as_str()).collect();
        assert_eq!(hrefs, vec!["#agriculture", "#climate", "#health", "#poverty"]);
        assert_eq!(page.topic("poverty").unwrap().sections.len(), 3);
        assert_eq!(page.header.title, "Ghana");
    }

    #[test]
    fn unrequested_keys_are_unavailable() {
        let data = DataContext::default();
        assert!(matches!(
            data.rows("nothing"),
            Err(ProfileError::DataUnavailable { .. })
        ));
    }
}
