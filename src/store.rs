//! Page-level state shared by every profile: attribute tables, the focus set
//! and per-entity display stats. Profiles only read from it.

use crate::api::fold::{self, Record};
use crate::api::{DataNeed, ProfileApi};
use crate::error::{ProfileError, Result};
use crate::format::{commas, level_label, TickFormat};
use crate::logging;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// One attribute row (a geography, a crop, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttrEntry {
    pub id: String,
    pub name: String,
    pub level: Option<String>,
    pub iso3: Option<String>,
    pub parent: Option<String>,
}

impl AttrEntry {
    pub fn from_record(record: &Record) -> Option<Self> {
        Some(Self {
            id: fold::text(record, "id")?,
            name: fold::text(record, "name")?,
            level: fold::text(record, "level"),
            iso3: fold::text(record, "iso3"),
            parent: fold::text(record, "parent"),
        })
    }

    pub fn is_adm0(&self) -> bool {
        self.level.as_deref() == Some("adm0")
    }
}

/// Attribute tables keyed by kind, then id
#[derive(Debug, Clone, Default)]
pub struct Attrs {
    tables: HashMap<String, HashMap<String, AttrEntry>>,
}

impl Attrs {
    pub fn insert_records(&mut self, kind: &str, records: &[Record]) -> usize {
        let table = self.tables.entry(kind.to_string()).or_default();
        let before = table.len();
        for entry in records.iter().filter_map(AttrEntry::from_record) {
            table.insert(entry.id.clone(), entry);
        }
        table.len() - before
    }

    pub fn get(&self, kind: &str, id: &str) -> Option<&AttrEntry> {
        self.tables.get(kind)?.get(id)
    }

    pub fn geo(&self, id: &str) -> Option<&AttrEntry> {
        self.get("geo", id)
    }

    /// Display name for an attribute, falling back to the raw id
    pub fn name_of(&self, kind: &str, id: &str) -> String {
        self.get(kind, id)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn len(&self, kind: &str) -> usize {
        self.tables.get(kind).map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.values().all(HashMap::is_empty)
    }
}

/// Value shown next to a stat label
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatValue {
    Literal(String),
    /// Shown as the name of `attrs[attr][id]`
    Attr { attr: String, id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stat {
    pub key: String,
    pub label: String,
    pub value: StatValue,
}

impl Stat {
    pub fn display_value(&self, attrs: &Attrs) -> String {
        match &self.value {
            StatValue::Literal(v) => v.clone(),
            StatValue::Attr { attr, id } => attrs.name_of(attr, id),
        }
    }
}

/// Population figures behind the header stats
pub const POPULATION_NEED: DataNeed = DataNeed {
    key: "population",
    show: &["year"],
    required: &["totpop", "rural_totpop"],
    sumlevel: &["all"],
};

/// Shared store handed to every profile load
#[derive(Debug, Clone, Default)]
pub struct Store {
    pub attrs: Arc<Attrs>,
    pub focus: Arc<Vec<String>>,
}

impl Store {
    pub fn new(focus: Vec<String>) -> Self {
        Self {
            attrs: Arc::new(Attrs::default()),
            focus: Arc::new(focus),
        }
    }

    /// Load attribute tables. A kind that fails to load is logged and
    /// skipped; only a total failure is an error.
    pub fn fetch_vars(&mut self, api: &dyn ProfileApi, kinds: &[String]) -> Result<()> {
        let mut attrs = (*self.attrs).clone();
        let mut last_error = None;
        let mut loaded = 0;

        for kind in kinds {
            match api.attrs(kind) {
                Ok(records) => {
                    let added = attrs.insert_records(kind, &records);
                    logging::debug("STORE", &format!("Loaded {} '{}' attrs", added, kind));
                    loaded += 1;
                }
                Err(e) => {
                    logging::warn("STORE", &format!("Loading '{}' attrs failed: {}", kind, e));
                    last_error = Some(e);
                }
            }
        }

        self.attrs = Arc::new(attrs);
        match last_error {
            Some(e) if loaded == 0 => Err(e),
            _ => Ok(()),
        }
    }

    pub fn entity(&self, id: &str) -> Result<AttrEntry> {
        self.attrs
            .geo(id)
            .cloned()
            .ok_or_else(|| ProfileError::UnknownEntity(id.to_string()))
    }

    pub fn fetch_stats(&self, api: &dyn ProfileApi, id: &str) -> Result<Vec<Stat>> {
        let entity = self.entity(id)?;
        fetch_stats(api, &entity)
    }
}

/// Build the header stats for an entity.
///
/// The level and parent stats need no request; population figures come from
/// the latest year of [`POPULATION_NEED`].
pub fn fetch_stats(api: &dyn ProfileApi, entity: &AttrEntry) -> Result<Vec<Stat>> {
    let mut stats = Vec::new();

    if let Some(level) = &entity.level {
        stats.push(Stat {
            key: "level".to_string(),
            label: "Level".to_string(),
            value: StatValue::Literal(level_label(level).to_string()),
        });
    }

    if let Some(parent) = entity.parent.as_ref().filter(|_| !entity.is_adm0()) {
        stats.push(Stat {
            key: "parent".to_string(),
            label: "Part of".to_string(),
            value: StatValue::Attr {
                attr: "geo".to_string(),
                id: parent.clone(),
            },
        });
    }

    let rows = api.join(&POPULATION_NEED.join_query(&entity.id))?;
    stats.extend(population_stats(&rows));
    Ok(stats)
}

fn population_stats(rows: &[Record]) -> Vec<Stat> {
    let Some(latest) = rows.iter().filter(|r| fold::year(r).is_some()).max_by_key(|r| fold::year(r))
    else {
        return Vec::new();
    };
    let year = fold::year(latest).unwrap_or_default();
    let mut stats = Vec::new();

    if let Some(total) = fold::number(latest, "totpop") {
        stats.push(Stat {
            key: "population".to_string(),
            label: format!("Population ({})", year),
            value: StatValue::Literal(commas(total)),
        });

        if let Some(rural) = fold::number(latest, "rural_totpop").filter(|_| total > 0.0) {
            stats.push(Stat {
                key: "rural".to_string(),
                label: "Rural Population".to_string(),
                value: StatValue::Literal(TickFormat::ShareWhole.apply(rural / total)),
            });
        }
    }

    stats
}
