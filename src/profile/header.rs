//! Profile header: title, splash image, locator map and key stats.

use crate::profile::colors::{Rgb, Rgba};
use crate::store::{AttrEntry, Attrs, Stat};
use serde::Serialize;

const CONTINENT_TOPOJSON: &str = "/topojson/continent.json";
const ADM1_TOPOJSON: &str = "/topojson/cell5m/adm1.json";

/// Characters of a geo id naming its country
fn adm0_segment(id: &str) -> Option<&str> {
    id.get(5..10)
}

/// The properties of a map feature the styling rules look at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapFeature {
    pub geo: String,
    pub iso_a3: String,
}

impl MapFeature {
    pub fn new(geo: impl Into<String>, iso_a3: impl Into<String>) -> Self {
        Self {
            geo: geo.into(),
            iso_a3: iso_a3.into(),
        }
    }
}

/// Locator map settings.
///
/// Country profiles show the continent with the country lit; anything below
/// country level shows that country's provinces with the entity lit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeomapConfig {
    pub topojson: &'static str,
    pub entity_id: String,
    pub entity_iso3: Option<String>,
    /// Only features of this country are drawn; `None` draws everything
    pub adm0: Option<String>,
    pub focus_iso: Vec<String>,
    pub stroke: Rgba,
}

impl GeomapConfig {
    pub fn for_entity(entity: &AttrEntry, focus_iso: Vec<String>) -> Self {
        let (topojson, adm0) = if entity.is_adm0() {
            (CONTINENT_TOPOJSON, None)
        } else {
            (
                ADM1_TOPOJSON,
                Some(adm0_segment(&entity.id).unwrap_or_default().to_string()),
            )
        };
        Self {
            topojson,
            entity_id: entity.id.clone(),
            entity_iso3: entity.iso3.clone(),
            adm0,
            focus_iso,
            stroke: Rgb::WHITE.with_alpha(0.25),
        }
    }

    pub fn is_country_map(&self) -> bool {
        self.adm0.is_none()
    }

    /// Whether a feature is drawn at all
    pub fn includes(&self, feature: &MapFeature) -> bool {
        match &self.adm0 {
            None => true,
            Some(adm0) => adm0_segment(&feature.geo) == Some(adm0.as_str()),
        }
    }

    pub fn is_selected(&self, feature: &MapFeature) -> bool {
        if self.is_country_map() {
            self.entity_iso3.as_deref() == Some(feature.iso_a3.as_str())
        } else {
            feature.geo == self.entity_id
        }
    }

    pub fn is_focus(&self, feature: &MapFeature) -> bool {
        self.focus_iso.iter().any(|iso| *iso == feature.iso_a3)
    }

    pub fn fill(&self, feature: &MapFeature) -> Rgba {
        if self.is_selected(feature) {
            Rgb::WHITE.with_alpha(1.0)
        } else if self.is_focus(feature) {
            Rgb::WHITE.with_alpha(0.35)
        } else {
            Rgb::WHITE.with_alpha(0.1)
        }
    }
}

/// A stat ready to show: label and resolved value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatLine {
    pub key: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    pub title: String,
    pub splash: String,
    pub map: GeomapConfig,
    pub stats: Vec<StatLine>,
}

impl Header {
    pub fn new(entity: &AttrEntry, attrs: &Attrs, focus_iso: Vec<String>, stats: &[Stat]) -> Self {
        Self {
            title: entity.name.clone(),
            splash: format!("/images/geo/{}.jpg", entity.id),
            map: GeomapConfig::for_entity(entity, focus_iso),
            stats: stats
                .iter()
                .map(|s| StatLine {
                    key: s.key.clone(),
                    label: s.label.clone(),
                    value: s.display_value(attrs),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StatValue;

    fn entity(id: &str, level: &str, iso3: &str) -> AttrEntry {
        AttrEntry {
            id: id.to_string(),
            name: "Somewhere".to_string(),
            level: Some(level.to_string()),
            iso3: Some(iso3.to_string()),
            parent: None,
        }
    }

    #[test]
    fn country_map_lights_the_country() {
        let map = GeomapConfig::for_entity(&entity("040AF00079", "adm0", "GHA"), vec!["NGA".to_string()]);
        assert_eq!(map.topojson, "/topojson/continent.json");
        assert!(map.includes(&MapFeature::new("040AF00156", "KEN")));

        assert_eq!(map.fill(&MapFeature::new("x", "GHA")).css(), "#ffffff");
        assert_eq!(map.fill(&MapFeature::new("x", "NGA")).css(), "rgba(255, 255, 255, 0.35)");
        assert_eq!(map.fill(&MapFeature::new("x", "KEN")).css(), "rgba(255, 255, 255, 0.1)");
        assert_eq!(map.stroke.css(), "rgba(255, 255, 255, 0.25)");
    }

    #[test]
    fn province_map_filters_to_the_country() {
        let map = GeomapConfig::for_entity(&entity("050AF00079001", "adm1", "GHA"), Vec::new());
        assert_eq!(map.topojson, "/topojson/cell5m/adm1.json");
        assert!(map.includes(&MapFeature::new("050AF00079002", "GHA")));
        assert!(!map.includes(&MapFeature::new("050AF00156001", "KEN")));
        assert!(map.is_selected(&MapFeature::new("050AF00079001", "GHA")));
        assert!(!map.is_selected(&MapFeature::new("050AF00079002", "GHA")));
    }

    #[test]
    fn header_resolves_attr_stats() {
        let mut attrs = Attrs::default();
        let parent = serde_json::json!({"id": "040AF00079", "name": "Ghana"});
        attrs.insert_records("geo", &[parent.as_object().cloned().unwrap()]);
        let stats = vec![Stat {
            key: "parent".to_string(),
            label: "Part of".to_string(),
            value: StatValue::Attr {
                attr: "geo".to_string(),
                id: "040AF00079".to_string(),
            },
        }];
        let header = Header::new(&entity("050AF00079001", "adm1", "GHA"), &attrs, Vec::new(), &stats);
        assert_eq!(header.splash, "/images/geo/050AF00079001.jpg");
        assert_eq!(header.stats[0].value, "Ghana");
    }
}
