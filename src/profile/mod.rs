//! Profile pages: the topic registry, chart sections and page composition.

pub mod chart;
pub mod colors;
pub mod header;
pub mod page;
pub mod registry;
pub mod sections;

pub use chart::{AxisConfig, ChartConfig, ChartKind, ChartPoint, Discrete};
pub use header::{GeomapConfig, Header, MapFeature, StatLine};
pub use page::{
    resolve_needs, DataContext, ProfileContext, ProfilePage, SectionOutcome, SectionView,
    SubnavLink, TopicView,
};
pub use registry::{topics, SectionEntry, Topic};
pub use sections::{PovertyLevel, Section, SectionContent, SectionProps};
