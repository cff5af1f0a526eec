pub mod builder;
pub mod node;
pub mod provider;

pub use builder::{build, country_nodes, group_by_country, locale_cmp, metric_leaves, world_nodes};
pub use node::{DisplayNode, NodeAction};
pub use provider::{RefreshOutcome, RefreshTicket, StatsProvider};
