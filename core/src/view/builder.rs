use crate::api::{GlobalSnapshot, LatestStats, RegionRecord};
use crate::pins::PinSet;
use crate::prelude::Scope;
use crate::view::node::{DisplayNode, NodeAction};
use deunicode::deunicode;
use indexmap::IndexMap;
use std::cmp::Ordering;

/// Records grouped by exact country name, in first-seen order.
pub type CountryGroups<'a> = IndexMap<&'a str, Vec<&'a RegionRecord>>;

/// Builds the node tree a provider of `scope` publishes.
///
/// `pins` only matters for [`Scope::Pinned`]; without it nothing is pinned
/// and the pinned tree is empty.
pub fn build(
    scope: Scope,
    records: &[RegionRecord],
    global: &GlobalSnapshot,
    pins: Option<&PinSet>,
) -> Vec<DisplayNode> {
    match scope {
        Scope::World => world_nodes(global),
        Scope::Countries => country_nodes(records, Some(NodeAction::Pin)),
        Scope::Pinned => {
            let pinned = records
                .iter()
                .filter(|record| pins.is_some_and(|p| p.contains(&record.country)));
            country_nodes(pinned, Some(NodeAction::Unpin))
        }
    }
}

/// One leaf per global total.
pub fn world_nodes(global: &GlobalSnapshot) -> Vec<DisplayNode> {
    metric_leaves(global)
}

/// `"Confirmed: 10"`, `"Deaths: 1"`, `"Recovered: 0"`.
pub fn metric_leaves(stats: &LatestStats) -> Vec<DisplayNode> {
    stats
        .fields()
        .iter()
        .map(|(name, value)| DisplayNode::leaf(format!("{}: {}", capitalize(name), value)))
        .collect()
}

/// Country branches sorted by name. A country reported as a single record
/// holds its metric leaves directly; one reported per province holds a
/// sorted branch per province.
pub fn country_nodes<'a, I>(records: I, action: Option<NodeAction>) -> Vec<DisplayNode>
where
    I: IntoIterator<Item = &'a RegionRecord>,
{
    let mut groups: Vec<(&str, Vec<&RegionRecord>)> =
        group_by_country(records).into_iter().collect();
    groups.sort_by(|a, b| locale_cmp(a.0, b.0));

    groups
        .into_iter()
        .map(|(country, mut members)| {
            let children = if members.len() == 1 {
                metric_leaves(&members[0].latest)
            } else {
                members.sort_by(|a, b| locale_cmp(&a.province, &b.province));
                members
                    .iter()
                    .map(|r| DisplayNode::branch(r.province.clone(), metric_leaves(&r.latest)))
                    .collect()
            };
            DisplayNode::branch(country, children).with_action(action)
        })
        .collect()
}

/// Single linear pass; keys are compared exactly (case-sensitive).
pub fn group_by_country<'a, I>(records: I) -> CountryGroups<'a>
where
    I: IntoIterator<Item = &'a RegionRecord>,
{
    let mut groups = CountryGroups::new();
    for record in records {
        groups
            .entry(record.country.as_str())
            .or_default()
            .push(record);
    }
    groups
}

/// Accent- and case-insensitive ordering, so "Åland" sorts with the A's.
/// Ties put unaccented before accented, then lowercase before uppercase.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

fn collation_key(text: &str) -> String {
    deunicode(text).to_lowercase()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
