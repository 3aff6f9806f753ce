use log::debug;

use crate::model::entry::ChargingLogEntry;
use crate::model::filter::ReportFilter;

/// Selects the entries matching `filter`. Input order is kept but carries no meaning.
///
/// A month wins over a date range if both happen to be set; a range applies
/// only when both ends are present. An empty filter keeps everything.
pub fn filter_entries(entries: &[ChargingLogEntry], filter: &ReportFilter) -> Vec<ChargingLogEntry> {
    let range = if filter.month.is_some() { None } else { filter.date_range() };

    let selected: Vec<ChargingLogEntry> = entries
        .iter()
        .filter(|e| filter.user.matches(&e.user))
        .filter(|e| filter.month.map_or(true, |m| m.contains(e.date)))
        .filter(|e| range.map_or(true, |(start, end)| start <= e.date && e.date <= end))
        .cloned()
        .collect();

    debug!("filter {:?} kept {} of {} entries", filter, selected.len(), entries.len());
    selected
}
