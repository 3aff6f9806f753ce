use crate::model::entry::ChargingLogEntry;

const HEADER: [&str; 3] = ["Username", "Date", "Duration (hours)"];

/// Embedded quotes are doubled.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// CSV text in the order given: quoted fields, `\n` between rows, no trailing newline.
///
/// Durations use the shortest decimal form (`3`, `1.5`), never rounded.
pub fn export_csv(entries: &[ChargingLogEntry]) -> String {
    let header = HEADER.iter().map(|h| quote(h)).collect::<Vec<_>>().join(",");
    let rows = entries.iter().map(|e| {
        [
            quote(&e.user),
            quote(&e.date.format("%Y-%m-%d").to_string()),
            quote(&e.duration.to_string()),
        ]
        .join(",")
    });

    std::iter::once(header).chain(rows).collect::<Vec<_>>().join("\n")
}
