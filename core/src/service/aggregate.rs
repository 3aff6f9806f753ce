use log::debug;

use crate::model::entry::ChargingLogEntry;
use crate::service::dto::{UsageSummary, UserSummary};

/// Per-user totals over whatever subset it is handed.
///
/// Every registered user gets a row, zero-valued if absent from `entries`.
/// The grand total covers all of `entries`, including names that are no
/// longer registered.
pub fn aggregate(entries: &[ChargingLogEntry], users: &[String]) -> UsageSummary {
    let grand_total: f64 = entries.iter().map(|e| e.duration).sum();

    let per_user = users
        .iter()
        .map(|name| {
            let (total_hours, session_count) = entries
                .iter()
                .filter(|e| &e.user == name)
                .fold((0.0, 0), |(hours, count), e| (hours + e.duration, count + 1));
            let percentage = if grand_total > 0.0 {
                total_hours / grand_total * 100.0
            } else {
                0.0
            };
            UserSummary {
                name: name.clone(),
                total_hours,
                percentage,
                session_count,
            }
        })
        .collect();

    debug!("aggregated {} entries, {:.2}h total", entries.len(), grand_total);
    UsageSummary { per_user, grand_total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    const EPS: f64 = 1e-9;

    fn log(user: &str, date: &str, duration: f64) -> ChargingLogEntry {
        ChargingLogEntry {
            id: 0,
            user: user.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            duration,
            created_at: Utc::now(),
        }
    }

    fn users(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_june_example() {
        let entries = vec![
            log("Gal", "2025-06-25", 2.5),
            log("Guy", "2025-06-24", 1.5),
            log("Other", "2025-06-23", 3.0),
        ];
        let summary = aggregate(&entries, &users(&["Gal", "Guy", "Other"]));

        assert!((summary.grand_total - 7.0).abs() < EPS);
        assert!((summary.user("Gal").unwrap().percentage - 35.714).abs() < 0.01);
        assert!((summary.user("Guy").unwrap().percentage - 21.428).abs() < 0.01);
        assert!((summary.user("Other").unwrap().percentage - 42.857).abs() < 0.01);

        let total: f64 = summary.per_user.iter().map(|u| u.total_hours).sum();
        assert!((total - summary.grand_total).abs() < EPS);
        let pct: f64 = summary.per_user.iter().map(|u| u.percentage).sum();
        assert!((pct - 100.0).abs() < EPS);
    }

    #[test]
    fn test_zero_users_are_listed() {
        let entries = vec![log("Gal", "2025-06-25", 2.5)];
        let summary = aggregate(&entries, &users(&["Gal", "Guy"]));
        assert_eq!(summary.per_user.len(), 2);
        let guy = summary.user("Guy").unwrap();
        assert_eq!(guy.total_hours, 0.0);
        assert_eq!(guy.percentage, 0.0);
        assert_eq!(guy.session_count, 0);
        assert_eq!(summary.user("Gal").unwrap().percentage, 100.0);
    }

    #[test]
    fn test_empty_input_has_zero_percentages() {
        let summary = aggregate(&[], &users(&["Gal", "Guy"]));
        assert_eq!(summary.grand_total, 0.0);
        assert!(summary.per_user.iter().all(|u| u.percentage == 0.0 && !u.percentage.is_nan()));
    }

    #[test]
    fn test_session_counts() {
        let entries = vec![
            log("Gal", "2025-06-25", 2.5),
            log("Gal", "2025-06-26", 1.0),
            log("Guy", "2025-06-24", 1.5),
        ];
        let gal = aggregate(&entries, &users(&["Gal", "Guy"])).user("Gal").cloned().unwrap();
        assert!((gal.total_hours - 3.5).abs() < EPS);
        assert_eq!(gal.session_count, 2);
    }

    #[test]
    fn test_percentages_stay_in_bounds() {
        let entries = vec![
            log("Gal", "2025-06-25", 0.1),
            log("Guy", "2025-06-24", 24.0),
            log("Gone", "2025-06-24", 5.0),
        ];
        let summary = aggregate(&entries, &users(&["Gal", "Guy"]));
        assert!(summary.per_user.iter().all(|u| (0.0..=100.0).contains(&u.percentage)));
    }
}
