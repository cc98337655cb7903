use chrono::{DateTime, Duration, TimeZone};
use serde::Serialize;

use crate::list::NotificationRow;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based.
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub has_more: bool,
}

pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let start = (page - 1).saturating_mul(per_page).min(items.len());
    let end = start.saturating_add(per_page).min(items.len());

    Page {
        items: items[start..end].to_vec(),
        page,
        per_page,
        total: items.len(),
        has_more: end < items.len(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    pub rows: Vec<NotificationRow>,
}

/// Group rows by calendar day in `now`'s timezone. Sections appear in the
/// order their first row does; rows keep their relative order.
pub fn group_by_day<Tz: TimeZone>(rows: Vec<NotificationRow>, now: &DateTime<Tz>) -> Vec<Section> {
    let tz = now.timezone();
    let today = now.date_naive();
    let yesterday = today - Duration::days(1);

    let mut sections: Vec<(chrono::NaiveDate, Section)> = Vec::new();
    for row in rows {
        let day = row.created_at.with_timezone(&tz).date_naive();
        match sections.iter_mut().find(|(d, _)| *d == day) {
            Some((_, section)) => section.rows.push(row),
            None => {
                let title = if day == today {
                    "Today".to_string()
                } else if day == yesterday {
                    "Yesterday".to_string()
                } else {
                    day.format("%d %b %Y").to_string()
                };
                sections.push((day, Section { title, rows: vec![row] }));
            }
        }
    }

    sections.into_iter().map(|(_, s)| s).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use notify_core::{Notification, NotificationKind};

    #[test]
    fn paginates_with_has_more() {
        let items: Vec<u32> = (1..=45).collect();

        let first = paginate(&items, 1, 20);
        assert_eq!(first.items.len(), 20);
        assert!(first.has_more);

        let last = paginate(&items, 3, 20);
        assert_eq!(last.items, (41..=45).collect::<Vec<_>>());
        assert!(!last.has_more);

        let beyond = paginate(&items, 9, 20);
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 45);
    }

    #[test]
    fn page_zero_is_first_page() {
        let items = vec!["a", "b"];
        assert_eq!(paginate(&items, 0, 1).items, vec!["a"]);
    }

    #[test]
    fn groups_into_today_yesterday_and_dates() {
        // 01:30 in UTC+05:30 on the 16th; 20:00 UTC on the 15th is already the 16th locally.
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let now = ist.with_ymd_and_hms(2026, 10, 16, 1, 30, 0).unwrap();
        let utc_now = now.with_timezone(&Utc);

        let row = |id: &str, y, m, d, h| {
            let at = Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap();
            NotificationRow::from_notification(
                &Notification::new(id, NotificationKind::Alert, "t", "b", at),
                utc_now,
            )
        };

        let sections = group_by_day(
            vec![
                row("1", 2026, 10, 15, 20),
                row("2", 2026, 10, 15, 10),
                row("3", 2026, 10, 14, 10),
                row("4", 2026, 9, 1, 10),
            ],
            &now,
        );

        let titles: Vec<_> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Today", "Yesterday", "14 Oct 2026", "01 Sep 2026"]);
        assert_eq!(sections[0].rows[0].id, "1");
    }
}
