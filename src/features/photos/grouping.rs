use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::shared::types::SortDirection;

pub const UNDATED_TITLE: &str = "Undated";

/// Inclusive date window. A missing bound is open on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Self> {
        match (start, end) {
            (Some(s), Some(e)) if e < s => None,
            _ => Some(Self { start, end }),
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// `start <= date <= end`. Undated items only pass an unbounded range.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        let Some(date) = date else {
            return !self.is_bounded();
        };
        !matches!(self.start, Some(start) if date < start)
            && !matches!(self.end, Some(end) if date > end)
    }
}

/// Photos taken on one day, or the undated bucket
#[derive(Debug, Clone, PartialEq)]
pub struct DateSection<T> {
    /// `None` for the undated bucket
    pub date: Option<NaiveDate>,
    pub title: String,
    pub items: Vec<T>,
}

pub fn section_title(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%B %-d, %Y").to_string(),
        None => UNDATED_TITLE.to_string(),
    }
}

/// Partition items into one section per distinct date.
///
/// Dated sections are ordered by `direction`; the undated section, if any,
/// always comes last. Items keep their input order within a section.
pub fn group_by_date<T, F>(items: Vec<T>, date_of: F, direction: SortDirection) -> Vec<DateSection<T>>
where
    F: Fn(&T) -> Option<NaiveDate>,
{
    let mut dated: BTreeMap<NaiveDate, Vec<T>> = BTreeMap::new();
    let mut undated = Vec::new();

    for item in items {
        match date_of(&item) {
            Some(date) => dated.entry(date).or_default().push(item),
            None => undated.push(item),
        }
    }

    let mut sections: Vec<DateSection<T>> = dated
        .into_iter()
        .map(|(date, items)| DateSection {
            date: Some(date),
            title: section_title(Some(date)),
            items,
        })
        .collect();

    if direction == SortDirection::Desc {
        sections.reverse();
    }

    if !undated.is_empty() {
        sections.push(DateSection {
            date: None,
            title: section_title(None),
            items: undated,
        });
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::lorem::en::Word;
    use fake::Fake;
    use std::collections::HashSet;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        name: String,
        date: Option<NaiveDate>,
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn items(dates: &[Option<NaiveDate>]) -> Vec<Item> {
        dates
            .iter()
            .enumerate()
            .map(|(i, date)| Item {
                name: format!("{}-{}", Word().fake::<String>(), i),
                date: *date,
            })
            .collect()
    }

    #[test]
    fn test_one_section_per_distinct_date_and_every_item_once() {
        let input = items(&[
            Some(d(2024, 3, 5)),
            None,
            Some(d(2024, 3, 1)),
            Some(d(2024, 3, 5)),
            None,
            Some(d(2024, 2, 28)),
        ]);
        let sections = group_by_date(input.clone(), |i| i.date, SortDirection::Desc);

        let dates: Vec<_> = sections.iter().map(|s| s.date).collect();
        assert_eq!(
            dates,
            vec![Some(d(2024, 3, 5)), Some(d(2024, 3, 1)), Some(d(2024, 2, 28)), None]
        );

        let all: Vec<&Item> = sections.iter().flat_map(|s| s.items.iter()).collect();
        assert_eq!(all.len(), input.len());
        let names: HashSet<_> = all.iter().map(|i| i.name.clone()).collect();
        assert_eq!(names.len(), input.len());

        for section in &sections {
            assert!(section.items.iter().all(|i| i.date == section.date));
        }
        assert_eq!(sections.last().unwrap().title, UNDATED_TITLE);
    }

    #[test]
    fn test_ascending_keeps_undated_last() {
        let input = items(&[None, Some(d(2024, 3, 5)), Some(d(2024, 1, 2))]);
        let sections = group_by_date(input, |i| i.date, SortDirection::Asc);

        assert_eq!(sections[0].date, Some(d(2024, 1, 2)));
        assert_eq!(sections[0].title, "January 2, 2024");
        assert_eq!(sections[1].date, Some(d(2024, 3, 5)));
        assert_eq!(sections[2].date, None);
    }

    #[test]
    fn test_empty_input_has_no_sections() {
        let sections = group_by_date(Vec::<Item>::new(), |i| i.date, SortDirection::Desc);
        assert!(sections.is_empty());
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let range = DateRange::new(Some(d(2024, 3, 1)), Some(d(2024, 3, 31))).unwrap();
        assert!(range.contains(Some(d(2024, 3, 1))));
        assert!(range.contains(Some(d(2024, 3, 31))));
        assert!(range.contains(Some(d(2024, 3, 15))));
        assert!(!range.contains(Some(d(2024, 2, 29))));
        assert!(!range.contains(Some(d(2024, 4, 1))));
        assert!(!range.contains(None));
    }

    #[test]
    fn test_half_open_and_unbounded_ranges() {
        let from = DateRange::new(Some(d(2024, 3, 1)), None).unwrap();
        assert!(from.contains(Some(d(2030, 1, 1))));
        assert!(!from.contains(None));

        let open = DateRange::default();
        assert!(open.contains(None));
        assert!(open.contains(Some(d(1999, 1, 1))));
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        assert!(DateRange::new(Some(d(2024, 3, 2)), Some(d(2024, 3, 1))).is_none());
        assert!(DateRange::new(Some(d(2024, 3, 1)), Some(d(2024, 3, 1))).is_some());
    }
}
