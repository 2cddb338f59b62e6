use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Deserialize;

use super::model::{Dataset, Event};

// ---------------------------------------------------------------------------
// Filter selection: date interval plus geographic picks
// ---------------------------------------------------------------------------

/// Inclusive calendar date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Clamp both bounds into `[lo, hi]`. An inverted range stays inverted,
    /// and a range lying wholly outside `[lo, hi]` is returned unchanged so it
    /// still matches nothing.
    pub fn clamped_to(self, (lo, hi): (NaiveDate, NaiveDate)) -> Self {
        if self.end < lo || self.start > hi {
            return self;
        }
        Self {
            start: self.start.clamp(lo, hi),
            end: self.end.clamp(lo, hi),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// User selection driving one render pass.
///
/// Empty sets mean "no constraint"; `date_range: None` means the dataset's
/// observed bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub date_range: Option<DateRange>,
    pub continents: BTreeSet<String>,
    pub countries: BTreeSet<String>,
}

/// How continent and country picks combine when both are non-empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoPrecedence {
    /// Any chosen country wins; the continent pick is ignored.
    #[default]
    CountryOverrides,
    /// Rows must match both a chosen continent and a chosen country.
    Intersection,
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Resolve the effective date interval for `dataset`: the user range clamped
/// to the observed bounds, or the bounds themselves.
pub fn effective_range(dataset: &Dataset, requested: Option<DateRange>) -> Option<DateRange> {
    let bounds = dataset.date_bounds?;
    Some(match requested {
        Some(range) => range.clamped_to(bounds),
        None => DateRange::new(bounds.0, bounds.1),
    })
}

/// Return indices of events whose date lies within `range` (inclusive).
pub fn filter_by_date(dataset: &Dataset, range: DateRange) -> Vec<usize> {
    dataset
        .events
        .iter()
        .enumerate()
        .filter(|(_, ev)| range.contains(ev.date))
        .map(|(i, _)| i)
        .collect()
}

/// Narrow `indices` by the continent / country picks.
///
/// * neither chosen → unchanged
/// * only continents → continent membership
/// * only countries → country membership
/// * both → decided by `precedence`
pub fn filter_by_geography(
    dataset: &Dataset,
    indices: &[usize],
    continents: &BTreeSet<String>,
    countries: &BTreeSet<String>,
    precedence: GeoPrecedence,
) -> Vec<usize> {
    if continents.is_empty() && countries.is_empty() {
        return indices.to_vec();
    }

    let by_country = !countries.is_empty();
    let by_continent = !continents.is_empty()
        && (!by_country || precedence == GeoPrecedence::Intersection);

    let keep = |ev: &Event| {
        (!by_continent || continents.contains(&ev.continent))
            && (!by_country || countries.contains(&ev.country))
    };

    indices
        .iter()
        .copied()
        .filter(|&i| dataset.events.get(i).is_some_and(|ev| keep(ev)))
        .collect()
}

/// Continents present among `indices`, sorted.
pub fn continent_options(dataset: &Dataset, indices: &[usize]) -> BTreeSet<String> {
    dataset
        .select(indices)
        .map(|ev| ev.continent.clone())
        .collect()
}

/// Countries offered for picking: those present among `indices`, restricted
/// to the chosen continents when any are chosen.
pub fn country_options(
    dataset: &Dataset,
    indices: &[usize],
    continents: &BTreeSet<String>,
) -> BTreeSet<String> {
    dataset
        .select(indices)
        .filter(|ev| continents.is_empty() || continents.contains(&ev.continent))
        .map(|ev| ev.country.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{date, sample_dataset};

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn ids(ds: &Dataset, indices: &[usize]) -> Vec<String> {
        ds.select(indices).map(|e| e.id.clone()).collect()
    }

    #[test]
    fn date_filter_is_inclusive_on_both_ends() {
        let ds = sample_dataset();
        let range = DateRange::new(date("2020-01-01"), date("2021-06-01"));
        assert_eq!(ids(&ds, &filter_by_date(&ds, range)), ["a", "b", "c"]);
    }

    #[test]
    fn date_filter_matches_predicate_for_every_row() {
        let ds = sample_dataset();
        let range = DateRange::new(date("2020-03-01"), date("2022-01-01"));
        let kept = filter_by_date(&ds, range);
        for (i, ev) in ds.events.iter().enumerate() {
            assert_eq!(kept.contains(&i), range.start <= ev.date && ev.date <= range.end);
        }
    }

    #[test]
    fn inverted_range_is_empty() {
        let ds = sample_dataset();
        let range = DateRange::new(date("2022-01-01"), date("2020-01-01"));
        assert!(filter_by_date(&ds, range).is_empty());
    }

    #[test]
    fn effective_range_defaults_and_clamps() {
        let ds = sample_dataset();
        let full = effective_range(&ds, None).unwrap();
        assert_eq!(full, DateRange::new(date("2020-01-01"), date("2022-11-20")));

        let wide = DateRange::new(date("1900-01-01"), date("2099-01-01"));
        assert_eq!(effective_range(&ds, Some(wide)), Some(full));

        let empty = Dataset::default();
        assert_eq!(effective_range(&empty, Some(wide)), None);
    }

    #[test]
    fn range_outside_the_data_matches_nothing() {
        let ds = sample_dataset();
        let before = DateRange::new(date("2019-06-01"), date("2019-12-31"));
        let after = DateRange::new(date("2023-01-01"), date("2023-12-31"));

        for requested in [before, after] {
            let applied = effective_range(&ds, Some(requested)).unwrap();
            assert_eq!(applied, requested);
            assert!(filter_by_date(&ds, applied).is_empty());
        }
    }

    #[test]
    fn partial_overlap_is_clamped() {
        let ds = sample_dataset();
        let requested = DateRange::new(date("2019-06-01"), date("2020-01-01"));
        let applied = effective_range(&ds, Some(requested)).unwrap();
        assert_eq!(applied, DateRange::new(date("2020-01-01"), date("2020-01-01")));
        assert_eq!(ids(&ds, &filter_by_date(&ds, applied)), ["a"]);
    }

    #[test]
    fn no_geo_selection_keeps_everything() {
        let ds = sample_dataset();
        let all: Vec<usize> = (0..ds.len()).collect();
        let kept = filter_by_geography(
            &ds,
            &all,
            &BTreeSet::new(),
            &BTreeSet::new(),
            GeoPrecedence::default(),
        );
        assert_eq!(kept, all);
    }

    #[test]
    fn continent_only_and_country_only() {
        let ds = sample_dataset();
        let all: Vec<usize> = (0..ds.len()).collect();
        let none = BTreeSet::new();

        let asia =
            filter_by_geography(&ds, &all, &set(&["Asia"]), &none, GeoPrecedence::default());
        assert_eq!(ids(&ds, &asia), ["a", "b"]);

        let chile =
            filter_by_geography(&ds, &all, &none, &set(&["Chile"]), GeoPrecedence::default());
        assert_eq!(ids(&ds, &chile), ["c", "f"]);
    }

    #[test]
    fn country_wins_when_both_are_chosen() {
        let ds = sample_dataset();
        let all: Vec<usize> = (0..ds.len()).collect();
        let both = filter_by_geography(
            &ds,
            &all,
            &set(&["Asia"]),
            &set(&["Chile"]),
            GeoPrecedence::CountryOverrides,
        );
        let country_only = filter_by_geography(
            &ds,
            &all,
            &BTreeSet::new(),
            &set(&["Chile"]),
            GeoPrecedence::CountryOverrides,
        );
        assert_eq!(both, country_only);
    }

    #[test]
    fn intersection_requires_both() {
        let ds = sample_dataset();
        let all: Vec<usize> = (0..ds.len()).collect();
        let kept = filter_by_geography(
            &ds,
            &all,
            &set(&["Asia"]),
            &set(&["Chile", "Japan"]),
            GeoPrecedence::Intersection,
        );
        assert_eq!(ids(&ds, &kept), ["a"]);
    }

    #[test]
    fn geo_filter_only_narrows_given_indices() {
        let ds = sample_dataset();
        let kept = filter_by_geography(
            &ds,
            &[0, 2],
            &BTreeSet::new(),
            &set(&["Chile"]),
            GeoPrecedence::default(),
        );
        assert_eq!(ids(&ds, &kept), ["c"]);
    }

    #[test]
    fn country_options_follow_continent_pick() {
        let ds = sample_dataset();
        let all: Vec<usize> = (0..ds.len()).collect();
        assert_eq!(
            country_options(&ds, &all, &set(&["Americas"])),
            set(&["Chile", "Peru"])
        );
        assert_eq!(country_options(&ds, &all, &BTreeSet::new()).len(), 5);
        assert_eq!(continent_options(&ds, &[4]), set(&["Europe"]));
    }
}
