use std::collections::BTreeMap;

use super::model::{Dataset, Event};

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

/// Scalar summary of a filtered view. Min/max are `None` on an empty view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Kpis {
    pub min_magnitude: Option<f64>,
    pub max_magnitude: Option<f64>,
    pub min_depth: Option<f64>,
    pub max_depth: Option<f64>,
    pub count: usize,
}

pub fn kpis<'a>(events: impl IntoIterator<Item = &'a Event>) -> Kpis {
    let mut out = Kpis::default();
    for ev in events {
        out.count += 1;
        out.min_magnitude = Some(out.min_magnitude.map_or(ev.magnitude, |m| m.min(ev.magnitude)));
        out.max_magnitude = Some(out.max_magnitude.map_or(ev.magnitude, |m| m.max(ev.magnitude)));
        out.min_depth = Some(out.min_depth.map_or(ev.depth, |d| d.min(ev.depth)));
        out.max_depth = Some(out.max_depth.map_or(ev.depth, |d| d.max(ev.depth)));
    }
    out
}

// ---------------------------------------------------------------------------
// Grouped medians
// ---------------------------------------------------------------------------

/// One row of a per-continent table.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMedian {
    pub continent: String,
    pub value: f64,
}

/// Median of `values`; the mean of the two middle values for even counts.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    })
}

/// Median of `value(event)` per continent, one row per continent present,
/// sorted by continent name.
pub fn median_by_continent<'a, F>(
    events: impl IntoIterator<Item = &'a Event>,
    value: F,
) -> Vec<GroupMedian>
where
    F: Fn(&Event) -> f64,
{
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for ev in events {
        groups.entry(ev.continent.as_str()).or_default().push(value(ev));
    }
    groups
        .into_iter()
        .filter_map(|(continent, mut vals)| {
            median(&mut vals).map(|value| GroupMedian {
                continent: continent.to_string(),
                value,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// Events per calendar year, ascending. `excluded_year` drops a known
/// incomplete year from the series.
pub fn yearly_counts<'a>(
    events: impl IntoIterator<Item = &'a Event>,
    excluded_year: Option<i32>,
) -> Vec<YearCount> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for ev in events {
        let year = ev.year();
        if Some(year) != excluded_year {
            *counts.entry(year).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// Mean events per year across the series (reference line on the chart).
pub fn mean_yearly_count(series: &[YearCount]) -> Option<f64> {
    if series.is_empty() {
        return None;
    }
    let total: usize = series.iter().map(|y| y.count).sum();
    Some(total as f64 / series.len() as f64)
}

// ---------------------------------------------------------------------------
// Magnitude subsets and histograms
// ---------------------------------------------------------------------------

/// Indices (from `indices`) of events with magnitude strictly above `threshold`.
pub fn above_magnitude(dataset: &Dataset, indices: &[usize], threshold: f64) -> Vec<usize> {
    indices
        .iter()
        .copied()
        .filter(|&i| dataset.events.get(i).is_some_and(|ev| ev.magnitude > threshold))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Equal-width histogram between min and max of `values`. The last bin is
/// closed so the maximum is counted. A zero-width range yields one unit-wide
/// bin centred on the value.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if range.abs() < f64::EPSILON {
        return vec![HistogramBin {
            start: min - 0.5,
            end: min + 0.5,
            count: values.len(),
        }];
    }

    let width = range / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|b| HistogramBin {
            start: min + b as f64 * width,
            end: if b + 1 == bins { max } else { min + (b + 1) as f64 * width },
            count: 0,
        })
        .collect();

    for &v in values {
        let slot = (((v - min) / width) as usize).min(bins - 1);
        out[slot].count += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{event, sample_dataset};

    #[test]
    fn kpis_on_sample() {
        let ds = sample_dataset();
        let k = kpis(&ds.events);
        assert_eq!(k.count, 6);
        assert_eq!(k.min_magnitude, Some(4.8));
        assert_eq!(k.max_magnitude, Some(7.9));
        assert_eq!(k.min_depth, Some(10.0));
        assert_eq!(k.max_depth, Some(600.0));
        assert!(k.min_magnitude <= k.max_magnitude);
    }

    #[test]
    fn kpis_on_empty_view_are_undefined() {
        let k = kpis(std::iter::empty::<&Event>());
        assert_eq!(k, Kpis::default());
        assert_eq!(k.count, 0);
        assert!(k.max_depth.is_none());
    }

    #[test]
    fn median_handles_odd_and_even_counts() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&mut []), None);
    }

    #[test]
    fn grouped_medians_have_one_row_per_continent() {
        let ds = sample_dataset();
        let mags = median_by_continent(&ds.events, |e| e.magnitude);
        let names: Vec<_> = mags.iter().map(|g| g.continent.as_str()).collect();
        assert_eq!(names, ["Americas", "Asia", "Europe"]);
        assert!(mags.len() <= ds.continents.len());

        // Americas: 5.1, 6.4, 7.9 → 6.4 ; Asia: 7.2, 5.5 → 6.35
        assert_eq!(mags[0].value, 6.4);
        assert!((mags[1].value - 6.35).abs() < 1e-12);

        let depths = median_by_continent(&ds.events, |e| e.depth);
        assert_eq!(depths[0].value, 70.0);
    }

    #[test]
    fn grouped_medians_only_cover_present_continents() {
        let ds = sample_dataset();
        let asia_only = median_by_continent(ds.select(&[0, 1]), |e| e.depth);
        assert_eq!(asia_only.len(), 1);
        assert_eq!(asia_only[0].continent, "Asia");
        assert_eq!(asia_only[0].value, 22.5);
    }

    #[test]
    fn yearly_counts_skip_excluded_year() {
        let ds = sample_dataset();
        let all = yearly_counts(&ds.events, None);
        assert_eq!(
            all,
            vec![
                YearCount { year: 2020, count: 2 },
                YearCount { year: 2021, count: 2 },
                YearCount { year: 2022, count: 2 },
            ]
        );
        let trimmed = yearly_counts(&ds.events, Some(2022));
        assert_eq!(trimmed.len(), 2);
        assert_eq!(mean_yearly_count(&trimmed), Some(2.0));
        assert_eq!(mean_yearly_count(&[]), None);
    }

    #[test]
    fn threshold_is_strict() {
        let ds = sample_dataset();
        let all: Vec<usize> = (0..ds.len()).collect();
        assert_eq!(above_magnitude(&ds, &all, 7.2), vec![5]);
        assert_eq!(above_magnitude(&ds, &all, 5.0).len(), 5);
    }

    #[test]
    fn histogram_counts_every_value() {
        let values = [1.0, 2.0, 2.5, 3.0, 10.0];
        let bins = histogram(&values, 3);
        assert_eq!(bins.len(), 3);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(bins[0].start, 1.0);
        assert_eq!(bins[2].end, 10.0);
        assert_eq!(bins[2].count, 1);
    }

    #[test]
    fn histogram_degenerate_range() {
        let bins = histogram(&[4.0, 4.0], 10);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[0].center(), 4.0);
        assert!(histogram(&[], 10).is_empty());
    }

    #[test]
    fn single_event_view() {
        let ev = event("x", "2020-01-01", 7.2, 10.0, "Japan", "Asia");
        let k = kpis([&ev]);
        assert_eq!(k.min_magnitude, k.max_magnitude);
    }
}
