use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

// ---------------------------------------------------------------------------
// Column names of the input table
// ---------------------------------------------------------------------------

/// Column-name constants shared by every loader and the exporter.
pub mod columns {
    pub const DATE: &str = "date";
    pub const MAGNITUDE: &str = "mag";
    pub const DEPTH: &str = "depth";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const COUNTRY: &str = "country";
    pub const CONTINENT: &str = "continent";
    pub const ID: &str = "id";

    pub const REQUIRED: [&str; 8] = [
        DATE, MAGNITUDE, DEPTH, LATITUDE, LONGITUDE, COUNTRY, CONTINENT, ID,
    ];
}

// ---------------------------------------------------------------------------
// Event – one row of the source table
// ---------------------------------------------------------------------------

/// A single seismic event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: String,
    /// Calendar date of the event (time of day is dropped at load time).
    pub date: NaiveDate,
    pub latitude: f64,
    pub longitude: f64,
    pub magnitude: f64,
    /// Depth in km.
    pub depth: f64,
    pub country: String,
    pub continent: String,
}

impl Event {
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed value indices.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All events (rows), in file order.
    pub events: Vec<Event>,
    /// Observed (min, max) date; `None` for an empty dataset.
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
    /// Sorted distinct continent names.
    pub continents: BTreeSet<String>,
    /// Sorted distinct country names.
    pub countries: BTreeSet<String>,
}

impl Dataset {
    /// Build value indices from the loaded events.
    pub fn from_events(events: Vec<Event>) -> Self {
        let mut continents = BTreeSet::new();
        let mut countries = BTreeSet::new();
        let mut date_bounds: Option<(NaiveDate, NaiveDate)> = None;

        for ev in &events {
            continents.insert(ev.continent.clone());
            countries.insert(ev.country.clone());
            date_bounds = Some(match date_bounds {
                None => (ev.date, ev.date),
                Some((lo, hi)) => (lo.min(ev.date), hi.max(ev.date)),
            });
        }

        Dataset {
            events,
            date_bounds,
            continents,
            countries,
        }
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Resolve a list of row indices into event references.
    pub fn select<'a>(&'a self, indices: &'a [usize]) -> impl Iterator<Item = &'a Event> + 'a {
        indices.iter().filter_map(move |&i| self.events.get(i))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    pub fn event(
        id: &str,
        date_str: &str,
        magnitude: f64,
        depth: f64,
        country: &str,
        continent: &str,
    ) -> Event {
        Event {
            id: id.to_string(),
            date: date(date_str),
            latitude: 0.0,
            longitude: 0.0,
            magnitude,
            depth,
            country: country.to_string(),
            continent: continent.to_string(),
        }
    }

    /// A small mixed dataset spanning three years and three continents.
    pub fn sample_dataset() -> Dataset {
        Dataset::from_events(vec![
            event("a", "2020-01-01", 7.2, 10.0, "Japan", "Asia"),
            event("b", "2020-05-10", 5.5, 35.0, "Indonesia", "Asia"),
            event("c", "2021-06-01", 5.1, 30.0, "Chile", "Americas"),
            event("d", "2021-09-15", 6.4, 70.0, "Peru", "Americas"),
            event("e", "2022-03-03", 4.8, 12.0, "Italy", "Europe"),
            event("f", "2022-11-20", 7.9, 600.0, "Chile", "Americas"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn from_events_builds_indices() {
        let ds = sample_dataset();
        assert_eq!(ds.len(), 6);
        assert_eq!(ds.date_bounds, Some((date("2020-01-01"), date("2022-11-20"))));
        let continents: Vec<_> = ds.continents.iter().map(String::as_str).collect();
        assert_eq!(continents, ["Americas", "Asia", "Europe"]);
        assert_eq!(ds.countries.len(), 5);
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        let ds = Dataset::from_events(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.date_bounds.is_none());
    }

    #[test]
    fn select_skips_out_of_range_indices() {
        let ds = sample_dataset();
        let ids: Vec<_> = ds.select(&[0, 5, 42]).map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a", "f"]);
    }
}
