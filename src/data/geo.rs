use std::collections::BTreeMap;

use super::model::Event;

/// Latitude limit of the flat world map.
pub const MAX_MAP_LATITUDE: f64 = 80.0;

/// Miller cylindrical projection, in projected units (radians scale).
/// Latitude is clamped to ±[`MAX_MAP_LATITUDE`].
pub fn miller(latitude: f64, longitude: f64) -> [f64; 2] {
    let lat = latitude
        .clamp(-MAX_MAP_LATITUDE, MAX_MAP_LATITUDE)
        .to_radians();
    let x = longitude.to_radians();
    let y = 1.25 * (std::f64::consts::FRAC_PI_4 + 0.4 * lat).tan().ln();
    [x, y]
}

/// Mean latitude/longitude of `events`, used to center the marker maps.
pub fn center<'a>(events: impl IntoIterator<Item = &'a Event>) -> Option<(f64, f64)> {
    let (mut lat, mut lon, mut n) = (0.0, 0.0, 0usize);
    for ev in events {
        lat += ev.latitude;
        lon += ev.longitude;
        n += 1;
    }
    (n > 0).then(|| (lat / n as f64, lon / n as f64))
}

// ---------------------------------------------------------------------------
// Grid clustering
// ---------------------------------------------------------------------------

/// A group of nearby events, drawn as one bubble on the cluster map.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub latitude: f64,
    pub longitude: f64,
    pub count: usize,
    pub max_magnitude: f64,
}

/// Bucket events into square `cell_degrees` lat/lon cells. Each cluster sits
/// at the centroid of its members. Output is ordered by cell (south-west
/// first).
pub fn cluster<'a>(events: impl IntoIterator<Item = &'a Event>, cell_degrees: f64) -> Vec<Cluster> {
    let cell = if cell_degrees > 0.0 { cell_degrees } else { 1.0 };

    #[derive(Default)]
    struct Acc {
        lat: f64,
        lon: f64,
        n: usize,
        max_mag: f64,
    }

    let mut cells: BTreeMap<(i64, i64), Acc> = BTreeMap::new();
    for ev in events {
        let key = (
            (ev.latitude / cell).floor() as i64,
            (ev.longitude / cell).floor() as i64,
        );
        let acc = cells.entry(key).or_insert_with(|| Acc {
            max_mag: f64::NEG_INFINITY,
            ..Acc::default()
        });
        acc.lat += ev.latitude;
        acc.lon += ev.longitude;
        acc.n += 1;
        acc.max_mag = acc.max_mag.max(ev.magnitude);
    }

    cells
        .into_values()
        .map(|acc| Cluster {
            latitude: acc.lat / acc.n as f64,
            longitude: acc.lon / acc.n as f64,
            count: acc.n,
            max_magnitude: acc.max_mag,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::event;

    fn at(lat: f64, lon: f64, mag: f64) -> Event {
        let mut ev = event("p", "2020-01-01", mag, 10.0, "X", "Y");
        ev.latitude = lat;
        ev.longitude = lon;
        ev
    }

    #[test]
    fn miller_origin_and_symmetry() {
        let [x0, y0] = miller(0.0, 0.0);
        assert!(x0.abs() < 1e-12);
        assert!(y0.abs() < 1e-12);
        let [x, y] = miller(45.0, 90.0);
        let [x2, y2] = miller(-45.0, -90.0);
        assert!((x + x2).abs() < 1e-12);
        assert!((y + y2).abs() < 1e-12);
        assert!(y > 0.0);
    }

    #[test]
    fn miller_clamps_polar_latitudes() {
        assert_eq!(miller(89.0, 0.0), miller(MAX_MAP_LATITUDE, 0.0));
    }

    #[test]
    fn center_is_mean_position() {
        let events = [at(10.0, 20.0, 6.0), at(30.0, 40.0, 6.0)];
        assert_eq!(center(&events), Some((20.0, 30.0)));
        assert_eq!(center(std::iter::empty::<&Event>()), None);
    }

    #[test]
    fn clusters_group_by_cell() {
        let events = [
            at(1.0, 1.0, 5.5),
            at(3.0, 5.0, 6.5),
            at(-35.0, -71.0, 7.0),
        ];
        let clusters = cluster(&events, 10.0);
        assert_eq!(clusters.len(), 2);
        let total: usize = clusters.iter().map(|c| c.count).sum();
        assert_eq!(total, 3);

        let pair = clusters.iter().find(|c| c.count == 2).unwrap();
        assert_eq!(pair.latitude, 2.0);
        assert_eq!(pair.longitude, 3.0);
        assert_eq!(pair.max_magnitude, 6.5);
    }
}
