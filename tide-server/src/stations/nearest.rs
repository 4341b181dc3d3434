//! Nearest-station selection.
//!
//! A linear haversine scan. Catalogs are tens of stations, so there is no
//! spatial index; one (grid or k-d tree) would replace the scan if the
//! catalog grew to thousands.

use crate::domain::{Coordinate, Located};

use super::error::NoStationsAvailable;

/// An item paired with its distance from a query point.
#[derive(Debug)]
pub struct Ranked<'a, T> {
    pub item: &'a T,
    pub distance_km: f64,
}

/// Rank `items` by distance from `point`, returning at most `k`.
///
/// Ties keep input order (the sort is stable), so the result is fully
/// determined by the input.
pub fn rank_by_distance<T: Located>(point: Coordinate, items: &[T], k: usize) -> Vec<Ranked<'_, T>> {
    let mut ranked: Vec<Ranked<'_, T>> = items
        .iter()
        .map(|item| Ranked {
            item,
            distance_km: point.haversine_km(&item.position()),
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(k);
    ranked
}

/// The single closest item to `point`.
///
/// Earliest item wins a tie, matching [`rank_by_distance`].
pub fn nearest<T: Located>(point: Coordinate, items: &[T]) -> Result<Ranked<'_, T>, NoStationsAvailable> {
    items
        .iter()
        .map(|item| Ranked {
            item,
            distance_km: point.haversine_km(&item.position()),
        })
        .reduce(|best, next| {
            if next.distance_km < best.distance_km {
                next
            } else {
                best
            }
        })
        .ok_or(NoStationsAvailable)
}
