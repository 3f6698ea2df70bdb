//! Read-side projection of a supervisor's schedule: the ordered list of
//! stops for each working day.

use serde::{Deserialize, Serialize};

use crate::store::Coordinates;
use crate::weekday::Weekday;

/// One planned visit joined with the attributes of the store being visited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    pub weekday: Weekday,
    /// Position of the stop within its day, starting at 1.
    pub visit_order: i32,
    pub store_id: String,
    pub store_name: String,
    pub tier: Option<i16>,
    pub coordinates: Option<Coordinates>,
}

/// A stop that can be placed on a map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPin {
    pub store_id: String,
    pub store_name: String,
    pub visit_order: i32,
    pub latitude: f64,
    pub longitude: f64,
}

/// All stops planned for a single weekday, in visit order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRoute {
    pub weekday: Weekday,
    pub stops: Vec<RouteStop>,
}

impl DailyRoute {
    #[must_use]
    pub fn visit_count(&self) -> usize {
        self.stops.len()
    }

    /// Mean tier of the day's stores, skipping stores with no tier.
    #[must_use]
    pub fn mean_tier(&self) -> Option<f64> {
        let tiers: Vec<f64> = self
            .stops
            .iter()
            .filter_map(|s| s.tier)
            .map(f64::from)
            .collect();
        if tiers.is_empty() {
            return None;
        }
        let count = f64::from(u32::try_from(tiers.len()).unwrap_or(u32::MAX));
        Some(tiers.iter().sum::<f64>() / count)
    }

    /// Stops with known coordinates. Stops without them stay on the route but
    /// are left off the map.
    #[must_use]
    pub fn map_pins(&self) -> Vec<MapPin> {
        self.stops
            .iter()
            .filter_map(|stop| {
                stop.coordinates.map(|c| MapPin {
                    store_id: stop.store_id.clone(),
                    store_name: stop.store_name.clone(),
                    visit_order: stop.visit_order,
                    latitude: c.latitude,
                    longitude: c.longitude,
                })
            })
            .collect()
    }
}

/// Groups stops by weekday, Monday first, each day sorted by visit order.
///
/// Days with no stops are omitted.
#[must_use]
pub fn group_by_day(mut stops: Vec<RouteStop>) -> Vec<DailyRoute> {
    stops.sort_by(|a, b| {
        a.weekday
            .cmp(&b.weekday)
            .then(a.visit_order.cmp(&b.visit_order))
    });

    let mut days: Vec<DailyRoute> = Vec::new();
    for stop in stops {
        match days.last_mut() {
            Some(day) if day.weekday == stop.weekday => day.stops.push(stop),
            _ => days.push(DailyRoute {
                weekday: stop.weekday,
                stops: vec![stop],
            }),
        }
    }
    days
}
