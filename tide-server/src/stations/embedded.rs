//! Compiled-in station table.
//!
//! NOAA CO-OPS tide prediction stations around Long Island Sound and
//! southern New England: (id, name, lat, lon).

pub(super) const EMBEDDED_STATIONS: &[(&str, &str, f64, f64)] = &[
    ("8467150", "Bridgeport, CT", 41.1758, -73.1839),
    ("8465705", "New Haven, CT", 41.2833, -72.9083),
    ("8461490", "New London, CT", 41.3614, -72.0900),
    ("8516945", "Kings Point, NY", 40.8103, -73.7649),
    ("8518750", "The Battery, NY", 40.7006, -74.0142),
    ("8514560", "Port Jefferson, NY", 40.9517, -73.0767),
    ("8510560", "Montauk, NY", 41.0483, -71.9594),
    ("8531680", "Sandy Hook, NJ", 40.4669, -74.0094),
    ("8452660", "Newport, RI", 41.5043, -71.3261),
    ("8454000", "Providence, RI", 41.8071, -71.4012),
    ("8447930", "Woods Hole, MA", 41.5236, -70.6711),
    ("8443970", "Boston, MA", 42.3539, -71.0503),
];
