//! Plain-text rendering of facilities.

use std::fmt::Write as _;

use spotty_core::{Coordinate, Facility};

fn yes_no(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => "unknown",
    }
}

fn cleanliness(facility: &Facility) -> String {
    match facility.average_cleanliness {
        Some(avg) => format!("{avg:.1}/5 ({} ratings)", facility.rating_count),
        None => "not rated".to_owned(),
    }
}

/// Facilities paired with their distance from `reference`, nearest first.
pub fn nearest_first(facilities: &[Facility], reference: Coordinate) -> Vec<(&Facility, f64)> {
    let mut ranked: Vec<_> = facilities
        .iter()
        .map(|f| (f, reference.distance_km(&f.location)))
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked
}

/// One line per facility, suitable for lists.
pub fn summary(facility: &Facility, distance_km: Option<f64>) -> String {
    let mut line = format!("[{}] {}", facility.id, facility.name);
    if let Some(d) = distance_km {
        let _ = write!(line, " ({d:.2} km)");
    }
    let _ = write!(
        line,
        " | {} | water: {} | winter: {} | gender neutral: {} | {}",
        if facility.is_free { "free" } else { "paid" },
        yes_no(facility.running_water),
        yes_no(facility.open_in_winter),
        yes_no(facility.gender_neutral),
        cleanliness(facility),
    );
    line
}

pub fn list(facilities: &[Facility], reference: Option<Coordinate>) -> String {
    if facilities.is_empty() {
        return "No facilities found nearby.\n".to_owned();
    }
    let mut out = String::new();
    match reference {
        Some(center) => {
            for (facility, distance) in nearest_first(facilities, center) {
                let _ = writeln!(out, "{}", summary(facility, Some(distance)));
            }
        }
        None => {
            for facility in facilities {
                let _ = writeln!(out, "{}", summary(facility, None));
            }
        }
    }
    out
}

/// Every known attribute of one facility.
pub fn details(facility: &Facility) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", facility.name, facility.id);
    let _ = writeln!(out, "  location:           {}", facility.location);
    let _ = writeln!(out, "  free:               {}", yes_no(Some(facility.is_free)));
    let _ = writeln!(out, "  running water:      {}", yes_no(facility.running_water));
    let _ = writeln!(out, "  open in winter:     {}", yes_no(facility.open_in_winter));
    let _ = writeln!(out, "  gender neutral:     {}", yes_no(facility.gender_neutral));
    let _ = writeln!(out, "  wheelchair:         {}", yes_no(facility.wheelchair));
    let _ = writeln!(out, "  indoor:             {}", yes_no(facility.indoor));
    let _ = writeln!(out, "  baby change:        {}", yes_no(facility.baby_change));
    let _ = writeln!(out, "  menstrual products: {}", yes_no(facility.menstrual_products));
    let _ = writeln!(out, "  cleanliness:        {}", cleanliness(facility));
    out
}
