//! Status line texts.

pub const LOADING: &str = "Loading point data…";
pub const REQUESTING_LOCATION: &str = "Requesting location…";
pub const LOCATION_SET: &str = "Location set.";

pub fn loaded(points: usize) -> String {
    format!("Loaded {} points. Ready.", points)
}

pub fn load_failed(reason: &str) -> String {
    format!("Failed to load points: {}", reason)
}

pub fn showing_points(zoom: f64) -> String {
    format!("Showing points (zoom {}+).", zoom)
}

pub fn zoom_in_to_see(min_zoom: f64) -> String {
    format!("Zoom in to see points (>= {}).", min_zoom)
}

pub fn invalid_radius(reason: &str) -> String {
    format!("{}. Keeping the previous radius.", reason)
}

pub fn invalid_center(reason: &str) -> String {
    format!("{}. Keeping the previous center.", reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_zoom_has_no_fraction() {
        assert_eq!(showing_points(12.0), "Showing points (zoom 12+).");
        assert_eq!(zoom_in_to_see(10.0), "Zoom in to see points (>= 10).");
        assert_eq!(showing_points(10.5), "Showing points (zoom 10.5+).");
    }

    #[test]
    fn test_load_messages() {
        assert_eq!(loaded(3), "Loaded 3 points. Ready.");
        assert_eq!(load_failed("HTTP 404"), "Failed to load points: HTTP 404");
    }

    #[test]
    fn test_rejected_input_messages() {
        assert_eq!(
            invalid_center("Invalid coordinate: (NaN, 0)"),
            "Invalid coordinate: (NaN, 0). Keeping the previous center."
        );
        assert!(invalid_radius("Invalid radius: -1").ends_with("previous radius."));
    }
}
