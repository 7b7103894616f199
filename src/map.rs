use crate::types::Record;

/// A scatter of business locations, ready for a map renderer.
#[derive(Debug, Clone, Default)]
pub struct MapView {
    /// (latitude, longitude) pairs in record order.
    pub points: Vec<(f64, f64)>,
    /// Rows plotted with at least one coordinate inherited from the previous
    /// record.
    pub forward_filled: usize,
    /// Leading rows with missing coordinates and nothing yet to inherit.
    pub dropped: usize,
}

/// Project (latitude, longitude) for every record, forward-filling missing
/// coordinates from the previous record in the set.
///
/// The fill is per coordinate: a business with no location inherits whichever
/// prior business last had one, even an unrelated one. `forward_filled`
/// counts how often that happened so the renderer can disclose it.
pub fn build_map(records: &[Record]) -> MapView {
    let mut view = MapView::default();
    let mut last_lat: Option<f64> = None;
    let mut last_lon: Option<f64> = None;

    for r in records {
        let lat = r.latitude.or(last_lat);
        let lon = r.longitude.or(last_lon);
        match (lat, lon) {
            (Some(la), Some(lo)) => {
                if r.latitude.is_none() || r.longitude.is_none() {
                    view.forward_filled += 1;
                }
                last_lat = Some(la);
                last_lon = Some(lo);
                view.points.push((la, lo));
            }
            _ => {
                view.dropped += 1;
                last_lat = lat;
                last_lon = lon;
            }
        }
    }
    view
}
