use crate::analyzers::types::{MapLayer, MapMarker};
use crate::records::{CityAggregate, SpeedTier};
use tracing::debug;

/// One marker per aggregate row that has coordinates and a download value.
pub fn map_markers(rows: &[CityAggregate]) -> MapLayer {
    let mut layer = MapLayer::default();

    for row in rows {
        let (Some(latitude), Some(longitude), Some(download)) =
            (row.latitude, row.longitude, row.download_speed_mbps)
        else {
            layer.skipped += 1;
            continue;
        };

        layer.markers.push(MapMarker {
            latitude,
            longitude,
            provider: row.provider.clone(),
            location: row.location_name.clone(),
            download,
            upload: row.upload(),
            tier: SpeedTier::classify(download),
        });
    }

    debug!(
        added = layer.markers.len(),
        skipped = layer.skipped,
        "Map markers built"
    );

    layer
}
