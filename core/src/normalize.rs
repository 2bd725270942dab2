//! Total normalization from raw backend snapshots to the view model.

use crate::court::CourtPoint;
use crate::live_stats::{JobStatus, RawLiveStats};
use crate::view::{
    KitchenView, OperationalView, RallyView, SpatialView, ViewModel, ZoneCountsView,
    ASSUMED_FRAME_RATE,
};

/// Converts one raw snapshot into the fully defaulted [`ViewModel`].
///
/// Total over every input shape: a `None` body, missing sections and
/// wrong-typed fields all collapse to the documented defaults. This is the
/// only place optionality is resolved; nothing downstream handles absence.
pub fn normalize(raw: Option<&RawLiveStats>) -> ViewModel {
    let stats = raw.and_then(|r| r.stats.as_ref());

    let rally_raw = stats.and_then(|s| s.rally.as_ref());
    let current_rally_s = rally_raw.and_then(|r| r.current_rally_s).unwrap_or(0.0);
    let rally = RallyView {
        is_active: rally_raw.and_then(|r| r.is_active).unwrap_or(false),
        current_rally_s,
        avg_rally_s: rally_raw.and_then(|r| r.avg_rally_s).unwrap_or(0.0),
        longest_rally_s: rally_raw.and_then(|r| r.longest_rally_s).unwrap_or(0.0),
        tempo_rallies_per_min: rally_raw
            .and_then(|r| r.tempo_rallies_per_min)
            .unwrap_or(0.0),
        rally_frame_count: (current_rally_s * ASSUMED_FRAME_RATE).round() as u64,
    };

    let kitchen_raw = stats.and_then(|s| s.kitchen.as_ref());
    let mut players_in_kitchen = [false; 2];
    if let Some(indices) = kitchen_raw.and_then(|k| k.players_in_kitchen.as_ref()) {
        for &index in indices {
            if let Some(slot) = players_in_kitchen.get_mut(index as usize) {
                *slot = true;
            }
        }
    }
    let zones_raw = kitchen_raw.and_then(|k| k.zone_counts.as_ref());
    let kitchen = KitchenView {
        players_in_kitchen,
        zone_counts: ZoneCountsView {
            backcourt_top: zones_raw.and_then(|z| z.backcourt_top).unwrap_or(0),
            kitchen: zones_raw.and_then(|z| z.kitchen).unwrap_or(0),
            backcourt_bottom: zones_raw.and_then(|z| z.backcourt_bottom).unwrap_or(0),
        },
    };

    let spatial_raw = stats.and_then(|s| s.spatial.as_ref());
    let players_raw = spatial_raw.and_then(|s| s.player_birdseye.as_ref());
    let spatial = SpatialView {
        ball: CourtPoint::from_raw(spatial_raw.and_then(|s| s.ball_birdseye.as_ref())),
        players: [
            CourtPoint::from_raw(players_raw.and_then(|m| m.get("0"))),
            CourtPoint::from_raw(players_raw.and_then(|m| m.get("1"))),
        ],
    };

    let operational_raw = stats.and_then(|s| s.operational.as_ref());
    let operational = OperationalView {
        fps: operational_raw.and_then(|o| o.fps).unwrap_or(0.0),
        current_frame: operational_raw.and_then(|o| o.current_frame).unwrap_or(0),
        total_frames: operational_raw.and_then(|o| o.total_frames).unwrap_or(0),
    };

    ViewModel {
        rally,
        kitchen,
        spatial,
        operational,
        progress: raw.and_then(|r| r.progress).unwrap_or(0.0),
        status: JobStatus::parse(raw.and_then(|r| r.status.as_deref())),
    }
}
