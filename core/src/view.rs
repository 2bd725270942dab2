//! The normalized view model the panels render from.

use crate::court::CourtPoint;
use crate::live_stats::JobStatus;

/// Frame rate assumed when converting rally seconds into a frame count for
/// the stat tiles. A fixed display constant, deliberately not derived from
/// `operational.fps`.
pub const ASSUMED_FRAME_RATE: f64 = 30.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RallyView {
    pub is_active: bool,
    pub current_rally_s: f64,
    pub avg_rally_s: f64,
    pub longest_rally_s: f64,
    pub tempo_rallies_per_min: f64,
    /// Derived once at normalization time from `current_rally_s` and
    /// [`ASSUMED_FRAME_RATE`].
    pub rally_frame_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KitchenView {
    /// Non-volley-zone occupancy flag per player index.
    pub players_in_kitchen: [bool; 2],
    pub zone_counts: ZoneCountsView,
}

impl KitchenView {
    pub fn player_in_kitchen(&self, index: usize) -> bool {
        self.players_in_kitchen.get(index).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneCountsView {
    pub backcourt_top: u64,
    pub kitchen: u64,
    pub backcourt_bottom: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpatialView {
    pub ball: CourtPoint,
    pub players: [CourtPoint; 2],
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationalView {
    pub fps: f64,
    pub current_frame: u64,
    pub total_frames: u64,
}

/// Fully defaulted telemetry record. Every field is always present, so no
/// panel ever observes an absent value; the all-defaults `Default` value is
/// what the store holds before the first successful poll.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewModel {
    pub rally: RallyView,
    pub kitchen: KitchenView,
    pub spatial: SpatialView,
    pub operational: OperationalView,
    /// Fraction complete in [0, 1]. Formatting to a percentage happens at
    /// render time; the stored value stays numeric.
    pub progress: f64,
    pub status: JobStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_is_fully_defaulted() {
        let model = ViewModel::default();
        assert!(!model.rally.is_active);
        assert_eq!(model.rally.tempo_rallies_per_min, 0.0);
        assert_eq!(model.kitchen.players_in_kitchen, [false, false]);
        assert_eq!(model.spatial.ball, CourtPoint::Undrawn);
        assert_eq!(model.spatial.players[0], CourtPoint::Undrawn);
        assert_eq!(model.operational.total_frames, 0);
        assert_eq!(model.progress, 0.0);
        assert_eq!(model.status, JobStatus::Processing);
    }

    #[test]
    fn kitchen_lookup_is_bounds_safe() {
        let kitchen = KitchenView {
            players_in_kitchen: [true, false],
            ..Default::default()
        };
        assert!(kitchen.player_in_kitchen(0));
        assert!(!kitchen.player_in_kitchen(1));
        assert!(!kitchen.player_in_kitchen(7));
    }
}
