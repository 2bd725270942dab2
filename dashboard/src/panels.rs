//! Sidebar panels: pure projections of the latest view model.

use courtcore::court::{CourtPoint, COURT_VIEWPORT};
use courtcore::view::ViewModel;
use iced::widget::{column, row, text, Column};
use iced::{Alignment, Element, Length};

use crate::Message;

pub fn stat_tiles(model: &ViewModel) -> Element<'static, Message> {
    let rally_state = if model.rally.is_active {
        "RALLY LIVE"
    } else {
        "IDLE"
    };

    column![
        text("Ball Tempo").size(16),
        row![
            text(format!("{:.1}", model.rally.tempo_rallies_per_min)).size(30),
            text("R/MIN").size(14),
        ]
        .spacing(6)
        .align_y(Alignment::End),
        text("Rallies per minute").size(10),
        row![
            text(format!("{}", model.rally.rally_frame_count)).size(24),
            text("frames").size(12),
        ]
        .spacing(6)
        .align_y(Alignment::End),
        text(format!("Current rally - {rally_state}")).size(12),
        text(format!(
            "Avg rally {:.1}s / longest {:.1}s",
            model.rally.avg_rally_s, model.rally.longest_rally_s
        ))
        .size(10),
        text(format!("FPS {:.1}", model.operational.fps)).size(12),
        text(format!(
            "Frame {}/{}",
            model.operational.current_frame, model.operational.total_frames
        ))
        .size(12),
    ]
    .spacing(4)
    .into()
}

pub fn zone_table(model: &ViewModel) -> Element<'static, Message> {
    let zones = [
        ("Top Backcrt", model.kitchen.zone_counts.backcourt_top),
        ("Kitchen", model.kitchen.zone_counts.kitchen),
        ("Bot Backcrt", model.kitchen.zone_counts.backcourt_bottom),
    ];

    zones
        .iter()
        .fold(
            Column::new().push(text("Zone Intrusions").size(16)).spacing(4),
            |col, (name, count)| {
                col.push(
                    row![
                        text(*name).size(12).width(Length::Fill),
                        text(format!("{count}")).size(12),
                        text("Hits").size(12),
                    ]
                    .spacing(8),
                )
            },
        )
        .into()
}

pub fn spatial_readout(model: &ViewModel) -> Element<'static, Message> {
    let mut occupants = Vec::new();
    if model.kitchen.player_in_kitchen(0) {
        occupants.push("A");
    }
    if model.kitchen.player_in_kitchen(1) {
        occupants.push("B");
    }
    let occupancy = if occupants.is_empty() {
        "Kitchen clear".to_string()
    } else {
        format!("In kitchen: {}", occupants.join(", "))
    };

    column![
        text("Spatial").size(16),
        text(format!("Ball {}", coordinate_label(&model.spatial.ball))).size(12),
        text(format!(
            "Player A {}",
            coordinate_label(&model.spatial.players[0])
        ))
        .size(12),
        text(format!(
            "Player B {}",
            coordinate_label(&model.spatial.players[1])
        ))
        .size(12),
        text(occupancy).size(12),
        text("Verdict").size(16),
        text("IN").size(30),
        text("Confidence 98.6%").size(10),
    ]
    .spacing(4)
    .into()
}

fn coordinate_label(point: &CourtPoint) -> String {
    match COURT_VIEWPORT.map(point) {
        Some(coordinate) => format!("({:.0}, {:.0})", coordinate.x, coordinate.y),
        None => "not tracked".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_labels_render_or_mark_untracked() {
        assert_eq!(
            coordinate_label(&CourtPoint::Raw(vec![140.0, 95.0])),
            "(140, 95)"
        );
        assert_eq!(coordinate_label(&CourtPoint::Undrawn), "not tracked");
        assert_eq!(coordinate_label(&CourtPoint::Raw(vec![1.0])), "not tracked");
    }
}
