//! Stream surface and timeline: the live frame viewport, play/pause
//! control, progress bar, and the static annotation track.

use courtcore::live_stats::JobStatus;
use courtcore::view::ViewModel;
use iced::{
    mouse,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Text},
        column, container, image, row, text,
    },
    Color, Element, Length, Point, Rectangle, Renderer, Size, Theme,
};

use crate::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerKind {
    Score,
    Foul,
    Key,
}

impl MarkerKind {
    fn color(self) -> Color {
        match self {
            MarkerKind::Score => Color::from_rgb(0.18, 0.75, 0.42),
            MarkerKind::Foul => Color::from_rgb(0.85, 0.25, 0.25),
            MarkerKind::Key => Color::from_rgb(0.95, 0.75, 0.20),
        }
    }
}

struct TimelineMarker {
    position_pct: f32,
    kind: MarkerKind,
    label: &'static str,
}

// Static annotation track; intentionally not derived from the live
// snapshot.
const TIMELINE_MARKERS: [TimelineMarker; 7] = [
    TimelineMarker { position_pct: 12.0, kind: MarkerKind::Score, label: "Score 1-0" },
    TimelineMarker { position_pct: 25.0, kind: MarkerKind::Foul, label: "Foot Fault" },
    TimelineMarker { position_pct: 38.0, kind: MarkerKind::Score, label: "Score 3-2" },
    TimelineMarker { position_pct: 52.0, kind: MarkerKind::Key, label: "Rally 14 shots" },
    TimelineMarker { position_pct: 65.0, kind: MarkerKind::Foul, label: "Kitchen Violation" },
    TimelineMarker { position_pct: 74.0, kind: MarkerKind::Score, label: "Score 8-6" },
    TimelineMarker { position_pct: 88.0, kind: MarkerKind::Key, label: "Match Point" },
];

pub fn surface<'a>(
    playing: bool,
    frame: Option<&image::Handle>,
    model: &ViewModel,
) -> Element<'a, Message> {
    let viewport: Element<'a, Message> = if !playing {
        container(text("STREAM PAUSED").size(18))
            .width(Length::Fill)
            .height(Length::Fixed(380.0))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    } else if let Some(handle) = frame {
        image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fixed(380.0))
            .into()
    } else {
        container(text("AWAITING FRAMES").size(14))
            .width(Length::Fill)
            .height(Length::Fixed(380.0))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    };

    let badge = match model.status {
        JobStatus::Processing => "LIVE - PROCESSING",
        JobStatus::Completed => "COMPLETED",
        JobStatus::Failed => "FAILED",
    };

    column![
        viewport,
        row![
            text("REC").size(11),
            text("CAM 01 - NORTH BASELINE").size(11),
            text(badge).size(11),
        ]
        .spacing(16),
    ]
    .spacing(6)
    .into()
}

pub fn timeline(model: &ViewModel) -> Element<'static, Message> {
    let bar = Canvas::new(TimelineBar {
        progress: model.progress as f32,
    })
    .width(Length::Fill)
    .height(Length::Fixed(28.0));

    let legend = row![
        text("\u{25cf} Score").size(9),
        text("\u{25cf} Foul").size(9),
        text("\u{25cf} Key Moment").size(9),
    ]
    .spacing(12);

    column![bar, legend].spacing(4).into()
}

pub fn controls(playing: bool, model: &ViewModel) -> Element<'static, Message> {
    let toggle_label = if playing { "Pause" } else { "Play" };
    row![
        button(toggle_label)
            .on_press(Message::TogglePlayback)
            .padding(8),
        text(format!("{:.1}% / 100%", model.progress * 100.0)).size(12),
        text(format!(
            "frame {}/{}",
            model.operational.current_frame, model.operational.total_frames
        ))
        .size(12),
    ]
    .spacing(16)
    .into()
}

struct TimelineBar {
    progress: f32,
}

impl<Message> canvas::Program<Message> for TimelineBar {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let bar_height = 6.0;
        let bar_top = bounds.height / 2.0 - bar_height / 2.0;

        frame.fill_rectangle(
            Point::new(0.0, bar_top),
            Size::new(bounds.width, bar_height),
            Color::from_rgb(0.15, 0.17, 0.20),
        );

        let fill_width = bounds.width * self.progress.clamp(0.0, 1.0);
        frame.fill_rectangle(
            Point::new(0.0, bar_top),
            Size::new(fill_width, bar_height),
            Color::from_rgb(0.18, 0.75, 0.42),
        );

        let playhead = Path::new(|builder| {
            builder.circle(Point::new(fill_width, bounds.height / 2.0), 5.0)
        });
        frame.fill(&playhead, Color::from_rgb(0.18, 0.75, 0.42));

        for marker in &TIMELINE_MARKERS {
            let x = bounds.width * marker.position_pct / 100.0;
            let dot = Path::new(|builder| {
                builder.circle(Point::new(x, bounds.height / 2.0), 3.5)
            });
            frame.fill(&dot, marker.kind.color());
            frame.fill_text(Text {
                content: marker.label.to_string(),
                position: Point::new(x - 14.0, 1.0),
                color: marker.kind.color(),
                size: 8.0.into(),
                ..Text::default()
            });
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeline_markers_sit_inside_the_bar() {
        for marker in &TIMELINE_MARKERS {
            assert!(marker.position_pct > 0.0 && marker.position_pct < 100.0);
            assert!(!marker.label.is_empty());
        }
    }

    #[test]
    fn marker_kinds_have_distinct_colors() {
        assert_ne!(MarkerKind::Score.color(), MarkerKind::Foul.color());
        assert_ne!(MarkerKind::Foul.color(), MarkerKind::Key.color());
    }
}
