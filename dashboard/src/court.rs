//! Bird's-eye court canvas.

use courtcore::court::COURT_VIEWPORT;
use courtcore::view::{KitchenView, SpatialView, ViewModel};
use iced::{
    mouse,
    widget::canvas::{self, Frame, Geometry, Path, Stroke, Text},
    Color, Point, Rectangle, Renderer, Size, Theme, Vector,
};

// Court bands in viewport coordinates, matching the backend homography.
const KITCHEN_TOP: f32 = 300.0;
const KITCHEN_BOTTOM: f32 = 580.0;
const NET_Y: f32 = 440.0;

pub struct CourtMap {
    spatial: SpatialView,
    kitchen: KitchenView,
}

impl CourtMap {
    pub fn new(model: &ViewModel) -> Self {
        Self {
            spatial: model.spatial.clone(),
            kitchen: model.kitchen.clone(),
        }
    }
}

impl<Message> canvas::Program<Message> for CourtMap {
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
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.02, 0.02, 0.04),
        );

        // Scale the fixed viewport into the widget bounds; marker positions
        // stay in viewport coordinates and inherit the transform, so the
        // identity mapping contract is untouched.
        let scale = (bounds.width / COURT_VIEWPORT.width)
            .min(bounds.height / COURT_VIEWPORT.height)
            .max(f32::EPSILON);
        frame.translate(Vector::new(
            (bounds.width - COURT_VIEWPORT.width * scale) / 2.0,
            (bounds.height - COURT_VIEWPORT.height * scale) / 2.0,
        ));
        frame.scale(scale);

        let court_size = Size::new(COURT_VIEWPORT.width, COURT_VIEWPORT.height);
        frame.fill_rectangle(Point::ORIGIN, court_size, Color::from_rgb(0.14, 0.30, 0.19));
        frame.fill_rectangle(
            Point::new(0.0, KITCHEN_TOP),
            Size::new(COURT_VIEWPORT.width, KITCHEN_BOTTOM - KITCHEN_TOP),
            Color::from_rgb(0.10, 0.25, 0.15),
        );

        let line_color = Color::from_rgba(1.0, 1.0, 1.0, 0.7);
        let lines = Path::new(|builder| {
            // border
            builder.rectangle(Point::ORIGIN, court_size);
            // kitchen lines
            builder.move_to(Point::new(0.0, KITCHEN_TOP));
            builder.line_to(Point::new(COURT_VIEWPORT.width, KITCHEN_TOP));
            builder.move_to(Point::new(0.0, KITCHEN_BOTTOM));
            builder.line_to(Point::new(COURT_VIEWPORT.width, KITCHEN_BOTTOM));
            // center lines, broken across the kitchen
            let center_x = COURT_VIEWPORT.width / 2.0;
            builder.move_to(Point::new(center_x, 0.0));
            builder.line_to(Point::new(center_x, KITCHEN_TOP));
            builder.move_to(Point::new(center_x, KITCHEN_BOTTOM));
            builder.line_to(Point::new(center_x, COURT_VIEWPORT.height));
        });
        frame.stroke(&lines, Stroke::default().with_width(4.0).with_color(line_color));

        let net = Path::new(|builder| {
            builder.move_to(Point::new(-10.0, NET_Y));
            builder.line_to(Point::new(COURT_VIEWPORT.width + 10.0, NET_Y));
        });
        frame.stroke(
            &net,
            Stroke::default()
                .with_width(6.0)
                .with_color(Color::from_rgba(1.0, 1.0, 1.0, 0.9)),
        );

        for (index, point) in self.spatial.players.iter().enumerate() {
            let Some(coordinate) = COURT_VIEWPORT.map(point) else {
                continue;
            };
            let in_kitchen = self.kitchen.player_in_kitchen(index);
            let fill = if in_kitchen {
                Color::from_rgb(0.85, 0.15, 0.15)
            } else if index == 0 {
                Color::from_rgb(0.18, 0.75, 0.42)
            } else {
                Color::from_rgb(0.18, 0.65, 0.89)
            };
            let center = Point::new(coordinate.x, coordinate.y);

            let halo = Path::new(|builder| builder.circle(center, 20.0));
            frame.fill(&halo, Color { a: 0.25, ..fill });
            let marker = Path::new(|builder| builder.circle(center, 12.0));
            frame.fill(&marker, fill);

            frame.fill_text(Text {
                content: if index == 0 { "A".into() } else { "B".into() },
                position: Point::new(center.x - 5.0, center.y - 8.0),
                color: Color::from_rgb(0.05, 0.07, 0.09),
                size: 14.0.into(),
                ..Text::default()
            });
        }

        if let Some(coordinate) = COURT_VIEWPORT.map(&self.spatial.ball) {
            let ball = Path::new(|builder| {
                builder.circle(Point::new(coordinate.x, coordinate.y), 8.0)
            });
            frame.fill(&ball, Color::from_rgb(1.0, 0.88, 0.25));
        }

        vec![frame.into_geometry()]
    }
}
