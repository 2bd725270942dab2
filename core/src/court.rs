//! Bird's-eye court coordinate space and the raw-to-viewport mapping.

/// Position candidate for one tracked entity, as carried by the view model.
///
/// `Undrawn` means "no usable position this frame" and is deliberately
/// distinct from a real coordinate at the origin.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CourtPoint {
    #[default]
    Undrawn,
    /// Raw coordinate components, not yet checked for arity or finiteness.
    Raw(Vec<f64>),
}

impl CourtPoint {
    pub fn from_raw(raw: Option<&Vec<f64>>) -> Self {
        match raw {
            Some(components) => CourtPoint::Raw(components.clone()),
            None => CourtPoint::Undrawn,
        }
    }
}

/// A validated position inside the court drawing space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCoordinate {
    pub x: f32,
    pub y: f32,
}

/// Fixed drawing space for the bird's-eye court diagram, far baseline at
/// y = 0 and near baseline at y = height.
///
/// The backend homography already emits coordinates in this space, so the
/// mapping is the identity. Out-of-viewport values pass through and land
/// off-canvas; no clamping is performed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// Court dimensions used by the backend homography and the court diagram.
pub const COURT_VIEWPORT: Viewport = Viewport {
    width: 400.0,
    height: 880.0,
};

impl Viewport {
    /// Maps a raw point into this viewport. Returns `None` ("skip, draw
    /// nothing") unless the point holds exactly two finite components;
    /// valid pairs map to themselves.
    pub fn map(&self, point: &CourtPoint) -> Option<RenderCoordinate> {
        match point {
            CourtPoint::Undrawn => None,
            CourtPoint::Raw(components) => match components.as_slice() {
                [x, y] if x.is_finite() && y.is_finite() => Some(RenderCoordinate {
                    x: *x as f32,
                    y: *y as f32,
                }),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_pairs_map_to_themselves() {
        let mapped = COURT_VIEWPORT
            .map(&CourtPoint::Raw(vec![140.0, 95.0]))
            .unwrap();
        assert_eq!(mapped, RenderCoordinate { x: 140.0, y: 95.0 });
    }

    #[test]
    fn out_of_viewport_values_pass_through_unclamped() {
        let mapped = COURT_VIEWPORT
            .map(&CourtPoint::Raw(vec![-25.0, 1200.0]))
            .unwrap();
        assert_eq!(mapped, RenderCoordinate { x: -25.0, y: 1200.0 });
    }

    #[test]
    fn undrawn_sentinel_is_skipped() {
        assert_eq!(COURT_VIEWPORT.map(&CourtPoint::Undrawn), None);
    }

    #[test]
    fn wrong_arity_is_skipped() {
        assert_eq!(COURT_VIEWPORT.map(&CourtPoint::Raw(vec![])), None);
        assert_eq!(COURT_VIEWPORT.map(&CourtPoint::Raw(vec![140.0])), None);
        assert_eq!(
            COURT_VIEWPORT.map(&CourtPoint::Raw(vec![1.0, 2.0, 3.0])),
            None
        );
    }

    #[test]
    fn non_finite_components_are_skipped() {
        assert_eq!(
            COURT_VIEWPORT.map(&CourtPoint::Raw(vec![f64::NAN, 10.0])),
            None
        );
        assert_eq!(
            COURT_VIEWPORT.map(&CourtPoint::Raw(vec![10.0, f64::INFINITY])),
            None
        );
    }

    #[test]
    fn undrawn_differs_from_origin() {
        assert_ne!(CourtPoint::Undrawn, CourtPoint::Raw(vec![0.0, 0.0]));
    }
}
