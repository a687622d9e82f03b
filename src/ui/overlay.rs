/// Gesture feedback drawn over the grid: the rubber band and the drop marker
use iced::widget::canvas::{self, Path, Program, Stroke};
use iced::mouse::Cursor;
use iced::{Point, Rectangle, Renderer, Size, Theme, Vector};

use crate::Message;

const DROP_MARKER_WIDTH: f32 = 3.0;

/// Overlay geometry in grid content coordinates, shifted by `scroll_y`
/// when drawn
#[derive(Debug, Clone, Default)]
pub struct GestureOverlay {
    pub band: Option<Rectangle>,
    /// Top of the drop line and its height
    pub marker: Option<(Point, f32)>,
    pub scroll_y: f32,
}

impl Program<Message> for GestureOverlay {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let palette = theme.extended_palette();
        let shift = Vector::new(0.0, -self.scroll_y);

        if let Some(band) = self.band {
            let band = Path::rectangle(band.position() + shift, band.size());
            let mut fill = palette.primary.base.color;
            fill.a = 0.2;
            frame.fill(&band, fill);
            frame.stroke(
                &band,
                Stroke::default()
                    .with_color(palette.primary.strong.color)
                    .with_width(1.0),
            );
        }

        if let Some((top, height)) = self.marker {
            let line = Path::rectangle(
                Point::new(top.x - DROP_MARKER_WIDTH / 2.0, top.y) + shift,
                Size::new(DROP_MARKER_WIDTH, height),
            );
            frame.fill(&line, palette.primary.strong.color);
        }

        vec![frame.into_geometry()]
    }
}
