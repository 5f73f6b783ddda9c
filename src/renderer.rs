use tracing::debug;

use crate::angles::AngleSet;
use crate::config::{ClockConfig, Color, FaceLabel, Theme};
use crate::geometry::{project, Point, Rect};
use crate::scene::{Dash, LineCap, PrimitiveId, Stroke, Surface};
use crate::time::ResolvedTime;

const DIAL_RIM: f64 = 6.0;
const DIAL_OUTLINE: Color = Color::new(0x22, 0x22, 0x22);

const MAJOR_TICK_LENGTH: f64 = 18.0;
const MINOR_TICK_LENGTH: f64 = 8.0;
const MAJOR_TICK_WIDTH: f32 = 3.0;
const MINOR_TICK_WIDTH: f32 = 1.0;

const MARKER_INSET: f64 = 44.0;
const MARKER_DOT_RADIUS: f64 = 10.0;
const TRIANGLE_APEX_INSET: f64 = 20.0;
const TRIANGLE_BASE_INSET: f64 = 40.0;
const TRIANGLE_HALF_SPREAD: f64 = 10.0;

const DATE_WINDOW_WIDTH: f64 = 70.0;
const DATE_WINDOW_HEIGHT: f64 = 48.0;
const DATE_FRAME: Color = Color::new(0x11, 0x11, 0x11);
const DATE_FRAME_OUTLINE: Color = Color::new(0x66, 0x66, 0x66);
const DATE_PANEL: Color = Color::new(0x22, 0x22, 0x22);
const DATE_PANEL_INSET: f64 = 4.0;
const DATE_TEXT: Color = Color::BLACK;
const DATE_TEXT_SIZE: f32 = 20.0;

const CAP_RADIUS: f64 = 8.0;
const CAP_FILL: Color = Color::new(0x11, 0x11, 0x11);
const CAP_OUTLINE: Color = Color::new(0x44, 0x44, 0x44);

const LABEL_MARGIN: f64 = 20.0;
const LABEL_SIZE: f32 = 12.0;

/// Hand length (fraction of the radius) and stroke width.
struct HandStyle {
    length: f64,
    width: f32,
}

const HOUR_HAND: HandStyle = HandStyle { length: 0.52, width: 8.0 };
const MINUTE_HAND: HandStyle = HandStyle { length: 0.78, width: 5.0 };
const SECOND_HAND: HandStyle = HandStyle { length: 0.88, width: 2.0 };
const AUX_HAND: HandStyle = HandStyle { length: 0.62, width: 3.0 };
const AUX_DASH: Dash = Dash { on: 3.0, off: 4.0 };
const SECOND_TIP_RADIUS: f64 = 4.0;

/// Fixed positions shared by both passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceLayout {
    pub center: Point,
    pub radius: f64,
    pub width: f64,
    pub height: f64,
    pub date_window: Point,
}

impl FaceLayout {
    pub fn new(config: &ClockConfig) -> Self {
        let width = config.window_width as f64;
        let height = config.window_height as f64;
        let radius = config.radius;
        let center = Point::new((width / 2.0).floor(), (height / 2.0).floor() - config.center_lift);
        Self {
            center,
            radius,
            width,
            height,
            date_window: center.offset(radius - 50.0, -10.0),
        }
    }

    fn at(&self, radius: f64, angle: f64) -> Point {
        project(self.center, radius, angle)
    }
}

/// Handles drawn by one dynamic pass.
#[derive(Debug, Clone, PartialEq)]
pub struct HandHandles {
    pub hour: PrimitiveId,
    pub minute: PrimitiveId,
    /// Line and tip dot, removed together.
    pub second: [PrimitiveId; 2],
    pub aux: PrimitiveId,
    pub date: PrimitiveId,
    pub label: PrimitiveId,
}

impl HandHandles {
    pub fn ids(&self) -> [PrimitiveId; 7] {
        [
            self.hour,
            self.minute,
            self.second[0],
            self.second[1],
            self.aux,
            self.date,
            self.label,
        ]
    }
}

/// Draws the clock in two passes that share one surface.
///
/// The face pass owns the static handle set and clears the whole surface, so
/// it invalidates the dynamic set too. The hands pass replaces exactly the
/// handles it drew on the previous tick.
#[derive(Debug, Clone)]
pub struct SceneRenderer {
    layout: FaceLayout,
    labels: Vec<FaceLabel>,
    static_handles: Vec<PrimitiveId>,
    dynamic_handles: Option<HandHandles>,
}

impl SceneRenderer {
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            layout: FaceLayout::new(config),
            labels: config.face_labels.clone(),
            static_handles: Vec::new(),
            dynamic_handles: None,
        }
    }

    pub fn layout(&self) -> &FaceLayout {
        &self.layout
    }

    pub fn static_handles(&self) -> &[PrimitiveId] {
        &self.static_handles
    }

    pub fn dynamic_handles(&self) -> Option<&HandHandles> {
        self.dynamic_handles.as_ref()
    }

    /// Full clear and redraw of everything that does not move.
    pub fn draw_face<S: Surface>(&mut self, surface: &mut S, theme: &Theme) {
        surface.clear();
        self.static_handles.clear();
        self.dynamic_handles = None;

        surface.set_background(theme.background);

        let l = self.layout;
        let mut ids = Vec::with_capacity(80);

        ids.push(surface.oval(
            Rect::square(l.center, l.radius + DIAL_RIM),
            Some(theme.dial),
            Some(Stroke {
                color: DIAL_OUTLINE,
                width: 1.0,
            }),
        ));

        for minute in 0..60 {
            let angle = f64::from(minute) * 6.0;
            let (length, width) = if minute % 5 == 0 {
                (MAJOR_TICK_LENGTH, MAJOR_TICK_WIDTH)
            } else {
                (MINOR_TICK_LENGTH, MINOR_TICK_WIDTH)
            };
            ids.push(surface.line(
                l.at(l.radius - length, angle),
                l.at(l.radius, angle),
                width,
                LineCap::Butt,
                theme.marks,
            ));
        }

        for hour in 0..12 {
            let angle = f64::from(hour) * 30.0;
            let pos = l.at(l.radius - MARKER_INSET, angle);
            let id = match hour {
                0 => surface.polygon(
                    vec![
                        l.at(l.radius - TRIANGLE_APEX_INSET, angle),
                        l.at(l.radius - TRIANGLE_BASE_INSET, angle - TRIANGLE_HALF_SPREAD),
                        l.at(l.radius - TRIANGLE_BASE_INSET, angle + TRIANGLE_HALF_SPREAD),
                    ],
                    theme.marks,
                ),
                3 | 6 | 9 => surface.rectangle(Rect::around(pos, 12.0, 8.0), Some(theme.marks), None),
                _ => surface.oval(Rect::square(pos, MARKER_DOT_RADIUS), Some(theme.marks), None),
            };
            ids.push(id);
        }

        for label in &self.labels {
            ids.push(surface.text(
                l.center.offset(0.0, label.dy),
                label.text.clone(),
                label.size,
                theme.marks,
            ));
        }

        let frame = Rect::around(l.date_window, DATE_WINDOW_WIDTH / 2.0, DATE_WINDOW_HEIGHT / 2.0);
        ids.push(surface.rectangle(
            frame,
            Some(DATE_FRAME),
            Some(Stroke {
                color: DATE_FRAME_OUTLINE,
                width: 2.0,
            }),
        ));
        ids.push(surface.rectangle(frame.inset(DATE_PANEL_INSET), Some(DATE_PANEL), None));

        ids.push(surface.oval(
            Rect::square(l.center, CAP_RADIUS),
            Some(CAP_FILL),
            Some(Stroke {
                color: CAP_OUTLINE,
                width: 1.0,
            }),
        ));

        debug!(theme = %theme.name, primitives = ids.len(), "face drawn");
        self.static_handles = ids;
    }

    /// Replaces last tick's hands, date numeral and city label.
    pub fn draw_hands<S: Surface>(
        &mut self,
        surface: &mut S,
        theme: &Theme,
        time: &ResolvedTime,
        angles: &AngleSet,
        city: &str,
    ) {
        if let Some(previous) = self.dynamic_handles.take() {
            for id in previous.ids() {
                surface.remove(id);
            }
        }

        let l = self.layout;
        let tip = |style: &HandStyle, angle: f64| l.at(l.radius * style.length, angle);

        let hour = surface.line(
            l.center,
            tip(&HOUR_HAND, angles.hour),
            HOUR_HAND.width,
            LineCap::Round,
            theme.hour_hand,
        );
        let minute = surface.line(
            l.center,
            tip(&MINUTE_HAND, angles.minute),
            MINUTE_HAND.width,
            LineCap::Round,
            theme.minute_hand,
        );

        let second_tip = tip(&SECOND_HAND, angles.second);
        let second = [
            surface.line(
                l.center,
                second_tip,
                SECOND_HAND.width,
                LineCap::Round,
                theme.second_hand,
            ),
            surface.oval(
                Rect::square(second_tip, SECOND_TIP_RADIUS),
                Some(theme.second_hand),
                None,
            ),
        ];

        let aux = surface.dashed_line(
            l.center,
            tip(&AUX_HAND, angles.aux),
            AUX_HAND.width,
            AUX_DASH,
            theme.aux_hand,
        );

        let date = surface.text(
            l.date_window,
            time.day_of_month.to_string(),
            DATE_TEXT_SIZE,
            DATE_TEXT,
        );
        let label = surface.text(
            Point::new(l.center.x, l.height - LABEL_MARGIN),
            format!("{city}: {}", time.display),
            LABEL_SIZE,
            theme.marks,
        );

        self.dynamic_handles = Some(HandHandles {
            hour,
            minute,
            second,
            aux,
            date,
            label,
        });
    }
}
