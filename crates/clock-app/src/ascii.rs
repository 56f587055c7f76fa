//! Character-cell rendering of the clock face.

use clock_face::{FaceScene, HandLines, LineSegment, Mark, Surface};
use money_timer::WorkSession;

const HOUR: char = '#';
const MINUTE: char = '*';
const SECOND: char = '.';
const TICK: char = '+';
const CENTER: char = 'o';
const BAR_CELLS: usize = 20;

/// A surface that keeps the latest scene and rasterizes it on demand.
#[derive(Debug)]
pub struct AsciiSurface {
    columns: usize,
    canvas: f64,
    scene: Option<FaceScene>,
    hands: Option<HandLines>,
    renders: u64,
}

impl AsciiSurface {
    /// Surface `columns` characters wide. Rows are half as many since
    /// terminal cells are roughly twice as tall as they are wide.
    pub fn new(columns: usize) -> Self {
        Self {
            columns: columns.max(9),
            canvas: 0.0,
            scene: None,
            hands: None,
            renders: 0,
        }
    }

    /// Number of full renders received.
    pub fn renders(&self) -> u64 {
        self.renders
    }

    fn rows(&self) -> usize {
        (self.columns / 2).max(5)
    }

    /// Rasterize the face.
    pub fn frame(&self) -> String {
        let cols = self.columns;
        let rows = self.rows();
        let mut grid = vec![vec![' '; cols]; rows];

        let Some(scene) = &self.scene else {
            return String::new();
        };
        let scale_x = (cols - 1) as f64 / self.canvas.max(1.0);
        let scale_y = (rows - 1) as f64 / self.canvas.max(1.0);
        let cells_per_unit = scale_x.max(scale_y);

        let mut plot = |x: f64, y: f64, ch: char| {
            let (cx, cy) = ((x * scale_x).round(), (y * scale_y).round());
            if cx >= 0.0 && cy >= 0.0 {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let (cx, cy) = (cx as usize, cy as usize);
                if let Some(cell) = grid.get_mut(cy).and_then(|row| row.get_mut(cx)) {
                    *cell = ch;
                }
            }
        };

        for mark in &scene.marks {
            match mark {
                Mark::Tick(stroke) => draw_line(&stroke.line, TICK, cells_per_unit, &mut plot),
                Mark::Label { text, at, .. } => {
                    let half = text.chars().count() as f64 / 2.0 / scale_x;
                    for (i, ch) in text.chars().enumerate() {
                        plot(at.x - half + i as f64 / scale_x, at.y, ch);
                    }
                }
            }
        }

        let hands = self.hands.unwrap_or(scene.hands);
        draw_line(&hands.hour.line, HOUR, cells_per_unit, &mut plot);
        draw_line(&hands.minute.line, MINUTE, cells_per_unit, &mut plot);
        draw_line(&hands.second.line, SECOND, cells_per_unit, &mut plot);
        plot(hands.hour.line.start.x, hands.hour.line.start.y, CENTER);

        grid.into_iter()
            .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Surface for AsciiSurface {
    fn resize(&mut self, canvas: f64) {
        self.canvas = canvas;
    }

    fn render(&mut self, scene: &FaceScene) {
        self.scene = Some(scene.clone());
        self.hands = None;
        self.renders += 1;
    }

    fn move_hands(&mut self, hands: &HandLines) {
        self.hands = Some(*hands);
    }
}

/// Plot `line` with one point per grid cell it crosses.
fn draw_line(
    line: &LineSegment,
    ch: char,
    cells_per_unit: f64,
    plot: &mut impl FnMut(f64, f64, char),
) {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let steps = ((line.start.distance(line.end) * cells_per_unit).ceil() as usize).max(1);
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        plot(
            line.start.x + (line.end.x - line.start.x) * t,
            line.start.y + (line.end.y - line.start.y) * t,
            ch,
        );
    }
}

/// One-line timer summary: time, earnings, goal bar and state.
pub fn status_line(session: &WorkSession, bar_width: f64) -> String {
    let progress = session.progress();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let filled = ((progress.fill / bar_width.max(1.0)) * BAR_CELLS as f64).round() as usize;
    let filled = filled.min(BAR_CELLS);

    format!(
        "{}  {}  [{}{}] {}  {}",
        session.elapsed_display(),
        session.earnings_display(),
        "=".repeat(filled),
        " ".repeat(BAR_CELLS - filled),
        progress.label,
        session.state()
    )
}
