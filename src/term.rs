//! Terminal presentation for the `tetrion` binary.
//!
//! The board, the preview and the hold slot all live in one coordinate space;
//! the view renders a window of that space into a [`Frame`] (two terminal
//! columns per cell) and [`TerminalRenderer`] flushes it with crossterm.
//!
//! The board is read straight from the session, since row collapses are not
//! reported as events. Preview and hold are tracked from stamp events only.

use std::collections::HashMap;
use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::core::{GameSession, Layer, SessionEvent};
use crate::types::{PieceKind, Point};

/// One terminal character and the piece that colors it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub kind: Option<PieceKind>,
}

impl Default for Glyph {
    fn default() -> Self {
        Self { ch: ' ', kind: None }
    }
}

/// Fixed-size grid of glyphs, row 0 at the top
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u16,
    height: u16,
    glyphs: Vec<Glyph>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            glyphs: vec![Glyph::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Glyph> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.glyphs[y as usize * self.width as usize + x as usize])
    }

    pub fn put(&mut self, x: u16, y: u16, glyph: Glyph) {
        if x < self.width && y < self.height {
            self.glyphs[y as usize * self.width as usize + x as usize] = glyph;
        }
    }

    /// Write uncolored text, clipped at the right edge
    pub fn put_str(&mut self, x: u16, y: u16, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            let Ok(dx) = u16::try_from(i) else {
                break;
            };
            self.put(x.saturating_add(dx), y, Glyph { ch, kind: None });
        }
    }

    /// Row contents as plain text
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .map(|g| g.ch)
            .collect()
    }
}

/// Tracks the side layers and renders sessions into frames
#[derive(Debug, Clone, Default)]
pub struct GameView {
    preview: HashMap<Point, PieceKind>,
    hold: HashMap<Point, PieceKind>,
    final_stats: Option<(u32, u32)>,
}

impl GameView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one session event into the view
    pub fn apply(&mut self, event: &SessionEvent) {
        match *event {
            SessionEvent::Stamp { layer, kind, cells } => {
                if let Some(map) = self.layer_mut(layer) {
                    map.extend(cells.iter().map(|&p| (p, kind)));
                }
            }
            SessionEvent::Unstamp { layer, cells } => {
                if let Some(map) = self.layer_mut(layer) {
                    cells.iter().for_each(|p| {
                        map.remove(p);
                    });
                }
            }
            SessionEvent::GameOver { lines, level } => self.final_stats = Some((lines, level)),
            SessionEvent::Restarted => *self = Self::default(),
            SessionEvent::Locked { .. }
            | SessionEvent::LinesCleared { .. }
            | SessionEvent::LevelUp { .. } => {}
        }
    }

    fn layer_mut(&mut self, layer: Layer) -> Option<&mut HashMap<Point, PieceKind>> {
        match layer {
            Layer::Board => None,
            Layer::Preview => Some(&mut self.preview),
            Layer::Hold => Some(&mut self.hold),
        }
    }

    pub fn render(&self, session: &GameSession) -> Frame {
        if session.is_game_over() {
            return self.render_end_screen();
        }

        let bounds = session.board().bounds();
        let config = session.config();
        let side = [config.preview, config.hold];

        // window covering the board plus both anchors with their pieces
        let x_min = side.iter().map(|p| p.x - 2).fold(bounds.x_min, i32::min) - 1;
        let x_max = side.iter().map(|p| p.x + 3).fold(bounds.x_max(), i32::max) + 1;
        let y_min = bounds.y_min;
        let y_max = side.iter().map(|p| p.y + 3).fold(bounds.y_max(), i32::max);

        let columns = u16::try_from(x_max - x_min).unwrap_or(u16::MAX);
        let rows = u16::try_from(y_max - y_min).unwrap_or(u16::MAX);
        let mut frame = Frame::new(columns.saturating_mul(2), rows.saturating_add(2));

        for (row, y) in (y_min..y_max).rev().enumerate() {
            let Ok(fy) = u16::try_from(row) else {
                break;
            };
            for (col, x) in (x_min..x_max).enumerate() {
                let Ok(fx) = u16::try_from(col * 2) else {
                    break;
                };
                let p = Point::new(x, y);
                let glyphs = match session.board().get(p) {
                    Some(Some(kind)) => block(kind),
                    Some(None) => [Glyph::default(), Glyph { ch: '.', kind: None }],
                    None => match self.preview.get(&p).or_else(|| self.hold.get(&p)) {
                        Some(&kind) => block(kind),
                        None => [Glyph::default(); 2],
                    },
                };
                frame.put(fx, fy, glyphs[0]);
                frame.put(fx + 1, fy, glyphs[1]);
            }
        }

        let status = format!(
            "Lines: {}  Level: {}  Next: {}  Hold: {}",
            session.lines(),
            session.level(),
            session.next().as_str(),
            session.held().map_or("-", |k| k.as_str()),
        );
        frame.put_str(0, rows.saturating_add(1), &status);
        frame
    }

    fn render_end_screen(&self) -> Frame {
        let (lines, level) = self.final_stats.unwrap_or_default();
        let text = [
            "GAME OVER".to_string(),
            String::new(),
            format!("Lines: {}", lines),
            format!("Level: {}", level),
            String::new(),
            "R to restart, Esc to quit".to_string(),
        ];

        let width = text.iter().map(|t| t.len()).max().unwrap_or(0);
        let mut frame = Frame::new(
            u16::try_from(width).unwrap_or(u16::MAX),
            u16::try_from(text.len()).unwrap_or(u16::MAX),
        );
        for (y, line) in (0u16..).zip(text.iter()) {
            frame.put_str(0, y, line);
        }
        frame
    }
}

fn block(kind: PieceKind) -> [Glyph; 2] {
    [
        Glyph { ch: '[', kind: Some(kind) },
        Glyph { ch: ']', kind: Some(kind) },
    ]
}

fn kind_color(kind: Option<PieceKind>) -> Color {
    match kind {
        Some(PieceKind::I) => Color::Cyan,
        Some(PieceKind::O) => Color::Yellow,
        Some(PieceKind::T) => Color::Magenta,
        Some(PieceKind::S) => Color::Green,
        Some(PieceKind::Z) => Color::Red,
        Some(PieceKind::J) => Color::Blue,
        Some(PieceKind::L) => Color::DarkYellow,
        None => Color::Grey,
    }
}

/// Flushes frames to a real terminal.
pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<Frame>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.stdout.queue(terminal::EnterAlternateScreen)?;
        self.stdout.queue(cursor::Hide)?;
        self.stdout.queue(terminal::DisableLineWrap)?;
        self.stdout.flush()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.stdout.queue(ResetColor)?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(terminal::EnableLineWrap)?;
        self.stdout.queue(cursor::Show)?;
        self.stdout.queue(terminal::LeaveAlternateScreen)?;
        self.stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to be a full redraw.
    ///
    /// Useful on terminal resize events.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Redraw if the frame differs from the last one drawn.
    pub fn draw(&mut self, frame: Frame) -> Result<()> {
        if self.last.as_ref() == Some(&frame) {
            return Ok(());
        }

        self.stdout.queue(terminal::Clear(terminal::ClearType::All))?;
        let mut current: Option<Option<PieceKind>> = None;
        for y in 0..frame.height() {
            self.stdout.queue(cursor::MoveTo(0, y))?;
            for x in 0..frame.width() {
                let glyph = frame.get(x, y).unwrap_or_default();
                if current != Some(glyph.kind) {
                    self.stdout.queue(SetForegroundColor(kind_color(glyph.kind)))?;
                    current = Some(glyph.kind);
                }
                self.stdout.queue(Print(glyph.ch))?;
            }
        }
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;

        self.last = Some(frame);
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}
