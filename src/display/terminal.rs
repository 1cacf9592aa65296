//! crossterm drawing surface.
//!
//! The simulation works in play-area pixels; this surface scales them onto
//! the terminal's cell grid, so any terminal size shows the whole field.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use super::{Align, Baseline, Paint, Surface, TextStyle};
use crate::config::Viewport;
use crate::entities::{Rect, Vec2};

fn color_of(paint: Paint) -> Color {
    match paint {
        Paint::White => Color::White,
        Paint::Red => Color::Red,
        Paint::Yellow => Color::Yellow,
    }
}

pub struct TerminalSurface<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    viewport: Viewport,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, cols: u16, rows: u16, viewport: Viewport) -> Self {
        Self {
            out,
            cols: cols.max(1),
            rows: rows.max(1),
            viewport,
        }
    }

    /// Follow a terminal resize and the play area derived from it.
    pub fn resize(&mut self, cols: u16, rows: u16, viewport: Viewport) {
        self.cols = cols.max(1);
        self.rows = rows.max(1);
        self.viewport = viewport;
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn col(&self, x: f32) -> u16 {
        let c = (x / self.viewport.width * self.cols as f32).floor();
        c.clamp(0.0, (self.cols - 1) as f32) as u16
    }

    fn row(&self, y: f32) -> u16 {
        let r = (y / self.viewport.height * self.rows as f32).floor();
        r.clamp(0.0, (self.rows - 1) as f32) as u16
    }

    /// Inclusive cell span covered by `rect`; never empty.
    fn cells(&self, rect: Rect) -> (u16, u16, u16, u16) {
        let left = self.col(rect.x);
        let top = self.row(rect.y);
        let right = self.col(rect.x + rect.w - f32::EPSILON).max(left);
        let bottom = self.row(rect.y + rect.h - f32::EPSILON).max(top);
        (left, top, right, bottom)
    }

    fn covers_viewport(&self, rect: Rect) -> bool {
        rect.x <= 0.0
            && rect.y <= 0.0
            && rect.x + rect.w >= self.viewport.width
            && rect.y + rect.h >= self.viewport.height
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn clear(&mut self, region: Rect) -> io::Result<()> {
        if self.covers_viewport(region) {
            self.out.queue(terminal::Clear(terminal::ClearType::All))?;
            return Ok(());
        }
        let (left, top, right, bottom) = self.cells(region);
        let blank = " ".repeat((right - left + 1) as usize);
        for row in top..=bottom {
            self.out.queue(cursor::MoveTo(left, row))?;
            self.out.queue(Print(&blank))?;
        }
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, paint: Paint) -> io::Result<()> {
        let (left, top, right, bottom) = self.cells(rect);
        let block = "█".repeat((right - left + 1) as usize);
        self.out.queue(style::SetForegroundColor(color_of(paint)))?;
        for row in top..=bottom {
            self.out.queue(cursor::MoveTo(left, row))?;
            self.out.queue(Print(&block))?;
        }
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, paint: Paint, _line_width: f32) -> io::Result<()> {
        let (left, top, right, bottom) = self.cells(rect);
        let inner = (right - left).saturating_sub(1) as usize;
        self.out.queue(style::SetForegroundColor(color_of(paint)))?;

        self.out.queue(cursor::MoveTo(left, top))?;
        self.out.queue(Print(format!("┌{}┐", "─".repeat(inner))))?;
        for row in top + 1..bottom {
            self.out.queue(cursor::MoveTo(left, row))?;
            self.out.queue(Print("│"))?;
            self.out.queue(cursor::MoveTo(right, row))?;
            self.out.queue(Print("│"))?;
        }
        if bottom > top {
            self.out.queue(cursor::MoveTo(left, bottom))?;
            self.out.queue(Print(format!("└{}┘", "─".repeat(inner))))?;
        }
        Ok(())
    }

    fn fill_text(&mut self, text: &str, at: Vec2, text_style: TextStyle) -> io::Result<()> {
        let width = text.chars().count() as u16;
        let col = match text_style.align {
            Align::Left => self.col(at.x),
            Align::Center => self.col(at.x).saturating_sub(width / 2),
        };
        // Alphabetic text sits on the line above its baseline
        let row = match text_style.baseline {
            Baseline::Alphabetic => self.row((at.y - 1.0).max(0.0)),
            Baseline::Middle => self.row(at.y),
        };
        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(style::SetForegroundColor(color_of(text_style.paint)))?;
        self.out.queue(Print(text))?;
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows - 1))?;
        self.out.flush()
    }
}
