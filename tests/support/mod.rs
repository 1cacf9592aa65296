// Shared helpers for the integration tests.
#![allow(dead_code)]

use std::io;

use rand::rngs::StdRng;
use rand::SeedableRng;

use wave_invaders::config::Tuning;
use wave_invaders::display::{Paint, Surface, TextStyle};
use wave_invaders::entities::{Rect, Vec2};

/// Default tuning with enemy fire switched off so scenarios stay put.
pub fn quiet_tuning() -> Tuning {
    Tuning {
        fire_chance: 0.0,
        ..Tuning::default()
    }
}

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Clear(Rect),
    FillRect(Rect, Paint),
    StrokeRect(Rect, Paint),
    Text(String, Vec2, TextStyle),
    Present,
}

/// Surface that remembers every call instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<Call>,
}

impl RecordingSurface {
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Text(text, _, _) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn fills(&self, paint: Paint) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::FillRect(_, p) if *p == paint))
            .count()
    }

    pub fn presents(&self) -> usize {
        self.calls.iter().filter(|call| **call == Call::Present).count()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, region: Rect) -> io::Result<()> {
        self.calls.push(Call::Clear(region));
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, paint: Paint) -> io::Result<()> {
        self.calls.push(Call::FillRect(rect, paint));
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, paint: Paint, _line_width: f32) -> io::Result<()> {
        self.calls.push(Call::StrokeRect(rect, paint));
        Ok(())
    }

    fn fill_text(&mut self, text: &str, at: Vec2, style: TextStyle) -> io::Result<()> {
        self.calls.push(Call::Text(text.to_string(), at, style));
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.calls.push(Call::Present);
        Ok(())
    }
}
