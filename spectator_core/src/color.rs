use std::collections::HashMap;
use std::fmt;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cell::EntityId;
use crate::config::PaletteConfig;

/// Opaque RGB color; serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn channel_sum(&self) -> u32 {
        self.r as u32 + self.g as u32 + self.b as u32
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn from_hex(text: &str) -> Result<Self, ColorParseError> {
        let digits = text
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError(text.to_string()))?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ColorParseError(text.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorParseError(text.to_string()))
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("expected a `#rrggbb` color, got {0:?}")]
pub struct ColorParseError(pub String);

/// Session-scoped owner → color assignment.
///
/// Colors are drawn on first sight of an id and kept until the registry is
/// dropped. Nothing is ever evicted or reassigned, so a registry should live
/// exactly as long as one spectator session.
#[derive(Debug)]
pub struct ColorRegistry {
    palette: PaletteConfig,
    rng: SmallRng,
    assigned: HashMap<EntityId, Color>,
}

impl ColorRegistry {
    pub fn new(palette: PaletteConfig) -> Self {
        Self::with_rng(palette, SmallRng::from_entropy())
    }

    pub fn with_seed(palette: PaletteConfig, seed: u64) -> Self {
        Self::with_rng(palette, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(palette: PaletteConfig, rng: SmallRng) -> Self {
        Self {
            palette,
            rng,
            assigned: HashMap::new(),
        }
    }

    /// Color for `id`, sampling one on first use.
    pub fn color_of(&mut self, id: &EntityId) -> Color {
        if let Some(color) = self.assigned.get(id) {
            return *color;
        }
        let color = self.sample();
        tracing::debug!(
            target: "spectator::colors",
            owner = %id,
            color = %color,
            "color.assigned"
        );
        self.assigned.insert(id.clone(), color);
        color
    }

    pub fn get(&self, id: &EntityId) -> Option<Color> {
        self.assigned.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &Color)> {
        self.assigned.iter()
    }

    pub fn palette(&self) -> &PaletteConfig {
        &self.palette
    }

    fn sample(&mut self) -> Color {
        for _ in 0..self.palette.max_attempts {
            let candidate = Color::rgb(self.rng.gen(), self.rng.gen(), self.rng.gen());
            if candidate.channel_sum() > self.palette.min_channel_sum {
                return candidate;
            }
        }
        tracing::warn!(
            target: "spectator::colors",
            attempts = self.palette.max_attempts,
            fallback = %self.palette.fallback,
            "color.sampling_exhausted"
        );
        self.palette.fallback
    }
}

impl Default for ColorRegistry {
    fn default() -> Self {
        Self::new(PaletteConfig::default())
    }
}
