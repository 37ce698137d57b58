use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DrawError, SpecError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    Baloto,
    Miloto,
}

impl Game {
    pub const ALL: [Game; 2] = [Game::Baloto, Game::Miloto];

    pub fn name(&self) -> &'static str {
        match self {
            Game::Baloto => "baloto",
            Game::Miloto => "miloto",
        }
    }

    pub fn spec(&self) -> GameSpec {
        match self {
            Game::Baloto => GameSpec {
                pool_size: 43,
                secondary_pool_size: Some(16),
                draw_size: 5,
                has_secondary: true,
            },
            Game::Miloto => GameSpec {
                pool_size: 39,
                secondary_pool_size: None,
                draw_size: 5,
                has_secondary: false,
            },
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Game {
    type Err = DrawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "baloto" => Ok(Game::Baloto),
            "miloto" => Ok(Game::Miloto),
            _ => Err(DrawError::UnknownGame(s.to_string())),
        }
    }
}

/// Shape of a game: what the engine needs to know, passed explicitly on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSpec {
    pub pool_size: u8,
    pub secondary_pool_size: Option<u8>,
    pub draw_size: usize,
    pub has_secondary: bool,
}

impl GameSpec {
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.draw_size == 0 {
            return Err(SpecError::ZeroDrawSize);
        }
        if self.draw_size > self.pool_size as usize {
            return Err(SpecError::DrawSizeExceedsPool {
                draw_size: self.draw_size,
                pool_size: self.pool_size,
            });
        }
        if self.has_secondary != self.secondary_pool_size.is_some() {
            return Err(SpecError::SecondaryMismatch {
                has_secondary: self.has_secondary,
                secondary_pool_size: self.secondary_pool_size,
            });
        }
        if self.secondary_pool_size == Some(0) {
            return Err(SpecError::EmptySecondaryPool);
        }
        Ok(())
    }
}

/// Whether a draw's `numbers` keep the order in which the balls came out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawOrder {
    Drawn,
    Sorted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    pub game: Game,
    pub date: NaiveDate,
    pub numbers: Vec<u8>,
    pub secondary: Option<u8>,
    pub order: DrawOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    Main,
    Secondary,
}

impl Pool {
    /// `None` when the game has no such pool.
    pub fn size(&self, spec: &GameSpec) -> Option<u8> {
        match self {
            Pool::Main => Some(spec.pool_size),
            Pool::Secondary => spec.secondary_pool_size,
        }
    }

    pub fn pick_count(&self, spec: &GameSpec) -> usize {
        match self {
            Pool::Main => spec.draw_size,
            Pool::Secondary => usize::from(spec.has_secondary),
        }
    }

    pub fn numbers_from<'a>(&self, draw: &'a Draw) -> &'a [u8] {
        match self {
            Pool::Main => &draw.numbers,
            Pool::Secondary => draw.secondary.as_slice(),
        }
    }
}

pub fn validate_draw(draw: &Draw) -> Result<(), DrawError> {
    let spec = draw.game.spec();

    if draw.numbers.len() != spec.draw_size {
        return Err(DrawError::WrongCount {
            expected: spec.draw_size,
            actual: draw.numbers.len(),
        });
    }

    let mut seen = HashSet::with_capacity(draw.numbers.len());
    for &n in &draw.numbers {
        if n < 1 || n > spec.pool_size {
            return Err(DrawError::OutOfRange {
                number: n,
                pool_size: spec.pool_size,
            });
        }
        if !seen.insert(n) {
            return Err(DrawError::Duplicate(n));
        }
    }

    match (spec.secondary_pool_size, draw.secondary) {
        (Some(size), Some(s)) if s < 1 || s > size => Err(DrawError::SecondaryOutOfRange {
            number: s,
            pool_size: size,
        }),
        (Some(_), None) => Err(DrawError::MissingSecondary { game: draw.game }),
        (None, Some(_)) => Err(DrawError::UnexpectedSecondary { game: draw.game }),
        _ => Ok(()),
    }
}

/// Accepts `AAAA-MM-DD` (storage format) and `DD/MM/AAAA` (published results).
pub fn parse_date(raw: &str) -> Result<NaiveDate, DrawError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .map_err(|_| DrawError::InvalidDate(raw.to_string()))
}

/// Payload of a manually entered result: `{type, date, numbers, super_balota?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualEntry {
    #[serde(rename = "type")]
    pub game: String,
    #[serde(default)]
    pub date: Option<String>,
    pub numbers: Vec<u8>,
    #[serde(default)]
    pub super_balota: Option<u8>,
    #[serde(default)]
    pub drawn_order: bool,
}

impl ManualEntry {
    /// A missing date means the draw happened `today`.
    pub fn into_draw(self, today: NaiveDate) -> Result<Draw, DrawError> {
        let game: Game = self.game.parse()?;
        let date = match self.date.as_deref() {
            Some(raw) if !raw.trim().is_empty() => parse_date(raw)?,
            _ => today,
        };
        let draw = Draw {
            game,
            date,
            numbers: self.numbers,
            secondary: self.super_balota,
            order: if self.drawn_order {
                DrawOrder::Drawn
            } else {
                DrawOrder::Sorted
            },
        };
        validate_draw(&draw)?;
        Ok(draw)
    }
}
