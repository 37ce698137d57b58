use thiserror::Error;

use crate::models::Game;

/// Rejections raised before a draw is allowed into the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("juego desconocido : '{0}' (se espera baloto o miloto)")]
    UnknownGame(String),

    #[error("se esperaban {expected} números, se recibieron {actual}")]
    WrongCount { expected: usize, actual: usize },

    #[error("número {number} fuera de rango (1-{pool_size})")]
    OutOfRange { number: u8, pool_size: u8 },

    #[error("número repetido : {0}")]
    Duplicate(u8),

    #[error("{game} requiere una super balota")]
    MissingSecondary { game: Game },

    #[error("{game} no tiene super balota")]
    UnexpectedSecondary { game: Game },

    #[error("super balota {number} fuera de rango (1-{pool_size})")]
    SecondaryOutOfRange { number: u8, pool_size: u8 },

    #[error("fecha inválida : '{0}' (formatos: AAAA-MM-DD o DD/MM/AAAA)")]
    InvalidDate(String),
}

/// A `GameSpec` that cannot describe any real game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("draw_size must be at least 1")]
    ZeroDrawSize,

    #[error("draw_size {draw_size} exceeds pool_size {pool_size}")]
    DrawSizeExceedsPool { draw_size: usize, pool_size: u8 },

    #[error("has_secondary={has_secondary} disagrees with secondary_pool_size={secondary_pool_size:?}")]
    SecondaryMismatch {
        has_secondary: bool,
        secondary_pool_size: Option<u8>,
    },

    #[error("secondary_pool_size must be at least 1")]
    EmptySecondaryPool,
}
