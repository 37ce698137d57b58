use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use std::path::{Path, PathBuf};

use crate::models::{validate_draw, Draw, DrawOrder, Game};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    game         TEXT NOT NULL,
    date         TEXT NOT NULL,
    numbers      TEXT NOT NULL,
    secondary    INTEGER,
    drawn_order  INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (game, date)
);
";

const SELECT_DRAW: &str = "SELECT game, date, numbers, secondary, drawn_order FROM draws";

/// `$BALOTO_DB` if set, otherwise `./data/baloto.db`.
pub fn db_path() -> PathBuf {
    if let Some(path) = std::env::var_os("BALOTO_DB") {
        return PathBuf::from(path);
    }
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("baloto.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("No se pudo crear el directorio {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("No se pudo abrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Falló la migración")?;
    Ok(())
}

/// Validates then appends. Returns `false` when the game already has a draw on that date.
pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    validate_draw(draw)
        .with_context(|| format!("Sorteo {} del {} rechazado", draw.game, draw.date))?;

    let numbers = serde_json::to_string(&draw.numbers)?;
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (game, date, numbers, secondary, drawn_order)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            draw.game.name(),
            draw.date,
            numbers,
            draw.secondary,
            draw.order == DrawOrder::Drawn,
        ],
    ).context("Falló la inserción")?;

    if changed > 0 {
        log::debug!("inserted {} draw of {}", draw.game, draw.date);
    }
    Ok(changed > 0)
}

fn row_to_draw(row: &Row<'_>) -> rusqlite::Result<Draw> {
    let game: String = row.get(0)?;
    let game = game
        .parse::<Game>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
    let date: NaiveDate = row.get(1)?;
    let numbers: String = row.get(2)?;
    let numbers: Vec<u8> = serde_json::from_str(&numbers)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
    let drawn: bool = row.get(4)?;

    Ok(Draw {
        game,
        date,
        numbers,
        secondary: row.get(3)?,
        order: if drawn { DrawOrder::Drawn } else { DrawOrder::Sorted },
    })
}

/// Point-in-time snapshot of a game's history, oldest first.
pub fn fetch_history(conn: &Connection, game: Game) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!("{SELECT_DRAW} WHERE game = ?1 ORDER BY date ASC"))?;
    let draws = stmt
        .query_map([game.name()], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("No se pudo leer el historial de {}", game))?;
    Ok(draws)
}

/// Newest first.
pub fn fetch_last_draws(conn: &Connection, game: Game, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_DRAW} WHERE game = ?1 ORDER BY date DESC LIMIT ?2"
    ))?;
    let draws = stmt
        .query_map(rusqlite::params![game.name(), limit], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn count_draws(conn: &Connection, game: Game) -> Result<u32> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM draws WHERE game = ?1",
        [game.name()],
        |row| row.get(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_draw(game: Game, date: &str, numbers: [u8; 5]) -> Draw {
        Draw {
            game,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            numbers: numbers.to_vec(),
            secondary: if game == Game::Baloto { Some(4) } else { None },
            order: DrawOrder::Drawn,
        }
    }

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    #[test]
    fn test_insert_and_count() {
        let conn = memory_db();
        assert_eq!(count_draws(&conn, Game::Baloto).unwrap(), 0);

        insert_draw(&conn, &test_draw(Game::Baloto, "2024-01-01", [1, 2, 3, 4, 5])).unwrap();
        insert_draw(&conn, &test_draw(Game::Miloto, "2024-01-01", [1, 2, 3, 4, 5])).unwrap();
        assert_eq!(count_draws(&conn, Game::Baloto).unwrap(), 1);
        assert_eq!(count_draws(&conn, Game::Miloto).unwrap(), 1);
    }

    #[test]
    fn test_same_date_ignored() {
        let conn = memory_db();

        let inserted = insert_draw(&conn, &test_draw(Game::Miloto, "2024-01-01", [1, 2, 3, 4, 5])).unwrap();
        assert!(inserted);
        let inserted = insert_draw(&conn, &test_draw(Game::Miloto, "2024-01-01", [6, 7, 8, 9, 10])).unwrap();
        assert!(!inserted);
        assert_eq!(count_draws(&conn, Game::Miloto).unwrap(), 1);
    }

    #[test]
    fn test_invalid_draw_rejected() {
        let conn = memory_db();
        let mut draw = test_draw(Game::Miloto, "2024-01-01", [1, 2, 3, 4, 5]);
        draw.numbers = vec![1, 1, 2, 3, 4];
        assert!(insert_draw(&conn, &draw).is_err());
        assert_eq!(count_draws(&conn, Game::Miloto).unwrap(), 0);
    }

    #[test]
    fn test_history_roundtrip_keeps_order_and_fields() {
        let conn = memory_db();
        insert_draw(&conn, &test_draw(Game::Baloto, "2024-01-05", [40, 2, 17, 9, 33])).unwrap();
        let mut sorted = test_draw(Game::Baloto, "2024-01-01", [1, 2, 3, 4, 5]);
        sorted.order = DrawOrder::Sorted;
        insert_draw(&conn, &sorted).unwrap();
        insert_draw(&conn, &test_draw(Game::Baloto, "2024-01-03", [6, 7, 8, 9, 10])).unwrap();

        let history = fetch_history(&conn, Game::Baloto).unwrap();
        let dates: Vec<String> = history.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-03", "2024-01-05"]);
        assert_eq!(history[0].order, DrawOrder::Sorted);
        assert_eq!(history[2].numbers, vec![40, 2, 17, 9, 33]);
        assert_eq!(history[2].order, DrawOrder::Drawn);
        assert_eq!(history[2].secondary, Some(4));
    }

    #[test]
    fn test_fetch_last_draws_newest_first() {
        let conn = memory_db();
        insert_draw(&conn, &test_draw(Game::Miloto, "2024-01-01", [1, 2, 3, 4, 5])).unwrap();
        insert_draw(&conn, &test_draw(Game::Miloto, "2024-01-05", [1, 2, 3, 4, 5])).unwrap();
        insert_draw(&conn, &test_draw(Game::Miloto, "2024-01-03", [1, 2, 3, 4, 5])).unwrap();

        let draws = fetch_last_draws(&conn, Game::Miloto, 2).unwrap();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].date.to_string(), "2024-01-05");
        assert_eq!(draws[1].date.to_string(), "2024-01-03");
        assert!(draws.iter().all(|d| d.secondary.is_none()));
    }
}
