use anyhow::{Context, Result};
use baloto_db::rusqlite::Connection;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use baloto_db::db::insert_draw;
use baloto_db::models::{parse_date, Draw, DrawOrder, Game};

/// One row: `date;n1;...;nk[;super_balota]`.
fn parse_record(record: &csv::StringRecord, game: Game, order: DrawOrder) -> Result<Draw> {
    let spec = game.spec();

    let get = |idx: usize| -> Result<String> {
        record
            .get(idx)
            .map(|s| s.trim().to_string())
            .with_context(|| format!("Campo faltante en la columna {}", idx))
    };

    let get_u8 = |idx: usize| -> Result<u8> {
        let s = get(idx)?;
        s.parse::<u8>()
            .with_context(|| format!("No se pudo leer '{}' (columna {})", s, idx))
    };

    let date = parse_date(&get(0)?)?;

    let numbers = (1..=spec.draw_size)
        .map(|idx| get_u8(idx))
        .collect::<Result<Vec<u8>>>()?;

    let secondary = if spec.has_secondary {
        Some(get_u8(spec.draw_size + 1)?)
    } else {
        None
    };

    Ok(Draw {
        game,
        date,
        numbers,
        secondary,
        order,
    })
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_csv(conn: &Connection, path: &Path, game: Game, order: DrawOrder) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("No se pudo abrir {:?}", path))?;

    let records: Vec<csv::Result<csv::StringRecord>> = reader.records().collect();

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .context("Plantilla de progreso inválida")?
        .progress_chars("=> "),
    );
    pb.set_message(format!("importando {}", game));

    let tx = conn
        .unchecked_transaction()
        .context("No se pudo iniciar la transacción")?;

    let mut result = ImportResult::default();

    for record_result in records {
        result.total_records += 1;
        pb.inc(1);
        let line = result.total_records;

        let outcome = record_result
            .context("lectura")
            .and_then(|record| parse_record(&record, game, order))
            .and_then(|draw| insert_draw(&tx, &draw));

        match outcome {
            Ok(true) => result.inserted += 1,
            Ok(false) => result.skipped += 1,
            Err(e) => {
                log::warn!("línea {} ignorada: {:#}", line, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Falló el commit")?;
    pb.finish_and_clear();

    log::info!(
        "import of {:?}: {} inserted, {} duplicates, {} errors",
        path,
        result.inserted,
        result.skipped,
        result.errors
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use baloto_db::db::{count_draws, fetch_history, migrate};

    fn record(fields: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_parse_baloto_record() {
        let draw = parse_record(
            &record(&["2024-03-02", "3", "11", "19", "27", "40", " 7 "]),
            Game::Baloto,
            DrawOrder::Sorted,
        )
        .unwrap();
        assert_eq!(draw.date.to_string(), "2024-03-02");
        assert_eq!(draw.numbers, vec![3, 11, 19, 27, 40]);
        assert_eq!(draw.secondary, Some(7));
    }

    #[test]
    fn test_parse_miloto_record_with_published_date() {
        let draw = parse_record(
            &record(&["05/01/2024", "39", "1", "20", "7", "11"]),
            Game::Miloto,
            DrawOrder::Drawn,
        )
        .unwrap();
        assert_eq!(draw.date.to_string(), "2024-01-05");
        assert_eq!(draw.numbers, vec![39, 1, 20, 7, 11]);
        assert_eq!(draw.secondary, None);
        assert_eq!(draw.order, DrawOrder::Drawn);
    }

    #[test]
    fn test_parse_record_errors() {
        assert!(parse_record(&record(&["2024-01-01", "1", "2", "3", "4", "5"]), Game::Baloto, DrawOrder::Sorted).is_err());
        assert!(parse_record(&record(&["2024-01-01", "1", "x", "3", "4", "5"]), Game::Miloto, DrawOrder::Sorted).is_err());
        assert!(parse_record(&record(&["2024/01/01", "1", "2", "3", "4", "5"]), Game::Miloto, DrawOrder::Sorted).is_err());
    }

    #[test]
    fn test_import_counts_rows() {
        let path = std::env::temp_dir().join(format!("baloto-import-{}.csv", std::process::id()));
        std::fs::write(
            &path,
            "fecha;n1;n2;n3;n4;n5\n\
             2024-01-01;1;2;3;4;5\n\
             2024-01-03;6;7;8;9;10\n\
             2024-01-03;11;12;13;14;15\n\
             2024-01-05;1;1;2;3;4\n\
             2024-01-07;39;38;37;36;35\n",
        )
        .unwrap();

        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let result = import_csv(&conn, &path, Game::Miloto, DrawOrder::Sorted).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(
            result,
            ImportResult { total_records: 5, inserted: 3, skipped: 1, errors: 1 }
        );
        assert_eq!(count_draws(&conn, Game::Miloto).unwrap(), 3);
        let history = fetch_history(&conn, Game::Miloto).unwrap();
        assert_eq!(history[2].numbers, vec![39, 38, 37, 36, 35]);
    }
}
