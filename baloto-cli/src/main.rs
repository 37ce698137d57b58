mod display;
mod import;

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;

use baloto_analytics::frequency::FrequencyTable;
use baloto_analytics::sampler::{date_seed, generate_suggestions};
use baloto_analytics::{analyze, AnalyticsConfig, AnalyticsResult};
use baloto_db::db::{count_draws, db_path, fetch_history, fetch_last_draws, insert_draw, migrate, open_db};
use baloto_db::models::{parse_date, Draw, DrawOrder, Game, ManualEntry, Pool, validate_draw};
use baloto_db::rusqlite::Connection;

use crate::display::{
    display_analysis, display_draws, display_frequencies, display_import_summary,
    display_suggestions,
};

#[derive(Parser)]
#[command(name = "baloto", about = "Analizador estadístico de Baloto y MiLoto")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importar sorteos desde un archivo CSV (fecha;n1;...;n5[;super_balota])
    Import {
        /// Juego: baloto o miloto
        #[arg(short, long)]
        game: Game,

        /// Ruta del archivo CSV
        #[arg(short, long)]
        file: PathBuf,

        /// Los números del archivo están en orden de extracción
        #[arg(long)]
        drawn_order: bool,
    },

    /// Mostrar la ruta de la base de datos
    DbPath,

    /// Listar los últimos sorteos
    List {
        #[arg(short, long)]
        game: Game,

        /// Número de sorteos a mostrar
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Agregar un sorteo manualmente
    Add {
        /// Sorteo en JSON: {"type", "date", "numbers", "super_balota", "drawn_order"}
        #[arg(long)]
        json: Option<String>,
    },

    /// Frecuencias de ambos juegos
    Stats,

    /// Análisis completo en JSON
    Analyze {
        #[arg(short, long, conflicts_with = "all", required_unless_present = "all")]
        game: Option<Game>,

        /// Analizar ambos juegos
        #[arg(long)]
        all: bool,

        /// Archivo JSON de configuración
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// JSON indentado
        #[arg(long)]
        pretty: bool,
    },

    /// Análisis detallado y combinación sugerida
    Predict {
        #[arg(short, long)]
        game: Game,

        /// Archivo JSON de configuración
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Combinaciones aleatorias ponderadas por frecuencia
    Suggest {
        #[arg(short, long)]
        game: Game,

        /// Número de combinaciones
        #[arg(short, long, default_value = "5")]
        count: usize,

        /// Semilla para reproducibilidad (por defecto: la fecha de hoy)
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Outcome of `analyze` as printed on stdout.
#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum Envelope<T> {
    Success { data: T },
    Error { message: String },
}

impl<T> From<Result<T>> for Envelope<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Envelope::Success { data },
            Err(e) => Envelope::Error { message: format!("{:#}", e) },
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { game, file, drawn_order } => cmd_import(&conn, &file, game, drawn_order),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { game, last } => cmd_list(&conn, game, last),
        Command::Add { json } => cmd_add(&conn, json.as_deref()),
        Command::Stats => cmd_stats(&conn),
        Command::Analyze { game, all, config, pretty } => {
            let games = if all { Game::ALL.to_vec() } else { game.into_iter().collect() };
            cmd_analyze(&conn, &games, config.as_deref(), pretty)
        }
        Command::Predict { game, config } => cmd_predict(&conn, game, config.as_deref()),
        Command::Suggest { game, count, seed } => cmd_suggest(&conn, game, count, seed),
    }
}

fn load_config(path: Option<&Path>) -> Result<AnalyticsConfig> {
    match path {
        Some(p) => AnalyticsConfig::load(p),
        None => Ok(AnalyticsConfig::default()),
    }
}

fn empty_hint(game: Game) {
    println!("Base vacía para {game}. Ejecute primero : baloto import --game {game} --file <csv>");
}

fn cmd_import(conn: &Connection, file: &Path, game: Game, drawn_order: bool) -> Result<()> {
    let order = if drawn_order { DrawOrder::Drawn } else { DrawOrder::Sorted };
    let result = import::import_csv(conn, file, game, order)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &Connection, game: Game, last: u32) -> Result<()> {
    if count_draws(conn, game)? == 0 {
        empty_hint(game);
        return Ok(());
    }
    let draws = fetch_last_draws(conn, game, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_stats(conn: &Connection) -> Result<()> {
    for game in Game::ALL {
        let n = count_draws(conn, game)?;
        let history = fetch_history(conn, game)?;
        let spec = game.spec();

        let main = FrequencyTable::build(&history, Pool::Main, spec.pool_size);
        display_frequencies(&format!("{game} (1-{})", spec.pool_size), &main, n);

        if let Some(size) = Pool::Secondary.size(&spec) {
            let secondary = FrequencyTable::build(&history, Pool::Secondary, size);
            display_frequencies(&format!("{game} super balota (1-{size})"), &secondary, n);
        }
    }
    Ok(())
}

fn analyze_game(history: &[Draw], game: Game, config: &AnalyticsConfig) -> Result<AnalyticsResult> {
    analyze(history, &game.spec(), config).with_context(|| format!("Análisis de {game} fallido"))
}

fn cmd_analyze(conn: &Connection, games: &[Game], config: Option<&Path>, pretty: bool) -> Result<()> {
    let envelope: Envelope<BTreeMap<Game, AnalyticsResult>> = run_analyze(conn, games, config).into();

    let json = if pretty {
        serde_json::to_string_pretty(&envelope)?
    } else {
        serde_json::to_string(&envelope)?
    };
    println!("{json}");
    Ok(())
}

/// Snapshots are read one after the other; the games are then analyzed in parallel.
fn run_analyze(
    conn: &Connection,
    games: &[Game],
    config: Option<&Path>,
) -> Result<BTreeMap<Game, AnalyticsResult>> {
    let config = load_config(config)?;
    let snapshots = games
        .iter()
        .map(|&game| Ok((game, fetch_history(conn, game)?)))
        .collect::<Result<Vec<(Game, Vec<Draw>)>>>()?;

    snapshots
        .par_iter()
        .map(|(game, history)| Ok((*game, analyze_game(history, *game, &config)?)))
        .collect()
}

fn cmd_predict(conn: &Connection, game: Game, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let history = fetch_history(conn, game)?;
    if history.is_empty() {
        empty_hint(game);
    }
    let result = analyze_game(&history, game, &config)?;
    display_analysis(game, &result);
    Ok(())
}

fn cmd_suggest(conn: &Connection, game: Game, count: usize, seed: Option<u64>) -> Result<()> {
    let history = fetch_history(conn, game)?;
    if history.is_empty() {
        empty_hint(game);
    }
    let seed = seed.unwrap_or_else(date_seed);
    let suggestions = generate_suggestions(&history, &game.spec(), count, seed)?;
    println!("Semilla : {seed}");
    display_suggestions(&suggestions);
    Ok(())
}

fn cmd_add(conn: &Connection, json: Option<&str>) -> Result<()> {
    let today = chrono::Local::now().date_naive();

    let draw = match json {
        Some(payload) => {
            let entry: ManualEntry = serde_json::from_str(payload).context("JSON inválido")?;
            entry.into_draw(today)?
        }
        None => {
            let draw = prompt_draw(today)?;
            println!("\nSorteo a insertar :");
            display_draws(std::slice::from_ref(&draw));
            let confirm = prompt("\n¿Confirmar la inserción? (s/n) : ")?;
            if confirm.trim().to_lowercase() != "s" {
                println!("Inserción cancelada.");
                return Ok(());
            }
            draw
        }
    };

    if insert_draw(conn, &draw)? {
        println!("Sorteo de {} del {} insertado.", draw.game, draw.date);
    } else {
        println!("Ya existe un sorteo de {} para el {} (ignorado).", draw.game, draw.date);
    }
    Ok(())
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Error de lectura")?;
    Ok(input.trim().to_string())
}

fn prompt_draw(today: chrono::NaiveDate) -> Result<Draw> {
    println!("Agregar un sorteo manualmente\n");

    let game = loop {
        match prompt("Juego (baloto/miloto) : ")?.parse::<Game>() {
            Ok(g) => break g,
            Err(e) => println!("{e}. Intente de nuevo."),
        }
    };
    let spec = game.spec();

    let date = loop {
        let raw = prompt(&format!("Fecha (AAAA-MM-DD, vacío = {today}) : "))?;
        if raw.is_empty() {
            break today;
        }
        match parse_date(&raw) {
            Ok(d) => break d,
            Err(e) => println!("{e}. Intente de nuevo."),
        }
    };

    let drawn = prompt("¿Números en orden de extracción? (s/n) : ")?;
    let order = if drawn.to_lowercase() == "s" { DrawOrder::Drawn } else { DrawOrder::Sorted };

    loop {
        let input = prompt(&format!(
            "{} números (separados por espacios, 1-{}) : ",
            spec.draw_size, spec.pool_size
        ))?;
        let numbers: Vec<u8> = match input.split_whitespace().map(|s| s.parse::<u8>()).collect::<Result<Vec<u8>, _>>() {
            Ok(v) => v,
            Err(_) => {
                println!("Solo se aceptan números. Intente de nuevo.");
                continue;
            }
        };

        let secondary = match spec.secondary_pool_size {
            Some(size) => match prompt(&format!("Super balota (1-{size}) : "))?.parse::<u8>() {
                Ok(s) => Some(s),
                Err(_) => {
                    println!("Super balota inválida. Intente de nuevo.");
                    continue;
                }
            },
            None => None,
        };

        let draw = Draw { game, date, numbers, secondary, order };
        match validate_draw(&draw) {
            Ok(()) => return Ok(draw),
            Err(e) => println!("{e}. Intente de nuevo."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    #[test]
    fn test_cli_parses_commands() {
        let cli = Cli::try_parse_from(["baloto", "analyze", "--game", "miloto", "--pretty"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Analyze { game: Some(Game::Miloto), all: false, pretty: true, .. }
        ));

        let cli = Cli::try_parse_from(["baloto", "suggest", "-g", "BALOTO", "-c", "2"]).unwrap();
        assert!(matches!(cli.command, Command::Suggest { game: Game::Baloto, count: 2, seed: None }));

        assert!(Cli::try_parse_from(["baloto", "analyze"]).is_err());
        assert!(Cli::try_parse_from(["baloto", "analyze", "--all", "--game", "baloto"]).is_err());
        assert!(Cli::try_parse_from(["baloto", "list", "--game", "loto"]).is_err());
    }

    #[test]
    fn test_success_envelope() {
        let conn = memory_db();
        let entry: ManualEntry = serde_json::from_str(
            r#"{"type": "baloto", "date": "2024-02-03", "numbers": [5, 9, 14, 30, 41], "super_balota": 12}"#,
        )
        .unwrap();
        insert_draw(&conn, &entry.into_draw(chrono::NaiveDate::MIN).unwrap()).unwrap();

        let envelope: Envelope<_> = run_analyze(&conn, &Game::ALL, None).into();
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["baloto"]["total_draws"], 1);
        assert_eq!(json["data"]["miloto"]["total_draws"], 0);
        assert!(json["data"]["baloto"]["super_analysis"].is_object());
        assert!(json["data"]["miloto"].get("super_analysis").is_none());
    }

    #[test]
    fn test_error_envelope() {
        let conn = memory_db();
        let missing = Path::new("/nonexistent/baloto-config.json");
        let envelope: Envelope<_> = run_analyze(&conn, &[Game::Miloto], Some(missing)).into();
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["status"], "error");
        assert!(json["message"].as_str().unwrap().contains("configuración"));
        assert!(json.get("data").is_none());
    }
}
