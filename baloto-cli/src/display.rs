use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use textplots::Plot;

use baloto_analytics::engine::AnalyticsResult;
use baloto_analytics::frequency::{FrequencyTable, NumberCount};
use baloto_analytics::gaps::GapRecord;
use baloto_analytics::sampler::Suggestion;
use baloto_analytics::sums::SumDistribution;
use baloto_analytics::trends::Trends;
use baloto_db::models::{Draw, DrawOrder, Game};

use crate::import::ImportResult;

const GAP_ROWS: usize = 10;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

fn order_label(order: DrawOrder) -> &'static str {
    match order {
        DrawOrder::Drawn => "de extracción",
        DrawOrder::Sorted => "ordenado",
    }
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("No hay sorteos para mostrar.");
        return;
    }

    let mut table = new_table(vec!["Fecha", "Juego", "Números", "Super Balota", "Orden"]);
    for draw in draws {
        let secondary = draw
            .secondary
            .map(|s| format!("{:2}", s))
            .unwrap_or_else(|| "—".to_string());
        table.add_row(vec![
            draw.date.to_string(),
            draw.game.to_string(),
            join_numbers(&draw.numbers),
            secondary,
            order_label(draw.order).to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Importación terminada:");
    println!("  Líneas leídas       : {}", result.total_records);
    println!("  Insertados          : {}", result.inserted);
    println!("  Duplicados ignorados: {}", result.skipped);
    if result.errors > 0 {
        println!("  Errores             : {}", result.errors);
    }
}

fn frequency_chart(table: &FrequencyTable) {
    let points: Vec<(f32, f32)> = table
        .iter()
        .map(|c| (c.number as f32, c.frequency as f32))
        .collect();
    let y_max = points.iter().map(|p| p.1).fold(1.0f32, f32::max);
    let x_max = table.pool_size().max(1) as f32;

    let shape = textplots::Shape::Points(&points);
    let mut chart = textplots::Chart::new_with_y_range(120, 40, 1.0, x_max, 0.0, y_max + 1.0);
    println!("{}", chart.lineplot(&shape));
}

/// Raw counts of one pool, most frequent first, with an ASCII chart.
pub fn display_frequencies(title: &str, table: &FrequencyTable, total_draws: u32) {
    println!("\n── {title} ({total_draws} sorteos) ──");
    if total_draws == 0 {
        println!("  (Sin datos)");
        return;
    }

    let mut t = new_table(vec!["Número", "Frecuencia", "% de sorteos"]);
    for c in table.ranking() {
        t.add_row(vec![
            format!("{:2}", c.number),
            c.frequency.to_string(),
            format!("{:.1}", c.frequency as f64 * 100.0 / total_draws as f64),
        ]);
    }
    println!("{t}");
    frequency_chart(table);
}

fn counts_table(title: &str, counts: &[NumberCount], color: Color) {
    println!("\n{title}");
    if counts.is_empty() {
        println!("  (ninguno)");
        return;
    }
    let mut table = new_table(vec!["Número", "Frecuencia"]);
    for c in counts {
        table.add_row(vec![
            Cell::new(format!("{:2}", c.number)).fg(color),
            Cell::new(c.frequency),
        ]);
    }
    println!("{table}");
}

fn gaps_table(gaps: &[GapRecord]) {
    let mut table = new_table(vec!["Número", "Sorteos sin salir"]);
    for g in gaps.iter().take(GAP_ROWS) {
        table.add_row(vec![format!("{:2}", g.number), g.gap.to_string()]);
    }
    println!("{table}");
}

fn trends_table(trends: &Trends) {
    if trends.is_empty() {
        println!("  (historial insuficiente o sin cambios)");
        return;
    }
    if let Some(window) = trends.window {
        println!("  Ventanas de {window} sorteos");
    }
    let mut table = new_table(vec!["Número", "Cambio", "Tendencia"]);
    let up = trends.trending_up.iter().map(|t| (t, "▲", Color::Green));
    let down = trends.trending_down.iter().map(|t| (t, "▼", Color::Red));
    for (t, arrow, color) in up.chain(down) {
        table.add_row(vec![
            Cell::new(format!("{:2}", t.number)),
            Cell::new(format!("{:+.1}%", t.change_pct)).fg(color),
            Cell::new(arrow).fg(color),
        ]);
    }
    println!("{table}");
}

fn sums_table(dist: &SumDistribution) {
    println!(
        "  Promedio {:.1} · mín {} · máx {} · desviación {:.1}",
        dist.average, dist.min, dist.max, dist.std_dev
    );
    println!(
        "  Rango recomendado : {} – {}",
        dist.recommended_range.low, dist.recommended_range.high
    );

    let mut table = new_table(vec!["Rango", "Sorteos"]);
    for bucket in &dist.distribution {
        table.add_row(vec![
            format!("{}–{}", bucket.range_start, bucket.range_end),
            bucket.count.to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_analysis(game: Game, result: &AnalyticsResult) {
    println!("\n📊 Análisis de {} sobre {} sorteos", game, result.total_draws);

    counts_table("── Números calientes ──", &result.hot_cold.hot, Color::Green);
    counts_table("── Números fríos ──", &result.hot_cold.cold, Color::Red);

    println!("\n── Números atrasados ──");
    gaps_table(&result.gaps);

    println!("\n── Tendencias ──");
    trends_table(&result.trends);

    println!("\n── Suma de combinaciones ──");
    sums_table(&result.sum_distribution);

    println!("\n── Parejas frecuentes ──");
    if result.pairs.is_empty() {
        println!("  (ninguna)");
    } else {
        let mut table = new_table(vec!["Pareja", "Veces"]);
        for p in &result.pairs {
            table.add_row(vec![
                format!("{:2} - {:2}", p.pair[0], p.pair[1]),
                p.frequency.to_string(),
            ]);
        }
        println!("{table}");
    }

    println!("\n── Posiciones (orden {}) ──", order_label(result.position_order));
    let mut table = new_table(vec!["Posición", "Más frecuentes"]);
    for stat in &result.position_analysis {
        let top = stat
            .top_numbers
            .iter()
            .map(|c| format!("{} ({})", c.number, c.frequency))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![stat.position.to_string(), top]);
    }
    println!("{table}");

    if let Some(secondary) = &result.super_analysis {
        counts_table("── Super Balota caliente ──", &secondary.hot, Color::Green);
        counts_table("── Super Balota fría ──", &secondary.cold, Color::Red);
        println!("\n── Super Balota atrasada ──");
        gaps_table(&secondary.gaps);
    }

    display_recommendation(result);
}

fn display_recommendation(result: &AnalyticsResult) {
    let rec = &result.recommendation;
    println!("\n🎯 Combinación sugerida\n");

    let mut table = new_table(vec!["Números", "Super Balota", "Suma"]);
    let sum_color = if rec.rationale.within_sum_range {
        Color::Green
    } else {
        Color::Yellow
    };
    table.add_row(vec![
        Cell::new(join_numbers(&rec.numbers)),
        Cell::new(rec.secondary.map(|s| s.to_string()).unwrap_or_else(|| "—".to_string())),
        Cell::new(rec.rationale.combination_sum).fg(sum_color),
    ]);
    println!("{table}");

    let r = &rec.rationale;
    println!("  Calientes  : {:?}", r.hot);
    println!("  Atrasados  : {:?}", r.overdue);
    println!("  En alza    : {:?}", r.trending);
    println!(
        "  Suma {} {} el rango {} – {}",
        r.combination_sum,
        if r.within_sum_range { "dentro de" } else { "fuera de" },
        r.sum_range.low,
        r.sum_range.high
    );
}

pub fn display_suggestions(suggestions: &[Suggestion]) {
    println!("\n🎲 Combinaciones sugeridas\n");

    let mut table = new_table(vec!["#", "Números", "Super Balota", "Puntaje"]);
    for (i, sug) in suggestions.iter().enumerate() {
        table.add_row(vec![
            format!("{}", i + 1),
            join_numbers(&sug.numbers),
            sug.secondary.map(|s| format!("{:2}", s)).unwrap_or_else(|| "—".to_string()),
            format!("{:.4}", sug.score),
        ]);
    }
    println!("{table}");
}
