use dashboard_stats::*;
use std::sync::Arc;

const COLLECTIONS: &str = r#"[
    {"Date": "2024-12-30 17:45:00", "Province": "Gauteng"},
    {"Date": "2025-01-04", "Province": "Limpopo"},
    {"date": "2025-01-19", "province": "gauteng"},
    {"created_at": "2025-02-02T08:00:00Z", "Province": "Gauteng"},
    {"Date": "not-a-date", "Province": "Gauteng"}
]"#;

const SALES: &str = r#"[
    {"partner_id": "3", "mrr_total": "399.0000", "date_add": "2025-05-14", "location_id": "5"},
    {"partner_id": "3", "mrr_total": "399.0000", "date_add": "2025-06-10", "location_id": "11"},
    {"partner_id": "3", "mrr_total": "399.0000", "date_add": "2025-06-22", "location_id": "7"},
    {"partner_id": "4", "mrr_total": "399.0000", "date_add": "2025-06-22", "location_id": "7"},
    {"partner_id": "3", "mrr_total": "249.0000", "date_add": "2025-06-22", "location_id": "2"}
]"#;

fn print_report(stats: &StatsOrchestrator, report: Report) {
    let rules = &stats.config().eligibility;
    println!("\n📊 {}", report.chart_title(rules));

    if let Some(message) = stats.state(report).error_message() {
        println!("  ❌ {}", message);
        return;
    }

    if let Some(chart) = stats.chart(report) {
        println!("  Axis max: {}", chart.chart_max);
        for bar in &chart.bars {
            let width = (bar.height_pct / 2.0).round() as usize;
            println!(
                "  {:>3} {} | {:<50} {}",
                bar.month,
                bar.year,
                "#".repeat(width.max(1)),
                bar.total
            );
        }
    }

    let totals = stats.totals(report);
    print!("  Gauteng: {}  Limpopo: {}", totals.gauteng, totals.limpopo);
    if totals.has_other() {
        print!("  Other: {}", totals.other);
    }
    println!("  Total: {}", totals.all);
    println!("  Status: {}", stats.status_line(report));
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let collections = Arc::new(StaticProvider::from_json_str(COLLECTIONS)?);
    let sales = Arc::new(StaticProvider::from_json_str(SALES)?);
    let mut stats = StatsOrchestrator::new(collections, sales, StatsConfig::default());

    for report in [Report::Collection, Report::Sales] {
        stats.load(report).await;
        print_report(&stats, report);
    }

    Ok(())
}
