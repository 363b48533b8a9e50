use anyhow::Result;
use brewsim::{economics, export, season, table};
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Fixed seed so regenerated snapshots are identical run to run.
const SEED: u64 = 111;

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    let out_dir = PathBuf::from("data");

    // ─── 2) build summary table, validate lookup maps ────────────────
    let rows = table::build_base_table();
    let products = table::product_names();
    economics::validate(&products)?;
    season::validate(&products)?;
    info!(products = products.len(), "base table built, lookup maps validated");

    // ─── 3) unit economics ───────────────────────────────────────────
    let units = economics::estimate_units(&rows)?;
    info!("estimated annual units for {} products", units.len());

    // ─── 4) seasonal simulation ──────────────────────────────────────
    let mut rng = StdRng::seed_from_u64(SEED);
    let series = season::simulate(&units, &mut rng)?;
    info!("simulated {} monthly series", series.len());

    // ─── 5) assemble + export ────────────────────────────────────────
    let full = export::assemble(&rows, &units, &series);
    export::write_parquet(&full, &out_dir.join("coffee-sales.parquet"))?;
    export::write_json(&full, &out_dir.join("coffee-sales.json"))?;
    info!("wrote snapshots to {}", out_dir.display());

    Ok(())
}
