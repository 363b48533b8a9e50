pub mod parquet;

pub use parquet::{read_parquet, write_parquet};

use crate::economics::UnitEstimate;
use crate::season::MonthlySeries;
use crate::table::ProductRecord;
use anyhow::{Context, Result};
use std::{
    fs,
    io::Write,
    path::Path,
};
use tracing::instrument;

/// Left-join unit estimates and monthly series onto the summary rows, keyed
/// by product name. Rows without a match (the Total row) keep their fields
/// null. Row order is the summary table's order.
pub fn assemble(
    rows: &[ProductRecord],
    units: &[UnitEstimate],
    series: &[MonthlySeries],
) -> Vec<ProductRecord> {
    rows.iter()
        .map(|row| {
            let mut out = row.clone();
            if let Some(u) = units.iter().find(|u| u.product == row.product) {
                out.estimated_units = Some(u.estimated_units);
            }
            if let Some(s) = series.iter().find(|s| s.product == row.product) {
                out.monthly_sales = Some(s.monthly_sales.clone());
            }
            out
        })
        .collect()
}

/// Write the table as a pretty-printed JSON array, one object per row, with
/// explicit nulls for the Total row's absent fields. Writes to a tmp file
/// and renames over the target so a failed run leaves no partial output.
#[instrument(level = "info", skip(records), fields(path = %path.display(), rows = records.len()))]
pub fn write_json(records: &[ProductRecord], path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let tmp = path.with_extension("json.tmp");
    let mut f = fs::File::create(&tmp)
        .with_context(|| format!("creating {}", tmp.display()))?;
    serde_json::to_writer_pretty(&mut f, records).context("serializing JSON")?;
    f.write_all(b"\n")?;
    fs::rename(&tmp, path)
        .with_context(|| format!("renaming {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

/// Read a JSON snapshot back into records, preserving row order.
pub fn read_json(path: &Path) -> Result<Vec<ProductRecord>> {
    let f = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(f).with_context(|| format!("parsing {}", path.display()))
}
