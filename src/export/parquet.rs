use crate::table::ProductRecord;
use anyhow::{Context, Result};
use arrow::{
    array::{
        Array, ArrayRef, Float64Array, Float64Builder, Int64Array, Int64Builder, ListArray,
        ListBuilder, StringArray, StringBuilder,
    },
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use parquet::arrow::{arrow_reader::ParquetRecordBatchReaderBuilder, ArrowWriter};
use std::{
    fs::{self, File},
    io::BufWriter,
    path::Path,
    sync::Arc,
};
use tracing::instrument;

/// Arrow schema of the exported table. Nullable columns are exactly the ones
/// the Total row leaves empty.
pub fn table_schema() -> Schema {
    Schema::new(vec![
        Field::new("icon", DataType::Utf8, true),
        Field::new("product", DataType::Utf8, false),
        Field::new("revenue_dollars", DataType::Float64, false),
        Field::new("revenue_pct", DataType::Float64, false),
        Field::new("profit_dollars", DataType::Float64, false),
        Field::new("profit_pct", DataType::Float64, false),
        Field::new("estimated_units", DataType::Float64, true),
        Field::new(
            "monthly_sales",
            DataType::List(Arc::new(Field::new("item", DataType::Int64, true))),
            true,
        ),
    ])
}

/// Convert records into a single Arrow batch matching `table_schema`.
pub fn to_record_batch(records: &[ProductRecord]) -> Result<RecordBatch> {
    let mut icon = StringBuilder::new();
    let mut product = StringBuilder::new();
    let mut revenue = Float64Builder::new();
    let mut revenue_pct = Float64Builder::new();
    let mut profit = Float64Builder::new();
    let mut profit_pct = Float64Builder::new();
    let mut units = Float64Builder::new();
    let mut monthly = ListBuilder::new(Int64Builder::new());

    for r in records {
        icon.append_option(r.icon.as_deref());
        product.append_value(&r.product);
        revenue.append_value(r.revenue_dollars);
        revenue_pct.append_value(r.revenue_pct);
        profit.append_value(r.profit_dollars);
        profit_pct.append_value(r.profit_pct);
        units.append_option(r.estimated_units);
        match &r.monthly_sales {
            Some(values) => {
                monthly.values().append_slice(values);
                monthly.append(true);
            }
            None => monthly.append(false),
        }
    }

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(icon.finish()),
        Arc::new(product.finish()),
        Arc::new(revenue.finish()),
        Arc::new(revenue_pct.finish()),
        Arc::new(profit.finish()),
        Arc::new(profit_pct.finish()),
        Arc::new(units.finish()),
        Arc::new(monthly.finish()),
    ];
    RecordBatch::try_new(Arc::new(table_schema()), arrays).map_err(Into::into)
}

/// Write the table as a single-batch Parquet file, atomically (tmp + rename).
#[instrument(level = "info", skip(records), fields(path = %path.display(), rows = records.len()))]
pub fn write_parquet(records: &[ProductRecord], path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let batch = to_record_batch(records)?;
    let tmp = path.with_extension("parquet.tmp");
    let file = File::create(&tmp).with_context(|| format!("creating {}", tmp.display()))?;
    let mut writer = ArrowWriter::try_new(BufWriter::new(file), batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;
    fs::rename(&tmp, path)
        .with_context(|| format!("renaming {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

/// Read a Parquet snapshot back into records, preserving row order.
pub fn read_parquet(path: &Path) -> Result<Vec<ProductRecord>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
    let mut out = Vec::new();
    for batch in reader {
        let batch = batch?;
        out.extend(batch_to_records(&batch)?);
    }
    Ok(out)
}

fn batch_to_records(batch: &RecordBatch) -> Result<Vec<ProductRecord>> {
    let icon = string_col(batch, "icon")?;
    let product = string_col(batch, "product")?;
    let revenue = f64_col(batch, "revenue_dollars")?;
    let revenue_pct = f64_col(batch, "revenue_pct")?;
    let profit = f64_col(batch, "profit_dollars")?;
    let profit_pct = f64_col(batch, "profit_pct")?;
    let units = f64_col(batch, "estimated_units")?;
    let monthly = column(batch, "monthly_sales")?
        .as_any()
        .downcast_ref::<ListArray>()
        .context("column `monthly_sales` is not a List")?;

    let mut records = Vec::with_capacity(batch.num_rows());
    for i in 0..batch.num_rows() {
        let monthly_sales = if monthly.is_null(i) {
            None
        } else {
            let values = monthly.value(i);
            let ints = values
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("`monthly_sales` items are not Int64")?;
            Some(ints.values().to_vec())
        };
        records.push(ProductRecord {
            icon: if icon.is_null(i) {
                None
            } else {
                Some(icon.value(i).to_string())
            },
            product: product.value(i).to_string(),
            revenue_dollars: revenue.value(i),
            revenue_pct: revenue_pct.value(i),
            profit_dollars: profit.value(i),
            profit_pct: profit_pct.value(i),
            estimated_units: if units.is_null(i) {
                None
            } else {
                Some(units.value(i))
            },
            monthly_sales,
        });
    }
    Ok(records)
}

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    let idx = batch
        .schema_ref()
        .index_of(name)
        .with_context(|| format!("missing column `{}`", name))?;
    Ok(batch.column(idx))
}

fn string_col<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    column(batch, name)?
        .as_any()
        .downcast_ref::<StringArray>()
        .with_context(|| format!("column `{}` is not Utf8", name))
}

fn f64_col<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Float64Array> {
    column(batch, name)?
        .as_any()
        .downcast_ref::<Float64Array>()
        .with_context(|| format!("column `{}` is not Float64", name))
}
