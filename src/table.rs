use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sentinel product name for the synthetic summary row.
pub const TOTAL: &str = "Total";

/// Fixed source figures: (product, revenue, margin), in thousands of dollars.
/// Row order here is the row order of every downstream table and snapshot.
const BASE_FIGURES: &[(&str, f64, f64)] = &[
    ("Grinder", 904.50, 567.96),
    ("Moka pot", 2045.25, 181.08),
    ("Cold brew", 288.75, 241.77),
    ("Filter", 404.25, 70.01),
    ("Drip machine", 2632.00, 1374.45),
    ("AeroPress", 2601.50, 1293.78),
    ("Pour over", 846.00, 364.53),
    ("French press", 1113.25, 748.12),
    ("Cezve", 2512.50, 1969.52),
    ("Chemex", 3137.25, 817.68),
    ("Scale", 3801.00, 2910.29),
    ("Kettle", 756.25, 617.52),
    ("Espresso Machine", 8406.00, 3636.44),
];

/// One row of the sales table. Per-product rows carry every field; the Total
/// row has no icon, no unit estimate and no monthly series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub icon: Option<String>,
    pub product: String,
    pub revenue_dollars: f64,
    pub revenue_pct: f64,
    pub profit_dollars: f64,
    pub profit_pct: f64,
    pub estimated_units: Option<f64>,
    pub monthly_sales: Option<Vec<i64>>,
}

impl ProductRecord {
    pub fn is_total(&self) -> bool {
        self.product == TOTAL
    }
}

/// Round to 2 decimal places, half away from zero.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Icon file name for a product: lowercase, spaces to hyphens, `.png` suffix.
pub fn icon_name(product: &str) -> String {
    format!("{}.png", product.to_lowercase().replace(' ', "-"))
}

/// All real product names, in source order.
pub fn product_names() -> Vec<&'static str> {
    BASE_FIGURES.iter().map(|&(name, _, _)| name).collect()
}

/// Build the summary table: one row per product plus the Total row last.
///
/// Monetary literals are in thousands, so every dollar column is scaled by
/// 1000 before use. Percentage shares are computed against the per-product
/// column sums and rounded to 2 decimals BEFORE the Total row is synthesized;
/// the Total row's pct columns are therefore sums of already-rounded shares
/// (approximately 1.00), which downstream consumers expect verbatim.
pub fn build_base_table() -> Vec<ProductRecord> {
    let revenue_sum: f64 = BASE_FIGURES.iter().map(|&(_, r, _)| r * 1000.0).sum();
    let margin_sum: f64 = BASE_FIGURES.iter().map(|&(_, _, m)| m * 1000.0).sum();

    let mut rows: Vec<ProductRecord> = BASE_FIGURES
        .iter()
        .map(|&(name, revenue, margin)| {
            let revenue = revenue * 1000.0;
            let profit = margin * 1000.0;
            ProductRecord {
                icon: Some(icon_name(name)),
                product: name.to_string(),
                revenue_dollars: revenue,
                revenue_pct: round2(revenue / revenue_sum),
                profit_dollars: profit,
                profit_pct: round2(profit / margin_sum),
                estimated_units: None,
                monthly_sales: None,
            }
        })
        .collect();

    let total = ProductRecord {
        icon: None,
        product: TOTAL.to_string(),
        revenue_dollars: rows.iter().map(|r| r.revenue_dollars).sum(),
        revenue_pct: rows.iter().map(|r| r.revenue_pct).sum(),
        profit_dollars: rows.iter().map(|r| r.profit_dollars).sum(),
        profit_pct: rows.iter().map(|r| r.profit_pct).sum(),
        estimated_units: None,
        monthly_sales: None,
    };
    rows.push(total);

    debug!(rows = rows.len(), "built base table");
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirteen_products_plus_total() {
        let rows = build_base_table();
        assert_eq!(rows.len(), 14);
        assert!(rows.last().unwrap().is_total());
        assert!(rows[..13].iter().all(|r| !r.is_total()));
    }

    #[test]
    fn total_row_is_exact_column_sum() {
        let rows = build_base_table();
        let total = rows.last().unwrap();
        let revenue_sum: f64 = rows[..13].iter().map(|r| r.revenue_dollars).sum();
        let profit_sum: f64 = rows[..13].iter().map(|r| r.profit_dollars).sum();
        assert_eq!(total.revenue_dollars, revenue_sum);
        assert_eq!(total.profit_dollars, profit_sum);
        assert!(total.icon.is_none());
        assert!(total.estimated_units.is_none());
        assert!(total.monthly_sales.is_none());
    }

    #[test]
    fn pct_columns_sum_to_one() {
        let rows = build_base_table();
        // each of the 13 rows contributes at most half a rounding unit
        let revenue_pct: f64 = rows[..13].iter().map(|r| r.revenue_pct).sum();
        let profit_pct: f64 = rows[..13].iter().map(|r| r.profit_pct).sum();
        assert!((revenue_pct - 1.0).abs() <= 13.0 * 0.005, "{revenue_pct}");
        assert!((profit_pct - 1.0).abs() <= 13.0 * 0.005, "{profit_pct}");
        // and the Total row carries those sums verbatim, not a re-rounded 1.00
        let total = rows.last().unwrap();
        assert_eq!(total.revenue_pct, revenue_pct);
        assert_eq!(total.profit_pct, profit_pct);
    }

    #[test]
    fn literals_are_scaled_by_a_thousand() {
        let rows = build_base_table();
        let filter = rows.iter().find(|r| r.product == "Filter").unwrap();
        assert_eq!(filter.revenue_dollars, 404_250.0);
        assert_eq!(filter.profit_dollars, 70_010.0);
    }

    #[test]
    fn icon_derivation() {
        assert_eq!(icon_name("Drip machine"), "drip-machine.png");
        assert_eq!(icon_name("Espresso Machine"), "espresso-machine.png");
        assert_eq!(icon_name("AeroPress"), "aeropress.png");
    }

    #[test]
    fn icons_are_unique() {
        let rows = build_base_table();
        let mut icons: Vec<_> = rows[..13].iter().map(|r| r.icon.clone().unwrap()).collect();
        icons.sort();
        icons.dedup();
        assert_eq!(icons.len(), 13);
    }

    #[test]
    fn round2_half_away_from_zero() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(0.124), 0.12);
    }
}
