use crate::error::Error;
use crate::table::ProductRecord;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::debug;

/// Assumed typical retail price per product, in dollars. Covers exactly the
/// products in the base table; `validate` enforces that both ways.
static PRICE_POINTS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("Grinder", 120.0),
        ("Moka pot", 30.0),
        ("Cold brew", 20.0),
        ("Filter", 15.0),
        ("Drip machine", 100.0),
        ("AeroPress", 30.0),
        ("Pour over", 40.0),
        ("French press", 25.0),
        ("Cezve", 15.0),
        ("Chemex", 45.0),
        ("Scale", 150.0),
        ("Kettle", 50.0),
        ("Espresso Machine", 700.0),
    ])
});

/// Approximate annual unit volume for one product.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitEstimate {
    pub product: String,
    pub estimated_units: f64,
}

pub fn price_point(product: &str) -> Result<f64, Error> {
    PRICE_POINTS.get(product).copied().ok_or_else(|| Error::Lookup {
        map: "price point",
        product: product.to_string(),
    })
}

/// Derive `estimated_units = revenue / price` for every real-product row.
/// The Total row is skipped; it has no unit economics.
pub fn estimate_units(rows: &[ProductRecord]) -> Result<Vec<UnitEstimate>, Error> {
    let estimates = rows
        .iter()
        .filter(|r| !r.is_total())
        .map(|r| {
            let price = price_point(&r.product)?;
            Ok(UnitEstimate {
                product: r.product.clone(),
                estimated_units: r.revenue_dollars / price,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;
    debug!(products = estimates.len(), "estimated annual units");
    Ok(estimates)
}

/// Check the closed-set contract between the base table and the price map.
pub fn validate(products: &[&str]) -> Result<(), Error> {
    for key in PRICE_POINTS.keys() {
        if !products.contains(key) {
            return Err(Error::Schema {
                product: key.to_string(),
                referenced_by: "price point map",
            });
        }
    }
    for product in products {
        price_point(product)?;
    }
    Ok(())
}
