use thiserror::Error;

/// Contract failures for the closed product set. The base table, price map,
/// pattern rules and trend map must all name exactly the same products, so
/// either variant firing means the source literals were edited inconsistently.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// A downstream lookup map references a product that is not in the base table.
    #[error("{referenced_by} references `{product}`, which is not in the base table")]
    Schema {
        product: String,
        referenced_by: &'static str,
    },

    /// A base-table product has no entry in one of the lookup maps.
    #[error("no {map} entry for product `{product}`")]
    Lookup { map: &'static str, product: String },
}
