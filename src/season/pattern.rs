/// Relative month-to-month demand shape for a product category.
pub type Curve = [f64; 12];

pub const COLD_BREW: Curve = [0.2, 0.2, 0.4, 0.8, 1.5, 2.0, 2.0, 2.0, 1.5, 0.8, 0.4, 0.2];
pub const ESPRESSO_MACHINE: Curve = [0.4, 0.5, 0.4, 0.4, 1.3, 0.3, 0.5, 0.6, 0.6, 0.4, 0.5, 1.5];
pub const HIGH_END: Curve = [0.7, 0.6, 0.7, 0.8, 0.9, 1.0, 1.0, 0.9, 0.8, 0.8, 0.7, 1.2];
pub const MEDIUM: Curve = [0.8, 0.7, 0.8, 0.9, 1.0, 1.1, 1.1, 1.0, 0.9, 0.9, 0.8, 1.1];
pub const LOW_END: Curve = [1.0, 0.9, 1.0, 1.1, 1.2, 1.3, 1.3, 1.2, 1.1, 1.0, 1.0, 1.3];

/// Ordered assignment rules, evaluated first match wins. Products matching no
/// rule fall back to the low-end curve. The rules are mutually exclusive for
/// the fixed product set, but the order is part of the contract.
const RULES: &[(&[&str], &str, &Curve)] = &[
    (&["Espresso Machine"], "espresso-machine", &ESPRESSO_MACHINE),
    (&["Scale"], "high-end", &HIGH_END),
    (&["Grinder", "Kettle", "Chemex", "Pour over"], "medium", &MEDIUM),
    (&["Cold brew"], "cold-brew", &COLD_BREW),
];

/// Seasonality curve for a product, with its pattern label.
pub fn curve_for(product: &str) -> (&'static str, &'static Curve) {
    for &(names, label, curve) in RULES {
        if names.contains(&product) {
            return (label, curve);
        }
    }
    ("low-end", &LOW_END)
}

/// Every product name the assignment rules mention, for closed-set validation.
pub fn rule_products() -> impl Iterator<Item = &'static str> {
    RULES.iter().flat_map(|&(names, _, _)| names.iter().copied())
}
