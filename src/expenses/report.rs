use std::collections::HashMap;

use bigdecimal::BigDecimal;
use serde::Serialize;

use crate::expenses::db_types::ExpenseRecord;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: BigDecimal,
    pub count: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ExpenseReport {
    pub total: BigDecimal,
    pub categories: Vec<CategoryTotal>,
}

/// Sums amounts per category, largest total first, ties broken by name.
pub fn build_report(rows: &[ExpenseRecord]) -> ExpenseReport {
    let mut by_category: HashMap<&str, CategoryTotal> = HashMap::new();
    let mut total = BigDecimal::from(0);

    for row in rows {
        total += row.amount.clone();
        let entry = by_category
            .entry(row.category.as_str())
            .or_insert_with(|| CategoryTotal {
                category: row.category.clone(),
                total: BigDecimal::from(0),
                count: 0,
            });
        entry.total += row.amount.clone();
        entry.count += 1;
    }

    let mut categories: Vec<CategoryTotal> = by_category.into_values().collect();
    categories.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });

    ExpenseReport {
        total: total.with_scale(2),
        categories: categories
            .into_iter()
            .map(|c| CategoryTotal {
                total: c.total.with_scale(2),
                ..c
            })
            .collect(),
    }
}
