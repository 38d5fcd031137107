use rand::Rng;
use rand::seq::IndexedRandom;
use rust_decimal::Decimal;

use crate::models::order::OrderDraft;

pub const SAMPLE_GARAGES: [&str; 3] = ["Shop X", "Shop Y", "Shop Z"];
pub const SAMPLE_AREAS: [&str; 5] = ["North", "East", "South", "West", "Central"];
pub const SAMPLE_WAREHOUSES: [&str; 5] = ["WH1", "WH2", "WH3", "WH4", "WH5"];

/// Totals are drawn at cent resolution, 50.00 ..= 350.00.
const MIN_TOTAL_CENTS: i64 = 5_000;
const MAX_TOTAL_CENTS: i64 = 35_000;

const MIN_ITEMS: u32 = 1;
const MAX_ITEMS: u32 = 5;

const MIN_WAREHOUSES: usize = 1;
const MAX_WAREHOUSES: usize = 2;

/// Urgent with probability 3/10.
const URGENT_NUMERATOR: u32 = 3;
const URGENT_DENOMINATOR: u32 = 10;

/// Draws the descriptive fields of one synthetic order.
pub fn random_draft<R: Rng + ?Sized>(rng: &mut R) -> OrderDraft {
    let garage = pick(rng, &SAMPLE_GARAGES);
    let area = pick(rng, &SAMPLE_AREAS);
    let total = Decimal::new(rng.random_range(MIN_TOTAL_CENTS..=MAX_TOTAL_CENTS), 2);
    let items = rng.random_range(MIN_ITEMS..=MAX_ITEMS);

    let warehouse_count = rng.random_range(MIN_WAREHOUSES..=MAX_WAREHOUSES);
    let warehouses = SAMPLE_WAREHOUSES
        .choose_multiple(rng, warehouse_count)
        .map(|code| code.to_string())
        .collect();

    let urgent = rng.random_ratio(URGENT_NUMERATOR, URGENT_DENOMINATOR);

    OrderDraft {
        garage,
        area,
        total,
        items,
        warehouses,
        urgent,
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, candidates: &[&str]) -> String {
    candidates
        .choose(rng)
        .map(|s| s.to_string())
        .unwrap_or_default()
}
