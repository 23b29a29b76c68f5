//! Test-only builders for retail frames.

use super::data_models::columns::*;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct RetailRecord {
    pub item_identifier: String,
    pub item_weight: Option<f64>,
    pub item_fat_content: Option<String>,
    pub item_visibility: Option<f64>,
    pub item_type: String,
    pub item_mrp: Option<f64>,
    pub outlet_identifier: String,
    pub outlet_establishment_year: Option<i64>,
    pub outlet_size: Option<String>,
    pub outlet_location_type: String,
    pub outlet_type: String,
    pub item_outlet_sales: Option<f64>,
}

/// A clean, qualifying record; tests override the fields they care about.
pub fn record(item_type: &str, outlet: &str, mrp: f64, sales: f64) -> RetailRecord {
    RetailRecord {
        item_identifier: format!("ITEM-{item_type}-{outlet}"),
        item_weight: Some(12.5),
        item_fat_content: Some("Low Fat".to_string()),
        item_visibility: Some(0.05),
        item_type: item_type.to_string(),
        item_mrp: Some(mrp),
        outlet_identifier: outlet.to_string(),
        outlet_establishment_year: Some(1999),
        outlet_size: Some("Medium".to_string()),
        outlet_location_type: "Tier 1".to_string(),
        outlet_type: "Supermarket Type1".to_string(),
        item_outlet_sales: Some(sales),
    }
}

pub fn frame(records: &[RetailRecord]) -> DataFrame {
    df!(
        ITEM_IDENTIFIER => records.iter().map(|r| r.item_identifier.as_str()).collect::<Vec<_>>(),
        ITEM_WEIGHT => records.iter().map(|r| r.item_weight).collect::<Vec<_>>(),
        ITEM_FAT_CONTENT => records.iter().map(|r| r.item_fat_content.as_deref()).collect::<Vec<_>>(),
        ITEM_VISIBILITY => records.iter().map(|r| r.item_visibility).collect::<Vec<_>>(),
        ITEM_TYPE => records.iter().map(|r| r.item_type.as_str()).collect::<Vec<_>>(),
        ITEM_MRP => records.iter().map(|r| r.item_mrp).collect::<Vec<_>>(),
        OUTLET_IDENTIFIER => records.iter().map(|r| r.outlet_identifier.as_str()).collect::<Vec<_>>(),
        OUTLET_ESTABLISHMENT_YEAR => records.iter().map(|r| r.outlet_establishment_year).collect::<Vec<_>>(),
        OUTLET_SIZE => records.iter().map(|r| r.outlet_size.as_deref()).collect::<Vec<_>>(),
        OUTLET_LOCATION_TYPE => records.iter().map(|r| r.outlet_location_type.as_str()).collect::<Vec<_>>(),
        OUTLET_TYPE => records.iter().map(|r| r.outlet_type.as_str()).collect::<Vec<_>>(),
        ITEM_OUTLET_SALES => records.iter().map(|r| r.item_outlet_sales).collect::<Vec<_>>()
    )
    .unwrap()
}

const ITEM_TYPES: [&str; 15] = [
    "Dairy",
    "Soft Drinks",
    "Meat",
    "Fruits and Vegetables",
    "Household",
    "Baking Goods",
    "Frozen Foods",
    "Snack Foods",
    "Health and Hygiene",
    "Hard Drinks",
    "Canned",
    "Breads",
    "Starchy Foods",
    "Breakfast",
    "Seafood",
];
const OUTLET_TYPES: [&str; 4] = [
    "Supermarket Type1",
    "Supermarket Type2",
    "Supermarket Type3",
    "Grocery Store",
];
const FAT_VARIANTS: [&str; 5] = ["Low Fat", "low fat", "LF", "Regular", "reg"];

/// Dirty records shaped like the raw extract: missing weights, zero-visibility
/// sentinels, mixed fat-content spellings. A small share carries values the
/// business filter must drop.
pub fn dirty_records(seed: u64, rows: usize) -> Vec<RetailRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..rows)
        .map(|i| {
            let item_type = ITEM_TYPES[rng.gen_range(0..ITEM_TYPES.len())];
            let outlet = format!("OUT{}", rng.gen_range(10..16));
            let mut mrp = (rng.gen_range(30.0..250.0_f64) * 100.0).round() / 100.0;
            let mut sales = (rng.gen_range(100.0..5000.0_f64) * 100.0).round() / 100.0;
            let mut year = rng.gen_range(1985..2021_i64);
            match i % 50 {
                0 => sales = 0.0,
                1 => mrp = -5.0,
                2 => year = 2100,
                _ => {}
            }
            RetailRecord {
                item_identifier: format!("ITEM{}", rng.gen_range(1000..10000)),
                item_weight: rng
                    .gen_bool(0.9)
                    .then(|| (rng.gen_range(4.0..25.0_f64) * 100.0).round() / 100.0),
                item_fat_content: Some(FAT_VARIANTS[rng.gen_range(0..FAT_VARIANTS.len())].to_string()),
                item_visibility: Some(if rng.gen_bool(0.9) {
                    (rng.gen_range(0.001..0.2_f64) * 10_000.0).round() / 10_000.0
                } else {
                    0.0
                }),
                item_type: item_type.to_string(),
                item_mrp: Some(mrp),
                outlet_type: OUTLET_TYPES[rng.gen_range(0..OUTLET_TYPES.len())].to_string(),
                outlet_identifier: outlet,
                outlet_establishment_year: Some(year),
                outlet_size: None,
                outlet_location_type: "Tier 2".to_string(),
                item_outlet_sales: Some(sales),
            }
        })
        .collect()
}

/// Renders records as the comma-separated extract the loader reads.
pub fn to_csv(records: &[RetailRecord]) -> String {
    fn opt<T: ToString>(value: &Option<T>) -> String {
        value.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    let mut out = [
        ITEM_IDENTIFIER,
        ITEM_WEIGHT,
        ITEM_FAT_CONTENT,
        ITEM_VISIBILITY,
        ITEM_TYPE,
        ITEM_MRP,
        OUTLET_IDENTIFIER,
        OUTLET_ESTABLISHMENT_YEAR,
        OUTLET_SIZE,
        OUTLET_LOCATION_TYPE,
        OUTLET_TYPE,
        ITEM_OUTLET_SALES,
    ]
    .join(",");
    out.push('\n');
    for r in records {
        let fields = [
            r.item_identifier.clone(),
            opt(&r.item_weight),
            opt(&r.item_fat_content),
            opt(&r.item_visibility),
            r.item_type.clone(),
            opt(&r.item_mrp),
            r.outlet_identifier.clone(),
            opt(&r.outlet_establishment_year),
            opt(&r.outlet_size),
            r.outlet_location_type.clone(),
            r.outlet_type.clone(),
            opt(&r.item_outlet_sales),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

pub fn f64_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name).unwrap().f64().unwrap().into_iter().collect()
}

pub fn str_values(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    df.column(name)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}
