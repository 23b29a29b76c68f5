use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Column names of the input extract and of every derived table.
pub mod columns {
    pub const ITEM_IDENTIFIER: &str = "Item_Identifier";
    pub const ITEM_WEIGHT: &str = "Item_Weight";
    pub const ITEM_FAT_CONTENT: &str = "Item_Fat_Content";
    pub const ITEM_VISIBILITY: &str = "Item_Visibility";
    pub const ITEM_TYPE: &str = "Item_Type";
    pub const ITEM_MRP: &str = "Item_MRP";
    pub const OUTLET_IDENTIFIER: &str = "Outlet_Identifier";
    pub const OUTLET_ESTABLISHMENT_YEAR: &str = "Outlet_Establishment_Year";
    pub const OUTLET_SIZE: &str = "Outlet_Size";
    pub const OUTLET_LOCATION_TYPE: &str = "Outlet_Location_Type";
    pub const OUTLET_TYPE: &str = "Outlet_Type";
    pub const ITEM_OUTLET_SALES: &str = "Item_Outlet_Sales";

    // Row-level derived columns
    pub const OUTLET_AGE: &str = "Outlet_Age";
    pub const PRICE_BAND: &str = "Price_Band";
    pub const AVG_MRP_PER_ITEM_TYPE: &str = "Avg_MRP_Per_ItemType";
    pub const SALES_RANK_IN_OUTLET: &str = "Sales_Rank_In_Outlet";

    // Aggregated table
    pub const TOTAL_SALES: &str = "Total_Sales";
    pub const AVG_SALES: &str = "Avg_Sales";
    pub const TRANSACTION_COUNT: &str = "Transaction_Count";
    pub const MAX_MRP: &str = "Max_MRP";
    pub const AVG_OUTLET_AGE: &str = "Avg_Outlet_Age";
    pub const REVENUE_CONTRIBUTION_PERCENT: &str = "Revenue_Contribution_Percent";
}

use columns::*;

/// Keys of the aggregated table, in output column order.
pub const AGGREGATION_KEYS: [&str; 4] = [OUTLET_IDENTIFIER, OUTLET_TYPE, ITEM_TYPE, PRICE_BAND];

/// Columns the extract must carry, with the dtype each is parsed as.
pub fn input_columns() -> [(&'static str, DataType); 12] {
    [
        (ITEM_IDENTIFIER, DataType::String),
        (ITEM_WEIGHT, DataType::Float64),
        (ITEM_FAT_CONTENT, DataType::String),
        (ITEM_VISIBILITY, DataType::Float64),
        (ITEM_TYPE, DataType::String),
        (ITEM_MRP, DataType::Float64),
        (OUTLET_IDENTIFIER, DataType::String),
        (OUTLET_ESTABLISHMENT_YEAR, DataType::Int64),
        (OUTLET_SIZE, DataType::String),
        (OUTLET_LOCATION_TYPE, DataType::String),
        (OUTLET_TYPE, DataType::String),
        (ITEM_OUTLET_SALES, DataType::Float64),
    ]
}

pub fn input_schema() -> Schema {
    Schema::from_iter(
        input_columns()
            .into_iter()
            .map(|(name, dtype)| Field::new(name.into(), dtype)),
    )
}

/// Price bucket derived from `Item_MRP`. Both bounds of `Medium` are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceBand {
    Low,
    Medium,
    High,
}

impl PriceBand {
    pub const MEDIUM_FLOOR: f64 = 50.0;
    pub const MEDIUM_CEILING: f64 = 150.0;

    pub fn from_mrp(mrp: f64) -> Self {
        if mrp < Self::MEDIUM_FLOOR {
            PriceBand::Low
        } else if mrp <= Self::MEDIUM_CEILING {
            PriceBand::Medium
        } else {
            // NaN lands here too, like a missing price
            PriceBand::High
        }
    }

    /// A missing price matches neither lower branch and falls through to `High`.
    pub fn from_optional_mrp(mrp: Option<f64>) -> Self {
        mrp.map(Self::from_mrp).unwrap_or(PriceBand::High)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceBand::Low => "Low",
            PriceBand::Medium => "Medium",
            PriceBand::High => "High",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_band_boundaries_are_inclusive() {
        assert_eq!(PriceBand::from_mrp(49.99), PriceBand::Low);
        assert_eq!(PriceBand::from_mrp(50.0), PriceBand::Medium);
        assert_eq!(PriceBand::from_mrp(150.0), PriceBand::Medium);
        assert_eq!(PriceBand::from_mrp(150.01), PriceBand::High);
    }

    #[test]
    fn test_missing_price_falls_through_to_high() {
        assert_eq!(PriceBand::from_optional_mrp(None), PriceBand::High);
        assert_eq!(PriceBand::from_mrp(f64::NAN), PriceBand::High);
        assert_eq!(PriceBand::from_optional_mrp(Some(10.0)).as_str(), "Low");
    }

    #[test]
    fn test_input_schema_covers_every_column() {
        let schema = input_schema();
        assert_eq!(schema.len(), 12);
        assert_eq!(schema.get(ITEM_MRP), Some(&DataType::Float64));
        assert_eq!(schema.get(OUTLET_ESTABLISHMENT_YEAR), Some(&DataType::Int64));
    }
}
