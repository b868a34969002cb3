use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// A voyage record; `route_id` also identifies the ship for CB purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub id: i64,
    pub route_id: String,
    pub vessel_type: String,
    pub fuel_type: String,
    pub year: i32,
    /// gCO2e/MJ
    pub ghg_intensity: Decimal,
    /// tonnes
    pub fuel_consumption: Decimal,
    /// km
    pub distance: Decimal,
    /// tonnes
    pub total_emissions: Decimal,
    pub is_baseline: bool,
}

/// Optional equality filters for listing routes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteFilter {
    pub vessel_type: Option<String>,
    pub fuel_type: Option<String>,
    pub year: Option<i32>,
}

impl RouteFilter {
    pub fn matches(&self, route: &Route) -> bool {
        self.vessel_type
            .as_deref()
            .map_or(true, |v| route.vessel_type == v)
            && self.fuel_type.as_deref().map_or(true, |f| route.fuel_type == f)
            && self.year.map_or(true, |y| route.year == y)
    }
}

/// Reference dataset loaded by `fueleu seed` and `serve --in-memory`.
pub fn seed_routes() -> Vec<Route> {
    let row = |id: i64,
               route_id: &str,
               vessel_type: &str,
               fuel_type: &str,
               year: i32,
               ghg_intensity: Decimal,
               fuel_consumption: Decimal,
               distance: Decimal,
               total_emissions: Decimal,
               is_baseline: bool| Route {
        id,
        route_id: route_id.to_string(),
        vessel_type: vessel_type.to_string(),
        fuel_type: fuel_type.to_string(),
        year,
        ghg_intensity,
        fuel_consumption,
        distance,
        total_emissions,
        is_baseline,
    };

    vec![
        row(1, "R001", "Container", "HFO", 2024, dec!(91.0), dec!(5000), dec!(12000), dec!(4500), false),
        row(2, "R002", "BulkCarrier", "LNG", 2024, dec!(88.0), dec!(4800), dec!(11500), dec!(4200), false),
        row(3, "R003", "Tanker", "MGO", 2024, dec!(93.5), dec!(5100), dec!(12500), dec!(4700), false),
        row(4, "R004", "RoRo", "HFO", 2025, dec!(89.2), dec!(4900), dec!(11800), dec!(4300), true),
        row(5, "R005", "Container", "LNG", 2025, dec!(90.5), dec!(4950), dec!(11900), dec!(4400), false),
    ]
}
