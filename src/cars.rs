use serde::{Deserialize, Serialize};

/// Collection the fleet is written to.
pub const CARS_COLLECTION: &str = "cars";

/// A rentable car as stored in Firestore. Fields are stored in camelCase
/// (`fuelCapacity`, `pricePerHour`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarRecord {
    pub model: String,
    pub distance: f64,
    pub fuel_capacity: f64,
    pub price_per_hour: f64,
}

impl CarRecord {
    pub fn new(
        model: impl Into<String>,
        distance: f64,
        fuel_capacity: f64,
        price_per_hour: f64,
    ) -> Self {
        Self {
            model: model.into(),
            distance,
            fuel_capacity,
            price_per_hour,
        }
    }
}

/// The five cars the seeder writes.
pub fn fleet() -> Vec<CarRecord> {
    vec![
        CarRecord::new("Tesla Model 3", 15.5, 100.0, 25.0),
        CarRecord::new("Toyota Camry", 20.0, 60.0, 15.0),
        CarRecord::new("Honda Civic", 18.0, 50.0, 12.0),
        CarRecord::new("BMW X5", 25.0, 80.0, 30.0),
        CarRecord::new("Mercedes-Benz E-Class", 22.0, 70.0, 35.0),
    ]
}
