//! SSD temperature sensor

use crate::attribute::{Attribute, AttributeStore};
use ssdfan_core::Result;

/// Temperature sensor reading `temp1_input` from the SSD's hwmon directory
pub struct TemperatureSensor<S: AttributeStore> {
    store: S,
}

impl<S: AttributeStore> TemperatureSensor<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Current temperature in millidegrees Celsius
    pub async fn read_temperature(&self) -> Result<i64> {
        self.store.read_int(Attribute::Temperature).await
    }
}
