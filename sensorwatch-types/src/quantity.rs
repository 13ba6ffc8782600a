//! Tracked physical quantities and their wire-level spellings.

/// A physical quantity reported by the remote device.
///
/// Each quantity knows the field names backends use for it (including the
/// Spanish spellings of the primary device relay) and how a dashboard should
/// present it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Quantity {
    Temperature,
    Humidity,
    Distance,
}

impl Quantity {
    /// Every quantity, in display order.
    pub const ALL: [Quantity; 3] = [
        Quantity::Temperature,
        Quantity::Humidity,
        Quantity::Distance,
    ];

    /// Canonical key for this quantity.
    ///
    /// Doubles as the event/topic name a push channel subscribes to.
    pub fn key(&self) -> &'static str {
        match self {
            Quantity::Temperature => "temperature",
            Quantity::Humidity => "humidity",
            Quantity::Distance => "distance",
        }
    }

    /// Field names under which backends report this quantity, in the order
    /// the normalizer tries them. Generic `valor`/`value` keys come last.
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            Quantity::Temperature => &["temperature", "temp", "valor", "value"],
            Quantity::Humidity => &["humidity", "humedad", "valor", "value"],
            Quantity::Distance => &["distance", "distancia", "valor", "value"],
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Quantity::Temperature => "Temperature",
            Quantity::Humidity => "Humidity",
            Quantity::Distance => "Distance",
        }
    }

    /// Measurement unit suffix.
    pub fn unit(&self) -> &'static str {
        match self {
            Quantity::Temperature => "°C",
            Quantity::Humidity => "%",
            Quantity::Distance => "cm",
        }
    }

    /// Expected value range, used to scale gauges.
    ///
    /// These match the sensors the device relay ships with: a DHT-class
    /// temperature/humidity sensor and an HC-SR04 ultrasonic ranger.
    pub fn display_range(&self) -> (f64, f64) {
        match self {
            Quantity::Temperature => (0.0, 50.0),
            Quantity::Humidity => (0.0, 100.0),
            Quantity::Distance => (0.0, 400.0),
        }
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}
