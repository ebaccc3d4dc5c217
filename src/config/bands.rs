use crate::error::FilterError;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    pub fn new(low: f64, high: f64) -> Self {
        Band { low, high }
    }

    /// Checks `0 < low < high < fs / 2`.
    pub fn validate(&self, fs: f64) -> Result<(), FilterError> {
        let nyquist = 0.5 * fs;
        for cutoff in [self.low, self.high] {
            if !(cutoff > 0.0 && cutoff < nyquist) {
                return Err(FilterError::InvalidCutoff {
                    cutoff,
                    normalized: cutoff / nyquist,
                    sample_rate: fs,
                });
            }
        }
        if self.low >= self.high {
            return Err(FilterError::InvalidBand {
                low: self.low,
                high: self.high,
            });
        }
        Ok(())
    }

    // Arithmetic mean of the two edges, where the two-stage plot switches
    // from the high-pass curve to the low-pass curve.
    pub fn center(&self) -> f64 {
        0.5 * (self.low + self.high)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(transparent)]
pub struct BandTable {
    bands: BTreeMap<String, Band>,
}

impl BandTable {
    pub fn new() -> Self {
        BandTable {
            bands: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, name: &str, band: Band) {
        self.bands.insert(name.to_string(), band);
    }

    pub fn get(&self, name: &str) -> Result<Band, FilterError> {
        self.bands
            .get(name)
            .copied()
            .ok_or_else(|| FilterError::UnknownBand(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bands.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}

impl Default for BandTable {
    /// Classic EEG rhythms in Hz.
    fn default() -> Self {
        let mut table = BandTable::new();
        table.insert("delta", Band::new(0.1, 4.0)); // low-pass alone would suit delta better
        table.insert("theta", Band::new(4.0, 8.0));
        table.insert("alpha", Band::new(8.0, 12.0));
        table.insert("beta", Band::new(12.5, 30.0));
        table.insert("gamma", Band::new(30.0, 100.0));
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FS: f64 = 3051.76;

    #[test]
    fn default_table_is_valid_at_default_rate() {
        let table = BandTable::default();
        assert_eq!(table.len(), 5);
        for name in table.names() {
            table.get(name).unwrap().validate(FS).unwrap();
        }
    }

    #[test]
    fn unknown_band_is_a_lookup_error() {
        let table = BandTable::default();
        assert_eq!(
            table.get("mu"),
            Err(FilterError::UnknownBand("mu".to_string()))
        );
    }

    #[test]
    fn band_above_nyquist_is_rejected() {
        let band = Band::new(10.0, 2000.0);
        assert!(matches!(
            band.validate(FS),
            Err(FilterError::InvalidCutoff { cutoff, .. }) if cutoff == 2000.0
        ));
    }

    #[test]
    fn inverted_band_is_rejected() {
        let band = Band::new(30.0, 12.5);
        assert!(matches!(
            band.validate(FS),
            Err(FilterError::InvalidBand { .. })
        ));
    }
}
