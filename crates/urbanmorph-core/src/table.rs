//! Attribute table: one row per unit, one numeric column per characteristic
//!
//! The table is the immutable input of the aggregation phase. All sanitation
//! happens at build time: non-finite values are normalized to zero and
//! per-characteristic floors are applied, so downstream statistics never see
//! NaN or infinity.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::unit::UnitKey;

/// Descriptor for one named numeric characteristic.
///
/// Characteristics are supplied explicitly at table construction; the set of
/// columns is never inferred from data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Characteristic {
    name: String,
    /// Lower bound applied during ingestion; values below it are raised to it.
    /// Used for characteristics that are non-negative by definition but may
    /// carry spurious negatives from upstream extraction (e.g. meshedness).
    #[serde(default)]
    floor: Option<f64>,
}

impl Characteristic {
    /// Create a descriptor with no floor
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            floor: None,
        }
    }

    /// Create a descriptor whose values are clamped from below at ingestion
    pub fn with_floor(name: impl Into<String>, floor: f64) -> Self {
        Self {
            name: name.into(),
            floor: Some(floor),
        }
    }

    /// Characteristic name, used to derive output column names
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ingestion floor, if any
    pub fn floor(&self) -> Option<f64> {
        self.floor
    }
}

/// Column-major table of characteristic values keyed by unit id.
#[derive(Debug, Clone)]
pub struct AttributeTable<K: UnitKey> {
    ids: Vec<K>,
    index: HashMap<K, usize>,
    characteristics: Vec<Characteristic>,
    columns: Vec<Vec<f64>>,
}

impl<K: UnitKey> AttributeTable<K> {
    /// Start building a table over the given characteristics
    pub fn builder(characteristics: Vec<Characteristic>) -> AttributeTableBuilder<K> {
        AttributeTableBuilder::new(characteristics)
    }

    /// Number of units (rows)
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Unit ids in insertion order
    pub fn ids(&self) -> &[K] {
        &self.ids
    }

    /// The characteristic descriptors, in column order
    pub fn characteristics(&self) -> &[Characteristic] {
        &self.characteristics
    }

    /// Number of characteristic columns
    pub fn num_characteristics(&self) -> usize {
        self.characteristics.len()
    }

    /// Row index of a unit id
    pub fn position(&self, id: &K) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Check whether a unit id is present
    pub fn contains(&self, id: &K) -> bool {
        self.index.contains_key(id)
    }

    /// Unit id at a row index
    ///
    /// Panics if `row` is out of bounds; rows come from this table's own
    /// iteration range.
    pub fn id_at(&self, row: usize) -> &K {
        &self.ids[row]
    }

    /// One characteristic's full column
    pub fn column(&self, c: usize) -> &[f64] {
        &self.columns[c]
    }

    /// Look up a column by characteristic name
    pub fn column_by_name(&self, name: &str) -> Option<&[f64]> {
        self.characteristics
            .iter()
            .position(|ch| ch.name() == name)
            .map(|c| self.columns[c].as_slice())
    }

    /// Single cell
    pub fn value(&self, row: usize, c: usize) -> f64 {
        self.columns[c][row]
    }

    /// Collect the values of one column at the given row indices
    pub fn gather(&self, rows: &[usize], c: usize) -> Vec<f64> {
        let column = &self.columns[c];
        rows.iter().map(|&r| column[r]).collect()
    }
}

impl<K: UnitKey> fmt::Display for AttributeTable<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AttributeTable({} units x {} characteristics)",
            self.len(),
            self.num_characteristics()
        )
    }
}

/// Builder enforcing the table invariants: fixed column arity, unique ids,
/// finite values.
#[derive(Debug)]
pub struct AttributeTableBuilder<K: UnitKey> {
    characteristics: Vec<Characteristic>,
    ids: Vec<K>,
    index: HashMap<K, usize>,
    columns: Vec<Vec<f64>>,
}

impl<K: UnitKey> AttributeTableBuilder<K> {
    /// Create a builder for the given characteristic columns
    pub fn new(characteristics: Vec<Characteristic>) -> Self {
        let width = characteristics.len();
        Self {
            characteristics,
            ids: Vec::new(),
            index: HashMap::new(),
            columns: vec![Vec::new(); width],
        }
    }

    /// Append one unit's attribute row.
    ///
    /// Values are sanitized on the way in: NaN and infinities become 0.0
    /// (they must never reach a statistic), then the characteristic's floor
    /// is applied.
    pub fn push_row(&mut self, id: K, values: &[f64]) -> Result<()> {
        if values.len() != self.characteristics.len() {
            return Err(Error::size_mismatch(
                self.characteristics.len(),
                values.len(),
                "attribute row",
            ));
        }
        if self.index.contains_key(&id) {
            return Err(Error::InvalidInput(format!("duplicate unit id: {id}")));
        }
        self.index.insert(id.clone(), self.ids.len());
        self.ids.push(id);
        for (c, (&raw, ch)) in values.iter().zip(&self.characteristics).enumerate() {
            let mut v = if raw.is_finite() { raw } else { 0.0 };
            if let Some(floor) = ch.floor() {
                if v < floor {
                    v = floor;
                }
            }
            self.columns[c].push(v);
        }
        Ok(())
    }

    /// Finish building
    pub fn build(self) -> AttributeTable<K> {
        AttributeTable {
            ids: self.ids,
            index: self.index,
            characteristics: self.characteristics,
            columns: self.columns,
        }
    }
}
