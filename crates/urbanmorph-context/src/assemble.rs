//! Result assembly: the wide contextual table

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io;

use urbanmorph_classify::ContextPlan;
use urbanmorph_core::{Result, UnitKey};

/// Column-name suffixes of the four statistics, in output order
pub const STAT_SUFFIXES: [&str; 4] = ["meanIQ3", "rangeIQ3", "theil", "simpson"];

/// Wide result table: one row per unit, four named columns per
/// characteristic (`<name>_meanIQ3`, `<name>_rangeIQ3`, `<name>_theil`,
/// `<name>_simpson`).
///
/// Rows are keyed purely by unit id; merging and filtering never reorder
/// which value lands under which id.
#[derive(Debug, Clone)]
pub struct ContextualTable<K: UnitKey> {
    ids: Vec<K>,
    index: HashMap<K, usize>,
    columns: Vec<String>,
    data: Vec<Vec<f64>>,
}

impl<K: UnitKey> ContextualTable<K> {
    /// Assemble from per-unit rows, in the order the engine produced them
    pub(crate) fn from_rows(ids: Vec<K>, plan: &ContextPlan, data: Vec<Vec<f64>>) -> Self {
        debug_assert_eq!(ids.len(), data.len());
        let columns = plan
            .columns()
            .iter()
            .flat_map(|c| {
                STAT_SUFFIXES
                    .iter()
                    .map(move |suffix| format!("{}_{suffix}", c.output()))
            })
            .collect();
        let index = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        Self {
            ids,
            index,
            columns,
            data,
        }
    }

    /// Number of unit rows
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Unit ids in row order
    pub fn ids(&self) -> &[K] {
        &self.ids
    }

    /// The 4xC output column names
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// One unit's full output row
    pub fn row(&self, id: &K) -> Option<&[f64]> {
        self.index.get(id).map(|&i| self.data[i].as_slice())
    }

    /// One cell, addressed by unit id and column name
    pub fn value(&self, id: &K, column: &str) -> Option<f64> {
        let c = self.columns.iter().position(|name| name == column)?;
        self.row(id).map(|row| row[c])
    }

    /// Restrict rows to the given ids, preserving current row order.
    ///
    /// The caller-facing subset step: e.g. keep building units after
    /// tessellation cells were aggregated too. Ids absent from the table are
    /// ignored.
    pub fn filtered(&self, keep: &[K]) -> Self {
        let keep: HashSet<&K> = keep.iter().collect();
        let mut ids = Vec::new();
        let mut data = Vec::new();
        for (i, id) in self.ids.iter().enumerate() {
            if keep.contains(id) {
                ids.push(id.clone());
                data.push(self.data[i].clone());
            }
        }
        let index = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        Self {
            ids,
            index,
            columns: self.columns.clone(),
            data,
        }
    }

    /// Write the table as CSV, ids under a leading `unit` column
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);

        let mut header = Vec::with_capacity(self.columns.len() + 1);
        header.push("unit".to_string());
        header.extend(self.columns.iter().cloned());
        csv.write_record(&header)
            .map_err(|e| anyhow::Error::from(e))?;

        let mut record = Vec::with_capacity(self.columns.len() + 1);
        for (id, row) in self.ids.iter().zip(&self.data) {
            record.clear();
            record.push(id.to_string());
            record.extend(row.iter().map(|v| v.to_string()));
            csv.write_record(&record)
                .map_err(|e| anyhow::Error::from(e))?;
        }
        csv.flush()?;
        Ok(())
    }
}

impl<K: UnitKey> fmt::Display for ContextualTable<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ContextualTable({} units x {} columns)",
            self.len(),
            self.columns.len()
        )
    }
}
