use serde::{Deserialize, Serialize};

/// How cell values are computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Aggregation {
    /// Number of rows per cell; absent combinations are zero.
    Count,
    /// Mean of a numeric column per cell; absent combinations stay absent.
    Mean { measure: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub row: String,
    pub column: String,
    pub value: f64,
    /// Rows that contributed to the cell
    pub samples: usize,
}

/// Cross-tabulation of two dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapMatrix {
    pub row_dimension: String,
    pub column_dimension: String,
    pub aggregation: Aggregation,
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    /// Row-major, ordered by `row_labels` then `column_labels`
    pub cells: Vec<HeatmapCell>,
}

impl HeatmapMatrix {
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        self.cells
            .iter()
            .find(|c| c.row == row && c.column == column)
            .map(|c| c.value)
    }

    /// Dense grid in label order; `None` marks an absent mean cell.
    pub fn grid(&self) -> Vec<Vec<Option<f64>>> {
        self.row_labels
            .iter()
            .map(|row| {
                self.column_labels
                    .iter()
                    .map(|column| self.get(row, column))
                    .collect()
            })
            .collect()
    }

    /// Sum of samples across all cells.
    pub fn total_samples(&self) -> usize {
        self.cells.iter().map(|c| c.samples).sum()
    }

    pub fn max_value(&self) -> Option<f64> {
        self.cells.iter().map(|c| c.value).reduce(f64::max)
    }
}
