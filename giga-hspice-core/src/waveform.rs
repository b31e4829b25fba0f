//! The in-memory representation of a decoded simulation: the variable
//! catalogue, the sample tables and the aggregate that ties them together.
use crate::enums::{AnalysisKind, VarKind};
use crate::errors::*;

use fnv::FnvHashMap;
use num::complex::Complex64;
#[cfg(any(feature = "to_json", feature = "serde"))]
use serde::{Deserialize, Serialize};

/// A named simulation variable.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    any(feature = "to_json", feature = "serde"),
    derive(Serialize, Deserialize)
)]
pub struct Variable {
    /// The name exactly as the file spells it (case is preserved).
    pub name: String,
    /// The declared kind of the variable.
    pub var_type: VarKind,
}

impl Variable {
    pub fn new<S: Into<String>>(name: S, var_type: VarKind) -> Self {
        Variable {
            name: name.into(),
            var_type,
        }
    }
}

/// One column of samples.
///
/// The scale column is always real, as are all columns of transient and DC
/// tables; the data columns of an AC table are complex.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Real(Vec<f64>),
    Complex(Vec<Complex64>),
}

impl Column {
    /// The number of points in the column.
    pub fn len(&self) -> usize {
        match self {
            Column::Real(v) => v.len(),
            Column::Complex(v) => v.len(),
        }
    }

    /// Obligatory `is_empty` method.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The real samples, or `None` for a complex column.
    pub fn as_real(&self) -> Option<&[f64]> {
        match self {
            Column::Real(v) => Some(v),
            Column::Complex(_) => None,
        }
    }

    /// The complex samples, or `None` for a real column.
    pub fn as_complex(&self) -> Option<&[Complex64]> {
        match self {
            Column::Real(_) => None,
            Column::Complex(v) => Some(v),
        }
    }
}

/// An ordered collection of points, stored column-major.
///
/// Column-major storage matches the consumer's access pattern: a by-name
/// lookup hands back one contiguous vector per variable.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    columns: Vec<Column>,
}

impl DataTable {
    /// Assemble a table from ready columns. All columns must have the same
    /// length.
    pub fn new(columns: Vec<Column>) -> Result<Self, WaveError> {
        if let Some(first) = columns.first() {
            let l = first.len();
            for c in &columns[1..] {
                if c.len() != l {
                    return Err(WaveError::ColumnLengthMismatch { a: l, b: c.len() });
                }
            }
        }
        Ok(DataTable { columns })
    }

    /// The number of columns (variables) of the table.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// The number of points (rows) of the table.
    pub fn num_points(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    /// Get a column by its positional index.
    pub fn column(&self, i: usize) -> Option<&Column> {
        self.columns.get(i)
    }

    /// All columns, in declared variable order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Consume the table, handing out its columns.
    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}

/// The fully decoded content of one waveform file.
///
/// Invariants, enforced on construction:
/// - every table has one column per entry of the variable catalogue, in
///   declared order, and all columns of a table share one length;
/// - the first column of every table is real, and the data columns are
///   complex exactly when the analysis is AC;
/// - a swept result has one table per sweep value; an unswept result has
///   exactly one table.
/// ```
/// use giga_hspice_core::{AnalysisKind, Column, DataTable, Variable, VarKind, WaveformResult};
///
/// let variables = vec![
///     Variable::new("TIME", VarKind::Time),
///     Variable::new("v(out)", VarKind::Voltage),
/// ];
/// let table = DataTable::new(vec![
///     Column::Real(vec![0.0, 1.0e-9]),
///     Column::Real(vec![0.5, 0.25]),
/// ])
/// .unwrap();
///
/// let result = WaveformResult::new(
///     "demo".to_string(),
///     "today".to_string(),
///     AnalysisKind::Transient,
///     variables,
///     vec![table],
///     None,
/// )
/// .unwrap();
///
/// assert_eq!(result.len(), 2);
/// assert_eq!(result.scale_name(), "TIME");
/// // Lookups fall back to case-folded matching.
/// assert!(result.get("V(OUT)").is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformResult {
    /// The simulation title, as the file spells it.
    pub title: String,
    /// The simulation date string, uninterpreted.
    pub date: String,
    /// The analysis genre of the run.
    pub analysis: AnalysisKind,
    variables: Vec<Variable>,
    tables: Vec<DataTable>,
    sweep_param: Option<Variable>,
    sweep_values: Option<Vec<f64>>,
    /// Case-folded name lookup. The first declaration wins when two names
    /// collide after folding.
    lookup: FnvHashMap<String, usize>,
}

impl WaveformResult {
    /// Build the aggregate, checking its invariants.
    ///
    /// `sweep` carries the sweep parameter together with its value vector;
    /// `None` means an unswept run with exactly one table.
    pub fn new(
        title: String,
        date: String,
        analysis: AnalysisKind,
        variables: Vec<Variable>,
        tables: Vec<DataTable>,
        sweep: Option<(Variable, Vec<f64>)>,
    ) -> Result<Self, WaveError> {
        for (t, table) in tables.iter().enumerate() {
            if table.num_columns() != variables.len() {
                return Err(WaveError::PointWidthMismatch {
                    expected: variables.len(),
                    got: table.num_columns(),
                });
            }
            for (c, column) in table.columns().iter().enumerate() {
                let want_complex = c > 0 && analysis == AnalysisKind::Ac;
                let is_complex = matches!(column, Column::Complex(_));
                if want_complex != is_complex {
                    return Err(WaveError::BadColumnKind { table: t, column: c });
                }
            }
        }
        let (sweep_param, sweep_values) = match sweep {
            Some((param, values)) => {
                if values.len() != tables.len() {
                    return Err(WaveError::SweepCountMismatch {
                        segments: tables.len(),
                        values: values.len(),
                    });
                }
                (Some(param), Some(values))
            }
            None => {
                if tables.len() != 1 {
                    return Err(WaveError::StraySegment);
                }
                (None, None)
            }
        };
        let mut lookup = FnvHashMap::default();
        for (i, v) in variables.iter().enumerate() {
            lookup.entry(v.name.to_ascii_lowercase()).or_insert(i);
        }
        Ok(WaveformResult {
            title,
            date,
            analysis,
            variables,
            tables,
            sweep_param,
            sweep_values,
            lookup,
        })
    }

    /// The variable catalogue, scale first.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// The decoded tables, one per sweep value (one for unswept runs).
    pub fn tables(&self) -> &[DataTable] {
        &self.tables
    }

    /// Get a single table by index.
    pub fn table(&self, i: usize) -> Option<&DataTable> {
        self.tables.get(i)
    }

    /// The sweep parameter, if the run was swept.
    pub fn sweep_param(&self) -> Option<&Variable> {
        self.sweep_param.as_ref()
    }

    /// One sweep value per table, if the run was swept.
    pub fn sweep_values(&self) -> Option<&[f64]> {
        self.sweep_values.as_deref()
    }

    /// The name of the scale (the first variable).
    pub fn scale_name(&self) -> &str {
        self.variables
            .first()
            .map(|v| v.name.as_str())
            .unwrap_or("")
    }

    /// The number of variables, scale included.
    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    /// The point count of the first table.
    pub fn len(&self) -> usize {
        self.tables.first().map(|t| t.num_points()).unwrap_or(0)
    }

    /// Obligatory `is_empty` method.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a variable name to its positional index.
    ///
    /// An exact-case match wins; failing that, the case-folded lookup is
    /// consulted.
    pub fn variable_index(&self, name: &str) -> Option<usize> {
        if let Some(i) = self.variables.iter().position(|v| v.name == name) {
            return Some(i);
        }
        self.lookup.get(&name.to_ascii_lowercase()).copied()
    }

    /// Get a variable's column from the first table.
    pub fn get(&self, name: &str) -> Option<&Column> {
        self.get_in_table(name, 0)
    }

    /// Get a variable's column from the table with the given index.
    pub fn get_in_table(&self, name: &str, table: usize) -> Option<&Column> {
        let i = self.variable_index(name)?;
        self.tables.get(table).and_then(|t| t.column(i))
    }
}

#[cfg(feature = "to_json")]
impl WaveformResult {
    /// Serialise the header metadata (everything but the sample matrix) to
    /// JSON.
    pub fn header_to_json(&self) -> Result<String, WaveError> {
        #[derive(Serialize)]
        struct Meta<'a> {
            title: &'a str,
            date: &'a str,
            analysis: &'a str,
            scale_name: &'a str,
            variables: &'a [Variable],
            sweep_param: Option<&'a Variable>,
            sweep_values: Option<&'a [f64]>,
        }
        serde_json::to_string(&Meta {
            title: &self.title,
            date: &self.date,
            analysis: self.analysis.as_str(),
            scale_name: self.scale_name(),
            variables: &self.variables,
            sweep_param: self.sweep_param(),
            sweep_values: self.sweep_values(),
        })
        .map_err(WaveError::SerdeError)
    }
}
