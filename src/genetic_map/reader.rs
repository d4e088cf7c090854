use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{GeneticMap, MarkerRecord};
use crate::error::{BreedingError, OptionExt, Result};

/// Accepted names of the chromosome column.
pub const CHROMOSOME_COLUMNS: [&str; 2] = ["Chr", "CHR.PHYS"];

/// Name of the raw recombination rate column.
pub const RECOMBINATION_COLUMN: &str = "RecombRate";

/// Effect column used for a single trait whose own column is absent.
pub const DEFAULT_EFFECT_COLUMN: &str = "Effect";

struct Columns {
    chromosome: usize,
    recombination: usize,
    effects: Vec<usize>,
}

impl Columns {
    fn locate(header: &[&str], trait_names: &[String]) -> Result<Self> {
        let find = |name: &str| header.iter().position(|column| *column == name);

        let chromosome = CHROMOSOME_COLUMNS
            .iter()
            .find_map(|name| find(name))
            .ok_or_else(|| {
                BreedingError::DataFormat(format!(
                    "Missing chromosome column (one of {:?})",
                    CHROMOSOME_COLUMNS
                ))
            })?;
        let recombination = find(RECOMBINATION_COLUMN).ok_or_else(|| {
            BreedingError::DataFormat(format!("Missing column {}", RECOMBINATION_COLUMN))
        })?;

        let effects = trait_names
            .iter()
            .map(|name| {
                find(name)
                    .or_else(|| {
                        (trait_names.len() == 1)
                            .then(|| find(DEFAULT_EFFECT_COLUMN))
                            .flatten()
                    })
                    .ok_or_else(|| {
                        BreedingError::DataFormat(format!("Missing effect column {}", name))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            chromosome,
            recombination,
            effects,
        })
    }

    fn width(&self) -> usize {
        self.effects
            .iter()
            .copied()
            .chain([self.chromosome, self.recombination])
            .max()
            .map_or(0, |max| max + 1)
    }
}

fn parse_cell<T: std::str::FromStr>(cell: &str, line: usize, column: &str) -> Result<T> {
    cell.parse().map_err(|_| {
        BreedingError::DataFormat(format!(
            "Line {}: invalid {} value {:?}",
            line, column, cell
        ))
    })
}

impl GeneticMap {
    /// Loads a genetic map from a whitespace separated table with a header row.
    ///
    /// Required columns are a chromosome column (`Chr` or `CHR.PHYS`),
    /// `RecombRate`, and one effect column per trait name. A single trait may
    /// instead be read from an `Effect` column. Blank lines and lines starting
    /// with `#` are skipped.
    ///
    /// # Errors
    ///
    /// Returns `BreedingError::DataFormat` for a missing header or column, an
    /// unparsable or missing cell, or an empty table, and any error
    /// [`GeneticMap::from_records`] reports on the parsed rows.
    pub fn from_reader<R: BufRead>(reader: R, trait_names: &[String]) -> Result<Self> {
        let mut columns: Option<Columns> = None;
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let cells: Vec<&str> = line.split_whitespace().collect();

            let Some(cols) = columns.as_ref() else {
                columns = Some(Columns::locate(&cells, trait_names)?);
                continue;
            };

            let line_no = line_num + 1;
            if cells.len() < cols.width() {
                return Err(BreedingError::DataFormat(format!(
                    "Line {}: expected at least {} columns, got {}",
                    line_no,
                    cols.width(),
                    cells.len()
                )));
            }

            let effects = cols
                .effects
                .iter()
                .zip(trait_names)
                .map(|(&idx, name)| parse_cell(cells[idx], line_no, name))
                .collect::<Result<Vec<f32>>>()?;

            records.push(MarkerRecord {
                chromosome: parse_cell(cells[cols.chromosome], line_no, "chromosome")?,
                recombination_rate: parse_cell(
                    cells[cols.recombination],
                    line_no,
                    RECOMBINATION_COLUMN,
                )?,
                effects,
            });
        }

        columns.ok_or_else_breeding(|| {
            BreedingError::DataFormat("Genetic map has no header row".to_string())
        })?;

        Self::from_records(&records)
    }

    /// Loads a genetic map from a file. See [`GeneticMap::from_reader`].
    pub fn from_path<P: AsRef<Path>>(path: P, trait_names: &[String]) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), trait_names)
    }
}
