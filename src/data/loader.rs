use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use super::house::{House, HouseType, WallColor, NUM_TYPES};
use crate::error::LoadError;

const FIELDS_PER_RECORD: usize = 4;

/// Column-oriented view of the housing records, ready for training.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub houses: Vec<House>,
    pub squares: Vec<f64>,
    pub prices: Vec<f64>,
    pub types: Vec<[f64; NUM_TYPES]>,
}

impl Dataset {
    /// Build the columns from parsed records. Fails on an empty record set.
    pub fn from_houses(houses: Vec<House>) -> Result<Self, LoadError> {
        if houses.is_empty() {
            return Err(LoadError::Empty);
        }
        let squares = houses.iter().map(|h| h.square).collect();
        let prices = houses.iter().map(|h| h.price).collect();
        let types = houses.iter().map(|h| h.house_type.one_hot()).collect();
        Ok(Dataset {
            houses,
            squares,
            prices,
            types,
        })
    }

    pub fn len(&self) -> usize {
        self.houses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.houses.is_empty()
    }

    /// Smallest and largest `square` value.
    pub fn square_range(&self) -> (f64, f64) {
        self.squares
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            })
    }

    /// House types that occur at least once, in one-hot order.
    pub fn present_types(&self) -> Vec<HouseType> {
        HouseType::ALL
            .into_iter()
            .filter(|t| self.houses.iter().any(|h| h.house_type == *t))
            .collect()
    }
}

/// Load the dataset from a CSV file with a header row.
pub fn load_csv(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;
    read_csv(file)
}

/// Parse CSV records (`square,type,price,wall_color`) from any reader.
///
/// Every failure is reported with the 1-based line number of the record:
/// wrong field counts, unparseable numbers, and category names outside the
/// known sets are all rejected rather than mapped to a default bucket.
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut houses = Vec::new();
    for result in rdr.records() {
        let record = result?;
        houses.push(parse_record(&record)?);
    }

    Dataset::from_houses(houses)
}

fn parse_record(record: &StringRecord) -> Result<House, LoadError> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);
    if record.len() != FIELDS_PER_RECORD {
        return Err(LoadError::FieldCount {
            line,
            found: record.len(),
        });
    }

    let square = parse_number(&record[0], "square", line)?;
    let house_type =
        record[1]
            .parse::<HouseType>()
            .map_err(|_| LoadError::UnknownHouseType {
                line,
                value: record[1].to_string(),
            })?;
    let price = parse_number(&record[2], "price", line)?;
    let wall_color =
        record[3]
            .parse::<WallColor>()
            .map_err(|_| LoadError::UnknownWallColor {
                line,
                value: record[3].to_string(),
            })?;

    Ok(House {
        square,
        house_type,
        price,
        wall_color,
    })
}

fn parse_number(raw: &str, field: &'static str, line: u64) -> Result<f64, LoadError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LoadError::InvalidNumber {
            line,
            field,
            value: raw.to_string(),
        })
}
