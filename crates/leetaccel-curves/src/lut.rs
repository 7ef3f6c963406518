//! Bounded lookup table for the `LookupTable` curve mode.

use core::fmt;
use core::str::FromStr;

use leetaccel_errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Maximum number of `(x, y)` entries a table can hold.
pub const MAX_TABLE_ENTRIES: usize = 512;

const FIELD: &str = "LutDataBuf";

/// One `(speed, ratio)` entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LutPoint {
    /// Input speed.
    pub x: f64,
    /// Output ratio at that speed.
    pub y: f64,
}

/// Fixed-capacity table of points with strictly increasing `x`.
///
/// The capacity never grows. Inserting past [`MAX_TABLE_ENTRIES`] is an
/// error and the text parser stops there, flagging the result as truncated.
///
/// # RT Safety
///
/// `interpolate()` is RT-safe:
/// - No heap allocations (storage is inline)
/// - O(log n) binary search
/// - No syscalls or I/O
///
/// # Example
///
/// ```
/// use leetaccel_curves::LookupTable;
///
/// let parsed = LookupTable::parse("0,1;10,2;20,1.5")?;
/// assert!(!parsed.truncated);
/// assert_eq!(parsed.table.interpolate(15.0), Some(1.75));
/// assert_eq!(parsed.table.to_text(), "0,1;10,2;20,1.5");
/// # Ok::<(), leetaccel_errors::ConfigError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LookupTable {
    points: heapless::Vec<LutPoint, MAX_TABLE_ENTRIES>,
}

/// Result of parsing lookup-table text.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedTable {
    /// The parsed entries.
    pub table: LookupTable,
    /// Set when the text held more than [`MAX_TABLE_ENTRIES`] pairs.
    pub truncated: bool,
}

impl LookupTable {
    /// Fixed capacity.
    pub const CAPACITY: usize = MAX_TABLE_ENTRIES;

    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from pairs, rejecting more than [`Self::CAPACITY`].
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self, ConfigError> {
        if pairs.len() > Self::CAPACITY {
            return Err(ConfigError::TableTooLarge {
                len: pairs.len(),
                max: Self::CAPACITY,
            });
        }
        let mut table = Self::new();
        for &(x, y) in pairs {
            table.push(x, y)?;
        }
        Ok(table)
    }

    /// Build a table from separate x and y arrays of equal length.
    pub fn from_columns(xs: &[f64], ys: &[f64]) -> Result<Self, ConfigError> {
        if xs.len() != ys.len() {
            return Err(ConfigError::invalid_format(
                FIELD,
                format!("{} x values but {} y values", xs.len(), ys.len()),
            ));
        }
        if xs.len() > Self::CAPACITY {
            return Err(ConfigError::TableTooLarge {
                len: xs.len(),
                max: Self::CAPACITY,
            });
        }
        let mut table = Self::new();
        for (&x, &y) in xs.iter().zip(ys) {
            table.push(x, y)?;
        }
        Ok(table)
    }

    /// Build from columns, keeping the first [`Self::CAPACITY`] pairs of a
    /// longer table and reporting the cut.
    ///
    /// # Errors
    ///
    /// Columns of different lengths, or kept entries [`Self::push`] rejects.
    pub fn from_columns_truncated(xs: &[f64], ys: &[f64]) -> Result<ParsedTable, ConfigError> {
        if xs.len() != ys.len() {
            return Err(ConfigError::invalid_format(
                FIELD,
                format!("{} x values but {} y values", xs.len(), ys.len()),
            ));
        }
        let keep = xs.len().min(Self::CAPACITY);
        let mut table = Self::new();
        for (&x, &y) in xs.iter().zip(ys).take(keep) {
            table.push(x, y)?;
        }
        Ok(ParsedTable {
            table,
            truncated: keep < xs.len(),
        })
    }

    /// Append an entry.
    ///
    /// # Errors
    ///
    /// Non-finite coordinates, an `x` not above the previous one, or a full
    /// table.
    pub fn push(&mut self, x: f64, y: f64) -> Result<(), ConfigError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ConfigError::NotFinite(FIELD));
        }
        if let Some(last) = self.points.last()
            && x <= last.x
        {
            return Err(ConfigError::Unordered {
                index: self.points.len(),
                x,
                previous: last.x,
            });
        }
        self.points
            .push(LutPoint { x, y })
            .map_err(|_rejected| ConfigError::TableTooLarge {
                len: Self::CAPACITY + 1,
                max: Self::CAPACITY,
            })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when no more entries fit.
    pub fn is_full(&self) -> bool {
        self.points.is_full()
    }

    /// Entries in ascending `x` order.
    pub fn points(&self) -> &[LutPoint] {
        &self.points
    }

    /// Smallest `y` in the table.
    pub fn min_y(&self) -> Option<f64> {
        self.points.iter().map(|p| p.y).reduce(f64::min)
    }

    /// Parse `x,y` pairs where `,` and `;` are interchangeable.
    ///
    /// Whitespace and empty fields are ignored. Parsing stops at
    /// [`MAX_TABLE_ENTRIES`] entries without error.
    pub fn parse(text: &str) -> Result<ParsedTable, ConfigError> {
        let mut table = Self::new();
        let mut pending_x: Option<f64> = None;
        let mut truncated = false;

        let tokens = text
            .split([',', ';'])
            .map(str::trim)
            .filter(|token| !token.is_empty());

        for token in tokens {
            if table.is_full() {
                truncated = true;
                break;
            }
            let value = f64::from_str(token).map_err(|e| {
                ConfigError::invalid_format(FIELD, format!("'{token}' is not a number: {e}"))
            })?;
            match pending_x.take() {
                None => pending_x = Some(value),
                Some(x) => table.push(x, value)?,
            }
        }

        if let Some(x) = pending_x {
            return Err(ConfigError::invalid_format(
                FIELD,
                format!("x value {x} has no matching y"),
            ));
        }

        Ok(ParsedTable { table, truncated })
    }

    /// Render as `x,y;x,y;...`.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Store layout: all x values followed by all y values.
    pub fn to_columns(&self) -> Vec<f64> {
        let xs = self.points.iter().map(|p| p.x);
        let ys = self.points.iter().map(|p| p.y);
        xs.chain(ys).collect()
    }

    /// Piecewise-linear interpolation, clamped to the boundary `y` values.
    ///
    /// Returns `None` for an empty table.
    #[inline]
    pub fn interpolate(&self, s: f64) -> Option<f64> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        if s <= first.x {
            return Some(first.y);
        }
        if s >= last.x {
            return Some(last.y);
        }

        let upper = self.points.partition_point(|p| p.x <= s);
        let hi = self.points.get(upper)?;
        let lo = self.points.get(upper.checked_sub(1)?)?;
        let t = (s - lo.x) / (hi.x - lo.x);
        Some(lo.y + t * (hi.y - lo.y))
    }
}

impl fmt::Display for LookupTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{},{}", p.x, p.y)?;
        }
        Ok(())
    }
}

impl FromStr for LookupTable {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LookupTable::parse(s).map(|parsed| parsed.table)
    }
}

impl TryFrom<String> for LookupTable {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LookupTable> for String {
    fn from(table: LookupTable) -> Self {
        table.to_text()
    }
}
