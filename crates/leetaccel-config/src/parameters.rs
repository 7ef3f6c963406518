//! Mapping between a [`Parameters`] snapshot and the named store entries.
//!
//! The lookup table is stored as `LutSize` plus one bulk `LutDataBuf` holding
//! all x values followed by all y values. Every other field maps to exactly
//! one entry.

use leetaccel_curves::{
    AccelCurve, AccelMode, LookupTable, MAX_TABLE_ENTRIES, Parameters, ParsedTable,
};
use leetaccel_errors::ConfigError;
use tracing::{debug, warn};

use crate::name::{ParamName, ParamValue};
use crate::store::ParameterStore;

/// A parameter set read from a store, with what had to be cut to fit.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    /// The loaded parameters.
    pub parameters: Parameters,
    /// The stored table held more than [`MAX_TABLE_ENTRIES`] entries and
    /// only the first ones were kept.
    pub table_truncated: bool,
}

/// Read a full parameter set from `store`.
///
/// Entries that were never written keep their [`Parameters::default`]
/// value. A table longer than the capacity is truncated; use
/// [`load_parameters_report`] to learn whether that happened.
///
/// # Errors
///
/// Backend failures, values of the wrong shape, an unknown mode code, or a
/// `LutSize` that disagrees with `LutDataBuf`.
pub fn load_parameters<S: ParameterStore + ?Sized>(store: &S) -> Result<Parameters, ConfigError> {
    load_parameters_report(store).map(|report| report.parameters)
}

/// [`load_parameters`], also reporting lookup-table truncation.
///
/// # Errors
///
/// As for [`load_parameters`].
pub fn load_parameters_report<S: ParameterStore + ?Sized>(
    store: &S,
) -> Result<LoadReport, ConfigError> {
    let defaults = Parameters::default();
    let scalar = |name: ParamName, default: f64| -> Result<f64, ConfigError> {
        read(store, name)?.map_or(Ok(default), |v| v.as_scalar(name))
    };

    let mode = match read(store, ParamName::AccelerationMode)? {
        Some(v) => AccelMode::from_code(v.as_integer(ParamName::AccelerationMode)?)?,
        None => defaults.mode,
    };
    let use_smoothing = match read(store, ParamName::UseSmoothing)? {
        Some(v) => v.as_flag(ParamName::UseSmoothing)?,
        None => defaults.use_smoothing,
    };

    let ParsedTable { table, truncated } = load_table(store)?;
    let params = Parameters {
        mode,
        sensitivity: scalar(ParamName::Sensitivity, defaults.sensitivity)?,
        pre_scale: scalar(ParamName::PreScale, defaults.pre_scale)?,
        output_cap: scalar(ParamName::OutputCap, defaults.output_cap)?,
        input_cap: scalar(ParamName::InputCap, defaults.input_cap)?,
        offset: scalar(ParamName::Offset, defaults.offset)?,
        rotation_degrees: scalar(ParamName::RotationAngle, defaults.rotation_degrees)?,
        accel_factor: scalar(ParamName::Acceleration, defaults.accel_factor)?,
        exponent: scalar(ParamName::Exponent, defaults.exponent)?,
        midpoint: scalar(ParamName::Midpoint, defaults.midpoint)?,
        use_smoothing,
        lookup_table: table,
    };

    debug!(
        mode = %params.mode,
        table_len = params.lookup_table.len(),
        "Loaded parameters from store"
    );
    Ok(LoadReport {
        parameters: params,
        table_truncated: truncated,
    })
}

/// Write every field of `params` to `store`.
///
/// The set is validated first, so a store never receives parameters the
/// curve engine would reject.
///
/// # Errors
///
/// The validation error, or the first store write that fails.
pub fn save_parameters<S: ParameterStore + ?Sized>(
    params: &Parameters,
    store: &S,
) -> Result<(), ConfigError> {
    if let Err(e) = AccelCurve::from_parameters(params) {
        warn!(mode = %params.mode, error = %e, "Refusing to save invalid parameters");
        return Err(e);
    }
    for (name, value) in entries(params) {
        store.set(name, value)?;
    }
    debug!(mode = %params.mode, "Saved parameters to store");
    Ok(())
}

/// Rewrite entries that are missing or unreadable with their defaults.
///
/// A table whose size and buffer disagree is reset to empty. Returns how
/// many entries were rewritten.
///
/// # Errors
///
/// Backend failures while reading or writing.
pub fn repair_parameters<S: ParameterStore + ?Sized>(store: &S) -> Result<usize, ConfigError> {
    let mut fixed = 0;
    for (name, default) in entries(&Parameters::default()) {
        let healthy = match name {
            ParamName::LutSize | ParamName::LutDataBuf => continue,
            _ => match read(store, name)? {
                Some(value) => is_healthy(name, &value),
                None => false,
            },
        };
        if !healthy {
            warn!(parameter = %name, default = %default, "Repairing parameter");
            store.set(name, default)?;
            fixed += 1;
        }
    }

    match load_table(store) {
        Ok(_) => {}
        Err(ConfigError::Store(msg)) => return Err(ConfigError::Store(msg)),
        Err(e) => {
            warn!(error = %e, "Resetting lookup table");
            store.set(ParamName::LutSize, ParamValue::Integer(0))?;
            store.set(ParamName::LutDataBuf, ParamValue::Table(Vec::new()))?;
            fixed += 2;
        }
    }

    if fixed > 0 {
        debug!(fixed, "Parameter store repaired");
    }
    Ok(fixed)
}

/// Store entries for `params`, in [`ParamName::ALL`] order.
pub fn entries(params: &Parameters) -> [(ParamName, ParamValue); 13] {
    let table_len = i64::try_from(params.lookup_table.len()).unwrap_or(i64::MAX);
    [
        (ParamName::Sensitivity, ParamValue::Scalar(params.sensitivity)),
        (ParamName::OutputCap, ParamValue::Scalar(params.output_cap)),
        (ParamName::InputCap, ParamValue::Scalar(params.input_cap)),
        (ParamName::Offset, ParamValue::Scalar(params.offset)),
        (ParamName::PreScale, ParamValue::Scalar(params.pre_scale)),
        (ParamName::RotationAngle, ParamValue::Scalar(params.rotation_degrees)),
        (ParamName::Acceleration, ParamValue::Scalar(params.accel_factor)),
        (ParamName::Exponent, ParamValue::Scalar(params.exponent)),
        (ParamName::Midpoint, ParamValue::Scalar(params.midpoint)),
        (ParamName::UseSmoothing, ParamValue::Flag(params.use_smoothing)),
        (ParamName::AccelerationMode, ParamValue::Integer(params.mode.code())),
        (ParamName::LutSize, ParamValue::Integer(table_len)),
        (ParamName::LutDataBuf, ParamValue::Table(params.lookup_table.to_columns())),
    ]
}

fn read<S: ParameterStore + ?Sized>(
    store: &S,
    name: ParamName,
) -> Result<Option<ParamValue>, ConfigError> {
    match store.get(name) {
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::Missing(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

fn load_table<S: ParameterStore + ?Sized>(store: &S) -> Result<ParsedTable, ConfigError> {
    let size = match read(store, ParamName::LutSize)? {
        Some(v) => v.as_integer(ParamName::LutSize)?,
        None => 0,
    };
    let len = usize::try_from(size).map_err(|_negative| {
        ConfigError::out_of_range(ParamName::LutSize.as_str(), size as f64, "[0, inf)")
    })?;

    let buffer = match read(store, ParamName::LutDataBuf)? {
        Some(v) => v.into_table(ParamName::LutDataBuf)?,
        None => Vec::new(),
    };
    if len == 0 && buffer.is_empty() {
        return Ok(ParsedTable {
            table: LookupTable::new(),
            truncated: false,
        });
    }
    if buffer.len() != len.saturating_mul(2) {
        return Err(ConfigError::invalid_format(
            ParamName::LutDataBuf.as_str(),
            format!(
                "LutSize is {len} but the buffer holds {} values",
                buffer.len()
            ),
        ));
    }
    let (xs, ys) = buffer.split_at(len);
    let parsed = LookupTable::from_columns_truncated(xs, ys)?;
    if parsed.truncated {
        warn!(
            stored = len,
            kept = MAX_TABLE_ENTRIES,
            "Stored lookup table truncated"
        );
    }
    Ok(parsed)
}

fn is_healthy(name: ParamName, value: &ParamValue) -> bool {
    match (name, value) {
        (ParamName::AccelerationMode, ParamValue::Integer(code)) => {
            AccelMode::from_code(*code).is_ok()
        }
        (_, ParamValue::Scalar(v)) => name.expected_kind() == value.kind() && v.is_finite(),
        _ => name.expected_kind() == value.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_entries_follow_name_order() {
        let names: Vec<ParamName> = entries(&Parameters::default())
            .iter()
            .map(|(name, _)| *name)
            .collect();
        assert_eq!(names, ParamName::ALL.to_vec());
    }

    #[test]
    fn test_empty_store_loads_defaults() -> Result<(), ConfigError> {
        let store = MemoryStore::new();
        assert_eq!(load_parameters(&store)?, Parameters::default());
        Ok(())
    }

    #[test]
    fn test_negative_size_rejected() -> Result<(), ConfigError> {
        let store = MemoryStore::new();
        store.set(ParamName::LutSize, ParamValue::Integer(-1))?;
        assert!(matches!(
            load_parameters(&store),
            Err(ConfigError::OutOfRange { field: "LutSize", .. })
        ));
        Ok(())
    }

    #[test]
    fn test_oversized_table_truncated() -> Result<(), ConfigError> {
        let store = MemoryStore::new();
        let xs: Vec<f64> = (0..600).map(f64::from).collect();
        let mut buffer = xs.clone();
        buffer.extend(std::iter::repeat_n(1.0, 600));
        store.set(ParamName::LutSize, ParamValue::Integer(600))?;
        store.set(ParamName::LutDataBuf, ParamValue::Table(buffer))?;

        let report = load_parameters_report(&store)?;
        assert!(report.table_truncated);
        let table = &report.parameters.lookup_table;
        assert_eq!(table.len(), MAX_TABLE_ENTRIES);
        assert_eq!(table.points().last().map(|p| p.x), xs.get(MAX_TABLE_ENTRIES - 1).copied());
        assert_eq!(load_parameters(&store)?, report.parameters);
        Ok(())
    }

    #[test]
    fn test_unknown_mode_rejected() -> Result<(), ConfigError> {
        let store = MemoryStore::new();
        store.set(ParamName::AccelerationMode, ParamValue::Integer(42))?;
        assert_eq!(load_parameters(&store), Err(ConfigError::UnknownMode(42)));
        Ok(())
    }
}
