//! Parameter hash calculation for change detection
//!
//! Publishing the same parameters twice should not rebuild or swap the active
//! curve. Floats are hashed by bit pattern so the result is deterministic
//! across runs.

use leetaccel_curves::{LookupTable, Parameters};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Calculate a deterministic hash of a parameter snapshot
///
/// Every field is included, whether or not the active mode reads it, so two
/// snapshots hash equal only if they would be stored identically.
#[must_use]
pub fn calculate_parameters_hash(params: &Parameters) -> u64 {
    let mut hasher = DefaultHasher::new();

    params.mode.code().hash(&mut hasher);
    for value in [
        params.sensitivity,
        params.pre_scale,
        params.output_cap,
        params.input_cap,
        params.offset,
        params.rotation_degrees,
        params.accel_factor,
        params.exponent,
        params.midpoint,
    ] {
        value.to_bits().hash(&mut hasher);
    }
    params.use_smoothing.hash(&mut hasher);
    hash_lookup_table(&params.lookup_table, &mut hasher);

    hasher.finish()
}

/// Hash table points into the hasher
fn hash_lookup_table(table: &LookupTable, hasher: &mut DefaultHasher) {
    table.len().hash(hasher);
    for point in table.points() {
        point.x.to_bits().hash(hasher);
        point.y.to_bits().hash(hasher);
    }
}
