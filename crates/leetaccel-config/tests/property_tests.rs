//! Property-based tests for the store mapping

use leetaccel_config::prelude::*;
use leetaccel_curves::{AccelMode, LookupTable, Parameters};
use proptest::prelude::*;

fn power_params() -> impl Strategy<Value = Parameters> {
    (
        0.1f64..10.0,
        0.1f64..4.0,
        0.0f64..100.0,
        0.0f64..20.0,
        0.0f64..=180.0,
        0.0f64..1.0,
        0.01f64..=1.0,
    )
        .prop_map(|(sensitivity, pre_scale, output_cap, offset, rotation, accel, exponent)| {
            Parameters {
                mode: AccelMode::Power,
                sensitivity,
                pre_scale,
                output_cap,
                offset,
                rotation_degrees: rotation,
                accel_factor: accel,
                exponent,
                ..Parameters::default()
            }
        })
}

proptest! {
    #[test]
    fn prop_saved_parameters_load_back(params in power_params()) {
        let store = MemoryStore::new();
        prop_assert!(save_parameters(&params, &store).is_ok());
        prop_assert_eq!(load_parameters(&store).ok(), Some(params));
    }

    #[test]
    fn prop_table_load_is_consistent_or_rejected(
        size in -4i64..600,
        buffer in prop::collection::vec(-100.0f64..100.0, 0..40),
    ) {
        let store = MemoryStore::new();
        prop_assert!(store.set(ParamName::LutSize, ParamValue::Integer(size)).is_ok());
        prop_assert!(store.set(ParamName::LutDataBuf, ParamValue::Table(buffer.clone())).is_ok());

        match load_parameters(&store) {
            Ok(params) => {
                let table: &LookupTable = &params.lookup_table;
                prop_assert_eq!(i64::try_from(table.len()).ok(), Some(size));
                prop_assert_eq!(table.to_columns(), buffer);
            }
            Err(e) => prop_assert!(e.field().is_some(), "unnamed error {e:?}"),
        }
    }

    #[test]
    fn prop_repair_always_yields_loadable_store(
        size in -4i64..600,
        mode in -3i64..10,
        midpoint in prop::num::f64::ANY,
    ) {
        let store = MemoryStore::new();
        prop_assert!(store.set(ParamName::LutSize, ParamValue::Integer(size)).is_ok());
        prop_assert!(store.set(ParamName::AccelerationMode, ParamValue::Integer(mode)).is_ok());
        prop_assert!(store.set(ParamName::Midpoint, ParamValue::Scalar(midpoint)).is_ok());

        prop_assert!(repair_parameters(&store).is_ok());
        prop_assert!(load_parameters(&store).is_ok());
        prop_assert_eq!(repair_parameters(&store).ok(), Some(0));
    }
}
