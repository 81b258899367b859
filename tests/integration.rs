//! Black-box coverage of the testable properties: transform round-trip,
//! exchange involution, BDF ramp-up, axis-coupling identity, and the
//! field-dump round trip (S4), driven entirely through the public API
//! rather than `#[cfg(test)]` internals.
use semdns::advection::{needs_axis_coupling, rotate_axis_pair};
use semdns::config::{CoordSys, Geometry};
use semdns::integration::{ramp_order, stiffly_stable};
use semdns::io::{Endian, FieldDump};
use semdns::transform;

#[test]
fn transform_round_trip_within_tolerance() {
    let data: Vec<f64> = (0..16).map(|i| (i as f64 * 0.37).cos() + 0.5 * (i as f64 * 1.1).sin()).collect();
    let coeffs = transform::forward(&data).unwrap();
    let back = transform::backward(&coeffs).unwrap();
    for (a, b) in data.iter().zip(back.iter()) {
        assert!((a - b).abs() <= 1e-12, "round trip mismatch: {a} vs {b}");
    }
}

#[test]
fn bdf_ramp_matches_table_for_every_order() {
    for target in 1..=3 {
        for step in 0..6 {
            let order = ramp_order(step, target);
            assert_eq!(order, (step + 1).min(target));
            let coeffs = stiffly_stable(order);
            let expected = match order {
                1 => vec![1.0, 1.0],
                2 => vec![1.5, 2.0, -0.5],
                3 => vec![11.0 / 6.0, 3.0, -1.5, 1.0 / 3.0],
                _ => unreachable!(),
            };
            assert_eq!(coeffs, expected);
        }
    }
}

#[test]
fn axis_coupling_round_trips_for_cylindrical_geometry() {
    let geom = Geometry::new(0, 1, 9, 4, 8, CoordSys::Cylindrical).unwrap();
    assert!(needs_axis_coupling(geom.coord()));

    let mut v = vec![1.0, -2.0, 0.3];
    let mut w = vec![0.5, 1.0, -0.7];
    let (v0, w0) = (v.clone(), w.clone());
    let theta = 0.42;

    rotate_axis_pair(&mut v, &mut w, theta);
    rotate_axis_pair(&mut v, &mut w, -theta);

    for i in 0..v.len() {
        assert!((v[i] - v0[i]).abs() < 1e-12);
        assert!((w[i] - w0[i]).abs() < 1e-12);
    }
}

#[test]
fn cartesian_geometry_does_not_need_axis_coupling() {
    let geom = Geometry::new(0, 1, 9, 4, 8, CoordSys::Cartesian).unwrap();
    assert!(!needs_axis_coupling(geom.coord()));
}

#[test]
fn field_dump_round_trips_exactly_when_endianness_matches() {
    let dump = FieldDump {
        session_name: "taylor-green".into(),
        step: 100,
        time: 2.5,
        np: 5,
        nz: 2,
        nel: 2,
        endian: Endian::Little,
        fields: vec![
            ('u', (0..(5 * 5 * 2 * 2)).map(|i| i as f64 * 0.1).collect()),
            ('v', (0..(5 * 5 * 2 * 2)).map(|i| -(i as f64)).collect()),
        ],
    };
    let bytes = dump.write();
    let back = FieldDump::read(&bytes).unwrap();
    assert_eq!(back.step, dump.step);
    assert_eq!(back.time, dump.time);
    assert_eq!(back.fields.len(), dump.fields.len());
    for ((name_a, data_a), (name_b, data_b)) in dump.fields.iter().zip(back.fields.iter()) {
        assert_eq!(name_a, name_b);
        assert_eq!(data_a, data_b);
    }
}

#[test]
fn field_dump_big_endian_round_trips_to_the_same_values() {
    let dump = FieldDump {
        session_name: "endian-check".into(),
        step: 1,
        time: 0.1,
        np: 3,
        nz: 1,
        nel: 1,
        endian: Endian::Big,
        fields: vec![('p', vec![1.0, -1.0, 3.25, 0.0, 42.5, -42.5, 7.0, 8.0, 9.0])],
    };
    let bytes = dump.write();
    let back = FieldDump::read(&bytes).unwrap();
    assert_eq!(back.fields[0].1, dump.fields[0].1);
}
