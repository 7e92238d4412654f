//! Real-time unit integration tests
//!
//! Units are instantiated through the local host and driven block by block,
//! the way an audio callback would.

use crate::helpers::tolerances::*;
use crate::helpers::*;
use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use ugenwrap::prelude::*;
use ugenwrap::{Mode, RealTime};

fn gain_spec(gain: f32) -> UnitSpec {
    UnitSpec::new(vec![InputSpec::audio(), InputSpec::control(gain)], 1, 1)
}

#[test]
fn test_gain_unit_tracks_control_changes() {
    let buffers = MemoryBufferStore::shared(8);
    let host = test_host(&buffers);
    PluginLoader::new(host.handle()).wrap::<Gain>("Gain").unwrap();

    let mut unit = host.instantiate("Gain", &gain_spec(0.5)).unwrap();
    let input = vec![1.0f32; TEST_BLOCK_SIZE];
    let mut out = vec![0.0f32; TEST_BLOCK_SIZE];

    unit.next(TEST_BLOCK_SIZE, &[&input, &[0.5f32]], &mut [&mut out]);
    assert!(out.iter().all(|s| (s - 0.5).abs() < FLOAT_EPSILON));

    // New control value takes effect on the next block.
    unit.next(TEST_BLOCK_SIZE, &[&input, &[2.0f32]], &mut [&mut out]);
    assert!(out.iter().all(|s| (s - 2.0).abs() < FLOAT_EPSILON));
}

#[test]
fn test_scalar_controls_bind_in_slot_order() {
    let buffers = MemoryBufferStore::shared(8);
    let host = test_host(&buffers);
    ugenwrap::wrap::<ThreeScalars>(host.handle(), "ThreeScalars").unwrap();

    let spec = UnitSpec::new(
        vec![
            InputSpec::control(0.5),
            InputSpec::control(10.0),
            InputSpec::control(2.0),
        ],
        3,
        0,
    );
    let mut unit = host.instantiate("ThreeScalars", &spec).unwrap();
    let (mut a, mut b, mut c) = ([9.0f32], [9.0f32], [9.0f32]);
    unit.next(
        TEST_BLOCK_SIZE,
        &[&[0.5f32], &[10.0f32], &[2.0f32]],
        &mut [&mut a, &mut b, &mut c],
    );

    assert_eq!(a, [0.5]);
    assert_eq!(b, [10.0]);
    assert_eq!(c, [2.0]);

    let scalars = unit.downcast_mut::<RealTime<ThreeScalars>>().unwrap();
    assert_eq!(scalars.mode(), Mode::Process);
    assert_eq!(scalars.params().float(0).unwrap(), 0.5);
    assert_eq!(scalars.params().float(1).unwrap(), 10.0);
    assert_eq!(scalars.params().long(2).unwrap(), 2);
}

#[test]
fn test_control_output_spans_one_sample() {
    let buffers = MemoryBufferStore::shared(8);
    let host = test_host(&buffers);
    ugenwrap::wrap::<BlockRms>(host.handle(), "BlockRms").unwrap();

    let spec = UnitSpec::new(vec![InputSpec::audio(), InputSpec::control(2.0)], 1, 1);
    let mut unit = host.instantiate("BlockRms", &spec).unwrap();

    let input = vec![0.5f32; TEST_BLOCK_SIZE];
    // Host hands a full block; a control output only owns its first sample.
    let mut out = vec![-1.0f32; TEST_BLOCK_SIZE];
    unit.next(TEST_BLOCK_SIZE, &[&input, &[2.0f32]], &mut [&mut out]);

    assert_abs_diff_eq!(out[0], 1.0, epsilon = FLOAT_EPSILON);
    assert!(out[1..].iter().all(|s| *s == -1.0));
}

#[test]
fn test_control_rate_input_reads_as_unconnected() {
    let buffers = MemoryBufferStore::shared(8);
    let host = test_host(&buffers);
    ugenwrap::wrap::<Gain>(host.handle(), "Gain").unwrap();

    // The first input is declared control rate: the client sees an empty view.
    let spec = UnitSpec::new(vec![InputSpec::control(1.0), InputSpec::control(1.0)], 1, 1);
    let mut unit = host.instantiate("Gain", &spec).unwrap();

    let input = vec![1.0f32; TEST_BLOCK_SIZE];
    let mut out = vec![5.0f32; TEST_BLOCK_SIZE];
    unit.next(TEST_BLOCK_SIZE, &[&input, &[1.0f32]], &mut [&mut out]);
    assert!(rms(&out) < SILENCE_THRESHOLD);
}

#[test]
fn test_version_skew_silences_every_output() {
    let buffers = MemoryBufferStore::shared(8);
    let host = test_host(&buffers);
    ugenwrap::wrap::<ThreeScalars>(host.handle(), "ThreeScalars").unwrap();

    // Two controls for a three-token descriptor set.
    let spec = UnitSpec::new(vec![InputSpec::control(1.0), InputSpec::control(2.0)], 3, 0);
    let mut unit = host.instantiate("ThreeScalars", &spec).unwrap();

    let mut outs = [[7.0f32; 4], [7.0f32; 4], [7.0f32; 4]];
    for _ in 0..3 {
        let [a, b, c] = &mut outs;
        unit.next(4, &[&[1.0f32], &[2.0f32]], &mut [a, b, c]);
    }
    assert_eq!(outs, [[0.0; 4]; 3]);

    let scalars = unit.downcast_mut::<RealTime<ThreeScalars>>().unwrap();
    assert_eq!(scalars.mode(), Mode::Silent);
    // Defaults, untouched.
    assert_eq!(scalars.params().float(0).unwrap(), 0.0);
    assert_eq!(scalars.params().long(2).unwrap(), 0);
}

#[test]
fn test_latency_query() {
    let buffers = MemoryBufferStore::shared(8);
    let host = test_host(&buffers);
    ugenwrap::wrap::<Gain>(host.handle(), "Gain").unwrap();

    let mut unit = host.instantiate("Gain", &gain_spec(1.0)).unwrap();
    host.unit_command(&mut unit, "latency", &[]).unwrap();

    let reply = host.replies().try_recv().unwrap();
    assert_eq!(reply.to, None);
    assert_eq!(reply.message.addr, "/Gain_latency");
    assert_eq!(
        reply.message.args,
        vec![
            OscType::Int(unit.node()),
            OscType::Int(-1),
            OscType::Float(64.0),
        ]
    );
}

#[test]
fn test_instances_get_distinct_nodes() {
    let buffers = MemoryBufferStore::shared(8);
    let host = test_host(&buffers);
    ugenwrap::wrap::<Gain>(host.handle(), "Gain").unwrap();

    let a = host.instantiate("Gain", &gain_spec(1.0)).unwrap();
    let b = host.instantiate("Gain", &gain_spec(1.0)).unwrap();
    assert_ne!(a.node(), b.node());
    assert_eq!(a.name(), "Gain");
}

#[test]
fn test_unknown_unit_command() {
    let buffers = MemoryBufferStore::shared(8);
    let host = test_host(&buffers);
    ugenwrap::wrap::<Gain>(host.handle(), "Gain").unwrap();

    let mut unit = host.instantiate("Gain", &gain_spec(1.0)).unwrap();
    assert!(host.unit_command(&mut unit, "reset", &[]).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_controls_reach_outputs(
        a in -1000.0f32..1000.0,
        b in -1000.0f32..1000.0,
        c in -1000i32..1000,
    ) {
        let buffers = MemoryBufferStore::shared(1);
        let host = test_host(&buffers);
        ugenwrap::wrap::<ThreeScalars>(host.handle(), "ThreeScalars").unwrap();

        let spec = UnitSpec::new(
            vec![InputSpec::control(0.0), InputSpec::control(0.0), InputSpec::control(0.0)],
            3,
            0,
        );
        let mut unit = host.instantiate("ThreeScalars", &spec).unwrap();
        let (mut oa, mut ob, mut oc) = ([0.0f32], [0.0f32], [0.0f32]);
        let c_in = [c as f32];
        unit.next(1, &[&[a], &[b], &c_in], &mut [&mut oa, &mut ob, &mut oc]);

        prop_assert_eq!(oa[0], a);
        prop_assert_eq!(ob[0], b);
        prop_assert_eq!(oc[0], c as f32);
    }
}
