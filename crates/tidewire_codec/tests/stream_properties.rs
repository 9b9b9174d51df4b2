//! Integration tests for the codec's wire-level guarantees.
//!
//! Run with: cargo test --package tidewire_codec --test stream_properties

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tidewire_codec::{
    BitReader, BitWriter, CodecError, FloatPacker, PositionPacker, QuaternionPacker,
    SyncSchema, UIntVariablePacker,
};
use tidewire_shared::{Quaternion, Transform, Vec3};

// ============================================================================
// BIT STREAM
// ============================================================================

#[test]
fn ten_bit_sequence_round_trips() {
    let values = [859u32, 490, 45, 583, 153, 321, 147, 305];

    let mut writer = BitWriter::with_capacity(16);
    for &v in &values {
        writer.write(v, 10).unwrap();
    }
    let bytes = writer.to_segment().to_vec();
    assert_eq!(bytes.len(), 10);

    let mut reader = BitReader::new(&bytes);
    let back: Vec<u32> = (0..values.len()).map(|_| reader.read(10).unwrap()).collect();
    assert_eq!(back, values);
    assert_eq!(reader.bits_in_scratch(), 0);
}

#[test]
fn segment_length_is_bit_exact() {
    let mut rng = StdRng::seed_from_u64(0xB175);

    for _ in 0..300 {
        let count = rng.gen_range(1..40);
        let widths: Vec<u32> = (0..count).map(|_| rng.gen_range(1..=32)).collect();
        let values: Vec<u32> = widths.iter().map(|&w| rng.gen::<u32>() >> (32 - w)).collect();
        let total: usize = widths.iter().map(|&w| w as usize).sum();

        let mut writer = BitWriter::with_capacity(256);
        for (&v, &w) in values.iter().zip(&widths) {
            writer.write(v, w).unwrap();
        }
        assert_eq!(writer.bits_written(), total);
        let bytes = writer.to_segment().to_vec();
        assert_eq!(bytes.len(), total.div_ceil(8));

        let mut reader = BitReader::new(&bytes);
        for (&v, &w) in values.iter().zip(&widths) {
            assert_eq!(reader.read(w).unwrap(), v);
        }
        assert_eq!(reader.bits_in_scratch() as usize, 8 * total.div_ceil(8) - total);
        assert_eq!(reader.position(), bytes.len());
    }
}

#[test]
fn reading_past_the_end_fails() {
    let mut writer = BitWriter::with_capacity(8);
    writer.write(0x2A, 7).unwrap();
    let bytes = writer.to_segment().to_vec();

    let mut reader = BitReader::new(&bytes);
    assert_eq!(reader.read(7).unwrap(), 0x2A);
    // the padding bit is still readable, nothing beyond it
    assert_eq!(reader.read(1).unwrap(), 0);
    assert!(matches!(reader.read(1), Err(CodecError::BufferExhausted { .. })));
}

#[test]
fn reader_over_a_sub_range() {
    let mut writer = BitWriter::with_capacity(8);
    writer.write(0xBEEF, 16).unwrap();
    let mut framed = vec![0xFF, 0xFF];
    framed.extend_from_slice(writer.to_segment());
    framed.push(0xFF);

    let mut reader = BitReader::with_range(&framed, 2, 2).unwrap();
    assert_eq!(reader.read(16).unwrap(), 0xBEEF);
    assert!(reader.read(8).is_err());
}

// ============================================================================
// PACKERS
// ============================================================================

#[test]
fn float_packer_concrete_scenario() {
    let packer = FloatPacker::new(0.0, 100.0, 0.01).unwrap();
    assert_eq!(packer.bit_count(), 14);

    let mut writer = BitWriter::with_capacity(4);
    packer.pack(&mut writer, 50.0).unwrap();
    assert_eq!(writer.bits_written(), 14);
    let bytes = writer.to_segment().to_vec();
    assert_eq!(bytes.len(), 2);

    let value = packer.unpack(&mut BitReader::new(&bytes)).unwrap();
    assert!((49.99..=50.01).contains(&value));
}

#[test]
fn variable_uint_concrete_scenario() {
    let packer = UIntVariablePacker::new(6, 12, 18).unwrap();

    let mut writer = BitWriter::with_capacity(8);
    packer.pack(&mut writer, 5).unwrap();
    assert_eq!(writer.bits_written(), 7);

    writer.reset();
    packer.pack(&mut writer, 4000).unwrap();
    assert_eq!(writer.bits_written(), 14);

    writer.reset();
    assert!(packer.pack(&mut writer, 300_000).unwrap_err().is_invalid_argument());
}

#[test]
fn mixed_message_round_trip() {
    let mut rng = StdRng::seed_from_u64(99);
    let position = PositionPacker::new(
        Vec3::new(-500.0, -20.0, -500.0),
        Vec3::new(500.0, 200.0, 500.0),
        Vec3::new(0.05, 0.02, 0.05),
    )
    .unwrap();
    let rotation = QuaternionPacker::new(11).unwrap();
    let health = FloatPacker::new(0.0, 100.0, 1.0).unwrap();
    let id = UIntVariablePacker::new(7, 14, 24).unwrap();

    let objects: Vec<(u64, Transform, f32)> = (0..40)
        .map(|i| {
            let p = Vec3::new(
                rng.gen_range(-500.0..=500.0),
                rng.gen_range(-20.0..=200.0),
                rng.gen_range(-500.0..=500.0),
            );
            let axis = Vec3::new(rng.gen_range(-1.0..=1.0), 1.0, rng.gen_range(-1.0..=1.0));
            let q = Quaternion::from_axis_angle(axis, rng.gen_range(-3.0..=3.0));
            (i * 997, Transform::new(p, q), rng.gen_range(0.0..=100.0))
        })
        .collect();

    let mut writer = BitWriter::with_capacity(1200);
    for (object_id, transform, hp) in &objects {
        id.pack(&mut writer, *object_id).unwrap();
        position.pack(&mut writer, transform.position).unwrap();
        rotation.pack(&mut writer, transform.rotation).unwrap();
        health.pack(&mut writer, *hp).unwrap();
    }
    let bytes = writer.to_segment().to_vec();

    let mut reader = BitReader::new(&bytes);
    for (object_id, transform, hp) in &objects {
        assert_eq!(id.unpack(&mut reader).unwrap(), *object_id);
        let p = position.unpack(&mut reader).unwrap();
        assert!((p.x - transform.position.x).abs() <= 0.05);
        assert!((p.y - transform.position.y).abs() <= 0.02);
        assert!((p.z - transform.position.z).abs() <= 0.05);
        let q = rotation.unpack(&mut reader).unwrap();
        assert!(q.angle_to(transform.rotation) < 0.01);
        assert!((health.unpack(&mut reader).unwrap() - hp).abs() <= 1.0);
    }
    assert!(reader.bits_in_scratch() < 8);
}

// ============================================================================
// SCHEMA
// ============================================================================

fn temp_schema_path() -> std::path::PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tidewire_schema_{id}.toml"))
}

#[test]
fn both_ends_build_identical_packers_from_one_file() {
    let path = temp_schema_path();
    std::fs::write(
        &path,
        r"
[transform.position]
min = { x = -64.0, y = 0.0, z = -64.0 }
max = { x = 64.0, y = 32.0, z = 64.0 }
precision = 0.01

[transform.rotation]
bits_per_component = 9

[counters.sequence]
small = 8
medium = 16
large = 32
",
    )
    .unwrap();

    let sender = SyncSchema::load(&path).unwrap().build().unwrap();
    let receiver = SyncSchema::load(&path).unwrap().build().unwrap();
    std::fs::remove_file(&path).ok();

    let transform = Transform::new(
        Vec3::new(10.0, 5.0, -20.0),
        Quaternion::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), 0.5),
    );

    let mut writer = BitWriter::with_capacity(32);
    sender.counter("sequence").unwrap().pack(&mut writer, 1234).unwrap();
    sender.transform().unwrap().pack(&mut writer, &transform).unwrap();
    let bytes = writer.to_segment().to_vec();

    let mut reader = BitReader::new(&bytes);
    assert_eq!(receiver.counter("sequence").unwrap().unpack(&mut reader).unwrap(), 1234);
    let back = receiver.transform().unwrap().unpack(&mut reader).unwrap();
    assert!(back.position.distance(transform.position) < 0.02);
    assert!(back.rotation.angle_to(transform.rotation) < 0.03);
}
