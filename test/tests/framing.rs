use proptest::prelude::*;

use glam::{Vec2, Vec3, Vec4};
use kbe_shared::{
    decode_frames, message_ids::client, EntityCallRef, Framer, Message, PrimitiveKind, Value,
    WireType, EXTENDED_LENGTH_MARKER,
};
use kbe_test::{frames, protocol};

/// A mixed stream: fixed, variable and empty-payload frames
fn sample_stream() -> (Vec<u8>, Vec<Message>) {
    let protocol = protocol();
    let messages = vec![
        frames::hello_cb(&protocol),
        frames::entity_destroyed(&protocol, 12),
        frames::stream_recv(&protocol, 2, &[0xAB; 300]),
        frames::message(&protocol, client::ON_APP_ACTIVE_TICK_CB, &[]),
        frames::created_proxies(&protocol, 5, 2177, "Account"),
    ];
    let bytes = messages.iter().flat_map(frames::frame).collect();
    (bytes, messages)
}

#[test]
fn whole_buffer_frames_every_message() {
    let protocol = protocol();
    let (bytes, expected) = sample_stream();
    let decoded = decode_frames(&protocol.messages, &bytes);
    assert!(decoded.error.is_none());
    assert_eq!(decoded.consumed, bytes.len());
    assert_eq!(decoded.messages, expected);
}

#[test]
fn extended_length_frames_are_decoded() {
    let protocol = protocol();
    let chunk = vec![7u8; usize::from(u16::MAX) + 10];
    let message = frames::stream_recv(&protocol, 1, &chunk);
    let bytes = frames::frame(&message);

    assert_eq!(&bytes[2..4], &EXTENDED_LENGTH_MARKER.to_le_bytes());
    let length = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
    assert_eq!(length, message.payload().len());
    assert_eq!(bytes.len(), 8 + length);

    let decoded = decode_frames(&protocol.messages, &bytes);
    assert_eq!(decoded.messages, vec![message]);
}

fn coordinate() -> impl Strategy<Value = f32> {
    -1.0e6f32..1.0e6f32
}

fn primitive_value() -> impl Strategy<Value = (PrimitiveKind, Value)> {
    let python_kind = prop::sample::select(vec![
        PrimitiveKind::Python,
        PrimitiveKind::PyDict,
        PrimitiveKind::PyTuple,
        PrimitiveKind::PyList,
    ]);
    prop_oneof![
        any::<i8>().prop_map(|v| (PrimitiveKind::Int8, Value::Int8(v))),
        any::<u8>().prop_map(|v| (PrimitiveKind::UInt8, Value::UInt8(v))),
        any::<u32>().prop_map(|v| (PrimitiveKind::UInt32, Value::UInt32(v))),
        any::<bool>().prop_map(|v| (PrimitiveKind::Bool, Value::Bool(v))),
        any::<i16>().prop_map(|v| (PrimitiveKind::Int16, Value::Int16(v))),
        any::<i32>().prop_map(|v| (PrimitiveKind::Int32, Value::Int32(v))),
        any::<i64>().prop_map(|v| (PrimitiveKind::Int64, Value::Int64(v))),
        any::<u16>().prop_map(|v| (PrimitiveKind::UInt16, Value::UInt16(v))),
        any::<u64>().prop_map(|v| (PrimitiveKind::UInt64, Value::UInt64(v))),
        (-1.0e6f32..1.0e6f32).prop_map(|v| (PrimitiveKind::Float, Value::Float(v))),
        (-1.0e12f64..1.0e12f64).prop_map(|v| (PrimitiveKind::Double, Value::Double(v))),
        "[a-zA-Z0-9 _./]{0,32}".prop_map(|v| (PrimitiveKind::String, Value::String(v))),
        "\\PC{0,16}".prop_map(|v| (PrimitiveKind::Unicode, Value::Unicode(v))),
        prop::collection::vec(any::<u8>(), 0..64)
            .prop_map(|v| (PrimitiveKind::Blob, Value::Blob(v))),
        prop::collection::vec(any::<u8>(), 0..64)
            .prop_map(|v| (PrimitiveKind::Uint8Array, Value::Blob(v))),
        (python_kind, prop::collection::vec(any::<u8>(), 0..32))
            .prop_map(|(kind, pickle)| (kind, Value::Python(pickle))),
        (coordinate(), coordinate())
            .prop_map(|(x, y)| (PrimitiveKind::Vector2, Value::Vector2(Vec2::new(x, y)))),
        (coordinate(), coordinate(), coordinate())
            .prop_map(|(x, y, z)| (PrimitiveKind::Vector3, Value::Vector3(Vec3::new(x, y, z)))),
        (coordinate(), coordinate(), coordinate(), coordinate()).prop_map(|(x, y, z, w)| {
            (PrimitiveKind::Vector4, Value::Vector4(Vec4::new(x, y, z, w)))
        }),
        (any::<i32>(), any::<u64>(), any::<u16>(), any::<u16>()).prop_map(
            |(entity_id, component_id, entity_type, call_type)| {
                let call = EntityCallRef {
                    entity_id,
                    component_id,
                    entity_type,
                    call_type,
                };
                (PrimitiveKind::EntityCall, Value::EntityCall(call))
            }
        ),
    ]
}

proptest! {
    #[test]
    fn prop_chunking_does_not_change_frames(
        cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..12)
    ) {
        let protocol = protocol();
        let (bytes, expected) = sample_stream();

        let mut points: Vec<usize> = cuts.iter().map(|cut| cut.index(bytes.len() + 1)).collect();
        points.push(0);
        points.push(bytes.len());
        points.sort_unstable();
        points.dedup();

        let mut framer = Framer::new();
        let mut received = Vec::new();
        for window in points.windows(2) {
            let decoded = framer.push(&protocol.messages, &bytes[window[0]..window[1]]);
            prop_assert!(decoded.error.is_none());
            received.extend(decoded.messages);
        }
        prop_assert_eq!(received, expected);
        prop_assert_eq!(framer.pending_len(), 0);
    }

    #[test]
    fn prop_primitives_survive_the_wire((kind, value) in primitive_value()) {
        let wire_type = WireType::primitive(kind);
        let bytes = wire_type.encode_to_vec(&value).expect("value matches its type");
        let (decoded, read) = wire_type.decode_bytes(&bytes).expect("decodes");
        prop_assert_eq!(read, bytes.len());
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn prop_bool_is_true_only_for_positive_bytes(raw in any::<i8>()) {
        let flag = WireType::primitive(PrimitiveKind::Bool);
        let (decoded, read) = flag.decode_bytes(&raw.to_le_bytes()).expect("decodes");
        prop_assert_eq!(read, 1);
        prop_assert_eq!(decoded, Value::Bool(raw > 0));
    }
}
