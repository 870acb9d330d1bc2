use kbe_client::StreamType;
use kbe_shared::{message_ids::client, ByteWriter, Value};
use kbe_test::{dispatcher, frames, protocol};

const UNITTEST_DATA: &[u8] = b"Unittest data\n";

#[test]
fn stream_is_assembled_on_completion() {
    let protocol = protocol();
    let mut dispatcher = dispatcher();

    let mut bytes = frames::frame(&frames::stream_started(
        &protocol,
        1,
        UNITTEST_DATA.len() as u32,
        "unittest.data",
        StreamType::File.into(),
    ));
    bytes.extend(frames::frame(&frames::stream_recv(&protocol, 1, UNITTEST_DATA)));
    bytes.extend(frames::frame(&frames::stream_completed(&protocol, 1)));
    let messages = dispatcher.receive_bytes(&bytes);
    assert_eq!(messages.len(), 3);

    let streams = &dispatcher.world().streams;
    assert!(!streams.is_in_progress(1));
    let completed = streams.completed(1).expect("completed stream");
    assert_eq!(completed.data, UNITTEST_DATA);
    assert_eq!(completed.description, "unittest.data");
    assert_eq!(completed.stream_type, StreamType::File);
}

#[test]
fn chunks_are_concatenated_in_order() {
    let protocol = protocol();
    let mut dispatcher = dispatcher();
    dispatcher.dispatch(&frames::stream_started(&protocol, 7, 6, "parts", 0));
    for chunk in [&b"ab"[..], &b"cd"[..], &b"ef"[..]] {
        let recv = frames::stream_recv(&protocol, 7, chunk);
        assert!(dispatcher.dispatch(&recv).expect("handler").success);
    }
    assert!(dispatcher.world().streams.is_in_progress(7));
    assert!(dispatcher.world().streams.completed(7).is_none());

    let result = dispatcher.dispatch(&frames::stream_completed(&protocol, 7)).expect("handler");
    assert_eq!(result.result, Some(Value::Blob(b"abcdef".to_vec())));
    let taken = dispatcher.world_mut().streams.take_completed(7).expect("stream");
    assert_eq!(taken.stream_type, StreamType::Data);
    assert!(dispatcher.world().streams.completed(7).is_none());
}

#[test]
fn chunk_for_unknown_stream_fails() {
    let protocol = protocol();
    let mut dispatcher = dispatcher();
    let result = dispatcher.dispatch(&frames::stream_recv(&protocol, 3, b"late")).expect("handler");
    assert!(!result.success);
    let result = dispatcher.dispatch(&frames::stream_completed(&protocol, 3)).expect("handler");
    assert!(!result.success);
}

#[test]
fn space_data_init_set_and_delete() {
    let protocol = protocol();
    let mut dispatcher = dispatcher();

    let mut writer = ByteWriter::new();
    writer.write_u32(4);
    for (key, value) in [("_mapping", "spaces/xinshoucun"), ("weather", "rain")] {
        writer.write_cstring(key.as_bytes());
        writer.write_cstring(value.as_bytes());
    }
    let init = frames::raw_message(&protocol, client::INIT_SPACE_DATA, writer.to_bytes());
    let result = dispatcher.dispatch(&init).expect("handler");
    assert!(result.success, "{}", result.text);
    assert_eq!(
        dispatcher.world().spaces.get(4, "_mapping"),
        Some("spaces/xinshoucun")
    );

    let set = frames::message(
        &protocol,
        client::SET_SPACE_DATA,
        &[
            Value::UInt32(4),
            Value::String("weather".to_string()),
            Value::String("sun".to_string()),
        ],
    );
    dispatcher.dispatch(&set);
    assert_eq!(dispatcher.world().spaces.get(4, "weather"), Some("sun"));

    let del = frames::message(
        &protocol,
        client::DEL_SPACE_DATA,
        &[Value::UInt32(4), Value::String("weather".to_string())],
    );
    dispatcher.dispatch(&del);
    assert_eq!(dispatcher.world().spaces.get(4, "weather"), None);
    assert_eq!(dispatcher.world().spaces.space(4).map(|space| space.len()), Some(1));
}
