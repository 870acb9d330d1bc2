use kbe_shared::{message_ids::client, ByteWriter, Message, Protocol, Value};

/// Builds a message from its logical arguments
pub fn message(protocol: &Protocol, id: u16, args: &[Value]) -> Message {
    let spec = protocol
        .messages
        .get(id)
        .unwrap_or_else(|| panic!("no message spec for id {}", id))
        .clone();
    Message::from_args(spec, args).expect("arguments match the message spec")
}

/// Builds a variable-length message around a hand-written payload
pub fn raw_message(protocol: &Protocol, id: u16, payload: Vec<u8>) -> Message {
    let spec = protocol
        .messages
        .get(id)
        .unwrap_or_else(|| panic!("no message spec for id {}", id))
        .clone();
    Message::from_payload(spec, payload).expect("variable-length message")
}

/// The full frame of `message`, as the server would send it
pub fn frame(message: &Message) -> Vec<u8> {
    message.encode().expect("message encodes")
}

pub fn created_proxies(
    protocol: &Protocol,
    relogin_key: u64,
    entity_id: i32,
    class_name: &str,
) -> Message {
    message(
        protocol,
        client::ON_CREATED_PROXIES,
        &[
            Value::UInt64(relogin_key),
            Value::Int32(entity_id),
            Value::String(class_name.to_string()),
        ],
    )
}

/// `onEntityEnterWorld` with an aliased class id
pub fn entity_enter_world(
    protocol: &Protocol,
    entity_id: i32,
    class_alias: u8,
    on_ground: Option<i8>,
) -> Message {
    let mut writer = ByteWriter::new();
    writer.write_i32(entity_id);
    writer.write_u8(class_alias);
    if let Some(on_ground) = on_ground {
        writer.write_i8(on_ground);
    }
    raw_message(protocol, client::ON_ENTITY_ENTER_WORLD, writer.to_bytes())
}

pub fn entity_leave_world(protocol: &Protocol, entity_id: i32) -> Message {
    message(protocol, client::ON_ENTITY_LEAVE_WORLD, &[Value::Int32(entity_id)])
}

pub fn entity_destroyed(protocol: &Protocol, entity_id: i32) -> Message {
    message(protocol, client::ON_ENTITY_DESTROYED, &[Value::Int32(entity_id)])
}

/// `onUpdatePropertys` for one entity: the writer receives the (component, property, value)
/// triples after the full entity id
pub fn update_propertys<F>(protocol: &Protocol, entity_id: i32, write: F) -> Message
where
    F: FnOnce(&mut ByteWriter),
{
    let mut writer = ByteWriter::new();
    writer.write_i32(entity_id);
    write(&mut writer);
    raw_message(protocol, client::ON_UPDATE_PROPERTYS, writer.to_bytes())
}

/// `onRemoteMethodCall` on the entity itself, with aliased ids
pub fn remote_method_call<F>(
    protocol: &Protocol,
    entity_id: i32,
    method_alias: u8,
    write_args: F,
) -> Message
where
    F: FnOnce(&mut ByteWriter),
{
    let mut writer = ByteWriter::new();
    writer.write_i32(entity_id);
    writer.write_u8(0);
    writer.write_u8(method_alias);
    write_args(&mut writer);
    raw_message(protocol, client::ON_REMOTE_METHOD_CALL, writer.to_bytes())
}

pub fn stream_started(
    protocol: &Protocol,
    stream_id: i16,
    size: u32,
    description: &str,
    stream_type: i8,
) -> Message {
    message(
        protocol,
        client::ON_STREAM_DATA_STARTED,
        &[
            Value::Int16(stream_id),
            Value::UInt32(size),
            Value::String(description.to_string()),
            Value::Int8(stream_type),
        ],
    )
}

pub fn stream_recv(protocol: &Protocol, stream_id: i16, chunk: &[u8]) -> Message {
    message(
        protocol,
        client::ON_STREAM_DATA_RECV,
        &[Value::Int16(stream_id), Value::Blob(chunk.to_vec())],
    )
}

pub fn stream_completed(protocol: &Protocol, stream_id: i16) -> Message {
    message(protocol, client::ON_STREAM_DATA_COMPLETED, &[Value::Int16(stream_id)])
}

pub fn hello_cb(protocol: &Protocol) -> Message {
    message(
        protocol,
        client::ON_HELLO_CB,
        &[
            Value::String("2.5.0".to_string()),
            Value::String("0.1.0".to_string()),
            Value::String("protocol-digest".to_string()),
            Value::String("entitydef-digest".to_string()),
            Value::Int32(5),
        ],
    )
}

pub fn login_successfully(protocol: &Protocol, account: &str, host: &str, port: u16) -> Message {
    message(
        protocol,
        client::ON_LOGIN_SUCCESSFULLY,
        &[
            Value::String(account.to_string()),
            Value::String(host.to_string()),
            Value::UInt16(port),
            Value::UInt16(port + 1),
            Value::Blob(Vec::new()),
        ],
    )
}
