use proptest::prelude::*;

use kbe_shared::{decode_frames, message_ids::client, ByteWriter, Value};
use kbe_test::{
    dispatcher, frames, init_logging, protocol,
    test_protocol::{account, MONSTER_CLASS_ID},
};

const ACCOUNT_ID: i32 = 2177;

/// `onUpdatePropertys` for 2177 setting modelScale and modelID, as it arrives from the server
fn update_bytes(model_scale: f32, model_id: u16) -> Vec<u8> {
    let mut bytes = vec![
        0xff, 0x01, 0x0e, 0x00, 0x81, 0x08, 0x00, 0x00, 0x00, account::MODEL_SCALE,
    ];
    bytes.extend_from_slice(&model_scale.to_le_bytes());
    bytes.extend_from_slice(&[0x00, account::MODEL_ID]);
    bytes.extend_from_slice(&model_id.to_le_bytes());
    bytes
}

#[test]
fn update_before_created_proxies_is_replayed() {
    init_logging();
    let protocol = protocol();
    let bytes = update_bytes(2.5, 1001);

    let decoded = decode_frames(&protocol.messages, &bytes);
    assert!(decoded.error.is_none());
    assert_eq!(decoded.consumed, bytes.len());
    assert_eq!(decoded.messages.len(), 1);
    let update = &decoded.messages[0];
    assert_eq!(update.id(), client::ON_UPDATE_PROPERTYS);

    let mut dispatcher = dispatcher();
    let queued = dispatcher.dispatch(update).expect("handler exists");
    assert!(!queued.success, "update before creation should be queued");
    let placeholder = dispatcher.world().entities.entity(ACCOUNT_ID).expect("placeholder");
    assert!(placeholder.is_placeholder());
    assert_eq!(placeholder.pending_len(), 1);

    let created = dispatcher
        .dispatch(&frames::created_proxies(&protocol, 42, ACCOUNT_ID, "Account"))
        .expect("handler exists");
    assert!(created.success, "{}", created.text);
    assert_eq!(created.result, Some(Value::Int32(ACCOUNT_ID)));

    let account = dispatcher.world().entities.entity(ACCOUNT_ID).expect("account");
    assert!(account.is_initialized());
    assert_eq!(account.pending_len(), 0);
    assert_eq!(account.property("modelScale"), Some(Value::Float(2.5)));
    assert_eq!(account.property("modelID"), Some(Value::UInt16(1001)));
    assert_eq!(dispatcher.world().entities.player_id(), Some(ACCOUNT_ID));
    assert_eq!(dispatcher.session().relogin_key, Some(42));
}

#[test]
fn received_bytes_are_dispatched() {
    let protocol = protocol();
    let mut dispatcher = dispatcher();

    let mut bytes = update_bytes(0.75, 7);
    bytes.extend(frames::frame(&frames::created_proxies(&protocol, 1, ACCOUNT_ID, "Account")));
    let messages = dispatcher.receive_bytes(&bytes);

    assert_eq!(messages.len(), 2);
    let account = dispatcher.world().entities.entity(ACCOUNT_ID).expect("account");
    assert_eq!(account.property("modelScale"), Some(Value::Float(0.75)));
    assert_eq!(account.property("modelID"), Some(Value::UInt16(7)));
}

#[test]
fn every_entity_message_is_queued_on_a_placeholder() {
    let protocol = protocol();
    let mut dispatcher = dispatcher();

    let damage = frames::remote_method_call(&protocol, 300, 1, |writer| writer.write_i32(5));
    let hp = frames::update_propertys(&protocol, 300, |writer| {
        writer.write_u8(0);
        writer.write_u8(1);
        writer.write_i32(77);
    });
    assert!(!dispatcher.dispatch(&hp).expect("handler").success);
    assert!(!dispatcher.dispatch(&damage).expect("handler").success);
    assert_eq!(
        dispatcher.world().entities.entity(300).map(|entity| entity.pending_len()),
        Some(2)
    );

    // Monster has no client methods, so the replayed call fails without undoing the update
    let entered = dispatcher
        .dispatch(&frames::entity_enter_world(&protocol, 300, MONSTER_CLASS_ID as u8, Some(1)))
        .expect("handler");
    assert!(entered.success, "{}", entered.text);

    let monster = dispatcher.world().entities.entity(300).expect("monster");
    assert_eq!(monster.property("HP"), Some(Value::Int32(77)));
    assert!(monster.is_on_ground());
    assert_eq!(monster.pending_len(), 0);
}

#[test]
fn destroyed_entity_ignores_updates() {
    let protocol = protocol();
    let mut dispatcher = dispatcher();
    let enter = frames::entity_enter_world(&protocol, 300, MONSTER_CLASS_ID as u8, None);
    dispatcher.dispatch(&enter);

    let destroyed = frames::entity_destroyed(&protocol, 300);
    assert!(dispatcher.dispatch(&destroyed).expect("handler").success);
    assert!(dispatcher.dispatch(&destroyed).expect("handler").success);
    assert!(dispatcher.world().entities.entity(300).expect("tombstone").is_destroyed());
    assert!(dispatcher.world().entities.aliases().is_empty());

    let hp = frames::update_propertys(&protocol, 300, |writer| {
        writer.write_u8(0);
        writer.write_u8(1);
        writer.write_i32(12);
    });
    let ignored = dispatcher.dispatch(&hp).expect("handler");
    assert!(ignored.success);
    let tombstone = dispatcher.world().entities.entity(300).expect("tombstone");
    assert!(tombstone.is_destroyed());
    assert_eq!(tombstone.pending_len(), 0);
    assert_ne!(tombstone.property("HP"), Some(Value::Int32(12)));

    // the server may reuse the id for a new replica
    dispatcher.dispatch(&enter);
    let fresh = dispatcher.world().entities.entity(300).expect("fresh replica");
    assert!(fresh.is_initialized());
    assert_eq!(fresh.property("HP"), Some(Value::Int32(0)));
}

fn account_update(level: u16, gold: u32) -> impl FnOnce(&mut ByteWriter) {
    move |writer| {
        writer.write_u8(0);
        writer.write_u8(account::LEVEL);
        writer.write_u16(level);
        writer.write_u8(0);
        writer.write_u8(account::GOLD);
        writer.write_u32(gold);
    }
}

proptest! {
    #[test]
    fn prop_replay_matches_live_application(
        updates in prop::collection::vec((any::<u16>(), any::<u32>()), 0..8)
    ) {
        let protocol = protocol();
        let created = frames::created_proxies(&protocol, 9, ACCOUNT_ID, "Account");
        let messages: Vec<_> = updates
            .iter()
            .map(|(level, gold)| {
                frames::update_propertys(&protocol, ACCOUNT_ID, account_update(*level, *gold))
            })
            .collect();

        let mut early = dispatcher();
        for message in &messages {
            early.dispatch(message);
        }
        early.dispatch(&created);

        let mut late = dispatcher();
        late.dispatch(&created);
        for message in &messages {
            late.dispatch(message);
        }

        let early_account = early.world().entities.entity(ACCOUNT_ID).expect("early account");
        let late_account = late.world().entities.entity(ACCOUNT_ID).expect("late account");
        for name in ["level", "gold", "modelScale", "modelID"] {
            prop_assert_eq!(early_account.property(name), late_account.property(name));
        }
        prop_assert_eq!(early_account.pending_len(), 0);
    }
}
