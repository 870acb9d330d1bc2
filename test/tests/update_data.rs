use glam::Vec3;
use proptest::prelude::*;

use kbe_client::{Dispatcher, EntityManager, ServerSettings, MAX_ALIASES};
use kbe_shared::{message_ids::client, update_data_variants, ByteWriter, PositionFields, Value};
use kbe_test::{
    dispatcher, frames, protocol,
    test_protocol::{AVATAR_CLASS_ID, MONSTER_CLASS_ID},
};

const XZ_X: f32 = 3696.437744140625;
const XZ_Z: f32 = 574404.25;

fn xz_variant_id() -> u16 {
    update_data_variants()
        .find(|variant| variant.position == PositionFields::Xz && variant.direction.count() == 0)
        .map(|variant| variant.id)
        .expect("plain xz variant")
}

fn place(
    dispatcher: &mut Dispatcher,
    entity_id: i32,
    position: Vec3,
    yaw: f32,
    pitch: f32,
    roll: f32,
) {
    let protocol = dispatcher.protocol().clone();
    let set = frames::message(
        &protocol,
        client::ON_SET_ENTITY_POS_AND_DIR,
        &[
            Value::Int32(entity_id),
            Value::Float(position.x),
            Value::Float(position.y),
            Value::Float(position.z),
            Value::Float(yaw),
            Value::Float(pitch),
            Value::Float(roll),
        ],
    );
    let result = dispatcher.dispatch(&set).expect("handler");
    assert!(result.success, "{}", result.text);
}

#[test]
fn update_data_xz_touches_only_x_and_z() {
    let protocol = protocol();
    let mut dispatcher = dispatcher();
    dispatcher.dispatch(&frames::entity_enter_world(&protocol, 203, MONSTER_CLASS_ID as u8, None));
    place(&mut dispatcher, 203, Vec3::new(1.0, 2.0, 3.0), 0.1, 0.2, 0.3);

    // the entity id travels as its alias while the table fits in a byte
    let mut writer = ByteWriter::new();
    writer.write_u8(0);
    writer.write_f32(XZ_X);
    writer.write_f32(XZ_Z);
    let update = frames::raw_message(&protocol, xz_variant_id(), writer.to_bytes());
    let result = dispatcher.dispatch(&update).expect("handler");
    assert!(result.success, "{}", result.text);

    let monster = dispatcher.world().entities.entity(203).expect("monster");
    assert_eq!(monster.position(), Vec3::new(XZ_X, 2.0, XZ_Z));
    // stored as (roll, pitch, yaw)
    assert_eq!(monster.direction(), Vec3::new(0.3, 0.2, 0.1));
}

#[test]
fn update_data_uses_full_ids_without_aliasing() {
    let protocol = protocol();
    let settings = ServerSettings {
        alias_entity_id: false,
        ..ServerSettings::default()
    };
    let mut dispatcher = Dispatcher::new(protocol.clone(), settings);
    dispatcher.dispatch(&frames::entity_enter_world(&protocol, 203, MONSTER_CLASS_ID as u8, None));

    let mut writer = ByteWriter::new();
    writer.write_i32(203);
    writer.write_f32(XZ_X);
    writer.write_f32(XZ_Z);
    let update = frames::raw_message(&protocol, xz_variant_id(), writer.to_bytes());
    assert!(dispatcher.dispatch(&update).expect("handler").success);

    let monster = dispatcher.world().entities.entity(203).expect("monster");
    assert_eq!(monster.position(), Vec3::new(XZ_X, 0.0, XZ_Z));
}

#[test]
fn unknown_alias_fails_without_creating_entities() {
    let protocol = protocol();
    let mut dispatcher = dispatcher();
    let mut writer = ByteWriter::new();
    writer.write_u8(3);
    writer.write_f32(1.0);
    writer.write_f32(1.0);
    let update = frames::raw_message(&protocol, xz_variant_id(), writer.to_bytes());

    let result = dispatcher.dispatch(&update).expect("handler");
    assert!(!result.success);
    assert!(dispatcher.world().entities.is_empty());
}

#[test]
fn enter_world_without_trailing_flag_is_not_on_ground() {
    let protocol = protocol();
    let mut dispatcher = dispatcher();
    let enter = frames::entity_enter_world(&protocol, 203, AVATAR_CLASS_ID as u8, None);
    assert_eq!(enter.payload().len(), 5);

    let result = dispatcher.dispatch(&enter).expect("handler");
    assert!(result.success, "{}", result.text);
    assert_eq!(result.result, Some(Value::Int32(203)));

    let avatar = dispatcher.world().entities.entity(203).expect("avatar");
    assert!(!avatar.is_on_ground());
    assert!(avatar.in_world());
    assert_eq!(avatar.class_name(), Some("Avatar"));
    assert!(avatar.component("bag").is_some());
    assert_eq!(dispatcher.world().entities.resolve_alias(0).ok(), Some(203));
}

#[test]
fn base_position_moves_the_player() {
    let protocol = protocol();
    let mut dispatcher = dispatcher();
    let base_pos = frames::message(
        &protocol,
        client::ON_UPDATE_BASE_POS_XZ,
        &[Value::Float(4.0), Value::Float(8.0)],
    );
    assert!(!dispatcher.dispatch(&base_pos).expect("handler").success, "no player yet");

    dispatcher.dispatch(&frames::created_proxies(&protocol, 1, 2177, "Account"));
    place(&mut dispatcher, 2177, Vec3::new(1.0, 2.0, 3.0), 0.0, 0.0, 0.0);
    assert!(dispatcher.dispatch(&base_pos).expect("handler").success);

    let player = dispatcher.world().entities.player().expect("player");
    assert_eq!(player.position(), Vec3::new(4.0, 2.0, 8.0));
}

#[test]
fn leave_world_keeps_the_player() {
    let protocol = protocol();
    let mut dispatcher = dispatcher();
    dispatcher.dispatch(&frames::created_proxies(&protocol, 1, 2177, "Account"));
    dispatcher.dispatch(&frames::entity_enter_world(&protocol, 2177, 1, Some(1)));
    dispatcher.dispatch(&frames::entity_enter_world(&protocol, 300, MONSTER_CLASS_ID as u8, None));
    assert_eq!(dispatcher.world().entities.aliases().len(), 2);

    dispatcher.dispatch(&frames::entity_leave_world(&protocol, 300));
    dispatcher.dispatch(&frames::entity_leave_world(&protocol, 2177));

    let entities = &dispatcher.world().entities;
    assert!(entities.entity(300).expect("tombstone").is_destroyed());
    let player = entities.entity(2177).expect("player");
    assert!(player.is_initialized());
    assert!(!player.in_world());
    assert!(entities.aliases().is_empty());
}

proptest! {
    #[test]
    fn prop_alias_saturation_never_reverts(entered in 0usize..400, left in 0usize..400) {
        let mut entities = EntityManager::new(protocol(), ServerSettings::default());
        for entity_id in 0..entered as i32 {
            entities.enter_world(entity_id, false);
        }
        let saturated = entered > MAX_ALIASES;
        prop_assert_eq!(entities.can_use_alias_for_entity_id(), !saturated);

        for entity_id in 0..left.min(entered) as i32 {
            entities.leave_world(entity_id);
        }
        prop_assert_eq!(entities.can_use_alias_for_entity_id(), !saturated);
    }
}
