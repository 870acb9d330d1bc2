use std::time::Duration;

use kbe_client::{AppAddr, Client, ClientConfig, ClientError, CommandError};
use kbe_shared::{
    message_ids::{baseapp, client, loginapp},
    Value,
};
use kbe_test::{
    frames, init_logging,
    local_socket::{login_replies, BASEAPP_HOST, BASEAPP_PORT, PLAYER_ID, RELOGIN_KEY},
    protocol, DuplexConnector, FakeServer,
};

fn config() -> ClientConfig {
    ClientConfig {
        command_timeout: Duration::from_secs(2),
        keep_alive_interval: Duration::from_millis(20),
        ..ClientConfig::default()
    }
}

fn baseapp_addr() -> AppAddr {
    AppAddr::new(BASEAPP_HOST, BASEAPP_PORT)
}

/// Polls until the server has seen `count` messages of `id`
async fn wait_for(server: &FakeServer, id: u16, count: usize) {
    for _ in 0..200 {
        if server.count(id) >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("server saw {} of message {}, expected {}", server.count(id), id, count);
}

#[tokio::test]
async fn login_reaches_the_base_app() {
    init_logging();
    let protocol = protocol();
    let (server, connector) = FakeServer::happy_path(protocol.clone());
    let mut client = Client::with_connector(config(), protocol, connector);

    let player_id = client.login("kbe_bot", "secret").await.expect("login");
    assert_eq!(player_id, PLAYER_ID);
    assert!(client.is_connected());

    {
        let dispatcher = client.dispatcher().lock().await;
        let session = dispatcher.session();
        assert_eq!(session.account.as_deref(), Some("kbe_bot"));
        assert_eq!(session.baseapp, Some(baseapp_addr()));
        assert_eq!(session.relogin_key, Some(RELOGIN_KEY));
        assert_eq!(session.server_version.as_deref(), Some("2.5.0"));
        assert_eq!(session.component_type, Some(5));
        let player = dispatcher.world().entities.player().expect("player");
        assert_eq!(player.class_name(), Some("Account"));
    }

    let loginapp_addr = AppAddr::default();
    let received = server.received();
    assert_eq!(
        &received[..2],
        &[
            (loginapp_addr.clone(), loginapp::HELLO),
            (loginapp_addr, loginapp::LOGIN),
        ]
    );
    assert_eq!(
        &received[2..4],
        &[
            (baseapp_addr(), baseapp::HELLO),
            (baseapp_addr(), baseapp::LOGIN_BASEAPP),
        ]
    );

    client.logout().await.expect("logout");
    assert!(!client.is_connected());
    wait_for(&server, baseapp::LOGOUT_BASEAPP, 1).await;
}

#[tokio::test]
async fn keep_alive_ticks_until_disconnect() {
    let protocol = protocol();
    let (server, connector) = FakeServer::happy_path(protocol.clone());
    let mut client = Client::with_connector(config(), protocol, connector);
    client.login("kbe_bot", "secret").await.expect("login");

    wait_for(&server, baseapp::ON_CLIENT_ACTIVE_TICK, 3).await;
    for _ in 0..200 {
        if client.dispatcher().lock().await.session().last_active_tick_ack.is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(client.dispatcher().lock().await.session().last_active_tick_ack.is_some());

    client.disconnect().await;
    // let the server drain ticks that were already written
    tokio::time::sleep(Duration::from_millis(50)).await;
    let ticks = server.count(baseapp::ON_CLIENT_ACTIVE_TICK);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(server.count(baseapp::ON_CLIENT_ACTIVE_TICK), ticks);
}

#[tokio::test]
async fn base_method_call_is_sent() {
    let protocol = protocol();
    let (server, connector) = FakeServer::happy_path(protocol.clone());
    let mut client = Client::with_connector(config(), protocol, connector);
    let player_id = client.login("kbe_bot", "secret").await.expect("login");

    client
        .call_base_method(player_id, "reqAvatarList", &[])
        .await
        .expect("call");
    wait_for(&server, baseapp::ON_REMOTE_METHOD_CALL, 1).await;

    match client.call_base_method(player_id, "reqAvatarList", &[Value::Int8(1)]).await {
        Err(ClientError::Entity(_)) => {}
        other => panic!("Expected an entity error, got {:?}", other),
    }
    client.disconnect().await;
}

#[tokio::test]
async fn unanswered_login_times_out() {
    let protocol = protocol();
    let replies = protocol.clone();
    let (_server, connector): (FakeServer, DuplexConnector) =
        FakeServer::start(protocol.clone(), move |_, message| match message.id() {
            loginapp::HELLO => vec![frames::hello_cb(&replies)],
            _ => Vec::new(),
        });
    let config = ClientConfig {
        command_timeout: Duration::from_millis(100),
        ..config()
    };
    let mut client = Client::with_connector(config, protocol, connector);

    match client.login("kbe_bot", "secret").await {
        Err(ClientError::Command(CommandError::Timeout { expected, .. })) => {
            assert_eq!(expected, vec![client::ON_LOGIN_SUCCESSFULLY, client::ON_LOGIN_FAILED]);
        }
        other => panic!("Expected Timeout, got {:?}", other),
    }
    assert!(!client.is_connected());
}

#[tokio::test]
async fn version_mismatch_is_reported() {
    let protocol = protocol();
    let replies = protocol.clone();
    let (_server, connector) = FakeServer::start(protocol.clone(), move |_, message| {
        match message.id() {
            loginapp::HELLO => vec![frames::message(
                &replies,
                client::ON_VERSION_NOT_MATCH,
                &[Value::String("9.9.9".to_string())],
            )],
            _ => Vec::new(),
        }
    });
    let mut client = Client::with_connector(config(), protocol, connector);

    match client.login("kbe_bot", "secret").await {
        Err(ClientError::VersionNotMatch { server_version }) => assert_eq!(server_version, "9.9.9"),
        other => panic!("Expected VersionNotMatch, got {:?}", other),
    }
}

#[tokio::test]
async fn rejected_login_reports_the_code() {
    let protocol = protocol();
    let replies = protocol.clone();
    let (_server, connector) = FakeServer::start(protocol.clone(), move |_, message| {
        match message.id() {
            loginapp::LOGIN => vec![frames::message(
                &replies,
                client::ON_LOGIN_FAILED,
                &[Value::UInt16(3), Value::Blob(Vec::new())],
            )],
            _ => login_replies(&replies, message),
        }
    });
    let mut client = Client::with_connector(config(), protocol, connector);

    match client.login("kbe_bot", "wrong").await {
        Err(ClientError::LoginFailed { code }) => assert_eq!(code, 3),
        other => panic!("Expected LoginFailed, got {:?}", other),
    }
    assert!(!client.is_connected());
}

#[tokio::test]
async fn create_account_returns_the_server_code() {
    let protocol = protocol();
    let replies = protocol.clone();
    let (server, connector) = FakeServer::start(protocol.clone(), move |_, message| {
        match message.id() {
            loginapp::REQ_CREATE_ACCOUNT => vec![frames::message(
                &replies,
                client::ON_CREATE_ACCOUNT_RESULT,
                &[Value::UInt16(0), Value::Blob(b"ok".to_vec())],
            )],
            _ => login_replies(&replies, message),
        }
    });
    let client = Client::with_connector(config(), protocol, connector);

    let code = client
        .create_account("new_bot", "secret", Vec::new())
        .await
        .expect("create account");
    assert_eq!(code, 0);
    assert_eq!(server.count(loginapp::REQ_CREATE_ACCOUNT), 1);
    assert!(!client.is_connected());
}
