use std::sync::Arc;

use log::{info, warn};
use tokio::sync::Mutex;

use kbe_shared::{
    message_ids::{baseapp, client, loginapp},
    EntityId, Message, Protocol, Value,
};

use crate::{
    client_config::{AppAddr, ClientConfig},
    command::Commands,
    connection::{Connection, Connector, TcpConnector},
    dispatcher::Dispatcher,
    error::ClientError,
    keep_alive::KeepAlive,
};

const HELLO_REPLIES: [u16; 3] = [
    client::ON_HELLO_CB,
    client::ON_VERSION_NOT_MATCH,
    client::ON_SCRIPT_VERSION_NOT_MATCH,
];

/// A KBEngine client: logs in through the login app, then stays connected to a base app
/// that streams the world into the shared [`Dispatcher`].
pub struct Client<C: Connector = TcpConnector> {
    config: ClientConfig,
    protocol: Arc<Protocol>,
    connector: C,
    dispatcher: Arc<Mutex<Dispatcher>>,
    commands: Commands,
    connection: Option<Arc<Connection>>,
    keep_alive: Option<KeepAlive>,
}

impl Client<TcpConnector> {
    pub fn new(config: ClientConfig, protocol: Arc<Protocol>) -> Self {
        Self::with_connector(config, protocol, TcpConnector)
    }
}

impl<C: Connector> Client<C> {
    pub fn with_connector(config: ClientConfig, protocol: Arc<Protocol>, connector: C) -> Self {
        let dispatcher = Dispatcher::new(protocol.clone(), config.server_settings);
        Self {
            config,
            protocol,
            connector,
            dispatcher: Arc::new(Mutex::new(dispatcher)),
            commands: Commands::new(),
            connection: None,
            keep_alive: None,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Entity state lives here; lock it to read the world or the session
    pub fn dispatcher(&self) -> &Arc<Mutex<Dispatcher>> {
        &self.dispatcher
    }

    pub fn is_connected(&self) -> bool {
        self.connection
            .as_ref()
            .map_or(false, |connection| !connection.is_closed())
    }

    /// Full login: login app hello and login, then base app hello and login. Returns the
    /// player entity id.
    pub async fn login(&mut self, account: &str, password: &str) -> Result<EntityId, ClientError> {
        let loginapp_addr = self.config.loginapp.clone();
        let loginapp_conn = self.connect(&loginapp_addr).await?;
        let result = self.login_loginapp(&loginapp_conn, account, password).await;
        loginapp_conn.close().await;
        let (account, baseapp_addr) = result?;

        let baseapp_conn = Arc::new(self.connect(&baseapp_addr).await?);
        let player_id = match self.login_baseapp(&baseapp_conn, &account, password).await {
            Ok(player_id) => player_id,
            Err(err) => {
                baseapp_conn.close().await;
                return Err(err);
            }
        };

        let tick = self.message(baseapp::ON_CLIENT_ACTIVE_TICK, &[])?;
        self.keep_alive = Some(KeepAlive::start(
            baseapp_conn.clone(),
            tick,
            self.config.keep_alive_interval,
        ));
        self.connection = Some(baseapp_conn);
        info!("logged in as {}, player entity {}", account, player_id);
        Ok(player_id)
    }

    async fn login_loginapp(
        &self,
        connection: &Connection,
        account: &str,
        password: &str,
    ) -> Result<(String, AppAddr), ClientError> {
        self.hello(connection, loginapp::HELLO).await?;

        let login = self.message(
            loginapp::LOGIN,
            &[
                Value::Int8(self.config.client_type),
                Value::Blob(self.config.client_data.clone()),
                Value::String(account.to_string()),
                Value::String(password.to_string()),
            ],
        )?;
        let reply = connection
            .request(
                &login,
                &[client::ON_LOGIN_SUCCESSFULLY, client::ON_LOGIN_FAILED],
                self.config.command_timeout,
            )
            .await?;

        let dispatcher = self.dispatcher.lock().await;
        let session = dispatcher.session();
        match reply.id() {
            client::ON_LOGIN_SUCCESSFULLY => {
                let baseapp = session.baseapp.clone().ok_or_else(|| ClientError::MalformedReply {
                    name: reply.name().to_string(),
                    reason: "no base app address".to_string(),
                })?;
                let account = session.account.clone().unwrap_or_else(|| account.to_string());
                Ok((account, baseapp))
            }
            client::ON_LOGIN_FAILED => Err(ClientError::LoginFailed {
                code: session.last_error_code.unwrap_or_default(),
            }),
            id => Err(ClientError::UnexpectedReply {
                id,
                name: reply.name().to_string(),
                stage: "logging in",
            }),
        }
    }

    async fn login_baseapp(
        &self,
        connection: &Connection,
        account: &str,
        password: &str,
    ) -> Result<EntityId, ClientError> {
        self.hello(connection, baseapp::HELLO).await?;

        let login = self.message(
            baseapp::LOGIN_BASEAPP,
            &[
                Value::String(account.to_string()),
                Value::String(password.to_string()),
            ],
        )?;
        let reply = connection
            .request(
                &login,
                &[client::ON_CREATED_PROXIES, client::ON_LOGIN_BASEAPP_FAILED],
                self.config.command_timeout,
            )
            .await?;

        let dispatcher = self.dispatcher.lock().await;
        match reply.id() {
            client::ON_CREATED_PROXIES => dispatcher
                .world()
                .entities
                .player_id()
                .ok_or(ClientError::NotLoggedIn),
            client::ON_LOGIN_BASEAPP_FAILED => Err(ClientError::LoginBaseappFailed {
                code: dispatcher.session().last_error_code.unwrap_or_default(),
            }),
            id => Err(ClientError::UnexpectedReply {
                id,
                name: reply.name().to_string(),
                stage: "logging in to the base app",
            }),
        }
    }

    /// Asks the login app to create an account. Returns the server's result code.
    pub async fn create_account(
        &self,
        account: &str,
        password: &str,
        data: Vec<u8>,
    ) -> Result<u16, ClientError> {
        let loginapp_addr = self.config.loginapp.clone();
        let connection = self.connect(&loginapp_addr).await?;
        let result = async {
            self.hello(&connection, loginapp::HELLO).await?;
            let request = self.message(
                loginapp::REQ_CREATE_ACCOUNT,
                &[
                    Value::String(account.to_string()),
                    Value::String(password.to_string()),
                    Value::Blob(data),
                ],
            )?;
            connection
                .request(
                    &request,
                    &[client::ON_CREATE_ACCOUNT_RESULT],
                    self.config.command_timeout,
                )
                .await?;
            let dispatcher = self.dispatcher.lock().await;
            Ok::<u16, ClientError>(
                dispatcher
                    .session()
                    .create_account_result
                    .as_ref()
                    .map_or(0, |(code, _)| *code),
            )
        }
        .await;
        connection.close().await;
        result
    }

    async fn hello(&self, connection: &Connection, message_id: u16) -> Result<(), ClientError> {
        let hello = self.message(
            message_id,
            &[
                Value::String(self.config.client_version.clone()),
                Value::String(self.config.script_version.clone()),
                Value::Blob(Vec::new()),
            ],
        )?;
        let reply = connection
            .request(&hello, &HELLO_REPLIES, self.config.command_timeout)
            .await?;

        let dispatcher = self.dispatcher.lock().await;
        let session = dispatcher.session();
        match reply.id() {
            client::ON_HELLO_CB => Ok(()),
            client::ON_VERSION_NOT_MATCH => Err(ClientError::VersionNotMatch {
                server_version: session.server_version.clone().unwrap_or_default(),
            }),
            client::ON_SCRIPT_VERSION_NOT_MATCH => Err(ClientError::ScriptVersionNotMatch {
                server_version: session.server_script_version.clone().unwrap_or_default(),
            }),
            id => Err(ClientError::UnexpectedReply {
                id,
                name: reply.name().to_string(),
                stage: "saying hello",
            }),
        }
    }

    async fn connect(&self, addr: &AppAddr) -> Result<Connection, ClientError> {
        Ok(Connection::open(
            &self.connector,
            addr,
            self.dispatcher.clone(),
            self.commands.clone(),
        )
        .await?)
    }

    /// Builds a message from the protocol's spec for `id`
    pub fn message(&self, id: u16, args: &[Value]) -> Result<Message, ClientError> {
        let spec = self
            .protocol
            .messages
            .get(id)
            .ok_or(ClientError::MissingMessageSpec { id })?;
        Ok(Message::from_args(spec.clone(), args)?)
    }

    fn connection(&self) -> Result<&Arc<Connection>, ClientError> {
        self.connection.as_ref().ok_or(ClientError::NotLoggedIn)
    }

    pub async fn send(&self, message: &Message) -> Result<(), ClientError> {
        Ok(self.connection()?.send(message).await?)
    }

    /// Sends every message queued by entity calls. Returns how many went out.
    pub async fn flush(&self) -> Result<usize, ClientError> {
        let connection = self.connection()?;
        let outgoing = self.dispatcher.lock().await.take_outgoing();
        for message in &outgoing {
            connection.send(message).await?;
        }
        Ok(outgoing.len())
    }

    pub async fn call_base_method(
        &self,
        entity_id: EntityId,
        method: &str,
        args: &[Value],
    ) -> Result<(), ClientError> {
        self.dispatcher
            .lock()
            .await
            .world_mut()
            .entities
            .call_base_method(entity_id, method, args)?;
        self.flush().await.map(|_| ())
    }

    pub async fn call_cell_method(
        &self,
        entity_id: EntityId,
        method: &str,
        args: &[Value],
    ) -> Result<(), ClientError> {
        self.dispatcher
            .lock()
            .await
            .world_mut()
            .entities
            .call_cell_method(entity_id, method, args)?;
        self.flush().await.map(|_| ())
    }

    /// Tells the base app we are leaving, then disconnects
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        let (relogin_key, player_id) = {
            let dispatcher = self.dispatcher.lock().await;
            (
                dispatcher.session().relogin_key.unwrap_or_default(),
                dispatcher.world().entities.player_id(),
            )
        };
        let player_id = player_id.ok_or(ClientError::NotLoggedIn)?;
        let logout = self.message(
            baseapp::LOGOUT_BASEAPP,
            &[Value::UInt64(relogin_key), Value::Int32(player_id)],
        )?;
        if let Err(err) = self.send(&logout).await {
            warn!("logout was not delivered: {}", err);
        }
        self.disconnect().await;
        Ok(())
    }

    /// Stops the keep-alive and closes the base app connection
    pub async fn disconnect(&mut self) {
        if let Some(keep_alive) = self.keep_alive.take() {
            keep_alive.stop().await;
        }
        if let Some(connection) = self.connection.take() {
            connection.close().await;
        }
    }
}
