//! In-memory streams between a client and a scripted fake server, without network I/O

use std::{
    future::Future,
    sync::{Arc, Mutex},
};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt, DuplexStream},
    sync::mpsc,
    task::JoinHandle,
};

use kbe_client::{AppAddr, ConnectionError, Connector};
use kbe_shared::{
    message_ids::{baseapp, client, loginapp},
    Framer, Message, Protocol, Value,
};

use crate::helpers::frames;

const DUPLEX_BUFFER_SIZE: usize = 64 * 1024;

pub const BASEAPP_HOST: &str = "127.0.0.1";
pub const BASEAPP_PORT: u16 = 20015;
pub const PLAYER_ID: i32 = 2177;
pub const RELOGIN_KEY: u64 = 0xC0FFEE;

/// Hands the server half of every new duplex pipe to a [`FakeServer`]
pub struct DuplexConnector {
    incoming: mpsc::UnboundedSender<(AppAddr, DuplexStream)>,
}

impl Connector for DuplexConnector {
    type Stream = DuplexStream;

    fn connect(
        &self,
        addr: &AppAddr,
    ) -> impl Future<Output = Result<DuplexStream, ConnectionError>> + Send {
        let (client_half, server_half) = tokio::io::duplex(DUPLEX_BUFFER_SIZE);
        let accepted = self
            .incoming
            .send((addr.clone(), server_half))
            .map_err(|_| ConnectionError::Closed);
        async move {
            accepted?;
            Ok(client_half)
        }
    }
}

/// Decodes what the client sends and answers with whatever the responder returns
pub struct FakeServer {
    received: Arc<Mutex<Vec<(AppAddr, u16)>>>,
    task: JoinHandle<()>,
}

impl FakeServer {
    pub fn start<F>(protocol: Arc<Protocol>, respond: F) -> (FakeServer, DuplexConnector)
    where
        F: Fn(&AppAddr, &Message) -> Vec<Message> + Send + Sync + 'static,
    {
        let (sender, mut incoming) = mpsc::unbounded_channel();
        let received = Arc::new(Mutex::new(Vec::new()));
        let respond = Arc::new(respond);

        let task = tokio::spawn({
            let received = received.clone();
            async move {
                while let Some((addr, stream)) = incoming.recv().await {
                    tokio::spawn(serve(
                        protocol.clone(),
                        addr,
                        stream,
                        respond.clone(),
                        received.clone(),
                    ));
                }
            }
        });

        (FakeServer { received, task }, DuplexConnector { incoming: sender })
    }

    /// A server that accepts any account and answers every tick
    pub fn happy_path(protocol: Arc<Protocol>) -> (FakeServer, DuplexConnector) {
        let replies = protocol.clone();
        Self::start(protocol, move |_, message| login_replies(&replies, message))
    }

    /// Every message id received so far, with the app it was sent to
    pub fn received(&self) -> Vec<(AppAddr, u16)> {
        self.received.lock().expect("received log poisoned").clone()
    }

    pub fn count(&self, id: u16) -> usize {
        self.received()
            .iter()
            .filter(|(_, received)| *received == id)
            .count()
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Replies of a well-behaved login app and base app
pub fn login_replies(protocol: &Protocol, message: &Message) -> Vec<Message> {
    match message.id() {
        loginapp::HELLO | baseapp::HELLO => vec![frames::hello_cb(protocol)],
        loginapp::LOGIN => {
            let account = message
                .args()
                .ok()
                .and_then(|args| args.get(2).and_then(Value::as_str).map(str::to_string))
                .unwrap_or_default();
            vec![frames::login_successfully(
                protocol,
                &account,
                BASEAPP_HOST,
                BASEAPP_PORT,
            )]
        }
        baseapp::LOGIN_BASEAPP => vec![frames::created_proxies(
            protocol,
            RELOGIN_KEY,
            PLAYER_ID,
            "Account",
        )],
        baseapp::ON_CLIENT_ACTIVE_TICK => {
            vec![frames::message(protocol, client::ON_APP_ACTIVE_TICK_CB, &[])]
        }
        _ => Vec::new(),
    }
}

async fn serve<F>(
    protocol: Arc<Protocol>,
    addr: AppAddr,
    mut stream: DuplexStream,
    respond: Arc<F>,
    received: Arc<Mutex<Vec<(AppAddr, u16)>>>,
) where
    F: Fn(&AppAddr, &Message) -> Vec<Message> + Send + Sync + 'static,
{
    let mut framer = Framer::new();
    let mut buffer = vec![0u8; 4096];
    loop {
        let read = match stream.read(&mut buffer).await {
            Ok(0) | Err(_) => return,
            Ok(read) => read,
        };
        let decoded = framer.push(&protocol.messages, &buffer[..read]);
        for message in decoded.messages {
            received
                .lock()
                .expect("received log poisoned")
                .push((addr.clone(), message.id()));
            for reply in respond(&addr, &message) {
                if stream.write_all(&frames::frame(&reply)).await.is_err() {
                    return;
                }
            }
        }
    }
}
