use std::{
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use log::{debug, info, trace, warn};
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    net::TcpStream,
    sync::Mutex,
    task::JoinHandle,
};

use kbe_shared::Message;

use crate::{
    client_config::AppAddr,
    command::Commands,
    dispatcher::Dispatcher,
    error::{ClientError, ConnectionError},
};

const READ_BUFFER_SIZE: usize = 4096;

/// Opens byte streams to login and base apps
pub trait Connector: Send + Sync {
    type Stream: AsyncRead + AsyncWrite + Send + Unpin + 'static;

    fn connect(
        &self,
        addr: &AppAddr,
    ) -> impl Future<Output = Result<Self::Stream, ConnectionError>> + Send;
}

/// Plain TCP
#[derive(Clone, Copy, Debug, Default)]
pub struct TcpConnector;

impl Connector for TcpConnector {
    type Stream = TcpStream;

    fn connect(
        &self,
        addr: &AppAddr,
    ) -> impl Future<Output = Result<TcpStream, ConnectionError>> + Send {
        let target = addr.to_string();
        async move {
            let stream = TcpStream::connect(&target)
                .await
                .map_err(|source| ConnectionError::Connect {
                    addr: target.clone(),
                    source,
                })?;
            if let Err(err) = stream.set_nodelay(true) {
                debug!("could not disable Nagle on {}: {}", target, err);
            }
            Ok(stream)
        }
    }
}

type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// One stream to a server app. A reader task feeds every inbound chunk to the shared
/// dispatcher, then wakes the requests waiting on the decoded messages.
pub struct Connection {
    addr: AppAddr,
    writer: Mutex<BoxedWriter>,
    commands: Commands,
    closed: Arc<AtomicBool>,
    reader: Mutex<Option<JoinHandle<()>>>,
}

impl Connection {
    pub async fn open<C: Connector>(
        connector: &C,
        addr: &AppAddr,
        dispatcher: Arc<Mutex<Dispatcher>>,
        commands: Commands,
    ) -> Result<Connection, ConnectionError> {
        let stream = connector.connect(addr).await?;
        info!("connected to {}", addr);
        Ok(Self::from_stream(addr.clone(), stream, dispatcher, commands).await)
    }

    /// Wraps an already open stream
    pub async fn from_stream<S>(
        addr: AppAddr,
        stream: S,
        dispatcher: Arc<Mutex<Dispatcher>>,
        commands: Commands,
    ) -> Connection
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        // a new stream never continues a frame left over from the previous one
        dispatcher.lock().await.reset_stream();

        let (read_half, write_half) = tokio::io::split(stream);
        let closed = Arc::new(AtomicBool::new(false));
        let reader = tokio::spawn(read_loop(
            addr.clone(),
            read_half,
            dispatcher,
            commands.clone(),
            closed.clone(),
        ));
        Self {
            addr,
            writer: Mutex::new(Box::new(write_half)),
            commands,
            closed,
            reader: Mutex::new(Some(reader)),
        }
    }

    pub fn addr(&self) -> &AppAddr {
        &self.addr
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub async fn send(&self, message: &Message) -> Result<(), ConnectionError> {
        if self.is_closed() {
            return Err(ConnectionError::Closed);
        }
        let bytes = message.encode()?;
        trace!("sending {} ({} bytes) to {}", message.name(), bytes.len(), self.addr);
        let mut writer = self.writer.lock().await;
        writer.write_all(&bytes).await.map_err(ConnectionError::Send)?;
        writer.flush().await.map_err(ConnectionError::Send)
    }

    /// Sends `message` and waits for the first reply among `expected`
    pub async fn request(
        &self,
        message: &Message,
        expected: &[u16],
        timeout: Duration,
    ) -> Result<Message, ClientError> {
        let pending = self.commands.register(expected).await;
        self.send(message).await?;
        Ok(pending.wait(timeout).await?)
    }

    /// Shuts the stream down and waits for the reader task to finish
    pub async fn close(&self) {
        self.closed.store(true, Ordering::Release);
        if let Err(err) = self.writer.lock().await.shutdown().await {
            debug!("shutdown of {} failed: {}", self.addr, err);
        }
        if let Some(reader) = self.reader.lock().await.take() {
            reader.abort();
            if let Err(err) = reader.await {
                if !err.is_cancelled() {
                    warn!("reader task for {} failed: {}", self.addr, err);
                }
            }
        }
        self.commands.cancel_all().await;
        info!("disconnected from {}", self.addr);
    }
}

async fn read_loop<R>(
    addr: AppAddr,
    mut reader: R,
    dispatcher: Arc<Mutex<Dispatcher>>,
    commands: Commands,
    closed: Arc<AtomicBool>,
) where
    R: AsyncRead + Unpin,
{
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    loop {
        let read = match reader.read(&mut buffer).await {
            Ok(0) => {
                info!("{} closed the connection", addr);
                break;
            }
            Ok(read) => read,
            Err(err) => {
                warn!("read from {} failed: {}", addr, err);
                break;
            }
        };
        // the lock is released before waking waiters, so they observe the applied state
        let messages = dispatcher.lock().await.receive_bytes(&buffer[..read]);
        for message in &messages {
            commands.complete(message).await;
        }
    }
    closed.store(true, Ordering::Release);
    commands.cancel_all().await;
}
