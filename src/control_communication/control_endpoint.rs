use super::control_messages::{Downstream, DownstreamContent, Upstream, UpstreamContent};
use crate::{info, warn};
use prost::Message;
use std::io::{Cursor, ErrorKind};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::net::tcp::{ReadHalf, WriteHalf};
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Clone)]
pub enum ControlEvent {
    Connected,
    Disconnected,
    Message(UpstreamContent),
}

/// Frames above this size are treated as a protocol violation.
const MAX_FRAME_LEN: u32 = 1 << 20;

type FrameSender = mpsc::UnboundedSender<Arc<Vec<u8>>>;

/// TCP endpoint speaking length-prefixed `prost` frames.
///
/// Every downstream message is queued for all connected clients. Each client owns an
/// unbounded queue, so a slow reader delays its own frames but never loses one. Upstream
/// messages of all clients are merged into one event stream.
pub struct ControlEndpoint {
    clients: Arc<Mutex<Vec<FrameSender>>>,
    upstream_event_receiver: Mutex<Option<mpsc::UnboundedReceiver<ControlEvent>>>,
    close_oneshot_sender: Option<oneshot::Sender<()>>,
    local_addr: SocketAddr,
}

impl ControlEndpoint {
    async fn handle_connection_rx(
        socket: &mut ReadHalf<'_>,
        upstream_event_sender: &mpsc::UnboundedSender<ControlEvent>,
    ) -> Result<(), std::io::Error> {
        loop {
            let length = socket.read_u32().await?;
            if length > MAX_FRAME_LEN {
                return Err(std::io::Error::new(ErrorKind::InvalidData, format!("frame of {length} bytes")));
            }
            let mut buffer = vec![0u8; length as usize];
            socket.read_exact(&mut buffer).await?;

            match Upstream::decode(&mut Cursor::new(buffer)) {
                Ok(Upstream { content: Some(content) }) => {
                    let _ = upstream_event_sender.send(ControlEvent::Message(content));
                }
                Ok(Upstream { content: None }) => {}
                Err(e) => warn!("Dropping undecodable control frame: {e}"),
            }
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    async fn handle_connection_tx(
        socket: &mut WriteHalf<'_>,
        greeting: &[u8],
        downstream_receiver: &mut mpsc::UnboundedReceiver<Arc<Vec<u8>>>,
    ) -> Result<(), std::io::Error> {
        socket.write_u32(greeting.len() as u32).await?;
        socket.write_all(greeting).await?;
        while let Some(message_buffer) = downstream_receiver.recv().await {
            socket.write_u32(message_buffer.len() as u32).await?;
            socket.write_all(&message_buffer).await?;
        }
        Ok(())
    }

    /// Binds `addr` and starts accepting clients.
    ///
    /// `greeting` is the first message every new client receives.
    ///
    /// # Errors
    /// Returns the I/O error if the address cannot be bound.
    pub async fn start(addr: &str, greeting: DownstreamContent) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        let clients: Arc<Mutex<Vec<FrameSender>>> = Arc::new(Mutex::new(Vec::new()));
        let (upstream_event_sender, upstream_event_receiver) = mpsc::unbounded_channel();
        let (close_oneshot_sender, mut close_oneshot_receiver) = oneshot::channel();
        let greeting = Downstream { content: Some(greeting) }.encode_to_vec();
        let inst = Self {
            clients: Arc::clone(&clients),
            upstream_event_receiver: Mutex::new(Some(upstream_event_receiver)),
            close_oneshot_sender: Some(close_oneshot_sender),
            local_addr,
        };
        info!("Control endpoint listening on {local_addr}");

        tokio::spawn(async move {
            loop {
                let accept = tokio::select! {
                    accept = listener.accept() => accept,
                    _ = &mut close_oneshot_receiver => break
                };

                let Ok((mut socket, peer)) = accept else { break };
                // registered before `Connected` so no frame sent in reaction to it is missed
                let (downstream_sender, mut downstream_receiver) = mpsc::unbounded_channel();
                clients.lock().unwrap_or_else(PoisonError::into_inner).push(downstream_sender);
                let _ = upstream_event_sender.send(ControlEvent::Connected);
                let upstream_event_sender_local = upstream_event_sender.clone();
                let greeting_local = greeting.clone();

                tokio::spawn(async move {
                    let (mut rx_socket, mut tx_socket) = socket.split();

                    let result = tokio::select! {
                        res = ControlEndpoint::handle_connection_tx(&mut tx_socket, &greeting_local, &mut downstream_receiver) => res,
                        res = ControlEndpoint::handle_connection_rx(&mut rx_socket, &upstream_event_sender_local) => res
                    };

                    // closing the queue lets the next send drop this client from the registry
                    downstream_receiver.close();
                    let _ = upstream_event_sender_local.send(ControlEvent::Disconnected);
                    match result {
                        Err(e)
                            if e.kind() == ErrorKind::UnexpectedEof
                                || e.kind() == ErrorKind::ConnectionReset
                                || e.kind() == ErrorKind::ConnectionAborted =>
                        {
                            return;
                        }
                        Err(e) => warn!("Closing control connection to {peer} due to {e:?}"),
                        Ok(()) => {}
                    }
                    let _ = socket.shutdown().await;
                });
            }
        });
        Ok(inst)
    }

    /// Queues `msg` for every connected client.
    pub fn send_downstream(&self, msg: DownstreamContent) {
        let frame = Arc::new(Downstream { content: Some(msg) }.encode_to_vec());
        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);
        clients.retain(|client| client.send(Arc::clone(&frame)).is_ok());
    }

    /// Hands out the merged upstream event stream. Only the first call returns it.
    pub fn take_events(&self) -> Option<mpsc::UnboundedReceiver<ControlEvent>> {
        self.upstream_event_receiver.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    pub fn local_addr(&self) -> SocketAddr { self.local_addr }
}

impl Drop for ControlEndpoint {
    fn drop(&mut self) {
        if let Some(close) = self.close_oneshot_sender.take() {
            let _ = close.send(());
        }
        self.clients.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}
