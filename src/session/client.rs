use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

use crate::game::events::GameEventContainer;
use crate::game::player::PlayerId;
use crate::utils::errors::DeliveryError;

/// What a session is allowed to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    /// A seated player. Receives private events addressed to them.
    Player(PlayerId),
    /// A watcher. Omniscient spectators receive the unredacted view.
    Spectator { omniscient: bool },
}

impl SessionKind {
    pub fn is_omniscient(&self) -> bool {
        matches!(self, SessionKind::Spectator { omniscient: true })
    }
}

/// The match-side end of a session: pushes event containers without ever
/// waiting on the connection.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    pub id: Uuid,
    pub kind: SessionKind,
    sender: UnboundedSender<GameEventContainer>,
    backlog: Arc<AtomicUsize>,
}

impl SessionHandle {
    /// Queues a container and returns how many are now waiting.
    pub fn deliver(&self, container: GameEventContainer) -> Result<usize, DeliveryError> {
        self.sender
            .send(container)
            .map_err(|_| DeliveryError::Closed(self.id))?;
        Ok(self.backlog.fetch_add(1, Ordering::Relaxed) + 1)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    pub fn backlog(&self) -> usize {
        self.backlog.load(Ordering::Relaxed)
    }
}

/// The connection-side end of a session.
///
/// Dropping it closes the session; the match notices on its next delivery.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub kind: SessionKind,
    receiver: UnboundedReceiver<GameEventContainer>,
    backlog: Arc<AtomicUsize>,
}

impl Session {
    pub fn new(kind: SessionKind) -> (Session, SessionHandle) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let backlog = Arc::new(AtomicUsize::new(0));
        let id = Uuid::new_v4();

        let session = Session {
            id,
            kind,
            receiver,
            backlog: Arc::clone(&backlog),
        };
        let handle = SessionHandle {
            id,
            kind,
            sender,
            backlog,
        };
        (session, handle)
    }

    /// Waits for the next container. `None` once the match dropped the
    /// session and everything queued has been read.
    pub async fn recv(&mut self) -> Option<GameEventContainer> {
        let container = self.receiver.recv().await?;
        self.backlog.fetch_sub(1, Ordering::Relaxed);
        Some(container)
    }

    /// Next container encoded as CBOR, ready to be framed by the transport.
    pub async fn recv_bytes(&mut self) -> Option<Result<Vec<u8>, serde_cbor::Error>> {
        self.recv().await.map(|container| container.to_cbor())
    }

    /// Everything queued right now, without waiting.
    pub fn drain(&mut self) -> Vec<GameEventContainer> {
        let mut containers = Vec::new();
        while let Ok(container) = self.receiver.try_recv() {
            self.backlog.fetch_sub(1, Ordering::Relaxed);
            containers.push(container);
        }
        containers
    }
}
