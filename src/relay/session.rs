use log::{debug, error, info, warn};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Duration, Instant};

use crate::protocol::{
    decode_link_line, ControllerAction, GameAction, GameStateEvent, LinkFrame, ProtocolError,
    RelayAction, PROTOCOL_VERSION,
};
use crate::relay::{AttachPolicy, ClientId, Debounce, RelayEvent};
use crate::transport::{ChannelSender, LinkWriter};

struct AttachedClient {
    id: ClientId,
    channel: Box<dyn ChannelSender>,
}

/// Bridges one controller link and at most one client channel.
pub struct RelaySession {
    link: Box<dyn LinkWriter>,
    client: Option<AttachedClient>,
    debounce: Debounce,
    policy: AttachPolicy,
}

impl RelaySession {
    pub fn new(link: Box<dyn LinkWriter>, debounce_window: Duration, policy: AttachPolicy) -> Self {
        Self {
            link,
            client: None,
            debounce: Debounce::new(debounce_window),
            policy,
        }
    }

    /// Handle events until every sender of `events` is gone.
    pub async fn run(mut self, mut events: mpsc::Receiver<RelayEvent>) {
        info!(
            "relay session started (protocol v{}, {:?} policy)",
            PROTOCOL_VERSION, self.policy
        );
        loop {
            let deadline = self.debounce.deadline();
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle(event, Instant::now()).await,
                    None => break,
                },
                _ = wait_until(deadline) => self.debounce.expire(Instant::now()),
            }
        }
        info!("relay session stopped");
    }

    /// Handle one event to completion. `now` drives the debounce window.
    pub async fn handle(&mut self, event: RelayEvent, now: Instant) {
        match event {
            RelayEvent::LinkLine(line) => self.on_link_line(&line, now).await,
            RelayEvent::LinkOpened { link } => self.replace_link(link).await,
            RelayEvent::LinkClosed => warn!("controller link closed"),
            RelayEvent::ClientAttached { id, channel } => self.attach(id, channel).await,
            RelayEvent::ClientEvent { id, event } => self.on_client_event(id, event).await,
            RelayEvent::ClientDetached { id } => self.detach(id),
        }
    }

    async fn on_link_line(&mut self, line: &str, now: Instant) {
        match decode_link_line(line) {
            Ok(LinkFrame::Debug(text)) => info!("controller: {}", text),
            Ok(LinkFrame::Action(action)) => self.on_controller_action(action, now).await,
            Err(ProtocolError::Empty) => debug!("skipping blank controller line"),
            Err(e) => warn!("discarding controller line {:?}: {}", line.trim_end(), e),
        }
    }

    async fn on_controller_action(&mut self, action: ControllerAction, now: Instant) {
        debug!("controller sent {:?}", action);
        match action {
            ControllerAction::Ready => self.send_link(RelayAction::Connected).await,
            ControllerAction::UnknownActionReceived => {
                warn!("controller did not understand the last relay message")
            }
            other => {
                if let Some(game_action) = other.game_action() {
                    self.forward(game_action, now).await;
                }
            }
        }
    }

    async fn forward(&mut self, action: GameAction, now: Instant) {
        let Some(client) = self.client.as_mut() else {
            warn!("no client attached, dropping {:?}", action);
            return;
        };
        if !self.debounce.try_acquire(now) {
            debug!("debounced {:?}", action);
            return;
        }
        if let Err(e) = client.channel.emit(action).await {
            warn!("emit {:?} to client {} failed: {}", action, client.id, e);
        }
    }

    async fn attach(&mut self, id: ClientId, channel: Box<dyn ChannelSender>) {
        match (&self.client, self.policy) {
            (Some(current), AttachPolicy::Reject) => {
                warn!("refusing client {}: client {} is attached", id, current.id);
                return;
            }
            (Some(current), AttachPolicy::Replace) => {
                info!("client {} replaces client {}", id, current.id)
            }
            (None, _) => info!("client {} attached", id),
        }
        self.client = Some(AttachedClient { id, channel });
        self.send_link(RelayAction::ReadyForGame).await;
    }

    async fn on_client_event(&mut self, id: ClientId, event: GameStateEvent) {
        if self.attached_client() != Some(id) {
            debug!("ignoring {:?} from client {} (not attached)", event, id);
            return;
        }
        info!("client reported {:?}", event);
        self.send_link(RelayAction::from(event)).await;
    }

    fn detach(&mut self, id: ClientId) {
        if self.attached_client() == Some(id) {
            self.client = None;
            info!("client {} detached", id);
        } else {
            debug!("client {} left without being attached", id);
        }
    }

    /// Swap in a fresh link. An attached client is announced again so the
    /// controller knows a game is ready.
    async fn replace_link(&mut self, link: Box<dyn LinkWriter>) {
        info!("controller link replaced");
        self.link = link;
        if self.client.is_some() {
            self.send_link(RelayAction::ReadyForGame).await;
        }
    }

    async fn send_link(&mut self, action: RelayAction) {
        if let Err(e) = self.link.send(action).await {
            error!("controller write of {:?} failed: {}", action, e);
        }
    }

    pub fn attached_client(&self) -> Option<ClientId> {
        self.client.as_ref().map(|c| c.id)
    }

    pub fn is_client_attached(&self) -> bool {
        self.client.is_some()
    }

    pub fn policy(&self) -> AttachPolicy {
        self.policy
    }

    pub fn debounce(&self) -> &Debounce {
        &self.debounce
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
