use fleetlink::{
    relay::{AttachPolicy, ClientId, RelayEvent, RelaySession},
    transport::in_memory::{InMemoryChannel, InMemoryLink},
    ControllerAction, GameAction, GameClient, GameStateEvent, GameStatus, RelayAction,
    DEBOUNCE_WINDOW, DEFAULT_FLEET_SIZE, GRID_SIZE,
};
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{Duration, Instant};

const CLIENT: ClientId = 1;
/// Synthetic time between two controller presses, longer than the debounce window.
const PRESS_INTERVAL: Duration = Duration::from_millis(300);

struct Sim {
    session: RelaySession,
    client: GameClient<SmallRng>,
    channel_rx: UnboundedReceiver<GameAction>,
    now: Instant,
}

impl Sim {
    /// Feed one controller code to the relay and let the client react.
    async fn press(&mut self, action: ControllerAction) -> anyhow::Result<Option<GameStateEvent>> {
        self.now += PRESS_INTERVAL;
        self.session
            .handle(RelayEvent::LinkLine(action.to_string()), self.now)
            .await;
        let mut reported = None;
        while let Ok(game_action) = self.channel_rx.try_recv() {
            if let Some(event) = self
                .client
                .handle_action(game_action)
                .map_err(|e| anyhow::anyhow!(e))?
            {
                self.session
                    .handle(RelayEvent::ClientEvent { id: CLIENT, event }, self.now)
                    .await;
                reported = Some(event);
            }
        }
        Ok(reported)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <seed> [fleet_size]", args[0]);
        std::process::exit(1);
    }
    let seed: u64 = args[1].parse()?;
    let fleet_size: usize = match args.get(2) {
        Some(raw) => raw.parse()?,
        None => DEFAULT_FLEET_SIZE,
    };

    let rng = SmallRng::seed_from_u64(seed);
    let client = GameClient::new(fleet_size, rng).map_err(|e| anyhow::anyhow!(e))?;
    let (link, mut controller_rx) = InMemoryLink::new();
    let (channel, channel_rx) = InMemoryChannel::new();
    let session = RelaySession::new(Box::new(link), DEBOUNCE_WINDOW, AttachPolicy::Replace);

    let mut sim = Sim {
        session,
        client,
        channel_rx,
        now: Instant::now(),
    };
    sim.press(ControllerAction::Ready).await?;
    sim.session
        .handle(
            RelayEvent::ClientAttached {
                id: CLIENT,
                channel: Box::new(channel),
            },
            sim.now,
        )
        .await;

    // Park the cursor in the top-left corner, then sweep the board row by
    // row, alternating direction, firing on every cell.
    for _ in 0..GRID_SIZE {
        sim.press(ControllerAction::Up).await?;
        sim.press(ControllerAction::Left).await?;
    }
    'sweep: for row in 0..GRID_SIZE {
        let step = if row % 2 == 0 {
            ControllerAction::Right
        } else {
            ControllerAction::Left
        };
        for col in 0..GRID_SIZE {
            if sim.press(ControllerAction::Fire).await? == Some(GameStateEvent::Win) {
                break 'sweep;
            }
            if col + 1 < GRID_SIZE {
                sim.press(step).await?;
            }
        }
        sim.press(ControllerAction::Down).await?;
    }

    let mut replies = Vec::new();
    while let Ok(reply) = controller_rx.try_recv() {
        replies.push(reply);
    }
    let state = sim.client.state();
    let hit_cells: Vec<_> = sim.client.board().hit_cells().collect();
    let result = json!({
        "seed": seed,
        "fleet_size": fleet_size,
        "shots_fired": state.shots_fired,
        "boats_remaining": state.boats_remaining,
        "hit_cells": hit_cells,
        "won": sim.client.status() == GameStatus::Won,
        "sunk_reports": replies.iter().filter(|r| **r == RelayAction::Sunk).count(),
        "controller_replies": replies,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
