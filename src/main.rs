#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use fleetlink::{
    init_logging, key_to_action, print_game,
    relay::{AttachPolicy, ClientId, RelayEvent, RelaySession},
    transport::{
        in_memory::{InMemoryChannel, InMemoryLink},
        line::{maintain_link, DetachedLink},
        websocket::{router, ChannelState},
    },
    ControllerAction, GameClient, GameStatus, RelayConfig, DEBOUNCE_WINDOW, DEFAULT_CLIENT_ORIGIN,
    DEFAULT_FLEET_SIZE, DEFAULT_LISTEN, PROTOCOL_VERSION,
};

#[cfg(feature = "std")]
use clap::Parser;
#[cfg(feature = "std")]
use log::{error, info};
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;
#[cfg(feature = "std")]
use tokio::io::{AsyncBufReadExt, BufReader};
#[cfg(feature = "std")]
use tokio::net::TcpListener;
#[cfg(feature = "std")]
use tokio::sync::mpsc;
#[cfg(feature = "std")]
use tokio::time::Instant;

/// Pending relay events before readers start waiting.
#[cfg(feature = "std")]
const EVENT_QUEUE: usize = 64;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Bridge a hardware controller to a browser client.
    Relay {
        #[arg(long, help = "Controller link: device path or tcp://host:port")]
        link: String,
        #[arg(long, default_value = DEFAULT_LISTEN)]
        listen: String,
        #[arg(long, default_value = DEFAULT_CLIENT_ORIGIN, help = "Allowed client origin, '*' for any")]
        origin: String,
        #[arg(long, value_enum, default_value_t = AttachPolicy::Replace)]
        policy: AttachPolicy,
    },
    /// Play in the terminal, with the keyboard standing in for the controller.
    Local {
        #[arg(long, default_value_t = DEFAULT_FLEET_SIZE)]
        fleet_size: usize,
        #[arg(long, help = "Fix RNG seed for reproducible fleets (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Relay {
            link,
            listen,
            origin,
            policy,
        } => {
            let config = RelayConfig::from_args(&link, &listen, Some(&origin), policy)
                .map_err(|e| anyhow::anyhow!(e))?;
            run_relay(config).await?;
        }
        Commands::Local { fleet_size, seed } => {
            if let Some(s) = seed {
                println!("Using fixed seed: {} (fleet will be reproducible)", s);
            }
            let rng = if let Some(s) = seed {
                SmallRng::seed_from_u64(s)
            } else {
                let mut seed_rng = rand::rng();
                SmallRng::from_rng(&mut seed_rng)
            };
            let client = GameClient::new(fleet_size, rng).map_err(|e| anyhow::anyhow!(e))?;
            run_local(client).await?;
        }
    }
    Ok(())
}

#[cfg(feature = "std")]
async fn run_relay(config: RelayConfig) -> anyhow::Result<()> {
    info!("Starting relay (protocol v{})", PROTOCOL_VERSION);
    let (events_tx, events_rx) = mpsc::channel(EVENT_QUEUE);

    // Writes fail until the first open succeeds.
    let link = Box::new(DetachedLink::new(&config.link));
    let session = RelaySession::new(link, config.debounce, config.attach_policy);
    let session_handle = tokio::spawn(session.run(events_rx));
    let link_handle = tokio::spawn(maintain_link(
        config.link.clone(),
        events_tx.clone(),
        config.link_retry,
    ));

    let app = router(ChannelState::new(events_tx, config.allowed_origin.clone()));
    let listener = TcpListener::bind(config.listen).await?;
    info!("Client channel on ws://{}/ws", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    link_handle.abort();
    session_handle.abort();
    info!("Relay shutdown complete");
    Ok(())
}

/// Local play: stdin keys are fed to a relay session as controller lines,
/// and the client runs in-process behind an in-memory channel.
#[cfg(feature = "std")]
async fn run_local(mut client: GameClient<SmallRng>) -> anyhow::Result<()> {
    const LOCAL_CLIENT: ClientId = 1;

    let (link, mut controller_rx) = InMemoryLink::new();
    let (channel, mut channel_rx) = InMemoryChannel::new();
    let mut session = RelaySession::new(Box::new(link), DEBOUNCE_WINDOW, AttachPolicy::Replace);

    session
        .handle(RelayEvent::LinkLine(ControllerAction::Ready.to_string()), Instant::now())
        .await;
    session
        .handle(
            RelayEvent::ClientAttached {
                id: LOCAL_CLIENT,
                channel: Box::new(channel),
            },
            Instant::now(),
        )
        .await;

    println!("Keys: w/a/s/d move, f fire, r reset, q quit. One key per line.");
    print_game(&client, session.is_client_attached());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "q" {
            break;
        }
        for key in line.chars() {
            let Some(action) = key_to_action(key) else {
                continue;
            };
            session
                .handle(RelayEvent::LinkLine(action.to_string()), Instant::now())
                .await;
            while let Ok(game_action) = channel_rx.try_recv() {
                let reported = client
                    .handle_action(game_action)
                    .map_err(|e| anyhow::anyhow!(e))?;
                if let Some(event) = reported {
                    session
                        .handle(
                            RelayEvent::ClientEvent {
                                id: LOCAL_CLIENT,
                                event,
                            },
                            Instant::now(),
                        )
                        .await;
                }
            }
        }
        while let Ok(reply) = controller_rx.try_recv() {
            println!("controller <- {:?} ({})", reply, reply.code());
        }
        print_game(&client, session.is_client_attached());
        if client.status() == GameStatus::Won {
            println!("Press r to play again, q to quit.");
        }
    }
    Ok(())
}

/// Graceful shutdown signal handler
#[cfg(feature = "std")]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        }
    }
}
