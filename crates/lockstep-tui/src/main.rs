//! Lockstep terminal game.
//!
//! # Usage
//!
//! ```bash
//! # Two pads on one keyboard
//! lockstep-tui
//!
//! # Two hosts
//! lockstep-tui --role master --name Ada --opponent Grace --peer 192.168.1.20:7400
//! lockstep-tui --role slave --name Grace --opponent Ada --peer 192.168.1.10:7400
//! ```

use std::{fs::File, net::SocketAddr, path::PathBuf, sync::Mutex};

use clap::{Parser, ValueEnum};
use lockstep_app::NullTransport;
use lockstep_core::{Participation, Role};
use lockstep_tui::{
    Exit, Runtime, RuntimeConfig, StandaloneService, TerminalDriver, UdpConfig, UdpTransport,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoleArg {
    /// Both pads on this keyboard
    Local,
    /// Calls the peer and owns session changes
    Master,
    /// Answers the master
    Slave,
}

/// Lockstep two-player terminal game
#[derive(Parser, Debug)]
#[command(name = "lockstep-tui")]
#[command(about = "Two-player lockstep game over a terminal and UDP")]
#[command(version)]
struct Args {
    /// Which side of the link this host plays
    #[arg(short, long, value_enum, default_value = "local")]
    role: RoleArg,

    /// Local UDP address
    #[arg(short, long, default_value = "0.0.0.0:7400")]
    bind: SocketAddr,

    /// Peer UDP address, required for networked roles
    #[arg(short, long)]
    peer: Option<SocketAddr>,

    /// Local player name
    #[arg(short, long, default_value = "Player")]
    name: String,

    /// Remote player name, shown on the scoreboard and when they leave
    #[arg(short, long)]
    opponent: Option<String>,

    /// Log file; the terminal belongs to the game
    #[arg(long, default_value = "lockstep.log")]
    log_file: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log = File::create(&args.log_file)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(log)))
        .with(filter)
        .init();

    let participation = match args.role {
        RoleArg::Local => Participation::Local,
        RoleArg::Master => Participation::Networked { role: Role::Master },
        RoleArg::Slave => Participation::Networked { role: Role::Slave },
    };
    let mut service = StandaloneService::new(participation, &args.name);
    if let Some(opponent) = &args.opponent {
        service = service.with_remote_name(opponent);
    }
    let config = RuntimeConfig::default();

    let exit = match participation {
        Participation::Local => {
            tracing::info!(name = %args.name, "starting local game");
            let driver = TerminalDriver::new()?;
            Runtime::new(driver, NullTransport, service, config).run().await?
        },
        Participation::Networked { role } => {
            let Some(peer) = args.peer else {
                return Err("--peer is required for master and slave".into());
            };
            let transport = UdpTransport::bind(args.bind, peer, role, UdpConfig::default()).await?;
            tracing::info!(
                role = role.name(),
                local = %transport.local_addr()?,
                %peer,
                "starting networked game"
            );
            let driver = TerminalDriver::new()?;
            Runtime::new(driver, transport, service, config).run().await?
        },
    };

    tracing::info!(?exit, "game finished");
    farewell(exit);
    Ok(())
}

/// Printed once the terminal is restored.
#[allow(clippy::print_stdout)]
fn farewell(exit: Exit) {
    match exit {
        Exit::Fatal(kind) => println!("Stopped: error code {} ({kind})", kind.code()),
        Exit::LocalDeclined => println!("Thanks for playing."),
        Exit::RemoteDeclined => println!("Your opponent left. Thanks for playing."),
        Exit::ReturnedToHost => println!("Bye."),
    }
}
