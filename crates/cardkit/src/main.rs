use cardkit::StateSnapshot;
use cardkit::protocol::{Notification, Request, SOCKET_PATH};
use clap::{Parser, Subcommand};
use std::io::{BufRead, BufReader, Read, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "cardctl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Show the card window
    Show,
    /// Hide the card window
    Hide,
    /// Send a state snapshot (entity id -> {state, attributes}) to the card
    Push {
        /// JSON file to read, or `-` for stdin
        file: PathBuf,
    },
    /// Print every service call the card makes, one JSON object per line
    Watch,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Show => send(&Request::Show),
        Commands::Hide => send(&Request::Hide),
        Commands::Push { file } => {
            let states = read_snapshot(&file)?;
            log::info!("Pushing state for {} entities", states.len());
            send(&Request::State { states })
        }
        Commands::Watch => watch(),
    }
}

fn read_snapshot(file: &Path) -> anyhow::Result<StateSnapshot> {
    let text = if file.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        text
    } else {
        fs_err::read_to_string(file)?
    };

    serde_json::from_str(&text)
        .map_err(|e| anyhow::anyhow!("Invalid state snapshot in {}: {}", file.display(), e))
}

fn connect() -> anyhow::Result<UnixStream> {
    UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to aircard daemon at {}: {}. Is aircard running?",
            SOCKET_PATH,
            e
        )
    })
}

fn send(request: &Request) -> anyhow::Result<()> {
    let mut stream = connect()?;
    writeln!(stream, "{}", request.to_line()?)?;
    Ok(())
}

fn watch() -> anyhow::Result<()> {
    let mut stream = connect()?;
    writeln!(stream, "{}", Request::Subscribe.to_line()?)?;

    for line in BufReader::new(stream).lines() {
        let line = line?;
        match Notification::parse(&line) {
            Ok(Notification::CallService(call)) => {
                println!("{}", serde_json::to_string(&call)?);
            }
            Err(e) => log::warn!("Skipping unexpected message: {}", e),
        }
    }
    Ok(())
}
