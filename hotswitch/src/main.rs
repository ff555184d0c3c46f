mod app;
mod core;
mod effect;
mod event_emitter;
mod ipc;
mod macos;
mod pid;
mod platform;

use anyhow::{anyhow, Result};
use argh::FromArgs;
use hotswitch_ipc::{Command, ModifierKey, Response};
use ipc::IpcClient;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// HotSwitch - keyboard-driven macOS application switcher
#[derive(FromArgs)]
struct Cli {
    #[argh(subcommand)]
    command: Option<SubCommand>,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum SubCommand {
    Start(StartCmd),
    Version(VersionCmd),
    Pin(PinCmd),
    Unpin(UnpinCmd),
    TogglePin(TogglePinCmd),
    MovePin(MovePinCmd),
    SetPinned(SetPinnedCmd),
    ListPinned(ListPinnedCmd),
    ListApps(ListAppsCmd),
    SetModifier(SetModifierCmd),
    GetState(GetStateCmd),
    SwitchTo(SwitchToCmd),
    Cancel(CancelCmd),
    Subscribe(SubscribeCmd),
    Quit(QuitCmd),
}

/// Start the hotswitch daemon
#[derive(FromArgs)]
#[argh(subcommand, name = "start")]
struct StartCmd {}

/// Show version information
#[derive(FromArgs)]
#[argh(subcommand, name = "version")]
struct VersionCmd {}

/// Pin an app so it always leads the switcher
#[derive(FromArgs)]
#[argh(subcommand, name = "pin")]
struct PinCmd {
    /// bundle identifier (e.g., com.apple.Safari)
    #[argh(positional)]
    app_id: String,
}

/// Remove an app from the pinned list
#[derive(FromArgs)]
#[argh(subcommand, name = "unpin")]
struct UnpinCmd {
    /// bundle identifier
    #[argh(positional)]
    app_id: String,
}

/// Pin an app, or unpin it if already pinned
#[derive(FromArgs)]
#[argh(subcommand, name = "toggle-pin")]
struct TogglePinCmd {
    /// bundle identifier
    #[argh(positional)]
    app_id: String,
}

/// Move a pinned app to a position in the pinned list
#[derive(FromArgs)]
#[argh(subcommand, name = "move-pin")]
struct MovePinCmd {
    /// bundle identifier
    #[argh(positional)]
    app_id: String,
    /// zero-based target position
    #[argh(positional)]
    index: usize,
}

/// Replace the whole pinned list
#[derive(FromArgs)]
#[argh(subcommand, name = "set-pinned")]
struct SetPinnedCmd {
    /// bundle identifiers in switcher order
    #[argh(positional, greedy)]
    app_ids: Vec<String>,
}

/// List pinned apps in order
#[derive(FromArgs)]
#[argh(subcommand, name = "list-pinned")]
struct ListPinnedCmd {}

/// List running apps in switcher order
#[derive(FromArgs)]
#[argh(subcommand, name = "list-apps")]
struct ListAppsCmd {}

/// Choose the modifier held with Tab
#[derive(FromArgs)]
#[argh(subcommand, name = "set-modifier")]
struct SetModifierCmd {
    /// modifier: option or command
    #[argh(positional)]
    modifier: String,
}

/// Show the daemon state
#[derive(FromArgs)]
#[argh(subcommand, name = "get-state")]
struct GetStateCmd {}

/// Activate a running app directly
#[derive(FromArgs)]
#[argh(subcommand, name = "switch-to")]
struct SwitchToCmd {
    /// bundle identifier
    #[argh(positional)]
    app_id: String,
}

/// Dismiss the switcher without switching
#[derive(FromArgs)]
#[argh(subcommand, name = "cancel")]
struct CancelCmd {}

/// Print session events as JSON lines
#[derive(FromArgs)]
#[argh(subcommand, name = "subscribe")]
struct SubscribeCmd {
    /// send the current session first
    #[argh(switch)]
    snapshot: bool,
}

/// Quit the hotswitch daemon
#[derive(FromArgs)]
#[argh(subcommand, name = "quit")]
struct QuitCmd {}

fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    match cli.command {
        None => {
            // No subcommand - show help (simulate --help)
            let args: Vec<&str> = vec!["hotswitch", "--help"];
            if let Err(e) = Cli::from_args(&args[..1], &args[1..]) {
                println!("{}", e.output);
            }
            Ok(())
        }
        Some(SubCommand::Start(_)) => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .init();

            tracing::info!("hotswitch {} starting", VERSION);
            app::App::run()
        }
        Some(SubCommand::Version(_)) => {
            println!("hotswitch {}", VERSION);
            Ok(())
        }
        Some(SubCommand::Subscribe(cmd)) => ipc::subscribe_and_print(cmd.snapshot),
        Some(subcmd) => run_cli(subcmd),
    }
}

fn run_cli(subcmd: SubCommand) -> Result<()> {
    let cmd = to_command(subcmd)?;
    let mut client = IpcClient::connect()?;
    let response = client.send(&cmd)?;

    match response {
        Response::Ok => {}
        Response::Error { message } => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
        Response::Pinned { app_ids } => {
            for app_id in app_ids {
                println!("{}", app_id);
            }
        }
        Response::Apps { apps } => {
            for app in apps {
                println!(
                    "{} - {} [pid={}]{}",
                    app.app_id,
                    app.name,
                    app.pid,
                    if app.is_pinned { " (pinned)" } else { "" }
                );
            }
        }
        Response::State { state } => {
            println!("Shortcut: {} ({})", state.shortcut, state.modifier.display_name());
            println!("Session open: {}", state.session_open);
            if let Some(index) = state.selected_index {
                println!(
                    "Selected: {} of {}",
                    index + 1,
                    state.candidate_count
                );
            }
            println!("Pinned apps: {}", state.pinned_count);
            println!("Running apps: {}", state.running_count);
        }
    }

    Ok(())
}

fn to_command(subcmd: SubCommand) -> Result<Command> {
    match subcmd {
        SubCommand::Start(_) | SubCommand::Version(_) | SubCommand::Subscribe(_) => {
            unreachable!("handled in main")
        }
        SubCommand::Pin(cmd) => Ok(Command::Pin { app_id: cmd.app_id }),
        SubCommand::Unpin(cmd) => Ok(Command::Unpin { app_id: cmd.app_id }),
        SubCommand::TogglePin(cmd) => Ok(Command::TogglePin { app_id: cmd.app_id }),
        SubCommand::MovePin(cmd) => Ok(Command::MovePin {
            app_id: cmd.app_id,
            index: cmd.index,
        }),
        SubCommand::SetPinned(cmd) => Ok(Command::SetPinned {
            app_ids: cmd.app_ids,
        }),
        SubCommand::ListPinned(_) => Ok(Command::ListPinned),
        SubCommand::ListApps(_) => Ok(Command::ListApps),
        SubCommand::SetModifier(cmd) => Ok(Command::SetModifier {
            modifier: cmd.modifier.parse::<ModifierKey>().map_err(|e| anyhow!(e))?,
        }),
        SubCommand::GetState(_) => Ok(Command::GetState),
        SubCommand::SwitchTo(cmd) => Ok(Command::SwitchTo { app_id: cmd.app_id }),
        SubCommand::Cancel(_) => Ok(Command::CancelSession),
        SubCommand::Quit(_) => Ok(Command::Quit),
    }
}
