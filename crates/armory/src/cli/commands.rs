//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs a tracing subscriber
//! - Owns the async runtime
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Context Setup**: Resolve the data directory and configuration via [`initialize`]
//! 3. **Dispatch**: Route each command to the API facade on a current-thread runtime
//! 4. **Output Formatting**: Hand results to `render`
//! 5. **Error Handling**: User warnings print and succeed; everything else bubbles to `main`

use super::render::{print_context, print_effects, print_messages};
use super::setup::{parse_cli, Commands};
use anyhow::{Context, Result};
use armoryapp::commands::{CmdMessage, CmdResult};
use armoryapp::error::ArmoryError;
use armoryapp::init::{initialize, ArmoryContext};
use armoryapp::model::{ActorRef, ItemRef};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive, e.g. `armoryapp=debug`.
pub const LOG_ENV: &str = "ARMORY_LOG";

pub fn run() -> Result<()> {
    let cli = parse_cli();
    init_tracing(cli.verbose);

    let ctx = initialize(cli.data.as_ref().map(PathBuf::from))?;
    debug!(data_dir = %ctx.data_dir.display(), "using world");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(dispatch(&ctx, cli.command))
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn dispatch(ctx: &ArmoryContext, command: Commands) -> Result<()> {
    let api = &ctx.api;

    match command {
        Commands::Attach { carrier, item } => {
            let mut target = api.carrier(&ItemRef::from(carrier)).await?;
            let item = ItemRef::from(item);
            let outcome = api.attach(&mut *target, &item).await;
            if let Ok(result) = &outcome {
                if !result.unresolved.is_empty() {
                    print_messages(&[CmdMessage::warning(format!(
                        "{} not found; nothing attached.",
                        item
                    ))]);
                }
            }
            report(outcome)
        }
        Commands::Detach { carrier, item } => {
            let mut target = api.carrier(&ItemRef::from(carrier)).await?;
            report(api.detach(&mut *target, &ItemRef::from(item)).await)
        }
        Commands::Equip { carrier } => {
            let mut target = api.carrier(&ItemRef::from(carrier)).await?;
            report(api.set_equipped(&mut *target, true).await)
        }
        Commands::Unequip { carrier } => {
            let mut target = api.carrier(&ItemRef::from(carrier)).await?;
            report(api.set_equipped(&mut *target, false).await)
        }
        Commands::List { carrier, json } => {
            let reference = ItemRef::from(carrier);
            let target = api.carrier(&reference).await?;
            let entries = api.build_attachment_context(&*target).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print_context(&reference, &entries);
            }
            Ok(())
        }
        Commands::Effects { actor, json } => {
            let actor = ActorRef::from(actor);
            let effects = api.effects(&actor).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&effects)?);
            } else {
                print_effects(&actor, &effects, api.tags());
            }
            Ok(())
        }
        Commands::Doctor { carrier } => {
            let target = api.carrier(&ItemRef::from(carrier)).await?;
            report(api.doctor(&*target).await)
        }
    }
}

/// Print a command's messages. User warnings are printed and treated as success.
fn report(outcome: std::result::Result<CmdResult, ArmoryError>) -> Result<()> {
    match outcome {
        Ok(result) => {
            print_messages(&result.messages);
            Ok(())
        }
        Err(err) if err.is_user_warning() => {
            print_messages(&[CmdMessage::warning(err.to_string())]);
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
