//! Console Bot Example
//!
//! Drives a Herald bot from the terminal: every line typed on stdin becomes
//! an inbound message, and everything the bot sends is printed back.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package console-bot -- --user alice --guild g1 --owner
//! ```
//!
//! Then type `!ping`, `!roll 20 --count 3`, `!daily` (twice), `!daily -h`
//! or `!reload util`.

use std::path::PathBuf;
use std::sync::{Arc, Weak};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use futures::Stream;
use herald::core::{ApiResult, StaticConfigStore};
use herald::framework::{LoadError, SourceRef};
use herald::prelude::*;
use herald::runtime::ConfigLoader;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(about = "Talk to a Herald bot from the terminal")]
struct Cli {
    /// User id (and name) to send messages as.
    #[arg(short, long, default_value = "console-user")]
    user: String,

    /// Send messages inside this guild instead of a direct channel.
    #[arg(short, long)]
    guild: Option<String>,

    /// Own the guild and count as a developer.
    #[arg(long)]
    owner: bool,

    /// Configuration file to load instead of searching for `herald.toml`.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

// ============================================================================
// Console client
// ============================================================================

struct ConsoleClient {
    user: String,
    owner: bool,
}

#[async_trait]
impl ChatClient for ConsoleClient {
    fn bot_id(&self) -> &str {
        "console-bot"
    }

    async fn bot_permissions(&self, _channel_id: &str) -> ApiResult<PermissionSet> {
        Ok(PermissionSet::administrator())
    }

    async fn user_permissions(&self, _channel_id: &str, user_id: &str) -> ApiResult<PermissionSet> {
        if self.owner && user_id == self.user {
            Ok(PermissionSet::administrator())
        } else {
            Ok(PermissionSet::default())
        }
    }

    async fn fetch_user(&self, user_id: &str) -> ApiResult<Option<User>> {
        Ok((user_id == self.user).then(|| User::new(user_id, user_id)))
    }

    async fn fetch_guild(&self, guild_id: &str) -> ApiResult<Option<Guild>> {
        let owner_id = if self.owner {
            self.user.clone()
        } else {
            "someone-else".to_owned()
        };
        Ok(Some(Guild {
            id: guild_id.to_owned(),
            name: "Console Guild".to_owned(),
            owner_id,
        }))
    }

    async fn send_typing(&self, channel_id: &str) -> ApiResult<()> {
        println!("[#{channel_id}] bot is typing...");
        Ok(())
    }

    async fn send_message(&self, channel_id: &str, content: &str) -> ApiResult<String> {
        for line in content.lines() {
            println!("[#{channel_id}] bot> {line}");
        }
        Ok(String::new())
    }
}

fn stdin_messages(author: User, channel: Channel) -> impl Stream<Item = IncomingMessage> + Send {
    let lines = BufReader::new(tokio::io::stdin()).lines();
    futures::stream::unfold((lines, 0u64), move |(mut lines, seq)| {
        let author = author.clone();
        let channel = channel.clone();
        async move {
            match lines.next_line().await {
                Ok(Some(content)) => {
                    let message = IncomingMessage {
                        id: seq.to_string(),
                        channel,
                        author,
                        content,
                    };
                    Some((message, (lines, seq + 1)))
                }
                Ok(None) => None,
                Err(e) => {
                    error!("Failed to read stdin: {e}");
                    None
                }
            }
        }
    })
}

// ============================================================================
// Commands
// ============================================================================

#[derive(Parser, Debug)]
struct RollArgs {
    /// Number of sides.
    sides: u32,
    #[arg(short, long, default_value_t = 1)]
    count: u32,
}

/// Adapts a category builder to a [`ModuleLoader`] factory.
fn factory(
    source: &'static str,
    build: fn() -> Result<Category, HandlerError>,
) -> impl Fn() -> Result<Category, LoadError> + Send + Sync + 'static {
    move || {
        build().map_err(|e| LoadError::Failed {
            origin: SourceRef::from(source),
            reason: e.to_string(),
        })
    }
}

fn util_category() -> Result<Category, HandlerError> {
    Ok(Category::new("util", "commands/util.rs")
        .command(
            Command::new(["ping", "p"])?
                .description("Checks that the bot is alive")
                .executor(|inv, _| async move {
                    inv.reply("Pong!").await?;
                    Ok(())
                }),
        )
        .command(
            Command::new(["echo", "say"])?
                .usage("<text>")
                .description("Repeats the text back")
                .executor(|inv, _| async move {
                    if inv.args().is_empty() {
                        return Err(CommandError::from(UsageError::missing_argument("text")));
                    }
                    inv.reply(&inv.args().join(" ")).await?;
                    Ok(())
                }),
        )
        .command(
            Command::new(["roll"])?
                .usage("<sides> [--count N]")
                .description("Rolls dice")
                .executor(|inv, _| async move {
                    let args: RollArgs = parse_args(&inv)?;
                    let sides = args.sides.max(1);
                    let seed = inv.message().content.len() as u32;
                    let rolls: Vec<String> = (0..args.count)
                        .map(|i| ((seed + i * 7) % sides + 1).to_string())
                        .collect();
                    inv.reply(&format!("🎲 {}", rolls.join(", "))).await?;
                    Ok(())
                }),
        ))
}

fn economy_category() -> Result<Category, HandlerError> {
    Ok(Category::new("economy", "commands/economy.rs").command(
        Command::new(["daily"])?
            .description("Claims the daily reward")
            .cooldown(Duration::from_secs(20), false)
            .donator_cooldown(Duration::from_secs(10))
            .executor(|inv, _| async move {
                let amount = if inv.user_profile().donator { 200 } else { 100 };
                inv.reply(&format!("You claimed {amount} coins.")).await?;
                Ok(())
            }),
    ))
}

fn admin_category(runtime: Weak<HeraldRuntime>) -> Result<Category, HandlerError> {
    let reload_runtime = runtime.clone();
    Ok(Category::new("admin", "commands/admin.rs")
        .command(
            Command::new(["reload"])?
                .usage("<category>")
                .restrictions(vec![Restriction::Developer])
                .executor(move |inv, _| {
                    let runtime = reload_runtime.clone();
                    async move {
                        let Some(name) = inv.args().first() else {
                            return Err(CommandError::from(UsageError::missing_argument(
                                "category",
                            )));
                        };
                        let runtime = runtime
                            .upgrade()
                            .ok_or_else(|| CommandError::failed("runtime is shutting down"))?;
                        runtime
                            .handler()
                            .reload_category(name.as_str())
                            .map_err(|e| CommandError::failed(e.to_string()))?;
                        inv.reply(&format!("Reloaded `{name}`.")).await?;
                        Ok(())
                    }
                }),
        )
        .command(
            Command::new(["think"])?
                .description("Thinks very hard")
                .executor(move |inv, _| {
                    let runtime = runtime.clone();
                    async move {
                        if let Some(runtime) = runtime.upgrade() {
                            runtime.typing().start(inv.channel_id(), 2);
                        }
                        tokio::time::sleep(Duration::from_secs(8)).await;
                        if let Some(runtime) = runtime.upgrade() {
                            runtime.typing().stop(inv.channel_id());
                        }
                        inv.reply("42").await?;
                        Ok(())
                    }
                }),
        )
        .command(
            Command::new(["purge"])?
                .user_permissions(vec![Permission::ManageMessages])
                .restrictions(vec![Restriction::GuildOwner])
                .set_override(Restriction::GuildOwner, |ctx: HookContext| async move {
                    ctx.invocation
                        .reply("Only the owner of this server may purge messages.")
                        .await?;
                    Ok(HookOutcome::Handled)
                })
                .executor(|inv, _| async move {
                    inv.reply("Purged 0 messages.").await?;
                    Ok(())
                }),
        ))
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.file(path);
    }
    let mut config = loader.load()?;
    if cli.owner {
        config.bot.developers.push(cli.user.clone());
    }

    let client: BoxedClient = Arc::new(ConsoleClient {
        user: cli.user.clone(),
        owner: cli.owner,
    });

    let modules = ModuleLoader::new()
        .with("commands/util.rs", factory("commands/util.rs", util_category))
        .with("commands/economy.rs", factory("commands/economy.rs", economy_category));

    let store = StaticConfigStore::new(config.defaults.user.clone(), config.defaults.guild.clone());
    let runtime = Arc::new(
        HeraldRuntime::builder(Arc::clone(&client))
            .config(config)
            .store(Arc::new(store))
            .loader(Arc::new(modules))
            .init_logging(true)
            .build()?,
    );

    let handler = runtime.handler();
    handler.load_category("commands/util.rs")?;
    handler.load_category("commands/economy.rs")?;
    handler.add_category(admin_category(Arc::downgrade(&runtime))?)?;

    info!(triggers = ?handler.triggers(), "Commands registered");

    let channel = match &cli.guild {
        Some(guild) => Channel::in_guild("console", guild.as_str()),
        None => Channel::direct("console"),
    };
    let author = User::new(cli.user.as_str(), cli.user.as_str());

    println!("Type commands with prefix `{}`, Ctrl+D to quit.", runtime.config().bot.prefix);
    Arc::clone(&runtime).run(stdin_messages(author, channel)).await?;

    Ok(())
}
