use std::process::ExitCode;

use clap::{
    Args, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use linecli::{
    Res,
    cli::{self, Console, ListOptions, TokenAction},
    config::{self, Config},
    error,
    line::LineClient,
    management::TokenStore,
    prompt::TerminalPrompter,
    render::{Format, TerminalRenderer},
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Channel credentials and access token
    Line(LineOptions),

    /// LINE Things trial products, devices and scenario sets
    Things(ThingsOptions),

    /// LINE TV categories, modules and spotlight
    Linetv(TvOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

/// Output flags shared by every list and lookup operation.
#[derive(Args, Debug, Clone, Copy)]
pub struct OutputArgs {
    /// Output format
    #[clap(long, value_enum, default_value_t = Format::Table, global = true)]
    pub format: Format,

    /// Page of a whole-list result to display, 10 rows per page
    #[clap(long, value_parser = clap::value_parser!(u32).range(1..), global = true)]
    pub page: Option<u32>,
}

impl From<OutputArgs> for ListOptions {
    fn from(args: OutputArgs) -> Self {
        ListOptions {
            format: args.format,
            page: args.page,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct LineOptions {
    #[command(subcommand)]
    pub command: LineSubcommand,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Subcommand, Debug, Clone)]
pub enum LineSubcommand {
    /// Save channel ID and channel secret
    Init,

    /// Issue, revoke or verify the channel access token
    Token(TokenOptions),
}

#[derive(Parser, Debug, Clone)]
#[group(required = false, multiple = false)]
pub struct TokenOptions {
    /// Issue a channel access token and save it
    #[clap(long)]
    pub issue: bool,

    /// Revoke the saved channel access token
    #[clap(long)]
    pub revoke: bool,

    /// Verify the saved channel access token
    #[clap(long)]
    pub verify: bool,
}

impl TokenOptions {
    fn action(&self) -> Option<TokenAction> {
        if self.issue {
            Some(TokenAction::Issue)
        } else if self.revoke {
            Some(TokenAction::Revoke)
        } else if self.verify {
            Some(TokenAction::Verify)
        } else {
            None
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct ThingsOptions {
    #[command(subcommand)]
    pub command: ThingsSubcommand,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ThingsSubcommand {
    /// List trial products
    #[command(name = "list:trial")]
    ListTrial,

    /// Create a trial product
    #[command(name = "add:trial")]
    AddTrial,

    /// Remove a trial product
    #[command(name = "remove:trial")]
    RemoveTrial,

    /// Get a device of a trial product by device ID
    #[command(name = "get:device")]
    GetDevice,

    /// Get the devices a user linked to a trial product
    #[command(name = "get:devices")]
    GetDevices,

    /// Get the product a device belongs to
    #[command(name = "get:product")]
    GetProduct,

    /// Register a scenario set from a JSON file
    #[command(name = "register:scenario-set")]
    RegisterScenarioSet,

    /// Get the scenario set of a trial product
    #[command(name = "get:scenario-set")]
    GetScenarioSet,

    /// Remove the scenario set of a trial product
    #[command(name = "remove:scenario-set")]
    RemoveScenarioSet,
}

#[derive(Parser, Debug, Clone)]
pub struct TvOptions {
    #[command(subcommand)]
    pub command: TvSubcommand,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TvSubcommand {
    /// List modules of a country, page by page
    #[command(name = "list:modules")]
    ListModules,

    /// Get spotlight clips of a country
    #[command(name = "get:spotlight")]
    GetSpotlight,

    /// List categories of a country
    #[command(name = "list:category")]
    ListCategory,

    /// Browse the home data of a category, page by page
    #[command(name = "get:category")]
    GetCategory,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Dispatches one operation. `Ok(false)` is an operation that already
/// reported its own failure.
async fn run(cli: Cli) -> Res<bool> {
    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(true);
    }

    config::load_env()
        .await
        .map_err(|e| format!("Cannot load environment. Err: {}", e))?;

    let config = Config::load().await;
    let client = LineClient::new(&config)?;

    let mut prompter = TerminalPrompter::stdio();
    let mut renderer = TerminalRenderer;
    let mut console = Console::new(&mut prompter, &mut renderer);

    let ok = match cli.command {
        Command::Line(opt) => match opt.command {
            LineSubcommand::Init => cli::init(&config::env_path(), &mut console).await,
            LineSubcommand::Token(token) => {
                cli::token(
                    token.action(),
                    opt.output.into(),
                    &config,
                    &client,
                    TokenStore::token_path(),
                    &mut console,
                )
                .await
            }
        },

        Command::Things(opt) => {
            let options: ListOptions = opt.output.into();
            match opt.command {
                ThingsSubcommand::ListTrial => {
                    cli::list_trial(options, &config, &client, &mut console).await
                }
                ThingsSubcommand::AddTrial => {
                    cli::add_trial(options, &config, &client, &mut console).await
                }
                ThingsSubcommand::RemoveTrial => {
                    cli::remove_trial(&config, &client, &mut console).await
                }
                ThingsSubcommand::GetDevice => {
                    cli::get_device(options, &config, &client, &mut console).await
                }
                ThingsSubcommand::GetDevices => {
                    cli::get_devices(options, &config, &client, &mut console).await
                }
                ThingsSubcommand::GetProduct => {
                    cli::get_product(options, &config, &client, &mut console).await
                }
                ThingsSubcommand::RegisterScenarioSet => {
                    cli::register_scenario_set(&config, &client, &mut console).await
                }
                ThingsSubcommand::GetScenarioSet => {
                    cli::get_scenario_set(options, &config, &client, &mut console).await
                }
                ThingsSubcommand::RemoveScenarioSet => {
                    cli::remove_scenario_set(&config, &client, &mut console).await
                }
            }
        }

        Command::Linetv(opt) => {
            let options: ListOptions = opt.output.into();
            match opt.command {
                TvSubcommand::ListModules => {
                    cli::list_modules(options, &config, &client, &mut console).await
                }
                TvSubcommand::GetSpotlight => {
                    cli::get_spotlight(options, &config, &client, &mut console).await
                }
                TvSubcommand::ListCategory => {
                    cli::list_category(options, &config, &client, &mut console).await
                }
                TvSubcommand::GetCategory => {
                    cli::get_category(options, &config, &client, &mut console).await
                }
            }
        }

        Command::Completions(_) => true,
    };

    Ok(ok)
}
