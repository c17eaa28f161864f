//! LINE Developer CLI Library
//!
//! This library backs the `linecli` binary, a command-line client for the
//! LINE platform developer APIs: channel access-token lifecycle, LINE Things
//! trial/device/scenario management and LINE TV content browsing.
//!
//! # Modules
//!
//! - `cli` - One async function per subcommand plus the shared pagination flow
//! - `config` - Environment based configuration and credential validation
//! - `line` - HTTP client for the LINE APIs and the request traits it implements
//! - `management` - Local persistence of issued access tokens
//! - `prompt` - Interactive questions asked on the terminal
//! - `render` - Table, JSON and status output
//! - `types` - Wire types of the LINE APIs and render rows
//! - `utils` - Input validators and display helpers
//!
//! # Example
//!
//! ```
//! use linecli::{config, line::LineClient};
//!
//! #[tokio::main]
//! async fn main() -> linecli::Res<()> {
//!     config::load_env().await?;
//!     let config = config::Config::load().await;
//!     let client = LineClient::new(&config)?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod line;
pub mod management;
pub mod prompt;
pub mod render;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used at the outer command boundary where any unexpected error is printed
/// once and mapped to a non-zero exit code. Operations themselves report
/// failures as `false` and never bubble errors up to here.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Fetching categories for {}", country);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Access token saved");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark to standard error.
///
/// Unlike a panic this does not terminate the program: operations log the
/// error and return `false`, and the dispatcher in `main` decides the exit
/// code.
///
/// # Example
///
/// ```
/// error!("{}", api_error);
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for configuration problems and "not found" results that the user
/// should notice but that don't abort the program.
///
/// # Example
///
/// ```
/// warning!("Category list not found");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
