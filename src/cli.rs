use crate::config::Config;
use crate::notifier::{DEFAULT_HEADER, Notifier, NotifyOptions};
use crate::packaging::{PackagingOutcome, run_packaging};
use crate::publisher::PublishMode;
use crate::slack::SlackClient;
use crate::ui;
use crate::{log_debug, logger};
use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand, crate_version};
use std::path::{Path, PathBuf};

const LOG_FILE: &str = "ci-notifier-debug.log";

/// CLI structure defining the available commands and global arguments
#[derive(Parser, Debug)]
#[command(
    author,
    version = crate_version!(),
    about = "Announce CI builds in Slack with their artifacts and changelog",
    long_about = "Uploads build artifacts to a Slack channel, waits for the upload to show up as a message, and replies in its thread with a changelog of the conventional commits since the last tag.",
    disable_version_flag = true,
    styles = get_styles(),
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log debug messages to a file
    #[arg(
        short = 'l',
        long = "log",
        global = true,
        help = "Log debug messages to a file"
    )]
    pub log: bool,

    /// Specify a custom log file path
    #[arg(
        long = "log-file",
        global = true,
        help = "Specify a custom log file path"
    )]
    pub log_file: Option<String>,

    /// Suppress non-essential output (spinners, progress messages)
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress non-essential output"
    )]
    pub quiet: bool,

    /// Display the version
    #[arg(
        short = 'v',
        long = "version",
        global = true,
        help = "Display the version"
    )]
    pub version: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload artifacts and publish the changelog
    #[command(
        about = "Upload build artifacts and announce the release",
        long_about = "Upload every entry of the artifact directory to the channel in one batch, wait for Slack to share it, then post the changelog since the last matching tag into the upload's thread."
    )]
    Notify {
        /// Slack bot token
        #[arg(long, env = "SLACK_BOT_TOKEN", hide_env_values = true)]
        token: String,

        /// Channel id to upload to and announce in
        #[arg(long)]
        channel: String,

        /// Directory holding the build artifacts
        #[arg(short = 'd', long = "directory")]
        directory: PathBuf,

        /// Glob selecting the tag the changelog starts from
        #[arg(long, help = "Glob selecting the starting tag (e.g. 'v*')")]
        tag: Option<String>,

        /// Header of the announcement
        #[arg(long, default_value = DEFAULT_HEADER)]
        header: String,

        /// Title attached to the upload
        #[arg(long)]
        title: Option<String>,

        /// Reply in the thread or overwrite the thread's message
        #[arg(long, value_enum, default_value_t = PublishMode::Post)]
        mode: PublishMode,

        /// Repository to read history from
        #[arg(long, default_value = ".")]
        repo: PathBuf,

        /// Explicit config file instead of the repository's .cinotifier.toml
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run the configured build and package commands
    #[command(
        about = "Run the packaging steps",
        long_about = "Run the configured build and package commands in order. A failing step is reported but never fails the command."
    )]
    Package {
        /// Directory the steps run in
        #[arg(long, default_value = ".")]
        working_dir: PathBuf,

        /// Explicit config file instead of the working directory's .cinotifier.toml
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Define custom styles for Clap
fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Magenta.on_default().bold())
        .usage(AnsiColor::Cyan.on_default().bold())
        .literal(AnsiColor::Green.on_default().bold())
        .placeholder(AnsiColor::Yellow.on_default())
        .valid(AnsiColor::Blue.on_default().bold())
        .invalid(AnsiColor::Red.on_default().bold())
        .error(AnsiColor::Red.on_default().bold())
}

/// Parse the command-line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

fn load_config(explicit: Option<&Path>, root: &Path) -> anyhow::Result<Config> {
    let config = match explicit {
        Some(path) => Config::load_from(path)?,
        None => Config::load(root)?,
    };
    Ok(config)
}

/// Main function to parse arguments and handle the command
pub async fn main() -> anyhow::Result<()> {
    let cli = parse_args();

    if cli.version {
        ui::print_version(crate_version!());
        return Ok(());
    }

    if cli.log {
        logger::enable_logging();
        let log_file = cli.log_file.as_deref().unwrap_or(LOG_FILE);
        logger::set_log_file(log_file)?;
    }

    if cli.quiet {
        ui::set_quiet_mode(true);
    }

    if let Some(command) = cli.command {
        handle_command(command).await
    } else {
        let _ = Cli::parse_from(["ci-notifier", "--help"]);
        Ok(())
    }
}

pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Notify {
            token,
            channel,
            directory,
            tag,
            header,
            title,
            mode,
            repo,
            config,
        } => {
            log_debug!(
                "Handling 'notify': channel={}, directory={}, tag={:?}, mode={}",
                channel,
                directory.display(),
                tag,
                mode
            );
            let config = load_config(config.as_deref(), &repo)?;
            let options = NotifyOptions {
                channel,
                directory,
                tag,
                header,
                title,
                mode,
                repo_path: repo,
            };
            handle_notify(&token, options, config).await
        }
        Commands::Package {
            working_dir,
            config,
        } => {
            log_debug!("Handling 'package' in {}", working_dir.display());
            let config = load_config(config.as_deref(), &working_dir)?;
            handle_package(&config, &working_dir).await;
            Ok(())
        }
    }
}

async fn handle_notify(token: &str, options: NotifyOptions, config: Config) -> anyhow::Result<()> {
    let client = SlackClient::new(token)?;
    let spinner = ui::create_spinner("Uploading artifacts and waiting for the thread...");
    let notifier = Notifier::new(&client, options, config);
    let result = notifier.run().await;
    spinner.finish_and_clear();

    let report = result?;
    if report.resolution.used_first_commit() {
        ui::print_warning("No tag found; the changelog covers the whole history");
    }
    let since = report
        .resolution
        .resolved_tag
        .as_deref()
        .unwrap_or("the first commit");
    ui::print_success(&format!(
        "Announced {} artifacts in thread {} (changes since {})",
        report.artifact_count, report.message.ts, since
    ));
    Ok(())
}

async fn handle_package(config: &Config, working_dir: &Path) {
    ui::print_info(&format!(
        "Running {} packaging steps in {}",
        config.packaging.steps.len(),
        working_dir.display()
    ));
    match run_packaging(&config.packaging.steps, working_dir).await {
        PackagingOutcome::Completed => ui::print_success("Packaging completed"),
        PackagingOutcome::Failed { command, .. } => {
            ui::print_error(&format!("Packaging step failed: {command}"));
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn notify_parses_all_flags() {
        let cli = Cli::try_parse_from([
            "ci-notifier",
            "notify",
            "--token",
            "xoxb-1",
            "--channel",
            "C1",
            "-d",
            "dist",
            "--tag",
            "v*",
            "--mode",
            "update",
        ])
        .unwrap();
        match cli.command.unwrap() {
            Commands::Notify {
                token,
                channel,
                directory,
                tag,
                header,
                mode,
                repo,
                ..
            } => {
                assert_eq!(token, "xoxb-1");
                assert_eq!(channel, "C1");
                assert_eq!(directory, PathBuf::from("dist"));
                assert_eq!(tag.as_deref(), Some("v*"));
                assert_eq!(header, DEFAULT_HEADER);
                assert_eq!(mode, PublishMode::Update);
                assert_eq!(repo, PathBuf::from("."));
            }
            other => panic!("expected notify, got {other:?}"),
        }
    }

    #[test]
    fn notify_requires_a_directory() {
        let result = Cli::try_parse_from([
            "ci-notifier",
            "notify",
            "--token",
            "xoxb-1",
            "--channel",
            "C1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["ci-notifier", "package", "--quiet", "--log"]).unwrap();
        assert!(cli.quiet);
        assert!(cli.log);
        assert!(matches!(cli.command, Some(Commands::Package { .. })));
    }
}
