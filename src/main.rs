//! Sesame - encrypt and decrypt application config files.

use anyhow::Context;
use clap::{Parser, Subcommand};
use sesame::config::encrypted_path;
use sesame::prompt::{AssumeYes, Confirm, TerminalConfirm};
use sesame::{CodecConfig, ConfigCodec, Outcome};
use std::path::PathBuf;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "sesame")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Encrypt and decrypt application config files",
    long_about = "Keeps secrets in version control by encrypting a config file with a symmetric key stored in a separate keyfile."
)]
struct Cli {
    /// Keyfile probed when none is given, and where new keys are written
    #[arg(long, global = true, default_value = sesame::config::DEFAULT_KEYFILE)]
    default_keyfile: PathBuf,

    /// Answer yes to every prompt
    #[arg(short, long, global = true)]
    yes: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a config file to <CONFIG>.encrypted
    Encrypt {
        /// Path to the plaintext config
        config: PathBuf,

        /// Previously generated keyfile
        #[arg(short, long)]
        keyfile: Option<PathBuf>,
    },

    /// Decrypt <CONFIG>.encrypted back to <CONFIG>
    Decrypt {
        /// Path to the config or its .encrypted file
        config: PathBuf,

        /// Keyfile used for encryption
        #[arg(short, long)]
        keyfile: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: failed to install logger: {}", e);
    }

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = CodecConfig::new(cli.default_keyfile);
    if let Err(e) = config.validate() {
        anyhow::bail!("Invalid --default-keyfile: {}", e);
    }

    if cli.yes {
        dispatch(ConfigCodec::new(config, AssumeYes), cli.command)
    } else {
        dispatch(
            ConfigCodec::new(config, TerminalConfirm::stdio()),
            cli.command,
        )
    }
}

fn dispatch<C: Confirm>(mut codec: ConfigCodec<C>, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Encrypt { config, keyfile } => {
            let outcome = codec
                .encrypt(&config, keyfile.as_deref())
                .with_context(|| format!("Failed to encrypt {}", config.display()))?;
            match outcome {
                Outcome::Completed(path) => println!(
                    "Application config encrypted at {}",
                    encrypted_path(&path).display()
                ),
                Outcome::Aborted => println!("Aborted"),
            }
        }

        Commands::Decrypt { config, keyfile } => {
            let outcome = codec
                .decrypt(&config, keyfile.as_deref())
                .with_context(|| format!("Failed to decrypt {}", config.display()))?;
            match outcome {
                Outcome::Completed(path) => {
                    println!("Application config decrypted at {}", path.display())
                }
                Outcome::Aborted => println!("Aborted"),
            }
        }
    }

    Ok(())
}
