use std::io::{BufRead, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use juno_gateway::profiles::ProfileConfig;
use juno_gateway::voice::SessionControl;
use juno_gateway::{Assistant, Config, Error};

/// Juno - Voice assistant orchestration gateway
#[derive(Parser)]
#[command(name = "juno", version, about)]
struct Cli {
    /// Profile to use
    #[arg(short, long, env = "JUNO_PROFILE")]
    profile: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start an interactive session (default)
    Run,
    /// Create a profile, merging the given fields over defaults
    CreateProfile {
        /// Profile name (directory name under the profiles root)
        profile: String,
        /// Assistant display name
        #[arg(long)]
        name: Option<String>,
        /// Voice gender ("female" or "male")
        #[arg(long)]
        gender: Option<String>,
        /// Spoken language
        #[arg(long)]
        language: Option<String>,
        /// Personality descriptor
        #[arg(long)]
        personality: Option<String>,
        /// System prompt for conversational fallbacks
        #[arg(long)]
        prompt: Option<String>,
        /// Role label
        #[arg(long)]
        role: Option<String>,
        /// Synthesis voice name
        #[arg(long)]
        voice_name: Option<String>,
    },
    /// Remove a profile (no-op if it doesn't exist)
    RemoveProfile {
        /// Profile name
        profile: String,
    },
    /// List existing profiles
    ListProfiles,
    /// List catalog voice names
    ListVoices,
    /// Speak a test sentence with a given voice
    TestVoice {
        /// Voice name from the catalog
        #[arg(long, default_value = "Ana")]
        voice: String,
        /// Text to speak
        #[arg(default_value = "This is to test a voice name before using it.")]
        text: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info,juno_gateway=info",
        1 => "info,juno_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.profile.as_deref())?;
    let mut assistant = Assistant::new(config)?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run_session(&mut assistant).await?,
        Command::CreateProfile {
            profile,
            name,
            gender,
            language,
            personality,
            prompt,
            role,
            voice_name,
        } => {
            let settings = assistant.create_profile(
                &profile,
                &ProfileConfig {
                    name,
                    gender,
                    language,
                    personality,
                    prompt,
                    role,
                    voice_name,
                    ..ProfileConfig::default()
                },
            )?;
            println!("Created profile '{profile}' ({})", settings.user.name);
        }
        Command::RemoveProfile { profile } => {
            assistant.remove_profile(&profile)?;
            println!("Removed profile '{profile}'");
        }
        Command::ListProfiles => {
            for name in assistant.list_profiles()? {
                println!("{name}");
            }
        }
        Command::ListVoices => {
            for voice in Assistant::available_voices() {
                println!("{voice}");
            }
        }
        Command::TestVoice { voice, text } => {
            assistant.test_voice(&text, &voice).await?;
        }
    }

    Ok(())
}

/// Interactive utterance loop. A classifier failure is fatal for the turn,
/// not the session.
async fn run_session(assistant: &mut Assistant) -> anyhow::Result<()> {
    println!("Session started with profile '{}'. Type an utterance, or ctrl-d to quit.", assistant.profile());

    let stdin = std::io::stdin();
    loop {
        print!("\nYou: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let utterance = line.trim();
        if utterance.is_empty() {
            continue;
        }

        match assistant.respond(utterance).await {
            Ok((_, SessionControl::Exit)) => break,
            Ok((_, SessionControl::Continue)) => {}
            Err(e @ Error::Classification { .. }) => {
                tracing::error!("{e}");
                println!("Sorry, I couldn't reach the language service. Try again.");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
