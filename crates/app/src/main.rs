use std::fmt;

use gateway::{ApiConfig, AuthContext, Gateway, HttpGateway};
use interview_core::model::{SessionId, SessionState};
use log::info;
use services::{Clock, InterviewRunner, RearmPolicy};
use ui::{map_session_summary, render_summary};

mod demo;
mod terminal;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingSessionId,
    InvalidSessionId { raw: String },
    InvalidRearm { raw: String },
    InvalidTimeLimit { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingSessionId => {
                write!(f, "run requires --session <id> or INTERVIEW_SESSION_ID")
            }
            ArgsError::InvalidSessionId { raw } => write!(f, "invalid --session value: {raw}"),
            ArgsError::InvalidRearm { raw } => {
                write!(f, "invalid --rearm value: {raw} (expected stay, resume or fresh)")
            }
            ArgsError::InvalidTimeLimit { raw } => write!(f, "invalid --time-limit value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- run  --session <id> [--api <url>] [--token <token>] [--rearm <policy>]");
    eprintln!("  cargo run -p app -- demo [--rearm <policy>] [--time-limit <secs>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api {}", gateway::http::DEFAULT_API_BASE);
    eprintln!("  --rearm stay   (resume | fresh restart the countdown after a failed submission)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  INTERVIEW_API_BASE, INTERVIEW_TOKEN, INTERVIEW_ROLE, INTERVIEW_USER_ID,");
    eprintln!("  INTERVIEW_SESSION_ID, RUST_LOG (default info)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Run,
    Demo,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "run" => Some(Self::Run),
            "demo" => Some(Self::Demo),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    api_base: Option<String>,
    token: Option<String>,
    session_id: Option<SessionId>,
    rearm: RearmPolicy,
    time_limit: Option<u32>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            session_id: std::env::var("INTERVIEW_SESSION_ID")
                .ok()
                .and_then(|value| value.parse::<SessionId>().ok()),
            ..Self::default()
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => parsed.api_base = Some(require_value(args, "--api")?),
                "--token" => parsed.token = Some(require_value(args, "--token")?),
                "--session" => {
                    let value = require_value(args, "--session")?;
                    let id = value
                        .parse::<SessionId>()
                        .map_err(|_| ArgsError::InvalidSessionId { raw: value.clone() })?;
                    parsed.session_id = Some(id);
                }
                "--rearm" => {
                    let value = require_value(args, "--rearm")?;
                    parsed.rearm = RearmPolicy::from_arg(&value)
                        .ok_or(ArgsError::InvalidRearm { raw: value })?;
                }
                "--time-limit" => {
                    let value = require_value(args, "--time-limit")?;
                    let secs = value
                        .parse::<u32>()
                        .ok()
                        .filter(|secs| *secs > 0)
                        .ok_or(ArgsError::InvalidTimeLimit { raw: value })?;
                    parsed.time_limit = Some(secs);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

fn http_gateway(args: &Args) -> Result<Gateway, Box<dyn std::error::Error>> {
    let config = match &args.api_base {
        Some(base) => ApiConfig::new(base)?,
        None => ApiConfig::from_env()?,
    };
    let mut auth = AuthContext::from_env();
    if let Some(token) = &args.token {
        auth.token = Some(token.clone());
    }
    info!("using interview api at {}", config.base_url());
    Ok(Gateway::from_adapter(HttpGateway::new(config, auth)))
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);

    let cmd = match argv.next() {
        None => {
            print_usage();
            return Ok(());
        }
        Some(first) if first == "--help" || first == "-h" => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(&first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let (gateway, session_id) = match cmd {
        Command::Run => {
            let session_id = parsed.session_id.ok_or(ArgsError::MissingSessionId)?;
            (http_gateway(&parsed)?, session_id)
        }
        Command::Demo => (
            Gateway::in_memory(demo::demo_gateway(parsed.time_limit)?),
            demo::DEMO_SESSION_ID,
        ),
    };

    let runner = InterviewRunner::new(Clock::system(), &gateway).with_rearm_policy(parsed.rearm);
    info!("starting interview session {session_id} (rearm: {:?})", parsed.rearm);
    terminal::print_controls();

    let handle = runner.spawn(runner.new_session(session_id));
    let outcome = terminal::drive(&handle).await;
    let session = handle.shutdown().await?;
    let state = outcome?;

    match state {
        SessionState::Completed => {
            let summary = session.summary()?;
            print!("{}", render_summary(&map_session_summary(&summary)));
        }
        SessionState::Empty => println!("Nothing to answer in this interview."),
        other => println!("Left the interview while it was {other}."),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
