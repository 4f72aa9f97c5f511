mod display;
mod interactive;

use arbiter_session::{GameManager, Mode, ProposedMove, SessionConfig};
use interactive::InteractiveGame;
use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::thread;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: arbiter [play|board] [options]

Commands:
  play                 - Play in the terminal by typing moves (default)
  board                - Full-screen board driven with vim keys

Options:
  --mode cpu|friend    - Play the computer or a second human (default cpu)
  --delay-ms <ms>      - Pause before the computer replies (default 300)
  --seed <n>           - Seed the computer's move choice
  --config <file>      - Read settings from a JSON file; flags override it";

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Splits the command line into the command name and the session settings.
fn parse_args(args: &[String]) -> Result<(String, SessionConfig), String> {
    let mut command = String::from("play");
    let mut config = SessionConfig::default();
    let mut overrides: Vec<(&str, &str)> = Vec::new();

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--mode" | "--delay-ms" | "--seed" | "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| format!("{arg} needs a value"))?;
                overrides.push((arg.as_str(), value.as_str()));
            }
            "play" | "board" => command = arg.clone(),
            other => return Err(format!("unknown argument '{other}'")),
        }
    }

    // the file first, so flags win regardless of their order
    if let Some((_, path)) = overrides.iter().find(|(flag, _)| *flag == "--config") {
        let text = fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
        config = SessionConfig::from_json(&text).map_err(|e| format!("{path}: {e}"))?;
    }
    for (flag, value) in overrides {
        match flag {
            "--mode" => config.mode = value.parse().map_err(|e| format!("{e}"))?,
            "--delay-ms" => {
                config.opponent_delay_ms = value
                    .parse()
                    .map_err(|_| format!("invalid delay '{value}'"))?;
            }
            "--seed" => {
                config.seed = Some(value.parse().map_err(|_| format!("invalid seed '{value}'"))?);
            }
            _ => {}
        }
    }

    Ok((command, config))
}

/// Waits out and plays any scheduled computer reply.
fn settle_opponent(manager: &mut GameManager) {
    while let Some(wait) = manager.time_until_opponent() {
        thread::sleep(wait);
        match manager.poll_opponent() {
            Ok(Some(outcome)) => println!("Computer plays {}", outcome.record.notation),
            Ok(None) => {}
            Err(err) => {
                error!(%err, "computer could not move");
                break;
            }
        }
    }
}

fn print_position(manager: &GameManager) {
    println!();
    for line in display::board_lines(manager.session().position()) {
        println!("{line}");
    }
    println!();
    for line in display::status_lines(&manager.snapshot()) {
        println!("{line}");
    }
}

fn print_help() {
    println!("Enter moves like 'e2e4', or 'e7e8n' to promote to something other than a queen");
    println!("Commands: new, mode cpu|friend, fen, help, quit");
}

fn play_lines(mut manager: GameManager) -> io::Result<()> {
    println!("Arbiter - Interactive Mode");
    print_help();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        settle_opponent(&mut manager);
        print_position(&manager);

        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim();

        match input {
            "" => {}
            "quit" | "exit" => break,
            "help" => print_help(),
            "new" => {
                manager.on_reset_requested();
                println!("New game started!");
            }
            "fen" => println!("{}", manager.snapshot().fen),
            _ if input.starts_with("mode") => match input["mode".len()..].parse::<Mode>() {
                Ok(mode) => manager.on_mode_changed(mode),
                Err(err) => println!("{err}"),
            },
            _ => match input
                .parse::<ProposedMove>()
                .and_then(|proposed| manager.propose_move(proposed))
            {
                Ok(outcome) => println!("You played {}", outcome.record.notation),
                Err(err) => println!("{err}"),
            },
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let (command, config) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("{message}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };
    info!(%command, ?config, "starting");

    let manager = GameManager::from_config(&config);
    let result = match command.as_str() {
        "board" => InteractiveGame::new(manager).run(),
        _ => play_lines(manager),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "terminal error");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("arbiter")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_defaults() {
        let (command, config) = parse_args(&args(&[])).unwrap();
        assert_eq!(command, "play");
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let (command, config) =
            parse_args(&args(&["board", "--mode", "friend", "--delay-ms", "0", "--seed", "7"]))
                .unwrap();
        assert_eq!(command, "board");
        assert_eq!(config.mode, Mode::Friend);
        assert_eq!(config.opponent_delay_ms, 0);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_bad_arguments() {
        assert!(parse_args(&args(&["--mode"])).is_err());
        assert!(parse_args(&args(&["--mode", "solo"])).is_err());
        assert!(parse_args(&args(&["--delay-ms", "soon"])).is_err());
        assert!(parse_args(&args(&["perft"])).is_err());
        assert!(parse_args(&args(&["--config", "/nonexistent/arbiter.json"])).is_err());
    }
}
