// Standalone replay tool for analyzing tank commander round logs
//
// Usage:
//   cargo run --bin replay -- <log_file> --map <map.json> --params <params.json> --tanks <ids> [options]
//
// Options:
//   --all                    Replay all rounds
//   --rounds <r1,r2>         Replay specific rounds (comma-separated)
//   --validate <r:id:kind:dir,...>  Validate expected orders
//   --seed <n>               Seed for roles that pick random destinations
//   --verbose                Show detailed output for each round
//   --config <path>          Path to Tank.toml (default: Tank.toml)

use std::env;
use std::fs;
use std::process;

use tank_commander::config::Config;
use tank_commander::replay::{ReplayEngine, ReplaySetup};
use tank_commander::types::{Direction, GameArguments, Order};

fn print_usage() {
    eprintln!("Tank Commander Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> --map <FILE> --params <FILE> --tanks <IDS> [OPTIONS]");
    eprintln!();
    eprintln!("REQUIRED:");
    eprintln!("  --map <FILE>            JSON file holding the uploaded map grid");
    eprintln!("  --params <FILE>         JSON file holding the uploaded game arguments");
    eprintln!("  --tanks <ID1,ID2,...>   Tank ids assigned to this player");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay all rounds in the log");
    eprintln!("  --rounds <R1,R2,...>    Replay specific rounds (comma-separated)");
    eprintln!("  --validate <R:ID:KIND:DIR,...>");
    eprintln!("                          Validate expected orders (kind: move, turnTo, fire)");
    eprintln!("  --seed <N>              Seed for randomized destinations (default: config or 0)");
    eprintln!("  --verbose               Show detailed output for each round");
    eprintln!("  --config <path>         Path to Tank.toml (default: Tank.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  # Replay all rounds");
    eprintln!("  replay tank_rounds.jsonl --map map.json --params params.json --tanks 1,2 --all");
    eprintln!();
    eprintln!("  # Validate that tank 1 fires right in round 4");
    eprintln!("  replay tank_rounds.jsonl --map map.json --params params.json --tanks 1 --validate 4:1:fire:right");
}

fn parse_list<T: std::str::FromStr>(s: &str, what: &str) -> Result<Vec<T>, String>
where
    T::Err: std::fmt::Display,
{
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<T>()
                .map_err(|e| format!("Invalid {} '{}': {}", what, t, e))
        })
        .collect()
}

fn parse_expected_orders(s: &str) -> Result<Vec<(i64, Order)>, String> {
    s.split(',')
        .map(|item| {
            let parts: Vec<&str> = item.trim().split(':').collect();
            if parts.len() != 4 {
                return Err(format!(
                    "Invalid format '{}'. Expected 'round:tank:kind:dir'",
                    item
                ));
            }

            let round = parts[0]
                .parse::<i64>()
                .map_err(|e| format!("Invalid round number '{}': {}", parts[0], e))?;
            let tank_id = parts[1]
                .parse::<i32>()
                .map_err(|e| format!("Invalid tank id '{}': {}", parts[1], e))?;
            let dir = Direction::parse(parts[3])?;
            let order = match parts[2] {
                "move" => Order::move_to(tank_id, dir),
                "turnTo" | "turnto" => Order::turn_to(tank_id, dir),
                "fire" => Order::fire(tank_id, dir),
                other => return Err(format!("Invalid order kind: {}", other)),
            };

            Ok((round, order))
        })
        .collect()
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, String> {
    let contents =
        fs::read_to_string(path).map_err(|e| format!("Failed to read '{}': {}", path, e))?;
    serde_json::from_str(&contents).map_err(|e| format!("Failed to parse '{}': {}", path, e))
}

fn option_value<'a>(args: &'a [String], i: usize, name: &str) -> &'a str {
    match args.get(i + 1) {
        Some(value) => value,
        None => {
            eprintln!("Error: {} requires an argument", name);
            process::exit(1);
        }
    }
}

fn exit_on_err<T>(result: Result<T, String>, context: &str) -> T {
    result.unwrap_or_else(|e| {
        eprintln!("Error {}: {}", context, e);
        process::exit(1);
    })
}

fn main() {
    // Initialize logger
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) {
            0
        } else {
            1
        });
    }

    let log_file = &args[1];
    let mut config_path = "Tank.toml".to_string();
    let mut map_path = None;
    let mut params_path = None;
    let mut tanks: Option<Vec<i32>> = None;
    let mut seed: Option<u64> = None;
    let mut verbose = false;
    let mut rounds: Option<Vec<i64>> = None;
    let mut expected: Option<Vec<(i64, Order)>> = None;
    let mut replay_all = false;

    // Parse arguments
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--all" => {
                replay_all = true;
            }
            "--rounds" => {
                let value = option_value(&args, i, "--rounds");
                rounds = Some(exit_on_err(parse_list(value, "round number"), "parsing rounds"));
                i += 1;
            }
            "--validate" => {
                let value = option_value(&args, i, "--validate");
                expected = Some(exit_on_err(
                    parse_expected_orders(value),
                    "parsing expected orders",
                ));
                i += 1;
            }
            "--map" => {
                map_path = Some(option_value(&args, i, "--map").to_string());
                i += 1;
            }
            "--params" => {
                params_path = Some(option_value(&args, i, "--params").to_string());
                i += 1;
            }
            "--tanks" => {
                let value = option_value(&args, i, "--tanks");
                tanks = Some(exit_on_err(parse_list(value, "tank id"), "parsing tanks"));
                i += 1;
            }
            "--seed" => {
                let value = option_value(&args, i, "--seed");
                seed = Some(exit_on_err(
                    value.parse::<u64>().map_err(|e| e.to_string()),
                    "parsing seed",
                ));
                i += 1;
            }
            "--config" => {
                config_path = option_value(&args, i, "--config").to_string();
                i += 1;
            }
            "--verbose" => {
                verbose = true;
            }
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    if !replay_all && rounds.is_none() && expected.is_none() {
        eprintln!("Error: Must specify --all, --rounds, or --validate");
        print_usage();
        process::exit(1);
    }

    let (map_path, params_path, tanks) = match (map_path, params_path, tanks) {
        (Some(m), Some(p), Some(t)) => (m, p, t),
        _ => {
            eprintln!("Error: --map, --params and --tanks are required");
            print_usage();
            process::exit(1);
        }
    };

    // Load configuration
    let mut config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });
    if seed.is_some() {
        config.session.rng_seed = seed;
    }

    let map: Vec<Vec<i32>> = exit_on_err(read_json(&map_path), "loading map");
    let game_args: GameArguments = exit_on_err(read_json(&params_path), "loading parameters");

    println!("Loaded configuration from: {}", config_path);
    println!("Replay log file: {}", log_file);
    println!();

    let engine = ReplayEngine::new(
        config,
        ReplaySetup {
            args: game_args,
            map,
            tanks,
        },
        verbose,
    );

    let entries = exit_on_err(engine.load_log_file(log_file), "loading log file");
    if entries.is_empty() {
        eprintln!("Error: Log file is empty");
        process::exit(1);
    }

    println!("Loaded {} log entries\n", entries.len());

    if let Some(expected) = expected {
        println!("Validating {} expected order(s)...\n", expected.len());
        match engine.validate_expected_orders(&entries, &expected) {
            Ok(()) => println!("✓ All expected orders validated successfully!"),
            Err(e) => {
                eprintln!("✗ Validation failed: {}", e);
                process::exit(1);
            }
        }
    } else if let Some(rounds) = rounds {
        println!("Replaying {} specific round(s)...\n", rounds.len());
        let results = exit_on_err(engine.replay_rounds(&entries, &rounds), "during replay");
        engine.print_report(&results);
    } else {
        println!("Replaying all {} rounds...\n", entries.len());
        let results = exit_on_err(engine.replay_all(&entries), "during replay");
        engine.print_report(&results);
    }
}
