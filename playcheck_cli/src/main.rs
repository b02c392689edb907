//! # Playcheck CLI
//!
//! Runs EN 14960 calculations from the terminal. Each subcommand prints the
//! result with its derivation trail; `--json` prints the same response
//! envelope the HTTP endpoint returns.
//!
//! `evaluate` reads a `{"calculation": {...}}` request document from a file
//! or stdin, which makes it easy to replay requests captured elsewhere.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use playcheck_core::calculations::anchor::Dimensions;
use playcheck_core::calculations::wall_height::WallHeightInput;
use playcheck_core::references::generate_formulas_markdown;
use playcheck_core::{
    load_config, CalcError, CalculationRequest, CalculationResponse, CalculationService, EngineConfig,
    RequiredValue,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "playcheck", version, about = "EN 14960 inflatable play equipment calculator")]
struct Cli {
    #[arg(long, global = true, help = "Output the JSON response envelope")]
    json: bool,
    #[arg(long, global = true, help = "Engine constants (JSON); defaults to EN 14960-1:2019")]
    config: Option<PathBuf>,
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Required ground anchors (Annex A)
    Anchors {
        #[arg(long)]
        length: f64,
        #[arg(long)]
        width: f64,
        #[arg(long)]
        height: f64,
    },
    /// Required slide runout, optionally checking a measured runout
    Runout {
        #[arg(long)]
        platform_height: f64,
        #[arg(long)]
        runout: Option<f64>,
        #[arg(long, default_value_t = false)]
        stop_wall: bool,
    },
    /// Slide containing walls for one user height, or every band
    SlideHeight {
        #[arg(long)]
        platform_height: f64,
        #[arg(long)]
        wall_height: f64,
        #[arg(long)]
        user_height: Option<f64>,
        #[arg(long, default_value_t = false)]
        permanent_roof: bool,
    },
    /// Containing walls and capacity for every user height band
    WallHeight {
        #[arg(long)]
        platform_height: f64,
        #[arg(long)]
        wall_height: f64,
        #[arg(long)]
        length: f64,
        #[arg(long)]
        width: f64,
        #[arg(long, default_value_t = 0.0)]
        negative_adjustment: f64,
        #[arg(long, default_value_t = false)]
        permanent_roof: bool,
    },
    /// Maximum users per height band
    Capacity {
        #[arg(long)]
        length: f64,
        #[arg(long)]
        width: f64,
        #[arg(long)]
        max_user_height: Option<f64>,
        #[arg(long, default_value_t = 0.0)]
        negative_adjustment: f64,
    },
    /// Evaluate a request document (stdin when FILE is omitted)
    Evaluate { file: Option<PathBuf> },
    /// Print the formula reference as markdown
    Formulas,
}

impl Commands {
    fn into_request(self) -> Option<CalculationRequest> {
        let request = match self {
            Commands::Anchors { length, width, height } => {
                CalculationRequest::Anchors(Dimensions::new(length, width, height))
            }
            Commands::Runout {
                platform_height,
                runout,
                stop_wall,
            } => CalculationRequest::SlideRunout {
                platform_height,
                runout,
                stop_wall,
            },
            Commands::SlideHeight {
                platform_height,
                wall_height,
                user_height,
                permanent_roof,
            } => CalculationRequest::SlideHeight {
                platform_height,
                user_height,
                wall_height,
                permanent_roof,
            },
            Commands::WallHeight {
                platform_height,
                wall_height,
                length,
                width,
                negative_adjustment,
                permanent_roof,
            } => CalculationRequest::WallHeight(WallHeightInput {
                platform_height,
                containing_wall_height: wall_height,
                permanent_roof,
                length,
                width,
                negative_adjustment,
            }),
            Commands::Capacity {
                length,
                width,
                max_user_height,
                negative_adjustment,
            } => CalculationRequest::UserCapacity {
                length,
                width,
                max_user_height,
                negative_adjustment,
            },
            Commands::Evaluate { .. } | Commands::Formulas => return None,
        };
        Some(request)
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_document(file: Option<PathBuf>) -> Result<String, CalcError> {
    match file {
        Some(path) => fs::read_to_string(&path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .map_err(|e| CalcError::file_error("read", "<stdin>", e.to_string()))?;
            Ok(input)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match cli.config.as_deref() {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => return report_error(&e),
        },
        None => EngineConfig::default(),
    };
    let service = CalculationService::new(&config);

    let response = match cli.command {
        Commands::Formulas => {
            print!("{}", generate_formulas_markdown(&config));
            return ExitCode::SUCCESS;
        }
        Commands::Evaluate { file } => match read_document(file) {
            Ok(document) => service.evaluate_str(&document),
            Err(e) => return report_error(&e),
        },
        command => match command.into_request() {
            Some(request) => service.evaluate(&request),
            None => return ExitCode::FAILURE,
        },
    };

    if cli.json {
        match serde_json::to_string_pretty(&response) {
            Ok(json) => println!("{}", json),
            Err(e) => return report_error(&CalcError::from(e)),
        }
    } else {
        print_response(&response);
    }

    if response.passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_response(response: &CalculationResponse) {
    let Some(result) = &response.result else {
        eprintln!("Error: {}", response.status);
        return;
    };

    println!("═══════════════════════════════════════");
    for entry in &result.breakdown {
        println!("  {}: {}", entry.label, entry.detail);
    }
    println!("═══════════════════════════════════════");
    match result.value {
        RequiredValue::Verdict(pass) => println!("  RESULT: {}", status_icon(pass)),
        value => println!("  RESULT: {}", value),
    }
    println!("═══════════════════════════════════════");
}

fn report_error(error: &CalcError) -> ExitCode {
    eprintln!("Error: {}", error);
    if let Ok(json) = serde_json::to_string_pretty(error) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
    ExitCode::FAILURE
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_anchors_command() {
        let cli = Cli::try_parse_from([
            "playcheck", "anchors", "--length", "5", "--width", "4", "--height", "3",
        ])
        .unwrap();
        let request = cli.command.into_request().unwrap();
        assert_eq!(request, CalculationRequest::Anchors(Dimensions::new(5.0, 4.0, 3.0)));
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "playcheck", "runout", "--platform-height", "2.5", "--stop-wall", "--json", "-vv",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(
            cli.command.into_request(),
            Some(CalculationRequest::SlideRunout {
                platform_height: 2.5,
                runout: None,
                stop_wall: true,
            })
        );
    }

    #[test]
    fn test_wall_height_command_maps_fields() {
        let cli = Cli::try_parse_from([
            "playcheck", "wall-height", "--platform-height", "2", "--wall-height", "1.6",
            "--length", "5", "--width", "4",
        ])
        .unwrap();
        match cli.command.into_request() {
            Some(CalculationRequest::WallHeight(input)) => {
                assert_eq!(input.containing_wall_height, 1.6);
                assert_eq!(input.negative_adjustment, 0.0);
                assert!(!input.permanent_roof);
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_evaluate_has_no_direct_request() {
        let cli = Cli::try_parse_from(["playcheck", "evaluate"]).unwrap();
        assert!(cli.command.into_request().is_none());
    }

    #[test]
    fn test_missing_required_argument() {
        assert!(Cli::try_parse_from(["playcheck", "anchors", "--length", "5"]).is_err());
    }
}
