use std::path::{Path, PathBuf};

use sarmobi_guide_lib::command::{execute_json, execute_json_batch, CommandResponse};
use sarmobi_guide_lib::harness::GuideHarness;
use sarmobi_guide_lib::identify::{
    IdentificationInput, Photo, SeededDecisions, SimulatedIdentifier, SimulationTimings,
};
use sarmobi_guide_lib::state::Preferences;
use shared::{Catalog, Language};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Default)]
struct Args {
    script: Option<PathBuf>,
    lang: Option<Language>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sarmobi_guide=info".into()),
        )
        .init();

    let args = parse_args();

    let catalog = match Catalog::builtin() {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("Failed to load the product catalog: {e}");
            std::process::exit(1);
        }
    };

    let mut preferences = Preferences::load();
    if let Some(lang) = args.lang {
        preferences.language = lang;
    }

    let identifier = SimulatedIdentifier::new(
        &catalog,
        SimulationTimings::default(),
        Box::new(SeededDecisions::from_entropy()),
    );
    let mut harness = GuideHarness::with_preferences(catalog, preferences);

    match args.script {
        Some(path) => run_script(&mut harness, &path),
        None => run_interactive(&mut harness, &identifier).await,
    }
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--script" if i + 1 < args.len() => {
                parsed.script = Some(PathBuf::from(&args[i + 1]));
                i += 1;
            }
            "--lang" if i + 1 < args.len() => {
                match args[i + 1].parse::<Language>() {
                    Ok(lang) => parsed.lang = Some(lang),
                    Err(e) => tracing::error!("Ignoring --lang: {e}"),
                }
                i += 1;
            }
            other => tracing::warn!("Unknown argument '{other}'"),
        }
        i += 1;
    }
    parsed
}

fn print_response(resp: &CommandResponse) {
    match serde_json::to_string_pretty(resp) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!("Failed to print response: {e}"),
    }
}

/// Persist language and voice mode when a command changed them
fn save_if_changed(before: Preferences, harness: &GuideHarness) {
    let after = harness.store.preferences();
    if after != before {
        after.save();
    }
}

fn run_script(harness: &mut GuideHarness, path: &Path) {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to read script {}: {e}", path.display());
            return;
        }
    };

    let before = harness.store.preferences();
    match execute_json_batch(harness, &json) {
        Ok(responses) => {
            tracing::info!("Ran {} commands from {}", responses.len(), path.display());
            for resp in &responses {
                print_response(resp);
            }
        }
        Err(e) => tracing::error!("{e}"),
    }
    save_if_changed(before, harness);
}

/// Parse `identify qr|model|photo <arg>`
fn parse_identify(rest: &str) -> Result<IdentificationInput, String> {
    let (method, arg) = rest.trim().split_once(' ').unwrap_or((rest.trim(), ""));
    let arg = arg.trim();
    match method {
        "qr" => Ok(IdentificationInput::QrCode(arg.to_string())),
        "model" => Ok(IdentificationInput::ModelNumber(arg.to_string())),
        "photo" => {
            let bytes = std::fs::read(arg).map_err(|e| format!("Failed to read {arg}: {e}"))?;
            Ok(IdentificationInput::Photo(Photo {
                file_name: arg.to_string(),
                bytes,
            }))
        }
        other => Err(format!("Unknown identification method '{other}'")),
    }
}

async fn run_interactive(harness: &mut GuideHarness, identifier: &SimulatedIdentifier) {
    tracing::info!("Reading commands from stdin");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Failed to read stdin: {e}");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let before = harness.store.preferences();
        if let Some(rest) = line.strip_prefix("identify ") {
            match parse_identify(rest) {
                Ok(input) => match harness.identify(identifier, input).await {
                    Some(outcome) => println!("{}", serde_json::json!({ "outcome": outcome })),
                    None => println!("{}", serde_json::json!({ "outcome": "disabled" })),
                },
                Err(e) => tracing::error!("{e}"),
            }
        } else {
            match execute_json(harness, line) {
                Ok(resp) => print_response(&resp),
                Err(e) => tracing::error!("{e}"),
            }
        }
        save_if_changed(before, harness);
    }
}
