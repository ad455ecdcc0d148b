use std::path::PathBuf;

use lathe_editor_lib::command::execute_json_batch;
use lathe_editor_lib::harness::ProfileHarness;
use lathe_editor_lib::state::ToolSettings;

struct Args {
    script: PathBuf,
    settings: Option<PathBuf>,
    save_settings: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lathe_editor=info,lathe_editor_lib=info".into()),
        )
        .init();

    let Some(args) = parse_args() else {
        eprintln!("usage: lathe-editor --script <commands.json> [--settings <settings.json>] [--save-settings]");
        std::process::exit(2);
    };

    if let Err(e) = run(&args) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn parse_args() -> Option<Args> {
    let args: Vec<String> = std::env::args().collect();
    let mut script = None;
    let mut settings = None;
    let mut save_settings = false;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--script" if i + 1 < args.len() => {
                script = Some(PathBuf::from(&args[i + 1]));
                i += 1;
            }
            "--settings" if i + 1 < args.len() => {
                settings = Some(PathBuf::from(&args[i + 1]));
                i += 1;
            }
            "--save-settings" => save_settings = true,
            other => {
                tracing::warn!("Ignoring argument {other}");
            }
        }
        i += 1;
    }
    Some(Args {
        script: script?,
        settings,
        save_settings,
    })
}

fn run(args: &Args) -> Result<(), String> {
    let settings = match &args.settings {
        Some(path) => ToolSettings::load_from(path)
            .map_err(|e| format!("Failed to load settings from {}: {e}", path.display()))?,
        None => ToolSettings::load(),
    };
    if args.save_settings {
        settings.save().map_err(|e| format!("Failed to save settings: {e}"))?;
        tracing::info!("Settings saved to the config dir");
    }

    let json = std::fs::read_to_string(&args.script)
        .map_err(|e| format!("Failed to read {}: {e}", args.script.display()))?;

    let mut harness = ProfileHarness::with_settings(settings);
    let responses = execute_json_batch(&mut harness, &json)?;
    let failed = responses.iter().filter(|r| !r.success).count();
    tracing::info!("Ran {} commands ({} failed)", responses.len(), failed);

    let out = serde_json::to_string_pretty(&responses).map_err(|e| format!("Failed to encode responses: {e}"))?;
    println!("{out}");
    Ok(())
}
