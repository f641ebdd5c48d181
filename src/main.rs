use std::io::Read;

use clap::Parser;

use iim_engine::bridges::Bridges;
use iim_engine::config::EngineConfig;
use iim_engine::Engine;

#[derive(Parser)]
#[command(name = "iim-engine")]
#[command(about = "A modern execution engine for the .iim browser-automation macro language")]
#[command(version)]
struct Cli {
    /// Execute the macro from a command-line argument
    #[arg(short = 'c')]
    macro_source: Option<String>,

    /// Path to an EngineConfig TOML file
    #[arg(long = "config")]
    config: Option<String>,

    /// Output the ExecutionResult as JSON
    #[arg(long = "json")]
    json: bool,

    /// Macro (.iim) file to execute
    #[arg()]
    macro_file: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let source = if let Some(s) = cli.macro_source {
        s
    } else if let Some(ref file) = cli.macro_file {
        match std::fs::read_to_string(file) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error: cannot read macro file: {file}: {e}");
                std::process::exit(1);
            }
        }
    } else {
        use std::io::IsTerminal;
        if std::io::stdin().is_terminal() {
            eprintln!("Error: no macro provided. Use -c 'SOURCE', provide a macro file, or pipe via stdin.");
            std::process::exit(1);
        }
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).unwrap_or_default();
        buf
    };

    let config = match cli.config {
        Some(ref path) => match EngineConfig::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: cannot load config file: {path}: {e}");
                std::process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    let mut engine = Engine::new(Bridges::default(), config);

    if let Err(e) = engine.load_macro(&source) {
        report(cli.json, false, e.code(), Some(e.to_string()), Default::default(), Vec::new(), Vec::new());
        std::process::exit(1);
    }

    let result = engine.execute().await;

    report(
        cli.json,
        result.success,
        result.error_code,
        result.error_message.clone(),
        result.variables.clone(),
        result.run_log.clone(),
        result.extract.clone(),
    );

    std::process::exit(if result.success { 0 } else { 1 });
}

#[allow(clippy::too_many_arguments)]
fn report(
    json: bool,
    success: bool,
    error_code: i32,
    error_message: Option<String>,
    variables: indexmap::IndexMap<String, String>,
    run_log: Vec<iim_engine::handlers::LogEntry>,
    extract: Vec<String>,
) {
    if json {
        let body = serde_json::json!({
            "success": success,
            "errorCode": error_code,
            "errorMessage": error_message,
            "variables": variables,
            "runLog": run_log,
            "extract": extract,
        });
        println!("{body}");
    } else if success {
        println!("OK (code {error_code})");
    } else {
        eprintln!("FAILED (code {error_code}): {}", error_message.unwrap_or_default());
    }
}
