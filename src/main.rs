use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

/// Dump the AST of a C source file as YAML.
#[derive(Parser)]
#[command(name = "cdump", version, about)]
struct Cli {
    /// C source file to parse
    file: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(yaml) => {
            print!("{}", yaml);
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("error: {}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String, String> {
    let source = fs::read_to_string(&cli.file)
        .map_err(|e| format!("{}: {}", cli.file.display(), e))?;
    let unit = cdump::parse(&source).map_err(|e| e.to_string())?;
    let doc = cdump::flatten(&unit);
    serde_yaml::to_string(&doc).map_err(|e| e.to_string())
}
