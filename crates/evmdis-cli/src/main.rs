use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use evmdis_core::{disassemble, input, render::render, DisasmConfig, Error, OutputFormat};
use tracing::{debug, error, Level};

const USAGE: &str = "[--json] [--describe] [-v] <ARQUIVO>...";

/// Argumentos da linha de comando
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    json: bool,
    describe: bool,
    verbose: bool,
    files: Vec<PathBuf>,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<CliArgs, String> {
    let mut parsed = CliArgs::default();
    for arg in args {
        match arg.as_str() {
            "--json" => parsed.json = true,
            "--describe" => parsed.describe = true,
            "-v" | "--verbose" => parsed.verbose = true,
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(format!("opção desconhecida: {flag}"));
            }
            _ => parsed.files.push(PathBuf::from(arg)),
        }
    }
    Ok(parsed)
}

fn build_config(args: &CliArgs) -> Result<DisasmConfig> {
    let mut config = DisasmConfig::from_env().context("configuração de ambiente inválida")?;
    if args.json {
        config.output = OutputFormat::Json;
    }
    config.show_descriptions = args.describe;
    Ok(config)
}

fn main() -> Result<()> {
    let mut argv = env::args();
    let program = argv.next().unwrap_or_else(|| "evmdis".to_string());

    let args = match parse_args(argv) {
        Ok(args) if !args.files.is_empty() => args,
        Ok(_) => {
            eprintln!("Uso: {} {}", program, USAGE);
            process::exit(1);
        }
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("Uso: {} {}", program, USAGE);
            process::exit(1);
        }
    };

    // Logs vão para stderr; stdout fica reservado para a listagem
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let config = build_config(&args)?;
    debug!(output = %config.output, describe = config.show_descriptions, "configuração carregada");

    let stdout = io::stdout();
    for path in &args.files {
        let raw = match input::read_source(path) {
            Ok(raw) => raw,
            Err(err) => {
                error!("{err}");
                eprintln!("{err}");
                continue;
            }
        };

        let code = match input::prepare_input(&raw) {
            Ok(code) => code,
            Err(err @ Error::InvalidHex(_)) => {
                error!(path = %path.display(), "{err}");
                eprintln!("{}: {err}", path.display());
                process::exit(1);
            }
            Err(err) => return Err(err.into()),
        };

        let listing = render(&disassemble(&code), &config)?;
        let mut out = stdout.lock();
        out.write_all(listing.as_bytes())
            .context("falha ao escrever a listagem")?;
        out.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_flags_and_files() {
        let parsed = parse_args(args(&["--json", "a.hex", "-v", "b.hex"])).unwrap();
        assert!(parsed.json);
        assert!(parsed.verbose);
        assert!(!parsed.describe);
        assert_eq!(parsed.files, vec![PathBuf::from("a.hex"), PathBuf::from("b.hex")]);
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(parse_args(args(&["--yaml", "a.hex"])).is_err());
    }

    #[test]
    fn dash_alone_is_a_file_name() {
        let parsed = parse_args(args(&["-"])).unwrap();
        assert_eq!(parsed.files, vec![PathBuf::from("-")]);
    }
}
