use std::env;
use std::path::PathBuf;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    #[default]
    Serve,
    Ingest,
    Build,
    Grid,
}

#[derive(Debug, Default)]
pub struct CliArgs {
    pub command: Command,
    pub port: Option<u16>,
    pub import_dir: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub since: Option<String>,
    pub until: Option<String>,
}

pub fn parse_args() -> Result<CliArgs, String> {
    parse_from(env::args().skip(1))
}

fn parse_from(args: impl IntoIterator<Item = String>) -> Result<CliArgs, String> {
    let mut args = args.into_iter();
    let mut parsed = CliArgs::default();
    let mut command_seen = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--port" => {
                let value = next_value(&mut args, "--port")?;
                let port = value
                    .parse::<u16>()
                    .map_err(|_| format!("invalid port value: {value}"))?;
                parsed.port = Some(port);
            }
            "--import-dir" => {
                parsed.import_dir = Some(PathBuf::from(next_value(&mut args, "--import-dir")?));
            }
            "--data-dir" => {
                parsed.data_dir = Some(PathBuf::from(next_value(&mut args, "--data-dir")?));
            }
            "--since" => parsed.since = Some(next_value(&mut args, "--since")?),
            "--until" => parsed.until = Some(next_value(&mut args, "--until")?),
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "serve" | "ingest" | "build" | "grid" if !command_seen => {
                command_seen = true;
                parsed.command = match arg.as_str() {
                    "ingest" => Command::Ingest,
                    "build" => Command::Build,
                    "grid" => Command::Grid,
                    _ => Command::Serve,
                };
            }
            _ => {
                return Err(format!("unknown argument: {arg}"));
            }
        }
    }

    Ok(parsed)
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next()
        .ok_or_else(|| format!("missing value for {flag}"))
}

pub fn print_help() {
    println!(
        "Cohort Tracker CLI\n\n\
Usage:\n  cohort-tracker [serve|ingest|build|grid] [options]\n\n\
Commands:\n  serve   Ingest the import dir, then serve the HTTP API (default)\n  ingest  Ingest the import dir and print stats as JSON\n  build   Rebuild ad-week facts and print them as JSON\n  grid    Print the cohort hit grid as JSON\n\n\
Options:\n  --port <port>        Override the configured port for this run only\n  --import-dir <dir>   Directory scanned for .json/.jsonl/.ndjson exports\n  --data-dir <dir>     Directory holding the sqlite database\n  --since <date>       First day (YYYY-MM-DD) for build\n  --until <date>       Last day (YYYY-MM-DD) for build\n  -h, --help           Show this help message\n"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, String> {
        parse_from(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn defaults_to_serve() {
        let args = parse(&[]).expect("args");
        assert_eq!(args.command, Command::Serve);
        assert_eq!(args.port, None);
    }

    #[test]
    fn reads_command_and_flags() {
        let args = parse(&["build", "--since", "2024-10-01", "--import-dir", "/tmp/in"])
            .expect("args");
        assert_eq!(args.command, Command::Build);
        assert_eq!(args.since.as_deref(), Some("2024-10-01"));
        assert_eq!(args.import_dir, Some(PathBuf::from("/tmp/in")));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse(&["--port", "http"]).is_err());
        assert!(parse(&["--port"]).is_err());
        assert!(parse(&["build", "grid"]).is_err());
        assert!(parse(&["export"]).is_err());
    }
}
