//! `kpi-desk` command line entry point

mod logging;
mod terminal;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use kpi_desk::{DeskConfig, KpiDesk, Outcome, Session};
use kpi_form::{Prompt, Surface};
use logging::{init_logging, LogFormat};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use terminal::TerminalSurface;

fn cli() -> Command {
    Command::new("kpi-desk")
        .version(kpi_desk::VERSION)
        .about("Role-gated KPI data entry")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory holding the KPI tables (overrides the config file)"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .env("KPI_DESK_USER")
                .help("Login identifier; asked interactively when absent"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .default_value("text")
                .value_parser(["text", "json"])
                .help("Format of log lines on stderr"),
        )
        .subcommand(Command::new("update").about("Update values of an existing KPI date"))
        .subcommand(Command::new("enter").about("Enter values of a KPI for a new date"))
        .subcommand(
            Command::new("list")
                .about("List the KPI records your role may see")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<DeskConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => DeskConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DeskConfig::default(),
    };
    if let Some(dir) = matches.get_one::<PathBuf>("data-dir") {
        config = config.with_data_dir(dir);
    }
    Ok(config)
}

fn identifier(matches: &ArgMatches, surface: &mut dyn Surface) -> Option<String> {
    match matches.get_one::<String>("user") {
        Some(user) => Some(user.clone()),
        None => surface
            .prompt(&Prompt::new("Enter your email"))
            .map(|u| u.trim().to_string()),
    }
}

fn sign_in(
    matches: &ArgMatches,
    desk: &KpiDesk,
    surface: &mut dyn Surface,
) -> anyhow::Result<Option<Session>> {
    let Some(user) = identifier(matches, surface) else {
        return Ok(None);
    };
    Ok(desk.login(&user, surface)?)
}

fn list(desk: &KpiDesk, session: &Session, json: bool, out: &mut dyn Write) -> anyhow::Result<()> {
    let records = desk.accessible_records(session)?;
    if json {
        let rows = records
            .iter()
            .map(|r| {
                let values = r
                    .values()
                    .with_context(|| format!("values of {} are malformed", r.key()))?;
                Ok(serde_json::json!({
                    "kpi_id": r.kpi_id,
                    "kpi": r.kpi_name,
                    "value_date": r.value_date,
                    "values": values,
                }))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
    } else {
        for r in &records {
            writeln!(
                out,
                "{}\t{}\t{}\t{}",
                r.kpi_id, r.kpi_name, r.value_date, r.values_text
            )?;
        }
    }
    Ok(())
}

fn report(outcome: &Outcome) {
    match outcome {
        Outcome::Written { key, version } => {
            tracing::info!(key = %key, version = %version.short(), "session saved a row");
        }
        Outcome::Discarded => tracing::info!("nothing saved"),
        Outcome::NoAccess => tracing::info!("no accessible KPIs"),
    }
}

/// Run one invocation; `list` keeps stdout for its listing and talks to the
/// user on `diag`
fn run(
    matches: &ArgMatches,
    input: impl BufRead,
    out: &mut dyn Write,
    diag: &mut dyn Write,
) -> anyhow::Result<i32> {
    let config = load_config(matches)?;
    let data_dir = config.data_dir.clone();
    let mut desk = KpiDesk::open(config)
        .with_context(|| format!("failed to open KPI tables in {}", data_dir.display()))?;

    if let Some(("list", args)) = matches.subcommand() {
        let mut surface = TerminalSurface::new(input, diag);
        let Some(session) = sign_in(matches, &desk, &mut surface)? else {
            return Ok(1);
        };
        list(&desk, &session, args.get_flag("json"), out)?;
        return Ok(0);
    }

    let mut surface = TerminalSurface::new(input, out);
    let Some(session) = sign_in(matches, &desk, &mut surface)? else {
        return Ok(1);
    };
    let outcome = match matches.subcommand() {
        Some(("update", _)) => desk.update_kpi(&session, &mut surface)?,
        Some(("enter", _)) => desk.enter_new(&session, &mut surface)?,
        _ => desk.run(&session, &mut surface)?,
    };
    report(&outcome);
    Ok(0)
}

fn main() {
    let matches = cli().get_matches();
    let format = matches
        .get_one::<String>("log-format")
        .and_then(|name| LogFormat::from_name(name))
        .unwrap_or(LogFormat::Text);
    init_logging(format);

    let stdin = std::io::stdin();
    let result = run(
        &matches,
        stdin.lock(),
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    );
    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "kpi-desk failed");
            eprintln!("Error: {err:#}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kpi_test_utils::fixture_dir;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn invoke(args: &[&str], input: &str) -> (i32, String, String) {
        let matches = cli().try_get_matches_from(args).unwrap();
        let (mut out, mut diag) = (Vec::new(), Vec::new());
        let code = run(
            &matches,
            Cursor::new(input.as_bytes().to_vec()),
            &mut out,
            &mut diag,
        )
        .unwrap();
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(diag).unwrap(),
        )
    }

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn global_options_after_subcommand() {
        let matches = cli()
            .try_get_matches_from([
                "kpi-desk",
                "list",
                "--json",
                "--data-dir",
                "/srv/kpi",
                "--user",
                "u1@gmail.com",
            ])
            .unwrap();
        let config = load_config(&matches).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/kpi"));
        assert_eq!(
            matches.get_one::<String>("user").map(String::as_str),
            Some("u1@gmail.com")
        );
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "list");
        assert!(sub.get_flag("json"));
    }

    #[test]
    fn log_format_is_restricted() {
        assert!(cli()
            .try_get_matches_from(["kpi-desk", "--log-format", "xml"])
            .is_err());
    }

    #[test]
    fn list_json_keeps_stdout_parseable() {
        let dir = fixture_dir();
        let data_dir = dir.path().to_str().unwrap();
        let (code, out, diag) = invoke(
            &[
                "kpi-desk", "--data-dir", data_dir, "--user", "u1@gmail.com", "list", "--json",
            ],
            "",
        );

        assert_eq!(code, 0);
        let rows: serde_json::Value = serde_json::from_str(&out).unwrap();
        let rows = rows.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["kpi"], "K1");
        assert_eq!(rows[0]["values"]["target"], 100);
        assert!(diag.contains("Welcome u1@gmail.com!"));
    }

    #[test]
    fn list_asks_for_the_email_on_diag() {
        let dir = fixture_dir();
        let data_dir = dir.path().to_str().unwrap();
        let matches = cli()
            .try_get_matches_from(["kpi-desk", "--data-dir", data_dir, "list", "--json"])
            .unwrap();
        if matches.get_one::<String>("user").is_some() {
            // KPI_DESK_USER is set in this environment
            return;
        }
        let (code, out, diag) = invoke(
            &["kpi-desk", "--data-dir", data_dir, "list", "--json"],
            "u2@gmail.com\n",
        );

        assert_eq!(code, 0);
        let rows: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(rows.as_array().unwrap().len(), 3);
        assert!(diag.starts_with("Enter your email: "));
    }

    #[test]
    fn list_refuses_unknown_user() {
        let dir = fixture_dir();
        let data_dir = dir.path().to_str().unwrap();
        let (code, out, diag) = invoke(
            &["kpi-desk", "--data-dir", data_dir, "--user", "nobody@gmail.com", "list"],
            "",
        );

        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert!(diag.contains("You don't have access to this application"));
    }
}
