use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, anyhow, bail};
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;
use training_session::{
    Analysis, Athlete, CsvRoster, DashboardState, PasswordGate, View, WorkoutExport,
    chart::{distribution_svg, heart_rate_svg},
    lookup_athlete, render,
};

#[derive(Debug, clap::Parser)]
#[command(version, about = "Heart rate zone analysis of a training session")]
pub struct Args {
    /// Workout csv exported by the fitness tracker
    pub file: PathBuf,
    /// Athlete name
    #[arg(short, long, conflicts_with = "athlete")]
    pub name: Option<String>,
    /// Athlete age in years
    #[arg(short, long, conflicts_with = "athlete", value_parser = clap::value_parser!(u8).range(1..220))]
    pub age: Option<u8>,
    /// Athlete identifier in the roster
    #[arg(long)]
    pub athlete: Option<String>,
    /// Roster csv file with `id,name,birthdate` columns
    #[arg(long, env = "DASHBOARD_ROSTER")]
    pub roster: Option<PathBuf>,
    /// Password which unlocks the dashboard. No password is asked if not set
    #[arg(long, env = "DASHBOARD_PASSWORD", hide_env_values = true)]
    pub secret: Option<String>,
    /// Password to unlock the dashboard. Read from stdin if missing
    #[arg(short, long)]
    pub password: Option<String>,
    /// Directory for the svg charts
    #[arg(short, long, default_value_os_t = std::env::current_dir().unwrap_or_default(), required = false)]
    pub out_dir: PathBuf,
    /// Print the report as json
    #[arg(long, default_value_t = false, required = false)]
    pub json: bool,
    /// Don't write charts
    #[arg(long, default_value_t = false, required = false)]
    pub no_plot: bool,
    /// Debug logging
    #[arg(short, long, default_value_t = false, required = false)]
    pub verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = <Args as clap::Parser>::parse();

    let default_level = match args.verbose {
        true => "debug",
        false => "info",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let gate = match &args.secret {
        Some(secret) => PasswordGate::new(secret.as_str()),
        None => PasswordGate::open(),
    };

    let mut state = DashboardState::new(&gate);

    if !state.is_unlocked() {
        let entered = match &args.password {
            Some(password) => password.clone(),
            None => prompt_password()?,
        };

        state.submit_password(&gate, &entered);
    }

    if !state.is_unlocked() {
        bail!("Password incorrect");
    }

    state.form.export = Some(
        WorkoutExport::from_path(&args.file)
            .with_context(|| format!("Failed to load {}", args.file.display()))?,
    );
    state.form.athlete = Some(athlete(&args)?);

    match render(&state) {
        View::Report(analysis) => report(&analysis, &args),
        View::PasswordPrompt { .. } => Err(anyhow!("Password incorrect")),
        View::UploadForm { .. } => Err(anyhow!("Workout file and athlete are required")),
    }
}

fn prompt_password() -> anyhow::Result<String> {
    let mut stderr = io::stderr().lock();
    stderr.write_all(b"Password: ")?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password")?;

    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

fn athlete(args: &Args) -> anyhow::Result<Athlete> {
    if let Some(id) = &args.athlete {
        let path = args
            .roster
            .as_ref()
            .ok_or_else(|| anyhow!("--athlete needs a roster, use --roster or DASHBOARD_ROSTER"))?;

        let today = OffsetDateTime::now_utc().date();

        return Ok(lookup_athlete(&CsvRoster::new(path), id, today)?);
    }

    let age = args
        .age
        .ok_or_else(|| anyhow!("Either --age or --athlete is required"))?;

    Ok(Athlete::new(args.name.clone().unwrap_or_default(), age)?)
}

fn report(analysis: &Analysis<'_>, args: &Args) -> anyhow::Result<()> {
    match args.json {
        true => println!("{}", serde_json::to_string_pretty(analysis)?),
        false => print!("{analysis}"),
    }

    if args.no_plot {
        return Ok(());
    }

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;

    let charts = [
        ("heart_rate.svg", heart_rate_svg(&analysis.plot())?),
        ("zones.svg", distribution_svg(&analysis.distribution)?),
    ];

    for (name, svg) in charts {
        let path = args.out_dir.join(name);

        std::fs::write(&path, svg)
            .with_context(|| format!("Failed to save {}", path.display()))?;

        tracing::info!(path = %path.display(), "chart saved");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_name_conflicts_with_roster_athlete() {
        let result = Args::try_parse_from(["dashboard", "run.csv", "-n", "Mario", "--athlete", "rossi"]);

        assert!(result.is_err());
    }

    #[test]
    fn test_name_with_age() {
        let args = Args::try_parse_from(["dashboard", "run.csv", "-n", "Mario", "-a", "30"])
            .expect("valid args");

        assert_eq!(args.name.as_deref(), Some("Mario"));
        assert_eq!(args.age, Some(30));
    }
}
