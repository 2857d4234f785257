use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use clap::Parser;
use thiserror::Error;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use treni::domain::{BoardKind, EneeCode, RailTime, StationRef, TrainInfo, now_local};
use treni::render::{render_board, render_progress, render_solutions, render_stats};
use treni::stations::{
    DEFAULT_STATIONS_FILE, StationCache, StationCacheConfig, StationError, StationIndex,
    dump_stations, load_or_dump,
};
use treni::timetable::build_timetable;
use treni::viaggiatreno::{
    DEFAULT_BASE_URL, DEFAULT_BOARD_LIMIT, ViaggiaTrenoClient, ViaggiaTrenoConfig,
    ViaggiaTrenoError,
};

/// How many stations a name search offers to pick from.
const STATION_CHOICES: usize = 10;

#[derive(Debug, Parser)]
#[command(
    name = "treni",
    version,
    about = "Real-time Italian train departures, arrivals, delays, stops and tracks",
    after_help = "Departures and arrivals show trains from/to the selected station \
                  in a range from 15 minutes before to 90 minutes after the selected time."
)]
struct Cli {
    /// Show departures from STATION
    #[arg(short, long, value_name = "STATION")]
    departures: Option<String>,

    /// Show arrivals at STATION
    #[arg(short, long, value_name = "STATION")]
    arrivals: Option<String>,

    /// Show the progress of train TRAIN_NUMBER
    #[arg(short, long, value_name = "TRAIN_NUMBER")]
    number: Option<u32>,

    /// Show travel solutions from DEPARTURE to ARRIVAL
    #[arg(short, long, num_args = 2, value_names = ["DEPARTURE", "ARRIVAL"])]
    solutions: Option<Vec<String>>,

    /// Limit the number of board rows or travel solutions
    #[arg(short, long, value_name = "N", default_value_t = DEFAULT_BOARD_LIMIT)]
    limit: usize,

    /// Date to search, YYYY-MM-DD [default: today]
    #[arg(long, value_parser = parse_search_date)]
    search_date: Option<NaiveDate>,

    /// Time to search, HH or HH:MM [default: now]
    #[arg(long, value_parser = parse_search_time)]
    search_time: Option<NaiveTime>,

    /// Show network statistics
    #[arg(long)]
    stats: bool,

    /// Download the station list and save it to the stations file
    #[arg(long)]
    dump_stations: bool,

    /// Station list cache
    #[arg(long, value_name = "PATH", default_value = DEFAULT_STATIONS_FILE)]
    stations_file: PathBuf,

    /// ViaggiaTreno API base URL
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    timeout: u64,

    /// Log filter, e.g. `debug` or `treni=trace`
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

fn parse_search_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn parse_search_time(raw: &str) -> Result<NaiveTime, String> {
    let raw = raw.trim();
    let full = if raw.contains(':') {
        raw.to_string()
    } else {
        format!("{raw}:00")
    };
    NaiveTime::parse_from_str(&full, "%H:%M").map_err(|e| format!("expected HH or HH:MM: {e}"))
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Upstream(#[from] ViaggiaTrenoError),

    #[error(transparent)]
    Stations(#[from] StationError),

    #[error("output error: {0}")]
    Io(#[from] io::Error),

    #[error("no station matches {0:?}")]
    NoStation(String),

    #[error("no train found with number {0}")]
    NoTrain(u32),

    #[error("no selection made")]
    NoSelection,

    #[error("{date} {time} does not exist in Italian local time")]
    InvalidSearchTime { date: NaiveDate, time: NaiveTime },
}

/// Offer numbered `items` on `output` and read the chosen number from
/// `input`, asking again until it is valid.
fn choose<'a, T, R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    title: &str,
    items: &'a [T],
    label: impl Fn(&T) -> String,
) -> Result<&'a T, CliError> {
    if let [only] = items {
        return Ok(only);
    }

    writeln!(output, "{title}")?;
    for (i, item) in items.iter().enumerate() {
        writeln!(output, "  {:>2}) {}", i + 1, label(item))?;
    }

    loop {
        write!(output, "Choice [1-{}]: ", items.len())?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(CliError::NoSelection);
        }

        match line.trim().parse::<usize>() {
            Ok(n) if (1..=items.len()).contains(&n) => return Ok(&items[n - 1]),
            _ => writeln!(output, "Please enter a number between 1 and {}.", items.len())?,
        }
    }
}

struct App {
    client: ViaggiaTrenoClient,
    cache: StationCache,
    stations: Option<StationIndex>,
}

impl App {
    async fn station_index(&mut self) -> Result<&StationIndex, CliError> {
        if self.stations.is_none() {
            let records = load_or_dump(&self.client, &self.cache).await?;
            debug!(count = records.len(), "station list loaded");
            self.stations = Some(StationIndex::new(records));
        }
        Ok(self.stations.get_or_insert_with(StationIndex::default))
    }

    /// Resolve a station given by id or by name.
    async fn choose_station(&mut self, query: &str) -> Result<StationRef, CliError> {
        let index = self.station_index().await?;

        if let Ok(code) = EneeCode::parse(query)
            && let Some(record) = index.get(code)
        {
            return Ok(record.station_ref());
        }

        let matches = index.search(query, STATION_CHOICES);
        if matches.is_empty() {
            return Err(CliError::NoStation(query.to_string()));
        }

        let chosen = choose(
            &mut io::stdin().lock(),
            &mut io::stderr(),
            "Select the station",
            matches.as_slice(),
            |m| m.record.long_name.clone(),
        )?;
        Ok(chosen.record.station_ref())
    }

    async fn choose_train(&self, number: u32) -> Result<TrainInfo, CliError> {
        let found = self.client.search_train_number(number).await?;
        if found.is_empty() {
            return Err(CliError::NoTrain(number));
        }

        let chosen = choose(
            &mut io::stdin().lock(),
            &mut io::stderr(),
            "Select the train",
            found.as_slice(),
            TrainInfo::to_string,
        )?;
        Ok(chosen.clone())
    }

    async fn show_board(
        &mut self,
        query: &str,
        kind: BoardKind,
        at: &DateTime<Tz>,
        limit: usize,
    ) -> Result<(), CliError> {
        let station = self.choose_station(query).await?;
        let entries = self.client.board(station.enee_code, kind, at, limit).await?;
        let rows = build_timetable(&self.client, &entries, &station, kind).await;

        render_board(&mut io::stdout().lock(), &station, kind, &rows)?;
        Ok(())
    }

    async fn show_train(&self, number: u32) -> Result<(), CliError> {
        let train = self.choose_train(number).await?;
        let mut out = io::stdout().lock();

        match self.client.train_progress(&train.key()).await? {
            Some(progress) => render_progress(&mut out, &progress)?,
            None => writeln!(out, "No real-time data for train {train}.")?,
        }
        Ok(())
    }

    async fn show_solutions(
        &mut self,
        from: &str,
        to: &str,
        at: &DateTime<Tz>,
        limit: usize,
    ) -> Result<(), CliError> {
        let origin = self.choose_station(from).await?;
        let destination = self.choose_station(to).await?;
        let solutions = self
            .client
            .travel_solutions(origin.enee_code, destination.enee_code, at, limit)
            .await?;

        render_solutions(&mut io::stdout().lock(), &origin, &destination, &solutions)?;
        Ok(())
    }

    async fn show_stats(&self) -> Result<(), CliError> {
        let stats = self.client.statistics().await?;
        render_stats(&mut io::stdout().lock(), &stats)?;
        Ok(())
    }

    async fn dump_stations(&self) -> Result<(), CliError> {
        let stations = dump_stations(&self.client).await?;
        self.cache.save(&stations)?;
        println!(
            "Saved {} stations to {}",
            stations.len(),
            self.cache.path().display()
        );
        Ok(())
    }
}

fn search_datetime(cli: &Cli) -> Result<DateTime<Tz>, CliError> {
    let now = now_local();
    let date = cli.search_date.unwrap_or_else(|| now.date_naive());
    let time = cli.search_time.unwrap_or_else(|| now.time());

    RailTime::from_local(date.and_time(time))
        .map(|t| t.local())
        .ok_or(CliError::InvalidSearchTime { date, time })
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = ViaggiaTrenoConfig::new()
        .with_base_url(&cli.base_url)
        .with_timeout(cli.timeout);

    let mut app = App {
        client: ViaggiaTrenoClient::new(config)?,
        cache: StationCache::new(StationCacheConfig::new(&cli.stations_file)),
        stations: None,
    };

    if cli.dump_stations {
        app.dump_stations().await?;
    }

    if cli.stats {
        app.show_stats().await?;
    }

    let at = search_datetime(&cli)?;

    if let Some(query) = &cli.departures {
        app.show_board(query, BoardKind::Departures, &at, cli.limit)
            .await?;
    }

    if let Some(query) = &cli.arrivals {
        app.show_board(query, BoardKind::Arrivals, &at, cli.limit)
            .await?;
    }

    if let Some(number) = cli.number {
        app.show_train(number).await?;
    }

    if let Some([from, to]) = cli.solutions.as_deref() {
        app.show_solutions(from, to, &at, cli.limit).await?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let nothing_asked = !cli.dump_stations
        && !cli.stats
        && cli.departures.is_none()
        && cli.arrivals.is_none()
        && cli.number.is_none()
        && cli.solutions.is_none();
    if nothing_asked {
        eprintln!("Nothing to do. Try --help.");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
