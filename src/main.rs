use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use barscout::api::{PlacesClient, fetch_bars};
use barscout::config::{
    DEFAULT_CENTER, DEFAULT_LOCATION, DEFAULT_QUERY, FileConfig, LoadedConfig, PipelineConfig,
    Source, is_usable_api_key,
};
use barscout::domain::BarRecord;
use barscout::osm::parse_bars;
use barscout::output::write_json;
use barscout::pipeline::BarPipeline;

/// Collect bars around a location into a JSON file
///
/// Examples:
///   # Google Places search around Washington, DC (key from the environment)
///   GOOGLE_PLACES_API_KEY=... barscout
///
///   # Search elsewhere with a tighter radius
///   barscout --lat 39.2904 --lon -76.6122 -r 8000 --query "bars in Baltimore" --location "Baltimore, MD"
///
///   # Search only, without per-place detail requests
///   barscout --skip-details -o bars_basic.json
///
///   # OpenStreetMap bars via Overpass, named bars only
///   barscout --source osm --require-name
///
///   # Use a config file
///   barscout --config my-settings.toml
#[derive(Parser, Debug)]
#[command(name = "barscout")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches barscout.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data source to query
    #[arg(long, value_enum)]
    source: Option<Source>,

    /// Google Places API key
    #[arg(long, env = "GOOGLE_PLACES_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Human-readable name of the searched area (used in messages only)
    #[arg(long)]
    location: Option<String>,

    /// Latitude of the search center (use with --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude of the search center (use with --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Location bias radius in meters
    #[arg(short = 'r', long)]
    radius: Option<u32>,

    /// Free-text search query
    #[arg(short = 'q', long)]
    query: Option<String>,

    /// Maximum number of search results (1-20)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=20))]
    max_results: Option<u32>,

    /// Output JSON file path (defaults to bars_google.json or bars.json)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Pause between detail requests in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Skip per-place detail requests
    #[arg(long)]
    skip_details: bool,

    /// OSM only: drop bars without a name tag
    #[arg(long)]
    require_name: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let loaded = if let Some(ref config_path) = args.config {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .context(format!("Failed to read config file: {:?}", config_path))?;
            LoadedConfig {
                config: Some(toml::from_str(&contents).context("Failed to parse config file")?),
                path: Some(config_path.clone()),
                warnings: Vec::new(),
            }
        } else {
            bail!("Config file not found: {:?}", config_path);
        }
    } else {
        FileConfig::load()
    };
    let file_config = loaded.config.unwrap_or_default();

    let verbose = args.verbose || file_config.verbose;
    init_tracing(verbose);
    for warning in &loaded.warnings {
        warn!("{}", warning);
    }
    if let Some(ref path) = loaded.path {
        debug!("Loaded config from {:?}", path);
    }

    let source = args.source.or(file_config.source).unwrap_or_default();
    let output_path = args
        .output
        .clone()
        .or_else(|| file_config.output.clone())
        .unwrap_or_else(|| source.default_output());

    println!("barscout - Bar Collector");
    println!("========================");
    println!();

    let count = match source {
        Source::Google => run_google(&args, &file_config, &output_path, verbose)?,
        Source::Osm => run_osm(&args, &file_config, &output_path, verbose)?,
    };

    println!();
    println!(
        "Done! Saved {} bars to {} in {:.1}s",
        count,
        output_path.display(),
        total_start.elapsed().as_secs_f32()
    );

    Ok(())
}

fn run_google(args: &Args, file: &FileConfig, output_path: &Path, verbose: bool) -> Result<usize> {
    let api_key = args
        .api_key
        .clone()
        .or_else(|| file.api_key.clone())
        .unwrap_or_default();
    if !is_usable_api_key(&api_key) {
        bail!(
            "Please set a Google Places API key (--api-key, GOOGLE_PLACES_API_KEY or api_key in the config file)\n\
             Get one from: https://console.cloud.google.com/apis/credentials"
        );
    }

    let location = args
        .location
        .clone()
        .or_else(|| file.location.clone())
        .unwrap_or_else(|| DEFAULT_LOCATION.to_string());
    let center = match (args.lat.or(file.lat), args.lon.or(file.lon)) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => DEFAULT_CENTER,
    };
    let pipeline_config = PipelineConfig {
        query: args
            .query
            .clone()
            .or_else(|| file.query.clone())
            .unwrap_or_else(|| DEFAULT_QUERY.to_string()),
        center,
        radius_m: args.radius.unwrap_or(file.radius),
        max_results: args.max_results.unwrap_or(file.max_results),
        delay: Duration::from_millis(args.delay_ms.unwrap_or(file.delay_ms)),
        enrich: !(args.skip_details || file.skip_details),
    };
    let google_config = file.google.clone().unwrap_or_default();

    if verbose {
        println!("Configuration:");
        println!("  Source: Google Places");
        println!("  Location: {}", location);
        println!("  Center: ({:.4}, {:.4})", center.0, center.1);
        println!("  Radius: {}m", pipeline_config.radius_m);
        println!("  Query: {}", pipeline_config.query);
        println!("  Max results: {}", pipeline_config.max_results);
        println!("  Enrich with details: {}", pipeline_config.enrich);
        println!("  Delay: {}ms", pipeline_config.delay.as_millis());
        println!("  Output: {}", output_path.display());
        println!();
    }

    let client = PlacesClient::new(&api_key, &google_config)?;
    let mut pipeline = BarPipeline::new(client, pipeline_config);

    let multi = MultiProgress::new();
    let spinner = multi.add(create_spinner(&format!("Searching for bars in {}...", location)));
    let progress = multi.add(create_progress_bar());
    let start = Instant::now();
    let result = pipeline.run(&progress);
    progress.finish_and_clear();
    let bars = result.context("Failed to search Google Places")?;
    spinner.finish_with_message(format!(
        "Collected {} bars [{:.1}s]",
        bars.len(),
        start.elapsed().as_secs_f32()
    ));

    if bars.is_empty() {
        bail!("No bars found");
    }

    write_json(output_path, &bars)?;
    print_sample(&bars[0]);

    Ok(bars.len())
}

fn run_osm(args: &Args, file: &FileConfig, output_path: &Path, verbose: bool) -> Result<usize> {
    let mut overpass_config = file.overpass.clone().unwrap_or_default();
    overpass_config.require_name |= args.require_name;

    if verbose {
        println!("Configuration:");
        println!("  Source: OpenStreetMap (Overpass)");
        println!("  Endpoint: {}", overpass_config.url);
        println!("  Area: {}", overpass_config.area);
        println!("  Require name: {}", overpass_config.require_name);
        println!("  Output: {}", output_path.display());
        println!();
    }

    let spinner = create_spinner("Fetching bars from OpenStreetMap...");
    let start = Instant::now();
    let response =
        fetch_bars(&overpass_config).context("Failed to fetch bars from Overpass API")?;
    spinner.finish_with_message(format!(
        "Fetched {} bar elements [{:.1}s]",
        response.elements.len(),
        start.elapsed().as_secs_f32()
    ));

    let bars = parse_bars(&response, overpass_config.require_name);
    write_json(output_path, &bars)?;

    Ok(bars.len())
}

fn print_sample(bar: &BarRecord) {
    fn or_na(value: Option<&str>) -> &str {
        value.unwrap_or("N/A")
    }

    println!();
    println!("Sample bar data:");
    println!("  Name: {}", bar.name);
    println!("  Address: {}", or_na(bar.formatted_address.as_deref()));
    println!(
        "  Rating: {}",
        bar.rating
            .map(|r| r.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    );
    println!("  Phone: {}", or_na(bar.phone.as_deref()));
    println!("  Website: {}", or_na(bar.website.as_deref()));
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "barscout=debug"
    } else {
        "barscout=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("  [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=> "),
    );
    pb
}
