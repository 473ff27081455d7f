//! CLI definition and dispatch.

use chrono::Local;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::audit_log_adapter::AuditLogWriter;
use crate::adapters::csv_adapter::{CsvAdapter, CsvResultsWriter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{
    validate_model_config, validate_simulation_config, MODEL, SIMULATION,
};
use crate::domain::error::FxTraderError;
use crate::domain::matcher::DEFAULT_CONTRACT_SIZE;
use crate::domain::metrics::SessionMetrics;
use crate::domain::policy::{ActionPolicy, PredictorPolicy, RandomPolicy};
use crate::domain::regression::{self, Evaluation, RidgeModel, TrainingConfig};
use crate::domain::session::{
    run_session, SessionConfig, SessionOutcome, DEFAULT_NOTIONAL, DEFAULT_PROFIT_TARGET,
    DEFAULT_STOP_LOSS,
};
use crate::domain::signal::{predict_quote, Prediction, Quote};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::{PriceSource, TrainingSource};

pub const DEFAULT_DATA_FILE: &str = "forex_data.csv";
pub const DEFAULT_LOG_FILE: &str = "trading_log.txt";
pub const DEFAULT_RESULTS_FILE: &str = "trading_simulation_results.csv";

#[derive(Parser, Debug)]
#[command(name = "fxtrader", about = "Forex rate predictor and trading simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a simulated trading session over the price series
    Simulate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        /// random or model
        #[arg(long)]
        policy: Option<String>,
    },
    /// Fit the rate predictor and report its test-set error
    Fit {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Predict the next rate for a quote and print a BUY/SELL signal
    Signal {
        #[arg(short, long)]
        config: PathBuf,
        /// PAIR,Open,High,Low,Close (read from stdin when omitted)
        #[arg(short, long)]
        quote: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Simulate {
            config,
            data_dir,
            seed,
            policy,
        } => run_simulate(&config, data_dir, seed, policy),
        Command::Fit { config } => run_fit(&config),
        Command::Signal { config, quote } => run_signal(&config, quote),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, FxTraderError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

pub fn build_session_config(config: &dyn ConfigPort) -> SessionConfig {
    SessionConfig {
        notional: config.get_double(SIMULATION, "notional", DEFAULT_NOTIONAL),
        profit_target: config.get_double(SIMULATION, "profit_target", DEFAULT_PROFIT_TARGET),
        stop_loss: config.get_double(SIMULATION, "stop_loss", DEFAULT_STOP_LOSS),
        contract_size: config.get_double(SIMULATION, "contract_size", DEFAULT_CONTRACT_SIZE),
    }
}

pub fn build_training_config(config: &dyn ConfigPort) -> TrainingConfig {
    let defaults = TrainingConfig::default();
    TrainingConfig {
        ridge_alpha: config.get_double(MODEL, "ridge_alpha", defaults.ridge_alpha),
        test_fraction: config.get_double(MODEL, "test_fraction", defaults.test_fraction),
        split_seed: config
            .get_string(MODEL, "split_seed")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.split_seed),
    }
}

/// Files a session reads and writes, all relative to `data_dir`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationPaths {
    pub data_file: PathBuf,
    pub training_file: PathBuf,
    pub log_file: PathBuf,
    pub results_file: PathBuf,
}

pub fn resolve_paths(config: &dyn ConfigPort) -> Result<SimulationPaths, FxTraderError> {
    let data_dir = config
        .get_string(SIMULATION, "data_dir")
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| FxTraderError::ConfigMissing {
            section: SIMULATION.into(),
            key: "data_dir".into(),
        })?;

    let file = |section: &str, key: &str, default: &str| {
        data_dir.join(
            config
                .get_string(section, key)
                .unwrap_or_else(|| default.to_string()),
        )
    };

    Ok(SimulationPaths {
        data_file: file(SIMULATION, "data_file", DEFAULT_DATA_FILE),
        training_file: file(MODEL, "training_file", DEFAULT_DATA_FILE),
        log_file: file(SIMULATION, "log_file", DEFAULT_LOG_FILE),
        results_file: file(SIMULATION, "results_file", DEFAULT_RESULTS_FILE),
    })
}

pub fn resolve_seed(config: &dyn ConfigPort) -> Option<u64> {
    config
        .get_string(SIMULATION, "seed")
        .and_then(|s| s.trim().parse().ok())
}

pub fn train_model(config: &dyn ConfigPort) -> Result<(RidgeModel, Evaluation), FxTraderError> {
    let paths = resolve_paths(config)?;
    let rows = CsvAdapter::new(paths.training_file.clone()).load_training_rows()?;
    info!(
        path = %paths.training_file.display(),
        rows = rows.len(),
        "loaded training set"
    );
    regression::train(&rows, &build_training_config(config))
}

fn resolve_policy(config: &dyn ConfigPort) -> String {
    config
        .get_string(SIMULATION, "policy")
        .map(|p| p.trim().to_lowercase())
        .unwrap_or_else(|| "random".to_string())
}

fn build_policy(config: &dyn ConfigPort) -> Result<Box<dyn ActionPolicy>, FxTraderError> {
    match resolve_policy(config).as_str() {
        "model" => {
            let (model, evaluation) = train_model(config)?;
            info!(r2 = evaluation.r2, "using predictor policy");
            Ok(Box::new(PredictorPolicy::new(model)))
        }
        _ => match resolve_seed(config) {
            Some(seed) => {
                info!(seed, "using seeded random policy");
                Ok(Box::new(RandomPolicy::seeded(seed)))
            }
            None => Ok(Box::new(RandomPolicy::from_entropy())),
        },
    }
}

/// Load the series, run one session and persist the log and results.
///
/// The price series is read before anything is written, so a bad data source
/// leaves no files behind.
pub fn run_simulation(config: &dyn ConfigPort) -> Result<SessionOutcome, FxTraderError> {
    validate_simulation_config(config)?;
    if resolve_policy(config) == "model" {
        validate_model_config(config)?;
    }
    let paths = resolve_paths(config)?;
    let session_config = build_session_config(config);

    let samples = CsvAdapter::new(paths.data_file.clone()).load_samples()?;
    info!(
        path = %paths.data_file.display(),
        samples = samples.len(),
        "loaded price series"
    );
    if samples.is_empty() {
        warn!("price series is empty; session will exhaust immediately");
    }

    let mut policy = build_policy(config)?;
    let mut audit = AuditLogWriter::create(&paths.log_file)?;
    let mut results = CsvResultsWriter::create(&paths.results_file)?;

    run_session(
        &samples,
        policy.as_mut(),
        &session_config,
        Local::now().naive_local(),
        &mut audit,
        &mut results,
    )
}

fn run_simulate(
    config_path: &Path,
    data_dir: Option<PathBuf>,
    seed: Option<u64>,
    policy: Option<String>,
) -> Result<(), FxTraderError> {
    let mut config = load_config(config_path)?;
    config.set_override(
        SIMULATION,
        "data_dir",
        data_dir.map(|d| d.display().to_string()),
    );
    config.set_override(SIMULATION, "seed", seed.map(|s| s.to_string()));
    config.set_override(SIMULATION, "policy", policy);

    let session_config = build_session_config(&config);
    let outcome = run_simulation(&config)?;
    let paths = resolve_paths(&config)?;
    print_summary(&outcome, &session_config);
    eprintln!("\nAudit log written to: {}", paths.log_file.display());
    eprintln!("Results written to:   {}", paths.results_file.display());
    Ok(())
}

fn print_summary(outcome: &SessionOutcome, config: &SessionConfig) {
    let metrics = SessionMetrics::compute(config.notional, &outcome.trades);

    eprintln!("\n=== Session Results ===");
    eprintln!("Stop Reason:      {:?}", outcome.stop_reason);
    eprintln!("Samples:          {}", outcome.samples_processed);
    eprintln!("Final Balance:    {:.2}", outcome.final_balance);
    eprintln!("Total P&L:        {:.2}", metrics.total_pnl);
    eprintln!("Total Return:     {:.2}%", metrics.total_return * 100.0);
    eprintln!("Total Trades:     {}", metrics.total_trades);
    eprintln!("Win Rate:         {:.1}%", metrics.win_rate * 100.0);
    eprintln!("Profit Factor:    {:.2}", metrics.profit_factor);
    eprintln!("Largest Win:      {:.2}", metrics.largest_win);
    eprintln!("Largest Loss:     {:.2}", metrics.largest_loss);
    eprintln!("Max Drawdown:     -{:.2}%", metrics.max_drawdown * 100.0);
    eprintln!("Open Positions:   {}", outcome.open_positions);
}

fn run_fit(config_path: &Path) -> Result<(), FxTraderError> {
    let config = load_config(config_path)?;
    validate_model_config(&config)?;

    let (model, evaluation) = train_model(&config)?;
    eprintln!("\n=== Model Fit ===");
    eprintln!("Train Rows:       {}", evaluation.train_rows);
    eprintln!("Test Rows:        {}", evaluation.test_rows);
    eprintln!("Intercept:        {:.6}", model.intercept());
    eprintln!("Coefficients:     {:?}", model.coefficients());
    eprintln!("MSE:              {:.8}", evaluation.mse);
    eprintln!("MAE:              {:.8}", evaluation.mae);
    eprintln!("R2 Score:         {:.4}", evaluation.r2);
    Ok(())
}

/// Fit the predictor and score one operator quote. The quote is parsed
/// before any training happens.
pub fn predict_signal(config: &dyn ConfigPort, input: &str) -> Result<Prediction, FxTraderError> {
    let quote = Quote::parse(input)?;
    validate_model_config(config)?;
    let (model, _) = train_model(config)?;
    Ok(predict_quote(quote, &model))
}

fn run_signal(config_path: &Path, quote: Option<String>) -> Result<(), FxTraderError> {
    let config = load_config(config_path)?;

    let input = match quote {
        Some(q) => q,
        None => {
            eprintln!("Enter forex data (Format: PAIR,Open,High,Low,Close):");
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line
        }
    };

    let prediction = predict_signal(&config, &input)?;
    eprintln!("\n=== Forex Prediction Result ===");
    eprintln!("Currency Pair:    {}", prediction.quote.pair);
    eprintln!("Close:            {}", prediction.quote.close);
    eprintln!("Predicted Rate:   {:.5}", prediction.predicted_rate);
    println!("{}", prediction.signal);
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), FxTraderError> {
    let config = load_config(config_path)?;
    validate_simulation_config(&config)?;
    validate_model_config(&config)?;

    let session = build_session_config(&config);
    let paths = resolve_paths(&config)?;
    eprintln!("\nSimulation:");
    eprintln!("  notional:       {}", session.notional);
    eprintln!("  profit_target:  {}", session.profit_target);
    eprintln!("  stop_loss:      {}", session.stop_loss);
    eprintln!("  contract_size:  {}", session.contract_size);
    eprintln!("  data_file:      {}", paths.data_file.display());
    eprintln!("  log_file:       {}", paths.log_file.display());
    eprintln!("  results_file:   {}", paths.results_file.display());
    eprintln!("\nConfiguration is valid.");
    Ok(())
}
