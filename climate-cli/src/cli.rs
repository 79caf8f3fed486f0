use std::{
    collections::BTreeMap,
    fs,
    io::Read,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use climate_core::{
    ClimateObservation, ClimateReport, Config, ExplainRequest, RiskTier, ScoreResult, TargetGroup,
    explain::explain,
    explainer_from_config, guide, rank_regions, regions,
    score::{FactorBreakdown, factor_scores},
    score_observation,
};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use tracing::{debug, info};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "climate", version, about = "Gyeonggi perceived climate risk CLI")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the text-generation API key and defaults.
    Configure,

    /// List the supported Gyeonggi districts.
    Regions,

    /// Score an observation without a region.
    Score {
        #[command(flatten)]
        observation: ObservationArgs,

        /// Target group: general, elderly, child or outdoor_worker.
        #[arg(long)]
        target: Option<String>,

        /// Include the per-factor sub-scores.
        #[arg(long)]
        factors: bool,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Score an observation for a district, optionally with an explanation.
    Assess {
        /// District name (e.g. 수원시) or administrative code (e.g. 41110).
        region: String,

        #[command(flatten)]
        observation: ObservationArgs,

        /// Target group: general, elderly, child or outdoor_worker.
        #[arg(long)]
        target: Option<String>,

        /// Add an explanation and action guides.
        #[arg(long)]
        explain: bool,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Score many districts from one JSON map and list them riskiest first.
    Map {
        /// JSON object of district name or code to observation, or "-" for stdin.
        #[arg(long, short)]
        input: PathBuf,

        /// Target group applied to every district.
        #[arg(long)]
        target: Option<String>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Show action guides for a risk tier.
    Guide {
        /// safe, caution, warning or danger.
        tier: String,

        /// Target group: general, elderly, child or outdoor_worker.
        #[arg(long)]
        target: Option<String>,
    },
}

/// Observation fields; any flag overrides the same field read from `--input`.
#[derive(Debug, Default, Args)]
pub struct ObservationArgs {
    /// JSON observation file, or "-" for stdin.
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// Air temperature, °C.
    #[arg(long, allow_hyphen_values = true)]
    pub temperature: Option<f64>,

    /// Feels-like temperature, °C. Estimated when absent.
    #[arg(long, allow_hyphen_values = true)]
    pub apparent_temperature: Option<f64>,

    /// Relative humidity, %.
    #[arg(long)]
    pub humidity: Option<f64>,

    /// PM10, µg/m³.
    #[arg(long)]
    pub pm10: Option<f64>,

    /// PM2.5, µg/m³.
    #[arg(long)]
    pub pm25: Option<f64>,

    #[arg(long)]
    pub uv_index: Option<f64>,

    /// Land surface temperature, °C.
    #[arg(long, allow_hyphen_values = true)]
    pub surface_temperature: Option<f64>,

    /// Wind speed, m/s.
    #[arg(long)]
    pub wind_speed: Option<f64>,

    /// Precipitation, mm.
    #[arg(long)]
    pub precipitation: Option<f64>,
}

impl ObservationArgs {
    pub fn into_observation(self) -> Result<ClimateObservation> {
        let base = match &self.input {
            Some(path) => read_observation(path)?,
            None => ClimateObservation::default(),
        };

        Ok(self.merge_into(base))
    }

    fn merge_into(self, base: ClimateObservation) -> ClimateObservation {
        ClimateObservation {
            temperature: self.temperature.or(base.temperature),
            apparent_temperature: self.apparent_temperature.or(base.apparent_temperature),
            humidity: self.humidity.or(base.humidity),
            pm10: self.pm10.or(base.pm10),
            pm25: self.pm25.or(base.pm25),
            uv_index: self.uv_index.or(base.uv_index),
            surface_temperature: self.surface_temperature.or(base.surface_temperature),
            wind_speed: self.wind_speed.or(base.wind_speed),
            precipitation: self.precipitation.or(base.precipitation),
        }
    }
}

/// Contents of `path`, or stdin when it is "-".
fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read input from stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))
    }
}

fn read_observation(path: &Path) -> Result<ClimateObservation> {
    serde_json::from_str(&read_input(path)?)
        .with_context(|| format!("Failed to parse observation JSON: {}", path.display()))
}

fn parse_observation_map(contents: &str) -> Result<BTreeMap<String, ClimateObservation>> {
    serde_json::from_str(contents)
        .context("Failed to parse district map: expected an object of district to observation")
}

/// Explicit `--target` wins; otherwise the configured default, if any.
fn resolve_target(explicit: Option<&str>, config: &Config) -> Result<Option<TargetGroup>> {
    match explicit {
        Some(name) => Ok(Some(TargetGroup::try_from(name)?)),
        None => config.default_target_group(),
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Regions => {
                for r in regions() {
                    println!("{}  {:<8} ({:.4}, {:.4})", r.code, r.name, r.lat, r.lng);
                }
                Ok(())
            }
            Command::Score { observation, target, factors, json } => {
                let config = Config::load()?;
                let target = resolve_target(target.as_deref(), &config)?;
                let observation = observation.into_observation()?;
                debug!(?observation, ?target, "scoring observation");

                let result = score_observation(&observation, target);
                let breakdown = factors.then(|| factor_scores(&observation));
                if json {
                    let value = score_json(&result, breakdown.as_ref())?;
                    println!("{}", serde_json::to_string_pretty(&value)?);
                } else {
                    print_score(&result, target);
                    if let Some(breakdown) = &breakdown {
                        print_factors(breakdown);
                    }
                }
                Ok(())
            }
            Command::Assess { region, observation, target, explain: with_explanation, json } => {
                let config = Config::load()?;
                let target = resolve_target(target.as_deref(), &config)?;
                let observation = observation.into_observation()?;

                let mut report = ClimateReport::for_region(&region, observation, target)?;
                info!(region = %report.region, score = report.result.displayed_score(), tier = %report.result.risk_tier, "assessed region");

                if with_explanation {
                    let explainer = explainer_from_config(&config)?;
                    let request = ExplainRequest::from_report(&report);
                    let explanation = explain(explainer.as_ref(), &request).await?;
                    report = report.with_explanation(explanation);
                }

                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print_report(&report);
                }
                Ok(())
            }
            Command::Map { input, target, json } => {
                let config = Config::load()?;
                let target = resolve_target(target.as_deref(), &config)?;
                let observations = parse_observation_map(&read_input(&input)?)?;

                let reports = rank_regions(observations, target)?;
                info!(districts = reports.len(), ?target, "ranked districts");

                if json {
                    println!("{}", serde_json::to_string_pretty(&reports)?);
                } else {
                    print_ranking(&reports);
                }
                Ok(())
            }
            Command::Guide { tier, target } => {
                let tier = RiskTier::try_from(tier.as_str())?;
                let target = match target {
                    Some(name) => TargetGroup::try_from(name.as_str())?,
                    None => TargetGroup::default(),
                };

                println!("{} ({}) / {}", tier.label(), tier, target.label());
                for line in guide::action_guides(tier, target) {
                    println!("  - {line}");
                }
                Ok(())
            }
        }
    }
}

fn print_score(result: &ScoreResult, target: Option<TargetGroup>) {
    println!("Score:      {} ({})", result.base_score, result.base_tier());
    if let (Some(adjusted), Some(target)) = (result.adjusted_score, target) {
        println!(
            "Adjusted:   {} for {} (x{})",
            adjusted,
            target.label(),
            target.multiplier()
        );
    }
    println!("Risk tier:  {} ({})", result.risk_tier.label(), result.risk_tier);
}

/// Score JSON, with a `factors` object when a breakdown is given.
fn score_json(result: &ScoreResult, factors: Option<&FactorBreakdown>) -> Result<serde_json::Value> {
    let mut value = serde_json::to_value(result)?;
    if let (Some(factors), Some(fields)) = (factors, value.as_object_mut()) {
        fields.insert("factors".to_string(), serde_json::to_value(factors)?);
    }
    Ok(value)
}

fn print_factors(breakdown: &FactorBreakdown) {
    println!("Factors:");
    println!("  apparent temperature  {:>5.1} / 40", breakdown.apparent_temperature);
    println!("  pm10                  {:>5.1} / 20", breakdown.pm10);
    println!("  pm2.5                 {:>5.1} / 15", breakdown.pm25);
    println!("  humidity              {:>5.1} / 10", breakdown.humidity);
    println!("  uv index              {:>5.1} / 10", breakdown.uv_index);
    println!("  surface               {:>5.1} / 5", breakdown.surface);
}

fn print_ranking(reports: &[ClimateReport]) {
    for (rank, report) in reports.iter().enumerate() {
        println!(
            "{:>2}. {:<8} [{}] {:>3}  {}",
            rank + 1,
            report.region,
            report.code,
            report.result.displayed_score(),
            report.risk_label,
        );
    }
}

fn print_report(report: &ClimateReport) {
    println!("{} [{}] ({:.4}, {:.4})", report.region, report.code, report.lat, report.lng);
    print_score(&report.result, report.target);

    if let Some(explanation) = &report.explanation {
        println!();
        println!("{}", explanation.explanation);
        for line in &explanation.action_guides {
            println!("  - {line}");
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("Text-generation API key (leave empty to keep current):")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }

    let model = Text::new("Model:")
        .with_default(&config.text_generation.model)
        .prompt()
        .context("Failed to read model name")?;
    config.text_generation.model = model;

    let options: Vec<&str> = TargetGroup::all().iter().map(|t| t.as_str()).collect();
    let target = Select::new("Default target group:", options)
        .prompt()
        .context("Failed to read default target group")?;
    config.set_default_target(TargetGroup::try_from(target)?);

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    println!("{}", text_generation_status(&config));
    Ok(())
}

fn text_generation_status(config: &Config) -> &'static str {
    if config.is_text_generation_configured() {
        "Text generation: enabled (falls back to templates on failure)"
    } else {
        "Text generation: disabled, template explanations will be used"
    }
}
