use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::error::Error;
use std::time::Duration;

use archery_engine::api::{
    ApiConfig, ChartSelection, HttpArcheryApi, OfflineApi, SpineCalculationRequest, DEFAULT_API_BASE,
};
use archery_engine::compatibility::{find_best_spine_match, format_spine_display};
use archery_engine::energy::{foc_rating, kinetic_energy_rating, speed_rating};
use archery_engine::logging::setup_tracing;
use archery_engine::performance::{format_foc, format_kinetic_energy, format_momentum, format_speed};
use archery_engine::speed::estimate_speed_breakdown;
use archery_engine::{
    calculate_compatibility_score, calculate_live_preview, ArcheryError, ArrowMaterial, ArrowSpecification,
    ArrowSpineSpecification, BowConfiguration, BowType, PenetrationCategory, PerformanceEstimate, PerformanceSummary,
    SetupArrowConfig, SpineCalculationResult, SpineSource, SpineValue, TuningService,
};

#[derive(Parser)]
#[command(name = "archery")]
#[command(author = "Archery Engine Team")]
#[command(version)]
#[command(about = "Arrow performance and spine tuning calculator", long_about = None)]
struct Cli {
    /// Tuning service base URL
    #[arg(long, global = true, env = "ARCHERY_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Tuning service timeout (seconds)
    #[arg(long, global = true, env = "ARCHERY_API_TIMEOUT_SECS", default_value = "30")]
    api_timeout: u64,

    /// Never contact the tuning service, use local estimates only
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend an arrow spine for a bow
    Spine {
        #[command(flatten)]
        bow: BowArgs,

        /// Manufacturer chart to calculate against
        #[arg(long)]
        chart: Option<String>,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Estimate arrow speed
    Speed {
        #[command(flatten)]
        bow: BowArgs,

        /// Total arrow weight (grains)
        #[arg(short = 'g', long)]
        arrow_weight: f64,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Weight, speed, energy and FOC for a complete arrow setup
    Performance {
        #[command(flatten)]
        bow: BowArgs,

        #[command(flatten)]
        setup: SetupArgs,

        /// Ask the trajectory service for the performance summary
        #[arg(long)]
        trajectory: bool,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Score an arrow spine against a recommendation
    Compatibility {
        /// Arrow spine (e.g. 400 or 50#)
        #[arg(short = 'a', long)]
        arrow_spine: String,

        /// Recommended spine
        #[arg(short = 'r', long)]
        recommended: String,

        /// Bow type (compound, recurve, longbow, traditional, barebow)
        #[arg(short = 't', long, default_value = "compound", value_parser = parse_bow_type)]
        bow_type: BowType,

        /// Spine chart manufacturer
        #[arg(long, default_value = "generic")]
        manufacturer: String,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Pick the best spine from a list of candidates
    BestMatch {
        /// Recommended spine
        #[arg(short = 'r', long)]
        recommended: String,

        /// Candidate spines, comma separated
        #[arg(short = 's', long, value_delimiter = ',', required = true)]
        spines: Vec<String>,

        /// Bow type (compound, recurve, longbow, traditional, barebow)
        #[arg(short = 't', long, default_value = "compound", value_parser = parse_bow_type)]
        bow_type: BowType,

        /// Spine chart manufacturer
        #[arg(long, default_value = "generic")]
        manufacturer: String,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Display engine information
    Info,
}

#[derive(Args, Debug, Clone)]
struct BowArgs {
    /// Draw weight (lbs)
    #[arg(short = 'w', long, default_value = "50")]
    draw_weight: f64,

    /// Draw length (inches)
    #[arg(short = 'l', long, default_value = "28")]
    draw_length: f64,

    /// Bow type (compound, recurve, longbow, traditional, barebow)
    #[arg(short = 't', long, default_value = "compound", value_parser = parse_bow_type)]
    bow_type: BowType,

    /// IBO speed rating (fps)
    #[arg(long)]
    ibo_speed: Option<f64>,

    /// Arrow material (carbon, aluminum, wood, fiberglass, carbon-aluminum)
    #[arg(short = 'm', long, default_value = "carbon", value_parser = parse_material)]
    material: ArrowMaterial,

    /// Point weight (grains)
    #[arg(short = 'p', long, default_value = "100")]
    point_weight: f64,

    /// Arrow length (inches)
    #[arg(long, default_value = "29")]
    arrow_length: f64,
}

impl From<&BowArgs> for BowConfiguration {
    fn from(args: &BowArgs) -> Self {
        BowConfiguration {
            draw_weight: args.draw_weight,
            draw_length: args.draw_length,
            bow_type: args.bow_type,
            ibo_speed: args.ibo_speed,
            arrow_material: args.material,
            point_weight: args.point_weight,
            arrow_length: args.arrow_length,
        }
    }
}

#[derive(Args, Debug, Clone)]
struct SetupArgs {
    /// Shaft weight (grains per inch)
    #[arg(long)]
    gpi: Option<f64>,

    /// Selected spine
    #[arg(long)]
    spine: Option<String>,

    /// Insert weight (grains)
    #[arg(long, default_value = "0")]
    insert_weight: f64,

    /// Nock weight (grains)
    #[arg(long, default_value = "10")]
    nock_weight: f64,

    /// Fletching weight (grains)
    #[arg(long, default_value = "15")]
    fletching_weight: f64,

    /// Bushing weight (grains)
    #[arg(long, default_value = "0")]
    bushing_weight: f64,

    /// Saved setup id, used for the chronograph lookup
    #[arg(long)]
    setup_id: Option<i64>,

    /// Saved arrow id, used for the chronograph lookup
    #[arg(long)]
    arrow_id: Option<i64>,
}

impl SetupArgs {
    fn to_setup(&self, bow: &BowArgs) -> SetupArrowConfig {
        SetupArrowConfig {
            arrow_length: bow.arrow_length,
            point_weight: bow.point_weight,
            nock_weight: self.nock_weight,
            insert_weight: self.insert_weight,
            bushing_weight: self.bushing_weight,
            fletching_weight: self.fletching_weight,
            calculated_spine: self.spine.as_deref().map(parse_spine),
            gpi_weight: self.gpi,
            setup_id: self.setup_id,
            arrow_id: self.arrow_id,
        }
    }
}

/// Catalog-less arrow: the shaft weight comes from `--gpi` or the material
fn uncataloged_arrow(bow: &BowArgs) -> ArrowSpecification {
    ArrowSpecification {
        material: Some(bow.material),
        ..Default::default()
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Table,
}

#[derive(Debug, Serialize)]
struct SpeedReport {
    speed_fps: f64,
    rating: &'static str,
    ibo_speed: f64,
    weight_adjustment: f64,
    length_adjustment: f64,
    weight_ratio: f64,
    bow_efficiency: f64,
}

#[derive(Debug, Serialize)]
struct PerformanceReport {
    #[serde(flatten)]
    estimate: PerformanceEstimate,
    speed_rating: &'static str,
    kinetic_energy_rating: &'static str,
    foc_rating: &'static str,
    penetration_category: PenetrationCategory,
}

fn parse_bow_type(s: &str) -> Result<BowType, String> {
    BowType::from_str(s).ok_or_else(|| format!("Invalid bow type: {}", s))
}

fn parse_material(s: &str) -> Result<ArrowMaterial, String> {
    ArrowMaterial::from_str(s).ok_or_else(|| format!("Invalid arrow material: {}", s))
}

/// Plain numbers become numeric spines, anything else is kept as text
fn parse_spine(s: &str) -> SpineValue {
    match s.trim().parse::<f64>() {
        Ok(value) => SpineValue::Numeric(value),
        Err(_) => SpineValue::Text(s.trim().to_string()),
    }
}

fn box_top(title: &str) {
    println!("╔════════════════════════════════════════╗");
    println!("║ {:^38} ║", title);
    println!("╠════════════════════════════════════════╣");
}

fn box_row(label: &str, value: impl std::fmt::Display) {
    println!("║ {:<18}{:>20} ║", label, value.to_string());
}

fn box_divider() {
    println!("╠════════════════════════════════════════╣");
}

fn box_bottom() {
    println!("╚════════════════════════════════════════╝");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    setup_tracing();

    let cli = Cli::parse();
    let config = ApiConfig::new(cli.api_base.clone()).with_timeout(Duration::from_secs(cli.api_timeout));

    match cli.command {
        Commands::Spine { bow, chart, output } => {
            let bow = BowConfiguration::from(&bow);
            let request = SpineCalculationRequest {
                bow: bow.clone(),
                chart: ChartSelection {
                    manufacturer: chart,
                    chart_id: None,
                },
            };
            let result = if cli.offline {
                TuningService::new(OfflineApi).recommend_spine_with_chart(request).await
            } else {
                TuningService::new(HttpArcheryApi::new(config)?)
                    .recommend_spine_with_chart(request)
                    .await
            };

            display_spine(&bow, &result, output)?;
        }

        Commands::Speed { bow, arrow_weight, output } => {
            let bow = BowConfiguration::from(&bow);
            let breakdown = estimate_speed_breakdown(&bow, arrow_weight)
                .ok_or_else(|| ArcheryError::InvalidInput(format!("arrow weight must be positive, got {}", arrow_weight)))?;

            let report = SpeedReport {
                speed_fps: breakdown.speed_fps,
                rating: speed_rating(breakdown.speed_fps),
                ibo_speed: breakdown.ibo_speed,
                weight_adjustment: breakdown.weight_adjustment,
                length_adjustment: breakdown.length_adjustment,
                weight_ratio: breakdown.weight_ratio,
                bow_efficiency: breakdown.bow_efficiency,
            };

            display_speed(&report, output)?;
        }

        Commands::Performance { bow: bow_args, setup: setup_args, trajectory, output } => {
            let bow = BowConfiguration::from(&bow_args);
            let setup = setup_args.to_setup(&bow_args);
            let arrow = uncataloged_arrow(&bow_args);

            if trajectory && !cli.offline {
                let service = TuningService::new(HttpArcheryApi::new(config)?);
                let data = service.calculate_trajectory(&arrow, &setup, &bow, None, None).await;
                display_summary(&data.performance_summary, output)?;
            } else {
                let estimate = calculate_live_preview(&arrow, &bow, &setup);
                let report = PerformanceReport {
                    speed_rating: speed_rating(estimate.estimated_speed_fps),
                    kinetic_energy_rating: kinetic_energy_rating(estimate.kinetic_energy_initial),
                    foc_rating: foc_rating(estimate.foc_percentage),
                    penetration_category: estimate.penetration_category(),
                    estimate,
                };
                display_performance(&report, output)?;
            }
        }

        Commands::Compatibility { arrow_spine, recommended, bow_type, manufacturer, output } => {
            let arrow_spine = parse_spine(&arrow_spine);
            let recommended = parse_spine(&recommended);
            let result = calculate_compatibility_score(&arrow_spine, &recommended, bow_type, &manufacturer);

            match output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Csv => {
                    println!("arrow_spine,recommended_spine,score,in_tolerance,explanation");
                    println!(
                        "{},{},{},{},\"{}\"",
                        arrow_spine, recommended, result.score, result.in_tolerance, result.explanation
                    );
                }
                OutputFormat::Table => {
                    box_top("SPINE COMPATIBILITY");
                    box_row("Arrow Spine:", format_spine_display(&arrow_spine));
                    box_row("Recommended:", format_spine_display(&recommended));
                    box_row("Bow Type:", bow_type);
                    box_divider();
                    box_row("Score:", format!("{}/100", result.score));
                    box_row("In Tolerance:", if result.in_tolerance { "yes" } else { "no" });
                    box_bottom();
                    println!("{}", result.explanation);
                }
            }
        }

        Commands::BestMatch { recommended, spines, bow_type, manufacturer, output } => {
            let recommended = parse_spine(&recommended);
            let specs: Vec<ArrowSpineSpecification> = spines
                .iter()
                .map(|spine| ArrowSpineSpecification {
                    spine: parse_spine(spine),
                    outer_diameter: 0.0,
                    gpi_weight: 0.0,
                    inner_diameter: None,
                })
                .collect();

            let best = find_best_spine_match(&specs, &recommended, bow_type, &manufacturer);

            match (output, best) {
                (OutputFormat::Json, best) => println!("{}", serde_json::to_string_pretty(&best)?),
                (OutputFormat::Csv, best) => {
                    println!("best_spine,score,explanation");
                    if let Some(best) = best {
                        println!("{},{},\"{}\"", best.best_spine, best.compatibility.score, best.compatibility.explanation);
                    }
                }
                (OutputFormat::Table, Some(best)) => {
                    box_top("BEST SPINE MATCH");
                    box_row("Recommended:", format_spine_display(&recommended));
                    box_row("Candidates:", specs.len());
                    box_divider();
                    box_row("Best Spine:", format_spine_display(&best.best_spine));
                    box_row("Score:", format!("{}/100", best.compatibility.score));
                    box_bottom();
                    println!("{}", best.compatibility.explanation);
                }
                (OutputFormat::Table, None) => {
                    println!("No usable spine among the candidates");
                }
            }
        }

        Commands::Info => {
            println!("╔════════════════════════════════════════╗");
            println!("║ {:^38} ║", format!("ARCHERY ENGINE v{}", env!("CARGO_PKG_VERSION")));
            println!("╠════════════════════════════════════════╣");
            println!("║ Arrow performance estimation and       ║");
            println!("║ spine compatibility for bow tuning.    ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Features:                              ║");
            println!("║ • Spine recommendation with fallback   ║");
            println!("║ • IBO-based arrow speed estimation     ║");
            println!("║ • Kinetic energy, momentum and FOC     ║");
            println!("║ • Spine compatibility scoring          ║");
            println!("║ • Multiple output formats              ║");
            println!("╠════════════════════════════════════════╣");
            box_row("Tuning service:", if cli.offline { "offline".to_string() } else { config.base_url.clone() });
            box_bottom();
        }
    }

    Ok(())
}

fn display_spine(bow: &BowConfiguration, result: &SpineCalculationResult, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }

        OutputFormat::Csv => {
            println!("metric,value");
            println!("recommended_spine,{}", result.recommended_spine);
            println!("spine_min,{}", result.spine_range.min);
            println!("spine_max,{}", result.spine_range.max);
            println!("source,{}", result.source);
        }

        OutputFormat::Table => {
            box_top("SPINE RECOMMENDATION");
            box_row("Draw Weight:", format!("{} lbs", bow.draw_weight));
            box_row("Arrow Length:", format!("{} in", bow.arrow_length));
            box_row("Point Weight:", format!("{} gr", bow.point_weight));
            box_row("Bow Type:", bow.bow_type);
            box_row("Material:", bow.arrow_material);
            box_divider();
            box_row("Recommended:", format_spine_display(&result.recommended_spine));
            box_row(
                "Range:",
                format!("{} - {}", result.spine_range.min, result.spine_range.max),
            );
            box_bottom();

            if result.source == SpineSource::Fallback {
                println!("Note: tuning service unavailable, this is a local approximation.");
            }
        }
    }

    Ok(())
}

fn display_speed(report: &SpeedReport, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),

        OutputFormat::Csv => {
            println!("metric,value");
            println!("speed_fps,{:.1}", report.speed_fps);
            println!("ibo_speed,{:.1}", report.ibo_speed);
            println!("weight_adjustment,{:.2}", report.weight_adjustment);
            println!("length_adjustment,{:.2}", report.length_adjustment);
            println!("weight_ratio,{:.4}", report.weight_ratio);
            println!("bow_efficiency,{:.2}", report.bow_efficiency);
        }

        OutputFormat::Table => {
            box_top("SPEED ESTIMATE");
            box_row("IBO Speed:", format_speed(report.ibo_speed));
            box_row("Draw Weight Adj:", format!("{:+.1} fps", report.weight_adjustment));
            box_row("Draw Length Adj:", format!("{:+.1} fps", report.length_adjustment));
            box_row("Weight Ratio:", format!("{:.4}", report.weight_ratio));
            box_row("Efficiency:", format!("{:.2}", report.bow_efficiency));
            box_divider();
            box_row("Arrow Speed:", format_speed(report.speed_fps));
            box_row("Rating:", report.rating);
            box_bottom();
        }
    }

    Ok(())
}

fn display_performance(report: &PerformanceReport, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    let estimate = &report.estimate;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),

        OutputFormat::Csv => {
            println!("metric,value");
            println!("total_weight,{:.1}", estimate.total_weight);
            println!("estimated_speed_fps,{:.1}", estimate.estimated_speed_fps);
            println!("kinetic_energy_initial,{:.2}", estimate.kinetic_energy_initial);
            println!("kinetic_energy_40yd,{:.2}", estimate.kinetic_energy_40yd);
            println!("momentum,{:.4}", estimate.momentum);
            println!("foc_percentage,{:.1}", estimate.foc_percentage);
            println!("performance_score,{}", estimate.performance_score);
        }

        OutputFormat::Table => {
            box_top("ARROW PERFORMANCE");
            box_row("Total Weight:", format!("{:.1} gr", estimate.total_weight));
            box_row("Speed:", format_speed(estimate.estimated_speed_fps));
            box_row("Kinetic Energy:", format_kinetic_energy(estimate.kinetic_energy_initial));
            box_row("KE at 40 yd:", format_kinetic_energy(estimate.kinetic_energy_40yd));
            box_row("Momentum:", format_momentum(estimate.momentum));
            box_row("FOC:", format_foc(estimate.foc_percentage));
            box_divider();
            box_row("Speed Rating:", report.speed_rating);
            box_row("Energy Rating:", report.kinetic_energy_rating);
            box_row("FOC Rating:", report.foc_rating);
            box_row("Penetration:", report.penetration_category.description());
            box_row("Score:", format!("{}/100", estimate.performance_score));
            box_bottom();
        }
    }

    Ok(())
}

fn display_summary(summary: &PerformanceSummary, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summary)?),

        OutputFormat::Csv => {
            println!("metric,value");
            println!("estimated_speed_fps,{:.1}", summary.estimated_speed_fps);
            println!("total_arrow_weight,{:.1}", summary.total_arrow_weight);
            println!("kinetic_energy_initial,{:.2}", summary.kinetic_energy_initial);
            println!("kinetic_energy_40yd,{:.2}", summary.kinetic_energy_40yd);
            println!("foc_percentage,{:.1}", summary.foc_percentage);
            println!("penetration_category,{}", summary.penetration_category);
            println!("momentum,{:.4}", summary.momentum);
            println!("speed_source,{}", summary.speed_source);
        }

        OutputFormat::Table => {
            box_top("TRAJECTORY SUMMARY");
            box_row("Speed:", format_speed(summary.estimated_speed_fps));
            box_row("Speed Source:", summary.speed_source.label());
            box_row("Total Weight:", format!("{:.1} gr", summary.total_arrow_weight));
            box_row("Kinetic Energy:", format_kinetic_energy(summary.kinetic_energy_initial));
            box_row("KE at 40 yd:", format_kinetic_energy(summary.kinetic_energy_40yd));
            box_row("Momentum:", format_momentum(summary.momentum));
            box_row("FOC:", format_foc(summary.foc_percentage));
            box_row("Penetration:", &summary.penetration_category);
            box_bottom();
        }
    }

    Ok(())
}
