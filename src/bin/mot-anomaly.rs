use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use mot_anomaly::mot::Detection;
use mot_anomaly::pipeline::{Config, StreamPipeline};

#[derive(Parser, Debug)]
#[command(name = "mot-anomaly", about = "Track objects across frames and report traffic anomalies")]
struct Args {
    /// JSON lines file, one array of detections per frame
    #[arg(long, value_name = "PATH")]
    input: PathBuf,
    /// JSON config file; built-in defaults when omitted
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Print every frame report as a JSON line instead of plain findings
    #[arg(long)]
    json: bool,
}

fn parse_frame(line: &str) -> Result<Vec<Detection>> {
    serde_json::from_str(line).context("parsing detections")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    let reader = BufReader::new(
        File::open(&args.input).with_context(|| format!("opening {}", args.input.display()))?,
    );

    let mut stream = StreamPipeline::new(&config);
    let mut flagged = 0usize;
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading line {}", line_no + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let detections: Vec<Detection> = match parse_frame(&line) {
            Ok(detections) => detections,
            Err(err) => {
                warn!("Skipping line {}: {:#}", line_no + 1, err);
                continue;
            }
        };
        let report = match stream.process_frame(&detections) {
            Ok(report) => report,
            Err(err) => {
                warn!("Skipping line {}: {}", line_no + 1, err);
                continue;
            }
        };
        if report.has_findings() {
            flagged += 1;
        }
        if args.json {
            println!("{}", serde_json::to_string(&report)?);
        } else if report.has_findings() {
            println!("Frame {}: {}", report.frame, report.findings);
        }
    }
    info!(
        "Stream {} done: {} frames, {} with findings",
        stream.get_id(),
        stream.frames_seen(),
        flagged
    );
    Ok(())
}
