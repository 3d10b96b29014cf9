use clap::Parser;
use snakefilter::io::{load_mask, save_labels_png};
use snakefilter::{
    AcceptedSnake, FilterConfig, FilterOutcome, Footprint, ImageContext, ImageRepo,
    RejectedSnake, SnakeCandidate, SnakeFilter,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Snake filter CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output (per-candidate decisions at debug level).
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct StarsJson {
    points: usize,
}

impl Default for StarsJson {
    fn default() -> Self {
        Self {
            points: FilterConfig::default().star_points,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SegmentationJson {
    min_avg_inner_darkness: f64,
    max_area: f64,
    min_area: f64,
    max_overlap: f64,
    max_free_border: f64,
    avg_cell_diameter: f64,
    stars: StarsJson,
}

impl Default for SegmentationJson {
    fn default() -> Self {
        let cfg = FilterConfig::default();
        Self {
            min_avg_inner_darkness: cfg.min_avg_inner_darkness,
            max_area: cfg.max_area,
            min_area: cfg.min_area,
            max_overlap: cfg.max_overlap,
            max_free_border: cfg.max_free_border,
            avg_cell_diameter: cfg.avg_cell_diameter,
            stars: StarsJson::default(),
        }
    }
}

impl From<SegmentationJson> for FilterConfig {
    fn from(value: SegmentationJson) -> Self {
        Self {
            min_avg_inner_darkness: value.min_avg_inner_darkness,
            max_area: value.max_area,
            min_area: value.min_area,
            max_overlap: value.max_overlap,
            max_free_border: value.max_free_border,
            avg_cell_diameter: value.avg_cell_diameter,
            star_points: value.stars.points,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    mask_path: Option<String>,
    cell_content_path: String,
    candidates_path: String,
    output_path: Option<String>,
    segmentation_path: Option<String>,
    parallel: bool,
    segmentation: SegmentationJson,
}

#[derive(Debug, Deserialize)]
struct FootprintJson {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct CandidateJson {
    rank: f64,
    area: Option<f64>,
    avg_inner_darkness: Option<f64>,
    #[serde(default)]
    max_contiguous_free_border: usize,
    footprint: FootprintJson,
}

impl CandidateJson {
    /// Builds a candidate, measuring area and darkness when the file omits them.
    fn into_candidate(self, repo: &ImageRepo) -> snakefilter::SnakeFilterResult<SnakeCandidate> {
        let fp = self.footprint;
        let footprint = Footprint::new(fp.x, fp.y, fp.width, fp.height, fp.pixels)?;
        match (self.area, self.avg_inner_darkness) {
            (Some(area), Some(darkness)) => Ok(SnakeCandidate::new(
                self.rank,
                area,
                darkness,
                self.max_contiguous_free_border,
                footprint,
            )),
            _ => SnakeCandidate::from_footprint(
                self.rank,
                footprint,
                repo.cell_content_mask(),
                self.max_contiguous_free_border,
            ),
        }
    }
}

#[derive(Debug, Serialize)]
struct AcceptedRecord {
    index: usize,
    label: i32,
    rank: f64,
    area: f64,
    avg_inner_darkness: f64,
    max_contiguous_free_border: usize,
    original_area: f64,
}

impl From<&AcceptedSnake> for AcceptedRecord {
    fn from(value: &AcceptedSnake) -> Self {
        Self {
            index: value.index,
            label: value.label,
            rank: value.rank,
            area: value.area,
            avg_inner_darkness: value.avg_inner_darkness,
            max_contiguous_free_border: value.max_contiguous_free_border,
            original_area: value.original_area,
        }
    }
}

#[derive(Debug, Serialize)]
struct RejectedRecord {
    index: usize,
    rank: f64,
    reason: &'static str,
    detail: String,
}

impl From<&RejectedSnake> for RejectedRecord {
    fn from(value: &RejectedSnake) -> Self {
        Self {
            index: value.index,
            rank: value.rank,
            reason: value.reason.reason(),
            detail: value.reason.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    accepted: Vec<AcceptedRecord>,
    rejected: Vec<RejectedRecord>,
    stopped_at: Option<usize>,
}

impl From<&FilterOutcome> for Output {
    fn from(value: &FilterOutcome) -> Self {
        Self {
            accepted: value.accepted.iter().map(AcceptedRecord::from).collect(),
            rejected: value.rejected.iter().map(RejectedRecord::from).collect(),
            stopped_at: value.stopped_at,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("snakefilter=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.cell_content_path.is_empty() || config.candidates_path.is_empty() {
        return Err("cell_content_path and candidates_path must be set in the config".into());
    }

    let cell_content = load_mask(&config.cell_content_path)?;
    let repo = match &config.mask_path {
        Some(path) => ImageRepo::new(load_mask(path)?, cell_content)?,
        None => ImageRepo::unmasked(cell_content)?,
    };

    let candidates_text = fs::read_to_string(&config.candidates_path)?;
    let raw: Vec<CandidateJson> = serde_json::from_str(&candidates_text)?;
    let candidates = raw
        .into_iter()
        .map(|c| c.into_candidate(&repo))
        .collect::<Result<Vec<_>, _>>()?;

    let filter = SnakeFilter::new(config.segmentation.into())?;
    let outcome = if config.parallel {
        filter.filter_par(&repo, &candidates)?
    } else {
        filter.filter(&repo, &candidates)?
    };
    tracing::info!(
        accepted = outcome.accepted.len(),
        candidates = candidates.len(),
        "filter finished"
    );

    let json = serde_json::to_string_pretty(&Output::from(&outcome))?;
    if let Some(path) = &config.segmentation_path {
        save_labels_png(&outcome.segmentation, path)?;
    }

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{CandidateJson, Config, EXAMPLE_JSON};
    use snakefilter::FilterConfig;

    #[test]
    fn example_config_parses_external_keys() {
        let config: Config = serde_json::from_str(EXAMPLE_JSON).unwrap();
        let cfg: FilterConfig = config.segmentation.into();
        assert_eq!(cfg.star_points, 36);
        assert!((cfg.max_overlap - 0.3).abs() < 1e-12);
        assert!(cfg.validate().is_ok());
        assert!(!config.parallel);
    }

    #[test]
    fn missing_segmentation_keys_use_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"cell_content_path": "c.png", "candidates_path": "s.json",
                "segmentation": {"maxOverlap": 0.1, "stars": {}}}"#,
        )
        .unwrap();
        let cfg: FilterConfig = config.segmentation.into();
        assert!((cfg.max_overlap - 0.1).abs() < 1e-12);
        assert_eq!(cfg.star_points, FilterConfig::default().star_points);
        assert!(config.mask_path.is_none());
    }

    #[test]
    fn candidate_json_accepts_optional_metrics() {
        let raw: Vec<CandidateJson> = serde_json::from_str(
            r#"[{"rank": 1.5, "footprint": {"x": 0, "y": 0, "width": 2, "height": 1, "pixels": [1, 1]}},
                {"rank": 2.0, "area": 3.0, "avg_inner_darkness": 0.5, "max_contiguous_free_border": 4,
                 "footprint": {"x": 1, "y": 1, "width": 1, "height": 1, "pixels": [1]}}]"#,
        )
        .unwrap();
        assert_eq!(raw.len(), 2);
        assert!(raw[0].area.is_none());
        assert_eq!(raw[1].max_contiguous_free_border, 4);
    }
}
