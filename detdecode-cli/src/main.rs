use clap::Parser;
use detdecode::io::load_tensor_file;
use detdecode::labels::coco_label;
use detdecode::{
    Activation, CoordinateSpace, DecodeConfig, Decoder, Detection, ImageSize, ResizeMode,
    ScoreMode, TensorLayout,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Decode raw detection tensors (JSON config driven)")]
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
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum LayoutConfig {
    #[default]
    CandidateMajor,
    AttributeMajor,
}

impl From<LayoutConfig> for TensorLayout {
    fn from(value: LayoutConfig) -> Self {
        match value {
            LayoutConfig::CandidateMajor => TensorLayout::CandidateMajor,
            LayoutConfig::AttributeMajor => TensorLayout::AttributeMajor,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ScoreModeConfig {
    ObjectnessTimesClass,
    ClassOnly,
}

impl From<ScoreModeConfig> for ScoreMode {
    fn from(value: ScoreModeConfig) -> Self {
        match value {
            ScoreModeConfig::ObjectnessTimesClass => ScoreMode::ObjectnessTimesClass,
            ScoreModeConfig::ClassOnly => ScoreMode::ClassOnly,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ActivationConfig {
    None,
    Sigmoid,
}

impl From<ActivationConfig> for Activation {
    fn from(value: ActivationConfig) -> Self {
        match value {
            ActivationConfig::None => Activation::None,
            ActivationConfig::Sigmoid => Activation::Sigmoid,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ResizeConfig {
    Stretch,
    Letterbox,
}

impl From<ResizeConfig> for ResizeMode {
    fn from(value: ResizeConfig) -> Self {
        match value {
            ResizeConfig::Stretch => ResizeMode::Stretch,
            ResizeConfig::Letterbox => ResizeMode::Letterbox,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum CoordinatesConfig {
    Pixels,
    Normalized,
}

impl From<CoordinatesConfig> for CoordinateSpace {
    fn from(value: CoordinatesConfig) -> Self {
        match value {
            CoordinatesConfig::Pixels => CoordinateSpace::Pixels,
            CoordinatesConfig::Normalized => CoordinateSpace::Normalized,
        }
    }
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
enum LabelsConfig {
    #[default]
    Coco,
    None,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DecodeConfigJson {
    confidence_threshold: f32,
    iou_threshold: f32,
    max_detections: usize,
    model_input_size: [u32; 2],
    num_classes: usize,
    score_mode: ScoreModeConfig,
    activation: ActivationConfig,
    resize: ResizeConfig,
    coordinates: CoordinatesConfig,
    expected_candidates: Option<usize>,
    clip_to_image: bool,
    parallel: bool,
}

impl Default for DecodeConfigJson {
    fn default() -> Self {
        let cfg = DecodeConfig::default();
        Self {
            confidence_threshold: cfg.confidence_threshold,
            iou_threshold: cfg.iou_threshold,
            max_detections: cfg.max_detections,
            model_input_size: [cfg.model_input_size.width, cfg.model_input_size.height],
            num_classes: cfg.num_classes,
            score_mode: ScoreModeConfig::ObjectnessTimesClass,
            activation: ActivationConfig::None,
            resize: ResizeConfig::Stretch,
            coordinates: CoordinatesConfig::Pixels,
            expected_candidates: cfg.expected_candidates,
            clip_to_image: cfg.clip_to_image,
            parallel: cfg.parallel,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    tensor_path: String,
    shape: Vec<usize>,
    layout: LayoutConfig,
    image_path: Option<String>,
    input_image_size: Option<[u32; 2]>,
    output_path: Option<String>,
    labels: LabelsConfig,
    decode: DecodeConfigJson,
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    class_id: usize,
    label: Option<&'static str>,
    confidence: f32,
}

impl DetectionRecord {
    fn new(det: &Detection, labels: &LabelsConfig) -> Self {
        let label = match labels {
            LabelsConfig::Coco => coco_label(det.class_id),
            LabelsConfig::None => None,
        };
        Self {
            x: det.bbox.x,
            y: det.bbox.y,
            width: det.bbox.width,
            height: det.bbox.height,
            class_id: det.class_id,
            label,
            confidence: det.confidence,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    count: usize,
    detections: Vec<DetectionRecord>,
}

#[cfg(feature = "image-io")]
fn image_size_from_path(path: &str) -> Result<ImageSize, Box<dyn std::error::Error>> {
    Ok(detdecode::io::image_size(path)?)
}

#[cfg(not(feature = "image-io"))]
fn image_size_from_path(_path: &str) -> Result<ImageSize, Box<dyn std::error::Error>> {
    Err("image_path requires the image-io feature; set input_image_size instead".into())
}

fn resolve_image_size(config: &Config) -> Result<ImageSize, Box<dyn std::error::Error>> {
    if let Some([width, height]) = config.input_image_size {
        return Ok(ImageSize::new(width, height));
    }
    match &config.image_path {
        Some(path) => image_size_from_path(path),
        // Without a capture the boxes stay in model input pixels.
        None => {
            let [width, height] = config.decode.model_input_size;
            Ok(ImageSize::new(width, height))
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env()
                    .add_directive("detdecode=info".parse()?)
                    .add_directive("detdecode_cli=info".parse()?),
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
    if config.tensor_path.is_empty() {
        return Err("tensor_path must be set in the config".into());
    }
    if config.shape.is_empty() {
        return Err("shape must be set in the config".into());
    }

    let input_image_size = resolve_image_size(&config)?;
    let Config {
        tensor_path,
        shape,
        layout,
        output_path,
        labels,
        decode,
        ..
    } = config;

    let tensor = load_tensor_file(&tensor_path, shape, layout.into())?;
    info!(
        path = %tensor_path,
        shape = ?tensor.shape(),
        image_width = input_image_size.width,
        image_height = input_image_size.height,
        "loaded tensor"
    );
    let [model_w, model_h] = decode.model_input_size;
    let decoder = Decoder::new(DecodeConfig {
        confidence_threshold: decode.confidence_threshold,
        iou_threshold: decode.iou_threshold,
        max_detections: decode.max_detections,
        input_image_size,
        model_input_size: ImageSize::new(model_w, model_h),
        num_classes: decode.num_classes,
        score_mode: decode.score_mode.into(),
        activation: decode.activation.into(),
        resize: decode.resize.into(),
        coordinates: decode.coordinates.into(),
        expected_candidates: decode.expected_candidates,
        clip_to_image: decode.clip_to_image,
        parallel: decode.parallel,
    })?;

    let detections = decoder.decode_owned(&tensor)?;
    info!(count = detections.len(), "decoded detections");
    let output = Output {
        count: detections.len(),
        detections: detections
            .iter()
            .map(|det| DetectionRecord::new(det, &labels))
            .collect(),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
