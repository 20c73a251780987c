//! Exercise Widgets CLI
//!
//! Usage:
//!   exercise-widgets [OPTIONS] <FILE>
//!
//! Options:
//!   -c, --config <FILE>  Widget configuration (TOML format)
//!   -d, --debug          Show the debug area of the exercise
//!       --hints <N>      Reveal the first N hints
//!       --submit         Press submit after replaying events
//!   -v, --verbose        Log widget activity to stderr
//!   -h, --help           Print help

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::rc::Rc;

use clap::Parser;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use exercise_widgets::compositor::{expand_shorthand, Compositor};
use exercise_widgets::config::CompositorConfig;
use exercise_widgets::disclosure::{
    DISPLAYED_MAX_SCORE_KEY, DISPLAYED_SCORE_KEY, SCORE_KEY, SOLUTION_KEY,
};
use exercise_widgets::dom::serialize_element;
use exercise_widgets::exercise::SubmitAction;
use exercise_widgets::input::ControlHandle;
use exercise_widgets::render::{AllowListSanitizer, MarkdownRenderer};
use exercise_widgets::spatial::{Background, ControlSpec, Coord, VALUE_KEY};
use exercise_widgets::{
    Exercise, ExerciseContent, FieldRegistry, MemoryRecord, MimeBundle, SpatialControl,
    SpatialWidget, SurfaceEvent, TemplateError, WidgetConfig, WidgetError,
};

#[derive(Parser)]
#[command(name = "exercise-widgets")]
#[command(about = "Compose an exercise and replay input events against its controls")]
struct Cli {
    /// Exercise file (TOML format)
    input: PathBuf,

    /// Widget configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show the debug area of the exercise
    #[arg(short, long)]
    debug: bool,

    /// Reveal the first N hints
    #[arg(long, default_value_t = 0)]
    hints: usize,

    /// Press submit after replaying events
    #[arg(long)]
    submit: bool,

    /// Log widget activity to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// An exercise file: section templates, field values, controls and events
#[derive(Debug, Deserialize)]
struct ExerciseFile {
    #[serde(flatten)]
    content: ExerciseContent,
    #[serde(default)]
    fields: BTreeMap<String, BTreeMap<String, Value>>,
    #[serde(default)]
    controls: BTreeMap<String, ControlEntry>,
    #[serde(default)]
    events: Vec<EventEntry>,
}

#[derive(Debug, Deserialize)]
struct ControlEntry {
    #[serde(flatten)]
    spec: ControlSpec,
    #[serde(default)]
    value: Vec<String>,
    #[serde(default)]
    score: String,
    #[serde(default)]
    solution: Option<BTreeMap<String, Value>>,
    /// Score parts shown on the control after submit
    #[serde(default)]
    displayed_score: Option<f64>,
    #[serde(default)]
    displayed_max_score: Option<f64>,
    /// Image file embedded as the surface background
    #[serde(default)]
    background_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct EventEntry {
    control: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    at: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => match WidgetConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => WidgetConfig::default(),
    };

    let source = match fs::read_to_string(&cli.input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", cli.input.display(), e);
            process::exit(1);
        }
    };

    let mut file: ExerciseFile = match toml::from_str(&source) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error parsing exercise '{}': {}", cli.input.display(), e);
            process::exit(1);
        }
    };
    file.content.debug |= cli.debug;

    let base_dir = cli.input.parent().unwrap_or_else(|| Path::new("."));
    let widgets = match build_widgets(&file.controls, &config, base_dir) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    for event in &file.events {
        if let Err(message) = replay(event, &widgets) {
            eprintln!("Error: {}", message);
            process::exit(1);
        }
    }

    let bundles = file
        .fields
        .iter()
        .map(|(name, data)| (name.clone(), MimeBundle::from_display(data.clone())));
    let registry = FieldRegistry::rebuild(bundles, Vec::new());
    let controls: Vec<(String, ControlHandle)> = widgets
        .iter()
        .map(|(id, widget)| (id.clone(), Rc::clone(widget) as ControlHandle))
        .collect();

    let mut exercise = Exercise::new(file.content.clone(), registry.clone(), controls);
    for _ in 0..cli.hints {
        if exercise.reveal_hint().is_none() {
            break;
        }
    }
    if cli.submit {
        if let SubmitAction::Warn(warning) = exercise.submit() {
            eprintln!("Warning: {}", warning);
        }
    }

    let sanitizer = AllowListSanitizer::new();
    let renderer = MarkdownRenderer::new();
    let compositor =
        Compositor::new(&sanitizer, &renderer).with_config(config.compositor.clone());
    match pollster::block_on(exercise.render(&compositor)) {
        Ok(root) => println!("{}", serialize_element(&root)),
        Err(WidgetError::Template(err)) => {
            eprint!("{}", locate_template_error(&file, &registry, &config.compositor, &err));
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn build_widgets(
    controls: &BTreeMap<String, ControlEntry>,
    config: &WidgetConfig,
    base_dir: &Path,
) -> Result<BTreeMap<String, Rc<SpatialWidget>>, WidgetError> {
    let mut widgets = BTreeMap::new();
    for (id, entry) in controls {
        let mut control = SpatialControl::from_spec(id.clone(), &entry.spec, config.spatial.clone())?;
        if let Some(path) = &entry.background_file {
            let path = base_dir.join(path);
            let bytes = fs::read(&path).map_err(|e| WidgetError::Config(e.into()))?;
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
            control.set_background(Background::Image {
                mime: Background::mime_for_extension(ext).to_string(),
                bytes,
            });
        }

        let solution = entry
            .solution
            .as_ref()
            .map(|data| MimeBundle::from_display(data.clone()).to_wire())
            .unwrap_or_else(|| json!([]));
        let record = Rc::new(MemoryRecord::with_values([
            (VALUE_KEY, json!(entry.value)),
            (SCORE_KEY, json!(entry.score)),
            (SOLUTION_KEY, solution),
            (DISPLAYED_SCORE_KEY, json!(entry.displayed_score)),
            (DISPLAYED_MAX_SCORE_KEY, json!(entry.displayed_max_score)),
        ]));
        widgets.insert(id.clone(), Rc::new(SpatialWidget::new(control, record)));
    }
    Ok(widgets)
}

fn replay(event: &EventEntry, widgets: &BTreeMap<String, Rc<SpatialWidget>>) -> Result<(), String> {
    let widget = widgets
        .get(&event.control)
        .ok_or_else(|| format!("event targets unknown control '{}'", event.control))?;
    let at = match &event.at {
        Some(key) => Some(key.parse::<Coord>().map_err(|e| e.to_string())?),
        None => None,
    };
    let surface_event = SurfaceEvent::from_name(&event.kind, at)
        .ok_or_else(|| format!("invalid event '{}' for control '{}'", event.kind, event.control))?;
    let outcome = widget.dispatch(&surface_event);
    tracing::debug!(control = %event.control, event = %event.kind, ?outcome, "event replayed");
    Ok(())
}

/// Find the section a template error came from and report it with context
fn locate_template_error(
    file: &ExerciseFile,
    registry: &FieldRegistry,
    config: &CompositorConfig,
    err: &TemplateError,
) -> String {
    let content = &file.content;
    let sections = [
        ("preamble", &content.preamble),
        ("problem", &content.problem),
        ("feedback", &content.feedback),
    ]
    .into_iter()
    .chain(content.hints.iter().map(|hint| ("hint", hint)));

    for (name, template) in sections {
        let known = |field: &str| registry.contains(field) || file.controls.contains_key(field);
        if expand_shorthand(template, &known, config).err().as_ref() == Some(err) {
            return err.format(template, name);
        }
    }
    format!("Error: {}\n", err)
}
