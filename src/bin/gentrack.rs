use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde_json::Value;

use gentrack::{AttributeInfo, DataType, FlowOpts, SampleHandler, VizSpec, build_data_flow};

#[derive(Parser, Debug)]
#[command(name = "gentrack", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build and load the data flow of a visualization and print the collected data.
    Flow(FlowArgs),
    /// Replay sample actions against an attribute table and print the final state.
    Samples(SamplesArgs),
}

#[derive(Parser, Debug)]
struct FlowArgs {
    /// Input visualization JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Print only this view's data.
    #[arg(long)]
    view: Option<String>,

    /// Drop defensive copies on unshared paths.
    #[arg(long, default_value_t = false)]
    elide_clones: bool,
}

#[derive(Parser, Debug)]
struct SamplesArgs {
    /// Sample table JSON: `{"samples": [...], "attributes": {...}}`.
    #[arg(long)]
    samples: PathBuf,

    /// JSON array of actions, applied in order.
    #[arg(long)]
    actions: PathBuf,
}

#[derive(serde::Deserialize)]
struct SampleTable {
    samples: Vec<String>,
    #[serde(default)]
    attributes: HashMap<String, AttributeColumn>,
}

#[derive(serde::Deserialize)]
struct AttributeColumn {
    #[serde(rename = "type")]
    data_type: DataType,
    #[serde(default)]
    scale: Option<Value>,
    values: HashMap<String, Value>,
}

fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Flow(args) => cmd_flow(args),
        Command::Samples(args) => cmd_samples(args),
    }
}

fn cmd_flow(args: FlowArgs) -> anyhow::Result<()> {
    let spec = VizSpec::from_path(&args.in_path)?;
    let base_dir = args.in_path.parent().unwrap_or_else(|| Path::new("."));
    let opts = FlowOpts {
        elide_redundant_clones: args.elide_clones,
    };

    let mut flow = build_data_flow(&spec, base_dir, opts)?;
    flow.load_all()?;

    let out = match &args.view {
        Some(view) => serde_json::to_value(flow.data_for_view(view)?)?,
        None => {
            let mut all = serde_json::Map::new();
            for view in flow.views() {
                let data = serde_json::to_value(flow.data_for_view(view)?)?;
                all.insert(view.to_string(), data);
            }
            Value::Object(all)
        }
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn cmd_samples(args: SamplesArgs) -> anyhow::Result<()> {
    let table: SampleTable = read_json(&args.samples)?;
    let actions: Vec<Value> = read_json(&args.actions)?;

    let columns = Rc::new(table.attributes);
    let mut handler = SampleHandler::new();
    handler.set_samples(table.samples);
    handler.add_attribute_resolver("SAMPLE_ATTRIBUTE", move |id| {
        let name = id.specifier.as_str()?;
        let column = columns.get(name)?;
        let values = column.values.clone();
        let info = AttributeInfo::new(name, column.data_type, move |s| {
            values.get(s).cloned().unwrap_or(Value::Null)
        });
        Some(match &column.scale {
            Some(scale) => info.with_scale(scale.clone()),
            None => info,
        })
    });

    for (i, action) in actions.iter().enumerate() {
        handler
            .dispatch_json(action)
            .with_context(|| format!("dispatch action #{i}"))?;
    }
    println!("{}", serde_json::to_string_pretty(handler.state())?);
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse '{}'", path.display()))
}
