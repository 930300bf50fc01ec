use std::fs::{self, File};
use std::io::{Read, stdin};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use formtree::{Options, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "formtree-cli",
    about = "Turn bracket-named form fields into nested JSON",
    version
)]
struct Args {
    /// JSON options file (camelCase keys, e.g. {"parseAll": true})
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Type for fields without an annotation or `:type` suffix
    #[arg(long, value_name = "TYPE")]
    default_type: Option<String>,

    /// Treat all-digit keys like `foo[0]` as sequence indices
    #[arg(long)]
    int_keys_as_array_index: bool,

    /// Drop falsy values of this type (repeatable)
    #[arg(long = "skip-falsy-type", value_name = "TYPE")]
    skip_falsy_types: Vec<String>,

    /// Drop falsy values of this field name (repeatable)
    #[arg(long = "skip-falsy-field", value_name = "NAME")]
    skip_falsy_fields: Vec<String>,

    /// Keep `name:type` names whole
    #[arg(long)]
    disable_colon_types: bool,

    /// Parse numeric-looking untyped values as numbers
    #[arg(long)]
    parse_numbers: bool,

    /// Parse untyped "true"/"false" as booleans
    #[arg(long)]
    parse_booleans: bool,

    /// Parse untyped "null" as null
    #[arg(long)]
    parse_nulls: bool,

    /// Shorthand for all three --parse-* flags
    #[arg(long)]
    parse_all: bool,

    /// Build into a top-level sequence instead of a map
    #[arg(long)]
    root_array: bool,

    /// Pretty-print JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Input file (defaults to stdin)
    input: Option<PathBuf>,
}

impl Args {
    fn options(&self) -> Result<Options> {
        let mut options = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                let config: serde_json::Value = serde_json::from_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?;
                Options::from_json(&config)?
            }
            None => Options::default(),
        };

        if let Some(t) = &self.default_type {
            options.default_type = t.clone();
        }
        options.use_int_keys_as_array_index |= self.int_keys_as_array_index;
        options.skip_falsy_for_types.extend(self.skip_falsy_types.iter().cloned());
        options.skip_falsy_for_fields.extend(self.skip_falsy_fields.iter().cloned());
        options.disable_colon_types |= self.disable_colon_types;
        options.parse_numbers |= self.parse_numbers;
        options.parse_booleans |= self.parse_booleans;
        options.parse_nulls |= self.parse_nulls;
        options.parse_all |= self.parse_all;
        Ok(options)
    }
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "formtree=warn",
        1 => "formtree=debug",
        _ => "formtree=trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut buf = String::new();
    match &args.input {
        Some(path) => {
            let mut f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            f.read_to_string(&mut buf)?;
        }
        None => {
            stdin().read_to_string(&mut buf)?;
        }
    }

    let options = args.options()?;
    let fields = formtree::field::fields_from_json(&buf).context("reading field list")?;
    tracing::debug!(count = fields.len(), "read fields");

    let root = if args.root_array {
        Value::empty_array()
    } else {
        Value::empty_object()
    };
    let tree = formtree::build_tree_with_root(root, &fields, &options)?.to_json();

    if args.pretty {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        println!("{}", serde_json::to_string(&tree)?);
    }

    Ok(())
}
