//! `treeflat flatten` - flatten a report read from JSON

use crate::cli::output::{render_json, render_table, OutputFormat};
use anyhow::{bail, Context, Result};
use clap::Args;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use treeflat_core::request::FLAT_PARAM;
use treeflat_core::{
    is_flatten_requested, DirectoryFetcher, FetchingLoader, FlattenOptions, Flattener,
    ResidentLoader, TreeflatConfig,
};
use treeflat_table::{Report, ReportRequest};

#[derive(Args, Debug, Clone)]
pub struct FlattenArgs {
    /// Report JSON file ("-" reads stdin)
    pub input: PathBuf,

    /// Module of the report (selects the label separator)
    #[arg(long, default_value = "API")]
    pub module: String,

    /// Method of the report (selects the label separator)
    #[arg(long, default_value = "get")]
    pub method: String,

    /// Extra request parameter as key=value (repeatable)
    #[arg(long = "param", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Keep interior rows, tagged with is_aggregate=1
    #[arg(long)]
    pub include_aggregate_rows: bool,

    /// Maximum nested subtable levels
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Directory of <idSubtable>.json files for subtables not in the input
    #[arg(long)]
    pub subtable_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, env = "TREEFLAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("Expected key=value, got: '{}'", raw)),
    }
}

pub fn run(args: FlattenArgs) -> Result<()> {
    let rendered = flatten_to_string(&args)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

/// Load, flatten and render a report according to `args`.
pub fn flatten_to_string(args: &FlattenArgs) -> Result<String> {
    let config = match &args.config {
        Some(path) => TreeflatConfig::load(path)?,
        None => TreeflatConfig::default(),
    };

    let mut request = ReportRequest::new(&args.module, &args.method);
    for (key, value) in &args.params {
        request.params.set(key, value);
    }
    if !request.params.contains(FLAT_PARAM) {
        request.params.set(FLAT_PARAM, "1");
    }

    let options = resolve_options(config.options, args, &request);
    let report = read_report(&args.input)?;

    let report = if is_flatten_requested(&request.params) {
        flatten_report(report, request, &config, options, args.subtable_dir.as_deref())?
    } else {
        warn!("flat is disabled for {}; rendering the report unchanged", request.qualified_name());
        report
    };

    match args.format {
        OutputFormat::Json => render_json(&report),
        OutputFormat::Table => Ok(render_table(&report)),
    }
}

fn resolve_options(
    base: FlattenOptions,
    args: &FlattenArgs,
    request: &ReportRequest,
) -> FlattenOptions {
    let requested = FlattenOptions::from_request(&request.params);
    let mut options = base.with_aggregate_rows(
        base.include_aggregate_rows
            || requested.include_aggregate_rows
            || args.include_aggregate_rows,
    );
    if let Some(max_depth) = args.max_depth {
        options = options.with_max_depth(max_depth);
    }
    options
}

fn read_report(input: &Path) -> Result<Report> {
    let content = if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read report from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read report: {}", input.display()))?
    };
    if content.trim().is_empty() {
        bail!("Report input is empty");
    }
    Report::from_json(&content).context("Failed to parse report JSON")
}

fn flatten_report(
    report: Report,
    request: ReportRequest,
    config: &TreeflatConfig,
    options: FlattenOptions,
    subtable_dir: Option<&Path>,
) -> Result<Report> {
    let name = request.qualified_name();
    let flattener = Flattener::new(request, &config.separator, options);

    let flattened = match subtable_dir {
        Some(dir) => {
            let loader = FetchingLoader::new(DirectoryFetcher::new(dir));
            flattener.flatten(report, &loader)
        }
        None => flattener.flatten(report, &ResidentLoader),
    }
    .with_context(|| format!("Failed to flatten {}", name))?;

    let rows: usize = flattened.tables().iter().map(|(_, table)| table.row_count()).sum();
    info!("Flattened {} into {} rows", name, rows);
    Ok(flattened)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::fs;
    use tempfile::TempDir;

    fn args(input: PathBuf) -> FlattenArgs {
        FlattenArgs {
            input,
            module: "Actions".to_string(),
            method: "getPageUrls".to_string(),
            params: Vec::new(),
            include_aggregate_rows: false,
            max_depth: None,
            subtable_dir: None,
            config: None,
            format: OutputFormat::Json,
            output: None,
        }
    }

    fn write_json(dir: &TempDir, name: &str, value: Value) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();
        path
    }

    fn pages_report() -> Value {
        json!({
            "table": {
                "rows": [
                    {
                        "columns": { "label": "/blog", "nb_hits": 10 },
                        "subtable": { "loaded": { "rows": [
                            {
                                "columns": { "label": "/2024", "nb_hits": 4 },
                                "subtable": { "pending": 7 }
                            }
                        ] } }
                    },
                    { "columns": { "label": "/index", "nb_hits": 3 } }
                ]
            }
        })
    }

    fn output_labels(rendered: &str) -> Vec<Value> {
        let report: Value = serde_json::from_str(rendered).unwrap();
        report["table"]["rows"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["columns"]["label"].clone())
            .collect()
    }

    #[test]
    fn test_parse_param() {
        assert_eq!(parse_param("period=day").unwrap(), ("period".into(), "day".into()));
        assert_eq!(parse_param("segment=a==b").unwrap(), ("segment".into(), "a==b".into()));
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=x").is_err());
    }

    #[test]
    fn test_flatten_with_subtable_dir() {
        let dir = TempDir::new().unwrap();
        let input = write_json(&dir, "report.json", pages_report());
        let subtables = dir.path().join("subtables");
        fs::create_dir(&subtables).unwrap();
        fs::write(
            subtables.join("7.json"),
            json!({ "rows": [ { "columns": { "label": "/hello", "nb_hits": 4 } } ] }).to_string(),
        )
        .unwrap();

        let mut args = args(input);
        args.subtable_dir = Some(subtables);
        let rendered = flatten_to_string(&args).unwrap();

        assert_eq!(output_labels(&rendered), vec![json!("blog/2024/hello"), json!("index")]);
    }

    #[test]
    fn test_pending_subtable_without_dir_fails() {
        let dir = TempDir::new().unwrap();
        let input = write_json(&dir, "report.json", pages_report());

        let err = flatten_to_string(&args(input)).unwrap_err();
        assert!(format!("{:#}", err).contains("not resident"));
    }

    #[test]
    fn test_aggregate_rows_from_param() {
        let dir = TempDir::new().unwrap();
        let input = write_json(
            &dir,
            "report.json",
            json!({ "table": { "rows": [
                { "columns": { "label": "Europe" }, "subtable": { "loaded": { "rows": [
                    { "columns": { "label": "France" } }
                ] } } }
            ] } }),
        );

        let mut args = args(input);
        args.module = "UserCountry".to_string();
        args.method = "getContinent".to_string();
        args.params = vec![("include_aggregate_rows".to_string(), "1".to_string())];
        let rendered = flatten_to_string(&args).unwrap();

        let report: Value = serde_json::from_str(&rendered).unwrap();
        let rows = report["table"]["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["columns"]["label"], json!("Europe"));
        assert_eq!(rows[0]["metadata"]["is_aggregate"], json!(1));
        assert_eq!(rows[1]["columns"]["label"], json!("Europe - France"));
        assert_eq!(rows[1]["metadata"]["is_aggregate"], json!(0));
    }

    #[test]
    fn test_flat_disabled_leaves_report_unchanged() {
        let dir = TempDir::new().unwrap();
        let report = json!({ "table": { "rows": [
            {
                "columns": { "label": "a" },
                "subtable": { "loaded": { "rows": [ { "columns": { "label": "b" } } ] } }
            }
        ] } });
        let input = write_json(&dir, "report.json", report.clone());

        let mut args = args(input);
        args.params = vec![("flat".to_string(), "0".to_string())];
        let rendered = flatten_to_string(&args).unwrap();

        let out: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(out, report);
    }

    #[test]
    fn test_config_file_separator() {
        let dir = TempDir::new().unwrap();
        let input = write_json(
            &dir,
            "report.json",
            json!({ "table": { "rows": [
                { "columns": { "label": "Mobile" }, "subtable": { "loaded": { "rows": [
                    { "columns": { "label": "Android" } }
                ] } } }
            ] } }),
        );
        let config = dir.path().join("treeflat.toml");
        fs::write(&config, "[separator]\ndefault_separator = \" > \"\n").unwrap();

        let mut args = args(input);
        args.module = "DevicesDetection".to_string();
        args.method = "getType".to_string();
        args.config = Some(config);
        let rendered = flatten_to_string(&args).unwrap();

        assert_eq!(output_labels(&rendered), vec![json!("Mobile > Android")]);
    }

    #[test]
    fn test_table_format() {
        let dir = TempDir::new().unwrap();
        let input = write_json(
            &dir,
            "report.json",
            json!({ "table": { "rows": [ { "columns": { "label": "/home", "nb_hits": 2 } } ] } }),
        );

        let mut args = args(input);
        args.format = OutputFormat::Table;
        let rendered = flatten_to_string(&args).unwrap();
        assert!(rendered.contains("home"));
        assert!(rendered.contains("nb_hits"));
    }

    #[test]
    fn test_run_writes_output_file() {
        let dir = TempDir::new().unwrap();
        let input = write_json(
            &dir,
            "report.json",
            json!({ "table": { "rows": [ { "columns": { "label": "/home" } } ] } }),
        );
        let output = dir.path().join("flat.json");

        let mut args = args(input);
        args.output = Some(output.clone());
        run(args).unwrap();

        let written = fs::read_to_string(output).unwrap();
        assert_eq!(output_labels(&written), vec![json!("home")]);
    }
}
