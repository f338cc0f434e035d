//! nifheads CLI
//!
//! Exports the hair and head meshes of a directory of scene files to one
//! JSON document plus PNG textures.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, warn};

use nifheads_export::{JsonExportOptions, Pipeline, PipelineOptions, PipelineReport};
use nifheads_parsers::logging::{self, TracingConfig};

/// nifheads - hair/head mesh exporter for legacy NIF scenes
#[derive(Parser)]
#[command(name = "nifheads")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory of scene files
    scene_dir: PathBuf,

    /// Directory of texture files
    texture_dir: PathBuf,

    /// Output directory (created if missing)
    output_dir: PathBuf,

    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format for the final report
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Pretty-print the mesh document
    #[arg(long)]
    pretty: bool,

    /// Abort on the first missing or unconvertible texture
    #[arg(long)]
    strict: bool,

    /// Decode and convert on the calling thread only
    #[arg(long)]
    single_threaded: bool,

    /// Texture output directory, relative to the output directory
    #[arg(long, default_value = "textures")]
    texture_subdir: String,

    /// Mesh document file name
    #[arg(long, default_value = "meshes.json")]
    document_name: String,

    /// Root name keyword (repeatable, replaces the default hair/head)
    #[arg(long = "keyword", value_name = "KEYWORD")]
    keywords: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl Cli {
    fn pipeline_options(&self) -> PipelineOptions {
        let mut options = PipelineOptions {
            texture_subdir: self.texture_subdir.clone(),
            document_name: self.document_name.clone(),
            strict: self.strict,
            parallel: !self.single_threaded,
            json: JsonExportOptions { pretty: self.pretty },
            ..Default::default()
        };
        if !self.keywords.is_empty() {
            options.root_keywords = self.keywords.clone();
        }
        options
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_with_config(TracingConfig::from_verbosity(cli.verbose));

    let options = cli.pipeline_options();
    debug!(?options, "Starting export");

    // Root verdicts go out during the run, so an aborted run still shows them
    let report = Pipeline::new(options)
        .on_root(|decision| eprintln!("{decision}"))
        .run(&cli.scene_dir, &cli.texture_dir, &cli.output_dir)
        .with_context(|| {
            format!(
                "Failed to export {:?} with textures from {:?}",
                cli.scene_dir, cli.texture_dir
            )
        })?;

    for asset in &report.unresolved {
        warn!(
            collection = %asset.collection,
            shape = %asset.shape,
            "Texture left unconverted: {} ({})",
            asset.file,
            asset.reason
        );
    }

    print_report(&report, cli.format)
}

fn print_report(report: &PipelineReport, format: OutputFormat) -> Result<()> {
    print!("{}", render_report(report, format)?);
    Ok(())
}

fn render_report(report: &PipelineReport, format: OutputFormat) -> Result<String> {
    let text = match format {
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(report)?),
        OutputFormat::Text => [
            format!("Export complete: {:?}", report.document),
            format!("  Collections:       {}", report.collections),
            format!("  Shapes:            {}", report.shapes),
            format!("  Original DDS:      {}", report.stats.original_dds),
            format!("  New DDS:           {}", report.stats.new_dds),
            format!("  Original non-DDS:  {}", report.stats.original_non_dds),
            format!("  Converted:         {}", report.converted),
            format!("  Unresolved:        {}", report.unresolved.len()),
        ]
        .iter()
        .map(|line| format!("{line}\n"))
        .collect(),
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["nifheads", "scenes", "textures", "out"]).unwrap();
        let options = cli.pipeline_options();

        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(options.texture_subdir, "textures");
        assert_eq!(options.document_name, "meshes.json");
        assert_eq!(options.root_keywords, ["hair", "head"]);
        assert!(options.parallel);
        assert!(!options.strict);
        assert!(!options.json.pretty);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "nifheads", "-vv", "--format", "JSON", "--pretty", "--strict",
            "--single-threaded", "--keyword", "beard", "--keyword", "hair",
            "s", "t", "o",
        ])
        .unwrap();
        let options = cli.pipeline_options();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(options.root_keywords, ["beard", "hair"]);
        assert!(options.strict && options.json.pretty && !options.parallel);
    }

    fn sample_report() -> PipelineReport {
        let mut report = PipelineReport {
            document: PathBuf::from("out/meshes.json"),
            collections: 2,
            shapes: 5,
            converted: 3,
            ..Default::default()
        };
        report.stats.new_dds = 4;
        report.stats.original_non_dds = 1;
        report
    }

    #[test]
    fn test_text_report_lists_counters() {
        let text = render_report(&sample_report(), OutputFormat::Text).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "Export complete: \"out/meshes.json\"");
        assert_eq!(lines[3], "  Original DDS:      0");
        assert_eq!(lines[4], "  New DDS:           4");
        assert_eq!(lines[5], "  Original non-DDS:  1");
        assert_eq!(lines[7], "  Unresolved:        0");
    }

    #[test]
    fn test_json_report_parses() {
        let text = render_report(&sample_report(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["stats"]["new_dds"], 4);
        assert_eq!(value["converted"], 3);
        assert!(value["unresolved"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_missing_arguments_rejected() {
        assert!(Cli::try_parse_from(["nifheads", "scenes", "textures"]).is_err());
        assert!(Cli::try_parse_from(["nifheads", "a", "b", "c", "--format", "csv"]).is_err());
    }
}
