use anyhow::Result;
use clap::Parser;
use prompt_variations::config::Config;
use prompt_variations::{init_tracing, GenerateRequest, VariationStudio};
use std::path::PathBuf;

/// Run one prompt through the variation pipeline and print the result as JSON.
#[derive(Debug, Parser)]
#[command(name = "prompt-variations-cli")]
struct Args {
    /// Brief description to expand and vary
    prompt: String,

    /// Also convert each upscaled image into a video clip
    #[arg(long)]
    videos: bool,

    /// Aspect to vary; pass exactly five to skip prompt expansion
    #[arg(long = "variator")]
    variators: Vec<String>,

    /// JSON file overriding the built-in prompt templates
    #[arg(long)]
    templates: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut cfg = Config::from_env()?;
    if args.templates.is_some() {
        cfg.templates_path = args.templates;
    }
    let studio = VariationStudio::from_config(&cfg).await?;

    let mut request = GenerateRequest::new(args.prompt).with_videos(args.videos);
    if !args.variators.is_empty() {
        request = request.with_variators(args.variators);
    }

    let bundle = studio.run(&request).await?;
    println!("{}", serde_json::to_string_pretty(&bundle)?);
    Ok(())
}
