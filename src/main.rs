use boxflow::{PipelineBuilder, PipelineConfig, PipelineError};
use std::env;
use std::fs;

/// Resolves a styled element tree from a JSON file and prints the render layout tree.
fn main() -> Result<(), PipelineError> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 4 {
        eprintln!("Resolves a styled element tree (JSON) into a render layout tree.");
        eprintln!();
        eprintln!(
            "Usage: {} <path/to/input.json> [path/to/config.json] [path/to/output.json]",
            args[0]
        );
        std::process::exit(1);
    }

    let config = match args.get(2) {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    let mut pipeline = PipelineBuilder::new().with_config(config).build()?;

    log::info!("Resolving layout from {}", args[1]);
    let resolved = pipeline.run_file(&args[1])?;
    let json = resolved.to_json()?;

    match args.get(3) {
        Some(output_path) => {
            fs::write(output_path, json)?;
            println!("Wrote {} render nodes to {}", resolved.output.node_count(), output_path);
        }
        None => println!("{}", json),
    }
    Ok(())
}
