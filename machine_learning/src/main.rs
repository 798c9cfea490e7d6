use std::{env, fs, process};

use machine_learning::{artifact, description::ModelDescription};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 3 {
        eprintln!("Usage: {} <model.json> <model.safetensors>", args[0]);
        process::exit(1);
    }

    if let Err(e) = run(&args[1], &args[2]) {
        eprintln!("Error exporting model: {e}");
        process::exit(1);
    }
}

fn run(input: &str, output: &str) -> Result<(), Box<dyn std::error::Error>> {
    let json = fs::read_to_string(input)?;
    let description: ModelDescription = serde_json::from_str(&json)?;
    let model = description.build()?;
    artifact::save(&model, output)?;

    println!(
        "wrote {} layer(s), {} parameter(s) to {output}",
        model.layers().len(),
        model.size()
    );
    Ok(())
}
