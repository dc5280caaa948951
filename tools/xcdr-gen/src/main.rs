// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use xcdr_gen::IdlModule;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        return;
    }

    match args[1].as_str() {
        "generate" => {
            if let Err(e) = generate(&args[2..]) {
                eprintln!("[ERROR] {:#}", e);
                std::process::exit(1);
            }
        }
        "--help" | "-h" | "help" => {
            print_help();
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_help();
            std::process::exit(1);
        }
    }
}

fn generate(args: &[String]) -> anyhow::Result<()> {
    let input = args
        .first()
        .context("missing input file: xcdr-gen generate <ast.json> [-o out.rs]")?;

    let mut output: Option<PathBuf> = None;
    let mut rest = args[1..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "-o" | "--out" => {
                let path = rest.next().context("-o requires a path")?;
                output = Some(PathBuf::from(path));
            }
            other => anyhow::bail!("unexpected argument: {}", other),
        }
    }

    let source = std::fs::read_to_string(input)
        .with_context(|| format!("reading module ast from {}", input))?;
    let module: IdlModule =
        serde_json::from_str(&source).with_context(|| format!("parsing module ast {}", input))?;

    tracing::info!(module = %module.name, definitions = module.definitions.len(), "generating streamers");
    let artifact = xcdr_gen::generate_module(&module)
        .with_context(|| format!("generating streamers for module {}", module.name))?;

    let output = output.unwrap_or_else(|| {
        let dir = std::env::var("XCDR_GEN_OUT_DIR").unwrap_or_else(|_| ".".into());
        PathBuf::from(dir).join(format!("{}.rs", module.name))
    });
    std::fs::write(&output, artifact)
        .with_context(|| format!("writing artifact to {}", output.display()))?;

    tracing::info!(artifact = %output.display(), "generation finished");
    Ok(())
}

fn print_help() {
    println!("xcdr-gen v0.3");
    println!();
    println!("USAGE:");
    println!("    xcdr-gen <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    generate <ast.json> [-o out.rs]  Emit streaming procedures for a module ast");
    println!("    help                             Print this help message");
    println!();
    println!("The output directory defaults to XCDR_GEN_OUT_DIR or the working directory.");
    println!();
}
