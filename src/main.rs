use std::io::{self, Write};

use anyhow::{anyhow, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod classifier;
mod inference;
mod manager;
mod profile;
mod report;

use classifier::run_comparison;
use manager::ModelManager;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    let (profile_name, text) = parse_args()?;
    let profile = profile::profile(&profile_name).ok_or_else(|| {
        anyhow!(
            "unknown profile '{}' (available: {})",
            profile_name,
            profile::profile_names().join(", ")
        )
    })?;

    println!("🛡️ hoaxlens — profile '{}'", profile.name());
    let models = ModelManager::new(profile)?;
    println!("🚀 Both classifiers loaded\n");

    match text {
        Some(text) => classify_once(&models, &text),
        None => repl(&models),
    }
}

fn classify_once(models: &ModelManager, text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(anyhow!("input text is empty"));
    }
    let report = run_comparison(models, text)?;
    println!("{}", report::render_report(&report));
    Ok(())
}

fn repl(models: &ModelManager) -> Result<()> {
    println!("Enter a piece of news text to compare both classifiers (Ctrl-D to quit).");
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if io::stdin().read_line(&mut line)? == 0 {
            println!("\n✔ Done");
            return Ok(());
        }

        let text = line.trim();
        if text.is_empty() {
            println!("⚠️ Please enter some text first.");
            continue;
        }

        match run_comparison(models, text) {
            Ok(report) => println!("{}", report::render_report(&report)),
            Err(err) => eprintln!("❌ comparison failed: {err:#}"),
        }
    }
}

/// `hoaxlens [--profile NAME] [TEXT...]`; with no TEXT an interactive
/// prompt loop starts.
fn parse_args() -> Result<(String, Option<String>)> {
    let mut profile_name = profile::DEFAULT_PROFILE.to_string();
    let mut words = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--profile" | "-p" => {
                profile_name = args
                    .next()
                    .ok_or_else(|| anyhow!("--profile requires a value"))?;
            }
            _ => words.push(arg),
        }
    }

    let text = if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    };
    Ok((profile_name, text))
}
