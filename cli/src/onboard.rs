use anyhow::{Context, Result};
use console::style;
use dialoguer::{Input, Password, Select};
use hermes_core::config::{self, Config};

const BANNER: &str = r"
    ----------------------------------
     H E R M E S   ·   to-do assistant
    ----------------------------------
";

const PROVIDERS: &[(&str, &str)] = &[
    ("gemini", "Google Gemini (OpenAI-compatible endpoint)"),
    ("openai", "OpenAI"),
];

fn models_for(provider: &str) -> &'static [&'static str] {
    match provider {
        "openai" => &["gpt-4o", "gpt-4o-mini", "gpt-4.1-mini"],
        _ => &["gemini-2.0-flash", "gemini-2.5-flash", "gemini-2.5-pro"],
    }
}

fn print_step(step: usize, total: usize, title: &str) {
    println!();
    println!(
        "{}",
        style(format!("[{}/{}] {}", step, total, title))
            .cyan()
            .bold()
    );
    println!();
}

fn setup_provider() -> Result<String> {
    let labels: Vec<&str> = PROVIDERS.iter().map(|(_, label)| *label).collect();
    let selection = Select::new()
        .with_prompt("Select your provider")
        .items(&labels)
        .default(0)
        .interact()
        .context("Failed to select provider")?;

    Ok(PROVIDERS[selection].0.to_string())
}

fn setup_api_key(provider: &str) -> Result<String> {
    let api_key = Password::new()
        .with_prompt(format!("Enter your {} API key", provider))
        .interact()
        .context("Failed to read API key")?;

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        return Err(anyhow::anyhow!("API key cannot be empty"));
    }

    Ok(api_key)
}

fn setup_model(provider: &str) -> Result<String> {
    let models = models_for(provider);
    let selection = Select::new()
        .with_prompt("Select your model")
        .items(models)
        .default(0)
        .interact()
        .context("Failed to select model")?;

    Ok(models[selection].to_string())
}

/// Walks the user through provider, key and model selection, keeping the
/// remaining settings from `current`.
pub fn run_onboard(current: Config) -> Result<Config> {
    println!("{}", style(BANNER).cyan().bold());
    println!("  {}", style("Welcome to Hermes!").white().bold());
    println!(
        "  {}",
        style("A few questions and your task assistant is ready.").dim()
    );

    print_step(1, 3, "Provider");
    let provider = setup_provider()?;

    print_step(2, 3, "API Key");
    let api_key = setup_api_key(&provider)?;

    print_step(3, 3, "Model");
    let model = setup_model(&provider)?;

    let base_url: String = Input::new()
        .with_prompt("Custom base URL (leave empty for the default)")
        .allow_empty(true)
        .interact_text()
        .context("Failed to read base URL")?;

    println!();
    println!("  {} Configuration complete!", style("✓").green().bold());
    println!(
        "  {} Writing {}",
        style("→").green(),
        style(config::get_config_path().display()).cyan()
    );
    println!(
        "  {} You can now run: {}",
        style("→").green(),
        style("hermes chat").cyan().bold()
    );

    Ok(Config {
        provider: Some(provider),
        api_key,
        base_url: Some(base_url.trim().to_string()).filter(|u| !u.is_empty()),
        model,
        ..current
    })
}
