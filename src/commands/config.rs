use anyhow::Result;
use owo_colors::OwoColorize;
use schaukasten_core::Config;

pub fn run() -> Result<()> {
    let config_path = Config::config_path()?;

    if !config_path.exists() {
        Config::create_default_config(&config_path)?;
        println!("{} {}", "Created".green(), config_path.display());
    }

    let config = Config::load_from(&config_path)?;
    let languages: Vec<String> = config.languages.iter().map(|l| l.to_string()).collect();

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    println!();
    println!("{}", "Settings".bold());
    println!("  Calendar:   {}", config.calendar_url);
    println!("  Timezone:   {}", config.timezone);
    println!(
        "  Home:       {}",
        config.home_location.as_deref().unwrap_or("(none)")
    );
    println!("  Languages:  {}", languages.join(", "));

    Ok(())
}
