use std::path::PathBuf;

use anyhow::Result;
use schaukasten_core::{Config, EventSpan, Language, LocalizedSpan, Window};
use tracing::info;

use crate::colors::ColorMap;
use crate::fetch;
use crate::prompt;
use crate::render::Renderer;

/// Where the calendar document comes from and how the result is shown.
pub struct Options {
    pub url: Option<String>,
    pub file: Option<PathBuf>,
    pub language: Option<Language>,
    pub json: bool,
    pub yes: bool,
}

pub async fn run(config: &Config, window: Window, options: Options) -> Result<()> {
    let document = match &options.file {
        Some(path) => fetch::read_calendar_file(path)?,
        None => {
            let url = options.url.as_deref().unwrap_or(&config.calendar_url);
            fetch::fetch_calendar(url).await?
        }
    };

    let zone = config.timezone()?;
    let span = EventSpan::build(&document, window, zone)?;
    info!(count = span.len(), "occurrences in window");

    let languages = match options.language {
        Some(language) => vec![language],
        None if config.languages.is_empty() => Language::ALL.to_vec(),
        None => config.languages.clone(),
    };

    if options.json {
        let localized: Vec<LocalizedSpan> = languages.iter().map(|l| span.localize(*l)).collect();
        println!("{}", serde_json::to_string_pretty(&localized)?);
        return Ok(());
    }

    let colors = ColorMap::for_span(&span);
    let show = |span: &EventSpan, language: Language| {
        println!("{}", Renderer::new(language, &colors, config).render(span));
    };

    let span = if options.yes {
        span
    } else {
        show(&span, languages[0]);
        println!();
        let reviewed = prompt::review(span, |filtered| show(filtered, languages[0]))?;
        println!();
        reviewed
    };

    for (i, language) in languages.iter().enumerate() {
        if i > 0 {
            println!();
        }
        show(&span, *language);
    }

    Ok(())
}
