//! Interactive review of a rendered span.

use std::collections::BTreeSet;

use anyhow::{Result, bail};
use dialoguer::{Confirm, Input};
use owo_colors::OwoColorize;
use schaukasten_core::EventSpan;

/// Parse exclusions like `1:3,5` into zero-based positions.
///
/// Numbers are 1-based as printed; `a:b` ranges include both ends.
pub fn parse_exclusions(input: &str, len: usize) -> Result<BTreeSet<usize>> {
    let mut positions = BTreeSet::new();

    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (from, to) = match part.split_once(':') {
            Some((from, to)) => (parse_number(from, len)?, parse_number(to, len)?),
            None => {
                let n = parse_number(part, len)?;
                (n, n)
            }
        };

        if from > to {
            bail!("Range {} runs backwards", part);
        }

        positions.extend((from - 1)..to);
    }

    Ok(positions)
}

fn parse_number(raw: &str, len: usize) -> Result<usize> {
    let raw = raw.trim();
    let n: usize = raw
        .parse()
        .map_err(|_| anyhow::anyhow!("'{}' is not a number", raw))?;

    if n == 0 || n > len {
        bail!("{} is not between 1 and {}", n, len);
    }

    Ok(n)
}

/// The span without the entries named in `input`.
pub fn select(span: &EventSpan, input: &str) -> Result<EventSpan> {
    let positions = parse_exclusions(input, span.len())?;
    Ok(span.without(&positions))
}

/// Ask which entries to leave out until the user accepts the result.
///
/// `show` prints a span. Declining a selection starts over from the full
/// span.
pub fn review<F>(span: EventSpan, show: F) -> Result<EventSpan>
where
    F: Fn(&EventSpan),
{
    loop {
        if span.is_empty() {
            return Ok(span);
        }

        let input: String = Input::new()
            .with_prompt("Exclude entries (e.g. 1:3,5, empty to keep all)")
            .default(String::new())
            .show_default(false)
            .interact_text()?;

        if input.trim().is_empty() {
            return Ok(span);
        }

        let filtered = match select(&span, &input) {
            Ok(filtered) => filtered,
            Err(e) => {
                eprintln!("  {}", e.to_string().red());
                continue;
            }
        };

        println!();
        show(&filtered);
        println!();

        let confirmed = Confirm::new()
            .with_prompt("Use this selection?")
            .default(true)
            .interact()?;

        if confirmed {
            return Ok(filtered);
        }

        println!();
        show(&span);
        println!();
    }
}
