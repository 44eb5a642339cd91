//! Command line arguments.
//!
//! ```text
//! wordboard                                  interactive terminal UI
//! wordboard headless [--plain] [--url URL]   one generation, board printed to stdout
//! ```

use anyhow::{anyhow, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlessArgs {
    /// Fetch without animation
    pub plain: bool,
    /// Overrides `WORDBOARD_SERVER_URL`
    pub url: Option<String>,
}

/// Parse the arguments after the program name.
///
/// Returns `Ok(None)` for interactive mode.
pub fn parse_headless_args(args: &[String]) -> Result<Option<HeadlessArgs>> {
    if args.is_empty() {
        return Ok(None);
    }
    if args[0] != "headless" {
        return Err(anyhow!("unknown command: {}", args[0]));
    }

    let mut parsed = HeadlessArgs::default();
    let mut i = 1usize;
    while i < args.len() {
        match args[i].as_str() {
            "--plain" => parsed.plain = true,
            "--url" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("headless: missing value for --url"))?;
                parsed.url = Some(v.clone());
            }
            other => {
                return Err(anyhow!("headless: unknown argument: {}", other));
            }
        }
        i += 1;
    }

    Ok(Some(parsed))
}
