//! Parse command implementation.

use anyhow::Result;
use xess_bridge::Pattern;

/// Run the parse command
pub fn run(mask: &str) -> Result<()> {
    let pattern = Pattern::parse(mask)?;
    let wildcards = pattern.tokens().iter().filter(|t| t.is_none()).count();

    println!("Pattern:   {}", pattern);
    println!("Length:    {} bytes", pattern.len());
    println!("Wildcards: {}", wildcards);
    match pattern.anchor() {
        Some((index, value)) => println!("Anchor:    {:02X} at index {}", value, index),
        None => println!("Anchor:    none (matches any bytes)"),
    }

    Ok(())
}
