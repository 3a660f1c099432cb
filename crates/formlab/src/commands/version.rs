//! `formlab version` -- print version, platform and bundled data counts.

use anyhow::Result;
use serde::Serialize;

use crate::context::RuntimeContext;
use crate::output::output_json;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build identifier, stamped by release builds through `FORMLAB_BUILD`.
const BUILD: &str = match option_env!("FORMLAB_BUILD") {
    Some(b) => b,
    None => "dev",
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReferenceCounts {
    prices: usize,
    standards: usize,
    samples: usize,
    product_cards: usize,
}

impl ReferenceCounts {
    fn load() -> Result<Self> {
        Ok(Self {
            prices: formlab_reference::cost_entries()?.len(),
            standards: formlab_reference::standards()?.len(),
            samples: formlab_reference::SAMPLES.len(),
            product_cards: formlab_reference::product_cards()?.len(),
        })
    }
}

/// Execute the `formlab version` command.
pub fn run(ctx: &RuntimeContext) -> Result<()> {
    let platform = format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH);
    let data = ReferenceCounts::load()?;

    if ctx.json {
        output_json(&serde_json::json!({
            "version": VERSION,
            "build": BUILD,
            "platform": platform,
            "referenceData": data,
        }));
        return Ok(());
    }

    println!("formlab version {VERSION} ({BUILD}) {platform}");
    if ctx.verbose {
        println!(
            "reference data: {} prices, {} standards, {} samples, {} product cards",
            data.prices, data.standards, data.samples, data.product_cards
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_data_is_counted() {
        let data = ReferenceCounts::load().unwrap();
        assert_eq!(data.prices, 36);
        assert_eq!(data.standards, 5);
        assert!(data.product_cards > 0);
    }
}
