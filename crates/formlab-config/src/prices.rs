//! The project price overlay (`.formlab/prices.yaml`).
//!
//! The overlay stores user-edited unit prices on top of the bundled cost
//! list. The file is a YAML list of cost entries; a later entry for the same
//! name replaces an earlier one.

use std::collections::BTreeMap;
use std::path::Path;

use formlab_core::cost::{CostEntry, CostTable};

use crate::config::Result;

/// File name of the overlay inside `.formlab/`.
pub const PRICES_FILE: &str = "prices.yaml";

/// User price overrides keyed by ingredient name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceOverlay {
    entries: BTreeMap<String, CostEntry>,
}

impl PriceOverlay {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&CostEntry> {
        self.entries.get(name.trim())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CostEntry> {
        self.entries.values()
    }

    /// Adds or replaces an override, returning the one it replaced.
    pub fn set(&mut self, entry: CostEntry) -> Option<CostEntry> {
        let name = entry.name.trim().to_string();
        let entry = CostEntry { name: name.clone(), ..entry };
        self.entries.insert(name, entry)
    }

    pub fn remove(&mut self, name: &str) -> Option<CostEntry> {
        self.entries.remove(name.trim())
    }

    /// Copies every override into `table`'s overlay.
    pub fn apply_to(&self, table: &mut CostTable) {
        table.extend_overlay(self.entries.values().cloned());
    }
}

impl FromIterator<CostEntry> for PriceOverlay {
    fn from_iter<I: IntoIterator<Item = CostEntry>>(iter: I) -> Self {
        let mut overlay = PriceOverlay::default();
        for entry in iter {
            overlay.set(entry);
        }
        overlay
    }
}

/// Load `<formlab_dir>/prices.yaml`. A missing or empty file is an empty overlay.
pub fn load_prices(formlab_dir: &Path) -> Result<PriceOverlay> {
    let path = formlab_dir.join(PRICES_FILE);
    if !path.exists() {
        return Ok(PriceOverlay::default());
    }

    let content = std::fs::read_to_string(&path)?;
    if content.trim().is_empty() {
        return Ok(PriceOverlay::default());
    }

    let entries: Vec<CostEntry> = serde_yaml::from_str(&content)?;
    tracing::debug!(path = %path.display(), count = entries.len(), "loaded price overlay");
    Ok(entries.into_iter().collect())
}

/// Write the overlay to `<formlab_dir>/prices.yaml`, sorted by name.
pub fn save_prices(formlab_dir: &Path, overlay: &PriceOverlay) -> Result<()> {
    std::fs::create_dir_all(formlab_dir)?;

    let entries: Vec<&CostEntry> = overlay.iter().collect();
    let yaml = serde_yaml::to_string(&entries)?;
    std::fs::write(formlab_dir.join(PRICES_FILE), yaml)?;
    tracing::info!(count = entries.len(), "saved price overlay");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_prices(dir.path()).unwrap().is_empty());

        std::fs::write(dir.path().join(PRICES_FILE), "\n").unwrap();
        assert!(load_prices(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut overlay = PriceOverlay::default();
        assert!(overlay.set(CostEntry::new("구연산", 4100.0)).is_none());
        overlay.set(CostEntry::new(" 설탕 ", 1300.0).supplier("대한제당"));
        let old = overlay.set(CostEntry::new("구연산", 3900.0)).unwrap();
        assert_eq!(old.unit_price_per_kg, 4100.0);

        save_prices(dir.path(), &overlay).unwrap();
        let loaded = load_prices(dir.path()).unwrap();
        assert_eq!(loaded, overlay);
        assert_eq!(loaded.get("설탕").unwrap().supplier, "대한제당");
        assert_eq!(loaded.get("구연산").unwrap().unit_price_per_kg, 3900.0);
    }

    #[test]
    fn later_duplicate_in_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(PRICES_FILE),
            "- {name: 정제수, unitPricePerKg: 2}\n- {name: 정제수, unitPricePerKg: 3}\n",
        )
        .unwrap();
        let overlay = load_prices(dir.path()).unwrap();
        assert_eq!(overlay.len(), 1);
        assert_eq!(overlay.get("정제수").unwrap().unit_price_per_kg, 3.0);
        assert_eq!(overlay.get("정제수").unwrap().unit, "KRW/kg");
    }

    #[test]
    fn apply_shadows_base_table() {
        let mut table = CostTable::new(vec![CostEntry::new("설탕", 1200.0)]);
        let overlay: PriceOverlay = vec![CostEntry::new("설탕", 1500.0)].into_iter().collect();
        overlay.apply_to(&mut table);
        assert!(table.is_overridden("설탕"));
        assert_eq!(table.get("설탕").unwrap().unit_price_per_kg, 1500.0);

        let mut overlay = overlay;
        assert!(overlay.remove("설탕").is_some());
        assert!(overlay.is_empty());
    }
}
