use crate::schema::{Catalog, GameConfig, GameData};
use anyhow::{bail, Context};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const CONFIG_FILE: &str = "config.json";
const ACTIONS_FILE: &str = "actions.json";

pub fn load_game_config(dir: &Path) -> anyhow::Result<GameConfig> {
    let path = dir.join(CONFIG_FILE);
    let config: GameConfig = if path.exists() {
        load_json(&path)?
    } else {
        GameConfig::default()
    };
    config
        .validate()
        .map_err(|err| anyhow::anyhow!(err))
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(config)
}

pub fn load_catalog(dir: &Path) -> anyhow::Result<Catalog> {
    let path = dir.join(ACTIONS_FILE);
    let catalog: Catalog = load_json(&path)?;
    validate_catalog(&catalog).with_context(|| format!("validate {}", path.display()))?;
    Ok(catalog)
}

pub fn load_game_data(dir: &Path) -> anyhow::Result<GameData> {
    let config = load_game_config(dir)?;
    let catalog = load_catalog(dir)?;
    if catalog.shop_pool(config.shop.max_rarity).is_empty() && config.shop.items_per_round > 0 {
        bail!(
            "no purchasable actions at or below {:?} for the shop",
            config.shop.max_rarity
        );
    }
    Ok(GameData { config, catalog })
}

pub fn parse_catalog(raw: &str) -> anyhow::Result<Catalog> {
    let catalog: Catalog = serde_json::from_str(raw).context("parse catalog")?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Ids must be unique and non-empty, and the base deck may only name known ids.
pub fn validate_catalog(catalog: &Catalog) -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    for action in &catalog.actions {
        if action.id.trim().is_empty() {
            bail!("action with empty id ({})", action.name);
        }
        if !seen.insert(action.id.as_str()) {
            bail!("duplicate action id {}", action.id);
        }
    }
    if catalog.base_deck.is_empty() {
        bail!("base deck is empty");
    }
    for id in &catalog.base_deck {
        if !seen.contains(id.as_str()) {
            bail!("base deck references unknown action {}", id);
        }
    }
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
