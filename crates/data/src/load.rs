use crate::schema::{CatalogFile, Content, GameConfig, ShopId, UpgradeDef};
use anyhow::{bail, Context};
use cubehub_core::WordValidator;
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "config.json";
pub const CATALOG_FILE: &str = "catalog.json";
pub const WORDS_FILE: &str = "words.txt";

/// Everything the hub needs from an assets directory.
#[derive(Debug)]
pub struct Assets {
    pub config: GameConfig,
    pub content: Content,
    /// `None` when the directory has no word list.
    pub words: Option<WordValidator>,
}

/// Loads config, catalog and word list from `dir`. Missing files fall back to
/// built-in defaults; files that exist but fail to parse are errors.
pub fn load_assets(dir: &Path) -> anyhow::Result<Assets> {
    let config = load_game_config(dir)?;
    let content = load_content(dir)?;
    let words_path = dir.join(WORDS_FILE);
    let words = if words_path.exists() {
        Some(load_word_list(&words_path)?)
    } else {
        None
    };
    Ok(Assets {
        config,
        content,
        words,
    })
}

pub fn load_game_config(dir: &Path) -> anyhow::Result<GameConfig> {
    let path = dir.join(CONFIG_FILE);
    let config: GameConfig = load_json_optional(&path)?;
    validate_config(&config).with_context(|| format!("validate {}", path.display()))?;
    Ok(config)
}

pub fn load_content(dir: &Path) -> anyhow::Result<Content> {
    let path = dir.join(CATALOG_FILE);
    let catalog: CatalogFile = load_json_optional(&path)?;
    let content = catalog.apply(Content::builtin());
    validate_content(&content).with_context(|| format!("validate {}", path.display()))?;
    Ok(content)
}

pub fn load_word_list(path: &Path) -> anyhow::Result<WordValidator> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let words =
        WordValidator::from_word_list(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(words)
}

pub fn validate_config(config: &GameConfig) -> anyhow::Result<()> {
    let run = &config.run;
    if run.hand_size == 0 {
        bail!("run.hand_size must be positive");
    }
    if run.hands == 0 {
        bail!("run.hands must be positive");
    }
    if !(1..=5).contains(&run.max_selected) {
        bail!("run.max_selected must be between 1 and 5, got {}", run.max_selected);
    }
    if run.target_growth < 1.0 {
        bail!("run.target_growth must be at least 1, got {}", run.target_growth);
    }
    let mut seen = HashSet::new();
    for rule in &config.hands {
        if !seen.insert(rule.kind) {
            bail!("duplicate hand rule {}", rule.kind.id());
        }
        if rule.chips < 0 || rule.mult < 0.0 {
            bail!("hand rule {} has negative base values", rule.kind.id());
        }
    }
    if config.clicker.health <= 0 {
        bail!("clicker.health must be positive");
    }
    let letters = &config.letters;
    if letters.word_slots == 0 || letters.word_slots > letters.max_word_slots {
        bail!(
            "letters.word_slots must be between 1 and max_word_slots ({})",
            letters.max_word_slots
        );
    }
    if config.wager.squares < 2 {
        bail!("wager.squares must be at least 2");
    }
    if config.wager.bonus_percent.iter().any(|p| *p < 0.0) {
        bail!("wager.bonus_percent entries must not be negative");
    }
    Ok(())
}

pub fn validate_content(content: &Content) -> anyhow::Result<()> {
    let mut joker_ids = HashSet::new();
    for joker in &content.jokers {
        if joker.id.trim().is_empty() {
            bail!("joker id cannot be empty");
        }
        if !joker_ids.insert(joker.id.as_str()) {
            bail!("duplicate joker {}", joker.id);
        }
        if joker.price < 0 {
            bail!("joker {} has a negative price", joker.id);
        }
    }
    for (shop, defs) in &content.shops {
        validate_shop(*shop, defs)?;
    }
    Ok(())
}

fn validate_shop(shop: ShopId, defs: &[UpgradeDef]) -> anyhow::Result<()> {
    let mut by_id: HashMap<&str, &UpgradeDef> = HashMap::new();
    for def in defs {
        if def.id.trim().is_empty() {
            bail!("{} shop has an upgrade with an empty id", shop.id());
        }
        if by_id.insert(def.id.as_str(), def).is_some() {
            bail!("duplicate upgrade {} in {} shop", def.id, shop.id());
        }
        if def.max_purchases == 0 {
            bail!("upgrade {} must allow at least one purchase", def.id);
        }
        if def.base_cost < 0 {
            bail!("upgrade {} has a negative cost", def.id);
        }
        if def.price_multiplier.is_some_and(|mult| mult <= 0.0) {
            bail!("upgrade {} has a non-positive price multiplier", def.id);
        }
    }
    for def in defs {
        if let Some(requires) = &def.requires {
            if !by_id.contains_key(requires.as_str()) {
                bail!(
                    "upgrade {} requires unknown upgrade {} in {} shop",
                    def.id,
                    requires,
                    shop.id()
                );
            }
        }
    }
    if let Some(cycle) = detect_cycle_ids(defs.iter().map(|def| def.id.as_str()), |id| {
        by_id
            .get(id)
            .and_then(|def| def.requires.clone())
            .into_iter()
            .collect()
    }) {
        bail!(
            "upgrade requirement cycle in {} shop: {}",
            shop.id(),
            cycle.join(" -> ")
        );
    }
    Ok(())
}

fn detect_cycle_ids<'a, F>(
    ids: impl Iterator<Item = &'a str>,
    mut deps_for: F,
) -> Option<Vec<String>>
where
    F: FnMut(&str) -> Vec<String>,
{
    fn visit<F>(
        id: &str,
        deps_for: &mut F,
        visiting: &mut Vec<String>,
        visited: &mut HashSet<String>,
    ) -> Option<Vec<String>>
    where
        F: FnMut(&str) -> Vec<String>,
    {
        if visited.contains(id) {
            return None;
        }
        if let Some(index) = visiting.iter().position(|value| value == id) {
            let mut cycle = visiting[index..].to_vec();
            cycle.push(id.to_string());
            return Some(cycle);
        }
        visiting.push(id.to_string());
        for dep in deps_for(id) {
            if let Some(cycle) = visit(&dep, deps_for, visiting, visited) {
                return Some(cycle);
            }
        }
        let _ = visiting.pop();
        visited.insert(id.to_string());
        None
    }

    let mut visiting = Vec::new();
    let mut visited = HashSet::new();
    for id in ids {
        if let Some(cycle) = visit(id, &mut deps_for, &mut visiting, &mut visited) {
            return Some(cycle);
        }
    }
    None
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}

fn load_json_optional<T: DeserializeOwned + Default>(path: &Path) -> anyhow::Result<T> {
    if path.exists() {
        load_json(path)
    } else {
        Ok(T::default())
    }
}
