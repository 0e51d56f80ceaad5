pub use sortdeck_core::{
    ActionTemplate, Catalog, EconomyRule, GameConfig, Rarity, RequiresCount, ShopRule,
    TransformKind,
};

/// Everything a run needs from the assets directory.
#[derive(Debug, Clone)]
pub struct GameData {
    pub config: GameConfig,
    pub catalog: Catalog,
}
