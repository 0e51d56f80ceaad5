use crate::TransformKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RequiresCount {
    AnyNonzero,
    ExactlyOne,
    TwoOrMore,
}

impl RequiresCount {
    pub fn accepts(self, selected: usize) -> bool {
        match self {
            Self::AnyNonzero => selected >= 1,
            Self::ExactlyOne => selected == 1,
            Self::TwoOrMore => selected >= 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub requires: RequiresCount,
    /// Negative cost keeps the action out of the shop.
    pub cost: i64,
    pub rarity: Rarity,
    pub transform: TransformKind,
}

impl ActionTemplate {
    pub fn purchasable(&self) -> bool {
        self.cost >= 0
    }
}

/// A template copy living in a pile. `uid` is unique per owned card and
/// shared by the pile copies of that card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionInstance {
    pub uid: u32,
    pub template: ActionTemplate,
}

impl ActionInstance {
    pub fn id(&self) -> &str {
        &self.template.id
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub actions: Vec<ActionTemplate>,
    /// Action ids seeded into an empty owned deck; ids may repeat.
    pub base_deck: Vec<String>,
}

impl Catalog {
    pub fn get(&self, id: &str) -> Option<&ActionTemplate> {
        self.actions.iter().find(|action| action.id == id)
    }

    pub fn shop_pool(&self, max_rarity: Rarity) -> Vec<&ActionTemplate> {
        self.actions
            .iter()
            .filter(|action| action.purchasable() && action.rarity <= max_rarity)
            .collect()
    }
}
