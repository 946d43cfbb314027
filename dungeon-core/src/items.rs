//! Standard item catalog.
//!
//! Templates for loot drops, merchant stock and starting equipment. Each
//! template is turned into a fresh [`InventoryItem`] with its own id.

use crate::dice::DiceExpression;
use crate::world::{CharacterClass, InventoryItem, ItemType, Rarity};

/// Static description of an item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemTemplate {
    pub name: &'static str,
    pub item_type: ItemType,
    pub description: &'static str,
    pub value: u32,
    pub rarity: Rarity,
    pub weight: f32,
    pub damage: Option<&'static str>,
    pub armor: Option<i32>,
    /// Healing dice when consumed.
    pub heals: Option<DiceExpression>,
}

impl ItemTemplate {
    const fn new(
        name: &'static str,
        item_type: ItemType,
        description: &'static str,
        value: u32,
        weight: f32,
    ) -> Self {
        Self {
            name,
            item_type,
            description,
            value,
            rarity: Rarity::Common,
            weight,
            damage: None,
            armor: None,
            heals: None,
        }
    }

    const fn damage(mut self, dice: &'static str) -> Self {
        self.damage = Some(dice);
        self
    }

    const fn armor(mut self, armor: i32) -> Self {
        self.armor = Some(armor);
        self
    }

    const fn heals(mut self, dice: DiceExpression) -> Self {
        self.heals = Some(dice);
        self
    }

    const fn rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// A new inventory entry from this template.
    pub fn instantiate(&self, quantity: u32) -> InventoryItem {
        let mut item = InventoryItem::new(self.name, self.item_type, self.description)
            .with_quantity(quantity)
            .with_value(self.value)
            .with_rarity(self.rarity)
            .with_weight(self.weight);
        if let Some(damage) = self.damage {
            item = item.with_damage(damage);
        }
        if let Some(armor) = self.armor {
            item = item.with_armor(armor);
        }
        item
    }
}

const POTION_HEALING: DiceExpression = DiceExpression::new(2, 4, 2);

pub const HEALING_POTION: ItemTemplate = ItemTemplate::new(
    "Healing Potion",
    ItemType::Consumable,
    "A red draught that restores health",
    50,
    0.5,
)
.heals(POTION_HEALING);

pub const COPPER_COINS: ItemTemplate = ItemTemplate::new(
    "Copper Coins",
    ItemType::Treasure,
    "A handful of copper coins",
    5,
    0.1,
);

pub const RUSTY_DAGGER: ItemTemplate = ItemTemplate::new(
    "Rusty Dagger",
    ItemType::Weapon,
    "Old, but the edge still bites",
    8,
    1.0,
)
.damage("1d4");

pub const IRON_SWORD: ItemTemplate = ItemTemplate::new(
    "Iron Sword",
    ItemType::Weapon,
    "A well-forged iron blade",
    25,
    3.0,
)
.damage("1d8+1");

pub const LEATHER_ARMOR: ItemTemplate = ItemTemplate::new(
    "Leather Armor",
    ItemType::Armor,
    "Sturdy boiled leather",
    20,
    10.0,
)
.armor(2);

pub const ROPE: ItemTemplate =
    ItemTemplate::new("Rope", ItemType::Tool, "Fifty feet of hemp rope", 2, 10.0);

pub const TORCH: ItemTemplate =
    ItemTemplate::new("Torch", ItemType::Tool, "Pushes back the dark", 1, 1.0);

pub const RATIONS: ItemTemplate = ItemTemplate::new(
    "Rations",
    ItemType::Consumable,
    "Dried meat, hard bread and cheese",
    1,
    1.0,
);

/// Drops after a won fight.
pub const LOOT_TABLE: &[ItemTemplate] = &[COPPER_COINS, HEALING_POTION, RUSTY_DAGGER];

/// What merchants keep on their shelves.
pub const MERCHANT_STOCK: &[ItemTemplate] =
    &[IRON_SWORD, LEATHER_ARMOR, HEALING_POTION, ROPE, TORCH];

/// Equipment every new adventurer carries, with quantities.
pub const COMMON_STARTING_ITEMS: &[(ItemTemplate, u32)] =
    &[(HEALING_POTION, 2), (TORCH, 3), (ROPE, 1), (RATIONS, 5)];

const CLASS_ITEMS: &[(CharacterClass, &[ItemTemplate])] = &[
    (
        CharacterClass::Fighter,
        &[
            ItemTemplate::new("Longsword", ItemType::Weapon, "A versatile steel blade", 15, 3.0)
                .damage("1d8"),
            ItemTemplate::new("Chain Mail", ItemType::Armor, "Interlocking iron rings", 75, 55.0)
                .armor(6),
        ],
    ),
    (
        CharacterClass::Wizard,
        &[
            ItemTemplate::new("Quarterstaff", ItemType::Weapon, "A gnarled oak staff", 2, 4.0)
                .damage("1d6"),
            ItemTemplate::new("Spellbook", ItemType::Misc, "Your arcane notes", 50, 3.0)
                .rarity(Rarity::Uncommon),
        ],
    ),
    (
        CharacterClass::Rogue,
        &[
            ItemTemplate::new("Shortsword", ItemType::Weapon, "Light and quick", 10, 2.0)
                .damage("1d6"),
            ItemTemplate::new("Thieves' Tools", ItemType::Tool, "Picks and files", 25, 1.0),
        ],
    ),
    (
        CharacterClass::Cleric,
        &[
            ItemTemplate::new("Mace", ItemType::Weapon, "A flanged iron mace", 5, 4.0)
                .damage("1d6"),
            ItemTemplate::new("Holy Symbol", ItemType::Misc, "An amulet of your faith", 5, 1.0),
        ],
    ),
    (
        CharacterClass::Ranger,
        &[
            ItemTemplate::new("Longbow", ItemType::Weapon, "Yew bow and a quiver", 50, 2.0)
                .damage("1d8"),
            ItemTemplate::new("Hunting Trap", ItemType::Tool, "Iron-jawed snare", 5, 25.0),
        ],
    ),
    (
        CharacterClass::Barbarian,
        &[
            ItemTemplate::new("Greataxe", ItemType::Weapon, "A brutal two-handed axe", 30, 7.0)
                .damage("1d12"),
            ItemTemplate::new("Hide Armor", ItemType::Armor, "Thick furs and hides", 10, 12.0)
                .armor(2),
        ],
    ),
    (
        CharacterClass::Bard,
        &[
            ItemTemplate::new("Rapier", ItemType::Weapon, "An elegant thrusting blade", 25, 2.0)
                .damage("1d8"),
            ItemTemplate::new("Lute", ItemType::Tool, "Well-travelled and well-tuned", 35, 2.0),
        ],
    ),
    (
        CharacterClass::Paladin,
        &[
            ItemTemplate::new("Warhammer", ItemType::Weapon, "Blessed steel", 15, 2.0)
                .damage("1d8"),
            ItemTemplate::new("Shield", ItemType::Armor, "Emblazoned with your oath", 10, 6.0)
                .armor(2),
        ],
    ),
];

/// Class equipment followed by the common starter items.
pub fn starting_items(class: CharacterClass) -> Vec<InventoryItem> {
    let class_items = CLASS_ITEMS
        .iter()
        .find(|(c, _)| *c == class)
        .map(|(_, items)| *items)
        .unwrap_or(&[]);
    class_items
        .iter()
        .map(|t| t.instantiate(1))
        .chain(COMMON_STARTING_ITEMS.iter().map(|(t, qty)| t.instantiate(*qty)))
        .collect()
}

/// Find a catalog template by name, case-insensitive.
pub fn find_template(name: &str) -> Option<&'static ItemTemplate> {
    LOOT_TABLE
        .iter()
        .chain(MERCHANT_STOCK)
        .chain(COMMON_STARTING_ITEMS.iter().map(|(t, _)| t))
        .chain(CLASS_ITEMS.iter().flat_map(|(_, items)| items.iter()))
        .find(|t| t.name.eq_ignore_ascii_case(name))
}

/// Healing dice for a consumable, if it heals.
pub fn healing_dice(item: &InventoryItem) -> Option<DiceExpression> {
    if item.item_type != ItemType::Consumable {
        return None;
    }
    find_template(&item.name)
        .and_then(|t| t.heals)
        .or_else(|| item.name.to_lowercase().contains("healing").then_some(POTION_HEALING))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_items_include_common() {
        let items = starting_items(CharacterClass::Fighter);
        assert_eq!(items.len(), 2 + COMMON_STARTING_ITEMS.len());
        assert_eq!(items[0].name, "Longsword");
        assert!(items.iter().any(|i| i.name == "Healing Potion" && i.quantity == 2));
        for class in CharacterClass::all() {
            assert!(starting_items(class).len() > COMMON_STARTING_ITEMS.len(), "{class}");
        }
    }

    #[test]
    fn test_instantiate_gives_fresh_ids() {
        let a = IRON_SWORD.instantiate(1);
        let b = IRON_SWORD.instantiate(1);
        assert_ne!(a.id, b.id);
        assert_eq!(a.stats.as_ref().and_then(|s| s.damage.as_deref()), Some("1d8+1"));
    }

    #[test]
    fn test_healing_dice() {
        assert_eq!(healing_dice(&HEALING_POTION.instantiate(1)), Some(DiceExpression::new(2, 4, 2)));
        assert_eq!(healing_dice(&RATIONS.instantiate(1)), None);
        assert_eq!(healing_dice(&RUSTY_DAGGER.instantiate(1)), None);
    }

    #[test]
    fn test_find_template() {
        assert_eq!(find_template("iron sword").map(|t| t.value), Some(25));
        assert!(find_template("lute").is_some());
        assert!(find_template("excalibur").is_none());
    }
}
