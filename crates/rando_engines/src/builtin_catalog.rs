#![forbid(unsafe_code)]

use rando_contracts::{
    ChoiceEntry, OptionKey, OptionKind, OptionSchema, OptionSpec, ScopeClass, SchemaError,
    MAX_PARTICIPANTS,
};
use rust_decimal::Decimal;

/// Option extended with discovered sprite sheets.
pub const ASSET_OPTION_KEY: &str = "gfxmod";

fn option(
    key: &str,
    label: &str,
    scope: ScopeClass,
    kind: OptionKind,
) -> Result<OptionSpec, SchemaError> {
    let key = OptionKey::new(key).map_err(|violation| SchemaError::InvalidOption {
        key: key.to_string(),
        violation,
    })?;
    OptionSpec::new(key, label, scope, kind)
}

fn boolean(default: bool) -> OptionKind {
    OptionKind::Boolean { default }
}

fn choice(choices: &[(&str, &str)], default_value: &str) -> OptionKind {
    OptionKind::SingleChoice {
        choices: choices
            .iter()
            .map(|(label, value)| ChoiceEntry::new(*label, *value))
            .collect(),
        default_value: default_value.to_string(),
    }
}

/// The randomizer's option surface, in display order.
pub fn builtin_catalog() -> Result<OptionSchema, SchemaError> {
    use ScopeClass::{Global, PerParticipant as Player};

    let options = vec![
        option(
            "seed",
            "Seed",
            Global,
            OptionKind::Text {
                default: String::new(),
            },
        )?,
        option(
            "multiworld",
            "Multiworld",
            Global,
            OptionKind::ParticipantCount {
                max: MAX_PARTICIPANTS,
            },
        )?,
        option(
            "forwardfactor",
            "Forward Factor",
            Global,
            OptionKind::NumericRange {
                min: Decimal::new(1, 1),
                max: Decimal::new(1000, 1),
                step: Decimal::new(1, 1),
                default: Decimal::new(5, 1),
            },
        )?,
        option("race", "Race Mode", Global, boolean(false))?,
        option(
            "spoilerformat",
            "Spoiler Format",
            Global,
            choice(
                &[
                    ("None", "none"),
                    ("Console", "console"),
                    ("Text", "text"),
                    ("JSON", "json"),
                ],
                "none",
            ),
        )?,
        // Main
        option(
            "logic",
            "Logic",
            Player,
            choice(
                &[
                    ("Casual", "casual"),
                    ("Normal", "normal"),
                    ("Hard", "hard"),
                    ("Glitched", "glitched"),
                    ("Hell", "hell"),
                ],
                "normal",
            ),
        )?,
        option(
            "accessibility",
            "Accessibility",
            Player,
            choice(&[("100% Locations", "all"), ("Beatable", "goal")], "all"),
        )?,
        // Items
        option("heartpiece", "Randomize Heart Pieces", Player, boolean(true))?,
        option("seashells", "Randomize Seashells", Player, boolean(true))?,
        option(
            "heartcontainers",
            "Randomize Heart Containers",
            Player,
            boolean(true),
        )?,
        option("instruments", "Randomize Instruments", Player, boolean(false))?,
        option("witch", "Randomize Witch", Player, boolean(true))?,
        option(
            "boomerang",
            "Boomerang Mode",
            Player,
            choice(
                &[
                    ("Normal (require lens)", "default"),
                    ("Trade", "trade"),
                    ("Gift", "gift"),
                ],
                "gift",
            ),
        )?,
        // Gameplay
        option(
            "dungeon-items",
            "Dungeon Items",
            Player,
            choice(
                &[
                    ("Standard", "standard"),
                    ("Map/Compass/Beak", "localkeys"),
                    ("MCB + Small Key", "localnightmarekey"),
                    ("Keysanity", "keysanity"),
                ],
                "standard",
            ),
        )?,
        option(
            "randomstartlocation",
            "Random Start Location",
            Player,
            boolean(false),
        )?,
        option("dungeonshuffle", "Dungeon Shuffle", Player, boolean(false))?,
        option(
            "entranceshuffle",
            "Entrance Randomizer",
            Player,
            choice(
                &[
                    ("Default", "none"),
                    ("Simple", "simple"),
                    ("Advanced", "advanced"),
                    ("Expert", "expert"),
                    ("Insanity", "insanity"),
                ],
                "none",
            ),
        )?,
        option(
            "boss",
            "Boss Shuffle",
            Player,
            choice(
                &[
                    ("Normal", "default"),
                    ("Shuffle", "shuffle"),
                    ("Randomize", "random"),
                ],
                "default",
            ),
        )?,
        option(
            "miniboss",
            "Miniboss Shuffle",
            Player,
            choice(
                &[
                    ("Normal", "default"),
                    ("Shuffle", "shuffle"),
                    ("Randomize", "random"),
                ],
                "default",
            ),
        )?,
        option(
            "goal",
            "Goal",
            Player,
            choice(
                &[
                    ("8", "8"),
                    ("7", "7"),
                    ("6", "6"),
                    ("5", "5"),
                    ("4", "4"),
                    ("3", "3"),
                    ("2", "2"),
                    ("1", "1"),
                    ("0", "0"),
                    ("Egg Open", "-1"),
                    ("Random", "random"),
                    ("Random (S)", "open-4"),
                    ("Random (L)", "5-8"),
                    ("Raft", "raft"),
                    ("Seashells (20)", "seashells"),
                    ("Bingo (Line)", "bingo"),
                    ("BINGO (Card)", "bingo-full"),
                ],
                "8",
            ),
        )?,
        option(
            "pool",
            "Item Pool",
            Player,
            choice(
                &[
                    ("Normal", "normal"),
                    ("Casual", "casual"),
                    ("Path of Pain", "pain"),
                    ("More Keys", "keyup"),
                ],
                "normal",
            ),
        )?,
        option(
            "hpmode",
            "Health Mode",
            Player,
            choice(
                &[
                    ("Normal", "default"),
                    ("Inverted", "inverted"),
                    ("Start with 1 heart", "1"),
                    ("Low Max", "low"),
                ],
                "default",
            ),
        )?,
        option("hard-mode", "Oracles Mode", Player, boolean(false))?,
        option(
            "steal",
            "Stealing",
            Player,
            choice(
                &[("Always", "always"), ("Never", "never"), ("Normal", "default")],
                "always",
            ),
        )?,
        // Special
        option(
            "bowwow",
            "Bow Wow Mode",
            Player,
            choice(
                &[
                    ("Disabled", "normal"),
                    ("Enabled", "always"),
                    ("Swordless", "swordless"),
                ],
                "normal",
            ),
        )?,
        option(
            "overworld",
            "Overworld",
            Player,
            choice(
                &[("Normal", "normal"), ("Dungeon Dive", "dungeondive")],
                "normal",
            ),
        )?,
        option(
            "owlstatues",
            "Owl Statue Items",
            Player,
            choice(
                &[
                    ("Never", "none"),
                    ("Dungeons", "dungeon"),
                    ("Overworld", "overworld"),
                    ("All", "both"),
                ],
                "none",
            ),
        )?,
        // User
        option(
            "quickswap",
            "Quickswap with SELECT",
            Player,
            choice(
                &[("Disabled", "none"), ("Swap A", "a"), ("Swap B", "b")],
                "none",
            ),
        )?,
        option(
            "textmode",
            "Text Speed",
            Player,
            choice(
                &[("Fast", "fast"), ("Normal", "default"), ("No Text", "none")],
                "fast",
            ),
        )?,
        option(
            "lowhpbeep",
            "Low HP Beeps",
            Player,
            choice(
                &[("Slow", "slow"), ("Normal", "default"), ("Disabled", "none")],
                "slow",
            ),
        )?,
        option(
            "remove-flashing-lights",
            "Remove Flashing Lights",
            Player,
            boolean(true),
        )?,
        // Differs from the web generator default.
        option("nag-messages", "Nag Messages", Player, boolean(true))?,
        option(
            ASSET_OPTION_KEY,
            "Sprites",
            Player,
            OptionKind::AssetChoice {
                choices: vec![ChoiceEntry::new("Default", "default")],
                default_value: "default".to_string(),
            },
        )?,
        option(
            "linkspalette",
            "Tunic",
            Player,
            choice(
                &[
                    ("Normal", ""),
                    ("Green", "0"),
                    ("Yellow", "1"),
                    ("Red", "2"),
                    ("Blue", "3"),
                ],
                "",
            ),
        )?,
        option(
            "music",
            "Music",
            Player,
            choice(
                &[
                    ("Default", "default"),
                    ("Random", "random"),
                    ("Disabled", "off"),
                ],
                "default",
            ),
        )?,
    ];

    OptionSchema::v1(options)
}
