//! Closed enumerations used across the Bestiary context.
//!
//! Every enumeration has a stable lowercase text form. The same text is used
//! for the serde representation (JSON columns, map keys) and for the scalar
//! text columns of the storage record.

use std::fmt;
use std::str::FromStr;

use otherworlds_core::error::DomainError;
use serde::{Deserialize, Serialize};

macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident (default $default:ident) {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Stable text form.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(input: &str) -> Result<Self, Self::Err> {
                let wanted = input.trim().to_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.as_str() == wanted)
                    .ok_or_else(|| {
                        DomainError::validation(format!(
                            concat!("unknown ", stringify!($name), ": '{}'"),
                            input
                        ))
                    })
            }
        }
    };
}

text_enum! {
    /// Broad classification of a race.
    RaceCategory (default Unclassified) {
        /// Not yet classified.
        Unclassified => "unclassified",
        Humanoid => "humanoid",
        Beast => "beast",
        Undead => "undead",
        Demon => "demon",
        Dragon => "dragon",
        Elemental => "elemental",
        Construct => "construct",
        Plant => "plant",
        Spirit => "spirit",
        Aberration => "aberration",
    }
}

text_enum! {
    /// Moral leaning of a race.
    Conviction (default Neutral) {
        Good => "good",
        Neutral => "neutral",
        Evil => "evil",
    }
}

text_enum! {
    /// Size category used by body dimensions.
    ///
    /// Unrecognised stored text falls back to `Medium`.
    RaceSize (default Medium) {
        Tiny => "tiny",
        Small => "small",
        Medium => "medium",
        Large => "large",
        Huge => "huge",
        Gargantuan => "gargantuan",
    }
}

text_enum! {
    /// Primary body statistics rolled for members of a race.
    BodyStat (default Strength) {
        Strength => "strength",
        Constitution => "constitution",
        Dexterity => "dexterity",
        Agility => "agility",
        Intelligence => "intelligence",
        Willpower => "willpower",
        Charisma => "charisma",
        Perception => "perception",
    }
}

text_enum! {
    /// Kind of damage dealt by an attack, also used to key vulnerabilities.
    DamageType (default Bludgeoning) {
        Bludgeoning => "bludgeoning",
        Piercing => "piercing",
        Slashing => "slashing",
        Fire => "fire",
        Cold => "cold",
        Lightning => "lightning",
        Acid => "acid",
        Poison => "poison",
        Necrotic => "necrotic",
        Radiant => "radiant",
        Psychic => "psychic",
    }
}

text_enum! {
    /// Ways a creature can move.
    MovementType (default Walk) {
        Walk => "walk",
        Swim => "swim",
        Fly => "fly",
        Climb => "climb",
        Burrow => "burrow",
    }
}

text_enum! {
    /// Anatomical grouping of a body part.
    BodyPartCategory (default Other) {
        Head => "head",
        Torso => "torso",
        Arm => "arm",
        Leg => "leg",
        Tail => "tail",
        Wing => "wing",
        Claw => "claw",
        Horn => "horn",
        Organ => "organ",
        Other => "other",
    }
}

impl RaceSize {
    /// Parses stored text, falling back to the default size (`Medium`) when
    /// the text does not name a known size.
    #[must_use]
    pub fn parse_or_default(text: &str) -> Self {
        text.parse().unwrap_or_default()
    }
}
