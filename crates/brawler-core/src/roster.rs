use serde::{Deserialize, Serialize};

/// Display color of a fighter, used by renderers for fallback drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FighterColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl FighterColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Immutable stats for one selectable fighter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Archetype {
    pub name: &'static str,
    pub color: FighterColor,
    /// Horizontal run speed (units/tick).
    pub speed: f32,
    /// Damage scalar, 10 = neutral.
    pub power: f32,
    /// Initial upward velocity of a jump (units/tick).
    pub jump: f32,
    pub width: f32,
    pub height: f32,
}

/// The fixed selection roster. The first entry is the default pick.
pub static ROSTER: [Archetype; 6] = [
    Archetype {
        name: "Elmo",
        color: FighterColor::rgb(0xf2, 0x42, 0x36),
        speed: 4.8,
        power: 9.0,
        jump: 15.0,
        width: 70.0,
        height: 120.0,
    },
    Archetype {
        name: "Cookie Monster",
        color: FighterColor::rgb(0x16, 0x91, 0xff),
        speed: 4.1,
        power: 11.0,
        jump: 14.0,
        width: 78.0,
        height: 126.0,
    },
    Archetype {
        name: "Big Bird",
        color: FighterColor::rgb(0xff, 0xd2, 0x3f),
        speed: 4.3,
        power: 10.0,
        jump: 16.0,
        width: 76.0,
        height: 138.0,
    },
    Archetype {
        name: "Oscar",
        color: FighterColor::rgb(0x4c, 0xaf, 0x50),
        speed: 5.2,
        power: 8.0,
        jump: 15.0,
        width: 68.0,
        height: 110.0,
    },
    Archetype {
        name: "Bert",
        color: FighterColor::rgb(0xff, 0x9f, 0x1c),
        speed: 4.7,
        power: 9.0,
        jump: 15.0,
        width: 70.0,
        height: 122.0,
    },
    Archetype {
        name: "Ernie",
        color: FighterColor::rgb(0xff, 0x78, 0x4f),
        speed: 5.0,
        power: 8.0,
        jump: 15.0,
        width: 68.0,
        height: 118.0,
    },
];

impl Archetype {
    /// Look up a roster entry by name, ignoring ASCII case.
    pub fn by_name(name: &str) -> Option<&'static Archetype> {
        ROSTER.iter().find(|a| a.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Pick used when no selection was made.
    pub fn default_pick() -> &'static Archetype {
        &ROSTER[0]
    }
}
