use serde::{Deserialize, Serialize};

/// The two attacks a fighter can throw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackKind {
    /// Light attack: short range, fast recovery.
    Jab,
    /// Heavy attack: longer range, more damage, slower recovery.
    Kick,
}

/// Live command flags for the human-controlled fighter.
///
/// Updated by an external input source; the simulation only reads them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandFlags {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub light: bool,
    pub heavy: bool,
}

impl CommandFlags {
    /// Apply a key transition using the default layout
    /// (`a`/`d` move, `w` jump, `f` jab, `g` kick).
    ///
    /// Returns the attack fired by a key-down edge, if any. Unknown keys are
    /// ignored.
    pub fn set_key(&mut self, key: &str, pressed: bool) -> Option<AttackKind> {
        let key = key.to_ascii_lowercase();
        let slot = match key.as_str() {
            "a" => &mut self.left,
            "d" => &mut self.right,
            "w" => &mut self.jump,
            "f" => &mut self.light,
            "g" => &mut self.heavy,
            _ => return None,
        };
        *slot = pressed;

        if !pressed {
            return None;
        }
        match key.as_str() {
            "f" => Some(AttackKind::Jab),
            "g" => Some(AttackKind::Kick),
            _ => None,
        }
    }

    /// Horizontal direction implied by the movement flags: -1, 0 or +1.
    /// Holding both directions cancels out.
    pub fn horizontal(&self) -> i8 {
        match (self.left, self.right) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }
}
