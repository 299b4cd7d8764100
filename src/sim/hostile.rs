//! Hostile characters (wolves, golems, witches)

use serde::{Deserialize, Serialize};

/// Hostile behaviour state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HostileState {
    #[default]
    Idle,
    Attack,
    Dead,
}

/// State machine carried by hostile obstacles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hostile {
    state: HostileState,
}

impl Hostile {
    pub fn state(&self) -> HostileState {
        self.state
    }

    pub fn is_dead(&self) -> bool {
        self.state == HostileState::Dead
    }

    pub fn on_attack(&mut self) -> bool {
        self.transition(HostileState::Attack)
    }

    pub fn on_idle(&mut self) -> bool {
        self.transition(HostileState::Idle)
    }

    pub fn on_die(&mut self) -> bool {
        self.transition(HostileState::Dead)
    }

    fn transition(&mut self, next: HostileState) -> bool {
        if self.state == HostileState::Dead || self.state == next {
            return false;
        }
        self.state = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attack_then_idle() {
        let mut hostile = Hostile::default();
        assert!(hostile.on_attack());
        assert_eq!(hostile.state(), HostileState::Attack);
        assert!(!hostile.on_attack());
        assert!(hostile.on_idle());
        assert_eq!(hostile.state(), HostileState::Idle);
    }

    #[test]
    fn test_dead_is_terminal() {
        let mut hostile = Hostile::default();
        hostile.on_attack();
        assert!(hostile.on_die());
        assert!(!hostile.on_idle());
        assert!(!hostile.on_attack());
        assert!(hostile.is_dead());
    }
}
