use crate::creature::Combatant;
use crate::errors::RosterError;
use serde::{Deserialize, Serialize};

pub const MAX_PARTY_SIZE: usize = 6;

/// Ordered roster of one to six combatants. Order decides who leads and who a trainer sends
/// out next.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Party {
    members: Vec<Combatant>,
}

impl Party {
    pub fn new(members: Vec<Combatant>) -> Result<Self, RosterError> {
        if members.is_empty() {
            return Err(RosterError::Empty);
        }
        if members.len() > MAX_PARTY_SIZE {
            return Err(RosterError::Full {
                max: MAX_PARTY_SIZE,
            });
        }
        Ok(Self { members })
    }

    /// Single-member party, used for a wild opponent.
    pub fn solo(member: Combatant) -> Self {
        Self {
            members: vec![member],
        }
    }

    pub fn members(&self) -> &[Combatant] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [Combatant] {
        &mut self.members
    }

    pub fn get(&self, index: usize) -> Option<&Combatant> {
        self.members.get(index)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= MAX_PARTY_SIZE
    }

    /// Index of the first member that can still fight.
    pub fn healthy_member(&self) -> Option<usize> {
        self.members.iter().position(|member| !member.is_fainted())
    }

    /// First healthy member other than `index`.
    pub fn healthy_member_except(&self, index: usize) -> Option<usize> {
        self.members
            .iter()
            .enumerate()
            .find(|(i, member)| *i != index && !member.is_fainted())
            .map(|(i, _)| i)
    }

    pub fn healthy_members(&self) -> impl Iterator<Item = &Combatant> {
        self.members.iter().filter(|member| !member.is_fainted())
    }

    pub fn has_healthy_member(&self) -> bool {
        self.healthy_member().is_some()
    }

    pub fn add_member(&mut self, member: Combatant) -> Result<(), RosterError> {
        if self.is_full() {
            return Err(RosterError::Full {
                max: MAX_PARTY_SIZE,
            });
        }
        self.members.push(member);
        Ok(())
    }

    pub fn heal_all(&mut self) {
        for member in &mut self.members {
            member.heal_full();
        }
    }

    pub fn on_battle_over(&mut self) {
        for member in &mut self.members {
            member.on_battle_over();
        }
    }
}
