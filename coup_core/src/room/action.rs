//! The seven actions a seat may declare, plus their fixed metadata.
//!
//! Modeled as a tagged variant with a metadata lookup rather than
//! polymorphic dispatch: there is one [`Action::metadata`] table and a
//! single `Room` method that matches on the tag, keeping the FSM in one
//! place instead of scattered across per-action method bodies.

use serde::{Deserialize, Serialize};

use crate::room::entities::Role;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Action {
    Income,
    ForeignAid,
    Coup,
    Tax,
    Steal,
    Assassinate,
    Exchange,
}

/// Fixed attributes of an action, per the action taxonomy.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ActionMetadata {
    pub cost: u32,
    pub character: Option<Role>,
    pub targeted: bool,
    pub blockable_by: &'static [Role],
    pub challengeable: bool,
}

impl Action {
    #[must_use]
    pub const fn metadata(self) -> ActionMetadata {
        match self {
            Action::Income => ActionMetadata {
                cost: 0,
                character: None,
                targeted: false,
                blockable_by: &[],
                challengeable: false,
            },
            Action::ForeignAid => ActionMetadata {
                cost: 0,
                character: None,
                targeted: false,
                blockable_by: &[Role::Duke],
                challengeable: false,
            },
            Action::Coup => ActionMetadata {
                cost: 7,
                character: None,
                targeted: true,
                blockable_by: &[],
                challengeable: false,
            },
            Action::Tax => ActionMetadata {
                cost: 0,
                character: Some(Role::Duke),
                targeted: false,
                blockable_by: &[],
                challengeable: true,
            },
            Action::Steal => ActionMetadata {
                cost: 0,
                character: Some(Role::Captain),
                targeted: true,
                blockable_by: &[Role::Captain, Role::Ambassador],
                challengeable: true,
            },
            Action::Assassinate => ActionMetadata {
                cost: 3,
                character: Some(Role::Assassin),
                targeted: true,
                blockable_by: &[Role::Contessa],
                challengeable: true,
            },
            Action::Exchange => ActionMetadata {
                cost: 0,
                character: Some(Role::Ambassador),
                targeted: false,
                blockable_by: &[],
                challengeable: true,
            },
        }
    }

    #[must_use]
    pub const fn is_targeted(self) -> bool {
        self.metadata().targeted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coup_costs_seven_and_is_targeted_unblockable() {
        let meta = Action::Coup.metadata();
        assert_eq!(meta.cost, 7);
        assert!(meta.targeted);
        assert!(meta.blockable_by.is_empty());
        assert!(!meta.challengeable);
    }

    #[test]
    fn assassinate_costs_three_blockable_by_contessa() {
        let meta = Action::Assassinate.metadata();
        assert_eq!(meta.cost, 3);
        assert_eq!(meta.character, Some(Role::Assassin));
        assert_eq!(meta.blockable_by, &[Role::Contessa]);
    }

    #[test]
    fn foreign_aid_blockable_but_not_challengeable() {
        let meta = Action::ForeignAid.metadata();
        assert!(meta.blockable_by.contains(&Role::Duke));
        assert!(!meta.challengeable);
    }

    #[test]
    fn income_has_no_character_no_block_no_challenge() {
        let meta = Action::Income.metadata();
        assert_eq!(meta.character, None);
        assert!(meta.blockable_by.is_empty());
        assert!(!meta.challengeable);
    }
}
