//! Going/flaking reconciliation.
//!
//! A member's RSVP is a request to land in one of two lists. The lists stay
//! disjoint: joining one list leaves the other. Repeated presses of the same
//! button are no-ops so callers can skip both the store write and the re-render.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpChoice {
    Going,
    Flaking,
}

impl RsvpChoice {
    pub fn other(self) -> Self {
        match self {
            Self::Going => Self::Flaking,
            Self::Flaking => Self::Going,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Going => "going",
            Self::Flaking => "flaking",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconciliation {
    pub going: Vec<String>,
    pub flaking: Vec<String>,
    pub changed: bool,
    /// Set when the user had to be taken out of the opposite list.
    pub removed_from: Option<RsvpChoice>,
}

impl Reconciliation {
    pub fn list(&self, choice: RsvpChoice) -> &[String] {
        match choice {
            RsvpChoice::Going => &self.going,
            RsvpChoice::Flaking => &self.flaking,
        }
    }
}

/// Moves `user` into `target`, taking them out of the opposite list.
///
/// The target list keeps append order. The opposite list is compacted with
/// swap-remove, so its order is not preserved. Inputs that already violate the
/// invariants (a user in both lists, or listed twice) are repaired.
pub fn reconcile(
    going: Vec<String>,
    flaking: Vec<String>,
    user: &str,
    target: RsvpChoice,
) -> Reconciliation {
    let (mut target_list, mut other_list) = match target {
        RsvpChoice::Going => (going, flaking),
        RsvpChoice::Flaking => (flaking, going),
    };

    let occurrences = target_list.iter().filter(|member| member.as_str() == user).count();
    let in_other = other_list.iter().any(|member| member == user);

    if occurrences == 1 && !in_other {
        return assemble(target, target_list, other_list, false, None);
    }

    let removed_from = if in_other {
        while let Some(index) = other_list.iter().position(|member| member == user) {
            other_list.swap_remove(index);
        }
        Some(target.other())
    } else {
        None
    };

    match occurrences {
        0 => target_list.push(user.to_owned()),
        1 => {}
        _ => {
            let mut seen = false;
            target_list.retain(|member| {
                if member != user {
                    return true;
                }
                !std::mem::replace(&mut seen, true)
            });
        }
    }

    assemble(target, target_list, other_list, true, removed_from)
}

fn assemble(
    target: RsvpChoice,
    target_list: Vec<String>,
    other_list: Vec<String>,
    changed: bool,
    removed_from: Option<RsvpChoice>,
) -> Reconciliation {
    let (going, flaking) = match target {
        RsvpChoice::Going => (target_list, other_list),
        RsvpChoice::Flaking => (other_list, target_list),
    };

    Reconciliation { going, flaking, changed, removed_from }
}
