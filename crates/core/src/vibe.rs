use rand::Rng;

/// Faces on the vibe die; rolls below `PASSING_ROLLS` pass.
pub const DIE_FACES: u32 = 6;
const PASSING_ROLLS: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VibeVerdict {
    Passed,
    Failed,
}

impl VibeVerdict {
    pub fn from_roll(roll: u32) -> Self {
        if roll < PASSING_ROLLS {
            Self::Passed
        } else {
            Self::Failed
        }
    }

    pub fn roll<R: Rng>(rng: &mut R) -> Self {
        Self::from_roll(rng.gen_range(0..DIE_FACES))
    }
}

/// Who is being checked: a named member, or the invoker by mention.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VibeSubject<'a> {
    Named(&'a str),
    Mention(&'a str),
}

pub fn vibe_check_message(subject: VibeSubject<'_>, verdict: VibeVerdict) -> String {
    let who = match subject {
        VibeSubject::Named(username) => format!("**{username}**"),
        VibeSubject::Mention(user_id) => format!("<@{user_id}>"),
    };

    match verdict {
        VibeVerdict::Passed => format!("{who} has passed the vibe check  :sunglasses:"),
        VibeVerdict::Failed => format!("{who} has failed the vibe check  :thumbsdown:"),
    }
}
