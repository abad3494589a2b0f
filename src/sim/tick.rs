//! Fixed timestep simulation tick
//!
//! Front ends feed one `TickInput` per frame; `FixedStepper` turns variable
//! frame times into whole simulation steps.

use super::challenge::{ChallengeKind, ChallengeStage};
use super::session::GameSession;
use crate::consts::*;
use crate::persistence::ProgressSink;

/// The player picked `value` from the options of a `kind` challenge
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerEvent {
    pub kind: ChallengeKind,
    pub value: String,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Answer clicked this frame (one-shot)
    pub answer: Option<AnswerEvent>,
    /// Idle/demo mode - AI answers every challenge correctly
    pub autoplay: bool,
}

/// Advance the session by one fixed timestep
pub fn tick<S: ProgressSink>(session: &mut GameSession<S>, input: &TickInput, dt: f32) {
    let answer = match &input.answer {
        Some(answer) => Some(answer.clone()),
        None if input.autoplay => autoplay_answer(session),
        None => None,
    };

    if let Some(answer) = answer {
        session.submit_answer(answer.kind, &answer.value);
    }

    session.step(dt);
}

/// Demo AI: answer the pending challenge once it is close enough that the
/// dodge will still have time to fire
fn autoplay_answer<S: ProgressSink>(session: &GameSession<S>) -> Option<AnswerEvent> {
    let challenge = session.challenge()?;
    if challenge.stage != ChallengeStage::Pending {
        return None;
    }
    let gap = challenge.gap_to(session.player().x);
    if gap > session.settings().autoplay_answer_distance {
        return None;
    }
    Some(AnswerEvent {
        kind: challenge.kind,
        value: challenge.correct_answer.clone(),
    })
}

/// Accumulates frame time into fixed simulation steps
#[derive(Debug, Clone, Default)]
pub struct FixedStepper {
    accumulator: f32,
}

impl FixedStepper {
    pub fn new() -> Self {
        Self { accumulator: 0.0 }
    }

    /// Run as many fixed ticks as `frame_dt` covers. One-shot inputs are
    /// consumed by the first tick. Returns the number of ticks run.
    pub fn advance<S: ProgressSink>(
        &mut self,
        session: &mut GameSession<S>,
        input: &mut TickInput,
        frame_dt: f32,
    ) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(session, input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            input.answer = None;
        }
        substeps
    }
}
