//! Pacer state machine for cadence.
//!
//! This module provides a pure, side-effect-free state machine for pacing a
//! breathing exercise. Each tick takes the elapsed time, the tempo and the
//! sampled control command as input, updates the pacer and returns a list of
//! actions to execute.
//!
//! The actual audio dispatch is performed by cadence-client, not by this
//! module. This enables instant unit testing without audio mocks.

use cadence_types::{AudioCue, Channel, ControlCommand, CueSet, PacerError, Phase, Tempo};
use std::time::Duration;

use crate::clock::HalfCycleClock;

/// How progress moves on each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Motion {
    /// Progress is frozen.
    #[default]
    Still,
    /// Progress advances and the phase alternates at each boundary.
    Cycling,
    /// Progress advances to the end of the current half-cycle and holds.
    Gliding,
}

/// Read-only snapshot of the pacer, published to the render model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacerState {
    /// Current phase.
    pub phase: Phase,
    /// Half-cycle duration in effect.
    pub tempo: Tempo,
    /// Progress through the current half-cycle, in `[0.0, 1.0]`.
    pub progress: f64,
    /// The last command applied by reconciliation.
    pub last_applied: ControlCommand,
    /// How progress is moving.
    pub motion: Motion,
}

impl PacerState {
    /// The state of a freshly initialized pacer.
    pub fn initial(tempo: Tempo) -> Self {
        Self {
            phase: Phase::Idle,
            tempo,
            progress: 0.0,
            last_applied: ControlCommand::None,
            motion: Motion::Still,
        }
    }

    /// Check if repeat-cycling is enabled.
    pub fn is_cycling(&self) -> bool {
        self.motion == Motion::Cycling
    }
}

/// Actions to be executed by the cadence-client.
///
/// These are instructions, not side effects. They must be executed in order:
/// stops always precede the play they make room for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Start a cue, superseding whatever plays on its channel.
    Play(AudioCue),
    /// Silence a channel.
    Stop(Channel),
    /// Report an event to the application.
    Emit(PacerEvent),
}

/// Events emitted to the application layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacerEvent {
    /// A breathing phase was entered.
    PhaseEntered {
        /// The phase entered.
        phase: Phase,
    },
    /// The tempo changed mid-cycle and the pacer restarted its inhale.
    Resynchronized {
        /// The adopted tempo.
        tempo: Tempo,
    },
    /// The pacer was stopped.
    Stopped,
    /// A single tick spanned several boundaries; only the last was cued.
    BoundariesSkipped {
        /// Number of boundaries that were not cued.
        count: u64,
    },
}

/// The pacer state machine - NO I/O, just phase transitions.
#[derive(Debug, Clone)]
pub struct Pacer {
    phase: Phase,
    tempo: Tempo,
    motion: Motion,
    last_applied: ControlCommand,
    clock: HalfCycleClock,
    cues: CueSet,
}

impl Pacer {
    /// Create a new pacer in the Idle phase.
    ///
    /// No actions are produced; nothing plays until a command arrives.
    pub fn new(tempo: Tempo, cues: CueSet) -> Self {
        Self {
            phase: Phase::Idle,
            tempo,
            motion: Motion::Still,
            last_applied: ControlCommand::None,
            clock: HalfCycleClock::new(),
            cues,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> PacerState {
        PacerState {
            phase: self.phase,
            tempo: self.tempo,
            progress: self.clock.progress(self.tempo),
            last_applied: self.last_applied,
            motion: self.motion,
        }
    }

    /// The cues this pacer dispatches.
    pub fn cues(&self) -> &CueSet {
        &self.cues
    }

    /// Advance the pacer by one tick and return the actions to execute.
    ///
    /// In order:
    /// 1. A tempo different from the current one while breathing forces a
    ///    resynchronization: both channels stop and the inhale restarts at
    ///    the new tempo. The command is not reconciled on such a tick.
    /// 2. A command different from the last applied one is applied.
    /// 3. Progress advances by `elapsed`, crossing boundaries as needed.
    ///
    /// # Errors
    ///
    /// Returns [`PacerError::InvalidTempo`] for a zero tempo. The pacer is
    /// left untouched.
    pub fn tick(
        &mut self,
        elapsed: Duration,
        tempo: Duration,
        command: ControlCommand,
    ) -> Result<Vec<Action>, PacerError> {
        let tempo = Tempo::new(tempo)?;
        let mut actions = Vec::new();

        if tempo != self.tempo {
            if self.phase.is_breathing() {
                self.tempo = tempo;
                self.resynchronize(&mut actions);
                return Ok(actions);
            }
            self.clock.retime(self.tempo, tempo);
            self.tempo = tempo;
        }

        if command != self.last_applied {
            let restarted = self.apply(command, &mut actions);
            self.last_applied = command;
            if restarted {
                // The elapsed time predates the restart
                return Ok(actions);
            }
        }

        self.advance(elapsed, &mut actions);
        Ok(actions)
    }

    fn resynchronize(&mut self, actions: &mut Vec<Action>) {
        silence(actions);
        self.clock.reset();
        self.motion = Motion::Cycling;
        actions.push(Action::Emit(PacerEvent::Resynchronized { tempo: self.tempo }));
        self.enter(Phase::Inhaling, actions);
    }

    /// Apply a command. Returns `true` if the half-cycle restarted.
    fn apply(&mut self, command: ControlCommand, actions: &mut Vec<Action>) -> bool {
        match command {
            ControlCommand::None => false,
            ControlCommand::Repeat if self.phase.is_breathing() => {
                self.motion = Motion::Cycling;
                false
            }
            ControlCommand::Repeat => {
                self.clock.reset();
                self.motion = Motion::Cycling;
                self.enter(Phase::Inhaling, actions);
                true
            }
            ControlCommand::Forward => {
                self.nudge(Phase::Inhaling, actions);
                false
            }
            ControlCommand::Reverse => {
                self.nudge(Phase::Exhaling, actions);
                false
            }
            ControlCommand::Stop => {
                silence(actions);
                self.phase = Phase::Stopped;
                self.motion = Motion::Still;
                actions.push(Action::Emit(PacerEvent::Stopped));
                false
            }
            ControlCommand::Reset => {
                silence(actions);
                self.clock.reset();
                self.motion = Motion::Cycling;
                self.enter(Phase::Inhaling, actions);
                true
            }
        }
    }

    fn nudge(&mut self, target: Phase, actions: &mut Vec<Action>) {
        self.motion = Motion::Gliding;
        if self.phase != target {
            self.enter(target, actions);
        }
    }

    fn advance(&mut self, elapsed: Duration, actions: &mut Vec<Action>) {
        if !self.phase.is_breathing() {
            return;
        }
        match self.motion {
            Motion::Cycling => {
                let crossings = self.clock.advance(elapsed, self.tempo);
                if crossings == 0 {
                    return;
                }
                if crossings > 1 {
                    actions.push(Action::Emit(PacerEvent::BoundariesSkipped {
                        count: crossings - 1,
                    }));
                }
                let next = if crossings % 2 == 1 {
                    self.phase.flipped()
                } else {
                    self.phase
                };
                self.enter(next, actions);
            }
            Motion::Gliding => {
                self.clock.glide(elapsed, self.tempo);
            }
            Motion::Still => {}
        }
    }

    /// Phase entry: silence the other channel, then cue this phase's channel.
    fn enter(&mut self, phase: Phase, actions: &mut Vec<Action>) {
        self.phase = phase;
        let Some(channel) = phase.channel() else {
            return;
        };
        let stop_other = Action::Stop(channel.other());
        if !actions.contains(&stop_other) {
            actions.push(stop_other);
        }
        actions.push(Action::Play(self.cues.cue_for(channel)));
        actions.push(Action::Emit(PacerEvent::PhaseEntered { phase }));
    }
}

/// Stop both channels (cancellation point).
fn silence(actions: &mut Vec<Action>) {
    actions.extend(Channel::BOTH.into_iter().map(Action::Stop));
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_types::Volume;

    const TEMPO: Duration = Duration::from_secs(4);
    const FRAME: Duration = Duration::from_millis(100);

    fn pacer() -> Pacer {
        Pacer::new(Tempo::new(TEMPO).unwrap(), CueSet::new(Volume::new(80).unwrap()))
    }

    fn plays(actions: &[Action]) -> Vec<Channel> {
        actions
            .iter()
            .filter_map(|a| match a {
                Action::Play(cue) => Some(cue.channel),
                _ => None,
            })
            .collect()
    }

    fn stops(actions: &[Action]) -> Vec<Channel> {
        actions
            .iter()
            .filter_map(|a| match a {
                Action::Stop(channel) => Some(*channel),
                _ => None,
            })
            .collect()
    }

    /// A pacer cycling at the given progress through an inhale.
    fn inhaling_at(progress: f64) -> Pacer {
        let mut pacer = pacer();
        pacer
            .tick(Duration::ZERO, TEMPO, ControlCommand::Repeat)
            .unwrap();
        pacer
            .tick(TEMPO.mul_f64(progress), TEMPO, ControlCommand::Repeat)
            .unwrap();
        pacer
    }

    // ===========================================
    // Initialization
    // ===========================================

    #[test]
    fn starts_idle() {
        let state = pacer().state();
        assert_eq!(state, PacerState::initial(Tempo::new(TEMPO).unwrap()));
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.progress, 0.0);
        assert_eq!(state.last_applied, ControlCommand::None);
        assert!(!state.is_cycling());
    }

    #[test]
    fn idle_none_does_nothing() {
        let mut pacer = pacer();
        let actions = pacer.tick(FRAME, TEMPO, ControlCommand::None).unwrap();
        assert!(actions.is_empty());
        assert_eq!(pacer.state().phase, Phase::Idle);
        assert_eq!(pacer.state().progress, 0.0);
    }

    // ===========================================
    // Command Reconciliation
    // ===========================================

    #[test]
    fn repeat_from_idle_starts_inhaling() {
        let mut pacer = pacer();
        let actions = pacer.tick(FRAME, TEMPO, ControlCommand::Repeat).unwrap();

        let state = pacer.state();
        assert_eq!(state.phase, Phase::Inhaling);
        assert_eq!(state.progress, 0.0);
        assert!(state.is_cycling());
        assert_eq!(plays(&actions), vec![Channel::In]);
        assert_eq!(stops(&actions), vec![Channel::Out]);

        let play = actions.iter().find_map(|a| match a {
            Action::Play(cue) => Some(cue.clone()),
            _ => None,
        });
        let cue = play.unwrap();
        assert_eq!(cue.asset, "breath-in");
        assert_eq!(cue.volume.percent(), 80);
    }

    #[test]
    fn repeated_command_is_idempotent() {
        let mut pacer = pacer();
        let mut all = Vec::new();
        for _ in 0..5 {
            all.extend(pacer.tick(Duration::ZERO, TEMPO, ControlCommand::Repeat).unwrap());
        }
        assert_eq!(plays(&all), vec![Channel::In]);
        assert_eq!(stops(&all).len(), 1);
    }

    #[test]
    fn repeated_stop_is_idempotent() {
        let mut pacer = inhaling_at(0.5);
        let first = pacer.tick(FRAME, TEMPO, ControlCommand::Stop).unwrap();
        let second = pacer.tick(FRAME, TEMPO, ControlCommand::Stop).unwrap();
        assert_eq!(stops(&first), vec![Channel::In, Channel::Out]);
        assert!(second.is_empty());
    }

    #[test]
    fn repeat_while_breathing_keeps_phase() {
        let mut pacer = pacer();
        pacer.tick(Duration::ZERO, TEMPO, ControlCommand::Reverse).unwrap();
        pacer.tick(Duration::from_secs(1), TEMPO, ControlCommand::Reverse).unwrap();
        assert_eq!(pacer.state().motion, Motion::Gliding);

        let actions = pacer.tick(Duration::ZERO, TEMPO, ControlCommand::Repeat).unwrap();
        assert!(plays(&actions).is_empty());
        assert_eq!(pacer.state().phase, Phase::Exhaling);
        assert_eq!(pacer.state().progress, 0.25);
        assert!(pacer.state().is_cycling());
    }

    #[test]
    fn none_is_recorded_so_command_can_reapply() {
        let mut pacer = pacer();
        pacer.tick(Duration::ZERO, TEMPO, ControlCommand::Stop).unwrap();
        pacer.tick(Duration::ZERO, TEMPO, ControlCommand::None).unwrap();
        assert_eq!(pacer.state().last_applied, ControlCommand::None);

        let actions = pacer.tick(Duration::ZERO, TEMPO, ControlCommand::Repeat).unwrap();
        assert_eq!(plays(&actions), vec![Channel::In]);
    }

    #[test]
    fn forward_enters_inhaling_without_reset() {
        let mut pacer = pacer();
        pacer.tick(Duration::ZERO, TEMPO, ControlCommand::Reverse).unwrap();
        pacer.tick(Duration::from_secs(2), TEMPO, ControlCommand::Reverse).unwrap();
        assert_eq!(pacer.state().progress, 0.5);

        let actions = pacer.tick(Duration::ZERO, TEMPO, ControlCommand::Forward).unwrap();
        let state = pacer.state();
        assert_eq!(state.phase, Phase::Inhaling);
        assert_eq!(state.progress, 0.5);
        assert!(!state.is_cycling());
        assert_eq!(plays(&actions), vec![Channel::In]);
    }

    #[test]
    fn reverse_enters_exhaling() {
        let mut pacer = inhaling_at(0.25);
        let actions = pacer.tick(Duration::ZERO, TEMPO, ControlCommand::Reverse).unwrap();
        let state = pacer.state();
        assert_eq!(state.phase, Phase::Exhaling);
        assert_eq!(state.progress, 0.25);
        assert_eq!(plays(&actions), vec![Channel::Out]);
        assert_eq!(stops(&actions), vec![Channel::In]);
    }

    #[test]
    fn forward_into_current_phase_does_not_recue() {
        let mut pacer = inhaling_at(0.25);
        let actions = pacer.tick(Duration::ZERO, TEMPO, ControlCommand::Forward).unwrap();
        assert!(plays(&actions).is_empty());
        assert_eq!(pacer.state().motion, Motion::Gliding);
    }

    #[test]
    fn glide_holds_without_crossing() {
        let mut pacer = pacer();
        pacer.tick(Duration::ZERO, TEMPO, ControlCommand::Forward).unwrap();
        let actions = pacer
            .tick(Duration::from_secs(10), TEMPO, ControlCommand::Forward)
            .unwrap();
        assert!(actions.is_empty());
        assert_eq!(pacer.state().phase, Phase::Inhaling);
        assert_eq!(pacer.state().progress, 1.0);
    }

    #[test]
    fn stop_from_any_phase() {
        for command in [
            ControlCommand::None,
            ControlCommand::Repeat,
            ControlCommand::Forward,
            ControlCommand::Reverse,
        ] {
            let mut pacer = pacer();
            pacer.tick(Duration::ZERO, TEMPO, command).unwrap();
            let actions = pacer.tick(FRAME, TEMPO, ControlCommand::Stop).unwrap();

            let state = pacer.state();
            assert_eq!(state.phase, Phase::Stopped, "after {command}");
            assert!(!state.is_cycling());
            assert_eq!(stops(&actions), vec![Channel::In, Channel::Out]);
            assert!(plays(&actions).is_empty());
            assert!(actions.contains(&Action::Emit(PacerEvent::Stopped)));
        }
    }

    #[test]
    fn stopped_does_not_advance() {
        let mut pacer = inhaling_at(0.5);
        pacer.tick(Duration::ZERO, TEMPO, ControlCommand::Stop).unwrap();
        let actions = pacer.tick(TEMPO * 3, TEMPO, ControlCommand::Stop).unwrap();
        assert!(actions.is_empty());
        assert_eq!(pacer.state().phase, Phase::Stopped);
        assert_eq!(pacer.state().progress, 0.5);
    }

    #[test]
    fn reset_from_stopped_restarts_inhale() {
        let mut pacer = inhaling_at(0.5);
        pacer.tick(Duration::ZERO, TEMPO, ControlCommand::Stop).unwrap();
        let actions = pacer.tick(FRAME, TEMPO, ControlCommand::Reset).unwrap();

        let state = pacer.state();
        assert_eq!(state.phase, Phase::Inhaling);
        assert_eq!(state.progress, 0.0);
        assert!(state.is_cycling());

        // Both stops precede the new play
        let play_at = actions
            .iter()
            .position(|a| matches!(a, Action::Play(_)))
            .unwrap();
        assert_eq!(
            &actions[..2],
            &[Action::Stop(Channel::In), Action::Stop(Channel::Out)]
        );
        assert!(play_at > 1);
        assert_eq!(plays(&actions), vec![Channel::In]);
        assert_eq!(stops(&actions).len(), 2);
    }

    // ===========================================
    // Progress and Boundary Crossing
    // ===========================================

    #[test]
    fn boundary_flips_once_and_wraps() {
        let mut pacer = pacer();
        pacer.tick(Duration::ZERO, TEMPO, ControlCommand::Repeat).unwrap();
        let actions = pacer.tick(TEMPO, TEMPO, ControlCommand::Repeat).unwrap();

        let state = pacer.state();
        assert_eq!(state.phase, Phase::Exhaling);
        assert_eq!(state.progress, 0.0);
        assert_eq!(plays(&actions), vec![Channel::Out]);
        assert_eq!(stops(&actions), vec![Channel::In]);
        assert!(actions.contains(&Action::Emit(PacerEvent::PhaseEntered {
            phase: Phase::Exhaling
        })));
    }

    #[test]
    fn frames_summing_to_tempo_flip_on_time() {
        let tempo = Duration::from_secs(1);
        let mut pacer = Pacer::new(Tempo::new(tempo).unwrap(), CueSet::default());
        pacer.tick(Duration::ZERO, tempo, ControlCommand::Repeat).unwrap();

        for _ in 0..9 {
            let actions = pacer.tick(FRAME, tempo, ControlCommand::Repeat).unwrap();
            assert!(plays(&actions).is_empty());
        }
        let actions = pacer.tick(FRAME, tempo, ControlCommand::Repeat).unwrap();

        let state = pacer.state();
        assert_eq!(state.phase, Phase::Exhaling);
        assert_eq!(state.progress, 0.0);
        assert_eq!(plays(&actions), vec![Channel::Out]);
    }

    #[test]
    fn cycles_back_to_inhaling() {
        let mut pacer = pacer();
        pacer.tick(Duration::ZERO, TEMPO, ControlCommand::Repeat).unwrap();
        let mut phases = Vec::new();
        for _ in 0..85 {
            let actions = pacer.tick(FRAME, TEMPO, ControlCommand::Repeat).unwrap();
            phases.extend(actions.iter().filter_map(|a| match a {
                Action::Emit(PacerEvent::PhaseEntered { phase }) => Some(*phase),
                _ => None,
            }));
        }
        // 8.5 seconds at 4s per half-cycle
        assert_eq!(phases.len(), 2);
        assert_eq!(phases[0], Phase::Exhaling);
        assert_eq!(phases[1], Phase::Inhaling);
        let progress = pacer.state().progress;
        assert!((0.0..1.0).contains(&progress));
    }

    #[test]
    fn long_stall_cues_only_final_phase() {
        let mut pacer = pacer();
        pacer.tick(Duration::ZERO, TEMPO, ControlCommand::Repeat).unwrap();
        let actions = pacer.tick(TEMPO * 3, TEMPO, ControlCommand::Repeat).unwrap();

        assert_eq!(pacer.state().phase, Phase::Exhaling);
        assert_eq!(plays(&actions), vec![Channel::Out]);
        assert!(actions.contains(&Action::Emit(PacerEvent::BoundariesSkipped { count: 2 })));
    }

    #[test]
    fn restart_tick_does_not_consume_elapsed() {
        let mut pacer = pacer();
        pacer.tick(Duration::from_secs(3), TEMPO, ControlCommand::Repeat).unwrap();
        assert_eq!(pacer.state().progress, 0.0);
    }

    // ===========================================
    // Tempo Changes
    // ===========================================

    #[test]
    fn tempo_change_mid_cycle_resynchronizes() {
        let mut pacer = inhaling_at(0.5);
        assert_eq!(pacer.state().progress, 0.5);

        let new_tempo = Duration::from_secs(6);
        let actions = pacer.tick(FRAME, new_tempo, ControlCommand::Repeat).unwrap();

        let state = pacer.state();
        assert_eq!(state.phase, Phase::Inhaling);
        assert_eq!(state.progress, 0.0);
        assert!(state.is_cycling());
        assert_eq!(state.tempo.as_duration(), new_tempo);
        assert_eq!(
            &actions[..2],
            &[Action::Stop(Channel::In), Action::Stop(Channel::Out)]
        );
        assert_eq!(plays(&actions), vec![Channel::In]);
    }

    #[test]
    fn tempo_change_while_gliding_resynchronizes() {
        let mut pacer = pacer();
        pacer.tick(Duration::ZERO, TEMPO, ControlCommand::Reverse).unwrap();
        pacer.tick(Duration::from_secs(2), TEMPO, ControlCommand::Reverse).unwrap();
        assert_eq!(pacer.state().motion, Motion::Gliding);

        let actions = pacer
            .tick(FRAME, Duration::from_secs(6), ControlCommand::Reverse)
            .unwrap();

        let state = pacer.state();
        assert_eq!(state.phase, Phase::Inhaling);
        assert_eq!(state.progress, 0.0);
        assert_eq!(state.motion, Motion::Cycling);
        assert_eq!(
            &actions[..2],
            &[Action::Stop(Channel::In), Action::Stop(Channel::Out)]
        );
        let play_at = actions
            .iter()
            .position(|a| matches!(a, Action::Play(_)))
            .unwrap();
        assert!(play_at > 1);
        assert_eq!(plays(&actions), vec![Channel::In]);
    }

    #[test]
    fn tempo_change_takes_precedence_over_command() {
        let mut pacer = inhaling_at(0.5);
        let actions = pacer
            .tick(FRAME, Duration::from_secs(6), ControlCommand::Stop)
            .unwrap();
        assert_eq!(pacer.state().phase, Phase::Inhaling);
        assert!(actions.contains(&Action::Emit(PacerEvent::Resynchronized {
            tempo: Tempo::new(Duration::from_secs(6)).unwrap()
        })));

        // The command is reconciled on the following tick
        pacer
            .tick(FRAME, Duration::from_secs(6), ControlCommand::Stop)
            .unwrap();
        assert_eq!(pacer.state().phase, Phase::Stopped);
    }

    #[test]
    fn tempo_change_while_not_breathing_is_silent() {
        let mut pacer = pacer();
        let actions = pacer
            .tick(FRAME, Duration::from_secs(2), ControlCommand::None)
            .unwrap();
        assert!(actions.is_empty());
        assert_eq!(pacer.state().tempo.as_duration(), Duration::from_secs(2));
        assert_eq!(pacer.state().phase, Phase::Idle);
    }

    #[test]
    fn tempo_change_while_stopped_keeps_progress() {
        let mut pacer = inhaling_at(0.5);
        pacer.tick(Duration::ZERO, TEMPO, ControlCommand::Stop).unwrap();
        let actions = pacer
            .tick(FRAME, Duration::from_secs(8), ControlCommand::Stop)
            .unwrap();
        assert!(actions.is_empty());
        assert_eq!(pacer.state().phase, Phase::Stopped);
        assert_eq!(pacer.state().progress, 0.5);
    }

    #[test]
    fn zero_tempo_is_rejected_without_change() {
        let mut pacer = inhaling_at(0.5);
        let before = pacer.state();
        let result = pacer.tick(FRAME, Duration::ZERO, ControlCommand::Stop);
        assert_eq!(result, Err(PacerError::InvalidTempo { secs: 0.0 }));
        assert_eq!(pacer.state(), before);
    }
}
