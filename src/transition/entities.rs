use std::ops::DerefMut;

use bevy::prelude::*;

use super::{DeferPolicy, TransitionConfig};
use crate::math;
use crate::store::{Experience, PendingTransition, Scene};

/// Audio cue requested by a story line. Playback lives outside the core.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryCue {
    /// The chocolate line was reached.
    Chocolate,
}

/// How long a scheduled sequence still waits before it starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Wait {
    /// Yield this many frames.
    Frames(u32),
    /// Wait this many seconds.
    Seconds(f32),
}

impl Wait {
    /// Counts one frame of `dt` seconds; `None` once the wait is over.
    fn tick(self, dt: f32) -> Option<Self> {
        match self {
            Wait::Frames(n) if n > 1 => Some(Wait::Frames(n - 1)),
            Wait::Frames(_) => None,
            Wait::Seconds(s) if s - dt > 0.0 => Some(Wait::Seconds(s - dt)),
            Wait::Seconds(_) => None,
        }
    }
}

/// Step of a running sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SequenceStage {
    /// Short pause before the scene commit.
    Settle { elapsed: f32 },
    /// Bloom tween after committing `flower`.
    Bloom { elapsed: f32 },
}

/// Where the controller is with the current request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TransitionPhase {
    /// Nothing to do.
    #[default]
    Idle,
    /// Request observed, deferred until the wait runs out.
    Scheduled {
        request: PendingTransition,
        wait: Wait,
    },
    /// Sequence in progress; `is_animating` is held true.
    Running {
        request: PendingTransition,
        stage: SequenceStage,
    },
}

/// Sole committer of scene changes.
///
/// Watches the store's pending slot, defers, then runs
/// settle → commit → (bloom tween for `flower`) and clears the slot.
/// A newer request aborts the current sequence and restarts with the new
/// one; an externally cleared slot or an external scene change during the
/// bloom tween aborts without restarting. Every exit path drops
/// `is_animating`.
#[derive(Resource, Debug, Default)]
pub struct TransitionController {
    phase: TransitionPhase,
}

impl TransitionController {
    /// Current phase.
    pub fn phase(&self) -> &TransitionPhase {
        &self.phase
    }

    /// `true` when no sequence is scheduled or running.
    pub fn is_idle(&self) -> bool {
        self.phase == TransitionPhase::Idle
    }

    fn active_seq(&self) -> Option<u64> {
        match &self.phase {
            TransitionPhase::Idle => None,
            TransitionPhase::Scheduled { request, .. }
            | TransitionPhase::Running { request, .. } => Some(request.seq),
        }
    }

    /// Advances the controller by one frame of `dt` seconds.
    ///
    /// Reads go through `Deref`, so the store is only flagged as changed on
    /// frames that actually write to it.
    pub fn step<E>(&mut self, exp: &mut E, dt: f32, cfg: &TransitionConfig)
    where
        E: DerefMut<Target = Experience>,
    {
        if self.observe_request(exp, cfg) {
            return;
        }

        let phase = std::mem::take(&mut self.phase);
        self.phase = match phase {
            TransitionPhase::Idle => TransitionPhase::Idle,
            TransitionPhase::Scheduled { request, wait } => match wait.tick(dt) {
                Some(wait) => TransitionPhase::Scheduled { request, wait },
                None => start(request, exp),
            },
            TransitionPhase::Running { request, stage } => run(request, stage, exp, dt, cfg),
        };
    }

    /// Picks up new or withdrawn requests. Returns `true` when a request was
    /// scheduled this frame and should wait for the next one.
    fn observe_request<E>(&mut self, exp: &mut E, cfg: &TransitionConfig) -> bool
    where
        E: DerefMut<Target = Experience>,
    {
        let pending_seq = exp.pending_transition().map(|p| p.seq);
        let active_seq = self.active_seq();
        if pending_seq == active_seq {
            return false;
        }

        let Some(request) = exp.pending_transition().cloned() else {
            info!("transition request withdrawn, aborting sequence");
            self.phase = abort(None, exp);
            return false;
        };

        if active_seq.is_some() {
            info!(
                "transition to {} supersedes the running sequence",
                request.scene
            );
        }
        debug!("transition to {} scheduled", request.scene);

        match cfg.defer {
            DeferPolicy::Immediate => {
                self.phase = start(request, exp);
                false
            }
            DeferPolicy::NextFrame => {
                self.phase = TransitionPhase::Scheduled {
                    request,
                    wait: Wait::Frames(1),
                };
                true
            }
            DeferPolicy::Delay(secs) => {
                self.phase = TransitionPhase::Scheduled {
                    request,
                    wait: Wait::Seconds(secs),
                };
                true
            }
        }
    }
}

fn start<E>(request: PendingTransition, exp: &mut E) -> TransitionPhase
where
    E: DerefMut<Target = Experience>,
{
    info!("transition to {} running", request.scene);
    if !exp.is_animating() {
        exp.set_is_animating(true);
    }
    TransitionPhase::Running {
        request,
        stage: SequenceStage::Settle { elapsed: 0.0 },
    }
}

fn run<E>(
    request: PendingTransition,
    stage: SequenceStage,
    exp: &mut E,
    dt: f32,
    cfg: &TransitionConfig,
) -> TransitionPhase
where
    E: DerefMut<Target = Experience>,
{
    match stage {
        SequenceStage::Settle { elapsed } => {
            let elapsed = elapsed + dt;
            if elapsed < cfg.settle_secs {
                return TransitionPhase::Running {
                    request,
                    stage: SequenceStage::Settle { elapsed },
                };
            }
            exp.set_scene(request.scene);
            info!("scene {} committed", request.scene);
            if request.scene == Scene::Flower {
                TransitionPhase::Running {
                    request,
                    stage: SequenceStage::Bloom { elapsed: 0.0 },
                }
            } else {
                finish(&request, exp)
            }
        }
        SequenceStage::Bloom { elapsed } => {
            if exp.current_scene() != request.scene {
                info!(
                    "scene left {} during bloom, aborting sequence",
                    request.scene
                );
                return abort(Some(request.seq), exp);
            }
            let elapsed = elapsed + dt;
            let t = if cfg.bloom_secs > 0.0 {
                (elapsed / cfg.bloom_secs).min(1.0)
            } else {
                1.0
            };
            // Bloom never runs backwards under normal flow.
            let value = math::ease_in_out_quad(t).max(exp.bloom_progress());
            exp.set_bloom_progress(value);
            if t >= 1.0 {
                finish(&request, exp)
            } else {
                TransitionPhase::Running {
                    request,
                    stage: SequenceStage::Bloom { elapsed },
                }
            }
        }
    }
}

fn finish<E>(request: &PendingTransition, exp: &mut E) -> TransitionPhase
where
    E: DerefMut<Target = Experience>,
{
    info!("transition to {} complete", request.scene);
    abort(Some(request.seq), exp)
}

/// Terminal cleanup shared by completion and interruption: clears the
/// pending slot if it still holds `seq` and drops the animation flag.
fn abort<E>(seq: Option<u64>, exp: &mut E) -> TransitionPhase
where
    E: DerefMut<Target = Experience>,
{
    if seq.is_some() && exp.pending_transition().map(|p| p.seq) == seq {
        exp.clear_pending_transition();
    }
    if exp.is_animating() {
        exp.set_is_animating(false);
    }
    TransitionPhase::Idle
}
