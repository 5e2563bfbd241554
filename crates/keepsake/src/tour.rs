//! Timed input scripts for headless runs.

use keepsake_core::camera::OrbitInput;

use crate::scene::{InteractableId, SceneInput};

/// One scripted input, fired once elapsed time reaches `at` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TourStep {
    pub at: f32,
    pub input: SceneInput,
}

impl TourStep {
    pub fn new(at: f32, input: SceneInput) -> Self {
        Self { at, input }
    }
}

/// The default walk through the scene: start, open the gift and close it,
/// orbit a little, then read two memories and put them back.
pub fn default_tour() -> Vec<TourStep> {
    vec![
        TourStep::new(0.5, SceneInput::Start),
        TourStep::new(3.5, SceneInput::Hover(InteractableId::GiftBox, true)),
        TourStep::new(4.0, SceneInput::Activate(InteractableId::GiftBox)),
        TourStep::new(4.5, SceneInput::Confirm),
        TourStep::new(5.0, SceneInput::Hover(InteractableId::GiftBox, false)),
        TourStep::new(9.0, SceneInput::Activate(InteractableId::GiftBox)),
        TourStep::new(
            11.5,
            SceneInput::Orbit(OrbitInput {
                yaw: 0.3,
                pitch: 0.1,
                distance_delta: 2.0,
            }),
        ),
        TourStep::new(12.0, SceneInput::Activate(InteractableId::MemoryCard(3))),
        TourStep::new(13.0, SceneInput::Activate(InteractableId::MemoryCard(5))),
        TourStep::new(14.0, SceneInput::Deselect),
    ]
}

/// Plays a list of [`TourStep`]s in time order.
#[derive(Debug, Clone)]
pub struct Tour {
    steps: Vec<TourStep>,
    next: usize,
}

impl Tour {
    pub fn new(mut steps: Vec<TourStep>) -> Self {
        steps.sort_by(|a, b| a.at.total_cmp(&b.at));
        Self { steps, next: 0 }
    }

    /// Steps that became due since the last call.
    pub fn due(&mut self, elapsed: f32) -> &[TourStep] {
        let start = self.next;
        while self.next < self.steps.len() && self.steps[self.next].at <= elapsed {
            self.next += 1;
        }
        &self.steps[start..self.next]
    }

    pub fn is_finished(&self) -> bool {
        self.next == self.steps.len()
    }

    /// Time of the last step.
    pub fn duration(&self) -> f32 {
        self.steps.last().map_or(0.0, |step| step.at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tour_fires_each_step_once() {
        let mut tour = Tour::new(vec![
            TourStep::new(2.0, SceneInput::Deselect),
            TourStep::new(1.0, SceneInput::Start),
        ]);
        assert!(tour.due(0.5).is_empty());
        assert_eq!(tour.due(1.0), &[TourStep::new(1.0, SceneInput::Start)]);
        assert!(tour.due(1.5).is_empty());
        assert_eq!(tour.due(10.0).len(), 1);
        assert!(tour.is_finished());
        assert!(tour.due(20.0).is_empty());
    }

    #[test]
    fn test_default_tour_fits_default_run() {
        let tour = Tour::new(default_tour());
        // 900 frames at 60 fps
        assert!(tour.duration() < 15.0);
    }
}
