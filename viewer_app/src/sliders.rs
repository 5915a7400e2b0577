//! Scripted stand-in for the viewer's slider panel
//!
//! Each slider sweeps from zero to its maximum, one step per frame, and
//! reports every change to its recipient the way the HTML range inputs do.

use scene_engine::scene::{Message, ParticipantRole, SceneManager, SceneParticipant};

/// How a slider change is packaged
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SliderPayload {
    /// `delta` and `percent` of the slider range
    Range,
    /// Inverted delta with the regular percent
    InvertedRange,
    /// Bare delta divided by a constant
    Scaled(f32),
}

/// One range input
#[derive(Debug, Clone)]
pub struct Slider {
    sender: String,
    recipient: String,
    payload: SliderPayload,
    value: f32,
    max: f32,
    step: f32,
}

impl Slider {
    pub fn new(sender: &str, recipient: &str, payload: SliderPayload, max: f32, step: f32) -> Self {
        Self {
            sender: sender.to_owned(),
            recipient: recipient.to_owned(),
            payload,
            value: 0.0,
            max,
            step,
        }
    }

    /// Move one step; the change, if any, as a message
    fn advance(&mut self) -> Option<Message> {
        let previous = self.value;
        self.value = (self.value + self.step).min(self.max);
        let delta = self.value - previous;
        if delta == 0.0 {
            return None;
        }

        let percent = self.value / self.max;
        Some(match self.payload {
            SliderPayload::Range => Message::Slider { delta, percent },
            SliderPayload::InvertedRange => Message::Slider { delta: -delta, percent },
            SliderPayload::Scaled(divisor) => Message::Scalar(delta / divisor),
        })
    }
}

/// Controller that moves its sliders once per rendered frame
pub struct SliderPanel {
    name: String,
    sliders: Vec<Slider>,
    moves: usize,
}

impl SliderPanel {
    pub fn new(name: &str, sliders: Vec<Slider>) -> Self {
        Self {
            name: name.to_owned(),
            sliders,
            moves: 0,
        }
    }

    /// Total slider changes reported so far
    pub fn moves(&self) -> usize {
        self.moves
    }
}

impl SceneParticipant for SliderPanel {
    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> ParticipantRole {
        ParticipantRole::Controller
    }

    fn on_scene_render(&mut self, scene: &mut SceneManager) {
        for slider in &mut self.sliders {
            if let Some(message) = slider.advance() {
                scene.broadcast_to(&slider.sender, &slider.recipient, message);
                self.moves += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slider_stops_at_max() {
        let mut slider = Slider::new("SliderSeason", "DirectLight", SliderPayload::InvertedRange, 10.0, 4.0);

        let deltas: Vec<_> = std::iter::from_fn(|| slider.advance())
            .map(|message| match message {
                Message::Slider { delta, .. } => delta,
                _ => f32::NAN,
            })
            .collect();

        assert_eq!(deltas, vec![-4.0, -4.0, -2.0]);
    }

    #[test]
    fn test_scaled_payload() {
        let mut slider = Slider::new("Slider", "Roof", SliderPayload::Scaled(180.0), 90.0, 90.0);
        assert_eq!(slider.advance().and_then(|m| m.as_scalar()), Some(0.5));
        assert!(slider.advance().is_none());
    }
}
