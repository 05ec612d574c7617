//! UI collaborator contract.

use crate::input::{ButtonState, KeyAction, MouseButton};
use crate::status::CoreStatus;

/// Widget layer drawn on top of the sky.
///
/// Input is offered here first; returning `true` marks it consumed and the
/// core does not act on it. The UI only ever sees [`CoreStatus`].
pub trait UiCollaborator: Send + Sync {
    fn handle_click(&mut self, _x: f64, _y: f64, _state: ButtonState, _button: MouseButton) -> bool {
        false
    }

    fn handle_move(&mut self, _x: f64, _y: f64) -> bool {
        false
    }

    fn handle_key(&mut self, _key: KeyAction, _state: ButtonState) -> bool {
        false
    }

    fn update(&mut self, _delta_ms: f64, _status: &CoreStatus) {}

    fn draw(&mut self, status: &CoreStatus);
}
