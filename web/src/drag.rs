use aurorachrome_core::Point;
use bitflags::bitflags;
use gloo::events::{EventListener, EventListenerOptions};
use gloo::utils::document;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;
use web_sys::{Element, PointerEvent};
use yew::prelude::*;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub(crate) struct PointerButtons: u16 {
        const PRIMARY   = 1;
        const SECONDARY = 1 << 1;
        const AUXILIARY = 1 << 2;
    }
}

/// Pointer position in viewport coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct ClientPoint {
    pub x: f64,
    pub y: f64,
}

impl ClientPoint {
    pub(crate) fn of(event: &PointerEvent) -> Self {
        Self {
            x: f64::from(event.client_x()),
            y: f64::from(event.client_y()),
        }
    }

    /// Converts to coordinates relative to `origin`'s top-left corner.
    pub(crate) fn relative_to(self, origin: (f64, f64)) -> Point {
        Point::new((self.x - origin.0) as f32, (self.y - origin.1) as f32)
    }
}

/// Whether a pointerdown should start a drag.
pub(crate) fn starts_drag(event: &PointerEvent) -> bool {
    PointerButtons::from_bits_truncate(event.buttons()).contains(PointerButtons::PRIMARY)
}

/// Top-left corner of the board element in viewport coordinates.
pub(crate) fn board_origin(board: &NodeRef) -> Option<(f64, f64)> {
    let rect = board.cast::<Element>()?.get_bounding_client_rect();
    Some((rect.left(), rect.top()))
}

/// Document-wide move/up listeners that exist only for the duration of one drag.
///
/// Dropping the value detaches both listeners.
pub(crate) struct DragListeners {
    _move: EventListener,
    _up: EventListener,
}

impl DragListeners {
    pub(crate) fn attach(on_move: Callback<ClientPoint>, on_up: Callback<ClientPoint>) -> Self {
        let target = document();
        let options = EventListenerOptions::enable_prevent_default();
        let _move = EventListener::new_with_options(&target, "pointermove", options, move |event| {
            if let Some(event) = event.dyn_ref::<PointerEvent>() {
                event.prevent_default();
                on_move.emit(ClientPoint::of(event));
            }
        });
        let _up = EventListener::new(&target, "pointerup", move |event| {
            if let Some(event) = event.dyn_ref::<PointerEvent>() {
                on_up.emit(ClientPoint::of(event));
            }
        });
        log::trace!("drag listeners attached");
        Self { _move, _up }
    }
}

impl Drop for DragListeners {
    fn drop(&mut self) {
        log::trace!("drag listeners detached");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_points_translate_into_board_space() {
        let point = ClientPoint { x: 130.0, y: 75.5 };
        assert_eq!(point.relative_to((30.0, 25.5)), Point::new(100.0, 50.0));
    }

    #[test]
    fn chorded_buttons_still_include_primary() {
        let buttons = PointerButtons::from_bits_truncate(0b101);
        assert!(buttons.contains(PointerButtons::PRIMARY));
        assert!(!PointerButtons::SECONDARY.contains(PointerButtons::PRIMARY));
    }
}
