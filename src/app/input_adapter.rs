//! Translates winit window events into [`Input`] state.

use winit::event::WindowEvent;

use crate::app::input::Input;

/// Feeds pointer-related events into `input`; other events are ignored.
pub fn process_window_event(input: &mut Input, event: &WindowEvent) {
    match event {
        WindowEvent::Resized(size) => input.handle_resize(size.width, size.height),
        WindowEvent::CursorMoved { position, .. } => input.handle_cursor_move(position.x, position.y),
        WindowEvent::CursorLeft { .. } => input.handle_cursor_left(),
        WindowEvent::MouseInput { state, button, .. } => input.handle_mouse_input(*state, *button),
        WindowEvent::MouseWheel { delta, .. } => input.handle_mouse_wheel(*delta),
        _ => {}
    }
}
