// SPDX-License-Identifier: MIT OR Apache-2.0
//! egui integration for the canvas.
//!
//! Features:
//! - [`EguiSurface`]: draws canvas output with an egui `Painter`
//! - [`InputTranslator`]: turns raw egui events into [`CanvasEvent`]s,
//!   synthesising drags while a button is held
//! - [`CanvasView`]: forwards a frame's input, draws, and presents the
//!   canvas context menus

use crate::canvas::{Canvas, ContextMenu, MenuAction};
use crate::draw::Surface;
use crate::event::{CanvasEvent, EventKind};
use crate::node::NodeCategory;
use egui::{Color32, Key, PointerButton, Pos2, Rect, Stroke};

const LABEL_FONT_SIZE: f32 = 13.0;

/// [`Surface`] backed by an egui painter
pub struct EguiSurface<'a> {
    painter: &'a egui::Painter,
}

impl<'a> EguiSurface<'a> {
    /// Wrap a painter
    pub fn new(painter: &'a egui::Painter) -> Self {
        Self { painter }
    }
}

impl Surface for EguiSurface<'_> {
    fn fill_rect(&mut self, rect: Rect, rounding: f32, color: Color32) {
        self.painter.rect_filled(rect, rounding, color);
    }

    fn stroke_rect(&mut self, rect: Rect, rounding: f32, stroke: Stroke) {
        self.painter.rect_stroke(rect, rounding, stroke);
    }

    fn line_segment(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        self.painter.line_segment([from, to], stroke);
    }

    fn text(&mut self, center: Pos2, text: &str, color: Color32) {
        self.painter.text(
            center,
            egui::Align2::CENTER_CENTER,
            text,
            egui::FontId::proportional(LABEL_FONT_SIZE),
            color,
        );
    }
}

/// Converts egui's raw event stream into canvas events.
#[derive(Debug, Default)]
pub struct InputTranslator {
    pointer: Pos2,
    /// Held buttons, most recently pressed last
    held: Vec<PointerButton>,
}

impl InputTranslator {
    /// Create a translator with no buttons held
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known pointer position
    pub fn pointer(&self) -> Pos2 {
        self.pointer
    }

    /// Whether `button` is currently held
    pub fn is_held(&self, button: PointerButton) -> bool {
        self.held.contains(&button)
    }

    /// Translate one frame's worth of egui events
    pub fn translate(&mut self, events: &[egui::Event]) -> Vec<CanvasEvent> {
        let mut out = Vec::new();
        for event in events {
            match event {
                egui::Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    ..
                } => {
                    self.pointer = *pos;
                    if *pressed {
                        self.held.retain(|b| b != button);
                        self.held.push(*button);
                        out.push(CanvasEvent::pointer_down(*pos, *button));
                    } else {
                        self.held.retain(|b| b != button);
                        out.push(CanvasEvent::pointer_up(*pos, *button));
                    }
                }
                egui::Event::PointerMoved(pos) => {
                    let delta = *pos - self.pointer;
                    self.pointer = *pos;
                    match self.held.last() {
                        Some(button) => out.push(CanvasEvent::pointer_drag(*pos, delta, *button)),
                        None => out.push(CanvasEvent::pointer_move(*pos, delta)),
                    }
                }
                egui::Event::Key {
                    key,
                    pressed,
                    repeat: false,
                    ..
                } => {
                    if *pressed {
                        out.push(CanvasEvent::key_down(*key, self.pointer));
                    } else {
                        out.push(CanvasEvent::key_up(*key, self.pointer));
                    }
                }
                egui::Event::WindowFocused(false) => {
                    // Releases can be lost while unfocused
                    for button in self.held.drain(..) {
                        out.push(CanvasEvent::pointer_up(self.pointer, button));
                    }
                }
                _ => {}
            }
        }
        out
    }
}

/// Draws a [`Canvas`] inside an egui `Ui` and feeds it that frame's input.
#[derive(Debug, Default)]
pub struct CanvasView {
    input: InputTranslator,
    menu_rect: Option<Rect>,
}

impl CanvasView {
    /// Create a new view
    pub fn new() -> Self {
        Self::default()
    }

    /// Process input, draw and show menus. Returns whether the canvas
    /// changed this frame.
    pub fn show(&mut self, ui: &mut egui::Ui, canvas: &mut Canvas) -> bool {
        ui.allocate_rect(canvas.bounds, egui::Sense::click_and_drag());
        let clip = ui.clip_rect();
        let events = ui.input(|i| i.events.clone());
        let keyboard_taken = ui.ctx().wants_keyboard_input();

        let mut changed = false;
        for event in self.input.translate(&events) {
            if !forwards(&event, self.menu_rect, clip, keyboard_taken) {
                continue;
            }
            if event.kind == EventKind::PointerDown {
                canvas.close_context_menu();
            }
            if event.is_key_down(Key::Escape) && canvas.context_menu().is_some() {
                canvas.close_context_menu();
                changed = true;
                continue;
            }
            changed |= canvas.handle_event(&event);
        }

        let painter = ui.painter_at(canvas.bounds.intersect(clip));
        let mut surface = EguiSurface::new(&painter);
        canvas.draw(&mut surface, &CanvasEvent::repaint(self.input.pointer()));

        changed |= self.show_context_menu(ui.ctx(), canvas);

        if changed || canvas.has_pending_selection() || canvas.is_panning() {
            ui.ctx().request_repaint();
        }
        changed
    }

    fn show_context_menu(&mut self, ctx: &egui::Context, canvas: &mut Canvas) -> bool {
        let Some(menu) = canvas.context_menu().copied() else {
            self.menu_rect = None;
            return false;
        };

        let mut action = None;
        let area = egui::Area::new(egui::Id::new("nodecanvas_context_menu"))
            .order(egui::Order::Foreground)
            .fixed_pos(menu.position())
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| match menu {
                    ContextMenu::Canvas { .. } => {
                        for category in NodeCategory::all() {
                            let label = format!("Add {} Node", category.display_name());
                            if ui.button(label).clicked() {
                                action = Some(MenuAction::CreateNode(*category));
                            }
                        }
                    }
                    ContextMenu::Node { .. } => {
                        if ui.button("Remove Node").clicked() {
                            action = Some(MenuAction::RemoveNode);
                        }
                    }
                });
            });
        self.menu_rect = Some(area.response.rect);

        match action {
            Some(action) => {
                self.menu_rect = None;
                canvas.invoke_menu(action)
            }
            None => false,
        }
    }
}

/// Whether a translated event belongs to the canvas. Presses on the menu
/// or on surrounding panels are not ours, and neither are keys typed into
/// a focused text field.
fn forwards(
    event: &CanvasEvent,
    menu_rect: Option<Rect>,
    clip: Rect,
    keyboard_taken: bool,
) -> bool {
    match event.kind {
        EventKind::PointerDown => {
            !menu_rect.is_some_and(|r| r.contains(event.pointer)) && clip.contains(event.pointer)
        }
        EventKind::KeyDown | EventKind::KeyUp => !keyboard_taken,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Modifiers, Vec2};

    fn press(pos: Pos2, button: PointerButton) -> egui::Event {
        egui::Event::PointerButton {
            pos,
            button,
            pressed: true,
            modifiers: Modifiers::NONE,
        }
    }

    fn release(pos: Pos2, button: PointerButton) -> egui::Event {
        egui::Event::PointerButton {
            pos,
            button,
            pressed: false,
            modifiers: Modifiers::NONE,
        }
    }

    fn key(key: Key, pressed: bool, repeat: bool) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed,
            repeat,
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn test_press_move_release_becomes_drag() {
        let mut input = InputTranslator::new();
        let events = input.translate(&[
            egui::Event::PointerMoved(Pos2::new(10.0, 10.0)),
            press(Pos2::new(10.0, 10.0), PointerButton::Middle),
            egui::Event::PointerMoved(Pos2::new(25.0, 5.0)),
            release(Pos2::new(25.0, 5.0), PointerButton::Middle),
        ]);

        assert_eq!(
            events,
            vec![
                CanvasEvent::pointer_move(Pos2::new(10.0, 10.0), Vec2::new(10.0, 10.0)),
                CanvasEvent::pointer_down(Pos2::new(10.0, 10.0), PointerButton::Middle),
                CanvasEvent::pointer_drag(
                    Pos2::new(25.0, 5.0),
                    Vec2::new(15.0, -5.0),
                    PointerButton::Middle
                ),
                CanvasEvent::pointer_up(Pos2::new(25.0, 5.0), PointerButton::Middle),
            ]
        );
        assert!(!input.is_held(PointerButton::Middle));
    }

    #[test]
    fn test_drag_reports_latest_button() {
        let mut input = InputTranslator::new();
        let events = input.translate(&[
            press(Pos2::ZERO, PointerButton::Primary),
            press(Pos2::ZERO, PointerButton::Middle),
            egui::Event::PointerMoved(Pos2::new(1.0, 0.0)),
        ]);

        assert_eq!(events[2].button, Some(PointerButton::Middle));
        assert!(input.is_held(PointerButton::Primary));
    }

    #[test]
    fn test_keys_carry_pointer_and_skip_repeats() {
        let mut input = InputTranslator::new();
        let events = input.translate(&[
            egui::Event::PointerMoved(Pos2::new(40.0, 30.0)),
            key(Key::Delete, true, false),
            key(Key::Delete, true, true),
            key(Key::Delete, false, false),
        ]);

        assert_eq!(events.len(), 3);
        assert_eq!(events[1], CanvasEvent::key_down(Key::Delete, Pos2::new(40.0, 30.0)));
        assert_eq!(events[2], CanvasEvent::key_up(Key::Delete, Pos2::new(40.0, 30.0)));
    }

    #[test]
    fn test_keys_withheld_while_text_field_focused() {
        let clip = Rect::from_min_max(Pos2::ZERO, Pos2::new(800.0, 600.0));
        let at = Pos2::new(100.0, 100.0);

        assert!(forwards(&CanvasEvent::key_down(Key::Delete, at), None, clip, false));
        assert!(!forwards(&CanvasEvent::key_down(Key::Delete, at), None, clip, true));
        assert!(!forwards(&CanvasEvent::key_up(Key::Delete, at), None, clip, true));
        // Pointer input is unaffected by keyboard focus
        assert!(forwards(
            &CanvasEvent::pointer_down(at, PointerButton::Primary),
            None,
            clip,
            true
        ));
    }

    #[test]
    fn test_presses_on_menu_or_outside_clip_withheld() {
        let clip = Rect::from_min_max(Pos2::new(200.0, 0.0), Pos2::new(800.0, 600.0));
        let menu = Rect::from_min_size(Pos2::new(300.0, 300.0), Vec2::new(120.0, 80.0));
        let down = |pos| CanvasEvent::pointer_down(pos, PointerButton::Primary);

        assert!(!forwards(&down(Pos2::new(350.0, 320.0)), Some(menu), clip, false));
        assert!(!forwards(&down(Pos2::new(100.0, 320.0)), Some(menu), clip, false));
        assert!(forwards(&down(Pos2::new(600.0, 100.0)), Some(menu), clip, false));
        // Releases still arrive so drags end
        assert!(forwards(
            &CanvasEvent::pointer_up(Pos2::new(100.0, 320.0), PointerButton::Primary),
            Some(menu),
            clip,
            false
        ));
    }

    #[test]
    fn test_focus_loss_releases_buttons() {
        let mut input = InputTranslator::new();
        let events = input.translate(&[
            press(Pos2::new(5.0, 5.0), PointerButton::Middle),
            egui::Event::WindowFocused(false),
        ]);

        assert_eq!(
            events.last(),
            Some(&CanvasEvent::pointer_up(Pos2::new(5.0, 5.0), PointerButton::Middle))
        );
        assert!(!input.is_held(PointerButton::Middle));
    }
}
