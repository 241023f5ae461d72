// SPDX-License-Identifier: MIT OR Apache-2.0
//! Side panel with canvas layout, display options and session controls.

use crate::settings::{CanvasRect, EditorSettings};
use nodecanvas_graph::{ConnectionStyle, Selection};

/// Something the side panel asks the editor to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelAction {
    /// Use this rectangle for the canvas
    ApplyCanvasRect(CanvasRect),
    /// Remove every node and connection
    ClearCanvas,
    /// Delete the saved session file
    ResetSession,
}

/// Graph figures shown in the panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasStats {
    /// Number of nodes
    pub nodes: usize,
    /// Number of connections
    pub connections: usize,
    /// Pending connection selection
    pub selection: Selection,
}

/// Side panel state
#[derive(Debug, Clone)]
pub struct SidePanel {
    /// Rectangle being edited, applied on request
    rect_input: CanvasRect,
}

impl SidePanel {
    /// Create the panel, seeded from the current settings
    pub fn new(settings: &EditorSettings) -> Self {
        Self {
            rect_input: settings.canvas_rect,
        }
    }

    /// Show the panel. Display options are edited in place on `settings`.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        settings: &mut EditorSettings,
        stats: CanvasStats,
        status: Option<&str>,
    ) -> Option<PanelAction> {
        let mut action = None;

        let response = egui::SidePanel::left("nodecanvas_side_panel")
            .resizable(true)
            .default_width(settings.side_panel_width)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.heading("Canvas");
                    ui.add_space(4.0);

                    egui::Grid::new("canvas_rect_grid")
                        .num_columns(2)
                        .show(ui, |ui| {
                            rect_field(ui, "X", &mut self.rect_input.x);
                            rect_field(ui, "Y", &mut self.rect_input.y);
                            rect_field(ui, "Width", &mut self.rect_input.width);
                            rect_field(ui, "Height", &mut self.rect_input.height);
                        });
                    self.rect_input.width = self.rect_input.width.max(1.0);
                    self.rect_input.height = self.rect_input.height.max(1.0);

                    ui.add_space(2.0);
                    ui.checkbox(&mut settings.expand_canvas, "Expand canvas to window");
                    ui.add_space(6.0);
                    if ui.button("Apply Canvas Rect").clicked() {
                        action = Some(PanelAction::ApplyCanvasRect(self.rect_input));
                    }

                    ui.separator();
                    ui.heading("Display");
                    ui.checkbox(&mut settings.show_grid, "Show grid");
                    ui.horizontal(|ui| {
                        ui.label("Connections:");
                        ui.radio_value(
                            &mut settings.connection_style,
                            ConnectionStyle::Bezier,
                            "Bezier",
                        );
                        ui.radio_value(&mut settings.connection_style, ConnectionStyle::Line, "Line");
                    });

                    ui.separator();
                    ui.heading("Graph");
                    ui.label(format!("Nodes: {}", stats.nodes));
                    ui.label(format!("Connections: {}", stats.connections));
                    ui.label(selection_label(stats.selection));

                    ui.add_space(6.0);
                    if ui.button("Clear Canvas").clicked() {
                        action = Some(PanelAction::ClearCanvas);
                    }

                    ui.separator();
                    ui.heading("Session");
                    if ui.button("Reset Session").clicked() {
                        action = Some(PanelAction::ResetSession);
                    }
                    if let Some(status) = status {
                        ui.small(status);
                    }

                    ui.separator();
                    ui.small("Right-click: menu · Middle-drag: pan · Delete: remove node");
                });
            });

        settings.side_panel_width = response.response.rect.width();
        action
    }
}

fn rect_field(ui: &mut egui::Ui, label: &str, value: &mut f32) {
    ui.label(label);
    ui.add(egui::DragValue::new(value).speed(1.0));
    ui.end_row();
}

fn selection_label(selection: Selection) -> &'static str {
    match selection {
        Selection::Empty => "No pending connection",
        Selection::PendingIn(_) => "Pick an out point",
        Selection::PendingOut(_) => "Pick an in point",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodecanvas_graph::{NodeId, PortRef};

    #[test]
    fn test_seeded_from_settings() {
        let settings = EditorSettings {
            canvas_rect: CanvasRect {
                x: 1.0,
                y: 2.0,
                width: 3.0,
                height: 4.0,
            },
            ..EditorSettings::default()
        };
        assert_eq!(SidePanel::new(&settings).rect_input, settings.canvas_rect);
    }

    #[test]
    fn test_selection_label_names_missing_side() {
        let point = PortRef::input(NodeId::new());
        assert_eq!(selection_label(Selection::PendingIn(point)), "Pick an out point");
        assert_eq!(selection_label(Selection::Empty), "No pending connection");
    }
}
