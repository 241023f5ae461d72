// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor state management.
//!
//! This module owns everything the editor keeps between frames apart from
//! the window and GPU resources: settings, the canvas and the session store.

use crate::app::Result;
use crate::panel::{CanvasStats, PanelAction};
use crate::session::SessionStore;
use crate::settings::EditorSettings;
use egui::Rect;
use nodecanvas_graph::{Canvas, Graph};
use std::path::PathBuf;

/// Main editor state
pub struct EditorState {
    /// Current settings
    pub settings: EditorSettings,
    /// Canvas being edited
    pub canvas: Canvas,
    settings_path: Option<PathBuf>,
    session: Option<SessionStore>,
    status: Option<String>,
}

impl EditorState {
    /// Load settings and restore the last session
    pub fn new(settings_path: Option<PathBuf>, session: Option<SessionStore>) -> Self {
        let settings = EditorSettings::load_or_default(settings_path.as_deref());

        let graph = match session.as_ref().map(SessionStore::load) {
            Some(Ok(Some(graph))) => graph,
            Some(Ok(None)) | None => Graph::default(),
            Some(Err(e)) => {
                tracing::warn!("Could not restore session, starting empty: {e}");
                Graph::default()
            }
        };

        let mut canvas = Canvas::with_graph(settings.canvas_rect.to_rect(), graph);
        settings.apply_to(&mut canvas.style);

        Self {
            settings,
            canvas,
            settings_path,
            session,
            status: None,
        }
    }

    /// Editor state using the platform config and data directories
    pub fn from_default_paths() -> Self {
        let session = SessionStore::default_path().map(SessionStore::new);
        match &session {
            Some(store) => tracing::debug!("Session file: {}", store.path().display()),
            None => tracing::warn!("No data directory available, session will not be saved"),
        }
        Self::new(EditorSettings::default_path(), session)
    }

    /// Last status message for the panel
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Figures for the side panel
    pub fn stats(&self) -> CanvasStats {
        CanvasStats {
            nodes: self.canvas.graph().node_count(),
            connections: self.canvas.graph().connection_count(),
            selection: self.canvas.selection(),
        }
    }

    /// Size the canvas for this frame. `available` is the area left over
    /// by the side panel.
    pub fn fit_canvas(&mut self, available: Rect) {
        let bounds = if self.settings.expand_canvas {
            available
        } else {
            self.settings.canvas_rect.to_rect()
        };
        self.canvas.set_bounds(bounds);
    }

    /// Push display settings edited in the panel onto the canvas
    pub fn sync_style(&mut self) {
        self.settings.apply_to(&mut self.canvas.style);
    }

    /// Carry out a side panel request
    pub fn apply(&mut self, action: PanelAction) {
        match action {
            PanelAction::ApplyCanvasRect(rect) => {
                tracing::debug!("Canvas rect set to {:?}", rect);
                self.settings.canvas_rect = rect;
                if !self.settings.expand_canvas {
                    self.canvas.set_bounds(rect.to_rect());
                }
            }
            PanelAction::ClearCanvas => {
                self.canvas.clear();
                self.status = Some("Canvas cleared".to_string());
            }
            PanelAction::ResetSession => {
                self.status = Some(match self.session.as_ref().map(SessionStore::reset) {
                    Some(Ok(true)) => "Saved session deleted".to_string(),
                    Some(Ok(false)) | None => "No saved session".to_string(),
                    Some(Err(e)) => {
                        tracing::error!("Failed to delete session: {e}");
                        format!("Reset failed: {e}")
                    }
                });
            }
        }
    }

    /// Persist settings and the current graph
    pub fn save(&mut self) -> Result<()> {
        self.settings.capture(&self.canvas.style);

        if let Some(path) = &self.settings_path {
            self.settings.save(path)?;
            tracing::info!("Saved settings to {}", path.display());
        }
        if let Some(session) = &self.session {
            session.save(self.canvas.graph())?;
        }
        Ok(())
    }
}
