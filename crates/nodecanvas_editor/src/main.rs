// SPDX-License-Identifier: MIT OR Apache-2.0
//! nodecanvas editor
//!
//! A window hosting a single node canvas:
//! - Right-click the canvas to add coloured nodes
//! - Click an out point then an in point (or the reverse) to connect nodes
//! - Drag nodes with the left button, pan with the middle button
//! - Side panel for canvas layout, display options and session reset
//!
//! ## Architecture
//!
//! The canvas model lives in `nodecanvas_graph` and knows nothing about
//! windows. This binary owns the winit window, the wgpu renderer and the
//! persistence of settings and the edited graph between runs.

mod app;
mod panel;
mod session;
mod settings;
mod state;

use app::EditorApp;
use state::EditorState;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() {
    let env_filter = ["nodecanvas_editor=debug", "wgpu=warn", "naga=warn"]
        .into_iter()
        .filter_map(|directive| directive.parse::<Directive>().ok())
        .fold(EnvFilter::from_default_env(), EnvFilter::add_directive);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting nodecanvas v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = EditorApp::run(EditorState::from_default_paths()) {
        tracing::error!("Editor crashed: {e}");
        std::process::exit(1);
    }
}
