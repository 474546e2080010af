//! Top-level entry point for running the volcano plot as a native window.

use eframe::egui;

use crate::config::VolcanoConfig;
use crate::data::points::RawSeries;

use super::VolcanoApp;

/// Open a native window showing `data` and block until it is closed.
///
/// Programmatic controllers in `cfg.controllers` stay usable from other
/// threads while the window is open. `setup` runs once on the app before the
/// event loop starts, e.g. to attach an enrichment service.
pub fn run_volcano(
    data: Option<RawSeries>,
    mut cfg: VolcanoConfig,
    setup: impl FnOnce(VolcanoApp) -> VolcanoApp,
) -> eframe::Result<()> {
    let title = cfg.title.clone();
    let mut opts = cfg.native_options.take().unwrap_or_default();
    if opts.viewport.inner_size.is_none() {
        opts.viewport = opts.viewport.clone().with_inner_size(egui::vec2(1280.0, 860.0));
    }

    let mut app = VolcanoApp::new(cfg);
    if let Some(raw) = data {
        app.load_data(&raw);
    }
    let app = setup(app);

    eframe::run_native(
        &title,
        opts,
        Box::new(|cc| {
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(app))
        }),
    )
}
