// Swipe Calendar Application
// Main entry point

use swipe_calendar::services::settings::SettingsService;
use swipe_calendar::ui_egui::CalendarApp;

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::init();

    log::info!("Starting Swipe Calendar");

    let settings_service = SettingsService::default_location();
    log::info!("Loading settings from {}", settings_service.path().display());
    let settings = settings_service.load_or_default();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Swipe Calendar")
            .with_inner_size([420.0, 780.0])
            .with_min_inner_size([320.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Swipe Calendar",
        options,
        Box::new(move |cc| Ok(Box::new(CalendarApp::new(cc, settings_service, settings)))),
    )
}
