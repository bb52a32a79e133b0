// Time Schedule Application
// Main entry point

use std::fs;

use directories::ProjectDirs;

use time_schedule::ui_egui::ScheduleApp;

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::init();

    log::info!("Starting Time Schedule Application");

    let db_path = database_path();
    log::info!("Using database at {}", db_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Time Schedule",
        options,
        Box::new(move |cc| {
            ScheduleApp::new(cc, &db_path)
                .map(|app| Box::new(app) as Box<dyn eframe::App>)
                .map_err(|e| e.into())
        }),
    )
}

/// Resolve the per-user database path, falling back to the working
/// directory when the platform directories are unavailable.
fn database_path() -> String {
    if let Some(dirs) = ProjectDirs::from("com", "Ken24T", "time-schedule") {
        let data_dir = dirs.data_dir();
        if let Err(e) = fs::create_dir_all(data_dir) {
            log::warn!("Could not create data dir {:?}: {}", data_dir, e);
        } else {
            return data_dir.join("time_schedule.db").to_string_lossy().into_owned();
        }
    }
    "time_schedule.db".to_string()
}
