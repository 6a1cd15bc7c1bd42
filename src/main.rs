use iced::keyboard::{self, key::Named, Key};
use iced::{Element, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use snap_label::{export, Catalog, Config, Label, NavigationSession, NavigationView, ScanReport};

mod ui;

/// Main application state
struct SnapLabel {
    /// The catalog database
    catalog: Catalog,
    /// Cursor over the unlabeled images
    session: NavigationSession,
    /// Last view read from the session
    view: Option<NavigationView>,
    /// Status message to display to the user
    status: String,
    /// A folder scan is running in the background
    scanning: bool,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked the "Scan Folder" button
    ScanFolder,
    /// Background scan finished
    ScanComplete(Result<ScanReport, String>),
    Next,
    Prev,
    Label(Label),
    ExportCsv,
    ClearCatalog,
}

impl SnapLabel {
    fn new(catalog: Catalog) -> (Self, Task<Message>) {
        let mut app = SnapLabel {
            catalog,
            session: NavigationSession::new(),
            view: None,
            status: String::new(),
            scanning: false,
        };
        app.refresh();
        if let Some(view) = &app.view {
            app.status = format!("Ready. {} images in catalog.", view.stats().total);
        }

        (app, Task::none())
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ScanFolder => {
                if self.scanning {
                    return Task::none();
                }

                // Show the native folder picker dialog
                let Some(folder) = FileDialog::new()
                    .set_title("Select Folder with Images")
                    .pick_folder()
                else {
                    return Task::none();
                };

                self.status = format!("Scanning {}...", folder.display());
                self.scanning = true;

                let db_path = self.catalog.path().to_path_buf();
                return Task::perform(scan_folder_async(folder, db_path), Message::ScanComplete);
            }
            Message::ScanComplete(result) => {
                self.scanning = false;
                match result {
                    Ok(report) => {
                        self.session.reset();
                        self.refresh();
                        let unlabeled = self.view.as_ref().map(|v| v.stats().unlabeled);
                        self.status = format!(
                            "Scanned {} images ({} unlabeled)",
                            report.considered,
                            unlabeled.unwrap_or(0)
                        );
                        if report.skipped > 0 {
                            self.status.push_str(&format!(", {} skipped", report.skipped));
                        }
                    }
                    Err(message) => self.status = message,
                }
            }
            Message::Next => {
                let view = self.session.next(&self.catalog);
                self.show(view);
            }
            Message::Prev => {
                let view = self.session.prev(&self.catalog);
                self.show(view);
            }
            Message::Label(label) => {
                let view = self.session.label_current(&self.catalog, label);
                self.show(view);
            }
            Message::ExportCsv => {
                let target = FileDialog::new()
                    .set_title("Export Labels")
                    .set_file_name("labels.csv")
                    .add_filter("CSV", &["csv"])
                    .save_file();

                if let Some(path) = target {
                    self.status = match export::export_csv_file(&self.catalog, &path) {
                        Ok(rows) => format!("Exported {} rows to {}", rows, path.display()),
                        Err(e) => {
                            error!("Export failed: {}", e);
                            format!("Export failed: {}", e)
                        }
                    };
                }
            }
            Message::ClearCatalog => {
                match self.catalog.clear_all() {
                    Ok(()) => {
                        self.session.reset();
                        self.status = "Catalog cleared.".to_string();
                    }
                    Err(e) => {
                        error!("Clear failed: {}", e);
                        self.status = format!("Clear failed: {}", e);
                    }
                }
                self.refresh();
            }
        }

        Task::none()
    }

    /// Re-read the current view from the session
    fn refresh(&mut self) {
        let view = self.session.current(&self.catalog);
        self.show(view);
    }

    fn show(&mut self, view: snap_label::Result<NavigationView>) {
        match view {
            Ok(view) => self.view = Some(view),
            Err(e) => {
                error!("Catalog read failed: {}", e);
                self.status = format!("Catalog error: {}", e);
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        ui::labeling_screen(self.view.as_ref(), &self.status, self.scanning)
    }

    /// Keyboard shortcuts for navigation and labeling
    fn subscription(&self) -> Subscription<Message> {
        keyboard::on_key_press(|key, _modifiers| match key.as_ref() {
            Key::Named(Named::ArrowRight) => Some(Message::Next),
            Key::Named(Named::ArrowLeft) => Some(Message::Prev),
            Key::Character("o") | Key::Character("1") => Some(Message::Label(Label::Ok)),
            Key::Character("n") | Key::Character("2") => Some(Message::Label(Label::Ng)),
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let catalog = match Config::from_env().and_then(|config| Catalog::open(&config.db_path)) {
        Ok(catalog) => catalog,
        Err(e) => {
            // The app cannot function without its catalog
            error!("Failed to open catalog: {}", e);
            std::process::exit(1);
        }
    };
    info!("SnapLabel starting with catalog {}", catalog.path().display());

    iced::application("SnapLabel", SnapLabel::update, SnapLabel::view)
        .subscription(SnapLabel::subscription)
        .theme(SnapLabel::theme)
        .centered()
        .run_with(move || SnapLabel::new(catalog))
}

/// Scan a folder into the catalog on a blocking worker.
///
/// rusqlite::Connection is not Sync, so the worker opens its own
/// connection to the same database file.
async fn scan_folder_async(folder: PathBuf, db_path: PathBuf) -> Result<ScanReport, String> {
    let scan = tokio::task::spawn_blocking(move || {
        let catalog = Catalog::open(&db_path)?;
        catalog.ingest_with_report(&folder)
    });

    match scan.await {
        Ok(Ok(report)) => Ok(report),
        Ok(Err(e)) => {
            error!("Scan failed: {}", e);
            Err(e.to_string())
        }
        Err(e) => Err(format!("Scan worker failed: {}", e)),
    }
}
