mod state;
mod ui;

use eframe::egui;
use tokio::sync::mpsc;

use maxx_account::service::auth;
use maxx_account::{ApiSettings, AppError, LocalStorage};

use crate::state::actions::AppMessage;
use crate::state::types::*;
use crate::state::AppState;
use crate::ui::theme;

struct MaxxApp {
    state: AppState,
    rx: mpsc::UnboundedReceiver<AppMessage>,
    rt: tokio::runtime::Handle,
}

impl MaxxApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        state: AppState,
        rx: mpsc::UnboundedReceiver<AppMessage>,
        rt: tokio::runtime::Handle,
    ) -> Self {
        theme::apply_theme(&cc.egui_ctx);
        let app = Self { state, rx, rt };
        app.check_backend();
        app
    }

    fn process_messages(&mut self, ctx: &egui::Context) {
        while let Ok(msg) = self.rx.try_recv() {
            self.state.handle_message(msg);
            ctx.request_repaint();
        }
    }

    fn check_backend(&self) {
        let tx = self.state.tx.clone();
        let client = self.state.http_client.clone();
        let endpoints = self.state.settings.endpoints.clone();
        self.rt.spawn(async move {
            let online = match auth::health(&client, &endpoints).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "Backend health check failed");
                    false
                }
            };
            let _ = tx.send(AppMessage::HealthChecked(online));
        });
    }
}

impl eframe::App for MaxxApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_messages(ctx);

        egui::TopBottomPanel::top("top_bar")
            .frame(
                egui::Frame::none()
                    .fill(theme::BG_SECONDARY)
                    .inner_margin(egui::Margin::symmetric(0.0, 8.0)),
            )
            .show(ctx, |ui| {
                crate::ui::layout::render_top_bar(ui, &mut self.state);
            });

        egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(theme::BG_PRIMARY)
                    .inner_margin(egui::Margin::same(theme::PADDING)),
            )
            .show(ctx, |ui| match self.state.current_page {
                Page::Login => crate::ui::pages::render_login(ui, &mut self.state, &self.rt),
                Page::Register => crate::ui::pages::render_register(ui, &mut self.state, &self.rt),
                Page::Profile => crate::ui::pages::render_profile(ui, &mut self.state, &self.rt),
            });

        if crate::ui::layout::render_logout_dialog(ctx, &mut self.state) {
            self.state.logout();
        }

        crate::ui::layout::render_toast_area(ctx, &mut self.state);

        // Toasts expire and background tasks report back without input events.
        ctx.request_repaint_after(std::time::Duration::from_millis(250));
    }
}

fn load_settings(storage: &LocalStorage) -> ApiSettings {
    let path = storage.settings_path();
    let settings = if path.exists() {
        storage.read_json::<ApiSettings>(&path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Ignoring unreadable settings file");
            ApiSettings::default()
        })
    } else {
        let defaults = ApiSettings::default();
        if let Err(e) = storage.write_json(&path, &defaults) {
            tracing::warn!(error = %e, "Failed to write default settings");
        }
        defaults
    };
    settings.with_env_overrides()
}

fn build_state(tx: mpsc::UnboundedSender<AppMessage>) -> Result<AppState, AppError> {
    let storage = LocalStorage::new()?;
    let settings = load_settings(&storage);
    let state = AppState::new(settings, storage, tx)?;
    tracing::info!(
        server_url = %state.http_client.base_url(),
        data_dir = %state.storage.base_dir().display(),
        "Starting MAXX desktop"
    );
    Ok(state)
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "maxx_desktop=info,maxx_account=info".into()),
        )
        .init();

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create tokio runtime");

    let (tx, rx) = mpsc::unbounded_channel();

    let state = match build_state(tx) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize application state");
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 720.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("MAXX Energy"),
        ..Default::default()
    };

    let handle = rt.handle().clone();

    eframe::run_native(
        "MAXX Energy",
        options,
        Box::new(move |cc| Ok(Box::new(MaxxApp::new(cc, state, rx, handle)))),
    )
}
