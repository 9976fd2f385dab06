use egui::{RichText, Ui};

use maxx_account::service::auth;

use crate::state::actions::AppMessage;
use crate::state::types::*;
use crate::state::AppState;
use crate::ui::components::core;
use crate::ui::layout;
use crate::ui::theme;

pub fn render(ui: &mut Ui, state: &mut AppState, rt: &tokio::runtime::Handle) {
    ui.vertical_centered(|ui| {
        ui.set_max_width(theme::FORM_WIDTH);
        ui.add_space(60.0);

        core::card_frame().show(ui, |ui| {
            layout::render_page_header(ui, "Welcome Back", Some("Sign in to your MAXX Energy account"));

            let enabled = !state.login.submitting;
            ui.add_enabled_ui(enabled, |ui| {
                core::form_row(ui, "Username", |ui| {
                    core::text_input(ui, &mut state.login.username, "Username")
                });
                let password = core::form_row(ui, "Password", |ui| {
                    core::password_input(ui, &mut state.login.password, "Password")
                });
                if password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    start_login(state, rt);
                }
            });

            if let Some(error) = &state.login.error {
                ui.add_space(4.0);
                core::inline_error(ui, error);
            }

            ui.add_space(16.0);
            ui.horizontal(|ui| {
                if state.login.submitting {
                    core::spinner(ui, "Signing in...");
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if core::primary_button(ui, "Login", enabled) {
                        start_login(state, rt);
                    }
                });
            });
        });

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            ui.label(RichText::new("Don't have an account?").color(theme::TEXT_MUTED));
            if ui.link("Register").clicked() {
                state.navigate(Page::Register);
            }
        });
    });
}

fn start_login(state: &mut AppState, rt: &tokio::runtime::Handle) {
    if state.login.submitting {
        return;
    }
    let username = state.login.username.trim().to_string();
    let password = state.login.password.clone();
    if username.is_empty() || password.is_empty() {
        state.login.error = Some("Please fill in all fields".into());
        return;
    }

    state.login.submitting = true;
    state.login.error = None;

    let tx = state.tx.clone();
    let client = state.http_client.clone();
    let endpoints = state.settings.endpoints.clone();

    rt.spawn(async move {
        match auth::login(&client, &endpoints, &username, &password).await {
            Ok(token) => {
                let _ = tx.send(AppMessage::LoginSucceeded { token });
            }
            Err(e) => {
                tracing::warn!(error = %e, "Login failed");
                let _ = tx.send(AppMessage::LoginFailed(auth::login_error_message(&e)));
            }
        }
    });
}
