use egui::{RichText, Ui};

use maxx_account::service::auth::{self, Registration};

use crate::state::actions::AppMessage;
use crate::state::types::*;
use crate::state::AppState;
use crate::ui::components::core;
use crate::ui::layout;
use crate::ui::theme;

pub fn render(ui: &mut Ui, state: &mut AppState, rt: &tokio::runtime::Handle) {
    ui.vertical_centered(|ui| {
        ui.set_max_width(theme::FORM_WIDTH);
        ui.add_space(40.0);

        core::card_frame().show(ui, |ui| {
            layout::render_page_header(ui, "Create Account", Some("Register for employee access"));

            let enabled = !state.register.submitting;
            let fields = &mut state.register.fields;
            ui.add_enabled_ui(enabled, |ui| {
                core::form_row(ui, "Full name", |ui| {
                    core::text_input(ui, &mut fields.name, "Jane Doe")
                });
                core::form_row(ui, "Employee ID", |ui| {
                    core::text_input(ui, &mut fields.employee_id, "E-1234")
                });
                core::form_row(ui, "Username", |ui| {
                    core::text_input(ui, &mut fields.username, "Username")
                });
                core::form_row(ui, "Email", |ui| {
                    core::text_input(ui, &mut fields.email, "name@company.com")
                });
                core::form_row(ui, "Password", |ui| {
                    core::password_input(ui, &mut fields.password, "At least 6 characters")
                });
            });

            if let Some(error) = &state.register.error {
                ui.add_space(4.0);
                core::inline_error(ui, error);
            }

            ui.add_space(16.0);
            ui.horizontal(|ui| {
                if state.register.submitting {
                    core::spinner(ui, "Creating account...");
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if core::primary_button(ui, "Register", enabled) {
                        start_registration(state, rt);
                    }
                });
            });
        });

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            ui.label(RichText::new("Already registered?").color(theme::TEXT_MUTED));
            if ui.link("Login").clicked() {
                state.navigate(Page::Login);
            }
        });
    });
}

fn start_registration(state: &mut AppState, rt: &tokio::runtime::Handle) {
    if state.register.submitting {
        return;
    }
    let f = &state.register.fields;
    let registration = Registration {
        username: f.username.trim().to_string(),
        email: f.email.trim().to_string(),
        password: f.password.clone(),
        name: f.name.trim().to_string(),
        employee_id: f.employee_id.trim().to_string(),
    };
    if let Err(e) = registration.validate() {
        state.register.error = Some(auth::registration_error_message(&e));
        return;
    }

    state.register.submitting = true;
    state.register.error = None;

    let tx = state.tx.clone();
    let client = state.http_client.clone();
    let endpoints = state.settings.endpoints.clone();

    rt.spawn(async move {
        match auth::register(&client, &endpoints, &registration).await {
            Ok(()) => {
                let _ = tx.send(AppMessage::Registered);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Registration failed");
                let _ = tx.send(AppMessage::RegistrationFailed(
                    auth::registration_error_message(&e),
                ));
            }
        }
    });
}
