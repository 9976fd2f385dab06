use egui::{Align, Layout, RichText, Ui};

use maxx_account::editor::validation::{self, AT_SIGN_NOTICE};
use maxx_account::service::profile::{load_profile, ProfileService};
use maxx_account::{AppError, CommitStep, FieldKey, FieldKind, ToastLevel};

use crate::state::actions::AppMessage;
use crate::state::types::*;
use crate::state::AppState;
use crate::ui::components::core;
use crate::ui::layout;
use crate::ui::theme;

enum FieldAction {
    Edit(FieldKey),
    Save(FieldKey),
    Cancel(FieldKey),
}

pub fn render(ui: &mut Ui, state: &mut AppState, rt: &tokio::runtime::Handle) {
    if state.profile_status == LoadStatus::Idle {
        start_load(state, rt);
    }

    layout::render_page_header(ui, "My Profile", Some("Click Edit next to a field to change it"));

    if state.profile_status == LoadStatus::Loading {
        core::spinner(ui, "Loading profile...");
        return;
    }

    state.editor.render_into(&mut state.profile_form);

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.set_max_width(640.0);

        core::card_frame().show(ui, |ui| {
            core::section_label(ui, "Personal Information");
            let mut action = None;
            for key in FieldKey::ALL {
                if let Some(a) = render_field(ui, state, key) {
                    action = Some(a);
                }
                ui.add_space(6.0);
            }
            if let Some(action) = action {
                apply_action(state, action, rt);
            }
        });

        ui.add_space(16.0);
        core::card_frame().show(ui, |ui| {
            render_password_section(ui, state, rt);
        });
    });
}

fn render_field(ui: &mut Ui, state: &mut AppState, key: FieldKey) -> Option<FieldAction> {
    let mut action = None;
    let saving = state.editor.is_saving();

    ui.label(
        RichText::new(key.label())
            .color(theme::TEXT_MUTED)
            .font(theme::Text::Caption.font()),
    );

    if state.profile_form.editing == Some(key) {
        let response = match key.kind() {
            FieldKind::MultiLine => ui
                .add_enabled_ui(!saving, |ui| {
                    core::multiline_input(ui, &mut state.profile_form.input, key.label())
                })
                .inner,
            FieldKind::Text | FieldKind::Email => ui
                .add_enabled_ui(!saving, |ui| {
                    core::text_input(ui, &mut state.profile_form.input, key.label())
                })
                .inner,
        };

        if validation::strip_refused(key.kind(), &mut state.profile_form.input) {
            state.add_toast(ToastLevel::Warning, AT_SIGN_NOTICE.into());
        }
        state.editor.sync_buffer(&state.profile_form);
        if let Some(notice) = state.editor.live_notice(key) {
            core::inline_error(ui, notice);
        }

        if response.lost_focus() && key.kind() != FieldKind::MultiLine {
            if ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                action = Some(FieldAction::Save(key));
            } else if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                action = Some(FieldAction::Cancel(key));
            }
        }

        ui.horizontal(|ui| {
            if core::primary_button(ui, "Save", !saving) {
                action = Some(FieldAction::Save(key));
            }
            if core::secondary_button(ui, "Cancel", !saving) {
                action = Some(FieldAction::Cancel(key));
            }
            if saving {
                core::spinner(ui, "Saving...");
            }
        });
    } else {
        ui.horizontal(|ui| {
            match state.profile_form.shown.get(&key).filter(|v| !v.is_empty()) {
                Some(value) => {
                    ui.label(RichText::new(value).color(theme::TEXT_PRIMARY));
                }
                None => {
                    ui.label(RichText::new("Not set").color(theme::TEXT_MUTED).italics());
                }
            }
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if core::link_button(ui, "Edit", !saving) {
                    action = Some(FieldAction::Edit(key));
                }
            });
        });
    }

    action
}

fn apply_action(state: &mut AppState, action: FieldAction, rt: &tokio::runtime::Handle) {
    match action {
        FieldAction::Edit(key) => state.begin_edit(key),
        FieldAction::Cancel(key) => state.cancel_edit(key),
        FieldAction::Save(key) => start_save(state, key, rt),
    }
}

fn start_save(state: &mut AppState, key: FieldKey, rt: &tokio::runtime::Handle) {
    state.editor.sync_buffer(&state.profile_form);

    let update = match state.editor.commit_edit(key) {
        Ok(CommitStep::Unchanged) => {
            state.profile_form.close();
            return;
        }
        Ok(CommitStep::Invalid(e)) => {
            state.add_toast(ToastLevel::Error, e.to_string());
            return;
        }
        Ok(CommitStep::Pending(update)) => update,
        Err(e) => {
            state.add_toast(ToastLevel::Warning, e.to_string());
            return;
        }
    };

    let Some(token) = state.token.clone() else {
        state.handle_message(AppMessage::ProfileSaved {
            key,
            result: Err(AppError::NotAuthenticated),
        });
        return;
    };

    let tx = state.tx.clone();
    let service = state.profile_service.clone();
    rt.spawn(async move {
        let result = service.update_profile(&update, &token).await;
        let _ = tx.send(AppMessage::ProfileSaved { key, result });
    });
}

fn start_load(state: &mut AppState, rt: &tokio::runtime::Handle) {
    let Some(token) = state.token.clone() else {
        state.navigate(Page::Login);
        return;
    };
    state.profile_status = LoadStatus::Loading;

    let tx = state.tx.clone();
    let service = state.profile_service.clone();
    let storage = state.storage.clone();
    rt.spawn(async move {
        let (record, origin) = load_profile(&service, storage.as_ref(), &token).await;
        let _ = tx.send(AppMessage::ProfileLoaded { record, origin });
    });
}

fn render_password_section(ui: &mut Ui, state: &mut AppState, rt: &tokio::runtime::Handle) {
    core::section_label(ui, "Change Password");

    let enabled = state.password.can_submit();
    ui.add_enabled_ui(enabled, |ui| {
        core::form_row(ui, "Current", |ui| {
            core::password_input(ui, &mut state.password.old_password, "Current password")
        });
        core::form_row(ui, "New", |ui| {
            core::password_input(ui, &mut state.password.new_password, "At least 6 characters")
        });
    });

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if core::primary_button(ui, "Change Password", enabled) {
            start_password_change(state, rt);
        }
        if state.password.is_submitting() {
            core::spinner(ui, "Updating password...");
        }
    });
}

fn start_password_change(state: &mut AppState, rt: &tokio::runtime::Handle) {
    let change = match state.password.begin_submit() {
        Ok(change) => change,
        Err(notice) => {
            state.notify(notice);
            return;
        }
    };

    let Some(token) = state.token.clone() else {
        state.handle_message(AppMessage::PasswordChanged(Err(AppError::NotAuthenticated)));
        return;
    };

    let tx = state.tx.clone();
    let service = state.profile_service.clone();
    rt.spawn(async move {
        let result = service
            .change_password(&change.old_password, &change.new_password, &token)
            .await;
        let _ = tx.send(AppMessage::PasswordChanged(result));
    });
}
