use egui::{Align, Color32, Layout, RichText, Ui};

use crate::state::types::*;
use crate::state::AppState;
use crate::ui::components::core;
use crate::ui::theme;

pub fn render_top_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.add_space(12.0);
        ui.label(
            RichText::new("MAXX Energy")
                .font(theme::Text::Section.font())
                .color(theme::BRAND_PRIMARY),
        );

        let (dot, label) = match state.backend_online {
            Some(true) => (theme::SUCCESS, "Online"),
            Some(false) => (theme::WARNING, "Offline"),
            None => (theme::TEXT_MUTED, "Checking..."),
        };
        ui.label(RichText::new("●").color(dot));
        ui.label(RichText::new(label).color(theme::TEXT_MUTED).font(theme::Text::Caption.font()));

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            ui.add_space(12.0);
            if state.is_authenticated() {
                if core::secondary_button(ui, "Logout", !state.confirm_logout) {
                    state.confirm_logout = true;
                }
            } else {
                let (target, label) = match state.current_page {
                    Page::Register => (Page::Login, "Sign in"),
                    _ => (Page::Register, "Create account"),
                };
                if core::secondary_button(ui, label, true) {
                    state.navigate(target);
                }
            }
        });
    });
}

pub fn render_page_header(ui: &mut Ui, title: &str, subtitle: Option<&str>) {
    ui.label(RichText::new(title).font(theme::Text::Heading.font()).color(theme::TEXT_PRIMARY));
    if let Some(subtitle) = subtitle {
        ui.label(RichText::new(subtitle).color(theme::TEXT_SECONDARY));
    }
    ui.add_space(4.0);
    ui.separator();
    ui.add_space(8.0);
}

pub fn render_toast_area(ctx: &egui::Context, state: &mut AppState) {
    state.clear_expired_toasts();
    if state.toasts.is_empty() {
        return;
    }

    egui::Area::new(egui::Id::new("toast_area"))
        .fixed_pos(egui::pos2(
            ctx.screen_rect().max.x - 360.0,
            ctx.screen_rect().min.y + 48.0,
        ))
        .show(ctx, |ui| {
            ui.set_max_width(340.0);
            for toast in state.toasts.iter() {
                let color = theme::notice_color(toast.level);
                let frame = egui::Frame::none()
                    .fill(theme::BG_SECONDARY)
                    .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                    .rounding(egui::Rounding::same(8.0))
                    .stroke(egui::Stroke::new(1.0, color));
                frame.show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("●").color(color));
                        ui.label(RichText::new(&toast.text).color(theme::TEXT_PRIMARY));
                    });
                });
                ui.add_space(4.0);
            }
        });
}

/// Returns true once the user confirms.
pub fn render_logout_dialog(ctx: &egui::Context, state: &mut AppState) -> bool {
    if !state.confirm_logout {
        return false;
    }

    let mut confirmed = false;
    let mut close = false;

    egui::Window::new("Logout")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([360.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(8.0);
            ui.label(RichText::new("Are you sure you want to logout?").color(theme::TEXT_PRIMARY));
            ui.add_space(16.0);
            ui.horizontal(|ui| {
                if ui
                    .button(RichText::new("Cancel").color(theme::TEXT_SECONDARY))
                    .clicked()
                {
                    close = true;
                }
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let btn = egui::Button::new(RichText::new("Logout").color(Color32::WHITE))
                        .fill(theme::DANGER);
                    if ui.add(btn).clicked() {
                        confirmed = true;
                        close = true;
                    }
                });
            });
        });

    if close {
        state.confirm_logout = false;
    }
    confirmed
}
