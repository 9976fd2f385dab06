use egui::{Color32, RichText, Ui, Vec2};

use crate::ui::theme;

pub fn primary_button(ui: &mut Ui, label: &str, enabled: bool) -> bool {
    let btn = egui::Button::new(RichText::new(label).color(Color32::WHITE))
        .fill(theme::BRAND_PRIMARY)
        .rounding(egui::Rounding::same(6.0))
        .min_size(Vec2::new(0.0, 32.0));
    ui.add_enabled(enabled, btn).clicked()
}

pub fn secondary_button(ui: &mut Ui, label: &str, enabled: bool) -> bool {
    let btn = egui::Button::new(RichText::new(label).color(theme::TEXT_SECONDARY))
        .fill(Color32::TRANSPARENT)
        .stroke(egui::Stroke::new(1.0, theme::BORDER))
        .rounding(egui::Rounding::same(6.0))
        .min_size(Vec2::new(0.0, 32.0));
    ui.add_enabled(enabled, btn).clicked()
}

/// Small outlined button used next to a field's displayed value.
pub fn link_button(ui: &mut Ui, label: &str, enabled: bool) -> bool {
    let btn = egui::Button::new(
        RichText::new(label)
            .color(theme::BRAND_PRIMARY)
            .font(theme::Text::Caption.font()),
    )
    .fill(Color32::TRANSPARENT)
    .stroke(egui::Stroke::new(1.0, theme::BRAND_PRIMARY.linear_multiply(0.5)))
    .rounding(egui::Rounding::same(4.0));
    ui.add_enabled(enabled, btn).clicked()
}

pub fn text_input(ui: &mut Ui, value: &mut String, hint: &str) -> egui::Response {
    let te = egui::TextEdit::singleline(value)
        .hint_text(RichText::new(hint).color(theme::TEXT_MUTED))
        .desired_width(f32::INFINITY)
        .font(theme::Text::Body.font());
    ui.add(te)
}

pub fn password_input(ui: &mut Ui, value: &mut String, hint: &str) -> egui::Response {
    let te = egui::TextEdit::singleline(value)
        .password(true)
        .hint_text(RichText::new(hint).color(theme::TEXT_MUTED))
        .desired_width(f32::INFINITY)
        .font(theme::Text::Body.font());
    ui.add(te)
}

pub fn multiline_input(ui: &mut Ui, value: &mut String, hint: &str) -> egui::Response {
    let te = egui::TextEdit::multiline(value)
        .hint_text(RichText::new(hint).color(theme::TEXT_MUTED))
        .desired_width(f32::INFINITY)
        .desired_rows(4)
        .font(theme::Text::Body.font());
    ui.add(te)
}

/// A label column followed by an input, so form rows line up.
pub fn form_row<R>(ui: &mut Ui, label: &str, add_input: impl FnOnce(&mut Ui) -> R) -> R {
    ui.horizontal(|ui| {
        ui.add_sized(
            [theme::LABEL_WIDTH, 20.0],
            egui::Label::new(RichText::new(label).color(theme::TEXT_SECONDARY)),
        );
        add_input(ui)
    })
    .inner
}

pub fn inline_error(ui: &mut Ui, text: &str) {
    ui.label(
        RichText::new(text)
            .color(theme::DANGER)
            .font(theme::Text::Caption.font()),
    );
}

pub fn spinner(ui: &mut Ui, text: &str) {
    ui.horizontal(|ui| {
        ui.spinner();
        ui.label(RichText::new(text).color(theme::TEXT_SECONDARY));
    });
}

pub fn card_frame() -> egui::Frame {
    egui::Frame::none()
        .fill(theme::BG_CARD)
        .inner_margin(egui::Margin::same(16.0))
        .rounding(egui::Rounding::same(theme::ROUNDING))
        .stroke(egui::Stroke::new(1.0, theme::BORDER))
}

pub fn section_label(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).font(theme::Text::Section.font()).color(theme::TEXT_PRIMARY));
    ui.add_space(4.0);
}
