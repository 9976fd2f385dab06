use egui::{Color32, FontId, Rounding, Stroke, TextStyle, Vec2};

use maxx_account::ToastLevel;

pub const BRAND_PRIMARY: Color32 = Color32::from_rgb(16, 163, 127);
pub const DANGER: Color32 = Color32::from_rgb(239, 68, 68);
pub const WARNING: Color32 = Color32::from_rgb(245, 158, 11);
pub const SUCCESS: Color32 = Color32::from_rgb(34, 197, 94);
pub const INFO: Color32 = Color32::from_rgb(59, 130, 246);

pub const BG_PRIMARY: Color32 = Color32::from_rgb(15, 23, 32);
pub const BG_SECONDARY: Color32 = Color32::from_rgb(27, 38, 50);
pub const BG_CARD: Color32 = BG_SECONDARY;

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(241, 245, 249);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(148, 163, 184);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(100, 116, 139);

pub const BORDER: Color32 = Color32::from_rgb(71, 85, 105);

pub const FORM_WIDTH: f32 = 380.0;
pub const LABEL_WIDTH: f32 = 90.0;
pub const PADDING: f32 = 16.0;
pub const ROUNDING: f32 = 8.0;

/// Text roles used by the account pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    Heading,
    Section,
    Body,
    Caption,
}

impl Text {
    pub fn font(self) -> FontId {
        match self {
            Self::Heading => FontId::proportional(24.0),
            Self::Section => FontId::proportional(18.0),
            Self::Body => FontId::proportional(14.0),
            Self::Caption => FontId::proportional(12.0),
        }
    }

    fn style(self) -> TextStyle {
        match self {
            Self::Heading => TextStyle::Heading,
            Self::Section => TextStyle::Name("Section".into()),
            Self::Body => TextStyle::Body,
            Self::Caption => TextStyle::Small,
        }
    }
}

pub fn notice_color(level: ToastLevel) -> Color32 {
    match level {
        ToastLevel::Success => SUCCESS,
        ToastLevel::Error => DANGER,
        ToastLevel::Warning => WARNING,
        ToastLevel::Info => INFO,
    }
}

/// Installs the dark form style. Called once when the app is created.
pub fn apply_theme(ctx: &egui::Context) {
    ctx.style_mut(|style| {
        for text in [Text::Heading, Text::Section, Text::Body, Text::Caption] {
            style.text_styles.insert(text.style(), text.font());
        }
        style.text_styles.insert(TextStyle::Button, Text::Body.font());

        let visuals = &mut style.visuals;
        *visuals = egui::Visuals::dark();
        visuals.panel_fill = BG_PRIMARY;
        visuals.window_fill = BG_SECONDARY;
        visuals.window_stroke = Stroke::new(1.0, BORDER);
        visuals.window_rounding = Rounding::same(ROUNDING + 4.0);
        // Text inputs draw on this.
        visuals.extreme_bg_color = BG_PRIMARY;
        visuals.selection.bg_fill = BRAND_PRIMARY.linear_multiply(0.3);
        visuals.selection.stroke = Stroke::new(1.0, BRAND_PRIMARY);

        let widgets = &mut visuals.widgets;
        widgets.inactive.bg_stroke = Stroke::new(1.0, BORDER);
        widgets.hovered.bg_stroke = Stroke::new(1.0, TEXT_SECONDARY);
        // Outline of the field currently being edited.
        widgets.active.bg_stroke = Stroke::new(1.5, BRAND_PRIMARY);
        for w in [
            &mut widgets.noninteractive,
            &mut widgets.inactive,
            &mut widgets.hovered,
            &mut widgets.active,
        ] {
            w.rounding = Rounding::same(ROUNDING / 2.0);
        }

        style.spacing.item_spacing = Vec2::new(8.0, 8.0);
        style.spacing.button_padding = Vec2::new(12.0, 6.0);
        style.spacing.text_edit_width = FORM_WIDTH - LABEL_WIDTH;
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_theme_installs_text_roles() {
        let ctx = egui::Context::default();
        apply_theme(&ctx);

        let style = ctx.style();
        assert_eq!(style.text_styles[&TextStyle::Heading], Text::Heading.font());
        assert_eq!(
            style.text_styles[&TextStyle::Name("Section".into())],
            Text::Section.font()
        );
        assert_eq!(style.text_styles[&TextStyle::Small], Text::Caption.font());
        assert_eq!(style.spacing.text_edit_width, FORM_WIDTH - LABEL_WIDTH);
        assert_eq!(style.visuals.panel_fill, BG_PRIMARY);
    }

    #[test]
    fn test_notice_colors_follow_level() {
        assert_eq!(notice_color(ToastLevel::Error), DANGER);
        assert_eq!(notice_color(ToastLevel::Warning), WARNING);
        assert_ne!(notice_color(ToastLevel::Success), notice_color(ToastLevel::Info));
    }
}
