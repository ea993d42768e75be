use std::time::{
    Duration,
    Instant,
};

use eframe::egui;

use crate::gui::theme::Theme;

pub const TOAST_LIFETIME: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    created: Instant,
}

/// Short notifications stacked in the bottom-right corner.
#[derive(Debug, Default)]
pub struct Toasts {
    items: Vec<Toast>,
}

impl Toasts {
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.push_at(kind, message, Instant::now());
    }

    fn push_at(&mut self, kind: ToastKind, message: impl Into<String>, created: Instant) {
        self.items.push(Toast { kind, message: message.into(), created });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Error, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Info, message);
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }

    /// Drops expired toasts and returns how long until the next one expires.
    pub fn prune(&mut self, now: Instant) -> Option<Duration> {
        self.items.retain(|toast| now.saturating_duration_since(toast.created) < TOAST_LIFETIME);
        self.items
            .iter()
            .map(|toast| TOAST_LIFETIME.saturating_sub(now.saturating_duration_since(toast.created)))
            .min()
    }

    pub fn show(&mut self, ctx: &egui::Context, theme: &Theme) {
        if let Some(next_expiry) = self.prune(Instant::now()) {
            ctx.request_repaint_after(next_expiry);
        }
        if self.items.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("toasts"))
            .order(egui::Order::Tooltip)
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
            .show(ctx, |ui| {
                for toast in &self.items {
                    let (icon, color) = match toast.kind {
                        ToastKind::Success => ("✔", theme.green(ctx)),
                        ToastKind::Error => ("⚠", theme.red(ctx)),
                        ToastKind::Info => ("ℹ", theme.cyan(ctx)),
                    };

                    egui::Frame::popup(ui.style()).stroke(egui::Stroke::new(1.5, color)).show(ui, |ui| {
                        ui.set_max_width(360.0);
                        ui.horizontal_wrapped(|ui| {
                            ui.label(egui::RichText::new(icon).color(color).strong());
                            ui.label(&toast.message);
                        });
                    });
                    ui.add_space(6.0);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_expire_after_lifetime() {
        let start = Instant::now();
        let mut toasts = Toasts::default();
        toasts.push_at(ToastKind::Success, "first", start);
        toasts.push_at(ToastKind::Error, "second", start + Duration::from_secs(2));

        let next = toasts.prune(start + Duration::from_secs(1));
        assert_eq!(toasts.items().len(), 2);
        assert_eq!(next, Some(Duration::from_secs(3)));

        toasts.prune(start + Duration::from_secs(4));
        assert_eq!(toasts.items().len(), 1);
        assert_eq!(toasts.items()[0].message, "second");

        assert_eq!(toasts.prune(start + Duration::from_secs(6)), None);
        assert!(toasts.items().is_empty());
    }
}
