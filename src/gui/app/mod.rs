mod modals;

use std::{
    mem,
    path::PathBuf,
};

use eframe::egui;
use modals::Modals;
use tracing::{
    debug,
    error,
    info,
    warn,
};

use super::{
    actions::{
        ActionQueue,
        UiAction,
    },
    form_panel::form_panel,
    message_overlay::MessageOverlay,
    modal::ConfirmResult,
    queue_table::queue_panel,
    theme::{
        set_theme,
        Theme,
    },
    toast::Toasts,
    top_bar::TopBar,
    upload_panel::{
        pick_spreadsheet,
        upload_panel,
    },
};
use crate::{
    core::{
        pipeline::ImportReport,
        submission::{
            Acknowledgement,
            SubmitReceipt,
        },
        tasks::{
            TaskManager,
            TaskResult,
        },
        EntryForm,
        PipError,
        Queue,
    },
    persistence::{
        Settings,
        SettingsStore,
    },
    remote::{
        RemoteStatus,
        SkipReason,
    },
    spreadsheet::{
        save_template,
        SheetFormat,
        DEFAULT_TEMPLATE_NAME,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Manual,
    Upload,
}

pub struct PipApp {
    // Configuration
    settings_store: SettingsStore,
    pub settings: Settings,

    // Data
    pub queue: Queue,
    pub form: EntryForm,

    // UI State
    pub tab: Tab,
    pub theme: Theme,
    pub toasts: Toasts,
    pub message_overlay: MessageOverlay,
    actions: ActionQueue,

    // Modals
    pub modals: Modals,

    task_manager: TaskManager,
}

impl PipApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings_store: SettingsStore) -> Result<Self, PipError> {
        let settings = settings_store.load();
        let task_manager = TaskManager::new()?;
        let theme = Theme::dracula();

        set_theme(&cc.egui_ctx, &theme);
        cc.egui_ctx.set_zoom_factor(cc.egui_ctx.zoom_factor() + 0.1);

        Ok(Self {
            settings_store,
            settings,
            queue: Queue::new(),
            form: EntryForm::new(),
            tab: Tab::default(),
            theme,
            toasts: Toasts::default(),
            message_overlay: MessageOverlay::new(),
            actions: ActionQueue::new(),
            modals: Modals::default(),
            task_manager,
        })
    }

    fn is_busy(&self) -> bool {
        self.message_overlay.is_active()
    }
}

impl eframe::App for PipApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let task_results = self.task_manager.poll_results();
        for result in task_results {
            debug!("Task result: {}", result.task_type());
            self.handle_task_result(result);
        }
        if self.is_busy() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        self.handle_file_drops(ctx);

        TopBar::show(ctx, &self.settings, &mut self.actions);

        egui::TopBottomPanel::bottom("queue_panel")
            .resizable(true)
            .default_height(320.0)
            .min_height(160.0)
            .show(ctx, |ui| {
                queue_panel(ui, &mut self.queue, self.message_overlay.is_active(), &self.theme, &mut self.actions);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.tab, Tab::Manual, "✏ Manual Entry");
                ui.selectable_value(&mut self.tab, Tab::Upload, "📄 Upload Spreadsheet");
            });
            ui.separator();

            egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| match self.tab {
                Tab::Manual => {
                    if let Some(record) = form_panel(ui, &mut self.form, &self.theme) {
                        self.queue.append(record);
                        self.toasts.success("Record added to the queue");
                    }
                }
                Tab::Upload => {
                    upload_panel(ui, &self.settings, &self.theme, &mut self.actions);
                }
            });
        });

        self.apply_actions();

        self.draw_file_drop_overlay(ctx);
        self.message_overlay.show(ctx, &self.theme);
        self.toasts.show(ctx, &self.theme);

        self.modals.error.show(ctx);

        if let Some(ConfirmResult::Confirmed(action)) = self.modals.confirm.show(ctx) {
            self.apply_action(action, true);
        }

        if let Some(settings) = self.modals.settings.show(ctx) {
            self.settings = settings;
            self.save_settings();
        }

        self.modals.receiver.show(ctx);
    }
}

impl PipApp {
    fn apply_actions(&mut self) {
        let actions: Vec<UiAction> = self.actions.drain().collect();
        for action in actions {
            self.apply_action(action, false);
        }
    }

    fn apply_action(&mut self, action: UiAction, confirmed: bool) {
        match action {
            UiAction::BeginEdit(index) => {
                self.queue.begin_edit(index);
            }
            UiAction::CommitEdit => {
                if self.queue.commit_edit() {
                    self.toasts.success("Changes saved");
                }
            }
            UiAction::CancelEdit => self.queue.cancel_edit(),
            UiAction::Remove(index) => {
                self.queue.remove_at(index);
            }
            UiAction::RequestClear if !confirmed => {
                self.modals.confirm.ask(
                    "Clear Queue",
                    format!("Remove all {} records from the queue?", self.queue.len()),
                    "Clear",
                    UiAction::RequestClear,
                );
            }
            UiAction::RequestClear => {
                self.queue.clear();
                self.toasts.info("Queue cleared");
            }
            UiAction::Submit => self.submit_queue(),
            UiAction::BrowseFile => {
                if let Some(path) = pick_spreadsheet() {
                    self.import_file(path);
                }
            }
            UiAction::ImportPath(path) => self.import_file(path),
            UiAction::SaveTemplate(style) => self.save_template(style),
            UiAction::OpenSettings => self.modals.settings.open_settings(&self.settings),
            UiAction::OpenReceiverScript => self.modals.receiver.open(),
        }
    }

    fn import_file(&mut self, path: PathBuf) {
        if self.is_busy() {
            return;
        }
        info!("Starting import of {}", path.display());
        self.message_overlay.set_message("Reading spreadsheet...");
        self.task_manager.import_file(path, self.settings.remote_cleanup.clone());
    }

    fn submit_queue(&mut self) {
        if self.is_busy() {
            return;
        }
        if self.queue.is_empty() {
            self.toasts.error("The queue is empty");
            return;
        }
        if !self.settings.has_destination() {
            self.toasts.error("Set a destination URL before submitting");
            self.modals.settings.open_settings(&self.settings);
            return;
        }

        self.queue.cancel_edit();
        self.message_overlay.set_message(format!("Sending {} records...", self.queue.len()));
        self.task_manager.submit(self.queue.records().to_vec(), self.settings.destination_url.clone());
    }

    fn save_template(&mut self, style: crate::spreadsheet::TemplateStyle) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Excel Workbook", &["xlsx"])
            .set_file_name(DEFAULT_TEMPLATE_NAME)
            .save_file()
        else {
            return;
        };

        match save_template(&path, style) {
            Ok(()) => self.toasts.success("Template saved"),
            Err(e) => {
                error!("Failed to save template: {}", e);
                self.toasts.error(format!("Failed to save template: {e}"));
            }
        }
    }

    fn handle_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::LoadingMessage(message) => {
                self.message_overlay.set_message(message);
            }
            TaskResult::Import(result) => {
                self.message_overlay.clear_message();
                match result {
                    Ok(report) => self.handle_import_report(report),
                    Err(e) => {
                        self.modals.error.show_error(
                            "Import Failed",
                            "The file could not be imported. Nothing was added to the queue.",
                            Some(e),
                        );
                    }
                }
            }
            TaskResult::Submission { count, result } => {
                self.message_overlay.clear_message();
                self.handle_submission_result(count, result);
            }
        }
    }

    fn handle_import_report(&mut self, report: ImportReport) {
        let added = self.queue.append_bulk(report.records);
        let mut message = format!("{added} records loaded from {}", report.file_name);
        if report.skipped_blank_rows > 0 {
            message.push_str(&format!(" ({} blank rows skipped)", report.skipped_blank_rows));
        }
        self.toasts.success(message);

        if !report.unmatched_fields.is_empty() {
            let labels: Vec<&str> = report.unmatched_fields.iter().map(|id| id.label()).collect();
            self.toasts.info(format!("No column found for: {}", labels.join(", ")));
        }

        match report.remote {
            Some(RemoteStatus::FellBack(reason)) => {
                self.toasts.info(format!("Remote cleanup unavailable, original data kept ({reason})"));
            }
            Some(RemoteStatus::Skipped(SkipReason::Oversize)) => {
                self.toasts.info("Too many rows for remote cleanup, original data kept");
            }
            _ => {}
        }
    }

    fn handle_submission_result(&mut self, count: usize, result: Result<SubmitReceipt, String>) {
        self.queue.apply_submission(count, &result);
        match result {
            Ok(receipt) => match receipt.ack {
                Acknowledgement::Confirmed => {
                    self.toasts.success(format!("{} records sent to the spreadsheet", receipt.count))
                }
                Acknowledgement::Opaque => self.toasts.success(format!(
                    "{} records sent (the receiver did not confirm)",
                    receipt.count
                )),
            },
            Err(e) => {
                warn!("Submission of {} records failed", count);
                self.toasts.error(format!("Submission failed, queue kept: {e}"));
            }
        }
    }

    fn save_settings(&mut self) {
        if let Err(e) = self.settings_store.save(&self.settings) {
            error!("Failed to save settings: {}", e);
            self.toasts.error(format!("Failed to save settings: {e}"));
        } else {
            self.toasts.success("Settings saved");
        }
    }

    fn handle_file_drops(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input_mut(|i| mem::take(&mut i.raw.dropped_files));
        if dropped.is_empty() || self.is_busy() {
            return;
        }

        let path = dropped.iter().filter_map(|f| f.path.as_deref()).find(|p| SheetFormat::is_supported(p));

        match path {
            Some(path) => {
                self.tab = Tab::Upload;
                self.actions.push(UiAction::ImportPath(path.to_path_buf()));
            }
            None => self.toasts.error("Unsupported file type. Use .xlsx, .xls, .ods or .csv"),
        }
    }

    fn draw_file_drop_overlay(&self, ctx: &egui::Context) {
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
        if !hovering {
            return;
        }

        egui::Area::new(egui::Id::new("file_drop_overlay"))
            .order(egui::Order::Foreground)
            .fixed_pos(egui::Pos2::ZERO)
            .show(ctx, |ui| {
                let screen_rect = ctx.screen_rect();
                ui.painter().rect_filled(screen_rect, 0.0, egui::Color32::from_black_alpha(160));
                ui.painter().text(
                    screen_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "Drop spreadsheet to import",
                    egui::FontId::proportional(28.0),
                    self.theme.cyan(ctx),
                );
            });
    }
}
