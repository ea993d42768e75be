pub mod actions;
pub mod app;
pub mod error_modal;
pub mod form_panel;
pub mod message_overlay;
pub mod modal;
pub mod queue_table;
pub mod receiver_modal;
pub mod settings_modal;
pub mod theme;
pub mod toast;
pub mod top_bar;
pub mod upload_panel;

pub use app::PipApp;
