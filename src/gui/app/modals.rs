use crate::gui::{
    error_modal::ErrorModal,
    modal::ConfirmModal,
    receiver_modal::ReceiverModal,
    settings_modal::SettingsModal,
};

#[derive(Default)]
pub struct Modals {
    pub error: ErrorModal,
    pub confirm: ConfirmModal,
    pub settings: SettingsModal,
    pub receiver: ReceiverModal,
}
