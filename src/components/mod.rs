pub mod footer;
pub mod label_chip;
pub mod label_panel;
pub mod picker;
pub mod reviewer_panel;
pub mod toast;
