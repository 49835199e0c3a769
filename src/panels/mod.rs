mod central_panel;
mod dialog;
mod menu_bar;
mod status_bar;
mod tools_panel;

pub use central_panel::central_panel;
pub use dialog::{DialogAction, ModalDialog};
pub use menu_bar::menu_bar;
pub use status_bar::{StatusBar, status_bar};
pub use tools_panel::tools_panel;
