mod central_panel;
mod menu_panel;
mod properties_panel;
mod tools_panel;

pub use central_panel::central_panel;
pub use menu_panel::{menu_panel, MenuAction};
pub use properties_panel::{properties_panel, DragDraft, PropertyDrafts, TextDraft};
pub use tools_panel::tools_panel;
