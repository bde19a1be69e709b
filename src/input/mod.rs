mod dispatcher;
mod handler;
mod keymap;

pub use dispatcher::{Dispatch, Dispatcher, EditingMode};
pub use handler::{text_input, Action, TextInput};
pub use keymap::{key_combo, Keymap, KeymapResolver};
