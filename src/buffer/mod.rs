mod history;
mod rope_buffer;

pub use rope_buffer::TextBuffer;
