mod inspect;
mod list;
mod serve;
pub use inspect::handle_inspect;
pub use list::handle_list;
pub use serve::handle_serve;
