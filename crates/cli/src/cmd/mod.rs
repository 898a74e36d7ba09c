mod create;
mod delete;
mod edit;
mod list;
mod mv;
mod retrieve;
mod update;

pub use create::{CreateArgs, cmd_create};
pub use delete::cmd_delete;
pub use edit::cmd_edit;
pub use list::cmd_list;
pub use mv::cmd_move;
pub use retrieve::{cmd_get, cmd_retrieve};
pub use update::cmd_update;
