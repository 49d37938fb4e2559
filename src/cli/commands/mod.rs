mod maintenance;
mod roster;
mod users;

pub use maintenance::{cmd_backup, cmd_reset_year, cmd_restore};
pub use roster::cmd_import_roster;
pub use users::cmd_create_user;
