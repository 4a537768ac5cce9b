pub mod admin;
pub mod deploy;
pub mod game;
pub mod session;

pub use admin::{handle_admin_command, AdminCommands};
pub use deploy::{handle_deploy_command, DeployCommands};
pub use game::{handle_game_command, GameCommands};
pub use session::{handle_session_command, SessionCommands};
