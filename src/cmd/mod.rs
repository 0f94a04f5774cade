//! CLI command implementations.
//!
//! Each submodule owns one `Commands` variant:
//!
//! | Module      | Commands handled |
//! |-------------|------------------|
//! | `board`     | `Board`          |
//! | `check`     | `CheckMove`      |
//! | `config`    | `Config`         |
//! | `features`  | `Features`       |

pub mod board;
pub mod check;
pub mod config;
pub mod features;

pub use board::{BoardOptions, cmd_board};
pub use check::{MoveTarget, cmd_check_move};
pub use config::cmd_config;
pub use features::cmd_features;
