//! CLI command implementations.
//!
//! - `init`: Create the data directory and database
//! - `add_field`: Register a field with its hourly rate
//! - `fields`: List fields
//! - `book`: Admit a single or weekly recurring booking
//! - `list`: List reservations with filters
//! - `schedule`: Show the taken windows of a field
//! - `set_status`: Apply a lifecycle transition
//! - `cancel_group`: Cancel every session of a booking group
//! - `attach_proof`: Record a payment-proof reference
//! - `expire`: Expire unpaid reservations past a threshold
//! - `show_data_dir`: Show resolved data directory path
//! - `completions`: Generate shell completion scripts

pub mod add_field;
pub mod attach_proof;
pub mod book;
pub mod cancel_group;
pub mod completions;
pub mod expire;
pub mod fields;
pub mod init;
pub mod list;
pub mod schedule;
pub mod set_status;
pub mod show_data_dir;

pub use add_field::AddFieldCommand;
pub use attach_proof::AttachProofCommand;
pub use book::BookCommand;
pub use cancel_group::CancelGroupCommand;
pub use completions::CompletionsCommand;
pub use expire::ExpireCommand;
pub use fields::FieldsCommand;
pub use init::InitCommand;
pub use list::ListCommand;
pub use schedule::ScheduleCommand;
pub use set_status::SetStatusCommand;
pub use show_data_dir::ShowDataDirCommand;
