pub mod error;
pub mod execution;
pub mod notification;
pub mod recording;
pub mod test_case;
pub mod workbench;
