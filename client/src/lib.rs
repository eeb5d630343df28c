pub mod config;
pub mod error;
pub mod heartbeat;
pub mod notice;
pub mod panel;
pub mod remote;

#[cfg(test)]
mod testing;

pub use config::PanelConfig;
pub use error::PanelError;
pub use heartbeat::Heartbeat;
pub use notice::{Notice, NoticeLevel, Notifier};
pub use panel::{Panel, RowViews};
pub use remote::{HttpRemote, Remote};
