use std::{path::PathBuf, time::Duration};

pub trait Configuration: Clone + Send + Sync + 'static {
    fn website_title(&self) -> String;
    fn frontend_path(&self) -> PathBuf;
    fn port(&self) -> String;
    /// Without a backend URL reservations are kept in memory.
    fn backend_url(&self) -> Option<String>;
    fn request_timeout(&self) -> Option<Duration>;
}
