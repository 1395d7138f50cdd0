pub mod actions;
pub mod config;
pub mod display;
pub mod downloader;
pub mod metadata;
pub mod platforms;
pub mod session;

#[cfg(feature = "desktop")]
mod desktop;

#[cfg(test)]
mod test_support;

#[cfg(feature = "desktop")]
pub use desktop::run;
