// Platform-specific code module

pub mod notifier;
pub mod sensors;

pub use notifier::DesktopNotifier;
pub use sensors::read_temperatures;
