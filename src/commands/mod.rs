// Command handlers module
pub mod status;

pub use status::execute as status;
