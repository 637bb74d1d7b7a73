pub mod ela;
pub mod thumbnail;
