pub mod earth;
pub mod mars;
pub mod weather;
